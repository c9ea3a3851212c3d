//! Conversion options
//!
//! Ruby patterns carry their flags outside the pattern (`/.../imx`). The same
//! letters configure a conversion here.

use std::fmt;
use std::str::FromStr;

use crate::error::OptionsError;

/// Ruby regex options that affect parsing and the resulting JS flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// `i`: case-insensitive matching
    pub ignore_case: bool,
    /// `m`: dot matches newline (JS `s`)
    pub multiline: bool,
    /// `x`: whitespace and `#` comments are ignored by the parser
    pub extended: bool,
}

impl Options {
    /// Options with every flag off
    pub fn new() -> Self {
        Options::default()
    }

    /// Parse Ruby flag letters, e.g. `"mix"`
    ///
    /// # Errors
    /// Returns [`OptionsError::UnknownFlag`] for any letter other than
    /// `i`, `m` and `x`.
    pub fn from_flags(flags: &str) -> Result<Self, OptionsError> {
        let mut options = Options::new();
        for c in flags.chars() {
            match c {
                'i' => options.ignore_case = true,
                'm' => options.multiline = true,
                'x' => options.extended = true,
                other => return Err(OptionsError::UnknownFlag(other)),
            }
        }
        Ok(options)
    }

    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.ignore_case = yes;
        self
    }

    pub fn multiline(mut self, yes: bool) -> Self {
        self.multiline = yes;
        self
    }

    pub fn extended(mut self, yes: bool) -> Self {
        self.extended = yes;
        self
    }
}

impl FromStr for Options {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Options::from_flags(s)
    }
}

/// Renders the Ruby flag letters, `mix` order as Ruby prints them
impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiline {
            f.write_str("m")?;
        }
        if self.ignore_case {
            f.write_str("i")?;
        }
        if self.extended {
            f.write_str("x")?;
        }
        Ok(())
    }
}
