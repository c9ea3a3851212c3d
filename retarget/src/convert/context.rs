//! Per-run conversion state

use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::node::Node;
use crate::options::Options;
use crate::transpiler::Conversion;

/// State shared by every converter during one conversion run
///
/// A context is created for a single pattern and consumed by
/// [`Context::finish`]. It is never shared between runs, so converting many
/// patterns in parallel needs no locking.
#[derive(Debug, Default)]
pub struct Context {
    options: Options,
    /// Tokens emitted by the driver, in traversal order
    output: Vec<String>,
    diagnostics: Diagnostics,
    /// Capturing groups opened so far
    captures: u32,
    /// Whether `^` or `$` was emitted, which needs the JS `m` flag
    line_anchors: bool,
    /// Whether the pattern has named groups; Ruby then stops capturing
    /// plain `(...)` groups
    named_groups: bool,
}

impl Context {
    pub fn new(options: Options) -> Self {
        Context {
            options,
            ..Context::default()
        }
    }

    /// Mark whether the pattern being converted uses named groups
    pub fn with_named_groups(mut self, named_groups: bool) -> Self {
        self.named_groups = named_groups;
        self
    }

    pub fn has_named_groups(&self) -> bool {
        self.named_groups
    }

    /// Append a converted token to the output
    pub fn emit(&mut self, token: impl Into<String>) {
        self.output.push(token.into());
    }

    /// The output emitted so far
    pub fn output(&self) -> String {
        self.output.concat()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Record a diagnostic
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record the standard "not supported" diagnostic for `node`
    pub fn unsupported(&mut self, node: &Node) {
        self.diagnostics.unsupported(node);
    }

    /// Allocate the next capture number (1-based)
    pub fn open_capture(&mut self) -> u32 {
        self.captures += 1;
        self.captures
    }

    /// Number of capturing groups opened so far
    pub fn capture_count(&self) -> u32 {
        self.captures
    }

    pub fn mark_line_anchor(&mut self) {
        self.line_anchors = true;
    }

    /// JavaScript flags for the converted pattern, in `ims` order
    pub fn flags(&self) -> String {
        let mut flags = String::new();
        if self.options.ignore_case {
            flags.push('i');
        }
        if self.line_anchors {
            flags.push('m');
        }
        if self.options.multiline {
            flags.push('s');
        }
        flags
    }

    /// Consume the context into the result of the run
    pub fn finish(self) -> Conversion {
        Conversion {
            flags: self.flags(),
            source: self.output.concat(),
            diagnostics: self.diagnostics.into_vec(),
        }
    }
}
