use std::fs;
use std::io::{self, Read};
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use retarget::{
    Conversion, Options, RetargetError, parse, transpile, transpile_batch, transpile_debug,
};

#[derive(Parser)]
#[command(name = "retarget")]
#[command(about = "Retarget - convert Ruby regular expressions to JavaScript")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Ruby pattern to a JavaScript regex literal
    Convert {
        /// The Ruby pattern to convert
        pattern: String,
        /// Ruby flags (any of `imx`)
        #[arg(short, long, default_value = "")]
        flags: Options,
        /// Fail when anything could not be carried over
        #[arg(long)]
        strict: bool,
        /// Show the parsed tree and every warning
        #[arg(short, long)]
        debug: bool,
        /// Do not print warnings
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the parsed tree of a pattern
    Tree {
        /// The Ruby pattern
        pattern: String,
        /// Ruby flags (any of `imx`)
        #[arg(short, long, default_value = "")]
        flags: Options,
    },
    /// Convert one pattern per line from a file (`-` for stdin)
    Batch {
        /// Input file
        file: String,
        /// Ruby flags (any of `imx`)
        #[arg(short, long, default_value = "")]
        flags: Options,
    },
}

fn main() {
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Convert {
            pattern,
            flags,
            strict,
            debug,
            quiet,
        } => cmd_convert(&pattern, &flags, strict, debug, quiet),
        Commands::Tree { pattern, flags } => cmd_tree(&pattern, &flags),
        Commands::Batch { file, flags } => cmd_batch(&file, &flags),
    };
    if !ok {
        process::exit(1);
    }
}

fn cmd_convert(pattern: &str, options: &Options, strict: bool, debug: bool, quiet: bool) -> bool {
    if debug {
        return match transpile_debug(pattern, options) {
            Ok(report) => {
                print!("{}", report);
                !strict || report.conversion.is_lossless()
            }
            Err(e) => {
                print_error(pattern, &e);
                false
            }
        };
    }

    match transpile(pattern, options) {
        Ok(conversion) => {
            println!("{}", conversion.to_literal().green());
            if !quiet {
                print_warnings(&conversion);
            }
            if strict && !conversion.is_lossless() {
                eprintln!(
                    "{} {} construct(s) could not be converted",
                    "error:".red().bold(),
                    conversion.diagnostics.len()
                );
                return false;
            }
            true
        }
        Err(e) => {
            print_error(pattern, &e);
            false
        }
    }
}

fn cmd_tree(pattern: &str, options: &Options) -> bool {
    match parse(pattern, options) {
        Ok(tree) => {
            print!("{}", tree);
            true
        }
        Err(e) => {
            print_error(pattern, &e);
            false
        }
    }
}

fn cmd_batch(file: &str, options: &Options) -> bool {
    let input = match read_input(file) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{} cannot read {}: {}", "error:".red().bold(), file, e);
            return false;
        }
    };
    let patterns: Vec<&str> = input.lines().filter(|line| !line.trim().is_empty()).collect();

    let mut ok = true;
    for (pattern, result) in patterns.iter().zip(transpile_batch(&patterns, options)) {
        match result {
            Ok(conversion) => {
                let count = conversion.diagnostics.len();
                if count == 0 {
                    println!("{} => {}", pattern.cyan(), conversion.to_literal().green());
                } else {
                    println!(
                        "{} => {} {}",
                        pattern.cyan(),
                        conversion.to_literal().green(),
                        format!("({} warning(s))", count).yellow()
                    );
                }
            }
            Err(e) => {
                println!("{} => {} {}", pattern.cyan(), "error:".red().bold(), e);
                ok = false;
            }
        }
    }
    ok
}

fn read_input(file: &str) -> io::Result<String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        fs::read_to_string(file)
    }
}

fn print_warnings(conversion: &Conversion) {
    for diagnostic in &conversion.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }
}

fn print_error(pattern: &str, error: &RetargetError) {
    eprintln!("{} {}", "error:".red().bold(), error);
    if let Some(position) = error.position()
        && let Some(before) = pattern.get(..position)
    {
        eprintln!("  {}", pattern);
        eprintln!("  {}{}", " ".repeat(before.chars().count()), "^".red().bold());
    }
}
