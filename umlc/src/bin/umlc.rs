//! `umlc` command-line driver.
//!
//! Usage:
//!   umlc SOURCE [OUT]    # compile SOURCE, writing UM bytecode to OUT (default: a.um)

use std::fs;
use std::path::Path;
use std::process;

const DEFAULT_OUTPUT: &str = "a.um";

struct Args {
    source: String,
    output: String,
}

impl Args {
    fn parse() -> Option<Self> {
        let mut positional = std::env::args().skip(1);
        let source = positional.next()?;
        let output = positional.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
        Some(Self { source, output })
    }
}

fn main() {
    let Some(args) = Args::parse() else {
        eprintln!("usage: umlc SOURCE [OUT]");
        process::exit(2);
    };

    if !Path::new(&args.source).exists() {
        eprintln!("error: file '{}' not found", args.source);
        process::exit(1);
    }

    let source = fs::read_to_string(&args.source).unwrap_or_else(|e| {
        eprintln!("error: reading '{}': {}", args.source, e);
        process::exit(1);
    });

    let bytes = umlc::compile(&source, &args.source).unwrap_or_else(|diagnostic| {
        eprintln!("{diagnostic}");
        process::exit(1);
    });

    if let Err(e) = fs::write(&args.output, &bytes) {
        eprintln!("error: writing '{}': {}", args.output, e);
        process::exit(1);
    }
}
