//! umlc_parser
//!
//! A small, dependency-light recursive-descent parser for UML — the
//! statically typed scripting subset `umlc` compiles to UM bytecode.
//!
//! This crate plays the role spec.md §1 calls "the host syntax parser":
//! it is not part of the respecified core, but the core needs *some*
//! producer of the raw syntax tree shape described in spec.md §6, and
//! nothing else in this workspace supplies one.
//!
//! # Example
//!
//! ```
//! use umlc_parser::parse;
//!
//! let module = parse("def main() -> uint:\n    return 0\n").expect("parse failed");
//! assert_eq!(module.body.len(), 1);
//! ```

pub mod cst;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use cst::Module;
pub use error::{ParseError, ParseResult};
pub use parser::parse;
pub use span::{SourceMap, Span};
pub use token::Token;

/// Get the parser crate's version, embedded from `Cargo.toml`.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
