//! `umlc` — compiler from UML, a small statically typed scripting subset, to
//! UM bytecode.
//!
//! The pipeline: [`umlc_parser::parse`] produces a raw syntax tree, which
//! [`lowering::lower_module`] turns into typed IR ([`ir`]); [`compile`]
//! assigns static addresses, allocates registers, and drives per-node
//! codegen into the [`isa`] instruction set; [`pipeline::compile`] wires all
//! of that into one source-to-bytecode call.

pub mod builtins;
pub mod compile;
pub mod error;
pub mod ir;
pub mod isa;
pub mod lowering;
pub mod pipeline;
pub mod runtime_constants;

pub use error::{CompileResult, Diagnostic};
pub use pipeline::compile;
