//! Codegen pipeline stages (spec.md §4.3-§4.7): static allocation, register
//! allocation, pseudo-instruction expansion, the call/return convention, the
//! per-node codegen driver, and the bootstrap preamble.

pub mod bootstrap;
pub mod callconv;
pub mod codegen;
pub mod emitter;
pub mod placeholder;
pub mod pseudo;
pub mod register_allocator;
pub mod static_allocator;
pub mod trace;
