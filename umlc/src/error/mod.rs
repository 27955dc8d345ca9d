//! Compile-time diagnostics.
//!
//! Every failure the core can raise is compile-time and fatal (spec.md §7):
//! there is no recovery path inside a compilation unit. `Diagnostic` is the
//! single error type threaded through lowering, static allocation, register
//! allocation and codegen.

mod location;

pub use location::Location;

use thiserror::Error;

/// A compile-time failure, carrying source location where one is available.
#[derive(Error, Debug, Clone)]
pub enum Diagnostic {
    /// Unsupported construct, invalid assignment target, malformed arguments.
    #[error("{at}: {message}")]
    Syntax { message: String, at: Location },

    /// Mismatched assignment, non-uint condition, non-array subscript base,
    /// non-uint index, argument type mismatch, wrong return type.
    #[error("{at}: type error: {message}")]
    Type { message: String, at: Location },

    /// Undefined variable, unknown function, unknown builtin, redefinition.
    #[error("{at}: {message}")]
    Name { message: String, at: Location },

    /// Integer literal outside `[0, 2^32-1]`, non-ASCII string.
    #[error("{at}: {message}")]
    Range { message: String, at: Location },

    /// Register-allocator exhaustion: the four scratch registers are all
    /// occupied and a fifth is requested. Names every outstanding
    /// occupation's source location, per spec.md §4.4.
    #[error("register pool exhausted; {} register(s) still held: {}", sites.len(), render_sites(sites))]
    RegistersExhausted { sites: Vec<Location> },

    /// No `main` function at the end of compilation.
    #[error("no `main` function found")]
    NoMain,

    /// An invariant the compiler itself is responsible for maintaining was
    /// violated — e.g. an unresolved jump-target placeholder reached
    /// serialization. Not a user-facing mistake.
    #[error("internal compiler error: {0}")]
    InternalError(String),
}

fn render_sites(sites: &[Location]) -> String {
    sites
        .iter()
        .map(|loc| loc.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Diagnostic {
    pub fn syntax(message: impl Into<String>, at: Location) -> Self {
        Diagnostic::Syntax {
            message: message.into(),
            at,
        }
    }

    pub fn ty(message: impl Into<String>, at: Location) -> Self {
        Diagnostic::Type {
            message: message.into(),
            at,
        }
    }

    pub fn name(message: impl Into<String>, at: Location) -> Self {
        Diagnostic::Name {
            message: message.into(),
            at,
        }
    }

    pub fn range(message: impl Into<String>, at: Location) -> Self {
        Diagnostic::Range {
            message: message.into(),
            at,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Diagnostic::InternalError(message.into())
    }
}

pub type CompileResult<T> = Result<T, Diagnostic>;

#[cfg(test)]
mod tests;
