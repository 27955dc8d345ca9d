//! Scoped ownership of the 4-register scratch pool (spec.md §4.4).
//!
//! `occupy()` hands out an opaque handle; dropping the handle — on any exit
//! path, including an early `?` — returns the register to the pool. There is
//! no spilling: if all four registers are held when a fifth is requested,
//! allocation fails with a diagnostic naming every outstanding occupation's
//! source location.

use std::cell::RefCell;
use std::rc::Rc;

use crate::compile::trace::{TraceCollector, TraceEvent};
use crate::error::{Diagnostic, Location};
use crate::runtime_constants::Register;

fn register_label(register: Register) -> &'static str {
    match register {
        Register::Ax => "ax",
        Register::Bx => "bx",
        Register::Cx => "cx",
        Register::Dx => "dx",
        Register::Locals => "locals",
        Register::PicTable => "pic_table",
        Register::Stack => "stack",
        Register::StackTop => "stack_top",
    }
}

struct Inner {
    free: Vec<Register>,
    outstanding: Vec<(Register, Location)>,
}

/// The shared scratch-register pool for one compilation's codegen pass.
#[derive(Clone)]
pub struct RegisterPool(Rc<RefCell<Inner>>);

impl RegisterPool {
    pub fn new() -> Self {
        RegisterPool(Rc::new(RefCell::new(Inner {
            free: vec![Register::Dx, Register::Cx, Register::Bx, Register::Ax],
            outstanding: Vec::new(),
        })))
    }

    /// Acquire a scratch register, recording `site` as the occupying call's
    /// source location for exhaustion diagnostics.
    pub fn occupy(&self, site: Location) -> Result<RegisterHandle, Diagnostic> {
        let mut inner = self.0.borrow_mut();
        match inner.free.pop() {
            Some(register) => {
                inner.outstanding.push((register, site));
                drop(inner);
                TraceCollector::emit(TraceEvent::RegisterOccupied {
                    register: register_label(register),
                });
                Ok(RegisterHandle {
                    pool: self.clone(),
                    register,
                })
            }
            None => Err(Diagnostic::RegistersExhausted {
                sites: inner.outstanding.iter().map(|(_, loc)| loc.clone()).collect(),
            }),
        }
    }

    /// Number of registers currently held. Used by tests asserting the
    /// register-allocator conservation invariant (spec.md §8: "at every
    /// statement boundary the occupied count is 0").
    pub fn occupied_count(&self) -> usize {
        self.0.borrow().outstanding.len()
    }

    fn release(&self, register: Register) {
        let mut inner = self.0.borrow_mut();
        inner.outstanding.retain(|(r, _)| *r != register);
        inner.free.push(register);
        TraceCollector::emit(TraceEvent::RegisterReleased {
            register: register_label(register),
        });
    }
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A scoped claim on one scratch register. Returns the register to its pool
/// when dropped.
pub struct RegisterHandle {
    pool: RegisterPool,
    register: Register,
}

impl RegisterHandle {
    pub fn register(&self) -> Register {
        self.register
    }
}

impl Drop for RegisterHandle {
    fn drop(&mut self) {
        self.pool.release(self.register);
    }
}

impl std::fmt::Debug for RegisterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RegisterHandle({:?})", self.register)
    }
}

#[cfg(test)]
mod tests;
