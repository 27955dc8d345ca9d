//! Assigns PIC-table indices to functions, array globals, and array literals
//! (spec.md §4.3).

use crate::compile::trace::{TraceCollector, TraceEvent};
use crate::ir::{FunctionDef, Global};

/// One statically-allocated item: something materialized into a fresh UM
/// array at bootstrap and reachable afterward only through the PIC table.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocKey {
    Function(FunctionDef),
    /// An `array`-typed global; `uint` globals are never indexed (spec.md
    /// §4.3) — their initializer is inlined as an immediate at every use.
    Global(Global),
    /// An array literal, identified by the unique id assigned when its
    /// `Expr::ArrayLiteral` node was built. Two literals with identical
    /// contents at different source positions are different allocations.
    ArrayLiteral(usize),
}

/// Monotonically-growing table of static allocations. `static_address`
/// upserts: the same key always maps to the same index, and a new key is
/// appended at the next free index.
#[derive(Debug, Default)]
pub struct StaticAllocator {
    entries: Vec<AllocKey>,
}

impl StaticAllocator {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn static_address(&mut self, key: AllocKey) -> u32 {
        if let Some(pos) = self.entries.iter().position(|existing| *existing == key) {
            pos as u32
        } else {
            let index = self.entries.len() as u32;
            TraceCollector::emit(TraceEvent::StaticAllocation {
                description: describe(&key),
                index,
            });
            self.entries.push(key);
            index
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AllocKey] {
        &self.entries
    }
}

fn describe(key: &AllocKey) -> String {
    match key {
        AllocKey::Function(f) => format!("function '{}'", f.name()),
        AllocKey::Global(g) => format!("global '{}'", g.name()),
        AllocKey::ArrayLiteral(id) => format!("array literal #{id}"),
    }
}

#[cfg(test)]
mod tests;
