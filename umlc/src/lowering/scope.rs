//! Name tables used by both lowering passes (spec.md §4.1's invariant:
//! "globals at module level, per-function locals+arguments flattened into a
//! single indexable slot list").

use std::cell::Cell;
use std::collections::HashMap;

use crate::error::{Diagnostic, Location};
use crate::ir::{FunctionDef, Global, Type, Var, VarKind};

/// Module-level names: every declared global and function signature.
///
/// Function entries are signature-only placeholders during lowering — each
/// carries an empty body until [`super::pass2_body`] finishes translating
/// it. That's sound because nothing downstream of lowering ever reads a
/// *callee's* body through a `Call` node; codegen only reads a callee's
/// name, argument count and return type (spec.md §4.5), all of which are
/// fixed by Pass 1 and never change.
pub(crate) struct GlobalScope {
    functions: HashMap<String, FunctionDef>,
    globals: HashMap<String, Global>,
    next_array_id: Cell<usize>,
}

impl GlobalScope {
    pub(crate) fn new() -> Self {
        Self {
            functions: HashMap::new(),
            globals: HashMap::new(),
            next_array_id: Cell::new(0),
        }
    }

    /// A fresh id for one `ArrayLiteral`, unique across the whole module
    /// (spec.md §4.3: "two `[1, 2]` literals at different source positions
    /// are different allocations").
    pub(crate) fn fresh_array_id(&self) -> usize {
        let id = self.next_array_id.get();
        self.next_array_id.set(id + 1);
        id
    }

    fn is_defined(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.globals.contains_key(name)
    }

    pub(crate) fn declare_global(&mut self, name: &str, ty: Type, initializer: crate::ir::Expr, at: Location) -> Result<Global, Diagnostic> {
        if self.is_defined(name) {
            return Err(Diagnostic::name(format!("'{name}' is already defined"), at));
        }
        let global = Global::new(name, ty, initializer);
        self.globals.insert(name.to_string(), global.clone());
        Ok(global)
    }

    pub(crate) fn declare_function(&mut self, name: &str, args: Vec<Var>, return_type: Type, at: Location) -> Result<FunctionDef, Diagnostic> {
        if self.is_defined(name) {
            return Err(Diagnostic::name(format!("'{name}' is already defined"), at));
        }
        let def = FunctionDef(std::rc::Rc::new(crate::ir::FunctionDefData {
            name: name.to_string(),
            args,
            locals: Vec::new(),
            body: Vec::new(),
            return_type,
        }));
        self.functions.insert(name.to_string(), def.clone());
        Ok(def)
    }

    pub(crate) fn lookup_function(&self, name: &str) -> Option<FunctionDef> {
        self.functions.get(name).cloned()
    }

    pub(crate) fn lookup_global(&self, name: &str) -> Option<Global> {
        self.globals.get(name).cloned()
    }
}

/// Per-function namespace: arguments seeded up front, locals added as Pass 2
/// walks the body. Arguments and locals share one flat slot space (args
/// first), so a local can never reuse an argument's name.
pub(crate) struct FunctionScope {
    vars: HashMap<String, Var>,
    arg_vars: Vec<Var>,
    local_vars: Vec<Var>,
    next_slot: usize,
}

impl FunctionScope {
    pub(crate) fn new(args: Vec<Var>) -> Self {
        let mut vars = HashMap::new();
        for var in &args {
            vars.insert(var.name().to_string(), var.clone());
        }
        let next_slot = args.len();
        Self {
            vars,
            arg_vars: args,
            local_vars: Vec::new(),
            next_slot,
        }
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<Var> {
        self.vars.get(name).cloned()
    }

    pub(crate) fn declare_local(&mut self, name: &str, ty: Type, at: Location) -> Result<Var, Diagnostic> {
        if self.vars.contains_key(name) {
            return Err(Diagnostic::name(format!("'{name}' is already defined"), at));
        }
        let var = Var::new(name, ty, VarKind::Local, self.next_slot);
        self.next_slot += 1;
        self.vars.insert(name.to_string(), var.clone());
        self.local_vars.push(var.clone());
        Ok(var)
    }

    pub(crate) fn args(&self) -> Vec<Var> {
        self.arg_vars.clone()
    }

    pub(crate) fn into_locals(self) -> Vec<Var> {
        self.local_vars
    }
}

#[cfg(test)]
mod tests;
