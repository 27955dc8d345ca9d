//! Two-pass frontend lowerer (spec.md §4.1): converts the parser's raw
//! syntax tree into the typed IR the rest of the compiler consumes.

mod pass1_globals;
mod pass2_body;
mod scope;

use std::collections::HashMap;

use umlc_parser::cst::Pos;

use crate::error::{Diagnostic, Location};
use crate::ir::{FunctionDef, Global};

/// One top-level declaration, in source order — the static allocator scans
/// this order when assigning PIC indices (spec.md §4.3).
#[derive(Debug, Clone)]
pub enum TopLevelItem {
    Global(Global),
    Function(FunctionDef),
}

/// The fully lowered module: every top-level item in source order, plus the
/// resolved entry point.
pub struct LoweredModule {
    pub items: Vec<TopLevelItem>,
    pub main: FunctionDef,
}

/// Carries the original source text so diagnostics can quote the offending
/// line (spec.md §4.1's failure model: "every rejection raises a diagnostic
/// carrying (filename, line, column, source line)").
pub(crate) struct SourceContext {
    filename: String,
    lines: Vec<String>,
}

impl SourceContext {
    fn new(filename: impl Into<String>, source: &str) -> Self {
        Self {
            filename: filename.into(),
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    pub(crate) fn location(&self, pos: Pos) -> Location {
        let source_line = self.lines.get(pos.lineno.saturating_sub(1)).cloned().unwrap_or_default();
        Location::new(self.filename.clone(), pos.lineno, pos.col_offset + 1, source_line)
    }
}

/// Lower a parsed module into typed IR.
pub fn lower_module(module: &umlc_parser::cst::Module, filename: &str, source: &str) -> Result<LoweredModule, Diagnostic> {
    let ctx = SourceContext::new(filename, source);
    let pass1 = pass1_globals::run(module, &ctx)?;
    let finalized = pass2_body::run(&pass1.scope, pass1.functions, &ctx)?;

    let by_name: HashMap<&str, FunctionDef> = finalized.iter().map(|f| (f.name(), f.clone())).collect();
    let items = pass1
        .items
        .into_iter()
        .map(|item| match item {
            TopLevelItem::Global(global) => TopLevelItem::Global(global),
            TopLevelItem::Function(placeholder) => {
                let resolved = by_name
                    .get(placeholder.name())
                    .cloned()
                    .expect("every Pass 1 function signature has a matching Pass 2 body");
                TopLevelItem::Function(resolved)
            }
        })
        .collect();

    let main = by_name.get("main").cloned().ok_or(Diagnostic::NoMain)?;

    Ok(LoweredModule { items, main })
}

#[cfg(test)]
mod tests;
