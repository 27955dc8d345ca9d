//! Per-node-kind codegen driver (spec.md §4.5): dispatches `compile_node`
//! (statement mode, no register result) and `compute_into_register`
//! (expression mode, result in a freshly occupied scratch register) for
//! every IR node kind, and drives one function body end to end.

use crate::builtins::Builtin;
use crate::compile::callconv::{
    begin_call, emit_epilogue, emit_prologue, finish_call, push_argument, read_return_value, write_return_value,
};
use crate::compile::emitter::Emitter;
use crate::compile::placeholder::{Label, PlaceholderInt};
use crate::compile::pseudo::{add_immediate, branch_unless, immediate, jump, read_symbol, sub_immediate};
use crate::compile::register_allocator::{RegisterHandle, RegisterPool};
use crate::compile::static_allocator::{AllocKey, StaticAllocator};
use crate::error::{Diagnostic, Location};
use crate::ir::{AssignTarget, BinOpKind, Expr, FunctionDef, Stmt, Type, UnOpKind, Var};
use crate::isa::Instruction;
use crate::runtime_constants::Register;

/// Compile one function's body (prologue, statements, implicit epilogue if
/// control can fall off the end) into native instructions.
pub fn compile_function(function: FunctionDef, allocator: &mut StaticAllocator) -> Result<Vec<Instruction>, Diagnostic> {
    FunctionCodegen::new(function, allocator).compile()
}

/// Count the compiler-synthesized LOCALS slots `compile_for` needs: three
/// per textual `for` loop (the iterator array, the remaining count, and the
/// index counter), including loops nested inside `if`/`for` bodies.
fn count_for_slots(stmts: &[Stmt]) -> usize {
    stmts
        .iter()
        .map(|stmt| match stmt {
            Stmt::For { body, .. } => 1 + count_for_slots(body),
            Stmt::If { then_body, else_body, .. } => count_for_slots(then_body) + count_for_slots(else_body),
            _ => 0,
        })
        .sum()
}

struct FunctionCodegen<'a> {
    emitter: Emitter,
    pool: RegisterPool,
    allocator: &'a mut StaticAllocator,
    function: FunctionDef,
    next_for_slot: usize,
}

impl<'a> FunctionCodegen<'a> {
    fn new(function: FunctionDef, allocator: &'a mut StaticAllocator) -> Self {
        Self {
            emitter: Emitter::new(),
            pool: RegisterPool::new(),
            allocator,
            function,
            next_for_slot: 0,
        }
    }

    /// Load LOCALS slot `slot` into a freshly occupied register.
    fn load_local(&mut self, slot: usize, site: Location) -> Result<RegisterHandle, Diagnostic> {
        let dest = self.pool.occupy(site.clone())?;
        let index = self.pool.occupy(site.clone())?;
        immediate(&mut self.emitter, &self.pool, index.register(), slot as u32, site)?;
        self.emitter.emit(Instruction::ArrayIndex {
            a: dest.register(),
            b: Register::Locals,
            c: index.register(),
        });
        Ok(dest)
    }

    /// Store `value` into LOCALS slot `slot`.
    fn store_local(&mut self, slot: usize, value: Register, site: Location) -> Result<(), Diagnostic> {
        let index = self.pool.occupy(site.clone())?;
        immediate(&mut self.emitter, &self.pool, index.register(), slot as u32, site)?;
        self.emitter.emit(Instruction::ArrayAmmendment {
            a: Register::Locals,
            b: index.register(),
            c: value,
        });
        Ok(())
    }

    /// Codegen has no source span to attach to internal register-allocator
    /// diagnostics — the typed IR is deliberately span-free (spec.md §3,
    /// compared structurally) — so exhaustion is reported against the
    /// enclosing function's name instead of a precise line/column.
    fn site(&self) -> Location {
        Location::unknown(self.function.name().to_string())
    }

    fn compile(mut self) -> Result<Vec<Instruction>, Diagnostic> {
        let arg_count = self.function.0.args.len();
        let local_count = self.function.0.locals.len();
        let for_slot_count = count_for_slots(&self.function.0.body) * 3;
        self.next_for_slot = arg_count + local_count;

        emit_prologue(
            &mut self.emitter,
            &self.pool,
            arg_count,
            local_count + for_slot_count,
            self.site(),
        )?;

        let body = self.function.0.body.clone();
        let terminated = self.compile_block(&body)?;

        if !terminated {
            let is_main = self.function.name() == "main";
            emit_epilogue(&mut self.emitter, &self.pool, is_main, self.site())?;
        }

        self.emitter.finish()
    }

    /// Compile a statement list, returning whether its last statement was a
    /// `Return` (and therefore already emitted the function's epilogue).
    fn compile_block(&mut self, stmts: &[Stmt]) -> Result<bool, Diagnostic> {
        let mut terminated = false;
        for stmt in stmts {
            terminated = self.compile_stmt(stmt)?;
        }
        Ok(terminated)
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<bool, Diagnostic> {
        match stmt {
            Stmt::Assignment { lhs, rhs } => {
                self.compile_assignment(lhs, rhs)?;
                Ok(false)
            }
            Stmt::If { test, then_body, else_body } => {
                self.compile_if(test, then_body, else_body)?;
                Ok(false)
            }
            Stmt::For { target, iterator, body } => {
                self.compile_for(target, iterator, body)?;
                Ok(false)
            }
            Stmt::Return(value) => {
                self.compile_return(value.as_ref())?;
                Ok(true)
            }
            Stmt::Expr(expr) => {
                self.compile_expr_statement(expr)?;
                Ok(false)
            }
        }
    }

    fn compile_assignment(&mut self, lhs: &AssignTarget, rhs: &Expr) -> Result<(), Diagnostic> {
        let site = self.site();
        match lhs {
            AssignTarget::Var(var) => {
                let value = self.compute_into_register(rhs)?;
                self.store_local(var.slot(), value.register(), site)
            }
            AssignTarget::Subscript { array, index } => {
                let value = self.compute_into_register(rhs)?;
                let arr = self.compute_into_register(array)?;
                let ix = self.compile_subscript_index(index)?;
                self.emitter.emit(Instruction::ArrayAmmendment {
                    a: arr.register(),
                    b: ix.register(),
                    c: value.register(),
                });
                Ok(())
            }
        }
    }

    fn compile_expr_statement(&mut self, expr: &Expr) -> Result<(), Diagnostic> {
        match expr {
            Expr::BuiltinCall { builtin, args } => {
                self.compile_builtin(*builtin, args)?;
                Ok(())
            }
            Expr::Call { function, args } => {
                self.compile_call(function, args)?;
                Ok(())
            }
            _ => {
                // Any other expression used as a statement is evaluated for
                // a value that is then discarded.
                self.compute_into_register(expr)?;
                Ok(())
            }
        }
    }

    fn compile_if(&mut self, test: &Expr, then_body: &[Stmt], else_body: &[Stmt]) -> Result<(), Diagnostic> {
        let site = self.site();
        let test_reg = self.compute_into_register(test)?;
        let else_label = Label::new();
        let then_label = Label::new();
        branch_unless(
            &mut self.emitter,
            &self.pool,
            test_reg.register(),
            PlaceholderInt::label(else_label.clone()),
            PlaceholderInt::label(then_label.clone()),
            site.clone(),
        )?;
        drop(test_reg);

        self.emitter.mark_label(&then_label);
        let then_terminated = self.compile_block(then_body)?;

        if else_body.is_empty() {
            self.emitter.mark_label(&else_label);
            return Ok(());
        }

        let end_label = Label::new();
        if !then_terminated {
            jump(&mut self.emitter, &self.pool, PlaceholderInt::label(end_label.clone()), site.clone())?;
        }
        self.emitter.mark_label(&else_label);
        self.compile_block(else_body)?;
        self.emitter.mark_label(&end_label);
        Ok(())
    }

    /// `for target in iterator: body` (spec.md §4.5). The iterator array
    /// handle, the remaining count, and the index counter live in three
    /// compiler-synthesized LOCALS slots (reserved by `count_for_slots` and
    /// `compile`'s prologue sizing) for the loop's whole duration, exactly as
    /// the original `compiler.py::visit_For`'s `loop_index_addr` and
    /// `loop_remaining_addr` are `_new_local`s rather than pinned registers.
    /// Every register this function occupies is reloaded from, or spilled
    /// back to, those slots before the next statement boundary, so the body
    /// runs with the full 4-register scratch pool free.
    fn compile_for(&mut self, target: &Var, iterator: &Expr, body: &[Stmt]) -> Result<(), Diagnostic> {
        let site = self.site();
        let array_slot = self.next_for_slot;
        let remaining_slot = self.next_for_slot + 1;
        let index_slot = self.next_for_slot + 2;
        self.next_for_slot += 3;

        {
            let array = self.compute_into_register(iterator)?;
            self.store_local(array_slot, array.register(), site.clone())?;
        }

        {
            let array = self.load_local(array_slot, site.clone())?;
            let zero = self.pool.occupy(site.clone())?;
            immediate(&mut self.emitter, &self.pool, zero.register(), 0, site.clone())?;
            let remaining = self.pool.occupy(site.clone())?;
            self.emitter.emit(Instruction::ArrayIndex {
                a: remaining.register(),
                b: array.register(),
                c: zero.register(),
            });
            drop(zero);
            drop(array);
            self.store_local(remaining_slot, remaining.register(), site.clone())?;
        }

        {
            let index = self.pool.occupy(site.clone())?;
            immediate(&mut self.emitter, &self.pool, index.register(), 1, site.clone())?;
            self.store_local(index_slot, index.register(), site.clone())?;
        }

        let entry = Label::new();
        let body_label = Label::new();
        let exit = Label::new();
        self.emitter.mark_label(&entry);
        {
            let remaining = self.load_local(remaining_slot, site.clone())?;
            branch_unless(
                &mut self.emitter,
                &self.pool,
                remaining.register(),
                PlaceholderInt::label(exit.clone()),
                PlaceholderInt::label(body_label.clone()),
                site.clone(),
            )?;
        }
        self.emitter.mark_label(&body_label);

        {
            let array = self.load_local(array_slot, site.clone())?;
            let index = self.load_local(index_slot, site.clone())?;
            let element = self.pool.occupy(site.clone())?;
            self.emitter.emit(Instruction::ArrayIndex {
                a: element.register(),
                b: array.register(),
                c: index.register(),
            });
            drop(array);
            drop(index);
            self.store_local(target.slot(), element.register(), site.clone())?;
        }

        self.compile_block(body)?;

        {
            let remaining = self.load_local(remaining_slot, site.clone())?;
            let acc = self.pool.occupy(site.clone())?;
            sub_immediate(&mut self.emitter, &self.pool, remaining.register(), 1, acc.register(), site.clone())?;
            self.store_local(remaining_slot, remaining.register(), site.clone())?;
        }
        {
            let index = self.load_local(index_slot, site.clone())?;
            let acc = self.pool.occupy(site.clone())?;
            add_immediate(&mut self.emitter, &self.pool, index.register(), 1, acc.register(), site.clone())?;
            self.store_local(index_slot, index.register(), site.clone())?;
        }
        jump(&mut self.emitter, &self.pool, PlaceholderInt::label(entry), site)?;
        self.emitter.mark_label(&exit);
        Ok(())
    }

    fn compile_return(&mut self, value: Option<&Expr>) -> Result<(), Diagnostic> {
        let site = self.site();
        if let Some(expr) = value {
            let result = self.compute_into_register(expr)?;
            write_return_value(&mut self.emitter, &self.pool, result.register(), site.clone())?;
        }
        let is_main = self.function.name() == "main";
        emit_epilogue(&mut self.emitter, &self.pool, is_main, site)
    }

    fn compile_call(&mut self, function: &FunctionDef, args: &[Expr]) -> Result<Option<RegisterHandle>, Diagnostic> {
        let site = self.site();
        let caller_pic_index = self.allocator.static_address(AllocKey::Function(self.function.clone()));
        let callee_pic_index = self.allocator.static_address(AllocKey::Function(function.clone()));

        begin_call(&mut self.emitter, &self.pool, caller_pic_index, site.clone())?;
        for arg in args {
            let value = self.compute_into_register(arg)?;
            push_argument(&mut self.emitter, &self.pool, value.register(), site.clone())?;
        }
        finish_call(&mut self.emitter, &self.pool, callee_pic_index, site.clone())?;

        if function.return_type() == Type::Void {
            return Ok(None);
        }
        let dest = self.pool.occupy(site.clone())?;
        read_return_value(&mut self.emitter, &self.pool, dest.register(), site)?;
        Ok(Some(dest))
    }

    fn compile_builtin(&mut self, builtin: Builtin, args: &[Expr]) -> Result<Option<RegisterHandle>, Diagnostic> {
        let site = self.site();
        match builtin {
            Builtin::Putchar => {
                let v = self.compute_into_register(&args[0])?;
                self.emitter.emit(Instruction::Output { register: v.register() });
                Ok(None)
            }
            Builtin::Exit => {
                self.emitter.emit(Instruction::Halt);
                Ok(None)
            }
            Builtin::Alloc => {
                let size = self.compute_into_register(&args[0])?;
                let dest = self.pool.occupy(site)?;
                self.emitter.emit(Instruction::Allocation {
                    result: dest.register(),
                    size: size.register(),
                });
                Ok(Some(dest))
            }
            Builtin::Free => {
                let arr = self.compute_into_register(&args[0])?;
                self.emitter.emit(Instruction::Abandonment { register: arr.register() });
                Ok(None)
            }
            Builtin::Len => {
                let arr = self.compute_into_register(&args[0])?;
                let zero = self.pool.occupy(site)?;
                immediate(&mut self.emitter, &self.pool, zero.register(), 0, self.site())?;
                self.emitter.emit(Instruction::ArrayIndex {
                    a: arr.register(),
                    b: arr.register(),
                    c: zero.register(),
                });
                Ok(Some(arr))
            }
        }
    }

    /// Peaks at two registers (`ix` + `acc`) in the non-literal path, well
    /// under budget now that `for`-loop bookkeeping lives in LOCALS rather
    /// than pinning scratch registers around this call.
    fn compile_subscript_index(&mut self, index: &Expr) -> Result<RegisterHandle, Diagnostic> {
        let site = self.site();
        if let Expr::UIntLiteral(v) = index {
            let dest = self.pool.occupy(site.clone())?;
            immediate(&mut self.emitter, &self.pool, dest.register(), v.wrapping_add(1), site)?;
            return Ok(dest);
        }
        let ix = self.compute_into_register(index)?;
        let acc = self.pool.occupy(site.clone())?;
        add_immediate(&mut self.emitter, &self.pool, ix.register(), 1, acc.register(), site)?;
        Ok(ix)
    }

    fn compute_into_register(&mut self, expr: &Expr) -> Result<RegisterHandle, Diagnostic> {
        let site = self.site();
        match expr {
            Expr::UIntLiteral(v) => {
                let dest = self.pool.occupy(site.clone())?;
                immediate(&mut self.emitter, &self.pool, dest.register(), *v, site)?;
                Ok(dest)
            }

            Expr::ArrayLiteral { id, .. } => {
                let index = self.allocator.static_address(AllocKey::ArrayLiteral(*id));
                let dest = self.pool.occupy(site.clone())?;
                read_symbol(&mut self.emitter, &self.pool, dest.register(), index, site)?;
                Ok(dest)
            }

            Expr::Global(global) if global.ty() == Type::Array => {
                let index = self.allocator.static_address(AllocKey::Global(global.clone()));
                let dest = self.pool.occupy(site.clone())?;
                read_symbol(&mut self.emitter, &self.pool, dest.register(), index, site)?;
                Ok(dest)
            }
            Expr::Global(global) => {
                let value = match &global.0.initializer {
                    Expr::UIntLiteral(v) => *v,
                    _ => return Err(Diagnostic::internal("uint global initializer must be a literal")),
                };
                let dest = self.pool.occupy(site.clone())?;
                immediate(&mut self.emitter, &self.pool, dest.register(), value, site)?;
                Ok(dest)
            }

            Expr::Argument(var) | Expr::Local(var) => self.load_local(var.slot(), site),

            Expr::BinOp { op, lhs, rhs } => {
                let l = self.compute_into_register(lhs)?;
                match op {
                    BinOpKind::Add => {
                        let r = self.compute_into_register(rhs)?;
                        self.emitter.emit(Instruction::Addition { a: l.register(), b: l.register(), c: r.register() });
                        Ok(l)
                    }
                    // a - b ≡ a + (~b + 1) mod 2^32 (spec.md §4.5, §9).
                    BinOpKind::Sub => {
                        let r = self.compute_into_register(rhs)?;
                        self.emitter.emit(Instruction::NotAnd { a: r.register(), b: r.register(), c: r.register() });
                        let acc = self.pool.occupy(site.clone())?;
                        add_immediate(&mut self.emitter, &self.pool, r.register(), 1, acc.register(), site)?;
                        self.emitter.emit(Instruction::Addition { a: l.register(), b: l.register(), c: r.register() });
                        Ok(l)
                    }
                    BinOpKind::Mul => {
                        let r = self.compute_into_register(rhs)?;
                        self.emitter.emit(Instruction::Multiplication { a: l.register(), b: l.register(), c: r.register() });
                        Ok(l)
                    }
                    BinOpKind::Div => {
                        let r = self.compute_into_register(rhs)?;
                        self.emitter.emit(Instruction::Division { a: l.register(), b: l.register(), c: r.register() });
                        Ok(l)
                    }
                }
            }

            Expr::UnOp { op, operand } => {
                let v = self.compute_into_register(operand)?;
                match op {
                    UnOpKind::Plus => Ok(v),
                    UnOpKind::Neg => {
                        self.emitter.emit(Instruction::NotAnd { a: v.register(), b: v.register(), c: v.register() });
                        let acc = self.pool.occupy(site.clone())?;
                        add_immediate(&mut self.emitter, &self.pool, v.register(), 1, acc.register(), site)?;
                        Ok(v)
                    }
                    UnOpKind::BitNot => {
                        self.emitter.emit(Instruction::NotAnd { a: v.register(), b: v.register(), c: v.register() });
                        Ok(v)
                    }
                    // `not v` has no native opcode: default the result to 1
                    // (operand zero ⇒ logically true) and overwrite it with
                    // 0 whenever the operand is nonzero (spec.md §9).
                    UnOpKind::Not => {
                        let zero = self.pool.occupy(site.clone())?;
                        immediate(&mut self.emitter, &self.pool, zero.register(), 0, site.clone())?;
                        let one = self.pool.occupy(site)?;
                        immediate(&mut self.emitter, &self.pool, one.register(), 1, self.site())?;
                        self.emitter.emit(Instruction::ConditionalMove {
                            a: one.register(),
                            b: zero.register(),
                            c: v.register(),
                        });
                        Ok(one)
                    }
                }
            }

            Expr::Subscript { array, index } => {
                let arr = self.compute_into_register(array)?;
                let ix = self.compile_subscript_index(index)?;
                self.emitter.emit(Instruction::ArrayIndex { a: arr.register(), b: arr.register(), c: ix.register() });
                Ok(arr)
            }

            Expr::Call { function, args } => self
                .compile_call(function, args)?
                .ok_or_else(|| Diagnostic::internal("void call used in expression position")),

            Expr::BuiltinCall { builtin, args } => self
                .compile_builtin(*builtin, args)?
                .ok_or_else(|| Diagnostic::internal(format!("builtin {} has no value in expression position", builtin.name()))),
        }
    }
}

#[cfg(test)]
mod tests;
