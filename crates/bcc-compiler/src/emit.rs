//! Instruction emission and label bookkeeping.
//!
//! Code always goes to the function selected by the session's `fidx`.
//! Jumps name labels, not offsets:
//!
//! - known labels are created at the current offset (loop heads, the `for`
//!   update clause and body) and jumped to backwards;
//! - exit labels are created pending, pushed on the exit stack and
//!   resolved by [`Parser::set_label`] when the guarded code ends.

use crate::bytecode::OpCode;
use crate::function::{FuncId, Function};
use crate::parser::Parser;
use crate::state::ExitLabel;

impl Parser<'_, '_> {
    /// The function receiving code.
    pub(crate) fn func(&mut self) -> &mut Function {
        self.state.program.func_mut(self.state.fidx)
    }

    pub(crate) fn emit(&mut self, op: OpCode) {
        let line = self.line();
        self.func().code.write_op(op, line);
    }

    /// Emit an opcode with one index operand.
    pub(crate) fn emit_index(&mut self, op: OpCode, index: usize) {
        let line = self.line();
        let code = &mut self.func().code;
        code.write_op(op, line);
        code.write_index(index, line);
    }

    pub(crate) fn emit_call(&mut self, nargs: usize, func: FuncId) {
        let line = self.line();
        let code = &mut self.func().code;
        code.write_op(OpCode::Call, line);
        code.write_index(nargs, line);
        code.write_index(func, line);
    }

    /// Emit `JUMP` or `JUMP_ZERO` to a label.
    #[inline]
    pub(crate) fn emit_jump(&mut self, op: OpCode, label: usize) {
        debug_assert!(matches!(op, OpCode::Jump | OpCode::JumpZero));
        self.emit_index(op, label);
    }

    // =========================================================================
    // Labels
    // =========================================================================

    /// Index the next created label will get.
    pub(crate) fn next_label(&mut self) -> usize {
        self.func().labels.len()
    }

    /// Create a label at the current offset.
    pub(crate) fn create_label(&mut self) -> usize {
        let func = self.func();
        let offset = func.code.len();
        let label = func.labels.create_known(offset);
        log::trace!("label {label} at {offset}");
        label
    }

    /// Create a label at the current offset and make it the `continue`
    /// target.
    pub(crate) fn create_cond_label(&mut self) -> usize {
        let label = self.create_label();
        self.state.conds.push(label);
        label
    }

    /// Create a pending label and push it on the exit stack.
    pub(crate) fn create_exit_label(&mut self, is_loop: bool) -> usize {
        let label = self.func().labels.create_pending();
        self.state.exits.push(ExitLabel { label, is_loop });
        log::trace!("exit label {label} pending (loop: {is_loop})");
        label
    }

    /// Resolve the innermost exit label to the current offset.
    pub(crate) fn set_label(&mut self) {
        let Some(exit) = self.state.exits.pop() else {
            return;
        };
        let func = self.func();
        let offset = func.code.len();
        func.labels.resolve(exit.label, offset);
        log::trace!("exit label {} resolved to {offset}", exit.label);
    }
}
