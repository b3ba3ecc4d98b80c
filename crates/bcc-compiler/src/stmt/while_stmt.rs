//! While loop compilation.

use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;
use crate::expr::{ExprFlags, NEXT_REL};
use crate::flags::BlockFlags;
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// Compile a `while` header and open its body.
    ///
    /// The condition label is the `continue` target; the exit label is the
    /// `break` target.
    ///
    /// Bytecode layout:
    /// ```text
    /// cond:
    /// [condition]
    /// JUMP_ZERO -> exit
    /// [body]
    /// JUMP -> cond
    /// exit:
    /// ```
    pub(crate) fn while_stmt(&mut self) -> Result<()> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;

        self.create_cond_label();
        let exit = self.create_exit_label(true);

        self.expr(ExprFlags::REL | ExprFlags::NEEDVAL, NEXT_REL)?;
        self.expect(TokenKind::RightParen)?;

        self.emit_jump(OpCode::JumpZero, exit);
        self.start_body(BlockFlags::LOOP | BlockFlags::LOOP_INNER);
        Ok(())
    }
}
