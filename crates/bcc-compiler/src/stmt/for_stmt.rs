//! For loop compilation.

use bcc_core::PosixViolation;
use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;
use crate::expr::{ExprFlags, ExprStatus, NEXT_FOR, NEXT_REL};
use crate::flags::BlockFlags;
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// Compile a `for` header and open its body.
    ///
    /// The code is emitted in source order, so the update clause sits
    /// between the condition and the body and is reached by jumps. Four
    /// labels are used, in this order: condition, update, body, exit.
    ///
    /// Bytecode layout:
    /// ```text
    /// [init]
    /// cond:
    /// [condition]          ; ONE when omitted
    /// JUMP_ZERO -> exit
    /// JUMP -> body
    /// update:              ; continue target
    /// [update]
    /// JUMP -> cond
    /// body:
    /// [body]
    /// JUMP -> update
    /// exit:
    /// ```
    ///
    /// Each clause may be omitted, which POSIX does not allow.
    pub(crate) fn for_stmt(&mut self) -> Result<()> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;

        let span = self.token.span;
        if self.at(TokenKind::Semicolon) {
            self.posix(PosixViolation::EmptyForClause, span)?;
        } else if self.expr_err(ExprFlags::empty(), NEXT_FOR)? == ExprStatus::Empty {
            self.posix(PosixViolation::EmptyForClause, span)?;
        }
        self.expect(TokenKind::Semicolon)?;

        let cond = self.next_label();
        let update = cond + 1;
        let body = cond + 2;
        let exit = cond + 3;

        let created = self.create_label();
        debug_assert_eq!(created, cond);

        let span = self.token.span;
        if self.at(TokenKind::Semicolon) {
            // an omitted condition is always true
            self.emit(OpCode::One);
            self.posix(PosixViolation::EmptyForClause, span)?;
        } else if self.expr_err(ExprFlags::REL | ExprFlags::NEEDVAL, NEXT_FOR)? == ExprStatus::Empty {
            self.emit(OpCode::One);
            self.posix(PosixViolation::EmptyForClause, span)?;
        }
        self.expect(TokenKind::Semicolon)?;

        self.emit_jump(OpCode::JumpZero, exit);
        self.emit_jump(OpCode::Jump, body);

        let created = self.create_cond_label();
        debug_assert_eq!(created, update);

        let span = self.token.span;
        if self.at(TokenKind::RightParen) {
            self.posix(PosixViolation::EmptyForClause, span)?;
        } else if self.expr_err(ExprFlags::empty(), NEXT_REL)? == ExprStatus::Empty {
            self.posix(PosixViolation::EmptyForClause, span)?;
        }
        if !self.at(TokenKind::RightParen) {
            return Err(self.unexpected());
        }

        self.emit_jump(OpCode::Jump, cond);

        let created = self.create_label();
        debug_assert_eq!(created, body);
        let created = self.create_exit_label(true);
        debug_assert_eq!(created, exit);

        self.advance()?;
        self.start_body(BlockFlags::LOOP | BlockFlags::LOOP_INNER);
        Ok(())
    }
}
