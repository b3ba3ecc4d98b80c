//! Return statements.

use bcc_core::{ParseError, ParseErrorKind, PosixViolation};
use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;
use crate::expr::{ExprFlags, ExprStatus, NEXT_EXPR};
use crate::flags::BlockFlags;
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// `return`, `return ()` or `return (expr)`.
    ///
    /// Without a value a function returns zero, a void function returns
    /// nothing. POSIX requires the value to be parenthesized.
    pub(crate) fn return_stmt(&mut self) -> Result<()> {
        if !self.state.flags.top_has(BlockFlags::FUNC) {
            return Err(self.error(ParseErrorKind::ReturnOutsideFunction));
        }

        let inst = if self.func().is_void {
            OpCode::RetVoid
        } else {
            OpCode::Ret0
        };

        let span = self.token.span;
        self.advance()?;
        let paren = self.at(TokenKind::LeftParen);

        if self.is_delimiter() {
            self.emit(inst);
            return Ok(());
        }

        if self.expr_err(ExprFlags::NEEDVAL, NEXT_EXPR)? == ExprStatus::Empty {
            self.emit(inst);
            return Ok(());
        }

        if self.func().is_void {
            let name = self.func().name.clone();
            return Err(ParseError::with_name(ParseErrorKind::ReturnValueInVoid, span, name));
        }
        if !paren || self.last != TokenKind::RightParen {
            self.posix(PosixViolation::ReturnParens, span)?;
        }
        self.emit(OpCode::Ret);
        Ok(())
    }
}
