//! Operands introduced by a name or a literal.

use std::borrow::Cow;

use bcc_core::{ParseError, ParseErrorKind, Span};
use bcc_lexer::TokenKind;

use super::{ExprFlags, NEXT_ARG, NEXT_ELEM};
use crate::bytecode::OpCode;
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// A variable, array element, whole array or function call.
    ///
    /// Returns whether the operand can be assigned to.
    pub(super) fn name(&mut self, flags: ExprFlags) -> Result<bool> {
        let name = self.token.lexeme;
        let span = self.token.span;
        self.advance()?;

        match self.token.kind {
            TokenKind::LeftBracket => {
                self.advance()?;
                let index = self.state.program.array_index(name, span)?;

                if self.at(TokenKind::RightBracket) {
                    // `name[]` passes the whole array
                    if !flags.contains(ExprFlags::ARRAY) {
                        return Err(ParseError::with_name(ParseErrorKind::ArrayReference, span, name));
                    }
                    self.advance()?;
                    if !matches!(self.token.kind, TokenKind::Comma | TokenKind::RightParen) {
                        return Err(ParseError::with_name(ParseErrorKind::ArrayReference, span, name));
                    }
                    self.emit_index(OpCode::Array, index);
                    return Ok(false);
                }

                let inner = (flags & ExprFlags::NOREAD) | ExprFlags::NEEDVAL;
                self.expr(inner, NEXT_ELEM)?;
                self.expect(TokenKind::RightBracket)?;
                self.emit_index(OpCode::ArrayElem, index);
                Ok(true)
            }

            TokenKind::LeftParen => {
                if flags.contains(ExprFlags::NOCALL) {
                    return Err(self.unexpected());
                }
                self.call(name, span, flags)?;
                Ok(false)
            }

            _ => {
                let index = self.state.program.var_index(name, span)?;
                self.emit_index(OpCode::Var, index);
                Ok(true)
            }
        }
    }

    /// `name(args)`, starting at the `(`.
    ///
    /// Arguments are left on the stack in order; a call to a function that
    /// is not defined yet gets a placeholder id.
    fn call(&mut self, name: &str, span: Span, flags: ExprFlags) -> Result<()> {
        self.advance()?;

        let arg_flags = (flags & ExprFlags::NOREAD) | ExprFlags::NEEDVAL | ExprFlags::ARRAY;
        let mut nargs = 0;
        let mut comma = false;

        while !self.at(TokenKind::RightParen) {
            self.expr(arg_flags, NEXT_ARG)?;
            nargs += 1;

            comma = self.at(TokenKind::Comma);
            if comma {
                self.advance()?;
            } else if !self.at(TokenKind::RightParen) {
                return Err(self.unexpected());
            }
        }
        if comma {
            return Err(self.unexpected());
        }

        let func = self.state.program.function_id(name, span)?;
        self.emit_call(nargs, func);
        self.advance()
    }

    /// A numeric literal. `0` and `1` have their own opcodes.
    pub(super) fn number(&mut self) -> Result<()> {
        let lexeme = self.token.lexeme;
        let span = self.token.span;

        let text = if lexeme.contains('\\') {
            Cow::Owned(lexeme.replace("\\\r\n", "").replace("\\\n", ""))
        } else {
            Cow::Borrowed(lexeme)
        };

        match text.as_ref() {
            "0" => self.emit(OpCode::Zero),
            "1" => self.emit(OpCode::One),
            digits => {
                let index = self.state.program.add_number(digits, span)?;
                self.emit_index(OpCode::Num, index);
            }
        }
        self.advance()
    }

    /// Push a string literal.
    pub(crate) fn string(&mut self) -> Result<()> {
        let index = self
            .state
            .program
            .add_string(self.token.string_contents(), self.token.span)?;
        self.emit_index(OpCode::Str, index);
        self.advance()
    }
}
