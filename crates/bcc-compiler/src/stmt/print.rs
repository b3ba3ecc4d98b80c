//! `print` and `stream`.

use bcc_core::ParseErrorKind;
use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;
use crate::expr::{ExprFlags, NEXT_PRINT};
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// Compile a comma separated list of strings and expressions.
    ///
    /// Every item is printed as soon as it is evaluated, without a newline.
    /// `stream` prints numbers as raw bytes instead.
    pub(crate) fn print_stmt(&mut self, kind: TokenKind) -> Result<()> {
        let inst = if kind == TokenKind::Stream {
            OpCode::PrintStream
        } else {
            OpCode::PrintPop
        };

        self.advance()?;
        if self.is_delimiter() {
            return Err(self.error(ParseErrorKind::InvalidPrint));
        }

        loop {
            if self.at(TokenKind::String) {
                self.string()?;
            } else {
                self.expr(ExprFlags::NEEDVAL, NEXT_PRINT)?;
            }
            self.emit(inst);

            if self.at(TokenKind::Comma) {
                self.advance()?;
                if self.is_delimiter() {
                    return Err(self.error(ParseErrorKind::InvalidPrint));
                }
            } else if self.is_delimiter() {
                break;
            } else {
                return Err(self.unexpected());
            }
        }
        Ok(())
    }
}
