//! Function definitions.
//!
//! `define name(params) {` selects the function as the target for code and
//! opens its body; the body's closing brace appends the implicit return
//! and switches back to main. Calls may precede the definition, and a
//! later `define` of the same name replaces the earlier body.

use bcc_core::{ParseError, ParseErrorKind, PosixViolation, Span};
use bcc_lexer::TokenKind;

use crate::flags::BlockFlags;
use crate::function::{Local, LocalKind};
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// Compile a `define` header.
    pub(crate) fn define(&mut self) -> Result<()> {
        self.advance()?;
        if !self.at(TokenKind::Name) {
            return Err(self.error(ParseErrorKind::InvalidFunction));
        }

        let mut name = self.token.lexeme;
        let mut span = self.token.span;
        self.advance()?;

        let mut is_void = false;
        if name == "void" && self.at(TokenKind::Name) {
            self.posix(PosixViolation::VoidFunction, span)?;
            is_void = true;
            name = self.token.lexeme;
            span = self.token.span;
            self.advance()?;
        }

        if !self.at(TokenKind::LeftParen) {
            return Err(ParseError::with_name(ParseErrorKind::InvalidFunction, span, name));
        }

        let fid = self.state.program.function_id(name, span)?;
        let func = self.state.program.func_mut(fid);
        func.reset();
        func.is_void = is_void;
        self.state.fidx = fid;
        log::debug!("defining {name} as function {fid} (void: {is_void})");

        self.advance()?;
        self.params()?;

        self.start_body(BlockFlags::FUNC | BlockFlags::FUNC_INNER);
        self.func().defined = true;
        self.advance()?;

        if !self.at(TokenKind::LeftBrace) {
            let span = self.token.span;
            self.posix(PosixViolation::BraceOnNewLine, span)?;
        }
        Ok(())
    }

    /// Parameters up to, not including, the `)`.
    fn params(&mut self) -> Result<()> {
        let mut comma = false;

        while !self.at(TokenKind::RightParen) {
            if self.func().nparams > 0 && !comma {
                return Err(self.error(ParseErrorKind::InvalidFunction));
            }

            let reference = self.at(TokenKind::Star);
            if reference {
                let span = self.token.span;
                self.posix(PosixViolation::ReferenceParameter, span)?;
                self.advance()?;
            }

            if !self.at(TokenKind::Name) {
                return Err(self.error(ParseErrorKind::InvalidFunction));
            }
            let name = self.token.lexeme;
            let span = self.token.span;
            self.advance()?;

            let kind = if self.at(TokenKind::LeftBracket) {
                self.advance()?;
                if !self.at(TokenKind::RightBracket) {
                    return Err(self.error(ParseErrorKind::InvalidFunction));
                }
                self.advance()?;
                if reference { LocalKind::Reference } else { LocalKind::Array }
            } else if reference {
                return Err(ParseError::with_name(ParseErrorKind::ReferenceNotArray, span, name));
            } else {
                LocalKind::Scalar
            };

            comma = self.at(TokenKind::Comma);
            if comma {
                self.advance()?;
            }

            self.declare_local(name, kind, span)?;
            self.func().nparams += 1;
        }

        if comma {
            return Err(self.error(ParseErrorKind::InvalidFunction));
        }
        Ok(())
    }

    /// Add a parameter or auto to the function being defined.
    pub(crate) fn declare_local(&mut self, name: &str, kind: LocalKind, span: Span) -> Result<()> {
        let index = if kind.is_array() {
            self.state.program.array_index(name, span)?
        } else {
            self.state.program.var_index(name, span)?
        };

        if !self.func().insert_local(Local { index, kind }) {
            return Err(ParseError::with_name(ParseErrorKind::DuplicateLocal, span, name));
        }
        Ok(())
    }
}
