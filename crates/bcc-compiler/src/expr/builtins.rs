//! Builtin functions and the `scale` keyword.

use bcc_core::{ParseError, ParseErrorKind, Span};
use bcc_lexer::TokenKind;

use super::{ExprFlags, NEXT_ARG};
use crate::bytecode::OpCode;
use crate::parser::{Parser, Result};

fn builtin_op(kind: TokenKind) -> Option<OpCode> {
    use TokenKind as T;
    let op = match kind {
        T::Length => OpCode::Length,
        T::Sqrt => OpCode::Sqrt,
        T::Abs => OpCode::Abs,
        T::Irand => OpCode::Irand,
        T::Asciify => OpCode::Asciify,
        T::Read => OpCode::Read,
        T::Rand => OpCode::Rand,
        T::MaxIbase => OpCode::MaxIbase,
        T::MaxObase => OpCode::MaxObase,
        T::MaxScale => OpCode::MaxScale,
        T::MaxRand => OpCode::MaxRand,
        T::LineLength => OpCode::LineLength,
        T::GlobalStacks => OpCode::GlobalStacks,
        T::LeadingZero => OpCode::LeadingZero,
        T::Modexp => OpCode::Modexp,
        T::Divmod => OpCode::Divmod,
        _ => return None,
    };
    Some(op)
}

fn arity(span: Span, keyword: &str) -> ParseError {
    ParseError::with_name(ParseErrorKind::BuiltinArity, span, keyword)
}

impl Parser<'_, '_> {
    /// `length`, `sqrt`, `abs`, `irand` and `asciify`: one argument.
    ///
    /// `length` and `asciify` also accept a whole array.
    pub(super) fn builtin(&mut self, kind: TokenKind, flags: ExprFlags) -> Result<()> {
        let span = self.token.span;
        let keyword = self.token.lexeme;
        let Some(op) = builtin_op(kind) else {
            return Err(self.unexpected());
        };

        self.advance()?;
        self.expect(TokenKind::LeftParen)?;

        let mut arg_flags = (flags & ExprFlags::NOREAD) | ExprFlags::NEEDVAL;
        if matches!(kind, TokenKind::Length | TokenKind::Asciify) {
            arg_flags |= ExprFlags::ARRAY;
        }
        if self.builtin_args(arg_flags)? != 1 {
            return Err(arity(span, keyword));
        }

        self.emit(op);
        Ok(())
    }

    /// `read()`, `rand()` and the `max*`/settings queries: no arguments.
    pub(super) fn no_arg_builtin(&mut self, kind: TokenKind) -> Result<()> {
        let span = self.token.span;
        let keyword = self.token.lexeme;
        let Some(op) = builtin_op(kind) else {
            return Err(self.unexpected());
        };

        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        if !self.at(TokenKind::RightParen) {
            return Err(arity(span, keyword));
        }
        self.advance()?;

        self.emit(op);
        Ok(())
    }

    /// `scale` alone is the assignable setting; `scale(x)` is the builtin.
    ///
    /// Returns whether the operand can be assigned to.
    pub(super) fn scale(&mut self, flags: ExprFlags) -> Result<bool> {
        let span = self.token.span;
        self.advance()?;

        if !self.at(TokenKind::LeftParen) {
            self.emit(OpCode::Scale);
            return Ok(true);
        }

        self.advance()?;
        let arg_flags = (flags & ExprFlags::NOREAD) | ExprFlags::NEEDVAL;
        if self.builtin_args(arg_flags)? != 1 {
            return Err(arity(span, "scale"));
        }
        self.emit(OpCode::ScaleFunc);
        Ok(false)
    }

    /// `modexp(a, b, c)` and `divmod(a, b, r[])`.
    ///
    /// `divmod` leaves the quotient on the stack and stores the remainder
    /// in element 0 of the named array:
    ///
    /// ```text
    /// <a> <b> DIVMOD           ; quotient remainder
    /// ZERO ARRAY_ELEM r        ; quotient remainder r[0]
    /// SWAP ASSIGN_NO_VAL       ; remainder -> r[0], quotient stays
    /// ```
    pub(super) fn builtin3(&mut self, kind: TokenKind, flags: ExprFlags) -> Result<()> {
        let span = self.token.span;
        let keyword = self.token.lexeme;

        self.advance()?;
        self.expect(TokenKind::LeftParen)?;

        let arg_flags = (flags & ExprFlags::NOREAD) | ExprFlags::NEEDVAL;
        for _ in 0..2 {
            self.expr(arg_flags, NEXT_ARG)?;
            if !self.at(TokenKind::Comma) {
                return Err(arity(span, keyword));
            }
            self.advance()?;
        }

        if kind == TokenKind::Divmod {
            let array = self.divmod_array()?;
            if !self.at(TokenKind::RightParen) {
                return Err(arity(span, keyword));
            }
            self.emit(OpCode::Divmod);
            self.emit(OpCode::Zero);
            self.emit_index(OpCode::ArrayElem, array);
            self.emit(OpCode::Swap);
            self.emit(OpCode::AssignNoVal);
        } else {
            self.expr(arg_flags, NEXT_ARG)?;
            if !self.at(TokenKind::RightParen) {
                return Err(arity(span, keyword));
            }
            self.emit(OpCode::Modexp);
        }

        self.advance()
    }

    /// Arguments after the `(`, through the `)`. Returns how many there
    /// were.
    fn builtin_args(&mut self, flags: ExprFlags) -> Result<usize> {
        let mut nargs = 0;
        if !self.at(TokenKind::RightParen) {
            loop {
                self.expr(flags, NEXT_ARG)?;
                nargs += 1;
                if !self.at(TokenKind::Comma) {
                    break;
                }
                self.advance()?;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(nargs)
    }

    /// The `q[]` of `divmod`. Returns the array index.
    fn divmod_array(&mut self) -> Result<usize> {
        let name = self.token.lexeme;
        let span = self.token.span;
        if !self.at(TokenKind::Name) {
            return Err(ParseError::new(ParseErrorKind::ArrayReference, span));
        }
        self.advance()?;

        for bracket in [TokenKind::LeftBracket, TokenKind::RightBracket] {
            if !self.at(bracket) {
                return Err(ParseError::with_name(ParseErrorKind::ArrayReference, span, name));
            }
            self.advance()?;
        }

        self.state.program.array_index(name, span)
    }
}

#[cfg(test)]
mod tests {
    use crate::bytecode::OpCode::{self, *};
    use crate::state::ParserState;
    use bcc_core::ParseErrorKind;

    fn ops(source: &str) -> Vec<OpCode> {
        let mut state = ParserState::default();
        state.compile(source).unwrap();
        state.program().main().code.opcodes()
    }

    fn error(source: &str) -> ParseErrorKind {
        ParserState::default().compile(source).unwrap_err().kind
    }

    #[test]
    fn one_argument_builtins() {
        assert_eq!(ops("sqrt(x)\n"), vec![Var, Sqrt, Print]);
        assert_eq!(ops("abs(-1)\n"), vec![One, Neg, Abs, Print]);
        assert_eq!(ops("x = irand(10)\n"), vec![Var, Num, Irand, AssignNoVal]);
        assert_eq!(ops("length(a[])\n"), vec![Array, Length, Print]);
        assert_eq!(ops("asciify(a[])\n"), vec![Array, Asciify, Print]);
    }

    #[test]
    fn builtin_arity() {
        assert_eq!(error("sqrt()\n"), ParseErrorKind::BuiltinArity);
        assert_eq!(error("sqrt(1, 2)\n"), ParseErrorKind::BuiltinArity);
        assert_eq!(error("rand(1)\n"), ParseErrorKind::BuiltinArity);
        assert_eq!(error("scale()\n"), ParseErrorKind::BuiltinArity);
        assert_eq!(error("modexp(1, 2)\n"), ParseErrorKind::BuiltinArity);
        assert_eq!(error("modexp(1, 2, 3, 4)\n"), ParseErrorKind::BuiltinArity);
    }

    #[test]
    fn only_some_builtins_take_arrays() {
        assert_eq!(error("sqrt(a[])\n"), ParseErrorKind::ArrayReference);
        assert_eq!(error("abs(a[])\n"), ParseErrorKind::ArrayReference);
    }

    #[test]
    fn builtins_need_parens() {
        assert_eq!(error("sqrt 4\n"), ParseErrorKind::UnexpectedToken);
        assert_eq!(error("rand\n"), ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn no_argument_builtins() {
        assert_eq!(ops("rand()\n"), vec![Rand, Print]);
        assert_eq!(ops("maxscale()\n"), vec![MaxScale, Print]);
        assert_eq!(ops("x = read()\n"), vec![Var, Read, AssignNoVal]);
    }

    #[test]
    fn scale_setting_and_function() {
        assert_eq!(ops("scale = 20\n"), vec![Scale, Num, AssignNoVal]);
        assert_eq!(ops("scale\n"), vec![Scale, Print]);
        assert_eq!(ops("scale(x)\n"), vec![Var, ScaleFunc, Print]);
        assert_eq!(error("scale(x) = 1\n"), ParseErrorKind::InvalidAssignment);
    }

    #[test]
    fn modexp() {
        assert_eq!(ops("modexp(2, 3, 5)\n"), vec![Num, Num, Num, Modexp, Print]);
    }

    #[test]
    fn divmod_stores_remainder() {
        assert_eq!(
            ops("r = divmod(7, 2, q[])\n"),
            vec![Var, Num, Num, Divmod, Zero, ArrayElem, Swap, AssignNoVal, AssignNoVal]
        );
        assert_eq!(error("divmod(7, 2, 3)\n"), ParseErrorKind::ArrayReference);
        assert_eq!(error("divmod(7, 2, q)\n"), ParseErrorKind::ArrayReference);
        assert_eq!(error("divmod(7, 2, q[1])\n"), ParseErrorKind::ArrayReference);
    }
}
