//! `auto` declarations.

use bcc_core::ParseErrorKind;
use bcc_lexer::TokenKind;

use crate::function::LocalKind;
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// `auto a, b[], c`: locals of the function being defined.
    ///
    /// Only allowed as the first statement of a function body, and only
    /// once.
    pub(crate) fn auto_stmt(&mut self) -> Result<()> {
        if !self.state.auto_part {
            return Err(self.error(ParseErrorKind::MisplacedAuto));
        }
        self.advance()?;
        self.state.auto_part = false;

        let mut comma = false;
        let mut nautos = 0;

        while self.at(TokenKind::Name) {
            if nautos > 0 && !comma {
                return Err(self.error(ParseErrorKind::InvalidFunction));
            }

            let name = self.token.lexeme;
            let span = self.token.span;
            self.advance()?;
            nautos += 1;

            let kind = if self.at(TokenKind::LeftBracket) {
                self.advance()?;
                if !self.at(TokenKind::RightBracket) {
                    return Err(self.error(ParseErrorKind::InvalidFunction));
                }
                self.advance()?;
                LocalKind::Array
            } else {
                LocalKind::Scalar
            };

            comma = self.at(TokenKind::Comma);
            if comma {
                self.advance()?;
            }

            self.declare_local(name, kind, span)?;
        }

        if comma {
            return Err(self.error(ParseErrorKind::InvalidFunction));
        }
        if nautos == 0 {
            return Err(self.error(ParseErrorKind::EmptyAuto));
        }
        if !self.is_delimiter() {
            return Err(self.unexpected());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::bytecode::OpCode::*;
    use crate::function::LocalKind;
    use crate::state::ParserState;
    use bcc_core::ParseErrorKind;

    fn error(source: &str) -> ParseErrorKind {
        ParserState::default().compile(source).unwrap_err().kind
    }

    #[test]
    fn autos_follow_params() {
        let mut state = ParserState::default();
        state
            .compile("define f(n) {\n auto i, t[]\n i = n\n return (i)\n}\n")
            .unwrap();
        let program = state.program();
        let func = program.function(program.lookup_function("f").unwrap()).unwrap();
        assert_eq!(func.nparams, 1);
        let kinds: Vec<_> = func.autos().iter().map(|local| local.kind).collect();
        assert_eq!(kinds, vec![LocalKind::Scalar, LocalKind::Array]);
        func.code
            .assert_opcodes(&[Var, Var, AssignNoVal, Var, Ret, Ret0]);
    }

    #[test]
    fn auto_on_the_brace_line() {
        let mut state = ParserState::default();
        state.compile("define f() { auto a; a = 1 }\n").unwrap();
        let program = state.program();
        let func = program.function(program.lookup_function("f").unwrap()).unwrap();
        assert_eq!(func.autos().len(), 1);
    }

    #[test]
    fn auto_must_come_first() {
        assert_eq!(error("auto a\n"), ParseErrorKind::MisplacedAuto);
        assert_eq!(
            error("define f() {\n x = 1\n auto a\n}\n"),
            ParseErrorKind::MisplacedAuto
        );
        assert_eq!(
            error("define f() {\n auto a\n auto b\n}\n"),
            ParseErrorKind::MisplacedAuto
        );
    }

    #[test]
    fn blank_lines_before_auto() {
        let mut state = ParserState::default();
        state.compile("define f() {\n\n\n auto a\n}\n").unwrap();
    }

    #[test]
    fn malformed_autos() {
        assert_eq!(error("define f() {\n auto\n}\n"), ParseErrorKind::EmptyAuto);
        assert_eq!(error("define f() {\n auto a,\n}\n"), ParseErrorKind::InvalidFunction);
        assert_eq!(error("define f() {\n auto a[1]\n}\n"), ParseErrorKind::InvalidFunction);
        assert_eq!(error("define f(a) {\n auto a\n}\n"), ParseErrorKind::DuplicateLocal);
    }

    #[test]
    fn autos_need_commas() {
        assert_eq!(error("define f() {\n auto a b\n}\n"), ParseErrorKind::InvalidFunction);
        assert_eq!(error("define f() {\n auto a, b c[]\n}\n"), ParseErrorKind::InvalidFunction);

        // a corrected definition replaces the failed one
        let mut state = ParserState::default();
        assert!(state.compile("define f() {\n auto a b\n}\n").is_err());
        state.compile("define f() {\n auto a, b\n}\n").unwrap();
        let program = state.program();
        let func = program.function(program.lookup_function("f").unwrap()).unwrap();
        assert_eq!(func.autos().len(), 2);
    }
}
