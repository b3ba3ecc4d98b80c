//! Token plumbing shared by the expression and statement compilers.
//!
//! A [`Parser`] is created for every chunk of source. It owns the chunk's
//! lexer and one token of lookahead, and borrows the session's
//! [`ParserState`] for everything that outlives the chunk.

use bcc_core::{ParseError, ParseErrorKind, PosixViolation, Span};
use bcc_lexer::{Lexer, Token, TokenKind};

use crate::bytecode::OpCode;
use crate::expr::{ExprFlags, NEXT_READ};
use crate::state::{ChunkStatus, ParserState};

pub(crate) type Result<T> = std::result::Result<T, ParseError>;

/// One chunk's view of the compiler.
pub(crate) struct Parser<'src, 'st> {
    lexer: Lexer<'src>,
    /// Current token.
    pub(crate) token: Token<'src>,
    /// Kind of the token before [`token`](Self::token).
    pub(crate) last: TokenKind,
    pub(crate) state: &'st mut ParserState,
    /// Set by `quit`; unwinds the statement loop.
    pub(crate) quit: bool,
}

impl<'src, 'st> Parser<'src, 'st> {
    /// Create a parser over `source`. No token is read yet.
    pub(crate) fn new(source: &'src str, state: &'st mut ParserState) -> Self {
        Self {
            lexer: Lexer::new(source, state.options.posix),
            token: Token::new(TokenKind::Newline, "", Span::default()),
            last: TokenKind::Newline,
            state,
            quit: false,
        }
    }

    /// Compile statements until the end of the chunk.
    pub(crate) fn run(&mut self) -> Result<ChunkStatus> {
        self.advance()?;
        while self.token.kind != TokenKind::Eof {
            self.parse()?;
            if self.quit {
                log::debug!("quit at line {}", self.line());
                return Ok(ChunkStatus::Quit);
            }
            self.state.commit();
        }
        Ok(self.state.status())
    }

    /// Compile a `read()` answer: one expression, then `RET`.
    pub(crate) fn run_read(&mut self) -> Result<()> {
        self.advance()?;
        self.expr(ExprFlags::NOREAD | ExprFlags::NEEDVAL, NEXT_READ)?;
        self.emit(OpCode::Ret);
        Ok(())
    }

    /// Close whatever end of input may close.
    pub(crate) fn run_finish(&mut self) -> Result<()> {
        self.advance()?;
        if !self.endif()? {
            return Err(ParseError::new(ParseErrorKind::BlockEnd, self.token.span));
        }
        Ok(())
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Move to the next token.
    ///
    /// Lexer warnings are moved into the session; a lexer error becomes the
    /// parse error.
    pub(crate) fn advance(&mut self) -> Result<()> {
        self.last = self.token.kind;
        self.token = self.lexer.next_token();

        for warning in self.lexer.take_warnings() {
            self.state.push_warning(warning.into());
        }

        if self.token.kind == TokenKind::Error {
            let error = self
                .lexer
                .take_errors()
                .into_iter()
                .next()
                .map(ParseError::from)
                .unwrap_or_else(|| ParseError::unexpected_token(self.token.span));
            return Err(error);
        }
        Ok(())
    }

    /// Consume a token of the given kind or fail.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.token.kind != kind {
            return Err(self.unexpected());
        }
        self.advance()
    }

    pub(crate) fn skip_newlines(&mut self) -> Result<()> {
        while self.token.kind == TokenKind::Newline {
            self.advance()?;
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    #[inline]
    pub(crate) fn line(&self) -> u32 {
        self.token.span.line
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// An "unexpected token" error at the current token.
    pub(crate) fn unexpected(&self) -> ParseError {
        if self.token.kind == TokenKind::Eof {
            return ParseError::new(ParseErrorKind::UnexpectedEof, self.token.span);
        }
        ParseError::with_name(
            ParseErrorKind::UnexpectedToken,
            self.token.span,
            self.token.kind.description(),
        )
    }

    /// An error of `kind` at the current token.
    pub(crate) fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.token.span)
    }

    /// Report a POSIX violation at `span`.
    pub(crate) fn posix(&mut self, violation: PosixViolation, span: Span) -> Result<()> {
        self.state.posix(violation, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_core::{CompilerOptions, PosixMode};

    #[test]
    fn advance_tracks_last_kind() {
        let mut state = ParserState::default();
        let mut parser = Parser::new("x;", &mut state);
        parser.advance().unwrap();
        assert!(parser.at(TokenKind::Name));
        assert_eq!(parser.last, TokenKind::Newline);
        parser.advance().unwrap();
        assert!(parser.at(TokenKind::Semicolon));
        assert_eq!(parser.last, TokenKind::Name);
    }

    #[test]
    fn lexer_errors_surface_on_advance() {
        let mut state = ParserState::default();
        let mut parser = Parser::new("\"open", &mut state);
        let err = parser.advance().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    }

    #[test]
    fn lexer_warnings_reach_the_session() {
        let mut state = ParserState::new(CompilerOptions::new().with_posix(PosixMode::Warn));
        {
            let mut parser = Parser::new("# note\nx", &mut state);
            parser.advance().unwrap();
        }
        let warnings = state.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].kind,
            ParseErrorKind::Posix(PosixViolation::HashComment)
        );
    }

    #[test]
    fn expect_reports_end_of_input() {
        let mut state = ParserState::default();
        let mut parser = Parser::new("", &mut state);
        parser.advance().unwrap();
        let err = parser.expect(TokenKind::LeftParen).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }
}
