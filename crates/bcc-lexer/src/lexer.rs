//! Main lexer implementation for bc.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s using
//! direct dispatch on the first character. Newlines are significant in bc
//! and come out as [`TokenKind::Newline`] tokens; a backslash immediately
//! before a newline joins the two lines.
//!
//! Constructs outside POSIX bc are reported according to the lexer's
//! [`PosixMode`]: ignored, recorded as warnings, or turned into error tokens.

use bcc_core::{LexError, PosixMode, PosixViolation, Span};

use crate::cursor::{Cursor, is_name_continue, is_name_start, is_number_digit};
use crate::token::{Token, TokenKind, lookup_keyword};

/// Lexer for bc source code.
pub struct Lexer<'src> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// How non-POSIX constructs are reported.
    posix: PosixMode,
    /// Accumulated errors.
    errors: Vec<LexError>,
    /// POSIX notices recorded in [`PosixMode::Warn`].
    warnings: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str, posix: PosixMode) -> Self {
        Self {
            cursor: Cursor::new(source),
            posix,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The full source text.
    pub fn source(&self) -> &'src str {
        self.cursor.source()
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take recorded POSIX warnings, leaving an empty vec.
    pub fn take_warnings(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.warnings)
    }

    /// Consume and return the next token.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();

        let start_line = self.cursor.line();
        let start_col = self.cursor.column();
        let start_offset = self.cursor.offset();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, "", Span::point(start_line, start_col));
        };

        match c {
            '\n' => {
                self.cursor.advance();
                self.make_token(TokenKind::Newline, start_line, start_col, start_offset)
            }

            '#' => self.scan_hash_comment(start_line, start_col, start_offset),

            '"' => self.scan_string(start_line, start_col, start_offset),

            c if is_number_digit(c) => self.scan_number(start_line, start_col, start_offset),

            '.' if self.cursor.peek_nth(1).is_some_and(is_number_digit) => {
                self.scan_number(start_line, start_col, start_offset)
            }

            '.' => {
                self.cursor.advance();
                let token = self.make_token(TokenKind::Last, start_line, start_col, start_offset);
                self.posix_check(token, PosixViolation::DotLast)
            }

            c if is_name_start(c) => self.scan_name(start_line, start_col, start_offset),

            _ => self.scan_operator(start_line, start_col, start_offset),
        }
    }

    // =========================================
    // Internal: helpers
    // =========================================

    /// Skip blanks and line continuations, but not newlines.
    fn skip_whitespace(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(' ' | '\t' | '\r' | '\x0b' | '\x0c') => {
                    self.cursor.advance();
                }
                Some('\\') => {
                    if !self.cursor.eat_continuation() {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Create a token from start position to current position.
    fn make_token(
        &self,
        kind: TokenKind,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'src> {
        let len = self.cursor.offset() - start_offset;
        let span = Span::new(start_line, start_col, len);
        Token::new(kind, self.cursor.slice_from(start_offset), span)
    }

    /// Create an error token and record the error.
    fn make_error(&mut self, error: LexError) -> Token<'src> {
        let span = error.span();
        self.errors.push(error);
        Token::new(TokenKind::Error, "", span)
    }

    /// Report a POSIX violation for `token` according to the current mode.
    fn posix_check(&mut self, token: Token<'src>, violation: PosixViolation) -> Token<'src> {
        if self.report_posix(violation, token.span, token.lexeme) {
            Token::new(TokenKind::Error, "", token.span)
        } else {
            token
        }
    }

    /// Record a POSIX violation. Returns `true` when strict mode rejects it.
    fn report_posix(&mut self, violation: PosixViolation, span: Span, lexeme: &str) -> bool {
        if !self.posix.is_checked() {
            return false;
        }

        let error = LexError::Posix {
            violation,
            span,
            lexeme: lexeme.to_string(),
        };

        if self.posix == PosixMode::Warn {
            log::debug!("{error}");
            self.warnings.push(error);
            false
        } else {
            self.errors.push(error);
            true
        }
    }

    // =========================================
    // Scanning: Comments
    // =========================================

    /// Scan a `#` comment up to, but not including, the newline.
    fn scan_hash_comment(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        let comment = self.cursor.eat_while(|c| c != '\n');
        let span = Span::new(start_line, start_col, self.cursor.offset() - start_offset);

        if self.report_posix(PosixViolation::HashComment, span, comment) {
            return Token::new(TokenKind::Error, "", span);
        }

        self.next_token()
    }

    /// Scan a block comment `/* ... */` after the opening `/*`.
    fn scan_block_comment(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        loop {
            match self.cursor.advance() {
                None => {
                    let len = self.cursor.offset() - start_offset;
                    let error = LexError::UnterminatedComment {
                        span: Span::new(start_line, start_col, len),
                    };
                    return self.make_error(error);
                }
                Some('*') if self.cursor.eat('/') => return self.next_token(),
                Some(_) => {}
            }
        }
    }

    // =========================================
    // Scanning: Literals
    // =========================================

    /// Scan a string literal. Strings have no escapes and may span lines.
    fn scan_string(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        self.cursor.advance();
        self.cursor.eat_while(|c| c != '"');

        if self.cursor.eat('"') {
            self.make_token(TokenKind::String, start_line, start_col, start_offset)
        } else {
            let len = self.cursor.offset() - start_offset;
            let error = LexError::UnterminatedString {
                span: Span::new(start_line, start_col, len),
            };
            self.make_error(error)
        }
    }

    /// Scan a number: digits `0-9A-Z` with at most one `.`.
    ///
    /// Line continuations inside the number stay in the lexeme; the
    /// compiler strips them before storing the constant.
    fn scan_number(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        self.consume_digits();
        if self.cursor.eat('.') {
            self.consume_digits();
        }
        self.make_token(TokenKind::Number, start_line, start_col, start_offset)
    }

    fn consume_digits(&mut self) {
        loop {
            if self.cursor.check(is_number_digit) {
                self.cursor.advance();
            } else if !self.continues_number() {
                break;
            }
        }
    }

    /// Eat a line continuation if more digits follow it.
    fn continues_number(&mut self) -> bool {
        let after = if self.cursor.check_str("\\\n") {
            self.cursor.peek_nth(2)
        } else if self.cursor.check_str("\\\r\n") {
            self.cursor.peek_nth(3)
        } else {
            return false;
        };

        if after.is_some_and(|c| is_number_digit(c) || c == '.') {
            self.cursor.eat_continuation()
        } else {
            false
        }
    }

    // =========================================
    // Scanning: Names and keywords
    // =========================================

    fn scan_name(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        let name = self.cursor.eat_while(is_name_continue);

        match lookup_keyword(name) {
            Some(kind) => {
                let token = self.make_token(kind, start_line, start_col, start_offset);
                if kind.is_posix_keyword() {
                    token
                } else {
                    self.posix_check(token, PosixViolation::Keyword)
                }
            }
            None => {
                let token = self.make_token(TokenKind::Name, start_line, start_col, start_offset);
                if name.len() > 1 {
                    self.posix_check(token, PosixViolation::NameLength)
                } else {
                    token
                }
            }
        }
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    /// Scan an operator or punctuation token.
    ///
    /// Uses tuple matching on (first_char, peek) to minimize repeated peek() calls.
    fn scan_operator(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        let Some(c) = self.cursor.advance() else {
            return Token::new(TokenKind::Eof, "", Span::point(start_line, start_col));
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            ('[', _) => TokenKind::LeftBracket,
            (']', _) => TokenKind::RightBracket,
            ('{', _) => TokenKind::LeftBrace,
            ('}', _) => TokenKind::RightBrace,
            (';', _) => TokenKind::Semicolon,
            (',', _) => TokenKind::Comma,

            ('+', Some('+')) => { self.cursor.advance(); TokenKind::PlusPlus }
            ('+', Some('=')) => { self.cursor.advance(); TokenKind::PlusEqual }
            ('+', _) => TokenKind::Plus,

            ('-', Some('-')) => { self.cursor.advance(); TokenKind::MinusMinus }
            ('-', Some('=')) => { self.cursor.advance(); TokenKind::MinusEqual }
            ('-', _) => TokenKind::Minus,

            ('*', Some('=')) => { self.cursor.advance(); TokenKind::StarEqual }
            ('*', _) => TokenKind::Star,

            ('/', Some('*')) => {
                self.cursor.advance();
                return self.scan_block_comment(start_line, start_col, start_offset);
            }
            ('/', Some('=')) => { self.cursor.advance(); TokenKind::SlashEqual }
            ('/', _) => TokenKind::Slash,

            ('%', Some('=')) => { self.cursor.advance(); TokenKind::PercentEqual }
            ('%', _) => TokenKind::Percent,

            ('^', Some('=')) => { self.cursor.advance(); TokenKind::CaretEqual }
            ('^', _) => TokenKind::Caret,

            ('=', Some('=')) => { self.cursor.advance(); TokenKind::EqualEqual }
            ('=', _) => TokenKind::Equal,

            ('!', Some('=')) => { self.cursor.advance(); TokenKind::BangEqual }
            ('!', _) => TokenKind::Bang,

            ('<', Some('=')) => { self.cursor.advance(); TokenKind::LessEqual }
            ('<', Some('<')) => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    TokenKind::LessLessEqual
                } else {
                    TokenKind::LessLess
                }
            }
            ('<', _) => TokenKind::Less,

            ('>', Some('=')) => { self.cursor.advance(); TokenKind::GreaterEqual }
            ('>', Some('>')) => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    TokenKind::GreaterGreaterEqual
                } else {
                    TokenKind::GreaterGreater
                }
            }
            ('>', _) => TokenKind::Greater,

            ('&', Some('&')) => { self.cursor.advance(); TokenKind::AmpAmp }
            ('|', Some('|')) => { self.cursor.advance(); TokenKind::PipePipe }

            ('@', Some('=')) => { self.cursor.advance(); TokenKind::AtEqual }
            ('@', _) => TokenKind::At,

            ('$', _) => TokenKind::Dollar,

            _ => {
                let len = self.cursor.offset() - start_offset;
                let error = LexError::UnexpectedChar {
                    ch: c,
                    span: Span::new(start_line, start_col, len),
                };
                return self.make_error(error);
            }
        };

        let token = self.make_token(kind, start_line, start_col, start_offset);
        if is_extension_operator(kind) {
            self.posix_check(token, PosixViolation::Operator)
        } else {
            token
        }
    }
}

/// Operators this bc accepts beyond the POSIX set.
fn is_extension_operator(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Bang | AmpAmp
            | PipePipe
            | LessLess
            | GreaterGreater
            | LessLessEqual
            | GreaterGreaterEqual
            | At
            | AtEqual
            | Dollar
    )
}

/// Implement Iterator for convenient token streaming.
impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to collect all tokens from source.
    fn tokenize(source: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(source, PosixMode::Off)
            .map(|t| (t.kind, t.lexeme.to_string()))
            .collect()
    }

    /// Helper to get token kinds only.
    fn token_kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source, PosixMode::Off).map(|t| t.kind).collect()
    }

    // =========================================
    // Basic tokens
    // =========================================

    #[test]
    fn empty_source() {
        let mut lexer = Lexer::new("", PosixMode::Off);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn newlines_are_tokens() {
        assert_eq!(
            token_kinds("x\n\ny"),
            vec![
                TokenKind::Name,
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Name
            ]
        );
    }

    #[test]
    fn line_continuation_is_whitespace() {
        assert_eq!(
            token_kinds("x +\\\n y"),
            vec![TokenKind::Name, TokenKind::Plus, TokenKind::Name]
        );
    }

    #[test]
    fn stray_backslash() {
        let mut lexer = Lexer::new("\\x", PosixMode::Off);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert!(matches!(
            lexer.take_errors()[0],
            LexError::UnexpectedChar { ch: '\\', .. }
        ));
    }

    // =========================================
    // Names and keywords
    // =========================================

    #[test]
    fn names() {
        assert_eq!(
            tokenize("a foo_bar x2"),
            vec![
                (TokenKind::Name, "a".to_string()),
                (TokenKind::Name, "foo_bar".to_string()),
                (TokenKind::Name, "x2".to_string()),
            ]
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(
            token_kinds("if else while for define auto return"),
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::For,
                TokenKind::Define,
                TokenKind::Auto,
                TokenKind::Return,
            ]
        );
    }

    #[test]
    fn uppercase_letters_are_digits() {
        assert_eq!(
            tokenize("FF a"),
            vec![
                (TokenKind::Number, "FF".to_string()),
                (TokenKind::Name, "a".to_string()),
            ]
        );
    }

    // =========================================
    // Numbers
    // =========================================

    #[test]
    fn numbers() {
        assert_eq!(
            tokenize("42 1.5 .25 7."),
            vec![
                (TokenKind::Number, "42".to_string()),
                (TokenKind::Number, "1.5".to_string()),
                (TokenKind::Number, ".25".to_string()),
                (TokenKind::Number, "7.".to_string()),
            ]
        );
    }

    #[test]
    fn number_with_continuation() {
        let tokens = tokenize("12\\\n34");
        assert_eq!(tokens, vec![(TokenKind::Number, "12\\\n34".to_string())]);
    }

    #[test]
    fn number_stops_before_continuation_to_operator() {
        assert_eq!(
            token_kinds("12\\\n+3"),
            vec![TokenKind::Number, TokenKind::Plus, TokenKind::Number]
        );
    }

    #[test]
    fn lone_dot_is_last() {
        assert_eq!(token_kinds(". + 1"), vec![TokenKind::Last, TokenKind::Plus, TokenKind::Number]);
    }

    // =========================================
    // Strings and comments
    // =========================================

    #[test]
    fn strings_span_lines() {
        let tokens = tokenize("\"a\nb\" x");
        assert_eq!(tokens[0], (TokenKind::String, "\"a\nb\"".to_string()));
        assert_eq!(tokens[1].0, TokenKind::Name);
    }

    #[test]
    fn string_span_and_next_line() {
        let mut lexer = Lexer::new("\"a\nb\" x", PosixMode::Off);
        let string = lexer.next_token();
        assert_eq!(string.span, Span::new(1, 1, 5));
        let name = lexer.next_token();
        assert_eq!((name.span.line, name.span.col), (2, 4));
    }

    #[test]
    fn unterminated_string() {
        let mut lexer = Lexer::new("\"abc", PosixMode::Off);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert!(matches!(
            lexer.take_errors()[0],
            LexError::UnterminatedString { .. }
        ));
    }

    #[test]
    fn comments() {
        assert_eq!(
            token_kinds("x /* one\ntwo */ y # rest\nz"),
            vec![
                TokenKind::Name,
                TokenKind::Name,
                TokenKind::Newline,
                TokenKind::Name
            ]
        );
    }

    #[test]
    fn unterminated_comment() {
        let mut lexer = Lexer::new("/* never", PosixMode::Off);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert!(lexer.has_errors());
    }

    // =========================================
    // Operators
    // =========================================

    #[test]
    fn arithmetic_operators() {
        assert_eq!(
            token_kinds("+ - * / % ^ @ $ ++ --"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Caret,
                TokenKind::At,
                TokenKind::Dollar,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
            ]
        );
    }

    #[test]
    fn relational_and_boolean_operators() {
        assert_eq!(
            token_kinds("== != <= >= < > && || ! << >>"),
            vec![
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::Bang,
                TokenKind::LessLess,
                TokenKind::GreaterGreater,
            ]
        );
    }

    #[test]
    fn assignment_operators() {
        assert_eq!(
            token_kinds("= += -= *= /= %= ^= @= <<= >>="),
            vec![
                TokenKind::Equal,
                TokenKind::PlusEqual,
                TokenKind::MinusEqual,
                TokenKind::StarEqual,
                TokenKind::SlashEqual,
                TokenKind::PercentEqual,
                TokenKind::CaretEqual,
                TokenKind::AtEqual,
                TokenKind::LessLessEqual,
                TokenKind::GreaterGreaterEqual,
            ]
        );
    }

    #[test]
    fn single_ampersand_is_an_error() {
        let mut lexer = Lexer::new("a & b", PosixMode::Off);
        let tokens: Vec<_> = lexer.by_ref().collect();
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[2].kind, TokenKind::Name);
        assert!(lexer.has_errors());
    }

    // =========================================
    // POSIX reporting
    // =========================================

    #[test]
    fn posix_off_is_silent() {
        let mut lexer = Lexer::new("else foo # c\n.", PosixMode::Off);
        let _: Vec<_> = lexer.by_ref().collect();
        assert!(lexer.take_warnings().is_empty());
        assert!(!lexer.has_errors());
    }

    #[test]
    fn posix_warn_records_and_keeps_tokens() {
        let mut lexer = Lexer::new("foo = . && x # c\n", PosixMode::Warn);
        let kinds: Vec<_> = lexer.by_ref().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Name,
                TokenKind::Equal,
                TokenKind::Last,
                TokenKind::AmpAmp,
                TokenKind::Name,
                TokenKind::Newline,
            ]
        );

        let violations: Vec<_> = lexer
            .take_warnings()
            .into_iter()
            .map(|w| match w {
                LexError::Posix { violation, .. } => violation,
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(
            violations,
            vec![
                PosixViolation::NameLength,
                PosixViolation::DotLast,
                PosixViolation::Operator,
                PosixViolation::HashComment,
            ]
        );
    }

    #[test]
    fn posix_error_produces_error_token() {
        let mut lexer = Lexer::new("print x", PosixMode::Error);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        match &lexer.take_errors()[0] {
            LexError::Posix {
                violation, lexeme, ..
            } => {
                assert_eq!(*violation, PosixViolation::Keyword);
                assert_eq!(lexeme, "print");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(lexer.next_token().kind, TokenKind::Name);
    }

    #[test]
    fn posix_keywords_pass_strict_mode() {
        let mut lexer = Lexer::new("define f(x) { auto y; return (x) }", PosixMode::Error);
        let _: Vec<_> = lexer.by_ref().collect();
        assert!(!lexer.has_errors());
    }

    // =========================================
    // Integration: real code
    // =========================================

    #[test]
    fn simple_function() {
        let source = "define f(a[], n) {\n  return (a[n] + 1)\n}\n";
        assert_eq!(
            token_kinds(source),
            vec![
                TokenKind::Define,
                TokenKind::Name,
                TokenKind::LeftParen,
                TokenKind::Name,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Name,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::Newline,
                TokenKind::Return,
                TokenKind::LeftParen,
                TokenKind::Name,
                TokenKind::LeftBracket,
                TokenKind::Name,
                TokenKind::RightBracket,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::RightParen,
                TokenKind::Newline,
                TokenKind::RightBrace,
                TokenKind::Newline,
            ]
        );
    }
}
