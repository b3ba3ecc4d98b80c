//! Error types for the bc compiler.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ParseError (kind + span + offending name)
//! ├── Lexical   - produced by the lexer (LexError converts into these)
//! ├── Syntax    - unexpected tokens, malformed expressions, unclosed blocks
//! ├── Semantic  - well-formed but meaningless constructs (assigning to a
//! │               non-lvalue, `break` outside a loop, misplaced `auto`)
//! ├── Posix     - constructs outside POSIX bc, fatal only in strict mode
//! └── Resource  - name/function/constant tables exceeding configured limits
//! ```
//!
//! Every error is fatal to the parse attempt that raised it. POSIX
//! violations are the only diagnostics that can be downgraded to warnings;
//! they reuse [`ParseError`] so callers print both the same way.

use std::fmt;

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string literal was not closed before the end of input.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A block comment was not closed before the end of input.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },

    /// A construct outside POSIX bc, found while scanning.
    #[error("{violation} at {span}: {lexeme}")]
    Posix {
        violation: PosixViolation,
        span: Span,
        lexeme: String,
    },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::UnterminatedComment { span } => *span,
            LexError::Posix { span, .. } => *span,
        }
    }
}

// ============================================================================
// POSIX violations
// ============================================================================

/// Constructs accepted by this bc but not by POSIX bc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosixViolation {
    /// Names longer than one character.
    NameLength,
    /// `#` line comments.
    HashComment,
    /// Keywords POSIX does not define (`else`, `print`, `halt`, ...).
    Keyword,
    /// `.` as shorthand for `last`.
    DotLast,
    /// `!`, `&&`, `||` and the extended math operators.
    Operator,
    /// String literal used as an expression operand.
    StringInExpression,
    /// Relational operator outside an `if`/`while`/`for` condition.
    RelationalPosition,
    /// More than one relational operator in a condition.
    MultipleRelational,
    /// An omitted `for` clause.
    EmptyForClause,
    /// `return` value without parentheses.
    ReturnParens,
    /// Function body brace not on the header line.
    BraceOnNewLine,
    /// `void` functions.
    VoidFunction,
    /// Reference (`*name[]`) parameters.
    ReferenceParameter,
    /// `define` following a `;` on the same line.
    DefineAfterSemicolon,
}

impl PosixViolation {
    /// Returns a human-readable description.
    pub fn as_str(&self) -> &'static str {
        match self {
            PosixViolation::NameLength => "POSIX only allows one-character names",
            PosixViolation::HashComment => "POSIX does not allow '#' comments",
            PosixViolation::Keyword => "POSIX does not define this keyword",
            PosixViolation::DotLast => "POSIX does not allow '.' as 'last'",
            PosixViolation::Operator => "POSIX does not define this operator",
            PosixViolation::StringInExpression => "POSIX does not allow strings in expressions",
            PosixViolation::RelationalPosition => {
                "POSIX only allows comparisons in if, while and for conditions"
            }
            PosixViolation::MultipleRelational => "POSIX only allows one comparison per condition",
            PosixViolation::EmptyForClause => "POSIX does not allow empty for clauses",
            PosixViolation::ReturnParens => "POSIX requires parentheses around return values",
            PosixViolation::BraceOnNewLine => {
                "POSIX requires the function body brace on the header line"
            }
            PosixViolation::VoidFunction => "POSIX does not allow void functions",
            PosixViolation::ReferenceParameter => "POSIX does not allow reference parameters",
            PosixViolation::DefineAfterSemicolon => {
                "POSIX does not allow a function definition after a semicolon"
            }
        }
    }
}

impl fmt::Display for PosixViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Broad classes of errors, for callers that only care about the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
    Semantic,
    Posix,
    Resource,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCategory::Lexical => "lexical error",
            ErrorCategory::Syntax => "syntax error",
            ErrorCategory::Semantic => "semantic error",
            ErrorCategory::Posix => "POSIX error",
            ErrorCategory::Resource => "resource error",
        })
    }
}

/// Every error the compiler can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    // Lexical
    /// A character that cannot start a token.
    UnexpectedChar,
    /// Unclosed string literal.
    UnterminatedString,
    /// Unclosed block comment.
    UnterminatedComment,

    // Syntax
    /// A token that is not valid here.
    UnexpectedToken,
    /// Input ended in the middle of a construct.
    UnexpectedEof,
    /// Operands and operators do not form one expression.
    InvalidExpression,
    /// `()` where a value is required.
    EmptyExpression,
    /// `print` without anything to print.
    InvalidPrint,
    /// Malformed function header or parameter list.
    InvalidFunction,
    /// End of input with a brace still open.
    BlockEnd,

    // Semantic
    /// Assignment or increment of something that is not a variable.
    InvalidAssignment,
    /// `break` outside a loop.
    BreakOutsideLoop,
    /// `continue` outside a loop.
    ContinueOutsideLoop,
    /// `return` outside a function body.
    ReturnOutsideFunction,
    /// `return` with a value inside a void function.
    ReturnValueInVoid,
    /// `else` without a just-closed `if`.
    ElseWithoutIf,
    /// `auto` after other statements of a function body.
    MisplacedAuto,
    /// `auto` with no names.
    EmptyAuto,
    /// Parameter or auto declared twice.
    DuplicateLocal,
    /// Reference parameter that is not an array.
    ReferenceNotArray,
    /// Builtin called with the wrong number of arguments.
    BuiltinArity,
    /// `name[]` where a bare array is not allowed, or missing where required.
    ArrayReference,
    /// `read()` while compiling a read expression.
    RecursiveRead,
    /// `define` inside an unfinished block.
    NestedFunction,

    // POSIX
    /// A construct outside POSIX bc under strict mode.
    Posix(PosixViolation),

    // Resource
    /// Too many distinct variable names.
    TooManyVariables,
    /// Too many distinct array names.
    TooManyArrays,
    /// Too many functions.
    TooManyFunctions,
    /// Too many distinct numbers and strings.
    TooManyConstants,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedChar => "unexpected character",
            ParseErrorKind::UnterminatedString => "unterminated string",
            ParseErrorKind::UnterminatedComment => "unterminated comment",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::InvalidExpression => "invalid expression",
            ParseErrorKind::EmptyExpression => "empty expression",
            ParseErrorKind::InvalidPrint => "invalid print statement",
            ParseErrorKind::InvalidFunction => "invalid function definition",
            ParseErrorKind::BlockEnd => "end of block not found",
            ParseErrorKind::InvalidAssignment => "invalid assignment",
            ParseErrorKind::BreakOutsideLoop => "break outside loop",
            ParseErrorKind::ContinueOutsideLoop => "continue outside loop",
            ParseErrorKind::ReturnOutsideFunction => "return outside function",
            ParseErrorKind::ReturnValueInVoid => "void function returns a value",
            ParseErrorKind::ElseWithoutIf => "else without if",
            ParseErrorKind::MisplacedAuto => "auto must start the function body",
            ParseErrorKind::EmptyAuto => "auto without names",
            ParseErrorKind::DuplicateLocal => "duplicate parameter or auto",
            ParseErrorKind::ReferenceNotArray => "reference parameter is not an array",
            ParseErrorKind::BuiltinArity => "wrong number of builtin arguments",
            ParseErrorKind::ArrayReference => "misplaced array reference",
            ParseErrorKind::RecursiveRead => "read() inside read()",
            ParseErrorKind::NestedFunction => "function definition inside a block",
            ParseErrorKind::Posix(violation) => violation.as_str(),
            ParseErrorKind::TooManyVariables => "too many variables",
            ParseErrorKind::TooManyArrays => "too many arrays",
            ParseErrorKind::TooManyFunctions => "too many functions",
            ParseErrorKind::TooManyConstants => "too many constants",
        }
    }

    /// The family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        use ParseErrorKind::*;
        match self {
            UnexpectedChar | UnterminatedString | UnterminatedComment => ErrorCategory::Lexical,
            UnexpectedToken | UnexpectedEof | InvalidExpression | EmptyExpression
            | InvalidPrint | InvalidFunction | BlockEnd => ErrorCategory::Syntax,
            InvalidAssignment | BreakOutsideLoop | ContinueOutsideLoop
            | ReturnOutsideFunction | ReturnValueInVoid | ElseWithoutIf | MisplacedAuto
            | EmptyAuto | DuplicateLocal | ReferenceNotArray | BuiltinArity
            | ArrayReference | RecursiveRead | NestedFunction => ErrorCategory::Semantic,
            Posix(_) => ErrorCategory::Posix,
            TooManyVariables | TooManyArrays | TooManyFunctions | TooManyConstants => {
                ErrorCategory::Resource
            }
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compile error with location and, for name errors, the offending name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}{}", name_suffix(.name))]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// The identifier involved, if any.
    pub name: Option<String>,
}

impl ParseError {
    /// Create a new error without a name.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            name: None,
        }
    }

    /// Create a new error naming the offending identifier.
    pub fn with_name(kind: ParseErrorKind, span: Span, name: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            name: Some(name.into()),
        }
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedToken, span)
    }

    /// Create an "invalid expression" error.
    pub fn invalid_expression(span: Span) -> Self {
        Self::new(ParseErrorKind::InvalidExpression, span)
    }

    /// Create a POSIX error.
    pub fn posix(violation: PosixViolation, span: Span) -> Self {
        Self::new(ParseErrorKind::Posix(violation), span)
    }

    /// The family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Format the error with the offending source line and a caret.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = format!("{}: {}", self.category(), self);

        let line_text = source
            .lines()
            .nth((self.span.line as usize).saturating_sub(1));
        if let Some(line_text) = line_text {
            let indent = " ".repeat((self.span.col as usize).saturating_sub(1));
            output.push_str(&format!("\n{:>4} | {}\n     | {}^", self.span.line, line_text, indent));
        }

        output
    }
}

fn name_suffix(name: &Option<String>) -> String {
    name.as_deref().map(|n| format!(": {n}")).unwrap_or_default()
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        match error {
            LexError::UnexpectedChar { ch, span } => {
                ParseError::with_name(ParseErrorKind::UnexpectedChar, span, ch.to_string())
            }
            LexError::UnterminatedString { span } => {
                ParseError::new(ParseErrorKind::UnterminatedString, span)
            }
            LexError::UnterminatedComment { span } => {
                ParseError::new(ParseErrorKind::UnterminatedComment, span)
            }
            LexError::Posix {
                violation,
                span,
                lexeme,
            } => ParseError::with_name(ParseErrorKind::Posix(violation), span, lexeme),
        }
    }
}
