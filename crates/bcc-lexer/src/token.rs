//! Token types for the bc lexer.

use bcc_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The lexeme borrows from the source text. For strings it includes the
/// surrounding quotes; use [`Token::string_contents`] to strip them.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'src> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token.
    pub lexeme: &'src str,
    /// Location in source.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// The text between the quotes of a string token.
    pub fn string_contents(&self) -> &'src str {
        self.lexeme
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(self.lexeme)
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token types in bc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Special
    // =========================================
    /// End of input.
    Eof,
    /// Lexical error; the lexer recorded the details.
    Error,
    /// Newlines terminate statements in bc.
    Newline,

    // =========================================
    // Literals and names
    // =========================================
    /// Number: `42`, `1.5`, `.5`, `FF`
    Number,
    /// String: `"hello"`
    String,
    /// Lowercase name: `x`, `my_var2`
    Name,

    // =========================================
    // Operators
    // =========================================
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `!`
    Bang,
    /// `$` (truncate)
    Dollar,
    /// `^`
    Caret,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `@` (places)
    At,
    /// `<<`
    LessLess,
    /// `>>`
    GreaterGreater,

    // Relational
    /// `==`
    EqualEqual,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `>`
    Greater,

    // Boolean
    /// `||`
    PipePipe,
    /// `&&`
    AmpAmp,

    // Assignment
    /// `^=`
    CaretEqual,
    /// `*=`
    StarEqual,
    /// `/=`
    SlashEqual,
    /// `%=`
    PercentEqual,
    /// `+=`
    PlusEqual,
    /// `-=`
    MinusEqual,
    /// `@=`
    AtEqual,
    /// `<<=`
    LessLessEqual,
    /// `>>=`
    GreaterGreaterEqual,
    /// `=`
    Equal,

    // =========================================
    // Delimiters
    // =========================================
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,

    // =========================================
    // Keywords
    // =========================================
    Auto,
    Break,
    Continue,
    Define,
    Else,
    For,
    Halt,
    If,
    /// `last`, or a lone `.`
    Last,
    Ibase,
    Obase,
    Scale,
    Seed,
    Length,
    Print,
    Sqrt,
    Abs,
    Irand,
    Asciify,
    Modexp,
    Divmod,
    Quit,
    Read,
    Rand,
    MaxIbase,
    MaxObase,
    MaxScale,
    MaxRand,
    LineLength,
    GlobalStacks,
    LeadingZero,
    Return,
    Stream,
    While,
}

impl TokenKind {
    /// Check if this token kind is a keyword.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Auto | Break
                | Continue
                | Define
                | Else
                | For
                | Halt
                | If
                | Last
                | Ibase
                | Obase
                | Scale
                | Seed
                | Length
                | Print
                | Sqrt
                | Abs
                | Irand
                | Asciify
                | Modexp
                | Divmod
                | Quit
                | Read
                | Rand
                | MaxIbase
                | MaxObase
                | MaxScale
                | MaxRand
                | LineLength
                | GlobalStacks
                | LeadingZero
                | Return
                | Stream
                | While
        )
    }

    /// Keywords defined by POSIX bc.
    pub fn is_posix_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Auto | Break
                | Define
                | For
                | If
                | Ibase
                | Obase
                | Scale
                | Length
                | Sqrt
                | Quit
                | Return
                | While
        )
    }

    /// Check if this token kind is an operator.
    pub fn is_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            PlusPlus
                | MinusMinus
                | Bang
                | Dollar
                | Caret
                | Star
                | Slash
                | Percent
                | Plus
                | Minus
                | At
                | LessLess
                | GreaterGreater
                | EqualEqual
                | LessEqual
                | GreaterEqual
                | BangEqual
                | Less
                | Greater
                | PipePipe
                | AmpAmp
        ) || self.is_assignment()
    }

    /// `=` and the compound assignments.
    pub fn is_assignment(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            CaretEqual
                | StarEqual
                | SlashEqual
                | PercentEqual
                | PlusEqual
                | MinusEqual
                | AtEqual
                | LessLessEqual
                | GreaterGreaterEqual
                | Equal
        )
    }

    /// Tokens that can appear inside an expression.
    ///
    /// The expression compiler stops at the first token outside this set.
    pub fn is_expression_token(self) -> bool {
        use TokenKind::*;
        self.is_operator()
            || matches!(
                self,
                LeftParen
                    | RightParen
                    | Number
                    | String
                    | Name
                    | Last
                    | Ibase
                    | Obase
                    | Scale
                    | Seed
                    | Length
                    | Sqrt
                    | Abs
                    | Irand
                    | Asciify
                    | Modexp
                    | Divmod
                    | Read
                    | Rand
                    | MaxIbase
                    | MaxObase
                    | MaxScale
                    | MaxRand
                    | LineLength
                    | GlobalStacks
                    | LeadingZero
            )
    }

    /// Get a human-readable description of this token kind.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            Eof => "end of file",
            Error => "error",
            Newline => "newline",
            Number => "number",
            String => "string",
            Name => "name",
            PlusPlus => "'++'",
            MinusMinus => "'--'",
            Bang => "'!'",
            Dollar => "'$'",
            Caret => "'^'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Plus => "'+'",
            Minus => "'-'",
            At => "'@'",
            LessLess => "'<<'",
            GreaterGreater => "'>>'",
            EqualEqual => "'=='",
            LessEqual => "'<='",
            GreaterEqual => "'>='",
            BangEqual => "'!='",
            Less => "'<'",
            Greater => "'>'",
            PipePipe => "'||'",
            AmpAmp => "'&&'",
            CaretEqual => "'^='",
            StarEqual => "'*='",
            SlashEqual => "'/='",
            PercentEqual => "'%='",
            PlusEqual => "'+='",
            MinusEqual => "'-='",
            AtEqual => "'@='",
            LessLessEqual => "'<<='",
            GreaterGreaterEqual => "'>>='",
            Equal => "'='",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Comma => "','",
            Semicolon => "';'",
            Auto => "'auto'",
            Break => "'break'",
            Continue => "'continue'",
            Define => "'define'",
            Else => "'else'",
            For => "'for'",
            Halt => "'halt'",
            If => "'if'",
            Last => "'last'",
            Ibase => "'ibase'",
            Obase => "'obase'",
            Scale => "'scale'",
            Seed => "'seed'",
            Length => "'length'",
            Print => "'print'",
            Sqrt => "'sqrt'",
            Abs => "'abs'",
            Irand => "'irand'",
            Asciify => "'asciify'",
            Modexp => "'modexp'",
            Divmod => "'divmod'",
            Quit => "'quit'",
            Read => "'read'",
            Rand => "'rand'",
            MaxIbase => "'maxibase'",
            MaxObase => "'maxobase'",
            MaxScale => "'maxscale'",
            MaxRand => "'maxrand'",
            LineLength => "'line_length'",
            GlobalStacks => "'global_stacks'",
            LeadingZero => "'leading_zero'",
            Return => "'return'",
            Stream => "'stream'",
            While => "'while'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Map a name to its keyword [`TokenKind`], or `None` if not a keyword.
pub fn lookup_keyword(name: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match name {
        "auto" => Auto,
        "break" => Break,
        "continue" => Continue,
        "define" => Define,
        "else" => Else,
        "for" => For,
        "halt" => Halt,
        "if" => If,
        "last" => Last,
        "ibase" => Ibase,
        "obase" => Obase,
        "scale" => Scale,
        "seed" => Seed,
        "length" => Length,
        "print" => Print,
        "sqrt" => Sqrt,
        "abs" => Abs,
        "irand" => Irand,
        "asciify" => Asciify,
        "modexp" => Modexp,
        "divmod" => Divmod,
        "quit" => Quit,
        "read" => Read,
        "rand" => Rand,
        "maxibase" => MaxIbase,
        "maxobase" => MaxObase,
        "maxscale" => MaxScale,
        "maxrand" => MaxRand,
        "line_length" => LineLength,
        "global_stacks" => GlobalStacks,
        "leading_zero" => LeadingZero,
        "return" => Return,
        "stream" => Stream,
        "while" => While,
        _ => return None,
    })
}
