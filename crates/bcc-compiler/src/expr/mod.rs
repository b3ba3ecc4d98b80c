//! Expression compiler.
//!
//! Expressions are compiled in one left-to-right pass with the
//! Shunting-Yard algorithm: operands are emitted as soon as they are read,
//! operators wait on the session's operator stack until an operator that
//! binds more loosely (or a closing parenthesis, or the end of the
//! expression) forces them out. The result is postfix code for the stack
//! machine.
//!
//! ```text
//! a = b + 2 * c      VAR a  VAR b  NUM 2  VAR c  MULTIPLY  PLUS  ASSIGN_NO_VAL
//! ```
//!
//! The caller passes [`ExprFlags`] describing the context and a set of
//! tokens allowed to end the expression. Whether the value is printed,
//! popped or left on the stack is decided from the flags once the whole
//! expression is known.

mod builtins;
mod names;
mod operators;

pub use operators::Operator;

use bcc_core::{ParseError, ParseErrorKind, PosixViolation};
use bcc_lexer::TokenKind;
use bitflags::bitflags;

use crate::bytecode::OpCode;
use crate::parser::{Parser, Result};

bitflags! {
    /// What the context of an expression allows and expects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExprFlags: u8 {
        /// A condition of `if`, `while` or `for`: POSIX allows one
        /// comparison here and nowhere else.
        const REL = 1 << 0;
        /// A statement: print the value unless it was an assignment.
        const PRINT = 1 << 1;
        /// Names may not be function calls (operand of prefix `++`/`--`).
        const NOCALL = 1 << 2;
        /// `read()` is not allowed, and leading newlines are significant.
        const NOREAD = 1 << 3;
        /// The expression may be a bare `name[]`.
        const ARRAY = 1 << 4;
        /// Leave the value on the stack.
        const NEEDVAL = 1 << 5;
    }
}

use TokenKind as T;

/// Expression statements.
pub(crate) const NEXT_EXPR: &[TokenKind] = &[T::Newline, T::Semicolon, T::RightBrace, T::Eof];
/// Function and builtin arguments.
pub(crate) const NEXT_ARG: &[TokenKind] = &[T::RightParen, T::Comma];
/// Items of `print` and `stream`.
pub(crate) const NEXT_PRINT: &[TokenKind] = &[T::Comma, T::Newline, T::Semicolon, T::Eof];
/// Parenthesized conditions and the `for` update clause.
pub(crate) const NEXT_REL: &[TokenKind] = &[T::RightParen];
/// Array subscripts.
pub(crate) const NEXT_ELEM: &[TokenKind] = &[T::RightBracket];
/// `for` init and condition clauses.
pub(crate) const NEXT_FOR: &[TokenKind] = &[T::Semicolon];
/// A line typed for `read()`.
pub(crate) const NEXT_READ: &[TokenKind] = &[T::Newline, T::Eof];

/// Outcome of a successful expression parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprStatus {
    Success,
    /// The expression was `()`. Some callers accept this.
    Empty,
}

/// What the last thing read was, for telling operands from operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Nothing,
    /// A complete operand: literal, name, call, builtin, postfix result.
    Leaf,
    Prefix,
    Binary,
}

/// Bookkeeping for one expression.
#[derive(Debug)]
struct ExprState {
    prev: Prev,
    /// Values produced and not yet consumed by an operator.
    nexprs: usize,
    nparens: usize,
    nrelops: usize,
    bin_last: bool,
    /// The last thing read was a closing parenthesis.
    rprn: bool,
    /// The operand just read can be assigned to.
    can_assign: bool,
    /// The last thing read was `++` or `--`.
    incdec: bool,
    /// The last operator drained at the end was an assignment.
    assign: bool,
}

impl ExprState {
    fn new() -> Self {
        Self {
            prev: Prev::Nothing,
            nexprs: 0,
            nparens: 0,
            nrelops: 0,
            bin_last: true,
            rprn: false,
            can_assign: false,
            incdec: false,
            assign: false,
        }
    }

    /// An operand is complete, so an operator must come next.
    fn is_leaf(&self) -> bool {
        !self.bin_last && (self.rprn || self.prev == Prev::Leaf)
    }

    fn leaf(&mut self, assignable: bool) {
        self.prev = Prev::Leaf;
        self.nexprs += 1;
        self.bin_last = false;
        self.rprn = false;
        self.incdec = false;
        self.can_assign = assignable;
    }

    fn operator(&mut self, prev: Prev) {
        self.prev = prev;
        self.bin_last = true;
        self.rprn = false;
        self.incdec = false;
        self.can_assign = false;
    }
}

/// Tokens that can begin an expression statement.
pub(crate) fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        T::PlusPlus
            | T::MinusMinus
            | T::Minus
            | T::Bang
            | T::LeftParen
            | T::Number
            | T::Name
            | T::Last
            | T::Ibase
            | T::Obase
            | T::Scale
            | T::Seed
            | T::Length
            | T::Sqrt
            | T::Abs
            | T::Irand
            | T::Asciify
            | T::Modexp
            | T::Divmod
            | T::Read
            | T::Rand
            | T::MaxIbase
            | T::MaxObase
            | T::MaxScale
            | T::MaxRand
            | T::LineLength
            | T::GlobalStacks
            | T::LeadingZero
    )
}

/// Assignable keyword operands.
fn keyword_leaf(kind: TokenKind) -> Option<OpCode> {
    match kind {
        T::Last => Some(OpCode::Last),
        T::Ibase => Some(OpCode::Ibase),
        T::Obase => Some(OpCode::Obase),
        T::Seed => Some(OpCode::Seed),
        _ => None,
    }
}

impl Parser<'_, '_> {
    /// Compile an expression that may not be `()`.
    pub(crate) fn expr(&mut self, flags: ExprFlags, next: &[TokenKind]) -> Result<()> {
        match self.expr_err(flags, next)? {
            ExprStatus::Success => Ok(()),
            ExprStatus::Empty => Err(ParseError::new(
                ParseErrorKind::EmptyExpression,
                self.token.span,
            )),
        }
    }

    /// Compile an expression, reporting `()` as [`ExprStatus::Empty`].
    ///
    /// For `()` the closing parenthesis is consumed and nothing is emitted.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn expr_err(&mut self, mut flags: ExprFlags, next: &[TokenKind]) -> Result<ExprStatus> {
        let base = self.state.ops.len();
        let mut s = ExprState::new();

        if !flags.contains(ExprFlags::NOREAD) {
            self.skip_newlines()?;
        }
        let pfirst = self.at(T::LeftParen);

        while self.token.kind.is_expression_token() {
            let kind = self.token.kind;
            let span = self.token.span;

            match kind {
                T::PlusPlus | T::MinusMinus => {
                    if s.incdec {
                        return Err(ParseError::new(ParseErrorKind::InvalidAssignment, span));
                    }
                    self.incdec(&mut s, flags)?;
                    s.bin_last = false;
                    s.rprn = false;
                    s.incdec = true;
                }

                T::Dollar => {
                    if !s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    self.emit(OpCode::Trunc);
                    s.prev = Prev::Leaf;
                    s.rprn = false;
                    s.can_assign = false;
                    s.incdec = false;
                    self.advance()?;
                }

                T::Minus => {
                    if s.is_leaf() {
                        self.push_operator(Operator::Minus, base, &mut s.nexprs);
                        s.operator(Prev::Binary);
                    } else {
                        // negation is never popped by what follows it
                        self.state.ops.push(Operator::Neg);
                        s.operator(Prev::Prefix);
                    }
                    self.advance()?;
                }

                T::LeftParen => {
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    s.nparens += 1;
                    s.bin_last = true;
                    s.rprn = false;
                    s.incdec = false;
                    s.can_assign = false;
                    self.state.ops.push(Operator::LeftParen);
                    self.advance()?;
                }

                T::RightParen => {
                    if self.last == T::LeftParen {
                        let only_parens = self.state.ops[base..]
                            .iter()
                            .all(|op| *op == Operator::LeftParen);
                        if s.nexprs == 0 && only_parens {
                            self.state.ops.truncate(base);
                            self.advance()?;
                            return Ok(ExprStatus::Empty);
                        }
                        return Err(ParseError::invalid_expression(span));
                    }
                    if !s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    if s.nparens == 0 {
                        break;
                    }

                    s.nparens -= 1;
                    let emitted = self.right_paren(base, &mut s.nexprs)?;
                    s.rprn = true;
                    s.bin_last = false;
                    s.incdec = false;
                    if emitted {
                        s.can_assign = false;
                    }
                    self.advance()?;
                }

                T::String => {
                    self.posix(PosixViolation::StringInExpression, span)?;
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    self.string()?;
                    s.leaf(false);
                }

                T::Name => {
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    let assignable = self.name(flags - ExprFlags::NOCALL)?;
                    s.leaf(assignable);
                }

                T::Number => {
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    self.number()?;
                    s.leaf(false);
                }

                T::Last | T::Ibase | T::Obase | T::Seed => {
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    if let Some(op) = keyword_leaf(kind) {
                        self.emit(op);
                    }
                    self.advance()?;
                    s.leaf(true);
                }

                T::Scale => {
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    let assignable = self.scale(flags)?;
                    s.leaf(assignable);
                }

                T::Length | T::Sqrt | T::Abs | T::Irand | T::Asciify => {
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    self.builtin(kind, flags)?;
                    s.leaf(false);
                }

                T::Read
                | T::Rand
                | T::MaxIbase
                | T::MaxObase
                | T::MaxScale
                | T::MaxRand
                | T::LineLength
                | T::GlobalStacks
                | T::LeadingZero => {
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    if kind == T::Read && flags.contains(ExprFlags::NOREAD) {
                        return Err(ParseError::new(ParseErrorKind::RecursiveRead, span));
                    }
                    self.no_arg_builtin(kind)?;
                    s.leaf(false);
                }

                T::Modexp | T::Divmod => {
                    if s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    self.builtin3(kind, flags)?;
                    s.leaf(false);
                }

                _ => {
                    let Some(op) = Operator::from_token(kind) else {
                        break;
                    };

                    if op.is_assignment() && (!s.can_assign || self.tighter_on_stack(base)) {
                        return Err(ParseError::new(ParseErrorKind::InvalidAssignment, span));
                    }
                    if op.is_prefix() == s.is_leaf() {
                        return Err(ParseError::invalid_expression(span));
                    }
                    if op.is_relational() {
                        s.nrelops += 1;
                    }

                    self.push_operator(op, base, &mut s.nexprs);
                    s.operator(if op.is_prefix() { Prev::Prefix } else { Prev::Binary });
                    self.advance()?;
                }
            }

            flags.remove(ExprFlags::ARRAY);
        }

        while self.state.ops.len() > base {
            let Some(op) = self.state.ops.pop() else {
                break;
            };
            // an unmatched `(`
            let Some(code) = op.opcode() else {
                return Err(ParseError::invalid_expression(self.token.span));
            };
            s.assign = op.is_assignment();
            self.emit(code);
            if !op.is_prefix() {
                s.nexprs = s.nexprs.saturating_sub(1);
            }
            s.incdec = false;
        }

        if s.nexprs != 1 {
            return Err(ParseError::invalid_expression(self.token.span));
        }

        if !next.contains(&self.token.kind) && !self.is_delimiter() {
            return Err(ParseError::invalid_expression(self.token.span));
        }

        let span = self.token.span;
        if !flags.contains(ExprFlags::REL) && s.nrelops > 0 {
            self.posix(PosixViolation::RelationalPosition, span)?;
        } else if flags.contains(ExprFlags::REL) && s.nrelops > 1 {
            self.posix(PosixViolation::MultipleRelational, span)?;
        }

        let suppressed = if !flags.contains(ExprFlags::NEEDVAL) && !pfirst {
            self.suppress_value(&s)
        } else {
            false
        };

        if flags.contains(ExprFlags::PRINT) {
            if !suppressed && (pfirst || !s.assign) {
                self.emit(OpCode::Print);
            }
        } else if !flags.contains(ExprFlags::NEEDVAL) && !suppressed {
            self.emit(OpCode::Pop);
        }

        if !next.contains(&T::Newline) {
            self.skip_newlines()?;
        }

        Ok(ExprStatus::Success)
    }

    /// Rewrite a trailing assignment or increment into its form that
    /// leaves nothing on the stack. Returns whether it did.
    fn suppress_value(&mut self, s: &ExprState) -> bool {
        let line = self.line();
        let code = &mut self.func().code;
        let Some(last) = code.last_op() else {
            return false;
        };

        if s.assign {
            return last.no_val().is_some_and(|no_val| code.replace_last_op(last, no_val));
        }
        if !s.incdec {
            return false;
        }

        match last {
            OpCode::Inc | OpCode::Dec => {
                let store = if last == OpCode::Inc {
                    OpCode::AssignPlusNoVal
                } else {
                    OpCode::AssignMinusNoVal
                };
                if !code.replace_last_op(last, OpCode::One) {
                    return false;
                }
                code.write_op(store, line);
                true
            }
            OpCode::AssignPlus => code.replace_last_op(last, OpCode::AssignPlusNoVal),
            OpCode::AssignMinus => code.replace_last_op(last, OpCode::AssignMinusNoVal),
            _ => false,
        }
    }

    /// Emit every stacked operator that binds at least as tightly as
    /// `incoming`, then push it.
    fn push_operator(&mut self, incoming: Operator, base: usize, nexprs: &mut usize) {
        while let Some(&top) = self.state.ops[base..].last() {
            if !top.pops_before(incoming) {
                break;
            }
            self.state.ops.pop();
            if let Some(code) = top.opcode() {
                self.emit(code);
            }
            if !top.is_prefix() {
                *nexprs = nexprs.saturating_sub(1);
            }
        }
        self.state.ops.push(incoming);
    }

    /// Emit operators down to the matching `(`. Returns whether any
    /// operator was emitted.
    fn right_paren(&mut self, base: usize, nexprs: &mut usize) -> Result<bool> {
        let mut emitted = false;
        while self.state.ops.len() > base {
            let Some(op) = self.state.ops.pop() else {
                break;
            };
            let Some(code) = op.opcode() else {
                return Ok(emitted);
            };
            self.emit(code);
            emitted = true;
            if !op.is_prefix() {
                *nexprs = nexprs.saturating_sub(1);
            }
        }
        Err(ParseError::invalid_expression(self.token.span))
    }

    /// The operator waiting on top binds tighter than an assignment, so
    /// the operand just read is part of a larger value.
    fn tighter_on_stack(&self, base: usize) -> bool {
        self.state.ops[base..]
            .last()
            .is_some_and(|op| *op != Operator::LeftParen && op.precedence() < Operator::Assign.precedence())
    }

    /// `x++`, `x--`, `++x`, `--x`.
    ///
    /// The postfix forms emit `INC`/`DEC` after the operand. The prefix
    /// forms are lowered to a compound assignment: operand, `ONE`,
    /// `ASSIGN_PLUS`/`ASSIGN_MINUS`.
    fn incdec(&mut self, s: &mut ExprState, flags: ExprFlags) -> Result<()> {
        let span = self.token.span;
        let inc = self.at(T::PlusPlus);

        if matches!(self.last, T::PlusPlus | T::MinusMinus | T::RightParen) {
            return Err(ParseError::new(ParseErrorKind::InvalidAssignment, span));
        }

        if s.is_leaf() {
            if !s.can_assign {
                return Err(ParseError::new(ParseErrorKind::InvalidAssignment, span));
            }
            self.emit(if inc { OpCode::Inc } else { OpCode::Dec });
            self.advance()?;
            s.can_assign = false;
            return Ok(());
        }

        self.advance()?;
        match self.token.kind {
            T::Name => {
                self.name((flags - ExprFlags::ARRAY) | ExprFlags::NOCALL)?;
            }
            kind @ (T::Last | T::Ibase | T::Obase | T::Seed) => {
                if let Some(op) = keyword_leaf(kind) {
                    self.emit(op);
                }
                self.advance()?;
            }
            T::Scale => {
                self.advance()?;
                if self.at(T::LeftParen) {
                    return Err(ParseError::new(ParseErrorKind::InvalidAssignment, span));
                }
                self.emit(OpCode::Scale);
            }
            _ => return Err(ParseError::new(ParseErrorKind::InvalidAssignment, span)),
        }

        self.emit(OpCode::One);
        self.emit(if inc { OpCode::AssignPlus } else { OpCode::AssignMinus });
        s.prev = Prev::Leaf;
        s.nexprs += 1;
        s.can_assign = false;
        Ok(())
    }
}
