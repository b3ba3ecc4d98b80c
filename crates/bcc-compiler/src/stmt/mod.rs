//! Statement compilation.
//!
//! bc statements are not parsed into a tree. Each statement emits code as
//! it is read, and everything that spans more than one statement lives on
//! the session's flags stack:
//!
//! - `if`, `while`, `for` and `define` push an entry whose body is the
//!   next statement or `{ ... }` block;
//! - the end of a body pops entries, resolves exit labels and, for an
//!   `if`, leaves `IF_END` on the enclosing entry so a following `else`
//!   can still attach to it;
//! - a chunk may end with entries still open, and the next chunk picks up
//!   where it stopped.
//!
//! # Statement Types
//!
//! | Statement | Module |
//! |-----------|--------|
//! | `{ }`, end of bodies | [`block`] |
//! | `if`, `else` | [`if_stmt`] |
//! | `while` | [`while_stmt`] |
//! | `for` | [`for_stmt`] |
//! | `break`, `continue` | [`jump_stmt`] |
//! | `define` | [`function`] |
//! | `auto` | [`auto`] |
//! | `print`, `stream` | [`print`] |
//! | `return` | [`return_stmt`] |

mod auto;
mod block;
mod for_stmt;
mod function;
mod if_stmt;
mod jump_stmt;
mod print;
mod return_stmt;
mod while_stmt;

use bcc_core::{ParseErrorKind, PosixViolation};
use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;
use crate::expr::{ExprFlags, NEXT_EXPR, starts_expression};
use crate::flags::BlockFlags;
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// Compile one top-level item: a function definition or a statement.
    pub(crate) fn parse(&mut self) -> Result<()> {
        if self.at(TokenKind::Define) {
            // a trailing `if` may still be waiting for its `else`
            if !self.state.flags.can_exec() && (!self.endif()? || !self.state.flags.can_exec()) {
                return Err(self.error(ParseErrorKind::NestedFunction));
            }
            return self.define();
        }
        self.stmt()
    }

    /// Compile one statement.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn stmt(&mut self) -> Result<()> {
        if self.at(TokenKind::Newline) {
            return self.advance();
        }
        if self.at(TokenKind::Auto) {
            return self.auto_stmt();
        }
        self.state.auto_part = false;

        if !self.at(TokenKind::Else) {
            let top = self.state.flags.top();

            // no `else` came; the finished `if` ends here
            if top.contains(BlockFlags::IF_END) {
                self.no_else();
                if self.state.flags.len() > 1 && !self.state.flags.top_has(BlockFlags::BRACE) {
                    self.end_body(false)?;
                }
                return Ok(());
            }

            if self.at(TokenKind::LeftBrace) {
                if top.contains(BlockFlags::BODY) {
                    self.state.flags.insert_top(BlockFlags::BRACE);
                    self.advance()?;
                    self.body(true)?;
                } else {
                    self.start_block();
                    self.advance()?;
                }
                return Ok(());
            }

            if top.contains(BlockFlags::BODY) && !top.contains(BlockFlags::BRACE) {
                return self.body(false);
            }
        }

        let len = self.state.flags.len();
        let top = self.state.flags.top();
        log::trace!("statement {:?} at line {}", self.token.kind, self.line());

        match self.token.kind {
            kind if starts_expression(kind) => self.expr(ExprFlags::PRINT, NEXT_EXPR)?,
            TokenKind::Else => self.else_stmt()?,
            TokenKind::Semicolon => {
                while self.at(TokenKind::Semicolon) {
                    self.advance()?;
                }
                return Ok(());
            }
            TokenKind::RightBrace => self.end_body(true)?,
            TokenKind::String => {
                self.string()?;
                self.emit(OpCode::PrintStr);
            }
            kind @ (TokenKind::Break | TokenKind::Continue) => self.loop_exit(kind)?,
            TokenKind::For => self.for_stmt()?,
            TokenKind::Halt => {
                self.emit(OpCode::Halt);
                self.advance()?;
            }
            TokenKind::If => self.if_stmt()?,
            kind @ (TokenKind::Print | TokenKind::Stream) => self.print_stmt(kind)?,
            TokenKind::Quit => {
                self.quit = true;
                return Ok(());
            }
            TokenKind::Return => self.return_stmt()?,
            TokenKind::While => self.while_stmt()?,
            _ => return Err(self.unexpected()),
        }

        if len == self.state.flags.len() && top == self.state.flags.top() && !self.is_delimiter() {
            return Err(self.unexpected());
        }

        while matches!(self.token.kind, TokenKind::Semicolon | TokenKind::Newline) {
            self.advance()?;
        }

        if self.last == TokenKind::Semicolon && self.at(TokenKind::Define) {
            let span = self.token.span;
            self.posix(PosixViolation::DefineAfterSemicolon, span)?;
        }

        Ok(())
    }

    /// Compile the statement that is the body of an `if`, `else`, loop or
    /// function. `brace` is set when the body opened with `{`.
    pub(crate) fn body(&mut self, brace: bool) -> Result<()> {
        self.state.flags.remove_top(BlockFlags::BODY);

        if self.state.flags.top_has(BlockFlags::FUNC_INNER) {
            if !brace {
                return Err(self.unexpected());
            }
            // `auto` may only open the function body
            self.state.auto_part = true;
            if self.at(TokenKind::Auto) {
                self.auto_stmt()?;
            }
            if self.at(TokenKind::Newline) {
                self.advance()?;
            }
            return Ok(());
        }

        let len = self.state.flags.len();
        self.stmt()?;
        if self.quit {
            return Ok(());
        }
        if !brace && !self.state.flags.top_has(BlockFlags::BODY) && len <= self.state.flags.len() {
            self.end_body(false)?;
        }
        Ok(())
    }

    /// Close everything end of input may close: a trailing `if` waiting for
    /// `else`, and the bodies of unbraced statements.
    ///
    /// Returns `false` if a brace is still open.
    pub(crate) fn endif(&mut self) -> Result<bool> {
        if self.state.flags.can_exec() {
            return Ok(true);
        }
        if self
            .state
            .flags
            .iter_from_top()
            .any(|flags| flags.contains(BlockFlags::BRACE))
        {
            return Ok(false);
        }

        while self.state.flags.len() > 1 || self.state.flags.top_has(BlockFlags::IF_END) {
            if self.state.flags.top_has(BlockFlags::IF_END) {
                self.no_else();
            }
            let len = self.state.flags.len();
            if len > 1 {
                self.end_body(false)?;
                if self.state.flags.len() >= len {
                    return Ok(false);
                }
            }
        }

        Ok(self.state.flags.can_exec())
    }
}
