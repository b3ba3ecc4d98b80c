//! Opening and closing bodies.
//!
//! A body ends either at its `}` or, for an unbraced body, right after its
//! one statement. Ending one body can end several: the last statement of
//! `while (a) while (b) x` closes both loops. An `if` body never closes
//! its entry outright; it leaves `IF_END` behind so that an `else` on the
//! next line can still attach.

use bcc_core::PosixMode;
use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;
use crate::flags::BlockFlags;
use crate::parser::{Parser, Result};
use crate::program::MAIN;

impl Parser<'_, '_> {
    /// Push an entry for a body that starts with the next statement.
    ///
    /// Function and loop context is inherited from the enclosing entry.
    pub(crate) fn start_body(&mut self, flags: BlockFlags) {
        let inherited = self.state.flags.top() & (BlockFlags::FUNC | BlockFlags::LOOP);
        self.state.flags.push(flags | inherited | BlockFlags::BODY);
    }

    /// Push an entry for a `{` that is not the body of anything.
    pub(crate) fn start_block(&mut self) {
        let inherited = self.state.flags.top() & (BlockFlags::FUNC | BlockFlags::LOOP);
        self.state.flags.push(BlockFlags::BRACE | inherited);
    }

    /// Whether the current token ends a statement.
    ///
    /// `}` does when some brace is open. `else` does when it can bind to an
    /// `if` whose body is being closed.
    pub(crate) fn is_delimiter(&self) -> bool {
        match self.token.kind {
            TokenKind::Semicolon | TokenKind::Newline | TokenKind::Eof => true,
            TokenKind::RightBrace => self
                .state
                .flags
                .iter_from_top()
                .any(|flags| flags.contains(BlockFlags::BRACE)),
            TokenKind::Else => {
                let mut flags = BlockFlags::ELSE;
                for entry in self.state.flags.iter_from_top() {
                    if !flags.intersects(BlockFlags::ELSE | BlockFlags::LOOP_INNER) {
                        break;
                    }
                    flags = entry;
                    if flags.contains(BlockFlags::BRACE) && self.last != TokenKind::RightBrace {
                        return false;
                    }
                }
                flags.contains(BlockFlags::IF)
            }
            _ => false,
        }
    }

    /// The `if` that just ended has no `else`: its exit label lands here.
    pub(crate) fn no_else(&mut self) {
        self.state.flags.remove_top(BlockFlags::IF_END);
        self.set_label();
    }

    /// End the innermost body, and every enclosing unbraced body that ends
    /// with it.
    ///
    /// With `brace` set the current token is the `}` that ends a braced
    /// body.
    pub(crate) fn end_body(&mut self, mut brace: bool) -> Result<()> {
        if self.state.flags.len() <= 1 {
            return Err(self.unexpected());
        }

        if brace {
            debug_assert!(self.at(TokenKind::RightBrace));
            self.advance()?;

            let function_end = self.state.flags.len() == 2
                && self.state.flags.top()
                    == BlockFlags::BRACE | BlockFlags::FUNC_INNER | BlockFlags::FUNC;
            if !self.is_delimiter() && !function_end {
                return Err(self.unexpected());
            }
        }

        let mut has_brace = self.state.flags.top_has(BlockFlags::BRACE);

        loop {
            let len = self.state.flags.len();
            if has_brace && !brace {
                return Err(self.unexpected());
            }

            let top = self.state.flags.top();
            if top.intersects(BlockFlags::LOOP_INNER | BlockFlags::ELSE) {
                if top.contains(BlockFlags::LOOP_INNER) {
                    if let Some(cond) = self.state.conds.pop() {
                        self.emit_jump(OpCode::Jump, cond);
                    }
                }
                self.set_label();
                self.state.flags.pop();
            } else if top.contains(BlockFlags::FUNC_INNER) {
                let func = self.func();
                let ret = if func.is_void { OpCode::RetVoid } else { OpCode::Ret0 };
                log::debug!("end of function {}", func.name);
                self.emit(ret);
                self.state.fidx = MAIN;
                self.state.flags.pop();
            } else if has_brace && !top.contains(BlockFlags::IF) {
                self.state.flags.pop();
            }

            let mut new_else = false;
            if self.state.flags.top_has(BlockFlags::IF)
                && (len == self.state.flags.len() || !self.state.flags.top_has(BlockFlags::BRACE))
            {
                self.skip_newlines()?;
                self.state.flags.pop();

                if self.state.options.posix == PosixMode::Error {
                    // POSIX bc has no `else`
                    self.no_else();
                } else {
                    self.state.flags.insert_top(BlockFlags::IF_END);
                    new_else = self.at(TokenKind::Else);
                    if new_else {
                        self.else_stmt()?;
                    } else if brace && !has_brace {
                        self.no_else();
                    }
                }
            }

            if brace && has_brace {
                brace = false;
            }

            let keep_closing = self.state.flags.len() > 1
                && !new_else
                && (!self.state.flags.top_has(BlockFlags::IF_END) || brace);
            if !keep_closing {
                break;
            }

            has_brace = self.state.flags.top_has(BlockFlags::BRACE);
            if has_brace && !brace {
                break;
            }
        }

        if self.state.flags.is_top_level() && brace {
            return Err(self.unexpected());
        }
        Ok(())
    }
}
