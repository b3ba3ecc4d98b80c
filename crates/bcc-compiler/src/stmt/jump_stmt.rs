//! Break and continue.

use bcc_core::ParseErrorKind;
use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;
use crate::flags::BlockFlags;
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// `break` jumps to the innermost loop's exit label, `continue` to its
    /// condition (or, in a `for`, its update clause).
    pub(crate) fn loop_exit(&mut self, kind: TokenKind) -> Result<()> {
        let is_break = kind == TokenKind::Break;
        let outside = if is_break {
            ParseErrorKind::BreakOutsideLoop
        } else {
            ParseErrorKind::ContinueOutsideLoop
        };

        if !self.state.flags.top_has(BlockFlags::LOOP) {
            return Err(self.error(outside));
        }

        let target = if is_break {
            self.state
                .exits
                .iter()
                .rev()
                .find(|exit| exit.is_loop)
                .map(|exit| exit.label)
        } else {
            self.state.conds.last().copied()
        };
        let Some(label) = target else {
            return Err(self.error(outside));
        };

        self.emit_jump(OpCode::Jump, label);
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use crate::bytecode::OpCode::*;
    use crate::state::ParserState;
    use bcc_core::ParseErrorKind;

    #[test]
    fn break_skips_if_exits() {
        let mut state = ParserState::default();
        state.compile("while (a) {\n if (b) break\n c\n}\n").unwrap();
        let main = state.program().main();
        let insts = main.code.instructions();
        let brk = insts
            .iter()
            .find(|inst| inst.op == Jump)
            .unwrap();
        // the loop exit, not the if's
        assert_eq!(main.labels.target(brk.operands[0]), main.code.len());
    }

    #[test]
    fn continue_jumps_to_the_condition() {
        let mut state = ParserState::default();
        state.compile("while (a) {\n continue\n}\n").unwrap();
        let main = state.program().main();
        let insts = main.code.instructions();
        assert_eq!(insts[2].op, Jump);
        assert_eq!(main.labels.target(insts[2].operands[0]), 0);
    }

    #[test]
    fn inner_loop_is_targeted() {
        let mut state = ParserState::default();
        state.compile("while (a) while (b) break\n").unwrap();
        let main = state.program().main();
        let insts = main.code.instructions();
        let ops: Vec<_> = insts.iter().map(|inst| inst.op).collect();
        assert_eq!(ops, vec![Var, JumpZero, Var, JumpZero, Jump, Jump, Jump]);
        // break lands after the inner loop's back jump
        assert_eq!(main.labels.target(insts[4].operands[0]), insts[6].offset);
    }

    #[test]
    fn outside_loops() {
        let e = ParserState::default().compile("break\n").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::BreakOutsideLoop);
        let e = ParserState::default().compile("if (a) continue\n").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::ContinueOutsideLoop);
        let e = ParserState::default()
            .compile("while (a) {}\ndefine f() { break }\n")
            .unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::BreakOutsideLoop);
    }
}
