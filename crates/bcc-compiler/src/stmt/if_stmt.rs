//! If and else compilation.

use bcc_core::ParseErrorKind;
use bcc_lexer::TokenKind;

use crate::bytecode::OpCode;
use crate::expr::{ExprFlags, NEXT_REL};
use crate::flags::BlockFlags;
use crate::parser::{Parser, Result};

impl Parser<'_, '_> {
    /// Compile an `if` header and open its body.
    ///
    /// Bytecode layout:
    /// ```text
    /// [condition]
    /// JUMP_ZERO -> end
    /// [then body]
    /// end:
    /// ```
    ///
    /// With an `else` the `end` label moves past a `JUMP` over the else
    /// body; see [`else_stmt`](Self::else_stmt).
    pub(crate) fn if_stmt(&mut self) -> Result<()> {
        self.advance()?;
        self.expect(TokenKind::LeftParen)?;
        self.expr(ExprFlags::REL | ExprFlags::NEEDVAL, NEXT_REL)?;
        self.expect(TokenKind::RightParen)?;

        let end = self.next_label();
        self.emit_jump(OpCode::JumpZero, end);
        self.create_exit_label(false);
        self.start_body(BlockFlags::IF);
        Ok(())
    }

    /// Compile `else` after a closed `if` body.
    ///
    /// ```text
    /// [condition]
    /// JUMP_ZERO -> else
    /// [then body]
    /// JUMP -> end
    /// else:
    /// [else body]
    /// end:
    /// ```
    pub(crate) fn else_stmt(&mut self) -> Result<()> {
        if !self.state.flags.top_has(BlockFlags::IF_END) {
            return Err(self.error(ParseErrorKind::ElseWithoutIf));
        }

        let end = self.next_label();
        self.emit_jump(OpCode::Jump, end);
        // the if's exit label is the start of the else body
        self.no_else();
        self.create_exit_label(false);
        self.start_body(BlockFlags::ELSE);
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use crate::bytecode::OpCode::{self, *};
    use crate::labels::Label;
    use crate::program::MAIN;
    use crate::state::{ChunkStatus, ParserState};
    use bcc_core::ParseErrorKind;

    fn compile(source: &str) -> ParserState {
        let mut state = ParserState::default();
        state.compile(source).unwrap();
        state.finish().unwrap();
        state
    }

    fn listing(state: &ParserState) -> Vec<(OpCode, Vec<usize>)> {
        state
            .program()
            .main()
            .code
            .instructions()
            .into_iter()
            .map(|inst| (inst.op, inst.operands))
            .collect()
    }

    #[test]
    fn if_without_else() {
        let state = compile("if (a) b\n");
        assert_eq!(
            listing(&state),
            vec![(Var, vec![0]), (JumpZero, vec![0]), (Var, vec![1]), (Print, vec![])]
        );
        let main = state.program().function(MAIN).unwrap();
        assert_eq!(main.labels.get(0), Some(Label::Known(main.code.len())));
    }

    #[test]
    fn if_with_else() {
        let state = compile("if (a) b else c\n");
        assert_eq!(
            listing(&state),
            vec![
                (Var, vec![0]),
                (JumpZero, vec![0]),
                (Var, vec![1]),
                (Print, vec![]),
                (Jump, vec![1]),
                (Var, vec![2]),
                (Print, vec![]),
            ]
        );
        let main = state.program().main();
        let insts = main.code.instructions();
        // the false branch starts at the else body, the jump skips it
        assert_eq!(main.labels.target(0), insts[5].offset);
        assert_eq!(main.labels.target(1), main.code.len());
    }

    #[test]
    fn else_on_the_next_line() {
        let mut state = ParserState::default();
        assert_eq!(state.compile("if (a) b\n").unwrap(), ChunkStatus::Incomplete);
        assert_eq!(state.compile("else c\n").unwrap(), ChunkStatus::Ready);
        assert_eq!(
            state.program().main().code.opcodes(),
            vec![Var, JumpZero, Var, Print, Jump, Var, Print]
        );
    }

    #[test]
    fn braced_bodies() {
        let state = compile("if (a) {\n b\n} else {\n c\n}\n");
        assert_eq!(
            state.program().main().code.opcodes(),
            vec![Var, JumpZero, Var, Print, Jump, Var, Print]
        );
        assert!(state.flags.is_top_level());
    }

    #[test]
    fn dangling_else_binds_to_the_nearest_if() {
        let state = compile("if (a) if (b) c else d\n");
        let insts = state.program().main().code.instructions();
        let ops: Vec<_> = insts.iter().map(|inst| inst.op).collect();
        assert_eq!(
            ops,
            vec![Var, JumpZero, Var, JumpZero, Var, Print, Jump, Var, Print]
        );
        // the outer if's false branch skips everything
        let main = state.program().main();
        assert_eq!(insts[1].operands, vec![0]);
        assert_eq!(main.labels.target(0), main.code.len());
    }

    #[test]
    fn braces_move_the_else_outward() {
        let state = compile("if (a) { if (b) c } else d\n");
        let insts = state.program().main().code.instructions();
        let main = state.program().main();
        // outer JUMP_ZERO lands on `d`, inner one on the outer JUMP
        assert_eq!(main.labels.target(insts[1].operands[0]), insts[7].offset);
        assert_eq!(main.labels.target(insts[3].operands[0]), insts[6].offset);
        assert_eq!(insts[6].op, Jump);
    }

    #[test]
    fn else_inside_loop_body() {
        let state = compile("while (x) if (a) b else c\n");
        assert!(state.flags.is_top_level());
        let ops = state.program().main().code.opcodes();
        assert_eq!(
            ops,
            vec![Var, JumpZero, Var, JumpZero, Var, Print, Jump, Var, Print, Jump]
        );
    }

    #[test]
    fn stray_else() {
        let e = ParserState::default().compile("else x\n").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::ElseWithoutIf);
        let e = ParserState::default().compile("if (a) b\nx\nelse c\n").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::ElseWithoutIf);
    }

    #[test]
    fn malformed_headers() {
        let e = ParserState::default().compile("if a b\n").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::UnexpectedToken);
        let e = ParserState::default().compile("if () b\n").unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::EmptyExpression);
    }
}
