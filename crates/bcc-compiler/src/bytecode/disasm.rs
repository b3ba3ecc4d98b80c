//! Human-readable bytecode listings.

use std::fmt::Write;

use crate::function::Function;
use crate::labels::Label;
use crate::program::Program;

use super::OpCode;

/// Render `function` as a listing with label markers.
///
/// ```text
/// L0:
/// 0000    1 VAR i
/// 0002    1 ONE
/// 0003    1 REL_LT
/// 0004    1 JUMP_ZERO L1
/// ```
pub fn disassemble(function: &Function, program: &Program) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", function.name);

    let labels_at = |offset: usize| {
        function
            .labels
            .iter()
            .enumerate()
            .filter(move |(_, label)| *label == Label::Known(offset))
            .map(|(idx, _)| idx)
    };

    for inst in function.code.instructions() {
        for idx in labels_at(inst.offset) {
            let _ = writeln!(out, "L{idx}:");
        }

        let line = function.code.line_at(inst.offset).unwrap_or_default();
        let _ = write!(out, "{:04} {:>4} {}", inst.offset, line, inst.op.name());

        let operand = |i: usize| inst.operands.get(i).copied().unwrap_or_default();
        match inst.op {
            OpCode::Num | OpCode::Str => {
                let text = program
                    .constants()
                    .get(operand(0))
                    .map(|c| c.text())
                    .unwrap_or("?");
                let _ = write!(out, " {text:?}");
            }
            OpCode::Var => {
                let _ = write!(out, " {}", program.vars().name(operand(0)).unwrap_or("?"));
            }
            OpCode::ArrayElem | OpCode::Array => {
                let _ = write!(out, " {}[]", program.arrays().name(operand(0)).unwrap_or("?"));
            }
            OpCode::Jump | OpCode::JumpZero => {
                let _ = write!(out, " L{}", operand(0));
            }
            OpCode::Call => {
                let name = program
                    .function(operand(1))
                    .map(|f| f.name.as_str())
                    .unwrap_or("?");
                let _ = write!(out, " {name}/{}", operand(0));
            }
            _ => {}
        }
        out.push('\n');
    }

    for idx in labels_at(function.code.len()) {
        let _ = writeln!(out, "L{idx}:");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::MAIN;
    use bcc_core::Span;

    #[test]
    fn listing_names_operands_and_labels() {
        let mut program = Program::default();
        let x = program.var_index("x", Span::default()).unwrap();
        let n = program.add_number("42", Span::default()).unwrap();
        let f = program.function_id("f", Span::default()).unwrap();

        let main = program.func_mut(MAIN);
        let top = main.labels.create_known(0);
        main.code.write_op(OpCode::Var, 1);
        main.code.write_index(x, 1);
        main.code.write_op(OpCode::Num, 1);
        main.code.write_index(n, 1);
        main.code.write_op(OpCode::Call, 2);
        main.code.write_index(1, 2);
        main.code.write_index(f, 2);
        main.code.write_op(OpCode::Jump, 2);
        main.code.write_index(top, 2);

        let listing = disassemble(program.main(), &program);
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines[0], "== (main) ==");
        assert_eq!(lines[1], "L0:");
        assert_eq!(lines[2], "0000    1 VAR x");
        assert_eq!(lines[3], "0002    1 NUM \"42\"");
        assert_eq!(lines[4], "0004    2 CALL f/1");
        assert_eq!(lines[5], "0009    2 JUMP L0");
    }

    #[test]
    fn labels_at_end_of_code() {
        let mut program = Program::default();
        let main = program.func_mut(MAIN);
        main.code.write_op(OpCode::Halt, 1);
        let exit = main.labels.create_pending();
        main.labels.resolve(exit, 1);

        let listing = disassemble(program.main(), &program);
        assert!(listing.ends_with("HALT\nL0:\n"));
    }
}
