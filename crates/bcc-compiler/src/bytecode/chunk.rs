//! Bytecode chunk for compiled functions.
//!
//! A `BytecodeChunk` contains the compiled bytecode for a single function,
//! along with line number information for debugging.
//!
//! Index operands are variable length: one byte holding the number of
//! value bytes, then the value in little-endian order. Zero is encoded as
//! a single `0` length byte.

use super::OpCode;

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Byte offset of the opcode.
    pub offset: usize,
    pub op: OpCode,
    /// Index operands, in encoding order.
    pub operands: Vec<usize>,
}

/// A chunk of compiled bytecode for a single function.
///
/// Constants and names are stored at program level; operands here are
/// indices into those tables or into the function's label table.
#[derive(Debug, Clone, Default)]
pub struct BytecodeChunk {
    /// The bytecode instructions.
    code: Vec<u8>,
    /// Line numbers for debugging (parallel to code).
    lines: Vec<u32>,
    /// Offset of the most recently written opcode.
    last_op: Option<usize>,
}

impl BytecodeChunk {
    /// Create a new empty bytecode chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an opcode.
    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.last_op = Some(self.code.len());
        self.code.push(op as u8);
        self.lines.push(line);
    }

    /// Write a variable-length index operand.
    pub fn write_index(&mut self, value: usize, line: u32) {
        let bytes = value.to_le_bytes();
        let len = bytes.len() - bytes.iter().rev().take_while(|&&b| b == 0).count();

        self.code.push(len as u8);
        self.lines.push(line);
        for &byte in &bytes[..len] {
            self.code.push(byte);
            self.lines.push(line);
        }
    }

    /// Read the index operand at `offset`.
    ///
    /// Returns the value and the offset just past the operand.
    pub fn read_index(&self, offset: usize) -> Option<(usize, usize)> {
        let len = *self.code.get(offset)? as usize;
        let bytes = self.code.get(offset + 1..offset + 1 + len)?;
        let value = bytes
            .iter()
            .rev()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);
        Some((value, offset + 1 + len))
    }

    /// The most recently written opcode.
    pub fn last_op(&self) -> Option<OpCode> {
        self.last_op.and_then(|offset| self.read_op(offset))
    }

    /// Replace the most recently written opcode.
    ///
    /// Only operand-free opcodes at the very end of the chunk can be
    /// swapped, and only if the current opcode is `expected`. Returns
    /// whether the replacement happened.
    pub fn replace_last_op(&mut self, expected: OpCode, replacement: OpCode) -> bool {
        let Some(offset) = self.last_op else {
            return false;
        };

        if offset + 1 != self.code.len()
            || self.read_op(offset) != Some(expected)
            || replacement.operand_count() != 0
        {
            return false;
        }

        self.code[offset] = replacement as u8;
        true
    }

    /// Discard everything from `len` on.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.code.len() {
            return;
        }
        self.code.truncate(len);
        self.lines.truncate(len);
        self.last_op = self.instructions().last().map(|inst| inst.offset);
    }

    /// Get current code offset (for label targets).
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Get the bytecode.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Get the line numbers.
    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    /// Get the line number for a given offset.
    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Read an opcode at the given offset.
    pub fn read_op(&self, offset: usize) -> Option<OpCode> {
        self.code.get(offset).and_then(|&b| OpCode::from_u8(b))
    }

    /// Decode the chunk into instructions.
    ///
    /// Decoding stops at the first byte that is not a valid opcode or
    /// whose operands run past the end.
    pub fn instructions(&self) -> Vec<Instruction> {
        let mut instructions = Vec::new();
        let mut offset = 0;

        while let Some(op) = self.read_op(offset) {
            let mut next = offset + 1;
            let mut operands = Vec::with_capacity(op.operand_count());
            for _ in 0..op.operand_count() {
                let Some((value, after)) = self.read_index(next) else {
                    return instructions;
                };
                operands.push(value);
                next = after;
            }
            instructions.push(Instruction {
                offset,
                op,
                operands,
            });
            offset = next;
        }

        instructions
    }

    /// Extract all opcodes from the chunk, skipping operands.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.instructions().into_iter().map(|inst| inst.op).collect()
    }

    /// Check if this chunk contains exactly the given opcode sequence.
    ///
    /// This ignores operand values, only checking the opcodes themselves.
    /// Panics with a descriptive message if the sequences don't match.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }

    /// Check if this chunk contains the given opcodes (in order, but not necessarily contiguous).
    #[track_caller]
    pub fn assert_contains_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        let mut expected_iter = expected.iter().peekable();

        for op in &actual {
            if expected_iter.peek() == Some(&op) {
                expected_iter.next();
            }
        }

        if expected_iter.peek().is_some() {
            let remaining: Vec<_> = expected_iter.map(|op| op.name()).collect();
            panic!(
                "Missing opcodes in sequence.\nExpected to find: {:?}\nActual bytecode:  {:?}",
                remaining,
                actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
            );
        }
    }
}
