//! Bytecode types for the bc compiler.
//!
//! - [`OpCode`] - The instruction set for the VM
//! - [`BytecodeChunk`] - Compiled bytecode for a function
//! - [`Constant`] and [`ConstantPool`] - Program-level literal storage
//! - [`disassemble`] - Human-readable listings

mod chunk;
mod constant;
mod disasm;
mod opcode;

pub use chunk::{BytecodeChunk, Instruction};
pub use constant::{Constant, ConstantPool};
pub use disasm::disassemble;
pub use opcode::OpCode;
