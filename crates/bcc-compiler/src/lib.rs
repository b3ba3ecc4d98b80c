//! bc Compiler
//!
//! A single pass compiler from bc source to stack bytecode. There is no
//! syntax tree: statements emit code as they are read, expressions go
//! through a Shunting-Yard operator stack, and forward jumps use labels
//! that are resolved once their target is known.
//!
//! Input arrives in chunks, usually one line at a time. A chunk may end
//! inside a block or function body; the [`ParserState`] keeps the open
//! blocks until a later chunk closes them.
//!
//! ## Modules
//!
//! - [`bytecode`]: Bytecode types (OpCode, BytecodeChunk, ConstantPool)
//! - [`expr`]: Expression flags and operators
//! - [`flags`]: Block flags stack
//! - [`function`]: Compiled functions and their locals
//! - [`labels`]: Jump labels
//! - [`program`]: Function table and name tables
//! - [`state`]: Session state across chunks
//!
//! ## Example
//!
//! ```
//! use bcc_compiler::{ChunkStatus, ParserState};
//!
//! let mut state = ParserState::default();
//! assert_eq!(state.compile("while (i < 3) {\n").unwrap(), ChunkStatus::Incomplete);
//! assert_eq!(state.compile("  i += 1\n}\n").unwrap(), ChunkStatus::Ready);
//! state.finish().unwrap();
//! ```

pub mod bytecode;
mod emit;
pub mod expr;
pub mod flags;
pub mod function;
pub mod labels;
mod parser;
pub mod program;
pub mod state;
mod stmt;

pub use bytecode::{BytecodeChunk, Constant, ConstantPool, Instruction, OpCode, disassemble};
pub use expr::{ExprFlags, ExprStatus, Operator};
pub use flags::{BlockFlags, FlagStack};
pub use function::{FuncId, Function, Local, LocalKind};
pub use labels::{Label, LabelTable};
pub use program::{MAIN, NameTable, Program, READ};
pub use state::{ChunkStatus, ExitLabel, ParserState};

// Re-export the shared types for convenience
pub use bcc_core::{CompilerOptions, Limits, ParseError, ParseErrorKind, PosixMode, PosixViolation, Span};
