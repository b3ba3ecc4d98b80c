//! bcc: a compiler from bc source to stack bytecode.
//!
//! For interactive use, drive a [`ParserState`] chunk by chunk. For a
//! whole file, [`compile`] does it in one call.
//!
//! ```
//! use bcc::{CompilerOptions, OpCode, compile};
//!
//! let program = compile("x = 2 ^ 3\nx\n", CompilerOptions::default()).unwrap();
//! assert_eq!(program.main().code.last_op(), Some(OpCode::Print));
//! ```

pub use bcc_compiler::*;
pub use bcc_lexer::{Lexer, Token, TokenKind};

pub use bcc_core::{ErrorCategory, LexError};

/// Compile a complete program.
///
/// The source is compiled as a single chunk and then finished, so a
/// trailing `if` is closed and an unclosed brace is an error. Compilation
/// stops at `quit`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(source: &str, options: CompilerOptions) -> Result<Program, ParseError> {
    let mut state = ParserState::new(options);
    let status = state.compile(source)?;
    if status != ChunkStatus::Quit {
        state.finish()?;
    }
    Ok(state.into_program())
}

/// Compile `source` and render every defined function as a listing.
pub fn disassemble_source(source: &str, options: CompilerOptions) -> Result<String, ParseError> {
    let program = compile(source, options)?;
    let mut out = String::new();
    for (id, func) in program.functions().iter().enumerate() {
        if id == MAIN || func.defined {
            out.push_str(&disassemble(func, &program));
        }
    }
    Ok(out)
}
