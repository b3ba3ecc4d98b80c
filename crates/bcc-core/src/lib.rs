//! Shared types for the bc compiler crates.
//!
//! - [`Span`]: source positions
//! - [`ParseError`], [`LexError`]: the error taxonomy
//! - [`CompilerOptions`]: POSIX strictness and table limits

mod config;
mod error;
mod span;

pub use config::{CompilerOptions, Limits, PosixMode};
pub use error::{ErrorCategory, LexError, ParseError, ParseErrorKind, PosixViolation};
pub use span::Span;
