//! Lexical analysis for bc.
//!
//! The [`Lexer`] turns source text into [`Token`]s that borrow from the
//! source. Newlines are tokens; POSIX notices are collected according to
//! the [`PosixMode`](bcc_core::PosixMode) the lexer was created with.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind, lookup_keyword};
