//! Persistent compiler state.
//!
//! A [`ParserState`] lives for a whole session. Each call to
//! [`ParserState::compile`] lexes one chunk of source and continues where
//! the previous chunk stopped: an unfinished `if`, loop or function body
//! simply stays open on the flags stack until a later chunk closes it.

use bcc_core::{CompilerOptions, ParseError, PosixMode, PosixViolation, Span};

use crate::expr::Operator;
use crate::flags::FlagStack;
use crate::function::FuncId;
use crate::parser::Parser;
use crate::program::{MAIN, Program, READ};

/// What the driver may do after a chunk was compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStatus {
    /// Every statement is closed; main's code can run.
    Ready,
    /// A body, block or trailing `if` is still open.
    Incomplete,
    /// `quit` was compiled. Nothing after it was looked at.
    Quit,
}

/// A pending exit label: the end of an `if`, `else` or loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitLabel {
    /// Index into the current function's label table.
    pub label: usize,
    /// Loop exits are the targets of `break`.
    pub is_loop: bool,
}

/// Main's code and labels as of the last complete top-level statement.
#[derive(Debug, Clone, Copy, Default)]
struct Checkpoint {
    code: usize,
    labels: usize,
}

/// Compiler state shared by every chunk of a session.
#[derive(Debug)]
pub struct ParserState {
    pub(crate) program: Program,
    pub(crate) options: CompilerOptions,
    pub(crate) flags: FlagStack,
    pub(crate) exits: Vec<ExitLabel>,
    /// `continue` targets, innermost loop last.
    pub(crate) conds: Vec<usize>,
    /// Shunting-Yard working stack.
    pub(crate) ops: Vec<Operator>,
    /// Function receiving code.
    pub(crate) fidx: FuncId,
    /// `auto` is still allowed in the current function body.
    pub(crate) auto_part: bool,
    warnings: Vec<ParseError>,
    checkpoint: Checkpoint,
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

impl ParserState {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            program: Program::new(options.limits),
            options,
            flags: FlagStack::new(),
            exits: Vec::new(),
            conds: Vec::new(),
            ops: Vec::new(),
            fidx: MAIN,
            auto_part: false,
            warnings: Vec::new(),
            checkpoint: Checkpoint::default(),
        }
    }

    /// Compile a chunk of source.
    ///
    /// On error the state is reset to the last complete top-level
    /// statement before the error is returned, so the next chunk starts
    /// clean.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&mut self, source: &str) -> Result<ChunkStatus, ParseError> {
        let result = Parser::new(source, self).run();
        if let Err(err) = &result {
            log::debug!("compile failed: {err}");
            self.reset();
        }
        result
    }

    /// Compile the text typed in answer to `read()` into the read function.
    ///
    /// The text must be a single expression; `read()` inside it is an
    /// error.
    pub fn compile_read(&mut self, line: &str) -> Result<(), ParseError> {
        self.program.func_mut(READ).reset();
        self.fidx = READ;
        let result = Parser::new(line, self).run_read();
        if result.is_err() {
            self.program.func_mut(READ).reset();
            self.ops.clear();
        }
        self.fidx = MAIN;
        result
    }

    /// End of input: close a trailing `if` that never got an `else`.
    ///
    /// Fails with [`BlockEnd`](bcc_core::ParseErrorKind::BlockEnd) if a brace or function body
    /// is still open.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        let result = Parser::new("", self).run_finish();
        match result {
            Ok(()) => {
                self.commit();
                Ok(())
            }
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    /// Throw away the statement in progress.
    ///
    /// Main loses everything after the last complete top-level statement.
    /// A function being defined loses its body. Functions finished earlier
    /// and placeholders for forward calls are kept.
    pub fn reset(&mut self) {
        if self.fidx != MAIN {
            let func = self.program.func_mut(self.fidx);
            log::debug!("discarding partial definition of {}", func.name);
            func.reset();
            func.defined = false;
            self.fidx = MAIN;
        }

        let main = self.program.func_mut(MAIN);
        main.code.truncate(self.checkpoint.code);
        main.labels.truncate(self.checkpoint.labels);

        self.flags.reset();
        self.exits.clear();
        self.conds.clear();
        self.ops.clear();
        self.auto_part = false;
    }

    /// Record main's current length as complete if nothing is open.
    pub(crate) fn commit(&mut self) {
        if self.is_ready() {
            let main = self.program.main();
            self.checkpoint = Checkpoint {
                code: main.code.len(),
                labels: main.labels.len(),
            };
        }
    }

    fn is_ready(&self) -> bool {
        self.fidx == MAIN && self.flags.can_exec()
    }

    pub(crate) fn status(&self) -> ChunkStatus {
        if self.is_ready() {
            ChunkStatus::Ready
        } else {
            ChunkStatus::Incomplete
        }
    }

    /// More input is needed before main's code can run.
    pub fn needs_more_input(&self) -> bool {
        !self.is_ready()
    }

    /// Report a POSIX violation according to the configured mode.
    pub(crate) fn posix(&mut self, violation: PosixViolation, span: Span) -> Result<(), ParseError> {
        match self.options.posix {
            PosixMode::Off => Ok(()),
            PosixMode::Warn => {
                let warning = ParseError::posix(violation, span);
                log::warn!("{warning}");
                self.warnings.push(warning);
                Ok(())
            }
            PosixMode::Error => Err(ParseError::posix(violation, span)),
        }
    }

    pub(crate) fn push_warning(&mut self, warning: ParseError) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Take the POSIX warnings recorded so far.
    pub fn take_warnings(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.warnings)
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn into_program(self) -> Program {
        self.program
    }
}
