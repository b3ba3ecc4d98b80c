// tests/test_harness.rs
//! Test harness for the bc compiler integration tests.
//!
//! Loads `.bc` files from `test_scripts/`, compiles them whole or line by
//! line, and offers a few checks over the resulting bytecode.

#![allow(dead_code)]

use bcc::*;
use std::fs;
use std::path::PathBuf;

/// Outcome of compiling one script.
pub struct TestResult {
    pub program: Option<Program>,
    pub error: Option<ParseError>,
    pub source: String,
}

/// Loads and compiles scripts from the test_scripts directory.
pub struct TestHarness {
    test_scripts_dir: PathBuf,
    options: CompilerOptions,
}

impl TestHarness {
    pub fn new() -> Self {
        let test_scripts_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_scripts");
        Self {
            test_scripts_dir,
            options: CompilerOptions::default(),
        }
    }

    pub fn with_posix(mut self, posix: PosixMode) -> Self {
        self.options = self.options.with_posix(posix);
        self
    }

    pub fn load(&self, filename: &str) -> String {
        let path = self.test_scripts_dir.join(filename);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Compile a script in one call.
    pub fn compile(&self, filename: &str) -> TestResult {
        let source = self.load(filename);
        match bcc::compile(&source, self.options) {
            Ok(program) => TestResult {
                program: Some(program),
                error: None,
                source,
            },
            Err(error) => TestResult {
                program: None,
                error: Some(error),
                source,
            },
        }
    }

    /// Compile a script one line at a time, the way an interactive session
    /// feeds it.
    pub fn compile_lines(&self, filename: &str) -> TestResult {
        let source = self.load(filename);
        let mut state = ParserState::new(self.options);

        for line in source.split_inclusive('\n') {
            match state.compile(line) {
                Ok(ChunkStatus::Quit) => break,
                Ok(_) => {}
                Err(error) => {
                    return TestResult {
                        program: None,
                        error: Some(error),
                        source,
                    };
                }
            }
        }

        let error = state.finish().err();
        TestResult {
            program: error.is_none().then(|| state.into_program()),
            error,
            source,
        }
    }
}

impl TestResult {
    /// Assert that compilation succeeded.
    pub fn assert_success(&self) -> &Program {
        match (&self.program, &self.error) {
            (Some(program), _) => program,
            (None, Some(err)) => {
                eprintln!("Source:\n{}", self.source);
                panic!("Expected successful compile, got {}", err.display_with_source(&self.source));
            }
            (None, None) => panic!("no program and no error"),
        }
    }

    /// Assert that compilation failed with `kind`.
    pub fn assert_error(&self, kind: ParseErrorKind) -> &ParseError {
        match &self.error {
            Some(err) => {
                assert_eq!(err.kind, kind, "{}", err.display_with_source(&self.source));
                err
            }
            None => panic!("Expected {kind:?}, but the script compiled"),
        }
    }
}

/// Look up a defined function by name.
pub fn function<'a>(program: &'a Program, name: &str) -> &'a Function {
    let id = program
        .lookup_function(name)
        .unwrap_or_else(|| panic!("no function named {name}"));
    program.function(id).unwrap_or_else(|| panic!("bad function id {id}"))
}

/// Count the instructions of `op` in a function.
pub fn count_op(function: &Function, op: OpCode) -> usize {
    function.code.opcodes().iter().filter(|&&o| o == op).count()
}

/// Check that every jump in `function` targets a resolved label inside
/// the code.
pub fn assert_jumps_resolved(function: &Function) {
    for inst in function.code.instructions() {
        if matches!(inst.op, OpCode::Jump | OpCode::JumpZero) {
            let label = inst.operands[0];
            assert!(
                !function.labels.is_pending(label),
                "{}: {} at {} targets pending label {label}",
                function.name,
                inst.op.name(),
                inst.offset
            );
            assert!(function.labels.target(label) <= function.code.len());
        }
    }
}

/// Net number of values an expression leaves on the stack.
pub fn stack_effect(code: &[Instruction]) -> isize {
    code.iter()
        .map(|inst| match inst.op {
            OpCode::Num
            | OpCode::Str
            | OpCode::Var
            | OpCode::Array
            | OpCode::Zero
            | OpCode::One
            | OpCode::Last
            | OpCode::Ibase
            | OpCode::Obase
            | OpCode::Scale
            | OpCode::Seed
            | OpCode::Read
            | OpCode::Rand
            | OpCode::MaxIbase
            | OpCode::MaxObase
            | OpCode::MaxScale
            | OpCode::MaxRand
            | OpCode::LineLength
            | OpCode::GlobalStacks
            | OpCode::LeadingZero => 1,
            OpCode::Inc
            | OpCode::Dec
            | OpCode::Neg
            | OpCode::BoolNot
            | OpCode::Trunc
            | OpCode::ArrayElem
            | OpCode::Length
            | OpCode::ScaleFunc
            | OpCode::Sqrt
            | OpCode::Abs
            | OpCode::Irand
            | OpCode::Asciify
            | OpCode::Swap
            | OpCode::Divmod => 0,
            OpCode::Modexp => -2,
            OpCode::Call => 1 - inst.operands[0] as isize,
            op if op.is_no_val() => -2,
            _ => -1,
        })
        .sum()
}
