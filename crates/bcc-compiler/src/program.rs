//! The program: functions, names and constants shared by all functions.
//!
//! The program outlives individual compile calls. Functions are stored in
//! an arena indexed by [`FuncId`]; a call to an unknown name creates a
//! placeholder entry that a later `define` fills in.

use bcc_core::{Limits, ParseError, ParseErrorKind, Span};
use rustc_hash::FxHashMap;

use crate::bytecode::{Constant, ConstantPool};
use crate::function::{FuncId, Function};

/// Id of the top-level code.
pub const MAIN: FuncId = 0;
/// Id of the function holding the expression typed for `read()`.
pub const READ: FuncId = 1;

/// Interned names, indexed by first appearance.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `name`, inserting it if there is room for `max` names.
    pub fn intern(&mut self, name: &str, max: usize) -> Option<usize> {
        if let Some(&idx) = self.index.get(name) {
            return Some(idx);
        }
        if self.names.len() >= max {
            return None;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        Some(idx)
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Everything the compiler produces for one session.
#[derive(Debug, Clone)]
pub struct Program {
    functions: Vec<Function>,
    fn_map: FxHashMap<String, FuncId>,
    vars: NameTable,
    arrays: NameTable,
    constants: ConstantPool,
    limits: Limits,
}

impl Default for Program {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl Program {
    /// A program holding only the main and read functions.
    pub fn new(limits: Limits) -> Self {
        let mut program = Self {
            functions: Vec::new(),
            fn_map: FxHashMap::default(),
            vars: NameTable::new(),
            arrays: NameTable::new(),
            constants: ConstantPool::new(),
            limits,
        };

        for name in ["(main)", "(read)"] {
            let mut func = Function::new(name);
            func.defined = true;
            program.fn_map.insert(name.to_string(), program.functions.len());
            program.functions.push(func);
        }

        program
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Id of the function called `name`, creating a placeholder if needed.
    pub fn function_id(&mut self, name: &str, span: Span) -> Result<FuncId, ParseError> {
        if let Some(&id) = self.fn_map.get(name) {
            return Ok(id);
        }
        if self.functions.len() >= self.limits.max_functions {
            return Err(ParseError::with_name(
                ParseErrorKind::TooManyFunctions,
                span,
                name,
            ));
        }

        let id = self.functions.len();
        log::trace!("new function entry {name} = {id}");
        self.functions.push(Function::new(name));
        self.fn_map.insert(name.to_string(), id);
        Ok(id)
    }

    /// Id of an existing function.
    pub fn lookup_function(&self, name: &str) -> Option<FuncId> {
        self.fn_map.get(name).copied()
    }

    pub fn function(&self, id: FuncId) -> Option<&Function> {
        self.functions.get(id)
    }

    pub fn function_mut(&mut self, id: FuncId) -> Option<&mut Function> {
        self.functions.get_mut(id)
    }

    /// Function by id. Ids handed out by this program are always valid.
    pub(crate) fn func_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id]
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// The top-level code.
    pub fn main(&self) -> &Function {
        &self.functions[MAIN]
    }

    // =========================================================================
    // Names and constants
    // =========================================================================

    pub fn var_index(&mut self, name: &str, span: Span) -> Result<usize, ParseError> {
        self.vars
            .intern(name, self.limits.max_vars)
            .ok_or_else(|| ParseError::with_name(ParseErrorKind::TooManyVariables, span, name))
    }

    pub fn array_index(&mut self, name: &str, span: Span) -> Result<usize, ParseError> {
        self.arrays
            .intern(name, self.limits.max_arrays)
            .ok_or_else(|| ParseError::with_name(ParseErrorKind::TooManyArrays, span, name))
    }

    pub fn add_number(&mut self, text: &str, span: Span) -> Result<usize, ParseError> {
        self.intern_constant(Constant::Number(text.to_string()), span)
    }

    pub fn add_string(&mut self, text: &str, span: Span) -> Result<usize, ParseError> {
        self.intern_constant(Constant::String(text.to_string()), span)
    }

    fn intern_constant(&mut self, constant: Constant, span: Span) -> Result<usize, ParseError> {
        if let Some(idx) = self.constants.find(&constant) {
            return Ok(idx);
        }
        if self.constants.len() >= self.limits.max_constants {
            return Err(ParseError::with_name(
                ParseErrorKind::TooManyConstants,
                span,
                constant.text(),
            ));
        }
        Ok(self.constants.add(constant))
    }

    pub fn vars(&self) -> &NameTable {
        &self.vars
    }

    pub fn arrays(&self) -> &NameTable {
        &self.arrays
    }

    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }
}
