//! Compiled functions.

use crate::bytecode::BytecodeChunk;
use crate::labels::LabelTable;

/// Index of a function in the program's function table.
pub type FuncId = usize;

/// How a parameter or auto binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalKind {
    Scalar,
    /// A copied array (`a[]`).
    Array,
    /// An array passed by reference (`*a[]`).
    Reference,
}

impl LocalKind {
    /// Arrays and references share the array namespace.
    pub fn is_array(self) -> bool {
        !matches!(self, LocalKind::Scalar)
    }
}

/// A parameter or auto variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Local {
    /// Index into the program's variable or array names.
    pub index: usize,
    pub kind: LocalKind,
}

/// One function: main, the read function, or a `define`d function.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub code: BytecodeChunk,
    pub labels: LabelTable,
    /// Parameters first, then autos.
    pub locals: Vec<Local>,
    pub nparams: usize,
    pub is_void: bool,
    /// `false` for placeholders created by a call before the definition.
    pub defined: bool,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: BytecodeChunk::new(),
            labels: LabelTable::new(),
            locals: Vec::new(),
            nparams: 0,
            is_void: false,
            defined: false,
        }
    }

    /// Clear the body and signature for a (re)definition.
    pub fn reset(&mut self) {
        self.code = BytecodeChunk::new();
        self.labels.clear();
        self.locals.clear();
        self.nparams = 0;
        self.is_void = false;
    }

    pub fn params(&self) -> &[Local] {
        &self.locals[..self.nparams.min(self.locals.len())]
    }

    pub fn autos(&self) -> &[Local] {
        &self.locals[self.nparams.min(self.locals.len())..]
    }

    /// Add a local. Returns `false` if the same name and namespace is
    /// already declared.
    pub fn insert_local(&mut self, local: Local) -> bool {
        let duplicate = self
            .locals
            .iter()
            .any(|l| l.index == local.index && l.kind.is_array() == local.kind.is_array());
        if duplicate {
            return false;
        }
        self.locals.push(local);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locals_split_into_params_and_autos() {
        let mut func = Function::new("f");
        assert!(func.insert_local(Local {
            index: 0,
            kind: LocalKind::Scalar
        }));
        func.nparams = 1;
        assert!(func.insert_local(Local {
            index: 1,
            kind: LocalKind::Array
        }));
        assert_eq!(func.params().len(), 1);
        assert_eq!(func.autos()[0].kind, LocalKind::Array);
    }

    #[test]
    fn duplicates_are_per_namespace() {
        let mut func = Function::new("f");
        let scalar = Local {
            index: 3,
            kind: LocalKind::Scalar,
        };
        assert!(func.insert_local(scalar));
        assert!(!func.insert_local(scalar));
        // `x` and `x[]` are different names
        assert!(func.insert_local(Local {
            index: 3,
            kind: LocalKind::Array
        }));
        assert!(!func.insert_local(Local {
            index: 3,
            kind: LocalKind::Reference
        }));
    }

    #[test]
    fn reset_clears_body() {
        let mut func = Function::new("f");
        func.code.write_op(crate::bytecode::OpCode::Ret0, 1);
        func.labels.create_pending();
        func.is_void = true;
        func.reset();
        assert!(func.code.is_empty());
        assert!(func.labels.is_empty());
        assert!(!func.is_void);
        assert_eq!(func.name, "f");
    }
}
