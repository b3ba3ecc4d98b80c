//! Constant pool for compiled programs.
//!
//! Number literals are kept as source text; the numeric engine parses them
//! at run time under the `ibase` in effect. Strings are kept verbatim.

use rustc_hash::FxHashMap;

/// Values stored in the constant pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Number literal text, line continuations removed.
    Number(String),
    /// String literal contents, without quotes.
    String(String),
}

impl Constant {
    /// The stored text.
    pub fn text(&self) -> &str {
        match self {
            Constant::Number(text) | Constant::String(text) => text,
        }
    }
}

/// Program-level constant pool with deduplication.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    /// The actual constants.
    constants: Vec<Constant>,
    /// Deduplication index: maps constant to its index.
    index: FxHashMap<Constant, usize>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get existing constant, returns index.
    pub fn add(&mut self, constant: Constant) -> usize {
        if let Some(&idx) = self.index.get(&constant) {
            return idx;
        }

        let idx = self.constants.len();
        self.constants.push(constant.clone());
        self.index.insert(constant, idx);
        idx
    }

    /// Index of an already interned constant.
    pub fn find(&self, constant: &Constant) -> Option<usize> {
        self.index.get(constant).copied()
    }

    pub fn add_number(&mut self, text: impl Into<String>) -> usize {
        self.add(Constant::Number(text.into()))
    }

    pub fn add_string(&mut self, text: impl Into<String>) -> usize {
        self.add(Constant::String(text.into()))
    }

    /// Get constant by index.
    pub fn get(&self, index: usize) -> Option<&Constant> {
        self.constants.get(index)
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_is_empty() {
        let pool = ConstantPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.get(0), None);
    }

    #[test]
    fn deduplication() {
        let mut pool = ConstantPool::new();
        let a = pool.add_number("42");
        let b = pool.add_number("42");
        let c = pool.add_number("4.2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn numbers_and_strings_are_distinct() {
        let mut pool = ConstantPool::new();
        let num = pool.add_number("10");
        let string = pool.add_string("10");
        assert_ne!(num, string);
        assert_eq!(pool.get(string), Some(&Constant::String("10".to_string())));
        assert_eq!(pool.get(num).map(Constant::text), Some("10"));
    }

    #[test]
    fn find_does_not_insert() {
        let mut pool = ConstantPool::new();
        assert_eq!(pool.find(&Constant::Number("7".into())), None);
        let idx = pool.add_number("7");
        assert_eq!(pool.find(&Constant::Number("7".into())), Some(idx));
        assert_eq!(pool.constants().len(), 1);
    }
}
