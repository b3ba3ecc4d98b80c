//! Per-function label tables.
//!
//! Jump instructions carry a label index rather than a code offset. A label
//! is either created at a known offset (loop heads, `for` update and body
//! entry points) or created pending and backpatched once the end of the
//! guarded code is reached.

/// A jump target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Target code offset.
    Known(usize),
    /// Not yet backpatched.
    Pending,
}

/// The labels of one function, indexed by jump operands.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    labels: Vec<Label>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a label pointing at `offset`.
    pub fn create_known(&mut self, offset: usize) -> usize {
        self.labels.push(Label::Known(offset));
        self.labels.len() - 1
    }

    /// Create a label whose target is filled in later by [`resolve`](Self::resolve).
    pub fn create_pending(&mut self) -> usize {
        self.labels.push(Label::Pending);
        self.labels.len() - 1
    }

    /// Backpatch a pending label.
    ///
    /// # Panics
    ///
    /// Panics if the label does not exist or was already resolved.
    pub fn resolve(&mut self, index: usize, offset: usize) {
        match self.labels.get_mut(index) {
            Some(label @ Label::Pending) => *label = Label::Known(offset),
            Some(Label::Known(target)) => {
                panic!("label {index} already resolved to {target}")
            }
            None => panic!("label {index} does not exist"),
        }
    }

    /// The target offset of a label.
    ///
    /// # Panics
    ///
    /// Panics if the label is still pending.
    #[track_caller]
    pub fn target(&self, index: usize) -> usize {
        match self.labels.get(index) {
            Some(Label::Known(target)) => *target,
            Some(Label::Pending) => panic!("label {index} read before it was resolved"),
            None => panic!("label {index} does not exist"),
        }
    }

    pub fn get(&self, index: usize) -> Option<Label> {
        self.labels.get(index).copied()
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.get(index) == Some(Label::Pending)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.labels.iter().copied()
    }

    /// Drop labels created after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.labels.truncate(len);
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels() {
        let mut table = LabelTable::new();
        let a = table.create_known(0);
        let b = table.create_known(12);
        assert_eq!((a, b), (0, 1));
        assert_eq!(table.target(b), 12);
        assert!(!table.is_pending(a));
    }

    #[test]
    fn pending_then_resolved() {
        let mut table = LabelTable::new();
        let exit = table.create_pending();
        assert!(table.is_pending(exit));
        assert_eq!(table.get(exit), Some(Label::Pending));

        table.resolve(exit, 40);
        assert_eq!(table.target(exit), 40);
    }

    #[test]
    #[should_panic(expected = "read before it was resolved")]
    fn reading_pending_label_panics() {
        let mut table = LabelTable::new();
        let exit = table.create_pending();
        table.target(exit);
    }

    #[test]
    #[should_panic(expected = "already resolved")]
    fn resolving_twice_panics() {
        let mut table = LabelTable::new();
        let exit = table.create_pending();
        table.resolve(exit, 1);
        table.resolve(exit, 2);
    }

    #[test]
    fn truncate_drops_newer_labels() {
        let mut table = LabelTable::new();
        table.create_known(0);
        table.create_pending();
        table.create_pending();
        table.truncate(1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![Label::Known(0)]);
        table.clear();
        assert!(table.is_empty());
    }
}
