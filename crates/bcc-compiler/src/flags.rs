//! Block flags and the flags stack.
//!
//! One entry is pushed for every body being compiled: function bodies,
//! loop and `if`/`else` bodies, and brace blocks. The bottom entry stands
//! for the top level and is never popped.

use bitflags::bitflags;

bitflags! {
    /// What opened a body and what it still expects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BlockFlags: u16 {
        /// The body is a `{ ... }` block and needs its closing brace.
        const BRACE = 1 << 0;
        /// The function body itself, as opposed to blocks nested in it.
        const FUNC_INNER = 1 << 1;
        /// Somewhere inside a function.
        const FUNC = 1 << 2;
        /// A statement or `{` must follow before the body is complete.
        const BODY = 1 << 3;
        /// Somewhere inside a loop.
        const LOOP = 1 << 4;
        /// The loop body itself.
        const LOOP_INNER = 1 << 5;
        /// An `if` body.
        const IF = 1 << 6;
        /// An `else` body.
        const ELSE = 1 << 7;
        /// An `if` body just ended; an `else` may still follow.
        const IF_END = 1 << 8;
    }
}

/// Stack of [`BlockFlags`], never empty.
#[derive(Debug, Clone)]
pub struct FlagStack {
    stack: Vec<BlockFlags>,
}

impl Default for FlagStack {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagStack {
    /// A stack holding only the top-level entry.
    pub fn new() -> Self {
        Self {
            stack: vec![BlockFlags::empty()],
        }
    }

    #[inline]
    pub fn top(&self) -> BlockFlags {
        self.stack.last().copied().unwrap_or_default()
    }

    /// Check whether the top entry has any of `flags`.
    #[inline]
    pub fn top_has(&self, flags: BlockFlags) -> bool {
        self.top().intersects(flags)
    }

    pub fn set_top(&mut self, flags: BlockFlags) {
        if let Some(top) = self.stack.last_mut() {
            *top = flags;
        }
    }

    /// Add flags to the top entry.
    pub fn insert_top(&mut self, flags: BlockFlags) {
        if let Some(top) = self.stack.last_mut() {
            top.insert(flags);
        }
    }

    /// Clear flags on the top entry.
    pub fn remove_top(&mut self, flags: BlockFlags) {
        if let Some(top) = self.stack.last_mut() {
            top.remove(flags);
        }
    }

    pub fn push(&mut self, flags: BlockFlags) {
        self.stack.push(flags);
    }

    /// Pop the top entry. The top-level entry stays.
    pub fn pop(&mut self) -> Option<BlockFlags> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Only the top-level entry is left.
    pub fn is_top_level(&self) -> bool {
        self.stack.len() == 1
    }

    /// Code at this point can run as soon as the statement ends: nothing is
    /// open and no `else` is being waited for.
    pub fn can_exec(&self) -> bool {
        self.is_top_level() && self.top().is_empty()
    }

    /// Entries from the top down.
    pub fn iter_from_top(&self) -> impl Iterator<Item = BlockFlags> + '_ {
        self.stack.iter().rev().copied()
    }

    /// Drop everything but the top-level entry and clear it.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        self.set_top(BlockFlags::empty());
    }
}
