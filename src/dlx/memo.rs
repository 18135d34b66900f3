//! Depth-scoped duplicate suppression.
//!
//! The search keeps one token set per active recursion depth. Going one level deeper
//! starts from a copy of the parent's set, so tokens recorded by ancestors (and by the
//! earlier siblings of an ancestor) stay visible, while anything recorded below a sibling
//! disappears when that sibling's frame returns.
//!
//! Hooks reach this only through the `&mut Memo` handed to
//! [`SearchHooks::on_row_selected`](crate::dlx::SearchHooks::on_row_selected), so there
//! is no way to record a token outside of an active search.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Token stack plus the "current branch is invalid" flag.
#[derive(Debug, Clone)]
pub struct Memo<T> {
    levels: Vec<FxHashSet<T>>,
    invalid: bool,
}

impl<T: Eq + Hash + Clone> Memo<T> {
    pub(crate) fn new() -> Self {
        Self {
            levels: vec![FxHashSet::default()],
            invalid: false,
        }
    }

    /// Records `token` at the current depth.
    ///
    /// If the same token is already visible at this depth the branch that was just
    /// selected is marked invalid and `false` is returned.
    pub fn remember(&mut self, token: T) -> bool {
        let fresh = self.top_mut().insert(token);
        if !fresh {
            self.invalid = true;
        }
        fresh
    }

    /// Whether `token` is visible at the current depth.
    #[must_use]
    pub fn contains(&self, token: &T) -> bool {
        self.levels.last().is_some_and(|level| level.contains(token))
    }

    /// Marks the branch that was just selected as a dead end. The search will not descend
    /// into it, but still backtracks out of it normally.
    pub fn mark_invalid(&mut self) {
        self.invalid = true;
    }

    /// Whether the current branch has been marked invalid.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Number of token sets on the stack; the root level counts as one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn descend(&mut self) {
        let copy = self.levels.last().cloned().unwrap_or_default();
        self.levels.push(copy);
    }

    pub(crate) fn ascend(&mut self) {
        self.levels.pop();
        debug_assert!(!self.levels.is_empty(), "popped the root memo level");
    }

    /// Clears the invalid flag, returning whether it was set.
    pub(crate) fn take_invalid(&mut self) -> bool {
        std::mem::take(&mut self.invalid)
    }

    fn top_mut(&mut self) -> &mut FxHashSet<T> {
        if self.levels.is_empty() {
            self.levels.push(FxHashSet::default());
        }
        let last = self.levels.len() - 1;
        &mut self.levels[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_same_depth() {
        let mut memo = Memo::new();
        assert!(memo.remember((1, 2)));
        assert!(!memo.is_invalid());
        assert!(!memo.remember((1, 2)));
        assert!(memo.is_invalid());
        assert!(memo.take_invalid());
        assert!(!memo.is_invalid());
    }

    #[test]
    fn test_descend_copies_parent() {
        let mut memo = Memo::new();
        memo.remember("a");
        memo.descend();
        assert_eq!(memo.depth(), 2);
        assert!(memo.contains(&"a"));
        assert!(!memo.remember("a"));
    }

    #[test]
    fn test_ascend_forgets_child_tokens() {
        let mut memo = Memo::new();
        memo.descend();
        memo.remember("deep");
        memo.ascend();
        assert!(!memo.contains(&"deep"));
        assert!(memo.remember("deep"));
        assert!(!memo.is_invalid());
    }

    #[test]
    fn test_mark_invalid() {
        let mut memo: Memo<u8> = Memo::new();
        memo.mark_invalid();
        assert!(memo.is_invalid());
        assert!(memo.take_invalid());
        assert!(!memo.take_invalid());
    }
}
