//! Callbacks a collaborator plugs into the search.
//!
//! Every method has a default, so implementors only override what they need. The unit
//! type `()` is the "no hooks" implementation: it enumerates every solution and does
//! nothing else.

use crate::dlx::memo::Memo;
use std::hash::Hash;

/// Notification and pruning hooks invoked by [`crate::dlx::Dlx::solve`].
pub trait SearchHooks<A> {
    /// Token type recorded with [`Memo::remember`]. Use `()` if the hooks never prune by
    /// token.
    type Token: Eq + Hash + Clone;

    /// Called right after `action` joined the partial solution.
    ///
    /// This is the place to update auxiliary state (a partially filled board, say) and
    /// to prune: [`Memo::mark_invalid`] rejects the branch outright, and
    /// [`Memo::remember`] rejects it if the same token was already recorded at this
    /// depth. A rejected branch is not searched any further, but
    /// [`Self::on_row_deselected`] is still called for it.
    fn on_row_selected(&mut self, action: &A, memo: &mut Memo<Self::Token>) {
        let _ = (action, memo);
    }

    /// Called right after `action` left the partial solution.
    fn on_row_deselected(&mut self, action: &A) {
        let _ = action;
    }

    /// Called once per complete solution, in discovery order. Returning `false` stops the
    /// whole search.
    fn on_solution(&mut self, solution: &[A]) -> bool {
        let _ = solution;
        true
    }

    /// Called exactly once, after the search has fully unwound.
    fn on_finished(&mut self, solutions: &[Vec<A>]) {
        let _ = solutions;
    }
}

impl<A> SearchHooks<A> for () {
    type Token = ();
}

impl<A, H: SearchHooks<A> + ?Sized> SearchHooks<A> for &mut H {
    type Token = H::Token;

    fn on_row_selected(&mut self, action: &A, memo: &mut Memo<Self::Token>) {
        (**self).on_row_selected(action, memo);
    }

    fn on_row_deselected(&mut self, action: &A) {
        (**self).on_row_deselected(action);
    }

    fn on_solution(&mut self, solution: &[A]) -> bool {
        (**self).on_solution(solution)
    }

    fn on_finished(&mut self, solutions: &[Vec<A>]) {
        (**self).on_finished(solutions);
    }
}

/// Stops the search once `limit` solutions have been found, delegating everything else
/// to the wrapped hooks.
///
/// The wrapped hooks can still stop the search earlier by returning `false` from
/// `on_solution`.
#[derive(Debug, Clone)]
pub struct SolutionLimit<H> {
    inner: H,
    limit: usize,
    found: usize,
}

impl<H> SolutionLimit<H> {
    /// Wraps `inner`. A limit of zero behaves like a limit of one, since the first solution
    /// is always reported before the limit is checked.
    pub const fn new(inner: H, limit: usize) -> Self {
        Self {
            inner,
            limit,
            found: 0,
        }
    }

    /// Solutions seen so far.
    #[must_use]
    pub const fn found(&self) -> usize {
        self.found
    }

    /// Unwraps the inner hooks.
    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<A, H: SearchHooks<A>> SearchHooks<A> for SolutionLimit<H> {
    type Token = H::Token;

    fn on_row_selected(&mut self, action: &A, memo: &mut Memo<Self::Token>) {
        self.inner.on_row_selected(action, memo);
    }

    fn on_row_deselected(&mut self, action: &A) {
        self.inner.on_row_deselected(action);
    }

    fn on_solution(&mut self, solution: &[A]) -> bool {
        self.found += 1;
        self.inner.on_solution(solution) && self.found < self.limit
    }

    fn on_finished(&mut self, solutions: &[Vec<A>]) {
        self.inner.on_finished(solutions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        solutions: usize,
    }

    impl SearchHooks<u8> for Counting {
        type Token = ();

        fn on_solution(&mut self, _: &[u8]) -> bool {
            self.solutions += 1;
            true
        }
    }

    #[test]
    fn test_unit_hooks_continue() {
        assert!(SearchHooks::<u8>::on_solution(&mut (), &[1, 2]));
    }

    #[test]
    fn test_solution_limit() {
        let mut hooks = SolutionLimit::new(Counting::default(), 2);
        assert!(SearchHooks::<u8>::on_solution(&mut hooks, &[1]));
        assert!(!SearchHooks::<u8>::on_solution(&mut hooks, &[2]));
        assert_eq!(hooks.found(), 2);
        assert_eq!(hooks.into_inner().solutions, 2);
    }

    #[test]
    fn test_solution_limit_zero_stops_at_first() {
        let mut hooks = SolutionLimit::new((), 0);
        assert!(!SearchHooks::<u8>::on_solution(&mut hooks, &[1]));
    }

    #[test]
    fn test_mut_reference_forwards() {
        let mut counting = Counting::default();
        {
            let mut by_ref = &mut counting;
            assert!(SearchHooks::<u8>::on_solution(&mut by_ref, &[3]));
        }
        assert_eq!(counting.solutions, 1);
    }
}
