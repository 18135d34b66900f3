#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Algorithm X over the dancing-links [`Matrix`].
//!
//! The search is a plain recursive depth-first walk:
//! 1.  **Branching:** pick the live mandatory column with the smallest
//!     [`ColumnSelection`] key. If there is none, every mandatory requirement is
//!     covered and the partial solution is complete.
//! 2.  **Trying:** sort the rows currently linked into that column by their
//!     [`RowOrdering`] key and try each in turn: select it, tell the hooks, and recurse
//!     unless the hooks pruned the branch.
//! 3.  **Unwinding:** deselect the row, tell the hooks, and move on to the next
//!     candidate.
//!
//! A hook returning `false` from [`SearchHooks::on_solution`] aborts the search. The
//! abort is propagated straight up through every pending frame without restoring the
//! matrix; the engine is consumed by [`Dlx::solve`], so the half-restored matrix is never
//! observable.

use crate::dlx::error::DlxError;
use crate::dlx::hooks::{SearchHooks, SolutionLimit};
use crate::dlx::matrix::{Matrix, NodeId};
use crate::dlx::memo::Memo;
use crate::dlx::ordering::{ColumnSelection, MinimumRemaining, RowOrdering, StableOrder};
use crate::dlx::problem::ExactCover;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::ControlFlow;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchStats {
    /// Recursive search frames entered, the initial one included.
    pub frames: usize,
    /// Rows selected into the partial solution.
    pub selections: usize,
    /// Selected rows whose subtree was skipped because the hooks marked them invalid.
    pub pruned: usize,
    /// Complete solutions reported.
    pub solutions: usize,
    /// Largest partial solution seen on entry to a frame.
    pub max_depth: usize,
}

/// Outcome of [`Dlx::solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<A> {
    /// Every solution found, in discovery order. Each lists its actions in the order
    /// they were selected.
    pub solutions: Vec<Vec<A>>,
    /// Search counters.
    pub stats: SearchStats,
    /// Whether the hooks stopped the search before the tree was exhausted.
    pub aborted: bool,
}

/// A single-use dancing-links search over requirements `R` and actions `A`.
///
/// `S` picks the branch column and `O` orders the rows tried for it; see
/// [`crate::dlx::ordering`]. Build one with [`ExactCover::solver`] or [`Dlx::build`].
///
/// # Example
///
/// ```
/// use dlx_solver::dlx::{Dlx, FirstColumn};
///
/// let result = Dlx::build(
///     ["x", "y"],
///     [(0, vec!["x"]), (1, vec!["y"]), (2, vec!["x", "y"])],
///     [],
/// )
/// .unwrap()
/// .with_column_selection(FirstColumn)
/// .solve(&mut ());
///
/// assert_eq!(result.solutions, vec![vec![0, 1], vec![2]]);
/// ```
#[derive(Debug, Clone)]
pub struct Dlx<R, A, S = MinimumRemaining, O = StableOrder> {
    matrix: Matrix,
    requirements: Vec<R>,
    actions: Vec<A>,
    column_selection: S,
    row_ordering: O,
    partial: Vec<A>,
    solutions: Vec<Vec<A>>,
    stats: SearchStats,
    outstanding: usize,
}

impl<R, A> Dlx<R, A>
where
    R: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Builds the engine straight from requirement lists and an action table.
    ///
    /// # Errors
    ///
    /// The configuration errors of [`ExactCover::new`] and [`ExactCover::add_action`],
    /// most notably [`DlxError::UnknownRequirement`].
    pub fn build<M, T, Q, O>(mandatory: M, actions: T, optional: O) -> Result<Self, DlxError>
    where
        M: IntoIterator<Item = R>,
        T: IntoIterator<Item = (A, Q)>,
        Q: IntoIterator<Item = R>,
        O: IntoIterator<Item = R>,
    {
        Ok(ExactCover::from_parts(mandatory, actions, optional)?.into_solver())
    }
}

impl<R, A> Dlx<R, A> {
    pub(crate) fn new(matrix: Matrix, requirements: Vec<R>, actions: Vec<A>) -> Self {
        Self {
            matrix,
            requirements,
            actions,
            column_selection: MinimumRemaining,
            row_ordering: StableOrder,
            partial: Vec::new(),
            solutions: Vec::new(),
            stats: SearchStats::default(),
            outstanding: 0,
        }
    }
}

impl<R, A, S, O> Dlx<R, A, S, O> {
    /// Replaces the branch column heuristic.
    pub fn with_column_selection<T>(self, column_selection: T) -> Dlx<R, A, T, O> {
        Dlx {
            matrix: self.matrix,
            requirements: self.requirements,
            actions: self.actions,
            column_selection,
            row_ordering: self.row_ordering,
            partial: self.partial,
            solutions: self.solutions,
            stats: self.stats,
            outstanding: self.outstanding,
        }
    }

    /// Replaces the candidate row ordering.
    pub fn with_row_ordering<T>(self, row_ordering: T) -> Dlx<R, A, S, T> {
        Dlx {
            matrix: self.matrix,
            requirements: self.requirements,
            actions: self.actions,
            column_selection: self.column_selection,
            row_ordering,
            partial: self.partial,
            solutions: self.solutions,
            stats: self.stats,
            outstanding: self.outstanding,
        }
    }

    /// The underlying matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Requirements in column order: mandatory first, then optional.
    #[must_use]
    pub fn requirements(&self) -> &[R] {
        &self.requirements
    }

    /// Actions in row order.
    #[must_use]
    pub fn actions(&self) -> &[A] {
        &self.actions
    }
}

impl<R, A, S, O> Dlx<R, A, S, O>
where
    A: Clone + Debug,
    S: ColumnSelection<R>,
    O: RowOrdering<A>,
{
    /// Runs the search to completion or until the hooks stop it.
    ///
    /// Every solution is passed to [`SearchHooks::on_solution`] as soon as it is found,
    /// and [`SearchHooks::on_finished`] is called exactly once afterwards, aborted or not.
    ///
    /// An instance without mandatory requirements has exactly one solution, the empty
    /// one.
    pub fn solve<H: SearchHooks<A>>(mut self, hooks: &mut H) -> SearchResult<A> {
        let mut memo = Memo::new();
        let aborted = self.search(hooks, &mut memo).is_break();
        debug_assert_eq!(self.outstanding, 0, "search frames left outstanding");

        hooks.on_finished(&self.solutions);
        log::debug!(
            "search {} after {} frames: {} solution(s), {} selection(s), {} pruned",
            if aborted { "stopped" } else { "finished" },
            self.stats.frames,
            self.stats.solutions,
            self.stats.selections,
            self.stats.pruned,
        );

        SearchResult {
            solutions: self.solutions,
            stats: self.stats,
            aborted,
        }
    }

    /// Returns the first solution found, if any.
    pub fn first(self) -> Option<Vec<A>> {
        self.solve(&mut SolutionLimit::new((), 1))
            .solutions
            .into_iter()
            .next()
    }

    fn search<H: SearchHooks<A>>(
        &mut self,
        hooks: &mut H,
        memo: &mut Memo<H::Token>,
    ) -> ControlFlow<()> {
        self.outstanding += 1;
        self.stats.frames += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.partial.len());

        let flow = self.branch(hooks, memo);

        self.outstanding -= 1;
        flow
    }

    fn branch<H: SearchHooks<A>>(
        &mut self,
        hooks: &mut H,
        memo: &mut Memo<H::Token>,
    ) -> ControlFlow<()> {
        let column = self.matrix.best_column(|column, live_rows| {
            self.column_selection
                .key(&self.requirements[column], live_rows)
        });

        let Some(column) = column else {
            return self.record(hooks);
        };

        let mut candidates: SmallVec<[(O::Key, NodeId); 16]> = self
            .matrix
            .column_nodes(column)
            .map(|node| {
                let row = self.matrix.row_of(node);
                (self.row_ordering.key(&self.actions[row]), node)
            })
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        for (_, node) in candidates {
            let row = self.matrix.row_of(node);

            self.matrix.select_row(node);
            self.partial.push(self.actions[row].clone());
            self.stats.selections += 1;
            log::trace!(
                "depth {}: selected {:?}",
                self.partial.len(),
                self.actions[row]
            );
            hooks.on_row_selected(&self.actions[row], memo);

            if memo.take_invalid() {
                self.stats.pruned += 1;
                log::trace!("depth {}: pruned {:?}", self.partial.len(), self.actions[row]);
            } else {
                memo.descend();
                let flow = self.search(hooks, memo);
                memo.ascend();
                if flow.is_break() {
                    return flow;
                }
            }

            self.matrix.deselect_row(node);
            self.partial.pop();
            hooks.on_row_deselected(&self.actions[row]);
        }

        ControlFlow::Continue(())
    }

    fn record<H: SearchHooks<A>>(&mut self, hooks: &mut H) -> ControlFlow<()> {
        self.stats.solutions += 1;
        log::debug!(
            "solution {} with {} action(s)",
            self.stats.solutions,
            self.partial.len()
        );

        self.solutions.push(self.partial.clone());
        if hooks.on_solution(&self.partial) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlx::ordering::{ColumnKey, FirstColumn, RandomOrder, RowKey};
    use itertools::Itertools;
    use proptest::prelude::*;

    fn knuth() -> ExactCover<u8, char> {
        ExactCover::from_parts(
            1..=7,
            [
                ('A', vec![1, 4, 7]),
                ('B', vec![1, 4]),
                ('C', vec![4, 5, 7]),
                ('D', vec![3, 5, 6]),
                ('E', vec![2, 3, 6, 7]),
                ('F', vec![2, 7]),
            ],
            [],
        )
        .unwrap()
    }

    /// Rows and columns mandatory, diagonals optional.
    fn queens(n: usize) -> ExactCover<(char, usize), (usize, usize)> {
        let mandatory = (0..n).map(|i| ('r', i)).chain((0..n).map(|i| ('c', i)));
        let optional = (0..2 * n - 1)
            .map(|i| ('d', i))
            .chain((0..2 * n - 1).map(|i| ('a', i)));
        let actions = (0..n).cartesian_product(0..n).map(|(r, c)| {
            (
                (r, c),
                vec![('r', r), ('c', c), ('d', r + c), ('a', r + n - 1 - c)],
            )
        });
        ExactCover::from_parts(mandatory, actions, optional).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Vec<char>>,
        finished: usize,
        stop_after: Option<usize>,
        depth: isize,
        min_depth: isize,
    }

    impl SearchHooks<char> for Recorder {
        type Token = ();

        fn on_row_selected(&mut self, _: &char, _: &mut Memo<()>) {
            self.depth += 1;
        }

        fn on_row_deselected(&mut self, _: &char) {
            self.depth -= 1;
            self.min_depth = self.min_depth.min(self.depth);
        }

        fn on_solution(&mut self, solution: &[char]) -> bool {
            self.seen.push(solution.to_vec());
            self.stop_after.is_none_or(|limit| self.seen.len() < limit)
        }

        fn on_finished(&mut self, _: &[Vec<char>]) {
            self.finished += 1;
        }
    }

    #[test]
    fn test_knuth_unique_solution() {
        let problem = knuth();
        let mut hooks = Recorder::default();
        let result = problem.solver().solve(&mut hooks);

        assert_eq!(result.solutions.len(), 1);
        let mut solution = result.solutions[0].clone();
        solution.sort_unstable();
        assert_eq!(solution, vec!['B', 'D', 'F']);
        assert!(problem.verify(&result.solutions[0]));

        assert!(!result.aborted);
        assert_eq!(hooks.seen, result.solutions);
        assert_eq!(hooks.finished, 1);
        assert_eq!(hooks.depth, 0);
        assert!(hooks.min_depth >= 0);
    }

    #[test]
    fn test_knuth_stats() {
        let result = knuth().into_solver().solve(&mut ());
        assert_eq!(result.stats.solutions, 1);
        assert_eq!(result.stats.max_depth, 3);
        assert_eq!(result.stats.pruned, 0);
        assert_eq!(result.stats.frames, result.stats.selections + 1);
    }

    #[test]
    fn test_queens_counts() {
        for (n, expected) in [(1, 1), (2, 0), (3, 0), (4, 2), (5, 10), (6, 4), (8, 92)] {
            let problem = queens(n);
            let result = problem.solver().solve(&mut ());
            assert_eq!(result.solutions.len(), expected, "{n}-queens");
            assert!(result.solutions.iter().all(|s| problem.verify(s)));
        }
    }

    #[test]
    fn test_queens_count_independent_of_ordering() {
        let problem = queens(6);
        let first = problem
            .solver()
            .with_column_selection(FirstColumn)
            .solve(&mut ());
        let random = problem
            .solver()
            .with_row_ordering(RandomOrder::with_seed(42))
            .solve(&mut ());
        let reversed = problem
            .solver()
            .with_row_ordering(RowKey(|&(r, c): &(usize, usize)| std::cmp::Reverse((r, c))))
            .solve(&mut ());

        let canonical = |solutions: Vec<Vec<(usize, usize)>>| {
            solutions
                .into_iter()
                .map(|s| s.into_iter().sorted().collect_vec())
                .sorted()
                .collect_vec()
        };
        let expected = canonical(problem.solver().solve(&mut ()).solutions);
        assert_eq!(expected.len(), 4);
        assert_eq!(canonical(first.solutions), expected);
        assert_eq!(canonical(random.solutions), expected);
        assert_eq!(canonical(reversed.solutions), expected);
    }

    #[test]
    fn test_early_termination() {
        let problem: ExactCover<u8, char> = ExactCover::from_parts(
            [1, 2],
            [('a', vec![1]), ('b', vec![2]), ('c', vec![1, 2])],
            [],
        )
        .unwrap();

        let mut hooks = Recorder {
            stop_after: Some(1),
            ..Recorder::default()
        };
        let result = problem.solver().solve(&mut hooks);

        assert!(result.aborted);
        assert_eq!(result.solutions.len(), 1);
        assert_eq!(hooks.seen.len(), 1);
        assert_eq!(hooks.finished, 1);
    }

    #[test]
    fn test_solution_limit() {
        let mut limit = SolutionLimit::new((), 50);
        let result = queens(8).into_solver().solve(&mut limit);
        assert!(result.aborted);
        assert_eq!(result.solutions.len(), 50);
        assert_eq!(limit.found(), 50);
    }

    #[test]
    fn test_first() {
        let solution = queens(8).into_solver().first().unwrap();
        assert_eq!(solution.len(), 8);
        assert!(queens(8).verify(&solution));
        assert_eq!(queens(3).into_solver().first(), None);
    }

    #[test]
    fn test_optional_requirements_never_required() {
        let result = Dlx::build(
            ["a", "b"],
            [(1, vec!["a", "x"]), (2, vec!["b", "x"]), (3, vec!["b"])],
            ["x"],
        )
        .unwrap()
        .solve(&mut ());
        assert_eq!(result.solutions, vec![vec![1, 3]]);
    }

    #[test]
    fn test_no_mandatory_requirements_has_empty_solution() {
        let result = Dlx::build(Vec::<u8>::new(), [('a', vec![1])], [1])
            .unwrap()
            .solve(&mut ());
        assert_eq!(result.solutions, vec![Vec::<char>::new()]);
    }

    #[test]
    fn test_unsatisfiable() {
        let result = Dlx::build([1, 2], [('a', vec![1])], []).unwrap().solve(&mut ());
        assert!(result.solutions.is_empty());
        assert!(!result.aborted);
    }

    #[test]
    fn test_build_unknown_requirement() {
        let result = Dlx::build([1, 2], [('a', vec![3])], []);
        assert!(matches!(result, Err(DlxError::UnknownRequirement { .. })));
    }

    #[test]
    fn test_column_key_is_used() {
        // Largest column first: branching on 1 before 2.
        let result = Dlx::build(
            [1, 2],
            [('a', vec![1]), ('b', vec![1]), ('c', vec![2])],
            [],
        )
        .unwrap()
        .with_column_selection(ColumnKey(|_: &i32, live: usize| std::cmp::Reverse(live)))
        .solve(&mut ());
        assert_eq!(result.solutions, vec![vec!['a', 'c'], vec!['b', 'c']]);
    }

    struct Footprint;

    impl SearchHooks<char> for Footprint {
        type Token = u8;

        fn on_row_selected(&mut self, action: &char, memo: &mut Memo<u8>) {
            memo.remember(match action {
                'a' | 'b' => 1,
                _ => 2,
            });
        }
    }

    #[test]
    fn test_remember_prunes_interchangeable_actions() {
        let dlx = || {
            Dlx::build(
                [1, 2],
                [('a', vec![1]), ('b', vec![1]), ('c', vec![2])],
                [],
            )
            .unwrap()
        };

        let plain = dlx().solve(&mut ());
        let pruned = dlx().solve(&mut Footprint);

        assert_eq!(plain.solutions.len(), 2);
        assert_eq!(pruned.solutions, vec![vec!['c', 'a']]);
        assert_eq!(pruned.stats.pruned, 1);
    }

    struct RejectAll;

    impl SearchHooks<char> for RejectAll {
        type Token = ();

        fn on_row_selected(&mut self, _: &char, memo: &mut Memo<()>) {
            memo.mark_invalid();
        }
    }

    #[test]
    fn test_mark_invalid_skips_subtree_but_tries_siblings() {
        let result = knuth().into_solver().solve(&mut RejectAll);
        assert!(result.solutions.is_empty());
        assert_eq!(result.stats.frames, 1);
        assert_eq!(result.stats.pruned, result.stats.selections);
        assert_eq!(result.stats.selections, 2);
    }

    fn problem_strategy() -> impl Strategy<Value = (usize, usize, Vec<Vec<usize>>)> {
        (1usize..6).prop_flat_map(|columns| {
            (
                Just(columns),
                0..=columns,
                prop::collection::vec(
                    prop::collection::btree_set(0..columns, 1..=columns)
                        .prop_map(|set| set.into_iter().collect_vec()),
                    0..10,
                ),
            )
        })
    }

    struct ModuloToken(usize);

    impl SearchHooks<usize> for ModuloToken {
        type Token = usize;

        fn on_row_selected(&mut self, action: &usize, memo: &mut Memo<usize>) {
            memo.remember(action % self.0);
        }
    }

    proptest! {
        #[test]
        fn prop_pruning_never_adds_solutions(
            (columns, mandatory, rows) in problem_strategy(),
            modulus in 1usize..4,
        ) {
            let problem = ExactCover::from_parts(
                0..mandatory,
                rows.into_iter().enumerate(),
                mandatory..columns,
            )
            .unwrap();

            let plain = problem.solver().solve(&mut ());
            let pruned = problem.solver().solve(&mut ModuloToken(modulus));

            prop_assert!(pruned.solutions.len() <= plain.solutions.len());
            for solution in plain.solutions.iter().chain(&pruned.solutions) {
                prop_assert!(problem.verify(solution));
            }
            for solution in &pruned.solutions {
                prop_assert!(plain.solutions.contains(solution));
            }
        }
    }
}
