#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Branching heuristics: which column to branch on, and in which order to try its rows.
//!
//! Both are expressed as key functions. The engine picks the live mandatory column with
//! the smallest [`ColumnSelection::key`] (first one wins ties) and tries the candidate
//! rows of that column sorted by [`RowOrdering::key`] (a stable sort, so equal keys keep
//! the order the rows were declared in).
//!
//! Provided column selections:
//! - [`MinimumRemaining`]: fewest live rows first. Knuth's heuristic and the default.
//! - [`FirstColumn`]: the first live column in declaration order.
//! - [`ColumnKey`]: any closure over the requirement and its live row count.
//!
//! Provided row orderings:
//! - [`StableOrder`]: declaration order (default).
//! - [`RandomOrder`]: a seeded shuffle, useful for sampling solutions.
//! - [`ScoredOrder`]: ascending `f64` score.
//! - [`RowKey`]: any closure over the action.

use ordered_float::OrderedFloat;
use std::fmt::Debug;

/// Chooses the requirement to branch on.
pub trait ColumnSelection<R> {
    /// Ordering key; the smallest wins.
    type Key: Ord;

    /// Computes the key of a live mandatory requirement with `live_rows` candidate rows.
    fn key(&mut self, requirement: &R, live_rows: usize) -> Self::Key;
}

/// Orders the candidate rows of the branch column.
pub trait RowOrdering<A> {
    /// Ordering key; rows are tried in ascending order.
    type Key: Ord;

    /// Computes the key of a candidate action.
    fn key(&mut self, action: &A) -> Self::Key;
}

/// Minimum remaining values: branch on the column with the fewest live rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimumRemaining;

impl<R> ColumnSelection<R> for MinimumRemaining {
    type Key = usize;

    fn key(&mut self, _: &R, live_rows: usize) -> usize {
        live_rows
    }
}

/// Branch on the first live column, ignoring sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstColumn;

impl<R> ColumnSelection<R> for FirstColumn {
    type Key = ();

    fn key(&mut self, _: &R, _: usize) {}
}

/// Column selection from a closure `(requirement, live_rows) -> key`.
#[derive(Clone, Copy)]
pub struct ColumnKey<F>(pub F);

impl<F> Debug for ColumnKey<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ColumnKey(..)")
    }
}

impl<R, K, F> ColumnSelection<R> for ColumnKey<F>
where
    K: Ord,
    F: FnMut(&R, usize) -> K,
{
    type Key = K;

    fn key(&mut self, requirement: &R, live_rows: usize) -> K {
        (self.0)(requirement, live_rows)
    }
}

/// Try rows in the order they were declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StableOrder;

impl<A> RowOrdering<A> for StableOrder {
    type Key = ();

    fn key(&mut self, _: &A) {}
}

/// Try rows in a pseudo-random order drawn from a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomOrder(fastrand::Rng);

impl RandomOrder {
    /// Creates an ordering with a fixed seed, so runs are reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for RandomOrder {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

impl<A> RowOrdering<A> for RandomOrder {
    type Key = u64;

    fn key(&mut self, _: &A) -> u64 {
        self.0.u64(..)
    }
}

/// Try rows by ascending score. `NaN` scores sort last.
#[derive(Clone, Copy)]
pub struct ScoredOrder<F>(pub F);

impl<F> Debug for ScoredOrder<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScoredOrder(..)")
    }
}

impl<A, F> RowOrdering<A> for ScoredOrder<F>
where
    F: FnMut(&A) -> f64,
{
    type Key = OrderedFloat<f64>;

    fn key(&mut self, action: &A) -> OrderedFloat<f64> {
        OrderedFloat((self.0)(action))
    }
}

/// Row ordering from a closure `action -> key`.
#[derive(Clone, Copy)]
pub struct RowKey<F>(pub F);

impl<F> Debug for RowKey<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RowKey(..)")
    }
}

impl<A, K, F> RowOrdering<A> for RowKey<F>
where
    K: Ord,
    F: FnMut(&A) -> K,
{
    type Key = K;

    fn key(&mut self, action: &A) -> K {
        (self.0)(action)
    }
}
