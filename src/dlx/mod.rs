//! Dancing-links exact cover engine.
//!
//! An exact cover problem is a set of requirements plus a set of actions, each action
//! satisfying some of the requirements. A solution picks actions so that every
//! mandatory requirement is satisfied by exactly one of them and every optional
//! requirement by at most one.
//!
//! - [`ExactCover`] validates the input and builds the engine.
//! - [`Dlx`] runs Knuth's Algorithm X on a [`Matrix`] of dancing links.
//! - [`SearchHooks`], [`ColumnSelection`] and [`RowOrdering`] customise the search;
//!   [`Memo`] is the pruning handle given to the hooks.
//! - [`text`] reads instances in Knuth's plain-text format.

pub mod error;
pub mod hooks;
pub mod matrix;
pub mod memo;
pub mod ordering;
pub mod problem;
pub mod solver;
pub mod text;

pub use error::DlxError;
pub use hooks::{SearchHooks, SolutionLimit};
pub use matrix::Matrix;
pub use memo::Memo;
pub use ordering::{
    ColumnKey, ColumnSelection, FirstColumn, MinimumRemaining, RandomOrder, RowKey,
    RowOrdering, ScoredOrder, StableOrder,
};
pub use problem::ExactCover;
pub use solver::{Dlx, SearchResult, SearchStats};
