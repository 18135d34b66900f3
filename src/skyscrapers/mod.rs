#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Skyscrapers ("high-rise buildings"): a Latin square of building heights where each
//! clue on the border says how many buildings are visible from that side.
//!
//! The visibility clues are not part of the exact cover; they are checked by
//! [`solver::VisibilityCheck`] whenever a row or column fills up, which prunes the
//! branch through [`crate::dlx::Memo::mark_invalid`].

/// Puzzle model, clue checking hooks and the file parser.
pub mod solver;
