#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Dumbbells: place a given number of three-cell pieces on a grid so that every marked
//! cell is covered by the end of a piece.
//!
//! Pieces are interchangeable, so the same placement with another piece number is the
//! same solution. [`solver::SkipSwappedPieces`] records each placement with
//! [`crate::dlx::Memo::remember`] to cut those duplicates.

/// Puzzle model, duplicate pruning hooks and the file parser.
pub mod solver;
