#![deny(missing_docs)]
//! This crate provides a Dancing Links (Algorithm X) exact cover solver and a set of
//! puzzles encoded as exact cover problems.

/// The `dlx` module implements the exact cover engine: the dancing-links matrix, the
/// search, and the hooks and orderings that customise it.
pub mod dlx;

/// The `dumbbells` module places interchangeable three-cell pieces over marked cells.
pub mod dumbbells;

/// The `queens` module solves N-Queens, optionally finishing a partially filled board.
pub mod queens;

/// The `skyscrapers` module solves Latin squares with building visibility clues.
pub mod skyscrapers;

/// The `sudoku` module implements the Sudoku puzzle solver for 4x4 up to 25x25 boards.
pub mod sudoku;
