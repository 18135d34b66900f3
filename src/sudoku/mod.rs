#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module provides functionality for solving Sudoku puzzles as exact cover problems.

/// Board model, exact cover encoding and the file parser.
pub mod solver;
