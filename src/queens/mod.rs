#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! N-Queens as an exact cover problem, including boards with queens already placed.

/// Encoding, decoding and board parsing.
pub mod solver;
