//! Engine module: the 4x4 board, its move/merge rules, spawning, and
//! termination checks.
//!
//! - `Board` owns the grid, the counters, and its randomness source.
//! - Line traversal and the slide/merge procedure live in `ops`; every
//!   direction runs the same procedure over a different cell ordering.

mod ops;
pub mod state;

pub use state::{Board, Cells, Move, MoveOutcome, MAX_TILE, SIZE, WINNING_TILE};
