//! game2048: a deterministic 4x4 2048 engine with an injectable randomness source
//!
//! This crate provides:
//! - A `Board` type with the game rules (`make_move`, `initialize`, `is_over`, ...)
//! - A `RandomSource` seam (`random` module) with a seeded production source and
//!   a scripted replay source
//! - TOML session settings (`config` module)
//!
//! Quick start:
//! ```
//! use game2048::engine::{Board, Move};
//!
//! // Deterministic board with a seeded generator
//! let mut board = Board::seeded(42);
//! board.initialize();
//! assert_eq!(board.free_cells(), 14);
//!
//! board.make_move(Move::Left);
//! assert_eq!(board.moves(), 1);
//! ```
//!
//! Scripted spawns make every step reproducible:
//! ```
//! use game2048::engine::Board;
//! use game2048::random::ScriptedSource;
//!
//! // Free-cell indices 3 then 0, values 2 then 4.
//! let mut board = Board::with_source(ScriptedSource::new([3, 0], [2, 4]));
//! board.initialize();
//! assert_eq!(
//!     board.to_string(),
//!     "Moves: 0   Score: 0\n\
//!      4     .     .     2     \n\
//!      .     .     .     .     \n\
//!      .     .     .     .     \n\
//!      .     .     .     .     \n"
//! );
//! ```
//!
pub mod config;
pub mod engine;
pub mod error;
pub mod random;

pub use error::EngineError;
