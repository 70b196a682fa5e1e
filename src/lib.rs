//! A chess engine: position tracking plus a time-budgeted move search.
//!
//! [`Board`] wraps move generation and game-state queries and adds the
//! apply/undo history the search needs. [`Engine`] runs the search:
//! iterative-deepening negamax with alpha-beta pruning, quiescence, and a
//! transposition table, returning the best move it can prove within a
//! wall-clock budget.

pub mod board;
pub mod engine;

pub use board::Board;
pub use engine::Engine;
