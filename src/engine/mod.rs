//! Move search.
//!
//! Iterative-deepening negamax with alpha-beta pruning, a quiescence
//! extension for forcing sequences, a transposition table shared across
//! iterations, and a tapered material-plus-placement evaluation.

mod evaluation;
mod move_ordering;
mod negamax;
mod piece_square_tables;
mod quiescence;
mod search;
mod transposition_table;

pub use evaluation::{evaluate, CHECKMATE_SCORE, MATE_THRESHOLD};
pub use move_ordering::order_moves;
pub use negamax::{is_mate_score, mate_distance, SearchCancelled, Searcher, INFINITY};
pub use search::{Engine, MAX_SEARCH_DEPTH};
pub use transposition_table::{NodeType, TranspositionTable, DEFAULT_SIZE_MB};
