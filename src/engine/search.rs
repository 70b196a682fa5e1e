// Iterative deepening driver
//
// Runs fixed-depth searches at depth 1, 2, 3, ... until the wall-clock
// budget cancels one mid-flight, and answers with the move from the last
// depth that finished. The shallow iterations are not wasted work: the
// transposition table they fill seeds move ordering for the deeper ones,
// so each restart re-walks the tree far faster than a cold search would.

use std::time::Duration;

use chess::ChessMove;

use super::negamax::{mate_distance, Searcher, INFINITY, SearchCancelled};
use super::transposition_table::{TranspositionTable, DEFAULT_SIZE_MB};
use crate::board::Board;

/// Iteration ceiling; the budget runs out long before this in practice.
pub const MAX_SEARCH_DEPTH: u8 = 64;

/// A search instance that owns its transposition table. The table persists
/// across calls, so consecutive searches in one game reuse earlier work.
pub struct Engine {
    tt: TranspositionTable,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_table_size_mb(DEFAULT_SIZE_MB)
    }

    pub fn with_table_size_mb(size_mb: usize) -> Self {
        Self {
            tt: TranspositionTable::with_size_mb(size_mb),
        }
    }

    /// Drop all cached search results, as for a new game.
    pub fn clear(&mut self) {
        self.tt.clear();
    }

    /// Best move for the side to move, within the given time budget.
    ///
    /// Always returns a legal move when one exists, even with a zero
    /// budget: the answer starts as the first legal move and is only ever
    /// replaced by the result of a fully completed iteration. `None` means
    /// the position has no legal moves (mate or stalemate).
    pub fn choose_move(&mut self, position: &Board, budget: Duration) -> Option<ChessMove> {
        let mut board = position.clone();
        let mut best = *board.legal_moves().first()?;

        let mut searcher = Searcher::new(&mut self.tt, budget);
        for depth in 1..=MAX_SEARCH_DEPTH {
            match searcher.alpha_beta(&mut board, depth, -INFINITY, INFINITY, 0) {
                Ok((score, Some(mv))) => {
                    best = mv;
                    match mate_distance(score) {
                        Some(n) if score > 0 => log::info!(
                            "depth {depth}: mate in {n}, move {mv}, nodes {}",
                            searcher.nodes()
                        ),
                        Some(n) => log::info!(
                            "depth {depth}: mated in {n}, move {mv}, nodes {}",
                            searcher.nodes()
                        ),
                        None => log::info!(
                            "depth {depth}: score {score}, move {mv}, nodes {}",
                            searcher.nodes()
                        ),
                    }
                }
                // terminal at the root; no deeper iteration will change it
                Ok((_, None)) => break,
                Err(SearchCancelled) => {
                    log::debug!(
                        "budget exhausted during depth {depth} after {} nodes",
                        searcher.nodes()
                    );
                    break;
                }
            }
        }

        Some(best)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
