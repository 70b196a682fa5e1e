// Negamax search with alpha-beta pruning
//
// One function that negates the child's score at each level instead of
// separate maximizing and minimizing halves. Each node probes the
// transposition table before doing any work, hands depth zero to quiescence
// search, and classifies its result as Exact / LowerBound / UpperBound for
// the table on the way out.
//
// Cancellation is cooperative: the wall-clock deadline is sampled every 2048
// visited nodes and surfaces as `Err(SearchCancelled)`, which unwinds the
// whole recursion back to the iterative-deepening driver. Nothing is stored
// in the table on that path, so cancellation can never cache a half-searched
// result; entries written before the deadline stay valid.

use std::time::{Duration, Instant};

use chess::ChessMove;

use super::evaluation::CHECKMATE_SCORE;
use super::move_ordering::order_moves;
use super::transposition_table::{NodeType, TranspositionTable};
use crate::board::Board;

/// Window bound wider than any representable score, mates included.
pub const INFINITY: i32 = 999_999;

// Deadline sampling interval; a power of two so the check is a mask.
const TIME_CHECK_INTERVAL: u64 = 2048;

/// Internal control signal: the time budget ran out mid-search. Recovered at
/// the driver boundary, never surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCancelled;

/// One search invocation: the node counter and deadline live here, so
/// concurrent searches in tests stay independent. Borrows the engine's
/// transposition table for its lifetime.
pub struct Searcher<'a> {
    pub(crate) tt: &'a mut TranspositionTable,
    nodes: u64,
    start: Instant,
    budget: Duration,
}

impl<'a> Searcher<'a> {
    pub fn new(tt: &'a mut TranspositionTable, budget: Duration) -> Self {
        Self {
            tt,
            nodes: 0,
            start: Instant::now(),
            budget,
        }
    }

    /// Nodes visited so far, main search and quiescence combined.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Count a visited node; every `TIME_CHECK_INTERVAL` nodes, compare
    /// against the deadline. Sampling bounds the timing overhead to a fixed
    /// fraction of nodes; the budget can be overshot by at most the cost of
    /// finishing the current batch.
    pub(crate) fn visit_node(&mut self) -> Result<(), SearchCancelled> {
        self.nodes += 1;
        if self.nodes & (TIME_CHECK_INTERVAL - 1) == 0 && self.start.elapsed() >= self.budget {
            return Err(SearchCancelled);
        }
        Ok(())
    }

    /// Negamax alpha-beta. Returns the score from the mover's perspective
    /// and the best move found, or `None` for terminal/leaf results.
    pub fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ply_from_root: u32,
    ) -> Result<(i32, Option<ChessMove>), SearchCancelled> {
        self.visit_node()?;

        let hash = board.hash();
        if let Some(score) = self.tt.lookup(depth, ply_from_root, alpha, beta, hash) {
            return Ok((score, self.tt.stored_move(hash)));
        }

        if board.is_checkmate() {
            // bias by ply so ancestors prefer the shorter mate
            return Ok((-(CHECKMATE_SCORE - ply_from_root as i32), None));
        }
        if board.is_stalemate() || board.is_insufficient_material() || board.can_claim_draw() {
            return Ok((0, None));
        }

        if depth == 0 {
            let score = self.quiescence(board, alpha, beta, ply_from_root)?;
            self.tt
                .store(0, ply_from_root, score, NodeType::Exact, None, hash);
            return Ok((score, None));
        }

        let tt_move = self.tt.stored_move(hash);
        let moves = order_moves(board, tt_move);

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            board.apply(mv);
            let result = self.alpha_beta(board, depth - 1, -beta, -alpha, ply_from_root + 1);
            board.undo();
            let (child_score, _) = result?;
            let score = -child_score;

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break; // beta cutoff; remaining moves cannot matter
            }
        }

        let node_type = if best_score <= alpha_orig {
            NodeType::UpperBound
        } else if best_score >= beta {
            NodeType::LowerBound
        } else {
            NodeType::Exact
        };
        self.tt
            .store(depth, ply_from_root, best_score, node_type, best_move, hash);

        Ok((best_score, best_move))
    }
}

/// True when a score encodes a forced mate rather than material judgement.
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > super::evaluation::MATE_THRESHOLD
}

/// Full moves until mate for a mate score, `None` otherwise.
pub fn mate_distance(score: i32) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let plies = CHECKMATE_SCORE - score.abs();
    Some((plies + 1) / 2)
}
