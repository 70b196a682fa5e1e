// Move ordering
//
// Ordering changes nothing about the search result, only how early the
// cutoffs arrive. Two signals are enough here: the move cached in the
// transposition table for this position goes first, and captures are ranked
// by MVV-LVA (most valuable victim, least valuable attacker). Quiet moves
// keep the generator's arbitrary relative order.

use chess::ChessMove;

use super::evaluation::{piece_value, PAWN_VALUE};
use crate::board::{Board, MoveList};

// Large enough to dominate any capture score.
const TT_MOVE_BONUS: i32 = 100_000;

const VICTIM_WEIGHT: i32 = 10;

fn score_move(board: &Board, mv: ChessMove, tt_move: Option<ChessMove>) -> i32 {
    let mut score = 0;
    if tt_move == Some(mv) {
        score += TT_MOVE_BONUS;
    }
    if board.is_capture(mv) {
        // en passant leaves the destination square empty; the victim is a pawn
        let victim = board
            .piece_on(mv.get_dest())
            .map_or(PAWN_VALUE, piece_value);
        let attacker = board
            .piece_on(mv.get_source())
            .map_or(0, piece_value);
        score += victim * VICTIM_WEIGHT - attacker;
    }
    score
}

/// All legal moves, best prospects first.
pub fn order_moves(board: &Board, tt_move: Option<ChessMove>) -> MoveList {
    let mut moves = board.legal_moves();
    moves.sort_by_cached_key(|&mv| -score_move(board, mv, tt_move));
    moves
}
