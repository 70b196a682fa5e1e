// Position evaluation
// Returns score in centipawns from the perspective of the side to move
// (positive favors the mover).
//
// Components, summed per side and then differenced:
// - material count at the standard values
// - piece-square tables, with the pawn and king tables tapered between an
//   opening and an endgame variant by the opponent's remaining material
// - a mop-up bonus that drives the enemy king to the edge in won endgames
//
// Terminal positions short-circuit: checkmate is -CHECKMATE_SCORE for the
// mover, stalemate and dead material are exactly 0.

use chess::{Color, Piece, Square};

use super::piece_square_tables as pst;
use crate::board::Board;

// Material values in centipawns
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 320;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

/// Score of a position where the side to move is already mated. Mate-in-N
/// scores count down from here by N plies.
pub const CHECKMATE_SCORE: i32 = 100_000;

/// Scores beyond this magnitude encode a mate distance rather than a
/// material judgement.
pub const MATE_THRESHOLD: i32 = 90_000;

// Weights for the endgame transition; heavy pieces keep the game out of the
// endgame far longer than minors do.
const QUEEN_ENDGAME_WEIGHT: i32 = 45;
const ROOK_ENDGAME_WEIGHT: i32 = 20;
const BISHOP_ENDGAME_WEIGHT: i32 = 10;
const KNIGHT_ENDGAME_WEIGHT: i32 = 10;
const ENDGAME_START_WEIGHT: i32 = QUEEN_ENDGAME_WEIGHT
    + 2 * ROOK_ENDGAME_WEIGHT
    + 2 * BISHOP_ENDGAME_WEIGHT
    + 2 * KNIGHT_ENDGAME_WEIGHT;

pub(crate) fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0,
    }
}

/// Per-side material census, built fresh for each evaluation.
#[derive(Debug, Clone, Copy)]
struct MaterialInfo {
    material_score: i32,
    /// 0.0 at full material, 1.0 once all non-pawn material is gone.
    endgame_t: f32,
}

impl MaterialInfo {
    fn gather(board: &Board, color: Color) -> Self {
        let num_pawns = board.pieces(Piece::Pawn, color).popcnt() as i32;
        let num_knights = board.pieces(Piece::Knight, color).popcnt() as i32;
        let num_bishops = board.pieces(Piece::Bishop, color).popcnt() as i32;
        let num_rooks = board.pieces(Piece::Rook, color).popcnt() as i32;
        let num_queens = board.pieces(Piece::Queen, color).popcnt() as i32;

        let material_score = num_pawns * PAWN_VALUE
            + num_knights * KNIGHT_VALUE
            + num_bishops * BISHOP_VALUE
            + num_rooks * ROOK_VALUE
            + num_queens * QUEEN_VALUE;

        let endgame_weight = num_queens * QUEEN_ENDGAME_WEIGHT
            + num_rooks * ROOK_ENDGAME_WEIGHT
            + num_bishops * BISHOP_ENDGAME_WEIGHT
            + num_knights * KNIGHT_ENDGAME_WEIGHT;
        let endgame_t =
            1.0 - (endgame_weight as f32 / ENDGAME_START_WEIGHT as f32).min(1.0);

        Self {
            material_score,
            endgame_t,
        }
    }
}

/// Per-side score components; discarded once summed.
#[derive(Debug, Clone, Copy, Default)]
struct EvaluationData {
    material_score: i32,
    piece_square_score: i32,
    mop_up_score: i32,
}

impl EvaluationData {
    fn sum(&self) -> i32 {
        self.material_score + self.piece_square_score + self.mop_up_score
    }
}

/// Integer-safe blend of an opening and an endgame value at weight `t`.
fn taper(early: i32, late: i32, t: f32) -> i32 {
    (early as f32 * (1.0 - t) + late as f32 * t).round() as i32
}

fn pst_index(square: Square, color: Color) -> usize {
    match color {
        Color::White => square.to_index(),
        Color::Black => square.to_index() ^ 56,
    }
}

/// Piece-square total for one side. The pawn and king contributions are
/// tapered by `endgame_t`, which is derived from the *opponent's* remaining
/// material: the fewer attackers are left, the more endgame-like the rules
/// for our own pawns and king become.
fn piece_square_score(board: &Board, color: Color, endgame_t: f32) -> i32 {
    let mut score = 0;
    let mut pawn_early = 0;
    let mut pawn_late = 0;
    let mut king_early = 0;
    let mut king_late = 0;

    for square in board.pieces(Piece::Pawn, color) {
        let idx = pst_index(square, color);
        pawn_early += pst::PAWN_START[idx];
        pawn_late += pst::PAWN_END[idx];
    }
    for square in board.pieces(Piece::Knight, color) {
        score += pst::KNIGHT[pst_index(square, color)];
    }
    for square in board.pieces(Piece::Bishop, color) {
        score += pst::BISHOP[pst_index(square, color)];
    }
    for square in board.pieces(Piece::Rook, color) {
        score += pst::ROOK[pst_index(square, color)];
    }
    for square in board.pieces(Piece::Queen, color) {
        score += pst::QUEEN[pst_index(square, color)];
    }
    let king_idx = pst_index(board.king_square(color), color);
    king_early += pst::KING_START[king_idx];
    king_late += pst::KING_END[king_idx];

    score += taper(pawn_early, pawn_late, endgame_t);
    score += taper(king_early, king_late, endgame_t);
    score
}

/// Distance of a square from the four center squares, 0 (center) to 6
/// (corner), measured in Manhattan steps.
fn centre_manhattan_distance(square: Square) -> i32 {
    let file = square.get_file().to_index() as i32;
    let rank = square.get_rank().to_index() as i32;
    let file_from_edge = file.min(7 - file);
    let rank_from_edge = rank.min(7 - rank);
    (3 - file_from_edge) + (3 - rank_from_edge)
}

fn king_distance(a: Square, b: Square) -> i32 {
    let file_diff = (a.get_file().to_index() as i32 - b.get_file().to_index() as i32).abs();
    let rank_diff = (a.get_rank().to_index() as i32 - b.get_rank().to_index() as i32).abs();
    file_diff.max(rank_diff)
}

/// Endgame conversion bonus. Only awarded with a material edge worth more
/// than two pawns against an opponent already in the endgame; rewards
/// closing in with our king and herding the enemy king toward the edge.
fn mop_up_score(
    board: &Board,
    color: Color,
    friendly: &MaterialInfo,
    enemy: &MaterialInfo,
) -> i32 {
    if friendly.material_score <= enemy.material_score + PAWN_VALUE * 2
        || enemy.endgame_t <= 0.0
    {
        return 0;
    }

    let my_king = board.king_square(color);
    let enemy_king = board.king_square(!color);

    let mut score = (14 - king_distance(my_king, enemy_king)) * 4;
    score += centre_manhattan_distance(enemy_king) * 10;
    (score as f32 * enemy.endgame_t).round() as i32
}

/// Evaluate a position from the perspective of the side to move.
pub fn evaluate(board: &Board) -> i32 {
    if board.is_checkmate() {
        return -CHECKMATE_SCORE;
    }
    if board.is_stalemate() || board.is_insufficient_material() {
        return 0;
    }

    let white_material = MaterialInfo::gather(board, Color::White);
    let black_material = MaterialInfo::gather(board, Color::Black);

    let mut white = EvaluationData::default();
    let mut black = EvaluationData::default();

    white.material_score = white_material.material_score;
    black.material_score = black_material.material_score;

    white.piece_square_score =
        piece_square_score(board, Color::White, black_material.endgame_t);
    black.piece_square_score =
        piece_square_score(board, Color::Black, white_material.endgame_t);

    white.mop_up_score = mop_up_score(board, Color::White, &white_material, &black_material);
    black.mop_up_score = mop_up_score(board, Color::Black, &black_material, &white_material);

    let total = white.sum() - black.sum();
    match board.side_to_move() {
        Color::White => total,
        Color::Black => -total,
    }
}
