// Quiescence search
//
// The main search stops at a fixed depth, which is exactly where tactical
// sequences are most likely to be cut off mid-exchange. Quiescence keeps
// searching, but only through forcing moves (captures and checks), until the
// position is quiet enough for the static evaluation to be trusted.
//
// Stand-pat: the side to move may decline every forcing move and take the
// static score instead, so that score acts as an immediate lower bound. The
// search is fail-hard: scores at or above beta return beta itself.

use crate::board::Board;

use super::evaluation::evaluate;
use super::move_ordering::order_moves;
use super::negamax::{SearchCancelled, Searcher};
use super::transposition_table::NodeType;

impl Searcher<'_> {
    /// Forcing-moves-only extension of the main search. Results land in the
    /// transposition table at depth 0, the floor of the depth gate.
    pub(crate) fn quiescence(
        &mut self,
        board: &mut Board,
        mut alpha: i32,
        beta: i32,
        ply_from_root: u32,
    ) -> Result<i32, SearchCancelled> {
        self.visit_node()?;

        let hash = board.hash();
        if let Some(score) = self.tt.lookup(0, ply_from_root, alpha, beta, hash) {
            return Ok(score);
        }

        let stand_pat = evaluate(board);
        if stand_pat >= beta {
            self.tt
                .store(0, ply_from_root, stand_pat, NodeType::LowerBound, None, hash);
            return Ok(beta);
        }
        alpha = alpha.max(stand_pat);

        for mv in order_moves(board, None) {
            if !board.is_capture(mv) && !board.gives_check(mv) {
                continue;
            }

            board.apply(mv);
            let result = self.quiescence(board, -beta, -alpha, ply_from_root + 1);
            board.undo();
            let score = -result?;

            if score >= beta {
                self.tt
                    .store(0, ply_from_root, score, NodeType::LowerBound, Some(mv), hash);
                return Ok(beta);
            }
            alpha = alpha.max(score);
        }

        self.tt
            .store(0, ply_from_root, alpha, NodeType::Exact, None, hash);
        Ok(alpha)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::negamax::INFINITY;
    use super::super::transposition_table::TranspositionTable;
    use super::*;

    fn quiesce(fen: &str) -> i32 {
        let mut board = Board::from_fen(fen).unwrap();
        let mut tt = TranspositionTable::with_size_mb(1);
        let mut searcher = Searcher::new(&mut tt, Duration::from_secs(600));
        searcher
            .quiescence(&mut board, -INFINITY, INFINITY, 0)
            .expect("no deadline within the test budget")
    }

    #[test]
    fn quiet_position_returns_the_static_evaluation() {
        let fen = "4k3/pppp4/8/8/8/8/PPPP4/4K3 w - - 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(quiesce(fen), evaluate(&board));
    }

    #[test]
    fn stand_pat_cuts_off_without_recursing() {
        let mut board = Board::new();
        let mut tt = TranspositionTable::with_size_mb(1);
        let mut searcher = Searcher::new(&mut tt, Duration::from_secs(600));

        // beta below the static score, so stand-pat fails high at the root
        let score = searcher.quiescence(&mut board, -INFINITY, -10_000, 0).unwrap();
        assert_eq!(score, -10_000);
        assert_eq!(searcher.nodes(), 1);
    }

    #[test]
    fn resolves_a_free_capture() {
        // White rook takes an undefended queen; the score reflects the gain
        let fen = "4k3/8/8/8/3q4/8/8/3RK3 w - - 0 1";
        let board = Board::from_fen(fen).unwrap();
        let score = quiesce(fen);
        assert!(
            score > evaluate(&board) + 500,
            "score {score} should include the queen"
        );
    }

    #[test]
    fn does_not_lose_material_on_a_defended_piece() {
        // The pawn on d4 is defended by e5; QxP would be answered by exd4,
        // and the side to move can always stand pat instead
        let fen = "4k3/8/8/4p3/3p4/8/8/3QK3 w - - 0 1";
        let board = Board::from_fen(fen).unwrap();
        let score = quiesce(fen);
        assert!(score >= evaluate(&board));
    }

    #[test]
    fn sees_mate_through_a_checking_sequence() {
        // Ra8+ is the only forcing move and it mates; the check extension
        // carries quiescence all the way to the mated position
        use super::super::evaluation::CHECKMATE_SCORE;
        let score = quiesce("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        assert_eq!(score, CHECKMATE_SCORE);
    }
}
