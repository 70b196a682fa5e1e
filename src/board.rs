// Rules-oracle adapter around the `chess` crate
//
// The search core never talks to the `chess` crate directly; it consumes this
// adapter's contract: legal move generation, apply/undo with exact reversal,
// a 64-bit position hash, capture/check classification and terminal-state
// detection. `chess::Board` is an immutable value type, so `apply` snapshots
// the previous state and `undo` pops it back - after N applies and N undos
// the position and its hash are bit-identical to the original.
//
// Two bookkeeping items the `chess` crate does not track are carried here:
// the halfmove clock (fifty-move rule) and the position history within the
// current line (threefold repetition). Both feed `can_claim_draw`.

use std::str::FromStr;

use chess::{BitBoard, BoardStatus, ChessMove, Color, MoveGen, Piece, Square, EMPTY};
use smallvec::SmallVec;

/// Moves in a single chess position rarely exceed this; keeps move lists
/// off the heap in the common case.
pub type MoveList = SmallVec<[ChessMove; 64]>;

const DARK_SQUARES: BitBoard = BitBoard(0xAA55_AA55_AA55_AA55);

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    board: chess::Board,
    halfmove_clock: u32,
}

/// A mutable board with reversible move application.
#[derive(Debug, Clone)]
pub struct Board {
    inner: chess::Board,
    halfmove_clock: u32,
    history: Vec<Snapshot>,
}

impl Board {
    /// Standard starting position.
    pub fn new() -> Self {
        Self {
            inner: chess::Board::default(),
            halfmove_clock: 0,
            history: Vec::new(),
        }
    }

    /// Build a position from FEN. The halfmove-clock field is honored so
    /// fifty-move claims work for positions loaded mid-game.
    pub fn from_fen(fen: &str) -> Result<Self, chess::Error> {
        let inner = chess::Board::from_str(fen)?;
        let halfmove_clock = fen
            .split_whitespace()
            .nth(4)
            .and_then(|field| field.parse().ok())
            .unwrap_or(0);
        Ok(Self {
            inner,
            halfmove_clock,
            history: Vec::new(),
        })
    }

    /// Apply a legal move. Reversible via `undo`.
    pub fn apply(&mut self, mv: ChessMove) {
        let resets_clock =
            self.is_capture(mv) || self.inner.piece_on(mv.get_source()) == Some(Piece::Pawn);
        self.history.push(Snapshot {
            board: self.inner,
            halfmove_clock: self.halfmove_clock,
        });
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        self.inner = self.inner.make_move_new(mv);
    }

    /// Exactly reverse the most recent `apply`.
    pub fn undo(&mut self) {
        debug_assert!(!self.history.is_empty(), "undo without a matching apply");
        if let Some(snapshot) = self.history.pop() {
            self.inner = snapshot.board;
            self.halfmove_clock = snapshot.halfmove_clock;
        }
    }

    /// All legal moves in the current position, in no particular order.
    pub fn legal_moves(&self) -> MoveList {
        MoveGen::new_legal(&self.inner).collect()
    }

    /// 64-bit zobrist hash; identical positions reached by different move
    /// orders hash identically.
    pub fn hash(&self) -> u64 {
        self.inner.get_hash()
    }

    pub fn side_to_move(&self) -> Color {
        self.inner.side_to_move()
    }

    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.inner.piece_on(square)
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.inner.king_square(color)
    }

    /// Bitboard of one side's pieces of one kind.
    pub fn pieces(&self, piece: Piece, color: Color) -> BitBoard {
        *self.inner.pieces(piece) & *self.inner.color_combined(color)
    }

    /// True for ordinary and en passant captures. A pawn changing file is
    /// always capturing, whether or not the destination is occupied.
    pub fn is_capture(&self, mv: ChessMove) -> bool {
        if self.inner.piece_on(mv.get_dest()).is_some() {
            return true;
        }
        self.inner.piece_on(mv.get_source()) == Some(Piece::Pawn)
            && mv.get_source().get_file() != mv.get_dest().get_file()
    }

    /// True if applying the move leaves the opponent in check.
    pub fn gives_check(&self, mv: ChessMove) -> bool {
        *self.inner.make_move_new(mv).checkers() != EMPTY
    }

    pub fn in_check(&self) -> bool {
        *self.inner.checkers() != EMPTY
    }

    pub fn is_checkmate(&self) -> bool {
        self.inner.status() == BoardStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.inner.status() == BoardStatus::Stalemate
    }

    /// Neither side retains enough material to deliver mate: bare kings, a
    /// lone minor piece, or bishops all confined to one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = *self.inner.pieces(Piece::Pawn)
            | *self.inner.pieces(Piece::Rook)
            | *self.inner.pieces(Piece::Queen);
        if heavy != EMPTY {
            return false;
        }

        let knights = self.inner.pieces(Piece::Knight).popcnt();
        let bishops = *self.inner.pieces(Piece::Bishop);
        if knights + bishops.popcnt() <= 1 {
            return true;
        }
        if knights == 0 {
            let dark = bishops & DARK_SQUARES;
            return dark == bishops || dark == EMPTY;
        }
        false
    }

    /// Draw claimable by the side to move: fifty-move rule or threefold
    /// repetition within the line walked through this board.
    pub fn can_claim_draw(&self) -> bool {
        if self.halfmove_clock >= 100 {
            return true;
        }
        let current = self.inner.get_hash();
        let earlier = self
            .history
            .iter()
            .filter(|snapshot| snapshot.board.get_hash() == current)
            .count();
        earlier >= 2
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner && self.halfmove_clock == other.halfmove_clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_undo_roundtrip_restores_position_and_hash() {
        let mut board = Board::new();
        let original = board.clone();
        let original_hash = board.hash();

        // 1. e4 d5 2. exd5
        board.apply(ChessMove::new(Square::E2, Square::E4, None));
        board.apply(ChessMove::new(Square::D7, Square::D5, None));
        board.apply(ChessMove::new(Square::E4, Square::D5, None));
        assert_ne!(board.hash(), original_hash);

        board.undo();
        board.undo();
        board.undo();
        assert_eq!(board, original);
        assert_eq!(board.hash(), original_hash);
    }

    #[test]
    fn roundtrip_over_all_legal_moves() {
        let mut board =
            Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4")
                .unwrap();
        let reference = board.clone();
        for mv in board.legal_moves() {
            board.apply(mv);
            board.undo();
            assert_eq!(board, reference, "undo({mv}) did not restore the position");
        }
    }

    #[test]
    fn captures_are_classified_including_en_passant() {
        let mut board = Board::new();
        board.apply(ChessMove::new(Square::E2, Square::E4, None));
        board.apply(ChessMove::new(Square::A7, Square::A6, None));
        board.apply(ChessMove::new(Square::E4, Square::E5, None));
        board.apply(ChessMove::new(Square::D7, Square::D5, None));

        // exd6 en passant: destination square is empty but the file changes
        let en_passant = ChessMove::new(Square::E5, Square::D6, None);
        assert!(board.legal_moves().contains(&en_passant));
        assert!(board.is_capture(en_passant));

        // quiet pawn push is not a capture
        assert!(!board.is_capture(ChessMove::new(Square::E5, Square::E6, None)));
    }

    #[test]
    fn gives_check_detects_checking_moves() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(board.gives_check(ChessMove::new(Square::A1, Square::A8, None)));
        assert!(!board.gives_check(ChessMove::new(Square::A1, Square::A2, None)));
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_moves_and_captures() {
        let mut board = Board::new();
        board.apply(ChessMove::new(Square::G1, Square::F3, None));
        assert_eq!(board.halfmove_clock(), 1);
        board.apply(ChessMove::new(Square::B8, Square::C6, None));
        assert_eq!(board.halfmove_clock(), 2);
        board.apply(ChessMove::new(Square::E2, Square::E4, None));
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn threefold_repetition_is_claimable() {
        let mut board = Board::new();
        let shuffle = [
            ChessMove::new(Square::G1, Square::F3, None),
            ChessMove::new(Square::G8, Square::F6, None),
            ChessMove::new(Square::F3, Square::G1, None),
            ChessMove::new(Square::F6, Square::G8, None),
        ];
        for mv in shuffle {
            board.apply(mv);
        }
        assert!(!board.can_claim_draw());
        for mv in shuffle {
            board.apply(mv);
        }
        // starting position has now occurred three times
        assert!(board.can_claim_draw());
    }

    #[test]
    fn fifty_move_rule_is_claimable() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 100 80").unwrap();
        assert!(board.can_claim_draw());
    }

    #[test]
    fn insufficient_material_detection() {
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1")
            .unwrap()
            .is_insufficient_material());
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1")
            .unwrap()
            .is_insufficient_material());
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1")
            .unwrap()
            .is_insufficient_material());
        // opposite-colored bishops can still build mating nets
        assert!(!Board::from_fen("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1")
            .unwrap()
            .is_insufficient_material());
        assert!(!Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1")
            .unwrap()
            .is_insufficient_material());
    }

    #[test]
    fn checkmate_and_stalemate_detection() {
        let mated =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());

        let stale = Board::from_fen("k7/8/1Q6/8/8/8/8/K7 b - - 0 1").unwrap();
        assert!(stale.is_stalemate());
        assert!(!stale.is_checkmate());
    }
}
