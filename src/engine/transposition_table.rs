// Transposition table
//
// Fixed-capacity cache of search results keyed by the 64-bit position hash.
// The bucket is `hash % capacity`; the full hash is stored alongside each
// entry and checked on probe, so a bucket holding a different position reads
// as a miss. Stores overwrite the bucket unconditionally - no depth-preferred
// replacement. That keeps the table a pure single-slot cache at the cost of
// occasionally evicting a deeper entry when two positions share a bucket;
// a collision can therefore only cost time, never corrupt a probe for a
// different hash.
//
// Mate scores are stored relative to the node they were found at, not the
// root: a mate score is ply-adjusted on store and re-adjusted on lookup so a
// cached mate remains correct when probed from a different distance to root.

use chess::ChessMove;

use super::evaluation::MATE_THRESHOLD;

/// Default memory budget for the table.
pub const DEFAULT_SIZE_MB: usize = 32;

// Per-entry footprint used to convert the memory budget into a capacity.
const ENTRY_SIZE_BYTES: usize = 32;

/// How a cached score bounds the true score of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Fully searched; the score is exact.
    Exact,
    /// A beta cutoff occurred; the true score is at least this.
    LowerBound,
    /// No move raised alpha; the true score is at most this.
    UpperBound,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: u64,
    score: i32,
    depth: u8,
    node_type: NodeType,
    best_move: Option<ChessMove>,
}

impl Entry {
    const EMPTY: Entry = Entry {
        key: 0,
        score: 0,
        depth: 0,
        node_type: NodeType::Exact,
        best_move: None,
    };
}

pub struct TranspositionTable {
    entries: Vec<Entry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::with_size_mb(DEFAULT_SIZE_MB)
    }

    pub fn with_size_mb(size_mb: usize) -> Self {
        let capacity = (size_mb * 1024 * 1024 / ENTRY_SIZE_BYTES).max(1);
        Self {
            entries: vec![Entry::EMPTY; capacity],
        }
    }

    fn index(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    /// Probe for a score usable at the given depth and window.
    ///
    /// Misses on a hash mismatch or an entry searched shallower than
    /// `depth`. A surviving entry is usable if its bound proves a value
    /// inside or beyond the window: Exact always, LowerBound at `>= beta`,
    /// UpperBound at `<= alpha`. Anything else is ordering-hint material
    /// only (see `stored_move`) and reads as a miss here.
    pub fn lookup(
        &self,
        depth: u8,
        ply_from_root: u32,
        alpha: i32,
        beta: i32,
        hash: u64,
    ) -> Option<i32> {
        let entry = &self.entries[self.index(hash)];
        if entry.key != hash || entry.depth < depth {
            return None;
        }

        let score = retrieve_mate_adjustment(entry.score, ply_from_root);
        match entry.node_type {
            NodeType::Exact => Some(score),
            NodeType::LowerBound if score >= beta => Some(score),
            NodeType::UpperBound if score <= alpha => Some(score),
            _ => None,
        }
    }

    /// Cache a search result, unconditionally overwriting the bucket.
    pub fn store(
        &mut self,
        depth: u8,
        ply_from_root: u32,
        score: i32,
        node_type: NodeType,
        best_move: Option<ChessMove>,
        hash: u64,
    ) {
        let index = self.index(hash);
        self.entries[index] = Entry {
            key: hash,
            score: store_mate_adjustment(score, ply_from_root),
            depth,
            node_type,
            best_move,
        };
    }

    /// Best move previously recorded for this position, regardless of the
    /// stored depth or bound. Used to seed move ordering.
    pub fn stored_move(&self, hash: u64) -> Option<ChessMove> {
        let entry = &self.entries[self.index(hash)];
        if entry.key == hash {
            entry.best_move
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = Entry::EMPTY;
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

// Mate scores measure distance from the node where the mate was found;
// convert between node-relative (stored) and root-relative (searched) form.
fn store_mate_adjustment(score: i32, ply_from_root: u32) -> i32 {
    if score.abs() > MATE_THRESHOLD {
        score + score.signum() * ply_from_root as i32
    } else {
        score
    }
}

fn retrieve_mate_adjustment(score: i32, ply_from_root: u32) -> i32 {
    if score.abs() > MATE_THRESHOLD {
        score - score.signum() * ply_from_root as i32
    } else {
        score
    }
}
