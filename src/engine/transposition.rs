/*
  Tenor, a UCI-compatible chess engine.
  Copyright (C) 2026 The Tenor Authors.

  Tenor is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Tenor is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The transposition table: a direct-mapped cache from Zobrist hashes to
//! search results.
//!
//! Mate scores need care: a mate found at some node is "mate in n plies
//! *from that node*", but the same position can be reached at a different
//! ply. Entries therefore store mate distances relative to the entry itself;
//! [`TTable::read`] and [`TTable::write`] convert to and from
//! root-relative scores using the probing node's ply.

use crate::base::Move;

use super::eval::Eval;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a stored value proves about its position.
pub enum Bound {
    /// The value is exact: alpha was raised and beta never cut.
    Exact,
    /// The search failed high; the value is a lower bound.
    Lower,
    /// The search failed low; the value is an upper bound.
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One table entry. An all-zero hash doubles as the empty marker; real
/// positions essentially never hash to zero, and a spurious match still
/// passes through the usual legality screening of the stored move.
pub struct Entry {
    /// The full hash of the stored position.
    pub hash: u64,
    /// The packed best move found, possibly `Move::NONE`.
    pub best_move: Move,
    /// The stored value, mate-distance-normalized to the entry.
    pub value: i16,
    /// The depth the position was searched to.
    pub depth: u8,
    /// What the value proves.
    pub bound: Bound,
    /// The search generation that wrote the entry.
    pub generation: u8,
}

impl Entry {
    const EMPTY: Entry = Entry {
        hash: 0,
        best_move: Move::NONE,
        value: 0,
        depth: 0,
        bound: Bound::Exact,
        generation: 0,
    };

    #[must_use]
    /// Decode this entry's value into a score at `ply` plies from the
    /// current root, undoing the mate normalization.
    pub fn score_at(&self, ply: usize) -> Eval {
        let v = i32::from(self.value);
        if v > Eval::MATE_ZONE {
            Eval::cp(v) - ply as i32
        } else if v < -Eval::MATE_ZONE {
            Eval::cp(v) + ply as i32
        } else {
            Eval::cp(v)
        }
    }
}

/// Fallback number of entries when an allocation request cannot be honored.
const DEFAULT_ENTRIES: usize = 4 * 1024 * 1024 / std::mem::size_of::<Entry>();

/// A direct-mapped transposition table. Indexing is `hash % len`; probes
/// return a hit only when the full stored hash matches.
pub struct TTable {
    entries: Vec<Entry>,
    /// Bumped once per search root so that replacement can prefer fresh
    /// results without a full clear.
    generation: u8,
}

impl TTable {
    #[must_use]
    /// Create a table using `size_mb` megabytes, clamped to at least 1024
    /// entries. Falls back to a small default if the allocation fails, and
    /// to the smallest table if even that fails.
    pub fn with_size_mb(size_mb: usize) -> TTable {
        let wanted = (size_mb << 20) / std::mem::size_of::<Entry>();
        TTable {
            entries: allocate(wanted.max(1024)),
            generation: 0,
        }
    }

    /// Resize the table to `size_mb` megabytes, dropping all entries. If
    /// the new allocation fails the old table is kept (per the engine's
    /// no-crash policy for option handling).
    pub fn resize_mb(&mut self, size_mb: usize) {
        let wanted = ((size_mb << 20) / std::mem::size_of::<Entry>()).max(1024);
        let mut fresh = Vec::new();
        if fresh.try_reserve_exact(wanted).is_ok() {
            fresh.resize(wanted, Entry::EMPTY);
            self.entries = fresh;
        }
    }

    #[must_use]
    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// Is the table empty? (It never is; this exists for `len` symmetry.)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything. Used on `ucinewgame`.
    pub fn clear(&mut self) {
        self.entries.fill(Entry::EMPTY);
        self.generation = 0;
    }

    /// Start a new search: entries written from now on are fresher than
    /// everything already stored.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn index_of(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    #[must_use]
    /// Fetch the entry for `hash`, if one is stored.
    pub fn probe(&self, hash: u64) -> Option<Entry> {
        let entry = self.entries[self.index_of(hash)];
        (entry.hash == hash && entry.hash != 0).then_some(entry)
    }

    #[must_use]
    /// Probe for a score usable at a node with the given bounds and depth.
    /// Returns the cutoff score on a usable hit, and separately the stored
    /// best move (useful for ordering even when the score is not usable).
    pub fn read(
        &self,
        hash: u64,
        alpha: Eval,
        beta: Eval,
        depth: i32,
        ply: usize,
    ) -> (Option<Eval>, Move) {
        let Some(entry) = self.probe(hash) else {
            return (None, Move::NONE);
        };
        let best_move = entry.best_move;
        if i32::from(entry.depth) < depth {
            return (None, best_move);
        }
        let score = entry.score_at(ply);
        let usable = match entry.bound {
            Bound::Exact => Some(score),
            Bound::Lower => (score >= beta).then_some(beta),
            Bound::Upper => (score <= alpha).then_some(alpha),
        };
        (usable, best_move)
    }

    /// Store a search result. `value` is a score at `ply` plies from the
    /// root; it is renormalized so the entry is root-independent.
    ///
    /// Replacement policy: take the slot if it is empty, stores the same
    /// position, was searched no deeper, or holds a non-exact bound while
    /// the incoming result is exact.
    pub fn write(
        &mut self,
        hash: u64,
        depth: i32,
        value: Eval,
        bound: Bound,
        best_move: Move,
        ply: usize,
    ) {
        let index = self.index_of(hash);
        let old = &self.entries[index];

        let replace = old.hash == 0
            || old.hash == hash
            || u32::from(old.depth) <= depth as u32
            || (bound == Bound::Exact && old.bound != Bound::Exact);
        if !replace {
            return;
        }

        let v = value.value();
        let normalized = if v > Eval::MATE_ZONE {
            v + ply as i32
        } else if v < -Eval::MATE_ZONE {
            v - ply as i32
        } else {
            v
        };

        #[allow(clippy::cast_possible_truncation)]
        let entry = Entry {
            hash,
            best_move,
            value: normalized as i16,
            depth: depth.clamp(0, 255) as u8,
            bound,
            generation: self.generation,
        };
        self.entries[index] = entry;
    }
}

/// Allocate a zeroed entry vector, degrading gracefully on failure.
fn allocate(wanted: usize) -> Vec<Entry> {
    for size in [wanted, DEFAULT_ENTRIES, 1024] {
        let mut v = Vec::new();
        if v.try_reserve_exact(size).is_ok() {
            v.resize(size, Entry::EMPTY);
            return v;
        }
    }
    // a 1024-entry table is a few tens of kilobytes; if that failed, the
    // process is beyond saving anyway
    vec![Entry::EMPTY; 1024]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{Piece, Square};

    fn test_table() -> TTable {
        TTable::with_size_mb(1)
    }

    #[test]
    fn miss_on_empty() {
        let tt = test_table();
        assert!(tt.probe(0xdead_beef).is_none());
    }

    #[test]
    fn exact_roundtrip() {
        let mut tt = test_table();
        let m = Move::quiet(Square::E2, Square::E4, Piece::WhitePawn);
        tt.write(42, 7, Eval::cp(133), Bound::Exact, m, 3);

        let (score, best) = tt.read(42, -Eval::INFINITY, Eval::INFINITY, 7, 3);
        assert_eq!(score, Some(Eval::cp(133)));
        assert_eq!(best, m);
    }

    #[test]
    fn shallow_entries_only_give_moves() {
        let mut tt = test_table();
        let m = Move::quiet(Square::G1, Square::F3, Piece::WhiteKnight);
        tt.write(42, 4, Eval::cp(50), Bound::Exact, m, 0);

        // probing deeper than stored: no score, but the move survives
        let (score, best) = tt.read(42, -Eval::INFINITY, Eval::INFINITY, 6, 0);
        assert_eq!(score, None);
        assert_eq!(best, m);
    }

    #[test]
    fn bounds_respect_the_window() {
        let mut tt = test_table();
        tt.write(7, 5, Eval::cp(300), Bound::Lower, Move::NONE, 0);
        // beta below the bound: cutoff at beta
        let (score, _) = tt.read(7, Eval::cp(0), Eval::cp(200), 5, 0);
        assert_eq!(score, Some(Eval::cp(200)));
        // beta above the bound: no cutoff
        let (score, _) = tt.read(7, Eval::cp(0), Eval::cp(400), 5, 0);
        assert_eq!(score, None);

        tt.write(9, 5, Eval::cp(-300), Bound::Upper, Move::NONE, 0);
        let (score, _) = tt.read(9, Eval::cp(-200), Eval::cp(200), 5, 0);
        assert_eq!(score, Some(Eval::cp(-200)));
    }

    #[test]
    /// A mate score stored at ply 4 and read back at ply 2 must be two
    /// plies closer to the root's perspective of the entry.
    fn mate_distance_normalization() {
        let mut tt = test_table();
        // mate in 3 plies from a node at ply 4
        tt.write(99, 8, Eval::mate_in(7), Bound::Exact, Move::NONE, 4);
        let (score, _) = tt.read(99, -Eval::INFINITY, Eval::INFINITY, 8, 2);
        // from ply 2 the same mate is 3 plies away: mate at ply 5
        assert_eq!(score, Some(Eval::mate_in(5)));
    }

    #[test]
    fn deeper_results_replace_shallower() {
        let mut tt = test_table();
        tt.write(5, 4, Eval::cp(10), Bound::Exact, Move::NONE, 0);
        tt.write(5, 9, Eval::cp(99), Bound::Exact, Move::NONE, 0);
        let (score, _) = tt.read(5, -Eval::INFINITY, Eval::INFINITY, 9, 0);
        assert_eq!(score, Some(Eval::cp(99)));
    }

    #[test]
    fn colliding_hashes_do_not_false_hit() {
        let mut tt = test_table();
        let n = tt.len() as u64;
        tt.write(3, 4, Eval::cp(10), Bound::Exact, Move::NONE, 0);
        // same slot, different hash
        assert!(tt.probe(3 + n).is_none());
    }

    #[test]
    fn clear_forgets() {
        let mut tt = test_table();
        tt.write(3, 4, Eval::cp(10), Bound::Exact, Move::NONE, 0);
        tt.clear();
        assert!(tt.probe(3).is_none());
    }
}
