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

//! Polyglot-format opening books.
//!
//! A Polyglot book is a sorted array of big-endian 16-byte records:
//! a 64-bit position key, a 16-bit packed move, a 16-bit weight, and a
//! 32-bit learn field (ignored here). Probing binary-searches the key and
//! picks among the matching entries weighted-randomly, so the engine varies
//! its openings between games.
//!
//! Position keys come from the standard 781-entry Polyglot random table.
//! This build does not carry that table (see `POLYGLOT_RANDOM` below), and
//! an incomplete table cannot be used: hashing with made-up constants
//! would silently match nothing in any real book. [`Book::load`] therefore
//! refuses until the verbatim table is supplied, and the engine searches
//! normally. All of the machinery below is complete and keyed generically,
//! so dropping in the full table enables probing with no other changes.

use crate::base::{
    attacks::pawn_attacks, movegen::legal_moves, piece::KING, Board, Color, Move, Piece, Square,
};

/// The number of entries in the standard Polyglot random table.
const POLYGLOT_KEY_COUNT: usize = 781;

/// A complete Polyglot key table: 768 piece keys, 4 castling keys, 8
/// en-passant file keys, and one turn key, in that order.
pub type KeyTable = [u64; POLYGLOT_KEY_COUNT];

/// What this build carries of the standard `polyglot_random64` table:
/// nothing. The table must be the published constants verbatim or not be
/// used at all; book loading refuses while it is incomplete.
const POLYGLOT_RANDOM: &[u64] = &[];

/// Offsets of the non-piece key groups inside a [`KeyTable`].
const CASTLE_OFFSET: usize = 768;
const EP_OFFSET: usize = 772;
const TURN_OFFSET: usize = 780;

/// The standard key table, if this build carries all of it.
fn standard_keys() -> Option<&'static KeyTable> {
    POLYGLOT_RANDOM.try_into().ok()
}

/// Polyglot piece index: black pawn 0, white pawn 1, black knight 2, and so
/// on through white king 11.
fn polyglot_piece(piece: Piece) -> usize {
    let color_bit = match piece.color() {
        Color::White => 1,
        Color::Black => 0,
    };
    2 * piece.kind() + color_bit
}

/// Polyglot square index: `8 * rank + file` with A1 = 0.
fn polyglot_square(sq: Square) -> usize {
    8 * sq.rank() as usize + sq.file() as usize
}

#[must_use]
/// Compute the Polyglot book key of a position under the given key table.
pub fn polyglot_key(b: &Board, keys: &KeyTable) -> u64 {
    let mut key = 0;
    for piece in Piece::ALL {
        for sq in b[piece] {
            key ^= keys[64 * polyglot_piece(piece) + polyglot_square(sq)];
        }
    }

    if b.castle.can_kingside(Color::White) {
        key ^= keys[CASTLE_OFFSET];
    }
    if b.castle.can_queenside(Color::White) {
        key ^= keys[CASTLE_OFFSET + 1];
    }
    if b.castle.can_kingside(Color::Black) {
        key ^= keys[CASTLE_OFFSET + 2];
    }
    if b.castle.can_queenside(Color::Black) {
        key ^= keys[CASTLE_OFFSET + 3];
    }

    // the en-passant file only counts when a capture is actually possible
    if let Some(ep) = b.ep_square {
        if (pawn_attacks(!b.side, ep) & b[Piece::pawn(b.side)]).has_any() {
            key ^= keys[EP_OFFSET + ep.file() as usize];
        }
    }

    if b.side == Color::White {
        key ^= keys[TURN_OFFSET];
    }
    key
}

#[derive(Clone, Copy, Debug)]
/// One decoded book record.
struct BookEntry {
    key: u64,
    raw_move: u16,
    weight: u16,
}

/// An opening book, held in memory and sorted by key.
#[derive(Debug)]
pub struct Book {
    entries: Vec<BookEntry>,
    keys: &'static KeyTable,
    rng: fastrand::Rng,
}

impl Book {
    /// Read a book from a file.
    ///
    /// # Errors
    ///
    /// Refuses outright while the standard Polyglot key table is not
    /// carried in full; also returns an `Err` if the file cannot be read
    /// or is not a whole number of records.
    pub fn load(path: &str) -> Result<Book, String> {
        let Some(keys) = standard_keys() else {
            return Err(
                "the standard Polyglot key table is incomplete in this build; \
                 refusing to load a book rather than hash with wrong keys"
                    .into(),
            );
        };
        let bytes = std::fs::read(path).map_err(|e| format!("cannot read `{path}`: {e}"))?;
        Book::from_bytes(&bytes, keys)
    }

    /// Decode a book from raw bytes, probing with the given key table.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the data is not a whole number of 16-byte
    /// records.
    pub fn from_bytes(bytes: &[u8], keys: &'static KeyTable) -> Result<Book, String> {
        if bytes.len() % 16 != 0 {
            return Err("book data is not a whole number of 16-byte records".into());
        }
        let mut entries: Vec<BookEntry> = bytes
            .chunks_exact(16)
            .map(|record| BookEntry {
                key: u64::from_be_bytes(record[0..8].try_into().unwrap_or([0; 8])),
                raw_move: u16::from_be_bytes(record[8..10].try_into().unwrap_or([0; 2])),
                weight: u16::from_be_bytes(record[10..12].try_into().unwrap_or([0; 2])),
            })
            .collect();
        // books are sorted by key on disk, but do not rely on it
        entries.sort_by_key(|e| e.key);
        Ok(Book {
            entries,
            keys,
            rng: fastrand::Rng::with_seed(0x7a6e_11c3_55d0_8f42),
        })
    }

    #[must_use]
    /// The number of records in the book.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// Is the book empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    /// Look up the current position. Picks weighted-randomly among the
    /// stored moves and converts the winner to an internal move, which is
    /// guaranteed legal (unmatchable records are skipped).
    pub fn probe(&self, b: &Board) -> Option<Move> {
        let key = polyglot_key(b, self.keys);
        let lo = self.entries.partition_point(|e| e.key < key);
        let hi = lo + self.entries[lo..].partition_point(|e| e.key == key);
        let matches = &self.entries[lo..hi];
        if matches.is_empty() {
            return None;
        }

        let total: u64 = matches.iter().map(|e| u64::from(e.weight).max(1)).sum();
        let mut ticket = self.rng.u64(0..total);
        for entry in matches {
            let weight = u64::from(entry.weight).max(1);
            if ticket < weight {
                if let Some(m) = decode_move(entry.raw_move, b) {
                    return Some(m);
                }
                // fall through and try the next candidate
            }
            ticket = ticket.saturating_sub(weight);
        }
        // the ticket landed on an undecodable record; take anything legal
        matches.iter().find_map(|e| decode_move(e.raw_move, b))
    }
}

/// Convert the Polyglot 16-bit move encoding into an internal move by
/// matching against the position's legal moves. Polyglot encodes castling as
/// king-takes-rook (e1h1), which is remapped to the internal king-two-steps
/// form.
fn decode_move(raw: u16, b: &Board) -> Option<Move> {
    let to_file = (raw & 7) as u8;
    let to_rank = (raw >> 3 & 7) as u8;
    let from_file = (raw >> 6 & 7) as u8;
    let from_rank = (raw >> 9 & 7) as u8;
    let promo = (raw >> 12 & 7) as usize;

    let from = Square::new(from_file, from_rank);
    let mut to = Square::new(to_file, to_rank);

    // promo piece kinds: 0 none, 1 knight, 2 bishop, 3 rook, 4 queen
    let promo_kind = match promo {
        0 => None,
        n @ 1..=4 => Some(n),
        _ => return None,
    };

    // king-takes-own-rook means castling
    if b.piece_at(from).map(Piece::kind) == Some(KING) {
        to = match (from, to) {
            (Square::E1, Square::H1) => Square::G1,
            (Square::E1, Square::A1) => Square::C1,
            (Square::E8, Square::H8) => Square::G8,
            (Square::E8, Square::A8) => Square::C8,
            _ => to,
        };
    }

    legal_moves(b).into_iter().find(|m| {
        m.from() == from && m.to() == to && m.promotion().map(Piece::kind) == promo_kind
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use once_cell::sync::Lazy;

    /// A synthetic key table standing in for the standard one, so the
    /// probing machinery can be exercised. Production loading refuses
    /// until the real constants are present; these are test fixtures only.
    static TEST_KEYS: Lazy<KeyTable> = Lazy::new(|| {
        let rng = fastrand::Rng::with_seed(0x1e57_ab1e);
        let mut keys = [0u64; POLYGLOT_KEY_COUNT];
        for key in &mut keys {
            *key = rng.u64(..);
        }
        keys
    });

    /// Build the raw Polyglot encoding of a move.
    fn encode(from: Square, to: Square, promo: u16) -> u16 {
        u16::from(to.file())
            | u16::from(to.rank()) << 3
            | u16::from(from.file()) << 6
            | u16::from(from.rank()) << 9
            | promo << 12
    }

    /// Build a 16-byte record.
    fn record(key: u64, raw_move: u16, weight: u16) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&key.to_be_bytes());
        bytes[8..10].copy_from_slice(&raw_move.to_be_bytes());
        bytes[10..12].copy_from_slice(&weight.to_be_bytes());
        bytes
    }

    #[test]
    /// Loading must refuse while the standard table is incomplete, before
    /// it ever touches the filesystem.
    fn load_refuses_without_the_standard_table() {
        assert!(standard_keys().is_none());
        let err = Book::load("no-such-book.bin").unwrap_err();
        assert!(err.contains("Polyglot key table"));
    }

    #[test]
    fn key_distinguishes_positions() {
        let start = Board::new();
        let other =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_ne!(
            polyglot_key(&start, &TEST_KEYS),
            polyglot_key(&other, &TEST_KEYS)
        );
    }

    #[test]
    fn ep_key_needs_a_capturing_pawn() {
        // same position, but in the first FEN no pawn can take en passant
        let no_capture =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        let mut no_ep = no_capture;
        no_ep.ep_square = None;
        assert_eq!(
            polyglot_key(&no_capture, &TEST_KEYS),
            polyglot_key(&no_ep, &TEST_KEYS)
        );

        // here the d4 pawn really can capture on e3
        let capture = Board::from_fen(
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3",
        )
        .unwrap();
        let mut capture_no_ep = capture;
        capture_no_ep.ep_square = None;
        assert_ne!(
            polyglot_key(&capture, &TEST_KEYS),
            polyglot_key(&capture_no_ep, &TEST_KEYS)
        );
    }

    #[test]
    fn probe_finds_the_stored_move() {
        let b = Board::new();
        let raw = encode(Square::E2, Square::E4, 0);
        let bytes = record(polyglot_key(&b, &TEST_KEYS), raw, 10);
        let book = Book::from_bytes(&bytes, &TEST_KEYS).unwrap();
        assert_eq!(book.len(), 1);
        let m = book.probe(&b).unwrap();
        assert_eq!(m.to_uci(), "e2e4");
        assert!(m.is_double_push());
    }

    #[test]
    fn probe_misses_other_positions() {
        let b = Board::new();
        let bytes = record(12345, encode(Square::E2, Square::E4, 0), 10);
        let book = Book::from_bytes(&bytes, &TEST_KEYS).unwrap();
        assert!(book.probe(&b).is_none());
    }

    #[test]
    fn weighted_pick_stays_within_the_matches() {
        let b = Board::new();
        let key = polyglot_key(&b, &TEST_KEYS);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&record(key, encode(Square::E2, Square::E4, 0), 3));
        bytes.extend_from_slice(&record(key, encode(Square::D2, Square::D4, 0), 1));
        // an unrelated entry that must never be picked
        bytes.extend_from_slice(&record(key.wrapping_add(1), encode(Square::A2, Square::A3, 0), 100));
        let book = Book::from_bytes(&bytes, &TEST_KEYS).unwrap();
        for _ in 0..50 {
            let m = book.probe(&b).unwrap();
            assert!(m.to_uci() == "e2e4" || m.to_uci() == "d2d4");
        }
    }

    #[test]
    fn castle_encoding_is_remapped() {
        let b = Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let raw = encode(Square::E1, Square::H1, 0);
        let m = decode_move(raw, &b).unwrap();
        assert!(m.is_castle());
        assert_eq!(m.to(), Square::G1);
    }

    #[test]
    fn promotion_decoding() {
        let b = Board::from_fen("8/5P1k/8/8/8/8/8/6K1 w - - 0 1").unwrap();
        let raw = encode(Square::F7, Square::F8, 4);
        let m = decode_move(raw, &b).unwrap();
        assert_eq!(m.promotion(), Some(Piece::WhiteQueen));
    }

    #[test]
    fn truncated_books_are_rejected() {
        assert!(Book::from_bytes(&[0u8; 15], &TEST_KEYS).is_err());
        assert!(Book::from_bytes(&[], &TEST_KEYS).unwrap().is_empty());
    }
}
