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

//! Zobrist hashing: incremental 64-bit position hashes built from the XOR of
//! precomputed random keys.
//!
//! The keys are drawn once from a fixed-seed generator, so every run of the
//! engine produces identical hashes and searches are reproducible.

use super::{CastleRights, Color, Piece, Square};

use once_cell::sync::Lazy;

/// Seed for the key generator. Changing this value changes every hash the
/// engine ever computes.
const ZOBRIST_SEED: u64 = 0x9c1b_02f0_2d4e_7a31;

/// The full set of Zobrist keys.
pub struct ZobristKeys {
    /// One key per (piece, square) pair.
    pub pieces: [[u64; 64]; Piece::NUM],
    /// One key per castling-rights set, indexed by the 4-bit set value.
    pub castling: [u64; 16],
    /// One key per possible en-passant square.
    pub en_passant: [u64; 64],
    /// Key XORed in when Black is to move.
    pub side: u64,
}

/// The singleton key table.
pub static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let rng = fastrand::Rng::with_seed(ZOBRIST_SEED);
    let mut keys = ZobristKeys {
        pieces: [[0; 64]; Piece::NUM],
        castling: [0; 16],
        en_passant: [0; 64],
        side: 0,
    };
    for row in &mut keys.pieces {
        for key in row.iter_mut() {
            *key = rng.u64(..);
        }
    }
    for key in &mut keys.castling {
        *key = rng.u64(..);
    }
    for key in &mut keys.en_passant {
        *key = rng.u64(..);
    }
    keys.side = rng.u64(..);
    keys
});

#[must_use]
/// Get the key for a piece standing on a square.
pub fn piece_key(piece: Piece, sq: Square) -> u64 {
    KEYS.pieces[piece as usize][sq.index()]
}

#[must_use]
/// Get the key for a set of castling rights.
pub fn castle_key(rights: CastleRights) -> u64 {
    KEYS.castling[rights.index()]
}

#[must_use]
/// Get the key for an en-passant square.
pub fn ep_key(sq: Square) -> u64 {
    KEYS.en_passant[sq.index()]
}

#[must_use]
/// Get the key for the side to move. XORed in exactly when Black moves.
pub fn side_key(side: Color) -> u64 {
    match side {
        Color::White => 0,
        Color::Black => KEYS.side,
    }
}
