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

//! Castling rights management.

use super::Color;

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The castling rights of both players, stored as a 4-bit set.
/// From LSB upward: White kingside, White queenside, Black kingside, Black
/// queenside. The integer value of the set indexes the Zobrist castling key
/// table.
pub struct CastleRights(pub u8);

impl CastleRights {
    /// Rights where every castle is available.
    pub const ALL: CastleRights = CastleRights(15);

    /// Rights where no castle is available.
    pub const NONE: CastleRights = CastleRights(0);

    #[must_use]
    /// The kingside castling right of one color.
    pub const fn kingside(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights(1),
            Color::Black => CastleRights(4),
        }
    }

    #[must_use]
    /// The queenside castling right of one color.
    pub const fn queenside(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights(2),
            Color::Black => CastleRights(8),
        }
    }

    #[must_use]
    /// Can the given color still castle kingside?
    pub const fn can_kingside(self, color: Color) -> bool {
        self.0 & CastleRights::kingside(color).0 != 0
    }

    #[must_use]
    /// Can the given color still castle queenside?
    pub const fn can_queenside(self, color: Color) -> bool {
        self.0 & CastleRights::queenside(color).0 != 0
    }

    #[must_use]
    /// Get the index of this set of rights, for Zobrist key lookup.
    pub const fn index(self) -> usize {
        (self.0 & 15) as usize
    }
}

/// Per-square masks applied to the castling rights when a move touches that
/// square. Touching e1 strips both of White's rights, touching h1 strips
/// White kingside, a1 strips White queenside, and likewise for Black's back
/// rank. Every other square leaves the rights alone.
#[rustfmt::skip]
pub const CASTLE_MASK: [u8; 64] = [
     7, 15, 15, 15,  3, 15, 15, 11,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    13, 15, 15, 15, 12, 15, 15, 14,
];

impl BitOr for CastleRights {
    type Output = CastleRights;
    fn bitor(self, rhs: CastleRights) -> CastleRights {
        CastleRights(self.0 | rhs.0)
    }
}

impl BitOrAssign for CastleRights {
    fn bitor_assign(&mut self, rhs: CastleRights) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CastleRights {
    type Output = CastleRights;
    fn bitand(self, rhs: CastleRights) -> CastleRights {
        CastleRights(self.0 & rhs.0)
    }
}

impl BitAndAssign for CastleRights {
    fn bitand_assign(&mut self, rhs: CastleRights) {
        self.0 &= rhs.0;
    }
}
