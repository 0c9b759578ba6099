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

//! The score type shared by evaluation and search.

use std::{
    fmt::{Display, Formatter},
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
/// A search score in centipawns, always from the perspective of the side to
/// move at the node where it was produced.
///
/// Values with magnitude above [`Eval::MATE_ZONE`] encode forced mates:
/// `MATE - n` means the mover delivers mate in `n` plies, and `-MATE + n`
/// means the mover is mated in `n` plies. Every score the engine produces
/// fits in an `i16`, which is what the transposition table stores.
pub struct Eval(i32);

impl Eval {
    /// The score of a dead-drawn position.
    pub const DRAW: Eval = Eval(0);

    /// A bound strictly larger than every reachable score.
    pub const INFINITY: Eval = Eval(32_500);

    /// The score of delivering mate at the current node.
    pub const MATE: Eval = Eval(32_000);

    /// Scores with magnitude above this are mate scores, whose distance from
    /// [`Eval::MATE`] counts plies to the mate.
    pub const MATE_ZONE: i32 = 31_000;

    #[must_use]
    /// Construct an `Eval` from a centipawn value.
    pub const fn cp(value: i32) -> Eval {
        Eval(value)
    }

    #[must_use]
    /// Get the centipawn value of this score.
    pub const fn value(self) -> i32 {
        self.0
    }

    #[must_use]
    /// The score for the mover delivering mate `ply` plies from the root.
    pub const fn mate_in(ply: usize) -> Eval {
        Eval(Eval::MATE.0 - ply as i32)
    }

    #[must_use]
    /// The score for the mover being mated `ply` plies from the root.
    pub const fn mated_in(ply: usize) -> Eval {
        Eval(-Eval::MATE.0 + ply as i32)
    }

    #[must_use]
    /// Is this score a forced mate for either side?
    pub const fn is_mate(self) -> bool {
        self.0 > Eval::MATE_ZONE || self.0 < -Eval::MATE_ZONE
    }

    #[must_use]
    /// If this is a mate score, the signed number of full moves to the mate:
    /// positive when the mover wins, negative when the mover is mated. This
    /// is the `N` of the UCI `score mate N` field.
    pub const fn moves_to_mate(self) -> Option<i32> {
        if self.0 > Eval::MATE_ZONE {
            Some((Eval::MATE.0 - self.0 + 1) / 2)
        } else if self.0 < -Eval::MATE_ZONE {
            Some(-((Eval::MATE.0 + self.0 + 1) / 2))
        } else {
            None
        }
    }

    #[must_use]
    /// Clamp this score into the open interval
    /// `(-INFINITY, INFINITY)`.
    pub fn clamp_finite(self) -> Eval {
        Eval(self.0.clamp(-Eval::INFINITY.0 + 1, Eval::INFINITY.0 - 1))
    }
}

impl Neg for Eval {
    type Output = Eval;
    fn neg(self) -> Eval {
        Eval(-self.0)
    }
}

impl Add for Eval {
    type Output = Eval;
    fn add(self, rhs: Eval) -> Eval {
        Eval(self.0 + rhs.0)
    }
}

impl Sub for Eval {
    type Output = Eval;
    fn sub(self, rhs: Eval) -> Eval {
        Eval(self.0 - rhs.0)
    }
}

impl Add<i32> for Eval {
    type Output = Eval;
    fn add(self, rhs: i32) -> Eval {
        Eval(self.0 + rhs)
    }
}

impl Sub<i32> for Eval {
    type Output = Eval;
    fn sub(self, rhs: i32) -> Eval {
        Eval(self.0 - rhs)
    }
}

impl AddAssign for Eval {
    fn add_assign(&mut self, rhs: Eval) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Eval {
    fn sub_assign(&mut self, rhs: Eval) {
        self.0 -= rhs.0;
    }
}

impl Display for Eval {
    /// Format this score the way the UCI `score` info field wants it.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.moves_to_mate() {
            Some(moves) => write!(f, "mate {moves}"),
            None => write!(f, "cp {}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_scores_order_correctly() {
        assert!(Eval::mate_in(1) > Eval::mate_in(3));
        assert!(Eval::mate_in(3) > Eval::cp(500));
        assert!(Eval::mated_in(2) < Eval::cp(-500));
        assert!(Eval::mated_in(2) < Eval::mated_in(4));
        assert!(Eval::INFINITY > Eval::mate_in(0));
    }

    #[test]
    fn mate_distances() {
        assert_eq!(Eval::mate_in(1).moves_to_mate(), Some(1));
        assert_eq!(Eval::mate_in(2).moves_to_mate(), Some(1));
        assert_eq!(Eval::mate_in(3).moves_to_mate(), Some(2));
        assert_eq!(Eval::mated_in(2).moves_to_mate(), Some(-1));
        assert_eq!(Eval::cp(250).moves_to_mate(), None);
    }

    #[test]
    fn uci_formatting() {
        assert_eq!(Eval::cp(34).to_string(), "cp 34");
        assert_eq!(Eval::cp(-120).to_string(), "cp -120");
        assert_eq!(Eval::mate_in(3).to_string(), "mate 2");
        assert_eq!(Eval::mated_in(4).to_string(), "mate -2");
    }

    #[test]
    fn negation_flips_perspective() {
        assert_eq!(-Eval::mate_in(5), Eval::mated_in(5));
        assert_eq!(-Eval::cp(88), Eval::cp(-88));
    }

    #[test]
    fn everything_fits_in_i16() {
        assert!(Eval::INFINITY.value() <= i32::from(i16::MAX));
        assert!(-Eval::INFINITY.value() >= i32::from(i16::MIN));
    }
}
