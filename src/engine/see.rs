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

//! Static exchange evaluation: the material outcome of a capture sequence on
//! a single square, assuming both sides capture rationally with their
//! cheapest attacker and may stop whenever continuing loses material.

use crate::base::{Bitboard, Board, Color, Move, Piece, Square};

/// Piece values used for exchanges, by uncolored kind. These are the
/// evaluator's material values; the king's value only matters in that no
/// recapture can follow it.
const SEE_VALUE: [i32; 6] = [100, 337, 365, 477, 1025, 20_000];

/// The deepest capture chain considered; no square has more attackers.
const MAX_EXCHANGE: usize = 30;

/// Find the cheapest piece of `side` inside `attackers`, scanning pawn
/// through king.
fn least_attacker(b: &Board, side: Color, attackers: Bitboard) -> Option<(Square, usize)> {
    for kind in 0..6 {
        let candidates = attackers & b[Piece::of(side, kind)];
        if let Some(sq) = candidates.first() {
            return Some((sq, kind));
        }
    }
    None
}

#[must_use]
/// Compute the static exchange value of a capture, in centipawns from the
/// mover's perspective. Positive means the capture sequence wins material.
///
/// Non-captures evaluate to zero.
pub fn see(b: &Board, m: Move) -> i32 {
    if !m.is_capture() {
        return 0;
    }
    let target = m.to();
    let victim_value = if m.is_en_passant() {
        SEE_VALUE[crate::base::piece::PAWN]
    } else {
        match b.piece_at(target) {
            Some(victim) => SEE_VALUE[victim.kind()],
            None => return 0,
        }
    };

    // the running occupancy: pieces leave it as they join the exchange
    let mut occ = b.occupied();
    occ.remove(m.from());
    if m.is_en_passant() {
        let behind = match b.side {
            Color::White => Square::from_index(target as u8 + 8),
            Color::Black => Square::from_index(target as u8 - 8),
        };
        occ.remove(behind);
    }

    let mut gains = [0i32; MAX_EXCHANGE + 2];
    gains[0] = victim_value;
    let mut depth = 0;
    let mut side = !b.side;
    // the piece currently standing on the target, about to be captured next
    let mut standing_value = SEE_VALUE[m.piece().kind()];

    while depth < MAX_EXCHANGE {
        let attackers = b.attackers_to(target, occ);
        let Some((from, kind)) = least_attacker(b, side, attackers) else {
            break;
        };
        depth += 1;
        gains[depth] = standing_value - gains[depth - 1];
        // neither side continues an exchange that is lost even if the
        // opponent stops immediately
        if gains[depth].max(-gains[depth - 1]) < 0 {
            break;
        }
        occ.remove(from);
        standing_value = SEE_VALUE[kind];
        side = !side;
    }

    // collapse the gain stack by rational minimax
    while depth > 0 {
        gains[depth - 1] = -(-gains[depth - 1]).max(gains[depth]);
        depth -= 1;
    }
    gains[0]
}

#[must_use]
/// Does the exchange value of `m` meet the threshold `t`?
///
/// Short-circuits: a non-capture passes exactly when `t <= 0`, and a capture
/// of an equal-or-more-valuable victim always passes.
pub fn see_ge(b: &Board, m: Move, t: i32) -> bool {
    if !m.is_capture() {
        return t <= 0;
    }
    if !m.is_en_passant() {
        if let Some(victim) = b.piece_at(m.to()) {
            if SEE_VALUE[victim.kind()] >= SEE_VALUE[m.piece().kind()] {
                return true;
            }
        }
    }
    see(b, m) >= t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::movegen::move_from_uci;

    fn see_of(fen: &str, uci: &str) -> i32 {
        let b = Board::from_fen(fen).unwrap();
        let m = move_from_uci(&b, uci).unwrap();
        see(&b, m)
    }

    #[test]
    fn undefended_pawn_is_free() {
        assert_eq!(see_of("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5"), 100);
    }

    #[test]
    fn defended_pawn_costs_the_capturer() {
        // pawn takes pawn, pawn recaptures: net 0
        assert_eq!(
            see_of("4k3/8/2p5/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5"),
            0
        );
        // knight takes defended pawn: win 100, lose 337
        assert_eq!(
            see_of("4k3/8/2p5/3p4/8/4N3/8/4K3 w - - 0 1", "e3d5"),
            100 - 337
        );
    }

    #[test]
    fn rook_takes_defended_rook_is_even() {
        assert_eq!(
            see_of("2r1k3/2r5/8/8/8/8/2R5/4K3 w - - 0 1", "c2c7"),
            0
        );
    }

    #[test]
    fn doubled_attackers_win_the_doubled_defender_exchange() {
        // both sides have doubled rooks on the c-file; the front black rook
        // hangs twice against one recapture, so White nets a rook
        assert_eq!(
            see_of("2r1k3/2r5/8/8/8/8/2R5/2R1K3 w - - 0 1", "c2c7"),
            477
        );
    }

    #[test]
    fn xrays_join_the_exchange() {
        // queen grabs a rook-defended pawn with no backup: loses queen for pawn
        assert_eq!(
            see_of("4k3/3r4/8/3p4/8/3Q4/8/4K3 w - - 0 1", "d3d5"),
            100 - 1025
        );
        // a rook lined up behind the queen x-rays through and recaptures
        assert_eq!(
            see_of("4k3/3r4/8/3p4/8/3Q4/3R4/4K3 w - - 0 1", "d3d5"),
            100 - 1025 + 477
        );
    }

    #[test]
    fn see_ge_short_circuits() {
        let b = Board::new();
        let quiet = move_from_uci(&b, "e2e4").unwrap();
        assert!(see_ge(&b, quiet, 0));
        assert!(see_ge(&b, quiet, -50));
        assert!(!see_ge(&b, quiet, 1));
    }

    #[test]
    fn equal_victim_is_trivially_good() {
        // queen takes queen, even if horribly defended, passes see_ge
        let b =
            Board::from_fen("4k3/2r5/3q4/8/8/8/3Q4/4K3 w - - 0 1").unwrap();
        let m = move_from_uci(&b, "d2d6").unwrap();
        assert!(see_ge(&b, m, 0));
    }
}
