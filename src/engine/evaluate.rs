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

//! Static evaluation of positions.
//!
//! The evaluation is a sum of handcrafted rules, each contributing a
//! quantity in centipawns. Like most classical evaluations it is "tapered":
//! some rules carry different weights in the middlegame and the endgame, and
//! the two weightings are blended by the amount of material remaining.
//!
//! The flavor of this evaluation is constriction: beyond the usual material
//! and mobility terms it rewards controlling space in the enemy half,
//! cramping the opponent's minor pieces, and keeping pieces near the enemy
//! king, so the engine naturally squeezes rather than lashes out.
//!
//! Every rule is color-symmetric. The returned score is always from the
//! perspective of the side to move.

use crate::base::{
    attacks::{bishop_attacks, king_attacks, knight_attacks, queen_attacks, pawn_attacks,
        rook_attacks},
    piece::{BISHOP, KNIGHT, QUEEN, ROOK},
    Bitboard, Board, Color, Piece, Square,
};

use super::eval::Eval;

/// Material values by uncolored piece kind, pawn through king.
pub const MATERIAL: [i32; 6] = [100, 337, 365, 477, 1025, 20_000];

/// Bonus for owning both bishops.
const BISHOP_PAIR: i32 = 50;

/// Bonus for the side to move.
const TEMPO: i32 = 10;

/// The game phase of a position with all pieces on the board: 4 minors,
/// 4 rooks and 2 queens per the weights below.
pub const PHASE_MAX: i32 = 24;

/// Pawn-structure penalties.
const DOUBLED_PAWN: i32 = 10;
const ISOLATED_PAWN: i32 = 20;
const BACKWARD_PAWN: i32 = 15;
const PAWN_CHAIN: i32 = 10;
const PROTECTED_PASSER: i32 = 15;
const SHELTER_PAWN: i32 = 10;

/// Mobility weights by kind.
const KNIGHT_MOBILITY: i32 = 4;
const BISHOP_MOBILITY: i32 = 5;
const ROOK_MOBILITY: i32 = 2;
const QUEEN_MOBILITY: i32 = 1;

/// Outpost bonuses.
const KNIGHT_OUTPOST: i32 = 25;
const BISHOP_OUTPOST: i32 = 15;

/// Rook file and rank bonuses.
const ROOK_OPEN_FILE: i32 = 25;
const ROOK_SEMI_OPEN_FILE: i32 = 15;
const ROOK_SEVENTH: i32 = 30;
const CONNECTED_ROOKS: i32 = 15;

/// Space: each attacked square in the enemy half, middlegame only.
const SPACE_WEIGHT: i32 = 2;

/// A minor piece reaching fewer than this many squares is "restricted" and
/// penalized per missing square.
const MINOR_MOBILITY_PAR: i32 = 4;
const RESTRICTION_PENALTY: i32 = 8;

/// King-tropism weights by kind, doubled so that the rook's 1.5 stays an
/// integer; the accumulated total is halved at the end.
const TROPISM_X2: [i32; 6] = [0, 6, 6, 3, 12, 0];

/// King-attack units by kind for the attack-weight safety model.
const KING_ATTACK_UNIT: [i32; 6] = [0, 25, 25, 50, 100, 0];

/// Mask of the A file; shifting left walks the files eastward.
const FILE_A: Bitboard = Bitboard::new(0x0101_0101_0101_0101);

/// Manhattan distance from each square to the nearest of the four center
/// squares. Drives the mop-up term that pushes a lone defending king to the
/// rim.
const CENTER_MANHATTAN: [i32; 64] = {
    let mut table = [0; 64];
    let mut i = 0u8;
    while i < 64 {
        let row = (i / 8) as i32;
        let file = (i % 8) as i32;
        // the center 2x2 block lives on rows 3..5 and files 3..5
        let dr = if row < 3 { 3 - row } else if row > 4 { row - 4 } else { 0 };
        let df = if file < 3 { 3 - file } else if file > 4 { file - 4 } else { 0 };
        table[i as usize] = dr + df;
        i += 1;
    }
    table
};

#[must_use]
/// Compute the game phase of a position, from 0 (bare kings and pawns) to
/// [`PHASE_MAX`] (full armies): one point per minor, two per rook, four per
/// queen.
pub fn game_phase(b: &Board) -> i32 {
    let minors = (b[Piece::WhiteKnight]
        | b[Piece::BlackKnight]
        | b[Piece::WhiteBishop]
        | b[Piece::BlackBishop])
        .len() as i32;
    let rooks = (b[Piece::WhiteRook] | b[Piece::BlackRook]).len() as i32;
    let queens = (b[Piece::WhiteQueen] | b[Piece::BlackQueen]).len() as i32;
    (minors + 2 * rooks + 4 * queens).min(PHASE_MAX)
}

/// Accumulated terms for one side. `always` applies at every phase; `mg` and
/// `eg` are blended by the phase weight.
#[derive(Default)]
struct SideTerms {
    always: i32,
    mg: i32,
    eg: i32,
}

fn file_mask(file: u8) -> Bitboard {
    FILE_A << file
}

fn adjacent_files(file: u8) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    if file > 0 {
        mask |= FILE_A << (file - 1);
    }
    if file < 7 {
        mask |= FILE_A << (file + 1);
    }
    mask
}

/// Every full row strictly ahead of `sq` from `color`'s point of view.
/// "Ahead" is toward rank 8 for White, which is toward index 0.
fn forward_ranks(color: Color, sq: Square) -> Bitboard {
    let row = u32::from(sq as u8 / 8);
    match color {
        Color::White => Bitboard::new(((1u128 << (row * 8)) - 1) as u64),
        Color::Black => Bitboard::new(!(((1u128 << ((row + 1) * 8)) - 1) as u64)),
    }
}

/// The half of the board belonging to the opponent of `color`.
fn enemy_half(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard::new(0x0000_0000_FFFF_FFFF),
        Color::Black => Bitboard::new(0xFFFF_FFFF_0000_0000),
    }
}

/// The rank-from-own-side of a square, 0..8, where a pawn on its starting
/// square is on relative rank 1.
fn relative_rank(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq.rank() as usize,
        Color::Black => 7 - sq.rank() as usize,
    }
}

#[must_use]
/// Statically evaluate a position, in centipawns from the side to move's
/// perspective.
pub fn evaluate(b: &Board) -> Eval {
    let phase = game_phase(b);
    let phase256 = phase * 256 / PHASE_MAX;

    let white = side_terms(b, Color::White);
    let black = side_terms(b, Color::Black);
    let blend =
        |t: &SideTerms| t.always + (t.mg * phase256 + t.eg * (256 - phase256)) / 256;
    let mut total = blend(&white) - blend(&black);
    total += imbalance_terms(b, phase256);

    let in_perspective = match b.side {
        Color::White => total,
        Color::Black => -total,
    };
    Eval::cp(in_perspective + TEMPO)
}

/// Evaluate all single-side rules for `us`.
#[allow(clippy::too_many_lines)]
fn side_terms(b: &Board, us: Color) -> SideTerms {
    let mut t = SideTerms::default();
    let them = !us;
    let occ = b.occupied();
    let own = b[us];

    let our_pawns = b[Piece::pawn(us)];
    let their_pawns = b[Piece::pawn(them)];
    let our_king = b.king_square(us);
    let their_king = b.king_square(them);
    let their_king_ring = king_attacks(their_king);

    // set of all squares we attack, for the space term
    let mut attacked = Bitboard::EMPTY;
    // king-attack bookkeeping for the safety model
    let mut attack_units = 0;
    let mut attackers = 0;
    // tropism accumulates in half-points
    let mut tropism2 = 0;

    /* Material */
    for kind in 0..5 {
        t.always += MATERIAL[kind] * i32::from(b[Piece::of(us, kind)].len());
    }
    if b[Piece::bishop(us)].len() >= 2 {
        t.always += BISHOP_PAIR;
    }

    /* Pawns */
    for file in 0..8u8 {
        let file_pawns = our_pawns & file_mask(file);
        let count = i32::from(file_pawns.len());
        if count > 1 {
            t.always -= DOUBLED_PAWN * (count - 1);
        }
    }
    for sq in our_pawns {
        attacked |= pawn_attacks(us, sq);
        let file = sq.file();
        let rel = relative_rank(us, sq);

        let neighbors = our_pawns & adjacent_files(file);
        let supporters = pawn_attacks(them, sq) & our_pawns;
        let front = forward_ranks(us, sq);

        if neighbors.is_empty() {
            t.always -= ISOLATED_PAWN;
        } else if supporters.is_empty() && (neighbors & !front).is_empty() {
            // every friendly neighbor is ahead of this pawn; if its stop
            // square is covered by an enemy pawn it cannot safely advance
            let stop = match us {
                Color::White => Square::from_index(sq as u8 - 8),
                Color::Black => Square::from_index(sq as u8 + 8),
            };
            if (pawn_attacks(us, stop) & their_pawns).has_any() {
                t.always -= BACKWARD_PAWN;
            }
        }

        if supporters.has_any() {
            t.always += PAWN_CHAIN;
        }

        let passer_mask = front & (file_mask(file) | adjacent_files(file));
        if (their_pawns & passer_mask).is_empty() {
            t.mg += super::pst::PASSED_PAWN_MG[rel];
            t.eg += super::pst::PASSED_PAWN_EG[rel];
            if supporters.has_any() {
                t.always += PROTECTED_PASSER;
            }
            // in the endgame a passer is worth chasing with the king
            t.eg += (i32::from(their_king.chebyshev_to(sq)) - i32::from(our_king.chebyshev_to(sq)))
                * 8;
        }
    }

    /* Piece-square tables */
    let pst_sq = |sq: Square| match us {
        Color::White => sq.index(),
        Color::Black => sq.flip_rank().index(),
    };
    for sq in our_pawns {
        t.always += super::pst::PAWN_PST[pst_sq(sq)];
    }

    /* Knights */
    let outpost_ok = |sq: Square| {
        let guard = forward_ranks(us, sq) & adjacent_files(sq.file());
        enemy_half(us).contains(sq)
            && (pawn_attacks(them, sq) & our_pawns).has_any()
            && (their_pawns & guard).is_empty()
    };
    for sq in b[Piece::knight(us)] {
        t.always += super::pst::KNIGHT_PST[pst_sq(sq)];
        let moves = knight_attacks(sq);
        attacked |= moves;
        let mobility = i32::from((moves & !own).len());
        t.always += KNIGHT_MOBILITY * mobility;
        if mobility < MINOR_MOBILITY_PAR {
            t.always -= RESTRICTION_PENALTY * (MINOR_MOBILITY_PAR - mobility);
        }
        if outpost_ok(sq) {
            t.always += KNIGHT_OUTPOST;
        }
        tropism2 += TROPISM_X2[KNIGHT] * (7 - i32::from(sq.chebyshev_to(their_king)));
        if (moves & their_king_ring).has_any() {
            attack_units += KING_ATTACK_UNIT[KNIGHT];
            attackers += 1;
        }
    }

    /* Bishops */
    for sq in b[Piece::bishop(us)] {
        t.always += super::pst::BISHOP_PST[pst_sq(sq)];
        let moves = bishop_attacks(sq, occ);
        attacked |= moves;
        let mobility = i32::from((moves & !own).len());
        t.always += BISHOP_MOBILITY * mobility;
        if mobility < MINOR_MOBILITY_PAR {
            t.always -= RESTRICTION_PENALTY * (MINOR_MOBILITY_PAR - mobility);
        }
        if outpost_ok(sq) {
            t.always += BISHOP_OUTPOST;
        }
        tropism2 += TROPISM_X2[BISHOP] * (7 - i32::from(sq.chebyshev_to(their_king)));
        if (moves & their_king_ring).has_any() {
            attack_units += KING_ATTACK_UNIT[BISHOP];
            attackers += 1;
        }
    }

    /* Rooks */
    let our_rooks = b[Piece::rook(us)];
    for sq in our_rooks {
        t.always += super::pst::ROOK_PST[pst_sq(sq)];
        let moves = rook_attacks(sq, occ);
        attacked |= moves;
        t.always += ROOK_MOBILITY * i32::from((moves & !own).len());

        let file = file_mask(sq.file());
        if ((our_pawns | their_pawns) & file).is_empty() {
            t.always += ROOK_OPEN_FILE;
        } else if (our_pawns & file).is_empty() {
            t.always += ROOK_SEMI_OPEN_FILE;
        }
        if relative_rank(us, sq) == 6 {
            t.always += ROOK_SEVENTH;
        }
        if (moves & our_rooks).has_any() {
            t.always += CONNECTED_ROOKS;
        }
        tropism2 += TROPISM_X2[ROOK] * (7 - i32::from(sq.chebyshev_to(their_king)));
        if (moves & their_king_ring).has_any() {
            attack_units += KING_ATTACK_UNIT[ROOK];
            attackers += 1;
        }
    }

    /* Queens */
    for sq in b[Piece::queen(us)] {
        t.always += super::pst::QUEEN_PST[pst_sq(sq)];
        let moves = queen_attacks(sq, occ);
        attacked |= moves;
        t.always += QUEEN_MOBILITY * i32::from((moves & !own).len());
        tropism2 += TROPISM_X2[QUEEN] * (7 - i32::from(sq.chebyshev_to(their_king)));
        if (moves & their_king_ring).has_any() {
            attack_units += KING_ATTACK_UNIT[QUEEN];
            attackers += 1;
        }
    }

    /* King */
    {
        let sq = our_king;
        t.mg += super::pst::KING_MG_PST[pst_sq(sq)];
        t.eg += super::pst::KING_EG_PST[pst_sq(sq)];
        attacked |= king_attacks(sq);
        // pawn shelter inside the king's ring
        t.mg += SHELTER_PAWN * i32::from((king_attacks(sq) & our_pawns).len());
    }

    /* Aggregate terms */
    t.always += tropism2 / 2;
    t.mg += SPACE_WEIGHT * i32::from((attacked & enemy_half(us)).len());
    if attackers >= 2 {
        attack_units = attack_units * attackers / 2;
    }
    t.mg += attack_units;

    t
}

/// Terms driven by the material imbalance: the trade-down bonus for the
/// leader and the endgame mop-up that hunts the losing king.
fn imbalance_terms(b: &Board, phase256: i32) -> i32 {
    let material_of = |color: Color| -> i32 {
        (0..5)
            .map(|kind| MATERIAL[kind] * i32::from(b[Piece::of(color, kind)].len()))
            .sum()
    };
    let imbalance = material_of(Color::White) - material_of(Color::Black);
    if imbalance.abs() < 100 {
        return 0;
    }
    let sign = imbalance.signum();
    let mut total = 0;

    // when ahead, every trade sharpens the advantage
    let pieces_on_board = i32::from(b.occupied().len());
    total += sign * (32 - pieces_on_board) * 5 * (imbalance.abs() / 100);

    if imbalance.abs() >= 400 {
        // drive the losing king to the edge and bring ours up
        let loser = if sign > 0 { Color::Black } else { Color::White };
        let losing_king = b.king_square(loser);
        let kings_dist = i32::from(
            b.king_square(Color::White).chebyshev_to(b.king_square(Color::Black)),
        );
        let mop_up = CENTER_MANHATTAN[losing_king.index()] * 10 + (14 - kings_dist) * 4;
        total += sign * mop_up * (256 - phase256) / 256;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::STARTPOS_FEN;

    /// Build the color-mirrored version of a position: every piece swaps
    /// color and flips rank, and the side to move flips. A symmetric
    /// evaluation must score both positions identically.
    fn mirror(b: &Board) -> Board {
        let mut m = Board {
            pieces: [Bitboard::EMPTY; Piece::NUM],
            occupancy: [Bitboard::EMPTY; 3],
            side: !b.side,
            castle: crate::base::CastleRights(
                (b.castle.0 >> 2 & 0b0011) | (b.castle.0 << 2 & 0b1100),
            ),
            ep_square: b.ep_square.map(Square::flip_rank),
            halfmove: b.halfmove,
            hash: 0,
        };
        for p in Piece::ALL {
            let flipped = Piece::of(!p.color(), p.kind());
            for sq in b[p] {
                m.pieces[flipped as usize].insert(sq.flip_rank());
            }
        }
        m.rebuild_occupancy();
        m.hash = m.fresh_hash();
        m
    }

    #[test]
    fn startpos_is_balanced() {
        let b = Board::new();
        // symmetric position: only the tempo term remains
        assert_eq!(evaluate(&b), Eval::cp(TEMPO));
    }

    #[test]
    fn mirror_law() {
        let fens = [
            STARTPOS_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r1bq1rk1/pppp1ppp/2n2n2/2b1p3/2B1P3/2PP1N2/PP3PPP/RNBQ1RK1 b - - 0 6",
            "8/5pk1/6p1/8/3Q4/6PK/5P2/3q4 w - - 0 1",
        ];
        for fen in fens {
            let b = Board::from_fen(fen).unwrap();
            let m = mirror(&b);
            assert_eq!(evaluate(&b), evaluate(&m), "mirror law broken for {fen}");
        }
    }

    #[test]
    fn material_advantage_shows() {
        // white is up a clean rook
        let b = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert!(evaluate(&b) > Eval::cp(300));
        // and from black's perspective it is bad
        let b = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        assert!(evaluate(&b) < Eval::cp(-300));
    }

    #[test]
    fn phase_bounds() {
        assert_eq!(game_phase(&Board::new()), PHASE_MAX);
        let bare = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game_phase(&bare), 0);
    }

    #[test]
    fn passed_pawn_is_rewarded() {
        // identical except that white's d-pawn is passed in the first
        let passed = Board::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - - 0 1").unwrap();
        let blocked = Board::from_fen("3pk3/8/8/3P4/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&passed) > evaluate(&blocked));
    }

    #[test]
    fn doubled_pawns_are_penalized() {
        let clean = Board::from_fen("4k3/8/8/8/8/8/2PP4/4K3 w - - 0 1").unwrap();
        let doubled = Board::from_fen("4k3/8/8/8/8/2P5/2P5/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&clean) > evaluate(&doubled));
    }
}
