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

//! Pseudo-legal move generation.
//!
//! The generator deliberately does not test whether a move leaves its own
//! king attacked; [`crate::base::Board::make_move`] performs that check after
//! applying the move and refuses illegal ones. Keeping legality out of
//! generation keeps these loops branch-light.

use super::{
    attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks,
        rook_attacks},
    Board, Color, Move, MoveList, Piece, Square,
};

/// Generate every pseudo-legal move for the side to move, appending them to
/// `list` in no particular order.
pub fn generate_moves(b: &Board, list: &mut MoveList) {
    generate_pawn_moves(b, list);
    generate_castles(b, list);

    let side = b.side;
    let own = b[side];
    let enemy = b[!side];

    let knight = Piece::knight(side);
    for from in b[knight] {
        for to in knight_attacks(from) & !own {
            list.push(match enemy.contains(to) {
                true => Move::capture(from, to, knight),
                false => Move::quiet(from, to, knight),
            });
        }
    }

    let bishop = Piece::bishop(side);
    for from in b[bishop] {
        for to in bishop_attacks(from, b.occupied()) & !own {
            list.push(match enemy.contains(to) {
                true => Move::capture(from, to, bishop),
                false => Move::quiet(from, to, bishop),
            });
        }
    }

    let rook = Piece::rook(side);
    for from in b[rook] {
        for to in rook_attacks(from, b.occupied()) & !own {
            list.push(match enemy.contains(to) {
                true => Move::capture(from, to, rook),
                false => Move::quiet(from, to, rook),
            });
        }
    }

    let queen = Piece::queen(side);
    for from in b[queen] {
        for to in queen_attacks(from, b.occupied()) & !own {
            list.push(match enemy.contains(to) {
                true => Move::capture(from, to, queen),
                false => Move::quiet(from, to, queen),
            });
        }
    }

    let king = Piece::king(side);
    for from in b[king] {
        for to in king_attacks(from) & !own {
            list.push(match enemy.contains(to) {
                true => Move::capture(from, to, king),
                false => Move::quiet(from, to, king),
            });
        }
    }
}

/// The four pieces a pawn may promote into, most valuable first.
fn promotion_kinds(side: Color) -> [Piece; 4] {
    [
        Piece::queen(side),
        Piece::rook(side),
        Piece::bishop(side),
        Piece::knight(side),
    ]
}

fn generate_pawn_moves(b: &Board, list: &mut MoveList) {
    let side = b.side;
    let enemy = b[!side];
    let occ = b.occupied();
    let pawn = Piece::pawn(side);

    // pawns advance toward row 0 (rank 8) for White, row 7 (rank 1) for
    // Black; rows here are index-space rows, not ranks
    let (push_delta, start_row, promo_row): (i8, u8, u8) = match side {
        Color::White => (-8, 6, 0),
        Color::Black => (8, 1, 7),
    };

    for from in b[pawn] {
        let from_idx = from as u8;
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let target = Square::from_index((from_idx as i8 + push_delta) as u8);

        if !occ.contains(target) {
            if target as u8 / 8 == promo_row {
                for promoted in promotion_kinds(side) {
                    list.push(Move::new(
                        from,
                        target,
                        pawn,
                        Some(promoted),
                        false,
                        false,
                        false,
                        false,
                    ));
                }
            } else {
                list.push(Move::quiet(from, target, pawn));
                if from_idx / 8 == start_row {
                    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
                    let double = Square::from_index((from_idx as i8 + 2 * push_delta) as u8);
                    if !occ.contains(double) {
                        list.push(Move::new(
                            from, double, pawn, None, false, true, false, false,
                        ));
                    }
                }
            }
        }

        for to in pawn_attacks(side, from) & enemy {
            if to as u8 / 8 == promo_row {
                for promoted in promotion_kinds(side) {
                    list.push(Move::new(
                        from,
                        to,
                        pawn,
                        Some(promoted),
                        true,
                        false,
                        false,
                        false,
                    ));
                }
            } else {
                list.push(Move::capture(from, to, pawn));
            }
        }

        if let Some(ep) = b.ep_square {
            if pawn_attacks(side, from).contains(ep) {
                list.push(Move::new(from, ep, pawn, None, true, false, true, false));
            }
        }
    }
}

fn generate_castles(b: &Board, list: &mut MoveList) {
    let side = b.side;
    let occ = b.occupied();
    let king = Piece::king(side);
    let opponent = !side;

    // the arrival square is not tested for attack here; make_move rejects a
    // castle into check like any other illegal move
    match side {
        Color::White => {
            if b.castle.can_kingside(Color::White)
                && !occ.contains(Square::F1)
                && !occ.contains(Square::G1)
                && !b.is_attacked(Square::E1, opponent)
                && !b.is_attacked(Square::F1, opponent)
            {
                list.push(Move::new(
                    Square::E1,
                    Square::G1,
                    king,
                    None,
                    false,
                    false,
                    false,
                    true,
                ));
            }
            if b.castle.can_queenside(Color::White)
                && !occ.contains(Square::B1)
                && !occ.contains(Square::C1)
                && !occ.contains(Square::D1)
                && !b.is_attacked(Square::E1, opponent)
                && !b.is_attacked(Square::D1, opponent)
            {
                list.push(Move::new(
                    Square::E1,
                    Square::C1,
                    king,
                    None,
                    false,
                    false,
                    false,
                    true,
                ));
            }
        }
        Color::Black => {
            if b.castle.can_kingside(Color::Black)
                && !occ.contains(Square::F8)
                && !occ.contains(Square::G8)
                && !b.is_attacked(Square::E8, opponent)
                && !b.is_attacked(Square::F8, opponent)
            {
                list.push(Move::new(
                    Square::E8,
                    Square::G8,
                    king,
                    None,
                    false,
                    false,
                    false,
                    true,
                ));
            }
            if b.castle.can_queenside(Color::Black)
                && !occ.contains(Square::B8)
                && !occ.contains(Square::C8)
                && !occ.contains(Square::D8)
                && !b.is_attacked(Square::E8, opponent)
                && !b.is_attacked(Square::D8, opponent)
            {
                list.push(Move::new(
                    Square::E8,
                    Square::C8,
                    king,
                    None,
                    false,
                    false,
                    false,
                    true,
                ));
            }
        }
    }
}

#[must_use]
/// Collect the strictly legal moves of a position by making and unmaking
/// each pseudo-legal candidate. Used at the UCI boundary and by the book;
/// the search filters inline instead.
pub fn legal_moves(b: &Board) -> Vec<Move> {
    let mut board = *b;
    let mut list = MoveList::new();
    generate_moves(&board, &mut list);
    let mut legal = Vec::with_capacity(list.len());
    for &m in &list {
        if let Some(unmake) = board.make_move(m) {
            board.unmake_move(unmake);
            legal.push(m);
        }
    }
    legal
}

/// Resolve a UCI move string (such as `e2e4` or `e7e8q`) against the legal
/// moves of a position, recovering all the packed flags.
///
/// # Errors
///
/// Returns an `Err` if the string is malformed or names an illegal move.
pub fn move_from_uci(b: &Board, uci: &str) -> Result<Move, &'static str> {
    if uci.len() != 4 && uci.len() != 5 {
        return Err("UCI move must be 4 or 5 characters");
    }
    let from = Square::from_algebraic(&uci[0..2])?;
    let to = Square::from_algebraic(&uci[2..4])?;
    let promo_kind = match uci.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(super::piece::QUEEN),
        Some(b'r') => Some(super::piece::ROOK),
        Some(b'b') => Some(super::piece::BISHOP),
        Some(b'n') => Some(super::piece::KNIGHT),
        Some(_) => return Err("invalid promotion character"),
    };

    legal_moves(b)
        .into_iter()
        .find(|m| {
            m.from() == from && m.to() == to && m.promotion().map(Piece::kind) == promo_kind
        })
        .ok_or("not a legal move in this position")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::STARTPOS_FEN;

    #[test]
    fn twenty_legal_moves_at_the_start() {
        let b = Board::from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(legal_moves(&b).len(), 20);
    }

    #[test]
    fn kiwipete_has_48_legal_moves() {
        let b = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(legal_moves(&b).len(), 48);
    }

    #[test]
    fn checks_restrict_legal_moves() {
        // double check: only king moves escape
        let b = Board::from_fen("4k3/8/8/8/8/4r3/3p4/4K3 w - - 0 1").unwrap();
        for m in legal_moves(&b) {
            assert!(m.piece().is_king());
        }
    }

    #[test]
    fn en_passant_is_generated() {
        let b = Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .unwrap();
        let ep_moves: Vec<Move> = legal_moves(&b)
            .into_iter()
            .filter(|m| m.is_en_passant())
            .collect();
        assert_eq!(ep_moves.len(), 1);
        assert_eq!(ep_moves[0].from(), Square::E5);
        assert_eq!(ep_moves[0].to(), Square::F6);
        assert!(ep_moves[0].is_capture());
    }

    #[test]
    fn castling_requires_clear_safe_path() {
        // both castles available
        let b = Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let castles = legal_moves(&b).into_iter().filter(|m| m.is_castle()).count();
        assert_eq!(castles, 2);

        // a rook on e3 covers e1, forbidding both castles
        let b = Board::from_fen("4k3/8/8/8/8/4r3/P6P/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            legal_moves(&b).into_iter().filter(|m| m.is_castle()).count(),
            0
        );

        // a bishop covering f1 forbids kingside castling only
        let b = Board::from_fen("4k3/8/8/8/8/7b/P6P/R3K2R w KQ - 0 1").unwrap();
        let castles: Vec<Move> = legal_moves(&b).into_iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].to(), Square::C1);
    }

    #[test]
    fn promotions_expand_to_four_moves() {
        let b = Board::from_fen("8/5P1k/8/8/8/8/8/6K1 w - - 0 1").unwrap();
        let promotions = legal_moves(&b)
            .into_iter()
            .filter(|m| m.promotion().is_some())
            .count();
        assert_eq!(promotions, 4);
    }

    #[test]
    fn uci_resolution() {
        let b = Board::from_fen(STARTPOS_FEN).unwrap();
        let m = move_from_uci(&b, "e2e4").unwrap();
        assert!(m.is_double_push());
        assert!(move_from_uci(&b, "e2e5").is_err());
        assert!(move_from_uci(&b, "xyzw").is_err());

        let b = Board::from_fen("8/5P1k/8/8/8/8/8/6K1 w - - 0 1").unwrap();
        let m = move_from_uci(&b, "f7f8q").unwrap();
        assert_eq!(m.promotion(), Some(Piece::WhiteQueen));
    }
}
