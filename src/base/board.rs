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

//! Board state: piece placement, occupancy, castling, en passant, and the
//! incrementally-maintained Zobrist hash.

use super::{
    attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks},
    castling::CASTLE_MASK,
    zobrist, Bitboard, CastleRights, Color, Move, Piece, Square,
};

use std::{
    fmt::{Display, Formatter},
    mem::transmute,
    ops::Index,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// A chess position. Does not know about history; repetition tracking lives
/// in [`super::Game`] and in the search's repetition stack.
pub struct Board {
    /// One bitboard per colored piece, indexed by `Piece as usize`.
    pub pieces: [Bitboard; Piece::NUM],
    /// Occupancy by White, by Black, and by both, in that order.
    pub occupancy: [Bitboard; 3],
    /// The color of the player to move.
    pub side: Color,
    /// The castling rights of both players.
    pub castle: CastleRights,
    /// The square a pawn may capture onto en passant, if the previous move
    /// was a double pawn push.
    pub ep_square: Option<Square>,
    /// The number of plies since the last capture or pawn move.
    pub halfmove: u16,
    /// The Zobrist hash of this position. Always equal to
    /// [`Board::fresh_hash`].
    pub hash: u64,
}

#[derive(Clone, Copy)]
#[must_use = "dropping an Unmake loses the ability to restore the board"]
/// A snapshot returned by [`Board::make_move`], consumed by
/// [`Board::unmake_move`] to restore the pre-move state.
pub struct Unmake {
    prev: Board,
}

impl Board {
    /// Construct a board in the conventional starting position.
    pub fn new() -> Board {
        let mut board = Board {
            pieces: [
                Bitboard::new(0x00FF_0000_0000_0000), // white pawns
                Bitboard::new(0x4200_0000_0000_0000), // white knights
                Bitboard::new(0x2400_0000_0000_0000), // white bishops
                Bitboard::new(0x8100_0000_0000_0000), // white rooks
                Bitboard::new(0x0800_0000_0000_0000), // white queen
                Bitboard::new(0x1000_0000_0000_0000), // white king
                Bitboard::new(0x0000_0000_0000_FF00), // black pawns
                Bitboard::new(0x0000_0000_0000_0042), // black knights
                Bitboard::new(0x0000_0000_0000_0024), // black bishops
                Bitboard::new(0x0000_0000_0000_0081), // black rooks
                Bitboard::new(0x0000_0000_0000_0008), // black queen
                Bitboard::new(0x0000_0000_0000_0010), // black king
            ],
            occupancy: [Bitboard::EMPTY; 3],
            side: Color::White,
            castle: CastleRights::ALL,
            ep_square: None,
            halfmove: 0,
            hash: 0,
        };
        board.rebuild_occupancy();
        board.hash = board.fresh_hash();
        board
    }

    /// Parse a board from a FEN string.
    ///
    /// # Errors
    ///
    /// Returns an `Err` describing the problem if the FEN is malformed. The
    /// board is not modified on error (this is a constructor).
    pub fn from_fen(fen: &str) -> Result<Board, &'static str> {
        let mut board = Board {
            pieces: [Bitboard::EMPTY; Piece::NUM],
            occupancy: [Bitboard::EMPTY; 3],
            side: Color::White,
            castle: CastleRights::NONE,
            ep_square: None,
            halfmove: 0,
            hash: 0,
        };

        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or("empty FEN")?;

        // ranks arrive 8 down to 1, which is exactly index order
        let mut index = 0u8;
        for chr in placement.chars() {
            match chr {
                '/' => {
                    if index % 8 != 0 {
                        return Err("rank divider in the middle of a rank");
                    }
                }
                '1'..='8' => index += chr as u8 - b'0',
                _ => {
                    let piece = Piece::from_fen_char(chr).ok_or("unrecognized piece character")?;
                    if index >= 64 {
                        return Err("too many squares in FEN");
                    }
                    board.pieces[piece as usize].insert(Square::from_index(index));
                    index += 1;
                }
            }
            if index > 64 {
                return Err("too many squares in FEN");
            }
        }
        if index != 64 {
            return Err("FEN did not describe all 64 squares");
        }

        board.side = match fields.next().ok_or("missing side to move")? {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err("unrecognized side to move"),
        };

        let castle_field = fields.next().ok_or("missing castling rights")?;
        if castle_field != "-" {
            for chr in castle_field.chars() {
                board.castle |= match chr {
                    'K' => CastleRights::kingside(Color::White),
                    'Q' => CastleRights::queenside(Color::White),
                    'k' => CastleRights::kingside(Color::Black),
                    'q' => CastleRights::queenside(Color::Black),
                    _ => return Err("unrecognized castling rights character"),
                };
            }
        }

        let ep_field = fields.next().ok_or("missing en passant square")?;
        if ep_field != "-" {
            board.ep_square = Some(Square::from_algebraic(ep_field)?);
        }

        // the move clocks are optional in practice
        if let Some(halfmove_field) = fields.next() {
            board.halfmove = halfmove_field
                .parse()
                .map_err(|_| "unparseable halfmove clock")?;
        }

        // each side must have exactly one king for the position to be playable
        if board[Piece::WhiteKing].len() != 1 || board[Piece::BlackKing].len() != 1 {
            return Err("each side must have exactly one king");
        }

        board.rebuild_occupancy();
        if board.occupancy[2]
            != Piece::ALL
                .iter()
                .fold(Bitboard::EMPTY, |acc, &p| acc | board[p])
        {
            return Err("inconsistent piece placement");
        }
        board.hash = board.fresh_hash();
        Ok(board)
    }

    /// Recompute the three occupancy bitboards from the twelve piece
    /// bitboards.
    pub fn rebuild_occupancy(&mut self) {
        let mut white = Bitboard::EMPTY;
        let mut black = Bitboard::EMPTY;
        for kind in 0..6 {
            white |= self.pieces[kind];
            black |= self.pieces[kind + 6];
        }
        self.occupancy = [white, black, white | black];
    }

    #[must_use]
    /// Get the set of all occupied squares.
    pub fn occupied(&self) -> Bitboard {
        self.occupancy[2]
    }

    #[must_use]
    /// Get the piece standing on a square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !self.occupied().contains(sq) {
            return None;
        }
        Piece::ALL.into_iter().find(|&p| self[p].contains(sq))
    }

    #[must_use]
    /// Get the square of the given color's king.
    pub fn king_square(&self, color: Color) -> Square {
        let bb = self[Piece::king(color)];
        debug_assert!(bb.len() == 1);
        unsafe {
            // SAFETY: a valid board always has exactly one king per side, so
            // trailing_zeros is in 0..64.
            #[allow(clippy::cast_possible_truncation)]
            transmute::<u8, Square>(bb.as_u64().trailing_zeros() as u8 & 63)
        }
    }

    #[must_use]
    /// Determine whether `sq` is attacked by any piece of `by`.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        let occ = self.occupied();
        // a pawn of `by` attacks sq iff a pawn of the other color standing on
        // sq would attack the pawn's square
        if (pawn_attacks(!by, sq) & self[Piece::pawn(by)]).has_any() {
            return true;
        }
        if (knight_attacks(sq) & self[Piece::knight(by)]).has_any() {
            return true;
        }
        if (king_attacks(sq) & self[Piece::king(by)]).has_any() {
            return true;
        }
        let diagonal = self[Piece::bishop(by)] | self[Piece::queen(by)];
        if (bishop_attacks(sq, occ) & diagonal).has_any() {
            return true;
        }
        let orthogonal = self[Piece::rook(by)] | self[Piece::queen(by)];
        (rook_attacks(sq, occ) & orthogonal).has_any()
    }

    #[must_use]
    /// Get every piece of either color which attacks `sq`, computing slider
    /// rays against the given occupancy (which may differ from the board's,
    /// as in static exchange evaluation).
    pub fn attackers_to(&self, sq: Square, occ: Bitboard) -> Bitboard {
        let knights = self[Piece::WhiteKnight] | self[Piece::BlackKnight];
        let kings = self[Piece::WhiteKing] | self[Piece::BlackKing];
        let diagonal = self[Piece::WhiteBishop]
            | self[Piece::BlackBishop]
            | self[Piece::WhiteQueen]
            | self[Piece::BlackQueen];
        let orthogonal = self[Piece::WhiteRook]
            | self[Piece::BlackRook]
            | self[Piece::WhiteQueen]
            | self[Piece::BlackQueen];

        let attackers = (pawn_attacks(Color::Black, sq) & self[Piece::WhitePawn])
            | (pawn_attacks(Color::White, sq) & self[Piece::BlackPawn])
            | (knight_attacks(sq) & knights)
            | (king_attacks(sq) & kings)
            | (bishop_attacks(sq, occ) & diagonal)
            | (rook_attacks(sq, occ) & orthogonal);
        attackers & occ
    }

    #[must_use]
    /// Is the given color's king currently attacked?
    pub fn in_check(&self, color: Color) -> bool {
        self.is_attacked(self.king_square(color), !color)
    }

    /// Apply a move to the board, maintaining the hash incrementally.
    ///
    /// Returns `None` (with the board unchanged) if the move would leave the
    /// mover's king attacked; otherwise returns the snapshot which
    /// [`Board::unmake_move`] consumes.
    pub fn make_move(&mut self, m: Move) -> Option<Unmake> {
        let saved = Unmake { prev: *self };
        let from = m.from();
        let to = m.to();
        let piece = m.piece();
        let mover = self.side;

        // move the piece
        self.pieces[piece as usize].remove(from);
        self.hash ^= zobrist::piece_key(piece, from);
        self.pieces[piece as usize].insert(to);
        self.hash ^= zobrist::piece_key(piece, to);

        if m.is_capture() {
            if m.is_en_passant() {
                // the captured pawn stands behind the target square
                let victim_sq = match mover {
                    Color::White => Square::from_index(to as u8 + 8),
                    Color::Black => Square::from_index(to as u8 - 8),
                };
                let victim = Piece::pawn(!mover);
                self.pieces[victim as usize].remove(victim_sq);
                self.hash ^= zobrist::piece_key(victim, victim_sq);
            } else {
                let Some(victim) = self.victim_at(to, !mover) else {
                    *self = saved.prev;
                    return None;
                };
                self.pieces[victim as usize].remove(to);
                self.hash ^= zobrist::piece_key(victim, to);
            }
        }

        if let Some(promoted) = m.promotion() {
            // the pawn already arrived on `to`; swap it for the new piece
            self.pieces[piece as usize].remove(to);
            self.hash ^= zobrist::piece_key(piece, to);
            self.pieces[promoted as usize].insert(to);
            self.hash ^= zobrist::piece_key(promoted, to);
        }

        if let Some(ep) = self.ep_square {
            self.hash ^= zobrist::ep_key(ep);
        }
        self.ep_square = None;

        if m.is_double_push() {
            let ep = Square::from_index((from as u8 + to as u8) / 2);
            self.ep_square = Some(ep);
            self.hash ^= zobrist::ep_key(ep);
        }

        if m.is_castle() {
            let (rook_from, rook_to) = match to {
                Square::G1 => (Square::H1, Square::F1),
                Square::C1 => (Square::A1, Square::D1),
                Square::G8 => (Square::H8, Square::F8),
                Square::C8 => (Square::A8, Square::D8),
                _ => {
                    *self = saved.prev;
                    return None;
                }
            };
            let rook = Piece::rook(mover);
            self.pieces[rook as usize].remove(rook_from);
            self.hash ^= zobrist::piece_key(rook, rook_from);
            self.pieces[rook as usize].insert(rook_to);
            self.hash ^= zobrist::piece_key(rook, rook_to);
        }

        self.hash ^= zobrist::castle_key(self.castle);
        self.castle &= CastleRights(CASTLE_MASK[from.index()] & CASTLE_MASK[to.index()]);
        self.hash ^= zobrist::castle_key(self.castle);

        self.halfmove = match piece.is_pawn() || m.is_capture() {
            true => 0,
            false => self.halfmove + 1,
        };

        self.side = !mover;
        self.hash ^= zobrist::KEYS.side;

        self.rebuild_occupancy();

        // the mover may not leave their own king attacked
        if self.is_attacked(self.king_square(mover), self.side) {
            *self = saved.prev;
            return None;
        }
        Some(saved)
    }

    /// Restore the board to the state it had before the paired
    /// [`Board::make_move`] or [`Board::make_null_move`].
    pub fn unmake_move(&mut self, unmake: Unmake) {
        *self = unmake.prev;
    }

    /// Pass the turn without moving: flip the side to move and clear the
    /// en-passant square. Used by null-move pruning; must always be paired
    /// with [`Board::unmake_move`].
    pub fn make_null_move(&mut self) -> Unmake {
        let saved = Unmake { prev: *self };
        if let Some(ep) = self.ep_square {
            self.hash ^= zobrist::ep_key(ep);
            self.ep_square = None;
        }
        self.side = !self.side;
        self.hash ^= zobrist::KEYS.side;
        saved
    }

    #[must_use]
    /// Compute this position's Zobrist hash from scratch. `self.hash` must
    /// always equal this value; the search relies on the incremental updates
    /// in `make_move` never drifting.
    pub fn fresh_hash(&self) -> u64 {
        let mut hash = 0;
        for piece in Piece::ALL {
            for sq in self[piece] {
                hash ^= zobrist::piece_key(piece, sq);
            }
        }
        hash ^= zobrist::castle_key(self.castle);
        if let Some(ep) = self.ep_square {
            hash ^= zobrist::ep_key(ep);
        }
        hash ^= zobrist::side_key(self.side);
        hash
    }

    /// Find the opponent piece captured on `to`, scanning the six enemy
    /// bitboards.
    fn victim_at(&self, to: Square, victim_color: Color) -> Option<Piece> {
        for kind in 0..6 {
            let p = Piece::of(victim_color, kind);
            if self[p].contains(to) {
                return Some(p);
            }
        }
        None
    }
}

impl Index<Piece> for Board {
    type Output = Bitboard;

    fn index(&self, piece: Piece) -> &Bitboard {
        &self.pieces[piece as usize]
    }
}

impl Index<Color> for Board {
    type Output = Bitboard;

    fn index(&self, color: Color) -> &Bitboard {
        &self.occupancy[color as usize]
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in 0..8u8 {
            write!(f, "{} |", 8 - row)?;
            for file in 0..8u8 {
                let sq = Square::from_index(row * 8 + file);
                match self.piece_at(sq) {
                    Some(p) => write!(f, " {p}")?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  +----------------")?;
        writeln!(f, "    a b c d e f g h")?;
        write!(
            f,
            "side: {:?}  castling: {:04b}  ep: {}",
            self.side,
            self.castle.0,
            match self.ep_square {
                Some(sq) => sq.to_string(),
                None => "-".into(),
            }
        )
    }
}
