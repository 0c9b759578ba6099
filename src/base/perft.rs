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

//! Performance testing for move generation: count the leaves of the full
//! move tree to a fixed depth. Any divergence from the published node counts
//! means generation or make/unmake is wrong.

use super::{movegen::generate_moves, Board, MoveList};

#[must_use]
/// Count the number of leaf nodes at the given depth of the move tree rooted
/// at `b`.
pub fn perft(b: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut board = *b;
    perft_helper(&mut board, depth)
}

fn perft_helper(board: &mut Board, depth: u8) -> u64 {
    let mut list = MoveList::new();
    generate_moves(board, &mut list);

    // at the frontier, just count the legal moves
    if depth == 1 {
        let mut total = 0;
        for &m in &list {
            if let Some(unmake) = board.make_move(m) {
                board.unmake_move(unmake);
                total += 1;
            }
        }
        return total;
    }

    let mut total = 0;
    for &m in &list {
        if let Some(unmake) = board.make_move(m) {
            total += perft_helper(board, depth - 1);
            board.unmake_move(unmake);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::STARTPOS_FEN;

    /// Standard perft positions.
    const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    fn perft_helper_fen(fen: &str, depth: u8, expected: u64) {
        let b = Board::from_fen(fen).unwrap();
        assert_eq!(perft(&b, depth), expected);
    }

    #[test]
    fn startpos_shallow() {
        perft_helper_fen(STARTPOS_FEN, 1, 20);
        perft_helper_fen(STARTPOS_FEN, 2, 400);
        perft_helper_fen(STARTPOS_FEN, 3, 8_902);
        perft_helper_fen(STARTPOS_FEN, 4, 197_281);
    }

    #[test]
    fn startpos_depth_5() {
        perft_helper_fen(STARTPOS_FEN, 5, 4_865_609);
    }

    #[test]
    #[ignore = "119M nodes; run explicitly with --ignored"]
    fn startpos_depth_6() {
        perft_helper_fen(STARTPOS_FEN, 6, 119_060_324);
    }

    #[test]
    fn kiwipete_shallow() {
        perft_helper_fen(KIWIPETE_FEN, 1, 48);
        perft_helper_fen(KIWIPETE_FEN, 2, 2_039);
        perft_helper_fen(KIWIPETE_FEN, 3, 97_862);
        perft_helper_fen(KIWIPETE_FEN, 4, 4_085_603);
    }

    #[test]
    #[ignore = "194M nodes; run explicitly with --ignored"]
    fn kiwipete_depth_5() {
        perft_helper_fen(KIWIPETE_FEN, 5, 193_690_690);
    }

    #[test]
    fn endgame_shallow() {
        perft_helper_fen(ENDGAME_FEN, 1, 14);
        perft_helper_fen(ENDGAME_FEN, 2, 191);
        perft_helper_fen(ENDGAME_FEN, 3, 2_812);
        perft_helper_fen(ENDGAME_FEN, 4, 43_238);
        perft_helper_fen(ENDGAME_FEN, 5, 674_624);
    }

    #[test]
    #[ignore = "11M nodes; run explicitly with --ignored"]
    fn endgame_depth_6() {
        perft_helper_fen(ENDGAME_FEN, 6, 11_030_083);
    }
}
