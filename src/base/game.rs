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

//! The game line the driver plays on: the current board plus the history
//! needed for repetition detection.

use super::{Board, Move};

use nohash_hasher::IntMap;

#[derive(Clone, Debug)]
/// A board together with its reversible history. The UCI `position` command
/// rebuilds one of these; the search borrows `hash_history` as the bottom of
/// its repetition stack.
pub struct Game {
    /// The current position.
    pub board: Board,
    /// Hashes of the positions before the current one, starting from the
    /// last irreversible (pawn or capturing) move. Append-only between
    /// irreversible moves.
    pub hash_history: Vec<u64>,
    /// How many times each position has occurred along the whole game line,
    /// for threefold detection at the driver level.
    repetitions: IntMap<u64, u32>,
}

impl Game {
    #[must_use]
    /// Start a game from the given position.
    pub fn from_board(board: Board) -> Game {
        let mut repetitions = IntMap::default();
        repetitions.insert(board.hash, 1);
        Game {
            board,
            hash_history: Vec::new(),
            repetitions,
        }
    }

    /// Play a move on the game line. Returns `false` (leaving the game
    /// unchanged) if the move is illegal.
    pub fn make_move(&mut self, m: Move) -> bool {
        // make_move trusts its input to be pseudo-legal, so screen out moves
        // for the wrong side or from an empty square first
        if m.piece().color() != self.board.side || !self.board[m.piece()].contains(m.from()) {
            return false;
        }
        let before = self.board.hash;
        if self.board.make_move(m).is_none() {
            return false;
        }
        if m.is_capture() || m.piece().is_pawn() {
            // nothing before an irreversible move can ever repeat
            self.hash_history.clear();
        } else {
            self.hash_history.push(before);
        }
        *self.repetitions.entry(self.board.hash).or_insert(0) += 1;
        true
    }

    #[must_use]
    /// Has the current position occurred three times on the game line?
    pub fn is_threefold(&self) -> bool {
        self.repetitions.get(&self.board.hash).copied().unwrap_or(0) >= 3
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::from_board(Board::new())
    }
}
