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

//! Tenor, a UCI-compatible chess engine.
//!
//! The crate is split in two layers, mirroring the division between the rules
//! of chess and the art of playing it well:
//!
//! * [`base`] contains board representation: bitboards, attack tables, move
//!   generation, and Zobrist hashing. Everything in `base` is deterministic
//!   and rule-bound.
//! * [`engine`] contains the decision making: static evaluation, the
//!   principal-variation search with its pruning arsenal, the transposition
//!   table, and the UCI front end that drives them.
//!
//! Two small collaborators sit beside the engine: [`book`] reads
//! Polyglot-format opening books, and [`nnue`] loads an optional neural
//! evaluator which can replace the handcrafted one.

pub mod base;
pub mod book;
pub mod engine;
pub mod nnue;
