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

//! The chess-playing parts of Tenor: evaluation, search, and the UCI front
//! end that drives them.

pub mod config;
pub mod eval;
pub mod evaluate;
pub mod limit;
pub mod pick;
pub mod pst;
pub mod search;
pub mod see;
pub mod time;
pub mod transposition;
pub mod uci;

pub use config::SearchConfig;
pub use eval::Eval;
pub use limit::SearchLimit;
pub use transposition::TTable;
