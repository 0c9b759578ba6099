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

//! Engine configuration, mostly mirroring the UCI options.

#[derive(Clone, Debug)]
/// Configuration options for the engine and its searches.
pub struct SearchConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Stalemate-score bias in centipawns; positive steers away from draws.
    pub contempt: i32,
    /// The number of principal variations to report. The search itself is
    /// single-PV; only the first line is searched.
    pub multipv: u8,
    /// Whether to consult the opening book before searching.
    pub own_book: bool,
    /// Whether to evaluate with the loaded NNUE network instead of the
    /// handcrafted evaluation.
    pub use_nnue: bool,
    /// Whether pondering support is announced to the GUI.
    pub ponder: bool,
    /// The maximum iterative-deepening depth for the next search.
    pub depth: u8,
}

impl SearchConfig {
    #[must_use]
    /// The defaults announced over UCI.
    pub fn new() -> SearchConfig {
        SearchConfig {
            hash_mb: 64,
            contempt: 10,
            multipv: 1,
            own_book: true,
            use_nnue: false,
            ponder: true,
            depth: 64,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig::new()
    }
}
