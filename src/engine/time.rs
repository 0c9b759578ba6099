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

//! Time management: decide how much of the clock one move deserves.

use std::time::Duration;

/// Fallback assumption for the number of moves left when the GUI does not
/// send `movestogo`.
const DEFAULT_MOVES_TO_GO: u64 = 30;

#[must_use]
/// Compute the time budget for one move from the UCI clock fields, in
/// milliseconds: `remaining` and `increment` are the mover's clock and
/// increment, and `movestogo` is the number of moves until the next time
/// control, if the GUI sent one.
///
/// The budget is the per-move slice plus three quarters of the increment,
/// clamped to at most a quarter of the remaining clock, minus a safety
/// margin that grows when the clock is comfortable, floored at 10ms, and
/// never more than nine tenths of the clock.
pub fn move_budget(remaining: u64, increment: u64, movestogo: Option<u64>) -> Duration {
    let slice = movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
    let mut budget = remaining / slice + increment * 3 / 4;
    budget = budget.min(remaining / 4);

    let margin = if remaining < 1_000 {
        5
    } else if remaining < 5_000 {
        20
    } else {
        50
    };
    budget = budget.saturating_sub(margin);
    budget = budget.max(10);
    budget = budget.min(remaining * 9 / 10);

    Duration::from_millis(budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comfortable_clock() {
        // 5 minutes, 40 moves to go: 7.5s slice minus margin
        let budget = move_budget(300_000, 0, Some(40));
        assert_eq!(budget, Duration::from_millis(7_450));
    }

    #[test]
    fn increment_is_mostly_spent() {
        let with_inc = move_budget(300_000, 2_000, Some(40));
        let without = move_budget(300_000, 0, Some(40));
        assert_eq!(with_inc - without, Duration::from_millis(1_500));
    }

    #[test]
    fn quarter_clock_cap() {
        // 2 moves to go would naively take half the clock; the cap bites
        let budget = move_budget(100_000, 0, Some(2));
        assert_eq!(budget, Duration::from_millis(24_950));
    }

    #[test]
    fn scramble_still_gets_a_budget() {
        let budget = move_budget(300, 0, Some(40));
        assert!(budget >= Duration::from_millis(10));
        assert!(budget <= Duration::from_millis(270));
    }

    #[test]
    fn one_second_scenario_fits() {
        // go wtime 1000 movestogo 40: 25ms slice, 20ms margin, floor at 10
        let budget = move_budget(1_000, 0, Some(40));
        assert_eq!(budget, Duration::from_millis(10));
        // the hard ceiling at 3x stays far below the full second
        assert!(budget * 3 < Duration::from_millis(1_000));
    }
}
