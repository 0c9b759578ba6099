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

//! The shared stop/ponder flag block and time accounting.
//!
//! This is the only mutable state shared between the UCI reader thread and
//! the search worker. The search never blocks: it polls these flags at a
//! coarse cadence (every 1024 nodes) and accepts the bounded observation
//! delay. All flag accesses use relaxed ordering; nothing downstream of a
//! flag read requires stronger synchronization than the poll itself.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Mutex,
    },
    time::{Duration, Instant},
};

/// How many nodes the search visits between limit polls.
pub const POLL_INTERVAL: u64 = 1024;

#[derive(Debug)]
/// A limit on how long a search may run, plus the ponder handshake.
pub struct SearchLimit {
    /// Set when the search must unwind: time is up, a node cap was hit, or
    /// the GUI said `stop`/`quit`.
    times_up: AtomicBool,
    /// Set by the reader to abort an ongoing ponder search.
    stop_pondering: AtomicBool,
    /// While set, time checks do not fire.
    pondering: AtomicBool,
    /// Set by the reader on `ponderhit`; the next poll converts the ponder
    /// search into a normal timed search.
    ponder_hit: AtomicBool,
    /// Cumulative nodes searched since `start`.
    nodes: AtomicU64,
    /// Optional cap on the node count.
    nodes_cap: Mutex<Option<u64>>,
    /// When the search started (or when a ponder hit converted it).
    start_time: Mutex<Instant>,
    /// The soft budget: iterative deepening stops starting new iterations
    /// once half of it has elapsed. `None` for untimed searches.
    soft_limit: Mutex<Option<Duration>>,
    /// The hard budget: the search aborts outright past this. Set to three
    /// times the soft budget; it should never fire in normal play.
    hard_limit: Mutex<Option<Duration>>,
    /// The budget to install when a ponder search is converted by
    /// `ponderhit`.
    ponder_budget: Mutex<Option<Duration>>,
}

/// Recover a mutex even if a panicking thread poisoned it; the data inside
/// is plain-old-data, always valid.
fn lock_of<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl SearchLimit {
    #[must_use]
    /// Create an unlimited, un-started limit.
    pub fn new() -> SearchLimit {
        SearchLimit {
            times_up: AtomicBool::new(false),
            stop_pondering: AtomicBool::new(false),
            pondering: AtomicBool::new(false),
            ponder_hit: AtomicBool::new(false),
            nodes: AtomicU64::new(0),
            nodes_cap: Mutex::new(None),
            start_time: Mutex::new(Instant::now()),
            soft_limit: Mutex::new(None),
            hard_limit: Mutex::new(None),
            ponder_budget: Mutex::new(None),
        }
    }

    /// Arm the limit for a normal timed search. `budget` of `None` means
    /// unlimited time (`go infinite`, `go depth N`).
    pub fn start(&self, budget: Option<Duration>, nodes_cap: Option<u64>) {
        self.times_up.store(false, Ordering::Relaxed);
        self.stop_pondering.store(false, Ordering::Relaxed);
        self.pondering.store(false, Ordering::Relaxed);
        self.ponder_hit.store(false, Ordering::Relaxed);
        self.nodes.store(0, Ordering::Relaxed);
        *lock_of(&self.nodes_cap) = nodes_cap;
        *lock_of(&self.start_time) = Instant::now();
        *lock_of(&self.soft_limit) = budget;
        *lock_of(&self.hard_limit) = budget.map(|d| d * 3);
        *lock_of(&self.ponder_budget) = None;
    }

    /// Arm the limit for a `go movetime` search: the hard stop sits exactly
    /// at `duration`, and iterations keep starting until it is reached.
    pub fn start_exact(&self, duration: Duration, nodes_cap: Option<u64>) {
        self.start(None, nodes_cap);
        *lock_of(&self.soft_limit) = Some(duration * 2);
        *lock_of(&self.hard_limit) = Some(duration);
    }

    /// Arm the limit for a ponder search: no time pressure now, but
    /// `budget` becomes the real allowance the moment `ponderhit` arrives.
    pub fn start_ponder(&self, budget: Option<Duration>, nodes_cap: Option<u64>) {
        self.start(None, nodes_cap);
        self.pondering.store(true, Ordering::Relaxed);
        *lock_of(&self.ponder_budget) = budget;
    }

    /// Reader-side: abort the search (UCI `stop`, `quit`, or EOF).
    pub fn stop(&self) {
        self.times_up.store(true, Ordering::Relaxed);
        self.stop_pondering.store(true, Ordering::Relaxed);
    }

    /// Reader-side: the pondered move was played; searching continues under
    /// the real clock.
    pub fn ponder_hit(&self) {
        self.ponder_hit.store(true, Ordering::Relaxed);
    }

    #[must_use]
    /// Has the search been told to unwind?
    pub fn is_over(&self) -> bool {
        self.times_up.load(Ordering::Relaxed)
    }

    #[must_use]
    /// Is the search currently pondering?
    pub fn is_pondering(&self) -> bool {
        self.pondering.load(Ordering::Relaxed)
    }

    /// Search-side poll, called every [`POLL_INTERVAL`] nodes. Returns
    /// `true` when the search must unwind.
    pub fn poll(&self, new_nodes: u64) -> bool {
        self.nodes.fetch_add(new_nodes, Ordering::Relaxed);

        if self.times_up.load(Ordering::Relaxed) {
            return true;
        }

        if let Some(cap) = *lock_of(&self.nodes_cap) {
            if self.nodes.load(Ordering::Relaxed) >= cap {
                self.times_up.store(true, Ordering::Relaxed);
                return true;
            }
        }

        if self.pondering.load(Ordering::Relaxed) {
            if self.ponder_hit.load(Ordering::Relaxed) {
                // this is now a normal search: install the real budget and
                // restart the clock
                self.pondering.store(false, Ordering::Relaxed);
                self.ponder_hit.store(false, Ordering::Relaxed);
                let budget = lock_of(&self.ponder_budget).take();
                *lock_of(&self.start_time) = Instant::now();
                *lock_of(&self.soft_limit) = budget;
                *lock_of(&self.hard_limit) = budget.map(|d| d * 3);
            } else if self.stop_pondering.load(Ordering::Relaxed) {
                self.times_up.store(true, Ordering::Relaxed);
                return true;
            } else {
                // pondering: the clock does not apply
                return false;
            }
        }

        if let Some(hard) = *lock_of(&self.hard_limit) {
            if self.elapsed() > hard {
                self.times_up.store(true, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    #[must_use]
    /// Should iterative deepening stop starting new iterations? True once
    /// about half the soft budget is spent.
    pub fn soft_exceeded(&self) -> bool {
        if self.pondering.load(Ordering::Relaxed) {
            return false;
        }
        match *lock_of(&self.soft_limit) {
            Some(soft) => self.elapsed() * 2 > soft,
            None => false,
        }
    }

    #[must_use]
    /// Time since the search started.
    pub fn elapsed(&self) -> Duration {
        lock_of(&self.start_time).elapsed()
    }

    #[must_use]
    /// Cumulative nodes searched.
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }
}

impl Default for SearchLimit {
    fn default() -> SearchLimit {
        SearchLimit::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_limit_never_stops() {
        let limit = SearchLimit::new();
        limit.start(None, None);
        assert!(!limit.poll(1024));
        assert!(!limit.is_over());
        assert!(!limit.soft_exceeded());
    }

    #[test]
    fn stop_is_observed() {
        let limit = SearchLimit::new();
        limit.start(None, None);
        limit.stop();
        assert!(limit.poll(0));
        assert!(limit.is_over());
    }

    #[test]
    fn node_cap_fires() {
        let limit = SearchLimit::new();
        limit.start(None, Some(2000));
        assert!(!limit.poll(1024));
        assert!(limit.poll(1024));
    }

    #[test]
    fn expired_hard_limit_fires() {
        let limit = SearchLimit::new();
        limit.start(Some(Duration::ZERO), None);
        std::thread::sleep(Duration::from_millis(1));
        assert!(limit.poll(1024));
    }

    #[test]
    fn pondering_ignores_the_clock() {
        let limit = SearchLimit::new();
        limit.start_ponder(Some(Duration::ZERO), None);
        std::thread::sleep(Duration::from_millis(1));
        assert!(!limit.poll(1024));
        assert!(!limit.soft_exceeded());
    }

    #[test]
    fn ponder_hit_installs_the_real_budget() {
        let limit = SearchLimit::new();
        limit.start_ponder(Some(Duration::from_secs(3600)), None);
        limit.ponder_hit();
        assert!(!limit.poll(0));
        assert!(!limit.is_pondering());
        // the generous budget is now armed, and the clock restarted
        assert!(!limit.poll(1024));
    }

    #[test]
    fn stop_while_pondering_aborts() {
        let limit = SearchLimit::new();
        limit.start_ponder(Some(Duration::from_secs(3600)), None);
        limit.stop();
        assert!(limit.poll(0));
    }

    #[test]
    fn stopping_is_idempotent() {
        let limit = SearchLimit::new();
        limit.start(None, None);
        limit.stop();
        limit.stop();
        assert!(limit.is_over());
        assert!(limit.poll(0));
    }
}
