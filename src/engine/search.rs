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

//! The principal search: iterative-deepening negamax with principal-
//! variation search, a quiescence tail, and a large arsenal of pruning and
//! reduction heuristics (null move, razoring, ProbCut, reverse futility,
//! late-move pruning and reductions, SEE pruning, and singular extensions).
//!
//! The search is cooperative: it never blocks, and it polls the shared
//! [`SearchLimit`] flags every 1024 nodes. Once the limit marks the search
//! over, every recursion level returns immediately and nothing more is
//! written to the transposition table or the history tables.

use crate::base::{
    movegen::generate_moves, Board, Color, Game, Move, MoveList, Piece, MAX_PLY,
};
use crate::nnue::Network;

use once_cell::sync::Lazy;

use super::{
    config::SearchConfig,
    eval::Eval,
    evaluate::evaluate,
    limit::{SearchLimit, POLL_INTERVAL},
    pick::{select_best, MoveOrderer},
    transposition::{Bound, TTable},
    uci::send::{EngineInfo, UciMessage},
};

/// Quiescence delta-pruning margin: roughly a queen.
const DELTA_MARGIN: i32 = 975;

/// Aspiration half-width around the previous iteration's score.
const ASPIRATION_WINDOW: i32 = 50;

/// Late-move pruning: quiet moves beyond this margin (plus an `improving`
/// allowance) are skipped at shallow depths.
const LMP_MARGIN: [usize; 8] = [0, 5, 8, 12, 17, 23, 30, 38];

/// Futility margins by depth for quiet moves at shallow depths.
const FUTILITY_MARGIN: [i32; 7] = [0, 100, 160, 220, 280, 340, 400];

/// The late-move reduction table, indexed by `[depth][moves searched]`:
/// `floor(0.5 + ln(depth) * ln(moves) / 2.5)`.
static LMR_TABLE: Lazy<[[i32; 64]; 64]> = Lazy::new(|| {
    let mut table = [[0; 64]; 64];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (moves, r) in row.iter_mut().enumerate().skip(1) {
            #[allow(clippy::cast_possible_truncation)]
            {
                *r = (0.5 + (depth as f64).ln() * (moves as f64).ln() / 2.5) as i32;
            }
        }
    }
    table
});

/// The triangular principal-variation table: row `p` holds the line found
/// at ply `p`, starting at column `p`.
struct PvTable {
    moves: [[Move; MAX_PLY]; MAX_PLY],
    len: [usize; MAX_PLY],
}

impl PvTable {
    fn new() -> PvTable {
        PvTable {
            moves: [[Move::NONE; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY],
        }
    }

    /// Begin a node: its line is empty until a move raises alpha.
    fn reset(&mut self, ply: usize) {
        self.len[ply] = ply;
    }

    /// A move raised alpha at `ply`: it heads the line, followed by the
    /// child's line.
    fn record(&mut self, ply: usize, m: Move) {
        self.moves[ply][ply] = m;
        let child_len = self.len[ply + 1].max(ply + 1);
        for i in ply + 1..child_len {
            self.moves[ply][i] = self.moves[ply + 1][i];
        }
        self.len[ply] = child_len;
    }

    /// The principal variation found at the root.
    fn root_line(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

/// The outcome of a completed search.
pub struct SearchReport {
    /// The best move found, or `Move::NONE` if the root had no legal moves.
    pub best_move: Move,
    /// The expected reply, for pondering, if the PV was two plies long.
    pub ponder: Option<Move>,
    /// The score of the last completed iteration, from the root mover's
    /// perspective.
    pub score: Eval,
    /// The last completed iteration's depth.
    pub depth: u8,
}

/// A single-threaded searcher: the board being searched plus all per-search
/// state, borrowing the shared transposition table, ordering heuristics, and
/// stop flags.
pub struct Searcher<'a> {
    board: Board,
    tt: &'a mut TTable,
    orderer: &'a mut MoveOrderer,
    limit: &'a SearchLimit,
    nnue: Option<&'a Network>,
    contempt: i32,

    /// Hashes of every position before the current one, game history
    /// included; the repetition check scans same-parity entries.
    repetition: Vec<u64>,
    /// Nodes visited since the last limit poll.
    nodes_since_poll: u64,
    /// Set once the limit says stop; every level unwinds through this.
    stopped: bool,

    pv: Box<PvTable>,
    static_evals: [Eval; MAX_PLY],
    excluded: [Move; MAX_PLY],
    last_move: [Move; MAX_PLY],
    /// The most recent root move known to be playable, kept so that even an
    /// aborted first iteration emits a legal `bestmove`.
    root_best: Move,
}

impl<'a> Searcher<'a> {
    /// Prepare a searcher over the given game line.
    pub fn new(
        game: &Game,
        tt: &'a mut TTable,
        orderer: &'a mut MoveOrderer,
        limit: &'a SearchLimit,
        config: &SearchConfig,
        nnue: Option<&'a Network>,
    ) -> Searcher<'a> {
        Searcher {
            board: game.board,
            tt,
            orderer,
            limit,
            nnue: if config.use_nnue { nnue } else { None },
            contempt: config.contempt,
            repetition: game.hash_history.clone(),
            nodes_since_poll: 0,
            stopped: false,
            pv: Box::new(PvTable::new()),
            static_evals: [Eval::DRAW; MAX_PLY],
            excluded: [Move::NONE; MAX_PLY],
            last_move: [Move::NONE; MAX_PLY],
            root_best: Move::NONE,
        }
    }

    /// Run iterative deepening to at most `config.depth`, emitting a UCI
    /// `info` line after each completed iteration.
    pub fn run(&mut self, max_depth: u8) -> SearchReport {
        self.tt.new_generation();
        self.orderer.age();

        let mut report = SearchReport {
            best_move: Move::NONE,
            ponder: None,
            score: Eval::DRAW,
            depth: 0,
        };

        #[allow(clippy::cast_possible_truncation)]
        let deepest = max_depth.min(MAX_PLY as u8 - 1).max(1);
        for depth in 1..=deepest {
            let score = if depth < 5 {
                self.negamax(-Eval::INFINITY, Eval::INFINITY, i32::from(depth), 0)
            } else {
                self.aspiration(report.score, i32::from(depth))
            };

            if self.stopped && report.depth > 0 {
                // a partial iteration proves nothing; keep the previous one
                break;
            }

            report.score = score;
            report.depth = depth;
            let line = self.pv.root_line();
            if let Some(&first) = line.first() {
                report.best_move = first;
                report.ponder = line.get(1).copied();
            }
            self.emit_info(&report);

            if self.stopped {
                break;
            }
            // soft cutoff: no point starting an iteration we cannot finish,
            // unless a mate needs verifying
            if self.limit.soft_exceeded() && !score.is_mate() {
                break;
            }
        }

        if report.best_move == Move::NONE {
            report.best_move = self.root_best;
        }
        report
    }

    /// Search one iteration inside an aspiration window around the
    /// previous score, widening the failing bound geometrically.
    fn aspiration(&mut self, previous: Eval, depth: i32) -> Eval {
        let mut delta = ASPIRATION_WINDOW;
        let mut alpha = (previous - delta).max(-Eval::INFINITY);
        let mut beta = (previous + delta).min(Eval::INFINITY);
        loop {
            let score = self.negamax(alpha, beta, depth, 0);
            if self.stopped {
                return score;
            }
            if score <= alpha {
                alpha = (alpha - delta).max(-Eval::INFINITY);
                delta *= 2;
            } else if score >= beta {
                beta = (beta + delta).min(Eval::INFINITY);
                delta *= 2;
            } else {
                return score;
            }
        }
    }

    /// Static evaluation, routed through the NNUE network when one is
    /// active.
    fn static_eval(&self) -> Eval {
        match self.nnue {
            Some(net) => net.evaluate(&self.board),
            None => evaluate(&self.board),
        }
    }

    /// The terminal score of a stalemate, biased by contempt: with positive
    /// contempt a draw reads as slightly bad for the mover.
    fn draw_score(&self) -> Eval {
        Eval::cp(-self.contempt)
    }

    /// Count a node and poll the shared limit at the poll interval.
    fn count_node(&mut self) {
        self.nodes_since_poll += 1;
        if self.nodes_since_poll >= POLL_INTERVAL {
            if self.limit.poll(self.nodes_since_poll) {
                self.stopped = true;
            }
            self.nodes_since_poll = 0;
        }
    }

    /// Has the current position occurred before at the same side to move?
    fn is_repetition(&self) -> bool {
        self.repetition
            .iter()
            .rev()
            .skip(1)
            .step_by(2)
            .any(|&h| h == self.board.hash)
    }

    /// Non-pawn pieces of a side, king included.
    fn non_pawn_pieces(&self, color: Color) -> u32 {
        u32::from(
            (self.board[Piece::knight(color)]
                | self.board[Piece::bishop(color)]
                | self.board[Piece::rook(color)]
                | self.board[Piece::queen(color)]
                | self.board[Piece::king(color)])
            .len(),
        )
    }

    /// Capture-only quiescence search, bounding the tactical horizon.
    fn quiescence(&mut self, mut alpha: Eval, beta: Eval, ply: usize) -> Eval {
        // quiescence reports no line; the parent must not copy stale moves
        self.pv.reset(ply);

        self.count_node();
        if self.stopped {
            return Eval::DRAW;
        }
        if ply >= MAX_PLY - 1 {
            return self.static_eval();
        }

        let stand_pat = self.static_eval();
        if stand_pat >= beta {
            return beta;
        }
        // delta pruning: even winning a queen cannot reach alpha
        if stand_pat + DELTA_MARGIN < alpha {
            return alpha;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut list = MoveList::new();
        generate_moves(&self.board, &mut list);
        let n = list.len();
        let mut scores = [0i32; 256];
        for i in 0..n {
            scores[i] = self
                .orderer
                .score(&self.board, list[i], Move::NONE, ply, Move::NONE);
        }

        let moves = list.as_mut_slice();
        for count in 0..n {
            let m = select_best(moves, &mut scores[..n], count);
            if !m.is_capture() {
                continue;
            }
            if !super::see::see_ge(&self.board, m, 0) {
                continue;
            }
            let Some(unmake) = self.board.make_move(m) else {
                continue;
            };
            let score = -self.quiescence(-beta, -alpha, ply + 1);
            self.board.unmake_move(unmake);
            if self.stopped {
                return Eval::DRAW;
            }
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    /// The main alpha-beta search.
    #[allow(clippy::too_many_lines)]
    fn negamax(&mut self, mut alpha: Eval, mut beta: Eval, mut depth: i32, ply: usize) -> Eval {
        let pv_node = beta.value() - alpha.value() > 1;
        let root = ply == 0;

        self.pv.reset(ply);

        self.count_node();
        if self.stopped {
            return Eval::DRAW;
        }

        if !root && self.is_repetition() {
            return Eval::DRAW;
        }

        // mate-distance pruning: even an immediate mate could not improve
        // on what deeper plies already guarantee
        alpha = alpha.max(Eval::mated_in(ply));
        beta = beta.min(Eval::mate_in(ply + 1));
        if alpha >= beta {
            return alpha;
        }

        // transposition probe; skipped under a singular-verification
        // exclusion, whose result describes a different search
        let node_hash = self.board.hash;
        let mut tt_move = Move::NONE;
        if self.excluded[ply] == Move::NONE {
            let (cached, best) = self.tt.read(node_hash, alpha, beta, depth, ply);
            tt_move = best;
            if !root {
                if let Some(score) = cached {
                    return score;
                }
            }
        }

        if depth <= 0 {
            return self.quiescence(alpha, beta, ply);
        }
        if ply >= MAX_PLY - 1 {
            return self.static_eval();
        }

        let us = self.board.side;
        let in_check = self.board.in_check(us);
        if in_check {
            depth += 1;
        }

        let static_eval = self.static_eval();
        self.static_evals[ply] = static_eval;
        let improving = ply >= 2 && static_eval > self.static_evals[ply - 2];

        // null-move pruning: hand the opponent a free shot; if even that
        // cannot dent beta, the real position surely will not
        if depth >= 3
            && !in_check
            && !root
            && self.excluded[ply] == Move::NONE
            && self.non_pawn_pieces(us) >= 2
        {
            let r = 3 + depth / 3 + i32::from(depth > 6);
            let reduced = (depth - 1 - r).max(0);
            let unmake = self.board.make_null_move();
            self.repetition.push(node_hash);
            self.last_move[ply] = Move::NONE;
            let score = -self.negamax(-beta, -beta + 1, reduced, ply + 1);
            self.repetition.pop();
            self.board.unmake_move(unmake);
            if self.stopped {
                return Eval::DRAW;
            }
            if score >= beta {
                // an unproven mate from a null search is not to be trusted
                return beta;
            }
        }

        // razoring: hopeless at shallow depth unless tactics save it
        if depth <= 3 && !in_check && !root && static_eval + (300 + 60 * depth) < alpha {
            let score = self.quiescence(alpha - 1, alpha, ply);
            if self.stopped {
                return Eval::DRAW;
            }
            if score < alpha {
                return alpha;
            }
        }

        // ProbCut: a good capture that beats beta by a margin at reduced
        // depth is overwhelmingly likely to beat beta for real
        if depth >= 5 && !pv_node && !in_check && !root && beta.value().abs() < Eval::MATE_ZONE {
            let pc_beta = beta + 200;
            let mut list = MoveList::new();
            generate_moves(&self.board, &mut list);
            let n = list.len();
            let mut scores = [0i32; 256];
            for i in 0..n {
                scores[i] = self
                    .orderer
                    .score(&self.board, list[i], tt_move, ply, Move::NONE);
            }
            let moves = list.as_mut_slice();
            for count in 0..n {
                let m = select_best(moves, &mut scores[..n], count);
                if !m.is_capture() || !super::see::see_ge(&self.board, m, 0) {
                    continue;
                }
                let Some(unmake) = self.board.make_move(m) else {
                    continue;
                };
                self.repetition.push(node_hash);
                self.last_move[ply] = m;
                let score = -self.negamax(-pc_beta, -pc_beta + 1, depth - 4, ply + 1);
                self.repetition.pop();
                self.board.unmake_move(unmake);
                if self.stopped {
                    return Eval::DRAW;
                }
                if score >= pc_beta {
                    return score;
                }
            }
        }

        // reverse futility: statically so far above beta that no quiet
        // reply can pull it back
        if depth <= 6 && !in_check && !pv_node && !root {
            let margin = (if improving { 70 } else { 80 }) * depth;
            if static_eval - margin >= beta {
                return static_eval - margin;
            }
        }

        // internal iterative deepening: no hash move means a shallow search
        // can find one worth ordering first
        if depth >= 5 && tt_move == Move::NONE && !in_check {
            self.negamax(alpha, beta, depth - 3, ply);
            if self.stopped {
                return Eval::DRAW;
            }
            if let Some(entry) = self.tt.probe(node_hash) {
                tt_move = entry.best_move;
            }
        }

        let mut list = MoveList::new();
        generate_moves(&self.board, &mut list);
        let n = list.len();
        let prev = match ply {
            0 => Move::NONE,
            _ => self.last_move[ply - 1],
        };
        let mut scores = [0i32; 256];
        for i in 0..n {
            scores[i] = self.orderer.score(&self.board, list[i], tt_move, ply, prev);
        }

        let original_alpha = alpha;
        let mut best_score = -Eval::INFINITY;
        let mut best_move = Move::NONE;
        let mut legal_moves = 0usize;
        let mut moves_searched = 0usize;
        let mut quiets_tried = [Move::NONE; 128];
        let mut n_quiets = 0usize;

        let moves = list.as_mut_slice();
        for count in 0..n {
            let m = select_best(moves, &mut scores[..n], count);
            if m == self.excluded[ply] {
                continue;
            }

            let is_capture = m.is_capture();
            let is_promotion = m.promotion().is_some();
            let is_quiet = !is_capture && !is_promotion;
            let move_score = scores[count];

            // SEE pruning, decided on the parent position: bad captures at
            // shallow-to-middling depth, and clearly losing quiets.
            // No prune fires until one move at this node has returned a
            // real score: pruning away the entire move list before any move
            // is made would make the terminal no-legal-move check read the
            // node as mate or stalemate, and near mate bounds the margins
            // mean nothing.
            if !root && best_score.value() > -Eval::MATE_ZONE {
                if depth <= 8
                    && !pv_node
                    && is_capture
                    && !super::see::see_ge(&self.board, m, -30 * depth * depth)
                {
                    continue;
                }
                if depth <= 6
                    && !pv_node
                    && is_quiet
                    && moves_searched > 3
                    && !super::see::see_ge(&self.board, m, -20 * depth)
                {
                    continue;
                }
            }

            // singular extension: verify on the parent position whether the
            // transposition move is the only one holding the score
            let mut extension = 0;
            if depth >= 8
                && m == tt_move
                && tt_move != Move::NONE
                && !in_check
                && self.excluded[ply] == Move::NONE
            {
                if let Some(entry) = self.tt.probe(node_hash) {
                    let tt_score = entry.score_at(ply);
                    // a mate score is excluded: its distance arithmetic
                    // makes the margin `tt_score - 2 * depth` meaningless
                    if i32::from(entry.depth) >= depth - 3
                        && matches!(entry.bound, Bound::Exact | Bound::Lower)
                        && !tt_score.is_mate()
                    {
                        let se_beta = tt_score - 2 * depth;
                        self.excluded[ply] = tt_move;
                        let score = self.negamax(se_beta - 1, se_beta, depth / 2 - 1, ply);
                        self.excluded[ply] = Move::NONE;
                        if self.stopped {
                            return Eval::DRAW;
                        }
                        if score < se_beta {
                            // nothing else comes close: extend the TT move
                            extension = 1;
                        } else if score >= beta {
                            // multi-cut: even without the TT move this node
                            // fails high
                            return score;
                        }
                    }
                }
            }

            let Some(unmake) = self.board.make_move(m) else {
                continue;
            };
            legal_moves += 1;
            if root && self.root_best == Move::NONE {
                self.root_best = m;
            }
            self.repetition.push(node_hash);
            self.last_move[ply] = m;

            let gives_check = self.board.in_check(self.board.side);

            // shallow-depth move pruning for unremarkable quiets; gated on
            // a real best score for the same reason as the SEE prunes above
            let mut skip = false;
            if !root
                && !pv_node
                && !in_check
                && !gives_check
                && is_quiet
                && best_score.value() > -Eval::MATE_ZONE
            {
                let lmp_allowance = if improving { 3 } else { 0 };
                if depth <= 7 && moves_searched > LMP_MARGIN[depth as usize] + lmp_allowance {
                    skip = true;
                }
                if !skip
                    && depth <= 6
                    && moves_searched > 1
                    && static_eval + FUTILITY_MARGIN[depth as usize] <= alpha
                {
                    skip = true;
                }
                if !skip
                    && depth <= 4
                    && moves_searched > 1
                    && self.orderer.history_value(m) < -1024 * depth
                {
                    skip = true;
                }
            }
            if skip {
                self.repetition.pop();
                self.board.unmake_move(unmake);
                continue;
            }

            if gives_check {
                extension = 1;
            }
            // a pawn reaching the seventh is about to promote; look closer
            if extension == 0
                && m.piece().is_pawn()
                && ((m.piece().color() == Color::White && m.to().rank() == 6)
                    || (m.piece().color() == Color::Black && m.to().rank() == 1))
            {
                extension = 1;
            }

            let new_depth = depth - 1 + extension;
            let score;
            if moves_searched == 0 {
                score = -self.negamax(-beta, -alpha, new_depth, ply + 1);
            } else {
                // late-move reductions for quiets, a token reduction for
                // losing captures, then a zero-window probe
                let mut reduction = 0;
                if moves_searched >= 3 && depth >= 3 && !in_check && is_quiet {
                    reduction = LMR_TABLE[depth.min(63) as usize][moves_searched.min(63)];
                    if pv_node {
                        reduction -= 1;
                    }
                    if self.orderer.is_killer(m, ply) {
                        reduction -= 1;
                    }
                    if self.orderer.is_counter(m, prev) {
                        reduction -= 1;
                    }
                    reduction -= self.orderer.history_value(m) / 5000;
                    if !pv_node && depth > 8 {
                        reduction += 1;
                    }
                    if moves_searched > 12 {
                        reduction += 1;
                    }
                    if improving {
                        reduction -= 1;
                    }
                    if !pv_node && self.non_pawn_pieces(us) > 4 {
                        reduction += 1;
                    }
                    if is_capture && !pv_node {
                        reduction += 1;
                    }
                } else if is_capture && depth >= 5 && move_score < 1_000_000 {
                    // a capture ordered below the good-exchange tier loses
                    // material; reduce it a little
                    reduction = 1;
                }
                reduction = reduction.clamp(0, (depth - 2).max(0));

                let zw_score = -self.negamax(-alpha - 1, -alpha, new_depth - reduction, ply + 1);
                if zw_score > alpha && (reduction > 0 || zw_score < beta) {
                    score = -self.negamax(-beta, -alpha, new_depth, ply + 1);
                } else {
                    score = zw_score;
                }
            }

            self.repetition.pop();
            self.board.unmake_move(unmake);
            if self.stopped {
                return Eval::DRAW;
            }
            moves_searched += 1;

            if score > best_score {
                best_score = score;
                best_move = m;
            }
            if score > alpha {
                alpha = score;
                self.pv.record(ply, m);
                if root {
                    self.root_best = m;
                }
                if score >= beta {
                    if is_quiet {
                        self.orderer
                            .quiet_cutoff(m, ply, depth, prev, &quiets_tried[..n_quiets]);
                    } else if is_capture {
                        self.orderer.capture_cutoff(&self.board, m, depth);
                    }
                    if self.excluded[ply] == Move::NONE {
                        self.tt.write(node_hash, depth, beta, Bound::Lower, m, ply);
                    }
                    return beta;
                }
            }
            if is_quiet && n_quiets < quiets_tried.len() {
                quiets_tried[n_quiets] = m;
                n_quiets += 1;
            }
        }

        if legal_moves == 0 {
            // checkmate reads as mated-at-this-ply so that nearer mates
            // score worse; stalemate is a draw shaded by contempt
            return match in_check {
                true => Eval::mated_in(ply),
                false => self.draw_score(),
            };
        }

        if self.excluded[ply] == Move::NONE {
            let bound = match alpha > original_alpha {
                true => Bound::Exact,
                false => Bound::Upper,
            };
            self.tt.write(node_hash, depth, alpha, bound, best_move, ply);
        }
        alpha
    }

    /// Print the `info` line for a completed iteration.
    fn emit_info(&self, report: &SearchReport) {
        let nodes = self.limit.nodes() + self.nodes_since_poll;
        let elapsed = self.limit.elapsed();
        let millis = elapsed.as_millis().max(1) as u64;
        println!(
            "{}",
            UciMessage::Info(&[
                EngineInfo::Depth(report.depth),
                EngineInfo::Score(report.score),
                EngineInfo::Nodes(nodes),
                EngineInfo::Nps(nodes * 1000 / millis),
                EngineInfo::Time(elapsed),
                EngineInfo::Pv(self.pv.root_line()),
            ])
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::movegen::legal_moves;

    /// Run a depth-limited search on a FEN with fresh tables.
    fn search_fen(fen: &str, depth: u8) -> SearchReport {
        let game = Game::from_board(Board::from_fen(fen).unwrap());
        let mut tt = TTable::with_size_mb(16);
        let mut orderer = MoveOrderer::new();
        let limit = SearchLimit::new();
        limit.start(None, None);
        let config = SearchConfig::new();
        let mut searcher = Searcher::new(&game, &mut tt, &mut orderer, &limit, &config, None);
        searcher.run(depth)
    }

    #[test]
    fn depth_one_returns_a_legal_move() {
        let report = search_fen(crate::base::STARTPOS_FEN, 1);
        let b = Board::new();
        assert!(legal_moves(&b).contains(&report.best_move));
    }

    #[test]
    fn finds_back_rank_mate_in_one() {
        // Ra8# is the only mate
        let report = search_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", 4);
        assert_eq!(report.best_move.to_uci(), "a1a8");
        assert_eq!(report.score, Eval::mate_in(1));
    }

    #[test]
    fn finds_mate_in_two() {
        // two-rook ladder: 1.Rg7 boxes the king on the back rank, 2.Rh8#
        let report = search_fen("k7/8/8/8/8/8/1K4R1/7R w - - 0 1", 6);
        assert!(report.score.is_mate());
        assert_eq!(report.score.moves_to_mate(), Some(2));
    }

    #[test]
    fn mated_position_has_no_move() {
        // fool's mate delivered: white to move, already checkmated
        let report = search_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 3",
            4,
        );
        assert_eq!(report.best_move, Move::NONE);
        assert_eq!(report.score, Eval::mated_in(0));
    }

    #[test]
    fn no_legal_moves_emits_none() {
        // stalemate: black to move with no moves
        let report = search_fen("k7/8/1Q6/8/8/8/8/K7 b - - 0 1", 3);
        assert_eq!(report.best_move, Move::NONE);
    }

    #[test]
    /// The zero-window property: with `beta - alpha == 1`, negamax must
    /// return a score outside the open window.
    fn zero_window_bounds() {
        let fens = [
            crate::base::STARTPOS_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            for window_at in [-200, -50, 0, 50, 200] {
                let game = Game::from_board(Board::from_fen(fen).unwrap());
                let mut tt = TTable::with_size_mb(8);
                let mut orderer = MoveOrderer::new();
                let limit = SearchLimit::new();
                limit.start(None, None);
                let config = SearchConfig::new();
                let mut searcher =
                    Searcher::new(&game, &mut tt, &mut orderer, &limit, &config, None);
                let alpha = Eval::cp(window_at);
                let beta = Eval::cp(window_at + 1);
                let score = searcher.negamax(alpha, beta, 5, 0);
                assert!(
                    score <= alpha || score >= beta,
                    "score {score} inside zero window at {window_at} for {fen}"
                );
            }
        }
    }

    #[test]
    /// Two identical searches from cleared tables must agree exactly.
    fn deterministic_re_search() {
        let a = search_fen(crate::base::STARTPOS_FEN, 6);
        let b = search_fen(crate::base::STARTPOS_FEN, 6);
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.score, b.score);
    }

    #[test]
    /// A repetition along the search path scores as a draw at once.
    fn repetition_is_a_draw() {
        // shuffle the rooks back and forth, returning to the start
        let mut game = Game::from_board(
            Board::from_fen("4k3/8/8/8/8/8/r7/4K2R w - - 0 1").unwrap(),
        );
        let moves = ["h1g1", "a2b2", "g1h1", "b2a2"];
        for uci in moves {
            let m = crate::base::movegen::move_from_uci(&game.board, uci).unwrap();
            assert!(game.make_move(m));
        }
        // the original position is on the board again; one more shuffle
        // completes the repetition inside the search
        let mut tt = TTable::with_size_mb(8);
        let mut orderer = MoveOrderer::new();
        let limit = SearchLimit::new();
        limit.start(None, None);
        let config = SearchConfig::new();
        let mut searcher = Searcher::new(&game, &mut tt, &mut orderer, &limit, &config, None);
        let report = searcher.run(6);
        // white, up a rook exchange... actually material is equal; the
        // score must be finite and the move legal
        assert!(legal_moves(&game.board).contains(&report.best_move));
        assert!(!report.score.is_mate());
    }

    #[test]
    /// After a four-move knight shuffle the start position stands again;
    /// the repetition scan must see it among the same-parity ancestors.
    fn repetition_detection_respects_parity() {
        let mut game = Game::default();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            let m = crate::base::movegen::move_from_uci(&game.board, uci).unwrap();
            assert!(game.make_move(m));
        }
        // same position as the start (the halfmove clock differs, the hash
        // does not)
        assert_eq!(game.board.hash, Board::new().hash);

        let mut tt = TTable::with_size_mb(1);
        let mut orderer = MoveOrderer::new();
        let limit = SearchLimit::new();
        limit.start(None, None);
        let config = SearchConfig::new();
        let searcher = Searcher::new(&game, &mut tt, &mut orderer, &limit, &config, None);
        assert!(searcher.is_repetition());

        // two plies in, the history holds only opposite-parity ancestors
        let fresh = Game::default();
        let searcher = Searcher::new(&fresh, &mut tt, &mut orderer, &limit, &config, None);
        assert!(!searcher.is_repetition());
    }

    #[test]
    fn killer_is_recorded_after_quiet_cutoff() {
        // any middlegame search will produce quiet cutoffs
        let game = Game::from_board(
            Board::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
                .unwrap(),
        );
        let mut tt = TTable::with_size_mb(8);
        let mut orderer = MoveOrderer::new();
        let limit = SearchLimit::new();
        limit.start(None, None);
        let config = SearchConfig::new();
        let mut searcher = Searcher::new(&game, &mut tt, &mut orderer, &limit, &config, None);
        searcher.run(6);
        let any_killer = (0..MAX_PLY).any(|ply| orderer.killers[0][ply] != Move::NONE);
        assert!(any_killer, "a depth-6 search must set at least one killer");
    }
}
