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

//! The UCI driver: one long-lived reader loop on stdin, spawning one search
//! worker per `go`.
//!
//! The reader is the only thread that ever blocks. It talks to the worker
//! exclusively through the atomic flag block in [`SearchLimit`]; everything
//! else the worker needs (transposition table, history tables, book, NNUE)
//! lives in a context the worker locks for the duration of its search. The
//! reader only touches that context between searches, after joining the
//! worker.

pub mod parse;
pub mod send;

use std::{
    io::stdin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::JoinHandle,
    time::Duration,
};

use crate::base::{movegen::move_from_uci, Board, Color, Game, STARTPOS_FEN};
use crate::book::Book;
use crate::nnue::Network;

use super::{
    config::SearchConfig,
    limit::SearchLimit,
    pick::MoveOrderer,
    search::Searcher,
    time::move_budget,
    transposition::TTable,
};

use parse::{parse_line, GoOption, UciCommand};
use send::{EngineInfo, OptionType, UciMessage};

/// The name and version the engine announces.
const NAME: &str = concat!("Tenor ", env!("CARGO_PKG_VERSION"));
/// The author line the engine announces.
const AUTHOR: &str = "The Tenor Authors";

/// Everything a search borrows besides the game: owned by the driver,
/// locked by the worker while it runs.
struct EngineContext {
    config: SearchConfig,
    tt: TTable,
    orderer: Box<MoveOrderer>,
    book: Option<Book>,
    nnue: Option<Network>,
}

impl EngineContext {
    fn new() -> EngineContext {
        let config = SearchConfig::new();
        EngineContext {
            tt: TTable::with_size_mb(config.hash_mb),
            orderer: MoveOrderer::new(),
            book: None,
            nnue: None,
            config,
        }
    }
}

/// Recover a context lock even if a worker panicked while holding it.
fn lock(ctx: &Mutex<EngineContext>) -> MutexGuard<'_, EngineContext> {
    ctx.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Print an `info string` diagnostic when debug mode is on.
fn debug_info(s: &str, debug: bool) {
    if debug {
        println!("{}", UciMessage::Info(&[EngineInfo::String(s)]));
    }
}

/// Run the UCI engine until `quit` or end of input.
pub fn main_loop() {
    let ctx = Arc::new(Mutex::new(EngineContext::new()));
    let limit = Arc::new(SearchLimit::new());
    let mut game = Game::default();
    let mut debug = false;
    let mut search_handle: Option<JoinHandle<()>> = None;

    loop {
        let mut buf = String::new();
        match stdin().read_line(&mut buf) {
            // EOF: shut down like `quit`
            Ok(0) => {
                stop_search(&limit, &mut search_handle);
                break;
            }
            Ok(_) => (),
            Err(_) => {
                debug_info("failed to read line", debug);
                continue;
            }
        }
        if buf.trim().is_empty() {
            continue;
        }
        let command = match parse_line(&buf) {
            Ok(cmd) => cmd,
            Err(e) => {
                println!(
                    "{}",
                    UciMessage::Info(&[EngineInfo::String(&format!(
                        "ignoring line: {e}"
                    ))])
                );
                continue;
            }
        };

        match command {
            UciCommand::Uci => {
                println!(
                    "{}",
                    UciMessage::Id {
                        name: NAME,
                        author: AUTHOR
                    }
                );
                announce_options();
                println!("{}", UciMessage::UciOk);
            }
            UciCommand::Debug(mode) => debug = mode,
            UciCommand::IsReady => {
                // drain a worker that is already winding down (a stopped
                // ponder search included) so its bestmove goes out before
                // readyok; a healthy ponder search is left running
                let winding_down = match &search_handle {
                    Some(handle) => handle.is_finished() || limit.is_over(),
                    None => false,
                };
                if winding_down {
                    if let Some(handle) = search_handle.take() {
                        let _ = handle.join();
                    }
                }
                println!("{}", UciMessage::ReadyOk);
            }
            UciCommand::SetOption { name, value } => {
                // options only apply between searches
                stop_search(&limit, &mut search_handle);
                set_option(&ctx, &name, value.as_deref(), debug);
            }
            UciCommand::NewGame => {
                stop_search(&limit, &mut search_handle);
                let mut guard = lock(&ctx);
                guard.tt.clear();
                guard.orderer.clear();
                drop(guard);
                game = Game::default();
            }
            UciCommand::Position { fen, moves } => {
                stop_search(&limit, &mut search_handle);
                match load_position(fen.as_deref(), &moves) {
                    Ok(new_game) => game = new_game,
                    Err(e) => {
                        // leave the prior position untouched
                        println!(
                            "{}",
                            UciMessage::Info(&[EngineInfo::String(&format!(
                                "ignoring position: {e}"
                            ))])
                        );
                    }
                }
            }
            UciCommand::Go(opts) => {
                stop_search(&limit, &mut search_handle);
                search_handle = go(&opts, &ctx, &limit, &game, debug);
            }
            UciCommand::Stop => stop_search(&limit, &mut search_handle),
            UciCommand::PonderHit => limit.ponder_hit(),
            UciCommand::Quit => {
                stop_search(&limit, &mut search_handle);
                break;
            }
        }
    }
}

/// Announce every supported option after `id`.
fn announce_options() {
    let defaults = SearchConfig::new();
    let options: [(&str, OptionType); 8] = [
        (
            "Hash",
            OptionType::Spin {
                default: defaults.hash_mb as i64,
                min: 1,
                max: 4096,
            },
        ),
        (
            "Contempt",
            OptionType::Spin {
                default: i64::from(defaults.contempt),
                min: -100,
                max: 100,
            },
        ),
        (
            "MultiPV",
            OptionType::Spin {
                default: i64::from(defaults.multipv),
                min: 1,
                max: 10,
            },
        ),
        ("OwnBook", OptionType::Check(defaults.own_book)),
        ("BookFile", OptionType::String(None)),
        ("UseNNUE", OptionType::Check(defaults.use_nnue)),
        ("NNUEFile", OptionType::String(None)),
        ("Ponder", OptionType::Check(defaults.ponder)),
    ];
    for (name, opt) in options {
        println!("{}", UciMessage::Option { name, opt });
    }
}

/// Apply one `setoption` command. Unknown options are ignored silently, per
/// the UCI spec; malformed values are reported in debug mode only.
fn set_option(ctx: &Mutex<EngineContext>, name: &str, value: Option<&str>, debug: bool) {
    let mut guard = lock(ctx);
    match name {
        "Hash" => match value.and_then(|v| v.parse::<usize>().ok()) {
            Some(mb) => {
                let mb = mb.clamp(1, 4096);
                guard.config.hash_mb = mb;
                guard.tt.resize_mb(mb);
                println!(
                    "{}",
                    UciMessage::Info(&[EngineInfo::String(&format!(
                        "hash resized to {mb} MB ({} entries)",
                        guard.tt.len()
                    ))])
                );
            }
            None => debug_info("bad value for Hash", debug),
        },
        "Contempt" => match value.and_then(|v| v.parse::<i32>().ok()) {
            Some(c) => guard.config.contempt = c.clamp(-100, 100),
            None => debug_info("bad value for Contempt", debug),
        },
        "MultiPV" => match value.and_then(|v| v.parse::<u8>().ok()) {
            Some(n) => guard.config.multipv = n.clamp(1, 10),
            None => debug_info("bad value for MultiPV", debug),
        },
        "OwnBook" | "Book" => match value {
            Some("true") => guard.config.own_book = true,
            Some("false") => guard.config.own_book = false,
            _ => debug_info("bad value for OwnBook", debug),
        },
        "BookFile" | "BookPath" => {
            if let Some(path) = value {
                match Book::load(path) {
                    Ok(book) => {
                        println!(
                            "{}",
                            UciMessage::Info(&[EngineInfo::String(&format!(
                                "book loaded: {} entries",
                                book.len()
                            ))])
                        );
                        guard.book = Some(book);
                    }
                    Err(e) => println!(
                        "{}",
                        UciMessage::Info(&[EngineInfo::String(&format!("book not loaded: {e}"))])
                    ),
                }
            }
        }
        "UseNNUE" => match value {
            Some("true") => guard.config.use_nnue = true,
            Some("false") => guard.config.use_nnue = false,
            _ => debug_info("bad value for UseNNUE", debug),
        },
        "NNUEFile" => {
            if let Some(path) = value {
                match Network::load(path) {
                    Ok(net) => {
                        println!(
                            "{}",
                            UciMessage::Info(&[EngineInfo::String(&format!(
                                "NNUE loaded: {}x{} network",
                                net.h1, net.h2
                            ))])
                        );
                        guard.nnue = Some(net);
                    }
                    Err(e) => println!(
                        "{}",
                        UciMessage::Info(&[EngineInfo::String(&format!("NNUE not loaded: {e}"))])
                    ),
                }
            }
        }
        "Ponder" => match value {
            Some("true") => guard.config.ponder = true,
            Some("false") => guard.config.ponder = false,
            _ => debug_info("bad value for Ponder", debug),
        },
        // unknown options are ignored silently
        _ => (),
    }
}

/// Build a fresh game from a `position` command.
fn load_position(fen: Option<&str>, moves: &[String]) -> Result<Game, String> {
    let board = Board::from_fen(fen.unwrap_or(STARTPOS_FEN)).map_err(String::from)?;
    let mut game = Game::from_board(board);
    for uci in moves {
        let m = move_from_uci(&game.board, uci)
            .map_err(|e| format!("move `{uci}`: {e}"))?;
        if !game.make_move(m) {
            return Err(format!("move `{uci}` is illegal"));
        }
    }
    Ok(game)
}

/// Execute a `go` command: consult the book, arm the limit, and spawn the
/// search worker. Returns the worker's handle, or `None` when the book
/// answered immediately.
fn go(
    opts: &[GoOption],
    ctx: &Arc<Mutex<EngineContext>>,
    limit: &Arc<SearchLimit>,
    game: &Game,
    debug: bool,
) -> Option<JoinHandle<()>> {
    let mut wtime = None;
    let mut btime = None;
    let (mut winc, mut binc) = (0, 0);
    let mut movestogo = None;
    let mut movetime = None;
    let mut nodes_cap = None;
    let mut depth = None;
    let mut infinite = false;
    let mut ponder = false;

    for opt in opts {
        match *opt {
            GoOption::Ponder => ponder = true,
            GoOption::WhiteTime(t) => wtime = Some(t),
            GoOption::BlackTime(t) => btime = Some(t),
            GoOption::WhiteInc(i) => winc = i,
            GoOption::BlackInc(i) => binc = i,
            GoOption::MovesToGo(n) => movestogo = Some(n),
            GoOption::Depth(d) => depth = Some(d),
            GoOption::Nodes(n) => nodes_cap = Some(n),
            GoOption::MoveTime(t) => movetime = Some(t),
            GoOption::Infinite => infinite = true,
        }
    }

    // the book answers instantly, but only for a real search on our clock
    if !ponder && !infinite {
        let guard = lock(ctx);
        if guard.config.own_book {
            if let Some(book) = &guard.book {
                if let Some(m) = book.probe(&game.board) {
                    println!(
                        "{}",
                        UciMessage::Info(&[EngineInfo::String("book move")])
                    );
                    println!(
                        "{}",
                        UciMessage::BestMove {
                            m,
                            ponder: None
                        }
                    );
                    return None;
                }
            }
        }
    }

    // compute the clock budget for this move, if any applies
    let (remaining, increment) = match game.board.side {
        Color::White => (wtime, winc),
        Color::Black => (btime, binc),
    };
    let budget = match (movetime, remaining) {
        (Some(t), _) => Some(Duration::from_millis(t)),
        (None, Some(rem)) => Some(move_budget(rem, increment, movestogo)),
        (None, None) => None,
    };

    if ponder {
        limit.start_ponder(if infinite { None } else { budget }, nodes_cap);
    } else if infinite {
        limit.start(None, nodes_cap);
    } else if let Some(t) = movetime {
        limit.start_exact(Duration::from_millis(t), nodes_cap);
    } else {
        limit.start(budget, nodes_cap);
    }
    debug_info(&format!("time budget: {budget:?}"), debug);

    let ctx = Arc::clone(ctx);
    let limit = Arc::clone(limit);
    let game = game.clone();
    Some(std::thread::spawn(move || {
        let mut guard = lock(&ctx);
        let context = &mut *guard;
        let max_depth = depth.unwrap_or(context.config.depth);
        let mut searcher = Searcher::new(
            &game,
            &mut context.tt,
            &mut context.orderer,
            &limit,
            &context.config,
            context.nnue.as_ref(),
        );
        let report = searcher.run(max_depth);
        let announce_ponder = context.config.ponder;
        drop(guard);
        println!(
            "{}",
            UciMessage::BestMove {
                m: report.best_move,
                ponder: report.ponder.filter(|_| announce_ponder),
            }
        );
    }))
}

/// Tell an ongoing search to stop and wait for its `bestmove` to go out.
fn stop_search(limit: &SearchLimit, handle: &mut Option<JoinHandle<()>>) {
    limit.stop();
    if let Some(h) = handle.take() {
        let _ = h.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_with_moves_loads() {
        let game = load_position(None, &["e2e4".into(), "e7e5".into()]).unwrap();
        assert_eq!(game.board.side, Color::White);
        assert_eq!(game.hash_history.len(), 0); // e7e5 was a pawn move
    }

    #[test]
    fn bad_fen_is_reported() {
        assert!(load_position(Some("not a fen"), &[]).is_err());
    }

    #[test]
    fn illegal_move_is_reported() {
        assert!(load_position(None, &["e2e5".into()]).is_err());
    }

    #[test]
    fn knight_moves_accumulate_history() {
        let game = load_position(None, &["g1f3".into(), "g8f6".into()]).unwrap();
        assert_eq!(game.hash_history.len(), 2);
    }
}
