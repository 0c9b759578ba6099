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

//! Parsing of UCI command lines into typed commands.
//!
//! Per the UCI convention, errors here are advisory: the caller logs them as
//! an `info string` and carries on.

#[derive(Clone, Debug, PartialEq, Eq)]
/// A command received from the GUI.
pub enum UciCommand {
    /// `uci`: identify and list options.
    Uci,
    /// `debug on|off`.
    Debug(bool),
    /// `isready`.
    IsReady,
    /// `setoption name <N> [value <V>]`.
    SetOption {
        name: String,
        value: Option<String>,
    },
    /// `ucinewgame`: clear all learned state.
    NewGame,
    /// `position [startpos|fen <FEN>] [moves m1 m2 ...]`. Moves stay as
    /// strings; they are resolved one by one as they are applied, since each
    /// changes the position the next is parsed against.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// `go` with its options.
    Go(Vec<GoOption>),
    /// `stop`: halt the search and emit the best move found.
    Stop,
    /// `ponderhit`: the pondered move was played.
    PonderHit,
    /// `quit`.
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One option of a `go` command. All times are in milliseconds.
pub enum GoOption {
    /// Search in ponder mode, without time pressure, until `ponderhit` or
    /// `stop`.
    Ponder,
    /// White's remaining clock.
    WhiteTime(u64),
    /// Black's remaining clock.
    BlackTime(u64),
    /// White's increment per move.
    WhiteInc(u64),
    /// Black's increment per move.
    BlackInc(u64),
    /// Moves until the next time control.
    MovesToGo(u64),
    /// Fixed search depth.
    Depth(u8),
    /// Node budget.
    Nodes(u64),
    /// Exact time for this move.
    MoveTime(u64),
    /// Search until told to stop.
    Infinite,
}

/// Parse one line of UCI input.
///
/// # Errors
///
/// Returns a human-readable description of the problem; per the UCI spec the
/// caller should log it and continue.
pub fn parse_line(line: &str) -> Result<UciCommand, String> {
    let mut tokens = line.split_ascii_whitespace();
    let first = tokens.next().ok_or("line contains no tokens")?;
    match first {
        "uci" => Ok(UciCommand::Uci),
        "debug" => match tokens.next() {
            Some("on") | None => Ok(UciCommand::Debug(true)),
            Some("off") => Ok(UciCommand::Debug(false)),
            _ => Err("unrecognized debug mode".into()),
        },
        "isready" => Ok(UciCommand::IsReady),
        "setoption" => parse_setoption(&mut tokens),
        "ucinewgame" => Ok(UciCommand::NewGame),
        "position" => parse_position(&mut tokens),
        "go" => parse_go(&mut tokens),
        "stop" => Ok(UciCommand::Stop),
        "ponderhit" => Ok(UciCommand::PonderHit),
        "quit" => Ok(UciCommand::Quit),
        _ => Err(format!("unrecognized UCI command `{first}`")),
    }
}

/// Parse the remainder of a `setoption` line. Option names and values may
/// contain spaces.
fn parse_setoption(tokens: &mut dyn Iterator<Item = &str>) -> Result<UciCommand, String> {
    match tokens.next() {
        Some("name") => (),
        _ => return Err("expected token `name` after `setoption`".into()),
    }

    let mut name = String::new();
    loop {
        match tokens.next() {
            None => {
                return Ok(UciCommand::SetOption {
                    name,
                    value: None,
                })
            }
            Some("value") => break,
            Some(tok) => {
                if !name.is_empty() {
                    name += " ";
                }
                name += tok;
            }
        }
    }

    let mut value = String::new();
    for tok in tokens {
        if !value.is_empty() {
            value += " ";
        }
        value += tok;
    }
    Ok(UciCommand::SetOption {
        name,
        value: Some(value),
    })
}

/// Parse the remainder of a `position` line.
fn parse_position(tokens: &mut dyn Iterator<Item = &str>) -> Result<UciCommand, String> {
    match tokens.next() {
        Some("startpos") => {
            let moves = match tokens.next() {
                Some("moves") => tokens.map(String::from).collect(),
                Some(other) => return Err(format!("expected `moves`, got `{other}`")),
                None => Vec::new(),
            };
            Ok(UciCommand::Position { fen: None, moves })
        }
        Some("fen") => {
            let mut fen = String::new();
            loop {
                match tokens.next() {
                    None => {
                        return Ok(UciCommand::Position {
                            fen: Some(fen),
                            moves: Vec::new(),
                        })
                    }
                    Some("moves") => {
                        return Ok(UciCommand::Position {
                            fen: Some(fen),
                            moves: tokens.map(String::from).collect(),
                        })
                    }
                    Some(tok) => {
                        if !fen.is_empty() {
                            fen += " ";
                        }
                        fen += tok;
                    }
                }
            }
        }
        _ => Err("expected `startpos` or `fen` after `position`".into()),
    }
}

/// Parse the remainder of a `go` line.
fn parse_go(tokens: &mut dyn Iterator<Item = &str>) -> Result<UciCommand, String> {
    let mut opts = Vec::new();
    while let Some(tok) = tokens.next() {
        opts.push(match tok {
            "ponder" => GoOption::Ponder,
            "wtime" => GoOption::WhiteTime(parse_int(tokens.next())?),
            "btime" => GoOption::BlackTime(parse_int(tokens.next())?),
            "winc" => GoOption::WhiteInc(parse_int(tokens.next())?),
            "binc" => GoOption::BlackInc(parse_int(tokens.next())?),
            "movestogo" => GoOption::MovesToGo(parse_int(tokens.next())?),
            #[allow(clippy::cast_possible_truncation)]
            "depth" => GoOption::Depth(parse_int(tokens.next())?.min(255) as u8),
            "nodes" => GoOption::Nodes(parse_int(tokens.next())?),
            "movetime" => GoOption::MoveTime(parse_int(tokens.next())?),
            "infinite" => GoOption::Infinite,
            _ => return Err(format!("unrecognized option `{tok}` for `go`")),
        });
    }
    Ok(UciCommand::Go(opts))
}

/// Parse an integer token, failing helpfully on absence or garbage.
fn parse_int(tok: Option<&str>) -> Result<u64, String> {
    match tok {
        None => Err("reached end of line while expecting a number".into()),
        Some(s) => s
            .parse()
            .map_err(|e| format!("could not parse `{s}` as a number: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_startpos() {
        assert_eq!(
            parse_line("position startpos moves\n"),
            Ok(UciCommand::Position {
                fen: None,
                moves: Vec::new()
            })
        );
        assert_eq!(
            parse_line("position startpos\n"),
            Ok(UciCommand::Position {
                fen: None,
                moves: Vec::new()
            })
        );
    }

    #[test]
    fn position_fen_with_moves() {
        assert_eq!(
            parse_line(
                "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1 moves c7c5 g1f3\n"
            ),
            Ok(UciCommand::Position {
                fen: Some(
                    "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".into()
                ),
                moves: vec!["c7c5".into(), "g1f3".into()]
            })
        );
    }

    #[test]
    fn setoption_variants() {
        assert_eq!(
            parse_line("setoption name Hash value 128\n"),
            Ok(UciCommand::SetOption {
                name: "Hash".into(),
                value: Some("128".into())
            })
        );
        assert_eq!(
            parse_line("setoption name Clear Hash\n"),
            Ok(UciCommand::SetOption {
                name: "Clear Hash".into(),
                value: None
            })
        );
        assert_eq!(
            parse_line("setoption name BookFile value my books/file.bin\n"),
            Ok(UciCommand::SetOption {
                name: "BookFile".into(),
                value: Some("my books/file.bin".into())
            })
        );
    }

    #[test]
    fn go_with_clocks() {
        assert_eq!(
            parse_line("go wtime 1000 btime 2000 winc 10 binc 20 movestogo 40\n"),
            Ok(UciCommand::Go(vec![
                GoOption::WhiteTime(1000),
                GoOption::BlackTime(2000),
                GoOption::WhiteInc(10),
                GoOption::BlackInc(20),
                GoOption::MovesToGo(40),
            ]))
        );
    }

    #[test]
    fn go_fixed_modes() {
        assert_eq!(
            parse_line("go depth 9\n"),
            Ok(UciCommand::Go(vec![GoOption::Depth(9)]))
        );
        assert_eq!(
            parse_line("go movetime 500 nodes 100000\n"),
            Ok(UciCommand::Go(vec![
                GoOption::MoveTime(500),
                GoOption::Nodes(100_000)
            ]))
        );
        assert_eq!(
            parse_line("go ponder infinite\n"),
            Ok(UciCommand::Go(vec![GoOption::Ponder, GoOption::Infinite]))
        );
    }

    #[test]
    fn bad_lines_error_out() {
        assert!(parse_line("\n").is_err());
        assert!(parse_line("flibbertigibbet\n").is_err());
        assert!(parse_line("go depth nine\n").is_err());
        assert!(parse_line("setoption Hash\n").is_err());
        assert!(parse_line("position midgame\n").is_err());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_line("uci\n"), Ok(UciCommand::Uci));
        assert_eq!(parse_line("isready\n"), Ok(UciCommand::IsReady));
        assert_eq!(parse_line("ucinewgame\n"), Ok(UciCommand::NewGame));
        assert_eq!(parse_line("stop\n"), Ok(UciCommand::Stop));
        assert_eq!(parse_line("ponderhit\n"), Ok(UciCommand::PonderHit));
        assert_eq!(parse_line("quit\n"), Ok(UciCommand::Quit));
        assert_eq!(parse_line("debug on\n"), Ok(UciCommand::Debug(true)));
        assert_eq!(parse_line("debug off\n"), Ok(UciCommand::Debug(false)));
    }
}
