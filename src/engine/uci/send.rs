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

//! Messages the engine sends to the GUI, with their UCI wire formats.

use std::{
    fmt::{Display, Formatter},
    time::Duration,
};

use crate::base::Move;

use super::super::eval::Eval;

#[derive(Clone, Debug, PartialEq, Eq)]
/// The set of messages that the engine can send to the GUI.
pub enum UciMessage<'a> {
    /// The engine identifies itself after receiving `uci`.
    Id {
        /// The name of the engine.
        name: &'a str,
        /// The author of the engine.
        author: &'a str,
    },
    /// Sent after `id` and the option list to close the handshake.
    UciOk,
    /// The answer to `isready`.
    ReadyOk,
    /// Announce a configurable option to the GUI.
    Option {
        /// The option's name, as used in `setoption`.
        name: &'a str,
        /// Its type, default, and range.
        opt: OptionType<'a>,
    },
    /// The search is finished and this is the move to play. A `Move::NONE`
    /// best move prints as the UCI null move `0000`.
    BestMove {
        m: Move,
        /// The expected reply, for the GUI to ponder on.
        ponder: Option<Move>,
    },
    /// Information about the ongoing search.
    Info(&'a [EngineInfo<'a>]),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One field of a UCI `info` line.
pub enum EngineInfo<'a> {
    /// The depth of the completed iteration.
    Depth(u8),
    /// The score, printed as `cp N` or `mate N`.
    Score(Eval),
    /// Nodes searched so far.
    Nodes(u64),
    /// Search speed in nodes per second.
    Nps(u64),
    /// Time searched so far.
    Time(Duration),
    /// The principal variation. An empty line prints nothing.
    Pv(&'a [Move]),
    /// A free-form diagnostic string; must not contain newlines.
    String(&'a str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The type tag of an announced option.
pub enum OptionType<'a> {
    /// An integer in an inclusive range.
    Spin { default: i64, min: i64, max: i64 },
    /// Free text, with an optional default.
    String(Option<&'a str>),
    /// A boolean.
    Check(bool),
}

impl Display for UciMessage<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UciMessage::Id { name, author } => {
                write!(f, "id name {name}\nid author {author}")
            }
            UciMessage::UciOk => write!(f, "uciok"),
            UciMessage::ReadyOk => write!(f, "readyok"),
            UciMessage::Option { name, opt } => {
                write!(f, "option name {name} ")?;
                match opt {
                    OptionType::Spin { default, min, max } => {
                        write!(f, "type spin default {default} min {min} max {max}")
                    }
                    OptionType::String(default) => {
                        write!(f, "type string")?;
                        match default {
                            Some(s) => write!(f, " default {s}"),
                            None => Ok(()),
                        }
                    }
                    OptionType::Check(default) => {
                        write!(f, "type check default {default}")
                    }
                }
            }
            UciMessage::BestMove { m, ponder } => {
                match *m == Move::NONE {
                    true => write!(f, "bestmove 0000")?,
                    false => write!(f, "bestmove {}", m.to_uci())?,
                }
                if let Some(p) = ponder {
                    write!(f, " ponder {}", p.to_uci())?;
                }
                Ok(())
            }
            UciMessage::Info(infos) => {
                write!(f, "info")?;
                for info in *infos {
                    match info {
                        EngineInfo::Depth(d) => write!(f, " depth {d}")?,
                        EngineInfo::Score(eval) => write!(f, " score {eval}")?,
                        EngineInfo::Nodes(n) => write!(f, " nodes {n}")?,
                        EngineInfo::Nps(n) => write!(f, " nps {n}")?,
                        EngineInfo::Time(t) => write!(f, " time {}", t.as_millis())?,
                        EngineInfo::Pv(line) => {
                            if !line.is_empty() {
                                write!(f, " pv")?;
                                for m in *line {
                                    write!(f, " {}", m.to_uci())?;
                                }
                            }
                        }
                        EngineInfo::String(s) => write!(f, " string {s}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{Piece, Square};

    #[test]
    fn id_message() {
        assert_eq!(
            UciMessage::Id {
                name: "Tenor 0.1.0",
                author: "The Tenor Authors"
            }
            .to_string(),
            "id name Tenor 0.1.0\nid author The Tenor Authors"
        );
    }

    #[test]
    fn option_messages() {
        assert_eq!(
            UciMessage::Option {
                name: "Hash",
                opt: OptionType::Spin {
                    default: 64,
                    min: 1,
                    max: 4096
                }
            }
            .to_string(),
            "option name Hash type spin default 64 min 1 max 4096"
        );
        assert_eq!(
            UciMessage::Option {
                name: "OwnBook",
                opt: OptionType::Check(true)
            }
            .to_string(),
            "option name OwnBook type check default true"
        );
        assert_eq!(
            UciMessage::Option {
                name: "BookFile",
                opt: OptionType::String(None)
            }
            .to_string(),
            "option name BookFile type string"
        );
    }

    #[test]
    fn bestmove_messages() {
        let m = Move::quiet(Square::E2, Square::E4, Piece::WhitePawn);
        let p = Move::quiet(Square::E7, Square::E5, Piece::BlackPawn);
        assert_eq!(
            UciMessage::BestMove { m, ponder: None }.to_string(),
            "bestmove e2e4"
        );
        assert_eq!(
            UciMessage::BestMove {
                m,
                ponder: Some(p)
            }
            .to_string(),
            "bestmove e2e4 ponder e7e5"
        );
        assert_eq!(
            UciMessage::BestMove {
                m: Move::NONE,
                ponder: None
            }
            .to_string(),
            "bestmove 0000"
        );
    }

    #[test]
    fn info_line() {
        let pv = [
            Move::quiet(Square::E2, Square::E4, Piece::WhitePawn),
            Move::quiet(Square::E7, Square::E5, Piece::BlackPawn),
        ];
        let msg = UciMessage::Info(&[
            EngineInfo::Depth(7),
            EngineInfo::Score(Eval::cp(33)),
            EngineInfo::Nodes(12_345),
            EngineInfo::Nps(1_000_000),
            EngineInfo::Time(Duration::from_millis(12)),
            EngineInfo::Pv(&pv),
        ]);
        assert_eq!(
            msg.to_string(),
            "info depth 7 score cp 33 nodes 12345 nps 1000000 time 12 pv e2e4 e7e5"
        );
    }

    #[test]
    fn mate_score_in_info() {
        let msg = UciMessage::Info(&[EngineInfo::Score(Eval::mate_in(1))]);
        assert_eq!(msg.to_string(), "info score mate 1");
    }
}
