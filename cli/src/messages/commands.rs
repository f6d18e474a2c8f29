use core::fmt;
use std::fmt::Display;
use std::str::FromStr;

use winnow::Parser;
use winnow::Result as WinnowResult;
use winnow::ascii::{digit1, space1};
use winnow::combinator::{alt, opt, preceded};
use winnow::token::{rest, take_while};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    /// Start over, optionally switching variant.
    New { variant: Option<String> },
    Variants,
    Moves {
        square: Option<u32>,
        captures_only: bool,
    },
    Move { notation: String },
    Undo,
    Fen { clocks: bool },
    Load { fen: String },
    Status,
    Draw,
    Board,
    History,
    Clear,
    Perft { depth: usize },
    PerftDivide { depth: usize },
    PerftFull { depth: usize },
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::New { variant } => match variant {
                Some(variant) => write!(f, "new {}", variant),
                None => write!(f, "new"),
            },
            Command::Variants => write!(f, "variants"),
            Command::Moves {
                square,
                captures_only,
            } => {
                write!(f, "moves")?;
                if let Some(square) = square {
                    write!(f, " {}", square)?;
                }
                if *captures_only {
                    write!(f, " captures")?;
                }
                Ok(())
            }
            Command::Move { notation } => write!(f, "move {}", notation),
            Command::Undo => write!(f, "undo"),
            Command::Fen { clocks } => write!(f, "fen{}", if *clocks { " clocks" } else { "" }),
            Command::Load { fen } => write!(f, "load {}", fen),
            Command::Status => write!(f, "status"),
            Command::Draw => write!(f, "draw"),
            Command::Board => write!(f, "board"),
            Command::History => write!(f, "history"),
            Command::Clear => write!(f, "clear"),
            Command::Perft { depth } => write!(f, "perft {}", depth),
            Command::PerftDivide { depth } => write!(f, "perft divide {}", depth),
            Command::PerftFull { depth } => write!(f, "perft full {}", depth),
            Command::Quit => write!(f, "quit"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct CommandParseError(String);

impl Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl std::error::Error for CommandParseError {}

impl FromStr for Command {
    type Err = CommandParseError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        alt((
            parse_new,
            parse_variants,
            // parse_moves must go before parse_move because they share prefix
            parse_moves,
            parse_move,
            parse_undo,
            parse_fen,
            parse_load,
            parse_status,
            parse_draw,
            parse_board,
            parse_history,
            parse_clear,
            parse_perft,
            parse_quit,
            parse_bare_move,
        ))
        .parse(input.trim())
        .map_err(|_| CommandParseError(format!("cannot parse: [{}]", input)))
    }
}

fn parse_new(input: &mut &str) -> WinnowResult<Command> {
    preceded("new", opt(preceded(space1, rest)))
        .map(|variant: Option<&str>| Command::New {
            variant: variant.map(str::to_string),
        })
        .parse_next(input)
}

fn parse_variants(input: &mut &str) -> WinnowResult<Command> {
    "variants".value(Command::Variants).parse_next(input)
}

fn parse_moves(input: &mut &str) -> WinnowResult<Command> {
    preceded(
        "moves",
        opt(preceded(
            space1,
            alt((
                "captures".value(Command::Moves {
                    square: None,
                    captures_only: true,
                }),
                parse_serial.map(|square| Command::Moves {
                    square: Some(square),
                    captures_only: false,
                }),
            )),
        )),
    )
    .map(|command: Option<Command>| {
        command.unwrap_or(Command::Moves {
            square: None,
            captures_only: false,
        })
    })
    .parse_next(input)
}

fn parse_move(input: &mut &str) -> WinnowResult<Command> {
    preceded(("move", space1), parse_notation).parse_next(input)
}

/// A line holding nothing but a move, `32-28`.
fn parse_bare_move(input: &mut &str) -> WinnowResult<Command> {
    parse_notation.parse_next(input)
}

fn parse_notation(input: &mut &str) -> WinnowResult<Command> {
    take_while(1.., |c: char| c.is_ascii_digit() || c == '-' || c == 'x')
        .verify(|notation: &str| notation.starts_with(|c: char| c.is_ascii_digit()))
        .map(|notation: &str| Command::Move {
            notation: notation.to_string(),
        })
        .parse_next(input)
}

fn parse_undo(input: &mut &str) -> WinnowResult<Command> {
    "undo".value(Command::Undo).parse_next(input)
}

fn parse_fen(input: &mut &str) -> WinnowResult<Command> {
    preceded("fen", opt(preceded(space1, "clocks")))
        .map(|clocks: Option<&str>| Command::Fen {
            clocks: clocks.is_some(),
        })
        .parse_next(input)
}

fn parse_load(input: &mut &str) -> WinnowResult<Command> {
    preceded(("load", space1), rest)
        .map(|fen: &str| Command::Load {
            fen: fen.trim().to_string(),
        })
        .parse_next(input)
}

fn parse_status(input: &mut &str) -> WinnowResult<Command> {
    "status".value(Command::Status).parse_next(input)
}

fn parse_draw(input: &mut &str) -> WinnowResult<Command> {
    "draw".value(Command::Draw).parse_next(input)
}

fn parse_board(input: &mut &str) -> WinnowResult<Command> {
    "board".value(Command::Board).parse_next(input)
}

fn parse_history(input: &mut &str) -> WinnowResult<Command> {
    "history".value(Command::History).parse_next(input)
}

fn parse_clear(input: &mut &str) -> WinnowResult<Command> {
    "clear".value(Command::Clear).parse_next(input)
}

fn parse_perft(input: &mut &str) -> WinnowResult<Command> {
    preceded(
        ("perft", space1),
        alt((
            preceded(("full", space1), parse_depth).map(|depth| Command::PerftFull { depth }),
            preceded(("divide", space1), parse_depth).map(|depth| Command::PerftDivide { depth }),
            parse_depth.map(|depth| Command::Perft { depth }),
        )),
    )
    .parse_next(input)
}

fn parse_quit(input: &mut &str) -> WinnowResult<Command> {
    alt(("quit", "exit")).value(Command::Quit).parse_next(input)
}

fn parse_depth(input: &mut &str) -> WinnowResult<usize> {
    digit1.try_map(usize::from_str).parse_next(input)
}

fn parse_serial(input: &mut &str) -> WinnowResult<u32> {
    digit1.try_map(u32::from_str).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;
    use testresult::TestResult;

    #[test_case("new", Command::New { variant: None })]
    #[test_case("new american", Command::New { variant: Some("american".to_string()) })]
    #[test_case("variants", Command::Variants)]
    #[test_case("moves", Command::Moves { square: None, captures_only: false })]
    #[test_case("moves captures", Command::Moves { square: None, captures_only: true })]
    #[test_case("moves 32", Command::Moves { square: Some(32), captures_only: false })]
    #[test_case("move 32-28", Command::Move { notation: "32-28".to_string() })]
    #[test_case("move 26x37x48", Command::Move { notation: "26x37x48".to_string() })]
    #[test_case("28x19", Command::Move { notation: "28x19".to_string() } ; "bare move")]
    #[test_case("undo", Command::Undo)]
    #[test_case("fen", Command::Fen { clocks: false })]
    #[test_case("fen clocks", Command::Fen { clocks: true })]
    #[test_case("load W:W28:B19 3 7", Command::Load { fen: "W:W28:B19 3 7".to_string() })]
    #[test_case("status", Command::Status)]
    #[test_case("draw", Command::Draw)]
    #[test_case("board", Command::Board)]
    #[test_case("history", Command::History)]
    #[test_case("clear", Command::Clear)]
    #[test_case("perft 4", Command::Perft { depth: 4 })]
    #[test_case("perft divide 3", Command::PerftDivide { depth: 3 })]
    #[test_case("perft full 5", Command::PerftFull { depth: 5 })]
    #[test_case("quit", Command::Quit)]
    #[test_case("exit", Command::Quit)]
    #[test_case("  status  ", Command::Status ; "padded")]
    fn test_from_str(input: &str, want: Command) -> TestResult {
        let got = Command::from_str(input)?;

        assert_eq!(got, want);
        Ok(())
    }

    #[test_case("" ; "empty")]
    #[test_case("go" ; "unknown")]
    #[test_case("perft" ; "perft without depth")]
    #[test_case("perft deep" ; "perft bad depth")]
    #[test_case("moves a3" ; "moves algebraic")]
    #[test_case("move" ; "move without notation")]
    #[test_case("load" ; "load without fen")]
    #[test_case("-5" ; "bare dash")]
    fn test_from_str_invalid(input: &str) {
        assert!(Command::from_str(input).is_err());
    }

    #[test_case(Command::Moves { square: Some(31), captures_only: false } ; "moves square")]
    #[test_case(Command::PerftFull { depth: 2 } ; "perft full")]
    #[test_case(Command::Load { fen: "B:W1:B2".to_string() } ; "load")]
    #[test_case(Command::New { variant: Some("turkish".to_string()) } ; "new")]
    fn test_display_parses_back(command: Command) -> TestResult {
        assert_eq!(Command::from_str(&command.to_string())?, command);
        Ok(())
    }
}
