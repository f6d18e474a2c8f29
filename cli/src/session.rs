use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use draughts::{
    GenerateMoves, MoveGenOptions, Position, Variant, perft, perft_divide, perft_full,
};

use crate::messages::{Command, Response};

/// One game driven by text commands.
pub struct Session<G>
where
    G: GenerateMoves,
{
    move_gen: G,
    position: Position,
}

impl<G> Session<G>
where
    G: GenerateMoves,
{
    pub fn new(move_gen: G, position: Position) -> Self {
        Self { move_gen, position }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn handle_command(&mut self, line: &str) -> Result<Response> {
        let command = Command::from_str(line)?;
        debug!("> {}", command);
        self.handle(command)
    }

    fn handle(&mut self, command: Command) -> Result<Response> {
        let position = &mut self.position;
        match command {
            Command::New { variant } => {
                match variant {
                    Some(name) => position.reset_to(&name)?,
                    None => position.reset(position.variant()),
                }
                Ok(Response::NewGame {
                    variant: position.variant(),
                })
            }
            Command::Variants => Ok(Response::Variants {
                variants: Variant::all().collect(),
            }),
            Command::Moves {
                square,
                captures_only,
            } => {
                let moves = match square {
                    Some(serial) => {
                        let square = position.board().square_from_serial(serial)?;
                        position.moves_for_piece(square)?
                    }
                    None => position.legal_moves_with(MoveGenOptions { captures_only }),
                };
                let moves = moves
                    .iter()
                    .map(|mve| position.move_notation(mve))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Response::Moves { moves })
            }
            Command::Move { notation } => {
                let record = position
                    .make_move_notation(&notation)
                    .with_context(|| format!("Couldn't play `{}`", notation))?;
                Ok(Response::Played {
                    notation: record.notation,
                    promotion: record.promotion,
                    status: position.status(),
                })
            }
            Command::Undo => {
                let record = position.unmake_move()?;
                Ok(Response::Undone {
                    notation: record.notation,
                })
            }
            Command::Fen { clocks } => {
                let fen = if clocks {
                    position.to_fen_with_clocks()
                } else {
                    position.to_fen()
                };
                Ok(Response::Fen { fen })
            }
            Command::Load { fen } => {
                let stats = position
                    .load_fen(&fen)
                    .with_context(|| format!("Couldn't load `{}`", fen))?;
                Ok(Response::Loaded { stats })
            }
            Command::Status => Ok(Response::Status {
                status: position.status(),
            }),
            Command::Draw => Ok(Response::Draw {
                info: position.draw_info(),
            }),
            Command::Board => Ok(Response::Board {
                board: position.to_string(),
            }),
            Command::History => Ok(Response::History {
                moves: position.history(),
            }),
            Command::Clear => {
                position.clear();
                Ok(Response::Cleared)
            }
            Command::Perft { depth } => {
                let start = Instant::now();
                let nodes = perft(position, &self.move_gen, depth)?;
                let report = nodes_report(nodes, start);
                Ok(Response::Perft { report })
            }
            Command::PerftDivide { depth } => {
                let start = Instant::now();
                let (move_counts, nodes) = perft_divide(position, &self.move_gen, depth)?;

                let mut move_counts: Vec<_> = move_counts.into_iter().collect();
                move_counts.sort();
                let mut lines: Vec<String> = move_counts
                    .iter()
                    .map(|(notation, count)| format!("{}: {}", notation, count))
                    .collect();
                lines.push(String::new());
                lines.push(nodes_report(nodes, start));
                Ok(Response::Perft {
                    report: lines.join("\n"),
                })
            }
            Command::PerftFull { depth } => {
                let perft_results = perft_full(position, &self.move_gen, depth)?;
                Ok(Response::Perft {
                    report: perft_results.to_string(),
                })
            }
            Command::Quit => {
                debug!("Exiting with position fen: {}", position.to_fen());
                Ok(Response::Quit)
            }
        }
    }
}

fn nodes_report(nodes: u64, start: Instant) -> String {
    let time_elapsed = start.elapsed();
    let nodes_per_second = nodes as f64 / time_elapsed.as_secs_f64();
    format!(
        "Nodes searched: {}\nTime (ms): {}\nNodes/second: {:.0}",
        nodes,
        time_elapsed.as_millis(),
        nodes_per_second
    )
}
