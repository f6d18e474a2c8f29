use draughts::{DrawInfo, GameStatus, PositionStats, Variant};

#[derive(Debug)]
pub enum Response {
    NewGame { variant: &'static Variant },
    Variants { variants: Vec<&'static Variant> },
    Moves { moves: Vec<String> },
    Played {
        notation: String,
        promotion: bool,
        status: GameStatus,
    },
    Undone { notation: String },
    Fen { fen: String },
    Loaded { stats: PositionStats },
    Status { status: GameStatus },
    Draw { info: DrawInfo },
    Board { board: String },
    History { moves: Vec<String> },
    Cleared,
    Perft { report: String },
    Quit,
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Response::NewGame { variant } => write!(
                f,
                "new game: {} ({}x{})",
                variant.name, variant.board_size, variant.board_size
            ),
            Response::Variants { variants } => {
                let lines: Vec<String> = variants
                    .iter()
                    .map(|variant| {
                        format!(
                            "{:<14} {} ({}x{})",
                            variant.id.to_string(),
                            variant.name,
                            variant.board_size,
                            variant.board_size
                        )
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Response::Moves { moves } if moves.is_empty() => write!(f, "no moves"),
            Response::Moves { moves } => write!(f, "{}", moves.join(" ")),
            Response::Played {
                notation,
                promotion,
                status,
            } => {
                write!(f, "played {}", notation)?;
                if *promotion {
                    write!(f, " (promoted)")?;
                }
                if *status != GameStatus::Playing {
                    write!(f, "\nstatus: {}", status)?;
                }
                Ok(())
            }
            Response::Undone { notation } => write!(f, "undone {}", notation),
            Response::Fen { fen } => write!(f, "{}", fen),
            Response::Loaded { stats } => write!(
                f,
                "loaded: white {}, black {}, kings {}",
                stats.white_pieces, stats.black_pieces, stats.kings
            ),
            Response::Status { status } => write!(f, "status: {}", status),
            Response::Draw { info } => write!(
                f,
                "repetition: {}, fifty move rule: {}, insufficient material: {}",
                info.by_repetition, info.by_fifty_move_rule, info.by_insufficient_material
            ),
            Response::Board { board } => write!(f, "{}", board),
            Response::History { moves } if moves.is_empty() => write!(f, "no moves played"),
            Response::History { moves } => {
                let numbered: Vec<String> = moves
                    .iter()
                    .enumerate()
                    .map(|(ply, notation)| format!("{}. {}", ply + 1, notation))
                    .collect();
                write!(f, "{}", numbered.join("\n"))
            }
            Response::Cleared => write!(f, "board cleared"),
            Response::Perft { report } => write!(f, "{}", report),
            Response::Quit => write!(f, "bye"),
        }
    }
}

impl From<Response> for String {
    fn from(response: Response) -> Self {
        response.to_string()
    }
}
