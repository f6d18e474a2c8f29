use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Piece, PieceKind, Side};
use crate::position::{DrawRules, Position, PositionError, State};
use crate::square::{Square, SquareError};
use crate::variant::Variant;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FenViolation {
    #[error("position is empty")]
    Empty,

    #[error("num fields: want at least 2 got {0}")]
    NumFields(usize),

    #[error("side to move: want 'W'|'B' got {0}")]
    SideToMove(String),

    #[error("unknown segment: got {0}")]
    UnknownSegment(String),

    #[error("square number: got {0}")]
    NotNumeric(String),

    #[error("square {0} out of range (1-{1})")]
    OutOfRange(u32, u16),

    #[error("square {0} is occupied more than once")]
    Duplicate(u32),

    #[error("king on square {0} has no side entry")]
    OrphanKing(u32),

    #[error("too many {0} pieces: {1} (max: {2})")]
    TooManyPieces(Side, usize, usize),

    #[error("draw counters: want <halfmove> <fullmove> got {0}")]
    Counters(String),

    #[error("halfmove clock: got {0}")]
    HalfmoveClock(String),

    #[error("fullmove number: want 1 <= x < 65_536 got {0}")]
    FullmoveNumber(String),
}

/// Every violation found in one position string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid position: {}", join_violations(.0))]
pub struct ValidationError(pub Vec<FenViolation>);

fn join_violations(violations: &[FenViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PositionStats {
    pub white_pieces: usize,
    pub black_pieces: usize,
    pub kings: usize,
    pub total_pieces: usize,
}

/// A position string that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFen {
    pub to_move: Side,
    pub white: Vec<Square>,
    pub black: Vec<Square>,
    pub kings: Vec<Square>,
    pub half_move_clock: Option<u16>,
    pub full_move_counter: Option<u16>,
    pub stats: PositionStats,
}

impl ParsedFen {
    pub fn board(&self, variant: &Variant) -> Result<Board, SquareError> {
        let mut board = Board::empty(variant);
        for (side, squares) in [(Side::White, &self.white), (Side::Black, &self.black)] {
            for &square in squares {
                let kind = if self.kings.contains(&square) {
                    PieceKind::King
                } else {
                    PieceKind::Man
                };
                board.set(square, Some(Piece { kind, side }))?;
            }
        }
        Ok(board)
    }
}

/// Checks `fen` against `variant`, collecting every violation.
///
/// Format: `<turn>:W<serials>:B<serials>[:K<serials>]`, optionally followed by
/// ` <halfmove> <fullmove>`. The side lists name every piece of that side and
/// `K` marks which of them are kings.
pub fn validate_fen(variant: &Variant, fen: &str) -> Result<ParsedFen, ValidationError> {
    let fen = fen.trim();
    if fen.is_empty() {
        return Err(ValidationError(vec![FenViolation::Empty]));
    }

    let mut violations = Vec::new();

    let mut words = fen.split_whitespace();
    let placement = words.next().unwrap_or_default();
    let counters: Vec<&str> = words.collect();
    let (half_move_clock, full_move_counter) = match counters.as_slice() {
        [] => (None, None),
        [half, full] => {
            let half_move_clock = half.parse::<u16>().ok();
            if half_move_clock.is_none() {
                violations.push(FenViolation::HalfmoveClock(half.to_string()));
            }
            let full_move_counter = full.parse::<u16>().ok().filter(|&full| full >= 1);
            if full_move_counter.is_none() {
                violations.push(FenViolation::FullmoveNumber(full.to_string()));
            }
            (half_move_clock, full_move_counter)
        }
        _ => {
            violations.push(FenViolation::Counters(counters.join(" ")));
            (None, None)
        }
    };

    let tokens: Vec<&str> = placement.split(':').collect();
    if tokens.len() < 2 {
        violations.push(FenViolation::NumFields(tokens.len()));
        return Err(ValidationError(violations));
    }

    let to_move = match tokens[0] {
        "W" => Some(Side::White),
        "B" => Some(Side::Black),
        other => {
            violations.push(FenViolation::SideToMove(other.to_string()));
            None
        }
    };

    let board = Board::empty(variant);
    let mut occupied = HashSet::new();
    let mut crowned = HashSet::new();
    let mut white = Vec::new();
    let mut black = Vec::new();
    let mut kings = Vec::new();

    // An empty segment is what an empty board encodes to.
    for segment in tokens[1..].iter().filter(|segment| !segment.is_empty()) {
        let mut chars = segment.chars();
        let (target, seen) = match chars.next() {
            Some('W') => (&mut white, &mut occupied),
            Some('B') => (&mut black, &mut occupied),
            Some('K') => (&mut kings, &mut crowned),
            _ => {
                violations.push(FenViolation::UnknownSegment(segment.to_string()));
                continue;
            }
        };

        for entry in chars.as_str().split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Ok(serial) = entry.parse::<u32>() else {
                violations.push(FenViolation::NotNumeric(entry.to_string()));
                continue;
            };
            let Ok(square) = board.square_from_serial(serial) else {
                violations.push(FenViolation::OutOfRange(serial, board.num_squares()));
                continue;
            };
            if !seen.insert(serial) {
                violations.push(FenViolation::Duplicate(serial));
                continue;
            }
            target.push((serial, square));
        }
    }

    for &(serial, square) in &kings {
        let has_side = white.iter().chain(black.iter()).any(|&(_, sq)| sq == square);
        if !has_side {
            violations.push(FenViolation::OrphanKing(serial));
        }
    }

    let max_pieces = variant.max_pieces_per_side();
    for (side, squares) in [(Side::White, &white), (Side::Black, &black)] {
        if squares.len() > max_pieces {
            violations.push(FenViolation::TooManyPieces(side, squares.len(), max_pieces));
        }
    }

    match to_move {
        Some(to_move) if violations.is_empty() => {
            let squares = |list: Vec<(u32, Square)>| list.into_iter().map(|(_, sq)| sq).collect();
            let stats = PositionStats {
                white_pieces: white.len(),
                black_pieces: black.len(),
                kings: kings.len(),
                total_pieces: white.len() + black.len(),
            };
            Ok(ParsedFen {
                to_move,
                white: squares(white),
                black: squares(black),
                kings: squares(kings),
                half_move_clock,
                full_move_counter,
                stats,
            })
        }
        _ => Err(ValidationError(violations)),
    }
}

impl Position {
    pub fn from_fen(variant: &'static Variant, fen: &str) -> Result<Self, PositionError> {
        let parsed = validate_fen(variant, fen)?;
        Self::from_parsed(variant, &parsed, DrawRules::default())
    }

    fn from_parsed(
        variant: &'static Variant,
        parsed: &ParsedFen,
        draw_rules: DrawRules,
    ) -> Result<Self, PositionError> {
        let board = parsed.board(variant)?;
        let state = State {
            to_move: parsed.to_move,
            half_move_clock: parsed.half_move_clock.unwrap_or(0),
            full_move_counter: parsed.full_move_counter.unwrap_or(1),
        };
        Ok(Self::from_parts(variant, board, state, draw_rules))
    }

    /// Replaces the game with the position in `fen`. On error nothing changes.
    pub fn load_fen(&mut self, fen: &str) -> Result<PositionStats, PositionError> {
        let parsed = validate_fen(self.variant, fen).map_err(|err| {
            warn!("rejected position {:?}: {}", fen, err);
            err
        })?;
        *self = Self::from_parsed(self.variant, &parsed, self.draw_rules)?;
        Ok(parsed.stats)
    }

    pub fn to_fen(&self) -> String {
        let mut white = Vec::new();
        let mut black = Vec::new();
        let mut kings = Vec::new();

        for (idx, square) in self.board.squares().enumerate() {
            let serial = (idx + 1).to_string();
            if let Some(piece) = self.board.piece_at(square) {
                if piece.is_king() {
                    kings.push(serial.clone());
                }
                match piece.side {
                    Side::White => white.push(serial),
                    Side::Black => black.push(serial),
                }
            }
        }

        let segments: Vec<String> = [('W', white), ('B', black), ('K', kings)]
            .into_iter()
            .filter(|(_, serials)| !serials.is_empty())
            .map(|(tag, serials)| format!("{}{}", tag, serials.join(",")))
            .collect();

        format!("{}:{}", self.state.to_move.notation_char(), segments.join(":"))
    }

    /// `to_fen` followed by the halfmove clock and fullmove number.
    pub fn to_fen_with_clocks(&self) -> String {
        format!(
            "{} {} {}",
            self.to_fen(),
            self.state.half_move_clock,
            self.state.full_move_counter
        )
    }
}
