use std::collections::VecDeque;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::board::{Board, Piece, PieceKind, Side};
use crate::move_gen::{GenerateMoves, MoveGenOptions, MOVE_GEN};
use crate::notation::{self, MoveNotation, NotationError};
use crate::square::{Square, SquareError};
use crate::variant::{Variant, VariantError, VariantId};

mod draw;
mod fen;
mod zobrist_hash;

pub use self::draw::{DrawInfo, DrawRules};
pub use self::fen::{validate_fen, FenViolation, ParsedFen, PositionStats, ValidationError};
pub use self::zobrist_hash::ZobristHash;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid square: {0}")]
    InvalidSquare(#[from] SquareError),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("malformed move: {0}")]
    MalformedNotation(#[from] NotationError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("can't unmake move because there is no move to unmake")]
    NothingToUndo,

    #[error("{0}")]
    UnknownVariant(#[from] VariantError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct CapturedPiece {
    pub square: Square,
    pub piece: Piece,
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Move {
    pub src: Square,
    pub dest: Square,
    /// Jumped pieces, in the order they were jumped.
    pub captured: Vec<CapturedPiece>,
    /// Landing squares between `src` and `dest`.
    pub chain: Vec<Square>,
}

impl Move {
    pub fn new(src: Square, dest: Square) -> Move {
        Self {
            src,
            dest,
            captured: Vec::new(),
            chain: Vec::new(),
        }
    }

    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    pub fn num_captured(&self) -> usize {
        self.captured.len()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.src)?;
        for square in &self.chain {
            write!(f, " -> {}", square)?;
        }
        write!(f, " -> {}", self.dest)?;
        if self.is_capture() {
            write!(f, " (x{})", self.num_captured())?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct State {
    pub to_move: Side,
    /// Plies since the last capture or man move.
    pub half_move_clock: u16,
    pub full_move_counter: u16,
}

impl State {
    fn start() -> Self {
        Self {
            to_move: Side::White,
            half_move_clock: 0,
            full_move_counter: 1,
        }
    }
}

/// One executed move, with everything needed to take it back.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MoveRecord {
    pub side: Side,
    pub mve: Move,
    pub piece: Piece,
    pub promotion: bool,
    pub notation: String,
    pub draw_info: DrawInfo,
    prev_state: State,
    prev_hash: ZobristHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    DrawRepetition,
    DrawFiftyMoves,
    DrawInsufficientMaterial,
    Stalemate,
    Checkmate,
}

impl GameStatus {
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::DrawRepetition
                | GameStatus::DrawFiftyMoves
                | GameStatus::DrawInsufficientMaterial
        )
    }
}

#[derive(Clone)]
pub struct Position {
    pub state: State,
    pub(crate) board: Board,
    pub(crate) variant: &'static Variant,
    pub(crate) zobrist_hash: ZobristHash,
    history: Vec<MoveRecord>,
    position_history: VecDeque<ZobristHash>,
    draw_rules: DrawRules,
}

impl Position {
    pub fn start(variant: &'static Variant) -> Self {
        let board = Board::start(variant);
        Self::from_parts(variant, board, State::start(), DrawRules::default())
    }

    pub(crate) fn from_parts(
        variant: &'static Variant,
        board: Board,
        state: State,
        draw_rules: DrawRules,
    ) -> Self {
        let zobrist_hash = ZobristHash::calculate(&board, state.to_move);
        Self {
            state,
            board,
            variant,
            zobrist_hash,
            history: Vec::new(),
            position_history: VecDeque::from([zobrist_hash]),
            draw_rules,
        }
    }

    pub fn with_draw_rules(mut self, draw_rules: DrawRules) -> Self {
        self.draw_rules = draw_rules;
        self
    }

    /// Starting position of `variant`, dropping history and draw tracking.
    pub fn reset(&mut self, variant: &'static Variant) {
        *self = Self::start(variant).with_draw_rules(self.draw_rules);
    }

    pub fn reset_to(&mut self, variant_name: &str) -> Result<(), PositionError> {
        let variant = Variant::lookup(variant_name)?;
        self.reset(variant);
        Ok(())
    }

    /// Empty board of the current variant, White to move.
    pub fn clear(&mut self) {
        *self = Self::from_parts(
            self.variant,
            Board::empty(self.variant),
            State::start(),
            self.draw_rules,
        );
    }

    pub fn variant(&self) -> &'static Variant {
        self.variant
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn draw_rules(&self) -> DrawRules {
        self.draw_rules
    }

    pub fn position_key(&self) -> ZobristHash {
        self.zobrist_hash
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Notation of every move played so far.
    pub fn history(&self) -> Vec<String> {
        self.history.iter().map(|record| record.notation.clone()).collect()
    }

    pub fn is_piece_at(&self, square: Square) -> Result<Option<Piece>, PositionError> {
        Ok(self.board.get(square)?)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        MOVE_GEN.gen_moves(self, MoveGenOptions::default())
    }

    pub fn legal_moves_with(&self, options: MoveGenOptions) -> Vec<Move> {
        MOVE_GEN.gen_moves(self, options)
    }

    /// Legal moves starting on `square`. Empty when it holds no piece of the
    /// side to move.
    pub fn moves_for_piece(&self, square: Square) -> Result<Vec<Move>, PositionError> {
        match self.board.get(square)? {
            Some(piece) if piece.side == self.state.to_move => {
                Ok(MOVE_GEN.gen_piece_moves(self, square))
            }
            _ => Ok(Vec::new()),
        }
    }

    pub fn move_notation(&self, mve: &Move) -> Result<String, PositionError> {
        Ok(notation::move_to_notation(&self.board, mve)?)
    }

    pub fn make_move(&mut self, mve: &Move) -> Result<MoveRecord, PositionError> {
        if !self.legal_moves().contains(mve) {
            return Err(PositionError::IllegalMove(format!("{:?}", mve)));
        }
        self.execute(mve.clone())
    }

    /// Plays a move written as `32-28` or `26x37x48`. When no intermediate
    /// squares are given, the first legal move between the two squares is
    /// played.
    pub fn make_move_notation(&mut self, text: &str) -> Result<MoveRecord, PositionError> {
        let parsed: MoveNotation = text.parse()?;
        let mve = notation::resolve(&parsed, &self.board, &self.legal_moves())?
            .ok_or_else(|| PositionError::IllegalMove(text.to_string()))?;
        self.execute(mve)
    }

    /// Applies a move already known to be legal.
    pub(crate) fn execute(&mut self, mve: Move) -> Result<MoveRecord, PositionError> {
        let piece = self
            .board
            .piece_at(mve.src)
            .ok_or_else(|| PositionError::IllegalMove(format!("{:?}", mve)))?;
        let side = piece.side;
        let notation = self.move_notation(&mve)?;

        let prev_state = self.state.clone();
        let prev_hash = self.zobrist_hash;

        for cap in &mve.captured {
            self.board.set(cap.square, None)?;
            self.zobrist_hash.remove_piece(cap.square, cap.piece);
        }

        self.board.set(mve.src, None)?;
        self.zobrist_hash.remove_piece(mve.src, piece);

        // Only the final square counts, a man passing the far row mid-chain
        // stays a man.
        let promotion =
            piece.kind == PieceKind::Man && mve.dest.row() == self.variant.promotion_row(side);
        let placed = if promotion { Piece::king(side) } else { piece };
        self.board.set(mve.dest, Some(placed))?;
        self.zobrist_hash.add_piece(mve.dest, placed);

        if mve.is_capture() || piece.kind == PieceKind::Man {
            self.state.half_move_clock = 0;
        } else {
            self.state.half_move_clock = self.state.half_move_clock.saturating_add(1);
        }
        if side == Side::Black {
            self.state.full_move_counter = self.state.full_move_counter.saturating_add(1);
        }
        self.state.to_move = side.opposite_side();
        self.zobrist_hash.flip_side_to_move();

        self.position_history.push_back(self.zobrist_hash);
        while self.position_history.len() > self.draw_rules.history_window.max(1) {
            self.position_history.pop_front();
        }

        let record = MoveRecord {
            side,
            mve,
            piece,
            promotion,
            notation,
            draw_info: self.draw_info(),
            prev_state,
            prev_hash,
        };
        debug!("{} played {}", side, record.notation);

        self.history.push(record.clone());
        Ok(record)
    }

    pub fn unmake_move(&mut self) -> Result<MoveRecord, PositionError> {
        let record = self.history.pop().ok_or(PositionError::NothingToUndo)?;

        self.board.set(record.mve.dest, None)?;
        self.board.set(record.mve.src, Some(record.piece))?;
        for cap in &record.mve.captured {
            self.board.set(cap.square, Some(cap.piece))?;
        }

        self.state = record.prev_state.clone();
        self.zobrist_hash = record.prev_hash;

        self.position_history.pop_back();
        if self.position_history.is_empty() {
            self.position_history.push_back(self.zobrist_hash);
        }

        debug!("{} took back {}", record.side, record.notation);
        Ok(record)
    }

    pub fn status(&self) -> GameStatus {
        if self.is_draw_by_repetition() {
            return GameStatus::DrawRepetition;
        }
        if self.is_draw_by_fifty_move_rule() {
            return GameStatus::DrawFiftyMoves;
        }
        if self.is_draw_by_insufficient_material() {
            return GameStatus::DrawInsufficientMaterial;
        }

        if !self.legal_moves().is_empty() {
            return GameStatus::Playing;
        }

        let side = self.state.to_move;
        if self.board.side_count(side) == 0
            || MOVE_GEN.has_capture(self, side.opposite_side())
        {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status() != GameStatus::Playing
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start(Variant::get(VariantId::International))
    }
}

// History and draw tracking don't take part in equality.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.board == other.board
            && self.variant.id == other.variant.id
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.to_fen(), self.board)
    }
}
