mod captures;
mod steps;
mod traits;

use crate::board::{Board, Side};
use crate::position::{Move, Position};
use crate::square::Square;
use crate::variant::Variant;

pub use self::traits::GenerateMoves;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveGenOptions {
    /// Skip non-capturing moves.
    pub captures_only: bool,
}

#[derive(Clone, Copy)]
pub struct DraughtsMoveGen;

impl GenerateMoves for DraughtsMoveGen {
    fn gen_moves(&self, position: &Position, options: MoveGenOptions) -> Vec<Move> {
        gen_moves(position.board(), position.state.to_move, position.variant(), options)
    }

    fn gen_piece_moves(&self, position: &Position, square: Square) -> Vec<Move> {
        let mut moves = self.gen_moves(position, MoveGenOptions::default());
        moves.retain(|mve| mve.src == square);
        moves
    }

    fn has_capture(&self, position: &Position, side: Side) -> bool {
        let board = position.board();
        let variant = position.variant();
        board
            .pieces()
            .filter(|(_, piece)| piece.side == side)
            .any(|(square, piece)| !captures::gen_captures(board, square, piece, variant).is_empty())
    }
}

pub static MOVE_GEN: DraughtsMoveGen = DraughtsMoveGen {};

/// Legal moves of `side`, with mandatory and longest capture applied across
/// the whole board.
pub(crate) fn gen_moves(
    board: &Board,
    side: Side,
    variant: &Variant,
    options: MoveGenOptions,
) -> Vec<Move> {
    let own_pieces: Vec<_> = board.pieces().filter(|(_, piece)| piece.side == side).collect();

    let mut moves: Vec<Move> = own_pieces
        .iter()
        .flat_map(|&(square, piece)| captures::gen_captures(board, square, piece, variant))
        .collect();

    if !moves.is_empty() && variant.mandatory_capture {
        if variant.longest_capture {
            captures::keep_longest(&mut moves);
        }
        return moves;
    }

    if options.captures_only {
        return moves;
    }

    for &(square, piece) in &own_pieces {
        moves.extend(steps::gen_steps(board, square, piece, variant));
    }
    moves
}
