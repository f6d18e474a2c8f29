use crate::board::Side;
use crate::move_gen::MoveGenOptions;
use crate::position::{Move, Position};
use crate::square::Square;

pub trait GenerateMoves {
    fn gen_moves(&self, position: &Position, options: MoveGenOptions) -> Vec<Move>;
    fn gen_piece_moves(&self, position: &Position, square: Square) -> Vec<Move>;
    fn has_capture(&self, position: &Position, side: Side) -> bool;
}
