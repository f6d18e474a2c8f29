pub mod board;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod position;
pub mod square;
pub mod variant;

pub use board::{Board, Piece, PieceKind, Side};
pub use position::{GameStatus, Move, MoveRecord, Position, PositionError};
pub use square::{Lattice, Square};
pub use variant::{Variant, VariantId};
pub use move_gen::{DraughtsMoveGen, GenerateMoves, MoveGenOptions, MOVE_GEN};
pub use perft::{perft, perft_divide, perft_full, PerftDepthResult, PerftResult};
pub use position::{validate_fen, DrawInfo, DrawRules, PositionStats, ValidationError, ZobristHash};
