use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Piece, Side};
use crate::square::{Square, MAX_BOARD_SIZE};

const RNG_SEED: u64 = 123456789;

const NUM_SQUARES: usize = MAX_BOARD_SIZE as usize * MAX_BOARD_SIZE as usize;

/// Man and king for each side.
const NUM_PIECE_KINDS: usize = 4;

struct RandomU64Generator {
    curr: u64,
}

impl RandomU64Generator {
    const fn new(seed: u64) -> Self {
        Self { curr: seed }
    }

    /// Standard Xorshift
    const fn generate(&mut self) -> u64 {
        let mut x = self.curr;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 5;
        self.curr = x;
        x
    }
}

struct ZobristRandomHashes {
    pieces: [u64; NUM_SQUARES * NUM_PIECE_KINDS],
    black_to_move: u64,
}

impl ZobristRandomHashes {
    const fn init() -> Self {
        let mut rng = RandomU64Generator::new(RNG_SEED);

        let mut pieces = [0; NUM_SQUARES * NUM_PIECE_KINDS];
        let mut i = 0;
        while i < NUM_SQUARES * NUM_PIECE_KINDS {
            pieces[i] = rng.generate();
            i += 1;
        }

        Self {
            pieces,
            black_to_move: rng.generate(),
        }
    }

    fn piece(&self, square: Square, piece: Piece) -> u64 {
        let piece_idx = piece.kind as usize + piece.side as usize * 2;
        self.pieces[square.index() * NUM_PIECE_KINDS + piece_idx]
    }
}

static ZOBRIST_RANDOM_HASHES: ZobristRandomHashes = ZobristRandomHashes::init();

/// Position key: every piece on its square plus the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ZobristHash(u64);

impl Display for ZobristHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl ZobristHash {
    pub fn calculate(board: &Board, to_move: Side) -> ZobristHash {
        let mut hash = 0;
        for (square, piece) in board.pieces() {
            hash ^= ZOBRIST_RANDOM_HASHES.piece(square, piece);
        }

        if to_move == Side::Black {
            hash ^= ZOBRIST_RANDOM_HASHES.black_to_move;
        }

        Self(hash)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn add_piece(&mut self, square: Square, piece: Piece) {
        self.0 ^= ZOBRIST_RANDOM_HASHES.piece(square, piece);
    }

    pub(crate) fn remove_piece(&mut self, square: Square, piece: Piece) {
        self.0 ^= ZOBRIST_RANDOM_HASHES.piece(square, piece);
    }

    pub(crate) fn flip_side_to_move(&mut self) {
        self.0 ^= ZOBRIST_RANDOM_HASHES.black_to_move;
    }
}
