use log::trace;

use crate::board::{Board, Piece, PieceKind};
use crate::position::{CapturedPiece, Move};
use crate::square::{Direction, Square};
use crate::variant::Variant;

/// Depth first search over capture chains of a single piece.
///
/// The board is never mutated. The moving piece counts as lifted off `src`,
/// and jumped pieces stay where they are: they still block, but can't be
/// jumped a second time.
struct CaptureSearch<'a> {
    board: &'a Board,
    variant: &'a Variant,
    src: Square,
    piece: Piece,
    captured: Vec<CapturedPiece>,
    landings: Vec<Square>,
}

impl<'a> CaptureSearch<'a> {
    fn new(board: &'a Board, variant: &'a Variant, src: Square, piece: Piece) -> Self {
        Self {
            board,
            variant,
            src,
            piece,
            captured: Vec::new(),
            landings: Vec::new(),
        }
    }

    fn is_empty(&self, square: Square) -> bool {
        square == self.src || self.board.piece_at(square).is_none()
    }

    fn is_visited(&self, square: Square) -> bool {
        square == self.src || self.landings.contains(&square)
    }

    fn is_captured(&self, square: Square) -> bool {
        self.captured.iter().any(|cap| cap.square == square)
    }

    /// An enemy piece on `square` that this chain hasn't taken yet.
    fn capturable(&self, square: Square) -> Option<Piece> {
        if square == self.src || self.is_captured(square) {
            return None;
        }
        self.board
            .piece_at(square)
            .filter(|piece| piece.side != self.piece.side)
    }

    fn current_move(&self) -> Option<Move> {
        let (&dest, chain) = self.landings.split_last()?;
        Some(Move {
            src: self.src,
            dest,
            captured: self.captured.clone(),
            chain: chain.to_vec(),
        })
    }

    /// The enemy a jump from `from` along `dir` would take, with every square
    /// the piece could land on afterwards.
    fn jump(&self, from: Square, dir: Direction) -> Option<(CapturedPiece, Vec<Square>)> {
        let size = self.board.size();

        let (reach, landing_limit) = match self.piece.kind {
            PieceKind::Man => (1, 1),
            PieceKind::King => (self.variant.king_range(), self.variant.king_landing_limit()),
        };

        let mut target = None;
        for step in 1..=reach {
            let square = from.offset(dir, step, size)?;
            if self.is_empty(square) {
                continue;
            }
            let piece = self.capturable(square)?;
            target = Some(CapturedPiece { square, piece });
            break;
        }
        let target = target?;

        let mut landings = Vec::new();
        for step in 1..=landing_limit {
            let Some(square) = target.square.offset(dir, step, size) else {
                break;
            };
            if !self.is_empty(square) {
                break;
            }
            if !self.is_visited(square) {
                landings.push(square);
            }
        }

        if landings.is_empty() {
            None
        } else {
            Some((target, landings))
        }
    }

    /// Every finished chain that extends the current one from `from`.
    fn search(&mut self, from: Square) -> Vec<Move> {
        let dirs = match self.piece.kind {
            PieceKind::Man => self.variant.man_capture_dirs(self.piece.side),
            PieceKind::King => self.variant.king_dirs().to_vec(),
        };

        let mut found = Vec::new();
        for dir in dirs {
            let Some((target, landings)) = self.jump(from, dir) else {
                continue;
            };

            for landing in landings {
                self.captured.push(target);
                self.landings.push(landing);

                let further = self.search(landing);
                if further.is_empty() {
                    found.extend(self.current_move());
                } else {
                    found.extend(further);
                }

                self.landings.pop();
                self.captured.pop();
            }
        }

        if self.variant.longest_capture {
            keep_longest(&mut found);
        }
        found
    }
}

pub(crate) fn keep_longest(moves: &mut Vec<Move>) {
    let longest = moves.iter().map(Move::num_captured).max().unwrap_or(0);
    moves.retain(|mve| mve.num_captured() == longest);
}

/// Every maximal capture chain of the piece on `src`. Empty when it can't
/// capture.
pub(crate) fn gen_captures(board: &Board, src: Square, piece: Piece, variant: &Variant) -> Vec<Move> {
    let mut search = CaptureSearch::new(board, variant, src, piece);
    let moves = search.search(src);
    if !moves.is_empty() {
        trace!("{} capture chains for {} on {}", moves.len(), piece, src);
    }
    moves
}
