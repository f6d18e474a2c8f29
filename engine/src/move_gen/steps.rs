use crate::board::{Board, Piece, PieceKind};
use crate::position::Move;
use crate::square::Square;
use crate::variant::Variant;

/// Non-capturing moves of the piece on `src`.
pub(crate) fn gen_steps(board: &Board, src: Square, piece: Piece, variant: &Variant) -> Vec<Move> {
    let size = board.size();
    let mut moves = Vec::new();

    match piece.kind {
        PieceKind::Man => {
            for dir in variant.man_step_dirs(piece.side) {
                if let Some(dest) = src.offset(dir, 1, size) {
                    if board.piece_at(dest).is_none() {
                        moves.push(Move::new(src, dest));
                    }
                }
            }
        }
        PieceKind::King => {
            for &dir in variant.king_dirs() {
                for step in 1..=variant.king_range() {
                    let Some(dest) = src.offset(dir, step, size) else {
                        break;
                    };
                    if board.piece_at(dest).is_some() {
                        break;
                    }
                    moves.push(Move::new(src, dest));
                }
            }
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;
    use crate::variant::VariantId;
    use test_case::test_case;
    use testresult::TestResult;

    fn dests(moves: &[Move]) -> Vec<Square> {
        let mut dests: Vec<Square> = moves.iter().map(|mve| mve.dest).collect();
        dests.sort();
        dests
    }

    #[test_case(Side::White, Square::new(5, 2), vec![Square::new(4, 1), Square::new(4, 3)] ; "white forward")]
    #[test_case(Side::Black, Square::new(2, 1), vec![Square::new(3, 0), Square::new(3, 2)] ; "black forward")]
    #[test_case(Side::White, Square::new(5, 0), vec![Square::new(4, 1)] ; "edge")]
    #[test_case(Side::White, Square::new(0, 1), vec![] ; "top row")]
    fn test_man_steps(side: Side, src: Square, want: Vec<Square>) -> TestResult {
        let variant = Variant::get(VariantId::American);
        let mut board = Board::empty(variant);
        board.set(src, Some(Piece::man(side)))?;

        let moves = gen_steps(&board, src, Piece::man(side), variant);
        assert_eq!(dests(&moves), want);
        assert!(moves.iter().all(|mve| !mve.is_capture()));
        Ok(())
    }

    #[test]
    fn test_man_steps_blocked() -> TestResult {
        let variant = Variant::get(VariantId::American);
        let mut board = Board::empty(variant);
        let src = Square::new(5, 2);
        board.set(src, Some(Piece::man(Side::White)))?;
        board.set(Square::new(4, 1), Some(Piece::man(Side::White)))?;
        board.set(Square::new(4, 3), Some(Piece::man(Side::Black)))?;

        assert!(gen_steps(&board, src, Piece::man(Side::White), variant).is_empty());
        Ok(())
    }

    #[test]
    fn test_turkish_man_moves_sideways() -> TestResult {
        let variant = Variant::get(VariantId::Turkish);
        let mut board = Board::empty(variant);
        let src = Square::new(4, 4);
        board.set(src, Some(Piece::man(Side::White)))?;

        let moves = gen_steps(&board, src, Piece::man(Side::White), variant);
        assert_eq!(
            dests(&moves),
            vec![Square::new(3, 4), Square::new(4, 3), Square::new(4, 5)]
        );
        Ok(())
    }

    #[test_case(VariantId::American, 4 ; "short king")]
    #[test_case(VariantId::International, 17 ; "flying king")]
    fn test_king_steps(id: VariantId, want: usize) -> TestResult {
        let variant = Variant::get(id);
        let mut board = Board::empty(variant);
        let src = Square::new(4, 5);
        board.set(src, Some(Piece::king(Side::White)))?;

        let moves = gen_steps(&board, src, Piece::king(Side::White), variant);
        assert_eq!(moves.len(), want);
        Ok(())
    }

    #[test]
    fn test_flying_king_stops_before_piece() -> TestResult {
        let variant = Variant::get(VariantId::Russian);
        let mut board = Board::empty(variant);
        let src = Square::new(7, 0);
        board.set(src, Some(Piece::king(Side::White)))?;
        board.set(Square::new(4, 3), Some(Piece::man(Side::Black)))?;

        let moves = gen_steps(&board, src, Piece::king(Side::White), variant);
        assert_eq!(dests(&moves), vec![Square::new(5, 2), Square::new(6, 1)]);
        Ok(())
    }
}
