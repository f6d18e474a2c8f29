use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::position::Move;
use crate::square::{Square, SquareError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("want <from>-<to> or <from>x<square>...x<to>, got {0:?}")]
    Malformed(String),

    #[error("square number: got {0:?} in {1:?}")]
    SquareNumber(String, String),
}

/// A move written with serial numbers, `32-28` or `28x19x10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveNotation {
    pub squares: Vec<u32>,
    pub capture: bool,
}

impl MoveNotation {
    pub fn src(&self) -> u32 {
        self.squares[0]
    }

    pub fn dest(&self) -> u32 {
        self.squares[self.squares.len() - 1]
    }

    /// Landing squares named between the first and the last.
    pub fn intermediates(&self) -> &[u32] {
        &self.squares[1..self.squares.len() - 1]
    }
}

impl FromStr for MoveNotation {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let capture = text.contains('x');
        let separator = if capture { 'x' } else { '-' };

        let parts: Vec<&str> = text.split(separator).collect();
        if parts.len() < 2 || (!capture && parts.len() != 2) {
            return Err(NotationError::Malformed(s.to_string()));
        }

        let squares = parts
            .iter()
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(NotationError::SquareNumber(part.to_string(), s.to_string()));
                }
                part.parse::<u32>()
                    .map_err(|_| NotationError::SquareNumber(part.to_string(), s.to_string()))
            })
            .collect::<Result<Vec<u32>, _>>()?;

        Ok(MoveNotation { squares, capture })
    }
}

impl fmt::Display for MoveNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.capture { "x" } else { "-" };
        let squares: Vec<String> = self.squares.iter().map(u32::to_string).collect();
        write!(f, "{}", squares.join(separator))
    }
}

/// Writes `mve` with the serial numbers of `board`: every landing square of
/// a capture chain is listed.
pub fn move_to_notation(board: &Board, mve: &Move) -> Result<String, SquareError> {
    let mut squares = Vec::with_capacity(mve.chain.len() + 2);
    squares.push(board.serial_from_square(mve.src)? as u32);
    for &square in &mve.chain {
        squares.push(board.serial_from_square(square)? as u32);
    }
    squares.push(board.serial_from_square(mve.dest)? as u32);

    Ok(MoveNotation {
        squares,
        capture: mve.is_capture(),
    }
    .to_string())
}

/// The legal move `notation` names, if any.
pub fn resolve(notation: &MoveNotation, board: &Board, legal: &[Move]) -> Result<Option<Move>, SquareError> {
    let src = board.square_from_serial(notation.src())?;
    let dest = board.square_from_serial(notation.dest())?;
    let intermediates = notation
        .intermediates()
        .iter()
        .map(|&serial| board.square_from_serial(serial))
        .collect::<Result<Vec<Square>, _>>()?;

    Ok(legal
        .iter()
        .find(|mve| {
            mve.src == src
                && mve.dest == dest
                && mve.is_capture() == notation.capture
                && (intermediates.is_empty() || mve.chain == intermediates)
        })
        .cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::variant::{Variant, VariantId};
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case("32-28", vec![32, 28], false ; "step")]
    #[test_case("28x19", vec![28, 19], true ; "single capture")]
    #[test_case("26x37x48", vec![26, 37, 48], true ; "chain")]
    #[test_case(" 1-6 ", vec![1, 6], false ; "padded")]
    fn test_parse(text: &str, squares: Vec<u32>, capture: bool) -> TestResult {
        let got: MoveNotation = text.parse()?;
        assert_eq!(got, MoveNotation { squares, capture });
        assert_eq!(got.to_string(), text.trim());
        Ok(())
    }

    #[test_case("" ; "empty")]
    #[test_case("32" ; "one square")]
    #[test_case("32-28-23" ; "chained step")]
    #[test_case("32-28x19" ; "mixed separators")]
    #[test_case("a3-b4" ; "algebraic")]
    #[test_case("32x" ; "dangling")]
    #[test_case("-1-5" ; "negative")]
    fn test_parse_invalid(text: &str) {
        assert!(text.parse::<MoveNotation>().is_err());
    }

    #[test]
    fn test_intermediates() -> TestResult {
        let got: MoveNotation = "26x37x48x39".parse()?;
        assert_eq!(got.src(), 26);
        assert_eq!(got.dest(), 39);
        assert_eq!(got.intermediates(), &[37, 48]);
        Ok(())
    }

    #[test]
    fn test_move_to_notation() -> TestResult {
        let position = Position::start(Variant::get(VariantId::International));
        let board = position.board();
        for mve in position.legal_moves() {
            let text = move_to_notation(board, &mve)?;
            let parsed: MoveNotation = text.parse()?;
            assert_eq!(resolve(&parsed, board, &position.legal_moves())?, Some(mve));
        }
        Ok(())
    }

    #[test]
    fn test_resolve_unknown_move() -> TestResult {
        let position = Position::start(Variant::get(VariantId::International));
        let parsed: MoveNotation = "32-23".parse()?;
        assert_eq!(resolve(&parsed, position.board(), &position.legal_moves())?, None);

        let parsed: MoveNotation = "99-23".parse()?;
        assert!(resolve(&parsed, position.board(), &position.legal_moves()).is_err());
        Ok(())
    }
}
