use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Largest board any variant uses (Brazilian/Canadian, 12x12).
pub const MAX_BOARD_SIZE: u8 = 12;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    #[error("square ({0}, {1}) is off a {2}x{2} board")]
    OutOfBounds(i16, i16, u8),

    #[error("square ({0}, {1}) is not a playable square")]
    NotPlayable(u8, u8),

    #[error("square number {0} out of range (1-{1})")]
    SerialOutOfRange(u32, u16),

    #[error("algebraic square: got {0}")]
    Algebraic(String),
}

/// A board coordinate. Row 0 is the top edge (Black's home row), column 0 the
/// left edge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    pub const fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// Slot of this square in a `MAX_BOARD_SIZE` x `MAX_BOARD_SIZE` table.
    pub(crate) const fn index(self) -> usize {
        self.row as usize * MAX_BOARD_SIZE as usize + self.col as usize
    }

    /// The square `steps` squares away in `dir`, or `None` once that leaves a
    /// `size` x `size` board.
    pub(crate) const fn offset(self, dir: Direction, steps: u8, size: u8) -> Option<Square> {
        let (dr, dc) = dir.delta();
        let row = self.row as i16 + dr as i16 * steps as i16;
        let col = self.col as i16 + dc as i16 * steps as i16;
        if row < 0 || col < 0 || row >= size as i16 || col >= size as i16 {
            None
        } else {
            Some(Square::new(row as u8, col as u8))
        }
    }

    /// Algebraic name, `a` for column 0 and rank 1 for the bottom row.
    pub(crate) fn to_algebraic(self, size: u8) -> String {
        let file = (b'a' + self.col) as char;
        format!("{}{}", file, size - self.row)
    }

    pub fn from_algebraic(name: &str, size: u8) -> Result<Square, SquareError> {
        let err = || SquareError::Algebraic(name.to_string());

        let mut chars = name.chars();
        let file = chars.next().ok_or_else(err)?.to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return Err(err());
        }
        let rank: i16 = chars.as_str().parse().map_err(|_| err())?;

        let col = file as i16 - 'a' as i16;
        let row = size as i16 - rank;
        if row < 0 || col < 0 || row >= size as i16 || col >= size as i16 {
            return Err(SquareError::OutOfBounds(row, col, size));
        }
        Ok(Square::new(row as u8, col as u8))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Which squares of the grid pieces may stand on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Lattice {
    /// Only dark squares, `(row + col)` odd.
    Dark,
    /// Every square, used by orthogonal-movement variants.
    Full,
}

impl Lattice {
    pub const fn contains(self, square: Square) -> bool {
        match self {
            Lattice::Dark => square.is_dark(),
            Lattice::Full => true,
        }
    }

    const fn squares_per_row(self, size: u8) -> u16 {
        match self {
            Lattice::Dark => size as u16 / 2,
            Lattice::Full => size as u16,
        }
    }

    pub const fn num_squares(self, size: u8) -> u16 {
        self.squares_per_row(size) * size as u16
    }

    /// 1-based serial number in the row-major scan of lattice squares.
    pub fn serial_from_square(self, size: u8, square: Square) -> Result<u16, SquareError> {
        if square.row >= size || square.col >= size {
            return Err(SquareError::OutOfBounds(
                square.row as i16,
                square.col as i16,
                size,
            ));
        }
        if !self.contains(square) {
            return Err(SquareError::NotPlayable(square.row, square.col));
        }

        let per_row = self.squares_per_row(size);
        let in_row = match self {
            // Dark squares sit on every other column, so halving the column
            // gives the position within the row for both row parities.
            Lattice::Dark => square.col as u16 / 2,
            Lattice::Full => square.col as u16,
        };
        Ok(square.row as u16 * per_row + in_row + 1)
    }

    pub fn square_from_serial(self, size: u8, serial: u32) -> Result<Square, SquareError> {
        let max = self.num_squares(size);
        if serial == 0 || serial > max as u32 {
            return Err(SquareError::SerialOutOfRange(serial, max));
        }

        let idx = (serial - 1) as u16;
        let per_row = self.squares_per_row(size);
        let row = (idx / per_row) as u8;
        let in_row = (idx % per_row) as u8;
        let col = match self {
            Lattice::Dark => in_row * 2 + if row % 2 == 0 { 1 } else { 0 },
            Lattice::Full => in_row,
        };
        Ok(Square::new(row, col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const DIAGONALS: [Direction; 4] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    pub const ORTHOGONALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// `(row, col)` step. North points at row 0.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (-1, 1),
            Direction::SouthWest => (1, -1),
            Direction::SouthEast => (1, 1),
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    pub const fn row_delta(self) -> i8 {
        self.delta().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test_case(Lattice::Dark, 8 ; "dark 8")]
    #[test_case(Lattice::Dark, 10 ; "dark 10")]
    #[test_case(Lattice::Dark, 12 ; "dark 12")]
    #[test_case(Lattice::Full, 8 ; "full 8")]
    fn test_serial_round_trip(lattice: Lattice, size: u8) -> TestResult {
        for serial in 1..=lattice.num_squares(size) {
            let square = lattice.square_from_serial(size, serial as u32)?;
            assert!(lattice.contains(square));
            assert_eq!(lattice.serial_from_square(size, square)?, serial);
        }
        Ok(())
    }

    #[test]
    fn test_serials_follow_row_major_scan() -> TestResult {
        let mut serial = 1;
        for row in 0..10 {
            for col in 0..10 {
                let square = Square::new(row, col);
                if square.is_dark() {
                    assert_eq!(Lattice::Dark.square_from_serial(10, serial)?, square);
                    serial += 1;
                }
            }
        }
        assert_eq!(serial, 51);
        Ok(())
    }

    #[test_case(10, 1, Square::new(0, 1) ; "first")]
    #[test_case(10, 5, Square::new(0, 9) ; "end of first row")]
    #[test_case(10, 6, Square::new(1, 0) ; "start of second row")]
    #[test_case(10, 28, Square::new(5, 4) ; "28")]
    #[test_case(10, 32, Square::new(6, 3) ; "32")]
    #[test_case(10, 46, Square::new(9, 0) ; "46")]
    #[test_case(8, 32, Square::new(7, 6) ; "last on 8x8")]
    fn test_square_from_serial(size: u8, serial: u32, want: Square) -> TestResult {
        assert_eq!(Lattice::Dark.square_from_serial(size, serial)?, want);
        Ok(())
    }

    #[test_case(0 ; "zero")]
    #[test_case(51 ; "past end")]
    fn test_square_from_serial_out_of_range(serial: u32) {
        let got = Lattice::Dark.square_from_serial(10, serial);
        assert_eq!(got, Err(SquareError::SerialOutOfRange(serial, 50)));
    }

    #[test]
    fn test_serial_from_square_errors() {
        assert_eq!(
            Lattice::Dark.serial_from_square(8, Square::new(8, 1)),
            Err(SquareError::OutOfBounds(8, 1, 8))
        );
        assert_eq!(
            Lattice::Dark.serial_from_square(8, Square::new(0, 0)),
            Err(SquareError::NotPlayable(0, 0))
        );
        assert_eq!(Lattice::Full.serial_from_square(8, Square::new(0, 0)), Ok(1));
    }

    #[test_case(Square::new(4, 4), Direction::NorthWest, 1, Some(Square::new(3, 3)) ; "nw")]
    #[test_case(Square::new(4, 4), Direction::SouthEast, 3, Some(Square::new(7, 7)) ; "se three")]
    #[test_case(Square::new(4, 4), Direction::SouthEast, 4, None ; "se off board")]
    #[test_case(Square::new(0, 3), Direction::North, 1, None ; "north off board")]
    #[test_case(Square::new(2, 0), Direction::West, 1, None ; "west off board")]
    #[test_case(Square::new(2, 0), Direction::East, 7, Some(Square::new(2, 7)) ; "east")]
    fn test_offset(square: Square, dir: Direction, steps: u8, want: Option<Square>) {
        assert_eq!(square.offset(dir, steps, 8), want);
    }

    #[test_case("a1", 8, Square::new(7, 0) ; "a1")]
    #[test_case("h8", 8, Square::new(0, 7) ; "h8")]
    #[test_case("b10", 10, Square::new(0, 1) ; "two digit rank")]
    fn test_algebraic(name: &str, size: u8, want: Square) -> TestResult {
        let got = Square::from_algebraic(name, size)?;
        assert_eq!(got, want);
        assert_eq!(got.to_algebraic(size), name);
        Ok(())
    }

    #[test_case("" ; "empty")]
    #[test_case("a" ; "no rank")]
    #[test_case("1a" ; "reversed")]
    #[test_case("i1" ; "file off board")]
    #[test_case("a9" ; "rank off board")]
    fn test_algebraic_invalid(name: &str) {
        assert!(Square::from_algebraic(name, 8).is_err());
    }
}
