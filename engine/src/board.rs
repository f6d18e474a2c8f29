use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::square::{Lattice, Square, SquareError};
use crate::variant::Variant;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite_side(self) -> Side {
        if self == Side::White {
            Side::Black
        } else {
            Side::White
        }
    }

    /// Letter used for this side in position notation.
    pub(crate) fn notation_char(self) -> char {
        match self {
            Side::White => 'W',
            Side::Black => 'B',
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum PieceKind {
    Man,
    King,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Deserialize, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub const fn man(side: Side) -> Self {
        Self {
            kind: PieceKind::Man,
            side,
        }
    }

    pub const fn king(side: Side) -> Self {
        Self {
            kind: PieceKind::King,
            side,
        }
    }

    pub const fn is_king(self) -> bool {
        matches!(self.kind, PieceKind::King)
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> char {
        match (piece.kind, piece.side) {
            (PieceKind::Man, Side::White) => 'O',
            (PieceKind::King, Side::White) => 'K',
            (PieceKind::Man, Side::Black) => 'o',
            (PieceKind::King, Side::Black) => 'k',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.kind)
    }
}

/// Square grid of a single variant. Pieces may only stand on the lattice.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Board {
    size: u8,
    lattice: Lattice,
    squares: Vec<Option<Piece>>,
}

impl Board {
    pub fn empty(variant: &Variant) -> Self {
        let size = variant.board_size;
        Self {
            size,
            lattice: variant.lattice(),
            squares: vec![None; size as usize * size as usize],
        }
    }

    pub fn start(variant: &Variant) -> Self {
        let mut board = Self::empty(variant);
        for side in Side::iter() {
            for row in variant.starting_rows(side) {
                for col in 0..board.size {
                    let square = Square::new(row, col);
                    if board.lattice.contains(square) {
                        let slot = board.slot(square);
                        board.squares[slot] = Some(Piece::man(side));
                    }
                }
            }
        }
        board
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    fn slot(&self, square: Square) -> usize {
        square.row() as usize * self.size as usize + square.col() as usize
    }

    fn in_bounds(&self, square: Square) -> bool {
        square.row() < self.size && square.col() < self.size
    }

    fn check_bounds(&self, square: Square) -> Result<(), SquareError> {
        if self.in_bounds(square) {
            Ok(())
        } else {
            Err(SquareError::OutOfBounds(
                square.row() as i16,
                square.col() as i16,
                self.size,
            ))
        }
    }

    pub fn is_playable(&self, square: Square) -> bool {
        self.in_bounds(square) && self.lattice.contains(square)
    }

    pub fn get(&self, square: Square) -> Result<Option<Piece>, SquareError> {
        self.check_bounds(square)?;
        Ok(self.squares[self.slot(square)])
    }

    /// Puts `piece` (or nothing) on `square`, returning what was there.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Result<Option<Piece>, SquareError> {
        self.check_bounds(square)?;
        if piece.is_some() && !self.lattice.contains(square) {
            return Err(SquareError::NotPlayable(square.row(), square.col()));
        }
        let slot = self.slot(square);
        Ok(std::mem::replace(&mut self.squares[slot], piece))
    }

    /// Piece on `square`, treating squares off the board as empty.
    pub(crate) fn piece_at(&self, square: Square) -> Option<Piece> {
        if self.in_bounds(square) {
            self.squares[self.slot(square)]
        } else {
            None
        }
    }

    pub fn square_from_serial(&self, serial: u32) -> Result<Square, SquareError> {
        self.lattice.square_from_serial(self.size, serial)
    }

    pub fn serial_from_square(&self, square: Square) -> Result<u16, SquareError> {
        self.lattice.serial_from_square(self.size, square)
    }

    pub fn square_from_algebraic(&self, name: &str) -> Result<Square, SquareError> {
        Square::from_algebraic(name, self.size)
    }

    pub fn algebraic(&self, square: Square) -> Result<String, SquareError> {
        self.check_bounds(square)?;
        Ok(square.to_algebraic(self.size))
    }

    pub fn num_squares(&self) -> u16 {
        self.lattice.num_squares(self.size)
    }

    /// Playable squares in serial order.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.size)
            .flat_map(move |row| (0..self.size).map(move |col| Square::new(row, col)))
            .filter(|&square| self.lattice.contains(square))
    }

    /// Occupied squares in serial order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares()
            .filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    pub fn count(&self, side: Side, kind: PieceKind) -> usize {
        self.pieces()
            .filter(|(_, piece)| piece.side == side && piece.kind == kind)
            .count()
    }

    pub fn side_count(&self, side: Side) -> usize {
        self.pieces().filter(|(_, piece)| piece.side == side).count()
    }

    pub fn total_count(&self) -> usize {
        self.pieces().count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let mut line = format!("{:>2} |", self.size - row);
            for col in 0..self.size {
                let square = Square::new(row, col);
                let ch = match self.piece_at(square) {
                    Some(piece) => piece.into(),
                    None if self.lattice.contains(square) => '.',
                    None => ' ',
                };
                line.push(' ');
                line.push(ch);
            }
            writeln!(f, "{}", line.trim_end())?;
        }

        write!(f, "    ")?;
        for col in 0..self.size {
            write!(f, " {}", (b'a' + col) as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
