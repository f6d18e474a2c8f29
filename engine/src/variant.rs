use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::board::Side;
use crate::square::{Direction, Lattice};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("unknown variant: got {0}")]
    UnknownVariant(String),
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Deserialize,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VariantId {
    International,
    American,
    Russian,
    Spanish,
    Italian,
    Brazilian,
    Turkish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PromotionRank {
    /// The edge of the board facing the side's home rows.
    Opposite,
}

/// One rule-set. Every flag is consulted at exactly one decision point of
/// move generation.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub id: VariantId,
    pub name: &'static str,
    pub board_size: u8,
    pub flying_kings: bool,
    pub mandatory_capture: bool,
    pub capture_backwards: bool,
    pub longest_capture: bool,
    pub promotion_rank: PromotionRank,
    pub orthogonal_movement: bool,
    /// Cap on the landing squares a flying king may choose past a captured piece.
    pub king_capture_limit: Option<u8>,
}

pub static VARIANTS: [Variant; 7] = [
    Variant {
        id: VariantId::International,
        name: "International/Polish",
        board_size: 10,
        flying_kings: true,
        mandatory_capture: true,
        capture_backwards: true,
        longest_capture: true,
        promotion_rank: PromotionRank::Opposite,
        orthogonal_movement: false,
        king_capture_limit: None,
    },
    Variant {
        id: VariantId::American,
        name: "American/English",
        board_size: 8,
        flying_kings: false,
        mandatory_capture: true,
        capture_backwards: false,
        longest_capture: false,
        promotion_rank: PromotionRank::Opposite,
        orthogonal_movement: false,
        king_capture_limit: None,
    },
    Variant {
        id: VariantId::Russian,
        name: "Russian",
        board_size: 8,
        flying_kings: true,
        mandatory_capture: true,
        capture_backwards: true,
        longest_capture: true,
        promotion_rank: PromotionRank::Opposite,
        orthogonal_movement: false,
        king_capture_limit: None,
    },
    Variant {
        id: VariantId::Spanish,
        name: "Spanish",
        board_size: 8,
        flying_kings: true,
        mandatory_capture: true,
        capture_backwards: false,
        longest_capture: true,
        promotion_rank: PromotionRank::Opposite,
        orthogonal_movement: false,
        king_capture_limit: None,
    },
    Variant {
        id: VariantId::Italian,
        name: "Italian",
        board_size: 8,
        flying_kings: true,
        mandatory_capture: true,
        capture_backwards: false,
        longest_capture: true,
        promotion_rank: PromotionRank::Opposite,
        orthogonal_movement: false,
        king_capture_limit: Some(1),
    },
    Variant {
        id: VariantId::Brazilian,
        name: "Brazilian/Canadian",
        board_size: 12,
        flying_kings: true,
        mandatory_capture: true,
        capture_backwards: true,
        longest_capture: true,
        promotion_rank: PromotionRank::Opposite,
        orthogonal_movement: false,
        king_capture_limit: None,
    },
    Variant {
        id: VariantId::Turkish,
        name: "Turkish",
        board_size: 8,
        flying_kings: true,
        mandatory_capture: true,
        capture_backwards: true,
        longest_capture: false,
        promotion_rank: PromotionRank::Opposite,
        orthogonal_movement: true,
        king_capture_limit: None,
    },
];

impl Variant {
    pub fn get(id: VariantId) -> &'static Variant {
        // VARIANTS is laid out in declaration order of VariantId.
        &VARIANTS[id as usize]
    }

    pub fn lookup(name: &str) -> Result<&'static Variant, VariantError> {
        name.trim()
            .to_ascii_lowercase()
            .parse::<VariantId>()
            .map(Variant::get)
            .map_err(|_| VariantError::UnknownVariant(name.to_string()))
    }

    pub fn all() -> impl Iterator<Item = &'static Variant> {
        VariantId::iter().map(Variant::get)
    }

    pub const fn lattice(&self) -> Lattice {
        if self.orthogonal_movement {
            Lattice::Full
        } else {
            Lattice::Dark
        }
    }

    const fn forward(side: Side) -> i8 {
        match side {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    fn all_dirs(&self) -> &'static [Direction; 4] {
        if self.orthogonal_movement {
            &Direction::ORTHOGONALS
        } else {
            &Direction::DIAGONALS
        }
    }

    /// Non-capturing step directions of a man.
    pub fn man_step_dirs(&self, side: Side) -> Vec<Direction> {
        let forward = Self::forward(side);
        self.all_dirs()
            .iter()
            .copied()
            .filter(|dir| {
                if self.orthogonal_movement {
                    // Forward and sideways.
                    dir.row_delta() != -forward
                } else {
                    dir.row_delta() == forward
                }
            })
            .collect()
    }

    pub fn man_capture_dirs(&self, side: Side) -> Vec<Direction> {
        if self.capture_backwards {
            return self.all_dirs().to_vec();
        }
        let forward = Self::forward(side);
        self.all_dirs()
            .iter()
            .copied()
            .filter(|dir| {
                if self.orthogonal_movement {
                    dir.row_delta() != -forward
                } else {
                    dir.row_delta() == forward
                }
            })
            .collect()
    }

    pub fn king_dirs(&self) -> &'static [Direction; 4] {
        self.all_dirs()
    }

    /// How far a king may slide along one direction without capturing.
    pub const fn king_range(&self) -> u8 {
        if self.flying_kings {
            self.board_size
        } else {
            1
        }
    }

    /// How many landing squares past a captured piece a king may choose from.
    pub const fn king_landing_limit(&self) -> u8 {
        if !self.flying_kings {
            return 1;
        }
        match self.king_capture_limit {
            Some(limit) => limit,
            None => self.board_size,
        }
    }

    pub const fn promotion_row(&self, side: Side) -> u8 {
        match (self.promotion_rank, side) {
            (PromotionRank::Opposite, Side::White) => 0,
            (PromotionRank::Opposite, Side::Black) => self.board_size - 1,
        }
    }

    /// Rows holding `side`'s men in the starting position.
    pub fn starting_rows(&self, side: Side) -> std::ops::Range<u8> {
        let size = self.board_size;
        if self.orthogonal_movement {
            return match side {
                Side::Black => 1..3,
                Side::White => size - 3..size - 1,
            };
        }

        let rows = match size {
            8 => 3,
            10 | 12 => 4,
            _ => size / 2 - 1,
        };
        match side {
            Side::Black => 0..rows,
            Side::White => size - rows..size,
        }
    }

    /// Most pieces one side may have in a loaded position.
    pub const fn max_pieces_per_side(&self) -> usize {
        self.board_size as usize * self.board_size as usize / 4
    }
}
