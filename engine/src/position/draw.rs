use serde::{Deserialize, Serialize};

use crate::board::{PieceKind, Side};
use crate::position::Position;

/// Thresholds used by the draw predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DrawRules {
    /// Occurrences of a position, the current one included, that end the game.
    pub repetition_threshold: usize,
    /// Plies without a capture or man move that end the game.
    pub fifty_move_limit: u16,
    /// Most position keys kept for repetition checks.
    pub history_window: usize,
}

impl Default for DrawRules {
    fn default() -> Self {
        Self {
            repetition_threshold: 3,
            fifty_move_limit: 50,
            history_window: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DrawInfo {
    pub by_repetition: bool,
    pub by_fifty_move_rule: bool,
    pub by_insufficient_material: bool,
    pub is_draw: bool,
}

impl Position {
    pub fn is_draw_by_repetition(&self) -> bool {
        self.is_draw_by_repetition_with(self.draw_rules.repetition_threshold)
    }

    pub fn is_draw_by_repetition_with(&self, threshold: usize) -> bool {
        if threshold == 0 || self.position_history.len() < threshold {
            return false;
        }
        let occurrences = self
            .position_history
            .iter()
            .filter(|&&key| key == self.zobrist_hash)
            .count();
        occurrences >= threshold
    }

    pub fn is_draw_by_fifty_move_rule(&self) -> bool {
        self.is_draw_by_fifty_move_rule_with(self.draw_rules.fifty_move_limit)
    }

    pub fn is_draw_by_fifty_move_rule_with(&self, limit: u16) -> bool {
        self.state.half_move_clock >= limit
    }

    /// A lone king against a lone king, or a lone king against nothing.
    pub fn is_draw_by_insufficient_material(&self) -> bool {
        let board = &self.board;
        if board.total_count() > 2 {
            return false;
        }

        let lone_king = |side: Side| {
            board.side_count(side) == 1 && board.count(side, PieceKind::King) == 1
        };
        let white_king = lone_king(Side::White);
        let black_king = lone_king(Side::Black);

        (white_king && black_king)
            || (white_king && board.side_count(Side::Black) == 0)
            || (black_king && board.side_count(Side::White) == 0)
    }

    pub fn is_draw(&self) -> bool {
        self.is_draw_by_repetition()
            || self.is_draw_by_fifty_move_rule()
            || self.is_draw_by_insufficient_material()
    }

    pub fn draw_info(&self) -> DrawInfo {
        let by_repetition = self.is_draw_by_repetition();
        let by_fifty_move_rule = self.is_draw_by_fifty_move_rule();
        let by_insufficient_material = self.is_draw_by_insufficient_material();
        DrawInfo {
            by_repetition,
            by_fifty_move_rule,
            by_insufficient_material,
            is_draw: by_repetition || by_fifty_move_rule || by_insufficient_material,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::GameStatus;
    use crate::variant::{Variant, VariantId};
    use test_case::test_case;
    use testresult::TestResult;

    fn load(fen: &str) -> Result<Position, crate::position::PositionError> {
        Position::from_fen(Variant::get(VariantId::International), fen)
    }

    #[test_case("W:W46:B5:K46,5", true ; "king each")]
    #[test_case("W:W46:K46", true ; "lone king")]
    #[test_case("W:W46:B5:K46", false ; "king against man")]
    #[test_case("W:W46,47:B5:K46,47,5", false ; "two kings against one")]
    #[test_case("W:W46:B5", false ; "men only")]
    fn test_insufficient_material(fen: &str, want: bool) -> TestResult {
        let position = load(fen)?;
        assert_eq!(position.is_draw_by_insufficient_material(), want);
        Ok(())
    }

    #[test]
    fn test_fifty_move_rule() -> TestResult {
        let position = load("W:W50,31:B1,20:K50,1 49 30")?;
        assert!(!position.is_draw_by_fifty_move_rule());
        assert!(position.is_draw_by_fifty_move_rule_with(40));

        let mut position = position;
        position.make_move_notation("50-44")?;
        assert!(position.is_draw_by_fifty_move_rule());
        assert_eq!(position.status(), GameStatus::DrawFiftyMoves);
        assert!(position.records()[0].draw_info.by_fifty_move_rule);
        assert!(position.records()[0].draw_info.is_draw);
        Ok(())
    }

    #[test]
    fn test_repetition() -> TestResult {
        let mut position = load("W:W50,31:B1,20:K50,1")?;
        for _ in 0..2 {
            assert!(!position.is_draw_by_repetition());
            position.make_move_notation("50-44")?;
            position.make_move_notation("1-7")?;
            position.make_move_notation("44-50")?;
            position.make_move_notation("7-1")?;
        }
        assert!(position.is_draw_by_repetition());
        assert!(!position.is_draw_by_repetition_with(4));
        assert_eq!(position.status(), GameStatus::DrawRepetition);
        Ok(())
    }

    #[test]
    fn test_repetition_needs_same_side_to_move() -> TestResult {
        let position = load("W:W50,31:B1,20:K50,1")?;
        let flipped = load("B:W50,31:B1,20:K50,1")?;
        assert_ne!(position.position_key(), flipped.position_key());
        Ok(())
    }

    #[test]
    fn test_history_window() -> TestResult {
        let rules = DrawRules {
            history_window: 4,
            ..DrawRules::default()
        };
        let mut position = load("W:W50,31:B1,20:K50,1")?.with_draw_rules(rules);
        for _ in 0..2 {
            position.make_move_notation("50-44")?;
            position.make_move_notation("1-7")?;
            position.make_move_notation("44-50")?;
            position.make_move_notation("7-1")?;
        }
        // Only the last four keys are kept, so the start position is seen once.
        assert!(!position.is_draw_by_repetition());
        assert!(position.is_draw_by_repetition_with(1));
        Ok(())
    }

    #[test]
    fn test_undo_restores_repetition_count() -> TestResult {
        let mut position = load("W:W50,31:B1,20:K50,1")?;
        for _ in 0..2 {
            position.make_move_notation("50-44")?;
            position.make_move_notation("1-7")?;
            position.make_move_notation("44-50")?;
            position.make_move_notation("7-1")?;
        }
        assert!(position.is_draw());
        position.unmake_move()?;
        assert!(!position.is_draw_by_repetition());
        Ok(())
    }
}
