use std::{
    collections::HashMap,
    fmt::Display,
    time::{Duration, Instant},
};

use tabled::{Table, Tabled};

use crate::move_gen::{GenerateMoves, MoveGenOptions};
use crate::position::{Position, PositionError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub tot: u64,
    pub captures: u64,
    pub multi_captures: u64,
    pub promotions: u64,
    pub game_overs: u64,
}

pub struct PerftResult {
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl PerftDepthResult {
    pub fn new(tot: u64, captures: u64, multi_captures: u64, promotions: u64, game_overs: u64) -> Self {
        PerftDepthResult {
            tot,
            captures,
            multi_captures,
            promotions,
            game_overs,
        }
    }

    pub fn empty() -> PerftDepthResult {
        PerftDepthResult::new(0, 0, 0, 0, 0)
    }
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {}", self.nodes_per_second)?;
        writeln!(f, "{}", Table::new(&self.depth_results))?;
        Ok(())
    }
}

/// Number of leaf positions `depth` plies below `position`.
pub fn perft(
    position: &Position,
    move_gen: &impl GenerateMoves,
    depth: usize,
) -> Result<u64, PositionError> {
    let mut position = position.clone();
    count_nodes(&mut position, move_gen, depth)
}

/// Leaf count below each root move, keyed by the move's notation.
pub fn perft_divide(
    position: &Position,
    move_gen: &impl GenerateMoves,
    depth: usize,
) -> Result<(HashMap<String, u64>, u64), PositionError> {
    let mut position = position.clone();
    let mut divided = HashMap::new();
    if depth == 0 {
        return Ok((divided, 1));
    }

    let mut tot = 0;
    for mve in move_gen.gen_moves(&position, MoveGenOptions::default()) {
        let record = position.execute(mve)?;
        let nodes = count_nodes(&mut position, move_gen, depth - 1)?;
        position.unmake_move()?;

        tot += nodes;
        *divided.entry(record.notation).or_insert(0) += nodes;
    }
    Ok((divided, tot))
}

fn count_nodes(
    position: &mut Position,
    move_gen: &impl GenerateMoves,
    depth: usize,
) -> Result<u64, PositionError> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = move_gen.gen_moves(position, MoveGenOptions::default());
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0;
    for mve in moves {
        position.execute(mve)?;
        nodes += count_nodes(position, move_gen, depth - 1)?;
        position.unmake_move()?;
    }
    Ok(nodes)
}

/// Walks the move tree to `depth`, breaking down every ply.
pub fn perft_full(
    position: &Position,
    move_gen: &impl GenerateMoves,
    depth: usize,
) -> Result<PerftResult, PositionError> {
    let mut depth_results = vec![PerftDepthResult::empty(); depth];
    let mut position = position.clone();

    let start = Instant::now();

    perft_helper(&mut depth_results, &mut position, move_gen, depth, 0)?;

    let time_elapsed = start.elapsed();

    let tot_nodes = depth_results.iter().fold(0, |tot, curr| tot + curr.tot);

    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64();

    Ok(PerftResult {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    })
}

fn perft_helper(
    depth_results: &mut [PerftDepthResult],
    position: &mut Position,
    move_gen: &impl GenerateMoves,
    max_depth: usize,
    curr_depth: usize,
) -> Result<(), PositionError> {
    // Moves are generated before the depth check so leaves with no moves are
    // counted against the ply that reached them.
    let moves = move_gen.gen_moves(position, MoveGenOptions::default());

    if moves.is_empty() {
        if let Some(prev_res) = curr_depth
            .checked_sub(1)
            .and_then(|prev| depth_results.get_mut(prev))
        {
            prev_res.game_overs += 1;
        }
        return Ok(());
    }

    if curr_depth == max_depth {
        return Ok(());
    }

    let captures = moves.iter().filter(|mve| mve.is_capture()).count() as u64;
    let multi_captures = moves.iter().filter(|mve| mve.num_captured() > 1).count() as u64;

    let mut promotions = 0;
    for mve in moves.iter().cloned() {
        let record = position.execute(mve)?;
        if record.promotion {
            promotions += 1;
        }

        perft_helper(depth_results, position, move_gen, max_depth, curr_depth + 1)?;

        position.unmake_move()?;
    }

    let curr_res = &mut depth_results[curr_depth];
    curr_res.tot += moves.len() as u64;
    curr_res.captures += captures;
    curr_res.multi_captures += multi_captures;
    curr_res.promotions += promotions;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;
    use crate::move_gen::MOVE_GEN;
    use crate::position::Move;
    use crate::square::Square;
    use crate::variant::{Variant, VariantId};
    use test_case::test_case;
    use testresult::TestResult;

    struct MoveGenStub {
        moves: Vec<Move>,
    }

    impl GenerateMoves for MoveGenStub {
        fn gen_moves(&self, _position: &Position, _options: MoveGenOptions) -> Vec<Move> {
            self.moves.clone()
        }

        fn gen_piece_moves(&self, _position: &Position, square: Square) -> Vec<Move> {
            self.moves.iter().filter(|mve| mve.src == square).cloned().collect()
        }

        fn has_capture(&self, _position: &Position, _side: Side) -> bool {
            self.moves.iter().any(Move::is_capture)
        }
    }

    fn international(fen: &str) -> Result<Position, PositionError> {
        Position::from_fen(Variant::get(VariantId::International), fen)
    }

    #[test]
    fn test_uses_given_move_gen() -> TestResult {
        let position = Position::start(Variant::get(VariantId::International));
        let move_gen = MoveGenStub {
            moves: vec![Move::new(Square::new(6, 3), Square::new(5, 4))],
        };

        assert_eq!(perft(&position, &move_gen, 1)?, 1);
        let res = perft_full(&position, &move_gen, 1)?;
        assert_eq!(res.depth_results, vec![PerftDepthResult::new(1, 0, 0, 0, 0)]);
        Ok(())
    }

    #[test]
    fn test_count_promotions() -> TestResult {
        let position = international("W:W7:B20")?;

        let res = perft_full(&position, &MOVE_GEN, 2)?;
        assert_eq!(
            res.depth_results,
            vec![
                PerftDepthResult::new(2, 0, 0, 2, 0),
                PerftDepthResult::new(4, 0, 0, 0, 0),
            ]
        );
        assert_eq!(res.tot_nodes, 6);
        Ok(())
    }

    #[test]
    fn test_count_multi_captures() -> TestResult {
        let position = international("W:W28:B23,13")?;

        let res = perft_full(&position, &MOVE_GEN, 1)?;
        assert_eq!(res.depth_results, vec![PerftDepthResult::new(1, 1, 1, 0, 1)]);
        Ok(())
    }

    #[test_case(0, 1 ; "depth 0")]
    #[test_case(1, 9 ; "depth 1")]
    #[test_case(2, 81 ; "depth 2")]
    fn test_perft_start(depth: usize, want: u64) -> TestResult {
        let position = Position::start(Variant::get(VariantId::International));
        assert_eq!(perft(&position, &MOVE_GEN, depth)?, want);
        Ok(())
    }

    #[test]
    fn test_perft_divide() -> TestResult {
        let position = Position::start(Variant::get(VariantId::American));
        let (divided, tot) = perft_divide(&position, &MOVE_GEN, 2)?;

        assert_eq!(tot, 49);
        assert_eq!(divided.len(), 7);
        assert!(divided.values().all(|&nodes| nodes == 7));
        assert_eq!(divided.get("22-18"), Some(&7));
        Ok(())
    }

    #[test]
    fn test_perft_leaves_position_untouched() -> TestResult {
        let position = Position::start(Variant::get(VariantId::American));
        let before = position.clone();
        perft_full(&position, &MOVE_GEN, 3)?;
        assert_eq!(position, before);
        assert_eq!(position.position_key(), before.position_key());
        Ok(())
    }
}
