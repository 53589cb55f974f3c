use crate::engine::Evaluator;
use crate::logic::board::{Board, Color};

/// Plain material count, always expressed from the perspective of the side
/// to move. The board keeps the per-color tallies incrementally, so this is
/// a subtraction, not a scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let diff = board.material(Color::Black) - board.material(Color::Yellow);
        match board.side_to_move {
            Color::Black => diff,
            Color::Yellow => -diff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_follows_the_side_to_move() {
        // Black king against a yellow man: +40 for Black, -40 for Yellow.
        let board = Board::from_text("B7/8/8/8/8/8/8/7y b").unwrap();
        assert_eq!(MaterialEvaluator::new().evaluate(&board), 40);

        let board = Board::from_text("B7/8/8/8/8/8/8/7y").unwrap();
        assert_eq!(MaterialEvaluator::new().evaluate(&board), -40);
    }

    #[test]
    fn balanced_start_is_zero() {
        let board = Board::new();
        assert_eq!(MaterialEvaluator::new().evaluate(&board), 0);
    }
}
