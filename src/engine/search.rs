use crate::engine::eval::MaterialEvaluator;
use crate::engine::{Evaluator, Move, SearchStats, Searcher};
use crate::logic::board::Board;
use crate::logic::generator::MoveGenerator;
use log::debug;
use std::time::Instant;

/// Fixed search horizon: each root move is scored with a full-width search
/// this many plies deep. The cost is exponential and paid synchronously.
pub const SEARCH_DEPTH: u8 = 4;

/// Returned for a position whose side to move has nothing to play. Large
/// enough to dominate any material swing, small enough to negate safely.
pub const NO_MOVES_SCORE: i32 = -100_000;

pub const INFINITY_SCORE: i32 = 1_000_000;

pub struct AlphaBetaEngine {
    evaluator: MaterialEvaluator,
    generator: MoveGenerator,
    nodes: u32,
}

impl Default for AlphaBetaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlphaBetaEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            evaluator: MaterialEvaluator::new(),
            generator: MoveGenerator::new(),
            nodes: 0,
        }
    }

    /// Plain negamax without pruning; kept as the reference scorer the
    /// pruned search must agree with.
    pub fn negamax(&mut self, board: &mut Board, depth: u8) -> i32 {
        self.nodes += 1;
        if depth == 0 {
            return self.evaluator.evaluate(board);
        }
        let moves = self.generator.legal_moves(board);
        if moves.is_empty() {
            return NO_MOVES_SCORE;
        }
        let mut best = -INFINITY_SCORE;
        for mv in moves {
            let piece = board.apply_move(&mv);
            let score = -self.negamax(board, depth - 1);
            board.undo_move(piece, &mv);
            best = best.max(score);
        }
        best
    }

    /// Negamax with fail-hard alpha-beta pruning: a child refutation at or
    /// above beta cuts off immediately and returns beta.
    pub fn alpha_beta(&mut self, board: &mut Board, depth: u8, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        if depth == 0 {
            return self.evaluator.evaluate(board);
        }
        let moves = self.generator.legal_moves(board);
        if moves.is_empty() {
            return NO_MOVES_SCORE;
        }
        for mv in moves {
            let piece = board.apply_move(&mv);
            let score = -self.alpha_beta(board, depth - 1, -beta, -alpha);
            board.undo_move(piece, &mv);
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    /// Scores every root move with the fixed-depth search and returns the
    /// best one; equal scores resolve to the move encountered last. The
    /// caller's board is left untouched.
    pub fn best_move(&mut self, board: &Board) -> Option<Move> {
        let mut board = board.clone();
        let moves = self.generator.legal_moves(&board);
        let mut best: Option<(Move, i32)> = None;
        for mv in moves {
            let piece = board.apply_move(&mv);
            let score = -self.alpha_beta(&mut board, SEARCH_DEPTH, -INFINITY_SCORE, INFINITY_SCORE);
            board.undo_move(piece, &mv);
            if best.as_ref().map_or(true, |(_, seen)| score >= *seen) {
                best = Some((mv, score));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(&mut self, board: &Board) -> Option<(Move, SearchStats)> {
        self.nodes = 0;
        let start = Instant::now();
        let best = self.best_move(board)?;
        let stats = SearchStats {
            depth: SEARCH_DEPTH,
            nodes: self.nodes,
            time_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            "alpha-beta search: depth={} nodes={} time={}ms",
            stats.depth, stats.nodes, stats.time_ms
        );
        Some((best, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::STARTING_TEXT;

    #[test]
    fn pruned_search_matches_plain_negamax() {
        let texts = [
            "8/8/8/8/2b5/3b4/4b3/4y3",
            "Y2b4/8/4b3/8/8/8/8/8",
            "8/3b4/8/3Y4/8/3b4/8/8 b",
            STARTING_TEXT,
        ];
        for text in texts {
            let board = Board::from_text(text).unwrap();
            let mut engine = AlphaBetaEngine::new();
            let mut scratch = board.clone();
            let plain = engine.negamax(&mut scratch, 3);
            let pruned = engine.alpha_beta(&mut scratch, 3, -INFINITY_SCORE, INFINITY_SCORE);
            assert_eq!(plain, pruned, "search divergence on {text}");
            // Mutate/restore symmetry held throughout both searches.
            assert_eq!(scratch, board);
        }
    }

    #[test]
    fn moveless_position_scores_as_a_loss() {
        let board = Board::from_text("yyyyyyyy/8/8/8/8/8/8/7b").unwrap();
        let mut engine = AlphaBetaEngine::new();
        let mut scratch = board.clone();
        assert_eq!(engine.negamax(&mut scratch, 2), NO_MOVES_SCORE);
        assert_eq!(
            engine.alpha_beta(&mut scratch, 2, -INFINITY_SCORE, INFINITY_SCORE),
            NO_MOVES_SCORE
        );
        assert!(engine.best_move(&board).is_none());
    }

    #[test]
    fn zero_depth_is_the_static_evaluation() {
        let board = Board::from_text("B7/8/8/8/8/8/8/7y b").unwrap();
        let mut engine = AlphaBetaEngine::new();
        let mut scratch = board.clone();
        assert_eq!(engine.negamax(&mut scratch, 0), 40);
    }
}
