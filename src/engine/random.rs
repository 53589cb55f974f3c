use crate::engine::{Move, SearchStats, Searcher};
use crate::logic::board::Board;
use crate::logic::generator::MoveGenerator;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Uniformly random legal mover: no search, no evaluation. Useful as a
/// sparring baseline and for exercising the rules without engine bias.
pub struct RandomEngine {
    generator: MoveGenerator,
    rng: StdRng,
}

impl RandomEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generator: MoveGenerator::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded variant for reproducible games.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            generator: MoveGenerator::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher for RandomEngine {
    fn search(&mut self, board: &Board) -> Option<(Move, SearchStats)> {
        let moves = self.generator.legal_moves(board);
        let mv = moves.choose(&mut self.rng)?.clone();
        Some((mv, SearchStats::default()))
    }
}
