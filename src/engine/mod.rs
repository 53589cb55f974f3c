use crate::logic::board::{Board, Piece, Position};
use serde::{Deserialize, Serialize};

pub mod eval;
pub mod random;
pub mod search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub piece: Piece,
    pub at: Position,
}

/// One full move: the origin followed by every landing square, plus the
/// pieces taken along the way. A quiet move has an empty capture list; a
/// capture chain has exactly one capture per leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub path: Vec<Position>,
    pub captures: Vec<Capture>,
}

impl Move {
    #[must_use]
    pub fn simple(from: Position, to: Position) -> Self {
        Self {
            path: vec![from, to],
            captures: Vec::new(),
        }
    }

    #[must_use]
    pub fn origin(&self) -> Position {
        *self.path.first().expect("move path is never empty")
    }

    #[must_use]
    pub fn destination(&self) -> Position {
        *self.path.last().expect("move path is never empty")
    }

    #[must_use]
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

pub trait Evaluator {
    fn evaluate(&self, board: &Board) -> i32;
}

pub trait Searcher {
    fn search(&mut self, board: &Board) -> Option<(Move, SearchStats)>;
}
