use crate::engine::Move;
use crate::logic::board::{Color, Position};

pub const RIGHT: Position = Position::new(1, 0);
pub const LEFT: Position = Position::new(-1, 0);

/// The three absolute directions a man may ever move or capture in. They are
/// a property of the color, not of the path taken so far; the reverse of
/// forward is never among them.
#[must_use]
pub fn man_directions(color: Color) -> [Position; 3] {
    [color.forward(), RIGHT, LEFT]
}

/// Capturing is compulsory and greedy across the whole position: if any
/// generated move captures, only the moves matching the longest capture
/// chain anywhere on the board survive. This can force a specific piece to
/// be the one that moves, not merely a specific direction.
pub fn enforce_maximum_capture(moves: &mut Vec<Move>) {
    let best = moves.iter().map(Move::capture_count).max().unwrap_or(0);
    if best > 0 {
        moves.retain(|mv| mv.capture_count() == best);
    }
}
