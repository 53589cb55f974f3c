use crate::engine::{Capture, Move};
use crate::logic::board::{Board, Color, Position, Rank};
use crate::logic::lookup::{opposite_dir, RayTables, DIRECTIONS};
use crate::logic::rules::{enforce_maximum_capture, man_directions};

pub struct MoveGenerator;

impl MoveGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Every legal move for the side to move, after the compulsory-capture
    /// filter. Generation is total; an empty result is a valid outcome.
    ///
    /// Chains are enumerated on a scratch copy of the board: the mover is
    /// lifted off its square and each victim is removed for the duration of
    /// the legs behind it, then restored on unwind, so sibling branches
    /// always see a pristine position.
    #[must_use]
    pub fn legal_moves(&self, board: &Board) -> Vec<Move> {
        let color = board.side_to_move;
        let mut moves = Vec::new();
        let mut scratch = board.clone();

        for y in 0..8 {
            for x in 0..8 {
                let from = Position::new(x, y);
                let Some(piece) = scratch.piece_at(from) else {
                    continue;
                };
                if piece.color != color {
                    continue;
                }
                let lifted = scratch.take(from).expect("piece just seen on square");
                let mut path = vec![from];
                let mut captures = Vec::new();
                match piece.rank {
                    Rank::Man => {
                        self.man_simple_moves(&scratch, from, color, &mut moves);
                        self.man_chains(
                            &mut scratch,
                            color,
                            from,
                            &mut path,
                            &mut captures,
                            &mut moves,
                        );
                    }
                    Rank::King => {
                        self.king_simple_moves(&scratch, from, &mut moves);
                        self.king_chains(
                            &mut scratch,
                            color,
                            from,
                            None,
                            &mut path,
                            &mut captures,
                            &mut moves,
                        );
                    }
                }
                scratch.put(from, lifted);
            }
        }

        enforce_maximum_capture(&mut moves);
        moves
    }

    fn man_simple_moves(
        &self,
        board: &Board,
        from: Position,
        color: Color,
        moves: &mut Vec<Move>,
    ) {
        for dir in man_directions(color) {
            let to = from + dir;
            if to.on_board() && board.piece_at(to).is_none() {
                moves.push(Move::simple(from, to));
            }
        }
    }

    /// Depth-first over {forward, right, left} from the current square; the
    /// directions never rotate with the path. Only maximal chains are kept.
    fn man_chains(
        &self,
        board: &mut Board,
        color: Color,
        from: Position,
        path: &mut Vec<Position>,
        captures: &mut Vec<Capture>,
        out: &mut Vec<Move>,
    ) {
        let mut extended = false;
        for dir in man_directions(color) {
            let over = from + dir;
            let landing = over + dir;
            if !landing.on_board() || board.piece_at(landing).is_some() {
                continue;
            }
            let Some(victim) = board.piece_at(over) else {
                continue;
            };
            if victim.color == color {
                continue;
            }

            extended = true;
            board.take(over);
            path.push(landing);
            captures.push(Capture {
                piece: victim,
                at: over,
            });
            self.man_chains(board, color, landing, path, captures, out);
            captures.pop();
            path.pop();
            board.put(over, victim);
        }
        if !extended && !captures.is_empty() {
            out.push(Move {
                path: path.clone(),
                captures: captures.clone(),
            });
        }
    }

    fn king_simple_moves(&self, board: &Board, from: Position, moves: &mut Vec<Move>) {
        let tables = RayTables::get();
        for dir in 0..DIRECTIONS.len() {
            for &to in tables.ray(from, dir) {
                if board.piece_at(to).is_some() {
                    break;
                }
                moves.push(Move::simple(from, to));
            }
        }
    }

    /// Flying-king capture legs: along each ray the first occupied square
    /// must be an opposing piece and the king may land on any empty square
    /// behind it, but never jumps two pieces in one leg. Continuation skips
    /// the direction opposite the leg just taken.
    fn king_chains(
        &self,
        board: &mut Board,
        color: Color,
        from: Position,
        arrived: Option<usize>,
        path: &mut Vec<Position>,
        captures: &mut Vec<Capture>,
        out: &mut Vec<Move>,
    ) {
        let tables = RayTables::get();
        let mut extended = false;
        for dir in 0..DIRECTIONS.len() {
            if arrived.is_some_and(|prev| dir == opposite_dir(prev)) {
                continue;
            }
            let ray = tables.ray(from, dir);
            let Some(block) = ray.iter().position(|&sq| board.piece_at(sq).is_some()) else {
                continue;
            };
            let victim_at = ray[block];
            let victim = board.piece_at(victim_at).expect("blocker just found");
            if victim.color == color {
                continue;
            }

            for &landing in &ray[block + 1..] {
                if board.piece_at(landing).is_some() {
                    break;
                }
                extended = true;
                board.take(victim_at);
                path.push(landing);
                captures.push(Capture {
                    piece: victim,
                    at: victim_at,
                });
                self.king_chains(board, color, landing, Some(dir), path, captures, out);
                captures.pop();
                path.pop();
                board.put(victim_at, victim);
            }
        }
        if !extended && !captures.is_empty() {
            out.push(Move {
                path: path.clone(),
                captures: captures.clone(),
            });
        }
    }
}

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}
