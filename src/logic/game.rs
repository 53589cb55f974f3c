use crate::engine::{Capture, Move};
use crate::logic::board::{Board, Color, Piece, Position, Rank, TextError};
use crate::logic::generator::MoveGenerator;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won(Color),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: Move,
    pub piece: Piece,
    pub color: Color,
}

/// What happened when one leg was offered for commitment. This is the whole
/// event surface a presentation layer needs: move the piece, play a capture
/// or crowning effect, hand over the turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegOutcome {
    pub committed: bool,
    pub promoted: bool,
    pub captured: Option<Capture>,
    pub turn_ended: bool,
}

/// A partially committed chain. `continuations` always start at the mover's
/// current square; `committed` accumulates the legs already played so the
/// full move can be recorded once the chain completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InFlight {
    piece: Piece,
    committed: Move,
    continuations: Vec<Move>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub status: GameStatus,
    pub history: Vec<MoveRecord>,
    pub last_move: Option<(Position, Position)>,
    legal: Vec<Move>,
    selection: Option<Position>,
    in_flight: Option<InFlight>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    pub fn from_text(text: &str) -> Result<Self, TextError> {
        Ok(Self::with_board(Board::from_text(text)?))
    }

    fn with_board(board: Board) -> Self {
        let mut game = Self {
            board,
            status: GameStatus::Playing,
            history: Vec::new(),
            last_move: None,
            legal: Vec::new(),
            selection: None,
            in_flight: None,
        };
        game.legal = MoveGenerator::new().legal_moves(&game.board);
        game.update_status();
        game
    }

    /// The legal move set for the current side to move, maximum-capture
    /// filter already applied. Regenerated on every turn transfer.
    #[must_use]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal
    }

    /// Picks up the piece on `origin` and returns the moves it may start.
    /// While a chain is in flight only its own continuations are on offer.
    pub fn begin_selection(&mut self, origin: Position) -> Vec<Move> {
        if let Some(flight) = &self.in_flight {
            if flight.continuations.iter().any(|mv| mv.origin() == origin) {
                return flight.continuations.clone();
            }
            return Vec::new();
        }
        if self.status != GameStatus::Playing {
            return Vec::new();
        }
        let candidates: Vec<Move> = self
            .legal
            .iter()
            .filter(|mv| mv.origin() == origin)
            .cloned()
            .collect();
        self.selection = if candidates.is_empty() {
            None
        } else {
            Some(origin)
        };
        candidates
    }

    /// Offers `destination` as the next landing square. A two-square match
    /// commits atomically; a longer match commits its first leg and leaves
    /// the chain in flight. A destination that matches nothing is a no-op
    /// which, outside a chain, also clears the pending selection.
    pub fn commit_leg(&mut self, destination: Position) -> LegOutcome {
        if self.in_flight.is_some() {
            return self.continue_flight(destination);
        }
        let Some(origin) = self.selection.take() else {
            return LegOutcome::default();
        };
        let matches: Vec<Move> = self
            .legal
            .iter()
            .filter(|mv| mv.origin() == origin && mv.path.get(1) == Some(&destination))
            .cloned()
            .collect();
        let Some(first) = matches.first().cloned() else {
            return LegOutcome::default();
        };
        let piece = self
            .board
            .piece_at(origin)
            .expect("selected square is occupied");
        if first.path.len() == 2 {
            return self.finish_move(piece, first);
        }

        let capture = first.captures.first().copied();
        self.board.take(origin);
        if let Some(capture) = &capture {
            self.board.take(capture.at);
        }
        self.board.put(destination, piece);
        self.in_flight = Some(InFlight {
            piece,
            committed: Move {
                path: vec![origin, destination],
                captures: capture.iter().copied().collect(),
            },
            continuations: matches.iter().map(trim_first_leg).collect(),
        });
        LegOutcome {
            committed: true,
            promoted: false,
            captured: capture,
            turn_ended: false,
        }
    }

    fn continue_flight(&mut self, destination: Position) -> LegOutcome {
        let Some(mut flight) = self.in_flight.take() else {
            return LegOutcome::default();
        };
        let matches: Vec<Move> = flight
            .continuations
            .iter()
            .filter(|mv| mv.path.get(1) == Some(&destination))
            .cloned()
            .collect();
        let Some(first) = matches.first() else {
            // A chain in flight is driven to completion; unrelated input is
            // ignored rather than abandoning a half-committed move.
            self.in_flight = Some(flight);
            return LegOutcome::default();
        };
        let current = first.origin();
        let capture = first.captures.first().copied();
        let final_leg = first.path.len() == 2;

        self.board
            .take(current)
            .expect("in-flight piece is on its current square");
        if let Some(capture) = &capture {
            self.board.take(capture.at);
        }
        flight.committed.path.push(destination);
        if let Some(capture) = capture {
            flight.committed.captures.push(capture);
        }

        if final_leg {
            let piece = flight.piece;
            let promoted = !piece.is_king() && destination.y == piece.color.promotion_row();
            let landed = if promoted {
                Piece::new(piece.color, Rank::King)
            } else {
                piece
            };
            self.board.put(destination, landed);
            self.board.side_to_move = self.board.side_to_move.opposite();
            self.finish_turn(piece, flight.committed);
            return LegOutcome {
                committed: true,
                promoted,
                captured: capture,
                turn_ended: true,
            };
        }

        self.board.put(destination, flight.piece);
        flight.continuations = matches.iter().map(trim_first_leg).collect();
        self.in_flight = Some(flight);
        LegOutcome {
            committed: true,
            promoted: false,
            captured: capture,
            turn_ended: false,
        }
    }

    /// Arms the machine with an externally chosen move (typically the search
    /// result) without committing anything yet; `advance_leg` then plays it
    /// back one leg per tick.
    pub fn queue_move(&mut self, mv: Move) -> bool {
        if self.in_flight.is_some() || self.status != GameStatus::Playing {
            return false;
        }
        if !self.legal.contains(&mv) {
            return false;
        }
        let piece = self
            .board
            .piece_at(mv.origin())
            .expect("legal move starts on an occupied square");
        self.selection = None;
        self.in_flight = Some(InFlight {
            piece,
            committed: Move {
                path: vec![mv.origin()],
                captures: Vec::new(),
            },
            continuations: vec![mv],
        });
        true
    }

    /// Commits the next leg of the queued or in-flight chain. A no-op when
    /// nothing is armed.
    pub fn advance_leg(&mut self) -> LegOutcome {
        let next = self
            .in_flight
            .as_ref()
            .and_then(|flight| flight.continuations.first())
            .and_then(|mv| mv.path.get(1))
            .copied();
        match next {
            Some(destination) => self.continue_flight(destination),
            None => LegOutcome::default(),
        }
    }

    /// Reverts the last fully committed move. Refused while a chain is in
    /// flight.
    pub fn undo_last(&mut self) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        let Some(record) = self.history.pop() else {
            return false;
        };
        self.board.undo_move(record.piece, &record.mv);
        self.selection = None;
        self.last_move = self
            .history
            .last()
            .map(|r| (r.mv.origin(), r.mv.destination()));
        self.status = GameStatus::Playing;
        self.legal = MoveGenerator::new().legal_moves(&self.board);
        true
    }

    fn finish_move(&mut self, piece: Piece, mv: Move) -> LegOutcome {
        let destination = mv.destination();
        let promoted = !piece.is_king() && destination.y == piece.color.promotion_row();
        let captured = mv.captures.first().copied();
        self.board.apply_move(&mv);
        self.finish_turn(piece, mv);
        LegOutcome {
            committed: true,
            promoted,
            captured,
            turn_ended: true,
        }
    }

    fn finish_turn(&mut self, piece: Piece, mv: Move) {
        debug!(
            "{:?} committed {:?} -> {:?} ({} captured)",
            piece.color,
            mv.origin(),
            mv.destination(),
            mv.capture_count()
        );
        self.last_move = Some((mv.origin(), mv.destination()));
        self.history.push(MoveRecord {
            color: piece.color,
            piece,
            mv,
        });
        self.selection = None;
        self.legal = MoveGenerator::new().legal_moves(&self.board);
        self.update_status();
    }

    fn update_status(&mut self) {
        if self.board.is_over() {
            let winner = if self.board.piece_count(Color::Yellow) == 0 {
                Color::Black
            } else {
                Color::Yellow
            };
            self.status = GameStatus::Won(winner);
            info!("game over: {winner:?} wins on material");
        } else if self.legal.is_empty() {
            // A side with pieces but nothing to play loses immediately,
            // matching the search's treatment of a moveless position.
            let winner = self.board.side_to_move.opposite();
            self.status = GameStatus::Won(winner);
            info!(
                "game over: {winner:?} wins, {:?} has no moves",
                self.board.side_to_move
            );
        }
    }
}

fn trim_first_leg(mv: &Move) -> Move {
    Move {
        path: mv.path[1..].to_vec(),
        captures: mv.captures[1..].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_move_commits_atomically() {
        let mut game = GameState::new();
        let candidates = game.begin_selection(Position::new(0, 5));
        assert!(!candidates.is_empty());

        let outcome = game.commit_leg(Position::new(0, 4));
        assert!(outcome.committed);
        assert!(outcome.turn_ended);
        assert!(outcome.captured.is_none());
        assert_eq!(game.board.side_to_move, Color::Black);
        assert_eq!(game.history.len(), 1);
        assert_eq!(
            game.last_move,
            Some((Position::new(0, 5), Position::new(0, 4)))
        );
    }

    #[test]
    fn mismatched_destination_clears_selection() {
        let mut game = GameState::new();
        game.begin_selection(Position::new(0, 5));

        let outcome = game.commit_leg(Position::new(7, 0));
        assert!(!outcome.committed);

        // The selection is gone: a now-valid destination no longer commits.
        let outcome = game.commit_leg(Position::new(0, 4));
        assert!(!outcome.committed);
        assert_eq!(game.history.len(), 0);
    }

    #[test]
    fn multi_leg_chain_runs_in_flight() {
        let mut game = GameState::from_text("8/8/8/8/2b5/3b4/4b3/4y3").unwrap();
        let candidates = game.begin_selection(Position::new(4, 7));
        assert_eq!(candidates.len(), 1);

        let first = game.commit_leg(Position::new(4, 5));
        assert!(first.committed);
        assert!(!first.turn_ended);
        assert!(first.captured.is_some());
        assert_eq!(game.board.side_to_move, Color::Yellow);

        // Unrelated input must not abandon the chain.
        let noop = game.commit_leg(Position::new(0, 0));
        assert!(!noop.committed);

        let second = game.commit_leg(Position::new(2, 5));
        assert!(second.committed);
        assert!(!second.turn_ended);

        let last = game.commit_leg(Position::new(2, 3));
        assert!(last.committed);
        assert!(last.turn_ended);
        assert_eq!(game.board.side_to_move, Color::Black);
        assert_eq!(game.board.piece_count(Color::Black), 0);
        assert_eq!(game.history.len(), 1);
        assert_eq!(game.history[0].mv.capture_count(), 3);
        assert_eq!(game.status, GameStatus::Won(Color::Yellow));
    }

    #[test]
    fn promotion_is_reported_on_the_final_leg() {
        let mut game = GameState::from_text("8/2y5/8/8/8/8/8/7b").unwrap();
        game.begin_selection(Position::new(2, 1));
        let outcome = game.commit_leg(Position::new(2, 0));
        assert!(outcome.committed);
        assert!(outcome.promoted);
        assert!(outcome.turn_ended);
        assert_eq!(game.board.to_text(), "2Y5/8/8/8/8/8/8/7b");
    }

    #[test]
    fn queued_move_plays_back_one_leg_per_tick() {
        let mut game = GameState::from_text("8/8/8/8/2b5/3b4/4b3/4y3").unwrap();
        let chosen = game.legal_moves()[0].clone();
        assert!(game.queue_move(chosen));

        let first = game.advance_leg();
        assert!(first.committed);
        assert!(!first.turn_ended);
        let second = game.advance_leg();
        assert!(second.committed);
        assert!(!second.turn_ended);
        let last = game.advance_leg();
        assert!(last.committed);
        assert!(last.turn_ended);

        assert!(!game.advance_leg().committed);
        assert_eq!(game.history.len(), 1);
        assert_eq!(game.history[0].mv.path.len(), 4);
    }

    #[test]
    fn queue_refuses_foreign_and_mid_chain_moves() {
        let mut game = GameState::from_text("8/8/8/8/2b5/3b4/4b3/4y3").unwrap();
        let foreign = Move::simple(Position::new(4, 7), Position::new(4, 6));
        assert!(!game.queue_move(foreign));

        let chosen = game.legal_moves()[0].clone();
        assert!(game.queue_move(chosen.clone()));
        game.advance_leg();
        assert!(!game.queue_move(chosen));
    }

    #[test]
    fn undo_restores_the_previous_position() {
        let mut game = GameState::new();
        let before = game.board.clone();
        game.begin_selection(Position::new(0, 5));
        game.commit_leg(Position::new(0, 4));

        assert!(game.undo_last());
        assert_eq!(game.board, before);
        assert!(game.history.is_empty());
        assert!(game.last_move.is_none());
        assert_eq!(game.status, GameStatus::Playing);
    }

    #[test]
    fn side_without_moves_loses() {
        // Yellow men jammed on their promotion row; Black still has a piece.
        let game = GameState::from_text("yyyyyyyy/8/8/8/8/8/8/7b").unwrap();
        assert_eq!(game.status, GameStatus::Won(Color::Black));
    }

    #[test]
    fn side_without_pieces_loses() {
        let game = GameState::from_text("8/8/8/8/8/8/8/7b b").unwrap();
        assert_eq!(game.status, GameStatus::Won(Color::Black));
    }
}
