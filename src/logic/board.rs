use crate::engine::Move;
use crate::logic::eval_constants::{VAL_MAN, VAL_SHAIKH};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::ops::{Add, Neg};

pub const BOARD_SIZE: i32 = 8;

/// A square coordinate or a direction vector; values outside the board are
/// legal intermediates of direction arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn on_board(self) -> bool {
        self.x >= 0 && self.x < BOARD_SIZE && self.y >= 0 && self.y < BOARD_SIZE
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Neg for Position {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Yellow,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yellow => Self::Black,
            Self::Black => Self::Yellow,
        }
    }

    /// The advance direction of this color's men. Yellow marches toward row
    /// 0, Black toward row 7.
    #[must_use]
    pub const fn forward(self) -> Position {
        match self {
            Self::Yellow => Position::new(0, -1),
            Self::Black => Position::new(0, 1),
        }
    }

    /// The row on which this color's men are crowned.
    #[must_use]
    pub const fn promotion_row(self) -> i32 {
        match self {
            Self::Yellow => 0,
            Self::Black => BOARD_SIZE - 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub rank: Rank,
}

impl Piece {
    #[must_use]
    pub const fn new(color: Color, rank: Rank) -> Self {
        Self { color, rank }
    }

    #[must_use]
    pub const fn is_king(self) -> bool {
        matches!(self.rank, Rank::King)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        match self.rank {
            Rank::Man => VAL_MAN,
            Rank::King => VAL_SHAIKH,
        }
    }

    #[must_use]
    pub const fn to_char(self) -> char {
        match (self.color, self.rank) {
            (Color::Yellow, Rank::Man) => 'y',
            (Color::Yellow, Rank::King) => 'Y',
            (Color::Black, Rank::Man) => 'b',
            (Color::Black, Rank::King) => 'B',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'y' => Some(Self::new(Color::Yellow, Rank::Man)),
            'Y' => Some(Self::new(Color::Yellow, Rank::King)),
            'b' => Some(Self::new(Color::Black, Rank::Man)),
            'B' => Some(Self::new(Color::Black, Rank::King)),
            _ => None,
        }
    }
}

pub const STARTING_TEXT: &str = "8/bbbbbbbb/bbbbbbbb/8/8/yyyyyyyy/yyyyyyyy/8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    UnexpectedChar(char),
    BadRowWidth,
    BadRowCount,
}

/// 8x8 mailbox plus side to move. All occupancy changes funnel through
/// `put`/`take` so the per-color material tallies stay exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(with = "BigArray")]
    squares: [Option<Piece>; 64],
    pub side_to_move: Color,
    yellow_material: i32,
    black_material: i32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::from_text(STARTING_TEXT).expect("starting position is well formed")
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
            side_to_move: Color::Yellow,
            yellow_material: 0,
            black_material: 0,
        }
    }

    /// Reads a position from its textual form: eight `/`-separated rows, top
    /// row first, digits for empty runs, `y`/`Y`/`b`/`B` for pieces, plus an
    /// optional trailing ` y` / ` b` side-to-move field (Yellow by default).
    pub fn from_text(text: &str) -> Result<Self, TextError> {
        let (placement, turn) = match text.split_once(' ') {
            Some((placement, turn)) => (placement, Some(turn)),
            None => (text, None),
        };

        let mut board = Self::empty();
        board.side_to_move = match turn {
            None | Some("y") => Color::Yellow,
            Some("b") => Color::Black,
            Some(other) => {
                return Err(TextError::UnexpectedChar(other.chars().next().unwrap_or(' ')))
            }
        };

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(TextError::BadRowCount);
        }
        for (y, row) in rows.iter().enumerate() {
            let mut x: i32 = 0;
            for c in row.chars() {
                if let Some(run) = c.to_digit(10) {
                    if run == 0 || run > 8 {
                        return Err(TextError::UnexpectedChar(c));
                    }
                    x += run as i32;
                } else {
                    let piece = Piece::from_char(c).ok_or(TextError::UnexpectedChar(c))?;
                    if x >= BOARD_SIZE {
                        return Err(TextError::BadRowWidth);
                    }
                    board.put(Position::new(x, y as i32), piece);
                    x += 1;
                }
            }
            if x != BOARD_SIZE {
                return Err(TextError::BadRowWidth);
            }
        }
        Ok(board)
    }

    /// Canonical piece placement only; the side to move is not encoded.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for y in 0..BOARD_SIZE {
            if y > 0 {
                text.push('/');
            }
            let mut run = 0;
            for x in 0..BOARD_SIZE {
                match self.piece_at(Position::new(x, y)) {
                    Some(piece) => {
                        if run > 0 {
                            text.push(char::from_digit(run, 10).expect("run fits one digit"));
                            run = 0;
                        }
                        text.push(piece.to_char());
                    }
                    None => run += 1,
                }
            }
            if run > 0 {
                text.push(char::from_digit(run, 10).expect("run fits one digit"));
            }
        }
        text
    }

    const fn index(pos: Position) -> usize {
        (pos.y * BOARD_SIZE + pos.x) as usize
    }

    #[must_use]
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.on_board() {
            return None;
        }
        self.squares[Self::index(pos)]
    }

    pub fn put(&mut self, pos: Position, piece: Piece) {
        debug_assert!(pos.on_board());
        debug_assert!(
            self.squares[Self::index(pos)].is_none(),
            "two pieces on one square"
        );
        self.squares[Self::index(pos)] = Some(piece);
        *self.material_mut(piece.color) += piece.value();
    }

    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        debug_assert!(pos.on_board());
        let piece = self.squares[Self::index(pos)].take();
        if let Some(piece) = piece {
            *self.material_mut(piece.color) -= piece.value();
        }
        piece
    }

    fn material_mut(&mut self, color: Color) -> &mut i32 {
        match color {
            Color::Yellow => &mut self.yellow_material,
            Color::Black => &mut self.black_material,
        }
    }

    #[must_use]
    pub const fn material(&self, color: Color) -> i32 {
        match color {
            Color::Yellow => self.yellow_material,
            Color::Black => self.black_material,
        }
    }

    #[must_use]
    pub fn piece_count(&self, color: Color) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.color == color)
            .count()
    }

    /// A side with no pieces left has lost. A side that still has pieces but
    /// nothing to play is handled one level up, by the game state.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.piece_count(Color::Yellow) == 0 || self.piece_count(Color::Black) == 0
    }

    /// Commits a full move: clears the origin and every captured square,
    /// lands the mover (crowned if it is a man ending on its promotion row)
    /// and transfers the turn. Returns the pre-move piece, which
    /// `undo_move` needs to reconstruct the position exactly.
    pub fn apply_move(&mut self, mv: &Move) -> Piece {
        let piece = self.take(mv.origin()).expect("no piece at move origin");
        for capture in &mv.captures {
            self.take(capture.at);
        }
        let destination = mv.destination();
        let landed = if !piece.is_king() && destination.y == piece.color.promotion_row() {
            Piece::new(piece.color, Rank::King)
        } else {
            piece
        };
        self.put(destination, landed);
        self.side_to_move = self.side_to_move.opposite();
        piece
    }

    /// Exact inverse of `apply_move`; `piece` is the value `apply_move`
    /// returned, carrying the mover's pre-promotion identity.
    pub fn undo_move(&mut self, piece: Piece, mv: &Move) {
        self.side_to_move = self.side_to_move.opposite();
        self.take(mv.destination());
        self.put(mv.origin(), piece);
        for capture in &mv.captures {
            self.put(capture.at, capture.piece);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Capture;

    #[test]
    fn starting_position_round_trip() {
        let board = Board::new();
        assert_eq!(board.to_text(), STARTING_TEXT);
        assert_eq!(board.side_to_move, Color::Yellow);
        assert_eq!(board.piece_count(Color::Yellow), 16);
        assert_eq!(board.piece_count(Color::Black), 16);
    }

    #[test]
    fn from_text_reads_side_to_move() {
        let board = Board::from_text("8/8/8/8/8/8/8/7B b").unwrap();
        assert_eq!(board.side_to_move, Color::Black);
        assert_eq!(
            board.piece_at(Position::new(7, 7)),
            Some(Piece::new(Color::Black, Rank::King))
        );
    }

    #[test]
    fn from_text_rejects_malformed_input() {
        assert_eq!(
            Board::from_text("8/8/8/8/8/8/8"),
            Err(TextError::BadRowCount)
        );
        assert_eq!(
            Board::from_text("yyyyyyyyy/8/8/8/8/8/8/8"),
            Err(TextError::BadRowWidth)
        );
        assert_eq!(
            Board::from_text("6y/8/8/8/8/8/8/8"),
            Err(TextError::BadRowWidth)
        );
        assert_eq!(
            Board::from_text("8/8/8/8/8/8/8/7q"),
            Err(TextError::UnexpectedChar('q'))
        );
    }

    #[test]
    fn apply_and_undo_restore_captured_pieces_exactly() {
        let mut board = Board::from_text("8/8/8/3B4/8/3b4/8/3Y4").unwrap();
        let before = board.clone();
        let mv = Move {
            path: vec![
                Position::new(3, 7),
                Position::new(3, 4),
                Position::new(3, 0),
            ],
            captures: vec![
                Capture {
                    piece: Piece::new(Color::Black, Rank::Man),
                    at: Position::new(3, 5),
                },
                Capture {
                    piece: Piece::new(Color::Black, Rank::King),
                    at: Position::new(3, 3),
                },
            ],
        };

        let piece = board.apply_move(&mv);
        assert_eq!(piece, Piece::new(Color::Yellow, Rank::King));
        assert_eq!(board.side_to_move, Color::Black);
        assert_eq!(board.piece_count(Color::Black), 0);
        assert!(board.is_over());

        board.undo_move(piece, &mv);
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_happens_on_the_final_square() {
        let mut board = Board::from_text("8/2y5/8/8/8/8/8/8").unwrap();
        let mv = Move::simple(Position::new(2, 1), Position::new(2, 0));

        let piece = board.apply_move(&mv);
        assert_eq!(board.to_text(), "2Y5/8/8/8/8/8/8/8");

        board.undo_move(piece, &mv);
        assert_eq!(board.to_text(), "8/2y5/8/8/8/8/8/8");
        assert_eq!(
            board.piece_at(Position::new(2, 1)),
            Some(Piece::new(Color::Yellow, Rank::Man))
        );
    }

    #[test]
    fn material_follows_every_mutation() {
        let mut board = Board::empty();
        board.put(Position::new(0, 0), Piece::new(Color::Black, Rank::King));
        board.put(Position::new(7, 7), Piece::new(Color::Yellow, Rank::Man));
        assert_eq!(board.material(Color::Black), 50);
        assert_eq!(board.material(Color::Yellow), 10);

        board.take(Position::new(0, 0));
        assert_eq!(board.material(Color::Black), 0);
        assert!(board.is_over());
    }
}
