use crate::logic::board::Position;
use std::sync::OnceLock;

pub const NORTH: usize = 0;
pub const EAST: usize = 1;
pub const SOUTH: usize = 2;
pub const WEST: usize = 3;

/// The four orthogonal step vectors, indexed so that `(dir + 2) % 4` is the
/// opposite direction.
pub const DIRECTIONS: [Position; 4] = [
    Position::new(0, -1),
    Position::new(1, 0),
    Position::new(0, 1),
    Position::new(-1, 0),
];

#[must_use]
pub const fn opposite_dir(dir: usize) -> usize {
    (dir + 2) % 4
}

/// For every square and direction, the ordered squares out to the board
/// edge. Built once per process; king move generation walks these instead of
/// re-deriving ray geometry.
pub struct RayTables {
    rays: [[Vec<Position>; 4]; 64],
}

impl RayTables {
    fn new() -> Self {
        let rays = std::array::from_fn(|sq| {
            let from = Position::new(sq as i32 % 8, sq as i32 / 8);
            std::array::from_fn(|dir| {
                let step = DIRECTIONS[dir];
                let mut ray = Vec::new();
                let mut square = from + step;
                while square.on_board() {
                    ray.push(square);
                    square = square + step;
                }
                ray
            })
        });
        Self { rays }
    }

    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<RayTables> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    #[must_use]
    pub fn ray(&self, from: Position, dir: usize) -> &[Position] {
        &self.rays[(from.y * 8 + from.x) as usize][dir]
    }
}
