// src/utils/geometry.rs
use serde::{Deserialize, Serialize};

/// An integer tile coordinate on the dungeon grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point `distance` tiles away in `direction`.
    pub fn step(&self, direction: Direction, distance: i32) -> Point {
        let (dx, dy) = direction.delta();
        Point::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// The four cardinal neighbours, in `Direction::ALL` order.
    pub fn neighbors(&self) -> [Point; 4] {
        Direction::ALL.map(|d| self.step(d, 1))
    }

    pub fn manhattan_distance(&self, other: &Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True when at least one coordinate is odd, i.e. the tile lies on a cell row or column.
    pub fn on_cell_line(&self) -> bool {
        self.x % 2 == 1 || self.y % 2 == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    South,
    North,
}

impl Direction {
    /// Neighbour scan order used by every flood and count on the grid.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
        }
    }
}
