// src/dungeon/mod.rs
pub mod generator;
pub mod grid;
pub mod maze;
pub mod postprocess;
pub mod regions;
pub mod rooms;

pub use generator::{generate, DungeonGenerator, GenerationStats, GeneratorConfig};
pub use grid::Grid;
pub use rooms::Room;

// Tile values
pub const WALL: i32 = 0;
pub const CONNECTOR: i32 = -1; // Only present while regions are being connected

/// Smallest grid side that still holds one cell inside a wall border.
pub const MIN_GRID_SIZE: i32 = 3;

// Defaults for the tunable constants of the pipeline
pub const DEFAULT_ATTEMPTS_PER_ROOM: usize = 10;
pub const DEFAULT_EXTRA_CONNECTOR_CHANCE: f64 = 0.001;
