// src/lib.rs
//! # RustDelve
//!
//! Procedural dungeon generation on an integer grid: rooms are stamped first, the
//! remaining space is filled with maze passages, every disjoint region is stitched
//! into one through connector walls, and the corridors are reshaped by optional
//! trim / erase / expand passes. A separate illuminator floods light from point
//! sources over the finished layout.
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rust_delve::{generate, illuminate, LightSource};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let grid = generate(21, 21, 5, 3, 7, 2, true, 1, &mut rng).unwrap();
//! let light = illuminate(&grid, &[LightSource::new(1, 1, 6)], 0).unwrap();
//! assert_eq!(light.level(1, 1), Some(6));
//! ```

pub mod dungeon;
pub mod light;
pub mod utils;

pub use dungeon::{generate, DungeonGenerator, GenerationStats, GeneratorConfig, Grid, Room};
pub use light::{illuminate, LightGrid, LightSource};
pub use utils::{Direction, Point};

/// Errors raised by generation and illumination.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DungeonError {
    /// A caller-supplied parameter cannot produce a valid grid or light map.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type used throughout the crate.
pub type DungeonResult<T> = Result<T, DungeonError>;
