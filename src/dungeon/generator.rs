// src/dungeon/generator.rs

use std::time::Instant;

use log::{debug, info};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dungeon::maze::carve_maze;
use crate::dungeon::postprocess::{erase_columns, expand, trim};
use crate::dungeon::regions::{connect_regions, normalize_regions};
use crate::dungeon::rooms::{place_rooms, Room};
use crate::dungeon::{Grid, DEFAULT_ATTEMPTS_PER_ROOM, DEFAULT_EXTRA_CONNECTOR_CHANCE, MIN_GRID_SIZE};
use crate::{DungeonError, DungeonResult};

pub struct DungeonGenerator<R: Rng> {
    config: GeneratorConfig,
    rng: R,
    rooms: Vec<Room>,
    stats: Option<GenerationStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: i32,
    pub height: i32,
    pub room_count: usize,
    pub min_room_size: i32,
    pub max_room_size: i32,
    /// Dead-end trimming passes.
    pub trim_passes: usize,
    /// Open walls fully enclosed by open tiles.
    pub erase_columns: bool,
    /// Passes opening walls with three or more open neighbours.
    pub expand_passes: usize,
    /// Placement attempts allowed per requested room.
    pub attempts_per_room: usize,
    /// Chance that a connector next to the main region opens on top of the chosen one.
    pub extra_connector_chance: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            width: 41,
            height: 31,
            room_count: 6,
            min_room_size: 3,
            max_room_size: 9,
            trim_passes: 0,
            erase_columns: false,
            expand_passes: 0,
            attempts_per_room: DEFAULT_ATTEMPTS_PER_ROOM,
            extra_connector_chance: DEFAULT_EXTRA_CONNECTOR_CHANCE,
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> DungeonResult<Self> {
        let config: GeneratorConfig = serde_json::from_str(json)
            .map_err(|e| DungeonError::InvalidParameter(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DungeonResult<()> {
        if self.width < MIN_GRID_SIZE || self.height < MIN_GRID_SIZE {
            return Err(invalid(format!(
                "grid {}x{} is smaller than {}x{}",
                self.width, self.height, MIN_GRID_SIZE, MIN_GRID_SIZE
            )));
        }
        if self.min_room_size < 1 || self.max_room_size < 1 {
            return Err(invalid(format!(
                "room sizes must be positive, got {}..{}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(invalid(format!(
                "min room size {} exceeds max room size {}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.room_count > 0 && self.attempts_per_room == 0 {
            return Err(invalid("attempts per room must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.extra_connector_chance) {
            return Err(invalid(format!(
                "extra connector chance {} is not a probability",
                self.extra_connector_chance
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> DungeonError {
    DungeonError::InvalidParameter(message)
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation_time: f64,
    pub room_count: usize,
    pub maze_region_count: usize,
    pub connectors_opened: usize,
    pub extra_connectors: usize,
    pub tiles_trimmed: usize,
    pub columns_erased: usize,
    pub walls_expanded: usize,
    pub open_tiles: usize,
}

impl DungeonGenerator<ThreadRng> {
    /// A generator drawing from the thread-local random source.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_rng(config, rand::rng())
    }
}

impl DungeonGenerator<StdRng> {
    /// A reproducible generator: the same seed and config always give the same grid.
    pub fn from_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DungeonGenerator<R> {
    pub fn with_rng(config: GeneratorConfig, rng: R) -> Self {
        DungeonGenerator {
            config,
            rng,
            rooms: Vec::new(),
            stats: None,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Rooms placed by the last `generate` call.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Statistics of the last `generate` call.
    pub fn stats(&self) -> Option<&GenerationStats> {
        self.stats.as_ref()
    }

    pub fn generate(&mut self) -> DungeonResult<Grid> {
        let (grid, rooms, stats) = run_pipeline(&self.config, &mut self.rng)?;
        self.rooms = rooms;
        self.stats = Some(stats);
        Ok(grid)
    }
}

/// Generates a dungeon in one call.
///
/// Rooms first, then maze passages in the gaps, then every region is connected to
/// the one at `(1, 1)`. `trim_passes`, `erase_columns` and `expand_passes` reshape the
/// result. Fewer rooms than requested may be placed.
#[allow(clippy::too_many_arguments)]
pub fn generate<R: Rng + ?Sized>(
    xsize: i32,
    ysize: i32,
    number_of_rooms: usize,
    min_room_size: i32,
    max_room_size: i32,
    trim_passes: usize,
    erase_columns: bool,
    expand_passes: usize,
    rng: &mut R,
) -> DungeonResult<Grid> {
    let config = GeneratorConfig {
        width: xsize,
        height: ysize,
        room_count: number_of_rooms,
        min_room_size,
        max_room_size,
        trim_passes,
        erase_columns,
        expand_passes,
        ..GeneratorConfig::default()
    };
    run_pipeline(&config, rng).map(|(grid, _, _)| grid)
}

fn run_pipeline<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> DungeonResult<(Grid, Vec<Room>, GenerationStats)> {
    config.validate()?;
    let start = Instant::now();
    let mut stats = GenerationStats::default();
    let mut grid = Grid::new(config.width, config.height)?;

    // 1. Rooms.
    let rooms = place_rooms(
        &mut grid,
        config.room_count,
        config.min_room_size,
        config.max_room_size,
        config.attempts_per_room,
        rng,
    );
    stats.room_count = rooms.len();

    // 2. Maze passages in the remaining space.
    let first_maze_region = rooms.len() as i32 + 1;
    let next_region = carve_maze(&mut grid, first_maze_region, rng);
    stats.maze_region_count = (next_region - first_maze_region) as usize;

    // 3. One id per connected group, then stitch them together.
    normalize_regions(&mut grid);
    let report = connect_regions(&mut grid, config.extra_connector_chance, rng);
    stats.connectors_opened = report.merges;
    stats.extra_connectors = report.extra_connectors;

    // 4. Reshape.
    stats.tiles_trimmed = trim(&mut grid, config.trim_passes);
    if config.erase_columns {
        stats.columns_erased = erase_columns(&mut grid);
    }
    stats.walls_expanded = expand(&mut grid, config.expand_passes);
    debug!(
        "Post-processing trimmed {} tiles, erased {} columns, expanded {} walls",
        stats.tiles_trimmed, stats.columns_erased, stats.walls_expanded
    );

    stats.open_tiles = grid.open_tile_count();
    stats.generation_time = start.elapsed().as_secs_f64();
    info!(
        "Generated {}x{} dungeon: {} rooms, {} maze regions, {} open tiles in {:.3}s",
        config.width,
        config.height,
        stats.room_count,
        stats.maze_region_count,
        stats.open_tiles,
        stats.generation_time
    );

    Ok((grid, rooms, stats))
}
