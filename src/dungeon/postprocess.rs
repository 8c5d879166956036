// src/dungeon/postprocess.rs
//! Passes that reshape a connected dungeon: dead-end trimming, column erasure and
//! wall expansion.

use log::debug;

use crate::dungeon::regions::ANCHOR;
use crate::dungeon::{Grid, WALL};
use crate::utils::Point;

/// Walls every dead end, `passes` times. Each pass decides on a snapshot of the grid,
/// so a pass shortens every dead-end chain by exactly one tile. The anchor tile is
/// never trimmed. Returns the number of tiles walled.
pub fn trim(grid: &mut Grid, passes: usize) -> usize {
    let mut trimmed = 0;
    for pass in 0..passes {
        let dead_ends: Vec<Point> = grid
            .interior()
            .filter(|&p| p != ANCHOR && grid.is_open(p) && grid.num_outs(p) == Some(1))
            .collect();
        if dead_ends.is_empty() {
            debug!("Trim stopped early after {} passes", pass);
            break;
        }
        for &p in &dead_ends {
            grid.set(p, WALL);
        }
        trimmed += dead_ends.len();
    }
    trimmed
}

/// Opens every wall whose four neighbours are all open, merging it into their region.
///
/// Walls are handled as the scan reaches them, so an opened column counts as open for
/// the walls after it. Returns the number of walls opened.
pub fn erase_columns(grid: &mut Grid) -> usize {
    let mut erased = 0;
    let interior: Vec<Point> = grid.interior().collect();
    for p in interior {
        if grid.get(p) == Some(WALL) && grid.num_outs(p) == Some(4) {
            open_into_neighbors(grid, p);
            erased += 1;
        }
    }
    erased
}

/// Opens walls with three or more open neighbours, `passes` times, on a per-pass
/// snapshot. Returns the number of walls opened.
pub fn expand(grid: &mut Grid, passes: usize) -> usize {
    let mut opened = 0;
    for pass in 0..passes {
        let walls: Vec<Point> = grid
            .interior()
            .filter(|&p| grid.get(p) == Some(WALL) && matches!(grid.num_outs(p), Some(n) if n >= 3))
            .collect();
        if walls.is_empty() {
            debug!("Expand stopped early after {} passes", pass);
            break;
        }
        for &p in &walls {
            open_into_neighbors(grid, p);
        }
        opened += walls.len();
    }
    opened
}

// Takes the id of the first open neighbour and floods it back through the others.
fn open_into_neighbors(grid: &mut Grid, p: Point) {
    let region = grid.open_neighbors(p).map(|(_, region)| region).next();
    if let Some(region) = region {
        grid.set(p, region);
        grid.fill(p, region);
    }
}
