// src/dungeon/maze.rs

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dungeon::Grid;
use crate::utils::{Direction, Point};

/// Fills every untouched cell with randomly carved passages.
///
/// Cells are visited row by row; a cell with no open neighbour seeds a new region,
/// numbered upward from `first_region`. Returns the next unused region id.
pub fn carve_maze<R: Rng + ?Sized>(grid: &mut Grid, first_region: i32, rng: &mut R) -> i32 {
    let mut region = first_region;
    let seeds: Vec<Point> = grid.cells().collect();

    for cell in seeds {
        if grid.num_outs(cell) == Some(0) {
            grid.set(cell, region);
            tunnel(grid, cell, region, rng);
            region += 1;
        }
    }

    debug!(
        "Carved {} maze regions starting at id {}",
        region - first_region,
        first_region
    );
    region
}

/// Walks from `start`, two tiles at a time, until every direction is blocked.
///
/// Each step tries the four directions in random order and takes the first one whose
/// target cell is inside the interior, touches at most one open tile, and does not
/// already belong to `region`.
fn tunnel<R: Rng + ?Sized>(grid: &mut Grid, start: Point, region: i32, rng: &mut R) {
    if !grid.in_bounds(start) {
        return;
    }
    let mut cell = start;

    'walk: loop {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);

        for direction in directions {
            let target = cell.step(direction, 2);
            let open_enough = matches!(grid.num_outs(target), Some(n) if n <= 1);
            if open_enough && grid.get(target) != Some(region) {
                grid.set(cell.step(direction, 1), region);
                grid.set(target, region);
                cell = target;
                continue 'walk;
            }
        }
        break;
    }
}
