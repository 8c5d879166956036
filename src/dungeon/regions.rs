// src/dungeon/regions.rs

use log::{debug, warn};
use rand::Rng;

use crate::dungeon::{Grid, CONNECTOR, WALL};
use crate::utils::Point;

/// Tile whose region becomes the main region during connection.
pub const ANCHOR: Point = Point { x: 1, y: 1 };

/// Outcome of a connection pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionReport {
    /// Connectors opened to merge a region into the main one.
    pub merges: usize,
    /// Connectors opened at random on top of the merging ones.
    pub extra_connectors: usize,
}

/// Relabels every connected group of open tiles with a single id.
///
/// The first tile of each group in row-major order donates its id. Running it twice
/// changes nothing.
pub fn normalize_regions(grid: &mut Grid) {
    let interior: Vec<Point> = grid.interior().collect();
    for p in interior {
        if let Some(region) = grid.get(p).filter(|&v| v > 0) {
            grid.fill(p, region);
        }
    }
}

/// A wall that separates exactly two different regions and lies on a cell row or column.
pub fn is_connector(grid: &Grid, p: Point) -> bool {
    if grid.get(p) != Some(WALL) || grid.num_outs(p) != Some(2) {
        return false;
    }
    let mut ids = grid.open_neighbors(p).map(|(_, region)| region);
    match (ids.next(), ids.next()) {
        (Some(a), Some(b)) => a != b && p.on_cell_line(),
        _ => false,
    }
}

/// Merges every region into the one holding the anchor tile `(1, 1)`.
///
/// Each round marks the current connectors, opens one connector touching the main
/// region at random and floods the region behind it into the main id. Every other
/// candidate opens independently with probability `extra_chance`, adding loops.
/// Chances outside `[0, 1]` are clamped and NaN counts as zero.
pub fn connect_regions<R: Rng + ?Sized>(
    grid: &mut Grid,
    extra_chance: f64,
    rng: &mut R,
) -> ConnectionReport {
    let extra_chance = clamp_chance(extra_chance);
    let mut report = ConnectionReport::default();
    let main = match grid.get(ANCHOR) {
        Some(v) if v > 0 => v,
        _ => {
            warn!("Anchor tile {:?} is not open, regions left unconnected", ANCHOR);
            return report;
        }
    };

    mark_connectors(grid);
    while !is_single_region(grid, main) {
        if !connect_main_region(grid, main, extra_chance, rng, &mut report)
            && absorb_touching_regions(grid, main) == 0
        {
            warn!(
                "No connector reaches main region {}, {} regions remain",
                main,
                grid.region_ids().len()
            );
            break;
        }
        mark_connectors(grid);
    }
    clear_connectors(grid);

    debug!(
        "Connected regions into {} with {} merges and {} extra connectors",
        main, report.merges, report.extra_connectors
    );
    report
}

fn clamp_chance(chance: f64) -> f64 {
    if chance.is_nan() {
        warn!("Extra connector chance is NaN, using 0");
        0.0
    } else if !(0.0..=1.0).contains(&chance) {
        warn!("Extra connector chance {} outside [0, 1], clamping", chance);
        chance.clamp(0.0, 1.0)
    } else {
        chance
    }
}

/// Resets stale markers to wall and flags every current connector.
fn mark_connectors(grid: &mut Grid) {
    let interior: Vec<Point> = grid.interior().collect();
    for p in interior {
        if grid.get(p) == Some(CONNECTOR) {
            grid.set(p, WALL);
        }
        if is_connector(grid, p) {
            grid.set(p, CONNECTOR);
        }
    }
}

fn clear_connectors(grid: &mut Grid) {
    let interior: Vec<Point> = grid.interior().collect();
    for p in interior {
        if grid.get(p) == Some(CONNECTOR) {
            grid.set(p, WALL);
        }
    }
}

fn is_single_region(grid: &Grid, main: i32) -> bool {
    grid.tiles().iter().all(|&v| v <= 0 || v == main)
}

/// Opens one marked connector next to the main region. Returns false when none exists.
fn connect_main_region<R: Rng + ?Sized>(
    grid: &mut Grid,
    main: i32,
    extra_chance: f64,
    rng: &mut R,
    report: &mut ConnectionReport,
) -> bool {
    let mut candidates = Vec::new();
    for p in grid.interior() {
        if grid.get(p) != Some(main) {
            continue;
        }
        for n in p.neighbors() {
            if grid.get(n) == Some(CONNECTOR) {
                candidates.push(n);
            }
        }
    }
    if candidates.is_empty() {
        return false;
    }

    for &c in &candidates {
        if rng.random_bool(extra_chance) {
            grid.set(c, main);
            report.extra_connectors += 1;
        }
    }

    let chosen = candidates[rng.random_range(0..candidates.len())];
    grid.set(chosen, main);
    grid.fill(chosen, main);
    report.merges += 1;
    true
}

// Regions already touching the main one, only reachable through an extra connector.
fn absorb_touching_regions(grid: &mut Grid, main: i32) -> usize {
    let mut absorbed = 0;
    let interior: Vec<Point> = grid.interior().collect();
    for p in interior {
        if grid.get(p) != Some(main) {
            continue;
        }
        let touches_other = grid.open_neighbors(p).any(|(_, region)| region != main);
        if touches_other {
            absorbed += grid.fill(p, main);
        }
    }
    absorbed
}
