// src/dungeon/grid.rs

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dungeon::{MIN_GRID_SIZE, WALL};
use crate::utils::util::interior_limit;
use crate::utils::Point;
use crate::{DungeonError, DungeonResult};

/// The dungeon layout: a fixed `xsize × ysize` array of region ids.
///
/// `0` is wall, any positive value is the id of the region the tile belongs to.
/// Tiles are stored row by row (`index = y * xsize + x`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    xsize: i32,
    ysize: i32,
    tiles: Vec<i32>,
}

// Unchecked wire form; deserialized grids go through `Grid::from_tiles`.
#[derive(Deserialize)]
struct GridData {
    xsize: i32,
    ysize: i32,
    tiles: Vec<i32>,
}

impl TryFrom<GridData> for Grid {
    type Error = DungeonError;

    fn try_from(data: GridData) -> DungeonResult<Self> {
        Grid::from_tiles(data.xsize, data.ysize, data.tiles)
    }
}

/// Tile count of an `xsize × ysize` grid, rejecting sides below the minimum and
/// areas that do not fit in memory indices.
pub(crate) fn checked_area(xsize: i32, ysize: i32) -> DungeonResult<usize> {
    if xsize < MIN_GRID_SIZE || ysize < MIN_GRID_SIZE {
        return Err(DungeonError::InvalidParameter(format!(
            "grid {}x{} has no odd-aligned interior (minimum {}x{})",
            xsize, ysize, MIN_GRID_SIZE, MIN_GRID_SIZE
        )));
    }
    xsize
        .checked_mul(ysize)
        .map(|area| area as usize)
        .ok_or_else(|| DungeonError::InvalidParameter(format!("grid {}x{} is too large", xsize, ysize)))
}

impl Grid {
    /// Create an all-wall grid.
    pub fn new(xsize: i32, ysize: i32) -> DungeonResult<Self> {
        let area = checked_area(xsize, ysize)?;
        Ok(Grid {
            xsize,
            ysize,
            tiles: vec![WALL; area],
        })
    }

    /// Build a grid from a row-major tile buffer.
    pub fn from_tiles(xsize: i32, ysize: i32, tiles: Vec<i32>) -> DungeonResult<Self> {
        let expected = checked_area(xsize, ysize)?;
        if tiles.len() != expected {
            return Err(DungeonError::InvalidParameter(format!(
                "tile buffer holds {} values, a {}x{} grid needs {}",
                tiles.len(),
                xsize,
                ysize,
                expected
            )));
        }
        Ok(Grid {
            xsize,
            ysize,
            tiles,
        })
    }

    pub fn xsize(&self) -> i32 {
        self.xsize
    }

    pub fn ysize(&self) -> i32 {
        self.ysize
    }

    /// Row-major view of every tile.
    pub fn tiles(&self) -> &[i32] {
        &self.tiles
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.x < self.xsize && p.y >= 0 && p.y < self.ysize {
            Some((p.y * self.xsize + p.x) as usize)
        } else {
            None
        }
    }

    /// Tile value at `p`, or `None` outside the array.
    pub fn get(&self, p: Point) -> Option<i32> {
        self.index(p).map(|i| self.tiles[i])
    }

    /// Tile value at `(x, y)`, or `None` outside the array.
    pub fn tile(&self, x: i32, y: i32) -> Option<i32> {
        self.get(Point::new(x, y))
    }

    /// Writes outside the array are ignored.
    pub fn set(&mut self, p: Point, value: i32) {
        if let Some(i) = self.index(p) {
            self.tiles[i] = value;
        }
    }

    /// Whether `p` lies inside the generation interior, leaving a guaranteed wall border.
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 1 && p.y >= 1 && p.x < interior_limit(self.xsize) && p.y < interior_limit(self.ysize)
    }

    pub fn is_open(&self, p: Point) -> bool {
        matches!(self.get(p), Some(v) if v > 0)
    }

    /// Number of open in-bounds cardinal neighbours of `p`, or `None` when `p` itself is
    /// outside the generation interior.
    pub fn num_outs(&self, p: Point) -> Option<usize> {
        if !self.in_bounds(p) {
            return None;
        }
        Some(self.open_neighbors(p).count())
    }

    /// Open in-bounds cardinal neighbours of `p` with their region ids.
    pub fn open_neighbors(&self, p: Point) -> impl Iterator<Item = (Point, i32)> + '_ {
        p.neighbors().into_iter().filter_map(move |n| {
            if !self.in_bounds(n) {
                return None;
            }
            match self.get(n) {
                Some(v) if v > 0 => Some((n, v)),
                _ => None,
            }
        })
    }

    /// Every in-bounds coordinate, row by row.
    pub fn interior(&self) -> impl Iterator<Item = Point> {
        let (xmax, ymax) = (interior_limit(self.xsize), interior_limit(self.ysize));
        (1..ymax).flat_map(move |y| (1..xmax).map(move |x| Point::new(x, y)))
    }

    /// Every in-bounds coordinate with both axes odd, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        let (xmax, ymax) = (interior_limit(self.xsize), interior_limit(self.ysize));
        (1..ymax)
            .step_by(2)
            .flat_map(move |y| (1..xmax).step_by(2).map(move |x| Point::new(x, y)))
    }

    /// Floods `region` outward from `start` through every open tile that does not already
    /// carry it. `start` itself is left untouched. Returns the number of tiles relabelled.
    pub fn fill(&mut self, start: Point, region: i32) -> usize {
        let mut stack = vec![start];
        let mut relabelled = 0;
        while let Some(p) = stack.pop() {
            for n in p.neighbors() {
                if matches!(self.get(n), Some(v) if v > 0 && v != region) {
                    self.set(n, region);
                    relabelled += 1;
                    stack.push(n);
                }
            }
        }
        relabelled
    }

    /// Distinct region ids present among open tiles.
    pub fn region_ids(&self) -> BTreeSet<i32> {
        self.tiles.iter().copied().filter(|&v| v > 0).collect()
    }

    pub fn open_tile_count(&self) -> usize {
        self.tiles.iter().filter(|&&v| v > 0).count()
    }

    /// Number of open tiles reachable from `start` through open cardinal moves,
    /// `start` included. Zero when `start` is a wall.
    pub fn reachable_count(&self, start: Point) -> usize {
        if !self.is_open(start) {
            return 0;
        }
        let mut seen = vec![false; self.tiles.len()];
        let mut stack = vec![start];
        let mut count = 0;
        if let Some(i) = self.index(start) {
            seen[i] = true;
        }
        while let Some(p) = stack.pop() {
            count += 1;
            for n in p.neighbors() {
                if let Some(i) = self.index(n) {
                    if !seen[i] && self.tiles[i] > 0 {
                        seen[i] = true;
                        stack.push(n);
                    }
                }
            }
        }
        count
    }

    /// True when every open tile can be reached from the anchor tile `(1, 1)`.
    pub fn is_connected(&self) -> bool {
        self.reachable_count(Point::new(1, 1)) == self.open_tile_count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.xsize as usize) {
            for &v in row {
                let c = match v {
                    WALL => '#',
                    v if v < 0 => '+',
                    _ => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        // 7x3, open from (1,1) to (5,1)
        #[rustfmt::skip]
        let tiles = vec![
            0, 0, 0, 0, 0, 0, 0,
            0, 1, 1, 1, 1, 1, 0,
            0, 0, 0, 0, 0, 0, 0,
        ];
        Grid::from_tiles(7, 3, tiles).unwrap()
    }

    #[test]
    fn test_rejects_tiny_grid() {
        assert!(matches!(
            Grid::new(2, 10),
            Err(DungeonError::InvalidParameter(_))
        ));
        assert!(Grid::new(3, 3).is_ok());
    }

    #[test]
    fn test_rejects_overflowing_dimensions() {
        assert!(matches!(
            Grid::new(70000, 70000),
            Err(DungeonError::InvalidParameter(_))
        ));
        assert!(Grid::from_tiles(i32::MAX, 3, Vec::new()).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let g = corridor();
        let json = serde_json::to_string(&g).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_json_rejects_short_buffer() {
        let json = r#"{ "xsize": 5, "ysize": 5, "tiles": [0, 0, 0] }"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        assert!(Grid::from_tiles(5, 5, vec![0; 24]).is_err());
    }

    #[test]
    fn test_in_bounds_trims_border() {
        let odd = Grid::new(21, 21).unwrap();
        assert!(odd.in_bounds(Point::new(19, 19)));
        assert!(!odd.in_bounds(Point::new(20, 1)));
        assert!(!odd.in_bounds(Point::new(0, 1)));

        let even = Grid::new(20, 20).unwrap();
        assert!(even.in_bounds(Point::new(17, 17)));
        assert!(!even.in_bounds(Point::new(18, 1)));
    }

    #[test]
    fn test_num_outs() {
        let g = corridor();
        assert_eq!(g.num_outs(Point::new(1, 1)), Some(1));
        assert_eq!(g.num_outs(Point::new(3, 1)), Some(2));
        assert_eq!(g.num_outs(Point::new(0, 1)), None);
    }

    #[test]
    fn test_fill_relabels_component() {
        let mut g = corridor();
        g.set(Point::new(4, 1), 2);
        g.set(Point::new(5, 1), 2);
        let changed = g.fill(Point::new(3, 1), 1);
        assert_eq!(changed, 2);
        assert_eq!(g.region_ids().into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_reachability() {
        let mut g = corridor();
        assert!(g.is_connected());
        g.set(Point::new(3, 1), WALL);
        assert_eq!(g.reachable_count(Point::new(1, 1)), 2);
        assert!(!g.is_connected());
    }

    #[test]
    fn test_cells_are_odd() {
        let g = Grid::new(9, 7).unwrap();
        let cells: Vec<Point> = g.cells().collect();
        assert_eq!(cells.len(), 4 * 3);
        assert!(cells.iter().all(|p| p.x % 2 == 1 && p.y % 2 == 1));
    }

    #[test]
    fn test_display() {
        let g = corridor();
        assert_eq!(g.to_string(), "#######\n#.....#\n#######\n");
    }
}
