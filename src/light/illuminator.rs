// src/light/illuminator.rs

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::dungeon::grid::checked_area;
use crate::dungeon::Grid;
use crate::light::LightSource;
use crate::utils::Point;
use crate::{DungeonError, DungeonResult};

/// Per-tile light levels for a grid of the same size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LightGridData")]
pub struct LightGrid {
    xsize: i32,
    ysize: i32,
    levels: Vec<i32>,
}

#[derive(Deserialize)]
struct LightGridData {
    xsize: i32,
    ysize: i32,
    levels: Vec<i32>,
}

impl TryFrom<LightGridData> for LightGrid {
    type Error = DungeonError;

    fn try_from(data: LightGridData) -> DungeonResult<Self> {
        LightGrid::from_levels(data.xsize, data.ysize, data.levels)
    }
}

impl LightGrid {
    fn filled(grid: &Grid, baseline: i32) -> Self {
        LightGrid {
            xsize: grid.xsize(),
            ysize: grid.ysize(),
            levels: vec![baseline; grid.tiles().len()],
        }
    }

    /// Build a light grid from a row-major level buffer.
    pub fn from_levels(xsize: i32, ysize: i32, levels: Vec<i32>) -> DungeonResult<Self> {
        let expected = checked_area(xsize, ysize)?;
        if levels.len() != expected {
            return Err(DungeonError::InvalidParameter(format!(
                "level buffer holds {} values, a {}x{} light grid needs {}",
                levels.len(),
                xsize,
                ysize,
                expected
            )));
        }
        Ok(LightGrid {
            xsize,
            ysize,
            levels,
        })
    }

    pub fn xsize(&self) -> i32 {
        self.xsize
    }

    pub fn ysize(&self) -> i32 {
        self.ysize
    }

    /// Row-major view of every level.
    pub fn levels(&self) -> &[i32] {
        &self.levels
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.x < self.xsize && p.y >= 0 && p.y < self.ysize {
            Some((p.y * self.xsize + p.x) as usize)
        } else {
            None
        }
    }

    pub fn get(&self, p: Point) -> Option<i32> {
        self.index(p).map(|i| self.levels[i])
    }

    pub fn level(&self, x: i32, y: i32) -> Option<i32> {
        self.get(Point::new(x, y))
    }

    pub fn max_level(&self) -> Option<i32> {
        self.levels.iter().copied().max()
    }

    // Raises the level at `p` to `value`. Returns true if it changed.
    fn raise(&mut self, p: Point, value: i32) -> bool {
        match self.index(p) {
            Some(i) if self.levels[i] < value => {
                self.levels[i] = value;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for LightGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.levels.chunks(self.xsize as usize) {
            for &level in row {
                let c = match level {
                    l if l < 0 => '-',
                    l => std::char::from_digit(l as u32, 36).unwrap_or('*'),
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Computes light levels over `grid` from `sources`, starting every tile at `baseline`.
///
/// Light loses one level per step through open tiles. Walls next to a lit tile take
/// that tile's level but pass nothing on. Overlapping sources keep the brighter value.
/// Sources outside the generation interior are skipped.
pub fn illuminate(grid: &Grid, sources: &[LightSource], baseline: i32) -> DungeonResult<LightGrid> {
    if let Some(bad) = sources.iter().find(|s| s.intensity < 0) {
        return Err(DungeonError::InvalidParameter(format!(
            "light source at ({}, {}) has negative intensity {}",
            bad.x, bad.y, bad.intensity
        )));
    }

    let mut light = LightGrid::filled(grid, baseline);
    let mut lit = 0;
    for source in sources {
        let origin = source.position();
        if !grid.in_bounds(origin) {
            trace!("Ignoring light source outside the interior: {:?}", source);
            continue;
        }
        propagate(grid, &mut light, origin, source.intensity);
        lit += 1;
    }

    debug!(
        "Illuminated {}x{} grid from {} of {} sources",
        grid.xsize(),
        grid.ysize(),
        lit,
        sources.len()
    );
    Ok(light)
}

fn propagate(grid: &Grid, light: &mut LightGrid, origin: Point, intensity: i32) {
    light.raise(origin, intensity);
    let mut stack = vec![(origin, intensity)];

    while let Some((p, level)) = stack.pop() {
        for n in p.neighbors() {
            match grid.get(n) {
                Some(v) if v > 0 => {
                    if light.raise(n, level - 1) {
                        stack.push((n, level - 1));
                    }
                }
                Some(_) => {
                    light.raise(n, level);
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        #[rustfmt::skip]
        let tiles = vec![
            0, 0, 0, 0, 0, 0, 0,
            0, 1, 1, 1, 1, 1, 0,
            0, 0, 0, 0, 0, 0, 0,
        ];
        Grid::from_tiles(7, 3, tiles).unwrap()
    }

    #[test]
    fn test_corridor_decay() {
        let light = illuminate(&corridor(), &[LightSource::new(1, 1, 3)], 0).unwrap();
        let row: Vec<i32> = (1..6).map(|x| light.level(x, 1).unwrap()).collect();
        assert_eq!(row, vec![3, 2, 1, 0, 0]);
    }

    #[test]
    fn test_walls_catch_light_without_passing_it() {
        let light = illuminate(&corridor(), &[LightSource::new(1, 1, 3)], 0).unwrap();
        assert_eq!(light.level(1, 0), Some(3));
        assert_eq!(light.level(0, 1), Some(3));
        assert_eq!(light.level(2, 2), Some(2));
        assert_eq!(light.level(3, 0), Some(1));
        assert_eq!(light.level(4, 0), Some(0));
        assert_eq!(light.level(6, 1), Some(0));
    }

    #[test]
    fn test_wall_blocks_propagation() {
        #[rustfmt::skip]
        let tiles = vec![
            0, 0, 0, 0, 0, 0, 0,
            0, 1, 1, 0, 1, 1, 0,
            0, 0, 0, 0, 0, 0, 0,
        ];
        let grid = Grid::from_tiles(7, 3, tiles).unwrap();
        let light = illuminate(&grid, &[LightSource::new(1, 1, 5)], 0).unwrap();
        assert_eq!(light.level(3, 1), Some(4));
        assert_eq!(light.level(4, 1), Some(0));
        assert_eq!(light.level(5, 1), Some(0));
    }

    #[test]
    fn test_overlapping_sources_take_maximum() {
        let sources = [LightSource::new(1, 1, 2), LightSource::new(5, 1, 4)];
        let light = illuminate(&corridor(), &sources, 0).unwrap();
        let row: Vec<i32> = (1..6).map(|x| light.level(x, 1).unwrap()).collect();
        assert_eq!(row, vec![2, 1, 2, 3, 4]);

        // A dim source does not darken a brighter tile.
        let reversed = [sources[1], sources[0]];
        assert_eq!(illuminate(&corridor(), &reversed, 0).unwrap(), light);
    }

    #[test]
    fn test_out_of_bounds_source_ignored() {
        let sources = [LightSource::new(0, 0, 9), LightSource::new(6, 1, 9)];
        let light = illuminate(&corridor(), &sources, 2).unwrap();
        assert!(light.levels().iter().all(|&l| l == 2));
    }

    #[test]
    fn test_baseline_is_floor() {
        let light = illuminate(&corridor(), &[LightSource::new(1, 1, 3)], 2).unwrap();
        let row: Vec<i32> = (1..6).map(|x| light.level(x, 1).unwrap()).collect();
        assert_eq!(row, vec![3, 2, 2, 2, 2]);
    }

    #[test]
    fn test_negative_intensity_rejected() {
        let result = illuminate(&corridor(), &[LightSource::new(1, 1, -1)], 0);
        assert!(matches!(result, Err(DungeonError::InvalidParameter(_))));
    }

    #[test]
    fn test_room_uses_shortest_path() {
        let grid = Grid::from_tiles(5, 5, {
            let mut t = vec![0; 25];
            for y in 1..4 {
                for x in 1..4 {
                    t[y * 5 + x] = 1;
                }
            }
            t
        })
        .unwrap();
        let origin = Point::new(1, 1);
        let light = illuminate(&grid, &[LightSource::new(1, 1, 6)], 0).unwrap();
        for y in 1..4 {
            for x in 1..4 {
                let p = Point::new(x, y);
                assert_eq!(light.get(p), Some(6 - origin.manhattan_distance(&p)));
            }
        }
    }

    #[test]
    fn test_json_round_trip() {
        let light = illuminate(&corridor(), &[LightSource::new(1, 1, 3)], 0).unwrap();
        let json = serde_json::to_string(&light).unwrap();
        let back: LightGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, light);
    }

    #[test]
    fn test_json_rejects_mismatched_levels() {
        let json = r#"{ "xsize": 3, "ysize": 3, "levels": [1, 2] }"#;
        assert!(serde_json::from_str::<LightGrid>(json).is_err());
        assert!(LightGrid::from_levels(3, 3, vec![0; 9]).is_ok());
    }

    #[test]
    fn test_display() {
        let light = illuminate(&corridor(), &[LightSource::new(1, 1, 3)], 0).unwrap();
        assert_eq!(light.to_string(), "0321000\n3321000\n0321000\n");
    }
}
