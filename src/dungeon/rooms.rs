// src/dungeon/rooms.rs

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dungeon::{Grid, WALL};
use crate::utils::util::round_down_to_odd;
use crate::utils::Point;

/// A rectangle stamped onto the grid as its own region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub region: i32,
}

impl Room {
    pub fn tiles(&self) -> impl Iterator<Item = Point> {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        (y..y + h).flat_map(move |ty| (x..x + w).map(move |tx| Point::new(tx, ty)))
    }

    pub fn intersects(&self, other: &Room) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Tries to stamp up to `count` non-overlapping rooms onto `grid`.
///
/// At most `count * attempts_per_room` placements are attempted. Anchors and extents
/// are snapped to odd values so every room lines up with the cell lattice. Rooms get
/// sequential region ids starting at 1. Falling short of `count` is not an error.
pub fn place_rooms<R: Rng + ?Sized>(
    grid: &mut Grid,
    count: usize,
    min_size: i32,
    max_size: i32,
    attempts_per_room: usize,
    rng: &mut R,
) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::with_capacity(count);
    let attempts = count.saturating_mul(attempts_per_room);

    for _ in 0..attempts {
        if rooms.len() >= count {
            break;
        }

        let x = round_down_to_odd(rng.random_range(1..=grid.xsize() - 2));
        let y = round_down_to_odd(rng.random_range(1..=grid.ysize() - 2));
        let width = round_down_to_odd(random_extent(min_size, max_size, rng));
        let height = round_down_to_odd(random_extent(min_size, max_size, rng));

        let candidate = Room {
            x,
            y,
            width,
            height,
            region: rooms.len() as i32 + 1,
        };

        let fits = candidate
            .tiles()
            .all(|p| grid.in_bounds(p) && grid.get(p) == Some(WALL));
        if fits {
            for p in candidate.tiles() {
                grid.set(p, candidate.region);
            }
            rooms.push(candidate);
        }
    }

    if rooms.len() < count {
        debug!(
            "Placed {} of {} requested rooms after {} attempts",
            rooms.len(),
            count,
            attempts
        );
    }
    rooms
}

// Upper bound is exclusive unless the range is a single value.
fn random_extent<R: Rng + ?Sized>(min_size: i32, max_size: i32, rng: &mut R) -> i32 {
    if max_size > min_size {
        rng.random_range(min_size..max_size)
    } else {
        min_size
    }
}
