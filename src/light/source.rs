// src/light/source.rs
use serde::{Deserialize, Serialize};

use crate::utils::Point;

/// A point light: position plus how many steps its light carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSource {
    pub x: i32,
    pub y: i32,
    pub intensity: i32,
}

impl LightSource {
    pub fn new(x: i32, y: i32, intensity: i32) -> Self {
        Self { x, y, intensity }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
