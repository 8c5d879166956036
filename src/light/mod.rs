// src/light/mod.rs
pub mod illuminator;
pub mod source;

pub use illuminator::{illuminate, LightGrid};
pub use source::LightSource;
