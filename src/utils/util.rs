//! # Utility Module
//!
//! Small numeric helpers shared by the generation stages.
//!
//! ## Example Function: `round_down_to_odd`
//!
//! Cells sit on odd coordinates, so anchors and room extents drawn at random are
//! snapped down to the nearest odd value before they touch the grid.

/// Rounds a value down to the nearest odd number. Odd values are returned unchanged.
///
/// # Examples
///
/// ```
/// use rust_delve::utils::util::round_down_to_odd;
///
/// assert_eq!(round_down_to_odd(5), 5);
/// assert_eq!(round_down_to_odd(6), 5);
/// assert_eq!(round_down_to_odd(2), 1);
/// ```
pub fn round_down_to_odd(value: i32) -> i32 {
    if value % 2 == 0 {
        value - 1
    } else {
        value
    }
}

/// Last index (exclusive) of the generation interior along an axis of length `size`.
///
/// The interior is the largest odd-aligned span that leaves a wall border on both sides.
pub fn interior_limit(size: i32) -> i32 {
    size - 2 + size % 2
}
