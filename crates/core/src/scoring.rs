//! Scoring module - placement and line-clear points
//!
//! Placing a piece scores one point per occupied cell. Clearing lines in a
//! single placement scores an exponential bonus: the first line is worth 10,
//! the second 20, the third 40, and so on (rows and columns both count).

use crate::shapes::Shape;
use gridfall_types::LINE_CLEAR_BASE_POINTS;

/// Points for committing a shape (one per occupied cell)
pub fn placement_points(shape: &Shape) -> u32 {
    shape.block_count()
}

/// Bonus for clearing `lines` rows/columns in one placement
///
/// Sum of `10 * 2^i` for each cleared line: 10, 30, 70, 150, ...
pub fn line_clear_points(lines: u32) -> u32 {
    (0..lines)
        .map(|i| LINE_CLEAR_BASE_POINTS << i)
        .sum()
}
