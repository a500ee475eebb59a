//! Grid geometry.
//!
//! All locations live on an integer grid and ambulances move along grid
//! lines, so travel time between two points is their Manhattan distance
//! (one minute per unit step).
//!
//! # Reference
//! Larson & Odoni (1981), "Urban Operations Research", Ch. 3.4 (Rectilinear Travel)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time unit used throughout the crate (minutes since the start of the rescue).
pub type Minutes = i64;

/// An integer grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point.
    ///
    /// Saturates at `Minutes::MAX` instead of overflowing.
    #[inline]
    pub fn manhattan(&self, other: &Point) -> Minutes {
        let d = self
            .x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y));
        Minutes::try_from(d).unwrap_or(Minutes::MAX)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Anything with a fixed position on the grid.
pub trait Located {
    /// The entity's location.
    fn location(&self) -> Point;
}

impl Located for Point {
    fn location(&self) -> Point {
        *self
    }
}

/// Travel time between two located entities.
///
/// `|a.x - b.x| + |a.y - b.y|`
///
/// # Example
/// ```
/// use u_rescue::models::{travel_time, Point};
///
/// assert_eq!(travel_time(&Point::new(0, 0), &Point::new(3, -4)), 7);
/// ```
#[inline]
pub fn travel_time<A: Located + ?Sized, B: Located + ?Sized>(a: &A, b: &B) -> Minutes {
    a.location().manhattan(&b.location())
}
