//! Person model.
//!
//! A person waits at a fixed grid location and must be delivered to a
//! hospital no later than their deadline (`rescue_time`).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Located, Minutes, Point};

/// 1-based person identity, assigned in instance file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub usize);

impl PersonId {
    /// Zero-based position in the instance's person list.
    ///
    /// Returns `None` for id 0.
    #[inline]
    pub fn index(self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person waiting for rescue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Identity.
    pub id: PersonId,
    /// Pickup location.
    pub location: Point,
    /// Latest finish time (minutes) at which the rescue still counts.
    pub rescue_time: Minutes,
    /// Whether an accepted trip has already delivered this person.
    pub rescued: bool,
}

impl Person {
    /// Creates a person who has not been rescued yet.
    pub fn new(id: PersonId, x: i64, y: i64, rescue_time: Minutes) -> Self {
        Self {
            id,
            location: Point::new(x, y),
            rescue_time,
            rescued: false,
        }
    }

    /// Whether a trip finishing at `finish_time` is still in time for this person.
    #[inline]
    pub fn can_make_it(&self, finish_time: Minutes) -> bool {
        finish_time <= self.rescue_time
    }

    /// Whether the given reference `(x, y, rescue_time)` describes this person.
    pub fn matches(&self, x: i64, y: i64, rescue_time: Minutes) -> bool {
        self.location == Point::new(x, y) && self.rescue_time == rescue_time
    }
}

impl Located for Person {
    fn location(&self) -> Point {
        self.location
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ({}, {}, {})",
            self.id, self.location.x, self.location.y, self.rescue_time
        )
    }
}
