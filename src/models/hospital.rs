//! Hospital and ambulance models.
//!
//! A hospital owns a [`Fleet`] of ambulances. Each ambulance carries a
//! busy-time: the minutes it has already committed to earlier trips. The
//! fleet keeps its ambulances ordered by busy-time so the dispatcher can scan
//! them busiest-first or pick the idlest one without re-sorting after every
//! trip.
//!
//! Hospital coordinates are not part of the problem instance. They start
//! unset and are filled in by the plan's declaration lines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{Minutes, Point};

/// 1-based hospital identity, assigned in instance file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HospitalId(pub usize);

impl HospitalId {
    /// Zero-based position in the instance's hospital list.
    ///
    /// Returns `None` for id 0.
    #[inline]
    pub fn index(self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based ambulance identity, assigned across all hospitals in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AmbulanceId(pub usize);

impl fmt::Display for AmbulanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ambulance and the time it has already spent on accepted trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambulance {
    /// Identity.
    pub id: AmbulanceId,
    /// Cumulative minutes committed so far.
    pub busy_time: Minutes,
}

impl Ambulance {
    /// Creates an idle ambulance.
    pub fn new(id: AmbulanceId) -> Self {
        Self { id, busy_time: 0 }
    }

    /// Time at which this ambulance would finish a trip of `elapsed` minutes.
    ///
    /// Saturates at `Minutes::MAX`, which no finite deadline accepts.
    #[inline]
    pub fn finish_time(&self, elapsed: Minutes) -> Minutes {
        self.busy_time.saturating_add(elapsed)
    }
}

/// Ambulances stationed at one hospital, ordered by `(busy_time, id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    entries: BTreeSet<(Minutes, AmbulanceId)>,
}

impl Fleet {
    /// Creates an empty fleet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stations an ambulance here.
    pub fn insert(&mut self, ambulance: Ambulance) {
        self.entries.insert((ambulance.busy_time, ambulance.id));
    }

    /// Removes an ambulance. Returns `false` if it was not stationed here.
    pub fn remove(&mut self, ambulance: &Ambulance) -> bool {
        self.entries.remove(&(ambulance.busy_time, ambulance.id))
    }

    /// Whether the ambulance is stationed here with exactly this busy-time.
    pub fn contains(&self, ambulance: &Ambulance) -> bool {
        self.entries.contains(&(ambulance.busy_time, ambulance.id))
    }

    /// Advances a stationed ambulance by `elapsed` minutes.
    ///
    /// Returns the updated ambulance, or `None` if it is not part of this fleet.
    pub fn advance(&mut self, ambulance: &Ambulance, elapsed: Minutes) -> Option<Ambulance> {
        if !self.remove(ambulance) {
            return None;
        }
        let updated = Ambulance {
            id: ambulance.id,
            busy_time: ambulance.finish_time(elapsed),
        };
        self.insert(updated);
        Some(updated)
    }

    /// Ambulances in descending busy-time order.
    pub fn busiest_first(&self) -> impl Iterator<Item = Ambulance> + '_ {
        self.entries.iter().rev().map(to_ambulance)
    }

    /// Ambulances in ascending busy-time order.
    pub fn idlest_first(&self) -> impl Iterator<Item = Ambulance> + '_ {
        self.entries.iter().map(to_ambulance)
    }

    /// The ambulance with the smallest busy-time (lowest id on ties).
    pub fn idlest(&self) -> Option<Ambulance> {
        self.entries.first().map(to_ambulance)
    }

    /// Busy-times, largest first.
    pub fn busy_times(&self) -> Vec<Minutes> {
        self.busiest_first().map(|a| a.busy_time).collect()
    }

    /// Number of stationed ambulances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no ambulance is stationed here.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn to_ambulance(&(busy_time, id): &(Minutes, AmbulanceId)) -> Ambulance {
    Ambulance { id, busy_time }
}

/// A hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    /// Identity.
    pub id: HospitalId,
    /// Grid location, unknown until declared by the plan.
    pub location: Option<Point>,
    /// Number of ambulances the instance assigns to this hospital.
    pub ambulance_count: usize,
    /// Ambulances currently stationed here.
    pub fleet: Fleet,
}

impl Hospital {
    /// Creates a hospital with no location and an empty fleet.
    pub fn new(id: HospitalId, ambulance_count: usize) -> Self {
        Self {
            id,
            location: None,
            ambulance_count,
            fleet: Fleet::new(),
        }
    }

    /// Sets the location.
    pub fn with_location(mut self, x: i64, y: i64) -> Self {
        self.location = Some(Point::new(x, y));
        self
    }

    /// Stations an idle ambulance at this hospital.
    pub fn with_ambulance(mut self, id: AmbulanceId) -> Self {
        self.fleet.insert(Ambulance::new(id));
        self
    }

    /// Whether the given reference `(x, y)` describes this hospital.
    ///
    /// A hospital without a declared location matches nothing.
    pub fn matches(&self, x: i64, y: i64) -> bool {
        self.location == Some(Point::new(x, y))
    }
}

impl fmt::Display for Hospital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(p) => write!(f, "{}: ({},{})", self.id, p.x, p.y),
            None => write!(f, "{}: (unset)", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fleet() -> Fleet {
        let mut fleet = Fleet::new();
        fleet.insert(Ambulance {
            id: AmbulanceId(1),
            busy_time: 5,
        });
        fleet.insert(Ambulance {
            id: AmbulanceId(2),
            busy_time: 0,
        });
        fleet.insert(Ambulance {
            id: AmbulanceId(3),
            busy_time: 12,
        });
        fleet
    }

    #[test]
    fn test_fleet_ordering() {
        let fleet = sample_fleet();
        assert_eq!(fleet.busy_times(), vec![12, 5, 0]);
        let ids: Vec<_> = fleet.idlest_first().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(fleet.idlest().map(|a| a.id), Some(AmbulanceId(2)));
    }

    #[test]
    fn test_fleet_advance_keeps_order() {
        let mut fleet = sample_fleet();
        let idle = fleet.idlest().unwrap();
        let updated = fleet.advance(&idle, 20).unwrap();
        assert_eq!(updated.busy_time, 20);
        assert_eq!(fleet.busy_times(), vec![20, 12, 5]);
        assert_eq!(fleet.len(), 3);
    }

    #[test]
    fn test_fleet_advance_unknown_ambulance() {
        let mut fleet = sample_fleet();
        let stranger = Ambulance {
            id: AmbulanceId(9),
            busy_time: 0,
        };
        assert!(fleet.advance(&stranger, 4).is_none());
        assert_eq!(fleet.busy_times(), vec![12, 5, 0]);
    }

    #[test]
    fn test_fleet_equal_busy_times() {
        let mut fleet = Fleet::new();
        fleet.insert(Ambulance::new(AmbulanceId(4)));
        fleet.insert(Ambulance::new(AmbulanceId(2)));
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet.idlest().map(|a| a.id), Some(AmbulanceId(2)));
    }

    #[test]
    fn test_fleet_remove() {
        let mut fleet = sample_fleet();
        let a = Ambulance {
            id: AmbulanceId(1),
            busy_time: 5,
        };
        assert!(fleet.contains(&a));
        assert!(fleet.remove(&a));
        assert!(!fleet.remove(&a));
        assert_eq!(fleet.len(), 2);
    }

    #[test]
    fn test_finish_time_saturates() {
        let a = Ambulance {
            id: AmbulanceId(1),
            busy_time: Minutes::MAX - 2,
        };
        assert_eq!(a.finish_time(1), Minutes::MAX - 1);
        assert_eq!(a.finish_time(10), Minutes::MAX);
    }

    #[test]
    fn test_hospital_builder() {
        let h = Hospital::new(HospitalId(2), 2)
            .with_ambulance(AmbulanceId(3))
            .with_ambulance(AmbulanceId(4));
        assert_eq!(h.location, None);
        assert!(!h.matches(0, 0));
        assert_eq!(h.fleet.len(), 2);
        assert_eq!(h.to_string(), "2: (unset)");

        let h = h.with_location(6, 1);
        assert!(h.matches(6, 1));
        assert_eq!(h.to_string(), "2: (6,1)");
    }
}
