//! Rescue engine: feasibility check, ambulance selection, commit.
//!
//! # Algorithm
//!
//! 1. Reject trips carrying more than `capacity` people (or none).
//! 2. Reject trips naming a person twice or a person already rescued.
//! 3. Elapsed time: start hospital → p₁ → … → pₙ, adding `load_minutes` per
//!    pickup, then the return leg and `unload_minutes`.
//! 4. Select an ambulance at the start hospital whose finish time
//!    (`busy_time + elapsed`) meets every deadline.
//! 5. Commit: advance the ambulance, mark people rescued.
//!
//! Steps 1–4 only read the instance; nothing changes unless all of them pass.
//!
//! # Complexity
//! O(p + h + a) per trip, where p=people on the trip, h=hospitals, a=ambulances
//! at the start hospital.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{TripVariant, ValidatorConfig};
use crate::error::{ValidationError, ValidationErrorKind};
use crate::grammar::Trip;
use crate::models::{
    travel_time, Ambulance, AmbulanceId, Hospital, HospitalId, Instance, Minutes, PersonId, Point,
};

/// A trip that passed every check but has not been applied yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescuePlan {
    /// People to mark rescued.
    pub people: Vec<PersonId>,
    /// Hospital the ambulance leaves from.
    pub start: HospitalId,
    /// Hospital the ambulance unloads at.
    pub end: HospitalId,
    /// Selected ambulance, with its busy-time before the trip.
    pub ambulance: Ambulance,
    /// Minutes the trip takes.
    pub elapsed: Minutes,
}

/// An accepted trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueOutcome {
    /// Rescued people in pickup order.
    pub people: Vec<PersonId>,
    /// Ambulance that made the trip.
    pub ambulance: AmbulanceId,
    /// Start hospital.
    pub start: HospitalId,
    /// Hospital where the trip ended.
    pub end: HospitalId,
    /// Minutes the trip took.
    pub elapsed: Minutes,
    /// Ambulance busy-time after the trip.
    pub finish_time: Minutes,
}

/// Validates and applies trips.
///
/// # Example
/// ```
/// use u_rescue::config::ValidatorConfig;
/// use u_rescue::grammar::Trip;
/// use u_rescue::models::{HospitalId, Instance, PersonId};
/// use u_rescue::rescue::RescueEngine;
///
/// let mut instance = Instance::new()
///     .with_person(0, 1, 5)
///     .with_located_hospital(0, 0, 2);
/// let engine = RescueEngine::new(ValidatorConfig::default());
///
/// let trip = Trip::new(HospitalId(1), vec![PersonId(1)]);
/// let outcome = engine.rescue(&mut instance, &trip).unwrap();
/// assert_eq!(outcome.elapsed, 4);
/// assert!(engine.rescue(&mut instance, &trip).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RescueEngine {
    config: ValidatorConfig,
}

impl RescueEngine {
    /// Creates an engine.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates `trip` and applies it to `instance`.
    ///
    /// On error the instance is left untouched.
    pub fn rescue(
        &self,
        instance: &mut Instance,
        trip: &Trip,
    ) -> Result<RescueOutcome, ValidationError> {
        let plan = self.evaluate(instance, trip)?;
        Ok(self.commit(instance, plan))
    }

    /// Runs every check without changing anything.
    ///
    /// Under `ReturnToNearest` an explicit `trip.end` is ignored; under
    /// `ExplicitEnd` it is required.
    pub fn evaluate(&self, instance: &Instance, trip: &Trip) -> Result<RescuePlan, ValidationError> {
        self.check_capacity(trip)?;
        let deadline = check_people(instance, trip)?;

        let start = instance.hospital(trip.start).ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::HospitalIdOutOfRange,
                format!("Illegal hospital id: {}", trip.start),
            )
        })?;
        let origin = located(start)?;

        let (elapsed, end) = self.elapsed_time(instance, origin, trip)?;
        let ambulance = self.select_ambulance(start, elapsed, deadline)?;

        debug!(
            "Trip from hospital {} feasible: ambulance {} busy {} + elapsed {} <= deadline {}",
            trip.start, ambulance.id, ambulance.busy_time, elapsed, deadline
        );

        Ok(RescuePlan {
            people: trip.people.clone(),
            start: trip.start,
            end,
            ambulance,
            elapsed,
        })
    }

    /// Applies a plan produced by [`evaluate`](Self::evaluate) on the same instance.
    pub fn commit(&self, instance: &mut Instance, plan: RescuePlan) -> RescueOutcome {
        let finish_time = plan.ambulance.finish_time(plan.elapsed);

        if self.config.variant.is_pooled() || plan.start == plan.end {
            if let Some(h) = instance.hospital_mut(plan.start) {
                h.fleet.advance(&plan.ambulance, plan.elapsed);
            }
        } else {
            if let Some(h) = instance.hospital_mut(plan.start) {
                h.fleet.remove(&plan.ambulance);
            }
            if let Some(h) = instance.hospital_mut(plan.end) {
                h.fleet.insert(Ambulance {
                    id: plan.ambulance.id,
                    busy_time: finish_time,
                });
            }
        }

        for &pid in &plan.people {
            if let Some(p) = instance.person_mut(pid) {
                p.rescued = true;
            }
        }

        RescueOutcome {
            people: plan.people,
            ambulance: plan.ambulance.id,
            start: plan.start,
            end: plan.end,
            elapsed: plan.elapsed,
            finish_time,
        }
    }

    /// Minutes the trip takes, and the hospital it ends at.
    ///
    /// `Σ (travel + load)` over pickups, plus the return leg, plus unloading.
    pub fn elapsed_time(
        &self,
        instance: &Instance,
        origin: Point,
        trip: &Trip,
    ) -> Result<(Minutes, HospitalId), ValidationError> {
        let mut elapsed: Minutes = 0;
        let mut current = origin;

        for &pid in &trip.people {
            let person = instance.person(pid).ok_or_else(|| person_out_of_range(pid))?;
            elapsed = travel_time(&current, person)
                .checked_add(self.config.load_minutes)
                .and_then(|leg| elapsed.checked_add(leg))
                .ok_or_else(|| trip_too_long(trip))?;
            current = person.location;
        }

        let (end, back) = match self.config.variant {
            TripVariant::ReturnToNearest => instance.nearest_hospital(current).ok_or_else(|| {
                ValidationError::new(
                    ValidationErrorKind::HospitalMismatch,
                    "No hospital location has been declared",
                )
            })?,
            TripVariant::ExplicitEnd => {
                let end_id = trip.end.ok_or_else(|| {
                    ValidationError::new(
                        ValidationErrorKind::ExpectedHospital,
                        "Trip has no end hospital",
                    )
                })?;
                let end = instance.hospital(end_id).ok_or_else(|| {
                    ValidationError::new(
                        ValidationErrorKind::HospitalIdOutOfRange,
                        format!("Illegal hospital id: {end_id}"),
                    )
                })?;
                (end_id, travel_time(&current, &located(end)?))
            }
        };

        let total = elapsed
            .checked_add(back)
            .and_then(|t| t.checked_add(self.config.unload_minutes))
            .ok_or_else(|| trip_too_long(trip))?;
        Ok((total, end))
    }

    fn check_capacity(&self, trip: &Trip) -> Result<(), ValidationError> {
        let n = trip.people.len();
        if n == 0 || n > self.config.capacity {
            return Err(ValidationError::new(
                ValidationErrorKind::CapacityExceeded,
                format!(
                    "An ambulance carries 1 to {} people at once, not {n}: {:?}",
                    self.config.capacity,
                    trip.people.iter().map(|p| p.0).collect::<Vec<_>>()
                ),
            ));
        }
        Ok(())
    }

    /// Picks the ambulance for a trip with the given earliest deadline.
    fn select_ambulance(
        &self,
        hospital: &Hospital,
        elapsed: Minutes,
        deadline: Minutes,
    ) -> Result<Ambulance, ValidationError> {
        if hospital.fleet.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::NoAmbulanceAvailable,
                format!("No ambulance is stationed at hospital {}", hospital.id),
            ));
        }

        let chosen = if self.config.variant.is_pooled() {
            // Busiest ambulance that still makes it; idle ones stay free for later trips.
            hospital
                .fleet
                .busiest_first()
                .find(|a| a.finish_time(elapsed) <= deadline)
        } else {
            hospital
                .fleet
                .idlest()
                .filter(|a| a.finish_time(elapsed) <= deadline)
        };

        chosen.ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::InfeasibleTiming,
                format!(
                    "No ambulance at hospital {} finishes a {elapsed}-minute trip by minute {deadline} (busy times: {:?})",
                    hospital.id,
                    hospital.fleet.busy_times()
                ),
            )
        })
    }
}

/// Checks that every person exists, appears once and is not yet rescued.
///
/// Returns the earliest deadline among them.
fn check_people(instance: &Instance, trip: &Trip) -> Result<Minutes, ValidationError> {
    let mut deadline = Minutes::MAX;
    let mut already = Vec::new();

    for (i, &pid) in trip.people.iter().enumerate() {
        let person = instance.person(pid).ok_or_else(|| person_out_of_range(pid))?;
        if trip.people[..i].contains(&pid) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicatePerson,
                format!("Person {pid} is listed more than once"),
            ));
        }
        if person.rescued {
            already.push(person.to_string());
        }
        deadline = deadline.min(person.rescue_time);
    }

    if !already.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::AlreadyRescued,
            format!("Person already rescued: {}", already.join(", ")),
        ));
    }
    Ok(deadline)
}

fn located(hospital: &Hospital) -> Result<Point, ValidationError> {
    hospital.location.ok_or_else(|| {
        ValidationError::new(
            ValidationErrorKind::HospitalMismatch,
            format!("Hospital {} has no declared location", hospital.id),
        )
    })
}

fn person_out_of_range(pid: PersonId) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::PersonIdOutOfRange,
        format!("Illegal person id: {pid}"),
    )
}

fn trip_too_long(trip: &Trip) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::InfeasibleTiming,
        format!(
            "Trip length is beyond any deadline: {:?}",
            trip.people.iter().map(|p| p.0).collect::<Vec<_>>()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One hospital at (0,0) with 2 ambulances; people at (0,1) and (0,3), deadline 5.
    fn small_instance() -> Instance {
        Instance::new()
            .with_person(0, 1, 5)
            .with_person(0, 3, 5)
            .with_located_hospital(0, 0, 2)
    }

    fn nearest() -> RescueEngine {
        RescueEngine::new(ValidatorConfig::default())
    }

    fn explicit() -> RescueEngine {
        RescueEngine::new(ValidatorConfig::new().with_variant(TripVariant::ExplicitEnd))
    }

    fn busy_times(instance: &Instance, id: usize) -> Vec<Minutes> {
        instance.hospital(HospitalId(id)).unwrap().fleet.busy_times()
    }

    #[test]
    fn test_single_pickup_elapsed() {
        let mut inst = small_instance();
        let out = nearest()
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![PersonId(1)]))
            .unwrap();
        // travel 1 + load 1 + return 1 + unload 1
        assert_eq!(out.elapsed, 4);
        assert_eq!(out.end, HospitalId(1));
        assert_eq!(out.finish_time, 4);
        assert!(inst.person(PersonId(1)).unwrap().rescued);
        assert_eq!(busy_times(&inst, 1), vec![4, 0]);
    }

    #[test]
    fn test_elapsed_formula_multi_stop() {
        let inst = Instance::new()
            .with_person(2, 0, 100)
            .with_person(2, 3, 100)
            .with_person(6, 3, 100)
            .with_located_hospital(0, 0, 1)
            .with_located_hospital(7, 5, 1);
        let trip = Trip::new(HospitalId(1), vec![PersonId(1), PersonId(2), PersonId(3)]);
        let (elapsed, end) = nearest()
            .elapsed_time(&inst, Point::new(0, 0), &trip)
            .unwrap();
        // (2+1) + (3+1) + (4+1) + nearest from (6,3): h2 at distance 3 + unload 1
        assert_eq!(elapsed, 16);
        assert_eq!(end, HospitalId(2));
    }

    #[test]
    fn test_elapsed_with_custom_minutes() {
        let inst = small_instance();
        let engine = RescueEngine::new(
            ValidatorConfig::new()
                .with_load_minutes(2)
                .with_unload_minutes(3),
        );
        let trip = Trip::new(HospitalId(1), vec![PersonId(1), PersonId(2)]);
        let (elapsed, _) = engine.elapsed_time(&inst, Point::new(0, 0), &trip).unwrap();
        // (1+2) + (2+2) + 3 back + 3 unload
        assert_eq!(elapsed, 13);
    }

    #[test]
    fn test_second_rescue_rejected() {
        let mut inst = small_instance();
        let engine = nearest();
        let trip = Trip::new(HospitalId(1), vec![PersonId(1)]);
        engine.rescue(&mut inst, &trip).unwrap();
        let before = inst.clone();

        let err = engine.rescue(&mut inst, &trip).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::AlreadyRescued);
        assert_eq!(inst, before);
    }

    #[test]
    fn test_capacity_exceeded_even_when_feasible() {
        let mut inst = Instance::new().with_located_hospital(0, 0, 1);
        for _ in 0..5 {
            inst = inst.with_person(0, 0, 1_000);
        }
        let trip = Trip::new(HospitalId(1), (1..=5).map(PersonId).collect());
        let err = nearest().rescue(&mut inst, &trip).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::CapacityExceeded);
        assert_eq!(inst.rescued_count(), 0);
    }

    #[test]
    fn test_four_people_accepted() {
        let mut inst = Instance::new().with_located_hospital(0, 0, 1);
        for _ in 0..4 {
            inst = inst.with_person(0, 0, 1_000);
        }
        let trip = Trip::new(HospitalId(1), (1..=4).map(PersonId).collect());
        let out = nearest().rescue(&mut inst, &trip).unwrap();
        // four loads + unload, no travel
        assert_eq!(out.elapsed, 5);
        assert_eq!(inst.rescued_count(), 4);
    }

    #[test]
    fn test_empty_trip_rejected() {
        let mut inst = small_instance();
        let err = nearest()
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![]))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::CapacityExceeded);
    }

    #[test]
    fn test_duplicate_person_rejected() {
        let mut inst = small_instance();
        let trip = Trip::new(HospitalId(1), vec![PersonId(1), PersonId(1)]);
        let err = nearest().rescue(&mut inst, &trip).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DuplicatePerson);
        assert_eq!(inst.rescued_count(), 0);
    }

    #[test]
    fn test_infeasible_on_every_ambulance() {
        let mut inst = small_instance();
        let before = busy_times(&inst, 1);
        // (1+1) + (2+1) + 3 back + 1 = 9 > 5
        let trip = Trip::new(HospitalId(1), vec![PersonId(1), PersonId(2)]);
        let err = nearest().rescue(&mut inst, &trip).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InfeasibleTiming);
        assert_eq!(busy_times(&inst, 1), before);
        assert_eq!(inst.rescued_count(), 0);
    }

    #[test]
    fn test_pooled_prefers_busiest_feasible() {
        let mut inst = Instance::new()
            .with_person(0, 1, 10)
            .with_person(0, 1, 10)
            .with_person(0, 1, 6)
            .with_located_hospital(0, 0, 3);
        let engine = nearest();

        // Each trip takes 4 minutes.
        let first = engine
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![PersonId(1)]))
            .unwrap();
        assert_eq!(first.finish_time, 4);
        assert_eq!(busy_times(&inst, 1), vec![4, 0, 0]);

        // Busiest ambulance (4) finishes at 8 <= 10, so it is reused.
        let second = engine
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![PersonId(2)]))
            .unwrap();
        assert_eq!(second.ambulance, first.ambulance);
        assert_eq!(busy_times(&inst, 1), vec![8, 0, 0]);

        // Deadline 6: busiest would finish at 12, so an idle one takes it.
        let third = engine
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![PersonId(3)]))
            .unwrap();
        assert_ne!(third.ambulance, first.ambulance);
        assert_eq!(third.finish_time, 4);
        assert_eq!(busy_times(&inst, 1), vec![8, 4, 0]);
    }

    #[test]
    fn test_deadline_equal_to_finish_is_feasible() {
        let mut inst = Instance::new()
            .with_person(0, 1, 4)
            .with_located_hospital(0, 0, 1);
        assert!(nearest()
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![PersonId(1)]))
            .is_ok());
    }

    #[test]
    fn test_unlocated_start_hospital() {
        let mut inst = Instance::new().with_person(0, 1, 10).with_hospital(1);
        let err = nearest()
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![PersonId(1)]))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::HospitalMismatch);
    }

    #[test]
    fn test_unknown_person_or_hospital() {
        let mut inst = small_instance();
        let err = nearest()
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![PersonId(99)]))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::PersonIdOutOfRange);

        let err = nearest()
            .rescue(&mut inst, &Trip::new(HospitalId(4), vec![PersonId(1)]))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::HospitalIdOutOfRange);
    }

    #[test]
    fn test_explicit_end_transfers_ambulance() {
        let mut inst = Instance::new()
            .with_person(0, 5, 100)
            .with_person(0, 6, 100)
            .with_located_hospital(0, 0, 1)
            .with_located_hospital(0, 10, 0);
        let engine = explicit();

        let trip = Trip::new(HospitalId(1), vec![PersonId(1)]).with_end(HospitalId(2));
        let out = engine.rescue(&mut inst, &trip).unwrap();
        // 5 + 1 + 5 + 1
        assert_eq!(out.elapsed, 12);
        assert_eq!(out.end, HospitalId(2));
        assert!(busy_times(&inst, 1).is_empty());
        assert_eq!(busy_times(&inst, 2), vec![12]);
        assert_eq!(inst.ambulance_total(), 1);

        // Hospital 1 has no ambulance left.
        let trip = Trip::new(HospitalId(1), vec![PersonId(2)]).with_end(HospitalId(1));
        let err = engine.rescue(&mut inst, &trip).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NoAmbulanceAvailable);

        // The transferred ambulance can leave from hospital 2.
        let trip = Trip::new(HospitalId(2), vec![PersonId(2)]).with_end(HospitalId(2));
        let out = engine.rescue(&mut inst, &trip).unwrap();
        assert_eq!(out.elapsed, 10);
        assert_eq!(out.finish_time, 22);
        assert_eq!(busy_times(&inst, 2), vec![22]);
    }

    #[test]
    fn test_explicit_end_uses_idlest_only() {
        let mut inst = Instance::new()
            .with_person(0, 1, 4)
            .with_person(0, 1, 4)
            .with_located_hospital(0, 0, 2);
        let engine = explicit();
        let trip = |p| Trip::new(HospitalId(1), vec![PersonId(p)]).with_end(HospitalId(1));

        engine.rescue(&mut inst, &trip(1)).unwrap();
        engine.rescue(&mut inst, &trip(2)).unwrap();
        assert_eq!(busy_times(&inst, 1), vec![4, 4]);
    }

    #[test]
    fn test_explicit_end_infeasible() {
        let mut inst = Instance::new()
            .with_person(0, 1, 5)
            .with_located_hospital(0, 0, 1)
            .with_located_hospital(0, 9, 1);
        let trip = Trip::new(HospitalId(1), vec![PersonId(1)]).with_end(HospitalId(2));
        let err = explicit().rescue(&mut inst, &trip).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InfeasibleTiming);
        assert_eq!(busy_times(&inst, 1), vec![0]);
        assert_eq!(busy_times(&inst, 2), vec![0]);
    }

    #[test]
    fn test_trip_length_overflow_is_infeasible() {
        let mut inst = Instance::new()
            .with_person(i64::MAX, 0, 5)
            .with_located_hospital(-1, 0, 1);
        let trip = Trip::new(HospitalId(1), vec![PersonId(1)]);
        let err = nearest().rescue(&mut inst, &trip).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InfeasibleTiming);
        assert_eq!(busy_times(&inst, 1), vec![0]);
        assert_eq!(inst.rescued_count(), 0);
    }

    #[test]
    fn test_explicit_end_missing() {
        let mut inst = small_instance();
        let err = explicit()
            .rescue(&mut inst, &Trip::new(HospitalId(1), vec![PersonId(1)]))
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::ExpectedHospital);
    }
}
