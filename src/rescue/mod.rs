//! Trip validation and ambulance dispatch.
//!
//! [`RescueEngine`] judges one [`Trip`](crate::grammar::Trip) at a time
//! against the instance state: capacity, double rescue, elapsed time,
//! deadline feasibility and ambulance selection. Accepted trips are
//! committed; rejected ones leave the instance unchanged.
//!
//! # Ambulance Selection
//!
//! - Pooled (`ReturnToNearest`): best fit. The busiest ambulance that still
//!   meets every deadline takes the trip, keeping idle ambulances available.
//! - Owned (`ExplicitEnd`): the idlest ambulance takes the trip or nobody
//!   does; it is then stationed at the end hospital.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: earliest-available resource heuristics

mod engine;

pub use engine::{RescueEngine, RescueOutcome, RescuePlan};
