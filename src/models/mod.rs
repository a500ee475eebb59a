//! Rescue domain models.
//!
//! Provides the data types of a rescue problem: the grid geometry, the
//! people waiting for rescue, the hospitals and their ambulance fleets, and
//! the instance that owns them all.
//!
//! # Domain Mappings
//!
//! | u-rescue | Scheduling analogue |
//! |----------|---------------------|
//! | Person | Task with a deadline |
//! | Ambulance | Resource |
//! | Busy-time | Resource availability |
//! | Trip | Assignment |

mod geometry;
mod hospital;
mod instance;
mod person;

pub use geometry::{travel_time, Located, Minutes, Point};
pub use hospital::{Ambulance, AmbulanceId, Fleet, Hospital, HospitalId};
pub use instance::Instance;
pub use person::{Person, PersonId};
