//! Rescue plan validation for the U-Engine ecosystem.
//!
//! Judges a proposed ambulance rescue plan against a fixed problem instance:
//! people waiting at grid locations with individual deadlines, and hospitals
//! owning ambulances. Every accepted trip rescues its people and advances an
//! ambulance's busy-time; the score is the number of people rescued.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Point`, `Person`, `Hospital`, `Ambulance`,
//!   `Fleet`, `Instance` (with the instance file loader)
//! - **`grammar`**: Plan line classification and trip record parsing
//! - **`rescue`**: Trip feasibility, ambulance selection and commit
//! - **`runner`**: Line-by-line plan execution and the run report
//! - **`config`**: Trip variant and timing settings
//! - **`error`**: Validation and instance-loading errors
//!
//! # Pipeline
//!
//! ```text
//! plan line → grammar → Trip → RescueEngine → Instance state + score
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Larson & Odoni (1981), "Urban Operations Research"

pub mod config;
pub mod error;
pub mod grammar;
pub mod logging;
pub mod models;
pub mod rescue;
pub mod runner;
