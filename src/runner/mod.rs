//! Plan runner and run report.
//!
//! [`PlanRunner`] consumes a plan stream line by line:
//!
//! | Line | Handling |
//! |------|----------|
//! | blank | skipped |
//! | `hospital: (x, y, n)` | sets the next hospital's location |
//! | `ambulance ...` | parsed, judged and committed by the rescue engine |
//! | anything else | reported as ignored |
//!
//! Every validation failure is reported as a [`Diagnostic`] and the run
//! continues with the next line. [`RunReport`] carries the final score.

mod plan;
mod report;

pub use plan::{LineOutcome, PlanRunner};
pub use report::{Diagnostic, DiagnosticKind, RunReport};
