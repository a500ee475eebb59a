//! Line-by-line plan runner.
//!
//! Feeds each plan line through the grammar and the rescue engine, keeps the
//! running score, and isolates failures so one bad line never stops the run.

use log::{debug, info, warn};
use std::io::{self, BufRead};

use super::{Diagnostic, DiagnosticKind, RunReport};
use crate::config::ValidatorConfig;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::grammar::{self, PlanLine};
use crate::models::{HospitalId, Instance, Point};
use crate::rescue::{RescueEngine, RescueOutcome};

/// What happened to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Empty line.
    Blank,
    /// A hospital location was set.
    HospitalDeclared {
        /// Declared hospital.
        hospital: HospitalId,
        /// Its location.
        location: Point,
    },
    /// A trip was accepted.
    Rescued(RescueOutcome),
    /// A declaration or trip failed validation.
    Rejected(ValidationError),
    /// Unrecognised line.
    Ignored,
    /// Trip without start hospital or people.
    Insufficient,
}

/// Runs a plan against an instance.
///
/// # Example
/// ```
/// use u_rescue::config::ValidatorConfig;
/// use u_rescue::models::Instance;
/// use u_rescue::runner::PlanRunner;
///
/// let instance = Instance::new()
///     .with_person(0, 1, 5)
///     .with_person(0, 3, 5)
///     .with_hospital(2);
/// let mut runner = PlanRunner::new(instance, ValidatorConfig::default());
/// let report = runner.run_lines([
///     "hospital: (0, 0, 2)",
///     "ambulance 1:(0,0) 1:(0,1,5)",
///     "ambulance 1:(0,0) 1:(0,1,5)",
/// ]);
/// assert_eq!(report.score, 1);
/// assert_eq!(report.rejected_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PlanRunner {
    instance: Instance,
    engine: RescueEngine,
    hospital_cursor: usize,
    report: RunReport,
}

impl PlanRunner {
    /// Creates a runner over a freshly loaded instance.
    pub fn new(instance: Instance, config: ValidatorConfig) -> Self {
        Self {
            instance,
            engine: RescueEngine::new(config),
            hospital_cursor: 0,
            report: RunReport::new(),
        }
    }

    /// Current instance state.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Running score.
    pub fn score(&self) -> usize {
        self.report.score
    }

    /// Report so far.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Processes one plan line and records the result.
    pub fn process_line(&mut self, raw: &str) -> LineOutcome {
        self.report.lines_read += 1;
        let line_no = self.report.lines_read;
        let line = grammar::normalize(raw);

        let outcome = match grammar::classify(&line) {
            PlanLine::Blank => LineOutcome::Blank,
            PlanLine::HospitalDeclaration => match self.declare_hospital(&line) {
                Ok((hospital, location)) => LineOutcome::HospitalDeclared { hospital, location },
                Err(e) => LineOutcome::Rejected(e),
            },
            PlanLine::Trip => self.process_trip(&line),
            PlanLine::Ignored => LineOutcome::Ignored,
        };

        self.record(line_no, &line, &outcome);
        outcome
    }

    /// Processes every line of `reader`, then returns the final report.
    pub fn run<R: BufRead>(&mut self, reader: R) -> io::Result<RunReport> {
        for line in reader.lines() {
            self.process_line(&line?);
        }
        Ok(self.finish())
    }

    /// Processes in-memory lines, then returns the final report.
    pub fn run_lines<I, S>(&mut self, lines: I) -> RunReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.process_line(line.as_ref());
        }
        self.finish()
    }

    /// Reports the total score and returns a snapshot of the report.
    pub fn finish(&self) -> RunReport {
        info!("Total score: {}", self.report.score);
        self.report.clone()
    }

    fn declare_hospital(&mut self, line: &str) -> Result<(HospitalId, Point), ValidationError> {
        let index = self.hospital_cursor;
        self.hospital_cursor += 1;

        let decl = grammar::parse_hospital_declaration(line)?;
        let hospital_count = self.instance.hospital_count();
        let hospital = self.instance.hospitals.get_mut(index).ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::UnexpectedDeclaration,
                format!(
                    "Hospital declaration #{} but the instance has only {hospital_count} hospital(s)",
                    index + 1
                ),
            )
        })?;

        if decl.ambulance_count != hospital.ambulance_count {
            return Err(ValidationError::new(
                ValidationErrorKind::AmbulanceCountMismatch,
                format!(
                    "Hospital's ambulance # does not match input (input={}, results={})",
                    hospital.ambulance_count, decl.ambulance_count
                ),
            ));
        }

        let location = Point::new(decl.x, decl.y);
        hospital.location = Some(location);
        info!("Hospital #{}: coordinates {location}", hospital.id);
        Ok((hospital.id, location))
    }

    fn process_trip(&mut self, line: &str) -> LineOutcome {
        let variant = self.engine.config().variant;
        let draft = match grammar::parse_trip(line, &self.instance, variant) {
            Ok(draft) => draft,
            Err(e) => return LineOutcome::Rejected(e),
        };
        let Some(trip) = draft.into_trip(variant) else {
            return LineOutcome::Insufficient;
        };

        match self.engine.rescue(&mut self.instance, &trip) {
            Ok(outcome) => LineOutcome::Rescued(outcome),
            Err(e) => LineOutcome::Rejected(e),
        }
    }

    fn record(&mut self, line_no: usize, line: &str, outcome: &LineOutcome) {
        match outcome {
            LineOutcome::Blank => {}
            LineOutcome::HospitalDeclared { .. } => self.report.hospitals_declared += 1,
            LineOutcome::Rescued(o) => {
                let people: Vec<String> = o
                    .people
                    .iter()
                    .filter_map(|&p| self.instance.person(p))
                    .map(ToString::to_string)
                    .collect();
                info!(
                    "Rescued: {} taking time: {} with ambulance {} ending at hospital {}",
                    people.join(" and "),
                    o.elapsed,
                    o.ambulance,
                    o.end
                );
                self.report.add_accepted(o.clone());
            }
            LineOutcome::Rejected(e) => {
                warn!("!!! line {line_no}: {e}");
                self.report.add_diagnostic(Diagnostic::new(
                    line_no,
                    DiagnosticKind::Rejected(e.kind),
                    e.to_string(),
                ));
            }
            LineOutcome::Ignored => {
                warn!("!!! Ignored line {line_no}: {line:?}");
                self.report.add_diagnostic(Diagnostic::new(
                    line_no,
                    DiagnosticKind::Ignored,
                    format!("Ignored line: {line:?}"),
                ));
            }
            LineOutcome::Insufficient => {
                warn!("!!! Insufficient data on line {line_no}: {line:?}");
                self.report.add_diagnostic(Diagnostic::new(
                    line_no,
                    DiagnosticKind::Insufficient,
                    format!("Insufficient data: {line:?}"),
                ));
            }
        }
        debug!("line {line_no} done, score {}", self.report.score);
    }
}
