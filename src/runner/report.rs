//! Run report.
//!
//! Summarises a finished validation run: the score, every accepted trip,
//! and one diagnostic per line that was rejected, ignored or incomplete.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ValidationErrorKind;
use crate::models::{Minutes, PersonId};
use crate::rescue::RescueOutcome;

/// Why a line did not contribute to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A validation error rejected the line.
    Rejected(ValidationErrorKind),
    /// The line matched neither `hospital` nor `ambulance`.
    Ignored,
    /// A trip without a start hospital or without people.
    Insufficient,
}

/// A reported problem on one plan line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line number in the plan.
    pub line: usize,
    /// Classification.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(line: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }

    /// Whether a validation error caused this diagnostic.
    pub fn is_rejection(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Rejected(_))
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of people rescued by accepted trips.
    pub score: usize,
    /// Lines consumed, blank ones included.
    pub lines_read: usize,
    /// Hospital locations successfully declared.
    pub hospitals_declared: usize,
    /// Accepted trips in plan order.
    pub accepted: Vec<RescueOutcome>,
    /// Problems, in plan order.
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted trip and adds its people to the score.
    pub fn add_accepted(&mut self, outcome: RescueOutcome) {
        self.score += outcome.people.len();
        self.accepted.push(outcome);
    }

    /// Records a diagnostic.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Number of lines rejected by validation.
    pub fn rejected_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_rejection()).count()
    }

    /// Number of lines with an unrecognised prefix.
    pub fn ignored_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Ignored)
            .count()
    }

    /// Diagnostics caused by a given validation error kind.
    pub fn rejections_of(&self, kind: ValidationErrorKind) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Rejected(kind))
            .collect()
    }

    /// Every rescued person, in id order.
    pub fn rescued_people(&self) -> BTreeSet<PersonId> {
        self.accepted
            .iter()
            .flat_map(|o| o.people.iter().copied())
            .collect()
    }

    /// Latest ambulance finish time over all accepted trips.
    pub fn makespan(&self) -> Minutes {
        self.accepted.iter().map(|o| o.finish_time).max().unwrap_or(0)
    }

    /// Whether every non-blank line was accepted or declared a hospital.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
