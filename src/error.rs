//! Error types.
//!
//! Two families:
//! - [`ValidationError`]: a judged plan line is wrong. Always recoverable;
//!   the runner reports it and moves on to the next line.
//! - [`InstanceError`]: the problem instance itself cannot be read. Fatal.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Broad class of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Token shape, ordering, or id-range violations.
    FormatSyntax,
    /// A reference disagrees with the instance data.
    DataMismatch,
    /// The trip is well-formed but breaks a rescue rule.
    IllegalPlan,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FormatSyntax => "format syntax error",
            Self::DataMismatch => "data mismatch",
            Self::IllegalPlan => "illegal plan",
        };
        f.write_str(name)
    }
}

/// Specific validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// A parenthesised reference is neither `n:(x,y)` nor `n:(x,y,t)`.
    MalformedToken,
    /// A hospital declaration line is not `hospital: (x, y, n)`.
    MalformedDeclaration,
    /// More hospital declarations than hospitals in the instance.
    UnexpectedDeclaration,
    /// Hospital id outside `1..=hospital_count`.
    HospitalIdOutOfRange,
    /// Person id outside `1..=person_count`.
    PersonIdOutOfRange,
    /// A hospital token where a person token belongs.
    ExpectedPerson,
    /// A person token where a hospital token belongs.
    ExpectedHospital,
    /// Any token following the end hospital.
    TokenAfterEndHospital,
    /// Hospital reference location differs from the declared location.
    HospitalMismatch,
    /// Person reference differs from the instance data.
    PersonMismatch,
    /// Declared ambulance count differs from the instance data.
    AmbulanceCountMismatch,
    /// More people than an ambulance can carry.
    CapacityExceeded,
    /// A person was already rescued by an earlier trip.
    AlreadyRescued,
    /// The same person appears twice in one trip.
    DuplicatePerson,
    /// No ambulance can finish before every deadline.
    InfeasibleTiming,
    /// The start hospital has no ambulance stationed.
    NoAmbulanceAvailable,
}

impl ValidationErrorKind {
    /// The category this failure belongs to.
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::MalformedToken
            | Self::MalformedDeclaration
            | Self::UnexpectedDeclaration
            | Self::HospitalIdOutOfRange
            | Self::PersonIdOutOfRange
            | Self::ExpectedPerson
            | Self::ExpectedHospital
            | Self::TokenAfterEndHospital => ErrorCategory::FormatSyntax,
            Self::HospitalMismatch | Self::PersonMismatch | Self::AmbulanceCountMismatch => {
                ErrorCategory::DataMismatch
            }
            Self::CapacityExceeded
            | Self::AlreadyRescued
            | Self::DuplicatePerson
            | Self::InfeasibleTiming
            | Self::NoAmbulanceAvailable => ErrorCategory::IllegalPlan,
        }
    }
}

/// A validation error for one plan line.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}: {message}", .kind.category())]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The error's category.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Failure to load a problem instance.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// The instance file could not be read.
    #[error("cannot read instance: {0}")]
    Io(#[from] std::io::Error),
    /// A data row could not be parsed.
    #[error("instance line {line}: {message}")]
    Row {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ValidationErrorKind::MalformedToken, ErrorCategory::FormatSyntax)]
    #[case(ValidationErrorKind::PersonIdOutOfRange, ErrorCategory::FormatSyntax)]
    #[case(ValidationErrorKind::ExpectedHospital, ErrorCategory::FormatSyntax)]
    #[case(ValidationErrorKind::HospitalMismatch, ErrorCategory::DataMismatch)]
    #[case(ValidationErrorKind::AmbulanceCountMismatch, ErrorCategory::DataMismatch)]
    #[case(ValidationErrorKind::CapacityExceeded, ErrorCategory::IllegalPlan)]
    #[case(ValidationErrorKind::InfeasibleTiming, ErrorCategory::IllegalPlan)]
    fn test_kind_category(#[case] kind: ValidationErrorKind, #[case] expected: ErrorCategory) {
        assert_eq!(kind.category(), expected);
    }

    #[test]
    fn test_validation_error_display() {
        let e = ValidationError::new(ValidationErrorKind::PersonIdOutOfRange, "Illegal person id: 99");
        assert_eq!(e.to_string(), "format syntax error: Illegal person id: 99");
        assert_eq!(e.category(), ErrorCategory::FormatSyntax);
    }

    #[test]
    fn test_instance_error_display() {
        let e = InstanceError::Row {
            line: 4,
            message: "expected 3 fields".into(),
        };
        assert_eq!(e.to_string(), "instance line 4: expected 3 fields");
    }
}
