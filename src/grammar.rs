//! Plan line grammar.
//!
//! A plan is read one line at a time. Lines are case-insensitive and
//! whitespace-tolerant, and come in two shapes:
//!
//! ```text
//! hospital: (x, y, ambulance_count)
//! ambulance 1:(10,20) 3:(12,24,80) 7:(9,31,95)
//! ```
//!
//! A trip record is a sequence of reference tokens scanned left to right.
//! `id:(x,y)` refers to a hospital, `id:(x,y,t)` to a person. Text between
//! tokens is ignored. Position 0 is always the start hospital; what may
//! follow depends on the [`TripVariant`].
//!
//! Parsing also checks every reference against the [`Instance`], but never
//! mutates it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::TripVariant;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::models::{HospitalId, Instance, Minutes, PersonId};

/// Any parenthesised reference `id:( ... )`; its fields are checked separately.
static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*:\s*\(([^()]*)\)").unwrap_or_else(|e| panic!("bad reference regex: {e}"))
});

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^hospital\s*:?\s*\(?\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(\d+)\s*\)?$")
        .unwrap_or_else(|e| panic!("bad declaration regex: {e}"))
});

/// Shape of a plan line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanLine {
    /// Empty after trimming.
    Blank,
    /// Starts with `hospital`.
    HospitalDeclaration,
    /// Starts with `ambulance`.
    Trip,
    /// Anything else.
    Ignored,
}

/// Trims and lowercases a raw line.
pub fn normalize(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Classifies a line by its prefix.
pub fn classify(line: &str) -> PlanLine {
    let line = normalize(line);
    if line.is_empty() {
        PlanLine::Blank
    } else if line.starts_with("hospital") {
        PlanLine::HospitalDeclaration
    } else if line.starts_with("ambulance") {
        PlanLine::Trip
    } else {
        PlanLine::Ignored
    }
}

/// A parsed `hospital: (x, y, n)` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalDeclaration {
    /// Declared x coordinate.
    pub x: i64,
    /// Declared y coordinate.
    pub y: i64,
    /// Declared number of ambulances.
    pub ambulance_count: usize,
}

/// Parses a hospital declaration line.
pub fn parse_hospital_declaration(line: &str) -> Result<HospitalDeclaration, ValidationError> {
    let line = normalize(line);
    let malformed = || {
        ValidationError::new(
            ValidationErrorKind::MalformedDeclaration,
            format!("Expected \"hospital: (x,y,ambulance_count)\": {line:?}"),
        )
    };
    let caps = DECLARATION.captures(&line).ok_or_else(malformed)?;
    let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

    Ok(HospitalDeclaration {
        x: field(1).parse().map_err(|_| malformed())?,
        y: field(2).parse().map_err(|_| malformed())?,
        ambulance_count: field(3).parse().map_err(|_| malformed())?,
    })
}

/// One reference token of a trip record, as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripToken {
    /// `id:(x,y)`
    Hospital {
        /// Referenced hospital id.
        id: usize,
        /// Claimed x coordinate.
        x: i64,
        /// Claimed y coordinate.
        y: i64,
    },
    /// `id:(x,y,t)`
    Person {
        /// Referenced person id.
        id: usize,
        /// Claimed x coordinate.
        x: i64,
        /// Claimed y coordinate.
        y: i64,
        /// Claimed deadline.
        rescue_time: Minutes,
    },
}

/// Splits a trip line into reference tokens.
///
/// Fails with `MalformedToken` when a parenthesised reference has the wrong
/// number of fields or a non-integer field.
pub fn tokenize(line: &str) -> Result<Vec<TripToken>, ValidationError> {
    let line = normalize(line);
    let mut tokens = Vec::new();

    for caps in REFERENCE.captures_iter(&line) {
        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let malformed = || {
            ValidationError::new(
                ValidationErrorKind::MalformedToken,
                format!("Expected \"n:(x,y)\" or \"n:(x,y,t)\" but found {whole:?}"),
            )
        };

        let id: usize = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(malformed)?;
        let fields = caps
            .get(2)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .split(',')
            .map(|f| f.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;

        let token = match fields.as_slice() {
            &[x, y] => TripToken::Hospital { id, x, y },
            &[x, y, rescue_time] => TripToken::Person {
                id,
                x,
                y,
                rescue_time,
            },
            _ => return Err(malformed()),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// A trip record after parsing, possibly incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripDraft {
    /// Start hospital (position 0).
    pub start: Option<HospitalId>,
    /// People in pickup order.
    pub people: Vec<PersonId>,
    /// End hospital (`ExplicitEnd` only).
    pub end: Option<HospitalId>,
}

impl TripDraft {
    /// Completes the draft, or `None` if required parts are missing.
    pub fn into_trip(self, variant: TripVariant) -> Option<Trip> {
        let start = self.start?;
        if self.people.is_empty() {
            return None;
        }
        if variant == TripVariant::ExplicitEnd && self.end.is_none() {
            return None;
        }
        Some(Trip {
            start,
            people: self.people,
            end: self.end,
        })
    }
}

/// A structurally complete trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Start hospital.
    pub start: HospitalId,
    /// People in pickup order.
    pub people: Vec<PersonId>,
    /// Explicit end hospital; `None` means "nearest".
    pub end: Option<HospitalId>,
}

impl Trip {
    /// Creates a trip that returns to the nearest hospital.
    pub fn new(start: HospitalId, people: Vec<PersonId>) -> Self {
        Self {
            start,
            people,
            end: None,
        }
    }

    /// Sets an explicit end hospital.
    pub fn with_end(mut self, end: HospitalId) -> Self {
        self.end = Some(end);
        self
    }
}

/// Parses an `ambulance ...` line and checks every reference against `instance`.
///
/// # Errors
/// - `ExpectedHospital` / `ExpectedPerson` / `TokenAfterEndHospital`: token in the wrong position
/// - `HospitalIdOutOfRange` / `PersonIdOutOfRange`: unknown id
/// - `HospitalMismatch` / `PersonMismatch`: coordinates or deadline differ
/// - `MalformedToken`: see [`tokenize`]
pub fn parse_trip(
    line: &str,
    instance: &Instance,
    variant: TripVariant,
) -> Result<TripDraft, ValidationError> {
    let mut draft = TripDraft::default();

    for (pos, token) in tokenize(line)?.into_iter().enumerate() {
        match token {
            TripToken::Hospital { id, x, y } => {
                if pos > 0 {
                    match variant {
                        TripVariant::ReturnToNearest => {
                            return Err(ValidationError::new(
                                ValidationErrorKind::ExpectedPerson,
                                format!("Specify a person now: hospital {id} at position {pos}"),
                            ));
                        }
                        TripVariant::ExplicitEnd if draft.people.is_empty() => {
                            return Err(ValidationError::new(
                                ValidationErrorKind::ExpectedPerson,
                                format!("Pick up a person before the end hospital {id}"),
                            ));
                        }
                        TripVariant::ExplicitEnd if draft.end.is_some() => {
                            return Err(ValidationError::new(
                                ValidationErrorKind::TokenAfterEndHospital,
                                format!("Second end hospital {id} at position {pos}"),
                            ));
                        }
                        TripVariant::ExplicitEnd => {}
                    }
                }

                let hid = resolve_hospital(instance, id, x, y)?;
                if pos == 0 {
                    draft.start = Some(hid);
                } else {
                    draft.end = Some(hid);
                }
            }
            TripToken::Person {
                id,
                x,
                y,
                rescue_time,
            } => {
                if pos == 0 {
                    return Err(ValidationError::new(
                        ValidationErrorKind::ExpectedHospital,
                        format!("Specify a hospital first: person {id} at position 0"),
                    ));
                }
                if draft.end.is_some() {
                    return Err(ValidationError::new(
                        ValidationErrorKind::TokenAfterEndHospital,
                        format!("Person {id} listed after the end hospital"),
                    ));
                }
                draft
                    .people
                    .push(resolve_person(instance, id, x, y, rescue_time)?);
            }
        }
    }

    Ok(draft)
}

fn resolve_hospital(
    instance: &Instance,
    id: usize,
    x: i64,
    y: i64,
) -> Result<HospitalId, ValidationError> {
    let hid = HospitalId(id);
    let hospital = instance.hospital(hid).ok_or_else(|| {
        ValidationError::new(
            ValidationErrorKind::HospitalIdOutOfRange,
            format!("Illegal hospital id: {id}"),
        )
    })?;
    if !hospital.matches(x, y) {
        return Err(ValidationError::new(
            ValidationErrorKind::HospitalMismatch,
            format!("Hospital location mismatch: {hospital} != {id}: ({x},{y})"),
        ));
    }
    Ok(hid)
}

fn resolve_person(
    instance: &Instance,
    id: usize,
    x: i64,
    y: i64,
    rescue_time: Minutes,
) -> Result<PersonId, ValidationError> {
    let pid = PersonId(id);
    let person = instance.person(pid).ok_or_else(|| {
        ValidationError::new(
            ValidationErrorKind::PersonIdOutOfRange,
            format!("Illegal person id: {id}"),
        )
    })?;
    if !person.matches(x, y, rescue_time) {
        return Err(ValidationError::new(
            ValidationErrorKind::PersonMismatch,
            format!("Person mismatch: {person} != {id}: ({x}, {y}, {rescue_time})"),
        ));
    }
    Ok(pid)
}
