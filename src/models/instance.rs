//! Problem instance.
//!
//! Owns every person and hospital of one rescue problem. Identities are
//! positional: the n-th person row becomes `PersonId(n)`, the n-th hospital
//! row becomes `HospitalId(n)`, and ambulances are numbered across hospitals
//! in the same order.
//!
//! # File Format
//!
//! ```text
//! person(x,y,rescue_time)
//! 48,57,155
//! 34,37,79
//!
//! hospital(ambulance_count)
//! 6
//! 7
//! ```
//!
//! Section markers are matched by prefix (`person`, `people`, `hospital`),
//! case-insensitively. Hospital coordinates are not part of the instance.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{AmbulanceId, Hospital, HospitalId, Minutes, Person, PersonId, Point};
use crate::error::InstanceError;

/// A loaded rescue problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// People in file order.
    pub people: Vec<Person>,
    /// Hospitals in file order.
    pub hospitals: Vec<Hospital>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    People,
    Hospitals,
}

impl Instance {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a person; the id is the next position.
    pub fn with_person(mut self, x: i64, y: i64, rescue_time: Minutes) -> Self {
        self.push_person(x, y, rescue_time);
        self
    }

    /// Appends a hospital with `ambulance_count` idle ambulances.
    pub fn with_hospital(mut self, ambulance_count: usize) -> Self {
        self.push_hospital(ambulance_count);
        self
    }

    /// Appends a hospital and declares its location right away.
    pub fn with_located_hospital(mut self, x: i64, y: i64, ambulance_count: usize) -> Self {
        let id = self.push_hospital(ambulance_count);
        if let Some(h) = self.hospital_mut(id) {
            h.location = Some(Point::new(x, y));
        }
        self
    }

    fn push_person(&mut self, x: i64, y: i64, rescue_time: Minutes) -> PersonId {
        let id = PersonId(self.people.len() + 1);
        self.people.push(Person::new(id, x, y, rescue_time));
        id
    }

    fn push_hospital(&mut self, ambulance_count: usize) -> HospitalId {
        let id = HospitalId(self.hospitals.len() + 1);
        let first = self.ambulance_total() + 1;
        let hospital = (first..first + ambulance_count)
            .fold(Hospital::new(id, ambulance_count), |h, a| {
                h.with_ambulance(AmbulanceId(a))
            });
        self.hospitals.push(hospital);
        id
    }

    /// Parses an instance from text.
    pub fn parse(text: &str) -> Result<Self, InstanceError> {
        let mut instance = Self::new();
        let mut section = Section::None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim().to_lowercase();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("person") || line.starts_with("people") {
                section = Section::People;
                continue;
            }
            if line.starts_with("hospital") {
                section = Section::Hospitals;
                continue;
            }

            match section {
                Section::None => {
                    warn!("Instance line {line_no} outside any section ignored: {line:?}");
                }
                Section::People => {
                    let fields = parse_row(&line, line_no)?;
                    match fields.as_slice() {
                        &[x, y, t] => {
                            instance.push_person(x, y, t);
                        }
                        _ => {
                            return Err(InstanceError::Row {
                                line: line_no,
                                message: format!(
                                    "expected x,y,rescue_time but found {} field(s)",
                                    fields.len()
                                ),
                            })
                        }
                    }
                }
                Section::Hospitals => {
                    let fields = parse_row(&line, line_no)?;
                    match fields.as_slice() {
                        &[n] => {
                            let count = usize::try_from(n).map_err(|_| InstanceError::Row {
                                line: line_no,
                                message: format!("ambulance count must be non-negative: {n}"),
                            })?;
                            instance.push_hospital(count);
                        }
                        _ => {
                            return Err(InstanceError::Row {
                                line: line_no,
                                message: format!(
                                    "expected ambulance_count but found {} field(s)",
                                    fields.len()
                                ),
                            })
                        }
                    }
                }
            }
        }

        debug!(
            "Loaded {} people, {} hospitals, {} ambulances",
            instance.people.len(),
            instance.hospitals.len(),
            instance.ambulance_total()
        );
        Ok(instance)
    }

    /// Reads and parses an instance file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    /// Looks up a person by id.
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        id.index().and_then(|i| self.people.get(i))
    }

    /// Looks up a person by id, mutably.
    pub fn person_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        id.index().and_then(|i| self.people.get_mut(i))
    }

    /// Looks up a hospital by id.
    pub fn hospital(&self, id: HospitalId) -> Option<&Hospital> {
        id.index().and_then(|i| self.hospitals.get(i))
    }

    /// Looks up a hospital by id, mutably.
    pub fn hospital_mut(&mut self, id: HospitalId) -> Option<&mut Hospital> {
        id.index().and_then(|i| self.hospitals.get_mut(i))
    }

    /// Number of people.
    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    /// Number of hospitals.
    pub fn hospital_count(&self) -> usize {
        self.hospitals.len()
    }

    /// Number of ambulances across all hospitals.
    pub fn ambulance_total(&self) -> usize {
        self.hospitals.iter().map(|h| h.fleet.len()).sum()
    }

    /// Number of people already rescued.
    pub fn rescued_count(&self) -> usize {
        self.people.iter().filter(|p| p.rescued).count()
    }

    /// The located hospital closest to `from`.
    ///
    /// Ties go to the lowest hospital id. Hospitals whose location has not
    /// been declared are skipped.
    pub fn nearest_hospital(&self, from: Point) -> Option<(HospitalId, Minutes)> {
        let mut best: Option<(HospitalId, Minutes)> = None;
        for h in &self.hospitals {
            let Some(loc) = h.location else { continue };
            let t = from.manhattan(&loc);
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((h.id, t));
            }
        }
        best
    }
}

fn parse_row(line: &str, line_no: usize) -> Result<Vec<i64>, InstanceError> {
    line.split(',')
        .map(|field| {
            let field = field.trim();
            field.parse::<i64>().map_err(|e| InstanceError::Row {
                line: line_no,
                message: format!("invalid integer {field:?}: {e}"),
            })
        })
        .collect()
}
