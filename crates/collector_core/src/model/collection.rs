//! Ordered record table with its id counter.
//!
//! # Responsibility
//! - Hold the in-memory copy of the backing file.
//! - Allocate record ids from a monotonic counter kept next to the rows.
//!
//! # Invariants
//! - Record ids are unique.
//! - `last_allocated` never decreases, so deleted ids are never handed out
//!   again.
//! - Allocation fails instead of guessing when any existing id is not a
//!   decimal number.

use crate::model::record::{Record, RecordId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inconsistency between stored ids and the allocation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// Two rows share the same id.
    DuplicateId(RecordId),
    /// An existing id cannot be read as a counter value.
    NonNumericId(RecordId),
    /// The counter cannot advance any further.
    CounterExhausted,
}

impl Display for IntegrityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate record id `{id}`"),
            Self::NonNumericId(id) => write!(f, "record id `{id}` is not numeric"),
            Self::CounterExhausted => write!(f, "record id counter exhausted"),
        }
    }
}

impl Error for IntegrityError {}

/// All records of the collection plus the id counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    records: Vec<Record>,
    last_allocated: u64,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from rows read off the backing file.
    ///
    /// The counter is seeded with the highest numeric id. Non-numeric ids are
    /// tolerated here and only rejected when a new id must be allocated.
    ///
    /// # Errors
    /// - `DuplicateId` when two rows share an id.
    pub fn from_records(records: Vec<Record>) -> Result<Self, IntegrityError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut last_allocated = 0;
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(IntegrityError::DuplicateId(record.id.clone()));
            }
            if let Some(value) = parse_id(&record.id) {
                last_allocated = last_allocated.max(value);
            }
        }

        Ok(Self {
            records,
            last_allocated,
        })
    }

    /// Raises the counter to at least `floor`, e.g. a persisted counter value.
    pub fn with_counter_floor(mut self, floor: u64) -> Self {
        self.last_allocated = self.last_allocated.max(floor);
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Highest id value ever allocated or observed.
    pub fn last_allocated(&self) -> u64 {
        self.last_allocated
    }

    /// Returns the id the next created record will receive.
    ///
    /// # Errors
    /// - `NonNumericId` when any existing id is not a decimal number.
    /// - `CounterExhausted` on `u64` overflow.
    pub fn next_id(&self) -> Result<RecordId, IntegrityError> {
        if let Some(bad) = self.records.iter().find(|record| parse_id(&record.id).is_none()) {
            return Err(IntegrityError::NonNumericId(bad.id.clone()));
        }
        self.last_allocated
            .checked_add(1)
            .map(|next| next.to_string())
            .ok_or(IntegrityError::CounterExhausted)
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    /// Appends a record whose id came from [`Collection::next_id`].
    pub(crate) fn push_allocated(&mut self, record: Record) {
        if let Some(value) = parse_id(&record.id) {
            self.last_allocated = self.last_allocated.max(value);
        }
        self.records.push(record);
    }

    pub(crate) fn replace(&mut self, index: usize, record: Record) {
        self.records[index] = record;
    }

    pub(crate) fn remove(&mut self, index: usize) -> Record {
        self.records.remove(index)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn parse_id(id: &str) -> Option<u64> {
    if id.is_empty() || !id.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}
