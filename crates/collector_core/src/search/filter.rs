//! In-memory filtering over a loaded collection.
//!
//! # Responsibility
//! - Select records by exact year/series/wave values and a free-text query.
//! - Provide distinct column values for filter pickers.
//!
//! # Invariants
//! - Pure functions: the collection is never mutated.
//! - Result order follows collection order.

use crate::model::collection::Collection;
use crate::model::record::{Field, Record};
use std::collections::BTreeSet;

/// Filter criteria; empty lists and an empty query do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub years: Vec<String>,
    pub series: Vec<String>,
    pub waves: Vec<String>,
    /// Case-insensitive substring matched against every field, as typed.
    pub text: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn years<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.years = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn series<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.series = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn waves<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.waves = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn text(mut self, query: impl Into<String>) -> Self {
        self.text = Some(query.into());
        self
    }

    /// Returns whether `record` satisfies every criterion.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_columns(record) && matches_text(record, self.needle().as_deref())
    }

    fn needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_columns(&self, record: &Record) -> bool {
        one_of(&self.years, &record.year)
            && one_of(&self.series, &record.series)
            && one_of(&self.waves, &record.wave)
    }
}

/// Returns the records of `collection` matching `criteria`.
pub fn filter<'a>(collection: &'a Collection, criteria: &RecordFilter) -> Vec<&'a Record> {
    let needle = criteria.needle();
    collection
        .iter()
        .filter(|record| {
            criteria.matches_columns(record) && matches_text(record, needle.as_deref())
        })
        .collect()
}

/// Sorted distinct values of `field` across the collection.
pub fn facet_values(collection: &Collection, field: Field) -> Vec<String> {
    collection
        .iter()
        .map(|record| record.get(field).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn one_of(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|candidate| candidate == value)
}

fn matches_text(record: &Record, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => record
            .values()
            .any(|value| value.to_lowercase().contains(needle)),
    }
}
