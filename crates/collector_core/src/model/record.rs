//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical row shape of the collection table.
//! - Map between typed fields, caller-facing field names and backing-file
//!   column headers.
//!
//! # Invariants
//! - `id` is assigned by the store and never supplied through `FieldValues`.
//! - Every field defaults to an empty string; there are no nullable cells.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable record identifier, the decimal rendering of an allocated counter value.
pub type RecordId = String;

/// One column of the collection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Year,
    Series,
    Wave,
    Name,
    Variant,
    Msrp,
    Upc,
    Serial,
    PcAmount,
}

impl Field {
    /// All fields in backing-file column order.
    pub const ALL: [Field; 10] = [
        Field::Id,
        Field::Year,
        Field::Series,
        Field::Wave,
        Field::Name,
        Field::Variant,
        Field::Msrp,
        Field::Upc,
        Field::Serial,
        Field::PcAmount,
    ];

    /// Fields that must be non-empty when a record is created.
    pub const REQUIRED_ON_ADD: [Field; 3] = [Field::Year, Field::Series, Field::Name];

    /// Header text used in the backing file.
    pub fn column(self) -> &'static str {
        match self {
            Field::Id => "#",
            Field::Year => "Year",
            Field::Series => "Series",
            Field::Wave => "Wave",
            Field::Name => "Figure Name",
            Field::Variant => "Variant",
            Field::Msrp => "MSRP",
            Field::Upc => "UPC-BARCODE",
            Field::Serial => "SERIAL",
            Field::PcAmount => "PC AMOUNT",
        }
    }

    /// Snake-case key used by callers and serialized records.
    pub fn key(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Year => "year",
            Field::Series => "series",
            Field::Wave => "wave",
            Field::Name => "name",
            Field::Variant => "variant",
            Field::Msrp => "msrp",
            Field::Upc => "upc",
            Field::Serial => "serial",
            Field::PcAmount => "pc_amount",
        }
    }

    /// Resolves a caller-supplied name to a field.
    ///
    /// Accepts either the snake-case key or the column header, ignoring case
    /// and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Field> {
        let trimmed = name.trim();
        Field::ALL.into_iter().find(|field| {
            field.key().eq_ignore_ascii_case(trimmed) || field.column().eq_ignore_ascii_case(trimmed)
        })
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Validation failures raised before any mutation happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field required on add is empty or whitespace.
    MissingRequiredField(Field),
    /// Caller supplied a field name that is not part of the table.
    UnknownField(String),
    /// Caller tried to set a store-owned field.
    ReadOnlyField(Field),
    /// Upload name has no extension.
    MissingPhotoExtension(String),
    /// Upload extension is not an accepted raster image type.
    UnsupportedPhotoExtension(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField(field) => {
                write!(f, "field `{}` is required", field.column())
            }
            Self::UnknownField(name) => write!(f, "unknown field `{name}`"),
            Self::ReadOnlyField(field) => {
                write!(f, "field `{}` is assigned by the store", field.column())
            }
            Self::MissingPhotoExtension(name) => {
                write!(f, "photo `{name}` has no file extension")
            }
            Self::UnsupportedPhotoExtension(ext) => {
                write!(f, "unsupported photo extension `{ext}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// One catalogued collectible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub id: RecordId,
    pub year: String,
    pub series: String,
    pub wave: String,
    pub name: String,
    pub variant: String,
    pub msrp: String,
    pub upc: String,
    pub serial: String,
    pub pc_amount: String,
}

impl Record {
    /// Creates a record with the given id and every other field empty.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Year => &self.year,
            Field::Series => &self.series,
            Field::Wave => &self.wave,
            Field::Name => &self.name,
            Field::Variant => &self.variant,
            Field::Msrp => &self.msrp,
            Field::Upc => &self.upc,
            Field::Serial => &self.serial,
            Field::PcAmount => &self.pc_amount,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Id => &mut self.id,
            Field::Year => &mut self.year,
            Field::Series => &mut self.series,
            Field::Wave => &mut self.wave,
            Field::Name => &mut self.name,
            Field::Variant => &mut self.variant,
            Field::Msrp => &mut self.msrp,
            Field::Upc => &mut self.upc,
            Field::Serial => &mut self.serial,
            Field::PcAmount => &mut self.pc_amount,
        };
        *slot = value.into();
    }

    /// Cell values in backing-file column order.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        Field::ALL.into_iter().map(move |field| self.get(field))
    }
}

/// Field values supplied by the UI for add and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<Field, String>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds values from `(name, value)` pairs as submitted by a form.
    ///
    /// # Errors
    /// - `UnknownField` when a name does not resolve through [`Field::parse`].
    /// - `ReadOnlyField` when the id column is supplied.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values = Self::new();
        for (name, value) in pairs {
            let field = Field::parse(name.as_ref())
                .ok_or_else(|| ValidationError::UnknownField(name.as_ref().to_string()))?;
            values.insert(field, value);
        }
        values.ensure_writable()?;
        Ok(values)
    }

    /// Builder-style insert.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: Field, value: impl Into<String>) -> Option<String> {
        self.values.insert(field, value.into())
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Rejects values for store-owned fields.
    pub fn ensure_writable(&self) -> Result<(), ValidationError> {
        if self.contains(Field::Id) {
            return Err(ValidationError::ReadOnlyField(Field::Id));
        }
        Ok(())
    }

    /// Checks that every listed field is present and not blank.
    pub fn require_non_empty(&self, fields: &[Field]) -> Result<(), ValidationError> {
        for field in fields {
            match self.get(*field) {
                Some(value) if !value.trim().is_empty() => {}
                _ => return Err(ValidationError::MissingRequiredField(*field)),
            }
        }
        Ok(())
    }
}
