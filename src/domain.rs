use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::StrainError;

/// Names of every field carried by a [`Strain`], in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrainField {
    Id,
    Name,
    Taxid,
    Taxonomy,
    Bioproject,
    Creation,
    Updated,
    Ndna,
    Ldna,
    Gc,
    Nprot,
    Lprot,
    Complete,
}

impl StrainField {
    pub const ALL: [StrainField; 13] = [
        StrainField::Id,
        StrainField::Name,
        StrainField::Taxid,
        StrainField::Taxonomy,
        StrainField::Bioproject,
        StrainField::Creation,
        StrainField::Updated,
        StrainField::Ndna,
        StrainField::Ldna,
        StrainField::Gc,
        StrainField::Nprot,
        StrainField::Lprot,
        StrainField::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrainField::Id => "id",
            StrainField::Name => "name",
            StrainField::Taxid => "taxid",
            StrainField::Taxonomy => "taxonomy",
            StrainField::Bioproject => "bioproject",
            StrainField::Creation => "creation",
            StrainField::Updated => "updated",
            StrainField::Ndna => "ndna",
            StrainField::Ldna => "ldna",
            StrainField::Gc => "gc",
            StrainField::Nprot => "nprot",
            StrainField::Lprot => "lprot",
            StrainField::Complete => "complete",
        }
    }
}

impl fmt::Display for StrainField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrainField {
    type Err = StrainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StrainField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| StrainError::UnknownField(value.to_string()))
    }
}

/// One catalogued bacterial strain.
///
/// The identifier is fixed at construction; every other attribute starts
/// unset and is filled in as metadata becomes available.
#[derive(Debug, Clone, PartialEq)]
pub struct Strain {
    id: String,
    pub name: Option<String>,
    pub taxid: Option<u64>,
    pub taxonomy: Option<String>,
    pub bioproject: Option<String>,
    pub creation: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    /// Number of DNA sequences (chromosomes and plasmids).
    pub ndna: Option<u64>,
    /// Genome length in base pairs.
    pub ldna: Option<u64>,
    /// GC-content as a fraction.
    pub gc: Option<f64>,
    pub nprot: Option<u64>,
    pub lprot: Option<u64>,
    /// Whether the genome assembly is complete.
    pub complete: Option<bool>,
}

impl Strain {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            taxid: None,
            taxonomy: None,
            bioproject: None,
            creation: None,
            updated: None,
            ndna: None,
            ldna: None,
            gc: None,
            nprot: None,
            lprot: None,
            complete: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Genome length in base pairs.
    pub fn length(&self) -> Result<u64, StrainError> {
        self.ldna.ok_or(StrainError::MissingField {
            field: StrainField::Ldna.as_str(),
        })
    }

    /// True when all of the general sequence statistics are known.
    pub fn check(&self) -> bool {
        self.ndna.is_some() && self.ldna.is_some() && self.nprot.is_some() && self.lprot.is_some()
    }

    pub fn get(&self, field: StrainField) -> Value {
        match field {
            StrainField::Id => Value::String(self.id.clone()),
            StrainField::Name => optional(self.name.clone()),
            StrainField::Taxid => optional(self.taxid),
            StrainField::Taxonomy => optional(self.taxonomy.clone()),
            StrainField::Bioproject => optional(self.bioproject.clone()),
            StrainField::Creation => optional(self.creation.map(format_timestamp)),
            StrainField::Updated => optional(self.updated.map(format_timestamp)),
            StrainField::Ndna => optional(self.ndna),
            StrainField::Ldna => optional(self.ldna),
            StrainField::Gc => optional(self.gc),
            StrainField::Nprot => optional(self.nprot),
            StrainField::Lprot => optional(self.lprot),
            StrainField::Complete => optional(self.complete),
        }
    }

    /// Every field keyed by name, unset ones as `null`.
    pub fn to_dict(&self) -> Map<String, Value> {
        StrainField::ALL
            .into_iter()
            .map(|field| (field.as_str().to_string(), self.get(field)))
            .collect()
    }
}

impl Serialize for Strain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dict().serialize(serializer)
    }
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn optional<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}
