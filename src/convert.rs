use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{Strain, StrainField};
use crate::error::StrainError;

/// What to do with keys that do not name a strain field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    #[default]
    Reject,
    Ignore,
}

/// Builds a strain from a JSON-derived object, rejecting unknown keys.
pub fn strain_from_map(map: &Map<String, Value>) -> Result<Strain, StrainError> {
    strain_from_map_with(map, UnknownFieldPolicy::Reject)
}

pub fn strain_from_map_with(
    map: &Map<String, Value>,
    policy: UnknownFieldPolicy,
) -> Result<Strain, StrainError> {
    let id = map.get(StrainField::Id.as_str()).ok_or_else(|| StrainError::MissingKey {
        key: StrainField::Id.as_str().to_string(),
    })?;
    let id = as_text(StrainField::Id, id)?.ok_or_else(|| invalid(StrainField::Id, id))?;

    let mut strain = Strain::new(id);
    for (key, value) in map {
        let field = match key.parse::<StrainField>() {
            Ok(StrainField::Id) => continue,
            Ok(field) => field,
            Err(err) => match policy {
                UnknownFieldPolicy::Reject => return Err(err),
                UnknownFieldPolicy::Ignore => {
                    debug!(key = %key, "ignoring unknown strain field");
                    continue;
                }
            },
        };
        assign(&mut strain, field, value)?;
    }
    Ok(strain)
}

/// Parses a JSON document holding either a single strain object or an array of them.
pub fn strains_from_json(
    content: &str,
    policy: UnknownFieldPolicy,
) -> Result<Vec<Strain>, StrainError> {
    let value: Value =
        serde_json::from_str(content).map_err(|err| StrainError::JsonParse(err.to_string()))?;
    match value {
        Value::Object(map) => Ok(vec![strain_from_map_with(&map, policy)?]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => strain_from_map_with(map, policy),
                other => Err(StrainError::InvalidFieldValue {
                    field: "strain".to_string(),
                    value: other.to_string(),
                }),
            })
            .collect(),
        other => Err(StrainError::InvalidFieldValue {
            field: "strain".to_string(),
            value: other.to_string(),
        }),
    }
}

fn assign(strain: &mut Strain, field: StrainField, value: &Value) -> Result<(), StrainError> {
    match field {
        StrainField::Id => {}
        StrainField::Name => strain.name = as_text(field, value)?,
        StrainField::Taxid => strain.taxid = as_count(field, value)?,
        StrainField::Taxonomy => strain.taxonomy = as_text(field, value)?,
        StrainField::Bioproject => strain.bioproject = as_text(field, value)?,
        StrainField::Creation => strain.creation = as_timestamp(field, value)?,
        StrainField::Updated => strain.updated = as_timestamp(field, value)?,
        StrainField::Ndna => strain.ndna = as_count(field, value)?,
        StrainField::Ldna => strain.ldna = as_count(field, value)?,
        StrainField::Gc => strain.gc = as_fraction(field, value)?,
        StrainField::Nprot => strain.nprot = as_count(field, value)?,
        StrainField::Lprot => strain.lprot = as_count(field, value)?,
        StrainField::Complete => strain.complete = as_flag(field, value)?,
    }
    Ok(())
}

fn invalid(field: StrainField, value: &Value) -> StrainError {
    StrainError::InvalidFieldValue {
        field: field.as_str().to_string(),
        value: value.to_string(),
    }
}

fn as_text(field: StrainField, value: &Value) -> Result<Option<String>, StrainError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Number(number) => Ok(Some(number.to_string())),
        other => Err(invalid(field, other)),
    }
}

fn as_count(field: StrainField, value: &Value) -> Result<Option<u64>, StrainError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number.as_u64().map(Some).ok_or_else(|| invalid(field, value)),
        Value::String(text) => {
            let cleaned: String = text.trim().chars().filter(|ch| *ch != ',').collect();
            cleaned
                .parse::<u64>()
                .map(Some)
                .map_err(|_| invalid(field, value))
        }
        other => Err(invalid(field, other)),
    }
}

fn as_fraction(field: StrainField, value: &Value) -> Result<Option<f64>, StrainError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number.as_f64().map(Some).ok_or_else(|| invalid(field, value)),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .map(Some)
            .ok_or_else(|| invalid(field, value)),
        other => Err(invalid(field, other)),
    }
}

fn as_flag(field: StrainField, value: &Value) -> Result<Option<bool>, StrainError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(*flag)),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(invalid(field, value)),
        },
        other => Err(invalid(field, other)),
    }
}

fn as_timestamp(field: StrainField, value: &Value) -> Result<Option<DateTime<Utc>>, StrainError> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(text) => text.trim(),
        other => return Err(invalid(field, other)),
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| invalid(field, value))
}
