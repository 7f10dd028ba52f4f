//! Typed field model for tabular import/export.
//!
//! Entities expose their columns as [`FieldDef`]s. Cells travel as plain
//! strings; [`FieldDef::coerce`] turns a cell into a [`FieldValue`] and
//! [`FieldValue::render`] turns it back. The two agree: rendering a value and
//! coercing the result yields the same value.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Declared type of an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Bool,
    Uuid,
    DateTime,
}

impl core::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Bool => "bool",
            FieldKind::Uuid => "uuid",
            FieldKind::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// A column an entity exposes to tabular IO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldDef {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }

    /// Coerce a raw cell into a typed value.
    ///
    /// Empty cells become `Null` for nullable fields and `Text("")` for
    /// required text; any other required kind rejects them.
    pub fn coerce(&self, raw: &str) -> Result<FieldValue, CoercionError> {
        let trimmed = raw.trim();
        let blank = match self.kind {
            FieldKind::Text => raw.is_empty(),
            _ => trimmed.is_empty(),
        };
        if blank && self.nullable {
            return Ok(FieldValue::Null);
        }

        let invalid = || CoercionError::Invalid {
            field: self.name.to_string(),
            kind: self.kind,
            value: raw.to_string(),
        };

        match self.kind {
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            _ if blank => Err(CoercionError::Empty {
                field: self.name.to_string(),
            }),
            FieldKind::Integer => trimmed
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| invalid()),
            FieldKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(FieldValue::Bool(true)),
                "0" | "false" | "no" => Ok(FieldValue::Bool(false)),
                _ => Err(invalid()),
            },
            FieldKind::Uuid => Uuid::parse_str(trimmed)
                .map(FieldValue::Uuid)
                .map_err(|_| invalid()),
            FieldKind::DateTime => DateTime::parse_from_rfc3339(trimmed)
                .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| invalid()),
        }
    }
}

/// A cell string could not be turned into the field's declared type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("field '{field}' requires a value")]
    Empty { field: String },

    #[error("cannot read '{value}' as {kind} for field '{field}'")]
    Invalid {
        field: String,
        kind: FieldKind,
        value: String,
    },
}

/// Typed value of an entity field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Bool(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Render as a cell string (`Null` becomes the empty string).
    pub fn render(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Bool(true) => "1".to_string(),
            FieldValue::Bool(false) => "0".to_string(),
            FieldValue::Uuid(u) => u.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
