//! Record trait: field-level access used by tabular import/export.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::field::{FieldDef, FieldKind, FieldValue};

/// An entity whose state can be read and written field by field.
///
/// `set` must either apply the value or return an error leaving `self`
/// untouched.
pub trait Record: Entity + Clone {
    /// Fields exposed to tabular IO, in canonical column order.
    fn fields() -> &'static [FieldDef];

    /// A fresh instance with a new identifier and default values.
    fn blank() -> Self;

    fn get(&self, field: &str) -> DomainResult<FieldValue>;

    fn set(&mut self, field: &str, value: FieldValue) -> DomainResult<()>;

    fn field(name: &str) -> Option<&'static FieldDef> {
        Self::fields().iter().find(|f| f.name == name)
    }
}

fn mismatch(field: &str, expected: FieldKind, value: &FieldValue) -> DomainError {
    DomainError::validation(format!("field '{field}' expects {expected}, got {value:?}"))
}

pub fn required_text(field: &str, value: FieldValue) -> DomainResult<String> {
    match value {
        FieldValue::Text(s) => Ok(s),
        other => Err(mismatch(field, FieldKind::Text, &other)),
    }
}

pub fn optional_text(field: &str, value: FieldValue) -> DomainResult<Option<String>> {
    match value {
        FieldValue::Null => Ok(None),
        other => required_text(field, other).map(Some),
    }
}

pub fn required_integer(field: &str, value: FieldValue) -> DomainResult<i64> {
    match value {
        FieldValue::Integer(i) => Ok(i),
        other => Err(mismatch(field, FieldKind::Integer, &other)),
    }
}

pub fn optional_integer(field: &str, value: FieldValue) -> DomainResult<Option<i64>> {
    match value {
        FieldValue::Null => Ok(None),
        other => required_integer(field, other).map(Some),
    }
}

pub fn required_bool(field: &str, value: FieldValue) -> DomainResult<bool> {
    match value {
        FieldValue::Bool(b) => Ok(b),
        other => Err(mismatch(field, FieldKind::Bool, &other)),
    }
}

pub fn required_uuid(field: &str, value: FieldValue) -> DomainResult<Uuid> {
    match value {
        FieldValue::Uuid(u) => Ok(u),
        other => Err(mismatch(field, FieldKind::Uuid, &other)),
    }
}

pub fn optional_uuid(field: &str, value: FieldValue) -> DomainResult<Option<Uuid>> {
    match value {
        FieldValue::Null => Ok(None),
        other => required_uuid(field, other).map(Some),
    }
}

pub fn optional_datetime(field: &str, value: FieldValue) -> DomainResult<Option<DateTime<Utc>>> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::DateTime(dt) => Ok(Some(dt)),
        other => Err(mismatch(field, FieldKind::DateTime, &other)),
    }
}
