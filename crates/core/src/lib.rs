//! `shopforge-core`: catalog foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no file IO):
//! identifiers, the entity trait, and the typed field model that tabular
//! import/export works through.

pub mod entity;
pub mod error;
pub mod field;
pub mod id;
pub mod record;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use field::{CoercionError, FieldDef, FieldKind, FieldValue};
pub use id::{ProductId, SupplierProductId};
pub use record::Record;
