//! Tabular (CSV) bulk export/import of catalog entities.
//!
//! Export writes one row per entity under a caller-supplied header. Import
//! matches rows to existing entities by a composite key, updates or creates
//! them, and collects per-row failures without aborting the batch.

pub mod error;
pub mod export;
pub mod import;
pub mod mapping;
pub mod profile;
pub mod table;

pub use error::TransferError;
pub use export::{ExportSummary, export_store, export_table, export_to_path};
pub use import::{
    FailureReason, ImportOutcome, ImportRow, RowFailure, import_from_path, import_table,
};
pub use mapping::{Column, ColumnMapping, SearchCriteria};
pub use profile::{ProfileError, TransferProfile};
