//! Tabular export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use shopforge_core::Record;
use shopforge_infra::{EntityStore, TransferSettings};

use crate::error::TransferError;
use crate::mapping::ColumnMapping;
use crate::profile::TransferProfile;
use crate::table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
}

/// Field name paired with the header position its value is written to.
fn plan<R: Record>(
    mapping: &ColumnMapping,
    header: &[String],
) -> Result<Vec<(String, usize)>, TransferError> {
    mapping
        .iter()
        .map(|column| {
            if R::field(&column.field).is_none() {
                return Err(TransferError::config(format!(
                    "field '{}' is not exported by this entity",
                    column.field
                )));
            }
            let position = header
                .iter()
                .position(|h| *h == column.label)
                .ok_or_else(|| {
                    TransferError::config(format!(
                        "label '{}' (field '{}') is missing from the header",
                        column.label, column.field
                    ))
                })?;
            Ok((column.field.clone(), position))
        })
        .collect()
}

/// Write `header`, then one row per entity of `rows`, in iteration order.
///
/// Each mapped field is rendered into the column of its label; header columns
/// no field maps to stay empty. The mapping is checked against the header and
/// the entity type before anything is written.
pub fn export_table<R, I, W>(
    rows: I,
    sink: &mut csv::Writer<W>,
    mapping: &ColumnMapping,
    header: &[String],
) -> Result<ExportSummary, TransferError>
where
    R: Record,
    I: IntoIterator<Item = R>,
    W: Write,
{
    let plan = plan::<R>(mapping, header)?;

    sink.write_record(header)?;

    let mut written = 0;
    let mut cells = vec![String::new(); header.len()];
    for entity in rows {
        cells.iter_mut().for_each(String::clear);
        for (field, position) in &plan {
            cells[*position] = entity.get(field)?.render();
        }
        sink.write_record(&cells)?;
        written += 1;
    }
    sink.flush()?;

    tracing::info!(rows = written, columns = header.len(), "export finished");
    Ok(ExportSummary { rows: written })
}

/// Export a store's whole collection in collection order.
pub fn export_store<S, W>(
    store: &S,
    sink: &mut csv::Writer<W>,
    mapping: &ColumnMapping,
    header: &[String],
) -> Result<ExportSummary, TransferError>
where
    S: EntityStore,
    S::Entity: Record,
    W: Write,
{
    export_table(store.list()?, sink, mapping, header)
}

/// Export into a file (created or truncated) using a transfer profile.
pub fn export_to_path<R, I>(
    path: impl AsRef<Path>,
    rows: I,
    profile: &TransferProfile,
    settings: &TransferSettings,
) -> Result<ExportSummary, TransferError>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let file = File::create(path.as_ref())?;
    let mut sink = table::writer(file, settings);
    export_table(rows, &mut sink, &profile.columns, &profile.header())
}
