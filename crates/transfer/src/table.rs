//! CSV reader/writer construction from transfer settings.

use std::io::{Read, Write};

use shopforge_infra::TransferSettings;

/// Reader expecting a header line; short records are allowed through so that
/// missing cells can be reported per row.
pub fn reader<R: Read>(source: R, settings: &TransferSettings) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(settings.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(if settings.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(source)
}

pub fn writer<W: Write>(sink: W, settings: &TransferSettings) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(settings.delimiter)
        .has_headers(false)
        .from_writer(sink)
}
