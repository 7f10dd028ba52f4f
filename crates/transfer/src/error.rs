use thiserror::Error;

use shopforge_core::DomainError;
use shopforge_infra::StoreError;

/// Failure that aborts a whole export or import.
///
/// Per-row import problems are not errors; they are collected in
/// [`crate::ImportOutcome::failed`].
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Mapping, header or criteria do not fit together or the entity type.
    #[error("invalid transfer configuration: {0}")]
    Config(String),
}

impl TransferError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
