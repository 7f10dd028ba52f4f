//! Saved transfer profiles (JSON).
//!
//! A profile bundles everything an admin picks for a recurring export/import:
//! which fields go to which labels, the header order, the composite key, and
//! whether unmatched rows may create entities.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopforge_infra::TransferSettings;

use crate::mapping::{ColumnMapping, SearchCriteria};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse profile: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid profile: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferProfile {
    pub columns: ColumnMapping,

    /// Export header; defaults to the mapped labels in mapping order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,

    #[serde(default)]
    pub search_criteria: SearchCriteria,

    /// Overrides [`TransferSettings::add_new`] when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_new: Option<bool>,
}

impl TransferProfile {
    pub fn new(columns: ColumnMapping) -> Self {
        Self {
            columns,
            header: None,
            search_criteria: SearchCriteria::default(),
            add_new: None,
        }
    }

    pub fn with_header<I, S>(mut self, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = Some(header.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_search_criteria(mut self, criteria: SearchCriteria) -> Self {
        self.search_criteria = criteria;
        self
    }

    pub fn with_add_new(mut self, add_new: bool) -> Self {
        self.add_new = Some(add_new);
        self
    }

    pub fn header(&self) -> Vec<String> {
        self.header.clone().unwrap_or_else(|| self.columns.labels())
    }

    pub fn add_new(&self, settings: &TransferSettings) -> bool {
        self.add_new.unwrap_or(settings.add_new)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.columns.is_empty() {
            return Err(ProfileError::Invalid("no columns mapped".to_string()));
        }
        if let Some(field) = self
            .search_criteria
            .iter()
            .find(|f| !self.columns.contains_field(f))
        {
            return Err(ProfileError::Invalid(format!(
                "search field '{field}' is not mapped to a column"
            )));
        }
        if let Some(header) = &self.header {
            if let Some(column) = self.columns.iter().find(|c| !header.contains(&c.label)) {
                return Err(ProfileError::Invalid(format!(
                    "label '{}' is missing from the header",
                    column.label
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
