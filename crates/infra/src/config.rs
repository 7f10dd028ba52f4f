//! Configuration loading and representation.
//!
//! Settings come from environment variables. Invalid values fall back to the
//! default with a warning instead of aborting.

pub const DELIMITER_VAR: &str = "SHOPFORGE_CSV_DELIMITER";
pub const ADD_NEW_VAR: &str = "SHOPFORGE_IMPORT_ADD_NEW";
pub const TRIM_VAR: &str = "SHOPFORGE_CSV_TRIM";

/// Tabular import/export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSettings {
    /// Field delimiter byte (`;` by default).
    pub delimiter: u8,
    /// Whether imports create entities for unmatched rows unless told otherwise.
    pub add_new: bool,
    /// Whether every cell is trimmed of surrounding whitespace on import.
    ///
    /// Off by default so exported text reads back unchanged. Non-text kinds
    /// are trimmed during coercion either way.
    pub trim: bool,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            delimiter: b';',
            add_new: false,
            trim: false,
        }
    }
}

impl TransferSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let delimiter = match lookup(DELIMITER_VAR) {
            Some(raw) => parse_delimiter(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "{DELIMITER_VAR} must be a single ASCII character; using ';'");
                defaults.delimiter
            }),
            None => defaults.delimiter,
        };

        Self {
            delimiter,
            add_new: bool_var(&lookup, ADD_NEW_VAR, defaults.add_new),
            trim: bool_var(&lookup, TRIM_VAR, defaults.trim),
        }
    }
}

fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Some(*b),
        _ if raw == "\\t" => Some(b'\t'),
        _ => None,
    }
}

fn bool_var(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(value = %raw, "{key} is not a boolean; using {default}");
            default
        }
    }
}
