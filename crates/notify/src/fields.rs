//! Validation of the `fields` input.
//!
//! The input is a JSON array of `{ "name", "value", "inline" }` objects.
//! Problems never abort a run: they are returned as [`FieldDiagnostic`]s
//! next to the best-effort field list.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::defaults::MAX_FIELDS;

/// A labeled key/value annotation attached to an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Field {
    /// Create a non-inline field.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// A non-fatal problem found while validating fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldDiagnostic {
    /// The input could not be parsed
    #[error("The fields input is not valid JSON: {0}")]
    InvalidJson(String),

    /// The input parsed, but not to an array
    #[error("The fields input is not an array")]
    NotAnArray,

    /// An entry has a missing or non-string name or value
    #[error("A field name or value is not a string (entry {index}); all fields ignored")]
    NotAString { index: usize },

    /// More entries than Discord accepts
    #[error("Discord only supports up to 25 fields. Extra fields ignored.")]
    TooMany { count: usize },
}

/// Result of [`validate_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValidation {
    pub fields: Vec<Field>,
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl FieldValidation {
    fn rejected(diagnostics: Vec<FieldDiagnostic>) -> Self {
        Self {
            fields: Vec::new(),
            diagnostics,
        }
    }
}

/// Parse and sanitize the raw `fields` input.
///
/// Entries past [`MAX_FIELDS`] are dropped before the remaining entries are
/// checked. A single entry with a non-string `name` or `value` empties the
/// whole list. `inline` is `true` only when the input holds boolean `true`.
#[must_use]
pub fn validate_fields(raw: Option<&str>) -> FieldValidation {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return FieldValidation::default();
    };

    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            return FieldValidation::rejected(vec![FieldDiagnostic::InvalidJson(e.to_string())]);
        }
    };

    let Value::Array(mut entries) = parsed else {
        return FieldValidation::rejected(vec![FieldDiagnostic::NotAnArray]);
    };

    let mut diagnostics = Vec::new();
    if entries.len() > MAX_FIELDS {
        diagnostics.push(FieldDiagnostic::TooMany {
            count: entries.len(),
        });
        entries.truncate(MAX_FIELDS);
    }

    let mut fields = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let (Some(Value::String(name)), Some(Value::String(value))) =
            (entry.get("name"), entry.get("value"))
        else {
            diagnostics.push(FieldDiagnostic::NotAString { index });
            return FieldValidation::rejected(diagnostics);
        };

        fields.push(Field {
            name: name.clone(),
            value: value.clone(),
            inline: matches!(entry.get("inline"), Some(Value::Bool(true))),
        });
    }

    debug!(field_count = fields.len(), "Validated fields input");

    FieldValidation {
        fields,
        diagnostics,
    }
}
