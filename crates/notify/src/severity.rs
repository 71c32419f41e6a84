//! Event severity and its display styling.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::defaults::{COLOR_ERROR, COLOR_INFO, COLOR_WARN, LABEL_ERROR, LABEL_INFO, LABEL_WARN};

/// Severity of the CI event being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational - the build or test passed
    Info,
    /// Warning - something needs attention
    Warn,
    /// Error - the build or test failed
    Error,
}

impl Severity {
    /// Parse a severity token.
    ///
    /// Returns `None` for anything other than `info`, `warn` or `error`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Get the Discord embed color for this severity.
    #[must_use]
    pub const fn color(&self) -> u32 {
        match self {
            Self::Info => COLOR_INFO,
            Self::Warn => COLOR_WARN,
            Self::Error => COLOR_ERROR,
        }
    }

    /// Get the long-form label, used as the default embed title.
    #[must_use]
    pub const fn long_label(&self) -> &'static str {
        match self {
            Self::Info => LABEL_INFO,
            Self::Warn => LABEL_WARN,
            Self::Error => LABEL_ERROR,
        }
    }

    /// Get the input token for this severity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
