//! Sources of raw, string-keyed notification inputs.

use std::collections::BTreeMap;

use crate::flags::FlagSet;

/// Input names recognised by [`NotifyInputs::from_source`].
pub mod names {
    pub const WEBHOOK_URL: &str = "webhookUrl";
    pub const FLAGS: &str = "flags";
    pub const USERNAME: &str = "username";
    pub const AVATAR_URL: &str = "avatarUrl";
    pub const TEXT: &str = "text";
    pub const SEVERITY: &str = "severity";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const FIELDS: &str = "fields";
}

/// A configuration reader.
///
/// Implementations return `None` for inputs that are not set. Callers treat
/// empty strings the same as `None`.
pub trait InputSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads inputs from `INPUT_<NAME>` environment variables, the way GitHub
/// Actions exposes `with:` inputs to a step.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl EnvInputs {
    /// Environment variable holding the named input.
    #[must_use]
    pub fn var_name(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputSource for EnvInputs {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(Self::var_name(name)).ok()
    }
}

/// In-memory inputs.
#[derive(Debug, Clone, Default)]
pub struct MapInputs(BTreeMap<String, String>);

impl MapInputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an input, replacing any previous value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Set an input only when a value is present.
    pub fn insert_opt(&mut self, name: impl Into<String>, value: Option<String>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }
}

impl InputSource for MapInputs {
    fn get(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Raw inputs for one notification, with empty values normalised to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyInputs {
    pub webhook_url: Option<String>,
    pub flags: FlagSet,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub text: Option<String>,
    pub severity: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Option<String>,
}

impl NotifyInputs {
    /// Read every recognised input from `source`.
    pub fn from_source(source: &dyn InputSource) -> Self {
        let get = |name: &str| source.get(name).filter(|v| !v.trim().is_empty());

        Self {
            webhook_url: get(names::WEBHOOK_URL).map(|v| v.trim().to_string()),
            flags: get(names::FLAGS)
                .map(|v| FlagSet::parse(&v))
                .unwrap_or_default(),
            username: get(names::USERNAME),
            avatar_url: get(names::AVATAR_URL),
            text: get(names::TEXT),
            severity: get(names::SEVERITY),
            title: get(names::TITLE),
            description: get(names::DESCRIPTION),
            fields: get(names::FIELDS),
        }
    }
}
