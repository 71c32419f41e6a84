//! Construction of the outgoing webhook message.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::defaults::{DEFAULT_AVATAR_URL, DEFAULT_USERNAME};
use crate::fields::Field;
use crate::inputs::NotifyInputs;
use crate::severity::Severity;

/// The payload handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub username: String,
    pub avatar_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

/// A rich message block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Assemble the message for one notification.
///
/// An embed is built when a title, description, severity or at least one
/// field is present, unless the `SuppressEmbeds` flag is set. Without an
/// explicit title the embed takes the severity's long label. `content` is
/// omitted when there is no text.
#[must_use]
pub fn build_message(
    inputs: &NotifyInputs,
    fields: &[Field],
    severity: Option<Severity>,
) -> WebhookMessage {
    let wants_embed = inputs.title.is_some()
        || inputs.description.is_some()
        || severity.is_some()
        || !fields.is_empty();

    let embeds = if wants_embed && !inputs.flags.suppress_embeds {
        vec![Embed {
            title: inputs
                .title
                .clone()
                .or_else(|| severity.map(|s| s.long_label().to_string())),
            description: inputs.description.clone(),
            color: severity.map(|s| s.color()),
            fields: fields.to_vec(),
            timestamp: Some(Utc::now()),
        }]
    } else {
        Vec::new()
    };

    WebhookMessage {
        content: inputs.text.clone().filter(|t| !t.is_empty()),
        username: inputs
            .username
            .clone()
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
        avatar_url: inputs
            .avatar_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
        embeds,
    }
}
