//! Discord webhook transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{DeliveryOptions, WebhookTransport};
use crate::error::TransportError;
use crate::message::WebhookMessage;

/// Default HTTP timeout for a webhook call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts messages to a Discord "execute webhook" endpoint.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    client: reqwest::Client,
}

impl DiscordWebhook {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a specific request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Resolve the request URL, adding the components query when needed.
    fn request_url(webhook_url: &str, options: DeliveryOptions) -> Result<Url, TransportError> {
        let mut url = Url::parse(webhook_url)
            .map_err(|e| TransportError::Other(format!("Invalid webhook URL: {e}")))?;
        if options.flags.components_v2 {
            url.query_pairs_mut().append_pair("with_components", "true");
        }
        Ok(url)
    }
}

#[async_trait]
impl WebhookTransport for DiscordWebhook {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send(
        &self,
        webhook_url: &str,
        message: &WebhookMessage,
        options: DeliveryOptions,
    ) -> Result<(), TransportError> {
        let url = Self::request_url(webhook_url, options)?;
        let body = WebhookBody {
            message,
            flags: options.flags.bits(),
        };

        debug!(
            channel = "discord",
            embed_count = message.embeds.len(),
            flags = body.flags,
            "Sending notification"
        );

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(channel = "discord", "Notification sent successfully");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = retry_after_secs(&text);
            warn!(
                channel = "discord",
                retry_after_secs, "Discord webhook rate limited"
            );
            return Err(TransportError::RateLimited { retry_after_secs });
        }

        warn!(
            channel = "discord",
            status = %status,
            body = %text,
            "Discord webhook request failed"
        );

        Err(TransportError::Rejected {
            status: status.as_u16(),
            body: text,
        })
    }
}

/// Seconds to wait according to a 429 response body, rounded up.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn retry_after_secs(body: &str) -> u64 {
    serde_json::from_str::<RateLimitBody>(body)
        .ok()
        .and_then(|b| b.retry_after)
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map_or(1, |secs| secs.ceil() as u64)
}

// =============================================================================
// Discord API types
// =============================================================================

#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    #[serde(flatten)]
    message: &'a WebhookMessage,
    #[serde(skip_serializing_if = "is_zero")]
    flags: u32,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Debug, Deserialize)]
struct RateLimitBody {
    #[serde(default)]
    retry_after: Option<f64>,
}
