//! Webhook transport implementations.

pub mod discord;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::flags::FlagSet;
use crate::message::WebhookMessage;

/// Per-delivery options forwarded to the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryOptions {
    /// Message flags. `SuppressNotifications` and `IsComponentsV2` are only
    /// meaningful here; the message builder does not look at them.
    pub flags: FlagSet,
}

/// Trait for anything that can deliver a [`WebhookMessage`].
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Get the name of this transport.
    fn name(&self) -> &'static str;

    /// Deliver one message to `webhook_url`.
    async fn send(
        &self,
        webhook_url: &str,
        message: &WebhookMessage,
        options: DeliveryOptions,
    ) -> Result<(), TransportError>;
}
