//! CI notifications delivered to Discord webhooks.
//!
//! This crate turns a loosely-typed set of CI inputs (text, severity, title,
//! description, fields, flags) into a Discord webhook message and sends it
//! once, spacing repeated sends within one process by a holddown interval.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use ci_notify::{DeliveryController, DiscordWebhook, EnvInputs, Holddown, TracingReporter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut controller = DeliveryController::new(
//!     Arc::new(DiscordWebhook::new()?),
//!     Arc::new(TracingReporter),
//!     Holddown::default(),
//! );
//!
//! // Reads INPUT_WEBHOOKURL, INPUT_TEXT, INPUT_SEVERITY, ...
//! let outcome = controller.run(&EnvInputs).await?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```
//!
//! # Inputs
//!
//! - `webhookUrl`: delivery target; empty means nothing is sent. The value
//!   `useTestURL` reads the target from a local file instead.
//! - `flags`: space-separated `SuppressNotifications`, `SuppressEmbeds`,
//!   `IsComponentsV2`; other tokens are ignored
//! - `username`, `avatarUrl`: sender identity overrides
//! - `text`: plain message body
//! - `severity`: `info`, `warn` or `error`
//! - `title`, `description`: embed overrides
//! - `fields`: JSON array of `{ "name", "value", "inline" }`
//!
//! # Architecture
//!
//! - [`validate_fields`] sanitizes the `fields` input
//! - [`build_message`] composes the [`WebhookMessage`]
//! - [`DeliveryController`] applies the holddown and calls the transport
//! - [`WebhookTransport`] is the delivery seam; [`DiscordWebhook`] implements it

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod defaults;
pub mod delivery;
pub mod error;
pub mod fields;
pub mod flags;
pub mod inputs;
pub mod message;
pub mod reporter;
pub mod severity;
pub mod transport;

pub use delivery::{DeliveryController, DeliveryOutcome, DeliveryState, Holddown};
pub use error::{NotifyError, TransportError};
pub use fields::{validate_fields, Field, FieldDiagnostic, FieldValidation};
pub use flags::{FlagSet, MessageFlag};
pub use inputs::{EnvInputs, InputSource, MapInputs, NotifyInputs};
pub use message::{build_message, Embed, WebhookMessage};
pub use reporter::{Reporter, TracingReporter, WorkflowCommandReporter};
pub use severity::Severity;
pub use transport::discord::DiscordWebhook;
pub use transport::{DeliveryOptions, WebhookTransport};
