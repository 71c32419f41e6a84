//! ci-notify - send a CI build/test notification to a Discord webhook.
//!
//! Every message option can be passed as a flag or through the matching
//! `INPUT_*` environment variable, so the binary can run directly as a
//! GitHub Actions step.
//!
//! # Examples
//!
//! ```bash
//! # Plain text
//! ci-notify --webhook-url "$DISCORD_WEBHOOK" --text "Deploy finished"
//!
//! # Failed build with fields
//! ci-notify --webhook-url "$DISCORD_WEBHOOK" --severity error \
//!     --description "cargo test failed" \
//!     --fields '[{"name": "Branch", "value": "main", "inline": true}]'
//!
//! # Silent, text only
//! ci-notify --webhook-url "$DISCORD_WEBHOOK" --text "nightly ok" \
//!     --flags "SuppressNotifications SuppressEmbeds"
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ci_notify::defaults::DEFAULT_TEST_URL_FILE;
use ci_notify::inputs::names;
use ci_notify::{
    DeliveryController, DeliveryOutcome, DiscordWebhook, Holddown, MapInputs, Reporter,
    TracingReporter, WorkflowCommandReporter,
};
use clap::{Parser, ValueEnum};

/// Send a CI notification to a Discord webhook.
#[derive(Parser)]
#[command(name = "ci-notify")]
#[command(about = "Send a CI build/test notification to a Discord webhook")]
#[command(version)]
struct Cli {
    /// Discord webhook URL (`useTestURL` reads it from --test-url-file)
    #[arg(long, env = "INPUT_WEBHOOKURL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// Space-separated flags: SuppressNotifications SuppressEmbeds IsComponentsV2
    #[arg(long, env = "INPUT_FLAGS")]
    flags: Option<String>,

    /// Sender name override
    #[arg(long, env = "INPUT_USERNAME")]
    username: Option<String>,

    /// Sender avatar URL override
    #[arg(long, env = "INPUT_AVATARURL")]
    avatar_url: Option<String>,

    /// Plain message text
    #[arg(long, env = "INPUT_TEXT")]
    text: Option<String>,

    /// Event severity: info, warn or error
    #[arg(long, env = "INPUT_SEVERITY")]
    severity: Option<String>,

    /// Embed title (defaults to the severity label)
    #[arg(long, env = "INPUT_TITLE")]
    title: Option<String>,

    /// Embed description
    #[arg(long, env = "INPUT_DESCRIPTION")]
    description: Option<String>,

    /// JSON array of {"name", "value", "inline"} embed fields
    #[arg(long, env = "INPUT_FIELDS")]
    fields: Option<String>,

    /// Minimum milliseconds between two sends
    #[arg(long, env = "NOTIFY_HOLDDOWN_MS", default_value_t = 2000)]
    holddown_ms: u64,

    /// File holding the webhook URL used for `useTestURL`
    #[arg(long, env = "NOTIFY_TEST_URL_FILE", default_value = DEFAULT_TEST_URL_FILE)]
    test_url_file: PathBuf,

    /// HTTP timeout for the webhook call, in seconds
    #[arg(long, env = "NOTIFY_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Where warnings and notices go
    #[arg(long, value_enum, default_value_t = ReporterKind::Workflow)]
    reporter: ReporterKind,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum ReporterKind {
    /// GitHub Actions workflow commands on stdout
    #[default]
    Workflow,
    /// Log lines only
    Log,
}

impl Cli {
    fn inputs(&self) -> MapInputs {
        let mut inputs = MapInputs::new();
        inputs.insert_opt(names::WEBHOOK_URL, self.webhook_url.clone());
        inputs.insert_opt(names::FLAGS, self.flags.clone());
        inputs.insert_opt(names::USERNAME, self.username.clone());
        inputs.insert_opt(names::AVATAR_URL, self.avatar_url.clone());
        inputs.insert_opt(names::TEXT, self.text.clone());
        inputs.insert_opt(names::SEVERITY, self.severity.clone());
        inputs.insert_opt(names::TITLE, self.title.clone());
        inputs.insert_opt(names::DESCRIPTION, self.description.clone());
        inputs.insert_opt(names::FIELDS, self.fields.clone());
        inputs
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let transport = DiscordWebhook::with_timeout(Duration::from_secs(cli.timeout_secs))
        .context("Failed to create webhook client")?;
    let reporter: Arc<dyn Reporter> = match cli.reporter {
        ReporterKind::Workflow => Arc::new(WorkflowCommandReporter),
        ReporterKind::Log => Arc::new(TracingReporter),
    };

    let mut controller = DeliveryController::new(
        Arc::new(transport),
        reporter,
        Holddown::new(Duration::from_millis(cli.holddown_ms)),
    )
    .with_test_url_file(&cli.test_url_file);

    let outcome = controller
        .run(&cli.inputs())
        .await
        .context("Failed to resolve webhook URL")?;

    match outcome {
        DeliveryOutcome::Delivered => tracing::info!("Notification delivered"),
        DeliveryOutcome::Skipped => tracing::info!("Notification skipped"),
        DeliveryOutcome::Failed(error) => tracing::info!(%error, "Notification not delivered"),
    }

    Ok(())
}
