//! Delivery control: holddown between sends and outcome classification.
//!
//! A [`DeliveryController`] is created once per process and reused for every
//! notification that process sends. It owns the [`Holddown`] state, so two
//! notifications sent back to back are always spaced by at least the
//! configured interval, whether the first one succeeded or not.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::defaults::{DEFAULT_HOLDDOWN, DEFAULT_TEST_URL_FILE, TEST_URL_SENTINEL};
use crate::error::{NotifyError, TransportError};
use crate::fields::{validate_fields, Field};
use crate::inputs::{InputSource, NotifyInputs};
use crate::message::build_message;
use crate::reporter::Reporter;
use crate::severity::Severity;
use crate::transport::{DeliveryOptions, WebhookTransport};

/// Warning reported when no webhook URL is configured.
pub const MISSING_WEBHOOK_URL: &str = "webhookUrl was not provided; notification not sent";

/// Minimum interval between delivery attempts, and when the last one began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holddown {
    interval: Duration,
    last_attempt: Option<Instant>,
}

impl Holddown {
    /// Holddown with no previous attempt.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_attempt: None,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub const fn last_attempt(&self) -> Option<Instant> {
        self.last_attempt
    }

    /// Time left before another attempt may start.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last_attempt.map_or(Duration::ZERO, |last| {
            self.interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Record the start of an attempt.
    pub fn record(&mut self, at: Instant) {
        self.last_attempt = Some(at);
    }
}

impl Default for Holddown {
    fn default() -> Self {
        Self::new(DEFAULT_HOLDDOWN)
    }
}

/// Where the controller is in its current (or most recent) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Idle,
    Waiting,
    Sending,
    Delivered,
    Failed,
}

/// How a run ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The transport accepted the message
    Delivered,
    /// No webhook URL was configured; nothing was sent
    Skipped,
    /// The transport failed; a notice was reported
    Failed(String),
}

/// Drives one notification from raw inputs to the transport.
pub struct DeliveryController {
    transport: Arc<dyn WebhookTransport>,
    reporter: Arc<dyn Reporter>,
    holddown: Holddown,
    test_url_file: PathBuf,
    state: DeliveryState,
}

impl DeliveryController {
    /// Create a controller. `holddown` is the process-wide holddown state;
    /// pass [`Holddown::default`] at process start.
    #[must_use]
    pub fn new(
        transport: Arc<dyn WebhookTransport>,
        reporter: Arc<dyn Reporter>,
        holddown: Holddown,
    ) -> Self {
        Self {
            transport,
            reporter,
            holddown,
            test_url_file: PathBuf::from(DEFAULT_TEST_URL_FILE),
            state: DeliveryState::Idle,
        }
    }

    /// Read the test endpoint for [`TEST_URL_SENTINEL`] from `path`.
    #[must_use]
    pub fn with_test_url_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_url_file = path.into();
        self
    }

    #[must_use]
    pub const fn state(&self) -> DeliveryState {
        self.state
    }

    #[must_use]
    pub const fn holddown(&self) -> &Holddown {
        &self.holddown
    }

    /// Read inputs from `source` and deliver the resulting notification.
    ///
    /// Missing configuration, bad fields and transport failures are reported
    /// and folded into the returned [`DeliveryOutcome`]. Only a failure to
    /// resolve the test endpoint is returned as an error.
    pub async fn run(&mut self, source: &dyn InputSource) -> Result<DeliveryOutcome, NotifyError> {
        let inputs = NotifyInputs::from_source(source);
        self.deliver(&inputs).await
    }

    /// Deliver a notification from already-read inputs.
    pub async fn deliver(&mut self, inputs: &NotifyInputs) -> Result<DeliveryOutcome, NotifyError> {
        self.state = DeliveryState::Idle;

        let Some(raw_url) = inputs.webhook_url.as_deref() else {
            self.reporter.warning(MISSING_WEBHOOK_URL);
            return Ok(DeliveryOutcome::Skipped);
        };
        let webhook_url = self.resolve_webhook_url(raw_url).await?;

        let severity = self.parse_severity(inputs.severity.as_deref());
        let validation = validate_fields(inputs.fields.as_deref());
        for diagnostic in &validation.diagnostics {
            self.reporter.warning(&diagnostic.to_string());
        }

        let message = build_message(inputs, &validation.fields, severity);
        let options = DeliveryOptions {
            flags: inputs.flags,
        };

        self.wait_for_holddown().await;

        self.state = DeliveryState::Sending;
        self.holddown.record(Instant::now());

        match self.transport.send(&webhook_url, &message, options).await {
            Ok(()) => {
                self.state = DeliveryState::Delivered;
                info!(
                    transport = self.transport.name(),
                    embed_count = message.embeds.len(),
                    "Notification delivered"
                );
                Ok(DeliveryOutcome::Delivered)
            }
            Err(e) => {
                self.state = DeliveryState::Failed;
                self.reporter
                    .notice(&failure_notice(&e, severity, &validation.fields));
                Ok(DeliveryOutcome::Failed(e.to_string()))
            }
        }
    }

    async fn wait_for_holddown(&mut self) {
        let remaining = self.holddown.remaining(Instant::now());
        if remaining.is_zero() {
            return;
        }

        self.state = DeliveryState::Waiting;
        debug!(
            wait_ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX),
            "Waiting for holddown"
        );
        tokio::time::sleep(remaining).await;
    }

    fn parse_severity(&self, raw: Option<&str>) -> Option<Severity> {
        let raw = raw?;
        let severity = Severity::parse(raw);
        if severity.is_none() {
            self.reporter.warning(&format!(
                "severity '{raw}' is not one of info, warn, error; ignored"
            ));
        }
        severity
    }

    async fn resolve_webhook_url(&self, raw: &str) -> Result<String, NotifyError> {
        if raw != TEST_URL_SENTINEL {
            return Ok(raw.to_string());
        }

        debug!(path = %self.test_url_file.display(), "Using test webhook URL");
        read_test_url(&self.test_url_file).await
    }
}

async fn read_test_url(path: &Path) -> Result<String, NotifyError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(NotifyError::TestUrlNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(NotifyError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let url = contents.trim();
    if url.is_empty() {
        return Err(NotifyError::TestUrlNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(url.to_string())
}

/// Notice text for a failed delivery, naming what was lost.
fn failure_notice(error: &TransportError, severity: Option<Severity>, fields: &[Field]) -> String {
    let severity = severity.map_or("none", |s| s.as_str());
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    format!(
        "Failed to send notification: {error} (severity: {severity}, fields: [{}])",
        names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{names, MapInputs};
    use crate::message::WebhookMessage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const WEBHOOK_URL: &str = "https://discord.com/api/webhooks/123/token";

    #[derive(Default)]
    struct RecordingReporter {
        warnings: Mutex<Vec<String>>,
        notices: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn warnings(&self) -> Vec<String> {
            self.warnings.lock().unwrap().clone()
        }

        fn notices(&self) -> Vec<String> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl Reporter for RecordingReporter {
        fn warning(&self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }

        fn notice(&self, message: &str) {
            self.notices.lock().unwrap().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct MockTransport {
        fail: bool,
        sent: Mutex<Vec<(String, WebhookMessage, DeliveryOptions)>>,
    }

    impl MockTransport {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn sent(&self) -> Vec<(String, WebhookMessage, DeliveryOptions)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WebhookTransport for MockTransport {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn send(
            &self,
            webhook_url: &str,
            message: &WebhookMessage,
            options: DeliveryOptions,
        ) -> Result<(), TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push((webhook_url.to_string(), message.clone(), options));
            if self.fail {
                Err(TransportError::Other("boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn controller(
        transport: &Arc<MockTransport>,
        reporter: &Arc<RecordingReporter>,
    ) -> DeliveryController {
        DeliveryController::new(transport.clone(), reporter.clone(), Holddown::default())
    }

    fn base_inputs() -> MapInputs {
        MapInputs::new().with(names::WEBHOOK_URL, WEBHOOK_URL)
    }

    #[tokio::test]
    async fn test_missing_webhook_url_skips_send() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let mut ctl = controller(&transport, &reporter);

        for source in [
            MapInputs::new().with(names::TEXT, "Some text."),
            MapInputs::new()
                .with(names::WEBHOOK_URL, "")
                .with(names::FLAGS, "SuppressNotifications"),
        ] {
            let outcome = ctl.run(&source).await.unwrap();
            assert_eq!(outcome, DeliveryOutcome::Skipped);
        }

        assert!(transport.sent().is_empty());
        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .all(|w| w.to_lowercase().contains("webhookurl was not provided")));
        assert_eq!(ctl.holddown().last_attempt(), None);
    }

    #[tokio::test]
    async fn test_typical_inputs_with_all_flags() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let mut ctl = controller(&transport, &reporter);

        let source = base_inputs()
            .with(names::FLAGS, "SuppressNotifications SuppressEmbeds IsComponentsV2")
            .with(names::USERNAME, "Silent Bob")
            .with(names::AVATAR_URL, "http://my.foot")
            .with(names::TEXT, "Some text.")
            .with(names::SEVERITY, "error")
            .with(names::DESCRIPTION, "This is a description");

        let outcome = ctl.run(&source).await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(ctl.state(), DeliveryState::Delivered);
        assert!(reporter.warnings().is_empty());
        assert!(reporter.notices().is_empty());

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        let (url, message, options) = &sent[0];
        assert_eq!(url, WEBHOOK_URL);
        assert_eq!(message.content.as_deref(), Some("Some text."));
        assert_eq!(message.username, "Silent Bob");
        assert!(message.embeds.is_empty());
        assert!(options.flags.suppress_notifications);
        assert!(options.flags.components_v2);
    }

    #[tokio::test]
    async fn test_unknown_flags_do_not_error() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let mut ctl = controller(&transport, &reporter);

        let source = base_inputs()
            .with(names::FLAGS, "NonExistantFlag")
            .with(names::TEXT, "Some text.");

        assert_eq!(ctl.run(&source).await.unwrap(), DeliveryOutcome::Delivered);
        assert_eq!(transport.sent().len(), 1);
        assert!(reporter.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_reports_notice() {
        let transport = Arc::new(MockTransport::failing());
        let reporter = Arc::new(RecordingReporter::default());
        let mut ctl = controller(&transport, &reporter);

        let source = base_inputs()
            .with(names::TEXT, "Some text.")
            .with(names::SEVERITY, "warn")
            .with(names::FIELDS, r#"[{"name": "Job", "value": "lint"}]"#);

        let outcome = ctl.run(&source).await.unwrap();
        assert!(matches!(outcome, DeliveryOutcome::Failed(ref e) if e.contains("boom")));
        assert_eq!(ctl.state(), DeliveryState::Failed);

        let notices = reporter.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("severity: warn"));
        assert!(notices[0].contains("fields: [Job]"));
        assert!(ctl.holddown().last_attempt().is_some());
    }

    #[tokio::test]
    async fn test_malformed_fields_still_delivers() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let mut ctl = controller(&transport, &reporter);

        let source = base_inputs()
            .with(names::SEVERITY, "info")
            .with(names::FIELDS, "invalid json{");

        assert_eq!(ctl.run(&source).await.unwrap(), DeliveryOutcome::Delivered);
        assert!(reporter.warnings()[0].contains("is not valid JSON"));

        let sent = transport.sent();
        let embed = &sent[0].1.embeds[0];
        assert!(embed.fields.is_empty());
        assert_eq!(embed.title.as_deref(), Some("Informational"));
    }

    #[tokio::test]
    async fn test_too_many_fields_warns_and_truncates() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let mut ctl = controller(&transport, &reporter);

        let many: Vec<serde_json::Value> = (0..30)
            .map(|i| serde_json::json!({ "name": format!("Field {i}"), "value": format!("Value {i}"), "inline": false }))
            .collect();
        let source = base_inputs()
            .with(names::SEVERITY, "info")
            .with(names::FIELDS, serde_json::Value::Array(many).to_string());

        ctl.run(&source).await.unwrap();
        assert_eq!(
            reporter.warnings(),
            vec!["Discord only supports up to 25 fields. Extra fields ignored.".to_string()]
        );
        let sent = transport.sent();
        let fields = &sent[0].1.embeds[0].fields;
        assert_eq!(fields.len(), 25);
        assert_eq!(fields[24].name, "Field 24");
    }

    #[tokio::test]
    async fn test_unknown_severity_warns() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let mut ctl = controller(&transport, &reporter);

        let source = base_inputs()
            .with(names::TEXT, "hi")
            .with(names::SEVERITY, "критично");

        assert_eq!(ctl.run(&source).await.unwrap(), DeliveryOutcome::Delivered);
        assert!(reporter.warnings()[0].contains("is not one of info, warn, error"));
        assert!(transport.sent()[0].1.embeds.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_sends_respect_holddown() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let mut ctl = controller(&transport, &reporter);
        let source = base_inputs().with(names::TEXT, "tick");

        let start = Instant::now();
        ctl.run(&source).await.unwrap();
        assert!(start.elapsed() < DEFAULT_HOLDDOWN);
        ctl.run(&source).await.unwrap();

        assert!(start.elapsed() >= DEFAULT_HOLDDOWN);
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_sends_still_throttle() {
        let transport = Arc::new(MockTransport::failing());
        let reporter = Arc::new(RecordingReporter::default());
        let holddown = Holddown::new(Duration::from_secs(5));
        let mut ctl = DeliveryController::new(transport.clone(), reporter.clone(), holddown);
        let source = base_inputs().with(names::TEXT, "tick");

        let start = Instant::now();
        for _ in 0..3 {
            ctl.run(&source).await.unwrap();
        }

        assert!(start.elapsed() >= Duration::from_secs(10));
        assert_eq!(reporter.notices().len(), 3);
    }

    #[test]
    fn test_holddown_remaining() {
        let now = Instant::now();
        let mut holddown = Holddown::new(Duration::from_secs(2));
        assert_eq!(holddown.remaining(now), Duration::ZERO);

        holddown.record(now);
        assert_eq!(holddown.remaining(now), Duration::from_secs(2));
        assert_eq!(
            holddown.remaining(now + Duration::from_millis(500)),
            Duration::from_millis(1500)
        );
        assert_eq!(holddown.remaining(now + Duration::from_secs(3)), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_test_url_sentinel_reads_file() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test-url");
        std::fs::write(&path, "http://127.0.0.1:9/hook\n").unwrap();

        let mut ctl = controller(&transport, &reporter).with_test_url_file(&path);
        let source = MapInputs::new()
            .with(names::WEBHOOK_URL, TEST_URL_SENTINEL)
            .with(names::TEXT, "hi");

        ctl.run(&source).await.unwrap();
        assert_eq!(transport.sent()[0].0, "http://127.0.0.1:9/hook");
    }

    #[tokio::test]
    async fn test_test_url_missing_is_an_error() {
        let transport = Arc::new(MockTransport::default());
        let reporter = Arc::new(RecordingReporter::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");

        let mut ctl = controller(&transport, &reporter).with_test_url_file(&path);
        let source = MapInputs::new().with(names::WEBHOOK_URL, TEST_URL_SENTINEL);

        let err = ctl.run(&source).await.unwrap_err();
        assert!(matches!(err, NotifyError::TestUrlNotFound { .. }));
        assert!(transport.sent().is_empty());
    }
}
