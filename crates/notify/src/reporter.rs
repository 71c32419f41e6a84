//! User-facing reporting of recoverable problems.

use std::io::Write;

use tracing::{info, warn};

/// Destination for warnings and notices raised during a run.
pub trait Reporter: Send + Sync {
    /// Report a configuration problem.
    fn warning(&self, message: &str);

    /// Report something informational, such as a failed delivery.
    fn notice(&self, message: &str);
}

/// Reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warning(&self, message: &str) {
        warn!("{message}");
    }

    fn notice(&self, message: &str) {
        info!("{message}");
    }
}

/// Reports as GitHub Actions workflow commands on stdout, so warnings and
/// notices show up as annotations on the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowCommandReporter;

impl WorkflowCommandReporter {
    fn emit(command: &str, message: &str) {
        let line = format!("::{command}::{}", escape_data(message));
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}") {
            warn!(error = %e, "Failed to write workflow command");
        }
    }
}

impl Reporter for WorkflowCommandReporter {
    fn warning(&self, message: &str) {
        warn!("{message}");
        Self::emit("warning", message);
    }

    fn notice(&self, message: &str) {
        info!("{message}");
        Self::emit("notice", message);
    }
}

/// Escape a workflow command message.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("plain"), "plain");
        assert_eq!(escape_data("50% done\r\nnext"), "50%25 done%0D%0Anext");
    }
}
