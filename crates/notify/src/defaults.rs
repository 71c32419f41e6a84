//! Static defaults for outgoing notifications.

use std::time::Duration;

/// Sender name used when no `username` input is given.
pub const DEFAULT_USERNAME: &str = "Notification (GitHub)";

/// Sender avatar used when no `avatarUrl` input is given.
pub const DEFAULT_AVATAR_URL: &str =
    "https://cdn.jsdelivr.net/gh/rjstone/discord-webhook-notify@main/img/default_avatar.png";

/// Embed color for `info` events.
pub const COLOR_INFO: u32 = 0x0000_ff00; // #00ff00
/// Embed color for `warn` events.
pub const COLOR_WARN: u32 = 0x00ff_9900; // #ff9900
/// Embed color for `error` events.
pub const COLOR_ERROR: u32 = 0x00ff_0000; // #ff0000

/// Long label for `info` events, used as the default embed title.
pub const LABEL_INFO: &str = "Informational";
/// Long label for `warn` events.
pub const LABEL_WARN: &str = "Warning";
/// Long label for `error` events.
pub const LABEL_ERROR: &str = "Error";

/// Discord rejects embeds with more fields than this.
pub const MAX_FIELDS: usize = 25;

/// Minimum interval between two delivery attempts in one process.
pub const DEFAULT_HOLDDOWN: Duration = Duration::from_millis(2000);

/// `webhookUrl` value that redirects delivery to the local test endpoint.
pub const TEST_URL_SENTINEL: &str = "useTestURL";

/// File holding the test endpoint URL when no other path is configured.
pub const DEFAULT_TEST_URL_FILE: &str = ".webhook-test-url";
