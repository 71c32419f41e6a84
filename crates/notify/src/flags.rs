//! Message flag tokens.
//!
//! The `flags` input is a space-separated list of tokens. Each token maps to
//! a [`MessageFlag`]; tokens that are not recognised become
//! [`MessageFlag::Unknown`] and are ignored.

/// Discord `SUPPRESS_EMBEDS` message flag bit.
pub const SUPPRESS_EMBEDS_BIT: u32 = 1 << 2;
/// Discord `SUPPRESS_NOTIFICATIONS` message flag bit.
pub const SUPPRESS_NOTIFICATIONS_BIT: u32 = 1 << 12;
/// Discord `IS_COMPONENTS_V2` message flag bit.
pub const IS_COMPONENTS_V2_BIT: u32 = 1 << 15;

/// A single token from the `flags` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFlag {
    /// Deliver silently (enforced by Discord, not here)
    SuppressNotifications,
    /// Send plain text only, never an embed
    SuppressEmbeds,
    /// Use the components v2 message layout
    IsComponentsV2,
    /// Unrecognised token
    Unknown,
}

impl MessageFlag {
    /// Map a token to its flag. Matching is exact.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "SuppressNotifications" => Self::SuppressNotifications,
            "SuppressEmbeds" => Self::SuppressEmbeds,
            "IsComponentsV2" => Self::IsComponentsV2,
            _ => Self::Unknown,
        }
    }
}

/// The set of flags enabled for one notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub suppress_notifications: bool,
    pub suppress_embeds: bool,
    pub components_v2: bool,
}

impl FlagSet {
    /// Parse a space-separated token list.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split_whitespace()
            .map(MessageFlag::from_token)
            .fold(Self::default(), |mut set, flag| {
                set.insert(flag);
                set
            })
    }

    /// Enable a flag. [`MessageFlag::Unknown`] is a no-op.
    pub fn insert(&mut self, flag: MessageFlag) {
        match flag {
            MessageFlag::SuppressNotifications => self.suppress_notifications = true,
            MessageFlag::SuppressEmbeds => self.suppress_embeds = true,
            MessageFlag::IsComponentsV2 => self.components_v2 = true,
            MessageFlag::Unknown => {}
        }
    }

    /// Discord message flag bitfield for this set.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.suppress_embeds {
            bits |= SUPPRESS_EMBEDS_BIT;
        }
        if self.suppress_notifications {
            bits |= SUPPRESS_NOTIFICATIONS_BIT;
        }
        if self.components_v2 {
            bits |= IS_COMPONENTS_V2_BIT;
        }
        bits
    }
}
