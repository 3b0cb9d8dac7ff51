//! Access grants

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// How long a grant issued by a successful login stays valid.
pub const DEFAULT_GRANT_TTL: SignedDuration = SignedDuration::from_hours(30 * 24);

/// Proof of a successful password check, persisted across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Whether the grant authorizes access
    pub authorized: bool,

    /// Moment the grant stops being valid
    pub expiry: Timestamp,
}

impl AccessGrant {
    /// Issue a grant at `now` that lasts for `ttl`.
    pub fn issue(now: Timestamp, ttl: SignedDuration) -> Self {
        Self {
            authorized: true,
            expiry: now.checked_add(ttl).unwrap_or(Timestamp::MAX),
        }
    }

    /// Whether the grant still authorizes access at `now`.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.authorized && now < self.expiry
    }
}
