use chrono::{DateTime, Duration, Utc};
use fairway_core::TeeTimeStatus;
use serde::{Deserialize, Serialize};

/// Seconds a RESERVED hold stays live before it can be reclaimed.
pub const DEFAULT_HOLD_SECONDS: i64 = 600;

/// Business rules around the reservation hold.
#[derive(Debug, Clone)]
pub struct HoldPolicy {
    pub hold: Duration,
    /// When set, an explicit cancel parks the slot in CANCELLED instead
    /// of reviving it to AVAILABLE. Expired holds always revive.
    pub terminal_cancel: bool,
}

impl Default for HoldPolicy {
    fn default() -> Self {
        Self {
            hold: Duration::seconds(DEFAULT_HOLD_SECONDS),
            terminal_cancel: false,
        }
    }
}

impl HoldPolicy {
    pub fn new(hold_seconds: i64, terminal_cancel: bool) -> Self {
        Self {
            hold: Duration::seconds(hold_seconds),
            terminal_cancel,
        }
    }

    pub fn expires_at(&self, reserved_at: DateTime<Utc>) -> DateTime<Utc> {
        reserved_at + self.hold
    }

    /// A hold is expired strictly after the window: the 600th second is
    /// still live, the 601st is not.
    pub fn is_expired(&self, reserved_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - reserved_at > self.hold
    }

    pub fn remaining_seconds(&self, reserved_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (self.expires_at(reserved_at) - now).num_seconds().max(0)
    }
}

/// Countdown view of a hold, as served to the reservation timer widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStatus {
    pub status: TeeTimeStatus,
    pub reserved_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub remaining_seconds: i64,
    pub is_expired: bool,
}

impl TimerStatus {
    /// Zeroed view for records outside RESERVED.
    pub fn inactive(status: TeeTimeStatus) -> Self {
        Self {
            status,
            reserved_at: None,
            expires_at: None,
            remaining_seconds: 0,
            is_expired: false,
        }
    }
}
