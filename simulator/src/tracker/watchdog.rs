use chrono::{DateTime, Duration, Utc};
use hidcore::snapshot::state::{STATE_DARK, STATE_ONLINE, STATE_OUT_OF_SYNC, STATE_WEAK};
use hidcore::snapshot::TrackerStates;

/// A leader ping older than this marks the link dark.
pub const PING_TIMEOUT_SECS: i64 = 20;

/// Leader RSSI below this is reported as a weak link.
pub const WEAK_RSSI_THRESHOLD: i64 = 50;

#[derive(Debug, Clone)]
struct LeaderPing {
    received_at: DateTime<Utc>,
    rssi: i64,
    bandit_hash: String,
}

/// Derives the tracker connection state from the last leader ping.
#[derive(Debug, Default)]
pub struct TrackerStateWatchdog {
    last_ping: Option<LeaderPing>,
}

impl TrackerStateWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_ping(&mut self, received_at: DateTime<Utc>, rssi: i64, bandit_hash: impl Into<String>) {
        self.last_ping = Some(LeaderPing {
            received_at,
            rssi,
            bandit_hash: bandit_hash.into(),
        });
    }

    /// RSSI of the last leader ping, 0 if none was ever received.
    pub fn leader_rssi(&self) -> i64 {
        self.last_ping.as_ref().map(|ping| ping.rssi).unwrap_or(0)
    }

    pub fn evaluate(&self, now: DateTime<Utc>, our_bandit_hash: &str) -> TrackerStates {
        let Some(ping) = &self.last_ping else {
            return TrackerStates::new([STATE_DARK]);
        };
        if ping.received_at <= now - Duration::seconds(PING_TIMEOUT_SECS) {
            return TrackerStates::new([STATE_DARK]);
        }

        let mut states = vec![STATE_ONLINE];
        if ping.rssi < WEAK_RSSI_THRESHOLD {
            states.push(STATE_WEAK);
        }
        if ping.bandit_hash != our_bandit_hash {
            states.push(STATE_OUT_OF_SYNC);
        }
        TrackerStates::new(states)
    }
}
