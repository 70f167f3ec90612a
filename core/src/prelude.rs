use std::fmt;
use std::time::Duration;

/// Fixed period between two polls of the status endpoint.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Maximum number of bandit signal samples retained for the chart.
pub const SIGNAL_HISTORY_CAPACITY: usize = 300;

/// dBm value recorded when a snapshot carries no bandit signal.
pub const SIGNAL_SENTINEL_DBM: i64 = -100;

/// Placeholder label for values that cannot be shown.
pub const NOT_AVAILABLE: &str = "N/A";

/// The single failure kind of a tick: the snapshot could not be obtained.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("endpoint answered with HTTP status {0}")]
    Status(u16),
    #[error("undecodable snapshot: {0}")]
    Decode(String),
}

pub type FetchResult<T> = Result<T, FetchFailure>;

/// Colour class of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Red,
    Neutral,
    Inactive,
}

/// One labelled indicator cell of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub label: String,
    pub tone: Tone,
}

impl Indicator {
    pub fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }

    pub fn not_available() -> Self {
        Self::new(NOT_AVAILABLE, Tone::Inactive)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
