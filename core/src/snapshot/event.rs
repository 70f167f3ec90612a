use super::lenient::{lenient, lenient_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry of the tracker's recent event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerEvent {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient")]
    pub message: String,
}

impl TrackerEvent {
    pub fn new(timestamp: DateTime<Utc>, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp),
            source: source.into(),
            message: message.into(),
        }
    }
}
