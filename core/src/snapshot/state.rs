use super::event::TrackerEvent;
use super::lenient::{
    lenient, lenient_i64, lenient_list, lenient_opt_i64, lenient_timestamp, lenient_u64,
};
use crate::prelude::{FetchFailure, FetchResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Connection state names reported by the tracker watchdog.
pub const STATE_ONLINE: &str = "ONLINE";
pub const STATE_WEAK: &str = "WEAK";
pub const STATE_OUT_OF_SYNC: &str = "OUT_OF_SYNC";
pub const STATE_DARK: &str = "DARK";

/// Set-like collection of tracker state names.
///
/// Trackers send either a JSON list (`["ONLINE", "WEAK"]`) or a single joined
/// string; both are matched by substring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackerStates(Vec<String>);

impl TrackerStates {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn mentions(&self, token: &str) -> bool {
        self.0.iter().any(|name| name.contains(token))
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(name) => Self(vec![name.clone()]),
            Value::Array(items) => Self(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect(),
            ),
            _ => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for TrackerStates {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Channels the monitors are on: a bare count or the channel numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channels {
    Count(i64),
    List(Vec<i64>),
}

/// Status of the channel designator on the first monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelDesignation {
    Unlocked,
    Locked,
    Sweeping,
}

impl ChannelDesignation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelDesignation::Unlocked => "UNLOCKED",
            ChannelDesignation::Locked => "LOCKED",
            ChannelDesignation::Sweeping => "SWEEPING",
        }
    }
}

/// One status payload served by the tracker's WebHID endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub clock: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tracker_state: TrackerStates,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub leader_signal_strength: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub tracker_device_live: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub monitors_live: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub channels: Option<Channels>,
    #[serde(default, deserialize_with = "lenient")]
    pub channel_designation_status: Option<ChannelDesignation>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_tracking: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub tracking_target: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub track: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub track_frames: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub track_contact: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub bandit_signal: Option<i64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub events: Vec<TrackerEvent>,
}

impl StatusSnapshot {
    /// Decodes a response body. Only a body that is not a JSON object fails.
    pub fn from_slice(body: &[u8]) -> FetchResult<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| FetchFailure::Decode(e.to_string()))?;
        if !value.is_object() {
            return Err(FetchFailure::Decode("expected a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| FetchFailure::Decode(e.to_string()))
    }

    /// The active track id; an empty string counts as no contact.
    pub fn active_track(&self) -> Option<&str> {
        self.track.as_deref().filter(|track| !track.is_empty())
    }

    pub fn target(&self) -> Option<&str> {
        self.tracking_target
            .as_deref()
            .filter(|target| !target.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_decodes_full_payload() {
        let body = br#"{
            "clock": "2024-03-01T12:00:00Z",
            "tracker_state": ["ONLINE", "WEAK"],
            "leader_signal_strength": 200,
            "tracker_device_live": true,
            "monitors_live": false,
            "channels": [1, 6, 11],
            "channel_designation_status": "SWEEPING",
            "is_tracking": true,
            "tracking_target": "pineapple",
            "track": "a1b2",
            "track_frames": 1500000,
            "track_contact": 1709294400000,
            "bandit_signal": -63,
            "events": [
                {"timestamp": "2024-03-01T11:59:00Z", "source": "leader", "message": "hello"}
            ]
        }"#;
        let snapshot = StatusSnapshot::from_slice(body).unwrap();
        assert!(snapshot.tracker_state.mentions(STATE_WEAK));
        assert_eq!(snapshot.leader_signal_strength, 200);
        assert_eq!(snapshot.channels, Some(Channels::List(vec![1, 6, 11])));
        assert_eq!(
            snapshot.channel_designation_status,
            Some(ChannelDesignation::Sweeping)
        );
        assert_eq!(snapshot.active_track(), Some("a1b2"));
        assert_eq!(snapshot.track_frames, 1_500_000);
        assert_eq!(snapshot.track_contact, snapshot.clock);
        assert_eq!(snapshot.bandit_signal, Some(-63));
        assert_eq!(snapshot.events.len(), 1);
    }

    #[test]
    fn snapshot_degrades_mistyped_fields_to_defaults() {
        let body = br#"{
            "tracker_state": "ONLINE",
            "leader_signal_strength": "strong",
            "monitors_live": null,
            "channels": 3,
            "channel_designation_status": "HOPPING",
            "track": null,
            "track_frames": -4,
            "bandit_signal": "loud",
            "events": [{"source": "leader", "message": "ok"}, 17]
        }"#;
        let snapshot = StatusSnapshot::from_slice(body).unwrap();
        assert!(snapshot.tracker_state.mentions(STATE_ONLINE));
        assert_eq!(snapshot.leader_signal_strength, 0);
        assert!(!snapshot.monitors_live);
        assert_eq!(snapshot.channels, Some(Channels::Count(3)));
        assert_eq!(snapshot.channel_designation_status, None);
        assert_eq!(snapshot.active_track(), None);
        assert_eq!(snapshot.track_frames, 0);
        assert_eq!(snapshot.bandit_signal, None);
        assert_eq!(snapshot.events.len(), 1);
        assert!(snapshot.events[0].timestamp.is_none());
    }

    #[test]
    fn whole_float_numbers_decode_as_integers() {
        let body = br#"{
            "leader_signal_strength": 200.0,
            "track_frames": 1.5e6,
            "bandit_signal": -63.0
        }"#;
        let snapshot = StatusSnapshot::from_slice(body).unwrap();
        assert_eq!(snapshot.leader_signal_strength, 200);
        assert_eq!(snapshot.track_frames, 1_500_000);
        assert_eq!(snapshot.bandit_signal, Some(-63));
    }

    #[test]
    fn non_object_body_is_a_decode_failure() {
        assert!(matches!(
            StatusSnapshot::from_slice(b"[1, 2, 3]"),
            Err(FetchFailure::Decode(_))
        ));
        assert!(matches!(
            StatusSnapshot::from_slice(b"<html>"),
            Err(FetchFailure::Decode(_))
        ));
    }

    #[test]
    fn empty_track_counts_as_no_contact() {
        let snapshot = StatusSnapshot {
            track: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(snapshot.active_track(), None);
    }
}
