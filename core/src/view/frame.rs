use super::format::{clock_label, frame_label, signal_percent};
use crate::prelude::{Indicator, Tone, NOT_AVAILABLE};
use crate::snapshot::state::{STATE_ONLINE, STATE_WEAK};
use crate::snapshot::{ChannelDesignation, Channels, StatusSnapshot, TrackerEvent};
use chrono::TimeZone;
use std::fmt::Display;

pub const NO_EVENTS: &str = "No events.";

/// Everything the dashboard shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub connection: Indicator,
    pub signal: Indicator,
    pub device_link: Indicator,
    pub monitors_link: Indicator,
    pub channels: Indicator,
    pub channel_designator: Indicator,
    pub task: Indicator,
    pub bandit_target: Indicator,
    pub track: Indicator,
    pub frame_count: Indicator,
    pub contact_time: Indicator,
    pub bandit_signal: Indicator,
    /// Newest first.
    pub events: Vec<String>,
}

impl ViewState {
    /// Derives the frame for `snapshot`, rendering clock times in `zone`.
    pub fn derive<Tz>(snapshot: &StatusSnapshot, zone: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let connection = connection_indicator(snapshot);
        let signal = if connection.label == "DARK" {
            Indicator::not_available()
        } else {
            Indicator::new(
                format!("{}%", signal_percent(snapshot.leader_signal_strength)),
                Tone::Neutral,
            )
        };

        let tracking = TrackingIndicators::derive(snapshot, zone);

        Self {
            connection,
            signal,
            device_link: link_indicator(snapshot.tracker_device_live),
            monitors_link: link_indicator(snapshot.monitors_live),
            channels: channels_indicator(snapshot.channels.as_ref()),
            channel_designator: designator_indicator(snapshot.channel_designation_status),
            task: tracking.task,
            bandit_target: tracking.target,
            track: tracking.track,
            frame_count: tracking.frame_count,
            contact_time: tracking.contact_time,
            bandit_signal: tracking.bandit_signal,
            events: event_lines(&snapshot.events, zone),
        }
    }
}

/// The ONLINE and WEAK checks run in order and the later one wins.
fn connection_indicator(snapshot: &StatusSnapshot) -> Indicator {
    let mut connection = Indicator::new("DARK", Tone::Red);
    if snapshot.tracker_state.mentions(STATE_ONLINE) {
        connection = Indicator::new("ONLINE", Tone::Green);
    }
    if snapshot.tracker_state.mentions(STATE_WEAK) {
        connection = Indicator::new("WEAK", Tone::Yellow);
    }
    connection
}

fn link_indicator(live: bool) -> Indicator {
    if live {
        Indicator::new("ONLINE", Tone::Green)
    } else {
        Indicator::new("OFFLINE", Tone::Red)
    }
}

fn channels_indicator(channels: Option<&Channels>) -> Indicator {
    match channels {
        Some(Channels::Count(count)) => Indicator::new(count.to_string(), Tone::Neutral),
        Some(Channels::List(list)) => {
            let joined = list
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            Indicator::new(joined, Tone::Neutral)
        }
        None => Indicator::not_available(),
    }
}

fn designator_indicator(status: Option<ChannelDesignation>) -> Indicator {
    match status {
        Some(status @ ChannelDesignation::Unlocked) => Indicator::new(status.as_str(), Tone::Neutral),
        Some(status @ ChannelDesignation::Locked) => Indicator::new(status.as_str(), Tone::Green),
        Some(status @ ChannelDesignation::Sweeping) => Indicator::new(status.as_str(), Tone::Yellow),
        None => Indicator::new("Unknown", Tone::Red),
    }
}

struct TrackingIndicators {
    task: Indicator,
    target: Indicator,
    track: Indicator,
    frame_count: Indicator,
    contact_time: Indicator,
    bandit_signal: Indicator,
}

impl TrackingIndicators {
    fn derive<Tz>(snapshot: &StatusSnapshot, zone: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if !snapshot.is_tracking {
            return Self {
                task: Indicator::new("NONE", Tone::Inactive),
                target: Indicator::new("NONE", Tone::Inactive),
                ..Self::without_contact(Indicator::not_available())
            };
        }

        let task = Indicator::new("TRACKING", Tone::Green);
        let target = snapshot
            .target()
            .map(|target| Indicator::new(target, Tone::Neutral))
            .unwrap_or_else(Indicator::not_available);

        let Some(track) = snapshot.active_track() else {
            return Self {
                task,
                target,
                ..Self::without_contact(Indicator::new("NO CTCT", Tone::Red))
            };
        };

        let contact_time = snapshot
            .track_contact
            .as_ref()
            .map(|contact| Indicator::new(clock_label(contact, zone), Tone::Neutral))
            .unwrap_or_else(Indicator::not_available);
        let bandit_signal = snapshot
            .bandit_signal
            .map(|dbm| Indicator::new(format!("{dbm} dBm"), Tone::Neutral))
            .unwrap_or_else(Indicator::not_available);

        Self {
            task,
            target,
            track: Indicator::new(track, Tone::Green),
            frame_count: Indicator::new(frame_label(snapshot.track_frames), Tone::Neutral),
            contact_time,
            bandit_signal,
        }
    }

    fn without_contact(track: Indicator) -> Self {
        Self {
            task: Indicator::not_available(),
            target: Indicator::not_available(),
            track,
            frame_count: Indicator::not_available(),
            contact_time: Indicator::not_available(),
            bandit_signal: Indicator::not_available(),
        }
    }
}

fn event_lines<Tz>(events: &[TrackerEvent], zone: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if events.is_empty() {
        return vec![NO_EVENTS.to_string()];
    }
    events
        .iter()
        .rev()
        .map(|event| {
            let time = event
                .timestamp
                .as_ref()
                .map(|ts| clock_label(ts, zone))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            format!("{} [{}]: {}", time, event.source, event.message)
        })
        .collect()
}
