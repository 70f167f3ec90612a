use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

/// Frame counts above this are shown as `>1M`.
pub const FRAME_LABEL_CAP: u64 = 1_000_000;

/// `round(raw / 255 * 100)` of the leader RSSI.
pub fn signal_percent(raw: i64) -> i64 {
    (raw as f64 / 255.0 * 100.0).round() as i64
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn frame_label(frames: u64) -> String {
    if frames > FRAME_LABEL_CAP {
        ">1M".into()
    } else {
        group_thousands(frames)
    }
}

/// Time of day of `timestamp` in `zone`.
pub fn clock_label<Tz>(timestamp: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.with_timezone(zone).format("%H:%M:%S").to_string()
}
