use chrono::{DateTime, Utc};
use hidcore::snapshot::TrackerEvent;
use std::collections::VecDeque;

/// Number of events a tracker keeps for its status page.
pub const EVENT_LOG_CAPACITY: usize = 20;

/// Evicting log of the most recent tracker events, oldest first.
#[derive(Debug)]
pub struct EventLog {
    events: VecDeque<TrackerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
        }
    }

    pub fn record(&mut self, at: DateTime<Utc>, source: &str, message: &str) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(TrackerEvent::new(at, source, message));
    }

    pub fn to_vec(&self) -> Vec<TrackerEvent> {
        self.events.iter().cloned().collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_newest_twenty() {
        let mut log = EventLog::new();
        let now = Utc::now();
        for i in 0..25 {
            log.record(now, "leader", &format!("event {i}"));
        }
        let events = log.to_vec();
        assert_eq!(events.len(), EVENT_LOG_CAPACITY);
        assert_eq!(events.first().map(|e| e.message.as_str()), Some("event 5"));
        assert_eq!(events.last().map(|e| e.message.as_str()), Some("event 24"));
    }
}
