use crate::scenario::config::ScenarioConfig;
use crate::tracker::{ChannelDesignator, EventLog, TrackerStateWatchdog};
use chrono::{DateTime, Utc};
use hidcore::snapshot::{Channels, StatusSnapshot};
use log::{debug, info};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const LEADER: &str = "leader";
const BANDIT_LIST_HASH: &str = "bandits-2f9c";
const STALE_BANDIT_LIST_HASH: &str = "bandits-0000";

/// Seeded stand-in for a tracker node, stepped once per second.
pub struct TrackerSimulation {
    config: ScenarioConfig,
    rng: StdRng,
    watchdog: TrackerStateWatchdog,
    designator: ChannelDesignator,
    events: EventLog,
    leader_rssi: i64,
    tracking: bool,
    track: Option<String>,
    track_frames: u64,
    track_contact: Option<DateTime<Utc>>,
    bandit_signal: Option<i64>,
    steps: u64,
}

impl TrackerSimulation {
    pub fn new(config: ScenarioConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            designator: ChannelDesignator::new(config.channels.clone()),
            leader_rssi: config.leader_rssi_start.clamp(0, 255),
            watchdog: TrackerStateWatchdog::new(),
            events: EventLog::new(),
            tracking: false,
            track: None,
            track_frames: 0,
            track_contact: None,
            bandit_signal: None,
            steps: 0,
            config,
        }
    }

    /// Advances the tracker by one second and returns its status snapshot.
    pub fn step(&mut self, now: DateTime<Utc>) -> StatusSnapshot {
        self.steps += 1;
        self.receive_leader_ping(now);
        self.handle_leader_requests(now);
        if self.tracking {
            self.listen_for_bandit(now);
        }
        if self.steps % self.config.designator_cycle_steps.max(1) == 0 {
            let status = self.designator.designate();
            debug!("designator cycle {} -> {}", self.steps, status.as_str());
        }

        let monitors_live = !self.rng.gen_bool(self.config.monitor_failure_probability);
        let tracker_device_live = !self.rng.gen_bool(self.config.device_failure_probability);
        StatusSnapshot {
            clock: Some(now),
            tracker_state: self.watchdog.evaluate(now, BANDIT_LIST_HASH),
            leader_signal_strength: self.watchdog.leader_rssi(),
            tracker_device_live,
            monitors_live,
            channels: Some(Channels::List(self.designator.active_channels().to_vec())),
            channel_designation_status: Some(self.designator.status()),
            is_tracking: self.tracking,
            tracking_target: self
                .tracking
                .then(|| self.config.tracking_target.clone()),
            track: self.track.clone(),
            track_frames: self.track_frames,
            track_contact: self.track_contact,
            bandit_signal: self.bandit_signal,
            events: self.events.to_vec(),
        }
    }

    fn receive_leader_ping(&mut self, now: DateTime<Utc>) {
        if self.rng.gen_bool(self.config.ping_loss_probability) {
            return;
        }
        let drift = self.config.leader_rssi_drift.max(0);
        self.leader_rssi = (self.leader_rssi + self.rng.gen_range(-drift..=drift)).clamp(0, 255);
        let hash = if self.rng.gen_bool(self.config.out_of_sync_probability) {
            STALE_BANDIT_LIST_HASH
        } else {
            BANDIT_LIST_HASH
        };
        self.watchdog.register_ping(now, self.leader_rssi, hash);
    }

    fn handle_leader_requests(&mut self, now: DateTime<Utc>) {
        if !self.tracking && self.rng.gen_bool(self.config.track_request_probability) {
            self.tracking = true;
            self.events
                .record(now, LEADER, "Received request to track bandit.");
            info!("leader requested tracking of [{}]", self.config.tracking_target);
        } else if self.tracking && self.rng.gen_bool(self.config.track_cancel_probability) {
            self.tracking = false;
            self.track = None;
            self.track_frames = 0;
            self.track_contact = None;
            self.bandit_signal = None;
            self.events
                .record(now, LEADER, "All bandit tracking canceled on leader request.");
            info!("leader canceled all tracking");
        }
    }

    fn listen_for_bandit(&mut self, now: DateTime<Utc>) {
        if !self.rng.gen_bool(self.config.contact_probability) {
            return;
        }
        if let Some(channel) = self.config.channels.choose(&mut self.rng).copied() {
            self.designator.on_bandit_trace(channel);
        }
        if self.track.is_none() {
            let id = format!("{:08x}", self.rng.gen::<u32>());
            self.events
                .record(now, "tracker", &format!("Initial contact with bandit, track [{id}]."));
            self.track = Some(id);
        }
        let max_frames = self.config.max_frames_per_contact.max(1);
        self.track_frames = self
            .track_frames
            .saturating_add(self.rng.gen_range(1..=max_frames));
        self.track_contact = Some(now);
        self.bandit_signal = Some(self.rng.gen_range(-95..=-30));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn same_seed_replays_same_snapshots() {
        let config = ScenarioConfig {
            seed: 42,
            ..Default::default()
        };
        let mut a = TrackerSimulation::new(config.clone());
        let mut b = TrackerSimulation::new(config);
        for i in 0..50 {
            let now = start() + Duration::seconds(i);
            assert_eq!(a.step(now), b.step(now));
        }
    }

    #[test]
    fn certain_tracking_produces_contact() {
        let config = ScenarioConfig {
            ping_loss_probability: 0.0,
            out_of_sync_probability: 0.0,
            track_request_probability: 1.0,
            track_cancel_probability: 0.0,
            contact_probability: 1.0,
            monitor_failure_probability: 0.0,
            device_failure_probability: 0.0,
            ..Default::default()
        };
        let mut sim = TrackerSimulation::new(config);
        let snapshot = sim.step(start());
        assert!(snapshot.tracker_device_live);
        assert!(snapshot.monitors_live);
        assert!(snapshot.is_tracking);
        assert_eq!(snapshot.tracking_target.as_deref(), Some("pineapple"));
        assert!(snapshot.active_track().is_some());
        assert!(snapshot.track_frames >= 1);
        assert_eq!(snapshot.track_contact, Some(start()));
        assert!(snapshot.bandit_signal.is_some());
        assert!(snapshot.tracker_state.mentions("ONLINE"));
        assert_eq!(snapshot.events.len(), 2);
    }

    #[test]
    fn lost_leader_goes_dark() {
        let config = ScenarioConfig {
            ping_loss_probability: 1.0,
            track_request_probability: 0.0,
            ..Default::default()
        };
        let mut sim = TrackerSimulation::new(config);
        let snapshot = sim.step(start());
        assert!(snapshot.tracker_state.mentions("DARK"));
        assert_eq!(snapshot.leader_signal_strength, 0);
        assert!(!snapshot.is_tracking);
        assert!(snapshot.events.is_empty());
    }

    #[test]
    fn failing_device_and_monitors_report_offline() {
        let config = ScenarioConfig {
            device_failure_probability: 1.0,
            monitor_failure_probability: 1.0,
            ..Default::default()
        };
        let mut sim = TrackerSimulation::new(config);
        for i in 0..5 {
            let snapshot = sim.step(start() + Duration::seconds(i));
            assert!(!snapshot.tracker_device_live);
            assert!(!snapshot.monitors_live);
        }
    }
}
