//! Fixed-period poll state machine.
//!
//! The poller starts out [`LinkState::Disconnected`]. Every successful fetch
//! moves it to `Connected`, records one history sample and replaces the
//! rendered frame; every failure moves it back to `Disconnected` and drops the
//! frame. There is no retry: the next scheduled tick is the retry.

pub mod driver;
pub mod history;

pub use driver::drive;
pub use history::SignalHistory;

use crate::prelude::{FetchFailure, FetchResult};
use crate::snapshot::StatusSnapshot;
use crate::telemetry::{LogManager, Metrics, MetricsRecorder};
use crate::view::ViewState;
use chrono::{Local, TimeZone};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Disconnected,
}

/// Visibility of the two top-level containers. Always an inverse pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    pub main_visible: bool,
    pub error_visible: bool,
}

pub struct Poller {
    history: SignalHistory,
    link: LinkState,
    frame: Option<ViewState>,
    last_failure: Option<FetchFailure>,
    in_flight: bool,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl Poller {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            history: SignalHistory::default(),
            link: LinkState::Disconnected,
            frame: None,
            last_failure: None,
            in_flight: false,
            logger: LogManager::new(endpoint),
            metrics: MetricsRecorder::new(),
        }
    }

    /// Admits a tick unless the previous fetch is still pending.
    pub fn begin_tick(&mut self) -> bool {
        if self.in_flight {
            self.metrics.record_skipped();
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Applies the outcome of a fetch, rendering times in local time.
    pub fn complete(&mut self, outcome: FetchResult<StatusSnapshot>) {
        self.complete_in(outcome, &Local);
    }

    pub fn complete_in<Tz>(&mut self, outcome: FetchResult<StatusSnapshot>, zone: &Tz)
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.in_flight = false;
        match outcome {
            Ok(snapshot) => {
                self.metrics.record_fetched();
                self.transition(LinkState::Connected);
                self.last_failure = None;
                self.history.push_signal(snapshot.bandit_signal);
                self.frame = Some(ViewState::derive(&snapshot, zone));
            }
            Err(failure) => {
                self.metrics.record_failed();
                self.logger.record_failure(&failure);
                self.transition(LinkState::Disconnected);
                self.frame = None;
                self.last_failure = Some(failure);
            }
        }
    }

    fn transition(&mut self, next: LinkState) {
        if self.link != next {
            self.logger
                .record(&format!("link {:?} -> {:?}", self.link, next));
            self.link = next;
        }
    }

    pub fn link(&self) -> LinkState {
        self.link
    }

    pub fn panels(&self) -> Panels {
        let connected = self.link == LinkState::Connected;
        Panels {
            main_visible: connected,
            error_visible: !connected,
        }
    }

    pub fn frame(&self) -> Option<&ViewState> {
        self.frame.as_ref()
    }

    pub fn history(&self) -> &SignalHistory {
        &self.history
    }

    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    #[cfg(test)]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot_with_signal(dbm: Option<i64>) -> StatusSnapshot {
        StatusSnapshot {
            bandit_signal: dbm,
            ..Default::default()
        }
    }

    #[test]
    fn starts_disconnected_with_error_panel() {
        let poller = Poller::new("test");
        assert_eq!(poller.link(), LinkState::Disconnected);
        assert_eq!(
            poller.panels(),
            Panels {
                main_visible: false,
                error_visible: true
            }
        );
        assert!(poller.frame().is_none());
    }

    #[test]
    fn failure_flips_panels_and_recovery_resumes_history() {
        let mut poller = Poller::new("test");

        assert!(poller.begin_tick());
        poller.complete_in(Ok(snapshot_with_signal(Some(-40))), &Utc);
        assert!(poller.panels().main_visible);
        assert!(!poller.panels().error_visible);
        assert_eq!(poller.history().len(), 1);

        assert!(poller.begin_tick());
        poller.complete_in(Err(FetchFailure::Status(500)), &Utc);
        assert_eq!(poller.link(), LinkState::Disconnected);
        assert!(!poller.panels().main_visible);
        assert!(poller.panels().error_visible);
        assert!(poller.frame().is_none());
        assert_eq!(poller.last_failure(), Some(&FetchFailure::Status(500)));
        assert_eq!(poller.history().len(), 1);

        assert!(poller.begin_tick());
        poller.complete_in(Ok(snapshot_with_signal(None)), &Utc);
        assert_eq!(poller.link(), LinkState::Connected);
        assert!(poller.frame().is_some());
        assert!(poller.last_failure().is_none());
        assert_eq!(poller.history().iter().collect::<Vec<_>>(), vec![-40, -100]);

        let metrics = poller.metrics();
        assert_eq!(metrics.fetched, 2);
        assert_eq!(metrics.failed, 1);
    }

    #[test]
    fn tick_during_pending_fetch_is_skipped() {
        let mut poller = Poller::new("test");
        assert!(poller.begin_tick());
        assert!(!poller.begin_tick());
        assert!(!poller.begin_tick());
        assert_eq!(poller.metrics().skipped, 2);

        poller.complete_in(Ok(StatusSnapshot::default()), &Utc);
        assert!(!poller.is_in_flight());
        assert!(poller.begin_tick());
    }
}
