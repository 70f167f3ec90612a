use super::Poller;
use crate::prelude::{FetchResult, POLL_INTERVAL};
use crate::snapshot::StatusSnapshot;
use std::future::Future;
use tokio::time::{self, MissedTickBehavior};

/// Runs the poll loop on a tokio interval until `max_ticks` fetches completed.
///
/// Fetches are awaited in turn, and interval ticks missed while a fetch was
/// pending are skipped rather than replayed. `on_frame` sees the poller after
/// every completed fetch.
pub async fn drive<F, Fut, R>(
    poller: &mut Poller,
    mut fetch: F,
    mut on_frame: R,
    max_ticks: Option<usize>,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetchResult<StatusSnapshot>>,
    R: FnMut(&Poller),
{
    let mut ticker = time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let limit_reached = |completed: usize| max_ticks.is_some_and(|limit| completed >= limit);
    let mut completed = 0usize;
    while !limit_reached(completed) {
        ticker.tick().await;
        if !poller.begin_tick() {
            continue;
        }
        let outcome = fetch().await;
        poller.complete(outcome);
        on_frame(poller);

        completed += 1;
    }
}
