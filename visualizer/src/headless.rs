use crate::config::DashboardConfig;
use crate::fetch::{build_client, fetch_snapshot};
use anyhow::Context;
use hidcore::poller::{drive, Poller};
use log::{info, warn};
use tokio::runtime::Builder as TokioBuilder;

/// Runs the poll loop without a window, logging every rendered frame.
pub fn run(config: DashboardConfig, ticks: Option<usize>) -> anyhow::Result<()> {
    let client = build_client(config.request_timeout()).context("building HTTP client")?;
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for headless polling")?;

    let endpoint = config.endpoint.clone();
    let mut poller = Poller::new(endpoint.clone());
    runtime.block_on(drive(
        &mut poller,
        || fetch_snapshot(client.clone(), endpoint.clone()),
        log_frame,
        ticks,
    ));

    let metrics = poller.metrics();
    info!(
        "headless polling finished: {} fetched, {} failed, {} skipped",
        metrics.fetched, metrics.failed, metrics.skipped
    );
    Ok(())
}

fn log_frame(poller: &Poller) {
    let Some(frame) = poller.frame() else {
        if let Some(failure) = poller.last_failure() {
            warn!("tracker unreachable: {failure}");
        }
        return;
    };
    info!(
        "CONN {} | SIG {} | DEV {} | MON {} | CHAN {} ({}) | TASK {} | TGT {} | TRACK {} | FRAMES {} | CTCT {} | BSIG {}",
        frame.connection,
        frame.signal,
        frame.device_link,
        frame.monitors_link,
        frame.channels,
        frame.channel_designator,
        frame.task,
        frame.bandit_target,
        frame.track,
        frame.frame_count,
        frame.contact_time,
        frame.bandit_signal,
    );
    if let Some(dbm) = poller.history().latest() {
        info!(
            "bandit signal history: {} samples, latest {} dBm",
            poller.history().len(),
            dbm
        );
    }
    if let Some(latest) = frame.events.first() {
        info!("latest event: {latest}");
    }
}
