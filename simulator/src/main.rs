use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use hidcore::prelude::POLL_INTERVAL;
use log::info;
use scenario::{ScenarioConfig, TrackerSimulation};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use webhid::{OutageSchedule, StateBridge};

mod scenario;
mod tracker;
mod webhid;

#[derive(Parser)]
#[command(author, version, about = "Simulated nzyme tracker serving the WebHID state endpoint")]
struct Args {
    /// Address the state endpoint listens on
    #[arg(long, default_value_t = webhid::bridge::default_bind_address())]
    bind: SocketAddr,
    /// Load a scenario from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,
    /// Fail the endpoint with HTTP 500 once every N seconds
    #[arg(long)]
    outage_every: Option<u64>,
    /// Length of each outage in seconds
    #[arg(long, default_value_t = 3)]
    outage_length: u64,
    /// Print a single snapshot as JSON and exit
    #[arg(long, default_value_t = false)]
    once: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::default()
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut simulation = TrackerSimulation::new(config);

    if args.once {
        let snapshot = simulation.step(Utc::now());
        let rendered =
            serde_json::to_string_pretty(&snapshot).context("serializing tracker snapshot")?;
        println!("{rendered}");
        return Ok(());
    }

    let outages = OutageSchedule::new(args.outage_every, args.outage_length);
    let bridge = StateBridge::new();

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tracker runtime")?;
    runtime.block_on(async move {
        tokio::spawn(bridge.clone().serve(args.bind));

        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        let mut step = 0u64;
        info!("tracker simulation running (Ctrl+C to stop)...");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    step += 1;
                    let snapshot = simulation.step(Utc::now());
                    bridge.publish(snapshot, outages.is_down(step)).await;
                }
                result = signal::ctrl_c() => {
                    result.context("awaiting Ctrl+C to exit")?;
                    info!("tracker simulation stopped after {step} steps");
                    break;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}
