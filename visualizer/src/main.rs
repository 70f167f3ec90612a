use chart::SignalChart;
use clap::Parser;
use config::DashboardConfig;
use fetch::{build_client, fetch_snapshot};
use hidcore::prelude::{FetchResult, Indicator, Tone, POLL_INTERVAL};
use hidcore::{Poller, StatusSnapshot, ViewState};
use iced::{
    time,
    widget::{
        canvas::{Cache, Canvas},
        column, row, scrollable, text, Column, Container,
    },
    Alignment, Color, Element, Length, Subscription, Task, Theme,
};
use std::path::PathBuf;

mod chart;
mod config;
mod fetch;
mod headless;

#[derive(Parser)]
#[command(author, version, about = "Live status dashboard for an nzyme bandit tracker")]
struct Args {
    /// Load endpoint settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Tracker state endpoint
    #[arg(long)]
    endpoint: Option<String>,
    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Poll without a window and log every frame
    #[arg(long, default_value_t = false)]
    headless: bool,
    /// Stop headless polling after this many fetches
    #[arg(long)]
    ticks: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_overrides(args.endpoint, args.timeout_ms);

    if args.headless {
        return headless::run(config, args.ticks);
    }

    let client = build_client(config.request_timeout())?;
    iced::application(
        move || Dashboard::boot(client.clone(), config.endpoint.clone()),
        Dashboard::update,
        Dashboard::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .run()?;
    Ok(())
}

fn application_title(_: &Dashboard) -> String {
    "nzyme tracker".into()
}

fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    time::every(POLL_INTERVAL).map(|_| Message::Tick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

struct Dashboard {
    poller: Poller,
    client: reqwest::Client,
    endpoint: String,
    chart_cache: Cache,
    chart_revision: u64,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    SnapshotFetched(FetchResult<StatusSnapshot>),
}

impl Dashboard {
    fn boot(client: reqwest::Client, endpoint: String) -> (Self, Task<Message>) {
        let mut dashboard = Dashboard {
            poller: Poller::new(endpoint.clone()),
            client,
            endpoint,
            chart_cache: Cache::new(),
            chart_revision: 0,
        };
        let first = dashboard.fetch();
        (dashboard, first)
    }

    fn fetch(&mut self) -> Task<Message> {
        if !self.poller.begin_tick() {
            return Task::none();
        }
        Task::perform(
            fetch_snapshot(self.client.clone(), self.endpoint.clone()),
            Message::SnapshotFetched,
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => state.fetch(),
            Message::SnapshotFetched(outcome) => {
                state.poller.complete(outcome);
                let revision = state.poller.history().revision();
                if revision != state.chart_revision {
                    state.chart_cache.clear();
                    state.chart_revision = revision;
                }
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let panels = state.poller.panels();
        let content = match state.poller.frame() {
            Some(frame) if panels.main_visible => state.main_panel(frame),
            _ => state.error_panel(),
        };

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }

    fn main_panel<'a>(&'a self, frame: &'a ViewState) -> Element<'a, Message> {
        let link_row = row![
            cell("CONN", &frame.connection),
            cell("SIG", &frame.signal),
            cell("TRACKER", &frame.device_link),
            cell("MONITORS", &frame.monitors_link),
            cell("CHANNELS", &frame.channels),
            cell("DESIGNATOR", &frame.channel_designator),
        ]
        .spacing(24);

        let task_row = row![
            cell("TASK", &frame.task),
            cell("BANDIT", &frame.bandit_target),
            cell("TRACK", &frame.track),
            cell("FRAMES", &frame.frame_count),
            cell("CONTACT", &frame.contact_time),
            cell("SIGNAL", &frame.bandit_signal),
        ]
        .spacing(24);

        let chart = Canvas::new(SignalChart {
            history: self.poller.history(),
            cache: &self.chart_cache,
        })
        .width(Length::Fill)
        .height(Length::Fixed(220.0));

        let events = frame
            .events
            .iter()
            .fold(Column::new().spacing(4), |col, line| {
                col.push(text(line.as_str()).size(13))
            });

        column![
            link_row,
            task_row,
            chart,
            text("Events").size(16),
            Container::new(scrollable(events).height(Length::Fixed(160.0))).padding(6),
        ]
        .spacing(16)
        .into()
    }

    fn error_panel(&self) -> Element<'_, Message> {
        let detail = self
            .poller
            .last_failure()
            .map(|failure| failure.to_string())
            .unwrap_or_else(|| "Waiting for tracker...".into());
        let metrics = self.poller.metrics();

        column![
            text("TRACKER UNREACHABLE")
                .size(28)
                .color(tone_color(Tone::Red)),
            text(format!("{} ({})", detail, self.endpoint)).size(14),
            text(format!(
                "{} fetched / {} failed / {} skipped",
                metrics.fetched, metrics.failed, metrics.skipped
            ))
            .size(12)
            .color(tone_color(Tone::Inactive)),
        ]
        .spacing(10)
        .align_x(Alignment::Center)
        .width(Length::Fill)
        .into()
    }
}

fn cell<'a>(title: &'a str, indicator: &'a Indicator) -> Element<'a, Message> {
    column![
        text(title).size(12).color(tone_color(Tone::Inactive)),
        text(indicator.label.as_str())
            .size(22)
            .color(tone_color(indicator.tone)),
    ]
    .spacing(4)
    .into()
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Green => Color::from_rgb(0.30, 0.80, 0.35),
        Tone::Yellow => Color::from_rgb(0.95, 0.80, 0.20),
        Tone::Red => Color::from_rgb(0.90, 0.25, 0.20),
        Tone::Neutral => Color::from_rgb(0.90, 0.90, 0.90),
        Tone::Inactive => Color::from_rgb(0.45, 0.45, 0.50),
    }
}
