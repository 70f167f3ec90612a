//! Core model and poll loop for the nzyme WebHID tracker dashboard.
//!
//! A tracker exposes one JSON status snapshot. The modules here decode that
//! snapshot leniently, derive a frame of display indicators from it, keep a
//! bounded history of the bandit signal, and drive the fixed-period poll with
//! a connected/disconnected state machine.

pub mod poller;
pub mod prelude;
pub mod snapshot;
pub mod telemetry;
pub mod view;

pub use poller::{LinkState, Panels, Poller};
pub use prelude::{FetchFailure, Indicator, Tone};
pub use snapshot::StatusSnapshot;
pub use view::ViewState;
