pub mod event;
mod lenient;
pub mod state;

pub use event::TrackerEvent;
pub use state::{ChannelDesignation, Channels, StatusSnapshot, TrackerStates};
