pub mod designator;
pub mod events;
pub mod watchdog;

pub use designator::ChannelDesignator;
pub use events::EventLog;
pub use watchdog::TrackerStateWatchdog;
