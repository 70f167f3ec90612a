pub mod bridge;
pub mod outage;

pub use bridge::StateBridge;
pub use outage::OutageSchedule;
