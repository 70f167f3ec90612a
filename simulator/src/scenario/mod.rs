pub mod config;
pub mod simulation;

pub use config::ScenarioConfig;
pub use simulation::TrackerSimulation;
