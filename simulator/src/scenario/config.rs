use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Knobs of the simulated tracker. Probabilities are per one-second step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub channels: Vec<i64>,
    pub tracking_target: String,
    pub leader_rssi_start: i64,
    pub leader_rssi_drift: i64,
    pub ping_loss_probability: f64,
    pub out_of_sync_probability: f64,
    pub track_request_probability: f64,
    pub track_cancel_probability: f64,
    pub contact_probability: f64,
    pub max_frames_per_contact: u64,
    pub designator_cycle_steps: u64,
    pub monitor_failure_probability: f64,
    pub device_failure_probability: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            channels: vec![1, 6, 11],
            tracking_target: "pineapple".into(),
            leader_rssi_start: 180,
            leader_rssi_drift: 20,
            ping_loss_probability: 0.05,
            out_of_sync_probability: 0.02,
            track_request_probability: 0.05,
            track_cancel_probability: 0.01,
            contact_probability: 0.6,
            max_frames_per_contact: 40_000,
            designator_cycle_steps: 30,
            monitor_failure_probability: 0.01,
            device_failure_probability: 0.01,
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let probabilities = [
            ("ping_loss_probability", self.ping_loss_probability),
            ("out_of_sync_probability", self.out_of_sync_probability),
            ("track_request_probability", self.track_request_probability),
            ("track_cancel_probability", self.track_cancel_probability),
            ("contact_probability", self.contact_probability),
            ("monitor_failure_probability", self.monitor_failure_probability),
            ("device_failure_probability", self.device_failure_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{name} must be within [0, 1], got {value}");
            }
        }
        if self.channels.is_empty() {
            anyhow::bail!("at least one channel must be configured");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn scenario_load_fills_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"seed: 9\nchannels: [36, 40]\ncontact_probability: 0.9\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = ScenarioConfig::load(&path).unwrap();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.channels, vec![36, 40]);
        assert_eq!(cfg.tracking_target, "pineapple");
    }

    #[test]
    fn scenario_rejects_out_of_range_probability() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"ping_loss_probability: 1.5\n").unwrap();
        let path = temp.into_temp_path();
        assert!(ScenarioConfig::load(&path).is_err());
    }
}
