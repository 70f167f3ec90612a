use hidcore::snapshot::ChannelDesignation;
use log::info;

/// Every this many cycles a cycle with contact turns into a sweep.
pub const SWEEP_BREAK: u16 = 5;

/// Narrows the monitor's channel hopping to channels a bandit was seen on.
#[derive(Debug)]
pub struct ChannelDesignator {
    configured: Vec<i64>,
    designated: Vec<i64>,
    active: Vec<i64>,
    contact_during_cycle: bool,
    status: ChannelDesignation,
    loop_count: u16,
}

impl ChannelDesignator {
    /// The first cycle starts out with every configured channel designated.
    pub fn new(configured: Vec<i64>) -> Self {
        Self {
            active: configured.clone(),
            designated: configured.clone(),
            configured,
            contact_during_cycle: false,
            status: ChannelDesignation::Unlocked,
            loop_count: 0,
        }
    }

    pub fn on_bandit_trace(&mut self, channel: i64) {
        self.contact_during_cycle = true;
        if !self.designated.contains(&channel) {
            self.designated.push(channel);
        }
    }

    /// Runs one designation cycle and returns the new status.
    pub fn designate(&mut self) -> ChannelDesignation {
        let mut sweep = false;
        if self.loop_count == SWEEP_BREAK - 1 {
            self.loop_count = 0;
            if self.contact_during_cycle {
                info!("Starting designator sweep.");
                self.active = self.configured.clone();
                self.status = ChannelDesignation::Sweeping;
                sweep = true;
            }
        }

        if !sweep {
            if self.contact_during_cycle {
                self.active = self
                    .designated
                    .iter()
                    .copied()
                    .filter(|channel| self.configured.contains(channel))
                    .collect();
                info!("Contacts recorded during cycle. Designating channels {:?}.", self.active);
                self.status = ChannelDesignation::Locked;
            } else {
                info!("No contacts during cycle. Resuming configured channels.");
                self.active = self.configured.clone();
                self.status = ChannelDesignation::Unlocked;
            }
        }

        self.contact_during_cycle = false;
        self.designated.clear();
        self.loop_count += 1;
        self.status
    }

    pub fn status(&self) -> ChannelDesignation {
        self.status
    }

    pub fn active_channels(&self) -> &[i64] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_cycle_with_contact_keeps_configured_channels() {
        let mut designator = ChannelDesignator::new(vec![1, 6, 11]);
        designator.on_bandit_trace(6);
        designator.on_bandit_trace(14);
        assert_eq!(designator.designate(), ChannelDesignation::Locked);
        assert_eq!(designator.active_channels(), &[1, 6, 11]);
    }

    #[test]
    fn contact_locks_onto_known_channels() {
        let mut designator = ChannelDesignator::new(vec![1, 6, 11]);
        designator.designate();
        designator.on_bandit_trace(6);
        designator.on_bandit_trace(14);
        assert_eq!(designator.designate(), ChannelDesignation::Locked);
        assert_eq!(designator.active_channels(), &[6]);

        assert_eq!(designator.designate(), ChannelDesignation::Unlocked);
        assert_eq!(designator.active_channels(), &[1, 6, 11]);
    }

    #[test]
    fn fifth_cycle_with_contact_sweeps() {
        let mut designator = ChannelDesignator::new(vec![1, 6, 11]);
        for _ in 0..4 {
            designator.on_bandit_trace(11);
            assert_eq!(designator.designate(), ChannelDesignation::Locked);
        }
        designator.on_bandit_trace(11);
        assert_eq!(designator.designate(), ChannelDesignation::Sweeping);
        assert_eq!(designator.active_channels(), &[1, 6, 11]);

        designator.on_bandit_trace(11);
        assert_eq!(designator.designate(), ChannelDesignation::Locked);
    }

    #[test]
    fn fifth_cycle_without_contact_unlocks() {
        let mut designator = ChannelDesignator::new(vec![1]);
        for _ in 0..5 {
            assert_eq!(designator.designate(), ChannelDesignation::Unlocked);
        }
    }
}
