/// Periodic outage window: the endpoint fails for `length` steps out of
/// every `every` steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutageSchedule {
    every: Option<u64>,
    length: u64,
}

impl OutageSchedule {
    pub fn new(every: Option<u64>, length: u64) -> Self {
        Self {
            every: every.filter(|every| *every > 0),
            length,
        }
    }

    /// Whether step `step` (1-based) falls inside an outage.
    pub fn is_down(&self, step: u64) -> bool {
        match self.every {
            Some(every) if step > 0 => (step - 1) % every >= every.saturating_sub(self.length),
            _ => false,
        }
    }
}
