use std::time::Duration;
use tokio::time::Instant;

/// Wall-clock allowance for one fetch + merge
#[derive(Debug, Clone, Copy)]
pub struct ResponseBudget {
    limit: Duration,
}

impl ResponseBudget {
    pub fn from_millis(limit_ms: u64) -> Self {
        Self { limit: Duration::from_millis(limit_ms) }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn start(&self) -> BudgetTimer {
        BudgetTimer { started_at: get_instant(), limit: self.limit }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BudgetTimer {
    started_at: Instant,
    limit: Duration,
}

impl BudgetTimer {
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Elapsed time, if strictly over the limit
    pub fn exceeded(&self) -> Option<Duration> {
        let elapsed = self.elapsed();
        (elapsed > self.limit).then_some(elapsed)
    }
}

pub fn get_instant() -> Instant {
    Instant::now()
}
