use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-family line counters, reset on every report
#[derive(Debug, Default)]
pub struct FamilyStats {
    lines_seen: AtomicU64,
    lines_matched: AtomicU64,
}

/// Counter values at one point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub lines_seen: u64,
    pub lines_matched: u64,
}

impl FamilyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one drained item
    pub fn record(&self, matched: bool) {
        self.lines_seen.fetch_add(1, Ordering::Relaxed);
        if matched {
            self.lines_matched.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_seen: self.lines_seen.load(Ordering::Relaxed),
            lines_matched: self.lines_matched.load(Ordering::Relaxed),
        }
    }

    /// Read and reset both counters
    pub fn take(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_seen: self.lines_seen.swap(0, Ordering::Relaxed),
            lines_matched: self.lines_matched.swap(0, Ordering::Relaxed),
        }
    }
}

impl AddAssign for StatsSnapshot {
    fn add_assign(&mut self, other: Self) {
        self.lines_seen += other.lines_seen;
        self.lines_matched += other.lines_matched;
    }
}
