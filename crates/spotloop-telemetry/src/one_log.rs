//! Per-cycle log deduplication.
//!
//! Gates can fire on every poll iteration while the market stays
//! unsuitable. `CycleLog` lets each distinct mark through once per cycle;
//! the owner clears it when the cycle ends.

use std::collections::HashSet;

use tracing::{debug, error, info, trace, warn, Level};

/// Set of marks already emitted in the current cycle.
#[derive(Debug, Default)]
pub struct CycleLog {
    marks: HashSet<String>,
    emitted_total: u64,
}

impl CycleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `message` at `level` unless `mark` was already emitted this cycle.
    ///
    /// Returns whether the message was emitted.
    pub fn send(&mut self, level: Level, mark: &str, message: &str) -> bool {
        if self.marks.contains(mark) {
            return false;
        }

        match level {
            Level::ERROR => error!(mark, "{message}"),
            Level::WARN => warn!(mark, "{message}"),
            Level::INFO => info!(mark, "{message}"),
            Level::DEBUG => debug!(mark, "{message}"),
            _ => trace!(mark, "{message}"),
        }

        self.marks.insert(mark.to_string());
        self.emitted_total += 1;
        true
    }

    /// Forget all marks. Called once per cycle end.
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn is_marked(&self, mark: &str) -> bool {
        self.marks.contains(mark)
    }

    /// Messages emitted since construction, across cycles.
    pub fn emitted_total(&self) -> u64 {
        self.emitted_total
    }
}
