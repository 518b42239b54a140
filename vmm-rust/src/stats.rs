use std::fmt;

use crate::config::{SimConfig, NUM_PROCESSES};

/// Counters for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub accesses: u64,
    pub hits: u64,
    pub evictions: u64,
    pub total_faults: u64,
    pub process_faults: [u64; NUM_PROCESSES],
}

impl Stats {
    pub fn record_hit(&mut self) {
        self.accesses += 1;
        self.hits += 1;
    }

    pub fn record_fault(&mut self, pid: usize) {
        self.accesses += 1;
        self.total_faults += 1;
        self.process_faults[pid] += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn summary<'a>(&'a self, config: &'a SimConfig) -> Summary<'a> {
        Summary {
            config,
            stats: self,
        }
    }
}

/// End-of-run report: the configuration followed by the fault counts.
pub struct Summary<'a> {
    config: &'a SimConfig,
    stats: &'a Stats,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Replacement Policy: {}", self.config.replacement())?;
        writeln!(f, "Allocation Policy: {}", self.config.allocation())?;
        writeln!(f, "Page Size: {} bytes", self.config.page_size())?;
        writeln!(f, "Number of Frames: {}", self.config.num_frames())?;
        writeln!(f, "Total page faults: {}", self.stats.total_faults)?;
        for (pid, faults) in self.stats.process_faults.iter().enumerate() {
            writeln!(f, "Process {} page faults: {}", pid, faults)?;
        }
        Ok(())
    }
}
