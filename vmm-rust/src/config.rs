//! Run configuration: page size, frame count and the two policy choices.
//!
//! A `SimConfig` is validated once and then handed to the simulator by value;
//! nothing about a run can be changed after construction.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Processes are numbered `0..NUM_PROCESSES`.
pub const NUM_PROCESSES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementPolicy {
    Fifo,
    Lru,
    Random,
    Optimal,
}

impl ReplacementPolicy {
    pub const ALL: [ReplacementPolicy; 4] = [
        ReplacementPolicy::Fifo,
        ReplacementPolicy::Lru,
        ReplacementPolicy::Random,
        ReplacementPolicy::Optimal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReplacementPolicy::Fifo => "FIFO",
            ReplacementPolicy::Lru => "LRU",
            ReplacementPolicy::Random => "Random",
            ReplacementPolicy::Optimal => "Optimal",
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|policy| policy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownReplacementPolicy(s.to_string()))
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationPolicy {
    /// Any process may take any free frame.
    Global,
    /// Each process is capped at a fixed share of the frames.
    Local,
}

impl AllocationPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            AllocationPolicy::Global => "Global",
            AllocationPolicy::Local => "Local",
        }
    }
}

impl FromStr for AllocationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            name if name.eq_ignore_ascii_case("global") => Ok(AllocationPolicy::Global),
            name if name.eq_ignore_ascii_case("local") => Ok(AllocationPolicy::Local),
            _ => Err(ConfigError::UnknownAllocationPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Only obtainable through `SimConfig::new`, so a zero page size or an
/// unsatisfiable Local quota never reaches the simulator.
///
/// ```compile_fail
/// use vmm_rust::{AllocationPolicy, ReplacementPolicy, SimConfig};
///
/// let config = SimConfig {
///     page_size: 0,
///     num_frames: 2,
///     replacement: ReplacementPolicy::Fifo,
///     allocation: AllocationPolicy::Global,
///     seed: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    page_size: u64,
    num_frames: usize,
    replacement: ReplacementPolicy,
    allocation: AllocationPolicy,
    /// Seeds the Random policy. `None` draws from a fresh thread rng per selection.
    seed: Option<u64>,
}

impl SimConfig {
    pub fn new(
        page_size: u64,
        num_frames: usize,
        replacement: ReplacementPolicy,
        allocation: AllocationPolicy,
    ) -> Result<SimConfig, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if num_frames == 0 {
            return Err(ConfigError::NoFrames);
        }
        if allocation == AllocationPolicy::Local && num_frames < NUM_PROCESSES {
            return Err(ConfigError::LocalQuotaTooSmall {
                num_frames,
                needed: NUM_PROCESSES,
            });
        }

        Ok(SimConfig {
            page_size,
            num_frames,
            replacement,
            allocation,
            seed: None,
        })
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn replacement(&self) -> ReplacementPolicy {
        self.replacement
    }

    pub fn allocation(&self) -> AllocationPolicy {
        self.allocation
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn with_seed(mut self, seed: u64) -> SimConfig {
        self.seed = Some(seed);
        self
    }

    /// Same geometry and allocation, different replacement policy.
    pub fn with_replacement(mut self, replacement: ReplacementPolicy) -> SimConfig {
        self.replacement = replacement;
        self
    }
}

fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}

pub fn parse_page_size(value: &str) -> Result<u64, ConfigError> {
    parse_number("page size", value)
}

pub fn parse_num_frames(value: &str) -> Result<usize, ConfigError> {
    parse_number("number of frames", value)
}

pub fn parse_seed(value: &str) -> Result<u64, ConfigError> {
    parse_number("seed", value)
}
