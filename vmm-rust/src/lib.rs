//! Discrete-event paging simulator.
//!
//! A trace of `(pid, address)` accesses is replayed against a fixed pool of
//! physical frames shared by four processes. Page faults are counted under a
//! choice of replacement policy (FIFO, LRU, Random, Optimal) and frame
//! allocation discipline (Global, Local).

pub mod allocation;
pub mod config;
pub mod error;
pub mod frame_table;
pub mod mmu;
pub mod page_table;
pub mod replacement;
pub mod stats;
pub mod trace;

pub use config::{AllocationPolicy, ReplacementPolicy, SimConfig, NUM_PROCESSES};
pub use error::{ConfigError, LookupError, SimError, TraceError, VmmError};
pub use mmu::{AccessOutcome, Mmu, SimState};
pub use stats::Stats;
pub use trace::{parse_trace, read_trace_file, Access};
