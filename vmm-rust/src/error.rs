use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Bad command-line value. Reported before any simulation starts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?} is not a non-negative integer")]
    InvalidNumber { name: &'static str, value: String },

    #[error("page size must be at least 1 byte")]
    ZeroPageSize,

    #[error("number of frames must be at least 1")]
    NoFrames,

    #[error("unknown replacement policy {0:?} (expected FIFO, LRU, Random or Optimal)")]
    UnknownReplacementPolicy(String),

    #[error("unknown allocation policy {0:?} (expected Global or Local)")]
    UnknownAllocationPolicy(String),

    #[error("local allocation needs at least {needed} frames to give every process a quota, got {num_frames}")]
    LocalQuotaTooSmall { num_frames: usize, needed: usize },
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("failed to read trace file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("trace line {line}: expected `<pid>,<address>`, found {content:?}")]
    Malformed { line: usize, content: String },

    #[error("trace line {line}: process id {pid} is out of range 0..=3")]
    ProcessOutOfRange { line: usize, pid: usize },
}

/// A page table was asked for a page it does not map.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("virtual page {vpage} has no frame mapping")]
pub struct LookupError {
    pub vpage: u64,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SimError {
    #[error("no trace loaded")]
    NoTraceLoaded,

    #[error("access {index} names process {pid}, outside 0..=3")]
    ProcessOutOfRange { index: usize, pid: usize },

    #[error("no eligible victim frame for process {pid}")]
    NoVictim { pid: usize },
}

#[derive(Error, Debug)]
pub enum VmmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Sim(#[from] SimError),
}
