//! Free-frame allocation under the Global and Local disciplines.

use crate::config::{AllocationPolicy, NUM_PROCESSES};
use crate::frame_table::{Frame, FrameTable};

/// Split `num_frames` evenly across processes; the remainder goes one extra
/// frame each to the lowest-numbered processes.
pub fn compute_quotas(num_frames: usize) -> [usize; NUM_PROCESSES] {
    let share = num_frames / NUM_PROCESSES;
    let remainder = num_frames % NUM_PROCESSES;
    let mut quotas = [share; NUM_PROCESSES];
    for quota in quotas.iter_mut().take(remainder) {
        *quota += 1;
    }
    quotas
}

/// Which frames a faulting process may take a victim from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictimScope {
    Any,
    Process(usize),
}

impl VictimScope {
    #[inline]
    pub fn admits(&self, frame: &Frame) -> bool {
        match self {
            VictimScope::Any => true,
            VictimScope::Process(pid) => frame.is_owned_by(*pid),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameAllocator {
    policy: AllocationPolicy,
    /// Only consulted under Local allocation.
    quotas: [usize; NUM_PROCESSES],
}

impl FrameAllocator {
    pub fn new(policy: AllocationPolicy, num_frames: usize) -> FrameAllocator {
        let quotas = match policy {
            AllocationPolicy::Global => [num_frames; NUM_PROCESSES],
            AllocationPolicy::Local => compute_quotas(num_frames),
        };
        FrameAllocator { policy, quotas }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    /// The most frames `pid` may hold at once.
    pub fn quota(&self, pid: usize) -> usize {
        self.quotas[pid]
    }

    fn under_quota(&self, pid: usize, frames: &FrameTable) -> bool {
        match self.policy {
            AllocationPolicy::Global => true,
            AllocationPolicy::Local => frames.count_owned_by(pid) < self.quotas[pid],
        }
    }

    /// Lowest free frame `pid` is allowed to take, if any. Under Local
    /// allocation a process at its quota gets nothing even when frames are free.
    pub fn get_free_frame(&self, pid: usize, frames: &FrameTable) -> Option<usize> {
        let free = frames.first_free()?;
        if self.under_quota(pid, frames) {
            Some(free)
        } else {
            None
        }
    }

    pub fn victim_scope(&self, pid: usize) -> VictimScope {
        match self.policy {
            AllocationPolicy::Global => VictimScope::Any,
            AllocationPolicy::Local => VictimScope::Process(pid),
        }
    }
}
