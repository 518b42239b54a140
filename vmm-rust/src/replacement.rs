//! Victim selection once a faulting process cannot be given a free frame.
//!
//! FIFO, LRU and Random only look at the frame table and the admission order.
//! Optimal also needs the accesses that follow the current one, which the
//! simulator passes in as `upcoming`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::allocation::VictimScope;
use crate::config::ReplacementPolicy;
use crate::frame_table::{Frame, FrameTable};
use crate::trace::Access;

#[derive(Debug)]
pub struct Pager {
    policy: ReplacementPolicy,
    /// Frame indices in admission order, oldest first. Kept for every policy.
    fifo: VecDeque<usize>,
    seed: Option<u64>,
    rng: Option<StdRng>,
}

impl Pager {
    pub fn new(policy: ReplacementPolicy, seed: Option<u64>) -> Pager {
        Pager {
            policy,
            fifo: VecDeque::new(),
            seed,
            rng: seed.map(StdRng::seed_from_u64),
        }
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    /// Record that `frame` was just handed out from the free pool.
    pub fn admit(&mut self, frame: usize) {
        self.fifo.push_back(frame);
    }

    pub fn admission_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.fifo.iter().copied()
    }

    /// Forget the admission order and rewind the seeded rng, if any.
    pub fn reset(&mut self) {
        self.fifo.clear();
        self.rng = self.seed.map(StdRng::seed_from_u64);
    }

    /// Pick the frame to evict. `None` means no occupied frame is in `scope`.
    pub fn select_victim_frame(
        &mut self,
        scope: VictimScope,
        frames: &FrameTable,
        upcoming: &[Access],
        page_size: u64,
    ) -> Option<usize> {
        match self.policy {
            ReplacementPolicy::Fifo => self.fifo_victim(scope, frames),
            ReplacementPolicy::Lru => lru_victim(scope, frames),
            ReplacementPolicy::Random => self.random_victim(scope, frames),
            ReplacementPolicy::Optimal => optimal_victim(scope, frames, upcoming, page_size),
        }
    }

    fn fifo_victim(&mut self, scope: VictimScope, frames: &FrameTable) -> Option<usize> {
        let pid = match scope {
            VictimScope::Any => {
                // the victim is re-admitted as the newest entry
                let victim = self.fifo.pop_front()?;
                self.fifo.push_back(victim);
                return Some(victim);
            }
            VictimScope::Process(pid) => pid,
        };

        // Rotate other processes' frames to the back until the oldest of ours
        // is at the front. One full lap at most.
        for _ in 0..self.fifo.len() {
            let front = self.fifo.pop_front()?;
            self.fifo.push_back(front);
            if frames.get(front).is_owned_by(pid) {
                return Some(front);
            }
        }

        frames.owned_by(pid).next()
    }

    fn random_victim(&mut self, scope: VictimScope, frames: &FrameTable) -> Option<usize> {
        let candidates: Vec<usize> = eligible(scope, frames).map(|(idx, _)| idx).collect();
        if candidates.is_empty() {
            return None;
        }

        let pick = match self.rng.as_mut() {
            Some(rng) => rng.gen_range(0..candidates.len()),
            None => rand::thread_rng().gen_range(0..candidates.len()),
        };
        Some(candidates[pick])
    }
}

/// Occupied frames inside `scope`, in ascending index order.
fn eligible<'a>(
    scope: VictimScope,
    frames: &'a FrameTable,
) -> impl Iterator<Item = (usize, &'a Frame)> + 'a {
    frames
        .iter()
        .enumerate()
        .filter(move |(_, frame)| !frame.is_free() && scope.admits(frame))
}

/// Smallest `last_used`; ties go to the lowest frame index.
fn lru_victim(scope: VictimScope, frames: &FrameTable) -> Option<usize> {
    eligible(scope, frames)
        .min_by_key(|(_, frame)| frame.last_used)
        .map(|(idx, _)| idx)
}

/// Belady: evict the frame whose page is needed furthest in the future, or
/// never again. Ties go to the highest frame index.
fn optimal_victim(
    scope: VictimScope,
    frames: &FrameTable,
    upcoming: &[Access],
    page_size: u64,
) -> Option<usize> {
    eligible(scope, frames)
        .map(|(idx, frame)| {
            let next_use = upcoming
                .iter()
                .position(|access| {
                    frame.is_owned_by(access.pid) && access.vpage(page_size) == frame.vpage
                })
                .unwrap_or(usize::MAX);
            (idx, next_use)
        })
        // max_by_key keeps the last of equal maxima
        .max_by_key(|&(_, next_use)| next_use)
        .map(|(idx, _)| idx)
}
