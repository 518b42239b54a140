//! The simulation driver: replays a trace one access at a time against the
//! frame table, the per-process page tables, the allocator and the pager.

use log::{debug, info, trace};

use crate::allocation::FrameAllocator;
use crate::config::{SimConfig, NUM_PROCESSES};
use crate::error::SimError;
use crate::frame_table::FrameTable;
use crate::page_table::PageTable;
use crate::replacement::Pager;
use crate::stats::Stats;
use crate::trace::Access;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// No trace loaded.
    Idle,
    /// Trace loaded, accesses left to replay.
    Running,
    /// Every access replayed; stats are final.
    Done,
}

/// What a single access did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit {
        frame: usize,
    },
    Fault {
        frame: usize,
        /// `(pid, vpage)` that had to leave `frame`, if it was not free.
        evicted: Option<(usize, u64)>,
    },
}

impl AccessOutcome {
    pub fn frame(&self) -> usize {
        match *self {
            AccessOutcome::Hit { frame } | AccessOutcome::Fault { frame, .. } => frame,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, AccessOutcome::Fault { .. })
    }
}

#[derive(Debug)]
pub struct Mmu {
    config: SimConfig,
    frame_table: FrameTable,
    page_tables: [PageTable; NUM_PROCESSES],
    allocator: FrameAllocator,
    pager: Pager,

    trace: Vec<Access>,
    /// Index of the next access; also the logical clock.
    access_count: usize,
    state: SimState,

    stats: Stats,
}

impl Mmu {
    pub fn new(config: SimConfig) -> Mmu {
        Mmu {
            frame_table: FrameTable::new(config.num_frames()),
            page_tables: Default::default(),
            allocator: FrameAllocator::new(config.allocation(), config.num_frames()),
            pager: Pager::new(config.replacement(), config.seed()),
            trace: Vec::new(),
            access_count: 0,
            state: SimState::Idle,
            stats: Stats::default(),
            config,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frame_table
    }

    pub fn page_table(&self, pid: usize) -> &PageTable {
        &self.page_tables[pid]
    }

    /// Frame cap for `pid`; equal to the frame count under Global allocation.
    pub fn quota(&self, pid: usize) -> usize {
        self.allocator.quota(pid)
    }

    pub fn admission_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.pager.admission_order()
    }

    /// Accesses replayed so far.
    pub fn position(&self) -> usize {
        self.access_count
    }

    fn clear_state(&mut self) {
        self.frame_table.reset();
        for table in self.page_tables.iter_mut() {
            table.clear();
        }
        self.pager.reset();
        self.stats = Stats::default();
        self.access_count = 0;
    }

    /// Discard the trace and every bit of run state.
    pub fn reset(&mut self) {
        self.clear_state();
        self.trace.clear();
        self.state = SimState::Idle;
    }

    /// Start a fresh run over `trace`. Anything left from an earlier run is
    /// cleared. A trace naming a process outside `0..NUM_PROCESSES` is refused
    /// and leaves the simulator Idle.
    pub fn load_trace(&mut self, trace: Vec<Access>) -> Result<(), SimError> {
        self.reset();
        if let Some((index, access)) = trace
            .iter()
            .enumerate()
            .find(|(_, access)| access.pid >= NUM_PROCESSES)
        {
            return Err(SimError::ProcessOutOfRange {
                index,
                pid: access.pid,
            });
        }

        self.trace = trace;
        self.state = SimState::Running;
        info!(
            "replaying {} accesses: {}/{}, {}-byte pages, {} frames",
            self.trace.len(),
            self.config.replacement(),
            self.config.allocation(),
            self.config.page_size(),
            self.config.num_frames()
        );
        if self.trace.is_empty() {
            self.finish();
        }
        Ok(())
    }

    /// Replay the next access. `Ok(None)` once the trace is exhausted.
    pub fn step(&mut self) -> Result<Option<AccessOutcome>, SimError> {
        match self.state {
            SimState::Idle => return Err(SimError::NoTraceLoaded),
            SimState::Done => return Ok(None),
            SimState::Running => {}
        }

        let access = self.trace[self.access_count];
        let outcome = self.process_access(access)?;
        self.access_count += 1;
        if self.access_count == self.trace.len() {
            self.finish();
        }
        Ok(Some(outcome))
    }

    pub fn run(&mut self) -> Result<&Stats, SimError> {
        while self.step()?.is_some() {}
        Ok(&self.stats)
    }

    /// `load_trace` followed by `run`.
    pub fn simulate(&mut self, trace: Vec<Access>) -> Result<Stats, SimError> {
        self.load_trace(trace)?;
        self.run().cloned()
    }

    fn finish(&mut self) {
        self.state = SimState::Done;
        info!(
            "done: {} accesses, {} hits, {} faults, {} evictions",
            self.stats.accesses, self.stats.hits, self.stats.total_faults, self.stats.evictions
        );
    }

    fn process_access(&mut self, access: Access) -> Result<AccessOutcome, SimError> {
        let pid = access.pid;
        let vpage = access.vpage(self.config.page_size());
        let now = self.access_count as u64;

        if let Some(frame) = self.page_tables[pid].lookup(vpage) {
            self.frame_table.touch(frame, now);
            self.stats.record_hit();
            trace!(
                "Page Hit: Process {}, Virtual Page {}, Located in Frame {}",
                pid,
                vpage,
                frame
            );
            return Ok(AccessOutcome::Hit { frame });
        }

        self.stats.record_fault(pid);
        let (frame, evicted) = self.get_frame(pid)?;
        self.frame_table.install(frame, pid, vpage, now);
        self.page_tables[pid].add_mapping(vpage, frame);

        match evicted {
            Some((old_pid, old_vpage)) => debug!(
                "Page Fault: Process {}, Virtual Page {}, Mapped to Frame {} (evicted Process {}, Virtual Page {})",
                pid, vpage, frame, old_pid, old_vpage
            ),
            None => debug!(
                "Page Fault: Process {}, Virtual Page {}, Mapped to Frame {}",
                pid, vpage, frame
            ),
        }
        Ok(AccessOutcome::Fault { frame, evicted })
    }

    /// A frame for faulting `pid`: a free one if the allocator grants it,
    /// otherwise a victim whose old mapping has already been torn down.
    fn get_frame(&mut self, pid: usize) -> Result<(usize, Option<(usize, u64)>), SimError> {
        if let Some(frame) = self.allocator.get_free_frame(pid, &self.frame_table) {
            self.pager.admit(frame);
            return Ok((frame, None));
        }

        let upcoming = &self.trace[self.access_count + 1..];
        let victim = self
            .pager
            .select_victim_frame(
                self.allocator.victim_scope(pid),
                &self.frame_table,
                upcoming,
                self.config.page_size(),
            )
            .ok_or(SimError::NoVictim { pid })?;

        let evicted = self.frame_table.evict(victim);
        if let Some((old_pid, old_vpage)) = evicted {
            self.page_tables[old_pid].remove_mapping(old_vpage);
            self.stats.record_eviction();
        }
        Ok((victim, evicted))
    }

    /// Every page-table entry points at a frame holding exactly that
    /// `(pid, vpage)`, and every occupied frame is mapped by its owner.
    pub fn is_consistent(&self) -> bool {
        let tables_agree = self.page_tables.iter().enumerate().all(|(pid, table)| {
            table
                .iter()
                .all(|(vpage, frame)| self.frame_table.get(frame).occupant() == Some((pid, vpage)))
        });
        let frames_agree = self.frame_table.iter().enumerate().all(|(idx, frame)| {
            match frame.occupant() {
                Some((pid, vpage)) => self.page_tables[pid].lookup(vpage) == Some(idx),
                None => true,
            }
        });
        tables_agree && frames_agree
    }
}
