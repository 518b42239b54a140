use std::collections::HashMap;

use crate::error::LookupError;

/// Per-process map from virtual page number to frame index.
///
/// Only the table itself is touched here; keeping the frame table in step is
/// the simulator's job.
#[derive(Debug, Default, Clone)]
pub struct PageTable {
    entries: HashMap<u64, usize>,
}

impl PageTable {
    pub fn new() -> PageTable {
        PageTable::default()
    }

    pub fn has_mapping(&self, vpage: u64) -> bool {
        self.entries.contains_key(&vpage)
    }

    /// Checked lookup. Prefer `lookup` when a miss is expected.
    pub fn get_frame(&self, vpage: u64) -> Result<usize, LookupError> {
        self.lookup(vpage).ok_or(LookupError { vpage })
    }

    #[inline]
    pub fn lookup(&self, vpage: u64) -> Option<usize> {
        self.entries.get(&vpage).copied()
    }

    /// Overwrites any earlier mapping for `vpage`.
    pub fn add_mapping(&mut self, vpage: u64, frame: usize) {
        self.entries.insert(vpage, frame);
    }

    pub fn remove_mapping(&mut self, vpage: u64) {
        self.entries.remove(&vpage);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.entries.iter().map(|(&vpage, &frame)| (vpage, frame))
    }
}
