/// One physical frame. `pid == None` is the only marker of a free frame;
/// `vpage` and the timestamps are meaningless while it is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub pid: Option<usize>,
    pub vpage: u64,
    pub last_used: u64,
    pub load_time: u64,
}

impl Frame {
    pub const FREE: Frame = Frame {
        pid: None,
        vpage: 0,
        last_used: 0,
        load_time: 0,
    };

    #[inline]
    pub fn is_free(&self) -> bool {
        self.pid.is_none()
    }

    #[inline]
    pub fn is_owned_by(&self, pid: usize) -> bool {
        self.pid == Some(pid)
    }

    /// The resident `(pid, vpage)` pair, if any.
    pub fn occupant(&self) -> Option<(usize, u64)> {
        self.pid.map(|pid| (pid, self.vpage))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::FREE
    }
}

/// Fixed number of frames, sized once at construction.
#[derive(Debug, Clone)]
pub struct FrameTable {
    frames: Box<[Frame]>,
}

impl FrameTable {
    pub fn new(num_frames: usize) -> FrameTable {
        FrameTable {
            frames: vec![Frame::FREE; num_frames].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &Frame {
        &self.frames[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.frames.iter()
    }

    /// Lowest-numbered free frame.
    pub fn first_free(&self) -> Option<usize> {
        self.frames.iter().position(Frame::is_free)
    }

    pub fn owned_by(&self, pid: usize) -> impl Iterator<Item = usize> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter(move |(_, frame)| frame.is_owned_by(pid))
            .map(|(idx, _)| idx)
    }

    pub fn count_owned_by(&self, pid: usize) -> usize {
        self.frames.iter().filter(|frame| frame.is_owned_by(pid)).count()
    }

    pub fn resident_count(&self) -> usize {
        self.frames.iter().filter(|frame| !frame.is_free()).count()
    }

    /// Load `(pid, vpage)` into frame `idx`, stamping both timestamps with `now`.
    pub fn install(&mut self, idx: usize, pid: usize, vpage: u64, now: u64) {
        self.frames[idx] = Frame {
            pid: Some(pid),
            vpage,
            last_used: now,
            load_time: now,
        };
    }

    #[inline]
    pub fn touch(&mut self, idx: usize, now: u64) {
        self.frames[idx].last_used = now;
    }

    /// Free frame `idx`, returning whatever was resident.
    pub fn evict(&mut self, idx: usize) -> Option<(usize, u64)> {
        let occupant = self.frames[idx].occupant();
        self.frames[idx] = Frame::FREE;
        occupant
    }

    pub fn reset(&mut self) {
        self.frames.fill(Frame::FREE);
    }
}
