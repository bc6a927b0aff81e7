/// Trailing delay for window resize bursts.
pub const RESIZE_DEBOUNCE_MS: u32 = 100;
/// Trailing delay before the info panel renders a newly clicked building.
pub const PANEL_SHOW_DEBOUNCE_MS: u32 = 100;

/// Handle for one scheduled debounce run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Trailing-edge debounce bookkeeping, independent of any timer.
///
/// Every `schedule` supersedes the tickets issued before it. When a timer
/// fires it hands its ticket to `fire`, which yields the value only for the
/// newest ticket, so a superseded continuation simply does nothing.
#[derive(Debug)]
pub struct Debounce<T> {
    generation: u64,
    pending: Option<T>,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }
}

impl<T> Debounce<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, value: T) -> DebounceTicket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(value);
        DebounceTicket(self.generation)
    }

    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.0 != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Coalesces redraw requests to at most one render per animation frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameGate {
    dirty: bool,
    scheduled: bool,
}

impl FrameGate {
    /// Mark the scene dirty. Returns `true` when the caller must request a frame.
    pub fn mark_dirty(&mut self) -> bool {
        self.dirty = true;
        if self.scheduled {
            return false;
        }
        self.scheduled = true;
        true
    }

    /// Called from the frame callback. Returns `true` when the frame should render.
    pub fn begin_frame(&mut self) -> bool {
        self.scheduled = false;
        std::mem::take(&mut self.dirty)
    }

    /// Frame request failed or was cancelled; allow the next `mark_dirty` to retry.
    pub fn abandon_frame(&mut self) {
        self.scheduled = false;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}
