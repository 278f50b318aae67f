/// Quiescence tracker for coalescing persistence writes.
///
/// Every successful mutation marks the board dirty and pushes the write
/// deadline one debounce window out, so a burst of rapid mutations produces
/// one write after activity settles instead of one write per mutation.
/// Purely `Instant`-based; the host drives it from its event loop (or the
/// `run_autosave` interval task).
use std::time::{Duration, Instant};

/// Matches the teacher application's write-coalescing window.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct SaveDebouncer {
    window: Duration,
    /// Earliest point a pending write may fire. None when clean.
    deadline: Option<Instant>,
}

impl SaveDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None }
    }

    /// A write is pending (marked dirty, not yet taken).
    pub fn is_dirty(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record mutation activity: arm the deadline, or push it out if one is
    /// already armed.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// If a pending write has quiesced past its deadline, consume it and
    /// report true. The caller performs the actual save; on failure it
    /// re-arms via `mark_dirty` so the write is retried.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume any pending write regardless of the deadline (explicit
    /// flush, e.g. shutdown).
    pub fn take_pending(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Disarm without writing. Used on reset so a stale pending snapshot
    /// cannot overwrite the cleared slot.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for SaveDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}
