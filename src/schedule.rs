use std::time::{Duration, Instant};

use tracing::trace;

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Coalesces redraw requests so that at most one recomputation runs per display tick.
///
/// Any number of parameter changes between two ticks produce a single pass, which reads
/// whatever configuration is current when it starts.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
    passes: u64,
}

impl RedrawScheduler {
    pub fn new() -> RedrawScheduler {
        RedrawScheduler::default()
    }

    /// Asks for a pass on the next tick. Returns false when one was already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            trace!("redraw coalesced");
            return false;
        }
        self.pending = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Runs `pass` if a redraw is pending, clearing the request.
    pub fn run_pending<T>(&mut self, pass: impl FnOnce() -> T) -> Option<T> {
        if !self.pending {
            return None;
        }
        let result = pass();
        self.pending = false;
        self.passes += 1;
        Some(result)
    }
}

/// Trailing-edge debounce: fires once, `delay` after the last trigger.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(RESIZE_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Debouncer {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once per burst of triggers, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
