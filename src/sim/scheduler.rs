//! Display-refresh scheduling handles
//!
//! Every self-rescheduling loop (charge, flight, death animation, camera pan,
//! prop rebound) holds a [`FrameHandle`] while it runs. The loop cancels its
//! handle on its own terminating condition, and its owner cancels it on
//! interruption. A handle still live after its owner stopped is a leak.

/// Identifies one scheduled loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u32);

/// Tracks which loops are currently scheduled against the refresh signal
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    next_id: u32,
    /// Live handles, sorted by id
    live: Vec<FrameHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a new loop
    pub fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.live.push(handle);
        log::trace!("Scheduled loop {}", handle.0);
        handle
    }

    /// Cancel a loop; returns false if it was not live
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        match self.live.iter().position(|h| *h == handle) {
            Some(i) => {
                self.live.remove(i);
                log::trace!("Cancelled loop {}", handle.0);
                true
            }
            None => false,
        }
    }

    /// Cancel through an owner's slot, clearing it
    pub fn cancel_slot(&mut self, slot: &mut Option<FrameHandle>) -> bool {
        slot.take().is_some_and(|h| self.cancel(h))
    }

    pub fn is_live(&self, handle: FrameHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Drop every live loop (session reset)
    pub fn cancel_all(&mut self) {
        if !self.live.is_empty() {
            log::debug!("Cancelling {} live loops", self.live.len());
        }
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_cancel() {
        let mut sched = FrameScheduler::new();
        let a = sched.request();
        let b = sched.request();
        assert_ne!(a, b);
        assert_eq!(sched.live_count(), 2);

        assert!(sched.cancel(a));
        assert!(!sched.is_live(a));
        assert!(sched.is_live(b));
        // Double cancel is harmless
        assert!(!sched.cancel(a));
        assert_eq!(sched.live_count(), 1);
    }

    #[test]
    fn test_cancel_slot_clears() {
        let mut sched = FrameScheduler::new();
        let mut slot = Some(sched.request());
        assert!(sched.cancel_slot(&mut slot));
        assert!(slot.is_none());
        assert!(!sched.cancel_slot(&mut slot));
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_handles_never_reused() {
        let mut sched = FrameScheduler::new();
        let a = sched.request();
        sched.cancel(a);
        let b = sched.request();
        assert_ne!(a, b);
    }
}
