//! Deadline timer for the regulation cadence.
//!
//! The timer is polled from the main loop; it never blocks.  A disarmed
//! timer counts as already expired so the first poll after start-up (or
//! after re-authentication) fires immediately.
//!
//! ```text
//!   disarm() ──▶ [expired] ──poll──▶ fire ──arm(now)──▶ [pending until now+interval]
//! ```

/// Single repeating deadline, in milliseconds of a monotonic clock.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval_ms: u32,
    deadline: Option<u64>,
}

impl IntervalTimer {
    /// New timer, disarmed.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            deadline: None,
        }
    }

    /// `true` once `now_ms` has reached the deadline (or when disarmed).
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.deadline {
            None => true,
            Some(deadline) => now_ms >= deadline,
        }
    }

    /// Schedule the next expiry one interval after `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(u64::from(self.interval_ms)));
    }

    /// Forget the deadline; the next poll fires.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Fire-and-rearm in one step.  Returns `true` when the timer expired.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.is_expired(now_ms) {
            return false;
        }
        self.arm(now_ms);
        true
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }
}
