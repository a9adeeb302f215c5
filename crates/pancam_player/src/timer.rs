// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cancellable one-shot timers driven by injected time.

use std::time::Duration;

/// Generation number of an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// A one-shot timer. Re-arming replaces the pending deadline.
#[derive(Debug, Clone)]
pub struct OneShotTimer {
    pending: Option<(TimerToken, Duration)>,
    next_generation: u64,
}

impl OneShotTimer {
    /// Create a disarmed timer
    pub fn new() -> Self {
        Self {
            pending: None,
            next_generation: 1,
        }
    }

    /// Arm the timer to fire `delay` after `now`
    pub fn arm(&mut self, now: Duration, delay: Duration) -> TimerToken {
        let token = TimerToken(self.next_generation);
        self.next_generation += 1;
        self.pending = Some((token, now + delay));
        token
    }

    /// Disarm the timer, returning the token that will no longer fire
    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.pending.take().map(|(token, _)| token)
    }

    /// Whether a deadline is pending
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Pending deadline, if any
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Fire the timer if its deadline has passed
    pub fn poll(&mut self, now: Duration) -> Option<TimerToken> {
        match self.pending {
            Some((token, deadline)) if deadline <= now => {
                self.pending = None;
                Some(token)
            }
            _ => None,
        }
    }

    /// Fire the timer from an external callback carrying `token`.
    ///
    /// Returns false for a stale token from a cancelled or replaced arm.
    pub fn expire(&mut self, token: TimerToken) -> bool {
        match self.pending {
            Some((current, _)) if current == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for OneShotTimer {
    fn default() -> Self {
        Self::new()
    }
}
