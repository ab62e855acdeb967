//! Drives how often the control loop lets the indexer take a step between
//! requests.
//!
//! Subscribers register interest in frequent (hi) ticks; as long as at
//! least one is registered, hi-idle fires on its short interval. Once
//! nobody is subscribed, the loop falls back to the much slower lo-idle
//! heartbeat instead of spinning. The scheduler is only ever polled
//! between requests — never while one is being handled.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleFire {
    None,
    Hi,
    Lo,
}

pub struct IdleScheduler {
    next_id: u64,
    subscribers: VecDeque<u64>,
    hi_interval: Duration,
    lo_interval: Duration,
    last_hi: Instant,
    last_lo: Instant,
}

impl IdleScheduler {
    pub fn new() -> Self {
        Self::with_intervals(Duration::from_millis(50), Duration::from_secs(1))
    }

    pub fn with_intervals(hi_interval: Duration, lo_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            next_id: 0,
            subscribers: VecDeque::new(),
            hi_interval,
            lo_interval,
            last_hi: now - hi_interval,
            last_lo: now - lo_interval,
        }
    }

    /// Register interest in hi-idle ticks, FIFO. Returns a token to
    /// unsubscribe with later.
    pub fn subscribe(&mut self) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push_back(id);
        SubscriberId(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|&x| x != id.0);
    }

    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.is_empty()
    }

    /// Decide what idle work should run right now, advancing internal
    /// timers when it fires. Call only between requests.
    pub fn poll(&mut self, now: Instant) -> IdleFire {
        if self.has_subscribers() {
            if now.duration_since(self.last_hi) >= self.hi_interval {
                self.last_hi = now;
                return IdleFire::Hi;
            }
            return IdleFire::None;
        }

        if now.duration_since(self.last_lo) >= self.lo_interval {
            self.last_lo = now;
            return IdleFire::Lo;
        }

        IdleFire::None
    }
}

impl Default for IdleScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "idle_tests.rs"]
mod tests;
