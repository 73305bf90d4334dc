//! Per-backend fixed-window rate limiter.
//!
//! The only process-wide mutable state in the crate. Counters live behind
//! one mutex-guarded map owned by the dispatcher; the single exposed
//! operation is the atomic check-and-increment, so no caller can observe a
//! raw counter and race another call past the quota.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;
use crate::models::Backend;

/// Time source, injectable so tests can advance the window.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Per-backend counter for the current window.
#[derive(Debug)]
struct RateLimitState {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window limiter over all backends.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    states: Mutex<HashMap<Backend, RateLimitState>>,
    clock: Box<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            states: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Atomically count one call against the backend's window and report
    /// whether it is allowed.
    ///
    /// Window semantics: the first call of a window (no state yet, or the
    /// window has elapsed) resets the counter to 1 and is always allowed;
    /// subsequent calls increment and are allowed while the count stays
    /// within the quota.
    pub fn check_and_increment(&self, backend: Backend) -> bool {
        let now = self.clock.now();
        let window = self.config.window();
        let quota = self.config.quota(backend);

        // A poisoned map only means another thread panicked mid-update of
        // a counter; the counters themselves remain usable.
        let mut states = self
            .states
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let fresh = RateLimitState {
            count: 1,
            reset_at: now + window,
        };
        match states.entry(backend) {
            Entry::Occupied(mut entry) if now < entry.get().reset_at => {
                let state = entry.get_mut();
                state.count += 1;
                state.count <= quota
            }
            Entry::Occupied(mut entry) => {
                entry.insert(fresh);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(fresh);
                true
            }
        }
    }

    /// Remaining calls in the backend's current window, for diagnostics
    /// (the CLI `backends` listing). Does not consume quota.
    pub fn remaining(&self, backend: Backend) -> u32 {
        let now = self.clock.now();
        let quota = self.config.quota(backend);
        let states = self
            .states
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match states.get(&backend) {
            Some(state) if now < state.reset_at => quota.saturating_sub(state.count),
            _ => quota,
        }
    }

    pub fn quota(&self, backend: Backend) -> u32 {
        self.config.quota(backend)
    }
}
