//! Wall-clock source for session timestamps.

use crate::types::TimestampMs;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

pub trait Clock: Send {
    fn now_millis(&self) -> TimestampMs;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> TimestampMs {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A settable clock. Clones share the same time, so a test can keep
/// one handle and hand another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: TimestampMs) -> Self {
        Self { now: Arc::new(AtomicI64::new(start)) }
    }

    pub fn set(&self, ts: TimestampMs) {
        self.now.store(ts, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> TimestampMs {
        self.now.load(Ordering::SeqCst)
    }
}
