// Pulse counter for one wheel encoder
//
// The count is atomic so pulse events may be recorded from a different task
// than the control tick. Every read is a single load, so a count is never torn.

use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct EncoderChannel {
    pulses: AtomicI64,
}

impl EncoderChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signed pulse delta (negative when the wheel turns backwards)
    pub fn record(&self, delta: i64) {
        self.pulses.fetch_add(delta, Ordering::AcqRel);
    }

    pub fn count(&self) -> i64 {
        self.pulses.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.pulses.store(0, Ordering::Release);
    }
}
