use crate::constants::FIRST_REQUEST_ID;
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing request id source.
///
/// Each dispatcher owns one, so ids are unique per connection and never
/// reused for the dispatcher's lifetime.
#[derive(Debug)]
pub struct RequestIdCounter {
    next: AtomicU64,
}

impl Default for RequestIdCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestIdCounter {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(FIRST_REQUEST_ID),
        }
    }

    /// Reserves the next id.
    #[inline]
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the id that the next call to `next_id` will hand out.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
