//! # Invoke-Id Allocator
//!
//! Monotonically increasing 32-bit counter under a lock, skipping 0.
//! Invoke-id 0 is reserved to mean "empty" in the shared response slot, so
//! the first value handed out is 1.

use parking_lot::Mutex;

pub struct InvokeIdAllocator {
    last: Mutex<u32>,
}

impl InvokeIdAllocator {
    pub fn new() -> Self {
        Self { last: Mutex::new(0) }
    }

    /// Returns the next invoke-id. Never returns 0.
    pub fn next(&self) -> u32 {
        let mut last = self.last.lock();
        *last = last.wrapping_add(1);
        if *last == 0 {
            // Wrap is practically impossible within a session's lifetime,
            // but never hand out the reserved "empty" value.
            *last = 1;
        }
        *last
    }
}

impl Default for InvokeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_at_one_and_increments() {
        let alloc = InvokeIdAllocator::new();
        assert_eq!(alloc.next(), 1);
        assert_eq!(alloc.next(), 2);
        assert_eq!(alloc.next(), 3);
    }

    #[test]
    fn never_returns_zero() {
        let alloc = InvokeIdAllocator::new();
        for _ in 0..10_000 {
            assert_ne!(alloc.next(), 0);
        }
    }

    #[test]
    fn unique_under_concurrent_callers() {
        let alloc = Arc::new(InvokeIdAllocator::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let alloc = Arc::clone(&alloc);
            handles.push(thread::spawn(move || {
                (0..500).map(|_| alloc.next()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(seen.insert(id), "invoke-id {id} handed out twice");
            }
        }
        assert_eq!(seen.len(), 8 * 500);
    }
}
