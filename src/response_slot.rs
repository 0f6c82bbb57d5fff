//! # Shared Response Slot
//!
//! A single-slot mailbox used to hand a synchronous call's response from
//! the demultiplexer (running on the transport reader thread) to the
//! blocked caller. Only one unread response may occupy the slot at a time;
//! the demultiplexer drains (busy-waits for) an empty slot before storing a
//! new one, and the waiting caller both consumes and releases it.

use bytes::Bytes;
use parking_lot::Mutex;

use crate::clock::{poll_interval, Clock};
use crate::error::MmsError;

struct Contents {
    invoke_id: u32,
    response: Option<Bytes>,
    body_offset: usize,
    error: Option<MmsError>,
}

impl Contents {
    fn empty() -> Self {
        Contents {
            invoke_id: 0,
            response: None,
            body_offset: 0,
            error: None,
        }
    }
}

pub struct SharedResponseSlot {
    inner: Mutex<Contents>,
}

impl SharedResponseSlot {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Contents::empty()),
        }
    }

    /// `response_invoke_id == 0` means empty.
    pub fn current_invoke_id(&self) -> u32 {
        self.inner.lock().invoke_id
    }

    /// Busy-waits until the slot is empty, then stores a successful
    /// response. Called by the demultiplexer; the drain step is the
    /// mailbox's back-pressure against overwriting an unread result.
    pub fn store_success(&self, clock: &dyn Clock, invoke_id: u32, response: Bytes, body_offset: usize) {
        self.drain(clock);
        let mut contents = self.inner.lock();
        contents.invoke_id = invoke_id;
        contents.response = Some(response);
        contents.body_offset = body_offset;
        contents.error = None;
    }

    /// Same as [`Self::store_success`] but for a reject/confirmed-error
    /// outcome: no payload, just the mapped error.
    pub fn store_error(&self, clock: &dyn Clock, invoke_id: u32, error: MmsError) {
        self.drain(clock);
        let mut contents = self.inner.lock();
        contents.invoke_id = invoke_id;
        contents.response = None;
        contents.body_offset = 0;
        contents.error = Some(error);
    }

    fn drain(&self, clock: &dyn Clock) {
        while self.current_invoke_id() != 0 {
            clock.sleep(poll_interval::RESPONSE_SLOT_DRAIN);
        }
    }

    /// If the slot currently holds `invoke_id`, removes and returns its
    /// contents, releasing the slot for the next response. Returns `None`
    /// if the slot is empty or holds a different invoke-id.
    pub fn take_if(&self, invoke_id: u32) -> Option<Result<(Bytes, usize), MmsError>> {
        let mut contents = self.inner.lock();
        if contents.invoke_id != invoke_id {
            return None;
        }
        contents.invoke_id = 0;
        let result = match contents.error.take() {
            Some(err) => Err(err),
            None => {
                let response = contents.response.take().unwrap_or_default();
                Ok((response, contents.body_offset))
            }
        };
        contents.response = None;
        contents.body_offset = 0;
        Some(result)
    }
}

impl Default for SharedResponseSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;

    #[test]
    fn empty_slot_yields_nothing() {
        let slot = SharedResponseSlot::new();
        assert_eq!(slot.current_invoke_id(), 0);
        assert!(slot.take_if(1).is_none());
    }

    #[test]
    fn store_and_take_success() {
        let clock = SystemClock::new();
        let slot = SharedResponseSlot::new();
        slot.store_success(&clock, 5, Bytes::from_static(b"hello"), 2);
        assert_eq!(slot.current_invoke_id(), 5);
        // Wrong invoke-id does not drain the slot.
        assert!(slot.take_if(6).is_none());
        assert_eq!(slot.current_invoke_id(), 5);

        let (bytes, offset) = slot.take_if(5).unwrap().unwrap();
        assert_eq!(&bytes[..], b"hello");
        assert_eq!(offset, 2);
        assert_eq!(slot.current_invoke_id(), 0);
    }

    #[test]
    fn store_and_take_error() {
        let clock = SystemClock::new();
        let slot = SharedResponseSlot::new();
        slot.store_error(&clock, 9, MmsError::ServiceTimeout);
        let outcome = slot.take_if(9).unwrap();
        assert!(matches!(outcome, Err(MmsError::ServiceTimeout)));
        assert_eq!(slot.current_invoke_id(), 0);
    }

    #[test]
    fn second_store_waits_for_drain() {
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        let clock = Arc::new(SystemClock::new());
        let slot = Arc::new(SharedResponseSlot::new());
        slot.store_success(clock.as_ref(), 1, Bytes::from_static(b"first"), 0);

        let slot2 = Arc::clone(&slot);
        let clock2 = Arc::clone(&clock);
        let writer = thread::spawn(move || {
            // This call must block until the first response is consumed.
            slot2.store_success(clock2.as_ref(), 2, Bytes::from_static(b"second"), 0);
        });

        thread::sleep(Duration::from_millis(20));
        assert_eq!(slot.current_invoke_id(), 1, "second store must not overwrite unread slot");

        let (bytes, _) = slot.take_if(1).unwrap().unwrap();
        assert_eq!(&bytes[..], b"first");

        writer.join().unwrap();
        assert_eq!(slot.current_invoke_id(), 2);
    }
}
