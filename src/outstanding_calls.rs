//! # Outstanding-Call Registry
//!
//! Fixed-capacity table of in-flight requests. The table is guarded by a
//! single `parking_lot::Mutex`; every operation is a linear scan, which is
//! deliberate — `OUTSTANDING_CALLS` matches the scale MMS negotiates for
//! `max-serv-outstanding-calling` and a linear scan over ten slots is
//! cheaper and simpler than any indexed structure.

use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::MmsError;

/// Default outstanding-call capacity.
pub const OUTSTANDING_CALLS: usize = 10;

/// Identifies which service an outstanding call belongs to. `None` marks a
/// synchronous call whose completion path is the shared response slot
/// rather than a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    None,
    ReadVariable,
    ReadArrayElements,
    ReadMultipleVariables,
    ReadNvlValues,
    ReadNvlDirectory,
    DefineNvl,
    DeleteNvl,
    GetVariableAccessAttributes,
    GetNameList,
    Identify,
    Status,
    ReadJournal,
    WriteVariable,
    WriteArrayElements,
    WriteMultipleVariables,
    WriteNvl,
    FileOpen,
    FileRead,
    FileClose,
    FileRename,
    FileDelete,
    FileDirectory,
    ObtainFile,
    Conclude,
}

/// The decoded outcome handed to an async continuation: the raw response
/// buffer plus the offset at which the service-specific body starts, or the
/// mapped error (reject / service-error / timeout / connection-lost).
pub type CallResult = Result<(Bytes, usize), MmsError>;

/// A user continuation invoked on the transport reader thread exactly once,
/// strictly after the transmit for its invoke-id returned.
pub type AsyncContinuation = Box<dyn FnOnce(u32, CallResult) + Send>;

struct Slot {
    in_use: bool,
    invoke_id: u32,
    deadline_ms: u64,
    kind: CallKind,
    continuation: Option<AsyncContinuation>,
}

impl Slot {
    fn empty() -> Self {
        Slot {
            in_use: false,
            invoke_id: 0,
            deadline_ms: 0,
            kind: CallKind::None,
            continuation: None,
        }
    }
}

/// An expired call removed by [`OutstandingCallTable::sweep`].
pub struct ExpiredCall {
    pub invoke_id: u32,
    pub kind: CallKind,
    pub continuation: Option<AsyncContinuation>,
}

pub struct OutstandingCallTable {
    slots: Mutex<Vec<Slot>>,
}

impl OutstandingCallTable {
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(OUTSTANDING_CALLS);
        slots.resize_with(OUTSTANDING_CALLS, Slot::empty);
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Scans for the first free slot; on success sets `deadline = now +
    /// request_timeout`. Returns `false` when full.
    pub fn insert(
        &self,
        invoke_id: u32,
        kind: CallKind,
        continuation: Option<AsyncContinuation>,
        now_ms: u64,
        request_timeout_ms: u64,
    ) -> bool {
        let mut slots = self.slots.lock();
        for slot in slots.iter_mut() {
            if !slot.in_use {
                slot.in_use = true;
                slot.invoke_id = invoke_id;
                slot.deadline_ms = now_ms + request_timeout_ms;
                slot.kind = kind;
                slot.continuation = continuation;
                tracing::trace!(invoke_id, ?kind, "outstanding call inserted");
                return true;
            }
        }
        tracing::warn!(invoke_id, ?kind, "outstanding call table full");
        false
    }

    /// Returns the kind of the outstanding call for `invoke_id`, if any,
    /// without removing it.
    pub fn kind_of(&self, invoke_id: u32) -> Option<CallKind> {
        let slots = self.slots.lock();
        slots
            .iter()
            .find(|slot| slot.in_use && slot.invoke_id == invoke_id)
            .map(|slot| slot.kind)
    }

    /// Removes and returns the continuation for `invoke_id`, if present.
    /// The returned tuple's `CallKind` lets the caller decide whether to
    /// route through the shared response slot (`CallKind::None`) or invoke
    /// the continuation directly.
    pub fn take(&self, invoke_id: u32) -> Option<(CallKind, Option<AsyncContinuation>)> {
        let mut slots = self.slots.lock();
        for slot in slots.iter_mut() {
            if slot.in_use && slot.invoke_id == invoke_id {
                slot.in_use = false;
                let continuation = slot.continuation.take();
                tracing::trace!(invoke_id, kind = ?slot.kind, "outstanding call removed");
                return Some((slot.kind, continuation));
            }
        }
        None
    }

    /// First matching slot cleared; no-op if absent.
    pub fn remove(&self, invoke_id: u32) {
        let _ = self.take(invoke_id);
    }

    pub fn len(&self) -> usize {
        self.slots.lock().iter().filter(|s| s.in_use).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Called on `Tick`. Only the first expired slot, by lowest index, is
    /// swept per call — the sweeper runs on every tick, so bounded per-tick
    /// work is preferred over draining everything at once.
    pub fn sweep(&self, now_ms: u64) -> Option<ExpiredCall> {
        let mut slots = self.slots.lock();
        for slot in slots.iter_mut() {
            if slot.in_use && now_ms > slot.deadline_ms {
                slot.in_use = false;
                let invoke_id = slot.invoke_id;
                let kind = slot.kind;
                let continuation = slot.continuation.take();
                tracing::debug!(invoke_id, ?kind, "outstanding call timed out");
                return Some(ExpiredCall {
                    invoke_id,
                    kind,
                    continuation,
                });
            }
        }
        None
    }

    /// Clears every slot without invoking continuations — used when the
    /// transport reports loss and callers will separately observe
    /// `ConnectionLost` via their own completion paths.
    pub fn clear(&self) {
        let mut slots = self.slots.lock();
        for slot in slots.iter_mut() {
            *slot = Slot::empty();
        }
    }
}

impl Default for OutstandingCallTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_find_remove_roundtrip() {
        let table = OutstandingCallTable::new();
        assert!(table.insert(1, CallKind::ReadVariable, None, 0, 1000));
        assert_eq!(table.kind_of(1), Some(CallKind::ReadVariable));
        assert_eq!(table.len(), 1);
        let (kind, _) = table.take(1).unwrap();
        assert_eq!(kind, CallKind::ReadVariable);
        assert!(table.is_empty());
    }

    #[test]
    fn table_full_after_capacity_entries() {
        let table = OutstandingCallTable::new();
        for i in 1..=OUTSTANDING_CALLS as u32 {
            assert!(table.insert(i, CallKind::ReadVariable, None, 0, 1000));
        }
        assert!(!table.insert(OUTSTANDING_CALLS as u32 + 1, CallKind::ReadVariable, None, 0, 1000));
    }

    #[test]
    fn sweep_expires_only_first_and_invokes_continuation() {
        let table = OutstandingCallTable::new();
        let fired = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
        let fired2 = fired.clone();

        table.insert(
            1,
            CallKind::ReadVariable,
            Some(Box::new(move |id, _| {
                fired2.store(id, std::sync::atomic::Ordering::SeqCst);
            })),
            0,
            10,
        );
        table.insert(2, CallKind::ReadVariable, None, 0, 10);

        let expired = table.sweep(100).expect("one expired call");
        assert_eq!(expired.invoke_id, 1);
        if let Some(cont) = expired.continuation {
            cont(1, Err(MmsError::ServiceTimeout));
        }
        assert_eq!(fired.load(std::sync::atomic::Ordering::SeqCst), 1);

        // Only the first expired slot is swept per call.
        assert_eq!(table.len(), 1);
        let second = table.sweep(100).expect("second expired call");
        assert_eq!(second.invoke_id, 2);
        assert!(table.is_empty());
    }

    #[test]
    fn sweep_frees_sync_slot_without_continuation() {
        let table = OutstandingCallTable::new();
        table.insert(7, CallKind::None, None, 0, 10);
        let expired = table.sweep(100).unwrap();
        assert_eq!(expired.invoke_id, 7);
        assert!(expired.continuation.is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let table = OutstandingCallTable::new();
        table.remove(42);
        table.insert(42, CallKind::Identify, None, 0, 10);
        table.remove(42);
        table.remove(42);
        assert!(table.is_empty());
    }
}
