//! # Session State Machines
//!
//! Association, connection, and conclude each get an independent state
//! variable guarded by its own mutex — state locks are leaf locks, with no
//! other lock held while inside. The C original duplicates the same
//! get/set-under-semaphore pair three times
//! (`setAssociationState`/`getAssociationState`,
//! `setConnectionState`/`getConnectionState`, `setConcludeState`/
//! `getConcludeState`); this is the natural Rust generalization of that
//! pattern, not a behavior change.

use parking_lot::Mutex;

/// A small `Copy` state value guarded by a dedicated leaf lock.
pub struct Guarded<T: Copy> {
    value: Mutex<T>,
}

impl<T: Copy> Guarded<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(initial),
        }
    }

    pub fn get(&self) -> T {
        *self.value.lock()
    }

    pub fn set(&self, new_value: T) {
        *self.value.lock() = new_value;
    }
}

/// Association state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationState {
    Closed,
    Connected,
}

/// Connection (initiate handshake) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Waiting,
    Associated,
    AssociationFailed,
}

/// Conclude state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcludeState {
    Idle,
    Requested,
    Accepted,
    Rejected,
}

pub type AssociationGuard = Guarded<AssociationState>;
pub type ConnectionGuard = Guarded<ConnectionState>;
pub type ConcludeGuard = Guarded<ConcludeState>;

impl Default for AssociationGuard {
    fn default() -> Self {
        Guarded::new(AssociationState::Closed)
    }
}

impl Default for ConnectionGuard {
    fn default() -> Self {
        Guarded::new(ConnectionState::Idle)
    }
}

impl Default for ConcludeGuard {
    fn default() -> Self {
        Guarded::new(ConcludeState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_states() {
        assert_eq!(AssociationGuard::default().get(), AssociationState::Closed);
        assert_eq!(ConnectionGuard::default().get(), ConnectionState::Idle);
        assert_eq!(ConcludeGuard::default().get(), ConcludeState::Idle);
    }

    #[test]
    fn set_then_get_roundtrips() {
        let g = AssociationGuard::default();
        g.set(AssociationState::Connected);
        assert_eq!(g.get(), AssociationState::Connected);
    }
}
