//! Latest-wins hand-off channel
//!
//! A single-slot queue between one producer and any number of consumers.
//! Sending overwrites whatever has not been read yet, so a consumer always
//! observes the freshest value and never a backlog.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::error::TrafficLightError;

/// Slot contents guarded by the channel mutex
#[derive(Debug)]
struct Slot<T> {
    /// The pending value, if one has been sent and not yet received
    value: Option<T>,
    /// Set once by `close`, never cleared
    closed: bool,
}

/// A thread-safe single-slot channel with blocking receive
#[derive(Debug)]
pub struct PhaseChannel<T> {
    slot: Mutex<Slot<T>>,
    available: Condvar,
}

impl<T> Default for PhaseChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PhaseChannel<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                value: None,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// A poisoned slot still holds a consistent value, so keep using it
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace any unread value with `value` and wake one receiver.
    ///
    /// Never blocks. Values sent after `close` are dropped.
    pub fn send(&self, value: T) {
        let mut slot = self.lock();
        if slot.closed {
            return;
        }
        slot.value = Some(value);
        self.available.notify_one();
    }

    /// Block until a value is available and take it.
    ///
    /// Returns `TrafficLightError::Stopped` once the channel is closed and
    /// the last pending value has been taken.
    pub fn receive(&self) -> Result<T, TrafficLightError> {
        let slot = self.lock();
        let mut slot = self
            .available
            .wait_while(slot, |slot| slot.value.is_none() && !slot.closed)
            .unwrap_or_else(PoisonError::into_inner);
        slot.value.take().ok_or(TrafficLightError::Stopped)
    }

    /// Like `receive`, but gives up after `timeout` and returns `Ok(None)`
    pub fn receive_timeout(&self, timeout: Duration) -> Result<Option<T>, TrafficLightError> {
        let slot = self.lock();
        let (mut slot, _) = self
            .available
            .wait_timeout_while(slot, timeout, |slot| slot.value.is_none() && !slot.closed)
            .unwrap_or_else(PoisonError::into_inner);
        match slot.value.take() {
            Some(value) => Ok(Some(value)),
            None if slot.closed => Err(TrafficLightError::Stopped),
            None => Ok(None),
        }
    }

    /// Take the pending value without waiting
    pub fn try_receive(&self) -> Option<T> {
        self.lock().value.take()
    }

    /// Close the channel and wake every blocked receiver
    pub fn close(&self) {
        let mut slot = self.lock();
        slot.closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}
