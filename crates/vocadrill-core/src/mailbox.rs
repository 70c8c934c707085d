//! Single-slot flash-message mailbox.
//!
//! The handoff between "submit finished" and "show the outcome somewhere
//! else": one slot, last write wins, and a read clears it so a message is
//! shown at most once.

use std::sync::Mutex;

use crate::model::Notification;

#[derive(Debug, Default)]
pub struct FlashMailbox {
    slot: Mutex<Option<Notification>>,
}

impl FlashMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a message, replacing whatever is currently in the slot.
    pub fn post(&self, notification: Notification) {
        *self.slot.lock().unwrap() = Some(notification);
    }

    /// Take the pending message, clearing the slot.
    pub fn take(&self) -> Option<Notification> {
        self.slot.lock().unwrap().take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().unwrap().is_none()
    }
}
