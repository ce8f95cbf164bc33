//! # Valid-Message Store
//!
//! Bounded FIFO of accepted orders kept for display. Each `add` appends and
//! then evicts at most one entry from the front.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::constants::stores::VALID_MESSAGE_CAPACITY;
use crate::models::ValidMessage;

#[derive(Debug)]
pub struct ValidMessageStore {
    messages: RwLock<Arc<VecDeque<ValidMessage>>>,
    capacity: usize,
}

impl Default for ValidMessageStore {
    fn default() -> Self {
        Self::new(VALID_MESSAGE_CAPACITY)
    }
}

impl ValidMessageStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: RwLock::new(Arc::new(VecDeque::with_capacity(capacity.saturating_add(1)))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn add(&self, message: ValidMessage) {
        let mut guard = self.messages.write();
        let messages = Arc::make_mut(&mut *guard);
        messages.push_back(message);
        if messages.len() > self.capacity {
            messages.pop_front();
        }
    }

    /// Owned copy of the retained messages, oldest first
    pub fn all(&self) -> Vec<ValidMessage> {
        let snapshot = Arc::clone(&*self.messages.read());
        snapshot.iter().cloned().collect()
    }

    pub fn clear(&self) -> usize {
        let mut guard = self.messages.write();
        let removed = guard.len();
        *guard = Arc::new(VecDeque::new());
        removed
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
