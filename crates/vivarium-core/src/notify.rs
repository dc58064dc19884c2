//! Change notification with explicit subscribe/unsubscribe handles.
//!
//! A [`ChangeNotifier`] is a broadcast: [`notify`](ChangeNotifier::notify)
//! marks one pending change on every live [`Subscription`]. Subscribers
//! drain their own pending count with
//! [`take_pending`](ChangeNotifier::take_pending) at the start of their
//! next frame step, so every reaction runs synchronously on the frame
//! thread and before that frame's draw.
//!
//! Subscriptions are not `Clone`. Giving one back through
//! [`unsubscribe`](ChangeNotifier::unsubscribe) consumes it, which makes a
//! double unsubscribe impossible to write.

use std::cell::RefCell;

/// Handle for one live subscription.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a Subscription without unsubscribing leaks the slot"]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    /// Numeric id, unique per notifier.
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Default)]
struct NotifierState {
    next_id: u64,
    /// `(subscription id, pending change count)`, in subscription order.
    slots: Vec<(u64, u32)>,
}

/// Broadcast change notifier for single-threaded, frame-driven use.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    state: RefCell<NotifierState>,
}

impl ChangeNotifier {
    /// Create a notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. It starts with no pending changes.
    pub fn subscribe(&self) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.slots.push((id, 0));
        tracing::trace!(subscription = id, "subscribed to change notifications");
        Subscription { id }
    }

    /// Remove a subscriber. Returns `false` if it was not registered here.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.slots.len();
        state.slots.retain(|(id, _)| *id != subscription.id);
        let removed = state.slots.len() != before;
        tracing::trace!(subscription = subscription.id, removed, "unsubscribed");
        removed
    }

    /// Broadcast one change. Returns the number of subscribers notified.
    pub fn notify(&self) -> usize {
        let mut state = self.state.borrow_mut();
        for (_, pending) in state.slots.iter_mut() {
            *pending = pending.saturating_add(1);
        }
        state.slots.len()
    }

    /// Drain and return the pending change count for one subscriber.
    ///
    /// Returns 0 for a subscription that does not belong to this notifier.
    pub fn take_pending(&self, subscription: &Subscription) -> u32 {
        let mut state = self.state.borrow_mut();
        state
            .slots
            .iter_mut()
            .find(|(id, _)| *id == subscription.id)
            .map(|(_, pending)| std::mem::take(pending))
            .unwrap_or(0)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().slots.len()
    }
}
