// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single recomposition trigger.
//!
//! Every footprint-owning entity reports its changes here instead of
//! holding listeners of its own. The trigger keeps a dirty flag and a change
//! counter, and forwards each change to its subscribers.

use ground3d_core::ModelChange;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

/// Handle returned by [`RecomposeTrigger::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(ModelChange, u64) + Send + Sync>;

/// Dirty flag plus subscriptions shared by the whole model
#[derive(Default)]
pub struct RecomposeTrigger {
    dirty: AtomicBool,
    changes: AtomicU64,
    next_subscription: AtomicU64,
    subscribers: Mutex<FxHashMap<SubscriptionId, Subscriber>>,
}

impl RecomposeTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change and inform every subscriber.
    ///
    /// Returns the change number. Appearance-only changes are forwarded but
    /// don't mark the geometry dirty.
    pub fn notify(&self, change: ModelChange) -> u64 {
        let number = self.changes.fetch_add(1, Ordering::AcqRel) + 1;
        if change.affects_geometry() {
            self.dirty.store(true, Ordering::Release);
        }
        trace!(?change, number, "Model change");

        // Call subscribers outside the lock so they may subscribe or notify
        let subscribers: Vec<Subscriber> = self.lock_subscribers().values().cloned().collect();
        for subscriber in subscribers {
            subscriber(change, number);
        }
        number
    }

    /// Whether geometry changed since the last [`RecomposeTrigger::take_dirty`]
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clear the dirty flag, returning the current change number if it was set
    pub fn take_dirty(&self) -> Option<u64> {
        if self.dirty.swap(false, Ordering::AcqRel) {
            Some(self.changes.load(Ordering::Acquire))
        } else {
            None
        }
    }

    /// Number of changes notified so far
    #[inline]
    pub fn change_count(&self) -> u64 {
        self.changes.load(Ordering::Acquire)
    }

    pub fn subscribe(&self, subscriber: impl Fn(ModelChange, u64) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_subscribers().insert(id, Arc::new(subscriber));
        id
    }

    /// Remove a subscriber, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_subscribers().remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, FxHashMap<SubscriptionId, Subscriber>> {
        // A panicking subscriber never runs under this lock
        self.subscribers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for RecomposeTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecomposeTrigger")
            .field("dirty", &self.is_dirty())
            .field("changes", &self.change_count())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
