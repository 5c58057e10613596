// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener registry for event dispatch.
//!
//! Listeners register either for every event (wildcard) or for specific
//! event type names. The registry keeps two explicit collections - an
//! ordered wildcard list and a by-type map of ordered lists - so no sentinel
//! key is needed. Registration is append-only for the lifetime of the
//! channel; insertion order is dispatch order.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::error;

/// Type alias for event listener callbacks.
///
/// Listeners receive the full `args` object of the event envelope.
type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Registry mapping event type names to ordered listener lists.
///
/// # Thread safety
///
/// The registry is fully thread-safe via `parking_lot::RwLock`; listeners
/// are wrapped in `Arc` so dispatch can run without holding the lock. A
/// listener that panics is isolated: the panic is caught and logged, and
/// subsequent listeners still run.
pub struct ListenerRegistry {
    /// Listeners receiving every event, in registration order.
    wildcard: RwLock<Vec<Listener>>,
    /// Listeners keyed by exact event type name, in registration order.
    by_type: RwLock<HashMap<String, Vec<Listener>>>,
}

impl ListenerRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wildcard: RwLock::new(Vec::new()),
            by_type: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a listener for every event.
    pub fn add_wildcard<F>(&self, listener: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.wildcard.write().push(Arc::new(listener));
    }

    /// Registers a listener for one or more exact event type names.
    ///
    /// The same callback is registered under each name.
    pub fn add_for_types<F>(&self, listener: F, event_types: &[&str])
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let mut by_type = self.by_type.write();
        for event_type in event_types {
            by_type
                .entry((*event_type).to_string())
                .or_default()
                .push(Arc::clone(&listener));
        }
    }

    /// Dispatches an event to all interested listeners.
    ///
    /// Wildcard listeners run first, then listeners registered for the exact
    /// `event_type`, each group in registration order. Every invocation is
    /// isolated: a panicking listener is logged and skipped, and later
    /// listeners still run.
    pub fn dispatch(&self, event_type: &str, args: &Value) {
        // Snapshot under the lock, invoke outside it, so listeners may
        // register further listeners without deadlocking.
        let mut listeners: Vec<Listener> = self.wildcard.read().iter().cloned().collect();
        if let Some(typed) = self.by_type.read().get(event_type) {
            listeners.extend(typed.iter().cloned());
        }

        for listener in listeners {
            let result = catch_unwind(AssertUnwindSafe(|| listener(args)));
            if result.is_err() {
                error!(event_type, "event listener panicked; continuing dispatch");
            }
        }
    }

    /// Returns the total number of registered listeners.
    ///
    /// A callback registered under several type names counts once per name.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.wildcard.read().len() + self.by_type.read().values().map(Vec::len).sum::<usize>()
    }

    /// Returns `true` if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}
