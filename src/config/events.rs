//! Lifecycle listeners fired after a store loads or reloads.

use std::fmt;

use crate::config::store::ConfigStore;

/// Lifecycle point a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigEvent {
    /// Initial load finished.
    Loaded,
    /// A reload finished and replaced the store's contents.
    Reloaded,
}

/// Handle returned on registration, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Outcome of a listener callback. Failures are logged, never propagated.
pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Callback = Box<dyn Fn(ConfigEvent, &ConfigStore) -> ListenerResult + Send + Sync>;

/// Registered callbacks, fired in registration order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, ConfigEvent, Callback)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, event: ConfigEvent, callback: F) -> ListenerId
    where
        F: Fn(ConfigEvent, &ConfigStore) -> ListenerResult + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, event, Box::new(callback)));
        tracing::debug!(?event, "Config listener registered");
        id
    }

    /// Returns false when the id was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn fire(&self, event: ConfigEvent, store: &ConfigStore) {
        for (id, _, callback) in self.entries.iter().filter(|(_, e, _)| *e == event) {
            if let Err(e) = callback(event, store) {
                tracing::error!(?event, listener = id.0, error = %e, "Config listener failed");
            }
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
