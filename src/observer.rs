use slab::Slab;
use std::sync::{Arc, Mutex, Weak};

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Multicast list of change listeners backed by a slab arena. Stateful
/// services expose one of these so the compositor (or the host) can react to
/// explicit change notifications instead of polling.
#[derive(Default)]
pub struct ObserverSet {
    listeners: Arc<Mutex<Slab<Listener>>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Dropping the returned subscription removes it.
    pub fn subscribe<F>(&self, listener: F) -> ChangeSubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = match self.listeners.lock() {
            Ok(mut listeners) => listeners.insert(Arc::new(listener)),
            Err(_) => return ChangeSubscription::detached(),
        };
        ChangeSubscription {
            listeners: Arc::downgrade(&self.listeners),
            key,
        }
    }

    /// Invoke every registered listener. The list is cloned out first so a
    /// listener may subscribe or unsubscribe while being notified.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, l)| l.clone()).collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for a change-listener registration; drop to unsubscribe.
pub struct ChangeSubscription {
    listeners: Weak<Mutex<Slab<Listener>>>,
    key: usize,
}

impl ChangeSubscription {
    fn detached() -> Self {
        Self {
            listeners: Weak::new(),
            key: 0,
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut listeners) = listeners.lock() {
                listeners.try_remove(self.key);
            }
        }
    }
}
