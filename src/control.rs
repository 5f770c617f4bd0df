use std::sync::{Arc, Mutex};

use crate::context::{Context, Service};
use crate::observer::{ChangeSubscription, ObserverSet};
use crate::view::ViewFn;

struct ControlState {
    content: Mutex<Option<ViewFn>>,
    observers: ObserverSet,
}

/// Content slot for the control layer (transport bar and friends). Unlike
/// the presentation slots this is plain settable content with no lifecycle
/// hooks.
pub struct ControlService {
    state: Arc<ControlState>,
}

impl Service for ControlService {
    fn init(_ctx: &Context) -> Self {
        Self {
            state: Arc::new(ControlState {
                content: Mutex::new(None),
                observers: ObserverSet::new(),
            }),
        }
    }
}

impl ControlService {
    pub fn set_content(&self, content: ViewFn) {
        if let Ok(mut slot) = self.state.content.lock() {
            *slot = Some(content);
        }
        self.state.observers.notify();
    }

    pub fn clear_content(&self) {
        let had = match self.state.content.lock() {
            Ok(mut slot) => slot.take().is_some(),
            Err(_) => false,
        };
        if had {
            self.state.observers.notify();
        }
    }

    pub fn content(&self) -> Option<ViewFn> {
        self.state.content.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn subscribe_changes<F>(&self, listener: F) -> ChangeSubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.observers.subscribe(listener)
    }
}
