use std::sync::{Arc, Mutex};

use crate::context::{Context, ContextHandle, Service};
use crate::observer::{ChangeSubscription, ObserverSet};
use crate::presentation::{schedule_after_hook, LifecycleHooks};
use crate::view::{Alignment, Transition, ViewFn};

/// Host-extension content shown on the plugin layer.
#[derive(Debug, Clone)]
pub struct PluginPanel {
    pub alignment: Alignment,
    pub content: ViewFn,
    pub hooks: LifecycleHooks,
}

struct PluginState {
    slot: Mutex<Option<(PluginPanel, Transition)>>,
    observers: ObserverSet,
}

/// Single-slot presenter for the plugin layer. Same replace semantics as the
/// feature panel: presenting over a live panel skips its dismiss hooks.
pub struct PluginOverlayService {
    ctx: ContextHandle,
    state: Arc<PluginState>,
}

impl Service for PluginOverlayService {
    fn init(ctx: &Context) -> Self {
        Self {
            ctx: ctx.handle(),
            state: Arc::new(PluginState {
                slot: Mutex::new(None),
                observers: ObserverSet::new(),
            }),
        }
    }
}

impl PluginOverlayService {
    pub fn present(&self, panel: PluginPanel, transition: Transition) {
        if let Some(before) = panel.hooks.before_present.clone() {
            before();
        }
        let after = panel.hooks.after_present.clone();
        if let Ok(mut slot) = self.state.slot.lock() {
            *slot = Some((panel, transition));
        }
        tracing::debug!("plugin panel presented");
        self.state.observers.notify();
        schedule_after_hook(&self.ctx, after);
    }

    pub fn dismiss(&self) {
        let hooks = {
            let slot = match self.state.slot.lock() {
                Ok(slot) => slot,
                Err(_) => return,
            };
            match slot.as_ref() {
                Some((panel, _)) => panel.hooks.clone(),
                None => return,
            }
        };
        if let Some(before) = hooks.before_dismiss {
            before();
        }
        if let Ok(mut slot) = self.state.slot.lock() {
            *slot = None;
        }
        tracing::debug!("plugin panel dismissed");
        self.state.observers.notify();
        schedule_after_hook(&self.ctx, hooks.after_dismiss);
    }

    pub fn current(&self) -> Option<(PluginPanel, Transition)> {
        self.state.slot.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn is_presenting(&self) -> bool {
        self.state
            .slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    pub fn subscribe_changes<F>(&self, listener: F) -> ChangeSubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.observers.subscribe(listener)
    }
}
