use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::context::{Context, ContextHandle, Service};
use crate::gestures::{GestureKind, GestureService, GestureSubscription, Side};
use crate::observer::{ChangeSubscription, ObserverSet};
use crate::presentation::{schedule_after_hook, LifecycleHooks};
use crate::view::{Transition, ViewFn};

/// Edge of the surface a feature panel attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// How the panel shares space with the main content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureStyle {
    /// Overlap the main content.
    Cover,
    /// Shrink the main content, keeping `gap` points between them.
    Squeeze { gap: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeaturePlacement {
    pub edge: FeatureEdge,
    pub style: FeatureStyle,
}

impl FeaturePlacement {
    pub fn cover(edge: FeatureEdge) -> Self {
        Self {
            edge,
            style: FeatureStyle::Cover,
        }
    }

    pub fn squeeze(edge: FeatureEdge, gap: f32) -> Self {
        Self {
            edge,
            style: FeatureStyle::Squeeze { gap },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeaturePanel {
    pub placement: FeaturePlacement,
    pub content: ViewFn,
    pub hooks: LifecycleHooks,
}

struct FeatureState {
    slot: Mutex<Option<(FeaturePanel, Transition)>>,
    observers: ObserverSet,
    dismiss_on_tap: AtomicBool,
    dismiss_on_status_changed: AtomicBool,
}

/// Single-slot directional panel presenter. At most one panel per container;
/// presenting over a live panel replaces it without firing the outgoing
/// panel's dismiss hooks.
pub struct FeatureService {
    ctx: ContextHandle,
    state: Arc<FeatureState>,
    _tap_subscription: GestureSubscription,
}

impl Service for FeatureService {
    fn init(ctx: &Context) -> Self {
        let settings = ctx.dependencies().settings.resolve();
        let state = Arc::new(FeatureState {
            slot: Mutex::new(None),
            observers: ObserverSet::new(),
            dismiss_on_tap: AtomicBool::new(settings.dismiss_on_tap),
            dismiss_on_status_changed: AtomicBool::new(settings.dismiss_on_status_changed),
        });
        let handle = ctx.handle();
        let tap_subscription = {
            let state = state.clone();
            let handle = handle.clone();
            ctx.get::<GestureService>()
                .subscribe(GestureKind::Tap(Side::Any), move |_| {
                    if state.dismiss_on_tap.load(Ordering::SeqCst) {
                        dismiss_slot(&state, &handle);
                    }
                })
        };
        Self {
            ctx: handle,
            state,
            _tap_subscription: tap_subscription,
        }
    }
}

impl FeatureService {
    /// Present `panel`, replacing whatever is currently shown. The replaced
    /// panel's dismiss hooks do not fire; only an explicit `dismiss` does
    /// that.
    pub fn present(&self, panel: FeaturePanel, transition: Transition) {
        if let Some(before) = panel.hooks.before_present.clone() {
            before();
        }
        let after = panel.hooks.after_present.clone();
        if let Ok(mut slot) = self.state.slot.lock() {
            *slot = Some((panel, transition));
        }
        tracing::debug!("feature panel presented");
        self.state.observers.notify();
        schedule_after_hook(&self.ctx, after);
    }

    /// Dismiss the current panel, if any.
    pub fn dismiss(&self) {
        dismiss_slot(&self.state, &self.ctx);
    }

    pub fn current(&self) -> Option<(FeaturePanel, Transition)> {
        self.state.slot.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn is_presenting(&self) -> bool {
        self.state
            .slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    pub fn dismiss_on_tap(&self) -> bool {
        self.state.dismiss_on_tap.load(Ordering::SeqCst)
    }

    pub fn set_dismiss_on_tap(&self, enabled: bool) {
        self.state.dismiss_on_tap.store(enabled, Ordering::SeqCst);
    }

    pub fn dismiss_on_status_changed(&self) -> bool {
        self.state.dismiss_on_status_changed.load(Ordering::SeqCst)
    }

    pub fn set_dismiss_on_status_changed(&self, enabled: bool) {
        self.state
            .dismiss_on_status_changed
            .store(enabled, Ordering::SeqCst);
    }

    /// External "status changed" signal; dismisses the current panel when
    /// `dismiss_on_status_changed` is set. The render service forwards the
    /// attached player's status hook here.
    pub fn notify_status_changed(&self) {
        if self.state.dismiss_on_status_changed.load(Ordering::SeqCst) {
            dismiss_slot(&self.state, &self.ctx);
        }
    }

    pub fn subscribe_changes<F>(&self, listener: F) -> ChangeSubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.observers.subscribe(listener)
    }
}

fn dismiss_slot(state: &FeatureState, ctx: &ContextHandle) {
    let hooks = {
        let slot = match state.slot.lock() {
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
    if let Ok(mut slot) = state.slot.lock() {
        *slot = None;
    }
    tracing::debug!("feature panel dismissed");
    state.observers.notify();
    schedule_after_hook(ctx, hooks.after_dismiss);
}
