use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::context::{Context, ContextHandle, Service};
use crate::observer::{ChangeSubscription, ObserverSet};
use crate::presentation::{schedule_after_hook, LifecycleHooks};
use crate::scheduler::Scheduler;
use crate::view::{Alignment, Transition, ViewFn};

pub const TOAST_LOG_FILE: &str = "toast.log";

#[derive(Debug, Clone)]
pub struct Toast {
    pub label: String,
    pub alignment: Alignment,
    pub content: ViewFn,
    pub hooks: LifecycleHooks,
    /// Seconds before the toast dismisses itself. `None` uses the
    /// `toast_duration` setting.
    pub duration: Option<f32>,
}

struct ToastState {
    slot: Mutex<Option<(Toast, Transition)>>,
    observers: ObserverSet,
    // bumped on every present/dismiss so a replaced toast's expiry timer
    // cannot take down its successor
    generation: AtomicU64,
}

/// Single-slot toast presenter. Toasts expire on their own after the
/// configured duration; everything else follows the feature-panel slot
/// semantics.
pub struct ToastService {
    ctx: ContextHandle,
    state: Arc<ToastState>,
}

impl Service for ToastService {
    fn init(ctx: &Context) -> Self {
        Self {
            ctx: ctx.handle(),
            state: Arc::new(ToastState {
                slot: Mutex::new(None),
                observers: ObserverSet::new(),
                generation: AtomicU64::new(0),
            }),
        }
    }
}

impl ToastService {
    pub fn present(&self, toast: Toast, transition: Transition) {
        if let Some(before) = toast.hooks.before_present.clone() {
            before();
        }
        let after = toast.hooks.after_present.clone();
        let label = toast.label.clone();
        let duration = toast.duration;
        if let Ok(mut slot) = self.state.slot.lock() {
            *slot = Some((toast, transition));
        }
        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(%label, "toast presented");
        self.state.observers.notify();
        schedule_after_hook(&self.ctx, after);
        self.schedule_expiry(generation, duration);
        self.log_if_enabled(&label);
    }

    pub fn dismiss(&self) {
        self.state.generation.fetch_add(1, Ordering::SeqCst);
        dismiss_slot(&self.state, &self.ctx);
    }

    pub fn current(&self) -> Option<(Toast, Transition)> {
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

    fn schedule_expiry(&self, generation: u64, duration: Option<f32>) {
        let Some(ctx) = self.ctx.try_context() else { return };
        let seconds = duration.unwrap_or_else(|| {
            ctx.dependencies().settings.resolve().toast_duration
        });
        if seconds <= 0.0 {
            return;
        }
        let state = self.state.clone();
        let handle = self.ctx.clone();
        ctx.get::<Scheduler>()
            .schedule_after(Duration::from_secs_f32(seconds), move || {
                if state.generation.load(Ordering::SeqCst) == generation {
                    dismiss_slot(&state, &handle);
                }
            });
    }

    fn log_if_enabled(&self, label: &str) {
        let Some(ctx) = self.ctx.try_context() else { return };
        if !ctx.dependencies().settings.resolve().toast_log {
            return;
        }
        if let Err(err) = append_toast_log(label) {
            tracing::warn!(%err, "failed to append toast log");
        }
    }
}

fn dismiss_slot(state: &ToastState, ctx: &ContextHandle) {
    let hooks = {
        let slot = match state.slot.lock() {
            Ok(slot) => slot,
            Err(_) => return,
        };
        match slot.as_ref() {
            Some((toast, _)) => toast.hooks.clone(),
            None => return,
        }
    };
    if let Some(before) = hooks.before_dismiss {
        before();
    }
    if let Ok(mut slot) = state.slot.lock() {
        *slot = None;
    }
    tracing::debug!("toast dismissed");
    state.observers.notify();
    schedule_after_hook(ctx, hooks.after_dismiss);
}

fn append_toast_log(label: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(TOAST_LOG_FILE)?;
    writeln!(file, "{} - {}", Local::now().to_rfc3339(), label)?;
    Ok(())
}
