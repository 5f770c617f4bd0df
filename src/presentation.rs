use std::fmt;
use std::sync::Arc;

use crate::context::ContextHandle;
use crate::scheduler::{Scheduler, SETTLE_DELAY};

type Hook = Arc<dyn Fn() + Send + Sync>;

/// Hooks around a slot transition. `before_*` run synchronously with the
/// state change; `after_*` fire once the settle delay elapses. Scheduled
/// hooks are never cancelled, so they still fire if the slot has moved on by
/// then.
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    pub before_present: Option<Hook>,
    pub after_present: Option<Hook>,
    pub before_dismiss: Option<Hook>,
    pub after_dismiss: Option<Hook>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_before_present<F: Fn() + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.before_present = Some(Arc::new(f));
        self
    }

    pub fn on_after_present<F: Fn() + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.after_present = Some(Arc::new(f));
        self
    }

    pub fn on_before_dismiss<F: Fn() + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.before_dismiss = Some(Arc::new(f));
        self
    }

    pub fn on_after_dismiss<F: Fn() + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.after_dismiss = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("before_present", &self.before_present.is_some())
            .field("after_present", &self.after_present.is_some())
            .field("before_dismiss", &self.before_dismiss.is_some())
            .field("after_dismiss", &self.after_dismiss.is_some())
            .finish()
    }
}

/// Queue an `after_*` hook on the container's scheduler. A torn-down
/// container silently drops the hook.
pub(crate) fn schedule_after_hook(ctx: &ContextHandle, hook: Option<Hook>) {
    let Some(hook) = hook else { return };
    let Some(ctx) = ctx.try_context() else { return };
    ctx.get::<Scheduler>()
        .schedule_after(SETTLE_DELAY, move || hook());
}
