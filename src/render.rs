use std::sync::{Arc, Mutex};

use crate::context::{Context, ContextHandle, Service};
use crate::feature::FeatureService;
use crate::observer::{ChangeSubscription, ObserverSet};
use crate::playback::PlaybackService;
use crate::view::ViewFn;

/// Readiness of the attached media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Unknown,
    Ready,
    Failed,
}

pub type RateObserver = Arc<dyn Fn(f32) + Send + Sync>;
pub type StatusObserver = Arc<dyn Fn(PlaybackStatus) + Send + Sync>;

/// Boundary to the underlying decode/render engine. The shell drives
/// playback and observes rate/status; frames never pass through here.
///
/// The observer slots are single-valued and mutable: attaching a player to a
/// container re-binds both, and detaching clears them.
pub trait MediaPlayer: Send + Sync {
    fn play(&self);
    fn pause(&self);
    fn rate(&self) -> f32;
    fn status(&self) -> PlaybackStatus;
    fn set_rate_observer(&self, observer: Option<RateObserver>);
    fn set_status_observer(&self, observer: Option<StatusObserver>);
}

struct RenderState {
    player: Mutex<Option<Arc<dyn MediaPlayer>>>,
    surface: Mutex<Option<ViewFn>>,
    observers: ObserverSet,
}

/// Owns the attached player and the render-surface content shown on the
/// render layer.
pub struct RenderService {
    ctx: ContextHandle,
    state: Arc<RenderState>,
}

impl Service for RenderService {
    fn init(ctx: &Context) -> Self {
        Self {
            ctx: ctx.handle(),
            state: Arc::new(RenderState {
                player: Mutex::new(None),
                surface: Mutex::new(None),
                observers: ObserverSet::new(),
            }),
        }
    }
}

impl RenderService {
    /// Attach (or swap in) a player. Ownership transfers immediately and the
    /// observation hooks re-bind synchronously; nothing waits for in-flight
    /// operations on the previous instance.
    pub fn attach(&self, player: Arc<dyn MediaPlayer>) {
        let previous = match self.state.player.lock() {
            Ok(mut slot) => slot.replace(player.clone()),
            Err(_) => None,
        };
        if let Some(previous) = previous {
            previous.set_rate_observer(None);
            previous.set_status_observer(None);
        }
        let handle = self.ctx.clone();
        player.set_rate_observer(Some(Arc::new(move |rate| {
            if let Some(ctx) = handle.try_context() {
                tracing::trace!(rate, "player rate changed");
                if let Some(playback) = ctx.try_get::<PlaybackService>() {
                    playback.notify_rate_changed();
                }
            }
        })));
        let handle = self.ctx.clone();
        player.set_status_observer(Some(Arc::new(move |status| {
            if let Some(ctx) = handle.try_context() {
                tracing::debug!(?status, "player status changed");
                if let Some(features) = ctx.try_get::<FeatureService>() {
                    features.notify_status_changed();
                }
                if let Some(playback) = ctx.try_get::<PlaybackService>() {
                    playback.notify_status_changed();
                }
            }
        })));
        tracing::debug!("media player attached");
        self.state.observers.notify();
    }

    /// Detach the current player, clearing its observer hooks.
    pub fn detach(&self) -> Option<Arc<dyn MediaPlayer>> {
        let previous = match self.state.player.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(previous) = &previous {
            previous.set_rate_observer(None);
            previous.set_status_observer(None);
            self.state.observers.notify();
        }
        previous
    }

    pub fn player(&self) -> Option<Arc<dyn MediaPlayer>> {
        self.state.player.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn set_surface(&self, content: ViewFn) {
        if let Ok(mut slot) = self.state.surface.lock() {
            *slot = Some(content);
        }
        self.state.observers.notify();
    }

    pub fn surface(&self) -> Option<ViewFn> {
        self.state.surface.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn subscribe_changes<F>(&self, listener: F) -> ChangeSubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.observers.subscribe(listener)
    }
}
