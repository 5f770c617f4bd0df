use std::sync::Arc;

use crate::context::{Context, ContextHandle, Service};
use crate::observer::{ChangeSubscription, ObserverSet};
use crate::render::{MediaPlayer, PlaybackStatus, RenderService};

/// Play/pause toggle for the control layer. Everything is derived from the
/// attached player: which action `toggle` takes from the current rate,
/// playing from rate > 0, clickability from the status.
pub struct PlaybackService {
    ctx: ContextHandle,
    observers: ObserverSet,
}

impl Service for PlaybackService {
    fn init(ctx: &Context) -> Self {
        Self {
            ctx: ctx.handle(),
            observers: ObserverSet::new(),
        }
    }
}

impl PlaybackService {
    fn player(&self) -> Option<Arc<dyn MediaPlayer>> {
        self.ctx
            .try_context()
            .and_then(|ctx| ctx.get::<RenderService>().player())
    }

    /// Rate 0 plays, anything else pauses.
    pub fn toggle(&self) {
        let Some(player) = self.player() else {
            tracing::debug!("toggle with no player attached");
            return;
        };
        if player.rate() == 0.0 {
            player.play();
        } else {
            player.pause();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.player().map(|p| p.rate() > 0.0).unwrap_or(false)
    }

    /// The toggle is interactive only while the player reports ready.
    pub fn is_clickable(&self) -> bool {
        self.player()
            .map(|p| p.status() == PlaybackStatus::Ready)
            .unwrap_or(false)
    }

    pub(crate) fn notify_rate_changed(&self) {
        self.observers.notify();
    }

    pub(crate) fn notify_status_changed(&self) {
        self.observers.notify();
    }

    pub fn subscribe_changes<F>(&self, listener: F) -> ChangeSubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observers.subscribe(listener)
    }
}
