use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::context::{Context, ContextHandle, Service};
use crate::control::ControlService;
use crate::feature::{FeaturePanel, FeatureService};
use crate::observer::{ChangeSubscription, ObserverSet};
use crate::plugin::{PluginOverlayService, PluginPanel};
use crate::render::RenderService;
use crate::toast::{Toast, ToastService};
use crate::view::{Transition, ViewFn};

/// The five composited regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayLayer {
    Render,
    Feature,
    Plugin,
    Control,
    Toast,
}

impl OverlayLayer {
    /// Fixed compositing order, bottom to top.
    pub const ORDER: [OverlayLayer; 5] = [
        OverlayLayer::Render,
        OverlayLayer::Feature,
        OverlayLayer::Plugin,
        OverlayLayer::Control,
        OverlayLayer::Toast,
    ];
}

/// One slice of a composed frame, in z-order. Slot layers only appear while
/// something is presented; render and control always appear when enabled,
/// with or without content.
#[derive(Debug, Clone)]
pub enum OverlayEntry {
    Render {
        content: Option<ViewFn>,
    },
    Feature {
        panel: FeaturePanel,
        transition: Transition,
    },
    Plugin {
        panel: PluginPanel,
        transition: Transition,
    },
    Control {
        content: Option<ViewFn>,
    },
    Toast {
        toast: Toast,
        transition: Transition,
    },
    /// Host-injected view composed directly after its layer.
    Extension {
        layer: OverlayLayer,
        content: ViewFn,
    },
}

#[derive(Debug, Clone, Default)]
pub struct OverlayFrame {
    pub entries: Vec<OverlayEntry>,
}

struct OverlayState {
    enabled: Mutex<HashSet<OverlayLayer>>,
    extensions: Mutex<HashMap<OverlayLayer, ViewFn>>,
    observers: ObserverSet,
}

/// Arranges the overlay layers into frames and funnels every layer
/// service's change stream into one "frame invalidated" notification.
pub struct OverlayService {
    ctx: ContextHandle,
    state: Arc<OverlayState>,
    _subscriptions: Vec<ChangeSubscription>,
}

impl Service for OverlayService {
    fn init(ctx: &Context) -> Self {
        let settings = ctx.dependencies().settings.resolve();
        let enabled: HashSet<OverlayLayer> = match &settings.enabled_overlays {
            Some(layers) => layers.iter().copied().collect(),
            None => OverlayLayer::ORDER.iter().copied().collect(),
        };
        let state = Arc::new(OverlayState {
            enabled: Mutex::new(enabled),
            extensions: Mutex::new(HashMap::new()),
            observers: ObserverSet::new(),
        });
        let forward = |state: &Arc<OverlayState>| {
            let state = state.clone();
            move || state.observers.notify()
        };
        let subscriptions = vec![
            ctx.get::<RenderService>().subscribe_changes(forward(&state)),
            ctx.get::<FeatureService>().subscribe_changes(forward(&state)),
            ctx.get::<PluginOverlayService>()
                .subscribe_changes(forward(&state)),
            ctx.get::<ControlService>().subscribe_changes(forward(&state)),
            ctx.get::<ToastService>().subscribe_changes(forward(&state)),
        ];
        Self {
            ctx: ctx.handle(),
            state,
            _subscriptions: subscriptions,
        }
    }
}

impl OverlayService {
    /// Build the current frame, bottom to top. Disabled layers are omitted
    /// regardless of their services' state.
    pub fn compose(&self) -> OverlayFrame {
        let Some(ctx) = self.ctx.try_context() else {
            return OverlayFrame::default();
        };
        let enabled = match self.state.enabled.lock() {
            Ok(enabled) => enabled.clone(),
            Err(_) => return OverlayFrame::default(),
        };
        let extensions = match self.state.extensions.lock() {
            Ok(extensions) => extensions.clone(),
            Err(_) => HashMap::new(),
        };
        let mut entries = Vec::new();
        for layer in OverlayLayer::ORDER {
            if !enabled.contains(&layer) {
                continue;
            }
            match layer {
                OverlayLayer::Render => entries.push(OverlayEntry::Render {
                    content: ctx.get::<RenderService>().surface(),
                }),
                OverlayLayer::Feature => {
                    if let Some((panel, transition)) = ctx.get::<FeatureService>().current() {
                        entries.push(OverlayEntry::Feature { panel, transition });
                    }
                }
                OverlayLayer::Plugin => {
                    if let Some((panel, transition)) =
                        ctx.get::<PluginOverlayService>().current()
                    {
                        entries.push(OverlayEntry::Plugin { panel, transition });
                    }
                }
                OverlayLayer::Control => entries.push(OverlayEntry::Control {
                    content: ctx.get::<ControlService>().content(),
                }),
                OverlayLayer::Toast => {
                    if let Some((toast, transition)) = ctx.get::<ToastService>().current() {
                        entries.push(OverlayEntry::Toast { toast, transition });
                    }
                }
            }
            if let Some(content) = extensions.get(&layer) {
                entries.push(OverlayEntry::Extension {
                    layer,
                    content: content.clone(),
                });
            }
        }
        OverlayFrame { entries }
    }

    pub fn set_enabled_layers<I>(&self, layers: I)
    where
        I: IntoIterator<Item = OverlayLayer>,
    {
        if let Ok(mut enabled) = self.state.enabled.lock() {
            *enabled = layers.into_iter().collect();
        }
        self.state.observers.notify();
    }

    pub fn set_layer_enabled(&self, layer: OverlayLayer, on: bool) {
        let changed = match self.state.enabled.lock() {
            Ok(mut enabled) => {
                if on {
                    enabled.insert(layer)
                } else {
                    enabled.remove(&layer)
                }
            }
            Err(_) => false,
        };
        if changed {
            self.state.observers.notify();
        }
    }

    pub fn is_layer_enabled(&self, layer: OverlayLayer) -> bool {
        self.state
            .enabled
            .lock()
            .map(|enabled| enabled.contains(&layer))
            .unwrap_or(false)
    }

    /// Inject a view composed directly after `layer`. One extension per
    /// layer; setting again replaces it.
    pub fn set_extension(&self, layer: OverlayLayer, content: ViewFn) {
        if let Ok(mut extensions) = self.state.extensions.lock() {
            extensions.insert(layer, content);
        }
        self.state.observers.notify();
    }

    pub fn clear_extension(&self, layer: OverlayLayer) {
        let had = match self.state.extensions.lock() {
            Ok(mut extensions) => extensions.remove(&layer).is_some(),
            Err(_) => false,
        };
        if had {
            self.state.observers.notify();
        }
    }

    /// A single invalidation stream: fires when any layer's service state or
    /// this service's own configuration changes.
    pub fn subscribe_changes<F>(&self, listener: F) -> ChangeSubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.observers.subscribe(listener)
    }
}
