mod engine;
mod events;

pub use engine::{Point, PointerEvent};
pub use events::{DragDirection, GestureEvent, GestureKind, GesturePhase, GestureValue, Side};

use slab::Slab;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::context::{Context, ContextHandle, Service};
use engine::{DragAxis, PointerTracker, Recognition};

type GestureListener = Arc<dyn Fn(&GestureEvent) + Send + Sync>;
type RawRecipient = Arc<dyn Fn(&PointerEvent) + Send + Sync>;

struct SubscriberEntry {
    kind: GestureKind,
    listener: GestureListener,
}

/// Classifies raw pointer samples into high-level gestures and multicasts
/// the result. Classification is mutually exclusive per press; subscribers
/// filter by kind, with `Side::Any` as a wildcard.
pub struct GestureService {
    ctx: ContextHandle,
    enabled: AtomicBool,
    tracker: Mutex<PointerTracker>,
    // the direction the in-flight drag was classified as; the end event
    // reuses it even if the viewport was resized mid-sequence
    active_drag: Mutex<Option<DragDirection>>,
    subscribers: Arc<Mutex<Slab<SubscriberEntry>>>,
    raw_recipients: Arc<Mutex<Slab<RawRecipient>>>,
}

impl Service for GestureService {
    fn init(ctx: &Context) -> Self {
        let settings = ctx.dependencies().settings.resolve();
        Self {
            ctx: ctx.handle(),
            enabled: AtomicBool::new(true),
            tracker: Mutex::new(PointerTracker::new(&settings)),
            active_drag: Mutex::new(None),
            subscribers: Arc::new(Mutex::new(Slab::new())),
            raw_recipients: Arc::new(Mutex::new(Slab::new())),
        }
    }
}

impl GestureService {
    /// Gate for the built-in recognizers. Disabling drops the in-flight
    /// recognition state; raw recipients are unaffected.
    pub fn set_enabled(&self, enabled: bool) {
        let was = self.enabled.swap(enabled, Ordering::SeqCst);
        if was && !enabled {
            if let Ok(mut tracker) = self.tracker.lock() {
                tracker.reset();
            }
            if let Ok(mut active) = self.active_drag.lock() {
                *active = None;
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Register a listener for events matching `kind`. Drop the returned
    /// subscription to unsubscribe.
    pub fn subscribe<F>(&self, kind: GestureKind, listener: F) -> GestureSubscription
    where
        F: Fn(&GestureEvent) + Send + Sync + 'static,
    {
        let key = match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.insert(SubscriberEntry {
                kind,
                listener: Arc::new(listener),
            }),
            Err(_) => {
                return GestureSubscription {
                    subscribers: Weak::new(),
                    key: 0,
                }
            }
        };
        GestureSubscription {
            subscribers: Arc::downgrade(&self.subscribers),
            key,
        }
    }

    /// Non-consuming tap into the raw sample stream, composed alongside the
    /// built-in recognizers and independent of the enabled flag.
    pub fn add_raw_recipient<F>(&self, recipient: F) -> RawSubscription
    where
        F: Fn(&PointerEvent) + Send + Sync + 'static,
    {
        let key = match self.raw_recipients.lock() {
            Ok(mut recipients) => recipients.insert(Arc::new(recipient)),
            Err(_) => {
                return RawSubscription {
                    recipients: Weak::new(),
                    key: 0,
                }
            }
        };
        RawSubscription {
            recipients: Arc::downgrade(&self.raw_recipients),
            key,
        }
    }

    /// Feed one raw sample from the host view layer.
    pub fn process(&self, event: PointerEvent) {
        let recipients: Vec<RawRecipient> = match self.raw_recipients.lock() {
            Ok(recipients) => recipients.iter().map(|(_, r)| r.clone()).collect(),
            Err(_) => Vec::new(),
        };
        for recipient in &recipients {
            recipient(&event);
        }
        if !self.is_enabled() {
            return;
        }
        let recognition = match self.tracker.lock() {
            Ok(mut tracker) => tracker.feed(event),
            Err(_) => None,
        };
        if let Some(recognition) = recognition {
            self.dispatch(recognition);
        }
    }

    /// Time pump for hold-based recognition.
    pub fn tick(&self, now_ms: u64) {
        if !self.is_enabled() {
            return;
        }
        let recognition = match self.tracker.lock() {
            Ok(mut tracker) => tracker.tick(now_ms),
            Err(_) => None,
        };
        if let Some(recognition) = recognition {
            self.dispatch(recognition);
        }
    }

    fn viewport_midline(&self) -> f32 {
        match self.ctx.try_context() {
            Some(ctx) => {
                ctx.dependencies()
                    .view_size
                    .resolve()
                    .view_size()
                    .width
                    / 2.0
            }
            None => 0.0,
        }
    }

    fn side_of(&self, x: f32) -> Side {
        if x < self.viewport_midline() {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn classify_drag(&self, axis: DragAxis, start: Point) -> DragDirection {
        match axis {
            DragAxis::Horizontal => DragDirection::Horizontal,
            DragAxis::Vertical => {
                if start.x < self.viewport_midline() {
                    DragDirection::VerticalLeft
                } else {
                    DragDirection::VerticalRight
                }
            }
        }
    }

    fn dispatch(&self, recognition: Recognition) {
        let event = match recognition {
            Recognition::Tap { pos } => GestureEvent {
                kind: GestureKind::Tap(self.side_of(pos.x)),
                phase: GesturePhase::End,
                value: GestureValue::Position(pos),
            },
            Recognition::DoubleTap { pos } => GestureEvent {
                kind: GestureKind::DoubleTap(self.side_of(pos.x)),
                phase: GesturePhase::End,
                value: GestureValue::Position(pos),
            },
            Recognition::LongPress { pos } => GestureEvent {
                kind: GestureKind::LongPress,
                phase: GesturePhase::End,
                value: GestureValue::Position(pos),
            },
            Recognition::DragStart { axis, start, dx, dy } => {
                let direction = self.classify_drag(axis, start);
                if let Ok(mut active) = self.active_drag.lock() {
                    *active = Some(direction);
                }
                GestureEvent {
                    kind: GestureKind::Drag(direction),
                    phase: GesturePhase::Start,
                    value: GestureValue::Translation { dx, dy },
                }
            }
            Recognition::DragEnd { axis, start, dx, dy } => {
                let stored = self
                    .active_drag
                    .lock()
                    .ok()
                    .and_then(|mut active| active.take());
                let direction = stored.unwrap_or_else(|| self.classify_drag(axis, start));
                GestureEvent {
                    kind: GestureKind::Drag(direction),
                    phase: GesturePhase::End,
                    value: GestureValue::Translation { dx, dy },
                }
            }
            Recognition::PinchStart { scale } => GestureEvent {
                kind: GestureKind::Pinch,
                phase: GesturePhase::Start,
                value: GestureValue::Scale(scale),
            },
            Recognition::PinchEnd { scale } => GestureEvent {
                kind: GestureKind::Pinch,
                phase: GesturePhase::End,
                value: GestureValue::Scale(scale),
            },
            Recognition::RotateStart { radians } => GestureEvent {
                kind: GestureKind::Rotate,
                phase: GesturePhase::Start,
                value: GestureValue::Angle(radians),
            },
            Recognition::RotateEnd { radians } => GestureEvent {
                kind: GestureKind::Rotate,
                phase: GesturePhase::End,
                value: GestureValue::Angle(radians),
            },
            Recognition::HoverStart => GestureEvent {
                kind: GestureKind::Hover,
                phase: GesturePhase::Start,
                value: GestureValue::None,
            },
            Recognition::HoverEnd => GestureEvent {
                kind: GestureKind::Hover,
                phase: GesturePhase::End,
                value: GestureValue::None,
            },
        };
        self.broadcast(&event);
    }

    fn broadcast(&self, event: &GestureEvent) {
        tracing::trace!(?event, "gesture");
        // listeners are cloned out so one of them may subscribe, unsubscribe
        // or feed more samples without deadlocking
        let listeners: Vec<GestureListener> = match self.subscribers.lock() {
            Ok(subscribers) => subscribers
                .iter()
                .filter(|(_, s)| s.kind.matches(event.kind))
                .map(|(_, s)| s.listener.clone())
                .collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(event);
        }
    }
}

/// Handle for a gesture subscription; drop to unsubscribe.
pub struct GestureSubscription {
    subscribers: Weak<Mutex<Slab<SubscriberEntry>>>,
    key: usize,
}

impl Drop for GestureSubscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            if let Ok(mut subscribers) = subscribers.lock() {
                subscribers.try_remove(self.key);
            }
        }
    }
}

/// Handle for a raw-recipient registration; drop to detach.
pub struct RawSubscription {
    recipients: Weak<Mutex<Slab<RawRecipient>>>,
    key: usize,
}

impl Drop for RawSubscription {
    fn drop(&mut self) {
        if let Some(recipients) = self.recipients.upgrade() {
            if let Ok(mut recipients) = recipients.lock() {
                recipients.try_remove(self.key);
            }
        }
    }
}
