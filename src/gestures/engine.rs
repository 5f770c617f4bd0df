use crate::settings::Settings;

/// Position in surface points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<(f32, f32)> for Point {
    fn from(value: (f32, f32)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

/// Raw pointer/touch sample fed by the host view layer. Pinch and rotate
/// arrive pre-aggregated because two-finger tracking belongs to the
/// platform; hover is driven by enter/exit notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Point, at_ms: u64 },
    Moved { pos: Point, at_ms: u64 },
    Up { pos: Point, at_ms: u64 },
    PinchChanged { scale: f32 },
    PinchEnded { scale: f32 },
    RotateChanged { radians: f32 },
    RotateEnded { radians: f32 },
    HoverEntered,
    HoverExited,
}

/// Axis of a drag before the vertical side is resolved against the midline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragAxis {
    Horizontal,
    Vertical,
}

/// What one sample was recognized as, before side assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Recognition {
    Tap { pos: Point },
    DoubleTap { pos: Point },
    DragStart { axis: DragAxis, start: Point, dx: f32, dy: f32 },
    DragEnd { axis: DragAxis, start: Point, dx: f32, dy: f32 },
    LongPress { pos: Point },
    PinchStart { scale: f32 },
    PinchEnd { scale: f32 },
    RotateStart { radians: f32 },
    RotateEnd { radians: f32 },
    HoverStart,
    HoverEnd,
}

#[derive(Debug, Clone, Copy)]
struct PressState {
    start: Point,
    at_ms: u64,
    long_press_fired: bool,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    axis: DragAxis,
    start: Point,
}

#[derive(Debug, Clone, Copy)]
struct TapState {
    pos: Point,
    at_ms: u64,
}

/// Single-pass recognizer over a raw sample stream. One press yields at most
/// one of tap, double tap, long press, or a drag start/end pair; pinch,
/// rotate and hover are tracked independently.
#[derive(Debug)]
pub(crate) struct PointerTracker {
    drag_slop: f32,
    double_tap_window_ms: u64,
    double_tap_slop: f32,
    long_press_hold_ms: u64,
    press: Option<PressState>,
    drag: Option<DragState>,
    last_tap: Option<TapState>,
    pinch_active: bool,
    rotate_active: bool,
    hovering: bool,
}

impl PointerTracker {
    pub fn new(settings: &Settings) -> Self {
        Self {
            drag_slop: settings.drag_slop,
            double_tap_window_ms: settings.double_tap_window_ms,
            double_tap_slop: settings.double_tap_slop,
            long_press_hold_ms: settings.long_press_hold_ms,
            press: None,
            drag: None,
            last_tap: None,
            pinch_active: false,
            rotate_active: false,
            hovering: false,
        }
    }

    /// Feed one raw sample; returns at most one recognition.
    pub fn feed(&mut self, event: PointerEvent) -> Option<Recognition> {
        match event {
            PointerEvent::Down { pos, at_ms } => {
                self.press = Some(PressState {
                    start: pos,
                    at_ms,
                    long_press_fired: false,
                });
                self.drag = None;
                None
            }
            PointerEvent::Moved { pos, at_ms } => self.on_moved(pos, at_ms),
            PointerEvent::Up { pos, at_ms } => self.on_up(pos, at_ms),
            PointerEvent::PinchChanged { scale } => {
                if self.pinch_active {
                    None
                } else {
                    self.pinch_active = true;
                    Some(Recognition::PinchStart { scale })
                }
            }
            PointerEvent::PinchEnded { scale } => {
                if std::mem::take(&mut self.pinch_active) {
                    Some(Recognition::PinchEnd { scale })
                } else {
                    None
                }
            }
            PointerEvent::RotateChanged { radians } => {
                if self.rotate_active {
                    None
                } else {
                    self.rotate_active = true;
                    Some(Recognition::RotateStart { radians })
                }
            }
            PointerEvent::RotateEnded { radians } => {
                if std::mem::take(&mut self.rotate_active) {
                    Some(Recognition::RotateEnd { radians })
                } else {
                    None
                }
            }
            PointerEvent::HoverEntered => {
                if self.hovering {
                    None
                } else {
                    self.hovering = true;
                    Some(Recognition::HoverStart)
                }
            }
            PointerEvent::HoverExited => {
                if std::mem::take(&mut self.hovering) {
                    Some(Recognition::HoverEnd)
                } else {
                    None
                }
            }
        }
    }

    /// Time pump: fires a pending long press once the hold elapses without
    /// the pointer clearing the slop.
    pub fn tick(&mut self, now_ms: u64) -> Option<Recognition> {
        self.fire_long_press_if_due(now_ms)
    }

    pub fn reset(&mut self) {
        self.press = None;
        self.drag = None;
        self.last_tap = None;
        self.pinch_active = false;
        self.rotate_active = false;
        self.hovering = false;
    }

    fn on_moved(&mut self, pos: Point, at_ms: u64) -> Option<Recognition> {
        let press = self.press?;
        if self.drag.is_some() {
            // classification is sticky; interior samples emit nothing
            return None;
        }
        let dx = pos.x - press.start.x;
        let dy = pos.y - press.start.y;
        if dx * dx + dy * dy < self.drag_slop * self.drag_slop {
            return self.fire_long_press_if_due(at_ms);
        }
        if press.long_press_fired {
            // the long press consumed this press; ignore the remainder
            return None;
        }
        let axis = if dx.abs() > dy.abs() {
            DragAxis::Horizontal
        } else {
            DragAxis::Vertical
        };
        self.drag = Some(DragState {
            axis,
            start: press.start,
        });
        self.last_tap = None;
        Some(Recognition::DragStart {
            axis,
            start: press.start,
            dx,
            dy,
        })
    }

    fn on_up(&mut self, pos: Point, at_ms: u64) -> Option<Recognition> {
        let press = self.press.take()?;
        if let Some(drag) = self.drag.take() {
            return Some(Recognition::DragEnd {
                axis: drag.axis,
                start: drag.start,
                dx: pos.x - drag.start.x,
                dy: pos.y - drag.start.y,
            });
        }
        if press.long_press_fired {
            return None;
        }
        if at_ms.saturating_sub(press.at_ms) >= self.long_press_hold_ms {
            return Some(Recognition::LongPress { pos: press.start });
        }
        if let Some(last) = self.last_tap.take() {
            let near = (pos.x - last.pos.x).abs() <= self.double_tap_slop
                && (pos.y - last.pos.y).abs() <= self.double_tap_slop;
            if near && at_ms.saturating_sub(last.at_ms) <= self.double_tap_window_ms {
                return Some(Recognition::DoubleTap { pos });
            }
        }
        self.last_tap = Some(TapState { pos, at_ms });
        Some(Recognition::Tap { pos })
    }

    fn fire_long_press_if_due(&mut self, now_ms: u64) -> Option<Recognition> {
        if self.drag.is_some() {
            return None;
        }
        let press = self.press.as_mut()?;
        if press.long_press_fired {
            return None;
        }
        if now_ms.saturating_sub(press.at_ms) < self.long_press_hold_ms {
            return None;
        }
        press.long_press_fired = true;
        Some(Recognition::LongPress { pos: press.start })
    }
}
