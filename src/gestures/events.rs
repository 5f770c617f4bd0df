use super::engine::Point;

/// Which half of the surface an event landed in. `Any` is only meaningful in
/// subscriptions; dispatched events always carry a concrete side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Any,
}

impl Side {
    /// Wildcard-aware equality: `Any` accepts either side.
    pub fn accepts(self, other: Side) -> bool {
        matches!(self, Side::Any) || matches!(other, Side::Any) || self == other
    }
}

/// Direction a drag sequence was classified as on its first sample. Vertical
/// drags keep the side of their starting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDirection {
    Horizontal,
    VerticalLeft,
    VerticalRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Tap(Side),
    DoubleTap(Side),
    Drag(DragDirection),
    LongPress,
    Rotate,
    Pinch,
    Hover,
}

impl GestureKind {
    /// Subscription matching: exact kind equality, except that a tap or
    /// double-tap side of `Any` matches either concrete side.
    pub fn matches(self, event: GestureKind) -> bool {
        match (self, event) {
            (GestureKind::Tap(a), GestureKind::Tap(b)) => a.accepts(b),
            (GestureKind::DoubleTap(a), GestureKind::DoubleTap(b)) => a.accepts(b),
            _ => self == event,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    End,
}

/// Raw payload attached to a classified event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureValue {
    None,
    Position(Point),
    Translation { dx: f32, dy: f32 },
    Scale(f32),
    Angle(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub phase: GesturePhase,
    pub value: GestureValue,
}
