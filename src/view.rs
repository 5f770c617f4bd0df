use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Size of the composed surface in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewSize {
    pub width: f32,
    pub height: f32,
}

impl ViewSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Host-side source for the current surface size. The gesture layer reads it
/// at dispatch time to split taps and drags on the vertical midline.
pub trait ViewSizeProvider: Send + Sync {
    fn view_size(&self) -> ViewSize;
}

/// Provider that always reports the same size. Handy for hosts with a fixed
/// surface and for tests.
pub struct FixedViewSize(pub ViewSize);

impl ViewSizeProvider for FixedViewSize {
    fn view_size(&self) -> ViewSize {
        self.0
    }
}

/// Opaque view content handed through to the host's view system. The shell
/// never looks inside; `render` passes the host's surface back into the
/// closure.
#[derive(Clone)]
pub struct ViewFn(Arc<dyn Fn(&mut dyn Any) + Send + Sync>);

impl ViewFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Any) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn render(&self, surface: &mut dyn Any) {
        (self.0)(surface)
    }
}

impl fmt::Debug for ViewFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ViewFn")
    }
}

/// Declarative transition description carried through to the view system
/// untouched; the state machines never animate anything themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    None,
    Fade { duration_ms: u32 },
    Slide { duration_ms: u32 },
}

impl Default for Transition {
    fn default() -> Self {
        Transition::Fade { duration_ms: 250 }
    }
}

/// Where slot content sits inside its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    TopLeading,
    Top,
    TopTrailing,
    Leading,
    Center,
    Trailing,
    BottomLeading,
    Bottom,
    BottomTrailing,
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::Center
    }
}
