use once_cell::sync::Lazy;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::sync::Arc;

use crate::settings::Settings;
use crate::view::{ViewSize, ViewSizeProvider};

type Factory<T> = Box<dyn Fn() -> T + Send>;

/// One lazily-materialized external dependency. The bound factory runs on
/// first `resolve` and the value is cached; `override_with` swaps the cached
/// value immediately. References handed out earlier keep whatever value they
/// saw.
pub struct DepSlot<T: Clone + Send + 'static> {
    state: ReentrantMutex<RefCell<SlotState<T>>>,
}

struct SlotState<T> {
    value: Option<T>,
    factory: Factory<T>,
}

impl<T: Clone + Send + 'static> DepSlot<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + 'static,
    {
        Self {
            state: ReentrantMutex::new(RefCell::new(SlotState {
                value: None,
                factory: Box::new(factory),
            })),
        }
    }

    /// Cached value, materializing it on first call. A factory may resolve
    /// other slots; the reentrant lock keeps same-thread chains from
    /// deadlocking.
    pub fn resolve(&self) -> T {
        let guard = self.state.lock();
        let cached = guard.borrow().value.clone();
        if let Some(value) = cached {
            return value;
        }
        let value = {
            let state = guard.borrow();
            (state.factory)()
        };
        guard.borrow_mut().value = Some(value.clone());
        value
    }

    /// Replace the cached value by running `factory` now. Subsequent
    /// `resolve` calls see the new value.
    pub fn override_with<F>(&self, factory: F)
    where
        F: Fn() -> T + Send + 'static,
    {
        let guard = self.state.lock();
        let value = factory();
        let mut state = guard.borrow_mut();
        state.value = Some(value);
        state.factory = Box::new(factory);
    }
}

/// Size provider for a container that was never attached to a live surface.
/// Zero width puts every pointer position on the right of the midline, so
/// the shell degrades to "nothing special" rather than erroring.
struct DetachedSurface;

impl ViewSizeProvider for DetachedSurface {
    fn view_size(&self) -> ViewSize {
        ViewSize::default()
    }
}

static DETACHED: Lazy<Arc<dyn ViewSizeProvider>> = Lazy::new(|| Arc::new(DetachedSurface));

/// Named external-dependency bundle handed to the container at construction.
/// Test scopes override individual slots instead of reaching for globals.
pub struct Dependencies {
    /// Current size of the composed surface; read by the gesture layer at
    /// dispatch time.
    pub view_size: DepSlot<Arc<dyn ViewSizeProvider>>,
    /// Shell settings. Defaults unless the host loads a file and overrides.
    pub settings: DepSlot<Arc<Settings>>,
}

impl Default for Dependencies {
    fn default() -> Self {
        Self {
            view_size: DepSlot::new(|| DETACHED.clone()),
            settings: DepSlot::new(|| Arc::new(Settings::default())),
        }
    }
}

impl Dependencies {
    pub fn with_view_size(self, provider: Arc<dyn ViewSizeProvider>) -> Self {
        self.view_size.override_with(move || provider.clone());
        self
    }

    pub fn with_settings(self, settings: Settings) -> Self {
        let settings = Arc::new(settings);
        self.settings.override_with(move || settings.clone());
        self
    }
}
