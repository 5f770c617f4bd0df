mod dependencies;

pub use dependencies::{DepSlot, Dependencies};

use parking_lot::ReentrantMutex;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// A container-owned singleton unit of UI-adjacent logic. Constructed lazily
/// on first lookup; `init` receives the container and may look up other
/// services, including transitively.
pub trait Service: Any + Send + Sync + Sized {
    fn init(ctx: &Context) -> Self;
}

type ServiceMap = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

struct ContextInner {
    // ReentrantMutex over a RefCell: cross-thread construction is
    // serialized, while a constructor chain on one thread can re-enter the
    // registry without deadlocking. The RefCell borrow is never held across
    // an `init` call.
    services: ReentrantMutex<RefCell<ServiceMap>>,
    dependencies: Dependencies,
}

/// Per-session service container. Cloning yields another handle to the same
/// registry; all services die when the last clone is dropped.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Dependencies::default())
    }
}

impl Context {
    pub fn new(dependencies: Dependencies) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                services: ReentrantMutex::new(RefCell::new(HashMap::new())),
                dependencies,
            }),
        }
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.inner.dependencies
    }

    /// The singleton instance for `S`, constructing it on first access.
    pub fn get<S: Service>(&self) -> Arc<S> {
        let guard = self.inner.services.lock();
        let existing = guard.borrow().get(&TypeId::of::<S>()).cloned();
        if let Some(existing) = existing {
            return downcast_slot(existing);
        }
        tracing::debug!(service = std::any::type_name::<S>(), "constructing service");
        let service = Arc::new(S::init(self));
        guard
            .borrow_mut()
            .insert(TypeId::of::<S>(), service.clone());
        service
    }

    /// Lookup without constructing.
    pub fn try_get<S: Service>(&self) -> Option<Arc<S>> {
        let guard = self.inner.services.lock();
        let existing = guard.borrow().get(&TypeId::of::<S>()).cloned();
        existing.map(downcast_slot)
    }

    /// Remove the instance for `S`. Returns whether one existed. Dependents
    /// holding an `Arc` keep the stopped instance alive; stopping does not
    /// cascade.
    pub fn stop<S: Service>(&self) -> bool {
        let guard = self.inner.services.lock();
        let removed = guard.borrow_mut().remove(&TypeId::of::<S>());
        if removed.is_some() {
            tracing::debug!(service = std::any::type_name::<S>(), "service stopped");
        }
        removed.is_some()
    }

    /// Non-owning back-reference for services. Valid only while the
    /// container lives.
    pub fn handle(&self) -> ContextHandle {
        ContextHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

fn downcast_slot<S: Service>(slot: Arc<dyn Any + Send + Sync>) -> Arc<S> {
    // The registry is keyed by TypeId, so a mismatch here means the map
    // itself is corrupt. Fail fast.
    match slot.downcast::<S>() {
        Ok(service) => service,
        Err(_) => panic!(
            "service registry slot for {} holds a different type",
            std::any::type_name::<S>()
        ),
    }
}

/// Weak handle from a service back to its container. The container owns its
/// services; a service never keeps the container alive.
#[derive(Clone)]
pub struct ContextHandle {
    inner: Weak<ContextInner>,
}

impl ContextHandle {
    /// The owning container. Panics once the container has been torn down;
    /// holding a handle past teardown is a usage error.
    pub fn context(&self) -> Context {
        match self.try_context() {
            Some(ctx) => ctx,
            None => panic!("context handle used after the container was torn down"),
        }
    }

    pub fn try_context(&self) -> Option<Context> {
        self.inner.upgrade().map(|inner| Context { inner })
    }
}
