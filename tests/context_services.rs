use player_shell::context::{Context, Service};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Leaf {
    id: usize,
}

impl Service for Leaf {
    fn init(_ctx: &Context) -> Self {
        Leaf { id: 7 }
    }
}

struct Inner;

impl Service for Inner {
    fn init(_ctx: &Context) -> Self {
        Inner
    }
}

struct Outer {
    inner: Arc<Inner>,
}

impl Service for Outer {
    fn init(ctx: &Context) -> Self {
        Outer {
            inner: ctx.get::<Inner>(),
        }
    }
}

#[test]
fn get_returns_the_same_instance_until_stopped() {
    let ctx = Context::default();
    let a = ctx.get::<Leaf>();
    let b = ctx.get::<Leaf>();
    assert_eq!(a.id, 7);
    assert!(Arc::ptr_eq(&a, &b));

    assert!(ctx.stop::<Leaf>());
    let c = ctx.get::<Leaf>();
    assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn stop_without_instance_reports_false() {
    let ctx = Context::default();
    assert!(!ctx.stop::<Leaf>());
}

#[test]
fn constructor_chains_reenter_the_registry() {
    let ctx = Context::default();
    let outer = ctx.get::<Outer>();
    // the inner service built during Outer::init is the registered singleton
    assert!(Arc::ptr_eq(&outer.inner, &ctx.get::<Inner>()));
}

#[test]
fn try_get_does_not_construct() {
    let ctx = Context::default();
    assert!(ctx.try_get::<Leaf>().is_none());
    ctx.get::<Leaf>();
    assert!(ctx.try_get::<Leaf>().is_some());
}

#[test]
fn concurrent_lookups_construct_once() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Service for Counted {
        fn init(_ctx: &Context) -> Self {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Counted
        }
    }

    let ctx = Context::default();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ctx = ctx.clone();
            std::thread::spawn(move || ctx.get::<Counted>())
        })
        .collect();
    let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
}

#[test]
fn handle_goes_stale_with_the_container() {
    let handle = {
        let ctx = Context::default();
        let handle = ctx.handle();
        assert!(handle.try_context().is_some());
        handle
    };
    assert!(handle.try_context().is_none());
}

#[test]
#[should_panic]
fn context_access_after_teardown_panics() {
    let handle = {
        let ctx = Context::default();
        ctx.handle()
    };
    let _ = handle.context();
}
