use player_shell::context::Context;
use player_shell::scheduler::Scheduler;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[test]
fn callbacks_fire_only_past_their_deadline() {
    let ctx = Context::default();
    let scheduler = ctx.get::<Scheduler>();
    let fired = Arc::new(AtomicUsize::new(0));
    {
        let fired = fired.clone();
        scheduler.schedule_after(Duration::from_millis(100), move || {
            fired.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert_eq!(scheduler.tick(Instant::now()), 0);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.pending(), 1);

    assert_eq!(scheduler.tick(Instant::now() + Duration::from_millis(200)), 1);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn due_callbacks_run_in_schedule_order() {
    let ctx = Context::default();
    let scheduler = ctx.get::<Scheduler>();
    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 0..3 {
        let order = order.clone();
        scheduler.schedule_after(Duration::from_millis(10), move || {
            order.lock().unwrap().push(i);
        });
    }

    scheduler.tick(Instant::now() + Duration::from_millis(50));
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn a_callback_may_schedule_more_work() {
    let ctx = Context::default();
    let scheduler = ctx.get::<Scheduler>();
    let fired = Arc::new(AtomicUsize::new(0));
    {
        let fired = fired.clone();
        let inner = ctx.get::<Scheduler>();
        scheduler.schedule_after(Duration::from_millis(10), move || {
            let fired = fired.clone();
            inner.schedule_after(Duration::from_millis(10), move || {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        });
    }

    scheduler.tick(Instant::now() + Duration::from_millis(50));
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    scheduler.tick(Instant::now() + Duration::from_millis(100));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn entries_are_never_cancelled() {
    let ctx = Context::default();
    let scheduler = ctx.get::<Scheduler>();
    let fired = Arc::new(AtomicUsize::new(0));
    {
        let fired = fired.clone();
        scheduler.schedule_after(Duration::from_millis(10), move || {
            fired.fetch_add(1, Ordering::SeqCst);
        });
    }
    // dropping our handle to the service does not drop the queue
    drop(scheduler);
    assert_eq!(
        ctx.get::<Scheduler>()
            .tick(Instant::now() + Duration::from_millis(50)),
        1
    );
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
