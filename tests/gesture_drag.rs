use player_shell::context::{Context, Dependencies};
use player_shell::gestures::{
    DragDirection, GestureEvent, GestureKind, GesturePhase, GestureService, GestureValue,
    PointerEvent,
};
use player_shell::settings::Settings;
use player_shell::view::{FixedViewSize, ViewSize};
use std::sync::{Arc, Mutex};

fn ctx() -> Context {
    let settings = Settings {
        drag_slop: 2.0,
        ..Settings::default()
    };
    Context::new(
        Dependencies::default()
            .with_settings(settings)
            .with_view_size(Arc::new(FixedViewSize(ViewSize::new(200.0, 100.0)))),
    )
}

fn record_all(gestures: &GestureService) -> (
    Arc<Mutex<Vec<GestureEvent>>>,
    Vec<player_shell::gestures::GestureSubscription>,
) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let kinds = [
        GestureKind::Drag(DragDirection::Horizontal),
        GestureKind::Drag(DragDirection::VerticalLeft),
        GestureKind::Drag(DragDirection::VerticalRight),
    ];
    let subs = kinds
        .iter()
        .map(|kind| {
            let events = events.clone();
            gestures.subscribe(*kind, move |event| events.lock().unwrap().push(*event))
        })
        .collect();
    (events, subs)
}

#[test]
fn first_sample_classification_sticks_for_the_sequence() {
    let ctx = ctx();
    let gestures = ctx.get::<GestureService>();
    let (events, _subs) = record_all(&gestures);

    gestures.process(PointerEvent::Down {
        pos: (10.0, 10.0).into(),
        at_ms: 0,
    });
    // |dx| = 5, |dy| = 1: horizontal
    gestures.process(PointerEvent::Moved {
        pos: (15.0, 11.0).into(),
        at_ms: 20,
    });
    // later the vertical axis dominates, but the classification holds
    gestures.process(PointerEvent::Moved {
        pos: (16.0, 50.0).into(),
        at_ms: 40,
    });
    gestures.process(PointerEvent::Up {
        pos: (16.0, 70.0).into(),
        at_ms: 60,
    });

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, GestureKind::Drag(DragDirection::Horizontal));
    assert_eq!(events[0].phase, GesturePhase::Start);
    assert_eq!(
        events[0].value,
        GestureValue::Translation { dx: 5.0, dy: 1.0 }
    );
    assert_eq!(events[1].kind, GestureKind::Drag(DragDirection::Horizontal));
    assert_eq!(events[1].phase, GesturePhase::End);
}

#[test]
fn vertical_drags_take_the_side_of_their_start() {
    let ctx = ctx();
    let gestures = ctx.get::<GestureService>();
    let (events, _subs) = record_all(&gestures);

    gestures.process(PointerEvent::Down {
        pos: (10.0, 10.0).into(),
        at_ms: 0,
    });
    gestures.process(PointerEvent::Moved {
        pos: (11.0, 40.0).into(),
        at_ms: 20,
    });
    gestures.process(PointerEvent::Up {
        pos: (11.0, 60.0).into(),
        at_ms: 40,
    });

    gestures.process(PointerEvent::Down {
        pos: (150.0, 10.0).into(),
        at_ms: 1_000,
    });
    gestures.process(PointerEvent::Moved {
        pos: (151.0, 40.0).into(),
        at_ms: 1_020,
    });
    gestures.process(PointerEvent::Up {
        pos: (151.0, 60.0).into(),
        at_ms: 1_040,
    });

    let events = events.lock().unwrap();
    let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            GestureKind::Drag(DragDirection::VerticalLeft),
            GestureKind::Drag(DragDirection::VerticalLeft),
            GestureKind::Drag(DragDirection::VerticalRight),
            GestureKind::Drag(DragDirection::VerticalRight),
        ]
    );
}

#[test]
fn classification_resets_between_sequences() {
    let ctx = ctx();
    let gestures = ctx.get::<GestureService>();
    let (events, _subs) = record_all(&gestures);

    gestures.process(PointerEvent::Down {
        pos: (10.0, 10.0).into(),
        at_ms: 0,
    });
    gestures.process(PointerEvent::Moved {
        pos: (30.0, 11.0).into(),
        at_ms: 20,
    });
    gestures.process(PointerEvent::Up {
        pos: (30.0, 11.0).into(),
        at_ms: 40,
    });

    gestures.process(PointerEvent::Down {
        pos: (10.0, 10.0).into(),
        at_ms: 1_000,
    });
    gestures.process(PointerEvent::Moved {
        pos: (11.0, 40.0).into(),
        at_ms: 1_020,
    });
    gestures.process(PointerEvent::Up {
        pos: (11.0, 60.0).into(),
        at_ms: 1_040,
    });

    let events = events.lock().unwrap();
    assert_eq!(events[0].kind, GestureKind::Drag(DragDirection::Horizontal));
    assert_eq!(events[2].kind, GestureKind::Drag(DragDirection::VerticalLeft));
}

#[test]
fn drags_do_not_tap() {
    let ctx = ctx();
    let gestures = ctx.get::<GestureService>();
    let taps = Arc::new(Mutex::new(0usize));
    let _sub = {
        let taps = taps.clone();
        gestures.subscribe(
            GestureKind::Tap(player_shell::gestures::Side::Any),
            move |_| *taps.lock().unwrap() += 1,
        )
    };

    gestures.process(PointerEvent::Down {
        pos: (10.0, 10.0).into(),
        at_ms: 0,
    });
    gestures.process(PointerEvent::Moved {
        pos: (30.0, 11.0).into(),
        at_ms: 20,
    });
    gestures.process(PointerEvent::Up {
        pos: (30.0, 11.0).into(),
        at_ms: 40,
    });

    assert_eq!(*taps.lock().unwrap(), 0);
}
