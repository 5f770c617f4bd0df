use player_shell::context::{Context, Dependencies};
use player_shell::control::ControlService;
use player_shell::feature::{FeatureEdge, FeaturePanel, FeaturePlacement, FeatureService};
use player_shell::overlay::{OverlayEntry, OverlayLayer, OverlayService};
use player_shell::plugin::{PluginOverlayService, PluginPanel};
use player_shell::presentation::LifecycleHooks;
use player_shell::render::RenderService;
use player_shell::settings::Settings;
use player_shell::toast::{Toast, ToastService};
use player_shell::view::{Alignment, Transition, ViewFn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn present_everything(ctx: &Context) {
    ctx.get::<RenderService>().set_surface(ViewFn::new(|_| {}));
    ctx.get::<FeatureService>().present(
        FeaturePanel {
            placement: FeaturePlacement::cover(FeatureEdge::Left),
            content: ViewFn::new(|_| {}),
            hooks: LifecycleHooks::new(),
        },
        Transition::default(),
    );
    ctx.get::<PluginOverlayService>().present(
        PluginPanel {
            alignment: Alignment::Center,
            content: ViewFn::new(|_| {}),
            hooks: LifecycleHooks::new(),
        },
        Transition::default(),
    );
    ctx.get::<ControlService>().set_content(ViewFn::new(|_| {}));
    ctx.get::<ToastService>().present(
        Toast {
            label: "saved".into(),
            alignment: Alignment::BottomLeading,
            content: ViewFn::new(|_| {}),
            hooks: LifecycleHooks::new(),
            duration: None,
        },
        Transition::default(),
    );
}

#[test]
fn an_enabled_subset_composes_exactly_those_layers() {
    let ctx = Context::default();
    let overlay = ctx.get::<OverlayService>();
    present_everything(&ctx);

    overlay.set_enabled_layers([OverlayLayer::Render, OverlayLayer::Control]);
    let frame = overlay.compose();

    assert_eq!(frame.entries.len(), 2);
    assert!(matches!(frame.entries[0], OverlayEntry::Render { .. }));
    assert!(matches!(frame.entries[1], OverlayEntry::Control { .. }));
}

#[test]
fn the_full_stack_composes_in_fixed_order() {
    let ctx = Context::default();
    let overlay = ctx.get::<OverlayService>();
    present_everything(&ctx);

    let frame = overlay.compose();
    assert_eq!(frame.entries.len(), 5);
    assert!(matches!(frame.entries[0], OverlayEntry::Render { .. }));
    assert!(matches!(frame.entries[1], OverlayEntry::Feature { .. }));
    assert!(matches!(frame.entries[2], OverlayEntry::Plugin { .. }));
    assert!(matches!(frame.entries[3], OverlayEntry::Control { .. }));
    assert!(matches!(frame.entries[4], OverlayEntry::Toast { .. }));
}

#[test]
fn empty_slot_layers_are_skipped() {
    let ctx = Context::default();
    let overlay = ctx.get::<OverlayService>();

    let frame = overlay.compose();
    // render and control always compose when enabled; the slots only while
    // something is presented
    assert_eq!(frame.entries.len(), 2);
    assert!(matches!(
        frame.entries[0],
        OverlayEntry::Render { content: None }
    ));
    assert!(matches!(
        frame.entries[1],
        OverlayEntry::Control { content: None }
    ));
}

#[test]
fn extensions_follow_their_layer() {
    let ctx = Context::default();
    let overlay = ctx.get::<OverlayService>();

    overlay.set_enabled_layers([OverlayLayer::Render, OverlayLayer::Control]);
    overlay.set_extension(OverlayLayer::Render, ViewFn::new(|_| {}));
    let frame = overlay.compose();

    assert_eq!(frame.entries.len(), 3);
    assert!(matches!(frame.entries[0], OverlayEntry::Render { .. }));
    assert!(matches!(
        frame.entries[1],
        OverlayEntry::Extension {
            layer: OverlayLayer::Render,
            ..
        }
    ));
    assert!(matches!(frame.entries[2], OverlayEntry::Control { .. }));

    overlay.clear_extension(OverlayLayer::Render);
    assert_eq!(overlay.compose().entries.len(), 2);
}

#[test]
fn layer_changes_invalidate_the_frame() {
    let ctx = Context::default();
    let overlay = ctx.get::<OverlayService>();
    let invalidations = Arc::new(AtomicUsize::new(0));
    let _sub = {
        let invalidations = invalidations.clone();
        overlay.subscribe_changes(move || {
            invalidations.fetch_add(1, Ordering::SeqCst);
        })
    };

    ctx.get::<ToastService>().present(
        Toast {
            label: "saved".into(),
            alignment: Alignment::BottomLeading,
            content: ViewFn::new(|_| {}),
            hooks: LifecycleHooks::new(),
            duration: None,
        },
        Transition::default(),
    );
    assert_eq!(invalidations.load(Ordering::SeqCst), 1);

    overlay.set_layer_enabled(OverlayLayer::Toast, false);
    assert_eq!(invalidations.load(Ordering::SeqCst), 2);
}

#[test]
fn startup_layers_come_from_settings() {
    let settings = Settings {
        enabled_overlays: Some(vec![OverlayLayer::Render]),
        ..Settings::default()
    };
    let ctx = Context::new(Dependencies::default().with_settings(settings));
    let overlay = ctx.get::<OverlayService>();

    assert!(overlay.is_layer_enabled(OverlayLayer::Render));
    assert!(!overlay.is_layer_enabled(OverlayLayer::Feature));
    assert_eq!(overlay.compose().entries.len(), 1);
}
