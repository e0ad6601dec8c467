//! Engine scenarios against the headless window system.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicI32, Ordering};

use easel_engine::coords::{Point, Rect, Size};
use easel_engine::paint::Color;
use easel_engine::platform::headless::{HeadlessConfig, HeadlessProbe, HeadlessToolkit};
use easel_engine::platform::{NativeWindow, Toolkit};
use easel_engine::surface::{BufferingMode, RendererState};
use easel_engine::{
    EngineConfig, ExitSignal, GraphicsEngine, GraphicsError, Icon, SurfaceKind, TeardownPolicy,
};

fn ignore_exit(_: i32) {}

fn signal(terminator: fn(i32)) -> &'static ExitSignal {
    Box::leak(Box::new(ExitSignal::new(terminator)))
}

fn engine_on(toolkit: &HeadlessToolkit, config: EngineConfig) -> (GraphicsEngine, HeadlessProbe) {
    let native = toolkit.create_window(config.kind).unwrap();
    let engine = GraphicsEngine::with_exit_signal(native, config, signal(ignore_exit)).unwrap();
    (engine, toolkit.last_window().unwrap())
}

fn engine(config: EngineConfig) -> (GraphicsEngine, HeadlessProbe) {
    engine_on(&HeadlessToolkit::default(), config)
}

fn accelerated(vsync: bool) -> EngineConfig {
    EngineConfig::windowed(Size::new(320, 240)).with_surface(SurfaceKind::Accelerated { vsync })
}

// ── geometry ─────────────────────────────────────────────────────────────────

#[test]
fn client_area_matches_request_regardless_of_insets() {
    for decorated in [true, false] {
        for (w, h) in [(1, 1), (640, 480), (800, 600), (1024, 16)] {
            let config = EngineConfig::windowed(Size::new(w, h)).with_decorations(decorated);
            let (engine, probe) = engine(config);
            assert_eq!(engine.size(), Size::new(w, h));
            assert_eq!(probe.client_size(), Size::new(w, h));
        }
    }
}

#[test]
fn undecorated_frame_equals_client() {
    let (engine, probe) = engine(EngineConfig::windowed(Size::new(640, 480)).with_decorations(false));
    assert!(!probe.is_decorated());
    assert_eq!(engine.size(), Size::new(640, 480));
    assert_eq!(engine.frame_bounds().size, Size::new(640, 480));
}

#[test]
fn decorated_frame_is_larger_than_client() {
    let (engine, probe) = engine(EngineConfig::windowed(Size::new(640, 480)));
    assert!(probe.is_decorated());
    let frame = engine.frame_bounds().size;
    assert_eq!(engine.size(), Size::new(640, 480));
    assert!(frame.width > 640);
    assert!(frame.height > 480);
}

#[test]
fn dialog_is_centered_on_screen() {
    let toolkit = HeadlessToolkit::new(HeadlessConfig {
        screen: Rect::new(0, 0, 1000, 1000),
        ..HeadlessConfig::default()
    });
    let (engine, _) = engine_on(&toolkit, EngineConfig::dialog(Size::new(192, 166)));
    assert_eq!(engine.frame_bounds().origin, Point::new(400, 400));
}

#[test]
fn frame_stays_on_a_screen_left_of_the_primary() {
    let toolkit = HeadlessToolkit::new(HeadlessConfig {
        screen: Rect::new(-1920, 0, 1920, 1080),
        ..HeadlessConfig::default()
    });
    let (engine, _) = engine_on(&toolkit, EngineConfig::windowed(Size::new(640, 480)));
    let bounds = engine.frame_bounds();
    assert_eq!(bounds.origin, Point::new(-1284, 283));
    assert!(bounds.right() <= 0);
}

// ── flipping ─────────────────────────────────────────────────────────────────

#[test]
fn hundred_flips_without_drawing() {
    let (mut engine, probe) = engine(EngineConfig::default());
    for _ in 0..100 {
        assert!(engine.flip().unwrap());
    }
    assert_eq!(probe.presented(), 100);
}

#[test]
fn software_frame_reaches_the_window() {
    let (mut engine, probe) = engine(EngineConfig::windowed(Size::new(8, 8)));
    let g = engine.back_buffer().unwrap();
    g.clear(Color::BLACK);
    g.fill_rect(Rect::new(2, 2, 2, 2), Color::WHITE);
    assert!(engine.flip().unwrap());

    let frame = probe.last_frame();
    assert_eq!(frame.len(), 64);
    assert_eq!(frame[2 * 8 + 2], Color::WHITE.to_xrgb());
    assert_eq!(frame[0], Color::BLACK.to_xrgb());
}

#[test]
fn refused_strategy_falls_back_to_blitting() {
    let toolkit = HeadlessToolkit::new(HeadlessConfig {
        buffer_pages: 0,
        ..HeadlessConfig::default()
    });
    let (mut engine, probe) = engine_on(&toolkit, EngineConfig::windowed(Size::new(16, 16)));
    assert_eq!(engine.buffering_mode(), BufferingMode::Blit);

    engine.back_buffer().unwrap().clear(Color::WHITE);
    assert!(engine.flip().unwrap());
    assert!(probe.last_frame().iter().all(|px| *px == Color::WHITE.to_xrgb()));
}

#[test]
fn strategy_can_be_skipped_by_config() {
    let config = EngineConfig::windowed(Size::new(16, 16))
        .with_surface(SurfaceKind::Software { buffer_strategy: false });
    let (engine, _) = engine(config);
    assert_eq!(engine.buffering_mode(), BufferingMode::Blit);
}

#[test]
fn transient_failure_skips_one_frame() {
    let (mut engine, probe) = engine(EngineConfig::default());
    assert_eq!(engine.buffering_mode(), BufferingMode::DoubleBuffer);

    probe.fail_next_presents(1);
    assert!(!engine.flip().unwrap());
    assert!(engine.flip().unwrap());
    assert_eq!(probe.presented(), 1);
}

#[test]
fn back_buffer_serial_advances_with_each_flip() {
    let (mut engine, _) = engine(EngineConfig::default());
    let first = engine.back_buffer().unwrap().frame();
    engine.flip().unwrap();
    assert_ne!(engine.back_buffer().unwrap().frame(), first);
}

// ── accelerated ──────────────────────────────────────────────────────────────

#[test]
fn accelerated_context_is_fresh_after_flip() {
    let (mut engine, probe) = engine(accelerated(false));
    assert_eq!(engine.renderer_state(), Some(RendererState::Ready));

    let g = engine.back_buffer().unwrap();
    let before = g.frame();
    g.fill_rect(Rect::new(0, 0, 10, 10), Color::WHITE);
    g.fill_rect(Rect::new(10, 0, 10, 10), Color::WHITE);
    assert!(engine.flip().unwrap());

    assert_eq!(probe.rects_drawn(), 2);
    let g = engine.back_buffer().unwrap();
    assert_ne!(g.frame(), before);
    assert_eq!(g.size(), Size::new(320, 240));
    assert!(g.pixels_mut().is_none());
}

#[test]
fn accelerated_survives_hundred_flips() {
    let (mut engine, _) = engine(accelerated(true));
    for _ in 0..100 {
        assert!(engine.flip().unwrap());
    }
    assert_eq!(engine.renderer_state(), Some(RendererState::Ready));
    engine.cleanup().unwrap();
    assert_eq!(engine.renderer_state(), Some(RendererState::Disposed));
}

#[test]
fn cleanup_releases_the_drawable_before_the_window() {
    let (mut engine, probe) = engine(accelerated(false));
    assert_eq!(probe.attached_drawables(), 1);

    engine.cleanup().unwrap();
    assert_eq!(probe.attached_drawables(), 0);
    assert!(probe.is_disposed());
}

#[test]
fn vsync_reflects_construction_flag() {
    assert!(engine(accelerated(true)).0.is_vsync());
    assert!(!engine(accelerated(false)).0.is_vsync());
    assert!(!engine(EngineConfig::default()).0.is_vsync());
}

#[test]
fn skipped_priming_frame_does_not_abort_construction() {
    let toolkit = HeadlessToolkit::default();
    let native = toolkit.create_window(accelerated(false).kind).unwrap();
    toolkit.last_window().unwrap().fail_next_presents(1);

    let mut engine = GraphicsEngine::with_exit_signal(native, accelerated(false), signal(ignore_exit)).unwrap();
    assert_eq!(engine.renderer_state(), Some(RendererState::Ready));
    assert!(engine.flip().unwrap());
}

#[test]
fn software_surface_has_no_renderer() {
    let (engine, _) = engine(EngineConfig::default());
    assert_eq!(engine.renderer_state(), None);
}

#[test]
fn description_matches_surface() {
    let (engine, _) = engine(accelerated(true));
    assert_eq!(engine.description(), "Accelerated Windowed Mode [320x240] with VSync");
}

// ── window properties ────────────────────────────────────────────────────────

#[test]
fn title_round_trips() {
    let (mut engine, _) = engine(EngineConfig::default().with_title("first"));
    assert_eq!(engine.title(), "first");
    for title in ["X", "Space Rocks: level 2", ""] {
        engine.set_title(title);
        assert_eq!(engine.title(), title);
    }
}

#[test]
fn dialog_never_reports_an_icon() {
    let (mut engine, probe) = engine(EngineConfig::dialog(Size::new(200, 100)));
    let icon = Icon::from_rgba(vec![0; 16 * 16 * 4], Size::new(16, 16)).unwrap();
    engine.set_icon(icon);
    assert!(engine.icon().is_none());
    assert!(probe.icon_size().is_none());
}

#[test]
fn close_listeners_pass_through() {
    let (mut engine, probe) = engine(EngineConfig::default());
    let hits = Rc::new(RefCell::new(0));
    let h = hits.clone();
    let id = engine.add_close_listener(Box::new(move |_| *h.borrow_mut() += 1));
    assert_eq!(probe.listener_count(), 2);

    assert!(engine.remove_close_listener(id));
    assert!(!engine.remove_close_listener(id));
    assert_eq!(probe.listener_count(), 1);
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn close_request_exits_with_zero() {
    static STATUS: AtomicI32 = AtomicI32::new(i32::MIN);
    fn record(status: i32) {
        STATUS.store(status, Ordering::SeqCst);
    }

    let toolkit = HeadlessToolkit::default();
    let native = toolkit.create_window(EngineConfig::default().kind).unwrap();
    let mut engine = GraphicsEngine::with_exit_signal(native, EngineConfig::default(), signal(record)).unwrap();
    let probe = toolkit.last_window().unwrap();

    let seen = Rc::new(RefCell::new(None));
    let s = seen.clone();
    engine.add_close_listener(Box::new(move |key| *s.borrow_mut() = Some(key)));

    probe.request_close();
    engine.flip().unwrap();

    assert_eq!(STATUS.load(Ordering::SeqCst), 0);
    assert_eq!(*seen.borrow(), Some(probe.key()));
}

// ── teardown ─────────────────────────────────────────────────────────────────

#[test]
fn flip_after_cleanup_is_an_error() {
    let (mut engine, probe) = engine(EngineConfig::default());
    engine.cleanup().unwrap();

    assert!(probe.is_disposed());
    assert!(matches!(engine.flip(), Err(GraphicsError::Disposed)));
    assert!(matches!(engine.back_buffer(), Err(GraphicsError::Disposed)));
}

#[test]
fn second_cleanup_is_a_no_op() {
    let (mut engine, probe) = engine(accelerated(false));
    engine.flip().unwrap();
    engine.cleanup().unwrap();
    engine.cleanup().unwrap();
    assert!(engine.is_disposed());
    assert!(probe.is_disposed());
}

#[test]
fn cleanup_leaves_the_exit_signal() {
    let exit = signal(ignore_exit);
    let toolkit = HeadlessToolkit::default();
    let native = toolkit.create_window(EngineConfig::default().kind).unwrap();
    let key = native.key();
    let mut engine = GraphicsEngine::with_exit_signal(native, EngineConfig::default(), exit).unwrap();

    assert!(exit.is_registered(key));
    engine.cleanup().unwrap();
    assert!(!exit.is_registered(key));
    assert_eq!(toolkit.last_window().unwrap().listener_count(), 0);
}

#[test]
fn hide_policy_hides_window_on_dispose_failure() {
    let (mut engine, probe) = engine(EngineConfig::default().with_teardown(TeardownPolicy::Hide));
    probe.set_fail_dispose(true);

    assert!(matches!(engine.cleanup(), Err(GraphicsError::Teardown(_))));
    assert!(!probe.is_visible());
    assert!(!probe.is_disposed());

    // Nothing more to try.
    engine.cleanup().unwrap();
    assert!(matches!(engine.flip(), Err(GraphicsError::Disposed)));
}

#[test]
fn exit_policy_terminates_with_minus_one() {
    static STATUS: AtomicI32 = AtomicI32::new(i32::MIN);
    fn record(status: i32) {
        STATUS.store(status, Ordering::SeqCst);
    }

    let toolkit = HeadlessToolkit::default();
    let config = EngineConfig::default().with_teardown(TeardownPolicy::Exit);
    let native = toolkit.create_window(config.kind).unwrap();
    let mut engine = GraphicsEngine::with_exit_signal(native, config, signal(record)).unwrap();
    toolkit.last_window().unwrap().set_fail_dispose(true);

    assert!(engine.cleanup().is_err());
    assert_eq!(STATUS.load(Ordering::SeqCst), -1);
}

// ── construction failures ────────────────────────────────────────────────────

#[test]
fn window_creation_failure_propagates() {
    let toolkit = HeadlessToolkit::new(HeadlessConfig {
        fail_window_creation: true,
        ..HeadlessConfig::default()
    });
    assert!(GraphicsEngine::with_toolkit(&toolkit, EngineConfig::default()).is_err());
}

#[test]
fn drawable_failure_propagates() {
    let toolkit = HeadlessToolkit::new(HeadlessConfig {
        fail_drawable_creation: true,
        ..HeadlessConfig::default()
    });
    let native = toolkit.create_window(accelerated(true).kind).unwrap();
    let result = GraphicsEngine::with_exit_signal(native, accelerated(true), signal(ignore_exit));
    assert!(result.is_err());
    assert!(toolkit.last_window().unwrap().is_disposed());
}
