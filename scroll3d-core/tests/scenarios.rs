use std::time::Duration;

use scroll3d_core::observer::VisibilityObserver;
use scroll3d_core::resolver;
use scroll3d_core::{
    Activation, IntersectionEntry, LayoutSnapshot, Rect, Rejection, ShowcaseConfig, ShowcaseEngine,
    SurfaceState,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn setup() -> (ShowcaseEngine, SurfaceState) {
    let engine = ShowcaseEngine::new(&ShowcaseConfig::default()).unwrap();
    (engine, SurfaceState::new(5))
}

#[test]
fn ratio_method_at_half_progress() {
    let layout = LayoutSnapshot::stacked(1000.0, -2000.0, 1000.0, 5);
    assert_eq!(
        resolver::ratio_index(layout.container, layout.viewport, 5),
        Some(2)
    );
}

#[test]
fn observer_nominates_single_section_above_minimum() {
    let (mut engine, mut surface) = setup();
    let layout = LayoutSnapshot::stacked(1000.0, 5000.0, 1000.0, 5);
    let ratios = [0.1, 0.25, 0.4, 0.2, 0.0];
    let batch: Vec<IntersectionEntry> = ratios
        .iter()
        .enumerate()
        .map(|(index, &ratio)| IntersectionEntry { index, ratio })
        .collect();

    assert_eq!(VisibilityObserver::default().select(&batch, None), Some(2));

    engine.intersections(&batch);
    engine.tick(ms(0), &layout, &mut surface);
    assert_eq!(engine.current_index(), Some(2));
}

#[test]
fn emulated_observer_drives_activation_through_the_engine() {
    let (mut engine, mut surface) = setup();

    // Section 3 fills the observed band (200..800): ratio 0.6, every other section 0
    let layout = LayoutSnapshot::stacked(1000.0, -2000.0, 1000.0, 5);
    engine.observe_layout(&layout);
    engine.tick(ms(0), &layout, &mut surface);
    assert_eq!(engine.current_index(), Some(2));
    assert_eq!(surface.active_section(), Some(2));

    // Unchanged buckets report nothing, so nothing new is nominated
    engine.observe_layout(&layout);
    engine.tick(ms(800), &layout, &mut surface);
    assert!(!engine.is_changing());
    assert_eq!(surface.source.as_deref(), Some("/models/model3.glb"));

    // Moving one page down hands the band to section 4
    let layout = LayoutSnapshot::stacked(1000.0, -3000.0, 1000.0, 5);
    engine.observe_layout(&layout);
    engine.tick(ms(900), &layout, &mut surface);
    assert_eq!(engine.current_index(), Some(3));
    assert!(engine.is_changing());
}

#[test]
fn scroll_burst_runs_one_resolution_with_last_state() {
    let (mut engine, mut surface) = setup();

    // 20 events within 10ms; the page keeps moving while they arrive
    for i in 0..20u64 {
        let now = Duration::from_micros(i * 500);
        let layout = LayoutSnapshot::stacked(1000.0, -(i as f64) * 200.0, 1000.0, 5);
        engine.scroll_event(now);
        engine.tick(now, &layout, &mut surface);
        assert_eq!(engine.current_index(), None);
    }

    // Final state: container top -3800, section 4 nearest the center
    let layout = LayoutSnapshot::stacked(1000.0, -3800.0, 1000.0, 5);
    let now = ms(26);
    assert!(engine.poll_dispatch(now));
    assert!(!engine.poll_dispatch(now));
    let applied = engine.animation_frame(now, &layout, &mut surface);
    assert_eq!(applied, Some(Activation::Started));
    assert_eq!(engine.current_index(), Some(4));
    assert_eq!(engine.animation_frame(now, &layout, &mut surface), None);
}

#[test]
fn double_activation_runs_one_sequence() {
    let (mut engine, mut surface) = setup();
    let layout = LayoutSnapshot::stacked(1000.0, 5000.0, 1000.0, 5);

    assert!(engine.request_activate(1, ms(0), &mut surface).is_started());
    assert_eq!(
        engine.request_activate(1, ms(0), &mut surface),
        Activation::Ignored(Rejection::AlreadyActive)
    );

    engine.tick(ms(749), &layout, &mut surface);
    assert!(engine.is_changing());
    assert_eq!(surface.source_swaps, 1);

    engine.tick(ms(750), &layout, &mut surface);
    assert!(!engine.is_changing());
    assert_eq!(surface.source_swaps, 1);
    assert_eq!(surface.source.as_deref(), Some("/models/model2.glb"));
}

#[test]
fn resolver_falls_back_to_ratio_when_nothing_is_visible() {
    // Section rects are collapsed far above; the container still spans the viewport
    let layout = LayoutSnapshot::new(
        1000.0,
        Rect::new(-3000.0, 5000.0),
        (0..5).map(|i| Rect::new(-9000.0 + i as f64, 1.0)).collect(),
    );
    assert_eq!(resolver::proximity_index(&layout.sections, layout.viewport), None);
    assert_eq!(resolver::resolve(&layout), Some(3));
}

#[test]
fn boundary_requests_are_ignored() {
    let (mut engine, mut surface) = setup();
    assert_eq!(
        engine.request_activate(5, ms(0), &mut surface),
        Activation::Ignored(Rejection::OutOfRange)
    );
    assert_eq!(
        engine.inspector().activate(-1, ms(0), &mut surface),
        Activation::Ignored(Rejection::OutOfRange)
    );
    assert_eq!(engine.current_index(), None);
    assert_eq!(surface.active_count(), 0);
    assert!(!engine.is_changing());
}

#[test]
fn lock_holds_current_index_under_any_request() {
    let (mut engine, mut surface) = setup();
    engine.request_activate(0, ms(0), &mut surface);
    for index in 0..7 {
        engine.request_activate(index, ms(100), &mut surface);
        assert_eq!(engine.current_index(), Some(0));
        assert!(surface.active_count() <= 1);
    }
}

#[test]
fn scrolling_through_the_page_visits_every_section() {
    let (mut engine, mut surface) = setup();
    let mut now = ms(0);
    let mut visited = Vec::new();

    for step in 0..=40u64 {
        let layout = LayoutSnapshot::stacked(1000.0, -(step as f64) * 100.0, 1000.0, 5);
        engine.scroll_event(now);
        now += ms(800);
        engine.tick(now, &layout, &mut surface);
        if let Some(index) = engine.current_index() {
            if visited.last() != Some(&index) {
                visited.push(index);
            }
        }
        assert!(surface.active_count() <= 1);
    }

    assert_eq!(visited, vec![0, 1, 2, 3, 4]);
}
