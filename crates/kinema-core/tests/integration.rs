//! Integration tests for kinema-core.
//!
//! Drives the public API the way a host would: gesture events in, one
//! `advance()` per frame, positions out. Covers the drag/release cycle,
//! snapping, permanent behaviors and the timing utility.

use kinema_core::{
    AnimationGraph, Curve, DragSpring, Easing, FrictionArea, GestureEvent, GravityPoint,
    InfluenceArea, Interactable, InteractableConfig, Position, Regime, SnapPoint, SpringPoint,
    TimingConfig, run_timing,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Minimal host loop around an [`Interactable`].
struct Host {
    view: Interactable,
    now: f64,
}

impl Host {
    fn new(config: InteractableConfig) -> Self {
        Self {
            view: Interactable::new(config).expect("valid config"),
            now: 0.0,
        }
    }

    fn frame(&mut self) -> Position {
        let pos = self.view.advance(self.now).expect("monotonic time");
        self.now += FRAME_MS;
        pos
    }

    /// Linear drag from the origin of the gesture to `(dx, dy)`.
    fn drag(&mut self, dx: f64, dy: f64, frames: u32) {
        for i in 0..=frames {
            let f = f64::from(i) / f64::from(frames);
            self.view.handle_gesture(&GestureEvent::active(dx * f, dy * f));
            self.frame();
        }
    }

    fn release(&mut self, dx: f64, dy: f64) {
        self.view.handle_gesture(&GestureEvent::ended(dx, dy));
    }

    /// Runs frames until the clock stops (or `max` frames elapse).
    fn settle(&mut self, max: u32) -> u32 {
        for n in 0..max {
            self.frame();
            if !self.view.is_clock_running() {
                return n;
            }
        }
        max
    }
}

// ============================================================================
// 1. Snapping
// ============================================================================

#[test]
fn snap_selects_nearest_point_with_its_parameters() {
    let mut host = Host::new(InteractableConfig::with_snap_points([
        SnapPoint::new(0.0, 0.0),
        SnapPoint::new(5.0, 0.0).with_tension(400.0),
    ]));
    host.drag(4.0, 0.0, 4);
    assert!((host.view.position().x - 4.0).abs() < 1e-9);

    host.release(4.0, 0.0);
    host.frame();
    let anchor = host.view.snap_anchor();
    assert_eq!((anchor.x, anchor.y), (5.0, 0.0));
    assert_eq!(anchor.tension, Some(400.0));
    assert_eq!(anchor.damping, Some(0.7));
}

#[test]
fn snap_picks_closest_of_three_candidates() {
    let mut host = Host::new(InteractableConfig::with_snap_points([
        SnapPoint::new(0.0, 0.0).with_tension(300.0),
        SnapPoint::new(10.0, 0.0).with_tension(500.0),
        SnapPoint::new(5.0, 0.0).with_tension(400.0),
    ]));
    host.drag(4.0, 0.0, 4);
    host.release(4.0, 0.0);
    host.frame();

    let anchor = host.view.snap_anchor();
    assert_eq!((anchor.x, anchor.y), (5.0, 0.0));
    assert_eq!(anchor.tension, Some(400.0));
    assert_eq!(host.view.snap_resolutions(), 1);
}

#[test]
fn release_triggers_exactly_one_resolution() {
    let mut host = Host::new(InteractableConfig::with_snap_points([
        SnapPoint::new(0.0, 0.0),
        SnapPoint::new(100.0, 100.0),
    ]));
    host.drag(70.0, 60.0, 10);
    assert_eq!(host.view.snap_resolutions(), 0);
    assert_eq!(host.view.regime(), Regime::Dragging);

    host.release(70.0, 60.0);
    for _ in 0..30 {
        host.frame();
    }
    assert_eq!(host.view.snap_resolutions(), 1);
    assert_eq!(host.view.regime(), Regime::Released);
}

#[test]
fn released_object_comes_to_rest_on_snap_point() {
    let mut host = Host::new(InteractableConfig::with_snap_points([
        SnapPoint::new(-150.0, 0.0),
        SnapPoint::new(150.0, 0.0),
    ]));
    host.drag(90.0, 10.0, 12);
    host.release(90.0, 10.0);
    let frames = host.settle(2000);
    assert!(frames < 2000, "never came to rest");
    let pos = host.view.position();
    assert!((pos.x - 150.0).abs() < 0.1, "x = {}", pos.x);
    assert!(pos.y.abs() < 0.1, "y = {}", pos.y);
    assert!(host.view.velocity().speed() < 0.001);
}

#[test]
fn resting_object_holds_position_while_idle() {
    let mut host = Host::new(InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]));
    host.drag(30.0, 0.0, 5);
    host.release(30.0, 0.0);
    host.settle(2000);
    let rest = host.view.position();
    for _ in 0..120 {
        assert_eq!(host.frame(), rest);
    }
}

// ============================================================================
// 2. Drag modes and axis locks
// ============================================================================

#[test]
fn drag_spring_overshoots_less_than_finger_travel() {
    let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
    config.drag_with_spring = Some(DragSpring::default());
    let mut host = Host::new(config);
    host.drag(0.0, 200.0, 6);
    let pos = host.view.position();
    assert!(pos.y > 0.0 && pos.y < 200.0, "y = {}", pos.y);
    assert_eq!(pos.x, 0.0);
}

#[test]
fn vertical_only_ignores_horizontal_drag() {
    let mut config = InteractableConfig::with_snap_points([
        SnapPoint::new(0.0, 0.0),
        SnapPoint::new(0.0, 300.0),
    ]);
    config.vertical_only = true;
    let mut host = Host::new(config);
    host.drag(500.0, 250.0, 10);
    let pos = host.frame();
    assert_eq!(pos.x, 0.0);
    assert!((pos.y - 250.0).abs() < 1e-9);

    host.release(500.0, 250.0);
    host.settle(2000);
    assert!((host.view.position().y - 300.0).abs() < 0.1);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
    config.horizontal_only = true;
    config.vertical_only = true;
    assert!(Interactable::new(config).is_err());
}

// ============================================================================
// 3. Permanent behaviors
// ============================================================================

#[test]
fn gravity_well_pulls_released_object() {
    let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
    config.gravity_points.push(GravityPoint {
        x: 100.0,
        y: 0.0,
        strength: Some(4000.0),
        falloff: Some(60.0),
        ..GravityPoint::default()
    });
    let mut with_gravity = Host::new(config);
    let mut plain = Host::new(InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]));

    for host in [&mut with_gravity, &mut plain] {
        host.drag(60.0, 0.0, 6);
        host.release(60.0, 0.0);
        for _ in 0..10 {
            host.frame();
        }
    }
    // The well at x = 100 resists the snap spring toward 0.
    assert!(with_gravity.view.position().x > plain.view.position().x);
}

#[test]
fn friction_area_only_acts_inside_its_region() {
    let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
    config.friction_areas.push(FrictionArea {
        damping: 0.1,
        influence_area: Some(InfluenceArea {
            left: Some(1000.0),
            ..InfluenceArea::default()
        }),
    });
    let mut gated = Host::new(config);
    let mut plain = Host::new(InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]));
    for host in [&mut gated, &mut plain] {
        host.drag(80.0, 0.0, 8);
        host.release(80.0, 0.0);
        for _ in 0..20 {
            host.frame();
        }
    }
    assert_eq!(gated.view.position(), plain.view.position());
}

#[test]
fn spring_point_with_damping_shifts_rest_position() {
    let mut config = InteractableConfig::with_snap_points([SnapPoint::new(0.0, 0.0)]);
    config.spring_points.push(SpringPoint {
        x: 100.0,
        y: 0.0,
        tension: Some(300.0),
        damping: Some(0.8),
        influence_area: None,
    });
    let mut host = Host::new(config);
    host.drag(10.0, 0.0, 2);
    host.release(10.0, 0.0);
    host.settle(3000);
    // Equal tensions toward 0 and 100 balance halfway.
    assert!((host.view.position().x - 50.0).abs() < 0.1);
}

// ============================================================================
// 4. Timing
// ============================================================================

#[test]
fn timing_reaches_destination_then_stops_clock() {
    let mut graph = AnimationGraph::new();
    let clock = graph.clock();
    let timing = run_timing(&mut graph, clock, 0.0, 120.0, &TimingConfig::default());

    let mut t = 0.0;
    let mut out = 0.0;
    while graph.read(timing.state.finished) == 0.0 {
        graph.begin_frame(t).unwrap();
        out = graph.evaluate(timing.node).unwrap();
        t += FRAME_MS;
        assert!(t < 6000.0, "timing never finished");
    }
    assert_eq!(out, 120.0);
    assert!(!graph.is_clock_running(clock));

    // Later frames hold the destination until `finished` is cleared.
    for _ in 0..3 {
        graph.begin_frame(t).unwrap();
        assert_eq!(graph.evaluate(timing.node).unwrap(), 120.0);
        t += FRAME_MS;
    }
    assert!(!graph.is_clock_running(clock));
}

#[test]
fn timing_with_custom_easing() {
    let mut graph = AnimationGraph::new();
    let clock = graph.clock();
    let config = TimingConfig {
        duration_ms: 400.0,
        easing: Easing::ease_out(Curve::Quad),
    };
    let timing = run_timing(&mut graph, clock, 10.0, 20.0, &config);
    graph.begin_frame(0.0).unwrap();
    graph.evaluate(timing.node).unwrap();
    graph.begin_frame(200.0).unwrap();
    let mid = graph.evaluate(timing.node).unwrap();
    assert!((mid - 17.5).abs() < 1e-9, "mid = {mid}");
}
