use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};
use rust_orrery::config::{CliArgs, SceneConfig};
use rust_orrery::error::ConfigError;
use rust_orrery::math::mesh::{generate_orbit_ring, generate_sphere};
use rust_orrery::model::motion::{snapshot, world_position};
use rust_orrery::model::selection::{detect_body_at_position, pixel_to_ndc, project_to_ndc};
use rust_orrery::model::{
    BodyID, BodyRegistry, CameraLimits, CameraState, InputEvent, InputState,
};

const EARTH: BodyID = BodyID(3);

fn view_projection(eye: Point3<f32>, target: Point3<f32>, aspect: f32) -> Matrix4<f32> {
    let view = Isometry3::look_at_rh(&eye, &target, &Vector3::y());
    let proj = Perspective3::new(aspect, std::f32::consts::FRAC_PI_4, 0.1, 500.0);
    proj.into_inner() * view.to_homogeneous()
}

#[test]
fn test_planets_at_ten_seconds() {
    let registry = BodyRegistry::solar_system();
    assert_eq!(registry.planets().count(), 8);

    let time = 10.0;
    let poses = snapshot(&registry, time);
    for body in registry.planets() {
        let pose = &poses[body.id.0];
        let angle = body.angular_speed * time;
        assert_abs_diff_eq!(pose.position.x, body.orbit_radius * angle.cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(pose.position.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pose.position.z, body.orbit_radius * angle.sin(), epsilon = 1e-6);
    }

    // The sun never moves
    assert_eq!(poses[0].position, Point3::origin());
}

#[test]
fn test_orbit_ring_traces_planet_path() {
    let registry = BodyRegistry::solar_system();
    let earth = registry.get(EARTH);
    let ring = generate_orbit_ring(earth.orbit_radius as f32, 128);

    // Every point the planet visits is on its drawn orbit
    for &time in &[0.0, 3.7, 42.0, 1000.0] {
        let p = world_position(earth, time);
        let dist = (p.x * p.x + p.z * p.z).sqrt();
        assert_relative_eq!(dist, earth.orbit_radius, epsilon = 1e-9);
    }
    for p in ring.iter() {
        assert_relative_eq!(p.coords.norm(), earth.orbit_radius as f32, epsilon = 1e-4);
    }
}

#[test]
fn test_click_selects_planet() {
    let registry = BodyRegistry::solar_system();
    let poses = snapshot(&registry, 25.0);
    let (width, height) = (1280, 720);
    let view_proj = view_projection(
        Point3::new(0.0, 30.0, 40.0),
        Point3::origin(),
        width as f32 / height as f32,
    );

    // Work out where Earth is on screen, then click right on top of it
    let earth: Point3<f32> = nalgebra::convert(poses[EARTH.0].position);
    let ndc = project_to_ndc(&view_proj, &earth).unwrap();
    let px = (ndc.x as f64 + 1.0) / 2.0 * width as f64;
    let py = (1.0 - ndc.y as f64) / 2.0 * height as f64;

    let click = pixel_to_ndc(px + 1.0, py - 1.0, width, height);
    let picked = detect_body_at_position(&poses, &view_proj, click, 0.05);
    assert_eq!(picked, Some(EARTH));

    // Feed the result through the reducer like the controller does
    let state = InputState::new(CameraState::new(0.0, 0.5, 40.0), CameraLimits::default());
    let state = state
        .update(InputEvent::PointerDown { x: px, y: py })
        .update(InputEvent::PointerMove { x: px + 1.0, y: py - 1.0 });
    assert!(state.is_click_release());
    let state = state.update(InputEvent::Select(picked)).update(InputEvent::PointerUp);
    assert_eq!(state.selected, Some(EARTH));
    assert!(state.drag.is_none());

    // Clicking empty space finds nothing
    let corner = pixel_to_ndc(2.0, 2.0, width, height);
    assert_eq!(detect_body_at_position(&poses, &view_proj, corner, 0.05), None);
}

#[test]
fn test_drag_then_zoom_stays_in_limits() {
    let limits = CameraLimits::default();
    let mut state = InputState::new(CameraState::new(0.0, 0.0, 20.0), limits);

    // A long drag straight down, far more than enough to flip the camera over
    state = state.update(InputEvent::PointerDown { x: 100.0, y: 100.0 });
    for i in 1..=200 {
        state = state.update(InputEvent::PointerMove {
            x: 100.0,
            y: 100.0 + 10.0 * i as f64,
        });
        assert!(state.camera.pitch.abs() <= std::f32::consts::FRAC_PI_2);
    }
    assert!(!state.is_click_release());
    state = state.update(InputEvent::PointerUp);

    for _ in 0..500 {
        state = state.update(InputEvent::Wheel(3.0));
    }
    assert_relative_eq!(state.camera.distance, limits.min_distance);
    for _ in 0..500 {
        state = state.update(InputEvent::ZoomOut);
    }
    assert_relative_eq!(state.camera.distance, limits.max_distance);
}

#[test]
fn test_replaying_events_is_deterministic() {
    let events = [
        InputEvent::PointerDown { x: 10.0, y: 10.0 },
        InputEvent::PointerMove { x: 60.0, y: 30.0 },
        InputEvent::PointerUp,
        InputEvent::Wheel(-2.0),
        InputEvent::Select(Some(BodyID(5))),
        InputEvent::ToggleFollow,
        InputEvent::Pan { dx: 1.0, dz: -0.5 },
        InputEvent::Rotate {
            yaw: 0.3,
            pitch: -0.2,
        },
    ];
    let initial = InputState::new(CameraState::new(0.2, 0.4, 30.0), CameraLimits::default());

    let run = || events.iter().fold(initial, |state, &event| state.update(event));
    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_eq!(first.camera.follow, Some(BodyID(5)));
    assert_eq!(first.camera.pivot_offset, Vector3::new(1.0, 0.0, -0.5));
    // The reducer never touched the state it started from
    assert_eq!(initial.selected, None);
}

#[test]
fn test_sphere_mesh_for_scene() {
    let mesh = generate_sphere(1.0, 32, 32);
    assert_eq!(mesh.vertex_count(), 33 * 33);
    assert_eq!(mesh.index_count(), 32 * 32 * 6);
}

#[test]
fn test_config_is_checked_before_use() {
    let dir = tempfile::tempdir().unwrap();
    let load = |text: &str| {
        let path = dir.path().join("scene.ron");
        std::fs::write(&path, text).unwrap();
        SceneConfig::from_args(&CliArgs {
            config: Some(path),
            ..CliArgs::default()
        })
    };

    // Both of these used to get past loading and fail much later
    assert!(matches!(
        load("(geometry: (sun_bands: 0))"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        load("(camera: (min_distance: 50.0, max_distance: 10.0))"),
        Err(ConfigError::Invalid(_))
    ));

    // A good config keeps zoom inside its limits
    let config = load("(camera: (min_distance: 5.0, max_distance: 10.0, initial_distance: 7.0))")
        .unwrap();
    let mut state = InputState::new(config.camera.initial_state(), config.camera.limits());
    for _ in 0..100 {
        state = state.update(InputEvent::ZoomIn);
    }
    assert_relative_eq!(state.camera.distance, 5.0);
    for _ in 0..100 {
        state = state.update(InputEvent::ZoomOut);
    }
    assert_relative_eq!(state.camera.distance, 10.0);
}
