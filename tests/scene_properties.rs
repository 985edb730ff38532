//! Observable properties of the scene, panel and viewport logic, exercised
//! through the public API without a GPU device.

use undula::context::SurfaceSizes;
use undula::data_structures::color::Color;
use undula::data_structures::scene::{
    DISPLACEMENT_BASE, DISPLACEMENT_PER_PIXEL, PointerState, ROTATION_RATE, Scene,
};
use undula::panel::Panel;

#[test]
fn rotation_tracks_elapsed_time() {
    let mut scene = Scene::new(1.0);
    let pointer = PointerState::default();

    let mut previous = f32::MIN;
    for t in [0.0_f32, 0.016, 0.5, 1.0, 60.0, 3600.0] {
        scene.advance(t, &pointer);
        let expected = ROTATION_RATE * t;
        assert!((scene.mesh.rotation.z - expected).abs() <= f32::EPSILON * t.max(1.0));
        assert!(scene.mesh.rotation.z >= previous);
        previous = scene.mesh.rotation.z;
    }
}

#[test]
fn displacement_matches_the_formula_each_frame() {
    let mut scene = Scene::new(1.0);

    for (elapsed, y) in [(0.0_f32, 0.0_f64), (1.0, 240.0), (500.0, 240.0), (2.0, 1080.0)] {
        let pointer = PointerState { last_y: y };
        scene.advance(elapsed, &pointer);
        assert_eq!(
            scene.mesh.material.displacement_scale,
            DISPLACEMENT_BASE + y as f32 * DISPLACEMENT_PER_PIXEL
        );
    }
}

#[test]
fn resize_is_idempotent() {
    let mut sizes = SurfaceSizes::new(640, 480, 1.0);
    assert!(sizes.apply(1920, 1080, 2.0));

    let extent = sizes.surface_extent();
    let aspect = sizes.aspect();

    assert!(!sizes.apply(1920, 1080, 2.0));
    assert_eq!(sizes.surface_extent(), extent);
    assert_eq!(sizes.aspect(), aspect);
}

#[test]
fn pixel_ratio_never_exceeds_two() {
    for (dpr, expected) in [(1.0, 1.0), (2.0, 2.0), (3.0, 2.0)] {
        assert_eq!(SurfaceSizes::new(800, 600, dpr).applied_ratio(), expected);
    }
}

#[test]
fn color_picker_is_a_conduit_into_the_light_only() {
    let mut scene = Scene::new(1.0);
    let mut panel = Panel::new(&scene);

    let light_position = scene.light.position;
    let rotation = scene.mesh.rotation;

    panel.commit_color(&mut scene, "#ff0000");

    assert_eq!(scene.light.color, Color::from_hex("#ff0000").unwrap());
    assert_eq!(scene.light.position, light_position);
    assert_eq!(scene.mesh.rotation, rotation);
}

#[test]
fn setup_always_yields_one_of_each_scene_object() {
    // Setup is re-entrant in the sense that running it again builds a fresh
    // scene with the same cardinality; a scene never accumulates objects.
    for _ in 0..3 {
        let scene = Scene::new(16.0 / 9.0);
        assert_eq!(scene.mesh.geometry.vertices.len(), 65 * 65);
        assert_eq!(scene.light.intensity, 50.0);
        assert_eq!(scene.camera.zfar, 100.0);
    }
}
