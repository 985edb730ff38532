//! The scene: one camera, one point light, one mesh, and the per-frame
//! update that animates two of their fields.

use cgmath::{Deg, Matrix4, Point3, Rad, Vector3};

use crate::data_structures::{color::Color, material::Material, plane::PlaneGeometry};

/// How fast the plane spins around Z, in radians per second.
pub const ROTATION_RATE: f32 = 0.5;
/// Base displacement applied before the pointer contribution.
pub const DISPLACEMENT_BASE: f32 = 0.3;
/// Displacement added per physical pixel of pointer height. The pointer value
/// is unnormalized, so the felt range depends on the viewport height.
pub const DISPLACEMENT_PER_PIXEL: f32 = 0.0008;
/// The scene tilts the plane around X by this literal amount of radians, far
/// outside one turn and outside the panel slider's range. See DESIGN.md.
pub const INITIAL_TILT: f32 = 181.0;

/// World extent of the plane, both axes.
pub const PLANE_SIZE: f32 = 3.0;
/// Subdivision of the plane, both axes.
pub const PLANE_SEGMENTS: u32 = 64;

/// Last observed vertical cursor position, in physical pixels.
///
/// Written by the cursor-move handler, read once per frame by
/// [`Scene::advance`]. Passed by reference rather than kept in a global so
/// the frame update stays a pure function of its inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub last_y: f64,
}

/// A perspective camera fixed in front of the plane, looking at the origin.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            fovy: Deg(75.0),
            aspect,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    /// Recomputed on every viewport resize; nothing else ever touches it.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, Point3::new(0.0, 0.0, 0.0), Vector3::unit_y())
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// A point light with a position, a color and an intensity.
///
/// Position and color are mutated through the panel at any time; slider
/// bounds over there are a UI affordance, not a constraint on these fields.
#[derive(Clone, Debug)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: Color,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vector3<f32>, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }
}

/// The relief plane: grid geometry, Euler rotation and material state.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: PlaneGeometry,
    /// Euler rotation in radians, applied X, then Y, then Z.
    pub rotation: Vector3<f32>,
    pub material: Material,
}

impl Mesh {
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_x(Rad(self.rotation.x))
    }
}

/// The root container: exactly one camera, one point light and one mesh for
/// the lifetime of the process. There is no API to add or remove objects,
/// which is what enforces the cardinality invariant.
#[derive(Clone, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub light: PointLight,
    pub mesh: Mesh,
}

impl Scene {
    /// Assemble the scene: the subdivided plane with its relief material and
    /// X tilt, the `#53aad9` point light just in front of it, and the camera
    /// three units back.
    pub fn new(aspect: f32) -> Self {
        Self {
            camera: Camera::new(aspect),
            light: PointLight::new(
                Vector3::new(0.0, 0.0, 1.15),
                Color::from_u8(0x53, 0xaa, 0xd9),
                50.0,
            ),
            mesh: Mesh {
                geometry: PlaneGeometry::new(PLANE_SIZE, PLANE_SIZE, PLANE_SEGMENTS, PLANE_SEGMENTS),
                rotation: Vector3::new(INITIAL_TILT, 0.0, 0.0),
                material: Material::relief(),
            },
        }
    }

    /// The per-frame update: spin the plane and rescale the displacement from
    /// the pointer height. Everything else in the scene is only ever mutated
    /// through the panel.
    pub fn advance(&mut self, elapsed_secs: f32, pointer: &PointerState) {
        self.mesh.rotation.z = ROTATION_RATE * elapsed_secs;
        self.mesh.material.displacement_scale =
            DISPLACEMENT_BASE + pointer.last_y as f32 * DISPLACEMENT_PER_PIXEL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_linear_in_elapsed_time() {
        let mut scene = Scene::new(1.0);
        let pointer = PointerState::default();
        for t in [0.0_f32, 0.25, 1.0, 10.0, 3600.0] {
            scene.advance(t, &pointer);
            assert!((scene.mesh.rotation.z - 0.5 * t).abs() <= f32::EPSILON * t.max(1.0));
        }
    }

    #[test]
    fn rotation_never_decreases_with_time() {
        let mut scene = Scene::new(1.0);
        let pointer = PointerState::default();
        let mut previous = -1.0;
        for t in [0.0_f32, 0.1, 0.5, 2.0, 100.0] {
            scene.advance(t, &pointer);
            assert!(scene.mesh.rotation.z >= previous);
            previous = scene.mesh.rotation.z;
        }
    }

    #[test]
    fn displacement_follows_the_pointer_exactly() {
        let mut scene = Scene::new(1.0);
        for y in [0.0_f64, 1.0, 250.0, 719.0, 1080.0] {
            let pointer = PointerState { last_y: y };
            scene.advance(42.0, &pointer);
            assert_eq!(
                scene.mesh.material.displacement_scale,
                DISPLACEMENT_BASE + y as f32 * DISPLACEMENT_PER_PIXEL
            );
        }
    }

    #[test]
    fn displacement_is_independent_of_elapsed_time() {
        let mut scene = Scene::new(1.0);
        let pointer = PointerState { last_y: 512.0 };
        scene.advance(1.0, &pointer);
        let first = scene.mesh.material.displacement_scale;
        scene.advance(9999.0, &pointer);
        assert_eq!(scene.mesh.material.displacement_scale, first);
    }

    #[test]
    fn setup_yields_one_camera_one_light_one_mesh() {
        // Cardinality holds by construction: the scene has exactly these
        // three owned fields and no add/remove API. Re-running setup builds a
        // fresh scene with the same shape.
        for _ in 0..2 {
            let scene = Scene::new(16.0 / 9.0);
            assert_eq!(scene.mesh.geometry.vertices.len(), 65 * 65);
            assert_eq!(scene.camera.fovy, Deg(75.0));
            assert_eq!(scene.light.intensity, 50.0);
        }
    }

    #[test]
    fn initial_scene_values() {
        let scene = Scene::new(1.0);
        assert_eq!(scene.mesh.rotation, Vector3::new(INITIAL_TILT, 0.0, 0.0));
        assert_eq!(scene.light.position, Vector3::new(0.0, 0.0, 1.15));
        assert_eq!(scene.light.color.to_hex(), "#53aad9");
        assert_eq!(scene.camera.position, Point3::new(0.0, 0.0, 3.0));
        assert_eq!(scene.camera.znear, 0.1);
        assert_eq!(scene.camera.zfar, 100.0);
    }

    #[test]
    fn aspect_is_the_only_camera_field_resize_touches() {
        let mut scene = Scene::new(1.0);
        let before = scene.camera.clone();
        scene.camera.set_aspect(2.5);
        assert_eq!(scene.camera.aspect, 2.5);
        assert_eq!(scene.camera.position, before.position);
        assert_eq!(scene.camera.fovy, before.fovy);
        assert_eq!(scene.camera.znear, before.znear);
        assert_eq!(scene.camera.zfar, before.zfar);
    }
}
