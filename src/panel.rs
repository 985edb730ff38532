//! The tuning panel: live editing of light and rotation values.
//!
//! Bindings are explicit descriptors — label, bounds, step and a pair of
//! plain function pointers — so the panel never holds field aliases and the
//! conduit stays testable without spinning up a UI. Each control captures its
//! displayed value once when the panel is built and is a one-way conduit into
//! the scene afterwards: external changes to a bound field are not read back.

use std::f32::consts::TAU;

use crate::data_structures::{color::Color, scene::Scene};

/// A numeric control over a single scene field.
pub struct SliderBinding {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: Option<f64>,
    value: f32,
    read: fn(&Scene) -> f32,
    write: fn(&mut Scene, f32),
}

impl SliderBinding {
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Push a new value through to the bound field.
    pub fn commit(&mut self, scene: &mut Scene, value: f32) {
        self.value = value;
        (self.write)(scene, value);
    }
}

/// The color picker binding. Its displayed value is its own state,
/// deliberately initialized independently of the light's actual color: the
/// picker shows blue until first touched.
pub struct ColorBinding {
    pub label: &'static str,
    hex: String,
    write: fn(&mut Scene, Color),
}

impl ColorBinding {
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// The change event: parse the picker's hex string and overwrite the
    /// bound color field. Malformed input leaves both sides untouched.
    pub fn commit(&mut self, scene: &mut Scene, hex: &str) {
        match Color::from_hex(hex) {
            Ok(color) => {
                self.hex = hex.to_string();
                (self.write)(scene, color);
            }
            Err(err) => log::warn!("ignoring malformed color {:?}: {}", hex, err),
        }
    }
}

/// The floating panel over the scene.
pub struct Panel {
    sliders: Vec<SliderBinding>,
    color: ColorBinding,
}

impl Panel {
    /// Build the bindings: mesh rotation-X over one turn, the light position
    /// over ±3 with a 0.01 step, and the color picker starting on literal
    /// blue regardless of the light's actual color.
    pub fn new(scene: &Scene) -> Self {
        let mut sliders = vec![
            SliderBinding {
                label: "rotationX",
                min: 0.0,
                max: TAU,
                step: None,
                value: 0.0,
                read: |scene| scene.mesh.rotation.x,
                write: |scene, value| scene.mesh.rotation.x = value,
            },
            SliderBinding {
                label: "lightX",
                min: -3.0,
                max: 3.0,
                step: Some(0.01),
                value: 0.0,
                read: |scene| scene.light.position.x,
                write: |scene, value| scene.light.position.x = value,
            },
            SliderBinding {
                label: "lightY",
                min: -3.0,
                max: 3.0,
                step: Some(0.01),
                value: 0.0,
                read: |scene| scene.light.position.y,
                write: |scene, value| scene.light.position.y = value,
            },
            SliderBinding {
                label: "lightZ",
                min: -3.0,
                max: 3.0,
                step: Some(0.01),
                value: 0.0,
                read: |scene| scene.light.position.z,
                write: |scene, value| scene.light.position.z = value,
            },
        ];
        // The one read of each bound field: capturing the displayed value.
        for slider in &mut sliders {
            slider.value = (slider.read)(scene);
        }

        let color = ColorBinding {
            label: "lightColor",
            hex: "#0000ff".to_string(),
            write: |scene, color| scene.light.color = color,
        };

        Self { sliders, color }
    }

    pub fn sliders(&self) -> &[SliderBinding] {
        &self.sliders
    }

    pub fn color(&self) -> &ColorBinding {
        &self.color
    }

    /// Trigger the color picker's change event with a literal value.
    pub fn commit_color(&mut self, scene: &mut Scene, hex: &str) {
        self.color.commit(scene, hex);
    }

    /// Draw the panel and route any edits into the scene.
    pub fn ui(&mut self, ctx: &egui::Context, scene: &mut Scene) {
        egui::Window::new("Tuning")
            .default_width(220.0)
            .show(ctx, |ui| {
                for binding in &mut self.sliders {
                    let mut value = binding.value;
                    let mut slider =
                        egui::Slider::new(&mut value, binding.min..=binding.max).text(binding.label);
                    if let Some(step) = binding.step {
                        slider = slider.step_by(step);
                    }
                    if ui.add(slider).changed() {
                        binding.commit(scene, value);
                    }
                }

                ui.separator();
                let mut rgb = Color::from_hex(&self.color.hex)
                    .map(Color::to_u8)
                    .unwrap_or([0, 0, 255]);
                ui.horizontal(|ui| {
                    ui.label(self.color.label);
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        let hex = Color::from_u8(rgb[0], rgb[1], rgb[2]).to_hex();
                        self.color.commit(scene, &hex);
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::scene::INITIAL_TILT;

    #[test]
    fn bindings_declare_the_documented_bounds() {
        let scene = Scene::new(1.0);
        let panel = Panel::new(&scene);
        let sliders = panel.sliders();

        assert_eq!(sliders[0].label, "rotationX");
        assert_eq!((sliders[0].min, sliders[0].max), (0.0, TAU));
        assert_eq!(sliders[0].step, None);

        for (slider, label) in sliders[1..].iter().zip(["lightX", "lightY", "lightZ"]) {
            assert_eq!(slider.label, label);
            assert_eq!((slider.min, slider.max), (-3.0, 3.0));
            assert_eq!(slider.step, Some(0.01));
        }
    }

    #[test]
    fn sliders_capture_values_at_bind_time_only() {
        let mut scene = Scene::new(1.0);
        let panel = Panel::new(&scene);
        assert_eq!(panel.sliders()[0].value(), INITIAL_TILT);

        // External mutation is not read back.
        scene.mesh.rotation.x = 1.0;
        assert_eq!(panel.sliders()[0].value(), INITIAL_TILT);
    }

    #[test]
    fn slider_commit_writes_exactly_one_field() {
        let mut scene = Scene::new(1.0);
        let mut panel = Panel::new(&scene);
        let light_before = scene.light.clone();

        panel.sliders[0].commit(&mut scene, 1.25);
        assert_eq!(scene.mesh.rotation.x, 1.25);
        assert_eq!(scene.light.position, light_before.position);
        assert_eq!(scene.light.color, light_before.color);

        panel.sliders[3].commit(&mut scene, -2.5);
        assert_eq!(scene.light.position.z, -2.5);
        assert_eq!(scene.light.position.x, light_before.position.x);
        assert_eq!(scene.mesh.rotation.x, 1.25);
    }

    #[test]
    fn sliders_do_not_clamp_the_underlying_field() {
        let mut scene = Scene::new(1.0);
        let mut panel = Panel::new(&scene);
        // Bounds are a UI affordance; programmatic commits pass through.
        panel.sliders[1].commit(&mut scene, 12.0);
        assert_eq!(scene.light.position.x, 12.0);
    }

    #[test]
    fn color_picker_starts_on_blue_not_the_light_color() {
        let scene = Scene::new(1.0);
        let panel = Panel::new(&scene);
        assert_eq!(panel.color().hex(), "#0000ff");
        assert_ne!(panel.color().hex(), scene.light.color.to_hex());
    }

    #[test]
    fn color_change_event_updates_only_the_light_color() {
        let mut scene = Scene::new(1.0);
        let mut panel = Panel::new(&scene);
        let light_position = scene.light.position;
        let light_intensity = scene.light.intensity;
        let rotation = scene.mesh.rotation;
        let displacement = scene.mesh.material.displacement_scale;

        panel.commit_color(&mut scene, "#ff0000");

        assert_eq!(scene.light.color, Color::from_hex("#ff0000").unwrap());
        assert_eq!(panel.color().hex(), "#ff0000");
        assert_eq!(scene.light.position, light_position);
        assert_eq!(scene.light.intensity, light_intensity);
        assert_eq!(scene.mesh.rotation, rotation);
        assert_eq!(scene.mesh.material.displacement_scale, displacement);
    }

    #[test]
    fn malformed_color_is_ignored() {
        let mut scene = Scene::new(1.0);
        let mut panel = Panel::new(&scene);
        let before = scene.light.color;

        panel.commit_color(&mut scene, "not-a-color");

        assert_eq!(scene.light.color, before);
        assert_eq!(panel.color().hex(), "#0000ff");
    }
}
