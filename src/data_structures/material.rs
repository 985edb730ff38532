use crate::data_structures::color::Color;
use crate::resources::{LoadState, TextureKind};

/// Material state for the relief plane.
///
/// Holds parameters and per-slot load state only; the GPU textures and bind
/// groups live with [`crate::render::ReliefRender`]. `displacement_scale` is
/// the one field rewritten every frame.
#[derive(Clone, Debug)]
pub struct Material {
    pub base_color: Color,
    /// Scale applied to the height map when displacing vertices.
    pub displacement_scale: f32,
    pub transparent: bool,
    /// When false the plane draws regardless of the depth buffer contents,
    /// which makes the result order-dependent. Intentional.
    pub depth_test: bool,
    pub color_map: LoadState,
    pub height_map: LoadState,
    pub alpha_map: LoadState,
}

impl Material {
    /// The relief material: gray tint, transparency on, depth test off, all
    /// three texture slots pending.
    pub fn relief() -> Self {
        Self {
            base_color: Color::new(0.5, 0.5, 0.5),
            displacement_scale: 0.4,
            transparent: true,
            depth_test: false,
            color_map: LoadState::Pending,
            height_map: LoadState::Pending,
            alpha_map: LoadState::Pending,
        }
    }

    pub fn slot(&self, kind: TextureKind) -> LoadState {
        match kind {
            TextureKind::Color => self.color_map,
            TextureKind::Height => self.height_map,
            TextureKind::Alpha => self.alpha_map,
        }
    }

    pub fn slot_mut(&mut self, kind: TextureKind) -> &mut LoadState {
        match kind {
            TextureKind::Color => &mut self.color_map,
            TextureKind::Height => &mut self.height_map,
            TextureKind::Alpha => &mut self.alpha_map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relief_material_defaults() {
        let material = Material::relief();
        assert_eq!(material.base_color, Color::new(0.5, 0.5, 0.5));
        assert_eq!(material.displacement_scale, 0.4);
        assert!(material.transparent);
        assert!(!material.depth_test);
    }

    #[test]
    fn slots_start_pending_and_resolve_independently() {
        let mut material = Material::relief();
        for kind in TextureKind::ALL {
            assert_eq!(material.slot(kind), LoadState::Pending);
        }

        *material.slot_mut(TextureKind::Height) = LoadState::Loaded;
        *material.slot_mut(TextureKind::Alpha) = LoadState::Failed;

        assert_eq!(material.slot(TextureKind::Color), LoadState::Pending);
        assert_eq!(material.slot(TextureKind::Height), LoadState::Loaded);
        assert_eq!(material.slot(TextureKind::Alpha), LoadState::Failed);
    }
}
