//! Plain-old-data uniform blocks shared with `relief.wgsl`, and the GPU
//! resources wrapping the light block.

use wgpu::util::DeviceExt;

use crate::data_structures::scene::{Mesh, PointLight};

/// Point light block. Uniforms require 16 byte (4 float) spacing, so the
/// intensity rides in the padding slot after the position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub _padding: f32,
}

impl LightUniform {
    pub fn from_light(light: &PointLight) -> Self {
        Self {
            position: light.position.into(),
            intensity: light.intensity,
            color: light.color.into(),
            _padding: 0.0,
        }
    }
}

/// Per-mesh block: model matrix, base tint and the displacement scale.
///
/// Rewritten every frame, since the rotation and the displacement scale are
/// the two animated fields.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    pub displacement_scale: f32,
    pub _padding: [f32; 3],
}

impl MeshUniform {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let tint = mesh.material.base_color;
        Self {
            model: mesh.model_matrix().into(),
            base_color: [tint.r, tint.g, tint.b, 1.0],
            displacement_scale: mesh.material.displacement_scale,
            _padding: [0.0; 3],
        }
    }
}

/// Light GPU resources: the uniform, its buffer and bind group.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("light_bind_group_layout"),
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Push the scene's current light state to the GPU. The panel mutates the
    /// light directly, so this runs every frame.
    pub fn update(&mut self, queue: &wgpu::Queue, light: &PointLight) {
        self.uniform = LightUniform::from_light(light);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::color::Color;
    use crate::data_structures::scene::Scene;
    use cgmath::Vector3;

    #[test]
    fn light_uniform_mirrors_the_light() {
        let light = PointLight::new(Vector3::new(0.0, 0.0, 1.15), Color::from_u8(0x53, 0xaa, 0xd9), 50.0);
        let uniform = LightUniform::from_light(&light);
        assert_eq!(uniform.position, [0.0, 0.0, 1.15]);
        assert_eq!(uniform.intensity, 50.0);
        let expected: [f32; 3] = light.color.into();
        assert_eq!(uniform.color, expected);
    }

    #[test]
    fn mesh_uniform_carries_the_animated_fields() {
        let mut scene = Scene::new(1.0);
        scene.mesh.material.displacement_scale = 0.62;
        let uniform = MeshUniform::from_mesh(&scene.mesh);
        assert_eq!(uniform.displacement_scale, 0.62);
        assert_eq!(uniform.base_color, [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn uniform_blocks_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<LightUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<MeshUniform>() % 16, 0);
    }
}
