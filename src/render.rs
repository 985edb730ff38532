//! GPU resources and the draw call for the relief plane.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{scene::Mesh, texture::Texture},
    pipelines::relief,
    resources::TextureKind,
    uniforms::MeshUniform,
};

/// Everything the plane needs on the GPU: vertex and index buffers, the mesh
/// uniform, the three material texture slots and the pipeline.
///
/// Texture slots start as 1x1 placeholders (white albedo, zero height, opaque
/// alpha) and are swapped in place as loads complete; the bind group is
/// rebuilt on each swap.
pub struct ReliefRender {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
    uniform: MeshUniform,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    color_map: Texture,
    height_map: Texture,
    alpha_map: Texture,
    texture_layout: wgpu::BindGroupLayout,
    texture_bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl ReliefRender {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
        mesh: &Mesh,
    ) -> Self {
        let geometry = &mesh.geometry;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Plane Vertex Buffer"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Plane Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = MeshUniform::from_mesh(mesh);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &relief::mesh_uniform_layout(device),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("mesh_uniform_bind_group"),
        });

        let color_map = Texture::solid(device, queue, [255, 255, 255, 255], "color map placeholder");
        let height_map = Texture::solid(device, queue, [0, 0, 0, 255], "height map placeholder");
        let alpha_map = Texture::solid(device, queue, [255, 255, 255, 255], "alpha map placeholder");

        let texture_layout = relief::material_texture_layout(device);
        let texture_bind_group =
            mk_texture_bind_group(device, &texture_layout, &color_map, &height_map, &alpha_map);

        let pipeline = relief::mk_relief_pipeline(
            device,
            config,
            camera_bind_group_layout,
            light_bind_group_layout,
            mesh.material.depth_test,
        );

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: geometry.indices.len() as u32,
            uniform,
            uniform_buffer,
            uniform_bind_group,
            color_map,
            height_map,
            alpha_map,
            texture_layout,
            texture_bind_group,
            pipeline,
        }
    }

    /// Swap a loaded texture into its slot and rebuild the bind group.
    pub fn bind_texture(&mut self, device: &wgpu::Device, kind: TextureKind, texture: Texture) {
        match kind {
            TextureKind::Color => self.color_map = texture,
            TextureKind::Height => self.height_map = texture,
            TextureKind::Alpha => self.alpha_map = texture,
        }
        self.texture_bind_group = mk_texture_bind_group(
            device,
            &self.texture_layout,
            &self.color_map,
            &self.height_map,
            &self.alpha_map,
        );
    }

    /// Push the mesh's current transform and material parameters to the GPU.
    pub fn update(&mut self, queue: &wgpu::Queue, mesh: &Mesh) {
        self.uniform = MeshUniform::from_mesh(mesh);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.texture_bind_group, &[]);
        render_pass.set_bind_group(1, camera_bind_group, &[]);
        render_pass.set_bind_group(2, light_bind_group, &[]);
        render_pass.set_bind_group(3, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}

fn mk_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    color_map: &Texture,
    height_map: &Texture,
    alpha_map: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&color_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&color_map.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&height_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(&height_map.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::TextureView(&alpha_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 5,
                resource: wgpu::BindingResource::Sampler(&alpha_map.sampler),
            },
        ],
        label: Some("relief_texture_bind_group"),
    })
}
