//! The subdivided flat grid the whole demo renders.

/// A vertex of the plane grid: position, texture coordinates and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

/// Describes a vertex buffer layout for the render pipeline.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

impl Vertex for PlaneVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<PlaneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A flat grid in the XY plane facing +Z, centered on the origin.
///
/// `segments_x` by `segments_y` cells, two triangles each. Texture
/// coordinates span the full quad with v flipped for the wgpu coordinate
/// system, so the height map displaces the grid the same way it would texture
/// it.
#[derive(Clone, Debug)]
pub struct PlaneGeometry {
    pub width: f32,
    pub height: f32,
    pub segments_x: u32,
    pub segments_y: u32,
    pub vertices: Vec<PlaneVertex>,
    pub indices: Vec<u32>,
}

impl PlaneGeometry {
    pub fn new(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let cols = segments_x + 1;
        let rows = segments_y + 1;

        let mut vertices = Vec::with_capacity((cols * rows) as usize);
        for y in 0..rows {
            for x in 0..cols {
                let u = x as f32 / segments_x as f32;
                let v = y as f32 / segments_y as f32;
                vertices.push(PlaneVertex {
                    position: [(u - 0.5) * width, (v - 0.5) * height, 0.0],
                    tex_coords: [u, 1.0 - v],
                    normal: [0.0, 0.0, 1.0],
                });
            }
        }

        // Two counter-clockwise triangles per cell, as seen from +Z.
        let mut indices = Vec::with_capacity((segments_x * segments_y * 6) as usize);
        for y in 0..segments_y {
            for x in 0..segments_x {
                let i = y * cols + x;
                indices.extend_from_slice(&[i, i + 1, i + cols, i + 1, i + cols + 1, i + cols]);
            }
        }

        Self {
            width,
            height,
            segments_x,
            segments_y,
            vertices,
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_counts_match_subdivision() {
        let plane = PlaneGeometry::new(3.0, 3.0, 64, 64);
        assert_eq!(plane.vertices.len(), 65 * 65);
        assert_eq!(plane.indices.len(), 64 * 64 * 6);
    }

    #[test]
    fn indices_stay_in_bounds() {
        let plane = PlaneGeometry::new(2.0, 1.0, 4, 3);
        let count = plane.vertices.len() as u32;
        assert!(plane.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn positions_span_the_requested_extent() {
        let plane = PlaneGeometry::new(3.0, 3.0, 8, 8);
        for v in &plane.vertices {
            assert!(v.position[0] >= -1.5 && v.position[0] <= 1.5);
            assert!(v.position[1] >= -1.5 && v.position[1] <= 1.5);
            assert_eq!(v.position[2], 0.0);
        }
        let xs: Vec<f32> = plane.vertices.iter().map(|v| v.position[0]).collect();
        assert!(xs.contains(&-1.5) && xs.contains(&1.5));
    }

    #[test]
    fn tex_coords_cover_the_unit_square() {
        let plane = PlaneGeometry::new(3.0, 3.0, 4, 4);
        for v in &plane.vertices {
            assert!((0.0..=1.0).contains(&v.tex_coords[0]));
            assert!((0.0..=1.0).contains(&v.tex_coords[1]));
        }
    }

    #[test]
    fn normals_face_forward() {
        let plane = PlaneGeometry::new(3.0, 3.0, 2, 2);
        assert!(plane.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
