//! Static quad geometry shared by every filter program
//!
//! One vertex buffer (4 vertices) and one index buffer (2 triangles) describe
//! a full-screen quad. Every filter consumes the same attribute layout —
//! position at location 0, texture coordinate at location 1 — so the buffers
//! are created once and never mutated.

use wgpu::util::DeviceExt;

/// A single quad vertex: position plus texture coordinate.
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
pub struct Vertex {
    /// Position in normalized device coordinates
    pub position: [f32; 3],
    /// Texture coordinate into the source image
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Vertex attribute descriptors shared by all filter pipelines
    const ATTRIBUTES: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    /// Complete vertex buffer layout descriptor
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: Self::ATTRIBUTES,
        array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
    };
}

/// Full-screen quad vertices from (-1,-1) to (1,1), texture coordinates
/// oriented so the image appears upright.
pub const QUAD_VERTICES: &[Vertex] = &[
    Vertex {
        position: [-1.0, 1.0, 0.0], // Top-left
        tex_coord: [0.0, 0.0],
    },
    Vertex {
        position: [-1.0, -1.0, 0.0], // Bottom-left
        tex_coord: [0.0, 1.0],
    },
    Vertex {
        position: [1.0, -1.0, 0.0], // Bottom-right
        tex_coord: [1.0, 1.0],
    },
    Vertex {
        position: [1.0, 1.0, 0.0], // Top-right
        tex_coord: [1.0, 0.0],
    },
];

/// Two triangles covering the quad
pub const QUAD_INDICES: &[u16] = &[0, 1, 3, 1, 2, 3];

/// Creates the static vertex and index buffers for the quad.
///
/// Called once at setup; the buffers are read-only afterwards.
pub fn create_quad_buffers(device: &wgpu::Device) -> (wgpu::Buffer, wgpu::Buffer) {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Quad vertex buffer"),
        usage: wgpu::BufferUsages::VERTEX,
        contents: bytemuck::cast_slice(QUAD_VERTICES),
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Quad index buffer"),
        usage: wgpu::BufferUsages::INDEX,
        contents: bytemuck::cast_slice(QUAD_INDICES),
    });

    (vertex_buffer, index_buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_shape() {
        assert_eq!(QUAD_VERTICES.len(), 4);
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(Vertex::LAYOUT.array_stride, 20);
        assert_eq!(Vertex::LAYOUT.attributes.len(), 2);
    }

    #[test]
    fn test_tex_coords_cover_unit_square() {
        let us: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.tex_coord[0]).collect();
        let vs: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.tex_coord[1]).collect();
        assert!(us.contains(&0.0) && us.contains(&1.0));
        assert!(vs.contains(&0.0) && vs.contains(&1.0));
    }
}
