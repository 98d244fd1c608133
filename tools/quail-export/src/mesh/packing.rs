//! Interleaved vertex layout

use bytemuck::{Pod, Zeroable};

use super::types::Geometry;

/// One interleaved vertex: position, normal, uv (32 bytes)
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PackedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl PackedVertex {
    pub const STRIDE: usize = std::mem::size_of::<Self>();
}

impl Geometry {
    /// Interleave the attribute buffers, one record per vertex.
    pub fn interleaved(&self) -> Vec<PackedVertex> {
        self.positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .zip(self.uvs.chunks_exact(2))
            .map(|((p, n), uv)| PackedVertex {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
                uv: [uv[0], uv[1]],
            })
            .collect()
    }

    /// Interleaved vertex data as raw bytes (native endianness), ready for upload.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }

    /// Index buffer as raw bytes (native endianness).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
