//! Types for mesh conversion

use glam::Vec3;

/// A contiguous run of triangles in the index buffer sharing one material slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawGroup {
    /// Offset of the run's first index in the index buffer
    pub index_offset: usize,
    pub triangle_count: usize,
    pub material_slot: usize,
}

impl DrawGroup {
    pub fn index_count(&self) -> usize {
        self.triangle_count * 3
    }

    pub fn first_triangle(&self) -> usize {
        self.index_offset / 3
    }

    /// One past the run's last index
    pub fn index_end(&self) -> usize {
        self.index_offset + self.index_count()
    }
}

/// Axis-aligned bounds of the vertex positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Result of geometry conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Flattened xyz per vertex
    pub positions: Vec<f32>,
    /// Flattened xyz per vertex
    pub normals: Vec<f32>,
    /// Flattened uv per vertex
    pub uvs: Vec<f32>,
    /// Three indices per triangle
    pub indices: Vec<u32>,
    /// Draw groups in ascending index order
    pub groups: Vec<DrawGroup>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[vertex * 3..vertex * 3 + 3])
    }

    /// `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.positions.chunks_exact(3).map(Vec3::from_slice);
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Bounds { min, max })
    }
}
