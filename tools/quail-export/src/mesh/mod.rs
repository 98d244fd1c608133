//! Geometry builder (vertices + triangles -> indexed mesh with draw groups)

mod groups;
mod packing;
mod types;

use quail_shared::{Triangle, Vertex};

use crate::error::GeometryError;
use crate::material::SlotMap;

// Re-export public API
pub use packing::PackedVertex;
pub use types::{Bounds, DrawGroup, Geometry};

/// Build renderer-ready geometry.
///
/// Each vertex contributes one entry to every attribute buffer and each
/// triangle three consecutive indices, both in input order. Triangles are
/// partitioned into draw groups by material run.
pub fn build(
    vertices: &[Vertex],
    triangles: &[Triangle],
    slots: &SlotMap,
) -> Result<Geometry, GeometryError> {
    let mut positions = Vec::with_capacity(vertices.len() * 3);
    let mut normals = Vec::with_capacity(vertices.len() * 3);
    let mut uvs = Vec::with_capacity(vertices.len() * 2);

    for vertex in vertices {
        positions.extend_from_slice(&vertex.position);
        normals.extend_from_slice(&vertex.normal);
        uvs.extend_from_slice(&vertex.uv);
    }

    let mut indices = Vec::with_capacity(triangles.len() * 3);
    for (i, triangle) in triangles.iter().enumerate() {
        if let Some(&index) = triangle
            .indices
            .iter()
            .find(|&&index| index as usize >= vertices.len())
        {
            return Err(GeometryError::IndexOutOfRange {
                triangle: i,
                index,
                vertex_count: vertices.len(),
            });
        }
        indices.extend_from_slice(&triangle.indices);
    }

    let groups = groups::material_runs(triangles, slots);

    tracing::debug!(
        "Built geometry: {} vertices, {} triangles, {} draw groups",
        vertices.len(),
        triangles.len(),
        groups.len()
    );

    Ok(Geometry {
        positions,
        normals,
        uvs,
        indices,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Vertex> {
        vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        ]
    }

    fn slots(names: &[&str]) -> SlotMap {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect()
    }

    #[test]
    fn test_buffers_follow_input_order() {
        let triangles = vec![
            Triangle::new([0, 1, 2], "skin"),
            Triangle::new([2, 3, 0], "skin"),
        ];
        let geometry = build(&quad(), &triangles, &slots(&["skin"])).unwrap();

        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.triangle_count(), 2);
        assert_eq!(&geometry.positions[3..6], &[1.0, 0.0, 0.0]);
        assert_eq!(&geometry.normals[9..12], &[0.0, 0.0, 1.0]);
        assert_eq!(&geometry.uvs[4..6], &[1.0, 1.0]);
        assert_eq!(geometry.indices, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn test_single_material_is_one_group() {
        let s = slots(&["hair", "skin"]);
        let triangles = vec![
            Triangle::new([0, 1, 2], "skin"),
            Triangle::new([2, 3, 0], "skin"),
        ];
        let geometry = build(&quad(), &triangles, &s).unwrap();

        assert_eq!(
            geometry.groups,
            vec![DrawGroup {
                index_offset: 0,
                triangle_count: 2,
                material_slot: s["skin"],
            }]
        );
    }

    #[test]
    fn test_index_out_of_range_is_fatal() {
        let triangles = vec![
            Triangle::new([0, 1, 2], "skin"),
            Triangle::new([2, 4, 0], "skin"),
        ];
        let err = build(&quad(), &triangles, &slots(&["skin"])).unwrap_err();
        assert_eq!(
            err,
            GeometryError::IndexOutOfRange {
                triangle: 1,
                index: 4,
                vertex_count: 4,
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let geometry = build(&[], &[], &SlotMap::new()).unwrap();
        assert!(geometry.groups.is_empty());
        assert!(geometry.indices.is_empty());
        assert!(geometry.bounds().is_none());
    }
}
