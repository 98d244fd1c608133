//! Partitioning of the triangle stream into material runs

use quail_shared::Triangle;

use super::types::DrawGroup;
use crate::material::SlotMap;

/// Split `triangles` into maximal runs of equal material name.
///
/// The name of the previous triangle is tracked; a run is closed only once
/// the following triangle carries a different name, and its slot is looked
/// up from the name recorded when the run began. Material runs are assumed
/// to be contiguous in the input: a name that reappears later starts a new
/// group rather than extending the earlier one.
pub(crate) fn material_runs(triangles: &[Triangle], slots: &SlotMap) -> Vec<DrawGroup> {
    let mut groups = Vec::new();
    let mut run_start = 0;
    let mut run_material: Option<&str> = None;

    for (i, triangle) in triangles.iter().enumerate() {
        match run_material {
            Some(name) if name == triangle.material => {}
            Some(name) => {
                groups.push(close_run(run_start, i, name, slots));
                run_start = i;
                run_material = Some(&triangle.material);
            }
            None => run_material = Some(&triangle.material),
        }
    }

    if let Some(name) = run_material {
        groups.push(close_run(run_start, triangles.len(), name, slots));
    }

    groups
}

fn close_run(start: usize, end: usize, material: &str, slots: &SlotMap) -> DrawGroup {
    DrawGroup {
        index_offset: start * 3,
        triangle_count: end - start,
        material_slot: resolve_slot(material, slots),
    }
}

/// Names missing from the slot map resolve to slot 0.
fn resolve_slot(material: &str, slots: &SlotMap) -> usize {
    match slots.get(material) {
        Some(&slot) => slot,
        None => {
            tracing::warn!("Triangle material '{}' has no slot, using slot 0", material);
            0
        }
    }
}
