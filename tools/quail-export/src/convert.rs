//! Whole-model conversion
//!
//! Runs the material binder, the geometry builder and (for models with
//! bones) the skeleton builder over one parsed model.

use quail_shared::{Model, TextureSource};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::material::{self, MaterialTable, SlotMap};
use crate::mesh::{self, Geometry};
use crate::skeleton::{self, Skeleton};

/// Result of converting one model
#[derive(Debug, Clone)]
pub struct ConvertedModel {
    pub name: String,
    pub geometry: Geometry,
    pub materials: MaterialTable,
    pub slots: SlotMap,
    /// Present when the model has bones
    pub skeleton: Option<Skeleton>,
}

impl ConvertedModel {
    pub fn is_skinned(&self) -> bool {
        self.skeleton.is_some()
    }

    /// Pair the mesh with its skeleton, or `None` for a rigid model.
    pub fn into_skinned(self) -> Option<SkinnedInstance> {
        let skeleton = self.skeleton?;
        Some(SkinnedInstance {
            name: self.name,
            geometry: self.geometry,
            materials: self.materials,
            skeleton,
        })
    }
}

/// A mesh bound to a skeleton; the unit animation channels target
#[derive(Debug, Clone)]
pub struct SkinnedInstance {
    pub name: String,
    pub geometry: Geometry,
    pub materials: MaterialTable,
    pub skeleton: Skeleton,
}

/// Convert one parsed model.
///
/// Texture problems never fail the conversion. Bad triangle indices and
/// malformed bone links do, for this model only.
pub fn convert_model(
    model: &Model,
    source: &dyn TextureSource,
    config: &ExportConfig,
) -> Result<ConvertedModel, ExportError> {
    let (materials, slots) = material::bind_with(&model.materials, source, &config.textures);

    let geometry = mesh::build(&model.vertices, &model.triangles, &slots).map_err(|source| {
        ExportError::Geometry {
            model: model.name.clone(),
            source,
        }
    })?;

    let skeleton = if model.is_skinned() {
        let skeleton = skeleton::build(&model.bones).map_err(|source| ExportError::Skeleton {
            model: model.name.clone(),
            source,
        })?;
        Some(skeleton)
    } else {
        None
    };

    tracing::info!(
        "Converted model '{}': {} vertices, {} triangles, {} draw groups, {} materials, {} joints",
        model.name,
        geometry.vertex_count(),
        geometry.triangle_count(),
        geometry.groups.len(),
        materials.len(),
        skeleton.as_ref().map(Skeleton::bone_count).unwrap_or(0)
    );

    Ok(ConvertedModel {
        name: model.name.clone(),
        geometry,
        materials,
        slots,
        skeleton,
    })
}
