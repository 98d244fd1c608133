//! Material binder
//!
//! Deduplicates materials by name, assigns each unique name a dense slot
//! and resolves texture properties through the texture decoder.

use hashbrown::HashMap;
use quail_shared::{Material, MaterialProperty, TextureSource};
use std::borrow::Cow;
use std::sync::Arc;

use crate::config::TextureConfig;
use crate::error::DecodeError;
use crate::texture::{self, DecodedImage};

/// Material name -> slot
pub type SlotMap = HashMap<String, usize>;

/// Renderer-side material record for one slot
#[derive(Debug, Clone)]
pub struct BoundMaterial {
    pub name: String,
    pub slot: usize,
    /// Name of the texture file the image came from
    pub texture_name: Option<String>,
    pub texture: Option<Arc<DecodedImage>>,
}

/// A texture property whose format could not be identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTexture {
    pub material: String,
    pub property: String,
    pub error: DecodeError,
}

/// Slot-indexed material records
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: Vec<BoundMaterial>,
    rejected: Vec<RejectedTexture>,
}

impl MaterialTable {
    pub fn get(&self, slot: usize) -> Option<&BoundMaterial> {
        self.materials.get(slot)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials in slot order
    pub fn iter(&self) -> impl Iterator<Item = &BoundMaterial> {
        self.materials.iter()
    }

    /// Texture properties skipped because of an unknown image format
    pub fn rejected(&self) -> &[RejectedTexture] {
        &self.rejected
    }
}

/// Bind materials with the default texture rules.
pub fn bind(materials: &[Material], source: &dyn TextureSource) -> (MaterialTable, SlotMap) {
    bind_with(materials, source, &TextureConfig::default())
}

/// Bind materials, resolving texture properties as described by `config`.
///
/// The first occurrence of a name creates its slot; later occurrences only
/// contribute a texture if the slot has none yet.
pub fn bind_with(
    materials: &[Material],
    source: &dyn TextureSource,
    config: &TextureConfig,
) -> (MaterialTable, SlotMap) {
    let mut table = MaterialTable::default();
    let mut slots = SlotMap::new();

    for material in materials {
        let slot = *slots.entry(material.name.clone()).or_insert_with(|| {
            let slot = table.materials.len();
            table.materials.push(BoundMaterial {
                name: material.name.clone(),
                slot,
                texture_name: None,
                texture: None,
            });
            slot
        });

        for property in &material.properties {
            if !is_texture_property(property, config) {
                continue;
            }

            if table.materials[slot].texture.is_some() {
                tracing::debug!(
                    "Material '{}' already has a texture, ignoring {:?}",
                    material.name,
                    property.value
                );
                continue;
            }

            let Some(data) = texture_bytes(property, source, config) else {
                continue;
            };

            match texture::decode(&property.value, &data) {
                Ok(image) => {
                    let bound = &mut table.materials[slot];
                    bound.texture_name = Some(property.value.clone());
                    bound.texture = Some(image);
                }
                Err(error) => {
                    tracing::warn!(
                        "Material '{}': skipping texture {:?}: {}",
                        material.name,
                        property.value,
                        error
                    );
                    table.rejected.push(RejectedTexture {
                        material: material.name.clone(),
                        property: property.name.clone(),
                        error,
                    });
                }
            }
        }
    }

    tracing::debug!(
        "Bound {} materials ({} entries), {} with textures",
        table.len(),
        materials.len(),
        table.iter().filter(|m| m.texture.is_some()).count()
    );

    (table, slots)
}

/// Whether a property references a texture: matching category and a name
/// containing the keyword, ignoring case.
pub fn is_texture_property(property: &MaterialProperty, config: &TextureConfig) -> bool {
    property.category == config.category
        && property
            .name
            .to_lowercase()
            .contains(&config.keyword.to_lowercase())
}

/// Inline payload or fetched bytes. `None` when the texture is absent.
fn texture_bytes<'a>(
    property: &'a MaterialProperty,
    source: &dyn TextureSource,
    config: &TextureConfig,
) -> Option<Cow<'a, [u8]>> {
    if config.prefer_inline && !property.data.is_empty() {
        return Some(Cow::Borrowed(&property.data));
    }

    match source.fetch(&property.value) {
        Ok(Some(data)) => Some(Cow::Owned(data)),
        Ok(None) => {
            tracing::debug!("Texture {:?} not found, leaving slot untextured", property.value);
            None
        }
        Err(e) => {
            tracing::warn!("Texture {:?} could not be fetched: {}", property.value, e);
            None
        }
    }
}
