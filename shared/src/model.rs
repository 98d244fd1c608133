//! Model, material and bone records as produced by the archive parser.

use serde::{Deserialize, Serialize};

/// A single mesh vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Three vertex indices (winding order preserved) plus the material painted on them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [u32; 3],
    pub material: String,
}

impl Triangle {
    pub fn new(indices: [u32; 3], material: impl Into<String>) -> Self {
        Self {
            indices,
            material: material.into(),
        }
    }
}

/// One named property of a material.
///
/// `value` usually holds a filename when the property references a texture;
/// `data` optionally carries the texture bytes inline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperty {
    pub category: u32,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
}

impl MaterialProperty {
    pub fn new(category: u32, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            value: value.into(),
            data: Vec::new(),
        }
    }

    /// Attach an inline payload to this property.
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<MaterialProperty>,
}

impl Material {
    pub fn new(name: impl Into<String>, properties: Vec<MaterialProperty>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }
}

/// A bone in the flattened child/sibling encoding.
///
/// `child_index` is only meaningful when `children_count > 0`. `next` is the
/// index of the following sibling or `-1` when there is none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub pivot: [f32; 3],
    /// Quaternion `[x, y, z, w]`
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub child_index: i32,
    pub children_count: u32,
    pub next: i32,
}

impl Default for Bone {
    fn default() -> Self {
        Self {
            name: String::new(),
            pivot: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
            child_index: -1,
            children_count: 0,
            next: -1,
        }
    }
}

impl Bone {
    /// A bone at rest (identity transform) with the given links.
    pub fn linked(name: impl Into<String>, child_index: i32, children_count: u32, next: i32) -> Self {
        Self {
            name: name.into(),
            child_index,
            children_count,
            next,
            ..Default::default()
        }
    }

    pub fn has_child(&self) -> bool {
        self.children_count > 0
    }

    pub fn has_next(&self) -> bool {
        self.next > -1
    }
}

/// A decoded model from the archive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub triangles: Vec<Triangle>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub bones: Vec<Bone>,
}

impl Model {
    pub fn is_skinned(&self) -> bool {
        !self.bones.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
