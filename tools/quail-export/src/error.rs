//! Error types for the conversion pipeline.
//!
//! Texture problems are mostly recovered inside the decoder (fallback image)
//! and the material binder (skip). Only the variants below leave a builder.

use thiserror::Error;

/// Texture decoding failure that is reported to the caller.
///
/// Codec errors for recognized formats never surface here; they are logged
/// and replaced by the fallback image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Unknown image format for {name:?} (expected DDS payload, .png or .bmp)")]
    UnknownFormat { name: String },
}

/// Link fields of a [`quail_shared::Bone`] that point at other bones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneLink {
    Child,
    Next,
}

impl std::fmt::Display for BoneLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoneLink::Child => f.write_str("child_index"),
            BoneLink::Next => f.write_str("next"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkeletonError {
    #[error("Cannot build a skeleton from an empty bone list")]
    EmptyInput,

    #[error("Bone {bone} has {link} = {index}, but only {len} bones exist")]
    IndexOutOfRange {
        bone: usize,
        link: BoneLink,
        index: i64,
        len: usize,
    },

    #[error("Bone {bone} is reachable more than once (cyclic or shared link)")]
    CyclicLink { bone: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Triangle {triangle} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Failure converting a whole model.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build geometry for model {model:?}: {source}")]
    Geometry {
        model: String,
        #[source]
        source: GeometryError,
    },

    #[error("Failed to build skeleton for model {model:?}: {source}")]
    Skeleton {
        model: String,
        #[source]
        source: SkeletonError,
    },
}
