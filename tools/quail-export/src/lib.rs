//! quail-export library
//!
//! Converts models decoded from EverQuest archives into renderer-ready
//! data: indexed geometry with material draw groups, decoded textures,
//! skeletons with inverse bind matrices, and per-bone animation clips.

pub mod animation;
pub mod config;
pub mod convert;
pub mod error;
pub mod material;
pub mod mesh;
pub mod skeleton;
pub mod texture;

// Re-export the parser-side input types
pub use quail_shared::{
    Animation, Bone, BoneTrack, DirSource, Keyframe, Material, MaterialProperty, Model,
    TextureSource, Triangle, Vertex,
};

// Re-export key types for model conversion
pub use convert::{ConvertedModel, SkinnedInstance, convert_model};
pub use mesh::{DrawGroup, Geometry};
pub use material::{BoundMaterial, MaterialTable, SlotMap};
pub use skeleton::{Skeleton, SkeletonBone};
pub use texture::{DecodedImage, fallback};

// Re-export animation types
pub use animation::{AnimationClip, Channel, ChannelKind, TargetPolicy};

pub use config::{ExportConfig, load_config};
pub use error::{DecodeError, ExportError, GeometryError, SkeletonError};
