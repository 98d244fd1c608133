//! Shared types for the quail asset tools.
//!
//! These are the structures an upstream archive parser hands to the
//! converter: a decoded [`Model`], its flat [`Bone`] array and the
//! [`Animation`] tracks that drive it. They are plain data (no math
//! library) so every crate can depend on them cheaply.

pub mod animation;
pub mod model;
pub mod source;

pub use animation::{Animation, BoneTrack, Keyframe};
pub use model::{Bone, Material, MaterialProperty, Model, Triangle, Vertex};
pub use source::{DirSource, SourceError, TextureSource};
