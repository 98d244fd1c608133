//! Keyframe animation tracks as produced by the archive parser.

use serde::{Deserialize, Serialize};

/// One sampled pose of a bone. Its position in the track is its time key.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub translation: [f32; 3],
    /// Quaternion `[x, y, z, w]`
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

/// Keyframes for a single bone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneTrack {
    pub bone: String,
    #[serde(default)]
    pub frames: Vec<Keyframe>,
}

/// A named animation with one track per animated bone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<BoneTrack>,
}

impl Animation {
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
