//! Animation builder (bone keyframe tracks -> looping clips)
//!
//! Keyframes are not resampled: keyframe `i` gets time key `i`. Each bone
//! track is flattened once into position/rotation/scale channels and then
//! bound to the skinned instances chosen by a [`TargetPolicy`].

use quail_shared::{Animation, BoneTrack};
use std::sync::Arc;

use crate::config::TargetMode;
use crate::convert::SkinnedInstance;

/// Animated attribute of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Position,
    Rotation,
    Scale,
}

impl ChannelKind {
    /// Floats per key
    pub fn components(self) -> usize {
        match self {
            ChannelKind::Position | ChannelKind::Scale => 3,
            ChannelKind::Rotation => 4,
        }
    }
}

/// Time keys paired with flattened values
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub kind: ChannelKind,
    /// Index of the targeted skinned instance
    pub target: usize,
    /// Position of the track's bone in the target skeleton, if it has one by that name
    pub joint: Option<usize>,
    /// Shared by all channels built from the same track
    pub keys: Arc<[f32]>,
    pub values: Vec<f32>,
}

impl Channel {
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Value of key `i`
    pub fn value(&self, i: usize) -> &[f32] {
        let n = self.kind.components();
        &self.values[i * n..(i + 1) * n]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Name of the animated bone
    pub track: String,
    pub target: usize,
    pub looping: bool,
    pub position: Channel,
    pub rotation: Channel,
    pub scale: Channel,
}

impl AnimationClip {
    pub fn channels(&self) -> [&Channel; 3] {
        [&self.position, &self.rotation, &self.scale]
    }

    pub fn key_count(&self) -> usize {
        self.position.key_count()
    }
}

/// Chooses which skinned instances a bone track is bound to.
pub trait TargetPolicy {
    fn targets(
        &self,
        animation: &Animation,
        track: &BoneTrack,
        instances: &[SkinnedInstance],
    ) -> Vec<usize>;
}

/// Bind every track to every instance (full cross-product)
#[derive(Debug, Clone, Copy, Default)]
pub struct AllTargets;

impl TargetPolicy for AllTargets {
    fn targets(&self, _: &Animation, _: &BoneTrack, instances: &[SkinnedInstance]) -> Vec<usize> {
        (0..instances.len()).collect()
    }
}

/// Bind every track to the first instance only
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTarget;

impl TargetPolicy for FirstTarget {
    fn targets(&self, _: &Animation, _: &BoneTrack, instances: &[SkinnedInstance]) -> Vec<usize> {
        if instances.is_empty() {
            Vec::new()
        } else {
            vec![0]
        }
    }
}

/// Policy selected by the `animation.targets` config value
pub fn policy_for(mode: TargetMode) -> &'static dyn TargetPolicy {
    match mode {
        TargetMode::All => &AllTargets,
        TargetMode::First => &FirstTarget,
    }
}

/// Build one clip per animation × bone track × skinned instance.
pub fn build(animations: &[Animation], targets: &[SkinnedInstance]) -> Vec<AnimationClip> {
    build_with(animations, targets, &AllTargets)
}

/// Build clips, binding each track to the instances `policy` selects.
pub fn build_with(
    animations: &[Animation],
    targets: &[SkinnedInstance],
    policy: &dyn TargetPolicy,
) -> Vec<AnimationClip> {
    let mut clips = Vec::new();

    for animation in animations {
        for track in &animation.tracks {
            let flat = FlatTrack::new(track);
            for target in policy.targets(animation, track, targets) {
                let joint = targets
                    .get(target)
                    .and_then(|instance| instance.skeleton.find_bone(&track.bone));
                clips.push(flat.clip(&animation.name, &track.bone, target, joint));
            }
        }
    }

    tracing::debug!(
        "Built {} animation clips from {} animations for {} targets",
        clips.len(),
        animations.len(),
        targets.len()
    );

    clips
}

/// A track's keyframes flattened into per-attribute buffers
struct FlatTrack {
    keys: Arc<[f32]>,
    position: Vec<f32>,
    rotation: Vec<f32>,
    scale: Vec<f32>,
}

impl FlatTrack {
    fn new(track: &BoneTrack) -> Self {
        let count = track.frames.len();
        let mut position = Vec::with_capacity(count * 3);
        let mut rotation = Vec::with_capacity(count * 4);
        let mut scale = Vec::with_capacity(count * 3);

        for frame in &track.frames {
            position.extend_from_slice(&frame.translation);
            rotation.extend_from_slice(&frame.rotation);
            scale.extend_from_slice(&frame.scale);
        }

        Self {
            keys: (0..count).map(|i| i as f32).collect(),
            position,
            rotation,
            scale,
        }
    }

    fn channel(&self, kind: ChannelKind, target: usize, joint: Option<usize>) -> Channel {
        let values = match kind {
            ChannelKind::Position => &self.position,
            ChannelKind::Rotation => &self.rotation,
            ChannelKind::Scale => &self.scale,
        };
        Channel {
            kind,
            target,
            joint,
            keys: Arc::clone(&self.keys),
            values: values.clone(),
        }
    }

    fn clip(&self, name: &str, bone: &str, target: usize, joint: Option<usize>) -> AnimationClip {
        AnimationClip {
            name: name.to_string(),
            track: bone.to_string(),
            target,
            looping: true,
            position: self.channel(ChannelKind::Position, target, joint),
            rotation: self.channel(ChannelKind::Rotation, target, joint),
            scale: self.channel(ChannelKind::Scale, target, joint),
        }
    }
}
