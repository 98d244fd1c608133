//! Skeleton builder (flat child/sibling bone array -> joint tree)
//!
//! The parser stores bones as a flattened tree: each bone names its first
//! child and its next sibling. The tree is rebuilt depth-first, child before
//! sibling, into an arena of nodes with parent links stored as indices.
//! Joints are then ordered by source bone index, which is the index
//! skinning and animation channels use.

use glam::{Mat4, Quat, Vec3};
use quail_shared::Bone;

use crate::error::{BoneLink, SkeletonError};

/// Index of a node in [`Skeleton::nodes`]
pub type NodeId = usize;

/// The synthetic root node, always first in the arena
pub const ROOT: NodeId = 0;

const ROOT_NAME: &str = "root";

/// Determinant below which a bind pose is treated as non-invertible
const SINGULAR_EPSILON: f32 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct JointNode {
    pub name: String,
    /// Source bone index, `None` for the root
    pub bone: Option<usize>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// One entry of the skinning bone list
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonBone {
    pub node: NodeId,
    /// Source bone index
    pub bone: usize,
    /// Parent-relative transform: translation * rotation * scale
    pub local_transform: Mat4,
    pub inverse_bind: Mat4,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    nodes: Vec<JointNode>,
    bones: Vec<SkeletonBone>,
}

impl Skeleton {
    pub fn root(&self) -> &JointNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> Option<&JointNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[JointNode] {
        &self.nodes
    }

    /// Bones in ascending source index order
    pub fn bones(&self) -> &[SkeletonBone] {
        &self.bones
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Node holding the given source bone
    pub fn node_of_bone(&self, bone: usize) -> Option<NodeId> {
        self.bones
            .binary_search_by_key(&bone, |b| b.bone)
            .ok()
            .map(|i| self.bones[i].node)
    }

    /// Source index of a bone's parent bone, `None` when attached to the root
    pub fn parent_bone(&self, bone: usize) -> Option<usize> {
        let node = self.node_of_bone(bone)?;
        let parent = self.nodes[node].parent?;
        self.nodes[parent].bone
    }

    /// Position of a named bone in [`Skeleton::bones`]
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones
            .iter()
            .position(|b| self.nodes[b.node].name == name)
    }

    pub fn inverse_bind_matrices(&self) -> Vec<Mat4> {
        self.bones.iter().map(|b| b.inverse_bind).collect()
    }
}

/// Build a skeleton from the parser's flat bone array.
///
/// Bone 0 hangs off the synthetic root. Bones unreachable from bone 0 are
/// not part of the result.
pub fn build(bones: &[Bone]) -> Result<Skeleton, SkeletonError> {
    if bones.is_empty() {
        return Err(SkeletonError::EmptyInput);
    }

    let mut traversal = Traversal::new(bones);
    let first = traversal.attach(ROOT, 0)?;
    traversal.visit(ROOT, first, 0)?;

    let Traversal {
        nodes, mut joints, ..
    } = traversal;

    // Hierarchy comes from traversal order, addressing from bone index
    joints.sort_by_key(|joint| joint.bone);

    if joints.len() < bones.len() {
        tracing::debug!(
            "{} of {} bones are not reachable from bone 0",
            bones.len() - joints.len(),
            bones.len()
        );
    }

    let entries = joints
        .into_iter()
        .map(|joint| {
            let local_transform = local_transform(&bones[joint.bone]);
            SkeletonBone {
                node: joint.node,
                bone: joint.bone,
                local_transform,
                inverse_bind: inverse_bind(joint.bone, &local_transform),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!("Built skeleton: {} joints", entries.len());

    Ok(Skeleton {
        nodes,
        bones: entries,
    })
}

/// Compose pivot, rotation and scale as `T * R * S`.
pub fn local_transform(bone: &Bone) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::from_array(bone.scale),
        Quat::from_array(bone.rotation),
        Vec3::from_array(bone.pivot),
    )
}

fn inverse_bind(bone: usize, local: &Mat4) -> Mat4 {
    if local.determinant().abs() < SINGULAR_EPSILON {
        tracing::warn!(
            "Bone {} has a non-invertible bind pose, using identity inverse bind matrix",
            bone
        );
        return Mat4::IDENTITY;
    }
    local.inverse()
}

struct JointEntry {
    bone: usize,
    node: NodeId,
}

/// State for one `build` call
struct Traversal<'a> {
    bones: &'a [Bone],
    nodes: Vec<JointNode>,
    joints: Vec<JointEntry>,
    visited: Vec<bool>,
}

impl<'a> Traversal<'a> {
    fn new(bones: &'a [Bone]) -> Self {
        Self {
            bones,
            nodes: vec![JointNode {
                name: ROOT_NAME.to_string(),
                bone: None,
                parent: None,
                children: Vec::new(),
            }],
            joints: Vec::with_capacity(bones.len()),
            visited: vec![false; bones.len()],
        }
    }

    /// Create a node for `bone` under `parent` and record it as a joint.
    fn attach(&mut self, parent: NodeId, bone: usize) -> Result<NodeId, SkeletonError> {
        if std::mem::replace(&mut self.visited[bone], true) {
            return Err(SkeletonError::CyclicLink { bone });
        }

        let id = self.nodes.len();
        self.nodes.push(JointNode {
            name: self.bones[bone].name.clone(),
            bone: Some(bone),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        self.joints.push(JointEntry { bone, node: id });
        Ok(id)
    }

    /// Attach the first child of `focus` under its node and descend, then
    /// continue along the sibling chain under the same `parent`.
    fn visit(
        &mut self,
        parent: NodeId,
        mut focus_node: NodeId,
        mut focus: usize,
    ) -> Result<(), SkeletonError> {
        let bones = self.bones;
        loop {
            let bone = &bones[focus];

            if bone.has_child() {
                let child = self.resolve(focus, BoneLink::Child, bone.child_index)?;
                let child_node = self.attach(focus_node, child)?;
                self.visit(focus_node, child_node, child)?;
            }

            if !bone.has_next() {
                return Ok(());
            }
            let next = self.resolve(focus, BoneLink::Next, bone.next)?;
            focus_node = self.attach(parent, next)?;
            focus = next;
        }
    }

    fn resolve(&self, bone: usize, link: BoneLink, index: i32) -> Result<usize, SkeletonError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.bones.len())
            .ok_or(SkeletonError::IndexOutOfRange {
                bone,
                link,
                index: index.into(),
                len: self.bones.len(),
            })
    }
}
