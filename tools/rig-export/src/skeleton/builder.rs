//! Joint tree construction from the scene's node graph
//!
//! Bound nodes (those listed by the skin controller) become joints.
//! Pass-through nodes between them are folded into a single matrix track on
//! the joint below.

use glam::{Mat4, Vec3};
use hashbrown::{HashMap, HashSet};

use super::types::{Joint, Skeleton, TransformKind, TransformRecord};
use crate::error::SkeletonError;
use crate::math::{self, EPSILON};
use crate::scene::{Controller, SceneDocument, SceneNode, SourceTransform};

/// Default skeleton name for controllers without one
pub const DEFAULT_SKELETON_NAME: &str = "ExportedSkeleton";

struct Pending {
    node: usize,
    parent: Option<u32>,
    coalesced: Option<Mat4>,
}

/// Build the joint tree bound by `controller`.
///
/// Joint ids are the bound-node indices and must come out in pre-order.
pub fn build_skeleton(
    doc: &SceneDocument,
    controller: &Controller,
) -> Result<Skeleton, SkeletonError> {
    let name = if controller.name.is_empty() {
        DEFAULT_SKELETON_NAME.to_string()
    } else {
        controller.name.clone()
    };

    if controller.joints.is_empty() {
        return Err(SkeletonError::NoBoundNodes(name));
    }

    let mut bound: HashMap<usize, usize> = HashMap::with_capacity(controller.joints.len());
    for (index, joint) in controller.joints.iter().enumerate() {
        if joint.node >= doc.nodes.len() {
            return Err(SkeletonError::UnknownNode(joint.node));
        }
        bound.entry(joint.node).or_insert(index);
    }

    let root = find_root(doc, controller, &bound)?;

    let mut joints: Vec<Joint> = Vec::with_capacity(controller.joints.len());
    let mut visited = HashSet::new();
    let mut stack = vec![Pending {
        node: root,
        parent: None,
        coalesced: None,
    }];

    while let Some(pending) = stack.pop() {
        let node = &doc.nodes[pending.node];
        if !visited.insert(pending.node) {
            return Err(SkeletonError::CyclicHierarchy(node.name.clone()));
        }

        let Some(&id) = bound.get(&pending.node) else {
            match node.children.as_slice() {
                [] => tracing::debug!("Pruned pass-through leaf '{}'", node.name),
                &[child] => {
                    let local = node.local_matrix();
                    let coalesced = match pending.coalesced {
                        Some(above) => math::multiply(&above, &local),
                        None => local,
                    };
                    stack.push(Pending {
                        node: child,
                        parent: pending.parent,
                        coalesced: Some(coalesced),
                    });
                }
                children => {
                    return Err(SkeletonError::MultiChildPassThrough {
                        node: node.name.clone(),
                        children: children.len(),
                    });
                }
            }
            continue;
        };

        if id != joints.len() {
            return Err(SkeletonError::JointOrder {
                joint: node.name.clone(),
                id,
                position: joints.len(),
            });
        }

        let mut transforms = joint_transforms(node)?;
        if let Some(matrix) = pending.coalesced {
            transforms.insert(0, TransformRecord::coalesced(matrix));
        }

        let inverse_bind_matrix = Mat4::from_cols_array(&controller.joints[id].inverse_bind_matrix);
        if math::inverse(&inverse_bind_matrix).is_none() {
            tracing::warn!("Joint '{}' has a singular inverse bind matrix", node.name);
        }

        let id = id as u32;
        if let Some(parent) = pending.parent {
            joints[parent as usize].children.push(id);
        }
        tracing::debug!(
            "Joint {} '{}' (parent {:?}, {} transforms)",
            id,
            node.name,
            pending.parent,
            transforms.len()
        );
        joints.push(Joint {
            id,
            name: node.name.clone(),
            inverse_bind_matrix,
            transforms,
            parent: pending.parent,
            children: Vec::new(),
        });

        for &child in node.children.iter().rev() {
            stack.push(Pending {
                node: child,
                parent: Some(id),
                coalesced: None,
            });
        }
    }

    for joint in &controller.joints {
        if !visited.contains(&joint.node) {
            tracing::warn!(
                "Bound node '{}' is not below skeleton root '{}'; skipped",
                doc.nodes[joint.node].name,
                doc.nodes[root].name
            );
        }
    }

    Ok(Skeleton { name, joints })
}

/// First bound node, in bound order, with no bound ancestor.
fn find_root(
    doc: &SceneDocument,
    controller: &Controller,
    bound: &HashMap<usize, usize>,
) -> Result<usize, SkeletonError> {
    let parents = doc.parents();
    let has_bound_ancestor = |node: usize| {
        let mut current = parents[node];
        // Bounded walk so a malformed cycle cannot spin forever
        for _ in 0..doc.nodes.len() {
            match current {
                Some(p) if bound.contains_key(&p) => return true,
                Some(p) => current = parents[p],
                None => return false,
            }
        }
        false
    };

    let candidates: Vec<usize> = controller
        .joints
        .iter()
        .map(|j| j.node)
        .filter(|&n| !has_bound_ancestor(n))
        .collect();

    match candidates.as_slice() {
        [] => Err(SkeletonError::NoRoot),
        [root] => Ok(*root),
        [root, others @ ..] => {
            tracing::warn!(
                "Skeleton has {} root candidates; using '{}'",
                others.len() + 1,
                doc.nodes[*root].name
            );
            Ok(*root)
        }
    }
}

/// A joint's own transforms, in source order.
fn joint_transforms(node: &SceneNode) -> Result<Vec<TransformRecord>, SkeletonError> {
    let mut records = Vec::with_capacity(node.transforms.len());
    for transform in &node.transforms {
        match transform {
            SourceTransform::Rotate { sid, axis, angle } => {
                records.push(TransformRecord::rotation(Vec3::from_array(*axis), *angle, sid));
            }
            SourceTransform::Translate { sid, value } => {
                records.push(TransformRecord::translation(Vec3::from_array(*value), sid));
            }
            SourceTransform::Matrix { sid, value } => records.push(TransformRecord {
                kind: TransformKind::Matrix(Mat4::from_cols_array(value)),
                name: sid.clone(),
            }),
            SourceTransform::Scale { value, .. } => {
                if value.iter().any(|s| (s - 1.0).abs() > EPSILON) {
                    return Err(SkeletonError::NonUnitScale {
                        joint: node.name.clone(),
                        scale: *value,
                    });
                }
            }
        }
    }
    Ok(records)
}
