//! Writers for baked rig asset files
//!
//! Re-exports the record layouts from rig-common and streams complete files
//! to any `Write`. Names longer than their field are truncated with a
//! warning.

pub use rig_common::formats::*;

use anyhow::Result;
use std::io::Write;

use crate::animation::{AnimationClip, AnimationKeyframe};
use crate::mesh::BakedMesh;
use crate::skeleton::Skeleton;

/// Warn when `name` will not fit a `len`-byte field.
fn check_name(what: &str, name: &str, len: usize) {
    if !name_fits(name, len) {
        tracing::warn!(
            "{} name '{}' exceeds {} bytes and will be truncated",
            what,
            name,
            len - 1
        );
    }
}

/// Write a complete mesh file
pub fn write_mesh_file<W: Write>(w: &mut W, mesh: &BakedMesh) -> Result<()> {
    check_name("Texture", &mesh.texture, TEXTURE_NAME_LENGTH);

    let mut header = RigMeshHeader::new(
        mesh.vertex_count,
        mesh.position_stride,
        mesh.normal_stride,
        mesh.texcoord_stride,
        mesh.matrices_per_vertex,
    );
    header.bind_shape_matrix = mesh.bind_shape_matrix.to_cols_array();
    header.texture_name = mesh.texture.clone();

    w.write_all(&header.to_bytes())?;
    w.write_all(&mesh.vertex_data)?;
    Ok(())
}

/// Write a complete skeleton file
///
/// Joints are written in id order; each joint is followed by its transform
/// tracks and then its child ids.
pub fn write_skeleton_file<W: Write>(w: &mut W, skeleton: &Skeleton) -> Result<()> {
    let header = RigSkeletonHeader::new(skeleton.len() as u32);
    w.write_all(&header.to_bytes())?;

    for joint in skeleton.joints() {
        check_name("Joint", &joint.name, JOINT_NAME_LENGTH);

        let entry = RigJointEntry {
            name: joint.name.clone(),
            inverse_bind_matrix: joint.inverse_bind_matrix.to_cols_array(),
            joint_id: joint.id as i32,
            child_count: joint.children.len() as u32,
            transform_count: joint.transforms.len() as u32,
        };
        w.write_all(&entry.to_bytes())?;

        for transform in &joint.transforms {
            check_name("Transform", &transform.name, TRANSFORM_NAME_LENGTH);
            w.write_all(&transform.to_entry().to_bytes())?;
        }
        for &child in &joint.children {
            w.write_all(&(child as i32).to_ne_bytes())?;
        }
    }

    Ok(())
}

/// Write a complete animation clip file
///
/// Joint names are looked up in `skeleton` by each animation's joint index.
pub fn write_clip_file<W: Write>(
    w: &mut W,
    clip: &AnimationClip,
    skeleton: &Skeleton,
) -> Result<()> {
    check_name("Clip", &clip.name, CLIP_NAME_LENGTH);
    let header = RigClipHeader::new(&clip.name, clip.animations.len() as u32);
    w.write_all(&header.to_bytes())?;

    for animation in &clip.animations {
        check_name("Animation", &animation.name, ANIMATION_NAME_LENGTH);
        let joint_name = skeleton
            .joint(animation.joint)
            .map(|j| j.name.clone())
            .unwrap_or_default();

        let anim_header = RigAnimationHeader {
            name: animation.name.clone(),
            curve_count: animation.curves.len() as u32,
            joint_name,
            component: animation.component.index(),
            target_transform_name: animation.component.transform_name().to_string(),
        };
        w.write_all(&anim_header.to_bytes())?;

        for curve in &animation.curves {
            let curve_header = RigCurveHeader {
                keyframe_count: curve.keyframes.len() as u32,
            };
            w.write_all(&curve_header.to_bytes())?;

            for keyframe in &curve.keyframes {
                match *keyframe {
                    AnimationKeyframe::Bezier {
                        time,
                        value,
                        in_tangent,
                        out_tangent,
                    } => {
                        let common = RigKeyframeCommon {
                            keyframe_type: KeyframeType::Bezier as u32,
                            time,
                            value,
                        };
                        w.write_all(&common.to_bytes())?;
                        let bezier = RigBezierKeyframe {
                            in_tangent,
                            out_tangent,
                        };
                        w.write_all(&bezier.to_bytes())?;
                    }
                }
            }
        }
    }

    Ok(())
}
