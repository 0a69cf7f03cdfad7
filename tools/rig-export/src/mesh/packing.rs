//! Vertex interleaving and skin weight compaction

use bytemuck::cast_slice;
use smallvec::SmallVec;

use super::types::{IndexSet, Influence};
use super::Mesh;

/// Compacted weights of one vertex
pub type WeightBlock = SmallVec<[f32; 4]>;

/// Compacted joint indices of one vertex
pub type JointBlock = SmallVec<[u8; 4]>;

/// Reduce one control point's influences to a block of `width` weights and
/// joint indices.
///
/// - zero total weight binds the vertex fully to joint 0
/// - at most `cap` influences (0 = no limit, never more than `width`) are
///   kept as given
/// - above that, the heaviest are kept heaviest first, ties in source order,
///   and rescaled to sum to one
///
/// Unused slots are zero. Joint indices must already be validated to fit u8.
pub(crate) fn compact_influences(raw: &[Influence], cap: u32, width: usize) -> (WeightBlock, JointBlock) {
    let mut weights: WeightBlock = SmallVec::from_elem(0.0, width);
    let mut joints: JointBlock = SmallVec::from_elem(0, width);
    if width == 0 {
        return (weights, joints);
    }

    let cap = match cap {
        0 => raw.len(),
        c => c as usize,
    }
    .min(width);

    let total: f32 = raw.iter().map(|i| i.weight).sum();
    if total == 0.0 {
        weights[0] = 1.0;
        return (weights, joints);
    }

    if raw.len() <= cap {
        for (slot, influence) in raw.iter().take(width).enumerate() {
            weights[slot] = influence.weight;
            joints[slot] = influence.joint as u8;
        }
        return (weights, joints);
    }

    // sort_by is stable, so equal weights keep their source order
    let mut order: SmallVec<[usize; 8]> = (0..raw.len()).collect();
    order.sort_by(|&a, &b| raw[b].weight.total_cmp(&raw[a].weight));
    order.truncate(cap);

    let kept: f32 = order.iter().map(|&i| raw[i].weight).sum();
    if kept <= 0.0 {
        weights[0] = 1.0;
        return (weights, joints);
    }

    for (slot, &i) in order.iter().enumerate() {
        weights[slot] = raw[i].weight / kept;
        joints[slot] = raw[i].joint as u8;
    }
    (weights, joints)
}

/// Interleave every corner of every (triangulated) submesh into one vertex
/// stream.
///
/// Record layout: position, normal, texcoord floats (each only when its pool
/// is present), then `matrices_per_vertex` weights and joint indices, padded
/// to a 4-byte boundary.
pub(crate) fn interleave(mesh: &Mesh, submeshes: &[IndexSet], matrices_per_vertex: u32) -> Vec<u8> {
    let stride = rig_common::vertex_stride(
        mesh.positions.record_width(),
        mesh.normals.record_width(),
        mesh.texcoords.record_width(),
        matrices_per_vertex,
    );
    let corners: usize = submeshes.iter().map(IndexSet::len).sum();
    let mut data = Vec::with_capacity(corners * stride);

    // Skin blocks depend only on the control point, so compact each once
    let skin_blocks: Vec<(WeightBlock, JointBlock)> = match &mesh.skin {
        Some(skin) if matrices_per_vertex > 0 => skin
            .offsets()
            .into_iter()
            .zip(skin.counts.iter())
            .map(|(offset, &count)| {
                let raw = skin.influences(offset, count);
                compact_influences(&raw, matrices_per_vertex, matrices_per_vertex as usize)
            })
            .collect(),
        _ => Vec::new(),
    };
    let root_bind = compact_influences(&[], 0, matrices_per_vertex as usize);

    for indices in submeshes {
        let normals = indices.normal_indices();
        let texcoords = indices.texcoord_indices();

        for (corner, &p) in indices.positions.iter().enumerate() {
            let start = data.len();

            data.extend_from_slice(cast_slice(mesh.positions.get(p)));
            if !mesh.normals.is_empty() {
                data.extend_from_slice(cast_slice(mesh.normals.get(normals[corner])));
            }
            if !mesh.texcoords.is_empty() {
                data.extend_from_slice(cast_slice(mesh.texcoords.get(texcoords[corner])));
            }

            if matrices_per_vertex > 0 {
                let (weights, joints) = skin_blocks.get(p as usize).unwrap_or(&root_bind);
                data.extend_from_slice(cast_slice(weights.as_slice()));
                data.extend_from_slice(joints);
            }

            data.resize(start + stride, 0);
        }
    }

    data
}
