//! Fan triangulation of polygon faces
//!
//! Faces are assumed convex and planar. Concave input produces overlapping
//! triangles rather than an error.

use super::types::IndexSet;

/// Replace each face of `k` corners with `k - 2` triangles sharing the
/// face's first corner.
///
/// `face_vertex_counts` must already be validated: every count >= 3 and the
/// counts summing to `indices.len()`.
pub fn triangulate_fan(indices: &[u32], face_vertex_counts: &[u32]) -> Vec<u32> {
    let triangles: usize = face_vertex_counts
        .iter()
        .map(|&k| k.saturating_sub(2) as usize)
        .sum();
    let mut out = Vec::with_capacity(triangles * 3);

    let mut read = 0usize;
    for &k in face_vertex_counts {
        let k = k as usize;
        let face = &indices[read..read + k];
        for i in 1..k.saturating_sub(1) {
            out.extend_from_slice(&[face[0], face[i], face[i + 1]]);
        }
        read += k;
    }

    out
}

impl IndexSet {
    /// Triangle-list copy of this submesh. Submeshes without face counts are
    /// already triangles and are returned unchanged.
    pub fn triangulated(&self) -> IndexSet {
        let Some(counts) = &self.face_vertex_counts else {
            return self.clone();
        };

        let fan = |list: &Vec<u32>| {
            if list.is_empty() {
                Vec::new()
            } else {
                triangulate_fan(list, counts)
            }
        };

        IndexSet {
            positions: fan(&self.positions),
            normals: fan(&self.normals),
            texcoords: fan(&self.texcoords),
            face_vertex_counts: None,
        }
    }
}
