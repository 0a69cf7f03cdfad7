//! Mesh consistency checks, run once the mesh is fully populated

use super::types::{AttributePool, BakeOptions, IndexSet, SkinTable, MAX_JOINT_INDEX};
use super::Mesh;
use crate::error::MeshError;

impl Mesh {
    /// Check every structural and consistency invariant.
    ///
    /// The first violation found is returned; nothing is modified.
    pub fn validate(&self, opts: &BakeOptions) -> Result<(), MeshError> {
        if self.positions.is_empty() {
            return Err(MeshError::MissingPositions);
        }

        let pools = [
            ("position", &self.positions),
            ("normal", &self.normals),
            ("texcoord", &self.texcoords),
        ];
        for (attribute, pool) in pools {
            if pool.stride == 0 && !pool.is_empty() {
                return Err(MeshError::ZeroStride {
                    attribute,
                    len: pool.data.len(),
                });
            }
        }

        if let Some(skin) = &self.skin {
            validate_skin(skin, self.positions.count(), self.joint_count)?;
        }

        for (attribute, pool) in pools {
            if !pool.is_empty() && pool.data.len() % pool.stride as usize != 0 {
                return Err(MeshError::PartialVector {
                    attribute,
                    len: pool.data.len(),
                    stride: pool.stride,
                });
            }
        }

        for (submesh, indices) in self.submeshes.iter().enumerate() {
            self.validate_submesh(submesh, indices, opts)?;
        }

        Ok(())
    }

    fn validate_submesh(
        &self,
        submesh: usize,
        indices: &IndexSet,
        opts: &BakeOptions,
    ) -> Result<(), MeshError> {
        if indices.positions.is_empty() {
            if indices.normals.is_empty() && indices.texcoords.is_empty() {
                return Ok(());
            }
            return Err(MeshError::MissingPositionIndices { submesh });
        }

        check_bounds(submesh, "position", &indices.positions, &self.positions)?;
        if !self.normals.is_empty() || !indices.normals.is_empty() {
            check_bounds(submesh, "normal", indices.normal_indices(), &self.normals)?;
        }
        if !self.texcoords.is_empty() || !indices.texcoords.is_empty() {
            check_bounds(submesh, "texcoord", indices.texcoord_indices(), &self.texcoords)?;
        }

        let expected = indices.positions.len();
        for (attribute, list) in [("normal", &indices.normals), ("texcoord", &indices.texcoords)] {
            if !list.is_empty() && list.len() != expected {
                return Err(MeshError::IndexCountMismatch {
                    submesh,
                    attribute,
                    expected,
                    found: list.len(),
                });
            }
        }

        if let Some(counts) = &indices.face_vertex_counts {
            if let Some((face, &count)) = counts.iter().enumerate().find(|(_, c)| **c < 3) {
                return Err(MeshError::DegenerateFace {
                    submesh,
                    face,
                    count,
                });
            }
            let sum: u64 = counts.iter().map(|&c| c as u64).sum();
            if sum != expected as u64 {
                return Err(MeshError::FaceCountMismatch {
                    submesh,
                    sum,
                    indices: expected,
                });
            }
        }

        if opts.indexed {
            let normals = indices.normal_indices();
            let texcoords = indices.texcoord_indices();
            for (corner, &p) in indices.positions.iter().enumerate() {
                if normals[corner] != p || texcoords[corner] != p {
                    return Err(MeshError::NotIndexed { submesh, corner });
                }
            }
        }

        Ok(())
    }
}

fn check_bounds(
    submesh: usize,
    attribute: &'static str,
    list: &[u32],
    pool: &AttributePool,
) -> Result<(), MeshError> {
    let count = pool.count();
    match list.iter().find(|&&i| i as usize >= count) {
        Some(&index) => Err(MeshError::IndexOutOfRange {
            submesh,
            attribute,
            index,
            count,
        }),
        None => Ok(()),
    }
}

fn validate_skin(skin: &SkinTable, control_points: usize, joint_count: u32) -> Result<(), MeshError> {
    if skin.counts.len() != control_points {
        return Err(MeshError::InfluenceCountMismatch {
            expected: control_points,
            found: skin.counts.len(),
        });
    }

    let pairs = skin.pair_count();
    if pairs != skin.joints.len() as u64 || pairs != skin.weights.len() as u64 {
        return Err(MeshError::InfluencePairMismatch {
            pairs,
            joints: skin.joints.len(),
            weights: skin.weights.len(),
        });
    }

    if let Some(&joint) = skin.joints.iter().find(|&&j| j > MAX_JOINT_INDEX) {
        return Err(MeshError::JointIndexOverflow { joint });
    }

    if let Some(&joint) = skin.joints.iter().find(|&&j| j >= joint_count) {
        return Err(MeshError::JointIndexOutOfRange {
            joint,
            count: joint_count,
        });
    }

    Ok(())
}
