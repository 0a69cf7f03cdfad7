//! Types and constants for mesh assembly

use glam::Mat4;
use smallvec::SmallVec;

use crate::math::BoundingBox;

/// Largest joint index representable in a vertex record (u8)
pub(crate) const MAX_JOINT_INDEX: u32 = u8::MAX as u32;

/// Flat pool of fixed-width vectors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributePool {
    /// Vector width in floats
    pub stride: u32,
    pub data: Vec<f32>,
}

impl AttributePool {
    pub fn new(stride: u32, data: Vec<f32>) -> Self {
        Self { stride, data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of whole vectors in the pool.
    pub fn count(&self) -> usize {
        match self.stride {
            0 => 0,
            s => self.data.len() / s as usize,
        }
    }

    /// The vector at `index`.
    pub fn get(&self, index: u32) -> &[f32] {
        let s = self.stride as usize;
        let start = index as usize * s;
        &self.data[start..start + s]
    }

    /// Width this pool contributes to a vertex record.
    pub fn record_width(&self) -> u32 {
        if self.is_empty() { 0 } else { self.stride }
    }
}

/// Index streams for one submesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSet {
    pub positions: Vec<u32>,
    pub normals: Vec<u32>,
    pub texcoords: Vec<u32>,
    /// Vertices per face; `None` when the submesh is already triangles
    pub face_vertex_counts: Option<Vec<u32>>,
}

impl IndexSet {
    /// Number of face corners.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Normal indices, falling back to position indices when absent.
    pub(crate) fn normal_indices(&self) -> &[u32] {
        if self.normals.is_empty() { &self.positions } else { &self.normals }
    }

    /// Texcoord indices, falling back to position indices when absent.
    pub(crate) fn texcoord_indices(&self) -> &[u32] {
        if self.texcoords.is_empty() { &self.positions } else { &self.texcoords }
    }
}

/// One (joint, weight) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influence {
    pub joint: u32,
    pub weight: f32,
}

/// Influences of a single control point; most vertices have four or fewer
pub type InfluenceList = SmallVec<[Influence; 4]>;

/// Per-control-point skin weights as handed over by the reader: a count per
/// position vector, plus flat joint and weight arrays consumed in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinTable {
    pub counts: Vec<u32>,
    pub joints: Vec<u32>,
    pub weights: Vec<f32>,
}

impl SkinTable {
    pub fn from_pairs(per_point: &[Vec<(u32, f32)>]) -> Self {
        let mut table = Self::default();
        for pairs in per_point {
            table.counts.push(pairs.len() as u32);
            for &(joint, weight) in pairs {
                table.joints.push(joint);
                table.weights.push(weight);
            }
        }
        table
    }

    /// Total number of pairs implied by `counts`.
    pub fn pair_count(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Start offset of every control point's pairs. Only valid once the
    /// table has been validated.
    pub(crate) fn offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.counts.len());
        let mut at = 0usize;
        for &c in &self.counts {
            offsets.push(at);
            at += c as usize;
        }
        offsets
    }

    pub(crate) fn influences(&self, offset: usize, count: u32) -> InfluenceList {
        (offset..offset + count as usize)
            .map(|i| Influence {
                joint: self.joints[i],
                weight: self.weights[i],
            })
            .collect()
    }
}

/// Options that change how a mesh is validated and baked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeOptions {
    /// Maximum influences per vertex; 0 keeps every influence
    pub max_weights: u32,
    /// Require position, normal and texcoord indices to be identical per corner
    pub indexed: bool,
}

/// Engine-ready mesh: one interleaved vertex stream
#[derive(Debug, Clone, PartialEq)]
pub struct BakedMesh {
    pub name: String,
    pub texture: String,
    pub vertex_count: u32,
    pub position_stride: u32,
    pub normal_stride: u32,
    pub texcoord_stride: u32,
    pub matrices_per_vertex: u32,
    pub bind_shape_matrix: Mat4,
    pub vertex_data: Vec<u8>,
    pub bounds: BoundingBox,
}

impl BakedMesh {
    /// Bytes per vertex record.
    pub fn stride(&self) -> usize {
        rig_common::vertex_stride(
            self.position_stride,
            self.normal_stride,
            self.texcoord_stride,
            self.matrices_per_vertex,
        )
    }
}
