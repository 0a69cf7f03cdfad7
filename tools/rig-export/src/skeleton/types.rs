//! Joint tree types

use glam::{Mat4, Vec3};
use rig_common::RigTransformEntry;

use crate::math;

/// Payload of one transform track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformKind {
    /// Angle in degrees about `axis`
    Rotation { axis: Vec3, angle: f32 },
    Translation(Vec3),
    Matrix(Mat4),
}

/// One entry of a joint's transform track list
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRecord {
    pub kind: TransformKind,
    /// Semantic name (`rotateX`, `translate`, ...) used for template matching
    pub name: String,
}

impl TransformRecord {
    pub fn rotation(axis: Vec3, angle: f32, name: &str) -> Self {
        Self {
            kind: TransformKind::Rotation { axis, angle },
            name: name.to_string(),
        }
    }

    pub fn translation(value: Vec3, name: &str) -> Self {
        Self {
            kind: TransformKind::Translation(value),
            name: name.to_string(),
        }
    }

    /// Unnamed matrix track holding transforms folded in from pass-through
    /// ancestors.
    pub fn coalesced(matrix: Mat4) -> Self {
        Self {
            kind: TransformKind::Matrix(matrix),
            name: String::new(),
        }
    }

    pub fn is_coalesced(&self) -> bool {
        matches!(self.kind, TransformKind::Matrix(_)) && self.name.is_empty()
    }

    pub fn matrix(&self) -> Mat4 {
        match self.kind {
            TransformKind::Rotation { axis, angle } => math::rotation_matrix(axis, angle),
            TransformKind::Translation(v) => math::translation_matrix(v),
            TransformKind::Matrix(m) => m,
        }
    }

    pub fn to_entry(&self) -> RigTransformEntry {
        match self.kind {
            TransformKind::Rotation { axis, angle } => {
                RigTransformEntry::rotation(axis.to_array(), angle, &self.name)
            }
            TransformKind::Translation(v) => RigTransformEntry::translation(v.to_array(), &self.name),
            TransformKind::Matrix(m) => RigTransformEntry::matrix(m.to_cols_array(), &self.name),
        }
    }
}

/// A bound node of the skeleton
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    /// Dense pre-order id; also the index into the skeleton's joint list
    pub id: u32,
    pub name: String,
    pub inverse_bind_matrix: Mat4,
    pub transforms: Vec<TransformRecord>,
    pub parent: Option<u32>,
    pub children: Vec<u32>,
}

/// Joint hierarchy stored as a pre-order arena; joint `i` lives at index `i`
/// and children are referenced by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub name: String,
    pub(crate) joints: Vec<Joint>,
}

impl Skeleton {
    /// Flat pre-order joint list.
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn root(&self) -> Option<&Joint> {
        self.joints.first()
    }

    pub fn joint(&self, id: u32) -> Option<&Joint> {
        self.joints.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<u32> {
        self.joints.iter().find(|j| j.name == name).map(|j| j.id)
    }
}
