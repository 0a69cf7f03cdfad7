//! Baked skeleton binary format (.rigskel)
//!
//! POD format - no magic bytes, identified by `file_type == FILE_TYPE_SKELETON`.
//!
//! # Layout
//! ```text
//! header (16 bytes):
//!   major_version u32, minor_version u32, file_type u32, joint_count u32
//! joint_count × joint record, in joint id order (pre-order):
//!   joint entry (140 bytes):
//!     name [u8; 64], inverse_bind_matrix f32[16], joint_id i32,
//!     child_count u32, transform_count u32
//!   transform_count × transform entry (100 bytes):
//!     transform_type u32, payload f32[16], name [u8; 32]
//!   child_count × child joint id i32
//! ```

use super::serialization::{FieldReader, FieldWriter};
use super::{FILE_TYPE_SKELETON, JOINT_NAME_LENGTH, TRANSFORM_NAME_LENGTH};
use crate::rig_format::RIG_FORMAT;

/// Transform record kind stored in `RigTransformEntry::transform_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TransformType {
    Invalid = 0,
    /// Payload `[axis.x, axis.y, axis.z, angle_degrees, 0...]`
    Rotation = 1,
    /// Payload `[x, y, z, 0...]`
    Translation = 2,
    /// Payload is a column-major 4x4 matrix
    Matrix = 3,
}

impl TransformType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Invalid),
            1 => Some(Self::Rotation),
            2 => Some(Self::Translation),
            3 => Some(Self::Matrix),
            _ => None,
        }
    }
}

/// Skeleton file header (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigSkeletonHeader {
    pub major_version: u32,
    pub minor_version: u32,
    pub file_type: u32,
    pub joint_count: u32,
}

impl RigSkeletonHeader {
    pub const SIZE: usize = 16;

    pub fn new(joint_count: u32) -> Self {
        Self {
            major_version: RIG_FORMAT.major_version,
            minor_version: RIG_FORMAT.minor_version,
            file_type: FILE_TYPE_SKELETON,
            joint_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut w = FieldWriter::new(&mut bytes);
        w.u32(self.major_version);
        w.u32(self.minor_version);
        w.u32(self.file_type);
        w.u32(self.joint_count);
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut r = FieldReader::new(bytes);
        Some(Self {
            major_version: r.u32()?,
            minor_version: r.u32()?,
            file_type: r.u32()?,
            joint_count: r.u32()?,
        })
    }
}

/// Fixed part of a joint record (140 bytes)
#[derive(Debug, Clone, PartialEq)]
pub struct RigJointEntry {
    pub name: String,
    pub inverse_bind_matrix: [f32; 16],
    pub joint_id: i32,
    pub child_count: u32,
    pub transform_count: u32,
}

impl RigJointEntry {
    pub const SIZE: usize = JOINT_NAME_LENGTH + 64 + 12;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut w = FieldWriter::new(&mut bytes);
        w.name(&self.name, JOINT_NAME_LENGTH);
        w.matrix(&self.inverse_bind_matrix);
        w.i32(self.joint_id);
        w.u32(self.child_count);
        w.u32(self.transform_count);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut r = FieldReader::new(bytes);
        Some(Self {
            name: r.name(JOINT_NAME_LENGTH)?,
            inverse_bind_matrix: r.matrix()?,
            joint_id: r.i32()?,
            child_count: r.u32()?,
            transform_count: r.u32()?,
        })
    }
}

/// Transform track record (100 bytes)
#[derive(Debug, Clone, PartialEq)]
pub struct RigTransformEntry {
    pub transform_type: u32,
    pub payload: [f32; 16],
    pub name: String,
}

impl RigTransformEntry {
    pub const SIZE: usize = 4 + 64 + TRANSFORM_NAME_LENGTH;

    pub fn rotation(axis: [f32; 3], angle_degrees: f32, name: &str) -> Self {
        let mut payload = [0.0; 16];
        payload[..3].copy_from_slice(&axis);
        payload[3] = angle_degrees;
        Self {
            transform_type: TransformType::Rotation as u32,
            payload,
            name: name.to_string(),
        }
    }

    pub fn translation(value: [f32; 3], name: &str) -> Self {
        let mut payload = [0.0; 16];
        payload[..3].copy_from_slice(&value);
        Self {
            transform_type: TransformType::Translation as u32,
            payload,
            name: name.to_string(),
        }
    }

    pub fn matrix(value: [f32; 16], name: &str) -> Self {
        Self {
            transform_type: TransformType::Matrix as u32,
            payload: value,
            name: name.to_string(),
        }
    }

    pub fn kind(&self) -> Option<TransformType> {
        TransformType::from_u32(self.transform_type)
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut w = FieldWriter::new(&mut bytes);
        w.u32(self.transform_type);
        w.matrix(&self.payload);
        w.name(&self.name, TRANSFORM_NAME_LENGTH);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut r = FieldReader::new(bytes);
        Some(Self {
            transform_type: r.u32()?,
            payload: r.matrix()?,
            name: r.name(TRANSFORM_NAME_LENGTH)?,
        })
    }
}

/// One decoded joint with its transform tracks and child ids.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonJointRecord {
    pub entry: RigJointEntry,
    pub transforms: Vec<RigTransformEntry>,
    pub children: Vec<i32>,
}

/// A decoded skeleton file.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonFile {
    pub header: RigSkeletonHeader,
    pub joints: Vec<SkeletonJointRecord>,
}

impl SkeletonFile {
    /// Parse a complete skeleton file.
    ///
    /// Returns `None` on a short read anywhere or a file type mismatch.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut r = FieldReader::new(bytes);
        let header = RigSkeletonHeader::from_bytes(r.bytes(RigSkeletonHeader::SIZE)?)?;
        if header.file_type != FILE_TYPE_SKELETON {
            return None;
        }

        let mut joints = Vec::new();
        for _ in 0..header.joint_count {
            let entry = RigJointEntry::from_bytes(r.bytes(RigJointEntry::SIZE)?)?;
            let transforms = (0..entry.transform_count)
                .map(|_| RigTransformEntry::from_bytes(r.bytes(RigTransformEntry::SIZE)?))
                .collect::<Option<Vec<_>>>()?;
            let children = (0..entry.child_count)
                .map(|_| r.i32())
                .collect::<Option<Vec<_>>>()?;
            joints.push(SkeletonJointRecord {
                entry,
                transforms,
                children,
            });
        }

        Some(Self { header, joints })
    }
}
