//! Shared types for baked rig assets
//!
//! This crate provides the fixed-layout binary records written by
//! `rig-export` and read back by tooling and tests.
//!
//! # Modules
//!
//! - [`formats`] - Mesh, skeleton and animation clip record layouts
//! - [`rig_format`] - Versions and file extensions

pub mod formats;
pub mod rig_format;

pub use rig_format::{RigFormat, RIG_FORMAT};

// Re-export commonly used format items
pub use formats::{
    decode_name, encode_name, name_fits, vertex_stride, BinarySerializable, ClipFile, KeyframeType, MeshFile,
    RigAnimationHeader, RigBezierKeyframe, RigClipHeader, RigCurveHeader, RigJointEntry,
    RigKeyframeCommon, RigMeshHeader, RigSkeletonHeader, RigTransformEntry, SkeletonFile,
    SkeletonJointRecord, TransformType, ANIMATION_NAME_LENGTH, CLIP_NAME_LENGTH, FILE_TYPE_MESH, FILE_TYPE_SKELETON,
    IDENTITY_MATRIX, JOINT_NAME_LENGTH, TARGET_TRANSFORM_NAME_LENGTH, TEXTURE_NAME_LENGTH,
    TRANSFORM_NAME_LENGTH,
};
