//! Baked rig binary asset formats
//!
//! These are POD (Plain Old Data) records with no magic bytes; the file type
//! is identified by the `file_type` header field (meshes, skeletons) or by
//! context (animation clips). All scalars are native-endian, matching the
//! in-memory layout of the runtime that consumes them.
//!
//! Every fixed-size record implements the [`BinarySerializable`] trait for
//! consistent serialization/deserialization.

pub mod animation;
pub mod mesh;
mod names;
mod serialization;
pub mod skeleton;

pub use animation::*;
pub use mesh::*;
pub use names::{decode_name, encode_name, name_fits};
pub use serialization::BinarySerializable;
pub use skeleton::*;

pub use crate::rig_format::{RigFormat, RIG_FORMAT};

/// `file_type` value of a mesh file header
pub const FILE_TYPE_MESH: u32 = 0;

/// `file_type` value of a skeleton file header
pub const FILE_TYPE_SKELETON: u32 = 1;

/// Width of the texture filename field in a mesh header
pub const TEXTURE_NAME_LENGTH: usize = 64;

/// Width of a joint name field
pub const JOINT_NAME_LENGTH: usize = 64;

/// Width of a transform record name field
pub const TRANSFORM_NAME_LENGTH: usize = 32;

/// Width of the clip name field
pub const CLIP_NAME_LENGTH: usize = 64;

/// Width of an animation name field
pub const ANIMATION_NAME_LENGTH: usize = 64;

/// Width of the target transform name field of an animation
pub const TARGET_TRANSFORM_NAME_LENGTH: usize = 32;
