//! rig-export library
//!
//! Bakes a scene document (meshes, skin controllers, joint hierarchy and
//! animation curves) into fixed-layout binary assets.
//!
//! # Modules
//!
//! - [`mesh`] - validation, triangulation, interleaving and skin compaction
//! - [`skeleton`] - joint tree construction and track canonicalization
//! - [`animation`] - clip extraction
//! - [`formats`] - file writers
//! - [`pipeline`] - the complete export run

pub mod animation;
pub mod config;
pub mod error;
pub mod formats;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod skeleton;

// Re-export format description from rig-common
pub use rig_common::{RigFormat, RIG_FORMAT};

pub use config::{normalize_legacy_args, ExportArgs, ExportConfig};
pub use error::{AnimationError, ExportError, MeshError, SkeletonError};
pub use mesh::{BakeOptions, BakedMesh, Mesh};
pub use pipeline::{export_document, run, ExportSummary};
pub use scene::SceneDocument;
pub use skeleton::{build_skeleton, Skeleton};
