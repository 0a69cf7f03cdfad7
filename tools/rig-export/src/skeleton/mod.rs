//! Skeleton assembly (scene node graph -> canonical joint tree)
//!
//! [`build_skeleton`] walks the node graph under the controller's root joint,
//! then [`Skeleton::canonicalize`] gives every joint the same track layout.

mod builder;
mod canonical;
mod types;

pub use builder::{build_skeleton, DEFAULT_SKELETON_NAME};
pub use canonical::{
    canonicalize_joint, template_position, SlotKind, TemplateSlot, TEMPLATE_LEN,
    TRANSFORM_TEMPLATE,
};
pub use types::{Joint, Skeleton, TransformKind, TransformRecord};
