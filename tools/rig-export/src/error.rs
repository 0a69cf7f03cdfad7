//! Typed errors for each asset kind.
//!
//! Mesh and animation errors abort the asset being baked. Skeleton errors
//! abort the whole run, since every skinned mesh and clip addresses joints by
//! the skeleton's numbering.

use std::path::PathBuf;

use thiserror::Error;

/// Broad class of a mesh failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshErrorCategory {
    /// A required attribute stream is absent
    Structural,
    /// Indices, counts or influences disagree with each other
    Consistency,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("mesh has no position data")]
    MissingPositions,

    #[error("{attribute} stream has {len} values but stride 0")]
    ZeroStride { attribute: &'static str, len: usize },

    #[error("{attribute} stream length {len} is not a multiple of stride {stride}")]
    PartialVector {
        attribute: &'static str,
        len: usize,
        stride: u32,
    },

    #[error("submesh {submesh} has no position indices")]
    MissingPositionIndices { submesh: usize },

    #[error("submesh {submesh}: {attribute} index {index} out of range ({count} elements)")]
    IndexOutOfRange {
        submesh: usize,
        attribute: &'static str,
        index: u32,
        count: usize,
    },

    #[error("submesh {submesh}: {attribute} has {found} indices, expected {expected}")]
    IndexCountMismatch {
        submesh: usize,
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("submesh {submesh}: face vertex counts sum to {sum}, but there are {indices} indices")]
    FaceCountMismatch {
        submesh: usize,
        sum: u64,
        indices: usize,
    },

    #[error("submesh {submesh}: face {face} has {count} vertices (minimum 3)")]
    DegenerateFace {
        submesh: usize,
        face: usize,
        count: u32,
    },

    #[error("influence table covers {found} control points, mesh has {expected}")]
    InfluenceCountMismatch { expected: usize, found: usize },

    #[error("influence counts sum to {pairs}, but table has {joints} joints and {weights} weights")]
    InfluencePairMismatch {
        pairs: u64,
        joints: usize,
        weights: usize,
    },

    #[error("joint index {joint} exceeds the 8-bit limit of 255")]
    JointIndexOverflow { joint: u32 },

    #[error("joint index {joint} out of range ({count} joints)")]
    JointIndexOutOfRange { joint: u32, count: u32 },

    #[error(
        "submesh {submesh}: corner {corner} uses different position/normal/texcoord indices, \
         which indexed export does not support"
    )]
    NotIndexed { submesh: usize, corner: usize },

    #[error("mesh bakes to {count} vertices, more than a u32 count can hold")]
    TooManyVertices { count: usize },
}

impl MeshError {
    pub fn category(&self) -> MeshErrorCategory {
        match self {
            MeshError::MissingPositions => MeshErrorCategory::Structural,
            _ => MeshErrorCategory::Consistency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkeletonError {
    #[error("skin controller '{0}' binds no nodes")]
    NoBoundNodes(String),

    #[error("no bound node is free of bound ancestors")]
    NoRoot,

    #[error("bound node {0} does not exist in the scene")]
    UnknownNode(usize),

    #[error("node '{0}' is reached twice while walking the hierarchy")]
    CyclicHierarchy(String),

    #[error(
        "pass-through node '{node}' has {children} children; its transform cannot be folded \
         into more than one joint"
    )]
    MultiChildPassThrough { node: String, children: usize },

    #[error("joint '{joint}' has unsupported non-unit scale {scale:?}")]
    NonUnitScale { joint: String, scale: [f32; 3] },

    #[error("joint '{joint}' is bound at index {id} but visited at pre-order position {position}")]
    JointOrder {
        joint: String,
        id: usize,
        position: usize,
    },

    #[error("joint '{joint}' has unknown transform '{transform}'")]
    UnknownTransform { joint: String, transform: String },

    #[error("joint '{joint}': transform '{transform}' has the wrong kind for its slot")]
    TransformKind { joint: String, transform: String },

    #[error("joint '{joint}': transform '{transform}' is out of order")]
    MisorderedTransform { joint: String, transform: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("animation '{animation}': target '{target}' is not of the form joint/component")]
    MalformedTarget { animation: String, target: String },

    #[error("animation '{animation}': no joint named '{joint}'")]
    UnknownJoint { animation: String, joint: String },

    #[error("animation '{animation}': unsupported component '{component}'")]
    UnknownComponent {
        animation: String,
        component: String,
    },

    #[error("animation '{animation}': {component} needs {expected} curves, found {found}")]
    CurveCount {
        animation: String,
        component: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("animation '{animation}': unsupported keyframe interpolation '{interpolation}'")]
    UnsupportedInterpolation {
        animation: String,
        interpolation: String,
    },
}

/// Failure of one asset within an export run
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("mesh '{name}': {source}")]
    Mesh {
        name: String,
        #[source]
        source: MeshError,
    },

    #[error("skeleton '{name}': {source}")]
    Skeleton {
        name: String,
        #[source]
        source: SkeletonError,
    },

    #[error("clip '{name}': {source}")]
    Animation {
        name: String,
        #[source]
        source: AnimationError,
    },

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Whether the run must stop instead of skipping this asset.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExportError::Skeleton { .. })
    }
}
