//! Format constants for baked rig assets.
//!
//! `RigFormat` is the single source of truth for the version stamped into
//! every file header and for the extension of each asset kind.
//!
//! # Example
//!
//! ```
//! use rig_common::RIG_FORMAT;
//!
//! assert_eq!(RIG_FORMAT.major_version, 1);
//! assert_eq!(RIG_FORMAT.mesh_ext, "rigmesh");
//! ```

/// Versions and extensions of the baked asset family.
#[derive(Debug, Clone, Copy)]
pub struct RigFormat {
    /// Major version; readers reject files with a different major
    pub major_version: u32,

    /// Minor version; additive changes only
    pub minor_version: u32,

    /// Mesh file extension without dot
    pub mesh_ext: &'static str,

    /// Skeleton file extension without dot
    pub skeleton_ext: &'static str,

    /// Animation clip file extension without dot
    pub animation_ext: &'static str,
}

impl RigFormat {
    pub const fn new(
        major_version: u32,
        minor_version: u32,
        mesh_ext: &'static str,
        skeleton_ext: &'static str,
        animation_ext: &'static str,
    ) -> Self {
        Self {
            major_version,
            minor_version,
            mesh_ext,
            skeleton_ext,
            animation_ext,
        }
    }

    /// Whether a header carrying `major` can be read by this build.
    pub fn accepts(&self, major: u32) -> bool {
        major == self.major_version
    }
}

/// Current rig asset format: version 1.0, `.rigmesh` / `.rigskel` / `.riganim`.
pub const RIG_FORMAT: RigFormat = RigFormat::new(1, 0, "rigmesh", "rigskel", "riganim");
