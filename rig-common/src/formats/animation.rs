//! Baked animation clip binary format (.riganim)
//!
//! POD format - no magic bytes and no file type field; clip files are
//! identified by extension.
//!
//! # Layout
//! ```text
//! clip header (76 bytes):
//!   major_version u32, minor_version u32, name [u8; 64], animation_count u32
//! animation_count × animation:
//!   animation header (168 bytes):
//!     name [u8; 64], curve_count u32, joint_name [u8; 64], component i32,
//!     target_transform_name [u8; 32]
//!   curve_count × curve:
//!     keyframe_count u32
//!     keyframe_count × keyframe:
//!       keyframe_type u32, time f32, value f32
//!       Bezier payload: in_tangent_x, in_tangent_y, out_tangent_x, out_tangent_y (f32)
//! ```

use super::serialization::{FieldReader, FieldWriter};
use super::{ANIMATION_NAME_LENGTH, CLIP_NAME_LENGTH, JOINT_NAME_LENGTH, TARGET_TRANSFORM_NAME_LENGTH};
use crate::rig_format::RIG_FORMAT;

/// Keyframe payload kind stored in `RigKeyframeCommon::keyframe_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum KeyframeType {
    Bezier = 0,
}

impl KeyframeType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Bezier),
            _ => None,
        }
    }
}

/// Clip file header (76 bytes)
#[derive(Debug, Clone, PartialEq)]
pub struct RigClipHeader {
    pub major_version: u32,
    pub minor_version: u32,
    pub name: String,
    pub animation_count: u32,
}

impl RigClipHeader {
    pub const SIZE: usize = 8 + CLIP_NAME_LENGTH + 4;

    pub fn new(name: &str, animation_count: u32) -> Self {
        Self {
            major_version: RIG_FORMAT.major_version,
            minor_version: RIG_FORMAT.minor_version,
            name: name.to_string(),
            animation_count,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut w = FieldWriter::new(&mut bytes);
        w.u32(self.major_version);
        w.u32(self.minor_version);
        w.name(&self.name, CLIP_NAME_LENGTH);
        w.u32(self.animation_count);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut r = FieldReader::new(bytes);
        Some(Self {
            major_version: r.u32()?,
            minor_version: r.u32()?,
            name: r.name(CLIP_NAME_LENGTH)?,
            animation_count: r.u32()?,
        })
    }
}

/// Per-animation header (168 bytes)
#[derive(Debug, Clone, PartialEq)]
pub struct RigAnimationHeader {
    pub name: String,
    pub curve_count: u32,
    pub joint_name: String,
    /// Index of the driven component (rotateX=0, rotateY=1, rotateZ=2, translate=3)
    pub component: i32,
    pub target_transform_name: String,
}

impl RigAnimationHeader {
    pub const SIZE: usize =
        ANIMATION_NAME_LENGTH + 4 + JOINT_NAME_LENGTH + 4 + TARGET_TRANSFORM_NAME_LENGTH;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut w = FieldWriter::new(&mut bytes);
        w.name(&self.name, ANIMATION_NAME_LENGTH);
        w.u32(self.curve_count);
        w.name(&self.joint_name, JOINT_NAME_LENGTH);
        w.i32(self.component);
        w.name(&self.target_transform_name, TARGET_TRANSFORM_NAME_LENGTH);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut r = FieldReader::new(bytes);
        Some(Self {
            name: r.name(ANIMATION_NAME_LENGTH)?,
            curve_count: r.u32()?,
            joint_name: r.name(JOINT_NAME_LENGTH)?,
            component: r.i32()?,
            target_transform_name: r.name(TARGET_TRANSFORM_NAME_LENGTH)?,
        })
    }
}

/// Per-curve header (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigCurveHeader {
    pub keyframe_count: u32,
}

impl RigCurveHeader {
    pub const SIZE: usize = 4;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.keyframe_count.to_ne_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut r = FieldReader::new(bytes);
        Some(Self {
            keyframe_count: r.u32()?,
        })
    }
}

/// Fields shared by every keyframe type (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigKeyframeCommon {
    pub keyframe_type: u32,
    pub time: f32,
    pub value: f32,
}

impl RigKeyframeCommon {
    pub const SIZE: usize = 12;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut w = FieldWriter::new(&mut bytes);
        w.u32(self.keyframe_type);
        w.f32(self.time);
        w.f32(self.value);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut r = FieldReader::new(bytes);
        Some(Self {
            keyframe_type: r.u32()?,
            time: r.f32()?,
            value: r.f32()?,
        })
    }
}

/// Bezier tangent payload following a Bezier keyframe (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigBezierKeyframe {
    pub in_tangent: [f32; 2],
    pub out_tangent: [f32; 2],
}

impl RigBezierKeyframe {
    pub const SIZE: usize = 16;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut w = FieldWriter::new(&mut bytes);
        w.f32(self.in_tangent[0]);
        w.f32(self.in_tangent[1]);
        w.f32(self.out_tangent[0]);
        w.f32(self.out_tangent[1]);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut r = FieldReader::new(bytes);
        Some(Self {
            in_tangent: [r.f32()?, r.f32()?],
            out_tangent: [r.f32()?, r.f32()?],
        })
    }
}

/// A decoded keyframe: common fields plus its type-specific payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipKeyframeRecord {
    pub common: RigKeyframeCommon,
    pub bezier: RigBezierKeyframe,
}

/// A decoded animation with its curves.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAnimationRecord {
    pub header: RigAnimationHeader,
    pub curves: Vec<Vec<ClipKeyframeRecord>>,
}

/// A decoded clip file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipFile {
    pub header: RigClipHeader,
    pub animations: Vec<ClipAnimationRecord>,
}

impl ClipFile {
    /// Parse a complete clip file.
    ///
    /// Returns `None` on a short read or an unknown keyframe type.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut r = FieldReader::new(bytes);
        let header = RigClipHeader::from_bytes(r.bytes(RigClipHeader::SIZE)?)?;

        let mut animations = Vec::new();
        for _ in 0..header.animation_count {
            let anim = RigAnimationHeader::from_bytes(r.bytes(RigAnimationHeader::SIZE)?)?;
            let mut curves = Vec::new();
            for _ in 0..anim.curve_count {
                let curve = RigCurveHeader::from_bytes(r.bytes(RigCurveHeader::SIZE)?)?;
                let mut keys = Vec::new();
                for _ in 0..curve.keyframe_count {
                    let common = RigKeyframeCommon::from_bytes(r.bytes(RigKeyframeCommon::SIZE)?)?;
                    let bezier = match KeyframeType::from_u32(common.keyframe_type)? {
                        KeyframeType::Bezier => {
                            RigBezierKeyframe::from_bytes(r.bytes(RigBezierKeyframe::SIZE)?)?
                        }
                    };
                    keys.push(ClipKeyframeRecord { common, bezier });
                }
                curves.push(keys);
            }
            animations.push(ClipAnimationRecord {
                header: anim,
                curves,
            });
        }

        Some(Self { header, animations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sizes() {
        assert_eq!(RigClipHeader::SIZE, 76);
        assert_eq!(RigAnimationHeader::SIZE, 168);
        assert_eq!(RigCurveHeader::SIZE, 4);
        assert_eq!(RigKeyframeCommon::SIZE, 12);
        assert_eq!(RigBezierKeyframe::SIZE, 16);
    }

    #[test]
    fn test_clip_header_roundtrip() {
        let header = RigClipHeader::new("walk", 3);
        let parsed = RigClipHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.major_version, 1);
        assert_eq!(parsed.minor_version, 0);
    }

    #[test]
    fn test_clip_header_from_short_bytes() {
        assert!(RigClipHeader::from_bytes(&[0u8; 75]).is_none());
        assert!(RigCurveHeader::from_bytes(&[0u8; 3]).is_none());
    }

    #[test]
    fn test_clip_file_parse() {
        let mut bytes = RigClipHeader::new("idle", 1).to_bytes().to_vec();
        let anim = RigAnimationHeader {
            name: "elbow_rotateZ".to_string(),
            curve_count: 1,
            joint_name: "elbow".to_string(),
            component: 2,
            target_transform_name: "rotateZ".to_string(),
        };
        bytes.extend_from_slice(&anim.to_bytes());
        bytes.extend_from_slice(&RigCurveHeader { keyframe_count: 2 }.to_bytes());
        for (time, value) in [(0.0f32, 10.0f32), (1.0, 20.0)] {
            let common = RigKeyframeCommon {
                keyframe_type: KeyframeType::Bezier as u32,
                time,
                value,
            };
            bytes.extend_from_slice(&common.to_bytes());
            let bezier = RigBezierKeyframe {
                in_tangent: [time - 0.25, value],
                out_tangent: [time + 0.25, value],
            };
            bytes.extend_from_slice(&bezier.to_bytes());
        }

        let clip = ClipFile::parse(&bytes).unwrap();
        assert_eq!(clip.header.name, "idle");
        assert_eq!(clip.animations.len(), 1);
        assert_eq!(clip.animations[0].header, anim);
        let keys = &clip.animations[0].curves[0];
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1].common.value, 20.0);
        assert_eq!(keys[1].bezier.out_tangent, [1.25, 20.0]);
    }

    #[test]
    fn test_clip_file_rejects_unknown_keyframe_type() {
        let mut bytes = RigClipHeader::new("bad", 1).to_bytes().to_vec();
        let anim = RigAnimationHeader {
            name: "a".to_string(),
            curve_count: 1,
            joint_name: "j".to_string(),
            component: 0,
            target_transform_name: "rotateX".to_string(),
        };
        bytes.extend_from_slice(&anim.to_bytes());
        bytes.extend_from_slice(&RigCurveHeader { keyframe_count: 1 }.to_bytes());
        let common = RigKeyframeCommon {
            keyframe_type: 7,
            time: 0.0,
            value: 0.0,
        };
        bytes.extend_from_slice(&common.to_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        assert!(ClipFile::parse(&bytes).is_none());
    }
}
