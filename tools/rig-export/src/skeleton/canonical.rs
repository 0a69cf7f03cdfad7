//! Fixed transform-track layout shared by every joint
//!
//! Animation curves address a joint's tracks by position, so every exported
//! joint carries the same tracks in the same order. Tracks the source left
//! out are filled with identity values.

use glam::Vec3;

use super::types::{Joint, Skeleton, TransformKind, TransformRecord};
use crate::error::SkeletonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Translation,
    Rotation,
}

/// One named entry of the track template
#[derive(Debug, Clone, Copy)]
pub struct TemplateSlot {
    pub name: &'static str,
    pub kind: SlotKind,
    /// Rotation axis; unused for translation
    pub axis: Vec3,
}

const fn slot(name: &'static str, kind: SlotKind, axis: Vec3) -> TemplateSlot {
    TemplateSlot { name, kind, axis }
}

/// Number of named tracks every joint ends up with
pub const TEMPLATE_LEN: usize = 10;

/// Canonical track order, after the optional leading coalesced matrix.
pub const TRANSFORM_TEMPLATE: [TemplateSlot; TEMPLATE_LEN] = [
    slot("translate", SlotKind::Translation, Vec3::ZERO),
    slot("jointOrientZ", SlotKind::Rotation, Vec3::Z),
    slot("jointOrientY", SlotKind::Rotation, Vec3::Y),
    slot("jointOrientX", SlotKind::Rotation, Vec3::X),
    slot("rotateZ", SlotKind::Rotation, Vec3::Z),
    slot("rotateY", SlotKind::Rotation, Vec3::Y),
    slot("rotateX", SlotKind::Rotation, Vec3::X),
    slot("rotateAxisZ", SlotKind::Rotation, Vec3::Z),
    slot("rotateAxisY", SlotKind::Rotation, Vec3::Y),
    slot("rotateAxisX", SlotKind::Rotation, Vec3::X),
];

impl TemplateSlot {
    fn identity(&self) -> TransformRecord {
        match self.kind {
            SlotKind::Translation => TransformRecord::translation(Vec3::ZERO, self.name),
            SlotKind::Rotation => TransformRecord::rotation(self.axis, 0.0, self.name),
        }
    }

    fn accepts(&self, kind: &TransformKind) -> bool {
        matches!(
            (self.kind, kind),
            (SlotKind::Translation, TransformKind::Translation(_))
                | (SlotKind::Rotation, TransformKind::Rotation { .. })
        )
    }
}

/// Position of a track name in the template.
pub fn template_position(name: &str) -> Option<usize> {
    TRANSFORM_TEMPLATE.iter().position(|s| s.name == name)
}

/// Rewrite a joint's tracks into template order, synthesizing missing ones.
///
/// Tracks must already be in template-relative order; misordered or
/// repeated tracks are rejected rather than reordered.
pub fn canonicalize_joint(joint: &Joint) -> Result<Vec<TransformRecord>, SkeletonError> {
    let mut tracks = joint.transforms.iter().peekable();
    let mut out = Vec::with_capacity(TEMPLATE_LEN + 1);

    if let Some(record) = tracks.next_if(|t| t.is_coalesced()) {
        out.push(record.clone());
    }

    let mut slots: [Option<&TransformRecord>; TEMPLATE_LEN] = Default::default();
    let mut last: Option<usize> = None;
    for record in tracks {
        let Some(position) = template_position(&record.name) else {
            return Err(SkeletonError::UnknownTransform {
                joint: joint.name.clone(),
                transform: record.name.clone(),
            });
        };
        if !TRANSFORM_TEMPLATE[position].accepts(&record.kind) {
            return Err(SkeletonError::TransformKind {
                joint: joint.name.clone(),
                transform: record.name.clone(),
            });
        }
        if last.is_some_and(|l| position <= l) {
            return Err(SkeletonError::MisorderedTransform {
                joint: joint.name.clone(),
                transform: record.name.clone(),
            });
        }
        slots[position] = Some(record);
        last = Some(position);
    }

    for (slot, record) in TRANSFORM_TEMPLATE.iter().zip(slots) {
        out.push(match record {
            Some(r) => r.clone(),
            None => slot.identity(),
        });
    }
    Ok(out)
}

impl Skeleton {
    /// Bring every joint's tracks into the canonical layout.
    ///
    /// Nothing is modified unless every joint succeeds.
    pub fn canonicalize(&mut self) -> Result<(), SkeletonError> {
        let canonical = self
            .joints
            .iter()
            .map(canonicalize_joint)
            .collect::<Result<Vec<_>, _>>()?;
        for (joint, transforms) in self.joints.iter_mut().zip(canonical) {
            joint.transforms = transforms;
        }
        Ok(())
    }

    /// Whether every joint already has the canonical layout.
    pub fn is_canonical(&self) -> bool {
        self.joints.iter().all(|joint| {
            let named = match joint.transforms.first() {
                Some(first) if first.is_coalesced() => &joint.transforms[1..],
                _ => &joint.transforms[..],
            };
            named.len() == TRANSFORM_TEMPLATE.len()
                && named
                    .iter()
                    .zip(TRANSFORM_TEMPLATE.iter())
                    .all(|(t, s)| t.name == s.name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn joint(transforms: Vec<TransformRecord>) -> Joint {
        Joint {
            id: 0,
            name: "elbow".into(),
            inverse_bind_matrix: Mat4::IDENTITY,
            transforms,
            parent: None,
            children: Vec::new(),
        }
    }

    fn names(records: &[TransformRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_empty_joint_gets_full_template() {
        let out = canonicalize_joint(&joint(vec![])).unwrap();
        let expected: Vec<&str> = TRANSFORM_TEMPLATE.iter().map(|s| s.name).collect();
        assert_eq!(names(&out), expected);
        assert_eq!(out[0].kind, TransformKind::Translation(Vec3::ZERO));
        assert_eq!(
            out[1].kind,
            TransformKind::Rotation {
                axis: Vec3::Z,
                angle: 0.0
            }
        );
        assert_eq!(
            out[6].kind,
            TransformKind::Rotation {
                axis: Vec3::X,
                angle: 0.0
            }
        );
    }

    #[test]
    fn test_existing_tracks_keep_values() {
        let out = canonicalize_joint(&joint(vec![
            TransformRecord::translation(Vec3::new(0.0, 3.0, 0.0), "translate"),
            TransformRecord::rotation(Vec3::Y, 30.0, "rotateY"),
        ]))
        .unwrap();
        assert_eq!(out.len(), TRANSFORM_TEMPLATE.len());
        assert_eq!(out[0].kind, TransformKind::Translation(Vec3::new(0.0, 3.0, 0.0)));
        assert_eq!(
            out[5].kind,
            TransformKind::Rotation {
                axis: Vec3::Y,
                angle: 30.0
            }
        );
    }

    #[test]
    fn test_coalesced_track_leads_once() {
        let m = Mat4::from_translation(Vec3::X);
        let out = canonicalize_joint(&joint(vec![
            TransformRecord::coalesced(m),
            TransformRecord::translation(Vec3::ONE, "translate"),
        ]))
        .unwrap();
        assert_eq!(out.len(), TRANSFORM_TEMPLATE.len() + 1);
        assert_eq!(out[0].kind, TransformKind::Matrix(m));
        assert_eq!(out[1].name, "translate");
        assert_eq!(out.iter().filter(|t| t.is_coalesced()).count(), 1);

        // Canonicalizing again changes nothing
        let again = canonicalize_joint(&joint(out.clone())).unwrap();
        assert_eq!(again, out);
    }

    #[test]
    fn test_misordered_tracks_rejected() {
        let err = canonicalize_joint(&joint(vec![
            TransformRecord::rotation(Vec3::X, 10.0, "rotateX"),
            TransformRecord::rotation(Vec3::Z, 10.0, "rotateZ"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            SkeletonError::MisorderedTransform {
                joint: "elbow".into(),
                transform: "rotateZ".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_track_rejected() {
        let err = canonicalize_joint(&joint(vec![
            TransformRecord::translation(Vec3::ONE, "translate"),
            TransformRecord::translation(Vec3::ONE, "translate"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SkeletonError::MisorderedTransform { .. }));
    }

    #[test]
    fn test_unknown_and_mismatched_tracks() {
        let err = canonicalize_joint(&joint(vec![TransformRecord::rotation(
            Vec3::X,
            5.0,
            "twist",
        )]))
        .unwrap_err();
        assert!(matches!(err, SkeletonError::UnknownTransform { .. }));

        let err = canonicalize_joint(&joint(vec![TransformRecord::translation(
            Vec3::ONE,
            "rotateY",
        )]))
        .unwrap_err();
        assert!(matches!(err, SkeletonError::TransformKind { .. }));

        // A named matrix is not the coalesced slot
        let named = TransformRecord {
            kind: TransformKind::Matrix(Mat4::IDENTITY),
            name: "transform".into(),
        };
        assert!(canonicalize_joint(&joint(vec![named])).is_err());
    }

    #[test]
    fn test_skeleton_canonicalize_all_or_nothing() {
        let good = joint(vec![]);
        let mut bad = joint(vec![TransformRecord::translation(Vec3::ONE, "bogus")]);
        bad.id = 1;
        let mut skeleton = Skeleton {
            name: "rig".into(),
            joints: vec![good, bad],
        };
        assert!(skeleton.canonicalize().is_err());
        assert!(skeleton.joints[0].transforms.is_empty());
        assert!(!skeleton.is_canonical());

        skeleton.joints.truncate(1);
        skeleton.canonicalize().unwrap();
        assert!(skeleton.is_canonical());
    }
}
