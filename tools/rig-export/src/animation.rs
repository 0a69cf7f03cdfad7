//! Animation clip extraction (scene curves -> joint-addressed clips)
//!
//! Each animation drives one component of one joint. The joint is resolved
//! by name once and kept as an index into the skeleton's joint list.

use crate::error::AnimationError;
use crate::math::EPSILON;
use crate::scene::{SourceAnimation, SourceClip};
use crate::skeleton::Skeleton;

/// Joint component an animation drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    RotateX,
    RotateY,
    RotateZ,
    Translate,
}

impl Component {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rotateX" => Some(Self::RotateX),
            "rotateY" => Some(Self::RotateY),
            "rotateZ" => Some(Self::RotateZ),
            "translate" => Some(Self::Translate),
            _ => None,
        }
    }

    /// Component index stored in clip files.
    pub fn index(self) -> i32 {
        match self {
            Self::RotateX => 0,
            Self::RotateY => 1,
            Self::RotateZ => 2,
            Self::Translate => 3,
        }
    }

    /// Name of the transform track this component animates.
    pub fn transform_name(self) -> &'static str {
        match self {
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::Translate => "translate",
        }
    }

    /// One curve for an angle, one per axis for a translation.
    pub fn expected_curves(self) -> usize {
        match self {
            Self::Translate => 3,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationKeyframe {
    Bezier {
        time: f32,
        value: f32,
        in_tangent: [f32; 2],
        out_tangent: [f32; 2],
    },
}

impl AnimationKeyframe {
    pub fn time(&self) -> f32 {
        match *self {
            AnimationKeyframe::Bezier { time, .. } => time,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            AnimationKeyframe::Bezier { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationCurve {
    pub keyframes: Vec<AnimationKeyframe>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    /// Index into the skeleton's joint list
    pub joint: u32,
    pub component: Component,
    pub curves: Vec<AnimationCurve>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub animations: Vec<Animation>,
}

/// Split `joint/component`.
pub fn parse_target(source: &SourceAnimation) -> Result<(&str, Component), AnimationError> {
    let malformed = || AnimationError::MalformedTarget {
        animation: source.name.clone(),
        target: source.target.clone(),
    };
    let (joint, component) = source.target.rsplit_once('/').ok_or_else(malformed)?;
    if joint.is_empty() {
        return Err(malformed());
    }
    let component = Component::from_name(component).ok_or_else(|| {
        AnimationError::UnknownComponent {
            animation: source.name.clone(),
            component: component.to_string(),
        }
    })?;
    Ok((joint, component))
}

fn animation_name(source: &SourceAnimation) -> String {
    if source.name.is_empty() {
        source.target.replace('/', "_")
    } else {
        source.name.clone()
    }
}

/// Look up the animation's joint, returning its index and component.
fn resolve(
    source: &SourceAnimation,
    skeleton: &Skeleton,
) -> Result<(u32, Component), AnimationError> {
    let (joint_name, component) = parse_target(source)?;
    let joint = skeleton
        .find(joint_name)
        .ok_or_else(|| AnimationError::UnknownJoint {
            animation: source.name.clone(),
            joint: joint_name.to_string(),
        })?;
    Ok((joint, component))
}

/// Check curve count and convert keyframes.
fn build_animation(
    source: &SourceAnimation,
    joint: u32,
    component: Component,
) -> Result<Animation, AnimationError> {
    let expected = component.expected_curves();
    if source.curves.len() != expected {
        return Err(AnimationError::CurveCount {
            animation: source.name.clone(),
            component: component.transform_name(),
            expected,
            found: source.curves.len(),
        });
    }

    let mut curves = Vec::with_capacity(source.curves.len());
    for curve in &source.curves {
        let mut keyframes = Vec::with_capacity(curve.keys.len());
        for key in &curve.keys {
            if !key.interpolation.eq_ignore_ascii_case("bezier") {
                return Err(AnimationError::UnsupportedInterpolation {
                    animation: source.name.clone(),
                    interpolation: key.interpolation.clone(),
                });
            }
            keyframes.push(AnimationKeyframe::Bezier {
                time: key.time,
                value: key.value,
                in_tangent: key.in_tangent,
                out_tangent: key.out_tangent,
            });
        }
        curves.push(AnimationCurve { keyframes });
    }

    Ok(Animation {
        name: animation_name(source),
        joint,
        component,
        curves,
    })
}

/// Extract one explicitly authored clip. Any bad animation fails the clip.
pub fn extract_clip(
    source: &SourceClip,
    index: usize,
    skeleton: &Skeleton,
) -> Result<AnimationClip, AnimationError> {
    let name = if source.name.is_empty() {
        format!("AnimationClip{}", index)
    } else {
        source.name.clone()
    };

    let animations = source
        .animations
        .iter()
        .map(|anim| {
            let (joint, component) = resolve(anim, skeleton)?;
            build_animation(anim, joint, component)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnimationClip { name, animations })
}

/// Gather animations that belong to no clip into one clip named after the
/// skeleton.
///
/// Animations whose target cannot be resolved are skipped. Translations of
/// non-root joints that stay at zero are dropped. A wrong curve count or
/// keyframe type fails the clip. Returns `None` when nothing is left.
pub fn extract_loose_clip(
    sources: &[SourceAnimation],
    skeleton: &Skeleton,
) -> Result<Option<AnimationClip>, AnimationError> {
    let mut animations = Vec::new();
    for source in sources {
        let (joint, component) = match resolve(source, skeleton) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!("Skipping animation: {}", err);
                continue;
            }
        };

        let animation = build_animation(source, joint, component)?;
        if component == Component::Translate && joint != 0 && is_static_zero(&animation) {
            tracing::debug!(
                "Dropping zero translation on joint '{}'",
                skeleton.joint(joint).map_or("", |j| j.name.as_str())
            );
            continue;
        }
        animations.push(animation);
    }

    if animations.is_empty() {
        return Ok(None);
    }
    Ok(Some(AnimationClip {
        name: skeleton.name.clone(),
        animations,
    }))
}

fn is_static_zero(animation: &Animation) -> bool {
    animation
        .curves
        .iter()
        .flat_map(|c| c.keyframes.iter())
        .all(|k| k.value().abs() <= EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::tests::node;
    use crate::scene::{BoundJoint, Controller, SceneDocument, SourceCurve, SourceKey};
    use crate::skeleton::build_skeleton;
    use glam::Mat4;

    fn skeleton() -> Skeleton {
        let doc = SceneDocument {
            nodes: vec![node("hip", vec![1]), node("knee", vec![])],
            ..Default::default()
        };
        let controller = Controller {
            name: "walker".into(),
            geometry: 0,
            bind_shape_matrix: Mat4::IDENTITY.to_cols_array(),
            joints: (0..2)
                .map(|node| BoundJoint {
                    node,
                    inverse_bind_matrix: Mat4::IDENTITY.to_cols_array(),
                })
                .collect(),
            influences: Vec::new(),
        };
        build_skeleton(&doc, &controller).unwrap()
    }

    fn curve(values: &[f32]) -> SourceCurve {
        SourceCurve {
            keys: values
                .iter()
                .enumerate()
                .map(|(i, &value)| SourceKey {
                    time: i as f32,
                    value,
                    interpolation: "BEZIER".into(),
                    in_tangent: [i as f32, value],
                    out_tangent: [i as f32, value],
                })
                .collect(),
        }
    }

    fn anim(target: &str, curves: Vec<SourceCurve>) -> SourceAnimation {
        SourceAnimation {
            name: String::new(),
            target: target.into(),
            curves,
        }
    }

    #[test]
    fn test_parse_target() {
        let a = anim("knee/rotateZ", vec![]);
        assert_eq!(parse_target(&a).unwrap(), ("knee", Component::RotateZ));

        assert!(matches!(
            parse_target(&anim("knee", vec![])),
            Err(AnimationError::MalformedTarget { .. })
        ));
        assert!(matches!(
            parse_target(&anim("knee/scale", vec![])),
            Err(AnimationError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn test_component_indices() {
        assert_eq!(Component::RotateX.index(), 0);
        assert_eq!(Component::RotateY.index(), 1);
        assert_eq!(Component::RotateZ.index(), 2);
        assert_eq!(Component::Translate.index(), 3);
        assert_eq!(Component::from_name("translate"), Some(Component::Translate));
    }

    #[test]
    fn test_extract_clip() {
        let skeleton = skeleton();
        let source = SourceClip {
            name: String::new(),
            animations: vec![
                anim("knee/rotateX", vec![curve(&[0.0, 45.0])]),
                anim("hip/translate", vec![curve(&[0.0]), curve(&[1.0]), curve(&[0.0])]),
            ],
        };
        let clip = extract_clip(&source, 2, &skeleton).unwrap();
        assert_eq!(clip.name, "AnimationClip2");
        assert_eq!(clip.animations[0].joint, 1);
        assert_eq!(clip.animations[0].name, "knee_rotateX");
        assert_eq!(clip.animations[0].curves[0].keyframes[1].value(), 45.0);
        assert_eq!(clip.animations[1].curves.len(), 3);
    }

    #[test]
    fn test_extract_clip_fails_on_bad_animation() {
        let skeleton = skeleton();
        let source = SourceClip {
            name: "broken".into(),
            animations: vec![anim("ankle/rotateX", vec![curve(&[0.0])])],
        };
        assert!(matches!(
            extract_clip(&source, 0, &skeleton),
            Err(AnimationError::UnknownJoint { .. })
        ));

        let mut stepped = curve(&[0.0]);
        stepped.keys[0].interpolation = "STEP".into();
        let source = SourceClip {
            name: "stepped".into(),
            animations: vec![anim("knee/rotateX", vec![stepped])],
        };
        assert!(matches!(
            extract_clip(&source, 0, &skeleton),
            Err(AnimationError::UnsupportedInterpolation { .. })
        ));
    }

    #[test]
    fn test_loose_clip_skips_and_strips() {
        let skeleton = skeleton();
        let sources = vec![
            anim("ghost/rotateX", vec![curve(&[1.0])]),
            anim("knee/translate", vec![curve(&[0.0]), curve(&[0.0005]), curve(&[0.0])]),
            anim("hip/translate", vec![curve(&[0.0]), curve(&[0.0]), curve(&[0.0])]),
            anim("knee/rotateY", vec![curve(&[10.0, 20.0])]),
        ];
        let clip = extract_loose_clip(&sources, &skeleton).unwrap().unwrap();
        assert_eq!(clip.name, "walker");
        let targets: Vec<_> = clip
            .animations
            .iter()
            .map(|a| (a.joint, a.component))
            .collect();
        assert_eq!(
            targets,
            vec![(0, Component::Translate), (1, Component::RotateY)]
        );
    }

    #[test]
    fn test_loose_clip_wrong_curve_count() {
        let skeleton = skeleton();
        let sources = vec![anim("knee/rotateX", vec![curve(&[0.0]), curve(&[0.0])])];
        assert!(matches!(
            extract_loose_clip(&sources, &skeleton),
            Err(AnimationError::CurveCount {
                expected: 1,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_loose_clip_empty() {
        assert_eq!(extract_loose_clip(&[], &skeleton()).unwrap(), None);
    }
}
