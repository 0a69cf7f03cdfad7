//! In-memory scene document handed over by the upstream reader.
//!
//! The document is a JSON file: an arena of nodes (each with ordered
//! transforms, children and entity instances), plus geometry, skin
//! controller and animation tables addressed by index.

use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::math;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub root: usize,
    #[serde(default)]
    pub geometries: Vec<Geometry>,
    #[serde(default)]
    pub controllers: Vec<Controller>,
    #[serde(default)]
    pub animation_clips: Vec<SourceClip>,
    #[serde(default)]
    pub animations: Vec<SourceAnimation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    #[serde(default)]
    pub transforms: Vec<SourceTransform>,
    #[serde(default)]
    pub children: Vec<usize>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

/// One entry of a node's ordered transform stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceTransform {
    Rotate {
        #[serde(default)]
        sid: String,
        axis: [f32; 3],
        /// Degrees
        angle: f32,
    },
    Translate {
        #[serde(default)]
        sid: String,
        value: [f32; 3],
    },
    Scale {
        #[serde(default)]
        sid: String,
        value: [f32; 3],
    },
    Matrix {
        #[serde(default)]
        sid: String,
        /// Column-major
        value: [f32; 16],
    },
}

impl SourceTransform {
    pub fn sid(&self) -> &str {
        match self {
            SourceTransform::Rotate { sid, .. }
            | SourceTransform::Translate { sid, .. }
            | SourceTransform::Scale { sid, .. }
            | SourceTransform::Matrix { sid, .. } => sid,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        match self {
            SourceTransform::Rotate { axis, angle, .. } => {
                math::rotation_matrix(Vec3::from_array(*axis), *angle)
            }
            SourceTransform::Translate { value, .. } => {
                math::translation_matrix(Vec3::from_array(*value))
            }
            SourceTransform::Scale { value, .. } => math::scale_matrix(Vec3::from_array(*value)),
            SourceTransform::Matrix { value, .. } => Mat4::from_cols_array(value),
        }
    }
}

impl SceneNode {
    /// Product of the node's transforms, first entry outermost.
    pub fn local_matrix(&self) -> Mat4 {
        self.transforms
            .iter()
            .fold(Mat4::IDENTITY, |acc, t| math::multiply(&acc, &t.matrix()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instance {
    Geometry(usize),
    Controller(usize),
}

/// Flat attribute stream with a vector width
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStream {
    pub stride: u32,
    pub data: Vec<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSubmesh {
    #[serde(default)]
    pub positions: Vec<u32>,
    #[serde(default)]
    pub normals: Vec<u32>,
    #[serde(default)]
    pub texcoords: Vec<u32>,
    /// Vertices per face; absent when the submesh is already triangles
    #[serde(default)]
    pub face_vertex_counts: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub positions: Option<SourceStream>,
    #[serde(default)]
    pub normals: Option<SourceStream>,
    #[serde(default)]
    pub texcoords: Option<SourceStream>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub submeshes: Vec<SourceSubmesh>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundJoint {
    pub node: usize,
    pub inverse_bind_matrix: [f32; 16],
}

/// Skin controller: binds a geometry to a set of joint nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    #[serde(default)]
    pub name: String,
    pub geometry: usize,
    #[serde(default = "identity_cols")]
    pub bind_shape_matrix: [f32; 16],
    pub joints: Vec<BoundJoint>,
    /// Per control point: (bound joint index, weight) pairs
    #[serde(default)]
    pub influences: Vec<Vec<(u32, f32)>>,
}

fn identity_cols() -> [f32; 16] {
    Mat4::IDENTITY.to_cols_array()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceClip {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animations: Vec<SourceAnimation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceAnimation {
    #[serde(default)]
    pub name: String,
    /// `jointName/component`
    pub target: String,
    #[serde(default)]
    pub curves: Vec<SourceCurve>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCurve {
    pub keys: Vec<SourceKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceKey {
    pub time: f32,
    pub value: f32,
    #[serde(default = "default_interpolation")]
    pub interpolation: String,
    #[serde(default)]
    pub in_tangent: [f32; 2],
    #[serde(default)]
    pub out_tangent: [f32; 2],
}

fn default_interpolation() -> String {
    "BEZIER".to_string()
}

/// An instance found while walking the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub node: usize,
    pub instance: Instance,
}

impl SceneDocument {
    /// Load and check a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene document: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid scene document: {:?}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let doc: SceneDocument = serde_json::from_str(text).context("Failed to parse JSON")?;
        doc.check_references()?;
        Ok(doc)
    }

    /// Reject dangling node, geometry and controller indices.
    pub fn check_references(&self) -> Result<()> {
        if !self.nodes.is_empty() && self.root >= self.nodes.len() {
            bail!("Root node {} does not exist", self.root);
        }
        for node in &self.nodes {
            for &child in &node.children {
                if child >= self.nodes.len() {
                    bail!("Node '{}' references missing child {}", node.name, child);
                }
            }
            for instance in &node.instances {
                let ok = match *instance {
                    Instance::Geometry(i) => i < self.geometries.len(),
                    Instance::Controller(i) => i < self.controllers.len(),
                };
                if !ok {
                    bail!("Node '{}' references missing {:?}", node.name, instance);
                }
            }
        }
        for controller in &self.controllers {
            if controller.geometry >= self.geometries.len() {
                bail!(
                    "Controller '{}' references missing geometry {}",
                    controller.name,
                    controller.geometry
                );
            }
            if let Some(joint) = controller.joints.iter().find(|j| j.node >= self.nodes.len()) {
                bail!(
                    "Controller '{}' binds missing node {}",
                    controller.name,
                    joint.node
                );
            }
        }
        Ok(())
    }

    /// Parent of every node, if any. The first parent wins for shared nodes.
    pub fn parents(&self) -> Vec<Option<usize>> {
        let mut parents = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if let Some(slot) = parents.get_mut(child) {
                    slot.get_or_insert(index);
                }
            }
        }
        parents
    }

    /// Name used for `restrict_objects` filtering.
    pub fn entity_name(&self, instance: Instance) -> &str {
        match instance {
            Instance::Geometry(i) => self.geometries.get(i).map_or("", |g| g.name.as_str()),
            Instance::Controller(i) => self.controllers.get(i).map_or("", |c| c.name.as_str()),
        }
    }

    /// Walk the scene from `root` in pre-order and collect instances.
    ///
    /// When `restrict` is non-empty, only entities named on it are kept.
    pub fn discover(&self, restrict: &[String]) -> Vec<EntityRef> {
        let mut found = Vec::new();
        if self.nodes.is_empty() {
            return found;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            let Some(node) = self.nodes.get(index) else {
                continue;
            };

            for &instance in &node.instances {
                let name = self.entity_name(instance);
                if !restrict.is_empty() && !restrict.iter().any(|r| r == name) {
                    tracing::debug!("Skipping '{}' (not in restrict list)", name);
                    continue;
                }
                found.push(EntityRef {
                    node: index,
                    instance,
                });
            }

            stack.extend(node.children.iter().rev().copied());
        }
        found
    }
}
