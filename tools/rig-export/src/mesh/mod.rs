//! Mesh assembly (scene geometry -> interleaved, skin-compacted vertices)
//!
//! A [`Mesh`] is filled incrementally: attribute pools first, then one
//! submesh at a time through [`Mesh::begin_submesh`]. [`Mesh::bake`]
//! validates the whole mesh, triangulates polygon faces and interleaves a
//! single vertex stream ready for [`crate::formats::write_mesh_file`].

mod packing;
mod triangulate;
mod types;
mod validate;

use glam::{Mat4, Vec3};

use crate::error::MeshError;
use crate::math::BoundingBox;
use crate::scene::{Controller, Geometry};

pub use triangulate::triangulate_fan;
pub use types::{
    AttributePool, BakeOptions, BakedMesh, IndexSet, Influence, InfluenceList, SkinTable,
};

/// Default model name for meshes without one
pub const DEFAULT_MESH_NAME: &str = "ExportedMesh";

/// Raw geometry awaiting validation and baking
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub texture: String,
    pub positions: AttributePool,
    pub normals: AttributePool,
    pub texcoords: AttributePool,
    pub submeshes: Vec<IndexSet>,
    pub skin: Option<SkinTable>,
    pub bind_shape_matrix: Mat4,
    /// Joints the skin may address; every joint index must be below this
    pub joint_count: u32,
}

/// Open submesh; dropped without [`SubmeshBuilder::finish`] it is discarded
pub struct SubmeshBuilder<'a> {
    mesh: &'a mut Mesh,
    indices: IndexSet,
}

impl SubmeshBuilder<'_> {
    pub fn positions(mut self, indices: Vec<u32>) -> Self {
        self.indices.positions = indices;
        self
    }

    pub fn normals(mut self, indices: Vec<u32>) -> Self {
        self.indices.normals = indices;
        self
    }

    pub fn texcoords(mut self, indices: Vec<u32>) -> Self {
        self.indices.texcoords = indices;
        self
    }

    pub fn face_vertex_counts(mut self, counts: Vec<u32>) -> Self {
        self.indices.face_vertex_counts = Some(counts);
        self
    }

    /// Close the submesh and append it to the mesh.
    pub fn finish(self) {
        self.mesh.submeshes.push(self.indices);
    }
}

impl Mesh {
    pub fn new(name: &str) -> Self {
        Self {
            name: if name.is_empty() {
                DEFAULT_MESH_NAME.to_string()
            } else {
                name.to_string()
            },
            bind_shape_matrix: Mat4::IDENTITY,
            ..Default::default()
        }
    }

    /// Build from a scene geometry, attaching skin data when a controller
    /// binds it.
    pub fn from_geometry(geometry: &Geometry, controller: Option<&Controller>) -> Self {
        let mut mesh = Mesh::new(&geometry.name);
        if let Some(p) = &geometry.positions {
            mesh.set_positions(p.stride, p.data.clone());
        }
        if let Some(n) = &geometry.normals {
            mesh.set_normals(n.stride, n.data.clone());
        }
        if let Some(t) = &geometry.texcoords {
            mesh.set_texcoords(t.stride, t.data.clone());
        }
        if let Some(texture) = &geometry.texture {
            mesh.set_texture(texture);
        }
        for sub in &geometry.submeshes {
            let mut builder = mesh
                .begin_submesh()
                .positions(sub.positions.clone())
                .normals(sub.normals.clone())
                .texcoords(sub.texcoords.clone());
            if let Some(counts) = &sub.face_vertex_counts {
                builder = builder.face_vertex_counts(counts.clone());
            }
            builder.finish();
        }
        if let Some(controller) = controller {
            mesh.set_skin(
                SkinTable::from_pairs(&controller.influences),
                Mat4::from_cols_array(&controller.bind_shape_matrix),
                controller.joints.len() as u32,
            );
        }
        mesh
    }

    pub fn set_positions(&mut self, stride: u32, data: Vec<f32>) {
        self.positions = AttributePool::new(stride, data);
    }

    pub fn set_normals(&mut self, stride: u32, data: Vec<f32>) {
        self.normals = AttributePool::new(stride, data);
    }

    /// Store texcoords with V flipped (`v' = 1 - v` on every odd scalar).
    pub fn set_texcoords(&mut self, stride: u32, mut data: Vec<f32>) {
        for v in data.iter_mut().skip(1).step_by(2) {
            *v = 1.0 - *v;
        }
        self.texcoords = AttributePool::new(stride, data);
    }

    /// Keep only the file name of a texture path.
    pub fn set_texture(&mut self, path: &str) {
        let name = path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path);
        self.texture = name.to_string();
    }

    pub fn set_skin(&mut self, skin: SkinTable, bind_shape_matrix: Mat4, joint_count: u32) {
        self.skin = Some(skin);
        self.bind_shape_matrix = bind_shape_matrix;
        self.joint_count = joint_count;
    }

    pub fn begin_submesh(&mut self) -> SubmeshBuilder<'_> {
        SubmeshBuilder {
            mesh: self,
            indices: IndexSet::default(),
        }
    }

    /// Width of the weight and joint index blocks.
    ///
    /// The widest control point, capped by `max_weights`, never below one
    /// when a skin is attached so the root-bind fallback fits.
    pub fn influence_width(&self, opts: &BakeOptions) -> u32 {
        let Some(skin) = &self.skin else {
            return 0;
        };
        let widest = skin.max_count();
        let capped = match opts.max_weights {
            0 => widest,
            cap => widest.min(cap),
        };
        capped.max(1)
    }

    /// Validate, triangulate and interleave into a single vertex stream.
    pub fn bake(&self, opts: &BakeOptions) -> Result<BakedMesh, MeshError> {
        self.validate(opts)?;

        let triangulated: Vec<IndexSet> = self.submeshes.iter().map(IndexSet::triangulated).collect();
        let vertex_count: usize = triangulated.iter().map(IndexSet::len).sum();
        let vertex_count = u32::try_from(vertex_count)
            .map_err(|_| MeshError::TooManyVertices { count: vertex_count })?;

        let matrices_per_vertex = self.influence_width(opts);
        let vertex_data = packing::interleave(self, &triangulated, matrices_per_vertex);

        let bounds = BoundingBox::from_points(
            (0..self.positions.count() as u32).map(|i| position_vec3(self.positions.get(i))),
        );

        let baked = BakedMesh {
            name: self.name.clone(),
            texture: self.texture.clone(),
            vertex_count,
            position_stride: self.positions.record_width(),
            normal_stride: self.normals.record_width(),
            texcoord_stride: self.texcoords.record_width(),
            matrices_per_vertex,
            bind_shape_matrix: self.bind_shape_matrix,
            vertex_data,
            bounds,
        };

        tracing::debug!(
            "Baked mesh '{}': {} vertices, {} bytes/vertex, {} weights, bounds {:?}..{:?}",
            baked.name,
            baked.vertex_count,
            baked.stride(),
            baked.matrices_per_vertex,
            baked.bounds.min,
            baked.bounds.max
        );

        Ok(baked)
    }
}

/// First three components of a position, zero-extended.
fn position_vec3(p: &[f32]) -> Vec3 {
    let at = |i: usize| p.get(i).copied().unwrap_or(0.0);
    Vec3::new(at(0), at(1), at(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new("quad");
        mesh.set_positions(
            3,
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
        );
        mesh.set_texcoords(2, vec![0.0, 0.0, 1.0, 0.25, 1.0, 1.0, 0.0, 1.0]);
        mesh.begin_submesh()
            .positions(vec![0, 1, 2, 3])
            .texcoords(vec![0, 1, 2, 3])
            .face_vertex_counts(vec![4])
            .finish();
        mesh
    }

    #[test]
    fn test_default_name() {
        assert_eq!(Mesh::new("").name, DEFAULT_MESH_NAME);
    }

    #[test]
    fn test_texcoord_v_flip() {
        let mesh = quad();
        assert_eq!(
            mesh.texcoords.data,
            vec![0.0, 1.0, 1.0, 0.75, 1.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_texcoord_flip_ignores_stride() {
        let mut mesh = Mesh::new("uvw");
        mesh.set_texcoords(3, vec![0.5, 0.25, 0.5, 0.0]);
        assert_eq!(mesh.texcoords.data, vec![0.5, 0.75, 0.5, 1.0]);
    }

    #[test]
    fn test_texture_basename() {
        let mut mesh = Mesh::new("m");
        mesh.set_texture("C:\\art\\textures/skin.png");
        assert_eq!(mesh.texture, "skin.png");
        mesh.set_texture("plain.tga");
        assert_eq!(mesh.texture, "plain.tga");
    }

    #[test]
    fn test_unfinished_submesh_is_discarded() {
        let mut mesh = Mesh::new("m");
        let _ = mesh.begin_submesh().positions(vec![0, 1, 2]);
        assert!(mesh.submeshes.is_empty());
    }

    #[test]
    fn test_bake_quad() {
        let baked = quad().bake(&BakeOptions::default()).unwrap();
        assert_eq!(baked.vertex_count, 6);
        assert_eq!(baked.position_stride, 3);
        assert_eq!(baked.normal_stride, 0);
        assert_eq!(baked.texcoord_stride, 2);
        assert_eq!(baked.matrices_per_vertex, 0);
        assert_eq!(baked.stride(), 20);
        assert_eq!(baked.vertex_data.len(), 6 * 20);
        assert_eq!(baked.bounds.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_influence_width() {
        let mut mesh = quad();
        assert_eq!(mesh.influence_width(&BakeOptions::default()), 0);

        let pairs = vec![
            vec![(0, 0.5), (1, 0.3), (2, 0.1), (3, 0.05), (4, 0.05)],
            vec![(0, 1.0)],
            vec![],
            vec![(1, 1.0)],
        ];
        mesh.set_skin(SkinTable::from_pairs(&pairs), Mat4::IDENTITY, 5);
        assert_eq!(mesh.influence_width(&BakeOptions::default()), 5);
        let capped = BakeOptions {
            max_weights: 3,
            ..Default::default()
        };
        assert_eq!(mesh.influence_width(&capped), 3);

        mesh.set_skin(
            SkinTable::from_pairs(&[vec![], vec![], vec![], vec![]]),
            Mat4::IDENTITY,
            1,
        );
        assert_eq!(mesh.influence_width(&capped), 1);
    }

    #[test]
    fn test_missing_positions_is_structural() {
        let mesh = Mesh::new("empty");
        assert_eq!(
            mesh.bake(&BakeOptions::default()),
            Err(MeshError::MissingPositions)
        );
    }
}
