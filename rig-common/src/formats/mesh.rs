//! Baked mesh binary format (.rigmesh)
//!
//! POD format - no magic bytes, identified by `file_type == FILE_TYPE_MESH`.
//!
//! # Layout
//! ```text
//! 0x00: major_version u32
//! 0x04: minor_version u32
//! 0x08: file_type u32 (FILE_TYPE_MESH)
//! 0x0C: vertex_count u32
//! 0x10: position_stride u32
//! 0x14: normal_stride u32
//! 0x18: texcoord_stride u32
//! 0x1C: matrices_per_vertex u32
//! 0x20: bind_shape_matrix f32[16] (column-major)
//! 0x60: texture_name [u8; 64] (NUL-terminated)
//! 0xA0: vertex data (vertex_count × vertex_stride bytes)
//! ```
//!
//! Each vertex record holds `position_stride` position floats,
//! `normal_stride` normal floats, `texcoord_stride` texcoord floats, then
//! `matrices_per_vertex` weight floats followed by `matrices_per_vertex`
//! joint index bytes, zero-padded to a 4-byte boundary.

use super::serialization::{FieldReader, FieldWriter};
use super::{FILE_TYPE_MESH, TEXTURE_NAME_LENGTH};
use crate::rig_format::RIG_FORMAT;

/// Column-major identity, used as the default bind-shape matrix
pub const IDENTITY_MATRIX: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Mesh file header (160 bytes)
#[derive(Debug, Clone, PartialEq)]
pub struct RigMeshHeader {
    pub major_version: u32,
    pub minor_version: u32,
    pub file_type: u32,
    pub vertex_count: u32,
    pub position_stride: u32,
    pub normal_stride: u32,
    pub texcoord_stride: u32,
    /// Width of the weight and joint index blocks (0 = static mesh)
    pub matrices_per_vertex: u32,
    pub bind_shape_matrix: [f32; 16],
    pub texture_name: String,
}

impl RigMeshHeader {
    pub const SIZE: usize = 32 + 64 + TEXTURE_NAME_LENGTH;

    pub fn new(
        vertex_count: u32,
        position_stride: u32,
        normal_stride: u32,
        texcoord_stride: u32,
        matrices_per_vertex: u32,
    ) -> Self {
        Self {
            major_version: RIG_FORMAT.major_version,
            minor_version: RIG_FORMAT.minor_version,
            file_type: FILE_TYPE_MESH,
            vertex_count,
            position_stride,
            normal_stride,
            texcoord_stride,
            matrices_per_vertex,
            bind_shape_matrix: IDENTITY_MATRIX,
            texture_name: String::new(),
        }
    }

    /// Size in bytes of one interleaved vertex record.
    pub fn vertex_stride(&self) -> usize {
        vertex_stride(
            self.position_stride,
            self.normal_stride,
            self.texcoord_stride,
            self.matrices_per_vertex,
        )
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut w = FieldWriter::new(&mut bytes);
        w.u32(self.major_version);
        w.u32(self.minor_version);
        w.u32(self.file_type);
        w.u32(self.vertex_count);
        w.u32(self.position_stride);
        w.u32(self.normal_stride);
        w.u32(self.texcoord_stride);
        w.u32(self.matrices_per_vertex);
        w.matrix(&self.bind_shape_matrix);
        w.name(&self.texture_name, TEXTURE_NAME_LENGTH);
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut r = FieldReader::new(bytes);
        Some(Self {
            major_version: r.u32()?,
            minor_version: r.u32()?,
            file_type: r.u32()?,
            vertex_count: r.u32()?,
            position_stride: r.u32()?,
            normal_stride: r.u32()?,
            texcoord_stride: r.u32()?,
            matrices_per_vertex: r.u32()?,
            bind_shape_matrix: r.matrix()?,
            texture_name: r.name(TEXTURE_NAME_LENGTH)?,
        })
    }
}

/// Interleaved vertex stride for the given attribute widths.
///
/// Float attributes and weights take 4 bytes per component, joint indices one
/// byte each; the total is rounded up to a multiple of 4.
pub const fn vertex_stride(
    position_stride: u32,
    normal_stride: u32,
    texcoord_stride: u32,
    matrices_per_vertex: u32,
) -> usize {
    let floats = (position_stride + normal_stride + texcoord_stride + matrices_per_vertex) as usize;
    let raw = floats * 4 + matrices_per_vertex as usize;
    (raw + 3) & !3
}

/// A decoded mesh file: header plus raw interleaved vertex data.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshFile {
    pub header: RigMeshHeader,
    pub vertex_data: Vec<u8>,
}

impl MeshFile {
    /// Parse a complete mesh file.
    ///
    /// Returns `None` if the header is short, the file type is not a mesh,
    /// or the vertex data is truncated.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let header = RigMeshHeader::from_bytes(bytes)?;
        if header.file_type != FILE_TYPE_MESH {
            return None;
        }
        let len = header.vertex_stride().checked_mul(header.vertex_count as usize)?;
        let data = bytes.get(RigMeshHeader::SIZE..RigMeshHeader::SIZE.checked_add(len)?)?;
        Some(Self {
            header,
            vertex_data: data.to_vec(),
        })
    }

    /// Raw bytes of vertex `index`.
    pub fn vertex(&self, index: usize) -> Option<&[u8]> {
        let stride = self.header.vertex_stride();
        self.vertex_data.get(index * stride..(index + 1) * stride)
    }

    /// Float at component `component` of vertex `index`.
    pub fn vertex_f32(&self, index: usize, component: usize) -> Option<f32> {
        let v = self.vertex(index)?;
        let b = v.get(component * 4..component * 4 + 4)?;
        Some(f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Skin weights of vertex `index`.
    pub fn weights(&self, index: usize) -> Option<Vec<f32>> {
        let h = &self.header;
        let first = (h.position_stride + h.normal_stride + h.texcoord_stride) as usize;
        (0..h.matrices_per_vertex as usize)
            .map(|i| self.vertex_f32(index, first + i))
            .collect()
    }

    /// Joint indices of vertex `index`.
    pub fn joint_indices(&self, index: usize) -> Option<Vec<u8>> {
        let h = &self.header;
        let m = h.matrices_per_vertex as usize;
        let start = (h.position_stride + h.normal_stride + h.texcoord_stride) as usize * 4 + m * 4;
        self.vertex(index)?.get(start..start + m).map(<[u8]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_header_roundtrip() {
        let mut header = RigMeshHeader::new(36, 3, 3, 2, 4);
        header.texture_name = "crate.png".to_string();
        header.bind_shape_matrix[12] = 5.0;

        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), RigMeshHeader::SIZE);

        let parsed = RigMeshHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.file_type, FILE_TYPE_MESH);
        assert_eq!(parsed.major_version, 1);
    }

    #[test]
    fn test_mesh_header_size() {
        assert_eq!(RigMeshHeader::SIZE, 160);
    }

    #[test]
    fn test_mesh_header_from_short_bytes() {
        let short_bytes = [0u8; 100];
        assert!(RigMeshHeader::from_bytes(&short_bytes).is_none());
    }

    #[test]
    fn test_vertex_stride_rounding() {
        // 8 floats, no skin
        assert_eq!(vertex_stride(3, 3, 2, 0), 32);
        // 8 + 3 weights = 44 bytes + 3 index bytes = 47 -> 48
        assert_eq!(vertex_stride(3, 3, 2, 3), 48);
        // 3 + 1 weight = 16 + 1 = 17 -> 20
        assert_eq!(vertex_stride(3, 0, 0, 1), 20);
    }

    #[test]
    fn test_mesh_file_parse_rejects_wrong_type() {
        let mut header = RigMeshHeader::new(0, 3, 0, 0, 0);
        header.file_type = 1;
        assert!(MeshFile::parse(&header.to_bytes()).is_none());
    }

    #[test]
    fn test_mesh_file_accessors() {
        let header = RigMeshHeader::new(1, 3, 0, 0, 2);
        let mut bytes = header.to_bytes().to_vec();
        for v in [1.0f32, 2.0, 3.0, 0.75, 0.25] {
            bytes.extend_from_slice(&v.to_ne_bytes());
        }
        bytes.extend_from_slice(&[4, 7, 0, 0]);

        let file = MeshFile::parse(&bytes).unwrap();
        assert_eq!(file.vertex_f32(0, 1), Some(2.0));
        assert_eq!(file.weights(0), Some(vec![0.75, 0.25]));
        assert_eq!(file.joint_indices(0), Some(vec![4, 7]));
        assert!(file.vertex(1).is_none());
    }

    #[test]
    fn test_mesh_file_truncated_data() {
        let header = RigMeshHeader::new(2, 3, 0, 0, 0);
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 12]);
        assert!(MeshFile::parse(&bytes).is_none());
    }
}
