//! Binary serialization trait and field cursors for record layouts.
//!
//! All rig records implement `BinarySerializable` for consistent
//! serialization/deserialization. Records keep their type-specific
//! `to_bytes()` returning a fixed-size array; the trait returns `Vec<u8>`
//! because associated consts cannot size an array in a trait return type.

use super::names::{decode_name, encode_name};

/// Trait for fixed-size binary records.
pub trait BinarySerializable: Sized {
    /// Size of the serialized record in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_binary_serializable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BinarySerializable for $ty {
                const SIZE: usize = <$ty>::SIZE;

                fn serialize(&self) -> Vec<u8> {
                    self.to_bytes().to_vec()
                }

                fn deserialize(bytes: &[u8]) -> Option<Self> {
                    Self::from_bytes(bytes)
                }
            }
        )*
    };
}

impl_binary_serializable!(
    super::RigMeshHeader,
    super::RigSkeletonHeader,
    super::RigJointEntry,
    super::RigTransformEntry,
    super::RigClipHeader,
    super::RigAnimationHeader,
    super::RigCurveHeader,
    super::RigKeyframeCommon,
    super::RigBezierKeyframe,
);

/// Sequential writer over a fixed record buffer.
pub(crate) struct FieldWriter<'a> {
    bytes: &'a mut [u8],
    pos: usize,
}

impl<'a> FieldWriter<'a> {
    pub(crate) fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn put(&mut self, src: &[u8]) {
        self.bytes[self.pos..self.pos + src.len()].copy_from_slice(src);
        self.pos += src.len();
    }

    pub(crate) fn u32(&mut self, value: u32) {
        self.put(&value.to_ne_bytes());
    }

    pub(crate) fn i32(&mut self, value: i32) {
        self.put(&value.to_ne_bytes());
    }

    pub(crate) fn f32(&mut self, value: f32) {
        self.put(&value.to_ne_bytes());
    }

    pub(crate) fn matrix(&mut self, values: &[f32; 16]) {
        for &v in values {
            self.f32(v);
        }
    }

    pub(crate) fn name(&mut self, name: &str, len: usize) {
        encode_name(name, &mut self.bytes[self.pos..self.pos + len]);
        self.pos += len;
    }
}

/// Sequential reader over a byte slice. Every accessor returns `None` once
/// the slice is exhausted.
pub(crate) struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let slice = self.bytes.get(self.pos..self.pos.checked_add(len)?)?;
        self.pos += len;
        Some(slice)
    }

    fn word(&mut self) -> Option<[u8; 4]> {
        let b = self.take(4)?;
        Some([b[0], b[1], b[2], b[3]])
    }

    pub(crate) fn u32(&mut self) -> Option<u32> {
        self.word().map(u32::from_ne_bytes)
    }

    pub(crate) fn i32(&mut self) -> Option<i32> {
        self.word().map(i32::from_ne_bytes)
    }

    pub(crate) fn f32(&mut self) -> Option<f32> {
        self.word().map(f32::from_ne_bytes)
    }

    pub(crate) fn matrix(&mut self) -> Option<[f32; 16]> {
        let mut m = [0.0f32; 16];
        for v in m.iter_mut() {
            *v = self.f32()?;
        }
        Some(m)
    }

    pub(crate) fn name(&mut self, len: usize) -> Option<String> {
        self.take(len).map(decode_name)
    }

    pub(crate) fn bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        self.take(len)
    }
}
