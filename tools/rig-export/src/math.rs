//! Geometry primitives shared by mesh and skeleton assembly.
//!
//! Matrices are column-major `glam::Mat4`. Rotation angles are in degrees,
//! as they appear in scene documents and in baked transform payloads.

use glam::{Mat4, Vec3};

/// Tolerance for "close enough to zero / identity" checks.
pub const EPSILON: f32 = 0.001;

/// Rotation of `angle_degrees` about `axis` (OpenGL `glRotate` convention).
///
/// The axis is normalized first; a zero axis yields identity.
pub fn rotation_matrix(axis: Vec3, angle_degrees: f32) -> Mat4 {
    match axis.try_normalize() {
        Some(n) => Mat4::from_axis_angle(n, angle_degrees.to_radians()),
        None => Mat4::IDENTITY,
    }
}

pub fn translation_matrix(offset: Vec3) -> Mat4 {
    Mat4::from_translation(offset)
}

pub fn scale_matrix(scale: Vec3) -> Mat4 {
    Mat4::from_scale(scale)
}

/// Compose two transforms so that `parent` is applied after `child`
/// (parent * child).
pub fn multiply(parent: &Mat4, child: &Mat4) -> Mat4 {
    *parent * *child
}

/// Invert a 4x4 matrix by Gauss-Jordan elimination with partial pivoting.
///
/// Returns `None` when a pivot column is (numerically) all zero.
pub fn inverse(m: &Mat4) -> Option<Mat4> {
    // Row-major working copies
    let mut a = m.transpose().to_cols_array_2d();
    let mut inv = Mat4::IDENTITY.to_cols_array_2d();

    for col in 0..4 {
        let pivot = (col..4)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() <= f32::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let scale = 1.0 / a[col][col];
        for k in 0..4 {
            a[col][k] *= scale;
            inv[col][k] *= scale;
        }

        for row in 0..4 {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..4 {
                a[row][k] -= factor * a[col][k];
                inv[row][k] -= factor * inv[col][k];
            }
        }
    }

    Some(Mat4::from_cols_array_2d(&inv).transpose())
}

/// Element-wise comparison within `EPSILON`.
pub fn matrices_close(a: &Mat4, b: &Mat4) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() <= EPSILON)
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// An inverted box that any point will expand.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut bounds = Self::EMPTY;
        for p in points {
            bounds.include(p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Average of the four corners of a quad face.
pub fn face_center(corners: &[Vec3; 4]) -> Vec3 {
    corners.iter().copied().sum::<Vec3>() * 0.25
}
