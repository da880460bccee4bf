//! 3x3 affine transformation matrix for 2D homogeneous coordinates.
//!
//! # Convention
//! - Points are **column vectors** on the right: `Mat3 * Vec2` (with w = 1)
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * p` applies B first, then A
//! - Positive rotation angles turn counter-clockwise in a y-up frame
//!
//! # Example
//! ```ignore
//! let to_origin = Mat3::translation(-center.x, -center.y);
//! let transform = Mat3::rotation(-angle) * to_origin; // translate first, then rotate
//! let local = transform * point;
//! ```

use std::ops::Mul;

use super::vec2::Vec2;

/// 3x3 matrix stored as `data[row][col]`. The last row is always `[0, 0, 1]`
/// for the affine matrices built here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    data: [[f64; 3]; 3],
}

impl Mat3 {
    pub fn new(data: [[f64; 3]; 3]) -> Self {
        Mat3 { data }
    }

    /// Creates a translation matrix.
    pub fn translation(x: f64, y: f64) -> Self {
        Mat3::new([[1.0, 0.0, x], [0.0, 1.0, y], [0.0, 0.0, 1.0]])
    }

    /// Creates a (possibly anisotropic) scale matrix.
    pub fn scaling(x: f64, y: f64) -> Self {
        Mat3::new([[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Creates a counter-clockwise rotation matrix around the origin.
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Mat3::new([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Rotation by `angle` radians around `pivot`.
    pub fn rotation_about(pivot: Vec2, angle: f64) -> Self {
        Mat3::translation(pivot.x, pivot.y)
            * Mat3::rotation(angle)
            * Mat3::translation(-pivot.x, -pivot.y)
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.data;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the inverse of the matrix, if it exists.
    /// Returns `None` if the matrix is singular (determinant is zero).
    pub fn inverse(&self) -> Option<Mat3> {
        let m = &self.data;
        let det = self.determinant();

        if det.abs() < f64::EPSILON * f64::EPSILON || !det.is_finite() {
            return None;
        }

        let inv_det = 1.0 / det;

        // Adjugate (transposed cofactors) divided by the determinant
        Some(Mat3::new([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ]))
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }
}

/// Matrix multiplication: Mat3 * Mat3.
///
/// `A * B * p` applies B first, then A.
impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Self::Output {
        let mut result = [[0.0f64; 3]; 3];

        for (row, out) in result.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col];
            }
        }

        Mat3::new(result)
    }
}

/// Transform a point: Mat3 * Vec2 (treats Vec2 as a column vector with w = 1).
impl Mul<Vec2> for Mat3 {
    type Output = Vec2;

    fn mul(self, v: Vec2) -> Self::Output {
        Vec2::new(
            self.data[0][0] * v.x + self.data[0][1] * v.y + self.data[0][2],
            self.data[1][0] * v.x + self.data[1][1] * v.y + self.data[1][2],
        )
    }
}
