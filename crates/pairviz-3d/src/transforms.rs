use glam::DMat4;

use crate::error::TransformError;

/// A row-major 4x4 homogeneous matrix.
pub type Matrix4 = [[f64; 4]; 4];

/// The 4x4 identity matrix.
pub const IDENTITY: Matrix4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

// determinants below this value are treated as singular
const SINGULAR_EPS: f64 = 1e-12;

/// Compute the homogeneous rotation matrix from a quaternion.
///
/// # Arguments
///
/// * `quaternion` - The quaternion ordered as `[x, y, z, w]`.
///
/// # Returns
///
/// A 4x4 matrix with the rotation in the upper-left 3x3 block.
///
/// PRECONDITION: the quaternion has unit norm. The input is not normalized, so a
/// non-unit quaternion produces a matrix that is not orthonormal.
///
/// Example:
///
/// ```
/// use pairviz_3d::transforms::{quaternion_to_matrix, IDENTITY};
///
/// let rotation = quaternion_to_matrix(&[0.0, 0.0, 0.0, 1.0]);
/// assert_eq!(rotation, IDENTITY);
/// ```
pub fn quaternion_to_matrix(quaternion: &[f64; 4]) -> Matrix4 {
    let [x, y, z, w] = *quaternion;

    let xx2 = 2.0 * x * x;
    let yy2 = 2.0 * y * y;
    let zz2 = 2.0 * z * z;

    let xy2 = 2.0 * x * y;
    let wz2 = 2.0 * w * z;
    let zx2 = 2.0 * z * x;
    let wy2 = 2.0 * w * y;
    let yz2 = 2.0 * y * z;
    let wx2 = 2.0 * w * x;

    [
        [1.0 - yy2 - zz2, xy2 - wz2, zx2 + wy2, 0.0],
        [xy2 + wz2, 1.0 - xx2 - zz2, yz2 - wx2, 0.0],
        [zx2 - wy2, yz2 + wx2, 1.0 - xx2 - yy2, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Compute the homogeneous translation matrix from a translation vector.
///
/// Example:
///
/// ```
/// use pairviz_3d::transforms::translation_to_matrix;
///
/// let t = translation_to_matrix(&[1.0, 2.0, 3.0]);
/// assert_eq!(t[0][3], 1.0);
/// assert_eq!(t[1][3], 2.0);
/// assert_eq!(t[2][3], 3.0);
/// ```
pub fn translation_to_matrix(translation: &[f64; 3]) -> Matrix4 {
    let mut matrix = IDENTITY;
    matrix[0][3] = translation[0];
    matrix[1][3] = translation[1];
    matrix[2][3] = translation[2];
    matrix
}

/// Multiply two homogeneous matrices as `lhs * rhs`.
///
/// When used on points, `rhs` is applied first.
pub fn compose(lhs: &Matrix4, rhs: &Matrix4) -> Matrix4 {
    from_dmat4(&(to_dmat4(lhs) * to_dmat4(rhs)))
}

// glam stores columns, so the row-major array is read as the transpose
pub(crate) fn to_dmat4(matrix: &Matrix4) -> DMat4 {
    DMat4::from_cols_array_2d(matrix).transpose()
}

pub(crate) fn from_dmat4(matrix: &DMat4) -> Matrix4 {
    matrix.transpose().to_cols_array_2d()
}

/// Build the rigid transform `T * R` from a quaternion and a translation.
///
/// The resulting matrix rotates about the origin first and then translates.
pub fn rigid_from_quaternion_translation(quaternion: &[f64; 4], translation: &[f64; 3]) -> Matrix4 {
    compose(
        &translation_to_matrix(translation),
        &quaternion_to_matrix(quaternion),
    )
}

/// Invert a homogeneous matrix.
///
/// # Errors
///
/// Returns [`TransformError::Singular`] if the matrix has no inverse.
pub fn invert(matrix: &Matrix4) -> Result<Matrix4, TransformError> {
    let m = to_dmat4(matrix);
    let det = m.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPS {
        return Err(TransformError::Singular(det));
    }
    Ok(from_dmat4(&m.inverse()))
}

/// Split a homogeneous matrix into its rotation block and translation column.
pub fn split_rotation_translation(matrix: &Matrix4) -> ([[f64; 3]; 3], [f64; 3]) {
    let mut rotation = [[0.0; 3]; 3];
    for (i, row) in rotation.iter_mut().enumerate() {
        row.copy_from_slice(&matrix[i][..3]);
    }
    let translation = [matrix[0][3], matrix[1][3], matrix[2][3]];
    (rotation, translation)
}
