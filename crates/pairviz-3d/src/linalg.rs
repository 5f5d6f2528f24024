use glam::{DMat3, DVec3};

use crate::error::TransformError;
use crate::transforms::{to_dmat4, Matrix4};

/// The transform applied by [`transform_points`].
#[derive(Debug, Clone, Copy)]
pub enum PointTransform<'a> {
    /// One transform shared by every point.
    Single(&'a Matrix4),
    /// One transform per point, `transforms[i]` applies to `points[i]`.
    Batched(&'a [Matrix4]),
}

/// Transform a set of points using a rotation and translation.
///
/// Points are stored as rows, so each output is `p * R^T + t`.
///
/// # Arguments
///
/// * `src_points` - A set of points to be transformed.
/// * `dst_r_src` - A rotation matrix.
/// * `dst_t_src` - A translation vector.
/// * `dst_points` - A pre-allocated vector to store the transformed points.
///
/// # Errors
///
/// Returns [`TransformError::ShapeMismatch`] if `dst_points` and `src_points`
/// differ in length.
///
/// Example:
///
/// ```
/// use pairviz_3d::linalg::transform_points3d;
///
/// let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let translation = [1.0, 0.0, 0.0];
/// let mut dst_points = vec![[0.0; 3]; src_points.len()];
/// transform_points3d(&src_points, &rotation, &translation, &mut dst_points).unwrap();
/// assert_eq!(dst_points[0], [3.0, 2.0, 2.0]);
/// ```
pub fn transform_points3d(
    src_points: &[[f64; 3]],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) -> Result<(), TransformError> {
    if src_points.len() != dst_points.len() {
        return Err(TransformError::ShapeMismatch {
            points: src_points.len(),
            transforms: dst_points.len(),
        });
    }

    // glam stores columns, so the row-major rotation is read as the transpose
    let rotation = DMat3::from_cols_array_2d(dst_r_src).transpose();
    let translation = DVec3::from_array(*dst_t_src);

    for (src, dst) in src_points.iter().zip(dst_points.iter_mut()) {
        *dst = (rotation * DVec3::from_array(*src) + translation).to_array();
    }

    Ok(())
}

/// Apply a homogeneous transform (single or batched) to a set of points.
///
/// Only the rotation block and the translation column of each matrix are used.
///
/// # Errors
///
/// Returns [`TransformError::ShapeMismatch`] when a batched transform does not
/// have exactly one matrix per point.
///
/// Example:
///
/// ```
/// use pairviz_3d::linalg::{transform_points, PointTransform};
/// use pairviz_3d::transforms::rigid_from_quaternion_translation;
///
/// let m = rigid_from_quaternion_translation(&[0.0, 0.0, 0.0, 1.0], &[1.0, 2.0, 3.0]);
/// let out = transform_points(&[[0.0, 0.0, 0.0]], PointTransform::Single(&m)).unwrap();
/// assert_eq!(out, vec![[1.0, 2.0, 3.0]]);
/// ```
pub fn transform_points(
    points: &[[f64; 3]],
    transform: PointTransform<'_>,
) -> Result<Vec<[f64; 3]>, TransformError> {
    match transform {
        PointTransform::Single(matrix) => {
            let m = to_dmat4(matrix);
            Ok(points
                .iter()
                .map(|p| m.transform_point3(DVec3::from_array(*p)).to_array())
                .collect())
        }
        PointTransform::Batched(matrices) => {
            if matrices.len() != points.len() {
                return Err(TransformError::ShapeMismatch {
                    points: points.len(),
                    transforms: matrices.len(),
                });
            }
            Ok(points
                .iter()
                .zip(matrices)
                .map(|(p, m)| {
                    to_dmat4(m)
                        .transform_point3(DVec3::from_array(*p))
                        .to_array()
                })
                .collect())
        }
    }
}
