use std::path::Path;

use pairviz_3d::{
    linalg::{transform_points, PointTransform},
    pointcloud::PointSet,
    transforms::{invert, rigid_from_quaternion_translation, Matrix4},
    TransformError,
};
use pairviz_io::PairDataset;

use crate::error::{LayoutError, RenderError};
use crate::group::PointGroup;
use crate::scene::PointColor;

/// Number of groups in the comparison figure.
pub const GROUP_COUNT: usize = 8;

/// Captions of the comparison figure, in render order.
pub const CAPTIONS: [&str; GROUP_COUNT] = [
    "input 1",
    "input 2",
    "inputs in canonical frame",
    "prediction 1->2 vs ground truth",
    "output 1",
    "output 2",
    "ground truth 1",
    "ground truth 2",
];

/// The transforms derived from one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTransforms {
    /// Predicted transform from frame 1 to frame 2, `T12 · R12`.
    pub m12: Matrix4,
    /// Predicted transform from frame 2 to frame 1, `T21 · R21`.
    pub m21: Matrix4,
    /// Inverse of the first ground-truth pose.
    pub gt1_inv: Matrix4,
    /// Inverse of the second ground-truth pose.
    pub gt2_inv: Matrix4,
}

impl SampleTransforms {
    /// Compute the predicted rigid transforms and the inverse ground-truth poses.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Singular`] if a ground-truth pose is not invertible.
    pub fn compute(dataset: &PairDataset) -> Result<Self, TransformError> {
        Ok(Self {
            m12: rigid_from_quaternion_translation(&dataset.out_para12_r, &dataset.out_para12_t),
            m21: rigid_from_quaternion_translation(&dataset.out_para21_r, &dataset.out_para21_t),
            gt1_inv: invert(&dataset.gt_matrix_1)?,
            gt2_inv: invert(&dataset.gt_matrix_2)?,
        })
    }
}

fn transformed(points: &PointSet, matrix: &Matrix4) -> Result<PointSet, TransformError> {
    Ok(PointSet::new(transform_points(
        points.points(),
        PointTransform::Single(matrix),
    )?))
}

fn single(
    caption: &str,
    label: &str,
    color: PointColor,
    points: PointSet,
) -> Result<PointGroup, RenderError> {
    PointGroup::from_parallel(caption, &[label], &[color], vec![points])
}

/// Build the eight point groups of the comparison figure.
///
/// The groups come back in [`CAPTIONS`] order, which is also the left to right
/// order of the composite. When `mesh` is given it is shown with the inputs in
/// the canonical frame.
pub fn comparison_groups(
    dataset: &PairDataset,
    transforms: &SampleTransforms,
    mesh: Option<&Path>,
) -> Result<Vec<PointGroup>, LayoutError> {
    let d = dataset;

    let mut canonical = PointGroup::from_parallel(
        CAPTIONS[2],
        &["in_1", "in_2"],
        &[PointColor::Blue, PointColor::Orange],
        vec![
            transformed(&d.in_pts1, &transforms.gt1_inv)?,
            transformed(&d.in_pts2, &transforms.gt2_inv)?,
        ],
    )?;
    if let Some(mesh) = mesh {
        canonical = canonical.with_mesh(mesh);
    }

    let groups = vec![
        single(CAPTIONS[0], "in_1", PointColor::Blue, d.in_pts1.clone())?,
        single(CAPTIONS[1], "in_2", PointColor::Orange, d.in_pts2.clone())?,
        canonical,
        PointGroup::from_parallel(
            CAPTIONS[3],
            &["gt_point2", "in_2", "in_1"],
            &[PointColor::Gray, PointColor::Orange, PointColor::Blue],
            vec![
                d.gt_pts2.clone(),
                d.in_pts2.clone(),
                transformed(&d.in_pts1, &transforms.m12)?,
            ],
        )?,
        single(
            CAPTIONS[4],
            "out_point1",
            PointColor::Blue,
            PointSet::concat(&[&d.in_pts1, &d.out_pts1]),
        )?,
        single(
            CAPTIONS[5],
            "out_point2",
            PointColor::Orange,
            PointSet::concat(&[&d.in_pts2, &d.out_pts2]),
        )?,
        single(
            CAPTIONS[6],
            "gt_point1",
            PointColor::Blue,
            PointSet::concat(&[&d.in_pts1, &d.gt_pts1]),
        )?,
        single(
            CAPTIONS[7],
            "gt_point2",
            PointColor::Orange,
            PointSet::concat(&[&d.in_pts2, &d.gt_pts2]),
        )?,
    ];

    Ok(groups)
}
