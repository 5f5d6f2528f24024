/// Errors raised by the transform functions.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransformError {
    /// The number of transforms (or output slots) does not match the number of points.
    #[error("Shape mismatch: {points} points but {transforms} transforms")]
    ShapeMismatch {
        /// Number of input points.
        points: usize,
        /// Number of transforms or output slots.
        transforms: usize,
    },

    /// The matrix cannot be inverted.
    #[error("Matrix is singular (determinant {0})")]
    Singular(f64),
}
