use crate::image::ImageSize;

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the crop region does not fit inside the source image.
    #[error("Crop region {width}x{height} at ({x}, {y}) exceeds image size {image}")]
    CropOutOfBounds {
        /// Left edge of the region.
        x: i64,
        /// Top edge of the region.
        y: i64,
        /// Width of the region.
        width: usize,
        /// Height of the region.
        height: usize,
        /// Size of the source image.
        image: ImageSize,
    },

    /// Error when images to be concatenated horizontally differ in height.
    #[error("Image {index} has height {actual}, expected {expected}")]
    HeightMismatch {
        /// Position of the offending image.
        index: usize,
        /// Height of the first image.
        expected: usize,
        /// Height of the offending image.
        actual: usize,
    },

    /// Error when an operation needs at least one image.
    #[error("No images were provided")]
    Empty,
}
