#![deny(missing_docs)]
//! Image container, cropping and concatenation for comparison figures.

/// image representation for rendered frames.
pub mod image;

/// Error types for the image module.
pub mod error;

/// Region cropping.
pub mod crop;

/// Side-by-side concatenation.
pub mod concat;

pub use crate::crop::CropRegion;
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
