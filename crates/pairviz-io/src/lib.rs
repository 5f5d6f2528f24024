#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] for image files and [`error::LoadError`] for datasets.
pub mod error;

/// Pair dataset loading.
///
/// Reads the named point, quaternion and matrix arrays of one sample.
pub mod dataset;

/// PNG image encoding and decoding.
///
/// Read PNG frames as rgba8 and write rgba8 images.
pub mod png;

pub use dataset::PairDataset;
pub use error::{IoError, LoadError};
