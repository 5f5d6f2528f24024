#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the transform functions.
pub mod error;

/// I/O utilities for reading point and mesh files.
pub mod io;

/// Linear algebra utilities for transforming points.
pub mod linalg;

/// Point set container.
pub mod pointcloud;

/// Homogeneous transform construction.
pub mod transforms;

pub use error::TransformError;
