/// Wavefront OBJ vertex reader and recentering.
pub mod obj;

/// ASCII PLY point cloud reader and writer.
pub mod ply;

/// Plain-text `.pts` point cloud reader.
pub mod pts;
