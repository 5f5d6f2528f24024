use std::path::PathBuf;

use pairviz_image::ImageSize;

use crate::scene::GeometryId;

/// An error raised by a scene collaborator.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Failed to read or write a scene file.
    #[error("Scene file operation failed. {0}")]
    Io(#[from] std::io::Error),

    /// Failed to import a mesh asset.
    #[error("Failed to import mesh. {0}")]
    Mesh(#[from] pairviz_3d::io::obj::ObjError),

    /// Failed to write point geometry.
    #[error("Failed to write point geometry. {0}")]
    Ply(#[from] pairviz_3d::io::ply::PlyError),

    /// Failed to serialize the scene manifest.
    #[error("Failed to write the scene manifest. {0}")]
    Manifest(#[from] serde_json::Error),

    /// The renderer exited unsuccessfully.
    #[error("Renderer {program} failed with exit code {code:?}")]
    RenderFailed {
        /// The renderer program.
        program: PathBuf,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },

    /// The renderer did not produce the requested image.
    #[error("Renderer did not write {0}")]
    MissingOutput(PathBuf),

    /// The geometry id is not known to the scene.
    #[error("Unknown geometry {0}")]
    UnknownGeometry(GeometryId),

    /// Any other failure reported by the host.
    #[error("Host error: {0}")]
    Host(String),
}

/// An error raised while rendering one point group.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The parallel label/color/point lists differ in length.
    #[error("Group lists differ in length: {labels} labels, {colors} colors, {point_sets} point sets")]
    GroupShape {
        /// Number of labels.
        labels: usize,
        /// Number of colors.
        colors: usize,
        /// Number of point sets.
        point_sets: usize,
    },

    /// A group needs at least one member.
    #[error("Group {0} has no point sets")]
    EmptyGroup(String),

    /// Materializing one member failed; the group was abandoned.
    #[error("Failed to materialize {label}. {source}")]
    Materialize {
        /// Label of the failing member.
        label: String,
        /// The host error.
        source: SceneError,
    },

    /// Importing the group's mesh failed; the group was abandoned.
    #[error("Failed to import mesh {path}. {source}")]
    MeshImport {
        /// Path of the mesh asset.
        path: PathBuf,
        /// The host error.
        source: SceneError,
    },

    /// Any other scene failure (reset, render, release).
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// An error raised while building the comparison groups.
#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    /// Transforming a point set failed.
    #[error(transparent)]
    Transform(#[from] pairviz_3d::TransformError),

    /// A group could not be assembled.
    #[error(transparent)]
    Group(#[from] RenderError),
}

/// An error raised while compositing rendered frames.
#[derive(thiserror::Error, Debug)]
pub enum CompositeError {
    /// No frames were given.
    #[error("No images to composite")]
    NoImages,

    /// A frame differs in size from the first one.
    #[error("Image {index} has size {actual}, expected {expected}")]
    SizeMismatch {
        /// Position of the offending frame.
        index: usize,
        /// Size of the first frame.
        expected: ImageSize,
        /// Size of the offending frame.
        actual: ImageSize,
    },

    /// Reading or writing a frame failed.
    #[error(transparent)]
    Io(#[from] pairviz_io::IoError),

    /// Cropping or concatenation failed.
    #[error(transparent)]
    Image(#[from] pairviz_image::ImageError),
}

/// An error raised while loading or validating the configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read the configuration file. {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("Failed to parse the configuration file. {0}")]
    Parse(#[from] serde_json::Error),

    /// The category has no z-axis preset.
    #[error("Unknown category {0}")]
    UnknownCategory(String),

    /// The crop size must be positive.
    #[error("Crop size must be positive")]
    InvalidCropSize,

    /// The sphere radius must be positive and finite.
    #[error("Sphere radius must be positive, got {0}")]
    InvalidSphereRadius(f64),
}

/// An error raised by the comparison pipeline.
///
/// Each variant corresponds to the phase that failed.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Loading the dataset failed.
    #[error("Failed to load dataset. {0}")]
    Load(#[from] pairviz_io::LoadError),

    /// Computing the sample transforms failed.
    #[error("Failed to compute transforms. {0}")]
    Transform(#[from] pairviz_3d::TransformError),

    /// Building the comparison groups failed.
    #[error("Failed to build the comparison layout. {0}")]
    Layout(#[from] LayoutError),

    /// Preparing the scene or output directories failed.
    #[error("Failed to prepare the scene. {0}")]
    Setup(#[from] SceneError),

    /// Creating an output directory failed.
    #[error("Failed to create output directory. {0}")]
    Io(#[from] std::io::Error),

    /// Rendering a group failed.
    #[error("Failed to render group {group}. {source}")]
    Render {
        /// Caption of the failing group.
        group: String,
        /// The render error.
        source: RenderError,
    },

    /// Compositing the frames failed.
    #[error("Failed to composite images. {0}")]
    Composite(#[from] CompositeError),

    /// Releasing the scene after a successful run failed.
    #[error("Failed to clean up the scene. {0}")]
    Cleanup(SceneError),
}
