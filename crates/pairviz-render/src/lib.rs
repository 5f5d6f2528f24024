#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// External renderer driven through a scene manifest.
pub mod command;

/// Cropping and concatenation of rendered frames.
pub mod composite;

/// Pipeline configuration.
pub mod config;

/// Error types for rendering, compositing and the pipeline.
pub mod error;

/// Point groups rendered in one pass.
pub mod group;

/// The fixed comparison layout of a registration sample.
pub mod layout;

/// Scoped rendering of point groups.
pub mod orchestrator;

/// The end-to-end comparison pipeline.
pub mod pipeline;

/// The scene collaborator interface.
pub mod scene;

pub use composite::{composite_images, CropGeometry};
pub use config::PipelineConfig;
pub use error::{
    CompositeError, ConfigError, LayoutError, PipelineError, RenderError, SceneError,
};
pub use group::{GroupMember, PointGroup};
pub use orchestrator::{render_group, render_single, RenderOptions, RenderOutput};
pub use pipeline::{Phase, Pipeline, PipelineReport};
pub use scene::{GeometryId, PointColor, Scene};
