use std::path::{Path, PathBuf};

use crate::composite::CropGeometry;
use crate::error::ConfigError;
use crate::orchestrator::RenderOptions;

/// ShapeNet categories with a z-axis preset and its length.
pub const CATEGORY_Z_AXIS: [(&str, f64); 8] = [
    ("02691156", 0.6),
    ("02958343", 0.6),
    ("04256520", 0.6),
    ("04379243", 0.6),
    ("04530566", 0.6),
    ("02933112", 0.9),
    ("03636649", 0.9),
    ("03001627", 0.9),
];

/// Length of the z-axis gizmo for a ShapeNet category code.
///
/// Example:
///
/// ```
/// use pairviz_render::config::z_axis_length;
///
/// assert_eq!(z_axis_length("03001627"), Some(0.9));
/// assert_eq!(z_axis_length("02691156"), Some(0.6));
/// assert_eq!(z_axis_length("99999999"), None);
/// ```
pub fn z_axis_length(category: &str) -> Option<f64> {
    CATEGORY_Z_AXIS
        .iter()
        .find(|(code, _)| *code == category)
        .map(|(_, length)| *length)
}

/// Configuration of one comparison pipeline run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// The pair dataset to render.
    pub dataset_path: PathBuf,
    /// Directory of the composite figure.
    pub output_dir: PathBuf,
    /// Subdirectory of `output_dir` holding the per-group frames.
    pub temp_dir: PathBuf,
    /// Normalized mesh shown with the inputs in the canonical frame.
    pub mesh_path: Option<PathBuf>,
    /// ShapeNet category code of the sample.
    pub category: String,
    /// Crop applied to every frame.
    pub crop: CropGeometry,
    /// Radius of the sphere drawn for each point.
    pub sphere_radius: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("inputs/pair.json"),
            output_dir: PathBuf::from("images"),
            temp_dir: PathBuf::from("temp"),
            mesh_path: None,
            category: "03001627".to_string(),
            crop: CropGeometry::default(),
            sphere_radius: 0.02,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crop.crop_size == 0 {
            return Err(ConfigError::InvalidCropSize);
        }
        if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.0) {
            return Err(ConfigError::InvalidSphereRadius(self.sphere_radius));
        }
        self.z_axis_length().map(|_| ())
    }

    /// Length of the z-axis gizmo for the configured category.
    pub fn z_axis_length(&self) -> Result<f64, ConfigError> {
        z_axis_length(&self.category).ok_or_else(|| ConfigError::UnknownCategory(self.category.clone()))
    }

    /// Directory of the per-group frames.
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join(&self.temp_dir)
    }

    /// Render options derived from the configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            sphere_radius: self.sphere_radius,
        }
    }
}
