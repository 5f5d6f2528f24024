use std::path::PathBuf;
use std::time::{Duration, Instant};

use pairviz_image::ImageSize;
use pairviz_io::PairDataset;

use crate::composite::composite_images;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, SceneError};
use crate::layout::{comparison_groups, SampleTransforms, GROUP_COUNT};
use crate::orchestrator::render_group;
use crate::scene::Scene;

/// The phases of one pipeline run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading the pair dataset.
    LoadDataset,
    /// Computing the rigid transforms and the comparison groups.
    ComputeTransforms,
    /// Rendering group `k` (1-based).
    RenderGroup(usize),
    /// Cropping and concatenating the frames.
    Composite,
    /// Releasing the host scene.
    Cleanup,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Phase::LoadDataset => write!(f, "load dataset"),
            Phase::ComputeTransforms => write!(f, "compute transforms"),
            Phase::RenderGroup(k) => write!(f, "render group {k}/{GROUP_COUNT}"),
            Phase::Composite => write!(f, "composite"),
            Phase::Cleanup => write!(f, "cleanup"),
        }
    }
}

/// Resets the host database when a run starts and again when it ends.
///
/// Dropping the guard without calling [`CleanupGuard::finish`] still clears
/// the scene, logging any failure instead of returning it.
pub struct CleanupGuard<'a, S: Scene + ?Sized> {
    scene: &'a mut S,
    finished: bool,
}

impl<'a, S: Scene + ?Sized> CleanupGuard<'a, S> {
    /// Clear the host database and guard the scene until the run ends.
    pub fn acquire(scene: &'a mut S) -> Result<Self, SceneError> {
        scene.clear_transient()?;
        scene.clear_database()?;
        Ok(Self {
            scene,
            finished: false,
        })
    }

    /// The guarded scene.
    pub fn scene(&mut self) -> &mut S {
        &mut *self.scene
    }

    /// Clear the scene and surface the error, if any.
    pub fn finish(mut self) -> Result<(), SceneError> {
        self.finished = true;
        self.reset()
    }

    fn reset(&mut self) -> Result<(), SceneError> {
        let transient = self.scene.clear_transient();
        let database = self.scene.clear_database();
        transient.and(database)
    }
}

impl<S: Scene + ?Sized> Drop for CleanupGuard<'_, S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.reset() {
            log::warn!("failed to clean up the scene: {e}");
        }
    }
}

/// The outcome of a successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Name of the rendered sample.
    pub sample: String,
    /// Path of the comparison figure.
    pub composite_path: PathBuf,
    /// Per-group frames, in caption order.
    pub group_images: Vec<PathBuf>,
    /// Size of the comparison figure.
    pub composite_size: ImageSize,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// Renders the comparison figure of a pair dataset.
///
/// The pipeline owns its scene, so two pipelines never share host state.
///
/// Example:
///
/// ```no_run
/// use pairviz_render::{command::CommandScene, Pipeline, PipelineConfig};
///
/// let scene = CommandScene::new("my-renderer", "work");
/// let mut pipeline = Pipeline::new(PipelineConfig::default(), scene).unwrap();
/// let report = pipeline.run().unwrap();
/// println!("wrote {}", report.composite_path.display());
/// ```
pub struct Pipeline<S: Scene> {
    config: PipelineConfig,
    scene: S,
}

impl<S: Scene> Pipeline<S> {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: PipelineConfig, scene: S) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config, scene })
    }

    /// The configuration of the pipeline.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The host scene.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// The host scene, mutably.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Give back the host scene.
    pub fn into_scene(self) -> S {
        self.scene
    }

    /// Load the dataset, render the eight comparison groups and composite them.
    ///
    /// The host database is cleared before the first render and after the
    /// last one, whether the run succeeds or not. Frames already written are
    /// kept when a later phase fails.
    pub fn run(&mut self) -> Result<PipelineReport, PipelineError> {
        let now = Instant::now();
        let config = &self.config;
        let mut guard = CleanupGuard::acquire(&mut self.scene)?;

        log::info!("{}: {}", Phase::LoadDataset, config.dataset_path.display());
        let dataset = PairDataset::from_json_file(&config.dataset_path)?;

        log::info!("{}: sample {}", Phase::ComputeTransforms, dataset.name);
        let transforms = SampleTransforms::compute(&dataset)?;
        let groups = comparison_groups(&dataset, &transforms, config.mesh_path.as_deref())?;

        guard.scene().preset(config.z_axis_length()?)?;

        let frames_dir = config.frames_dir();
        std::fs::create_dir_all(&frames_dir)?;

        let options = config.render_options();
        let mut group_images = Vec::with_capacity(GROUP_COUNT);
        for (k, group) in groups.iter().enumerate() {
            log::info!("{}: {}", Phase::RenderGroup(k + 1), group.name());
            let image_path = frames_dir.join(format!("{}.png", k + 1));
            let output = render_group(guard.scene(), group, &image_path, &options).map_err(
                |source| PipelineError::Render {
                    group: group.name().to_string(),
                    source,
                },
            )?;
            group_images.push(output.path);
        }

        let composite_path = config.output_dir.join(format!("{}.png", dataset.name));
        log::info!("{}: {}", Phase::Composite, composite_path.display());
        let composite_size = composite_images(&group_images, &composite_path, &config.crop)?;

        log::info!("{}", Phase::Cleanup);
        guard.finish().map_err(PipelineError::Cleanup)?;

        let elapsed = now.elapsed();
        log::info!("sample {} rendered in {:.2?}", dataset.name, elapsed);

        Ok(PipelineReport {
            sample: dataset.name,
            composite_path,
            group_images,
            composite_size,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{GeometryId, PointColor};
    use pairviz_3d::pointcloud::PointSet;
    use std::path::Path;

    #[derive(Default)]
    struct CountingScene {
        transient_clears: usize,
        database_clears: usize,
        fail_database: bool,
    }

    impl Scene for CountingScene {
        fn preset(&mut self, _z_axis_length: f64) -> Result<(), SceneError> {
            Ok(())
        }

        fn clear_transient(&mut self) -> Result<(), SceneError> {
            self.transient_clears += 1;
            Ok(())
        }

        fn clear_database(&mut self) -> Result<(), SceneError> {
            self.database_clears += 1;
            if self.fail_database && self.database_clears > 1 {
                return Err(SceneError::Host("database locked".to_string()));
            }
            Ok(())
        }

        fn materialize_points(
            &mut self,
            _points: &PointSet,
            _label: &str,
            _color: PointColor,
            _sphere_radius: f64,
        ) -> Result<GeometryId, SceneError> {
            Ok(GeometryId(0))
        }

        fn import_mesh(&mut self, _path: &Path) -> Result<GeometryId, SceneError> {
            Ok(GeometryId(0))
        }

        fn remove_geometry(&mut self, _id: GeometryId) -> Result<(), SceneError> {
            Ok(())
        }

        fn render(&mut self, _output: &Path) -> Result<(), SceneError> {
            Ok(())
        }
    }

    #[test]
    fn test_guard_clears_on_drop() -> Result<(), SceneError> {
        let mut scene = CountingScene::default();
        {
            let _guard = CleanupGuard::acquire(&mut scene)?;
        }
        assert_eq!(scene.database_clears, 2);
        assert_eq!(scene.transient_clears, 2);
        Ok(())
    }

    #[test]
    fn test_guard_finish_surfaces_error() -> Result<(), SceneError> {
        let mut scene = CountingScene {
            fail_database: true,
            ..Default::default()
        };
        let guard = CleanupGuard::acquire(&mut scene)?;
        assert!(matches!(guard.finish(), Err(SceneError::Host(_))));
        // finish does not clear a second time on drop
        assert_eq!(scene.database_clears, 2);
        Ok(())
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::RenderGroup(3).to_string(), "render group 3/8");
        assert_eq!(Phase::LoadDataset.to_string(), "load dataset");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = PipelineConfig {
            category: "unknown".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Pipeline::new(config, CountingScene::default()),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_missing_dataset_cleans_up() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let config = PipelineConfig {
            dataset_path: tmp_dir.path().join("missing.json"),
            output_dir: tmp_dir.path().join("images"),
            ..Default::default()
        };
        let mut pipeline = Pipeline::new(config, CountingScene::default())?;
        assert!(matches!(pipeline.run(), Err(PipelineError::Load(_))));
        assert_eq!(pipeline.scene().database_clears, 2);
        Ok(())
    }
}
