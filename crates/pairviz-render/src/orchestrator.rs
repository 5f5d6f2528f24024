use std::path::{Path, PathBuf};

use pairviz_3d::pointcloud::PointSet;

use crate::error::{RenderError, SceneError};
use crate::group::PointGroup;
use crate::scene::{GeometryId, PointColor, Scene};

/// Options shared by every render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Radius of the sphere drawn for each point.
    pub sphere_radius: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sphere_radius: 0.02,
        }
    }
}

/// The image produced by one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Path of the written image.
    pub path: PathBuf,
}

/// Transient host state owned by one render pass.
///
/// Opening the scope resets the scene's transient state. Every geometry created
/// through the scope is removed again when it is closed or dropped, so a pass
/// leaves the scene in the baseline state it found, whatever the outcome.
pub struct TransientScope<'a, S: Scene + ?Sized> {
    scene: &'a mut S,
    created: Vec<GeometryId>,
    released: bool,
}

impl<'a, S: Scene + ?Sized> TransientScope<'a, S> {
    /// Reset the transient scene state and open a scope over it.
    pub fn open(scene: &'a mut S) -> Result<Self, SceneError> {
        scene.clear_transient()?;
        Ok(Self {
            scene,
            created: Vec::new(),
            released: false,
        })
    }

    /// Materialize a point set inside the scope.
    pub fn materialize(
        &mut self,
        points: &PointSet,
        label: &str,
        color: PointColor,
        sphere_radius: f64,
    ) -> Result<GeometryId, SceneError> {
        let id = self
            .scene
            .materialize_points(points, label, color, sphere_radius)?;
        self.created.push(id);
        Ok(id)
    }

    /// Import a mesh inside the scope.
    pub fn import_mesh(&mut self, path: &Path) -> Result<GeometryId, SceneError> {
        let id = self.scene.import_mesh(path)?;
        self.created.push(id);
        Ok(id)
    }

    /// Render the scope's current contents.
    pub fn render(&mut self, output: &Path) -> Result<(), SceneError> {
        self.scene.render(output)
    }

    /// Number of geometries created and not yet released.
    pub fn num_live(&self) -> usize {
        self.created.len()
    }

    /// Release the scope, surfacing the first release error.
    pub fn close(mut self) -> Result<(), SceneError> {
        self.released = true;
        self.release()
    }

    fn release(&mut self) -> Result<(), SceneError> {
        let mut first_err = None;
        // newest first, so meshes imported before the points go last
        while let Some(id) = self.created.pop() {
            if let Err(e) = self.scene.remove_geometry(id) {
                first_err.get_or_insert(e);
            }
        }
        if let Err(e) = self.scene.clear_transient() {
            first_err.get_or_insert(e);
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<S: Scene + ?Sized> Drop for TransientScope<'_, S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.release() {
            log::warn!("failed to release transient scene state: {e}");
        }
    }
}

/// Render one point group into `image_path`.
///
/// The host is reset before the pass and restored after it, on success and on
/// failure. If any member cannot be materialized the group is abandoned before
/// the render call, so no partial image is produced.
///
/// # Arguments
///
/// * `scene` - The host scene.
/// * `group` - The point sets to render together.
/// * `image_path` - Where the host writes the image.
/// * `options` - Render options shared by every member.
pub fn render_group<S: Scene + ?Sized>(
    scene: &mut S,
    group: &PointGroup,
    image_path: &Path,
    options: &RenderOptions,
) -> Result<RenderOutput, RenderError> {
    log::info!(
        "rendering group '{}' ({} sets, {} points) -> {}",
        group.name(),
        group.members().len(),
        group.num_points(),
        image_path.display()
    );
    let now = std::time::Instant::now();

    let mut scope = TransientScope::open(scene)?;

    if let Some(mesh) = group.mesh() {
        scope
            .import_mesh(mesh)
            .map_err(|source| RenderError::MeshImport {
                path: mesh.to_path_buf(),
                source,
            })?;
    }

    for member in group.members() {
        log::debug!(
            "materializing {} ({} points, {})",
            member.label,
            member.points.len(),
            member.color
        );
        scope
            .materialize(
                &member.points,
                &member.label,
                member.color,
                options.sphere_radius,
            )
            .map_err(|source| RenderError::Materialize {
                label: member.label.clone(),
                source,
            })?;
    }

    // a frame left over from an earlier pass must not pass for this one
    remove_stale_output(image_path)?;
    scope.render(image_path)?;
    if !image_path.exists() {
        return Err(SceneError::MissingOutput(image_path.to_path_buf()).into());
    }

    scope.close()?;
    log::debug!("group '{}' rendered in {:?}", group.name(), now.elapsed());

    Ok(RenderOutput {
        path: image_path.to_path_buf(),
    })
}

fn remove_stale_output(path: &Path) -> Result<(), SceneError> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Render a single point set in one color.
pub fn render_single<S: Scene + ?Sized>(
    scene: &mut S,
    points: PointSet,
    label: &str,
    color: PointColor,
    image_path: &Path,
    options: &RenderOptions,
) -> Result<RenderOutput, RenderError> {
    let group = PointGroup::from_parallel(label, &[label], &[color], vec![points])?;
    render_group(scene, &group, image_path, options)
}
