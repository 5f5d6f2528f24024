use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use pairviz_3d::{
    io::{obj::write_obj_centered, ply::write_ply_ascii},
    pointcloud::PointSet,
};

use crate::error::SceneError;
use crate::scene::{GeometryId, PointColor, Scene};

/// File name of the manifest handed to the renderer.
pub const MANIFEST_FILE: &str = "scene.json";

/// Material of imported meshes.
pub const MESH_MATERIAL: &str = "TransparentGray";

/// Kind of a manifest object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Point geometry, removed by [`Scene::clear_transient`].
    Points,
    /// An imported mesh, removed by [`Scene::clear_database`].
    Mesh,
}

/// One object of the scene manifest.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneObject {
    /// Geometry id.
    pub id: u64,
    /// Points or mesh.
    pub kind: ObjectKind,
    /// Object label.
    pub label: String,
    /// Geometry file inside the work directory.
    pub path: PathBuf,
    /// Host material name.
    pub material: String,
    /// Base color as rgb8.
    pub color: [u8; 3],
    /// Sphere radius of point geometry.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sphere_radius: Option<f64>,
}

/// The scene description read by the external renderer.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneManifest {
    /// Length of the z-axis gizmo set by [`Scene::preset`].
    pub z_axis_length: Option<f64>,
    /// Objects to draw.
    pub objects: Vec<SceneObject>,
}

/// A scene rendered by an external program.
///
/// Geometry lives in a work directory: point sets as ASCII PLY files and
/// meshes as recentered OBJ copies, listed in a JSON manifest. Rendering runs
/// `program [args..] <manifest> <output>` and waits for it to exit.
#[derive(Debug)]
pub struct CommandScene {
    program: PathBuf,
    args: Vec<String>,
    work_dir: PathBuf,
    manifest: SceneManifest,
    next_id: u64,
}

impl CommandScene {
    /// Create a scene driving `program`, keeping its files in `work_dir`.
    pub fn new(program: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            work_dir: work_dir.into(),
            manifest: SceneManifest::default(),
            next_id: 0,
        }
    }

    /// Arguments passed to the renderer ahead of the manifest and output paths.
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The current manifest.
    pub fn manifest(&self) -> &SceneManifest {
        &self.manifest
    }

    /// The work directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path of the manifest written before each render.
    pub fn manifest_path(&self) -> PathBuf {
        self.work_dir.join(MANIFEST_FILE)
    }

    fn allocate(&mut self) -> Result<u64, SceneError> {
        std::fs::create_dir_all(&self.work_dir)?;
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    fn remove_kind(&mut self, kind: ObjectKind) -> Result<(), SceneError> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.manifest.objects)
            .into_iter()
            .partition(|object| object.kind == kind);
        self.manifest.objects = kept;
        remove_files(removed)
    }

    fn write_manifest(&self) -> Result<PathBuf, SceneError> {
        std::fs::create_dir_all(&self.work_dir)?;
        let path = self.manifest_path();
        let mut writer = std::io::BufWriter::new(std::fs::File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &self.manifest)?;
        writer.flush()?;
        Ok(path)
    }
}

fn remove_file_if_exists(path: &Path) -> Result<(), SceneError> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

fn remove_files(objects: Vec<SceneObject>) -> Result<(), SceneError> {
    for object in objects {
        remove_file_if_exists(&object.path)?;
    }
    Ok(())
}

impl Scene for CommandScene {
    fn preset(&mut self, z_axis_length: f64) -> Result<(), SceneError> {
        std::fs::create_dir_all(&self.work_dir)?;
        self.manifest.z_axis_length = Some(z_axis_length);
        Ok(())
    }

    fn clear_transient(&mut self) -> Result<(), SceneError> {
        self.remove_kind(ObjectKind::Points)
    }

    fn clear_database(&mut self) -> Result<(), SceneError> {
        self.remove_kind(ObjectKind::Mesh)
    }

    fn materialize_points(
        &mut self,
        points: &PointSet,
        label: &str,
        color: PointColor,
        sphere_radius: f64,
    ) -> Result<GeometryId, SceneError> {
        let id = self.allocate()?;
        let path = self.work_dir.join(format!("points_{id}.ply"));
        write_ply_ascii(&path, points, Some(color.rgb()))?;

        self.manifest.objects.push(SceneObject {
            id,
            kind: ObjectKind::Points,
            label: label.to_string(),
            path,
            material: color.material_name().to_string(),
            color: color.rgb(),
            sphere_radius: Some(sphere_radius),
        });

        Ok(GeometryId(id))
    }

    fn import_mesh(&mut self, path: &Path) -> Result<GeometryId, SceneError> {
        let id = self.allocate()?;
        let centered = self.work_dir.join(format!("mesh_{id}.obj"));
        let center = write_obj_centered(path, &centered)?;
        log::debug!("imported {} centered at {center:?}", path.display());

        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("mesh_{id}"));
        self.manifest.objects.push(SceneObject {
            id,
            kind: ObjectKind::Mesh,
            label,
            path: centered,
            material: MESH_MATERIAL.to_string(),
            color: PointColor::Gray.rgb(),
            sphere_radius: None,
        });

        Ok(GeometryId(id))
    }

    fn remove_geometry(&mut self, id: GeometryId) -> Result<(), SceneError> {
        let idx = self
            .manifest
            .objects
            .iter()
            .position(|object| object.id == id.0)
            .ok_or(SceneError::UnknownGeometry(id))?;
        let object = self.manifest.objects.remove(idx);
        remove_file_if_exists(&object.path)
    }

    fn render(&mut self, output: &Path) -> Result<(), SceneError> {
        let manifest_path = self.write_manifest()?;
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        log::debug!(
            "running {} with {} objects",
            self.program.display(),
            self.manifest.objects.len()
        );
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&manifest_path)
            .arg(output)
            .status()?;

        if !status.success() {
            return Err(SceneError::RenderFailed {
                program: self.program.clone(),
                code: status.code(),
            });
        }
        if !output.exists() {
            return Err(SceneError::MissingOutput(output.to_path_buf()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> PointSet {
        PointSet::new(vec![[0.0, 0.0, 0.0], [0.1, 0.2, 0.3]])
    }

    #[test]
    fn test_materialize_and_remove() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut scene = CommandScene::new("true", tmp_dir.path());

        let id = scene.materialize_points(&points(), "in_1", PointColor::Blue, 0.02)?;
        let object = &scene.manifest().objects[0];
        assert_eq!(object.label, "in_1");
        assert_eq!(object.material, "Blue");
        assert_eq!(object.sphere_radius, Some(0.02));
        let ply = object.path.clone();
        assert!(ply.exists());

        scene.remove_geometry(id)?;
        assert!(scene.manifest().objects.is_empty());
        assert!(!ply.exists());

        assert!(matches!(
            scene.remove_geometry(id),
            Err(SceneError::UnknownGeometry(_))
        ));
        Ok(())
    }

    #[test]
    fn test_clear_transient_keeps_meshes() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mesh = tmp_dir.path().join("chair.obj");
        std::fs::write(&mesh, "v 1 1 1\nv 3 3 3\nf 1 2 1\n")?;

        let mut scene = CommandScene::new("true", tmp_dir.path().join("work"));
        scene.import_mesh(&mesh)?;
        scene.materialize_points(&points(), "in_1", PointColor::Blue, 0.02)?;
        scene.materialize_points(&points(), "in_2", PointColor::Orange, 0.02)?;
        assert_eq!(scene.manifest().objects.len(), 3);

        scene.clear_transient()?;
        assert_eq!(scene.manifest().objects.len(), 1);
        let mesh_object = &scene.manifest().objects[0];
        assert_eq!(mesh_object.kind, ObjectKind::Mesh);
        assert_eq!(mesh_object.label, "chair");
        assert_eq!(mesh_object.material, MESH_MATERIAL);

        scene.clear_database()?;
        assert!(scene.manifest().objects.is_empty());
        Ok(())
    }

    #[test]
    fn test_import_missing_mesh() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut scene = CommandScene::new("true", tmp_dir.path());
        assert!(matches!(
            scene.import_mesh(&tmp_dir.path().join("missing.obj")),
            Err(SceneError::Mesh(_))
        ));
        assert!(scene.manifest().objects.is_empty());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_render_invokes_program() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        // the renderer copies the manifest to the output path
        let mut scene = CommandScene::new("sh", tmp_dir.path().join("work"))
            .with_args(["-c", "cp \"$0\" \"$1\""]);
        scene.preset(0.9)?;
        scene.materialize_points(&points(), "gt_point1", PointColor::Gray, 0.01)?;

        let output = tmp_dir.path().join("frames").join("1.png");
        scene.render(&output)?;

        let reader = std::io::BufReader::new(std::fs::File::open(&output)?);
        let manifest: SceneManifest = serde_json::from_reader(reader)?;
        assert_eq!(&manifest, scene.manifest());
        assert_eq!(manifest.z_axis_length, Some(0.9));
        assert_eq!(manifest.objects[0].color, [127, 127, 127]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_render_failure() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut scene = CommandScene::new("sh", tmp_dir.path()).with_args(["-c", "exit 3"]);
        let res = scene.render(&tmp_dir.path().join("out.png"));
        assert!(matches!(
            res,
            Err(SceneError::RenderFailed { code: Some(3), .. })
        ));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_render_without_output() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let mut scene = CommandScene::new("sh", tmp_dir.path()).with_args(["-c", "true"]);
        let res = scene.render(&tmp_dir.path().join("out.png"));
        assert!(matches!(res, Err(SceneError::MissingOutput(_))));
        Ok(())
    }
}
