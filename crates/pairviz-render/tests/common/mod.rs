#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use pairviz_3d::pointcloud::PointSet;
use pairviz_image::{Image, ImageSize};
use pairviz_io::{png::write_image_png_rgba8, PairDataset};
use pairviz_render::{GeometryId, PointColor, Scene, SceneError};

/// A call received by the recording scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Preset(f64),
    ClearTransient,
    ClearDatabase,
    Materialize {
        label: String,
        color: PointColor,
        num_points: usize,
    },
    ImportMesh(PathBuf),
    Remove(GeometryId),
    Render(PathBuf),
}

/// A scene that records every call and writes one solid-color frame per render.
pub struct RecordingScene {
    pub events: Vec<Event>,
    pub frame_size: ImageSize,
    pub fail_materialize: Option<String>,
    pub fail_render_at: Option<usize>,
    /// Report success from `render` without writing a frame.
    pub skip_writes: bool,
    points: BTreeSet<GeometryId>,
    meshes: BTreeSet<GeometryId>,
    next_id: u64,
    renders: usize,
}

impl RecordingScene {
    pub fn new(frame_size: ImageSize) -> Self {
        Self {
            events: Vec::new(),
            frame_size,
            fail_materialize: None,
            fail_render_at: None,
            skip_writes: false,
            points: BTreeSet::new(),
            meshes: BTreeSet::new(),
            next_id: 0,
            renders: 0,
        }
    }

    /// Geometry created and not yet removed.
    pub fn num_live(&self) -> usize {
        self.points.len() + self.meshes.len()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn render_count(&self) -> usize {
        self.count(|e| matches!(e, Event::Render(_)))
    }

    /// Color of the frame written by the `k`-th render (0-based).
    pub fn frame_color(k: usize) -> [u8; 4] {
        [(k * 30) as u8, 200, 50, 255]
    }
}

impl Scene for RecordingScene {
    fn preset(&mut self, z_axis_length: f64) -> Result<(), SceneError> {
        self.events.push(Event::Preset(z_axis_length));
        Ok(())
    }

    fn clear_transient(&mut self) -> Result<(), SceneError> {
        self.events.push(Event::ClearTransient);
        self.points.clear();
        Ok(())
    }

    fn clear_database(&mut self) -> Result<(), SceneError> {
        self.events.push(Event::ClearDatabase);
        self.meshes.clear();
        Ok(())
    }

    fn materialize_points(
        &mut self,
        points: &PointSet,
        label: &str,
        color: PointColor,
        _sphere_radius: f64,
    ) -> Result<GeometryId, SceneError> {
        if self.fail_materialize.as_deref() == Some(label) {
            return Err(SceneError::Host(format!("cannot materialize {label}")));
        }
        self.events.push(Event::Materialize {
            label: label.to_string(),
            color,
            num_points: points.len(),
        });
        let id = GeometryId(self.next_id);
        self.next_id += 1;
        self.points.insert(id);
        Ok(id)
    }

    fn import_mesh(&mut self, path: &Path) -> Result<GeometryId, SceneError> {
        self.events.push(Event::ImportMesh(path.to_path_buf()));
        let id = GeometryId(self.next_id);
        self.next_id += 1;
        self.meshes.insert(id);
        Ok(id)
    }

    fn remove_geometry(&mut self, id: GeometryId) -> Result<(), SceneError> {
        self.events.push(Event::Remove(id));
        if self.points.remove(&id) || self.meshes.remove(&id) {
            Ok(())
        } else {
            Err(SceneError::UnknownGeometry(id))
        }
    }

    fn render(&mut self, output: &Path) -> Result<(), SceneError> {
        let k = self.renders;
        self.renders += 1;
        if self.fail_render_at == Some(k) {
            return Err(SceneError::Host("renderer crashed".to_string()));
        }
        self.events.push(Event::Render(output.to_path_buf()));
        if self.skip_writes {
            return Ok(());
        }

        let size = self.frame_size;
        let data = Self::frame_color(k).repeat(size.width * size.height);
        let image = Image::<u8, 4>::new(size, data).map_err(|e| SceneError::Host(e.to_string()))?;
        write_image_png_rgba8(output, &image).map_err(|e| SceneError::Host(e.to_string()))?;
        Ok(())
    }
}

/// A small sample with identity poses.
pub fn sample_dataset(name: &str) -> PairDataset {
    let identity = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    PairDataset {
        name: name.to_string(),
        in_pts1: PointSet::new(vec![[0.0, 0.0, 0.0], [0.1, 0.0, 0.0]]),
        in_pts2: PointSet::new(vec![[0.0, 0.1, 0.0]]),
        gt_pts1: PointSet::new(vec![[0.2, 0.2, 0.2], [0.3, 0.3, 0.3]]),
        gt_pts2: PointSet::new(vec![[0.2, -0.2, 0.2]]),
        out_pts1: PointSet::new(vec![[0.25, 0.2, 0.2]]),
        out_pts2: PointSet::new(vec![[0.25, -0.2, 0.2]]),
        out_para12_r: [0.0, 0.0, 0.0, 1.0],
        out_para21_r: [0.0, 0.0, 0.0, 1.0],
        out_para12_t: [0.0, 0.0, 0.5],
        out_para21_t: [0.0, 0.0, -0.5],
        gt_matrix_1: identity,
        gt_matrix_2: identity,
    }
}
