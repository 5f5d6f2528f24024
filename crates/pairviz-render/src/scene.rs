use std::path::Path;

use pairviz_3d::pointcloud::PointSet;

use crate::error::SceneError;

/// Opaque handle to geometry created in a host scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub u64);

impl std::fmt::Display for GeometryId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display color of a point set, named after the host material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PointColor {
    /// Ground-truth context.
    Gray,
    /// First input and its derivatives.
    Blue,
    /// Second input and its derivatives.
    Orange,
}

impl PointColor {
    /// Name of the host material for this color.
    pub fn material_name(&self) -> &'static str {
        match self {
            PointColor::Gray => "Gray",
            PointColor::Blue => "Blue",
            PointColor::Orange => "Orange",
        }
    }

    /// Base color as rgb8.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            PointColor::Gray => [127, 127, 127],
            PointColor::Blue => [31, 119, 180],
            PointColor::Orange => [255, 127, 14],
        }
    }
}

impl std::fmt::Display for PointColor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.material_name())
    }
}

impl std::str::FromStr for PointColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(PointColor::Gray),
            "blue" => Ok(PointColor::Blue),
            "orange" => Ok(PointColor::Orange),
            _ => Err(format!("unknown color {s}, expected gray, blue or orange")),
        }
    }
}

/// The host rendering environment.
///
/// A scene is an explicit handle: every render call borrows it mutably, so one
/// scene never serves two render passes at once. Implementations own all host
/// state (geometry, materials, imported meshes, cached images).
pub trait Scene {
    /// Set up the baseline scene for a category, e.g. the length of the up axis gizmo.
    fn preset(&mut self, z_axis_length: f64) -> Result<(), SceneError>;

    /// Remove transient geometry and materials created for point groups.
    fn clear_transient(&mut self) -> Result<(), SceneError>;

    /// Remove imported meshes and cached images.
    fn clear_database(&mut self) -> Result<(), SceneError>;

    /// Convert a point set into colored sphere geometry tagged with `label`.
    fn materialize_points(
        &mut self,
        points: &PointSet,
        label: &str,
        color: PointColor,
        sphere_radius: f64,
    ) -> Result<GeometryId, SceneError>;

    /// Import a mesh asset, centered at the origin by its bounding-box center.
    fn import_mesh(&mut self, path: &Path) -> Result<GeometryId, SceneError>;

    /// Remove geometry previously created by this scene.
    fn remove_geometry(&mut self, id: GeometryId) -> Result<(), SceneError>;

    /// Render the current scene to `output` and block until the image is written.
    fn render(&mut self, output: &Path) -> Result<(), SceneError>;
}

impl<S: Scene + ?Sized> Scene for &mut S {
    fn preset(&mut self, z_axis_length: f64) -> Result<(), SceneError> {
        (**self).preset(z_axis_length)
    }

    fn clear_transient(&mut self) -> Result<(), SceneError> {
        (**self).clear_transient()
    }

    fn clear_database(&mut self) -> Result<(), SceneError> {
        (**self).clear_database()
    }

    fn materialize_points(
        &mut self,
        points: &PointSet,
        label: &str,
        color: PointColor,
        sphere_radius: f64,
    ) -> Result<GeometryId, SceneError> {
        (**self).materialize_points(points, label, color, sphere_radius)
    }

    fn import_mesh(&mut self, path: &Path) -> Result<GeometryId, SceneError> {
        (**self).import_mesh(path)
    }

    fn remove_geometry(&mut self, id: GeometryId) -> Result<(), SceneError> {
        (**self).remove_geometry(id)
    }

    fn render(&mut self, output: &Path) -> Result<(), SceneError> {
        (**self).render(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_str() {
        assert_eq!("Blue".parse::<PointColor>(), Ok(PointColor::Blue));
        assert_eq!("grey".parse::<PointColor>(), Ok(PointColor::Gray));
        assert_eq!("ORANGE".parse::<PointColor>(), Ok(PointColor::Orange));
        assert!("red".parse::<PointColor>().is_err());
    }

    #[test]
    fn test_color_material_name() {
        assert_eq!(PointColor::Orange.to_string(), "Orange");
        assert_eq!(PointColor::Gray.material_name(), "Gray");
    }
}
