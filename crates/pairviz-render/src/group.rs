use std::path::{Path, PathBuf};

use pairviz_3d::pointcloud::PointSet;

use crate::error::RenderError;
use crate::scene::PointColor;

/// One point set of a group, with its object label and color.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMember {
    /// Object label in the host scene.
    pub label: String,
    /// Display color.
    pub color: PointColor,
    /// The points to render.
    pub points: PointSet,
}

/// A named collection of point sets rendered together in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    name: String,
    members: Vec<GroupMember>,
    mesh: Option<PathBuf>,
}

impl PointGroup {
    /// Create a group from its members.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyGroup`] if `members` is empty.
    pub fn new(name: impl Into<String>, members: Vec<GroupMember>) -> Result<Self, RenderError> {
        let name = name.into();
        if members.is_empty() {
            return Err(RenderError::EmptyGroup(name));
        }
        Ok(Self {
            name,
            members,
            mesh: None,
        })
    }

    /// Create a group from parallel lists of labels, colors and point sets.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::GroupShape`] if the lists differ in length.
    ///
    /// Example:
    ///
    /// ```
    /// use pairviz_3d::pointcloud::PointSet;
    /// use pairviz_render::{PointColor, PointGroup};
    ///
    /// let group = PointGroup::from_parallel(
    ///     "input 1",
    ///     &["in_1"],
    ///     &[PointColor::Blue],
    ///     vec![PointSet::new(vec![[0.0, 0.0, 0.0]])],
    /// )
    /// .unwrap();
    /// assert_eq!(group.members().len(), 1);
    /// ```
    pub fn from_parallel(
        name: impl Into<String>,
        labels: &[&str],
        colors: &[PointColor],
        point_sets: Vec<PointSet>,
    ) -> Result<Self, RenderError> {
        if labels.len() != colors.len() || labels.len() != point_sets.len() {
            return Err(RenderError::GroupShape {
                labels: labels.len(),
                colors: colors.len(),
                point_sets: point_sets.len(),
            });
        }

        let members = labels
            .iter()
            .zip(colors)
            .zip(point_sets)
            .map(|((label, color), points)| GroupMember {
                label: label.to_string(),
                color: *color,
                points,
            })
            .collect();

        Self::new(name, members)
    }

    /// Attach a mesh asset imported for this pass only.
    pub fn with_mesh(mut self, mesh: impl Into<PathBuf>) -> Self {
        self.mesh = Some(mesh.into());
        self
    }

    /// Caption of the group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in render order.
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// Mesh asset imported for this pass, if any.
    pub fn mesh(&self) -> Option<&Path> {
        self.mesh.as_deref()
    }

    /// Total number of points in the group.
    pub fn num_points(&self) -> usize {
        self.members.iter().map(|m| m.points.len()).sum()
    }
}
