use glam::DVec3;

/// An ordered set of 3D points stored as rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<[f64; 3]>,
}

impl PointSet {
    /// Create a new point set from points.
    pub fn new(points: Vec<[f64; 3]>) -> Self {
        Self { points }
    }

    /// Concatenate several point sets, keeping their order.
    ///
    /// Example:
    ///
    /// ```
    /// use pairviz_3d::pointcloud::PointSet;
    ///
    /// let a = PointSet::new(vec![[0.0, 0.0, 0.0]]);
    /// let b = PointSet::new(vec![[1.0, 1.0, 1.0]]);
    /// let ab = PointSet::concat(&[&a, &b]);
    /// assert_eq!(ab.len(), 2);
    /// ```
    pub fn concat(sets: &[&PointSet]) -> Self {
        let total = sets.iter().map(|s| s.len()).sum();
        let mut points = Vec::with_capacity(total);
        for set in sets {
            points.extend_from_slice(&set.points);
        }
        Self { points }
    }

    /// Get the number of points in the point set.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point set.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Consume the point set and return the points.
    pub fn into_points(self) -> Vec<[f64; 3]> {
        self.points
    }

    /// Get the minimum and maximum corners of the axis-aligned bounding box.
    ///
    /// Returns `None` for an empty point set.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = DVec3::from_array(*self.points.first()?);
        let (min, max) = self
            .points
            .iter()
            .map(|p| DVec3::from_array(*p))
            .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some((min.to_array(), max.to_array()))
    }

    /// Get the center of the axis-aligned bounding box.
    ///
    /// Returns `None` for an empty point set.
    pub fn bounding_box_center(&self) -> Option<[f64; 3]> {
        let (min, max) = self.bounds()?;
        Some(((DVec3::from_array(min) + DVec3::from_array(max)) * 0.5).to_array())
    }
}

impl From<Vec<[f64; 3]>> for PointSet {
    fn from(points: Vec<[f64; 3]>) -> Self {
        Self::new(points)
    }
}
