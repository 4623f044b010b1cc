use crate::error::GeometryError;

/// A point cloud with points, colors, and normals.
///
/// The three sequences are index aligned and always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
    // The colors of the points.
    colors: Vec<[u8; 3]>,
    // The normals of the points.
    normals: Vec<[f64; 3]>,
}

impl PointCloud {
    /// Create a new point cloud from points, colors and normals.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MalformedInput`] if the sequences differ in length.
    pub fn new(
        points: Vec<[f64; 3]>,
        colors: Vec<[u8; 3]>,
        normals: Vec<[f64; 3]>,
    ) -> Result<Self, GeometryError> {
        if colors.len() != points.len() || normals.len() != points.len() {
            return Err(GeometryError::MalformedInput(format!(
                "point cloud sequences differ in length: {} points, {} colors, {} normals",
                points.len(),
                colors.len(),
                normals.len()
            )));
        }

        Ok(Self {
            points,
            colors,
            normals,
        })
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Get as reference the normals of the points in the point cloud.
    pub fn normals(&self) -> &[[f64; 3]] {
        &self.normals
    }

    /// Get the colors scaled into `[0, 1]`.
    pub fn colors_normalized(&self) -> Vec<[f32; 3]> {
        self.colors
            .iter()
            .map(|c| c.map(|v| v as f32 / 255.0))
            .collect()
    }

    /// Get the minimum bound of the point cloud.
    pub fn min_bound(&self) -> Option<[f64; 3]> {
        self.points.iter().copied().reduce(|a, b| {
            [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])]
        })
    }

    /// Get the maximum bound of the point cloud.
    pub fn max_bound(&self) -> Option<[f64; 3]> {
        self.points.iter().copied().reduce(|a, b| {
            [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointcloud() -> Result<(), GeometryError> {
        let pointcloud = PointCloud::new(
            vec![[0.0, 0.0, 0.0], [1.0, -2.0, 0.5]],
            vec![[255, 0, 0], [0, 51, 0]],
            vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        )?;

        assert_eq!(pointcloud.len(), 2);
        assert!(!pointcloud.is_empty());
        assert_eq!(pointcloud.points()[1], [1.0, -2.0, 0.5]);
        assert_eq!(pointcloud.normals()[0], [0.0, 1.0, 0.0]);
        assert_eq!(
            pointcloud.colors_normalized(),
            vec![[1.0, 0.0, 0.0], [0.0, 0.2, 0.0]]
        );
        assert_eq!(pointcloud.min_bound(), Some([0.0, -2.0, 0.0]));
        assert_eq!(pointcloud.max_bound(), Some([1.0, 0.0, 0.5]));
        Ok(())
    }

    #[test]
    fn test_pointcloud_empty() -> Result<(), GeometryError> {
        let pointcloud = PointCloud::new(vec![], vec![], vec![])?;
        assert!(pointcloud.is_empty());
        assert_eq!(pointcloud.min_bound(), None);
        Ok(())
    }

    #[test]
    fn test_pointcloud_length_mismatch() {
        let result = PointCloud::new(vec![[0.0; 3]; 2], vec![[0; 3]; 2], vec![[0.0; 3]; 1]);
        assert!(matches!(result, Err(GeometryError::MalformedInput(_))));
    }
}
