use glam::DVec3;

use crate::camera::{Camera, Recentering};

/// Translation and radius that bring the camera centers of a scene around the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNormalization {
    /// Offset that moves the mean camera center to the origin.
    pub translate: [f64; 3],
    /// Radius of the sphere enclosing the camera centers, with a 10% margin.
    pub radius: f64,
}

impl SceneNormalization {
    /// Compute the normalization from a set of camera centers.
    ///
    /// The radius is 1.1 times the largest distance to the mean center. An empty or
    /// degenerate set of centers yields a radius of 1.
    pub fn from_centers(centers: &[[f64; 3]]) -> Self {
        if centers.is_empty() {
            return Self {
                translate: [0.0; 3],
                radius: 1.0,
            };
        }

        let centers = centers
            .iter()
            .map(|c| DVec3::from_array(*c))
            .collect::<Vec<_>>();
        let mean = centers.iter().copied().sum::<DVec3>() / centers.len() as f64;
        let diagonal = centers
            .iter()
            .map(|c| c.distance(mean))
            .fold(0.0, f64::max);

        let radius = if diagonal > 0.0 { diagonal * 1.1 } else { 1.0 };

        Self {
            translate: (-mean).to_array(),
            radius,
        }
    }

    /// Compute the normalization from the cached centers of a set of cameras.
    pub fn from_cameras(cameras: &[Camera]) -> Self {
        let centers = cameras
            .iter()
            .map(|camera| camera.camera_center().as_dvec3().to_array())
            .collect::<Vec<_>>();
        Self::from_centers(&centers)
    }

    /// The re-centering that moves the scene to the origin and scales it into the unit sphere.
    pub fn to_recentering(&self) -> Recentering {
        Recentering {
            translate: self.translate,
            scale: 1.0 / self.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalization_symmetric() {
        let norm = SceneNormalization::from_centers(&[[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]]);
        assert_eq!(norm.translate, [0.0, 0.0, 0.0]);
        assert_relative_eq!(norm.radius, 1.1);
    }

    #[test]
    fn test_normalization_offset() {
        let norm = SceneNormalization::from_centers(&[[2.0, 3.0, 0.0], [4.0, 3.0, 0.0]]);
        assert_eq!(norm.translate, [-3.0, -3.0, 0.0]);
        assert_relative_eq!(norm.radius, 1.1);

        let recentering = norm.to_recentering();
        assert_relative_eq!(recentering.scale, 1.0 / 1.1);
    }

    #[test]
    fn test_normalization_degenerate() {
        let norm = SceneNormalization::from_centers(&[]);
        assert_eq!(norm.radius, 1.0);

        let norm = SceneNormalization::from_centers(&[[1.0, 1.0, 1.0]]);
        assert_eq!(norm.translate, [-1.0, -1.0, -1.0]);
        assert_eq!(norm.radius, 1.0);
    }
}
