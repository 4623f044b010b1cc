use glam::{DMat4, Mat4};

use crate::error::GeometryError;

/// The projection model of a camera.
///
/// Only [`ProjectionModel::Perspective`] has a projection matrix. The other variants are
/// carried through the pipeline so that they can be rejected explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProjectionModel {
    /// Pinhole perspective projection.
    #[default]
    Perspective,
    /// Fisheye projection, not implemented.
    Fisheye,
}

/// The near and far clipping planes of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRange {
    /// Distance to the near plane.
    pub znear: f64,
    /// Distance to the far plane.
    pub zfar: f64,
}

impl ClipRange {
    /// Create a new clip range.
    pub fn new(znear: f64, zfar: f64) -> Self {
        Self { znear, zfar }
    }

    /// Check that `0 < znear < zfar` and both planes are finite.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.znear > 0.0 && self.zfar > self.znear && self.zfar.is_finite() {
            return Ok(());
        }

        Err(GeometryError::InvalidRange {
            znear: self.znear,
            zfar: self.zfar,
        })
    }
}

impl Default for ClipRange {
    fn default() -> Self {
        Self {
            znear: 0.01,
            zfar: 100.0,
        }
    }
}

/// Compute the perspective projection matrix of a symmetric frustum.
///
/// The frustum bounds are derived from the field of view as `tan(fov / 2) * znear` and the
/// depth is mapped with a positive z sign, i.e. the camera looks down the +Z axis.
///
/// # Arguments
///
/// * `clip` - The near and far clipping planes.
/// * `fov_x` - The horizontal field of view in radians.
/// * `fov_y` - The vertical field of view in radians.
///
/// # Returns
///
/// The 4x4 projection matrix from view space to clip space.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidRange`] if the clip range is invalid and
/// [`GeometryError::MalformedInput`] if a field of view is outside `(0, π)`.
///
/// Example:
///
/// ```
/// use splatcam_3d::projection::{perspective, ClipRange};
///
/// let fov = std::f64::consts::FRAC_PI_2;
/// let projection = perspective(&ClipRange::default(), fov, fov).unwrap();
/// assert_eq!(projection.row(3).z, 1.0);
/// assert_eq!(projection.row(3).w, 0.0);
/// ```
pub fn perspective(clip: &ClipRange, fov_x: f64, fov_y: f64) -> Result<Mat4, GeometryError> {
    clip.validate()?;
    for fov in [fov_x, fov_y] {
        if !(fov > 0.0 && fov < std::f64::consts::PI) {
            return Err(GeometryError::MalformedInput(format!(
                "field of view {fov} is outside (0, pi)"
            )));
        }
    }

    let ClipRange { znear, zfar } = *clip;

    let tan_half_fov_y = (fov_y / 2.0).tan();
    let tan_half_fov_x = (fov_x / 2.0).tan();

    let top = tan_half_fov_y * znear;
    let bottom = -top;
    let right = tan_half_fov_x * znear;
    let left = -right;

    let z_sign = 1.0;

    let rows = [
        [
            2.0 * znear / (right - left),
            0.0,
            (right + left) / (right - left),
            0.0,
        ],
        [
            0.0,
            2.0 * znear / (top - bottom),
            (top + bottom) / (top - bottom),
            0.0,
        ],
        [
            0.0,
            0.0,
            z_sign * zfar / (zfar - znear),
            -(zfar * znear) / (zfar - znear),
        ],
        [0.0, 0.0, z_sign, 0.0],
    ];

    // glam is column major, so the rows are loaded as columns and transposed
    Ok(DMat4::from_cols_array_2d(&rows).transpose().as_mat4())
}

/// Compute the projection matrix for the given projection model.
///
/// # Errors
///
/// Returns [`GeometryError::UnsupportedProjectionModel`] for models without a projection
/// matrix, and the errors of [`perspective`] otherwise.
pub fn projection_matrix(
    model: ProjectionModel,
    clip: &ClipRange,
    fov_x: f64,
    fov_y: f64,
) -> Result<Mat4, GeometryError> {
    match model {
        ProjectionModel::Perspective => perspective(clip, fov_x, fov_y),
        ProjectionModel::Fisheye => Err(GeometryError::UnsupportedProjectionModel(model)),
    }
}

/// Convert a focal length in pixels to a field of view in radians.
pub fn focal_to_fov(focal: f64, pixels: f64) -> f64 {
    2.0 * (pixels / (2.0 * focal)).atan()
}

/// Convert a field of view in radians to a focal length in pixels.
pub fn fov_to_focal(fov: f64, pixels: f64) -> f64 {
    pixels / (2.0 * (fov / 2.0).tan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_perspective_values() -> Result<(), GeometryError> {
        let projection = perspective(&ClipRange::new(0.01, 100.0), FRAC_PI_2, FRAC_PI_2)?;
        assert_relative_eq!(projection.row(0).x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(projection.row(1).y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(projection.row(2).z, 100.0 / 99.99, epsilon = 1e-6);
        assert_relative_eq!(projection.row(2).w, -1.0 / 99.99, epsilon = 1e-6);
        assert_eq!(projection.row(3).z, 1.0);
        assert_eq!(projection.row(3).w, 0.0);
        Ok(())
    }

    #[test]
    fn test_perspective_symmetric_frustum() -> Result<(), GeometryError> {
        for (fov_x, fov_y) in [(0.3, 1.1), (FRAC_PI_2, 0.8), (2.5, 0.01)] {
            let projection = perspective(&ClipRange::default(), fov_x, fov_y)?;
            assert_eq!(projection.row(0).z, 0.0);
            assert_eq!(projection.row(1).z, 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_perspective_far_plane_structure() -> Result<(), GeometryError> {
        for zfar in [0.02, 1.0, 100.0, 1e6] {
            let projection = perspective(&ClipRange::new(0.01, zfar), 1.0, 0.75)?;
            assert_eq!(projection.row(3).z, 1.0);
            assert_eq!(projection.row(3).w, 0.0);
            assert_eq!(projection.row(3).x, 0.0);
            assert_eq!(projection.row(3).y, 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_perspective_maps_planes() -> Result<(), GeometryError> {
        let clip = ClipRange::new(0.5, 20.0);
        let projection = perspective(&clip, 1.0, 1.0)?;
        let near = projection * glam::Vec4::new(0.0, 0.0, 0.5, 1.0);
        let far = projection * glam::Vec4::new(0.0, 0.0, 20.0, 1.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_perspective_invalid_range() {
        for (znear, zfar) in [(0.0, 1.0), (-1.0, 1.0), (2.0, 1.0), (1.0, 1.0), (0.1, f64::NAN)] {
            let result = perspective(&ClipRange::new(znear, zfar), 1.0, 1.0);
            assert!(matches!(result, Err(GeometryError::InvalidRange { .. })));
        }
    }

    #[test]
    fn test_perspective_invalid_fov() {
        let result = perspective(&ClipRange::default(), 0.0, 1.0);
        assert!(matches!(result, Err(GeometryError::MalformedInput(_))));
    }

    #[test]
    fn test_projection_matrix_dispatch() -> Result<(), GeometryError> {
        let clip = ClipRange::default();
        let projection = projection_matrix(ProjectionModel::Perspective, &clip, 1.0, 1.0)?;
        assert_eq!(projection, perspective(&clip, 1.0, 1.0)?);

        let result = projection_matrix(ProjectionModel::Fisheye, &clip, 1.0, 1.0);
        assert!(matches!(
            result,
            Err(GeometryError::UnsupportedProjectionModel(
                ProjectionModel::Fisheye
            ))
        ));
        Ok(())
    }

    #[test]
    fn test_focal_fov_roundtrip() {
        let fov = focal_to_fov(500.0, 640.0);
        assert_relative_eq!(fov, 2.0 * (0.64f64).atan());
        assert_relative_eq!(fov_to_focal(fov, 640.0), 500.0, epsilon = 1e-9);
        assert_relative_eq!(focal_to_fov(320.0, 640.0), FRAC_PI_2);
    }
}
