use glam::{DMat4, DVec3, DVec4, Mat4, Vec3};

use crate::error::GeometryError;

/// Determinant magnitude below which a transform is treated as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// Invert a 4x4 matrix, failing if it is singular.
///
/// # Errors
///
/// Returns [`GeometryError::SingularTransform`] if the determinant is not finite or is
/// numerically zero.
pub fn try_inverse(matrix: &DMat4) -> Result<DMat4, GeometryError> {
    let det = matrix.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPS {
        return Err(GeometryError::SingularTransform(det));
    }
    Ok(matrix.inverse())
}

/// Compute the world-to-view transform of a camera.
///
/// The rotation and translation follow the convention of the pose data: the block
/// `[Rᵀ | t]` maps world points into the camera frame. The optional re-centering is applied
/// to the camera center in world space, `center' = (center + translate) * scale`, and the
/// result is inverted back into a world-to-view matrix.
///
/// # Arguments
///
/// * `rotation` - The 3x3 rotation matrix in row-major order.
/// * `translation` - The translation vector.
/// * `translate` - The re-centering offset added to the camera center.
/// * `scale` - The uniform re-centering scale applied to the camera center.
///
/// # Returns
///
/// The world-to-view matrix, computed in double precision and narrowed to single precision.
///
/// PRECONDITION: rotation is orthonormal.
///
/// # Errors
///
/// Returns [`GeometryError::SingularTransform`] if the pose block cannot be inverted.
///
/// Example:
///
/// ```
/// use splatcam_3d::transforms::world_to_view;
///
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let view = world_to_view(&rotation, &[0.0, 0.0, 5.0], &[0.0; 3], 1.0).unwrap();
/// assert_eq!(view.row(2).w, 5.0);
/// ```
pub fn world_to_view(
    rotation: &[[f64; 3]; 3],
    translation: &[f64; 3],
    translate: &[f64; 3],
    scale: f64,
) -> Result<Mat4, GeometryError> {
    // the j-th column of Rᵀ is the j-th row of R
    let rt = DMat4::from_cols(
        DVec4::new(rotation[0][0], rotation[0][1], rotation[0][2], 0.0),
        DVec4::new(rotation[1][0], rotation[1][1], rotation[1][2], 0.0),
        DVec4::new(rotation[2][0], rotation[2][1], rotation[2][2], 0.0),
        DVec4::new(translation[0], translation[1], translation[2], 1.0),
    );

    // move the camera center in world space
    let mut cam_to_world = try_inverse(&rt)?;
    let center = cam_to_world.w_axis.truncate();
    let center = (center + DVec3::from_array(*translate)) * scale;
    cam_to_world.w_axis = center.extend(1.0);

    let world_to_view = try_inverse(&cam_to_world)?;

    Ok(world_to_view.as_mat4())
}

/// Extract the camera center in world coordinates from a world-to-view transform.
///
/// The center is the translation part of the inverse transform.
///
/// # Errors
///
/// Returns [`GeometryError::SingularTransform`] if the transform cannot be inverted.
pub fn camera_center(world_view_transform: &Mat4) -> Result<Vec3, GeometryError> {
    let view_to_world = try_inverse(&world_view_transform.as_dmat4())?;
    Ok(view_to_world.w_axis.truncate().as_vec3())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const IDENTITY: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    fn rotation_x(angle: f64) -> [[f64; 3]; 3] {
        let (s, c) = angle.sin_cos();
        [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
    }

    #[test]
    fn test_world_to_view_identity() -> Result<(), GeometryError> {
        let view = world_to_view(&IDENTITY, &[0.0; 3], &[0.0; 3], 1.0)?;
        assert_eq!(view, Mat4::IDENTITY);
        Ok(())
    }

    #[test]
    fn test_world_to_view_bottom_row() -> Result<(), GeometryError> {
        let view = world_to_view(&rotation_x(0.3), &[1.0, -2.0, 3.0], &[0.0; 3], 1.0)?;
        let bottom = view.row(3);
        assert_eq!(bottom.x, 0.0);
        assert_eq!(bottom.y, 0.0);
        assert_eq!(bottom.z, 0.0);
        assert_eq!(bottom.w, 1.0);
        Ok(())
    }

    #[test]
    fn test_world_to_view_roundtrip() -> Result<(), GeometryError> {
        let view = world_to_view(&rotation_x(1.2), &[0.5, 4.0, -3.0], &[0.0; 3], 1.0)?;
        let product = view * view.inverse();
        for (a, b) in product
            .to_cols_array()
            .iter()
            .zip(Mat4::IDENTITY.to_cols_array().iter())
        {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_world_to_view_block() -> Result<(), GeometryError> {
        // the rotation block is the transpose of the stored rotation
        let rotation = rotation_x(0.7);
        let view = world_to_view(&rotation, &[1.0, 2.0, 3.0], &[0.0; 3], 1.0)?;
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(view.row(i)[j], rotation[j][i] as f32, epsilon = 1e-6);
            }
        }
        assert_relative_eq!(view.row(0).w, 1.0, epsilon = 1e-6);
        assert_relative_eq!(view.row(1).w, 2.0, epsilon = 1e-6);
        assert_relative_eq!(view.row(2).w, 3.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_world_to_view_recentering() -> Result<(), GeometryError> {
        // camera center at (0, 0, -5), shifted by (1, 0, 5) and scaled by 2 is (2, 0, 0)
        let view = world_to_view(&IDENTITY, &[0.0, 0.0, 5.0], &[1.0, 0.0, 5.0], 2.0)?;
        let center = camera_center(&view)?;
        assert_relative_eq!(center.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.z, 0.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_world_to_view_recentering_keeps_rotation() -> Result<(), GeometryError> {
        let rotation = rotation_x(0.4);
        let plain = world_to_view(&rotation, &[1.0, 2.0, 3.0], &[0.0; 3], 1.0)?;
        let moved = world_to_view(&rotation, &[1.0, 2.0, 3.0], &[3.0, -1.0, 0.5], 0.5)?;
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(plain.row(i)[j], moved.row(i)[j], epsilon = 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn test_camera_center() -> Result<(), GeometryError> {
        let view = world_to_view(&IDENTITY, &[0.0, 0.0, 5.0], &[0.0; 3], 1.0)?;
        let center = camera_center(&view)?;
        assert_relative_eq!(center.x, 0.0);
        assert_relative_eq!(center.y, 0.0);
        assert_relative_eq!(center.z, -5.0);
        Ok(())
    }

    #[test]
    fn test_world_to_view_singular() {
        let rotation = [[0.0; 3]; 3];
        let result = world_to_view(&rotation, &[0.0; 3], &[0.0; 3], 1.0);
        assert!(matches!(result, Err(GeometryError::SingularTransform(_))));
    }

    #[test]
    fn test_try_inverse_non_finite() {
        let matrix = DMat4::from_diagonal(DVec4::new(1.0, f64::NAN, 1.0, 1.0));
        assert!(matches!(
            try_inverse(&matrix),
            Err(GeometryError::SingularTransform(_))
        ));
    }
}
