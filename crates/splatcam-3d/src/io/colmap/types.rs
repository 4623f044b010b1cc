/// Represents a Colmap camera model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraModelId {
    /// Simple pinhole camera model
    SimplePinhole,
    /// Pinhole camera model
    Pinhole,
    /// Simplified radial camera model
    SimpleRadial,
    /// Radial camera model
    Radial,
    /// OpenCV camera model
    OpenCV,
    /// OpenCV fisheye camera model
    OpenCVFisheye,
    /// Full OpenCV camera model
    FullOpenCV,
    /// Field of view camera model
    FOV,
    /// Simple radial fisheye camera model
    SimpleRadialFisheye,
    /// Radial fisheye camera model
    RadialFisheye,
    /// Thin prism fisheye camera model
    ThinPrismFisheye,
}

impl CameraModelId {
    /// The number of parameters of the camera model.
    pub fn num_params(&self) -> usize {
        match self {
            CameraModelId::SimplePinhole => 3,
            CameraModelId::Pinhole => 4,
            CameraModelId::SimpleRadial => 4,
            CameraModelId::Radial => 5,
            CameraModelId::OpenCV => 8,
            CameraModelId::OpenCVFisheye => 8,
            CameraModelId::FullOpenCV => 12,
            CameraModelId::FOV => 5,
            CameraModelId::SimpleRadialFisheye => 4,
            CameraModelId::RadialFisheye => 5,
            CameraModelId::ThinPrismFisheye => 12,
        }
    }

    /// Whether the model has a single focal length shared by both axes.
    pub fn has_single_focal(&self) -> bool {
        matches!(
            self,
            CameraModelId::SimplePinhole
                | CameraModelId::SimpleRadial
                | CameraModelId::Radial
                | CameraModelId::SimpleRadialFisheye
                | CameraModelId::RadialFisheye
        )
    }

    /// Whether the model describes a fisheye lens.
    pub fn is_fisheye(&self) -> bool {
        matches!(
            self,
            CameraModelId::OpenCVFisheye
                | CameraModelId::SimpleRadialFisheye
                | CameraModelId::RadialFisheye
                | CameraModelId::ThinPrismFisheye
        )
    }
}

/// Represents a camera in the Colmap system.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapCamera {
    /// Camera id
    pub camera_id: u32,
    /// Camera model id
    pub model_id: CameraModelId,
    /// Image width
    pub width: usize,
    /// Image height
    pub height: usize,
    /// Camera parameters
    pub params: Vec<f64>,
}

impl ColmapCamera {
    // NOTE: params are validated against the model at parse time, so the indexing below
    //       stays within the pinhole block.
    fn pinhole_len(&self) -> usize {
        if self.model_id.has_single_focal() {
            3
        } else {
            4
        }
    }

    /// The focal lengths (fx, fy) in pixels.
    pub fn focal_length(&self) -> (f64, f64) {
        if self.model_id.has_single_focal() {
            (self.params[0], self.params[0])
        } else {
            (self.params[0], self.params[1])
        }
    }

    /// The principal point (cx, cy) in pixels.
    pub fn principal_point(&self) -> (f64, f64) {
        if self.model_id.has_single_focal() {
            (self.params[1], self.params[2])
        } else {
            (self.params[2], self.params[3])
        }
    }

    /// The parameters after the focal length and principal point, if any.
    pub fn distortion(&self) -> Option<Vec<f64>> {
        let extra = &self.params[self.pinhole_len()..];
        (!extra.is_empty()).then(|| extra.to_vec())
    }
}

/// Represents an image in the Colmap system.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapImage {
    /// Image name
    pub name: String,
    /// Image id
    pub image_id: u32,
    /// Camera id
    pub camera_id: u32,
    /// Rotation
    pub rotation: [f64; 4], // qw, qx, qy, qz
    /// Translation
    pub translation: [f64; 3], // x, y, z
    /// Points2d
    pub points2d: Vec<(f64, f64, i64)>,
}

impl ColmapImage {
    /// The world-to-camera rotation matrix of the image, in row-major order.
    pub fn rotation_matrix(&self) -> [[f64; 3]; 3] {
        qvec_to_rotation_matrix(&self.rotation)
    }
}

/// Represents a 3D point in the Colmap system.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapPoint3d {
    /// Point3d id
    pub point3d_id: u64,
    /// x, y, z coordinates
    pub xyz: [f64; 3],
    /// rgb color
    pub rgb: [u8; 3],
    /// Error
    pub error: f64,
    /// Track
    pub track: Vec<(u32, u32)>,
}

/// Convert a unit quaternion (qw, qx, qy, qz) to a rotation matrix in row-major order.
///
/// PRECONDITION: the quaternion is normalized.
///
/// Example:
///
/// ```
/// use splatcam_3d::io::colmap::qvec_to_rotation_matrix;
///
/// let rotation = qvec_to_rotation_matrix(&[1.0, 0.0, 0.0, 0.0]);
/// assert_eq!(rotation, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn qvec_to_rotation_matrix(qvec: &[f64; 4]) -> [[f64; 3]; 3] {
    let [w, x, y, z] = *qvec;
    [
        [
            1.0 - 2.0 * y * y - 2.0 * z * z,
            2.0 * x * y - 2.0 * w * z,
            2.0 * z * x + 2.0 * w * y,
        ],
        [
            2.0 * x * y + 2.0 * w * z,
            1.0 - 2.0 * x * x - 2.0 * z * z,
            2.0 * y * z - 2.0 * w * x,
        ],
        [
            2.0 * z * x - 2.0 * w * y,
            2.0 * y * z + 2.0 * w * x,
            1.0 - 2.0 * x * x - 2.0 * y * y,
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_qvec_to_rotation_matrix_z90() {
        let half = std::f64::consts::FRAC_PI_4;
        let rotation = qvec_to_rotation_matrix(&[half.cos(), 0.0, 0.0, half.sin()]);
        let expected = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rotation[i][j], expected[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_colmap_camera_intrinsics() {
        let camera = ColmapCamera {
            camera_id: 1,
            model_id: CameraModelId::OpenCV,
            width: 640,
            height: 480,
            params: vec![500.0, 510.0, 320.0, 240.0, 0.1, -0.01, 0.001, 0.002],
        };
        assert_eq!(camera.focal_length(), (500.0, 510.0));
        assert_eq!(camera.principal_point(), (320.0, 240.0));
        assert_eq!(camera.distortion(), Some(vec![0.1, -0.01, 0.001, 0.002]));

        let camera = ColmapCamera {
            camera_id: 2,
            model_id: CameraModelId::SimplePinhole,
            width: 640,
            height: 480,
            params: vec![500.0, 320.0, 240.0],
        };
        assert_eq!(camera.focal_length(), (500.0, 500.0));
        assert_eq!(camera.principal_point(), (320.0, 240.0));
        assert_eq!(camera.distortion(), None);
    }
}
