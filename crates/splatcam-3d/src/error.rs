use splatcam_image::ImageError;

use crate::projection::ProjectionModel;

/// Error types for the camera geometry.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// The pose block could not be inverted.
    #[error("Singular transform, the matrix is not invertible (determinant: {0})")]
    SingularTransform(f64),

    /// The clip range is not positive or is inverted.
    #[error("Invalid clip range: znear {znear} must be positive and smaller than zfar {zfar}")]
    InvalidRange {
        /// The near plane distance.
        znear: f64,
        /// The far plane distance.
        zfar: f64,
    },

    /// The input data does not have the expected shape or values.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The projection model has no projection matrix implementation.
    #[error("Unsupported projection model: {0:?}")]
    UnsupportedProjectionModel(ProjectionModel),

    /// Error from the image module.
    #[error(transparent)]
    Image(#[from] ImageError),
}
