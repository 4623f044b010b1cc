use glam::{Mat4, Vec3};
use splatcam_image::{Image, ImageSize};

use crate::{
    error::GeometryError,
    projection::{self, ClipRange, ProjectionModel},
    transforms,
};

/// The rigid placement of a camera in the world.
///
/// `rotation` is stored transposed: the world-to-camera rotation is `rotationᵀ`, so a world
/// point maps into the camera frame as `rotationᵀ * p + translation`.
///
/// PRECONDITION: rotation is orthonormal with determinant +1. This is not validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// The 3x3 rotation matrix in row-major order.
    pub rotation: [[f64; 3]; 3],
    /// The translation vector.
    pub translation: [f64; 3],
}

impl Pose {
    /// Create a new pose from a rotation and a translation.
    pub fn new(rotation: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// The identity pose.
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0; 3],
        }
    }

    /// Create a pose from raw buffers.
    ///
    /// # Arguments
    ///
    /// * `rotation` - 9 values in row-major order.
    /// * `translation` - 3 values.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MalformedInput`] if the buffers have the wrong length or
    /// contain non-finite values.
    pub fn from_slices(rotation: &[f64], translation: &[f64]) -> Result<Self, GeometryError> {
        if rotation.len() != 9 || translation.len() != 3 {
            return Err(GeometryError::MalformedInput(format!(
                "expected a 3x3 rotation and a 3-vector translation, got {} and {} values",
                rotation.len(),
                translation.len()
            )));
        }
        if rotation.iter().chain(translation).any(|v| !v.is_finite()) {
            return Err(GeometryError::MalformedInput(
                "pose contains non-finite values".to_string(),
            ));
        }

        let mut pose = Self::identity();
        for (row, chunk) in pose.rotation.iter_mut().zip(rotation.chunks_exact(3)) {
            row.copy_from_slice(chunk);
        }
        pose.translation.copy_from_slice(translation);

        Ok(pose)
    }
}

/// The intrinsic parameters of a camera.
///
/// The principal point is stored but does not yet shift the projection matrix, which
/// assumes a centered, symmetric frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    /// Horizontal field of view in radians.
    pub fov_x: f64,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    /// Principal point x in pixels.
    pub cx: f64,
    /// Principal point y in pixels.
    pub cy: f64,
}

/// A translate and uniform scale applied to the camera center in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recentering {
    /// Offset added to the camera center.
    pub translate: [f64; 3],
    /// Scale applied after the offset.
    pub scale: f64,
}

impl Default for Recentering {
    fn default() -> Self {
        Self {
            translate: [0.0; 3],
            scale: 1.0,
        }
    }
}

/// Per-capture metadata, passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureMetadata {
    /// Exposure time.
    pub exposure: f64,
    /// ISO sensitivity.
    pub iso: u32,
    /// Aperture.
    pub aperture: f64,
}

impl Default for CaptureMetadata {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            iso: 100,
            aperture: 1.0,
        }
    }
}

/// Identity of a camera within a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraId {
    /// Id of the camera in the reconstruction.
    pub colmap_id: u32,
    /// Unique index in the loaded camera list.
    pub uid: usize,
    /// Name of the image captured by the camera.
    pub image_name: String,
}

/// Parameters to construct a [`Camera`].
///
/// Optional fields default to: no alpha mask, [`ClipRange::default`],
/// [`Recentering::default`], [`ProjectionModel::Perspective`], no distortion and
/// [`CaptureMetadata::default`].
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Identity of the camera.
    pub id: CameraId,
    /// Pose of the camera.
    pub pose: Pose,
    /// Intrinsic parameters.
    pub intrinsics: Intrinsics,
    /// The RGB image in (H, W, C) order.
    pub image: Image<f32, 3>,
    /// Optional opacity mask with the size of the image.
    pub alpha_mask: Option<Image<f32, 1>>,
    /// Clipping planes.
    pub clip: ClipRange,
    /// Re-centering applied to the camera center.
    pub recentering: Recentering,
    /// Projection model.
    pub model: ProjectionModel,
    /// Opaque lens distortion parameters.
    pub distortion: Option<Vec<f64>>,
    /// Capture metadata.
    pub metadata: CaptureMetadata,
}

impl CameraParams {
    /// Create the parameters with the required fields and defaults for the rest.
    pub fn new(id: CameraId, pose: Pose, intrinsics: Intrinsics, image: Image<f32, 3>) -> Self {
        Self {
            id,
            pose,
            intrinsics,
            image,
            alpha_mask: None,
            clip: ClipRange::default(),
            recentering: Recentering::default(),
            model: ProjectionModel::default(),
            distortion: None,
            metadata: CaptureMetadata::default(),
        }
    }

    /// Set the opacity mask.
    pub fn with_alpha_mask(mut self, alpha_mask: Option<Image<f32, 1>>) -> Self {
        self.alpha_mask = alpha_mask;
        self
    }

    /// Set the clipping planes.
    pub fn with_clip_range(mut self, clip: ClipRange) -> Self {
        self.clip = clip;
        self
    }

    /// Set the re-centering transform.
    pub fn with_recentering(mut self, recentering: Recentering) -> Self {
        self.recentering = recentering;
        self
    }

    /// Set the projection model.
    pub fn with_model(mut self, model: ProjectionModel) -> Self {
        self.model = model;
        self
    }

    /// Set the distortion parameters.
    pub fn with_distortion(mut self, distortion: Option<Vec<f64>>) -> Self {
        self.distortion = distortion;
        self
    }

    /// Set the capture metadata.
    pub fn with_metadata(mut self, metadata: CaptureMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A calibrated camera with its image and cached transforms.
///
/// The world-to-view transform, projection matrix and camera center are computed at
/// construction and only recomputed by [`Camera::update`]. Setters change the inputs
/// without touching the cached values.
#[derive(Debug, Clone)]
pub struct Camera {
    id: CameraId,
    pose: Pose,
    intrinsics: Intrinsics,
    clip: ClipRange,
    original_image: Image<f32, 3>,
    alpha_mask: Image<f32, 1>,
    recentering: Recentering,
    model: ProjectionModel,
    distortion: Option<Vec<f64>>,
    metadata: CaptureMetadata,
    world_view_transform: Mat4,
    projection_matrix: Mat4,
    camera_center: Vec3,
}

impl Camera {
    /// Create a new camera.
    ///
    /// The image is clamped into `[0, 1]` and multiplied by the opacity mask. Without a mask
    /// an all-ones mask of the image size is used, so every camera has a defined mask.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MalformedInput`] if the mask size differs from the image
    /// size or the mask has values outside `[0, 1]`, and the errors of [`Camera::update`].
    ///
    /// Example:
    ///
    /// ```
    /// use splatcam_3d::camera::{Camera, CameraId, CameraParams, Intrinsics, Pose};
    /// use splatcam_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 3>::from_size_val(ImageSize { width: 4, height: 2 }, 0.5).unwrap();
    /// let id = CameraId { colmap_id: 1, uid: 0, image_name: "frame_0001".to_string() };
    /// let intrinsics = Intrinsics { fov_x: 1.0, fov_y: 0.6, cx: 2.0, cy: 1.0 };
    /// let pose = Pose::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], [0.0, 0.0, 5.0]);
    ///
    /// let camera = Camera::new(CameraParams::new(id, pose, intrinsics, image)).unwrap();
    /// assert!((camera.camera_center().z + 5.0).abs() < 1e-6);
    /// ```
    pub fn new(params: CameraParams) -> Result<Self, GeometryError> {
        let CameraParams {
            id,
            pose,
            intrinsics,
            image,
            alpha_mask,
            clip,
            recentering,
            model,
            distortion,
            metadata,
        } = params;

        let mut original_image = image;
        original_image.clamp(0.0, 1.0);

        let alpha_mask = match alpha_mask {
            Some(mask) => mask,
            None => Self::default_mask(original_image.size())?,
        };

        if !alpha_mask.as_slice().iter().all(|v| (0.0..=1.0).contains(v)) {
            return Err(GeometryError::MalformedInput(format!(
                "alpha mask of {} has values outside [0, 1]",
                id.image_name
            )));
        }

        original_image.mul_mask(&alpha_mask).map_err(|e| {
            GeometryError::MalformedInput(format!("alpha mask of {}: {e}", id.image_name))
        })?;

        let mut camera = Self {
            id,
            pose,
            intrinsics,
            clip,
            original_image,
            alpha_mask,
            recentering,
            model,
            distortion,
            metadata,
            world_view_transform: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            camera_center: Vec3::ZERO,
        };
        camera.update()?;

        Ok(camera)
    }

    /// The full opacity mask used when no mask is provided.
    pub fn default_mask(size: ImageSize) -> Result<Image<f32, 1>, GeometryError> {
        Ok(Image::from_size_val(size, 1.0)?)
    }

    /// Recompute the world-to-view transform, the projection matrix and the camera center
    /// from the current pose, re-centering, clip range and field of view.
    ///
    /// The cached values are only replaced if every computation succeeds.
    pub fn update(&mut self) -> Result<(), GeometryError> {
        let world_view_transform = transforms::world_to_view(
            &self.pose.rotation,
            &self.pose.translation,
            &self.recentering.translate,
            self.recentering.scale,
        )?;
        let projection_matrix = projection::projection_matrix(
            self.model,
            &self.clip,
            self.intrinsics.fov_x,
            self.intrinsics.fov_y,
        )?;
        let camera_center = transforms::camera_center(&world_view_transform)?;

        self.world_view_transform = world_view_transform;
        self.projection_matrix = projection_matrix;
        self.camera_center = camera_center;

        Ok(())
    }

    /// Identity of the camera.
    pub fn id(&self) -> &CameraId {
        &self.id
    }

    /// Name of the image captured by the camera.
    pub fn image_name(&self) -> &str {
        &self.id.image_name
    }

    /// Pose of the camera.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Intrinsic parameters.
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// Clipping planes.
    pub fn clip_range(&self) -> &ClipRange {
        &self.clip
    }

    /// The clamped and masked image.
    pub fn original_image(&self) -> &Image<f32, 3> {
        &self.original_image
    }

    /// The opacity mask.
    pub fn alpha_mask(&self) -> &Image<f32, 1> {
        &self.alpha_mask
    }

    /// Width of the image in pixels.
    pub fn image_width(&self) -> usize {
        self.original_image.width()
    }

    /// Height of the image in pixels.
    pub fn image_height(&self) -> usize {
        self.original_image.height()
    }

    /// Re-centering transform.
    pub fn recentering(&self) -> &Recentering {
        &self.recentering
    }

    /// Projection model.
    pub fn model(&self) -> ProjectionModel {
        self.model
    }

    /// Opaque distortion parameters.
    pub fn distortion(&self) -> Option<&[f64]> {
        self.distortion.as_deref()
    }

    /// Capture metadata.
    pub fn metadata(&self) -> &CaptureMetadata {
        &self.metadata
    }

    /// The cached world-to-view transform.
    pub fn world_view_transform(&self) -> &Mat4 {
        &self.world_view_transform
    }

    /// The cached projection matrix.
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// The cached camera center in world coordinates.
    pub fn camera_center(&self) -> Vec3 {
        self.camera_center
    }

    /// Replace the pose. Call [`Camera::update`] to refresh the cached transforms.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Replace the re-centering. Call [`Camera::update`] to refresh the cached transforms.
    pub fn set_recentering(&mut self, recentering: Recentering) {
        self.recentering = recentering;
    }

    /// Replace the clip range. Call [`Camera::update`] to refresh the cached transforms.
    pub fn set_clip_range(&mut self, clip: ClipRange) {
        self.clip = clip;
    }
}
