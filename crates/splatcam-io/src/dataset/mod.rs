mod blender;
mod colmap;

use std::{path::Path, str::FromStr};

use splatcam_3d::{
    camera::{Camera, CameraParams},
    normalization::SceneNormalization,
    pointcloud::PointCloud,
    projection::ClipRange,
};

use crate::{error::DatasetError, functional::read_image_rgb_f32};

/// The layout of a dataset on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// A COLMAP reconstruction with a `sparse/0` text model and an images folder.
    Colmap,
    /// A Blender (NeRF synthetic) scene with `transforms_{train,test}.json`.
    Blender,
}

impl FromStr for DatasetKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "colmap" => Ok(DatasetKind::Colmap),
            "blender" | "nerf_synthetic" => Ok(DatasetKind::Blender),
            _ => Err(DatasetError::UnknownDatasetKind(s.to_string())),
        }
    }
}

/// Options for loading a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Hold out test cameras for evaluation.
    pub eval: bool,
    /// Every `llffhold`-th COLMAP camera, sorted by name, goes to the test split.
    pub llffhold: usize,
    /// Folder with the COLMAP images, relative to the dataset root.
    pub images_dir: String,
    /// Integer factor to downscale the images by.
    pub resolution_scale: u32,
    /// Clipping planes given to every camera.
    pub clip: ClipRange,
    /// Re-center the cameras with the scene normalization.
    pub recenter: bool,
    /// Number of random points generated for Blender scenes.
    pub random_points: usize,
    /// Seed of the random point generator.
    pub random_seed: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            eval: true,
            llffhold: 8,
            images_dir: "images".to_string(),
            resolution_scale: 1,
            clip: ClipRange::default(),
            recenter: false,
            random_points: 100_000,
            random_seed: 0,
        }
    }
}

/// A loaded dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Cameras used for training.
    pub train_cameras: Vec<Camera>,
    /// Cameras held out for evaluation.
    pub test_cameras: Vec<Camera>,
    /// The initial point cloud of the scene.
    pub point_cloud: PointCloud,
    /// Normalization computed from the training camera centers.
    pub normalization: SceneNormalization,
}

/// Load a dataset from disk.
///
/// # Arguments
///
/// * `root` - The dataset folder.
/// * `kind` - The layout of the dataset.
/// * `config` - The loader options.
///
/// # Returns
///
/// The train and test cameras with the scene point cloud.
pub fn load_dataset(
    root: impl AsRef<Path>,
    kind: DatasetKind,
    config: &LoaderConfig,
) -> Result<Dataset, DatasetError> {
    let root = root.as_ref();
    log::info!("loading {:?} dataset from {}", kind, root.display());

    let (mut train_cameras, mut test_cameras, point_cloud) = match kind {
        DatasetKind::Colmap => colmap::load(root, config)?,
        DatasetKind::Blender => blender::load(root, config)?,
    };

    let normalization = SceneNormalization::from_cameras(&train_cameras);
    log::info!(
        "scene normalization: translate {:?}, radius {}",
        normalization.translate,
        normalization.radius
    );

    if config.recenter {
        let recentering = normalization.to_recentering();
        for camera in train_cameras.iter_mut().chain(test_cameras.iter_mut()) {
            camera.set_recentering(recentering);
            camera.update().map_err(|e| camera_error(camera.image_name(), e))?;
        }
    }

    log::info!(
        "loaded {} train cameras, {} test cameras and {} points",
        train_cameras.len(),
        test_cameras.len(),
        point_cloud.len()
    );
    if let (Some(min), Some(max)) = (point_cloud.min_bound(), point_cloud.max_bound()) {
        log::debug!("point cloud bounds: {min:?} to {max:?}");
    }

    Ok(Dataset {
        train_cameras,
        test_cameras,
        point_cloud,
        normalization,
    })
}

/// Split the cameras into train and test lists.
///
/// With `eval`, every camera whose index is a multiple of `llffhold` goes to test.
pub(crate) fn split_train_test(
    cameras: Vec<Camera>,
    eval: bool,
    llffhold: usize,
) -> (Vec<Camera>, Vec<Camera>) {
    if !eval || llffhold == 0 {
        return (cameras, Vec::new());
    }

    let (test, train): (Vec<_>, Vec<_>) = cameras
        .into_iter()
        .enumerate()
        .partition(|(idx, _)| idx % llffhold == 0);

    (
        train.into_iter().map(|(_, camera)| camera).collect(),
        test.into_iter().map(|(_, camera)| camera).collect(),
    )
}

/// Read the image of a camera and build it, naming the image in any error.
pub(crate) fn build_camera(
    image_path: &Path,
    params: impl FnOnce(splatcam_image::Image<f32, 3>) -> CameraParams,
    resolution_scale: u32,
) -> Result<Camera, DatasetError> {
    let name = image_path.display().to_string();
    let (image, alpha_mask) =
        read_image_rgb_f32(image_path, resolution_scale).map_err(|e| camera_error(&name, e))?;

    let camera = Camera::new(params(image).with_alpha_mask(alpha_mask))
        .map_err(|e| camera_error(&name, e))?;

    log::debug!(
        "camera {} ({}x{}), center {:?}",
        camera.image_name(),
        camera.image_width(),
        camera.image_height(),
        camera.camera_center()
    );

    Ok(camera)
}

fn camera_error(name: &str, source: impl Into<DatasetError>) -> DatasetError {
    DatasetError::Camera {
        name: name.to_string(),
        source: Box::new(source.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_kind_from_str() -> Result<(), DatasetError> {
        assert_eq!("colmap".parse::<DatasetKind>()?, DatasetKind::Colmap);
        assert_eq!("Blender".parse::<DatasetKind>()?, DatasetKind::Blender);
        assert_eq!("nerf_synthetic".parse::<DatasetKind>()?, DatasetKind::Blender);
        assert!(matches!(
            "llff".parse::<DatasetKind>(),
            Err(DatasetError::UnknownDatasetKind(_))
        ));
        Ok(())
    }

    #[test]
    fn loader_config_default() {
        let config = LoaderConfig::default();
        assert!(config.eval);
        assert_eq!(config.llffhold, 8);
        assert_eq!(config.images_dir, "images");
        assert_eq!(config.resolution_scale, 1);
        assert_eq!(config.clip, ClipRange::default());
        assert!(!config.recenter);
    }
}
