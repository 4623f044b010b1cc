use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use splatcam_3d::{camera::Camera, pointcloud::PointCloud};

use crate::{dataset::Dataset, error::SceneError};

/// The serialized form of a camera.
///
/// `view` and `projection` hold the transpose of the in-memory matrices, i.e. each inner
/// array is a column of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Name of the image captured by the camera.
    pub image_name: String,
    /// The transposed world-to-view transform.
    pub view: [[f32; 4]; 4],
    /// The transposed projection matrix.
    pub projection: [[f32; 4]; 4],
}

impl From<&Camera> for CameraRecord {
    fn from(camera: &Camera) -> Self {
        Self {
            image_name: camera.image_name().to_string(),
            view: camera.world_view_transform().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
        }
    }
}

/// The scene document consumed by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Cameras used for training.
    pub train_cameras: Vec<CameraRecord>,
    /// Cameras held out for evaluation.
    pub test_cameras: Vec<CameraRecord>,
    /// Point positions.
    pub points: Vec<[f32; 3]>,
    /// Point colors in `[0, 1]`.
    pub colors: Vec<[f32; 3]>,
    /// Point normals.
    pub normals: Vec<[f32; 3]>,
}

impl SceneDocument {
    /// Build the document from cameras and a point cloud.
    pub fn from_scene(
        train_cameras: &[Camera],
        test_cameras: &[Camera],
        point_cloud: &PointCloud,
    ) -> Self {
        let narrow = |v: &[f64; 3]| v.map(|x| x as f32);

        Self {
            train_cameras: train_cameras.iter().map(CameraRecord::from).collect(),
            test_cameras: test_cameras.iter().map(CameraRecord::from).collect(),
            points: point_cloud.points().iter().map(narrow).collect(),
            colors: point_cloud.colors_normalized(),
            normals: point_cloud.normals().iter().map(narrow).collect(),
        }
    }

    /// Build the document from a loaded dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::from_scene(
            &dataset.train_cameras,
            &dataset.test_cameras,
            &dataset.point_cloud,
        )
    }
}

/// Writes the scene document as JSON to the given file path.
///
/// # Arguments
///
/// * `file_path` - The path to the output file.
/// * `scene` - The scene document.
pub fn write_scene_json(file_path: impl AsRef<Path>, scene: &SceneDocument) -> Result<(), SceneError> {
    let file_path = file_path.as_ref();
    let mut writer = BufWriter::new(File::create(file_path)?);
    serde_json::to_writer(&mut writer, scene)?;
    writer.flush()?;

    log::info!(
        "wrote {} train cameras, {} test cameras and {} points to {}",
        scene.train_cameras.len(),
        scene.test_cameras.len(),
        scene.points.len(),
        file_path.display()
    );

    Ok(())
}

/// Reads a scene document from a JSON file.
///
/// # Arguments
///
/// * `file_path` - The path to the JSON file.
///
/// # Returns
///
/// The scene document.
pub fn read_scene_json(file_path: impl AsRef<Path>) -> Result<SceneDocument, SceneError> {
    let reader = BufReader::new(File::open(file_path)?);
    Ok(serde_json::from_reader(reader)?)
}
