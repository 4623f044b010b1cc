use std::path::{Path, PathBuf};

use glam::DMat4;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use splatcam_3d::{
    camera::{Camera, CameraId, CameraParams, Intrinsics, Pose},
    pointcloud::PointCloud,
    projection::{focal_to_fov, fov_to_focal},
    transforms::try_inverse,
    GeometryError,
};

use super::{build_camera, camera_error, LoaderConfig};
use crate::error::DatasetError;

/// Half extent of the cube the random points are drawn from.
const RANDOM_POINTS_EXTENT: f64 = 1.3;

#[derive(Debug, Deserialize)]
struct TransformsFile {
    camera_angle_x: f64,
    frames: Vec<Frame>,
}

#[derive(Debug, Deserialize)]
struct Frame {
    file_path: String,
    transform_matrix: [[f64; 4]; 4],
}

pub(super) fn load(
    root: &Path,
    config: &LoaderConfig,
) -> Result<(Vec<Camera>, Vec<Camera>, PointCloud), DatasetError> {
    let mut train_cameras = read_transforms(root, "transforms_train.json", 0, config)?;
    let mut test_cameras =
        read_transforms(root, "transforms_test.json", train_cameras.len(), config)?;

    if !config.eval {
        train_cameras.append(&mut test_cameras);
    }

    let point_cloud = random_point_cloud(config.random_points, config.random_seed)?;
    log::info!(
        "generated {} random points in [-{RANDOM_POINTS_EXTENT}, {RANDOM_POINTS_EXTENT}]^3",
        point_cloud.len()
    );

    Ok((train_cameras, test_cameras, point_cloud))
}

fn read_transforms(
    root: &Path,
    file_name: &str,
    first_uid: usize,
    config: &LoaderConfig,
) -> Result<Vec<Camera>, DatasetError> {
    let path = root.join(file_name);
    let content = std::fs::read_to_string(&path).map_err(|source| DatasetError::Io {
        path: path.clone(),
        source,
    })?;
    let transforms: TransformsFile =
        serde_json::from_str(&content).map_err(|source| DatasetError::Json {
            path: path.clone(),
            source,
        })?;

    log::info!(
        "read {} frames from {}",
        transforms.frames.len(),
        path.display()
    );

    transforms
        .frames
        .iter()
        .enumerate()
        .map(|(idx, frame)| {
            load_camera(
                root,
                first_uid + idx,
                frame,
                transforms.camera_angle_x,
                config,
            )
        })
        .collect()
}

fn load_camera(
    root: &Path,
    uid: usize,
    frame: &Frame,
    fov_x: f64,
    config: &LoaderConfig,
) -> Result<Camera, DatasetError> {
    let image_path = frame_image_path(root, &frame.file_path);

    // the file holds rows, glam loads columns
    let mut c2w = DMat4::from_cols_array_2d(&frame.transform_matrix).transpose();

    // OpenGL/Blender camera axes (Y up, Z back) to COLMAP (Y down, Z forward)
    c2w.y_axis = -c2w.y_axis;
    c2w.z_axis = -c2w.z_axis;

    let w2c = try_inverse(&c2w).map_err(|e| camera_error(&frame.file_path, e))?;

    // the world-to-camera rotation is stored transposed
    let rotation = [
        w2c.x_axis.truncate().to_array(),
        w2c.y_axis.truncate().to_array(),
        w2c.z_axis.truncate().to_array(),
    ];
    let pose = Pose::from_slices(&rotation.concat(), &w2c.w_axis.truncate().to_array())
        .map_err(|e| camera_error(&frame.file_path, e))?;

    let image_name = image_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| frame.file_path.clone());

    let id = CameraId {
        colmap_id: frame_id(uid).map_err(|e| camera_error(&frame.file_path, e))?,
        uid,
        image_name,
    };

    build_camera(
        &image_path,
        |rgb| {
            let (width, height) = (rgb.width() as f64, rgb.height() as f64);
            let intrinsics = Intrinsics {
                fov_x,
                fov_y: focal_to_fov(fov_to_focal(fov_x, width), height),
                cx: width / 2.0,
                cy: height / 2.0,
            };
            CameraParams::new(id, pose, intrinsics, rgb).with_clip_range(config.clip)
        },
        config.resolution_scale,
    )
}

/// Blender frames have no reconstruction id, the frame index stands in for it.
fn frame_id(uid: usize) -> Result<u32, GeometryError> {
    u32::try_from(uid).map_err(|_| {
        GeometryError::MalformedInput(format!("frame index {uid} does not fit in u32"))
    })
}

/// Resolve the image of a frame. Frames usually omit the `.png` extension.
fn frame_image_path(root: &Path, file_path: &str) -> PathBuf {
    let path = root.join(file_path);
    match path.extension() {
        Some(_) => path,
        None => path.with_extension("png"),
    }
}

/// Uniform random points in a cube around the origin with random colors.
pub(crate) fn random_point_cloud(num_points: usize, seed: u64) -> Result<PointCloud, DatasetError> {
    let mut rng = StdRng::seed_from_u64(seed);

    let points = (0..num_points)
        .map(|_| {
            std::array::from_fn(|_| {
                rng.random_range(-RANDOM_POINTS_EXTENT..RANDOM_POINTS_EXTENT)
            })
        })
        .collect::<Vec<[f64; 3]>>();
    let colors = (0..num_points)
        .map(|_| rng.random())
        .collect::<Vec<[u8; 3]>>();

    Ok(PointCloud::new(points, colors, vec![[0.0; 3]; num_points])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_points_in_cube() -> Result<(), DatasetError> {
        let point_cloud = random_point_cloud(500, 7)?;
        assert_eq!(point_cloud.len(), 500);
        assert!(point_cloud
            .points()
            .iter()
            .flatten()
            .all(|v| v.abs() <= RANDOM_POINTS_EXTENT));
        assert!(point_cloud.normals().iter().all(|n| *n == [0.0; 3]));

        // same seed, same cloud
        assert_eq!(random_point_cloud(500, 7)?, point_cloud);
        Ok(())
    }

    #[test]
    fn frame_id_range() -> Result<(), GeometryError> {
        assert_eq!(frame_id(3)?, 3);
        assert_eq!(frame_id(u32::MAX as usize)?, u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            frame_id(u32::MAX as usize + 1),
            Err(GeometryError::MalformedInput(_))
        ));
        Ok(())
    }

    #[test]
    fn frame_path_extension() {
        let root = Path::new("scene");
        assert_eq!(
            frame_image_path(root, "./train/r_0"),
            Path::new("scene/./train/r_0.png")
        );
        assert_eq!(
            frame_image_path(root, "./train/r_1.jpg"),
            Path::new("scene/./train/r_1.jpg")
        );
    }
}
