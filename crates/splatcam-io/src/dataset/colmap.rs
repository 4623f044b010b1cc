use std::{collections::HashMap, path::Path};

use splatcam_3d::{
    camera::{Camera, CameraId, CameraParams, Intrinsics, Pose},
    io::colmap::{self, ColmapCamera, ColmapError, ColmapImage},
    pointcloud::PointCloud,
    projection::{focal_to_fov, ProjectionModel},
};

use super::{build_camera, camera_error, split_train_test, LoaderConfig};
use crate::error::DatasetError;

pub(super) fn load(
    root: &Path,
    config: &LoaderConfig,
) -> Result<(Vec<Camera>, Vec<Camera>, PointCloud), DatasetError> {
    let sparse_dir = root.join("sparse").join("0");

    let cameras = read_model(&sparse_dir, "cameras.txt", |p| colmap::read_cameras_txt(p))?
        .into_iter()
        .map(|camera| (camera.camera_id, camera))
        .collect::<HashMap<_, _>>();

    let mut images = read_model(&sparse_dir, "images.txt", |p| colmap::read_images_txt(p))?;
    images.sort_by(|a, b| a.name.cmp(&b.name));

    let points3d = read_model(&sparse_dir, "points3D.txt", |p| colmap::read_points3d_txt(p))?;
    log::info!(
        "read {} cameras, {} images and {} points from {}",
        cameras.len(),
        images.len(),
        points3d.len(),
        sparse_dir.display()
    );

    let images_dir = root.join(&config.images_dir);

    let all_cameras = images
        .iter()
        .enumerate()
        .map(|(uid, image)| {
            let camera = cameras.get(&image.camera_id).ok_or_else(|| {
                camera_error(&image.name, DatasetError::MissingCamera(image.camera_id))
            })?;
            load_camera(&images_dir, uid, image, camera, config)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (train_cameras, test_cameras) =
        split_train_test(all_cameras, config.eval, config.llffhold);

    let num_points = points3d.len();
    let point_cloud = PointCloud::new(
        points3d.iter().map(|p| p.xyz).collect(),
        points3d.iter().map(|p| p.rgb).collect(),
        vec![[0.0; 3]; num_points],
    )?;

    Ok((train_cameras, test_cameras, point_cloud))
}

/// Read a file of the model, naming it in any error.
fn read_model<T>(
    sparse_dir: &Path,
    file_name: &str,
    read: impl FnOnce(&Path) -> Result<T, ColmapError>,
) -> Result<T, DatasetError> {
    let path = sparse_dir.join(file_name);
    read(&path).map_err(|source| DatasetError::Colmap { path, source })
}

fn load_camera(
    images_dir: &Path,
    uid: usize,
    image: &ColmapImage,
    camera: &ColmapCamera,
    config: &LoaderConfig,
) -> Result<Camera, DatasetError> {
    let (fx, fy) = camera.focal_length();
    let (cx, cy) = camera.principal_point();
    let scale = config.resolution_scale.max(1) as f64;

    let intrinsics = Intrinsics {
        fov_x: focal_to_fov(fx, camera.width as f64),
        fov_y: focal_to_fov(fy, camera.height as f64),
        cx: cx / scale,
        cy: cy / scale,
    };

    // the world-to-camera rotation is stored transposed
    let w2c_rotation = image.rotation_matrix();
    let rotation = (0..9)
        .map(|k| w2c_rotation[k % 3][k / 3])
        .collect::<Vec<_>>();
    let pose = Pose::from_slices(&rotation, &image.translation)
        .map_err(|e| camera_error(&image.name, e))?;

    let model = if camera.model_id.is_fisheye() {
        log::warn!(
            "image {} uses the fisheye model {:?}",
            image.name,
            camera.model_id
        );
        ProjectionModel::Fisheye
    } else {
        ProjectionModel::Perspective
    };

    let id = CameraId {
        colmap_id: camera.camera_id,
        uid,
        image_name: image_stem(&image.name),
    };

    build_camera(
        &images_dir.join(&image.name),
        |rgb| {
            CameraParams::new(id, pose, intrinsics, rgb)
                .with_clip_range(config.clip)
                .with_model(model)
                .with_distortion(camera.distortion())
        },
        config.resolution_scale,
    )
}

fn image_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}
