use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use super::{CameraModelId, ColmapCamera, ColmapImage, ColmapPoint3d};

/// Error types for the COLMAP module.
#[derive(Debug, thiserror::Error)]
pub enum ColmapError {
    /// Error reading or writing file
    #[error("error reading or writing file. {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid number of camera parameters
    #[error("Invalid number of camera parameters for {model:?}: expected {expected}, got {actual}")]
    InvalidNumCameraParams {
        /// The camera model.
        model: CameraModelId,
        /// The number of parameters of the model.
        expected: usize,
        /// The number of parameters found.
        actual: usize,
    },

    /// Parse error
    #[error("Parse error {0}")]
    ParseError(String),
}

/// Read the cameras.txt file and return a vector of ColmapCamera structs.
///
/// # Arguments
///
/// * `path` - The path to the cameras.txt file.
///
/// # Returns
///
/// A vector of ColmapCamera structs.
pub fn read_cameras_txt(path: impl AsRef<Path>) -> Result<Vec<ColmapCamera>, ColmapError> {
    let path = path.as_ref();
    let cameras = read_cameras(BufReader::new(File::open(path)?))?;
    log::debug!("read {} cameras from {}", cameras.len(), path.display());
    Ok(cameras)
}

/// Read the points3D.txt file and return a vector of ColmapPoint3d structs.
///
/// # Arguments
///
/// * `path` - The path to the points3D.txt file.
///
/// # Returns
///
/// A vector of ColmapPoint3d structs.
pub fn read_points3d_txt(path: impl AsRef<Path>) -> Result<Vec<ColmapPoint3d>, ColmapError> {
    let path = path.as_ref();
    let points = read_points3d(BufReader::new(File::open(path)?))?;
    log::debug!("read {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Read the images.txt file and return a vector of ColmapImage structs.
///
/// # Arguments
///
/// * `path` - The path to the images.txt file.
///
/// # Returns
///
/// A vector of ColmapImage structs.
pub fn read_images_txt(path: impl AsRef<Path>) -> Result<Vec<ColmapImage>, ColmapError> {
    let path = path.as_ref();
    let images = read_images(BufReader::new(File::open(path)?))?;
    log::debug!("read {} images from {}", images.len(), path.display());
    Ok(images)
}

/// Parse the content of a cameras.txt file.
pub fn read_cameras<R: BufRead>(reader: R) -> Result<Vec<ColmapCamera>, ColmapError> {
    // skip the header comments and blank lines, parse the rest
    reader
        .lines()
        .filter(|line| !matches!(line, Ok(l) if is_comment(l) || l.trim().is_empty()))
        .map(|line| -> Result<ColmapCamera, ColmapError> {
            let line = line.map_err(ColmapError::from)?;
            parse_camera_line(&line)
        })
        .collect()
}

/// Parse the content of a points3D.txt file.
pub fn read_points3d<R: BufRead>(reader: R) -> Result<Vec<ColmapPoint3d>, ColmapError> {
    reader
        .lines()
        .filter(|line| !matches!(line, Ok(l) if is_comment(l) || l.trim().is_empty()))
        .map(|line| -> Result<ColmapPoint3d, ColmapError> {
            let line = line.map_err(ColmapError::from)?;
            parse_point3d_line(&line)
        })
        .collect()
}

/// Parse the content of an images.txt file.
///
/// NOTE: each image spans two lines and the second one is empty when the image has no
///       observations, so only comment lines are skipped here.
pub fn read_images<R: BufRead>(reader: R) -> Result<Vec<ColmapImage>, ColmapError> {
    let mut lines = reader
        .lines()
        .filter(|line| !matches!(line, Ok(l) if is_comment(l)))
        .collect::<Result<Vec<_>, _>>()?;

    // a trailing blank line after the last observation line is not an image
    if lines.len() % 2 == 1 && lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines
        .chunks(2)
        .map(|chunk| match chunk {
            [line1, line2] => parse_image_line(line1, line2),
            _ => Err(ColmapError::ParseError(
                "Invalid number of lines".to_string(),
            )),
        })
        .collect()
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Utility functions for parsing COLMAP text files
fn parse_part<T: std::str::FromStr>(s: &str) -> Result<T, ColmapError>
where
    T::Err: std::fmt::Display,
{
    s.parse::<T>()
        .map_err(|e| ColmapError::ParseError(format!("{}: {}", s, e)))
}

fn parse_array<T, const N: usize>(parts: &[&str], what: &str) -> Result<[T; N], ColmapError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parts
        .iter()
        .map(|s| parse_part(s))
        .collect::<Result<Vec<T>, _>>()?
        .try_into()
        .map_err(|_| ColmapError::ParseError(format!("Invalid number of {what}")))
}

/// Parse a camera line and return a ColmapCamera struct.
/// NOTE: The number of parameters depends on the camera model.
///       CAMERA_ID, MODEL, WIDTH, HEIGHT, PARAMS[0], PARAMS[1], ...
fn parse_camera_line(line: &str) -> Result<ColmapCamera, ColmapError> {
    // split the line into parts by whitespace
    let parts = line.split_whitespace().collect::<Vec<_>>();

    if parts.len() < 5 {
        return Err(ColmapError::ParseError(format!(
            "Invalid number of parts: {}",
            parts.len()
        )));
    }

    let model_id = parse_camera_model_id(parts[1])?;
    let params = parts[4..]
        .iter()
        .map(|s| parse_part(s))
        .collect::<Result<Vec<_>, _>>()?;

    if params.len() != model_id.num_params() {
        return Err(ColmapError::InvalidNumCameraParams {
            model: model_id,
            expected: model_id.num_params(),
            actual: params.len(),
        });
    }

    Ok(ColmapCamera {
        camera_id: parse_part(parts[0])?,
        model_id,
        width: parse_part(parts[2])?,
        height: parse_part(parts[3])?,
        params,
    })
}

fn parse_camera_model_id(model_id: &str) -> Result<CameraModelId, ColmapError> {
    match model_id {
        "SIMPLE_PINHOLE" => Ok(CameraModelId::SimplePinhole),
        "PINHOLE" => Ok(CameraModelId::Pinhole),
        "SIMPLE_RADIAL" => Ok(CameraModelId::SimpleRadial),
        "RADIAL" => Ok(CameraModelId::Radial),
        "OPENCV" => Ok(CameraModelId::OpenCV),
        "OPENCV_FISHEYE" => Ok(CameraModelId::OpenCVFisheye),
        "FULL_OPENCV" => Ok(CameraModelId::FullOpenCV),
        "FOV" => Ok(CameraModelId::FOV),
        "SIMPLE_RADIAL_FISHEYE" => Ok(CameraModelId::SimpleRadialFisheye),
        "RADIAL_FISHEYE" => Ok(CameraModelId::RadialFisheye),
        "THIN_PRISM_FISHEYE" => Ok(CameraModelId::ThinPrismFisheye),
        _ => Err(ColmapError::ParseError(format!(
            "Invalid camera model id: {}",
            model_id
        ))),
    }
}

/// Parse a point3d line and return a ColmapPoint3d struct.
///       POINT3D_ID, X, Y, Z, R, G, B, ERROR, TRACK[0], TRACK[1], ...
fn parse_point3d_line(line: &str) -> Result<ColmapPoint3d, ColmapError> {
    // split the line into parts by whitespace
    let parts = line.split_whitespace().collect::<Vec<_>>();

    // check if the number of parts is correct
    if parts.len() < 8 {
        return Err(ColmapError::ParseError(format!(
            "Invalid number of parts: {}",
            parts.len()
        )));
    }

    Ok(ColmapPoint3d {
        point3d_id: parse_part(parts[0])?,
        xyz: parse_array(&parts[1..4], "xyz coordinates")?,
        rgb: parse_array(&parts[4..7], "rgb coordinates")?,
        error: parse_part(parts[7])?,
        track: parts[8..]
            .chunks_exact(2)
            .map(|chunk| -> Result<(u32, u32), ColmapError> {
                Ok((parse_part(chunk[0])?, parse_part(chunk[1])?))
            })
            .collect::<Result<Vec<_>, _>>()?,
    })
}

/// Parse an image line and return a ColmapImage struct.
/// #   IMAGE_ID, QW, QX, QY, QZ, TX, TY, TZ, CAMERA_ID, NAME
/// #   POINTS2D[] as (X, Y, POINT3D_ID)
fn parse_image_line(line1: &str, line2: &str) -> Result<ColmapImage, ColmapError> {
    // split the line into parts by whitespace
    let parts1 = line1.split_whitespace().collect::<Vec<_>>();
    let parts2 = line2.split_whitespace().collect::<Vec<_>>();

    if parts1.len() < 10 {
        return Err(ColmapError::ParseError(format!(
            "Invalid number of parts: {}",
            parts1.len()
        )));
    }

    Ok(ColmapImage {
        image_id: parse_part(parts1[0])?,
        rotation: parse_array(&parts1[1..5], "rotation coordinates")?,
        translation: parse_array(&parts1[5..8], "translation coordinates")?,
        camera_id: parse_part(parts1[8])?,
        // image names may contain spaces
        name: parts1[9..].join(" "),
        points2d: parts2
            .chunks_exact(3)
            .map(|chunk| -> Result<(f64, f64, i64), ColmapError> {
                Ok((
                    parse_part(chunk[0])?,
                    parse_part(chunk[1])?,
                    parse_part(chunk[2])?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?,
    })
}
