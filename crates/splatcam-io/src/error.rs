use splatcam_3d::{io::colmap::ColmapError, GeometryError};

/// An error type for reading image files.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] splatcam_image::ImageError),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// Invalid downscale factor.
    #[error("Invalid resolution scale: {0}")]
    InvalidResolutionScale(u32),
}

/// An error type for the dataset loaders.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// Error reading a file of the COLMAP model.
    #[error("Failed to read {path}. {source}")]
    Colmap {
        /// The model file being read.
        path: std::path::PathBuf,
        /// The reader error.
        source: ColmapError,
    },

    /// Error computing the scene geometry.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Error reading an image file.
    #[error(transparent)]
    Image(#[from] IoError),

    /// Error parsing a Blender transforms file.
    #[error("Failed to parse {path}. {source}")]
    Json {
        /// The file being parsed.
        path: std::path::PathBuf,
        /// The parse error.
        source: serde_json::Error,
    },

    /// Error reading a dataset file.
    #[error("Failed to read {path}. {source}")]
    Io {
        /// The file being read.
        path: std::path::PathBuf,
        /// The io error.
        source: std::io::Error,
    },

    /// Error building a camera, naming the offending image.
    #[error("Failed to build camera {name}. {source}")]
    Camera {
        /// The name of the image captured by the camera.
        name: String,
        /// The underlying error.
        source: Box<DatasetError>,
    },

    /// An image references a camera that is not in the model.
    #[error("Image references missing camera {0}")]
    MissingCamera(u32),

    /// The dataset type is not known.
    #[error("Unknown dataset type: {0}. Expected colmap or blender")]
    UnknownDatasetKind(String),
}

/// An error type for the scene document.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Error reading or writing the file.
    #[error("Failed to manipulate the file. {0}")]
    Io(#[from] std::io::Error),

    /// Error encoding or decoding the document.
    #[error("Failed to encode or decode the scene. {0}")]
    Json(#[from] serde_json::Error),
}
