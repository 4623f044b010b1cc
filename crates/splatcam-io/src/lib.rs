#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Dataset loaders for COLMAP and Blender scenes.
pub mod dataset;

/// Error types for the io module.
pub mod error;

/// Image file decoding.
pub mod functional;

/// The serialized scene document.
pub mod scene;

pub use crate::error::{DatasetError, IoError, SceneError};
