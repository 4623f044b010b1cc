#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Camera entity with cached view and projection transforms.
pub mod camera;

/// Error types for the geometry module.
pub mod error;

/// I/O utilities for reading reconstruction data.
pub mod io;

/// Scene normalization from camera centers.
pub mod normalization;

/// Point cloud container.
pub mod pointcloud;

/// Projection matrices and field of view helpers.
pub mod projection;

/// World-to-view transforms.
pub mod transforms;

pub use crate::error::GeometryError;
