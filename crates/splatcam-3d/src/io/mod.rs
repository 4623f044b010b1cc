/// COLMAP text model reader.
pub mod colmap;
