#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use splatcam_image as image;

#[doc(inline)]
pub use splatcam_3d as k3d;

#[doc(inline)]
pub use splatcam_io as io;
