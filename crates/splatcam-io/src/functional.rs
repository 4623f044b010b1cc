use std::path::Path;

use image::{imageops, ImageBuffer, Pixel};
use splatcam_image::{Image, ImageSize};

use crate::error::IoError;

/// An RGB image in `[0, 1]` with its optional opacity mask.
pub type ImageWithMask = (Image<f32, 3>, Option<Image<f32, 1>>);

/// Reads an image as RGB floats in `[0, 1]`.
///
/// The method reads any format supported by the image crate. If the file carries an alpha
/// channel, it is returned as the opacity mask.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
/// * `resolution_scale` - Integer factor to downscale the image by. 1 keeps the original size.
///
/// # Returns
///
/// The RGB image and the opacity mask, if any.
pub fn read_image_rgb_f32(
    file_path: impl AsRef<Path>,
    resolution_scale: u32,
) -> Result<ImageWithMask, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    if resolution_scale == 0 {
        return Err(IoError::InvalidResolutionScale(resolution_scale));
    }

    let img = image::open(file_path)?;

    let (rgb, alpha) = if img.color().has_alpha() {
        let rgba = downscale(img.to_rgba8(), resolution_scale);
        let size = ImageSize {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
        };
        let (rgb, alpha) = Image::<u8, 4>::new(size, rgba.into_raw())?.split_alpha();
        (rgb, Some(alpha))
    } else {
        let rgb = downscale(img.to_rgb8(), resolution_scale);
        let size = ImageSize {
            width: rgb.width() as usize,
            height: rgb.height() as usize,
        };
        (Image::<u8, 3>::new(size, rgb.into_raw())?, None)
    };

    log::debug!(
        "decoded {} as {} (alpha: {})",
        file_path.display(),
        rgb.size(),
        alpha.is_some()
    );

    let rgb = rgb.cast_and_scale::<f32>(1.0 / 255.0)?;
    let alpha = alpha
        .map(|a| a.cast_and_scale::<f32>(1.0 / 255.0))
        .transpose()?;

    Ok((rgb, alpha))
}

fn downscale<P>(buffer: ImageBuffer<P, Vec<u8>>, scale: u32) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    if scale == 1 {
        return buffer;
    }

    let new_width = (buffer.width() as f64 / scale as f64).round().max(1.0) as u32;
    let new_height = (buffer.height() as f64 / scale as f64).round().max(1.0) as u32;

    imageops::resize(&buffer, new_width, new_height, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn read_rgb_png() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgb.png");
        image::RgbImage::from_pixel(4, 2, image::Rgb([255, 0, 51])).save(&file_path)?;

        let (rgb, alpha) = read_image_rgb_f32(&file_path, 1)?;
        assert_eq!(rgb.width(), 4);
        assert_eq!(rgb.height(), 2);
        assert!(alpha.is_none());
        assert_eq!(rgb.get_pixel(1, 1, 0), Some(&1.0));
        assert_eq!(rgb.get_pixel(1, 1, 1), Some(&0.0));
        assert_relative_eq!(*rgb.get_pixel(1, 1, 2).ok_or("missing pixel")?, 0.2);
        Ok(())
    }

    #[test]
    fn read_rgba_png_with_scale() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgba.png");
        image::RgbaImage::from_pixel(8, 4, image::Rgba([255, 255, 255, 0])).save(&file_path)?;

        let (rgb, alpha) = read_image_rgb_f32(&file_path, 2)?;
        let alpha = alpha.ok_or("missing alpha")?;
        assert_eq!(rgb.width(), 4);
        assert_eq!(rgb.height(), 2);
        assert_eq!(alpha.size(), rgb.size());
        assert!(alpha.as_slice().iter().all(|&v| v == 0.0));
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let result = read_image_rgb_f32("does/not/exist.png", 1);
        assert!(matches!(result, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_zero_scale() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgb.png");
        image::RgbImage::new(2, 2).save(&file_path)?;
        let result = read_image_rgb_f32(&file_path, 0);
        assert!(matches!(result, Err(IoError::InvalidResolutionScale(0))));
        Ok(())
    }
}
