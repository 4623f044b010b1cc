use std::ops::Mul;

use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use splatcam_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored contiguously in (H, W, C) order, where H is the height of the image,
/// W the width and C the number of channels given by the const parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image in (H, W, C) order.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splatcam_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        let expected = size.width * size.height * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and a constant pixel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use splatcam_image::{Image, ImageSize};
    ///
    /// let mask = Image::<f32, 1>::from_size_val(
    ///   ImageSize { width: 4, height: 2 },
    ///   1.0,
    /// ).unwrap();
    ///
    /// assert!(mask.as_slice().iter().all(|&v| v == 1.0));
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// The size of the image in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The width of the image in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the image in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The number of channels of the image.
    #[inline]
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the pixel data as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get a reference to a single pixel channel value.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Option<&T> {
        if x >= self.size.width || y >= self.size.height || ch >= CHANNELS {
            return None;
        }
        self.data.get((y * self.size.width + x) * CHANNELS + ch)
    }

    /// Cast the pixel data to a different type and multiply it by a scale.
    ///
    /// # Arguments
    ///
    /// * `scale` - The factor applied after the cast.
    ///
    /// # Examples
    ///
    /// ```
    /// use splatcam_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![0, 255]).unwrap();
    /// let image_f32 = image.cast_and_scale::<f32>(1.0 / 255.0).unwrap();
    ///
    /// assert_eq!(image_f32.as_slice(), &[0.0, 1.0]);
    /// ```
    pub fn cast_and_scale<U>(&self, scale: U) -> Result<Image<U, CHANNELS>, ImageError>
    where
        T: num_traits::NumCast + Copy,
        U: num_traits::NumCast + Mul<Output = U> + Copy,
    {
        let data = self
            .data
            .iter()
            .map(|&x| U::from(x).map(|xu| xu * scale).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, data)
    }
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS>
where
    T: PartialOrd + Copy,
{
    /// Clamp every pixel value into `[min, max]` in place.
    ///
    /// Values that do not compare (e.g. NaN) are replaced by `min`.
    pub fn clamp(&mut self, min: T, max: T) {
        self.data.iter_mut().for_each(|v| {
            // NaN fails the lower bound check and becomes `min`
            *v = if *v >= min {
                if *v > max {
                    max
                } else {
                    *v
                }
            } else {
                min
            };
        });
    }
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS>
where
    T: Mul<Output = T> + Copy,
{
    /// Multiply every channel of each pixel by the matching value of a single channel mask.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::MismatchedSize`] if the mask does not have the size of the image.
    pub fn mul_mask(&mut self, mask: &Image<T, 1>) -> Result<(), ImageError> {
        if mask.size() != self.size {
            return Err(ImageError::MismatchedSize {
                expected: self.size,
                actual: mask.size(),
            });
        }

        self.data
            .chunks_exact_mut(CHANNELS)
            .zip(mask.as_slice())
            .for_each(|(pixel, &m)| pixel.iter_mut().for_each(|v| *v = *v * m));

        Ok(())
    }
}

impl<T: Copy> Image<T, 4> {
    /// Split a four channel image into its color channels and its alpha channel.
    pub fn split_alpha(&self) -> (Image<T, 3>, Image<T, 1>) {
        let num_pixels = self.size.width * self.size.height;
        let mut color = Vec::with_capacity(num_pixels * 3);
        let mut alpha = Vec::with_capacity(num_pixels);

        for pixel in self.data.chunks_exact(4) {
            color.extend_from_slice(&pixel[..3]);
            alpha.push(pixel[3]);
        }

        (
            Image {
                size: self.size,
                data: color,
            },
            Image {
                size: self.size,
                data: alpha,
            },
        )
    }
}
