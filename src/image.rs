use std::fmt;

use crate::format::PixelFormat;

/// Pixel buffer filled by a capture session
///
/// The session only needs to know the current geometry of the sink and to reallocate it when the
/// negotiated geometry differs.
pub trait PixelSink {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn pixel_format(&self) -> PixelFormat;

    /// Resizes the buffer, previous contents are not preserved
    fn allocate(&mut self, width: u32, height: u32, format: PixelFormat);

    /// Tightly packed pixel bytes, `width * height * channels` long
    fn pixels_mut(&mut self) -> &mut [u8];
}

/// Owned 8-bit image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Returns a zeroed image
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `format` - Pixel layout
    ///
    /// # Example
    ///
    /// ```
    /// use dc1394::{Image, PixelFormat};
    /// let img = Image::new(640, 480, PixelFormat::Rgb8);
    /// assert_eq!(img.pixels().len(), 640 * 480 * 3);
    /// ```
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Image {
            width,
            height,
            format,
            data: vec![0; format.image_size(width, height)],
        }
    }

    /// Whether the image holds any pixels
    pub fn is_allocated(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.data
    }
}

impl PixelSink for Image {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn allocate(&mut self, width: u32, height: u32, format: PixelFormat) {
        self.width = width;
        self.height = height;
        self.format = format;
        self.data.clear();
        self.data.resize(format.image_size(width, height), 0);
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.format)
    }
}
