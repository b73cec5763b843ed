use std::fmt;

pub mod coding;
pub use coding::ColorCoding;

pub mod filter;
pub use filter::ColorFilter;

/// Layout of a decoded 8-bit image
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// one byte per pixel
    #[default]
    Gray8,
    /// three bytes per pixel, red first
    Rgb8,
}

impl PixelFormat {
    /// Number of bytes per pixel
    pub const fn channels(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
        }
    }

    /// Returns the number of bytes needed for an image of the given size
    ///
    /// # Example
    ///
    /// ```
    /// use dc1394::PixelFormat;
    /// assert_eq!(PixelFormat::Rgb8.image_size(640, 480), 640 * 480 * 3);
    /// ```
    pub const fn image_size(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.channels()
    }

    /// Camera coding that delivers this format without conversion
    pub fn native_coding(&self) -> ColorCoding {
        match self {
            Self::Gray8 => ColorCoding::Mono8,
            Self::Rgb8 => ColorCoding::Rgb8,
        }
    }
}

impl From<ColorCoding> for PixelFormat {
    fn from(coding: ColorCoding) -> Self {
        match coding {
            ColorCoding::Mono8 => Self::Gray8,
            _ => Self::Rgb8,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gray8 => write!(f, "grayscale"),
            Self::Rgb8 => write!(f, "RGB"),
        }
    }
}
