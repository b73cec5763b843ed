use std::fmt;

use crate::capture::CapturePolicy;
use crate::format::{ColorCoding, ColorFilter, PixelFormat};
use crate::speed::BusSpeed;

/// Number of images in the DMA ring, where the driver stores frames until they are grabbed
pub const DEFAULT_BUFFERS: u32 = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
/// Session configuration, applied as a whole during mode negotiation
pub struct Settings {
    /// requested width in pixels, replaced by the native width in fixed modes
    pub width: u32,
    /// requested height in pixels, replaced by the native height in fixed modes
    pub height: u32,
    /// Format7 region origin
    pub left: u32,
    pub top: u32,
    /// layout of decoded images
    pub pixel_format: PixelFormat,
    /// sensor filter pattern when the camera delivers a Bayer mosaic
    pub bayer: Option<ColorFilter>,
    pub format7: bool,
    pub format7_mode: u32,
    pub bus_speed: BusSpeed,
    pub capture_policy: CapturePolicy,
    /// DMA ring depth
    pub buffers: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: 640,
            height: 480,
            left: 0,
            top: 0,
            pixel_format: PixelFormat::Gray8,
            bayer: None,
            format7: false,
            format7_mode: 0,
            bus_speed: BusSpeed::Legacy,
            capture_policy: CapturePolicy::Poll,
            buffers: DEFAULT_BUFFERS,
        }
    }
}

impl Settings {
    /// Coding the camera has to deliver for these settings
    ///
    /// Bayer sensors are read as raw mono even though decoded images are color.
    ///
    /// # Example
    ///
    /// ```
    /// use dc1394::{ColorCoding, ColorFilter, PixelFormat, Settings};
    /// let mut settings = Settings::default();
    /// assert_eq!(settings.target_coding(), ColorCoding::Mono8);
    ///
    /// settings.pixel_format = PixelFormat::Rgb8;
    /// assert_eq!(settings.target_coding(), ColorCoding::Rgb8);
    ///
    /// settings.bayer = Some(ColorFilter::GBRG);
    /// assert_eq!(settings.target_coding(), ColorCoding::Mono8);
    /// ```
    pub fn target_coding(&self) -> ColorCoding {
        if self.bayer.is_some() {
            ColorCoding::Mono8
        } else {
            self.pixel_format.native_coding()
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "size           : {}x{}", self.width, self.height)?;
        writeln!(f, "position       : {},{}", self.left, self.top)?;
        writeln!(f, "pixel format   : {}", self.pixel_format)?;
        match self.bayer {
            Some(filter) => writeln!(f, "bayer          : {}", filter)?,
            None => writeln!(f, "bayer          : off")?,
        }
        if self.format7 {
            writeln!(f, "format7        : mode {}", self.format7_mode)?;
        } else {
            writeln!(f, "format7        : off")?;
        }
        writeln!(f, "bus speed      : {}", self.bus_speed)?;
        writeln!(f, "capture policy : {}", self.capture_policy)?;
        writeln!(f, "buffers        : {}", self.buffers)?;
        Ok(())
    }
}
