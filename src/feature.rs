use std::fmt;

/// Adjustable camera feature
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Feature {
    Brightness      = 416,
    Exposure        = 417,
    Sharpness       = 418,
    WhiteBalance    = 419,
    Hue             = 420,
    Saturation      = 421,
    Gamma           = 422,
    Shutter         = 423,
    Gain            = 424,
    Iris            = 425,
    Focus           = 426,
    Temperature     = 427,
    Trigger         = 428,
    TriggerDelay    = 429,
    WhiteShading    = 430,
    FrameRate       = 431,
    Zoom            = 432,
    Pan             = 433,
    Tilt            = 434,
    OpticalFilter   = 435,
    CaptureSize     = 436,
    CaptureQuality  = 437,

    Unknown(u32),
}

impl From<u32> for Feature {
    fn from(repr: u32) -> Self {
        match repr {
            416 => Self::Brightness,
            417 => Self::Exposure,
            418 => Self::Sharpness,
            419 => Self::WhiteBalance,
            420 => Self::Hue,
            421 => Self::Saturation,
            422 => Self::Gamma,
            423 => Self::Shutter,
            424 => Self::Gain,
            425 => Self::Iris,
            426 => Self::Focus,
            427 => Self::Temperature,
            428 => Self::Trigger,
            429 => Self::TriggerDelay,
            430 => Self::WhiteShading,
            431 => Self::FrameRate,
            432 => Self::Zoom,
            433 => Self::Pan,
            434 => Self::Tilt,
            435 => Self::OpticalFilter,
            436 => Self::CaptureSize,
            437 => Self::CaptureQuality,
            repr => Self::Unknown(repr),
        }
    }
}

impl From<Feature> for u32 {
    fn from(feature: Feature) -> Self {
        match feature {
            Feature::Brightness => 416,
            Feature::Exposure => 417,
            Feature::Sharpness => 418,
            Feature::WhiteBalance => 419,
            Feature::Hue => 420,
            Feature::Saturation => 421,
            Feature::Gamma => 422,
            Feature::Shutter => 423,
            Feature::Gain => 424,
            Feature::Iris => 425,
            Feature::Focus => 426,
            Feature::Temperature => 427,
            Feature::Trigger => 428,
            Feature::TriggerDelay => 429,
            Feature::WhiteShading => 430,
            Feature::FrameRate => 431,
            Feature::Zoom => 432,
            Feature::Pan => 433,
            Feature::Tilt => 434,
            Feature::OpticalFilter => 435,
            Feature::CaptureSize => 436,
            Feature::CaptureQuality => 437,
            Feature::Unknown(repr) => repr,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Control mode of a feature
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Manual      = 736,
    Auto        = 737,
    OnePushAuto = 738,
}

impl TryFrom<u32> for Mode {
    type Error = u32;

    fn try_from(repr: u32) -> Result<Self, Self::Error> {
        match repr {
            736 => Ok(Self::Manual),
            737 => Ok(Self::Auto),
            738 => Ok(Self::OnePushAuto),
            repr => Err(repr),
        }
    }
}

impl From<Mode> for u32 {
    fn from(mode: Mode) -> Self {
        mode as u32
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Raw value bounds of a feature, inclusive
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

impl Range {
    /// Returns a range, swapping the bounds if the device reports them reversed
    ///
    /// # Example
    ///
    /// ```
    /// use dc1394::feature::Range;
    /// let range = Range::new(4095, 1);
    /// assert_eq!((range.min, range.max), (1, 4095));
    /// ```
    pub fn new(min: u32, max: u32) -> Self {
        if min > max {
            Range { min: max, max: min }
        } else {
            Range { min, max }
        }
    }

    /// Maps a raw value into [0, 1]
    ///
    /// A degenerate range maps everything to 0.
    pub fn normalize(&self, raw: u32) -> f32 {
        let span = self.span();
        if span == 0 {
            return 0.0;
        }
        (raw as f32 - self.min as f32) / span as f32
    }

    /// Maps a value in [0, 1] onto the nearest raw unit
    ///
    /// # Example
    ///
    /// ```
    /// use dc1394::feature::Range;
    /// let range = Range::new(100, 300);
    /// assert_eq!(range.denormalize(0.5), 200);
    /// assert_eq!(range.denormalize(2.0), 300);
    /// ```
    pub fn denormalize(&self, value: f32) -> u32 {
        let value = value.clamp(0.0, 1.0) as f64;
        let span = self.span() as f64;
        self.min + (value * span).round() as u32
    }

    /// Distance between the bounds, 0 for a reversed range
    fn span(&self) -> u32 {
        self.max.saturating_sub(self.min)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Feature description as reported by the device
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub feature: Feature,
    pub available: bool,
    pub readable: bool,
    pub switchable: bool,
    pub absolute_capable: bool,
    pub on: bool,
    pub mode: Option<Mode>,
    pub range: Range,
    pub value: u32,
    /// Absolute value in physical units, when the feature supports absolute control
    pub absolute: Option<f32>,
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Feature    : {}", self.feature)?;
        writeln!(f, "Available  : {}", self.available)?;
        if !self.available {
            return Ok(());
        }
        writeln!(f, "Readable   : {}", self.readable)?;
        writeln!(f, "Switchable : {}", self.switchable)?;
        writeln!(f, "Power      : {}", if self.on { "on" } else { "off" })?;
        match self.mode {
            Some(mode) => writeln!(f, "Mode       : {}", mode)?,
            None => writeln!(f, "Mode       : -")?,
        }
        writeln!(f, "Range      : {}", self.range)?;
        writeln!(f, "Value      : {}", self.value)?;
        if let Some(absolute) = self.absolute {
            writeln!(f, "Absolute   : {}", absolute)?;
        }
        Ok(())
    }
}
