use std::fmt;

/// Pixel encoding used by the camera for a video mode
#[allow(clippy::upper_case_acronyms)]
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorCoding {
    Mono8       = 352,
    Yuv411      = 353,
    Yuv422      = 354,
    Yuv444      = 355,
    Rgb8        = 356,
    Mono16      = 357,
    Rgb16       = 358,
    Mono16S     = 359,
    Rgb16S      = 360,
    Raw8        = 361,
    Raw16       = 362,

    Unknown(u32),
}

impl ColorCoding {
    /// Bytes occupied by `pixels` pixels in this coding, if the coding is known
    pub fn bytes_for(&self, pixels: usize) -> Option<usize> {
        match self {
            Self::Mono8 | Self::Raw8 => Some(pixels),
            Self::Yuv411 => Some(pixels * 3 / 2),
            Self::Yuv422 | Self::Mono16 | Self::Mono16S | Self::Raw16 => Some(pixels * 2),
            Self::Yuv444 | Self::Rgb8 => Some(pixels * 3),
            Self::Rgb16 | Self::Rgb16S => Some(pixels * 6),
            Self::Unknown(_) => None,
        }
    }
}

impl From<u32> for ColorCoding {
    fn from(repr: u32) -> Self {
        match repr {
            352 => Self::Mono8,
            353 => Self::Yuv411,
            354 => Self::Yuv422,
            355 => Self::Yuv444,
            356 => Self::Rgb8,
            357 => Self::Mono16,
            358 => Self::Rgb16,
            359 => Self::Mono16S,
            360 => Self::Rgb16S,
            361 => Self::Raw8,
            362 => Self::Raw16,
            repr => Self::Unknown(repr),
        }
    }
}

impl From<ColorCoding> for u32 {
    fn from(coding: ColorCoding) -> Self {
        match coding {
            ColorCoding::Mono8 => 352,
            ColorCoding::Yuv411 => 353,
            ColorCoding::Yuv422 => 354,
            ColorCoding::Yuv444 => 355,
            ColorCoding::Rgb8 => 356,
            ColorCoding::Mono16 => 357,
            ColorCoding::Rgb16 => 358,
            ColorCoding::Mono16S => 359,
            ColorCoding::Rgb16S => 360,
            ColorCoding::Raw8 => 361,
            ColorCoding::Raw16 => 362,
            ColorCoding::Unknown(repr) => repr,
        }
    }
}

impl fmt::Display for ColorCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mono8 => write!(f, "MONO8"),
            Self::Yuv411 => write!(f, "YUV411"),
            Self::Yuv422 => write!(f, "YUV422"),
            Self::Yuv444 => write!(f, "YUV444"),
            Self::Rgb8 => write!(f, "RGB8"),
            Self::Mono16 => write!(f, "MONO16"),
            Self::Rgb16 => write!(f, "RGB16"),
            Self::Mono16S => write!(f, "MONO16S"),
            Self::Rgb16S => write!(f, "RGB16S"),
            Self::Raw8 => write!(f, "RAW8"),
            Self::Raw16 => write!(f, "RAW16"),
            Self::Unknown(repr) => write!(f, "unknown coding ({})", repr),
        }
    }
}
