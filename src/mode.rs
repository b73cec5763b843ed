use std::fmt;

/// IIDC video mode identifier
///
/// Modes below `FORMAT7_0` are fixed modes with a catalog size, coding and set of framerates.
/// The eight Format7 modes are scalable: their region of interest and coding are programmed
/// separately before the mode is selected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoMode(pub u32);

impl VideoMode {
    pub const MODE_160X120_YUV444: Self = Self(64);
    pub const MODE_320X240_YUV422: Self = Self(65);
    pub const MODE_640X480_YUV411: Self = Self(66);
    pub const MODE_640X480_YUV422: Self = Self(67);
    pub const MODE_640X480_RGB8: Self = Self(68);
    pub const MODE_640X480_MONO8: Self = Self(69);
    pub const MODE_640X480_MONO16: Self = Self(70);
    pub const MODE_800X600_YUV422: Self = Self(71);
    pub const MODE_800X600_RGB8: Self = Self(72);
    pub const MODE_800X600_MONO8: Self = Self(73);
    pub const MODE_1024X768_YUV422: Self = Self(74);
    pub const MODE_1024X768_RGB8: Self = Self(75);
    pub const MODE_1024X768_MONO8: Self = Self(76);
    pub const MODE_800X600_MONO16: Self = Self(77);
    pub const MODE_1024X768_MONO16: Self = Self(78);
    pub const MODE_1280X960_YUV422: Self = Self(79);
    pub const MODE_1280X960_RGB8: Self = Self(80);
    pub const MODE_1280X960_MONO8: Self = Self(81);
    pub const MODE_1600X1200_YUV422: Self = Self(82);
    pub const MODE_1600X1200_RGB8: Self = Self(83);
    pub const MODE_1600X1200_MONO8: Self = Self(84);
    pub const MODE_1280X960_MONO16: Self = Self(85);
    pub const MODE_1600X1200_MONO16: Self = Self(86);
    pub const EXIF: Self = Self(87);
    pub const FORMAT7_0: Self = Self(88);
    pub const FORMAT7_7: Self = Self(95);

    /// Returns the Format7 mode with the given index
    ///
    /// # Arguments
    ///
    /// * `index` - Format7 mode index (0..=7)
    ///
    /// # Example
    ///
    /// ```
    /// use dc1394::VideoMode;
    /// assert_eq!(VideoMode::format7(3), VideoMode(91));
    /// assert!(VideoMode::format7(3).is_scalable());
    /// ```
    pub const fn format7(index: u32) -> Self {
        Self(Self::FORMAT7_0.0 + index)
    }

    /// Whether this is a scalable (Format7) mode
    pub const fn is_scalable(&self) -> bool {
        self.0 >= Self::FORMAT7_0.0 && self.0 <= Self::FORMAT7_7.0
    }

    /// Index of a scalable mode within Format7, `None` for fixed modes
    pub const fn format7_index(&self) -> Option<u32> {
        if self.is_scalable() {
            Some(self.0 - Self::FORMAT7_0.0)
        } else {
            None
        }
    }
}

impl From<u32> for VideoMode {
    fn from(repr: u32) -> Self {
        Self(repr)
    }
}

impl From<VideoMode> for u32 {
    fn from(mode: VideoMode) -> Self {
        mode.0
    }
}

impl fmt::Display for VideoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format7_index() {
            Some(index) => write!(f, "FORMAT7_{}", index),
            None if *self == Self::EXIF => write!(f, "EXIF"),
            None => write!(f, "mode {}", self.0),
        }
    }
}
