use std::fmt;

/// Fixed framerates of the IIDC catalog modes
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Framerate {
    Fps1_875    = 32,
    Fps3_75     = 33,
    Fps7_5      = 34,
    Fps15       = 35,
    Fps30       = 36,
    Fps60       = 37,
    Fps120      = 38,
    Fps240      = 39,
}

impl Framerate {
    /// Frames per second
    pub fn fps(&self) -> f32 {
        match self {
            Self::Fps1_875 => 1.875,
            Self::Fps3_75 => 3.75,
            Self::Fps7_5 => 7.5,
            Self::Fps15 => 15.0,
            Self::Fps30 => 30.0,
            Self::Fps60 => 60.0,
            Self::Fps120 => 120.0,
            Self::Fps240 => 240.0,
        }
    }
}

impl TryFrom<u32> for Framerate {
    type Error = u32;

    fn try_from(repr: u32) -> Result<Self, Self::Error> {
        match repr {
            32 => Ok(Self::Fps1_875),
            33 => Ok(Self::Fps3_75),
            34 => Ok(Self::Fps7_5),
            35 => Ok(Self::Fps15),
            36 => Ok(Self::Fps30),
            37 => Ok(Self::Fps60),
            38 => Ok(Self::Fps120),
            39 => Ok(Self::Fps240),
            repr => Err(repr),
        }
    }
}

impl From<Framerate> for u32 {
    fn from(rate: Framerate) -> Self {
        rate as u32
    }
}

impl fmt::Display for Framerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fps", self.fps())
    }
}
