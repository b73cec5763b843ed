use std::fmt;

/// Color filter array layout of a Bayer sensor, named by its top-left 2x2 tile
#[allow(clippy::upper_case_acronyms)]
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorFilter {
    RGGB    = 512,
    GBRG    = 513,
    GRBG    = 514,
    BGGR    = 515,
}

impl ColorFilter {
    pub(crate) fn cfa(self) -> bayer::CFA {
        match self {
            Self::RGGB => bayer::CFA::RGGB,
            Self::GBRG => bayer::CFA::GBRG,
            Self::GRBG => bayer::CFA::GRBG,
            Self::BGGR => bayer::CFA::BGGR,
        }
    }
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self::RGGB
    }
}

impl TryFrom<u32> for ColorFilter {
    type Error = u32;

    fn try_from(repr: u32) -> Result<Self, Self::Error> {
        match repr {
            512 => Ok(Self::RGGB),
            513 => Ok(Self::GBRG),
            514 => Ok(Self::GRBG),
            515 => Ok(Self::BGGR),
            repr => Err(repr),
        }
    }
}

impl From<ColorFilter> for u32 {
    fn from(filter: ColorFilter) -> Self {
        filter as u32
    }
}

impl fmt::Display for ColorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
