use std::fmt;

/// Bus operation mode
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperationMode {
    Legacy  = 480,
    B1394   = 481,
}

/// Isochronous transfer speed
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum IsoSpeed {
    S100    = 0,
    S200    = 1,
    S400    = 2,
    S800    = 3,
    S1600   = 4,
    S3200   = 5,
}

impl From<OperationMode> for u32 {
    fn from(mode: OperationMode) -> Self {
        mode as u32
    }
}

impl From<IsoSpeed> for u32 {
    fn from(speed: IsoSpeed) -> Self {
        speed as u32
    }
}

impl fmt::Display for IsoSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mbps = 100u32 << (*self as u32);
        write!(f, "{} Mbps", mbps)
    }
}

/// Bus speed selection applied during mode negotiation
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BusSpeed {
    /// legacy operation at 400 Mbps
    #[default]
    Legacy,
    /// 1394b operation at 800 Mbps
    B1394,
}

impl BusSpeed {
    /// Operation mode and ISO speed pair programmed into the camera
    ///
    /// # Example
    ///
    /// ```
    /// use dc1394::{BusSpeed, IsoSpeed, OperationMode};
    /// assert_eq!(BusSpeed::B1394.pair(), (OperationMode::B1394, IsoSpeed::S800));
    /// ```
    pub const fn pair(&self) -> (OperationMode, IsoSpeed) {
        match self {
            Self::Legacy => (OperationMode::Legacy, IsoSpeed::S400),
            Self::B1394 => (OperationMode::B1394, IsoSpeed::S800),
        }
    }
}

impl fmt::Display for BusSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy ({})", self.pair().1),
            Self::B1394 => write!(f, "1394b ({})", self.pair().1),
        }
    }
}
