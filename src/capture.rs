use bitflags::bitflags;
use std::fmt;

/// How a dequeue behaves when the DMA ring holds no finished frame
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CapturePolicy {
    /// block the calling thread until the next frame arrives
    Wait    = 672,
    /// return immediately with no frame
    #[default]
    Poll    = 673,
}

impl From<CapturePolicy> for u32 {
    fn from(policy: CapturePolicy) -> Self {
        policy as u32
    }
}

impl fmt::Display for CapturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wait => write!(f, "wait"),
            Self::Poll => write!(f, "poll"),
        }
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
    pub struct CaptureFlags: u32 {
        /// Allocate an isochronous channel
        const CHANNEL_ALLOC     = 0x00000001;
        /// Allocate isochronous bandwidth
        const BANDWIDTH_ALLOC   = 0x00000002;
        /// Let the driver pick channel and bandwidth handling
        const DEFAULT           = 0x00000004;
        /// Pick the ISO speed automatically
        const AUTO_ISO          = 0x00000008;
    }
}

impl From<u32> for CaptureFlags {
    fn from(flags: u32) -> Self {
        Self::from_bits_retain(flags)
    }
}

impl From<CaptureFlags> for u32 {
    fn from(flags: CaptureFlags) -> Self {
        flags.bits()
    }
}

impl fmt::Display for CaptureFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
