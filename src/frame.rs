use std::fmt;

use crate::format::ColorCoding;

/// Frame metadata, mostly used not to convolute the frame struct
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Position of the buffer in the DMA ring
    pub id: u32,
    /// Bus time the frame was received, in microseconds
    pub timestamp: u64,
    /// Number of finished frames still queued behind this one
    pub frames_behind: u32,
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "id             : {}", self.id)?;
        writeln!(f, "timestamp      : {} [us]", self.timestamp)?;
        writeln!(f, "frames behind  : {}", self.frames_behind)?;
        Ok(())
    }
}

/// Raw frame borrowed from the driver's DMA ring
///
/// The bytes stay owned by the driver; a frame is only valid until its slot is enqueued again.
#[derive(Debug, Copy, Clone)]
pub struct Frame<'a> {
    /// Image bytes as delivered by the camera
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub coding: ColorCoding,
    pub meta: Metadata,
}

impl<'a> Frame<'a> {
    /// Returns a frame view over driver memory
    pub fn new(data: &'a [u8], width: u32, height: u32, coding: ColorCoding) -> Self {
        Frame {
            data,
            width,
            height,
            coding,
            meta: Metadata::default(),
        }
    }

    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = meta;
        self
    }

    /// Number of pixels in the frame
    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
