//! Boundary to the native IEEE-1394 camera library.
//!
//! Everything above this module orchestrates these primitives; the `libdc1394` backend maps them
//! one to one onto the C API.

use crate::capture::{CaptureFlags, CapturePolicy};
use crate::device::Guid;
use crate::error::Result;
use crate::feature::{self, Feature};
use crate::format::ColorCoding;
use crate::frame::Frame;
use crate::framerate::Framerate;
use crate::mode::VideoMode;
use crate::speed::{IsoSpeed, OperationMode};

#[cfg(feature = "libdc1394")]
pub mod libdc1394;

/// Isochronous packet size used when programming a Format7 region
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PacketSize {
    /// use all bandwidth still available on the bus
    MaxAvailable,
    /// let the camera recommend a size
    Recommended,
    /// explicit size in bytes
    Bytes(u32),
}

/// Format7 region of interest
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Roi {
    pub coding: ColorCoding,
    pub packet_size: PacketSize,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Process-wide handle to the bus subsystem
pub trait Driver: Send + 'static {
    type Device: Device;

    /// Returns the GUIDs of all cameras currently attached, in bus order
    fn enumerate(&self) -> Result<Vec<Guid>>;

    /// Creates a handle for the camera with the given GUID
    ///
    /// The handle must be dropped before the driver itself.
    fn open(&self, guid: Guid) -> Result<Self::Device>;
}

/// Handle to one physical camera
///
/// Frames are handed out by ring slot: `dequeue` returns the slot of a finished frame, `frame`
/// lends its bytes and `enqueue` gives the slot back to the driver.
pub trait Device {
    /// Hardware identifier of the camera
    fn guid(&self) -> Guid;

    /// Forces a bus reset, dropping every isochronous reservation on the bus
    fn reset_bus(&mut self) -> Result<()>;

    /// Releases up to `units` of isochronous bandwidth
    fn release_iso_bandwidth(&mut self, units: u32) -> Result<()>;

    /// Releases an isochronous channel
    fn release_iso_channel(&mut self, channel: u32) -> Result<()>;

    fn set_operation_mode(&mut self, mode: OperationMode) -> Result<()>;

    fn set_iso_speed(&mut self, speed: IsoSpeed) -> Result<()>;

    /// Returns all video modes the camera supports, fixed and scalable
    fn supported_modes(&self) -> Result<Vec<VideoMode>>;

    /// Native size of a video mode
    fn mode_size(&self, mode: VideoMode) -> Result<(u32, u32)>;

    /// Color coding of a video mode
    fn mode_coding(&self, mode: VideoMode) -> Result<ColorCoding>;

    /// Returns the framerates of a fixed mode, slowest first
    fn supported_framerates(&self, mode: VideoMode) -> Result<Vec<Framerate>>;

    fn set_framerate(&mut self, rate: Framerate) -> Result<()>;

    fn set_video_mode(&mut self, mode: VideoMode) -> Result<()>;

    /// Largest region a Format7 mode can deliver
    fn format7_max_size(&self, mode: VideoMode) -> Result<(u32, u32)>;

    /// Horizontal and vertical granularity of the region origin
    fn format7_unit_position(&self, mode: VideoMode) -> Result<(u32, u32)>;

    /// Horizontal and vertical granularity of the region size
    fn format7_unit_size(&self, mode: VideoMode) -> Result<(u32, u32)>;

    fn format7_set_roi(&mut self, mode: VideoMode, roi: Roi) -> Result<()>;

    /// Size the camera actually applied to a Format7 mode
    fn format7_size(&self, mode: VideoMode) -> Result<(u32, u32)>;

    /// Allocates the DMA ring and starts the capture queue
    fn capture_setup(&mut self, buffers: u32, flags: CaptureFlags) -> Result<()>;

    /// Stops the capture queue and frees the DMA ring
    fn capture_stop(&mut self) -> Result<()>;

    /// Removes a finished frame from the ring, `None` if polling found nothing
    fn dequeue(&mut self, policy: CapturePolicy) -> Result<Option<usize>>;

    /// Lends the bytes of a dequeued slot
    fn frame(&self, slot: usize) -> Option<Frame<'_>>;

    /// Returns a slot to the ring
    fn enqueue(&mut self, slot: usize) -> Result<()>;

    fn transmission(&self) -> Result<bool>;

    fn set_transmission(&mut self, on: bool) -> Result<()>;

    /// Requests a single frame while transmission is off
    fn set_one_shot(&mut self, on: bool) -> Result<()>;

    fn feature_value(&self, feature: Feature) -> Result<u32>;

    fn set_feature_value(&mut self, feature: Feature, value: u32) -> Result<()>;

    fn feature_boundaries(&self, feature: Feature) -> Result<feature::Range>;

    /// Feature value in physical units (seconds for the shutter)
    fn feature_absolute_value(&self, feature: Feature) -> Result<f32>;

    fn set_feature_absolute_value(&mut self, feature: Feature, value: f32) -> Result<()>;

    fn set_feature_absolute_control(&mut self, feature: Feature, on: bool) -> Result<()>;

    fn set_feature_power(&mut self, feature: Feature, on: bool) -> Result<()>;

    fn set_feature_mode(&mut self, feature: Feature, mode: feature::Mode) -> Result<()>;

    /// Describes every feature the camera knows about
    fn features(&self) -> Result<Vec<feature::Info>>;

    /// Reads a vendor control register, `offset` is relative to the command base
    fn control_register(&self, offset: u64) -> Result<u32>;

    fn set_control_register(&mut self, offset: u64, value: u32) -> Result<()>;
}
