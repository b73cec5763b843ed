//! Capture sessions for IIDC (IEEE-1394 DCAM) cameras.
//!
//! A [`Context`] owns the bus driver and hands out leases to [`Camera`] sessions. A session opens
//! one camera, negotiates a video mode for its [`Settings`] and grabs frames into any
//! [`PixelSink`], decoding Bayer mosaics and YUV codings on the way.
//!
//! The native library is only linked with the `libdc1394` feature, which adds the
//! `driver::libdc1394` backend and its process-wide context.

#[cfg(feature = "libdc1394")]
pub use libdc1394_sys;

pub mod driver;

pub mod camera;
pub use camera::{Camera, Settings};

mod capture;
pub use capture::{CaptureFlags, CapturePolicy};

mod context;
pub use context::{Context, Lease};

pub mod decode;
pub use decode::decode;

mod device;
pub use device::{DeviceList, Guid, Selector};

pub mod error;
pub use error::{Error, Result};

pub mod feature;
pub use feature::Feature;

pub mod format;
pub use format::{ColorCoding, ColorFilter, PixelFormat};

mod frame;
pub use frame::{Frame, Metadata};

mod framerate;
pub use framerate::Framerate;

mod grabber;
pub use grabber::{Grabber, VideoSource};

mod image;
pub use image::{Image, PixelSink};

mod mode;
pub use mode::VideoMode;

mod speed;
pub use speed::{BusSpeed, IsoSpeed, OperationMode};

pub mod vendor;
