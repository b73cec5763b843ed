use thiserror::Error;

use crate::device::Guid;
use crate::format::{ColorCoding, PixelFormat};
use crate::mode::VideoMode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No cameras found")]
    NoCameras,

    #[error("camera index {index} is out of range, {count} camera(s) attached")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("invalid camera GUID {0:?}")]
    InvalidGuid(String),

    #[error("failed to initialize camera with GUID {0}")]
    DeviceOpen(Guid),

    #[error("camera with GUID {0} is already held by another session")]
    DeviceBusy(Guid),

    #[error("failed to create the IEEE-1394 bus context")]
    ContextCreation,

    #[error("the IEEE-1394 bus context has been released")]
    ContextReleased,

    #[error("camera does not support target color coding {0}")]
    UnsupportedCoding(ColorCoding),

    #[error("video mode {0} reports no framerates")]
    NoFramerate(VideoMode),

    #[error("cannot convert {coding} frames into {format} images")]
    UnsupportedConversion {
        coding: ColorCoding,
        format: PixelFormat,
    },

    #[error("frame holds {actual} bytes, expected at least {expected}")]
    ShortFrame { expected: usize, actual: usize },

    #[error("output buffer holds {actual} bytes, expected at least {expected}")]
    ShortBuffer { expected: usize, actual: usize },

    #[error("{width}x{height} is not a valid size for {coding} frames")]
    InvalidGeometry {
        width: u32,
        height: u32,
        coding: ColorCoding,
    },

    #[error("demosaic failed: {0}")]
    Demosaic(String),

    #[error("camera is not open")]
    NotReady,

    #[error("{call} failed with error code {code}")]
    Driver { call: &'static str, code: i32 },
}

fn _test_error_is_send() {
    fn implements<T: Send + Sync>() {}
    implements::<Error>();
}
