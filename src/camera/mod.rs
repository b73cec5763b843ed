#[macro_use]
mod macros;

pub mod negotiate;
pub mod settings;

pub use settings::{Settings, DEFAULT_BUFFERS};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::capture::{CaptureFlags, CapturePolicy};
use crate::context::{Context, Lease};
use crate::decode::decode;
use crate::device::{Guid, Selector};
use crate::driver::{Device, Driver, PacketSize, Roi};
use crate::error::{Error, Result};
use crate::feature::{self, Feature};
use crate::format::{ColorFilter, PixelFormat};
use crate::frame::Frame;
use crate::image::PixelSink;
use crate::mode::VideoMode;
use crate::speed::BusSpeed;

use negotiate::{closest_mode, quantize, Candidate};

/// Capture session on one camera
///
/// A session holds a lease on the bus [`Context`] for its whole lifetime. The camera handle only
/// exists between a successful [`Camera::open`] and [`Camera::close`]; every operation that needs
/// it is a no-op (or reports nothing) before that.
pub struct Camera<D: Driver> {
    device: Option<D::Device>,
    video_mode: Option<VideoMode>,
    capturing: bool,
    settings: Settings,
    // dropped last, the device handle must not outlive the driver
    lease: Lease<D>,
}

impl<D: Driver> Camera<D> {
    /// Returns a session with default settings
    ///
    /// # Arguments
    ///
    /// * `context` - Bus context, a lease is taken on it for the lifetime of the session
    pub fn new(context: &Arc<Context<D>>) -> Result<Self> {
        Self::with_settings(context, Settings::default())
    }

    /// Returns a session that will negotiate `settings` once opened
    pub fn with_settings(context: &Arc<Context<D>>, settings: Settings) -> Result<Self> {
        let lease = context.acquire()?;
        Ok(Camera {
            device: None,
            video_mode: None,
            capturing: false,
            settings,
            lease,
        })
    }

    /// Number of cameras currently attached to the bus
    pub fn camera_count(&self) -> Result<usize> {
        Ok(self.lease.devices()?.len())
    }

    /// Opens the selected camera and negotiates the current settings
    ///
    /// A session that is already open is closed first. Fails with [`Error::DeviceBusy`] while
    /// another session holds the camera. On failure the session is left without a device handle
    /// and [`Camera::ready`] returns false.
    ///
    /// # Arguments
    ///
    /// * `selector` - Bus index or GUID of the camera
    pub fn open(&mut self, selector: impl Into<Selector>) -> Result<()> {
        self.close();

        let guid = self.lease.resolve(selector.into())?;
        let mut device = match self.lease.open(guid) {
            Ok(device) => device,
            Err(e) => {
                error!("Failed to initialize camera with GUID {:x}: {}", guid, e);
                return Err(e);
            }
        };
        debug!("Using camera with GUID {:x}", device.guid());

        if let Err(e) = recover_bus(&mut device) {
            error!("Failed to recover the IEEE-1394 bus: {}", e);
            drop(device);
            self.lease.release_device();
            return Err(e);
        }

        self.device = Some(device);
        self.negotiate()
    }

    /// Stops capture, switches transmission off and releases the camera handle
    ///
    /// Once closed, the camera can be opened by another session.
    pub fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            if self.capturing {
                if let Err(e) = device.capture_stop() {
                    warn!("Failed to stop capture: {}", e);
                }
            }
            if let Err(e) = switch_transmission(&mut device, false) {
                warn!("Failed to stop transmission: {}", e);
            }
        }
        self.lease.release_device();
        self.capturing = false;
        self.video_mode = None;
    }

    /// Whether a camera handle exists
    pub fn ready(&self) -> bool {
        self.device.is_some()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Negotiated width, or the requested one before the camera is open
    pub fn width(&self) -> u32 {
        self.settings.width
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.settings.pixel_format
    }

    /// Video mode selected by the last successful negotiation
    pub fn video_mode(&self) -> Option<VideoMode> {
        self.video_mode
    }

    pub fn guid(&self) -> Option<Guid> {
        self.device.as_ref().map(|device| device.guid())
    }

    /// Raw access to the camera handle, for operations this session does not wrap
    pub fn device(&self) -> Option<&D::Device> {
        self.device.as_ref()
    }

    pub fn device_mut(&mut self) -> Option<&mut D::Device> {
        self.device.as_mut()
    }

    /// Requests a frame size
    ///
    /// Fixed modes replace it with the closest native size, Format7 rounds it down to the size
    /// unit of the mode.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        let changed = (self.settings.width, self.settings.height) != (width, height);
        self.settings.width = width;
        self.settings.height = height;
        self.renegotiate(changed)
    }

    /// Requests a Format7 region origin
    pub fn set_position(&mut self, left: u32, top: u32) -> Result<()> {
        let changed = (self.settings.left, self.settings.top) != (left, top);
        self.settings.left = left;
        self.settings.top = top;
        self.renegotiate(changed)
    }

    pub fn set_pixel_format(&mut self, format: PixelFormat) -> Result<()> {
        let changed = self.settings.pixel_format != format;
        self.settings.pixel_format = format;
        self.renegotiate(changed)
    }

    /// Reads the sensor as a raw Bayer mosaic and demosaics it into RGB
    ///
    /// `None` switches back to reading the native coding of the pixel format.
    pub fn set_bayer_mode(&mut self, filter: Option<ColorFilter>) -> Result<()> {
        let format = match filter {
            Some(_) => PixelFormat::Rgb8,
            None => self.settings.pixel_format,
        };
        let changed = self.settings.bayer != filter || self.settings.pixel_format != format;
        self.settings.bayer = filter;
        self.settings.pixel_format = format;
        self.renegotiate(changed)
    }

    /// Switches between fixed modes and the scalable Format7 mode `mode`
    pub fn set_format7(&mut self, enabled: bool, mode: u32) -> Result<()> {
        let changed = self.settings.format7 != enabled || self.settings.format7_mode != mode;
        self.settings.format7 = enabled;
        self.settings.format7_mode = mode;
        self.renegotiate(changed)
    }

    pub fn set_bus_speed(&mut self, speed: BusSpeed) -> Result<()> {
        let changed = self.settings.bus_speed != speed;
        self.settings.bus_speed = speed;
        self.renegotiate(changed)
    }

    /// Selects blocking or polling dequeue, takes effect on the next grab
    pub fn set_capture_policy(&mut self, policy: CapturePolicy) {
        self.settings.capture_policy = policy;
    }

    pub fn set_blocking(&mut self, blocking: bool) {
        self.set_capture_policy(if blocking {
            CapturePolicy::Wait
        } else {
            CapturePolicy::Poll
        });
    }

    /// Sets the DMA ring depth used by the next negotiation
    pub fn set_buffers(&mut self, buffers: u32) {
        self.settings.buffers = buffers;
    }

    fn renegotiate(&mut self, changed: bool) -> Result<()> {
        if changed && self.device.is_some() {
            self.negotiate()
        } else {
            Ok(())
        }
    }

    fn negotiate(&mut self) -> Result<()> {
        match self.apply_settings() {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Failed to negotiate video mode: {}", e);
                self.close();
                Err(e)
            }
        }
    }

    fn apply_settings(&mut self) -> Result<()> {
        let settings = self.settings;
        let device = self.device.as_mut().ok_or(Error::NotReady)?;

        if self.capturing {
            device.capture_stop()?;
            self.capturing = false;
        }

        let (operation_mode, iso_speed) = settings.bus_speed.pair();
        device.set_operation_mode(operation_mode)?;
        device.set_iso_speed(iso_speed)?;

        let target = settings.target_coding();
        let mode = if settings.format7 {
            let mode = VideoMode::format7(settings.format7_mode);
            let (width, height) = device.format7_max_size(mode)?;
            debug!("Maximum size for current Format7 mode is {}x{}", width, height);

            let (unit_left, unit_top) = device.format7_unit_position(mode)?;
            let (unit_width, unit_height) = device.format7_unit_size(mode)?;
            let roi = Roi {
                coding: target,
                packet_size: PacketSize::MaxAvailable,
                left: quantize(settings.left, unit_left),
                top: quantize(settings.top, unit_top),
                width: quantize(settings.width, unit_width),
                height: quantize(settings.height, unit_height),
            };
            if roi.width == 0 || roi.height == 0 {
                return Err(Error::InvalidGeometry {
                    width: roi.width,
                    height: roi.height,
                    coding: target,
                });
            }
            self.settings.left = roi.left;
            self.settings.top = roi.top;
            self.settings.width = roi.width;
            self.settings.height = roi.height;
            device.format7_set_roi(mode, roi)?;

            let (width, height) = device.format7_size(mode)?;
            debug!("Using mode: {}x{}", width, height);
            mode
        } else {
            let mut candidates = Vec::new();
            for (i, mode) in device.supported_modes()?.into_iter().enumerate() {
                if mode.is_scalable() {
                    continue;
                }
                let (width, height) = device.mode_size(mode)?;
                let coding = device.mode_coding(mode)?;
                debug!("Camera mode {}: {} {}x{}", i, coding, width, height);
                candidates.push(Candidate {
                    mode,
                    width,
                    height,
                    coding,
                });
            }

            let best = closest_mode(&candidates, target, settings.width, settings.height)
                .ok_or(Error::UnsupportedCoding(target))?;
            self.settings.width = best.width;
            self.settings.height = best.height;

            let framerate = device
                .supported_framerates(best.mode)?
                .last()
                .copied()
                .ok_or(Error::NoFramerate(best.mode))?;
            device.set_framerate(framerate)?;
            debug!("Using mode: {}x{} {}", best.width, best.height, framerate);
            best.mode
        };

        device.set_video_mode(mode)?;
        device.capture_setup(settings.buffers, CaptureFlags::DEFAULT)?;
        self.capturing = true;
        self.video_mode = Some(mode);
        Ok(())
    }

    /// Switches isochronous transmission, skipping the write when the camera is already there
    pub fn set_transmission(&mut self, on: bool) -> Result<()> {
        match self.device.as_mut() {
            Some(device) => switch_transmission(device, on),
            None => Ok(()),
        }
    }

    /// Dequeues one frame with the configured policy and lends it to `f`
    ///
    /// The slot is given back to the driver after `f` returns. Returns `None` if no frame was
    /// available or the camera is not open.
    pub fn grab_with<R>(&mut self, f: impl FnOnce(&Frame) -> R) -> Result<Option<R>> {
        let policy = self.settings.capture_policy;
        self.grab_with_policy(policy, f)
    }

    fn grab_with_policy<R>(
        &mut self,
        policy: CapturePolicy,
        f: impl FnOnce(&Frame) -> R,
    ) -> Result<Option<R>> {
        let device = match self.device.as_mut() {
            Some(device) => device,
            None => return Ok(None),
        };
        let slot = match device.dequeue(policy)? {
            Some(slot) => slot,
            None => return Ok(None),
        };
        let result = device.frame(slot).map(|frame| f(&frame));
        device.enqueue(slot)?;
        Ok(result)
    }

    /// Grabs one frame into `img`, reallocating it if its geometry does not match
    ///
    /// Returns false without touching `img` when no frame was available.
    pub fn grab_frame<S: PixelSink + ?Sized>(&mut self, img: &mut S) -> Result<bool> {
        let policy = self.settings.capture_policy;
        self.grab_frame_with_policy(img, policy)
    }

    fn grab_frame_with_policy<S: PixelSink + ?Sized>(
        &mut self,
        img: &mut S,
        policy: CapturePolicy,
    ) -> Result<bool> {
        let Settings {
            width,
            height,
            pixel_format,
            bayer,
            ..
        } = self.settings;

        let grabbed = self.grab_with_policy(policy, |frame| {
            if img.width() != width || img.height() != height || img.pixel_format() != pixel_format
            {
                img.allocate(width, height, pixel_format);
            }
            let frame = Frame {
                width,
                height,
                ..*frame
            };
            decode(&frame, pixel_format, bayer, img.pixels_mut())
        })?;

        match grabbed {
            Some(result) => result.map(|_| true),
            None => Ok(false),
        }
    }

    /// Grabs from the running stream, switching transmission on if needed
    ///
    /// With `drop_frames` the queue is drained after the first frame so that `img` ends up
    /// holding the most recent one.
    pub fn grab_video<S: PixelSink + ?Sized>(
        &mut self,
        img: &mut S,
        drop_frames: bool,
    ) -> Result<bool> {
        if self.device.is_none() {
            return Ok(false);
        }
        self.set_transmission(true)?;

        if !self.grab_frame(img)? {
            return Ok(false);
        }
        if drop_frames {
            while self.grab_frame_with_policy(img, CapturePolicy::Poll)? {}
        }
        Ok(true)
    }

    /// Grabs a single frame with transmission off
    ///
    /// Stale frames are flushed before the one-shot request is sent.
    pub fn grab_still<S: PixelSink + ?Sized>(&mut self, img: &mut S) -> Result<bool> {
        if self.device.is_none() {
            return Ok(false);
        }
        self.set_transmission(false)?;
        self.flush_buffer()?;
        if let Some(device) = self.device.as_mut() {
            device.set_one_shot(true)?;
        }
        self.grab_frame(img)
    }

    /// Discards every frame waiting in the DMA ring
    pub fn flush_buffer(&mut self) -> Result<()> {
        let device = match self.device.as_mut() {
            Some(device) => device,
            None => return Ok(()),
        };
        while let Some(slot) = device.dequeue(CapturePolicy::Poll)? {
            device.enqueue(slot)?;
        }
        Ok(())
    }

    /// Raw value of a feature, 0 when the camera is not open
    pub fn feature(&self, feature: Feature) -> Result<u32> {
        match self.device.as_ref() {
            Some(device) => device.feature_value(feature),
            None => Ok(0),
        }
    }

    /// Writes a raw feature value
    ///
    /// The feature is powered on and put in manual mode first, otherwise the camera ignores the
    /// value.
    pub fn set_feature(&mut self, feature: Feature, value: u32) -> Result<()> {
        if let Some(device) = self.device.as_mut() {
            manual_control(device, feature)?;
            device.set_feature_value(feature, value)?;
        }
        Ok(())
    }

    /// Raw bounds of a feature, `[0, 0]` when the camera is not open
    pub fn feature_range(&self, feature: Feature) -> Result<feature::Range> {
        match self.device.as_ref() {
            Some(device) => device.feature_boundaries(feature),
            None => Ok(feature::Range::default()),
        }
    }

    /// Feature value mapped into [0, 1] over its raw range
    pub fn feature_norm(&self, feature: Feature) -> Result<f32> {
        if self.device.is_none() {
            return Ok(0.0);
        }
        let range = self.feature_range(feature)?;
        Ok(range.normalize(self.feature(feature)?))
    }

    pub fn set_feature_norm(&mut self, feature: Feature, value: f32) -> Result<()> {
        if self.device.is_none() {
            return Ok(());
        }
        let range = self.feature_range(feature)?;
        self.set_feature(feature, range.denormalize(value))
    }

    /// Feature value in physical units, 0 when the camera is not open
    pub fn feature_abs(&self, feature: Feature) -> Result<f32> {
        match self.device.as_ref() {
            Some(device) => device.feature_absolute_value(feature),
            None => Ok(0.0),
        }
    }

    /// Writes a feature value in physical units, enabling absolute control
    pub fn set_feature_abs(&mut self, feature: Feature, value: f32) -> Result<()> {
        if let Some(device) = self.device.as_mut() {
            manual_control(device, feature)?;
            device.set_feature_absolute_control(feature, true)?;
            device.set_feature_absolute_value(feature, value)?;
        }
        Ok(())
    }

    /// Describes every feature of the camera, empty when the camera is not open
    pub fn features(&self) -> Result<Vec<feature::Info>> {
        match self.device.as_ref() {
            Some(device) => device.features(),
            None => Ok(Vec::new()),
        }
    }

    impl_feature_accessors!(
        Feature::Brightness,
        brightness,
        set_brightness,
        brightness_norm,
        set_brightness_norm,
        brightness_abs,
        set_brightness_abs,
        brightness_range
    );

    impl_feature_accessors!(
        Feature::Gamma,
        gamma,
        set_gamma,
        gamma_norm,
        set_gamma_norm,
        gamma_abs,
        set_gamma_abs,
        gamma_range
    );

    impl_feature_accessors!(
        Feature::Gain,
        gain,
        set_gain,
        gain_norm,
        set_gain_norm,
        gain_abs,
        set_gain_abs,
        gain_range
    );

    impl_feature_accessors!(
        Feature::Exposure,
        exposure,
        set_exposure,
        exposure_norm,
        set_exposure_norm,
        exposure_abs,
        set_exposure_abs,
        exposure_range
    );

    impl_feature_accessors!(
        Feature::Shutter,
        shutter,
        set_shutter,
        shutter_norm,
        set_shutter_norm,
        shutter_abs,
        set_shutter_abs,
        shutter_range
    );
}

impl<D: Driver> Drop for Camera<D> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<D: Driver> fmt::Debug for Camera<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("guid", &self.guid())
            .field("video_mode", &self.video_mode)
            .field("capturing", &self.capturing)
            .field("settings", &self.settings)
            .field("lease", &self.lease)
            .finish()
    }
}

fn switch_transmission<T: Device>(device: &mut T, on: bool) -> Result<()> {
    if device.transmission()? != on {
        device.set_transmission(on)?;
    }
    Ok(())
}

fn manual_control<T: Device>(device: &mut T, feature: Feature) -> Result<()> {
    device.set_feature_power(feature, true)?;
    device.set_feature_mode(feature, feature::Mode::Manual)
}

/// Frees isochronous resources left behind by a process that exited without cleaning up
#[cfg(target_os = "macos")]
fn recover_bus<T: Device>(device: &mut T) -> Result<()> {
    if let Err(e) = device.release_iso_bandwidth(i32::MAX as u32) {
        debug!("Could not release isochronous bandwidth: {}", e);
    }
    for channel in 0..64 {
        if let Err(e) = device.release_iso_channel(channel) {
            debug!("Could not release isochronous channel {}: {}", channel, e);
        }
    }
    Ok(())
}

/// Frees isochronous resources left behind by a process that exited without cleaning up
#[cfg(target_os = "linux")]
fn recover_bus<T: Device>(device: &mut T) -> Result<()> {
    device.reset_bus()
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn recover_bus<T: Device>(_device: &mut T) -> Result<()> {
    Ok(())
}
