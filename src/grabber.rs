use std::sync::Arc;

use crate::camera::{Camera, Settings};
use crate::context::Context;
use crate::device::Selector;
use crate::driver::Driver;
use crate::error::Result;
use crate::image::Image;

/// Pull-based video source
///
/// Consumers call [`VideoSource::update`] once per tick and only look at the pixels when
/// [`VideoSource::is_frame_new`] says so.
pub trait VideoSource {
    /// Fetches the next frame if one is available
    fn update(&mut self) -> Result<()>;

    /// Whether a frame arrived since the last call
    ///
    /// Reading clears the flag, so every grabbed frame is reported at most once.
    fn is_frame_new(&mut self) -> bool;

    /// Pixels of the most recent frame
    fn pixels(&self) -> &[u8];

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Releases the underlying device
    fn close(&mut self);
}

/// [`VideoSource`] backed by a capture session
///
/// Every update drops stale frames, so the buffer always holds the freshest one.
pub struct Grabber<D: Driver> {
    camera: Camera<D>,
    buffer: Image,
    new_frame: bool,
}

impl<D: Driver> Grabber<D> {
    /// Opens the selected camera with `settings` and wraps it
    pub fn open(
        context: &Arc<Context<D>>,
        selector: impl Into<Selector>,
        settings: Settings,
    ) -> Result<Self> {
        let mut camera = Camera::with_settings(context, settings)?;
        camera.open(selector)?;
        Ok(Self::new(camera))
    }

    /// Wraps an already configured session
    pub fn new(camera: Camera<D>) -> Self {
        Grabber {
            camera,
            buffer: Image::default(),
            new_frame: false,
        }
    }

    pub fn camera(&self) -> &Camera<D> {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera<D> {
        &mut self.camera
    }

    pub fn buffer(&self) -> &Image {
        &self.buffer
    }

    pub fn into_camera(self) -> Camera<D> {
        self.camera
    }
}

impl<D: Driver> VideoSource for Grabber<D> {
    fn update(&mut self) -> Result<()> {
        if self.camera.grab_video(&mut self.buffer, true)? {
            self.new_frame = true;
        }
        Ok(())
    }

    fn is_frame_new(&mut self) -> bool {
        std::mem::take(&mut self.new_frame)
    }

    fn pixels(&self) -> &[u8] {
        self.buffer.pixels()
    }

    fn width(&self) -> u32 {
        self.camera.width()
    }

    fn height(&self) -> u32 {
        self.camera.height()
    }

    fn close(&mut self) {
        self.camera.close();
    }
}
