//! Backend on top of the native libdc1394 library.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::{mem, ptr, slice};

use libdc1394_sys::*;
use tracing::debug;

use crate::capture::{CaptureFlags, CapturePolicy};
use crate::context::Context;
use crate::device::Guid;
use crate::driver::{self, PacketSize, Roi};
use crate::error::{Error, Result};
use crate::feature::{self, Feature};
use crate::format::ColorCoding;
use crate::frame::{Frame, Metadata};
use crate::framerate::Framerate;
use crate::mode::VideoMode;
use crate::speed::{IsoSpeed, OperationMode};

macro_rules! checked_call {
    ($func:ident($($arg:expr),* $(,)?)) => {
        match unsafe { $func($($arg),*) } {
            dc1394error_t::DC1394_SUCCESS => (),
            code => {
                return Err(Error::Driver {
                    call: stringify!($func),
                    code: code as i32,
                })
            }
        }
    };
}

fn switch(on: bool) -> dc1394switch_t::Type {
    if on {
        dc1394switch_t::DC1394_ON
    } else {
        dc1394switch_t::DC1394_OFF
    }
}

fn feature_id(feature: Feature) -> dc1394feature_t::Type {
    u32::from(feature) as dc1394feature_t::Type
}

fn video_mode(mode: VideoMode) -> dc1394video_mode_t::Type {
    u32::from(mode) as dc1394video_mode_t::Type
}

static CONTEXT: OnceLock<Arc<Context<Libdc1394>>> = OnceLock::new();

/// Process-wide bus context backed by libdc1394
///
/// Sessions created from it share one library handle, which is freed with the last session.
pub fn context() -> Arc<Context<Libdc1394>> {
    Arc::clone(CONTEXT.get_or_init(|| Context::new(Libdc1394::new)))
}

/// Library handle, `dc1394_t`
pub struct Libdc1394 {
    handle: *mut dc1394_t,
}

unsafe impl Send for Libdc1394 {}

impl Libdc1394 {
    pub fn new() -> Result<Self> {
        let handle = unsafe { dc1394_new() };
        if handle.is_null() {
            return Err(Error::ContextCreation);
        }
        Ok(Libdc1394 { handle })
    }
}

impl Drop for Libdc1394 {
    fn drop(&mut self) {
        unsafe { dc1394_free(self.handle) };
    }
}

impl driver::Driver for Libdc1394 {
    type Device = Libdc1394Device;

    fn enumerate(&self) -> Result<Vec<Guid>> {
        let mut list: *mut dc1394camera_list_t = ptr::null_mut();
        checked_call!(dc1394_camera_enumerate(self.handle, &mut list));
        if list.is_null() {
            return Ok(Vec::new());
        }

        let guids = unsafe {
            let list = &*list;
            if list.ids.is_null() {
                Vec::new()
            } else {
                slice::from_raw_parts(list.ids, list.num as usize)
                    .iter()
                    .map(|id| Guid(id.guid))
                    .collect()
            }
        };
        unsafe { dc1394_camera_free_list(list) };
        Ok(guids)
    }

    fn open(&self, guid: Guid) -> Result<Libdc1394Device> {
        let camera = unsafe { dc1394_camera_new(self.handle, guid.0) };
        if camera.is_null() {
            return Err(Error::DeviceOpen(guid));
        }
        Ok(Libdc1394Device {
            camera,
            guid,
            dequeued: HashMap::new(),
        })
    }
}

/// Camera handle, `dc1394camera_t`
pub struct Libdc1394Device {
    camera: *mut dc1394camera_t,
    guid: Guid,
    /// Frames handed out by the DMA ring and not enqueued yet, by ring position
    dequeued: HashMap<usize, *mut dc1394video_frame_t>,
}

unsafe impl Send for Libdc1394Device {}

impl Drop for Libdc1394Device {
    fn drop(&mut self) {
        debug!("Freeing camera with GUID {:x}", self.guid);
        unsafe { dc1394_camera_free(self.camera) };
    }
}

impl Libdc1394Device {
    fn size_query(
        &self,
        query: unsafe extern "C" fn(
            *mut dc1394camera_t,
            dc1394video_mode_t::Type,
            *mut u32,
            *mut u32,
        ) -> dc1394error_t::Type,
        call: &'static str,
        mode: VideoMode,
    ) -> Result<(u32, u32)> {
        let (mut x, mut y) = (0, 0);
        let code = unsafe { query(self.camera, video_mode(mode), &mut x, &mut y) };
        if code != dc1394error_t::DC1394_SUCCESS {
            return Err(Error::Driver {
                call,
                code: code as i32,
            });
        }
        Ok((x, y))
    }
}

impl driver::Device for Libdc1394Device {
    fn guid(&self) -> Guid {
        self.guid
    }

    fn reset_bus(&mut self) -> Result<()> {
        checked_call!(dc1394_reset_bus(self.camera));
        Ok(())
    }

    fn release_iso_bandwidth(&mut self, units: u32) -> Result<()> {
        checked_call!(dc1394_iso_release_bandwidth(self.camera, units as _));
        Ok(())
    }

    fn release_iso_channel(&mut self, channel: u32) -> Result<()> {
        checked_call!(dc1394_iso_release_channel(self.camera, channel as _));
        Ok(())
    }

    fn set_operation_mode(&mut self, mode: OperationMode) -> Result<()> {
        checked_call!(dc1394_video_set_operation_mode(
            self.camera,
            u32::from(mode) as dc1394operation_mode_t::Type
        ));
        Ok(())
    }

    fn set_iso_speed(&mut self, speed: IsoSpeed) -> Result<()> {
        checked_call!(dc1394_video_set_iso_speed(
            self.camera,
            u32::from(speed) as dc1394speed_t::Type
        ));
        Ok(())
    }

    fn supported_modes(&self) -> Result<Vec<VideoMode>> {
        let mut modes: dc1394video_modes_t = unsafe { mem::zeroed() };
        checked_call!(dc1394_video_get_supported_modes(self.camera, &mut modes));
        Ok(modes.modes[..modes.num as usize]
            .iter()
            .map(|&mode| VideoMode(mode as u32))
            .collect())
    }

    fn mode_size(&self, mode: VideoMode) -> Result<(u32, u32)> {
        self.size_query(
            dc1394_get_image_size_from_video_mode,
            "dc1394_get_image_size_from_video_mode",
            mode,
        )
    }

    fn mode_coding(&self, mode: VideoMode) -> Result<ColorCoding> {
        let mut coding: dc1394color_coding_t::Type = 0;
        checked_call!(dc1394_get_color_coding_from_video_mode(
            self.camera,
            video_mode(mode),
            &mut coding
        ));
        Ok(ColorCoding::from(coding as u32))
    }

    fn supported_framerates(&self, mode: VideoMode) -> Result<Vec<Framerate>> {
        let mut rates: dc1394framerates_t = unsafe { mem::zeroed() };
        checked_call!(dc1394_video_get_supported_framerates(
            self.camera,
            video_mode(mode),
            &mut rates
        ));
        let mut rates: Vec<Framerate> = rates.framerates[..rates.num as usize]
            .iter()
            .filter_map(|&rate| Framerate::try_from(rate as u32).ok())
            .collect();
        rates.sort();
        Ok(rates)
    }

    fn set_framerate(&mut self, rate: Framerate) -> Result<()> {
        checked_call!(dc1394_video_set_framerate(
            self.camera,
            u32::from(rate) as dc1394framerate_t::Type
        ));
        Ok(())
    }

    fn set_video_mode(&mut self, mode: VideoMode) -> Result<()> {
        checked_call!(dc1394_video_set_mode(self.camera, video_mode(mode)));
        Ok(())
    }

    fn format7_max_size(&self, mode: VideoMode) -> Result<(u32, u32)> {
        self.size_query(
            dc1394_format7_get_max_image_size,
            "dc1394_format7_get_max_image_size",
            mode,
        )
    }

    fn format7_unit_position(&self, mode: VideoMode) -> Result<(u32, u32)> {
        self.size_query(
            dc1394_format7_get_unit_position,
            "dc1394_format7_get_unit_position",
            mode,
        )
    }

    fn format7_unit_size(&self, mode: VideoMode) -> Result<(u32, u32)> {
        self.size_query(
            dc1394_format7_get_unit_size,
            "dc1394_format7_get_unit_size",
            mode,
        )
    }

    fn format7_set_roi(&mut self, mode: VideoMode, roi: Roi) -> Result<()> {
        let packet_size = match roi.packet_size {
            PacketSize::MaxAvailable => DC1394_USE_MAX_AVAIL,
            PacketSize::Recommended => DC1394_USE_RECOMMENDED,
            PacketSize::Bytes(bytes) => bytes as i32,
        };
        checked_call!(dc1394_format7_set_roi(
            self.camera,
            video_mode(mode),
            u32::from(roi.coding) as dc1394color_coding_t::Type,
            packet_size,
            roi.left as i32,
            roi.top as i32,
            roi.width as i32,
            roi.height as i32
        ));
        Ok(())
    }

    fn format7_size(&self, mode: VideoMode) -> Result<(u32, u32)> {
        self.size_query(
            dc1394_format7_get_image_size,
            "dc1394_format7_get_image_size",
            mode,
        )
    }

    fn capture_setup(&mut self, buffers: u32, flags: CaptureFlags) -> Result<()> {
        checked_call!(dc1394_capture_setup(self.camera, buffers, flags.bits()));
        Ok(())
    }

    fn capture_stop(&mut self) -> Result<()> {
        self.dequeued.clear();
        checked_call!(dc1394_capture_stop(self.camera));
        Ok(())
    }

    fn dequeue(&mut self, policy: CapturePolicy) -> Result<Option<usize>> {
        let mut frame: *mut dc1394video_frame_t = ptr::null_mut();
        checked_call!(dc1394_capture_dequeue(
            self.camera,
            u32::from(policy) as dc1394capture_policy_t::Type,
            &mut frame
        ));
        if frame.is_null() {
            return Ok(None);
        }
        let slot = unsafe { (*frame).id } as usize;
        self.dequeued.insert(slot, frame);
        Ok(Some(slot))
    }

    fn frame(&self, slot: usize) -> Option<Frame<'_>> {
        let frame = unsafe { self.dequeued.get(&slot)?.as_ref()? };
        if frame.image.is_null() {
            return None;
        }
        let data = unsafe { slice::from_raw_parts(frame.image, frame.image_bytes as usize) };
        let meta = Metadata {
            id: frame.id,
            timestamp: frame.timestamp,
            frames_behind: frame.frames_behind,
        };
        Some(
            Frame::new(
                data,
                frame.size[0],
                frame.size[1],
                ColorCoding::from(frame.color_coding as u32),
            )
            .with_meta(meta),
        )
    }

    fn enqueue(&mut self, slot: usize) -> Result<()> {
        if let Some(frame) = self.dequeued.remove(&slot) {
            checked_call!(dc1394_capture_enqueue(self.camera, frame));
        }
        Ok(())
    }

    fn transmission(&self) -> Result<bool> {
        let mut state: dc1394switch_t::Type = dc1394switch_t::DC1394_OFF;
        checked_call!(dc1394_video_get_transmission(self.camera, &mut state));
        Ok(state == dc1394switch_t::DC1394_ON)
    }

    fn set_transmission(&mut self, on: bool) -> Result<()> {
        checked_call!(dc1394_video_set_transmission(self.camera, switch(on)));
        Ok(())
    }

    fn set_one_shot(&mut self, on: bool) -> Result<()> {
        checked_call!(dc1394_video_set_one_shot(self.camera, switch(on)));
        Ok(())
    }

    fn feature_value(&self, feature: Feature) -> Result<u32> {
        let mut value = 0;
        checked_call!(dc1394_feature_get_value(
            self.camera,
            feature_id(feature),
            &mut value
        ));
        Ok(value)
    }

    fn set_feature_value(&mut self, feature: Feature, value: u32) -> Result<()> {
        checked_call!(dc1394_feature_set_value(
            self.camera,
            feature_id(feature),
            value
        ));
        Ok(())
    }

    fn feature_boundaries(&self, feature: Feature) -> Result<feature::Range> {
        let (mut min, mut max) = (0, 0);
        checked_call!(dc1394_feature_get_boundaries(
            self.camera,
            feature_id(feature),
            &mut min,
            &mut max
        ));
        Ok(feature::Range::new(min, max))
    }

    fn feature_absolute_value(&self, feature: Feature) -> Result<f32> {
        let mut value = 0.0;
        checked_call!(dc1394_feature_get_absolute_value(
            self.camera,
            feature_id(feature),
            &mut value
        ));
        Ok(value)
    }

    fn set_feature_absolute_value(&mut self, feature: Feature, value: f32) -> Result<()> {
        checked_call!(dc1394_feature_set_absolute_value(
            self.camera,
            feature_id(feature),
            value
        ));
        Ok(())
    }

    fn set_feature_absolute_control(&mut self, feature: Feature, on: bool) -> Result<()> {
        checked_call!(dc1394_feature_set_absolute_control(
            self.camera,
            feature_id(feature),
            switch(on)
        ));
        Ok(())
    }

    fn set_feature_power(&mut self, feature: Feature, on: bool) -> Result<()> {
        checked_call!(dc1394_feature_set_power(
            self.camera,
            feature_id(feature),
            switch(on)
        ));
        Ok(())
    }

    fn set_feature_mode(&mut self, feature: Feature, mode: feature::Mode) -> Result<()> {
        checked_call!(dc1394_feature_set_mode(
            self.camera,
            feature_id(feature),
            u32::from(mode) as dc1394feature_mode_t::Type
        ));
        Ok(())
    }

    fn features(&self) -> Result<Vec<feature::Info>> {
        let mut set: dc1394featureset_t = unsafe { mem::zeroed() };
        checked_call!(dc1394_feature_get_all(self.camera, &mut set));

        Ok(set
            .feature
            .iter()
            .map(|info| {
                let available = info.available == dc1394bool_t::DC1394_TRUE;
                let absolute_capable = info.absolute_capable == dc1394bool_t::DC1394_TRUE;
                feature::Info {
                    feature: Feature::from(info.id as u32),
                    available,
                    readable: info.readout_capable == dc1394bool_t::DC1394_TRUE,
                    switchable: info.on_off_capable == dc1394bool_t::DC1394_TRUE,
                    absolute_capable,
                    on: info.is_on == dc1394switch_t::DC1394_ON,
                    mode: feature::Mode::try_from(info.current_mode as u32).ok(),
                    range: feature::Range::new(info.min, info.max),
                    value: info.value,
                    absolute: (available && absolute_capable).then_some(info.abs_value),
                }
            })
            .collect())
    }

    fn control_register(&self, offset: u64) -> Result<u32> {
        let mut value = 0;
        checked_call!(dc1394_get_control_registers(
            self.camera,
            offset,
            &mut value,
            1
        ));
        Ok(value)
    }

    fn set_control_register(&mut self, offset: u64, value: u32) -> Result<()> {
        checked_call!(dc1394_set_control_registers(
            self.camera,
            offset,
            &value,
            1
        ));
        Ok(())
    }
}
