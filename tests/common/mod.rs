//! In-memory IEEE-1394 bus used by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use dc1394::driver::{Device, Driver, Roi};
use dc1394::feature::{self, Feature};
use dc1394::{
    CaptureFlags, CapturePolicy, ColorCoding, Context, Error, Frame, Framerate, Guid, IsoSpeed,
    Metadata, OperationMode, Result, VideoMode,
};

pub const GUID: Guid = Guid(0x00b0_9d01_00a0_1a9a);

/// A fixed video mode offered by the fake camera
#[derive(Debug, Clone)]
pub struct FixedMode {
    pub mode: VideoMode,
    pub width: u32,
    pub height: u32,
    pub coding: ColorCoding,
    pub framerates: Vec<Framerate>,
}

#[derive(Debug, Clone, Copy)]
pub struct Format7 {
    pub max_size: (u32, u32),
    pub unit_position: (u32, u32),
    pub unit_size: (u32, u32),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureState {
    pub range: feature::Range,
    pub value: u32,
    pub absolute: f32,
    pub absolute_control: bool,
    pub on: bool,
    pub mode: Option<feature::Mode>,
}

/// State of the bus and of its only camera, shared between the test and the fake driver
#[derive(Debug, Default)]
pub struct Bus {
    pub guids: Vec<Guid>,
    pub modes: Vec<FixedMode>,
    pub format7: Option<Format7>,

    /// Driver handles created and destroyed
    pub created: usize,
    pub destroyed: usize,
    pub fail_connect: bool,

    /// Every device call, in order
    pub calls: Vec<String>,
    pub dequeues: usize,

    pub transmission: bool,
    pub capturing: bool,
    pub buffers: u32,
    pub video_mode: Option<VideoMode>,
    pub framerate: Option<Framerate>,
    pub roi: Option<Roi>,

    /// Frames waiting in the DMA ring
    pub queue: VecDeque<Vec<u8>>,

    pub features: HashMap<Feature, FeatureState>,
    pub registers: HashMap<u64, u32>,
}

pub type SharedBus = Arc<Mutex<Bus>>;

impl Bus {
    /// A bus without any camera
    pub fn empty() -> SharedBus {
        Arc::new(Mutex::new(Bus::default()))
    }

    /// A bus with one monochrome camera offering three fixed modes and Format7 mode 0
    pub fn mono_camera() -> SharedBus {
        let mut features = HashMap::new();
        for feature in [
            Feature::Brightness,
            Feature::Gamma,
            Feature::Gain,
            Feature::Exposure,
            Feature::Shutter,
        ] {
            features.insert(
                feature,
                FeatureState {
                    range: feature::Range::new(16, 1023),
                    value: 16,
                    mode: Some(feature::Mode::Auto),
                    ..Default::default()
                },
            );
        }

        let bus = Bus {
            guids: vec![GUID],
            modes: vec![
                FixedMode {
                    mode: VideoMode::MODE_640X480_MONO8,
                    width: 640,
                    height: 480,
                    coding: ColorCoding::Mono8,
                    framerates: vec![Framerate::Fps7_5, Framerate::Fps15, Framerate::Fps30],
                },
                FixedMode {
                    mode: VideoMode::MODE_1024X768_MONO8,
                    width: 1024,
                    height: 768,
                    coding: ColorCoding::Mono8,
                    framerates: vec![Framerate::Fps7_5, Framerate::Fps15],
                },
                FixedMode {
                    mode: VideoMode::MODE_160X120_YUV444,
                    width: 160,
                    height: 120,
                    coding: ColorCoding::Yuv444,
                    framerates: vec![Framerate::Fps30],
                },
            ],
            format7: Some(Format7 {
                max_size: (1280, 960),
                unit_position: (4, 2),
                unit_size: (8, 8),
            }),
            features,
            ..Default::default()
        };
        Arc::new(Mutex::new(bus))
    }
}

pub fn lock(bus: &SharedBus) -> MutexGuard<'_, Bus> {
    bus.lock().unwrap()
}

/// Queues `count` frames of `len` bytes, frame `i` filled with the value `i + 1`
pub fn queue_frames(bus: &SharedBus, count: usize, len: usize) {
    let mut bus = lock(bus);
    for i in 0..count {
        bus.queue.push_back(vec![(i + 1) as u8; len]);
    }
}

pub fn context(bus: &SharedBus) -> Arc<Context<FakeDriver>> {
    let bus = Arc::clone(bus);
    Context::new(move || FakeDriver::connect(&bus))
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct FakeDriver {
    bus: SharedBus,
}

impl FakeDriver {
    fn connect(bus: &SharedBus) -> Result<Self> {
        let mut state = lock(bus);
        if state.fail_connect {
            return Err(Error::ContextCreation);
        }
        state.created += 1;
        Ok(FakeDriver {
            bus: Arc::clone(bus),
        })
    }
}

impl Drop for FakeDriver {
    fn drop(&mut self) {
        lock(&self.bus).destroyed += 1;
    }
}

impl Driver for FakeDriver {
    type Device = FakeDevice;

    fn enumerate(&self) -> Result<Vec<Guid>> {
        Ok(lock(&self.bus).guids.clone())
    }

    fn open(&self, guid: Guid) -> Result<FakeDevice> {
        if !lock(&self.bus).guids.contains(&guid) {
            return Err(Error::DeviceOpen(guid));
        }
        Ok(FakeDevice {
            bus: Arc::clone(&self.bus),
            guid,
            coding: ColorCoding::Mono8,
            size: (0, 0),
            next_id: 0,
            dequeued: HashMap::new(),
        })
    }
}

pub struct FakeDevice {
    bus: SharedBus,
    guid: Guid,
    coding: ColorCoding,
    size: (u32, u32),
    next_id: u32,
    dequeued: HashMap<usize, (Vec<u8>, Metadata)>,
}

impl FakeDevice {
    fn record(&self, call: String) -> MutexGuard<'_, Bus> {
        let mut bus = lock(&self.bus);
        bus.calls.push(call);
        bus
    }

    fn fixed_mode(&self, mode: VideoMode) -> Result<FixedMode> {
        lock(&self.bus)
            .modes
            .iter()
            .find(|m| m.mode == mode)
            .cloned()
            .ok_or(Error::Driver {
                call: "fixed_mode",
                code: -1,
            })
    }

    fn format7(&self) -> Result<Format7> {
        lock(&self.bus).format7.ok_or(Error::Driver {
            call: "format7",
            code: -1,
        })
    }

    fn feature_state(&self, feature: Feature) -> Result<FeatureState> {
        lock(&self.bus)
            .features
            .get(&feature)
            .copied()
            .ok_or(Error::Driver {
                call: "feature",
                code: -1,
            })
    }

    fn update_feature(&self, feature: Feature, f: impl FnOnce(&mut FeatureState)) -> Result<()> {
        let mut bus = lock(&self.bus);
        let state = bus.features.get_mut(&feature).ok_or(Error::Driver {
            call: "feature",
            code: -1,
        })?;
        f(state);
        Ok(())
    }
}

impl Device for FakeDevice {
    fn guid(&self) -> Guid {
        self.guid
    }

    fn reset_bus(&mut self) -> Result<()> {
        self.record("reset_bus".to_string());
        Ok(())
    }

    fn release_iso_bandwidth(&mut self, units: u32) -> Result<()> {
        self.record(format!("release_iso_bandwidth({})", units));
        Ok(())
    }

    fn release_iso_channel(&mut self, channel: u32) -> Result<()> {
        self.record(format!("release_iso_channel({})", channel));
        Ok(())
    }

    fn set_operation_mode(&mut self, mode: OperationMode) -> Result<()> {
        self.record(format!("set_operation_mode({:?})", mode));
        Ok(())
    }

    fn set_iso_speed(&mut self, speed: IsoSpeed) -> Result<()> {
        self.record(format!("set_iso_speed({:?})", speed));
        Ok(())
    }

    fn supported_modes(&self) -> Result<Vec<VideoMode>> {
        let bus = lock(&self.bus);
        let mut modes: Vec<VideoMode> = bus.modes.iter().map(|m| m.mode).collect();
        if bus.format7.is_some() {
            modes.push(VideoMode::FORMAT7_0);
        }
        Ok(modes)
    }

    fn mode_size(&self, mode: VideoMode) -> Result<(u32, u32)> {
        let mode = self.fixed_mode(mode)?;
        Ok((mode.width, mode.height))
    }

    fn mode_coding(&self, mode: VideoMode) -> Result<ColorCoding> {
        Ok(self.fixed_mode(mode)?.coding)
    }

    fn supported_framerates(&self, mode: VideoMode) -> Result<Vec<Framerate>> {
        Ok(self.fixed_mode(mode)?.framerates)
    }

    fn set_framerate(&mut self, rate: Framerate) -> Result<()> {
        self.record(format!("set_framerate({:?})", rate)).framerate = Some(rate);
        Ok(())
    }

    fn set_video_mode(&mut self, mode: VideoMode) -> Result<()> {
        if mode.is_scalable() {
            let roi = lock(&self.bus).roi;
            if let Some(roi) = roi {
                self.coding = roi.coding;
                self.size = (roi.width, roi.height);
            }
        } else {
            let fixed = self.fixed_mode(mode)?;
            self.coding = fixed.coding;
            self.size = (fixed.width, fixed.height);
        }
        self.record(format!("set_video_mode({})", mode)).video_mode = Some(mode);
        Ok(())
    }

    fn format7_max_size(&self, _mode: VideoMode) -> Result<(u32, u32)> {
        Ok(self.format7()?.max_size)
    }

    fn format7_unit_position(&self, _mode: VideoMode) -> Result<(u32, u32)> {
        Ok(self.format7()?.unit_position)
    }

    fn format7_unit_size(&self, _mode: VideoMode) -> Result<(u32, u32)> {
        Ok(self.format7()?.unit_size)
    }

    fn format7_set_roi(&mut self, mode: VideoMode, roi: Roi) -> Result<()> {
        self.record(format!("format7_set_roi({})", mode)).roi = Some(roi);
        Ok(())
    }

    fn format7_size(&self, _mode: VideoMode) -> Result<(u32, u32)> {
        let bus = lock(&self.bus);
        let roi = bus.roi.ok_or(Error::Driver {
            call: "format7_size",
            code: -1,
        })?;
        Ok((roi.width, roi.height))
    }

    fn capture_setup(&mut self, buffers: u32, flags: CaptureFlags) -> Result<()> {
        let mut bus = self.record(format!("capture_setup({}, {:?})", buffers, flags));
        bus.capturing = true;
        bus.buffers = buffers;
        Ok(())
    }

    fn capture_stop(&mut self) -> Result<()> {
        self.dequeued.clear();
        self.record("capture_stop".to_string()).capturing = false;
        Ok(())
    }

    fn dequeue(&mut self, policy: CapturePolicy) -> Result<Option<usize>> {
        let data = {
            let mut bus = self.record(format!("dequeue({})", policy));
            bus.dequeues += 1;
            bus.queue.pop_front()
        };
        let data = match data {
            Some(data) => data,
            None => return Ok(None),
        };

        let id = self.next_id;
        self.next_id += 1;
        let meta = Metadata {
            id,
            timestamp: 1_000 * id as u64,
            frames_behind: lock(&self.bus).queue.len() as u32,
        };
        self.dequeued.insert(id as usize, (data, meta));
        Ok(Some(id as usize))
    }

    fn frame(&self, slot: usize) -> Option<Frame<'_>> {
        let (data, meta) = self.dequeued.get(&slot)?;
        Some(Frame::new(data, self.size.0, self.size.1, self.coding).with_meta(*meta))
    }

    fn enqueue(&mut self, slot: usize) -> Result<()> {
        self.dequeued.remove(&slot);
        self.record(format!("enqueue({})", slot));
        Ok(())
    }

    fn transmission(&self) -> Result<bool> {
        Ok(lock(&self.bus).transmission)
    }

    fn set_transmission(&mut self, on: bool) -> Result<()> {
        self.record(format!("set_transmission({})", on)).transmission = on;
        Ok(())
    }

    fn set_one_shot(&mut self, on: bool) -> Result<()> {
        let mut bus = self.record(format!("set_one_shot({})", on));
        if on {
            bus.queue.push_back(vec![0xee; 640 * 480]);
        }
        Ok(())
    }

    fn feature_value(&self, feature: Feature) -> Result<u32> {
        Ok(self.feature_state(feature)?.value)
    }

    fn set_feature_value(&mut self, feature: Feature, value: u32) -> Result<()> {
        self.record(format!("set_feature_value({}, {})", feature, value));
        self.update_feature(feature, |state| {
            state.value = value.clamp(state.range.min, state.range.max)
        })
    }

    fn feature_boundaries(&self, feature: Feature) -> Result<feature::Range> {
        Ok(self.feature_state(feature)?.range)
    }

    fn feature_absolute_value(&self, feature: Feature) -> Result<f32> {
        Ok(self.feature_state(feature)?.absolute)
    }

    fn set_feature_absolute_value(&mut self, feature: Feature, value: f32) -> Result<()> {
        self.record(format!("set_feature_absolute_value({}, {})", feature, value));
        self.update_feature(feature, |state| state.absolute = value)
    }

    fn set_feature_absolute_control(&mut self, feature: Feature, on: bool) -> Result<()> {
        self.record(format!("set_feature_absolute_control({}, {})", feature, on));
        self.update_feature(feature, |state| state.absolute_control = on)
    }

    fn set_feature_power(&mut self, feature: Feature, on: bool) -> Result<()> {
        self.record(format!("set_feature_power({}, {})", feature, on));
        self.update_feature(feature, |state| state.on = on)
    }

    fn set_feature_mode(&mut self, feature: Feature, mode: feature::Mode) -> Result<()> {
        self.record(format!("set_feature_mode({}, {})", feature, mode));
        self.update_feature(feature, |state| state.mode = Some(mode))
    }

    fn features(&self) -> Result<Vec<feature::Info>> {
        let bus = lock(&self.bus);
        let mut infos: Vec<feature::Info> = bus
            .features
            .iter()
            .map(|(&feature, state)| feature::Info {
                feature,
                available: true,
                readable: true,
                switchable: true,
                absolute_capable: true,
                on: state.on,
                mode: state.mode,
                range: state.range,
                value: state.value,
                absolute: Some(state.absolute),
            })
            .collect();
        infos.sort_by_key(|info| u32::from(info.feature));
        Ok(infos)
    }

    fn control_register(&self, offset: u64) -> Result<u32> {
        Ok(lock(&self.bus).registers.get(&offset).copied().unwrap_or(0))
    }

    fn set_control_register(&mut self, offset: u64, value: u32) -> Result<()> {
        self.record(format!("set_control_register({:#x}, {:#x})", offset, value))
            .registers
            .insert(offset, value);
        Ok(())
    }
}
