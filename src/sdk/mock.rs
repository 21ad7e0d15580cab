//! Scriptable in-memory stand-in for the native SDK.
//!
//! [`MockSdk`] implements the full [`NativeSdk`] table over a mutex-guarded
//! state map, plus driver methods for tests to plug cameras in and out, fail
//! calls, stage frames, and inspect what the bridge did. Sinks are invoked
//! with the state lock released, the same re-entrancy the real library
//! exposes: a sink may call straight back into the SDK.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::camera::{ChipId, IoProperties, PaletteEntry, ThermographyWindow};

use super::{
    CameraToken, EventSink, FrameSink, FrameToken, ManagerToken, NativeResult, NativeSdk,
    RawFrame, Status,
};

const EVENT_CONNECT: u32 = 0;
const EVENT_DISCONNECT: u32 = 1;
const EVENT_ERROR: u32 = 2;
const EVENT_READY_TO_PAIR: u32 = 3;

const STATUS_INVALID_PARAMETER: Status = Status::new(-2);
const STATUS_DEVICE_NOT_FOUND: Status = Status::new(-5);

fn padded<const N: usize>(src: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    for (dst, byte) in out.iter_mut().zip(src) {
        *dst = *byte;
    }
    out
}

struct CameraState {
    chipid: [u8; 16],
    serial_number: [u8; 16],
    core_part_number: [u8; 32],
    firmware_version: [u8; 4],
    io_type: u32,
    io_properties: IoProperties,
    color_palette: u32,
    pipeline_mode: u32,
    agc_mode: u32,
    histeq_agc_plateau: f32,
    histeq_agc_plateau_redistribution_mode: u32,
    histeq_agc_gain_limit: f32,
    histeq_agc_gain_limit_factor_mode: u32,
    histeq_agc_gain_limit_factor_xmax: u32,
    histeq_agc_gain_limit_factor_ymin: f32,
    histeq_agc_alpha_time: f32,
    histeq_agc_trim_left: f32,
    histeq_agc_trim_right: f32,
    histeq_agc_roi_left: u32,
    histeq_agc_roi_top: u32,
    histeq_agc_roi_width: u32,
    histeq_agc_roi_height: u32,
    histeq_agc_roi_enable: u32,
    shutter_mode: u32,
    temperature_unit: u32,
    scene_emissivity: f32,
    thermography_offset: f32,
    thermography_window: ThermographyWindow,
    linear_agc_lock_mode: u32,
    linear_agc_lock_min: f32,
    linear_agc_lock_max: f32,
    filter_states: HashMap<u32, u32>,
    palette_tables: HashMap<u32, [PaletteEntry; 256]>,
    capture_formats: Option<u32>,
    stored_fscs: Vec<u32>,
}

impl CameraState {
    fn new(chipid: [u8; 16]) -> Self {
        CameraState {
            chipid,
            serial_number: chipid,
            core_part_number: padded(b"DEV-CORE-0000"),
            firmware_version: [1, 0, 7, 2],
            io_type: 0x01,
            io_properties: IoProperties::Usb {
                bus_number: 1,
                port_numbers: [1, 2, 0, 0, 0, 0, 0, 0],
            },
            color_palette: 0,
            pipeline_mode: 2,
            agc_mode: 1,
            histeq_agc_plateau: 0.0,
            histeq_agc_plateau_redistribution_mode: 0,
            histeq_agc_gain_limit: 0.0,
            histeq_agc_gain_limit_factor_mode: 0,
            histeq_agc_gain_limit_factor_xmax: 0,
            histeq_agc_gain_limit_factor_ymin: 0.0,
            histeq_agc_alpha_time: 0.0,
            histeq_agc_trim_left: 0.0,
            histeq_agc_trim_right: 0.0,
            histeq_agc_roi_left: 0,
            histeq_agc_roi_top: 0,
            histeq_agc_roi_width: 0,
            histeq_agc_roi_height: 0,
            histeq_agc_roi_enable: 0,
            shutter_mode: 0,
            temperature_unit: 0,
            scene_emissivity: 0.97,
            thermography_offset: 0.0,
            thermography_window: ThermographyWindow::default(),
            linear_agc_lock_mode: 0,
            linear_agc_lock_min: 0.0,
            linear_agc_lock_max: 0.0,
            filter_states: HashMap::new(),
            palette_tables: HashMap::new(),
            capture_formats: None,
            stored_fscs: Vec::new(),
        }
    }
}

struct FrameState {
    camera: CameraToken,
    formats: HashMap<u32, RawFrame>,
    locked: bool,
}

#[derive(Default)]
struct Inner {
    fail_with: Option<Status>,
    calls: Vec<String>,
    next_token: u64,
    managers: Vec<ManagerToken>,
    event_sinks: HashMap<ManagerToken, Arc<EventSink>>,
    frame_sinks: HashMap<CameraToken, Arc<FrameSink>>,
    cameras: HashMap<CameraToken, CameraState>,
    frames: HashMap<FrameToken, FrameState>,
}

impl Inner {
    fn next(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

/// In-memory [`NativeSdk`] implementation for tests.
#[derive(Default)]
pub struct MockSdk {
    inner: Mutex<Inner>,
}

impl MockSdk {
    /// Creates an SDK with no cameras attached.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Every trait method funnels through here: record the call, then apply
    // the scripted failure if one is set.
    fn enter<'a>(&'a self, name: &str) -> NativeResult<MutexGuard<'a, Inner>> {
        let mut inner = self.lock();
        inner.calls.push(name.to_string());
        match inner.fail_with {
            Some(status) => Err(status),
            None => Ok(inner),
        }
    }

    fn with_camera<T>(
        &self,
        name: &str,
        camera: CameraToken,
        op: impl FnOnce(&mut CameraState) -> T,
    ) -> NativeResult<T> {
        let mut inner = self.enter(name)?;
        let state = inner
            .cameras
            .get_mut(&camera)
            .ok_or(STATUS_DEVICE_NOT_FOUND)?;
        Ok(op(state))
    }

    fn fire_event(&self, camera: CameraToken, event: u32, status: Status) {
        let sinks: Vec<Arc<EventSink>> = {
            let inner = self.lock();
            inner.event_sinks.values().cloned().collect()
        };
        // Lock released; sinks may re-enter.
        for sink in sinks {
            sink(camera, event, status);
        }
    }

    // Test drivers.

    /// Makes every subsequent native call fail with `status`.
    pub fn fail_all(&self, status: Status) {
        self.lock().fail_with = Some(status);
    }

    /// Clears a scripted failure.
    pub fn clear_failure(&self) {
        self.lock().fail_with = None;
    }

    /// The names of every native call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Plugs in a paired camera and fires a connect event.
    pub fn connect(&self, chip: &str) -> CameraToken {
        self.attach(chip, EVENT_CONNECT)
    }

    /// Plugs in an unpaired camera and fires a ready-to-pair event.
    pub fn ready_to_pair(&self, chip: &str) -> CameraToken {
        self.attach(chip, EVENT_READY_TO_PAIR)
    }

    fn attach(&self, chip: &str, event: u32) -> CameraToken {
        let token = {
            let mut inner = self.lock();
            let token = CameraToken(inner.next());
            let chipid = *ChipId::from(chip).as_bytes();
            inner.cameras.insert(token, CameraState::new(chipid));
            token
        };
        self.fire_event(token, event, Status::SUCCESS);
        token
    }

    /// Unplugs a camera, firing the disconnect event before dropping its
    /// state so sinks can still reach the device while they run.
    pub fn disconnect(&self, camera: CameraToken) {
        self.fire_event(camera, EVENT_DISCONNECT, Status::SUCCESS);
        let mut inner = self.lock();
        inner.cameras.remove(&camera);
        inner.frame_sinks.remove(&camera);
    }

    /// Fires an error event for a camera without changing any state.
    pub fn emit_error(&self, camera: CameraToken, status: Status) {
        self.fire_event(camera, EVENT_ERROR, status);
    }

    /// Stages the per-format frames of one capture event.
    pub fn stage_frame(&self, camera: CameraToken, frames: Vec<(u32, RawFrame)>) -> FrameToken {
        let mut inner = self.lock();
        let token = FrameToken(inner.next());
        inner.frames.insert(
            token,
            FrameState {
                camera,
                formats: frames.into_iter().collect(),
                locked: false,
            },
        );
        token
    }

    /// Delivers a staged frame to the camera's frame sink, if registered.
    pub fn deliver_frame(&self, camera: CameraToken, frame: FrameToken) {
        let sink: Option<Arc<FrameSink>> = {
            let inner = self.lock();
            inner.frame_sinks.get(&camera).cloned()
        };
        if let Some(sink) = sink {
            sink(camera, frame);
        }
    }

    /// True while a manager context created by [`NativeSdk::manager_create`]
    /// is still alive.
    pub fn manager_alive(&self, manager: ManagerToken) -> bool {
        self.lock().managers.contains(&manager)
    }

    /// The capture format mask of a running session, if one is active.
    pub fn capture_formats(&self, camera: CameraToken) -> Option<u32> {
        self.lock()
            .cameras
            .get(&camera)
            .and_then(|c| c.capture_formats)
    }

    /// The color table last uploaded for a palette slot.
    pub fn palette_table(&self, camera: CameraToken, palette: u32) -> Option<[PaletteEntry; 256]> {
        self.lock()
            .cameras
            .get(&camera)
            .and_then(|c| c.palette_tables.get(&palette).copied())
    }

    /// The flat scene correction identifiers currently stored.
    pub fn stored_fscs(&self, camera: CameraToken) -> Vec<u32> {
        self.lock()
            .cameras
            .get(&camera)
            .map(|c| c.stored_fscs.clone())
            .unwrap_or_default()
    }

    /// True while a staged frame is locked.
    pub fn frame_locked(&self, frame: FrameToken) -> bool {
        self.lock().frames.get(&frame).is_some_and(|f| f.locked)
    }
}

impl NativeSdk for MockSdk {
    fn manager_create(&self, _discovery_mode: u32) -> NativeResult<ManagerToken> {
        let mut inner = self.enter("manager_create")?;
        let token = ManagerToken(inner.next());
        inner.managers.push(token);
        Ok(token)
    }

    fn manager_destroy(&self, manager: ManagerToken) -> NativeResult<()> {
        let mut inner = self.enter("manager_destroy")?;
        let index = inner
            .managers
            .iter()
            .position(|m| *m == manager)
            .ok_or(STATUS_INVALID_PARAMETER)?;
        inner.managers.remove(index);
        inner.event_sinks.remove(&manager);
        Ok(())
    }

    fn manager_register_event_callback(
        &self,
        manager: ManagerToken,
        sink: EventSink,
    ) -> NativeResult<()> {
        let mut inner = self.enter("manager_register_event_callback")?;
        if !inner.managers.contains(&manager) {
            return Err(STATUS_INVALID_PARAMETER);
        }
        inner.event_sinks.insert(manager, Arc::new(sink));
        Ok(())
    }

    fn chipid(&self, camera: CameraToken) -> NativeResult<[u8; 16]> {
        self.with_camera("chipid", camera, |c| c.chipid)
    }

    fn serial_number(&self, camera: CameraToken) -> NativeResult<[u8; 16]> {
        self.with_camera("serial_number", camera, |c| c.serial_number)
    }

    fn core_part_number(&self, camera: CameraToken) -> NativeResult<[u8; 32]> {
        self.with_camera("core_part_number", camera, |c| c.core_part_number)
    }

    fn firmware_version(&self, camera: CameraToken) -> NativeResult<[u8; 4]> {
        self.with_camera("firmware_version", camera, |c| c.firmware_version)
    }

    fn io_type(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("io_type", camera, |c| c.io_type)
    }

    fn io_properties(&self, camera: CameraToken) -> NativeResult<IoProperties> {
        self.with_camera("io_properties", camera, |c| c.io_properties)
    }

    fn color_palette(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("color_palette", camera, |c| c.color_palette)
    }

    fn set_color_palette(&self, camera: CameraToken, palette: u32) -> NativeResult<()> {
        self.with_camera("set_color_palette", camera, |c| c.color_palette = palette)
    }

    fn pipeline_mode(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("pipeline_mode", camera, |c| c.pipeline_mode)
    }

    fn set_pipeline_mode(&self, camera: CameraToken, mode: u32) -> NativeResult<()> {
        self.with_camera("set_pipeline_mode", camera, |c| c.pipeline_mode = mode)
    }

    fn agc_mode(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("agc_mode", camera, |c| c.agc_mode)
    }

    fn set_agc_mode(&self, camera: CameraToken, mode: u32) -> NativeResult<()> {
        self.with_camera("set_agc_mode", camera, |c| c.agc_mode = mode)
    }

    fn shutter_mode(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("shutter_mode", camera, |c| c.shutter_mode)
    }

    fn set_shutter_mode(&self, camera: CameraToken, mode: u32) -> NativeResult<()> {
        self.with_camera("set_shutter_mode", camera, |c| c.shutter_mode = mode)
    }

    fn temperature_unit(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("temperature_unit", camera, |c| c.temperature_unit)
    }

    fn set_temperature_unit(&self, camera: CameraToken, unit: u32) -> NativeResult<()> {
        self.with_camera("set_temperature_unit", camera, |c| c.temperature_unit = unit)
    }

    fn scene_emissivity(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("scene_emissivity", camera, |c| c.scene_emissivity)
    }

    fn set_scene_emissivity(&self, camera: CameraToken, emissivity: f32) -> NativeResult<()> {
        self.with_camera("set_scene_emissivity", camera, |c| {
            c.scene_emissivity = emissivity
        })
    }

    fn thermography_offset(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("thermography_offset", camera, |c| c.thermography_offset)
    }

    fn set_thermography_offset(&self, camera: CameraToken, offset: f32) -> NativeResult<()> {
        self.with_camera("set_thermography_offset", camera, |c| {
            c.thermography_offset = offset
        })
    }

    fn thermography_window(&self, camera: CameraToken) -> NativeResult<ThermographyWindow> {
        self.with_camera("thermography_window", camera, |c| c.thermography_window)
    }

    fn set_thermography_window(
        &self,
        camera: CameraToken,
        window: ThermographyWindow,
    ) -> NativeResult<()> {
        self.with_camera("set_thermography_window", camera, |c| {
            c.thermography_window = window
        })
    }

    fn histeq_agc_plateau(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("histeq_agc_plateau", camera, |c| c.histeq_agc_plateau)
    }

    fn set_histeq_agc_plateau(&self, camera: CameraToken, plateau: f32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_plateau", camera, |c| {
            c.histeq_agc_plateau = plateau
        })
    }

    fn histeq_agc_plateau_redistribution_mode(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("histeq_agc_plateau_redistribution_mode", camera, |c| {
            c.histeq_agc_plateau_redistribution_mode
        })
    }

    fn set_histeq_agc_plateau_redistribution_mode(
        &self,
        camera: CameraToken,
        mode: u32,
    ) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_plateau_redistribution_mode", camera, |c| {
            c.histeq_agc_plateau_redistribution_mode = mode
        })
    }

    fn histeq_agc_gain_limit(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("histeq_agc_gain_limit", camera, |c| c.histeq_agc_gain_limit)
    }

    fn set_histeq_agc_gain_limit(&self, camera: CameraToken, limit: f32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_gain_limit", camera, |c| {
            c.histeq_agc_gain_limit = limit
        })
    }

    fn histeq_agc_gain_limit_factor_mode(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("histeq_agc_gain_limit_factor_mode", camera, |c| {
            c.histeq_agc_gain_limit_factor_mode
        })
    }

    fn set_histeq_agc_gain_limit_factor_mode(
        &self,
        camera: CameraToken,
        mode: u32,
    ) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_gain_limit_factor_mode", camera, |c| {
            c.histeq_agc_gain_limit_factor_mode = mode
        })
    }

    fn histeq_agc_gain_limit_factor_xmax(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("histeq_agc_gain_limit_factor_xmax", camera, |c| {
            c.histeq_agc_gain_limit_factor_xmax
        })
    }

    fn set_histeq_agc_gain_limit_factor_xmax(
        &self,
        camera: CameraToken,
        xmax: u32,
    ) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_gain_limit_factor_xmax", camera, |c| {
            c.histeq_agc_gain_limit_factor_xmax = xmax
        })
    }

    fn histeq_agc_gain_limit_factor_ymin(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("histeq_agc_gain_limit_factor_ymin", camera, |c| {
            c.histeq_agc_gain_limit_factor_ymin
        })
    }

    fn set_histeq_agc_gain_limit_factor_ymin(
        &self,
        camera: CameraToken,
        ymin: f32,
    ) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_gain_limit_factor_ymin", camera, |c| {
            c.histeq_agc_gain_limit_factor_ymin = ymin
        })
    }

    fn histeq_agc_alpha_time(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("histeq_agc_alpha_time", camera, |c| c.histeq_agc_alpha_time)
    }

    fn set_histeq_agc_alpha_time(&self, camera: CameraToken, alpha_time: f32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_alpha_time", camera, |c| {
            c.histeq_agc_alpha_time = alpha_time
        })
    }

    fn histeq_agc_trim_left(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("histeq_agc_trim_left", camera, |c| c.histeq_agc_trim_left)
    }

    fn set_histeq_agc_trim_left(&self, camera: CameraToken, trim: f32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_trim_left", camera, |c| {
            c.histeq_agc_trim_left = trim
        })
    }

    fn histeq_agc_trim_right(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("histeq_agc_trim_right", camera, |c| c.histeq_agc_trim_right)
    }

    fn set_histeq_agc_trim_right(&self, camera: CameraToken, trim: f32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_trim_right", camera, |c| {
            c.histeq_agc_trim_right = trim
        })
    }

    fn histeq_agc_roi_left(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("histeq_agc_roi_left", camera, |c| c.histeq_agc_roi_left)
    }

    fn set_histeq_agc_roi_left(&self, camera: CameraToken, left: u32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_roi_left", camera, |c| {
            c.histeq_agc_roi_left = left
        })
    }

    fn histeq_agc_roi_top(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("histeq_agc_roi_top", camera, |c| c.histeq_agc_roi_top)
    }

    fn set_histeq_agc_roi_top(&self, camera: CameraToken, top: u32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_roi_top", camera, |c| {
            c.histeq_agc_roi_top = top
        })
    }

    fn histeq_agc_roi_width(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("histeq_agc_roi_width", camera, |c| c.histeq_agc_roi_width)
    }

    fn set_histeq_agc_roi_width(&self, camera: CameraToken, width: u32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_roi_width", camera, |c| {
            c.histeq_agc_roi_width = width
        })
    }

    fn histeq_agc_roi_height(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("histeq_agc_roi_height", camera, |c| c.histeq_agc_roi_height)
    }

    fn set_histeq_agc_roi_height(&self, camera: CameraToken, height: u32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_roi_height", camera, |c| {
            c.histeq_agc_roi_height = height
        })
    }

    fn histeq_agc_roi_enable(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("histeq_agc_roi_enable", camera, |c| c.histeq_agc_roi_enable)
    }

    fn set_histeq_agc_roi_enable(&self, camera: CameraToken, enable: u32) -> NativeResult<()> {
        self.with_camera("set_histeq_agc_roi_enable", camera, |c| {
            c.histeq_agc_roi_enable = enable
        })
    }

    fn linear_agc_lock_mode(&self, camera: CameraToken) -> NativeResult<u32> {
        self.with_camera("linear_agc_lock_mode", camera, |c| c.linear_agc_lock_mode)
    }

    fn set_linear_agc_lock_mode(&self, camera: CameraToken, mode: u32) -> NativeResult<()> {
        self.with_camera("set_linear_agc_lock_mode", camera, |c| {
            c.linear_agc_lock_mode = mode
        })
    }

    fn linear_agc_lock_min(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("linear_agc_lock_min", camera, |c| c.linear_agc_lock_min)
    }

    fn set_linear_agc_lock_min(&self, camera: CameraToken, lock_min: f32) -> NativeResult<()> {
        self.with_camera("set_linear_agc_lock_min", camera, |c| {
            c.linear_agc_lock_min = lock_min
        })
    }

    fn linear_agc_lock_max(&self, camera: CameraToken) -> NativeResult<f32> {
        self.with_camera("linear_agc_lock_max", camera, |c| c.linear_agc_lock_max)
    }

    fn set_linear_agc_lock_max(&self, camera: CameraToken, lock_max: f32) -> NativeResult<()> {
        self.with_camera("set_linear_agc_lock_max", camera, |c| {
            c.linear_agc_lock_max = lock_max
        })
    }

    fn filter_state(&self, camera: CameraToken, filter: u32) -> NativeResult<u32> {
        self.with_camera("filter_state", camera, |c| {
            c.filter_states.get(&filter).copied().unwrap_or(0)
        })
    }

    fn set_filter_state(&self, camera: CameraToken, filter: u32, state: u32) -> NativeResult<()> {
        self.with_camera("set_filter_state", camera, |c| {
            c.filter_states.insert(filter, state);
        })
    }

    fn set_palette_data(
        &self,
        camera: CameraToken,
        palette: u32,
        data: &[PaletteEntry; 256],
    ) -> NativeResult<()> {
        self.with_camera("set_palette_data", camera, |c| {
            c.palette_tables.insert(palette, *data);
        })
    }

    fn capture_session_start(&self, camera: CameraToken, formats: u32) -> NativeResult<()> {
        self.with_camera("capture_session_start", camera, |c| {
            c.capture_formats = Some(formats)
        })
    }

    fn capture_session_stop(&self, camera: CameraToken) -> NativeResult<()> {
        self.with_camera("capture_session_stop", camera, |c| c.capture_formats = None)
    }

    fn register_frame_available_callback(
        &self,
        camera: CameraToken,
        sink: FrameSink,
    ) -> NativeResult<()> {
        let mut inner = self.enter("register_frame_available_callback")?;
        if !inner.cameras.contains_key(&camera) {
            return Err(STATUS_DEVICE_NOT_FOUND);
        }
        inner.frame_sinks.insert(camera, Arc::new(sink));
        Ok(())
    }

    fn shutter_trigger(&self, camera: CameraToken) -> NativeResult<()> {
        self.with_camera("shutter_trigger", camera, |_| ())
    }

    fn store_flat_scene_correction(&self, camera: CameraToken, fsc_id: u32) -> NativeResult<()> {
        self.with_camera("store_flat_scene_correction", camera, |c| {
            if !c.stored_fscs.contains(&fsc_id) {
                c.stored_fscs.push(fsc_id);
            }
        })
    }

    fn delete_flat_scene_correction(&self, camera: CameraToken, fsc_id: u32) -> NativeResult<()> {
        self.with_camera("delete_flat_scene_correction", camera, |c| {
            c.stored_fscs.retain(|id| *id != fsc_id);
        })
    }

    fn frame_get(&self, frame: FrameToken, format: u32) -> NativeResult<RawFrame> {
        let inner = self.enter("frame_get")?;
        let state = inner.frames.get(&frame).ok_or(STATUS_INVALID_PARAMETER)?;
        state
            .formats
            .get(&format)
            .cloned()
            .ok_or(STATUS_INVALID_PARAMETER)
    }

    fn frame_lock(&self, frame: FrameToken) -> NativeResult<()> {
        let mut inner = self.enter("frame_lock")?;
        let state = inner.frames.get_mut(&frame).ok_or(STATUS_INVALID_PARAMETER)?;
        state.locked = true;
        Ok(())
    }

    fn frame_unlock(&self, frame: FrameToken) -> NativeResult<()> {
        let mut inner = self.enter("frame_unlock")?;
        let state = inner.frames.get_mut(&frame).ok_or(STATUS_INVALID_PARAMETER)?;
        state.locked = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_fires_registered_event_sink() {
        let sdk = MockSdk::new();
        let manager = sdk.manager_create(0x01).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        sdk.manager_register_event_callback(
            manager,
            Box::new(move |camera, event, status| {
                sink_seen.lock().unwrap().push((camera, event, status));
            }),
        )
        .unwrap();

        let camera = sdk.connect("CHIP0001");
        let events = seen.lock().unwrap().clone();
        assert_eq!(events, vec![(camera, EVENT_CONNECT, Status::SUCCESS)]);
    }

    #[test]
    fn test_event_sink_may_reenter_the_sdk() {
        let sdk = Arc::new(MockSdk::new());
        let manager = sdk.manager_create(0x01).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink_sdk = sdk.clone();
        sdk.manager_register_event_callback(
            manager,
            Box::new(move |camera, _event, _status| {
                let chip = sink_sdk.chipid(camera).unwrap();
                sink_seen.lock().unwrap().push(chip);
            }),
        )
        .unwrap();

        sdk.connect("CHIP0001");
        let chips = seen.lock().unwrap().clone();
        assert_eq!(chips, vec![*ChipId::from("CHIP0001").as_bytes()]);
    }

    #[test]
    fn test_scripted_failure_gates_every_call() {
        let sdk = MockSdk::new();
        let camera = sdk.connect("CHIP0001");
        sdk.fail_all(Status::new(-7));
        assert_eq!(sdk.chipid(camera), Err(Status::new(-7)));
        assert_eq!(sdk.manager_create(0x01), Err(Status::new(-7)));
        sdk.clear_failure();
        assert!(sdk.chipid(camera).is_ok());
    }

    #[test]
    fn test_disconnect_drops_camera_state() {
        let sdk = MockSdk::new();
        let camera = sdk.connect("CHIP0001");
        sdk.disconnect(camera);
        assert_eq!(sdk.chipid(camera), Err(STATUS_DEVICE_NOT_FOUND));
    }

    #[test]
    fn test_calls_are_recorded_in_order() {
        let sdk = MockSdk::new();
        let camera = sdk.connect("CHIP0001");
        sdk.shutter_trigger(camera).unwrap();
        sdk.capture_session_stop(camera).unwrap();
        assert_eq!(sdk.calls(), vec!["shutter_trigger", "capture_session_stop"]);
    }
}
