//! Device wrapper: identity, properties, filters, and capture sessions.
//!
//! A [`Camera`] pairs a native token with the chip ID read at bind time.
//! The chip ID is the device identity: tokens may be reissued across
//! disconnect/reconnect cycles, so equality compares chip IDs only. Every
//! other property is read live from the device on each call; the device
//! refreshes values between frames, so nothing besides identity is cached.

mod properties;

pub use properties::{
    AgcMode, ChipId, ColorPalette, Filter, FilterState, FirmwareVersion, FscId,
    HistEqAgcGainLimitFactorMode, HistEqAgcPlateauRedistributionMode, IoProperties, IoType,
    LinearAgcLockMode, PaletteData, PaletteEntry, PipelineMode, ShutterMode, TemperatureUnit,
    ThermographyWindow,
};

pub(crate) use properties::ascii_trim;

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::frame::{FrameBundle, FrameFormats};
use crate::sdk::{CameraToken, FrameSink, NativeSdk};

/// Receiver for frame-available notifications.
///
/// Invoked on the native delivery thread. The bundle is valid for the
/// duration of the call unless [`FrameBundle::lock`] is taken. Closures with
/// the matching signature implement this trait directly.
pub trait FrameObserver: Send + Sync {
    /// Called once per capture event with all requested formats.
    fn on_frame(&self, camera: &Camera, frame: &FrameBundle);
}

impl<F> FrameObserver for F
where
    F: Fn(&Camera, &FrameBundle) + Send + Sync,
{
    fn on_frame(&self, camera: &Camera, frame: &FrameBundle) {
        self(camera, frame)
    }
}

/// A connected (or pairable) thermal camera.
///
/// Cheap to clone; clones share the native token and sdk handle.
#[derive(Clone)]
pub struct Camera {
    sdk: Arc<dyn NativeSdk>,
    token: CameraToken,
    chip_id: ChipId,
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("token", &self.token)
            .field("chip_id", &self.chip_id.to_string())
            .finish()
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chip_id.fmt(f)
    }
}

impl PartialEq for Camera {
    fn eq(&self, other: &Self) -> bool {
        self.chip_id == other.chip_id
    }
}

impl Eq for Camera {}

impl Camera {
    /// Binds a native token, reading the chip ID once as the device identity.
    pub(crate) fn bind(sdk: Arc<dyn NativeSdk>, token: CameraToken) -> Result<Self> {
        let chip_id = ChipId::new(sdk.chipid(token)?);
        Ok(Camera {
            sdk,
            token,
            chip_id,
        })
    }

    /// The native token currently backing this camera.
    pub fn token(&self) -> CameraToken {
        self.token
    }

    /// The chip ID read when the camera was bound.
    pub fn chip_id(&self) -> ChipId {
        self.chip_id
    }

    /// Reads the serial number from the device.
    pub fn serial_number(&self) -> Result<String> {
        Ok(ascii_trim(&self.sdk.serial_number(self.token)?))
    }

    /// Reads the core part number from the device.
    pub fn core_part_number(&self) -> Result<String> {
        Ok(ascii_trim(&self.sdk.core_part_number(self.token)?))
    }

    /// Reads the firmware version from the device.
    pub fn firmware_version(&self) -> Result<FirmwareVersion> {
        Ok(FirmwareVersion::from_bytes(
            self.sdk.firmware_version(self.token)?,
        ))
    }

    /// Reads the IO transport type from the device.
    pub fn io_type(&self) -> Result<IoType> {
        let raw = self.sdk.io_type(self.token)?;
        IoType::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Reads transport-specific IO properties from the device.
    pub fn io_properties(&self) -> Result<IoProperties> {
        Ok(self.sdk.io_properties(self.token)?)
    }

    /// Gets the active color palette.
    pub fn color_palette(&self) -> Result<ColorPalette> {
        let raw = self.sdk.color_palette(self.token)?;
        ColorPalette::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the active color palette.
    pub fn set_color_palette(&self, palette: ColorPalette) -> Result<()> {
        Ok(self.sdk.set_color_palette(self.token, palette as u32)?)
    }

    /// Uploads the color table for one of the user palette slots.
    pub fn set_color_palette_data(
        &self,
        palette: ColorPalette,
        data: &PaletteData,
    ) -> Result<()> {
        Ok(self
            .sdk
            .set_palette_data(self.token, palette as u32, data.entries())?)
    }

    /// Gets the active image pipeline mode.
    pub fn pipeline_mode(&self) -> Result<PipelineMode> {
        let raw = self.sdk.pipeline_mode(self.token)?;
        PipelineMode::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the active image pipeline mode.
    pub fn set_pipeline_mode(&self, mode: PipelineMode) -> Result<()> {
        Ok(self.sdk.set_pipeline_mode(self.token, mode as u32)?)
    }

    /// Gets the active AGC mode.
    pub fn agc_mode(&self) -> Result<AgcMode> {
        let raw = self.sdk.agc_mode(self.token)?;
        AgcMode::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the active AGC mode.
    pub fn set_agc_mode(&self, mode: AgcMode) -> Result<()> {
        Ok(self.sdk.set_agc_mode(self.token, mode as u32)?)
    }

    /// Gets the shutter control mode.
    pub fn shutter_mode(&self) -> Result<ShutterMode> {
        let raw = self.sdk.shutter_mode(self.token)?;
        ShutterMode::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the shutter control mode.
    pub fn set_shutter_mode(&self, mode: ShutterMode) -> Result<()> {
        Ok(self.sdk.set_shutter_mode(self.token, mode as u32)?)
    }

    /// Triggers the shutter as soon as possible, regardless of shutter mode.
    pub fn shutter_trigger(&self) -> Result<()> {
        Ok(self.sdk.shutter_trigger(self.token)?)
    }

    /// Gets the unit of thermography output.
    pub fn temperature_unit(&self) -> Result<TemperatureUnit> {
        let raw = self.sdk.temperature_unit(self.token)?;
        TemperatureUnit::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the unit of thermography output.
    pub fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<()> {
        Ok(self.sdk.set_temperature_unit(self.token, unit as u32)?)
    }

    /// Gets the global scene emissivity.
    pub fn scene_emissivity(&self) -> Result<f32> {
        Ok(self.sdk.scene_emissivity(self.token)?)
    }

    /// Sets the global scene emissivity.
    pub fn set_scene_emissivity(&self, emissivity: f32) -> Result<()> {
        Ok(self.sdk.set_scene_emissivity(self.token, emissivity)?)
    }

    /// Gets the offset added to every thermography pixel.
    pub fn thermography_offset(&self) -> Result<f32> {
        Ok(self.sdk.thermography_offset(self.token)?)
    }

    /// Sets the offset added to every thermography pixel.
    pub fn set_thermography_offset(&self, offset: f32) -> Result<()> {
        Ok(self.sdk.set_thermography_offset(self.token, offset)?)
    }

    /// Gets the window within which thermography data is valid.
    pub fn thermography_window(&self) -> Result<ThermographyWindow> {
        Ok(self.sdk.thermography_window(self.token)?)
    }

    /// Sets the window within which thermography data is valid.
    pub fn set_thermography_window(&self, window: ThermographyWindow) -> Result<()> {
        Ok(self.sdk.set_thermography_window(self.token, window)?)
    }

    /// Gets the HistEQ AGC plateau value.
    pub fn histeq_agc_plateau(&self) -> Result<f32> {
        Ok(self.sdk.histeq_agc_plateau(self.token)?)
    }

    /// Sets the HistEQ AGC plateau value.
    pub fn set_histeq_agc_plateau(&self, plateau: f32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_plateau(self.token, plateau)?)
    }

    /// Gets the HistEQ AGC plateau redistribution mode.
    pub fn histeq_agc_plateau_redistribution_mode(
        &self,
    ) -> Result<HistEqAgcPlateauRedistributionMode> {
        let raw = self.sdk.histeq_agc_plateau_redistribution_mode(self.token)?;
        HistEqAgcPlateauRedistributionMode::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the HistEQ AGC plateau redistribution mode.
    pub fn set_histeq_agc_plateau_redistribution_mode(
        &self,
        mode: HistEqAgcPlateauRedistributionMode,
    ) -> Result<()> {
        Ok(self
            .sdk
            .set_histeq_agc_plateau_redistribution_mode(self.token, mode as u32)?)
    }

    /// Gets the HistEQ AGC gain limit.
    pub fn histeq_agc_gain_limit(&self) -> Result<f32> {
        Ok(self.sdk.histeq_agc_gain_limit(self.token)?)
    }

    /// Sets the HistEQ AGC gain limit.
    pub fn set_histeq_agc_gain_limit(&self, limit: f32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_gain_limit(self.token, limit)?)
    }

    /// Gets the HistEQ AGC gain limit factor mode.
    pub fn histeq_agc_gain_limit_factor_mode(&self) -> Result<HistEqAgcGainLimitFactorMode> {
        let raw = self.sdk.histeq_agc_gain_limit_factor_mode(self.token)?;
        HistEqAgcGainLimitFactorMode::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the HistEQ AGC gain limit factor mode.
    pub fn set_histeq_agc_gain_limit_factor_mode(
        &self,
        mode: HistEqAgcGainLimitFactorMode,
    ) -> Result<()> {
        Ok(self
            .sdk
            .set_histeq_agc_gain_limit_factor_mode(self.token, mode as u32)?)
    }

    /// Gets the HistEQ AGC gain limit factor xmax value.
    pub fn histeq_agc_gain_limit_factor_xmax(&self) -> Result<u32> {
        Ok(self.sdk.histeq_agc_gain_limit_factor_xmax(self.token)?)
    }

    /// Sets the HistEQ AGC gain limit factor xmax value.
    pub fn set_histeq_agc_gain_limit_factor_xmax(&self, xmax: u32) -> Result<()> {
        Ok(self
            .sdk
            .set_histeq_agc_gain_limit_factor_xmax(self.token, xmax)?)
    }

    /// Gets the HistEQ AGC gain limit factor ymin value.
    pub fn histeq_agc_gain_limit_factor_ymin(&self) -> Result<f32> {
        Ok(self.sdk.histeq_agc_gain_limit_factor_ymin(self.token)?)
    }

    /// Sets the HistEQ AGC gain limit factor ymin value.
    pub fn set_histeq_agc_gain_limit_factor_ymin(&self, ymin: f32) -> Result<()> {
        Ok(self
            .sdk
            .set_histeq_agc_gain_limit_factor_ymin(self.token, ymin)?)
    }

    /// Gets the HistEQ AGC alpha time in seconds.
    pub fn histeq_agc_alpha_time(&self) -> Result<f32> {
        Ok(self.sdk.histeq_agc_alpha_time(self.token)?)
    }

    /// Sets the HistEQ AGC alpha time in seconds.
    pub fn set_histeq_agc_alpha_time(&self, alpha_time: f32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_alpha_time(self.token, alpha_time)?)
    }

    /// Gets the HistEQ AGC histogram left trim percentage.
    pub fn histeq_agc_trim_left(&self) -> Result<f32> {
        Ok(self.sdk.histeq_agc_trim_left(self.token)?)
    }

    /// Sets the HistEQ AGC histogram left trim percentage.
    pub fn set_histeq_agc_trim_left(&self, trim: f32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_trim_left(self.token, trim)?)
    }

    /// Gets the HistEQ AGC histogram right trim percentage.
    pub fn histeq_agc_trim_right(&self) -> Result<f32> {
        Ok(self.sdk.histeq_agc_trim_right(self.token)?)
    }

    /// Sets the HistEQ AGC histogram right trim percentage.
    pub fn set_histeq_agc_trim_right(&self, trim: f32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_trim_right(self.token, trim)?)
    }

    /// Gets the left edge of the HistEQ AGC region of interest.
    pub fn histeq_agc_roi_left(&self) -> Result<u32> {
        Ok(self.sdk.histeq_agc_roi_left(self.token)?)
    }

    /// Sets the left edge of the HistEQ AGC region of interest.
    pub fn set_histeq_agc_roi_left(&self, left: u32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_roi_left(self.token, left)?)
    }

    /// Gets the top edge of the HistEQ AGC region of interest.
    pub fn histeq_agc_roi_top(&self) -> Result<u32> {
        Ok(self.sdk.histeq_agc_roi_top(self.token)?)
    }

    /// Sets the top edge of the HistEQ AGC region of interest.
    pub fn set_histeq_agc_roi_top(&self, top: u32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_roi_top(self.token, top)?)
    }

    /// Gets the width of the HistEQ AGC region of interest.
    pub fn histeq_agc_roi_width(&self) -> Result<u32> {
        Ok(self.sdk.histeq_agc_roi_width(self.token)?)
    }

    /// Sets the width of the HistEQ AGC region of interest.
    pub fn set_histeq_agc_roi_width(&self, width: u32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_roi_width(self.token, width)?)
    }

    /// Gets the height of the HistEQ AGC region of interest.
    pub fn histeq_agc_roi_height(&self) -> Result<u32> {
        Ok(self.sdk.histeq_agc_roi_height(self.token)?)
    }

    /// Sets the height of the HistEQ AGC region of interest.
    pub fn set_histeq_agc_roi_height(&self, height: u32) -> Result<()> {
        Ok(self.sdk.set_histeq_agc_roi_height(self.token, height)?)
    }

    /// Gets whether the HistEQ AGC region of interest is enabled.
    pub fn histeq_agc_roi_enable(&self) -> Result<bool> {
        Ok(self.sdk.histeq_agc_roi_enable(self.token)? != 0)
    }

    /// Sets whether the HistEQ AGC region of interest is enabled.
    pub fn set_histeq_agc_roi_enable(&self, enable: bool) -> Result<()> {
        Ok(self
            .sdk
            .set_histeq_agc_roi_enable(self.token, u32::from(enable))?)
    }

    /// Gets the Linear AGC lock mode.
    pub fn linear_agc_lock_mode(&self) -> Result<LinearAgcLockMode> {
        let raw = self.sdk.linear_agc_lock_mode(self.token)?;
        LinearAgcLockMode::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the Linear AGC lock mode.
    pub fn set_linear_agc_lock_mode(&self, mode: LinearAgcLockMode) -> Result<()> {
        Ok(self.sdk.set_linear_agc_lock_mode(self.token, mode as u32)?)
    }

    /// Gets the minimum Linear AGC lock value.
    pub fn linear_agc_lock_min(&self) -> Result<f32> {
        Ok(self.sdk.linear_agc_lock_min(self.token)?)
    }

    /// Sets the minimum Linear AGC lock value.
    pub fn set_linear_agc_lock_min(&self, lock_min: f32) -> Result<()> {
        Ok(self.sdk.set_linear_agc_lock_min(self.token, lock_min)?)
    }

    /// Gets the maximum Linear AGC lock value.
    pub fn linear_agc_lock_max(&self) -> Result<f32> {
        Ok(self.sdk.linear_agc_lock_max(self.token)?)
    }

    /// Sets the maximum Linear AGC lock value.
    pub fn set_linear_agc_lock_max(&self, lock_max: f32) -> Result<()> {
        Ok(self.sdk.set_linear_agc_lock_max(self.token, lock_max)?)
    }

    /// Gets the state of an image processing filter.
    pub fn filter_state(&self, filter: Filter) -> Result<FilterState> {
        let raw = self.sdk.filter_state(self.token, filter as u32)?;
        FilterState::from_raw(raw).ok_or(Error::Unrecognized(raw as i32))
    }

    /// Sets the state of an image processing filter.
    pub fn set_filter_state(&self, filter: Filter, state: FilterState) -> Result<()> {
        Ok(self
            .sdk
            .set_filter_state(self.token, filter as u32, state as u32)?)
    }

    /// Stores a flat scene correction from the current (flat) scene.
    pub fn store_flat_scene_correction(&self, fsc_id: FscId) -> Result<()> {
        Ok(self.sdk.store_flat_scene_correction(self.token, fsc_id as u32)?)
    }

    /// Deletes a stored flat scene correction.
    pub fn delete_flat_scene_correction(&self, fsc_id: FscId) -> Result<()> {
        Ok(self
            .sdk
            .delete_flat_scene_correction(self.token, fsc_id as u32)?)
    }

    /// Starts streaming frames in every format of the given set.
    ///
    /// Format combination constraints (one thermography format, one color
    /// display format) are enforced by the native layer.
    pub fn capture_session_start(&self, formats: FrameFormats) -> Result<()> {
        tracing::debug!(camera = %self.chip_id, formats = ?formats, "starting capture session");
        Ok(self.sdk.capture_session_start(self.token, formats.bits())?)
    }

    /// Stops streaming frames.
    pub fn capture_session_stop(&self) -> Result<()> {
        tracing::debug!(camera = %self.chip_id, "stopping capture session");
        Ok(self.sdk.capture_session_stop(self.token)?)
    }

    /// Registers the frame receiver for this camera, silently replacing any
    /// previous registration.
    pub fn register_frame_available_callback(
        &self,
        observer: impl FrameObserver + 'static,
    ) -> Result<()> {
        let camera = self.clone();
        let sdk = self.sdk.clone();
        let sink: FrameSink = Box::new(move |_token, frame_token| {
            tracing::debug!(camera = %camera, ?frame_token, "dispatching frame");
            let bundle = FrameBundle::new(sdk.clone(), frame_token);
            observer.on_frame(&camera, &bundle);
        });
        Ok(self
            .sdk
            .register_frame_available_callback(self.token, sink)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use bytes::Bytes;

    use crate::frame::{FrameFormat, HEADER_SIZE};
    use crate::sdk::{MockSdk, RawFrame, Status};

    fn bound(sdk: &Arc<MockSdk>, chip: &str) -> Camera {
        let token = sdk.connect(chip);
        Camera::bind(sdk.clone(), token).unwrap()
    }

    #[test]
    fn test_equality_is_chip_id_not_token() {
        let sdk = Arc::new(MockSdk::new());
        let first = bound(&sdk, "E497B28C2D2C");
        let second = bound(&sdk, "E497B28C2D2C");
        assert_ne!(first.token(), second.token());
        assert_eq!(first, second);

        let other = bound(&sdk, "AA00BB11CC22");
        assert_ne!(first, other);
    }

    #[test]
    fn test_identity_getters_read_live_values() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");
        assert_eq!(camera.chip_id().to_string(), "E497B28C2D2C");
        assert_eq!(camera.serial_number().unwrap(), "E497B28C2D2C");
        assert_eq!(camera.core_part_number().unwrap(), "DEV-CORE-0000");
        assert_eq!(camera.firmware_version().unwrap().to_string(), "1.0.7.2");
        assert_eq!(camera.io_type().unwrap(), IoType::Usb);
        assert!(matches!(
            camera.io_properties().unwrap(),
            IoProperties::Usb { bus_number: 1, .. }
        ));
    }

    #[test]
    fn test_enum_properties_round_trip() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");

        camera.set_color_palette(ColorPalette::Iron).unwrap();
        assert_eq!(camera.color_palette().unwrap(), ColorPalette::Iron);

        camera.set_pipeline_mode(PipelineMode::Legacy).unwrap();
        assert_eq!(camera.pipeline_mode().unwrap(), PipelineMode::Legacy);

        camera.set_agc_mode(AgcMode::Linear).unwrap();
        assert_eq!(camera.agc_mode().unwrap(), AgcMode::Linear);

        camera.set_shutter_mode(ShutterMode::Manual).unwrap();
        assert_eq!(camera.shutter_mode().unwrap(), ShutterMode::Manual);

        camera
            .set_temperature_unit(TemperatureUnit::Kelvin)
            .unwrap();
        assert_eq!(
            camera.temperature_unit().unwrap(),
            TemperatureUnit::Kelvin
        );

        camera
            .set_linear_agc_lock_mode(LinearAgcLockMode::ManualMin)
            .unwrap();
        assert_eq!(
            camera.linear_agc_lock_mode().unwrap(),
            LinearAgcLockMode::ManualMin
        );
    }

    #[test]
    fn test_scalar_properties_round_trip() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");

        camera.set_scene_emissivity(0.85).unwrap();
        assert_eq!(camera.scene_emissivity().unwrap(), 0.85);

        camera.set_thermography_offset(-1.5).unwrap();
        assert_eq!(camera.thermography_offset().unwrap(), -1.5);

        let window = ThermographyWindow {
            x: 10,
            y: 20,
            width: 100,
            height: 80,
        };
        camera.set_thermography_window(window).unwrap();
        assert_eq!(camera.thermography_window().unwrap(), window);

        camera.set_linear_agc_lock_min(-10.0).unwrap();
        camera.set_linear_agc_lock_max(150.0).unwrap();
        assert_eq!(camera.linear_agc_lock_min().unwrap(), -10.0);
        assert_eq!(camera.linear_agc_lock_max().unwrap(), 150.0);
    }

    #[test]
    fn test_histeq_agc_properties_round_trip() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");

        camera.set_histeq_agc_plateau(0.02).unwrap();
        assert_eq!(camera.histeq_agc_plateau().unwrap(), 0.02);

        camera
            .set_histeq_agc_plateau_redistribution_mode(
                HistEqAgcPlateauRedistributionMode::ActiveBinsOnly,
            )
            .unwrap();
        assert_eq!(
            camera.histeq_agc_plateau_redistribution_mode().unwrap(),
            HistEqAgcPlateauRedistributionMode::ActiveBinsOnly
        );

        camera.set_histeq_agc_gain_limit(4.0).unwrap();
        assert_eq!(camera.histeq_agc_gain_limit().unwrap(), 4.0);

        camera
            .set_histeq_agc_gain_limit_factor_mode(HistEqAgcGainLimitFactorMode::Manual)
            .unwrap();
        assert_eq!(
            camera.histeq_agc_gain_limit_factor_mode().unwrap(),
            HistEqAgcGainLimitFactorMode::Manual
        );

        camera.set_histeq_agc_gain_limit_factor_xmax(8000).unwrap();
        assert_eq!(camera.histeq_agc_gain_limit_factor_xmax().unwrap(), 8000);

        camera.set_histeq_agc_gain_limit_factor_ymin(0.4).unwrap();
        assert_eq!(camera.histeq_agc_gain_limit_factor_ymin().unwrap(), 0.4);

        camera.set_histeq_agc_alpha_time(1.5).unwrap();
        assert_eq!(camera.histeq_agc_alpha_time().unwrap(), 1.5);

        camera.set_histeq_agc_trim_left(0.5).unwrap();
        camera.set_histeq_agc_trim_right(1.0).unwrap();
        assert_eq!(camera.histeq_agc_trim_left().unwrap(), 0.5);
        assert_eq!(camera.histeq_agc_trim_right().unwrap(), 1.0);

        camera.set_histeq_agc_roi_left(16).unwrap();
        camera.set_histeq_agc_roi_top(12).unwrap();
        camera.set_histeq_agc_roi_width(160).unwrap();
        camera.set_histeq_agc_roi_height(120).unwrap();
        assert_eq!(camera.histeq_agc_roi_left().unwrap(), 16);
        assert_eq!(camera.histeq_agc_roi_top().unwrap(), 12);
        assert_eq!(camera.histeq_agc_roi_width().unwrap(), 160);
        assert_eq!(camera.histeq_agc_roi_height().unwrap(), 120);

        assert!(!camera.histeq_agc_roi_enable().unwrap());
        camera.set_histeq_agc_roi_enable(true).unwrap();
        assert!(camera.histeq_agc_roi_enable().unwrap());
    }

    #[test]
    fn test_filter_state_round_trip() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");
        assert_eq!(
            camera.filter_state(Filter::SharpenCorrection).unwrap(),
            FilterState::Disabled
        );
        camera
            .set_filter_state(Filter::SharpenCorrection, FilterState::Enabled)
            .unwrap();
        assert_eq!(
            camera.filter_state(Filter::SharpenCorrection).unwrap(),
            FilterState::Enabled
        );
    }

    #[test]
    fn test_palette_data_upload_round_trips_every_entry() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");

        // 256 distinct (b, g, r, a) tuples.
        let mut entries = [(0u8, 0u8, 0u8, 0u8); 256];
        for (i, entry) in entries.iter_mut().enumerate() {
            let i = i as u8;
            *entry = (i, i.wrapping_add(1), i.wrapping_add(2), 255 - i);
        }
        let data = PaletteData::from_bgra(entries);

        camera
            .set_color_palette_data(ColorPalette::User0, &data)
            .unwrap();
        let stored = sdk
            .palette_table(camera.token(), ColorPalette::User0 as u32)
            .unwrap();
        assert_eq!(&stored, data.entries());
    }

    #[test]
    fn test_flat_scene_correction_store_and_delete() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");
        camera.store_flat_scene_correction(FscId::Id0).unwrap();
        assert_eq!(sdk.stored_fscs(camera.token()), vec![0]);
        camera.delete_flat_scene_correction(FscId::Id0).unwrap();
        assert!(sdk.stored_fscs(camera.token()).is_empty());
    }

    #[test]
    fn test_capture_session_passes_format_mask() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");
        let formats: FrameFormats = [FrameFormat::Grayscale, FrameFormat::ThermographyFloat]
            .into_iter()
            .collect();
        camera.capture_session_start(formats).unwrap();
        assert_eq!(sdk.capture_formats(camera.token()), Some(0x50));
        camera.capture_session_stop().unwrap();
        assert_eq!(sdk.capture_formats(camera.token()), None);
    }

    #[test]
    fn test_frame_callback_receives_bundle() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let observer_seen = seen.clone();
        camera
            .register_frame_available_callback(move |camera: &Camera, frame: &FrameBundle| {
                let gray = frame.grayscale().unwrap();
                observer_seen
                    .lock()
                    .unwrap()
                    .push((camera.chip_id(), gray.width(), gray.height()));
            })
            .unwrap();

        let mut buffer = vec![0u8; HEADER_SIZE];
        buffer.extend_from_slice(&[0x11; 8 * 4]);
        let raw = RawFrame {
            width: 8,
            height: 4,
            channels: 1,
            pixel_depth: 8,
            pixel_padding: 0,
            line_stride: 8,
            line_padding: 0,
            header_size: HEADER_SIZE as u16,
            buffer: Bytes::from(buffer),
        };
        let frame = sdk.stage_frame(camera.token(), vec![(FrameFormat::Grayscale as u32, raw)]);
        sdk.deliver_frame(camera.token(), frame);

        let frames = seen.lock().unwrap().clone();
        assert_eq!(frames, vec![(ChipId::from("E497B28C2D2C"), 8, 4)]);
    }

    #[test]
    fn test_native_failures_surface_as_errors() {
        let sdk = Arc::new(MockSdk::new());
        let camera = bound(&sdk, "E497B28C2D2C");
        sdk.fail_all(Status::new(-7));
        assert!(matches!(camera.serial_number(), Err(Error::Timeout)));
        assert!(matches!(camera.color_palette(), Err(Error::Timeout)));
        assert!(matches!(
            camera.set_agc_mode(AgcMode::Linear),
            Err(Error::Timeout)
        ));
        assert!(matches!(camera.shutter_trigger(), Err(Error::Timeout)));
    }
}
