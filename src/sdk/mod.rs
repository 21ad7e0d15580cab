//! Native SDK seam.
//!
//! The vendor SDK is a closed-source native library driven through a flat
//! function table: opaque handles in, integer status codes out, callbacks
//! delivered from threads the SDK owns. This module models that table as the
//! [`NativeSdk`] trait so the rest of the crate can be exercised against a
//! scriptable double ([`MockSdk`]) exactly the way it would run against the
//! real library.
//!
//! Design choices at this seam:
//!
//! - Opaque native handles become ownership-tagged tokens
//!   ([`ManagerToken`], [`CameraToken`], [`FrameToken`]) rather than raw
//!   pointers.
//! - The C "function pointer + user data" callback registration becomes a
//!   boxed sink; the bridge in [`crate::manager`] owns re-dispatch.
//! - Every fallible entry point returns the raw [`Status`]; translation into
//!   [`crate::Error`] happens at the wrapper call sites, never here.

mod mock;

pub use mock::MockSdk;

use bytes::Bytes;

use crate::camera::{IoProperties, PaletteEntry, ThermographyWindow};

/// Integer status code returned by every native call. Zero is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(i32);

impl Status {
    /// Status code signalling success.
    pub const SUCCESS: Status = Status(0);

    /// Wraps a raw native status code.
    pub const fn new(code: i32) -> Self {
        Status(code)
    }

    /// Returns the raw code.
    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// True for any non-zero code.
    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 != 0
    }
}

/// Result of a native call: the success payload or the non-zero status.
pub type NativeResult<T> = std::result::Result<T, Status>;

/// Opaque handle to a native camera manager context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManagerToken(pub u64);

/// Opaque handle to a native camera.
///
/// Token values are transport-level identities and may be reused by the
/// native layer across disconnect/reconnect cycles; device identity is the
/// chip ID, never the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraToken(pub u64);

/// Opaque handle to a native camera frame (one capture event, all formats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Sink for manager events, invoked on the native delivery thread.
///
/// Arguments are the raw camera handle, the raw event value
/// (connect = 0, disconnect = 1, error = 2, ready-to-pair = 3) and the
/// status code accompanying error events.
pub type EventSink = Box<dyn Fn(CameraToken, u32, Status) + Send + Sync>;

/// Sink for frame-available notifications, invoked on the native delivery
/// thread.
pub type FrameSink = Box<dyn Fn(CameraToken, FrameToken) + Send + Sync>;

/// Raw description of a single-format frame as reported by the native layer.
///
/// `buffer` holds the fixed-size frame header followed by `line_stride ×
/// height` pixel bytes, shared rather than copied ([`Bytes`]); an empty
/// buffer means the native layer reported a null/zero-size frame.
#[derive(Debug, Clone, Default)]
pub struct RawFrame {
    /// Frame width in image coordinates.
    pub width: u16,
    /// Frame height in image coordinates.
    pub height: u16,
    /// Number of interleaved image channels.
    pub channels: u8,
    /// Non-padding bit depth of each pixel.
    pub pixel_depth: u8,
    /// Padding bits stored between pixels.
    pub pixel_padding: u8,
    /// Total width of each row in bytes, including line padding.
    pub line_stride: u16,
    /// Padding bytes at the end of each row.
    pub line_padding: u16,
    /// Total size of the frame header in bytes.
    pub header_size: u16,
    /// Header bytes followed by pixel rows; empty when no data was produced.
    pub buffer: Bytes,
}

/// The vendor SDK function table.
///
/// One method per native entry point this crate consumes. Implementations
/// must be callable from any thread; the bridge performs its own locking
/// around shared bookkeeping.
pub trait NativeSdk: Send + Sync {
    // Manager context.

    /// Creates a discovery context for the given transport mask.
    fn manager_create(&self, discovery_mode: u32) -> NativeResult<ManagerToken>;
    /// Destroys a discovery context.
    fn manager_destroy(&self, manager: ManagerToken) -> NativeResult<()>;
    /// Registers the single event sink for a manager, replacing any previous
    /// registration.
    fn manager_register_event_callback(
        &self,
        manager: ManagerToken,
        sink: EventSink,
    ) -> NativeResult<()>;

    // Device identity.

    /// Reads the 16-byte chip identifier.
    fn chipid(&self, camera: CameraToken) -> NativeResult<[u8; 16]>;
    /// Reads the 16-byte serial number.
    fn serial_number(&self, camera: CameraToken) -> NativeResult<[u8; 16]>;
    /// Reads the 32-byte core part number.
    fn core_part_number(&self, camera: CameraToken) -> NativeResult<[u8; 32]>;
    /// Reads the firmware version as (product, variant, major, minor).
    fn firmware_version(&self, camera: CameraToken) -> NativeResult<[u8; 4]>;
    /// Reads the IO transport type bit (USB = 0x01, SPI = 0x02).
    fn io_type(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Reads transport-specific IO properties.
    fn io_properties(&self, camera: CameraToken) -> NativeResult<IoProperties>;

    // Scalar properties. Values are refreshed between frames by the device;
    // nothing here may be cached by callers.

    /// Gets the active color palette as its raw enum value.
    fn color_palette(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the active color palette.
    fn set_color_palette(&self, camera: CameraToken, palette: u32) -> NativeResult<()>;
    /// Gets the active pipeline mode as its raw enum value.
    fn pipeline_mode(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the active pipeline mode.
    fn set_pipeline_mode(&self, camera: CameraToken, mode: u32) -> NativeResult<()>;
    /// Gets the active AGC mode as its raw enum value.
    fn agc_mode(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the active AGC mode.
    fn set_agc_mode(&self, camera: CameraToken, mode: u32) -> NativeResult<()>;
    /// Gets the active shutter mode as its raw enum value.
    fn shutter_mode(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the active shutter mode.
    fn set_shutter_mode(&self, camera: CameraToken, mode: u32) -> NativeResult<()>;
    /// Gets the active temperature unit as its raw enum value.
    fn temperature_unit(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the active temperature unit.
    fn set_temperature_unit(&self, camera: CameraToken, unit: u32) -> NativeResult<()>;
    /// Gets the global scene emissivity.
    fn scene_emissivity(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the global scene emissivity.
    fn set_scene_emissivity(&self, camera: CameraToken, emissivity: f32) -> NativeResult<()>;
    /// Gets the thermography offset applied to every thermography pixel.
    fn thermography_offset(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the thermography offset.
    fn set_thermography_offset(&self, camera: CameraToken, offset: f32) -> NativeResult<()>;
    /// Gets the thermography window in image coordinates.
    fn thermography_window(&self, camera: CameraToken) -> NativeResult<ThermographyWindow>;
    /// Sets the thermography window.
    fn set_thermography_window(
        &self,
        camera: CameraToken,
        window: ThermographyWindow,
    ) -> NativeResult<()>;
    /// Gets the HistEQ AGC plateau value.
    fn histeq_agc_plateau(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the HistEQ AGC plateau value.
    fn set_histeq_agc_plateau(&self, camera: CameraToken, plateau: f32) -> NativeResult<()>;
    /// Gets the HistEQ AGC plateau redistribution mode as its raw enum value.
    fn histeq_agc_plateau_redistribution_mode(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the HistEQ AGC plateau redistribution mode.
    fn set_histeq_agc_plateau_redistribution_mode(
        &self,
        camera: CameraToken,
        mode: u32,
    ) -> NativeResult<()>;
    /// Gets the HistEQ AGC gain limit.
    fn histeq_agc_gain_limit(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the HistEQ AGC gain limit.
    fn set_histeq_agc_gain_limit(&self, camera: CameraToken, limit: f32) -> NativeResult<()>;
    /// Gets the HistEQ AGC gain limit factor mode as its raw enum value.
    fn histeq_agc_gain_limit_factor_mode(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the HistEQ AGC gain limit factor mode.
    fn set_histeq_agc_gain_limit_factor_mode(
        &self,
        camera: CameraToken,
        mode: u32,
    ) -> NativeResult<()>;
    /// Gets the HistEQ AGC gain limit factor xmax value.
    fn histeq_agc_gain_limit_factor_xmax(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the HistEQ AGC gain limit factor xmax value.
    fn set_histeq_agc_gain_limit_factor_xmax(
        &self,
        camera: CameraToken,
        xmax: u32,
    ) -> NativeResult<()>;
    /// Gets the HistEQ AGC gain limit factor ymin value.
    fn histeq_agc_gain_limit_factor_ymin(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the HistEQ AGC gain limit factor ymin value.
    fn set_histeq_agc_gain_limit_factor_ymin(
        &self,
        camera: CameraToken,
        ymin: f32,
    ) -> NativeResult<()>;
    /// Gets the HistEQ AGC alpha time in seconds.
    fn histeq_agc_alpha_time(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the HistEQ AGC alpha time in seconds.
    fn set_histeq_agc_alpha_time(&self, camera: CameraToken, alpha_time: f32) -> NativeResult<()>;
    /// Gets the HistEQ AGC histogram left trim percentage.
    fn histeq_agc_trim_left(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the HistEQ AGC histogram left trim percentage.
    fn set_histeq_agc_trim_left(&self, camera: CameraToken, trim: f32) -> NativeResult<()>;
    /// Gets the HistEQ AGC histogram right trim percentage.
    fn histeq_agc_trim_right(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the HistEQ AGC histogram right trim percentage.
    fn set_histeq_agc_trim_right(&self, camera: CameraToken, trim: f32) -> NativeResult<()>;
    /// Gets the left edge of the HistEQ AGC region of interest.
    fn histeq_agc_roi_left(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the left edge of the HistEQ AGC region of interest.
    fn set_histeq_agc_roi_left(&self, camera: CameraToken, left: u32) -> NativeResult<()>;
    /// Gets the top edge of the HistEQ AGC region of interest.
    fn histeq_agc_roi_top(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the top edge of the HistEQ AGC region of interest.
    fn set_histeq_agc_roi_top(&self, camera: CameraToken, top: u32) -> NativeResult<()>;
    /// Gets the width of the HistEQ AGC region of interest.
    fn histeq_agc_roi_width(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the width of the HistEQ AGC region of interest.
    fn set_histeq_agc_roi_width(&self, camera: CameraToken, width: u32) -> NativeResult<()>;
    /// Gets the height of the HistEQ AGC region of interest.
    fn histeq_agc_roi_height(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the height of the HistEQ AGC region of interest.
    fn set_histeq_agc_roi_height(&self, camera: CameraToken, height: u32) -> NativeResult<()>;
    /// Gets whether the HistEQ AGC region of interest is enabled (non-zero).
    fn histeq_agc_roi_enable(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets whether the HistEQ AGC region of interest is enabled.
    fn set_histeq_agc_roi_enable(&self, camera: CameraToken, enable: u32) -> NativeResult<()>;
    /// Gets the Linear AGC lock mode as its raw enum value.
    fn linear_agc_lock_mode(&self, camera: CameraToken) -> NativeResult<u32>;
    /// Sets the Linear AGC lock mode.
    fn set_linear_agc_lock_mode(&self, camera: CameraToken, mode: u32) -> NativeResult<()>;
    /// Gets the minimum Linear AGC lock value.
    fn linear_agc_lock_min(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the minimum Linear AGC lock value.
    fn set_linear_agc_lock_min(&self, camera: CameraToken, lock_min: f32) -> NativeResult<()>;
    /// Gets the maximum Linear AGC lock value.
    fn linear_agc_lock_max(&self, camera: CameraToken) -> NativeResult<f32>;
    /// Sets the maximum Linear AGC lock value.
    fn set_linear_agc_lock_max(&self, camera: CameraToken, lock_max: f32) -> NativeResult<()>;

    // Filters and palettes.

    /// Gets the state of an image processing filter.
    fn filter_state(&self, camera: CameraToken, filter: u32) -> NativeResult<u32>;
    /// Sets the state of an image processing filter.
    fn set_filter_state(&self, camera: CameraToken, filter: u32, state: u32) -> NativeResult<()>;
    /// Uploads the 256-entry color table for a palette slot.
    fn set_palette_data(
        &self,
        camera: CameraToken,
        palette: u32,
        data: &[PaletteEntry; 256],
    ) -> NativeResult<()>;

    // Capture session.

    /// Starts streaming frames in the formats given as a bitwise OR of
    /// format values. Combination constraints are enforced by the native
    /// layer, not here.
    fn capture_session_start(&self, camera: CameraToken, formats: u32) -> NativeResult<()>;
    /// Stops streaming frames.
    fn capture_session_stop(&self, camera: CameraToken) -> NativeResult<()>;
    /// Registers the single frame sink for a camera, replacing any previous
    /// registration.
    fn register_frame_available_callback(
        &self,
        camera: CameraToken,
        sink: FrameSink,
    ) -> NativeResult<()>;
    /// Triggers the shutter as soon as possible.
    fn shutter_trigger(&self, camera: CameraToken) -> NativeResult<()>;

    // Flat scene correction.

    /// Stores a flat scene correction under the given identifier.
    fn store_flat_scene_correction(&self, camera: CameraToken, fsc_id: u32) -> NativeResult<()>;
    /// Deletes a flat scene correction.
    fn delete_flat_scene_correction(&self, camera: CameraToken, fsc_id: u32) -> NativeResult<()>;

    // Frame access.

    /// Fetches the single-format frame of a camera frame, if that format was
    /// produced by the capture session. An absent format is a native error,
    /// never an empty frame.
    fn frame_get(&self, frame: FrameToken, format: u32) -> NativeResult<RawFrame>;
    /// Locks a camera frame for access beyond the delivering callback.
    fn frame_lock(&self, frame: FrameToken) -> NativeResult<()>;
    /// Unlocks a previously locked camera frame.
    fn frame_unlock(&self, frame: FrameToken) -> NativeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_success_is_not_error() {
        assert!(!Status::SUCCESS.is_error());
        assert!(Status::new(-7).is_error());
    }
}
