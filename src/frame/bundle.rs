//! Per-capture frame access.
//!
//! Each capture event yields one [`FrameBundle`] holding every format the
//! session was started with. The bundle stays valid for the duration of the
//! delivering callback; callers that keep it longer lock it first and unlock
//! when done.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::frame::{Frame, FrameFormat};
use crate::sdk::{FrameToken, NativeSdk};

/// All formats produced by one capture event.
#[derive(Clone)]
pub struct FrameBundle {
    sdk: Arc<dyn NativeSdk>,
    token: FrameToken,
}

impl fmt::Debug for FrameBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBundle")
            .field("token", &self.token)
            .finish()
    }
}

impl FrameBundle {
    pub(crate) fn new(sdk: Arc<dyn NativeSdk>, token: FrameToken) -> Self {
        FrameBundle { sdk, token }
    }

    /// The native frame handle backing this bundle.
    pub fn token(&self) -> FrameToken {
        self.token
    }

    /// Fetches the frame for one format of this capture event.
    ///
    /// A format the session was not started with is a native error, surfaced
    /// as the corresponding [`crate::Error`] variant.
    pub fn get(&self, format: FrameFormat) -> Result<Frame> {
        let raw = self.sdk.frame_get(self.token, format as u32)?;
        Ok(Frame::new(raw, Some(format)))
    }

    /// The gain-corrected frame.
    pub fn corrected(&self) -> Result<Frame> {
        self.get(FrameFormat::Corrected)
    }

    /// The pre-AGC frame.
    pub fn pre_agc(&self) -> Result<Frame> {
        self.get(FrameFormat::PreAgc)
    }

    /// The floating-point thermography frame.
    pub fn thermography_float(&self) -> Result<Frame> {
        self.get(FrameFormat::ThermographyFloat)
    }

    /// The U10.6 fixed-point thermography frame.
    pub fn thermography_fixed_10_6(&self) -> Result<Frame> {
        self.get(FrameFormat::ThermographyFixed106)
    }

    /// The grayscale display frame.
    pub fn grayscale(&self) -> Result<Frame> {
        self.get(FrameFormat::Grayscale)
    }

    /// The ARGB8888 display frame.
    pub fn color_argb8888(&self) -> Result<Frame> {
        self.get(FrameFormat::ColorArgb8888)
    }

    /// The RGB565 display frame.
    pub fn color_rgb565(&self) -> Result<Frame> {
        self.get(FrameFormat::ColorRgb565)
    }

    /// The AYUV display frame.
    pub fn color_ayuv(&self) -> Result<Frame> {
        self.get(FrameFormat::ColorAyuv)
    }

    /// The YUY2 display frame.
    pub fn color_yuy2(&self) -> Result<Frame> {
        self.get(FrameFormat::ColorYuy2)
    }

    /// Locks the bundle for access beyond the delivering callback.
    pub fn lock(&self) -> Result<()> {
        self.sdk.frame_lock(self.token)?;
        Ok(())
    }

    /// Unlocks a previously locked bundle.
    pub fn unlock(&self) -> Result<()> {
        self.sdk.frame_unlock(self.token)?;
        Ok(())
    }
}
