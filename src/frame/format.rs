//! Frame output formats.
//!
//! Format values are bit flags so a capture session can produce several
//! outputs per capture event. At most one "display" format and one
//! "thermography" format may be active per session (grayscale may combine
//! with one color display format); that constraint belongs to the native
//! layer and is deliberately not re-validated here.

use serde::{Deserialize, Serialize};

/// A single frame output format and how its raw bytes are reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum FrameFormat {
    /// Gain-corrected sensor counts, u16 per pixel.
    Corrected = 0x04,
    /// Sensor counts before AGC, u16 per pixel.
    PreAgc = 0x08,
    /// Thermography in degrees per the configured unit, f32 per pixel.
    ThermographyFloat = 0x10,
    /// Thermography as U10.6 fixed point, u16 per pixel.
    ThermographyFixed106 = 0x20,
    /// Post-AGC display image, u8 per pixel.
    Grayscale = 0x40,
    /// Color display image, 4 × u8 per pixel (A, R, G, B interleaved).
    ColorArgb8888 = 0x80,
    /// Color display image, packed u16 per pixel.
    ColorRgb565 = 0x100,
    /// Color display image, 4 × u8 per pixel (A, Y, U, V interleaved).
    ColorAyuv = 0x200,
    /// Color display image, 2 × u8 per pixel.
    ColorYuy2 = 0x400,
}

impl FrameFormat {
    /// All formats, in ascending wire-value order.
    pub const ALL: [FrameFormat; 9] = [
        FrameFormat::Corrected,
        FrameFormat::PreAgc,
        FrameFormat::ThermographyFloat,
        FrameFormat::ThermographyFixed106,
        FrameFormat::Grayscale,
        FrameFormat::ColorArgb8888,
        FrameFormat::ColorRgb565,
        FrameFormat::ColorAyuv,
        FrameFormat::ColorYuy2,
    ];

    /// Maps a raw format value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| *f as u32 == raw)
    }

    /// The number of interleaved channels implied by the format.
    pub const fn channels(self) -> u8 {
        match self {
            FrameFormat::ColorArgb8888 | FrameFormat::ColorAyuv => 4,
            FrameFormat::ColorYuy2 => 2,
            _ => 1,
        }
    }

    /// The size in bytes of one element of the typed pixel view.
    pub const fn element_size(self) -> usize {
        match self {
            FrameFormat::Grayscale
            | FrameFormat::ColorArgb8888
            | FrameFormat::ColorAyuv
            | FrameFormat::ColorYuy2 => 1,
            FrameFormat::ThermographyFloat => 4,
            _ => 2,
        }
    }
}

bitflags::bitflags! {
    /// Set of frame formats requested at capture-session start.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FrameFormats: u32 {
        /// See [`FrameFormat::Corrected`].
        const CORRECTED = 0x04;
        /// See [`FrameFormat::PreAgc`].
        const PRE_AGC = 0x08;
        /// See [`FrameFormat::ThermographyFloat`].
        const THERMOGRAPHY_FLOAT = 0x10;
        /// See [`FrameFormat::ThermographyFixed106`].
        const THERMOGRAPHY_FIXED_10_6 = 0x20;
        /// See [`FrameFormat::Grayscale`].
        const GRAYSCALE = 0x40;
        /// See [`FrameFormat::ColorArgb8888`].
        const COLOR_ARGB8888 = 0x80;
        /// See [`FrameFormat::ColorRgb565`].
        const COLOR_RGB565 = 0x100;
        /// See [`FrameFormat::ColorAyuv`].
        const COLOR_AYUV = 0x200;
        /// See [`FrameFormat::ColorYuy2`].
        const COLOR_YUY2 = 0x400;
    }
}

impl From<FrameFormat> for FrameFormats {
    fn from(format: FrameFormat) -> Self {
        FrameFormats::from_bits_truncate(format as u32)
    }
}

impl FromIterator<FrameFormat> for FrameFormats {
    fn from_iter<I: IntoIterator<Item = FrameFormat>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FrameFormats::empty(), |acc, f| acc | f.into())
    }
}
