//! Enumerated device properties and identity value types.
//!
//! Enum discriminants are the exact wire values of the native SDK. Getters
//! construct them permissively through `from_raw`, which returns `None` for
//! values this crate does not know; setters pass the discriminant through
//! unchanged. Because setters take the enum types themselves, passing a plain
//! integer where a variant is required is rejected at compile time rather
//! than deep inside the native layer.

use std::fmt;

/// Stable 16-byte identifier of a physical sensor.
///
/// This is the equality key for devices: a disconnect/reconnect cycle may
/// hand out a different native token for the same hardware, so identity is
/// always compared on chip ID bytes, never on token values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChipId([u8; 16]);

impl ChipId {
    /// Wraps the raw 16-byte identifier as read from the native layer.
    pub const fn new(bytes: [u8; 16]) -> Self {
        ChipId(bytes)
    }

    /// The raw fixed-capacity bytes, including any NUL padding.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<&str> for ChipId {
    /// Builds a chip ID from an ASCII string, NUL-padded or truncated to the
    /// fixed 16-byte capacity.
    fn from(s: &str) -> Self {
        let mut bytes = [0u8; 16];
        for (dst, src) in bytes.iter_mut().zip(s.bytes()) {
            *dst = src;
        }
        ChipId(bytes)
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ascii_trim(&self.0))
    }
}

/// Decodes a fixed-capacity ASCII field, stopping at the first NUL.
pub(crate) fn ascii_trim(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Firmware version of a camera, read from the device or a frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirmwareVersion {
    /// Product firmware version.
    pub product: u8,
    /// Variant firmware version.
    pub variant: u8,
    /// Major firmware version.
    pub major: u8,
    /// Minor firmware version.
    pub minor: u8,
}

impl FirmwareVersion {
    /// Builds a version from the packed 4-byte wire representation.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        FirmwareVersion {
            product: bytes[0],
            variant: bytes[1],
            major: bytes[2],
            minor: bytes[3],
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.product, self.variant, self.major, self.minor
        )
    }
}

/// IO transport of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum IoType {
    /// USB transport.
    Usb = 0x01,
    /// SPI transport.
    Spi = 0x02,
}

impl IoType {
    /// Maps a raw transport value, returning `None` for unknown bits.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0x01 => Some(IoType::Usb),
            0x02 => Some(IoType::Spi),
            _ => None,
        }
    }
}

/// Transport-specific IO properties of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoProperties {
    /// Properties of a USB camera.
    Usb {
        /// USB bus number on which the camera is connected.
        bus_number: u8,
        /// USB port chain; valid entries are strictly greater than zero.
        port_numbers: [u8; 8],
    },
    /// Properties of an SPI camera.
    Spi {
        /// SPI bus number from the SPI configuration file.
        bus_number: u8,
        /// SPI chip select number from the SPI configuration file.
        cs_number: u8,
    },
}

/// Sub-rectangle of the frame within which thermography data is valid.
///
/// Coordinates are image coordinates with the origin at the upper-left
/// corner of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThermographyWindow {
    /// Window origin, x coordinate.
    pub x: u32,
    /// Window origin, y coordinate.
    pub y: u32,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
}

/// Display color palettes used to colorize the thermal image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum ColorPalette {
    WhiteHot = 0,
    BlackHot = 1,
    Spectra = 2,
    Prism = 3,
    Tyrian = 4,
    Iron = 5,
    Amber = 6,
    Hi = 7,
    Green = 8,
    User0 = 9,
    User1 = 10,
    User2 = 11,
    User3 = 12,
    User4 = 13,
}

impl ColorPalette {
    /// Maps a raw palette value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        use ColorPalette::*;
        Some(match raw {
            0 => WhiteHot,
            1 => BlackHot,
            2 => Spectra,
            3 => Prism,
            4 => Tyrian,
            5 => Iron,
            6 => Amber,
            7 => Hi,
            8 => Green,
            9 => User0,
            10 => User1,
            11 => User2,
            12 => User3,
            13 => User4,
            _ => return None,
        })
    }
}

/// One color table entry in (b, g, r, a) channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteEntry {
    /// Blue channel.
    pub b: u8,
    /// Green channel.
    pub g: u8,
    /// Red channel.
    pub r: u8,
    /// Alpha channel.
    pub a: u8,
}

/// A 256-entry color table, ordered from coldest to hottest temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteData(pub [PaletteEntry; 256]);

impl Default for PaletteData {
    fn default() -> Self {
        PaletteData([PaletteEntry::default(); 256])
    }
}

impl PaletteData {
    /// Builds a table from (b, g, r, a) tuples.
    pub fn from_bgra(entries: [(u8, u8, u8, u8); 256]) -> Self {
        let mut data = [PaletteEntry::default(); 256];
        for (dst, (b, g, r, a)) in data.iter_mut().zip(entries) {
            *dst = PaletteEntry { b, g, r, a };
        }
        PaletteData(data)
    }

    /// The raw entries.
    #[inline]
    pub fn entries(&self) -> &[PaletteEntry; 256] {
        &self.0
    }
}

/// Automated gain correction modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AgcMode {
    /// Linear min/max AGC.
    Linear = 0,
    /// Histogram equalization AGC.
    HistEq = 1,
}

impl AgcMode {
    /// Maps a raw mode value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(AgcMode::Linear),
            1 => Some(AgcMode::HistEq),
            _ => None,
        }
    }
}

/// Plateau redistribution modes used by HistEQ AGC.
///
/// Controls what happens to pixels in a histogram bin that exceed the
/// plateau threshold (see the plateau property on the camera).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum HistEqAgcPlateauRedistributionMode {
    /// Excess pixels are discarded; the default.
    Disabled = 0,
    /// Excess pixels are redistributed evenly among all bins.
    AllBins = 1,
    /// Excess pixels are redistributed only among bins holding at least
    /// one pixel.
    ActiveBinsOnly = 2,
}

impl HistEqAgcPlateauRedistributionMode {
    /// Maps a raw mode value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        use HistEqAgcPlateauRedistributionMode::*;
        match raw {
            0 => Some(Disabled),
            1 => Some(AllBins),
            2 => Some(ActiveBinsOnly),
            _ => None,
        }
    }
}

/// Gain limit factor modes used by HistEQ AGC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum HistEqAgcGainLimitFactorMode {
    /// Gain limit set by the user; factor settings controlled automatically.
    Auto = 0,
    /// Gain limit and all factor settings set by the user.
    Manual = 1,
}

impl HistEqAgcGainLimitFactorMode {
    /// Maps a raw mode value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(HistEqAgcGainLimitFactorMode::Auto),
            1 => Some(HistEqAgcGainLimitFactorMode::Manual),
            _ => None,
        }
    }
}

/// Lock modes used by Linear AGC to set the output range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LinearAgcLockMode {
    /// Both bounds follow the lowest/highest scene values.
    Auto = 0,
    /// Both bounds are set by the user.
    Manual = 1,
    /// Minimum set by the user, maximum follows the scene.
    ManualMin = 2,
    /// Maximum set by the user, minimum follows the scene.
    ManualMax = 3,
}

impl LinearAgcLockMode {
    /// Maps a raw mode value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        use LinearAgcLockMode::*;
        match raw {
            0 => Some(Auto),
            1 => Some(Manual),
            2 => Some(ManualMin),
            3 => Some(ManualMax),
            _ => None,
        }
    }
}

/// Image pipeline modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PipelineMode {
    /// Reduced pipeline for constrained hosts.
    Lite = 0,
    /// Legacy pipeline.
    Legacy = 1,
    /// Full vision pipeline.
    SeekVision = 2,
}

impl PipelineMode {
    /// Maps a raw mode value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(PipelineMode::Lite),
            1 => Some(PipelineMode::Legacy),
            2 => Some(PipelineMode::SeekVision),
            _ => None,
        }
    }
}

/// Shutter control modes. Only applicable to cores with a shutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ShutterMode {
    /// The device shutters itself; the default.
    Auto = 0,
    /// The user triggers the shutter explicitly.
    Manual = 1,
}

impl ShutterMode {
    /// Maps a raw mode value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(ShutterMode::Auto),
            1 => Some(ShutterMode::Manual),
            _ => None,
        }
    }
}

/// Temperature units for thermography output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TemperatureUnit {
    /// Degrees Celsius; the default.
    Celsius = 0,
    /// Degrees Fahrenheit.
    Fahrenheit = 1,
    /// Kelvin.
    Kelvin = 2,
}

impl TemperatureUnit {
    /// Maps a raw unit value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(TemperatureUnit::Celsius),
            1 => Some(TemperatureUnit::Fahrenheit),
            2 => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }
}

/// Controllable image processing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Filter {
    /// Corrects image gradient; triggered automatically on flat scenes.
    GradientCorrection = 0,
    /// Corrects non-uniformities; stored explicitly by the user.
    FlatSceneCorrection = 1,
    /// Sharpening.
    SharpenCorrection = 2,
}

/// Enable state of an image processing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FilterState {
    /// The filter is disabled.
    Disabled = 0,
    /// The filter is enabled.
    Enabled = 1,
}

impl FilterState {
    /// Maps a raw state value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(FilterState::Disabled),
            1 => Some(FilterState::Enabled),
            _ => None,
        }
    }
}

/// Unique flat scene correction identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FscId {
    /// Default slot; loaded and applied on startup if previously stored.
    Id0 = 0,
}
