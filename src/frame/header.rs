//! Fixed-layout frame header decoder.
//!
//! Every frame buffer begins with a fixed-size, 1-byte-packed header written
//! by the native layer. All multi-byte fields are little-endian regardless of
//! host byte order; decoding byte-swaps on big-endian hosts by construction
//! because every section is read through a little-endian deserializer.
//!
//! The decoder is deliberately permissive: `sentinel` and `version` are
//! exposed for caller inspection but never validated against expected
//! constants, matching the native layer's own contract. Callers that need
//! stricter validation check those fields themselves.

use bincode::{DefaultOptions, Options};
use serde::Deserialize;

use crate::camera::{ascii_trim, ChipId, FirmwareVersion, IoType};
use crate::error::{Error, Result};
use crate::frame::FrameFormat;

/// Total size of the frame header in bytes, including its reserved tail.
pub const HEADER_SIZE: usize = 2048;

// Byte layout, 1-byte packed, little-endian:
//
//   0x000  sentinel                u32
//   0x004  version                 u8
//   0x005  type                    u32
//   0x009  width, height           u16 each
//   0x00d  channels                u8
//   0x00e  pixel_depth             u8 (bits)
//   0x00f  pixel_padding           u8 (bits)
//   0x010  line_stride             u16 (bytes, includes line padding)
//   0x012  line_padding            u16 (bytes)
//   0x014  header_size             u16 (bytes)
//   0x016  timestamp_utc_ns        u64
//   0x01e  chipid                  16 bytes ASCII
//   0x02e  serial_number           16 bytes ASCII
//   0x03e  core_part_number        32 bytes ASCII
//   0x05e  firmware_version        4 × u8 (product, variant, major, minor)
//   0x062  io_type                 u8
//   0x063  fpa_frame_count         u32
//   0x067  fpa_diode_count         u32
//   0x06b  environment_temperature f32
//   0x06f  thermography min/max/spot  (u16 x, u16 y, f32 value) × 3
//   0x087  agc_mode                u8
//   0x088  histeq_agc_num_bins     u16
//   0x08a  histeq_agc_bin_width    u16
//   0x08c  histeq_agc_gain_limit_factor  f32
//   0x090  histeq reserved         64 bytes
//   0x0d0  linear_agc_min/max      f32 each
//   0x0d8  linear reserved         32 bytes
//   0x0f8  filter states           3 × u8 (gradient, flat scene, sharpen)
//   0x0fb  reserved                padding to HEADER_SIZE
const OFFSET_LINEAR_AGC: usize = 0x0d0;
const OFFSET_FILTER_STATES: usize = 0x0f8;

/// A thermography pixel reported in the header (min, max, or spot).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ThermographyPoint {
    /// Pixel x coordinate.
    pub x: u16,
    /// Pixel y coordinate.
    pub y: u16,
    /// Temperature value in degrees per the configured unit.
    pub value: f32,
}

/// Decoded frame header value object.
///
/// Scalar fields are extracted as immediate values; fixed-capacity ASCII
/// fields keep their wire capacity and are trimmed to strings only at the
/// accessor boundary. Numeric fields are trusted as provided by the native
/// layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameHeader {
    /// Magic validity marker; exposed, not validated.
    pub sentinel: u32,
    /// Header format version; exposed, not validated.
    pub version: u8,
    /// Raw frame format value; see [`FrameHeader::format`].
    pub frame_type: u32,
    /// Frame width in image coordinates.
    pub width: u16,
    /// Frame height in image coordinates.
    pub height: u16,
    /// Number of interleaved image channels.
    pub channels: u8,
    /// Non-padding bit depth of each pixel.
    pub pixel_depth: u8,
    /// Padding bits between pixels.
    pub pixel_padding: u8,
    /// Bytes per row including line padding.
    pub line_stride: u16,
    /// Padding bytes at the end of each row.
    pub line_padding: u16,
    /// Total header size in bytes.
    pub header_size: u16,
    /// Capture timestamp, nanoseconds UTC.
    pub timestamp_utc_ns: u64,
    /// Chip identifier, fixed 16-byte ASCII.
    pub chipid: [u8; 16],
    /// Serial number, fixed 16-byte ASCII.
    pub serial_number: [u8; 16],
    /// Core part number, fixed 32-byte ASCII.
    pub core_part_number: [u8; 32],
    /// Firmware version bytes (product, variant, major, minor).
    pub firmware_version: [u8; 4],
    /// Raw IO transport value; see [`FrameHeader::transport`].
    pub io_type: u8,
    /// Focal-plane-array frame counter.
    pub fpa_frame_count: u32,
    /// Focal-plane-array diode counter.
    pub fpa_diode_count: u32,
    /// Environment temperature in degrees per the configured unit.
    pub environment_temperature: f32,
    /// Coldest thermography pixel.
    pub thermography_min: ThermographyPoint,
    /// Hottest thermography pixel.
    pub thermography_max: ThermographyPoint,
    /// Center spot thermography pixel.
    pub thermography_spot: ThermographyPoint,
    /// Raw AGC mode in effect when the frame was produced.
    pub agc_mode: u8,
    /// HistEQ AGC histogram bin count.
    pub histeq_agc_num_bins: u16,
    /// HistEQ AGC histogram bin width.
    pub histeq_agc_bin_width: u16,
    /// HistEQ AGC gain limit factor.
    pub histeq_agc_gain_limit_factor: f32,
    /// Linear AGC minimum bound in effect.
    pub linear_agc_min: f32,
    /// Linear AGC maximum bound in effect.
    pub linear_agc_max: f32,
    /// Raw gradient correction filter state.
    pub gradient_correction_filter_state: u8,
    /// Raw flat scene correction filter state.
    pub flat_scene_correction_filter_state: u8,
    /// Raw sharpen correction filter state.
    pub sharpen_correction_filter_state: u8,
}

// Contiguous packed prefix, offsets 0x000..0x090.
#[derive(Debug, Deserialize)]
struct Prefix {
    sentinel: u32,
    version: u8,
    frame_type: u32,
    width: u16,
    height: u16,
    channels: u8,
    pixel_depth: u8,
    pixel_padding: u8,
    line_stride: u16,
    line_padding: u16,
    header_size: u16,
    timestamp_utc_ns: u64,
    chipid: [u8; 16],
    serial_number: [u8; 16],
    core_part_number: [u8; 32],
    firmware_version: [u8; 4],
    io_type: u8,
    fpa_frame_count: u32,
    fpa_diode_count: u32,
    environment_temperature: f32,
    thermography_min: ThermographyPoint,
    thermography_max: ThermographyPoint,
    thermography_spot: ThermographyPoint,
    agc_mode: u8,
    histeq_agc_num_bins: u16,
    histeq_agc_bin_width: u16,
    histeq_agc_gain_limit_factor: f32,
}

#[derive(Debug, Deserialize)]
struct LinearAgcSection {
    lock_min: f32,
    lock_max: f32,
}

#[derive(Debug, Deserialize)]
struct FilterStateSection {
    gradient_correction: u8,
    flat_scene_correction: u8,
    sharpen_correction: u8,
}

fn decode_le<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    DefaultOptions::new()
        .with_little_endian()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .deserialize(bytes)
        .map_err(|_| Error::MalformedHeader)
}

impl FrameHeader {
    /// Decodes a header from a region of at least [`HEADER_SIZE`] bytes.
    ///
    /// Never reads past [`HEADER_SIZE`]; an empty or truncated source is a
    /// [`Error::MalformedHeader`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.get(..HEADER_SIZE).ok_or(Error::MalformedHeader)?;

        let prefix: Prefix = decode_le(bytes)?;
        let linear: LinearAgcSection = decode_le(&bytes[OFFSET_LINEAR_AGC..])?;
        let filters: FilterStateSection = decode_le(&bytes[OFFSET_FILTER_STATES..])?;

        Ok(FrameHeader {
            sentinel: prefix.sentinel,
            version: prefix.version,
            frame_type: prefix.frame_type,
            width: prefix.width,
            height: prefix.height,
            channels: prefix.channels,
            pixel_depth: prefix.pixel_depth,
            pixel_padding: prefix.pixel_padding,
            line_stride: prefix.line_stride,
            line_padding: prefix.line_padding,
            header_size: prefix.header_size,
            timestamp_utc_ns: prefix.timestamp_utc_ns,
            chipid: prefix.chipid,
            serial_number: prefix.serial_number,
            core_part_number: prefix.core_part_number,
            firmware_version: prefix.firmware_version,
            io_type: prefix.io_type,
            fpa_frame_count: prefix.fpa_frame_count,
            fpa_diode_count: prefix.fpa_diode_count,
            environment_temperature: prefix.environment_temperature,
            thermography_min: prefix.thermography_min,
            thermography_max: prefix.thermography_max,
            thermography_spot: prefix.thermography_spot,
            agc_mode: prefix.agc_mode,
            histeq_agc_num_bins: prefix.histeq_agc_num_bins,
            histeq_agc_bin_width: prefix.histeq_agc_bin_width,
            histeq_agc_gain_limit_factor: prefix.histeq_agc_gain_limit_factor,
            linear_agc_min: linear.lock_min,
            linear_agc_max: linear.lock_max,
            gradient_correction_filter_state: filters.gradient_correction,
            flat_scene_correction_filter_state: filters.flat_scene_correction,
            sharpen_correction_filter_state: filters.sharpen_correction,
        })
    }

    /// The frame format, if the raw type value is one this crate knows.
    pub fn format(&self) -> Option<FrameFormat> {
        FrameFormat::from_raw(self.frame_type)
    }

    /// The chip identifier as the device equality key.
    pub fn chip_id(&self) -> ChipId {
        ChipId::new(self.chipid)
    }

    /// Serial number trimmed to a string.
    pub fn serial_number_str(&self) -> String {
        ascii_trim(&self.serial_number)
    }

    /// Core part number trimmed to a string.
    pub fn core_part_number_str(&self) -> String {
        ascii_trim(&self.core_part_number)
    }

    /// Firmware version in effect when the frame was produced.
    pub fn firmware(&self) -> FirmwareVersion {
        FirmwareVersion::from_bytes(self.firmware_version)
    }

    /// The IO transport, if the raw value is one this crate knows.
    pub fn transport(&self) -> Option<IoType> {
        IoType::from_raw(u32::from(self.io_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
        buf[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn sample_header_bytes() -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE];
        put(&mut buf, 0x000, &0x1A2B_3C4Du32.to_le_bytes());
        buf[0x004] = 2; // version
        put(&mut buf, 0x005, &0x10u32.to_le_bytes()); // thermography float
        put(&mut buf, 0x009, &1920u16.to_le_bytes());
        put(&mut buf, 0x00b, &1080u16.to_le_bytes());
        buf[0x00d] = 1; // channels
        buf[0x00e] = 16; // pixel_depth
        buf[0x00f] = 0; // pixel_padding
        put(&mut buf, 0x010, &3904u16.to_le_bytes()); // line_stride
        put(&mut buf, 0x012, &64u16.to_le_bytes()); // line_padding
        put(&mut buf, 0x014, &2048u16.to_le_bytes()); // header_size
        put(&mut buf, 0x016, &1_650_000_000_123_456_789u64.to_le_bytes());
        put(&mut buf, 0x01e, b"E497B28C2D2C\0\0\0\0");
        put(&mut buf, 0x02e, b"SN0042\0\0\0\0\0\0\0\0\0\0");
        put(&mut buf, 0x03e, b"CPN-MICRO-0001\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0");
        put(&mut buf, 0x05e, &[3, 1, 7, 2]); // firmware
        buf[0x062] = 0x01; // io_type = USB
        put(&mut buf, 0x063, &90210u32.to_le_bytes());
        put(&mut buf, 0x067, &77u32.to_le_bytes());
        put(&mut buf, 0x06b, &21.5f32.to_le_bytes());
        // thermography min/max/spot
        put(&mut buf, 0x06f, &3u16.to_le_bytes());
        put(&mut buf, 0x071, &4u16.to_le_bytes());
        put(&mut buf, 0x073, &(-8.25f32).to_le_bytes());
        put(&mut buf, 0x077, &100u16.to_le_bytes());
        put(&mut buf, 0x079, &200u16.to_le_bytes());
        put(&mut buf, 0x07b, &96.75f32.to_le_bytes());
        put(&mut buf, 0x07f, &160u16.to_le_bytes());
        put(&mut buf, 0x081, &120u16.to_le_bytes());
        put(&mut buf, 0x083, &36.6f32.to_le_bytes());
        buf[0x087] = 1; // agc_mode = histeq
        put(&mut buf, 0x088, &512u16.to_le_bytes());
        put(&mut buf, 0x08a, &8u16.to_le_bytes());
        put(&mut buf, 0x08c, &0.9f32.to_le_bytes());
        put(&mut buf, 0x0d0, &(-5.0f32).to_le_bytes());
        put(&mut buf, 0x0d4, &42.0f32.to_le_bytes());
        buf[0x0f8] = 1;
        buf[0x0f9] = 0;
        buf[0x0fa] = 1;
        buf
    }

    #[test]
    fn test_decode_round_trips_every_field() {
        let header = FrameHeader::decode(&sample_header_bytes()).unwrap();
        assert_eq!(header.sentinel, 0x1A2B_3C4D);
        assert_eq!(header.version, 2);
        assert_eq!(header.frame_type, 0x10);
        assert_eq!(header.format(), Some(FrameFormat::ThermographyFloat));
        assert_eq!(header.width, 1920);
        assert_eq!(header.height, 1080);
        assert_eq!(header.channels, 1);
        assert_eq!(header.pixel_depth, 16);
        assert_eq!(header.pixel_padding, 0);
        assert_eq!(header.line_stride, 3904);
        assert_eq!(header.line_padding, 64);
        assert_eq!(header.header_size, 2048);
        assert_eq!(header.timestamp_utc_ns, 1_650_000_000_123_456_789);
        assert_eq!(header.chip_id(), ChipId::from("E497B28C2D2C"));
        assert_eq!(header.serial_number_str(), "SN0042");
        assert_eq!(header.core_part_number_str(), "CPN-MICRO-0001");
        assert_eq!(header.firmware().to_string(), "3.1.7.2");
        assert_eq!(header.transport(), Some(IoType::Usb));
        assert_eq!(header.fpa_frame_count, 90210);
        assert_eq!(header.fpa_diode_count, 77);
        assert_eq!(header.environment_temperature, 21.5);
        assert_eq!(
            header.thermography_min,
            ThermographyPoint { x: 3, y: 4, value: -8.25 }
        );
        assert_eq!(
            header.thermography_max,
            ThermographyPoint { x: 100, y: 200, value: 96.75 }
        );
        assert_eq!(header.thermography_spot.x, 160);
        assert_eq!(header.thermography_spot.y, 120);
        assert_eq!(header.thermography_spot.value, 36.6);
        assert_eq!(header.agc_mode, 1);
        assert_eq!(header.histeq_agc_num_bins, 512);
        assert_eq!(header.histeq_agc_bin_width, 8);
        assert_eq!(header.histeq_agc_gain_limit_factor, 0.9);
        assert_eq!(header.linear_agc_min, -5.0);
        assert_eq!(header.linear_agc_max, 42.0);
        assert_eq!(header.gradient_correction_filter_state, 1);
        assert_eq!(header.flat_scene_correction_filter_state, 0);
        assert_eq!(header.sharpen_correction_filter_state, 1);
    }

    #[test]
    fn test_empty_source_is_malformed() {
        assert_eq!(FrameHeader::decode(&[]), Err(Error::MalformedHeader));
    }

    #[test]
    fn test_truncated_source_is_malformed() {
        let bytes = sample_header_bytes();
        assert_eq!(
            FrameHeader::decode(&bytes[..HEADER_SIZE - 1]),
            Err(Error::MalformedHeader)
        );
    }

    #[test]
    fn test_trailing_bytes_past_header_are_ignored() {
        let mut bytes = sample_header_bytes();
        bytes.extend_from_slice(&[0xFF; 128]); // pixel data, not header
        let header = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(header.width, 1920);
    }

    #[test]
    fn test_unexpected_sentinel_is_not_rejected() {
        let mut bytes = sample_header_bytes();
        put(&mut bytes, 0x000, &0u32.to_le_bytes());
        let header = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(header.sentinel, 0);
    }

    proptest! {
        #[test]
        fn test_decode_arbitrary_geometry(
            width in any::<u16>(),
            height in any::<u16>(),
            line_stride in any::<u16>(),
            timestamp in any::<u64>(),
            temperature in any::<f32>(),
        ) {
            let mut bytes = vec![0u8; HEADER_SIZE];
            put(&mut bytes, 0x009, &width.to_le_bytes());
            put(&mut bytes, 0x00b, &height.to_le_bytes());
            put(&mut bytes, 0x010, &line_stride.to_le_bytes());
            put(&mut bytes, 0x016, &timestamp.to_le_bytes());
            put(&mut bytes, 0x06b, &temperature.to_le_bytes());

            let header = FrameHeader::decode(&bytes).unwrap();
            prop_assert_eq!(header.width, width);
            prop_assert_eq!(header.height, height);
            prop_assert_eq!(header.line_stride, line_stride);
            prop_assert_eq!(header.timestamp_utc_ns, timestamp);
            prop_assert_eq!(
                header.environment_temperature.to_bits(),
                temperature.to_bits()
            );
        }
    }
}
