//! Zero-copy typed pixel views.
//!
//! A [`Frame`] wraps one single-format frame buffer shared with the native
//! layer. Pixel access reinterprets the buffer in place: u16 and f32 formats
//! are cast through [`zerocopy::LayoutVerified`], and every view is built
//! with an explicit row stride so line padding is skipped without copying.
//! Callers that need a contiguous owned image call `.to_owned()` on the view.

use ndarray::{ArrayView2, ArrayView3, ShapeBuilder};
use zerocopy::{FromBytes, LayoutVerified};

use crate::error::{Error, Result};
use crate::frame::{FrameFormat, FrameHeader};
use crate::sdk::RawFrame;

/// Typed, stride-aware view of a frame's pixels.
///
/// The variant is determined by the frame's format. Two-dimensional views are
/// `(height, width)`; three-dimensional views are `(height, width, channels)`
/// with interleaved channels in the last axis.
#[derive(Debug)]
pub enum FramePixels<'a> {
    /// Gain-corrected sensor counts.
    Corrected(ArrayView2<'a, u16>),
    /// Sensor counts before AGC.
    PreAgc(ArrayView2<'a, u16>),
    /// Thermography in degrees per the configured unit.
    ThermographyFloat(ArrayView2<'a, f32>),
    /// Thermography as U10.6 fixed point.
    ThermographyFixed106(ArrayView2<'a, u16>),
    /// Post-AGC display image.
    Grayscale(ArrayView2<'a, u8>),
    /// Color display image, channels are A, R, G, B.
    ColorArgb8888(ArrayView3<'a, u8>),
    /// Color display image, one packed u16 per pixel.
    ColorRgb565(ArrayView2<'a, u16>),
    /// Color display image, channels are A, Y, U, V.
    ColorAyuv(ArrayView3<'a, u8>),
    /// Color display image, two bytes per pixel.
    ColorYuy2(ArrayView3<'a, u8>),
}

/// One single-format frame: shared buffer plus the geometry reported by the
/// native layer.
///
/// The buffer is never copied on construction or access; clones of a `Frame`
/// share it. Geometry comes from the native frame descriptor and is also
/// present in the frame header, which can be decoded on demand with
/// [`Frame::header`].
#[derive(Debug, Clone)]
pub struct Frame {
    raw: RawFrame,
    format: Option<FrameFormat>,
}

impl Frame {
    pub(crate) fn new(raw: RawFrame, format: Option<FrameFormat>) -> Self {
        Frame { raw, format }
    }

    /// The format this frame was produced in, when recognized.
    pub fn format(&self) -> Option<FrameFormat> {
        self.format
    }

    /// Frame width in image coordinates.
    pub fn width(&self) -> u16 {
        self.raw.width
    }

    /// Frame height in image coordinates.
    pub fn height(&self) -> u16 {
        self.raw.height
    }

    /// Number of interleaved image channels.
    pub fn channels(&self) -> u8 {
        self.raw.channels
    }

    /// Non-padding bit depth of each pixel.
    pub fn pixel_depth(&self) -> u8 {
        self.raw.pixel_depth
    }

    /// Padding bits between pixels.
    pub fn pixel_padding(&self) -> u8 {
        self.raw.pixel_padding
    }

    /// Bytes per row including line padding.
    pub fn line_stride(&self) -> u16 {
        self.raw.line_stride
    }

    /// Padding bytes at the end of each row.
    pub fn line_padding(&self) -> u16 {
        self.raw.line_padding
    }

    /// Size of the header region at the start of the buffer.
    pub fn header_size(&self) -> u16 {
        self.raw.header_size
    }

    /// True when the native layer produced no data for this frame.
    pub fn is_empty(&self) -> bool {
        self.raw.buffer.is_empty()
    }

    /// Size of the pixel region in bytes, excluding the header.
    pub fn data_size(&self) -> usize {
        self.raw
            .buffer
            .len()
            .saturating_sub(usize::from(self.raw.header_size))
    }

    /// The raw buffer, header bytes included.
    pub fn bytes(&self) -> &[u8] {
        &self.raw.buffer
    }

    /// Decodes the frame header at the start of the buffer.
    pub fn header(&self) -> Result<FrameHeader> {
        FrameHeader::decode(&self.raw.buffer)
    }

    /// Builds the typed pixel view for this frame's format.
    ///
    /// Fails with [`Error::InvalidParameter`] when the format is unknown and
    /// [`Error::MalformedHeader`] when the buffer is empty, truncated, or
    /// cannot be reinterpreted at the format's element size.
    pub fn data(&self) -> Result<FramePixels<'_>> {
        let format = self.format.ok_or(Error::InvalidParameter)?;
        if self.is_empty() {
            return Err(Error::MalformedHeader);
        }

        let height = usize::from(self.raw.height);
        let width = usize::from(self.raw.width);
        let stride = usize::from(self.raw.line_stride);
        let header = usize::from(self.raw.header_size);

        let end = header
            .checked_add(height.checked_mul(stride).ok_or(Error::MalformedHeader)?)
            .ok_or(Error::MalformedHeader)?;
        let pixels = self
            .raw
            .buffer
            .get(header..end)
            .ok_or(Error::MalformedHeader)?;

        let elem = format.element_size();
        if stride % elem != 0 {
            return Err(Error::MalformedHeader);
        }
        let stride_elems = stride / elem;
        if width.checked_mul(usize::from(format.channels())).ok_or(Error::MalformedHeader)?
            > stride_elems
        {
            return Err(Error::MalformedHeader);
        }

        Ok(match format {
            FrameFormat::Corrected => {
                FramePixels::Corrected(plane(cast_slice(pixels)?, height, width, stride_elems)?)
            }
            FrameFormat::PreAgc => {
                FramePixels::PreAgc(plane(cast_slice(pixels)?, height, width, stride_elems)?)
            }
            FrameFormat::ThermographyFloat => FramePixels::ThermographyFloat(plane(
                cast_slice(pixels)?,
                height,
                width,
                stride_elems,
            )?),
            FrameFormat::ThermographyFixed106 => FramePixels::ThermographyFixed106(plane(
                cast_slice(pixels)?,
                height,
                width,
                stride_elems,
            )?),
            FrameFormat::Grayscale => {
                FramePixels::Grayscale(plane(pixels, height, width, stride_elems)?)
            }
            FrameFormat::ColorRgb565 => {
                FramePixels::ColorRgb565(plane(cast_slice(pixels)?, height, width, stride_elems)?)
            }
            FrameFormat::ColorArgb8888 => {
                FramePixels::ColorArgb8888(interleaved(pixels, height, width, 4, stride_elems)?)
            }
            FrameFormat::ColorAyuv => {
                FramePixels::ColorAyuv(interleaved(pixels, height, width, 4, stride_elems)?)
            }
            FrameFormat::ColorYuy2 => {
                FramePixels::ColorYuy2(interleaved(pixels, height, width, 2, stride_elems)?)
            }
        })
    }
}

fn cast_slice<T: FromBytes>(bytes: &[u8]) -> Result<&[T]> {
    LayoutVerified::<_, [T]>::new_slice(bytes)
        .map(LayoutVerified::into_slice)
        .ok_or(Error::MalformedHeader)
}

fn plane<T>(
    pixels: &[T],
    height: usize,
    width: usize,
    stride_elems: usize,
) -> Result<ArrayView2<'_, T>> {
    ArrayView2::from_shape((height, width).strides((stride_elems, 1)), pixels)
        .map_err(|_| Error::MalformedHeader)
}

fn interleaved(
    pixels: &[u8],
    height: usize,
    width: usize,
    channels: usize,
    stride_bytes: usize,
) -> Result<ArrayView3<'_, u8>> {
    ArrayView3::from_shape(
        (height, width, channels).strides((stride_bytes, channels, 1)),
        pixels,
    )
    .map_err(|_| Error::MalformedHeader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use crate::frame::header::HEADER_SIZE;

    fn raw_frame(
        width: u16,
        height: u16,
        channels: u8,
        line_stride: u16,
        pixel_bytes: Vec<u8>,
    ) -> RawFrame {
        let mut buffer = vec![0u8; HEADER_SIZE];
        buffer.extend_from_slice(&pixel_bytes);
        RawFrame {
            width,
            height,
            channels,
            pixel_depth: 8,
            pixel_padding: 0,
            line_stride,
            line_padding: line_stride - width * u16::from(channels),
            header_size: HEADER_SIZE as u16,
            buffer: Bytes::from(buffer),
        }
    }

    #[test]
    fn test_argb_view_has_interleaved_shape() {
        let raw = raw_frame(320, 240, 4, 1280, vec![7u8; 1280 * 240]);
        let frame = Frame::new(raw, Some(FrameFormat::ColorArgb8888));
        match frame.data().unwrap() {
            FramePixels::ColorArgb8888(view) => {
                assert_eq!(view.dim(), (240, 320, 4));
                assert_eq!(view[(0, 0, 0)], 7);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_line_padding_is_skipped_without_copying() {
        // 4 pixels per row of u16 plus 4 padding bytes.
        let width = 4u16;
        let height = 2u16;
        let stride = 12u16;
        let mut pixel_bytes = Vec::new();
        for row in 0..height {
            for col in 0..width {
                pixel_bytes.extend_from_slice(&(row * 100 + col).to_le_bytes());
            }
            pixel_bytes.extend_from_slice(&[0xEE; 4]);
        }
        let raw = raw_frame(width, height, 1, stride, pixel_bytes);
        let frame = Frame::new(raw, Some(FrameFormat::Corrected));
        match frame.data().unwrap() {
            FramePixels::Corrected(view) => {
                assert_eq!(view.dim(), (2, 4));
                assert_eq!(view[(0, 3)], 3);
                assert_eq!(view[(1, 0)], 100);
                assert_eq!(view[(1, 3)], 103);
                assert!(!view.is_standard_layout());
                // Dropping the padding by copying yields a contiguous image.
                assert!(view.to_owned().is_standard_layout());
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_is_invalid_parameter() {
        let raw = raw_frame(2, 2, 1, 2, vec![0u8; 4]);
        let frame = Frame::new(raw, None);
        assert!(matches!(frame.data(), Err(Error::InvalidParameter)));
    }

    #[test]
    fn test_empty_buffer_is_empty_frame() {
        let raw = RawFrame::default();
        let frame = Frame::new(raw, Some(FrameFormat::Grayscale));
        assert!(frame.is_empty());
        assert_eq!(frame.data_size(), 0);
        assert!(matches!(frame.data(), Err(Error::MalformedHeader)));
    }

    #[test]
    fn test_truncated_pixel_region_is_malformed() {
        // Claims 4 rows but carries only 2.
        let mut raw = raw_frame(8, 2, 1, 8, vec![0u8; 16]);
        raw.height = 4;
        let frame = Frame::new(raw, Some(FrameFormat::Grayscale));
        assert!(matches!(frame.data(), Err(Error::MalformedHeader)));
    }

    #[test]
    fn test_zero_width_frame_is_not_empty() {
        // Emptiness is about the buffer, not the geometry.
        let raw = raw_frame(0, 0, 1, 0, vec![0u8; 4]);
        let frame = Frame::new(raw, Some(FrameFormat::Grayscale));
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_data_size_excludes_header() {
        let raw = raw_frame(8, 2, 1, 8, vec![1u8; 16]);
        let frame = Frame::new(raw, Some(FrameFormat::Grayscale));
        assert!(!frame.is_empty());
        assert_eq!(frame.data_size(), 16);
    }

    #[test]
    fn test_thermography_float_values_round_trip() {
        let width = 3u16;
        let stride = 12u16;
        let mut pixel_bytes = Vec::new();
        for value in [21.5f32, -40.0, 300.25] {
            pixel_bytes.extend_from_slice(&value.to_le_bytes());
        }
        let raw = raw_frame(width, 1, 1, stride, pixel_bytes);
        let frame = Frame::new(raw, Some(FrameFormat::ThermographyFloat));
        match frame.data().unwrap() {
            FramePixels::ThermographyFloat(view) => {
                assert_eq!(view[(0, 0)], 21.5);
                assert_eq!(view[(0, 1)], -40.0);
                assert_eq!(view[(0, 2)], 300.25);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }
}
