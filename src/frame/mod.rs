//! Frame headers, buffers, and typed pixel views.
//!
//! A capture event delivers a [`FrameBundle`] carrying one [`Frame`] per
//! requested [`FrameFormat`]. Every frame buffer starts with a fixed-layout
//! [`FrameHeader`]; the pixel region behind it is exposed through zero-copy
//! [`FramePixels`] views.

mod bundle;
mod format;
mod header;
mod view;

pub use bundle::FrameBundle;
pub use format::{FrameFormat, FrameFormats};
pub use header::{FrameHeader, ThermographyPoint, HEADER_SIZE};
pub use view::{Frame, FramePixels};
