//! Thermal Camera SDK Bridge
//!
//! A typed bridge over a vendor thermal-camera SDK: device discovery and
//! connection lifecycle, per-device properties and image-processing
//! controls, and zero-copy access to captured frames.
//!
//! # Architecture
//!
//! The native library is modeled as a function table behind the
//! [`NativeSdk`] trait; everything above it is plain safe Rust:
//!
//! ```text
//! manager (lifecycle, events) → camera (properties, sessions)
//!        ↓                            ↓
//!   sdk (native seam)          frame (headers, pixel views)
//! ```
//!
//! # Design Principles
//!
//! - **Identity is the chip ID**: native tokens may be reissued across
//!   reconnects, so devices compare equal on chip ID alone
//! - **Nothing but identity is cached**: the device refreshes properties
//!   between frames, so every getter reads live
//! - **Zero-copy frames**: pixel views reinterpret the shared buffer in
//!   place, stride-aware, without copying
//! - **Fail closed on unknown values**: unmapped status codes and enum
//!   values surface as errors, never panics
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use thermocam::{
//!     Camera, CameraEvent, DiscoveryMode, Error, FrameBundle, FrameFormats,
//!     Manager, MockSdk,
//! };
//!
//! let sdk = Arc::new(MockSdk::new());
//! let manager = Manager::create(sdk.clone(), DiscoveryMode::USB).unwrap();
//!
//! manager.register_event_callback(
//!     |camera: &Camera, event: CameraEvent, _error: Option<Error>| {
//!         println!("{camera}: {event}");
//!     },
//! );
//!
//! // A camera appears: driven by the test double here, by hardware when a
//! // real `NativeSdk` implementation is plugged in.
//! sdk.connect("E497B28C2D2C");
//! let cameras = manager.cameras();
//! let camera = &cameras[0];
//!
//! camera
//!     .register_frame_available_callback(|_camera: &Camera, frame: &FrameBundle| {
//!         if let Ok(thermography) = frame.thermography_float() {
//!             let _pixels = thermography.data();
//!         }
//!     })
//!     .unwrap();
//! camera
//!     .capture_session_start(FrameFormats::THERMOGRAPHY_FLOAT)
//!     .unwrap();
//! camera.capture_session_stop().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod manager;
pub mod sdk;

// Re-export commonly used types at crate root
pub use camera::{
    AgcMode, Camera, ChipId, ColorPalette, Filter, FilterState, FirmwareVersion, FrameObserver,
    FscId, HistEqAgcGainLimitFactorMode, HistEqAgcPlateauRedistributionMode, IoProperties, IoType,
    LinearAgcLockMode, PaletteData, PaletteEntry, PipelineMode, ShutterMode, TemperatureUnit,
    ThermographyWindow,
};
pub use config::SdkConfig;
pub use error::{Error, Result};
pub use frame::{
    Frame, FrameBundle, FrameFormat, FrameFormats, FrameHeader, FramePixels, ThermographyPoint,
};
pub use manager::{CameraEvent, DiscoveryMode, EventObserver, Manager};
pub use sdk::{MockSdk, NativeSdk};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
