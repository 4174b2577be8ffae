// SPDX-License-Identifier: GPL-3.0-only

//! codescan - barcode scanning session core
//!
//! The interesting part of this crate is the camera permission
//! negotiation: mobile platforms only enumerate labeled camera devices
//! after an acquire/release cycle has established a permission grant, so
//! startup runs a strict request -> release -> enumerate handshake. The
//! rest is the scan-session lifecycle built on top of it: device
//! selection, start/stop, single-shot detection, result accumulation.
//!
//! # Architecture
//!
//! - [`access`]: camera capability provider trait, the negotiation
//!   handshake, and the V4L2 provider
//! - [`platform`]: user-agent classification (injected, deterministic)
//! - [`session`]: scan session controller and result sink
//! - [`engine`]: decoding engine boundary and the rqrr QR engine
//! - [`config`]: user configuration handling
pub mod access;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod platform;
pub mod session;

// Re-export commonly used types
pub use access::{CameraAccess, CameraDevice, FacingMode, StreamConstraints, negotiate};
pub use config::Config;
pub use engine::{Detection, QrScanEngine, ScanEngine, ScanTarget};
pub use errors::{AccessError, AppError, AppResult, EngineError};
pub use session::{ScanResult, ScanSession};
