// SPDX-License-Identifier: GPL-3.0-only

//! Decoding engine boundary
//!
//! The engine is the external collaborator that owns frame capture and
//! decode timing. A session binds it to a scan target and a device id at
//! start time; from then on the session only sees discrete [`Detection`]
//! events on a single-consumer channel, never raw frames.

pub mod qr;
pub mod source;

pub use qr::QrScanEngine;
pub use source::{FrameSource, ImageFileSource};

use crate::errors::EngineResult;
use tokio::sync::mpsc;

/// Sender half of the engine -> session detection channel
pub type DetectionSender = mpsc::Sender<Detection>;

/// Receiver half of the engine -> session detection channel
pub type DetectionReceiver = mpsc::Receiver<Detection>;

/// Identifier of the surface the engine renders its preview into.
///
/// The core never draws; this is an opaque reference handed through to
/// the engine, the way a DOM node would be in a browser host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget(String);

impl ScanTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single recognized code
#[derive(Debug, Clone)]
pub struct Detection {
    /// Decoded code, if the engine recognized one
    pub code: Option<String>,
    /// Engine-specific payload (geometry, symbology metadata, ...)
    pub raw: serde_json::Value,
}

impl Detection {
    /// Detection carrying a decoded code and no extra payload
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            raw: serde_json::Value::Null,
        }
    }
}

/// Everything the engine needs for one scan session
pub struct EngineBinding {
    /// Where the engine renders its preview
    pub target: ScanTarget,
    /// Selected device, or `None` to let the engine pick
    pub device_id: Option<String>,
    /// Channel for detection events; the engine stops emitting when the
    /// receiver is dropped
    pub detections: DetectionSender,
}

/// External decoding engine
///
/// `stop` must release any camera handle the engine acquired before it
/// returns — the handle is single-tenant and the next session (or a new
/// negotiation) needs to be able to acquire it immediately.
pub trait ScanEngine: Send {
    /// Bind to a session and start capturing frames
    fn start(&mut self, binding: EngineBinding) -> EngineResult<()>;

    /// Stop capturing and release the camera handle
    fn stop(&mut self) -> EngineResult<()>;

    /// Whether a capture loop is currently active
    fn is_running(&self) -> bool;
}
