// SPDX-License-Identifier: GPL-3.0-only

//! Scan session lifecycle
//!
//! The session controller owns the scanning on/off state, the selected
//! device, and the accumulated results. Sessions are single-shot: the
//! first detection stops scanning. The external engine is bound at start
//! and fully stopped (camera released) before any stop-path returns.

pub mod results;

pub use results::{ResultLog, ScanResult};

use crate::constants::DETECTION_CHANNEL_CAPACITY;
use crate::engine::{Detection, DetectionReceiver, EngineBinding, ScanEngine, ScanTarget};
use crate::errors::AppResult;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Scan session controller
pub struct ScanSession {
    engine: Box<dyn ScanEngine>,
    target: ScanTarget,
    selected_device: Option<String>,
    scanning: bool,
    results: ResultLog,
}

impl ScanSession {
    pub fn new(engine: Box<dyn ScanEngine>, target: ScanTarget) -> Self {
        Self {
            engine,
            target,
            selected_device: None,
            scanning: false,
            results: ResultLog::default(),
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn selected_device(&self) -> Option<&str> {
        self.selected_device.as_deref()
    }

    /// Set the device for the NEXT session start. A running session is
    /// not rebound; changing device mid-scan is unsupported.
    pub fn select_device(&mut self, device_id: impl Into<String>) {
        let device_id = device_id.into();
        if self.scanning {
            debug!(device_id = %device_id, "Device selection takes effect on next start");
        }
        self.selected_device = Some(device_id);
    }

    /// All results of the current session, in detection order
    pub fn results(&self) -> &[ScanResult] {
        self.results.entries()
    }

    /// Most recent non-empty decoded code of the current session
    pub fn headline(&self) -> Option<&str> {
        self.results.headline()
    }

    /// Flip the scanning state.
    ///
    /// Starting discards the previous session's results and headline,
    /// binds the engine to the scan target and selected device, and
    /// returns the detection receiver. Stopping runs the engine's full
    /// stop/release path before returning — no dangling camera lock.
    pub fn toggle_scanning(&mut self) -> AppResult<Option<DetectionReceiver>> {
        if self.scanning {
            self.stop()?;
            return Ok(None);
        }

        self.results.clear();
        let (detections, receiver) = mpsc::channel(DETECTION_CHANNEL_CAPACITY);
        let binding = EngineBinding {
            target: self.target.clone(),
            device_id: self.selected_device.clone(),
            detections,
        };
        self.engine.start(binding)?;
        self.scanning = true;
        info!(device_id = ?self.selected_device, "Scan session started");
        Ok(Some(receiver))
    }

    /// Engine callback for one recognized code.
    ///
    /// Appends the result, updates the headline if the detection carries
    /// a non-empty code, then stops the session: the first detection ends
    /// scanning, releasing the camera on the way out.
    pub fn on_detected(&mut self, detection: Detection) -> AppResult<()> {
        debug!(code = ?detection.code, "Detection received");
        self.results.push(ScanResult::from(detection));
        self.stop()
    }

    fn stop(&mut self) -> AppResult<()> {
        if !self.scanning {
            return Ok(());
        }
        self.engine.stop()?;
        self.scanning = false;
        info!(
            results = self.results.len(),
            headline = ?self.results.headline(),
            "Scan session stopped"
        );
        Ok(())
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        // Teardown while scanning must still release the camera
        if self.scanning
            && let Err(err) = self.engine.stop()
        {
            warn!(error = %err, "Engine stop failed during teardown");
        }
    }
}
