// SPDX-License-Identifier: GPL-3.0-only

//! QR decoding engine
//!
//! Runs a dedicated capture thread that pulls grayscale frames from a
//! [`FrameSource`], decodes them with `rqrr`, and emits [`Detection`]s
//! on the bound channel. The session controller never sees frames.

use super::source::FrameSource;
use super::{Detection, DetectionSender, EngineBinding, ScanEngine};
use crate::constants::FRAME_POLL_INTERVAL;
use crate::errors::{EngineError, EngineResult};
use image::GrayImage;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, trace, warn};

type SharedSource = Arc<Mutex<Box<dyn FrameSource>>>;

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// rqrr-backed implementation of [`ScanEngine`]
pub struct QrScanEngine {
    source: SharedSource,
    worker: Option<Worker>,
}

impl QrScanEngine {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            worker: None,
        }
    }
}

impl ScanEngine for QrScanEngine {
    fn start(&mut self, binding: EngineBinding) -> EngineResult<()> {
        if self.is_running() {
            return Err(EngineError::AlreadyRunning);
        }
        self.worker = None;

        // Acquire the camera/source synchronously so a start that cannot
        // get the device fails here, not on the capture thread.
        self.source
            .lock()
            .unwrap()
            .open(binding.device_id.as_deref())
            .map_err(|err| EngineError::StartFailed(err.to_string()))?;

        info!(
            scan_target = binding.target.as_str(),
            device_id = ?binding.device_id,
            "Starting QR engine"
        );

        let stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_capture_thread(
            Arc::clone(&self.source),
            Arc::clone(&stop),
            binding.detections,
        );
        self.worker = Some(Worker { stop, handle });
        Ok(())
    }

    fn stop(&mut self) -> EngineResult<()> {
        let Some(worker) = self.worker.take() else {
            return Err(EngineError::NotRunning);
        };

        worker.stop.store(true, Ordering::SeqCst);
        if worker.handle.join().is_err() {
            warn!("Capture thread panicked during stop");
        }

        // The thread closes the source on its way out; repeating the
        // close here covers the panic path. Close is idempotent. A panic
        // inside next_frame poisons the mutex, so recover the inner
        // source rather than propagating the poison.
        self.source
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .close();
        info!("QR engine stopped, camera released");
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }
}

impl Drop for QrScanEngine {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.stop();
        }
    }
}

fn spawn_capture_thread(
    source: SharedSource,
    stop: Arc<AtomicBool>,
    detections: DetectionSender,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            if stop.load(Ordering::SeqCst) {
                break;
            }

            let frame = source.lock().unwrap().next_frame();
            match frame {
                Ok(Some(frame)) => {
                    for detection in decode_frame(&frame) {
                        match detections.try_send(detection) {
                            Ok(()) => {}
                            Err(TrySendError::Full(_)) => {
                                trace!("Detection channel full, dropping detection")
                            }
                            // Receiver gone: the session is done with us
                            Err(TrySendError::Closed(_)) => {
                                stop.store(true, Ordering::SeqCst);
                                break;
                            }
                        }
                    }
                }
                Ok(None) => {
                    debug!("Frame source exhausted");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "Frame source failed");
                    break;
                }
            }

            std::thread::sleep(FRAME_POLL_INTERVAL);
        }

        // Whatever ended the loop, the camera handle must not stay held
        source.lock().unwrap().close();
    })
}

/// Decode all QR codes visible in one frame
fn decode_frame(frame: &GrayImage) -> Vec<Detection> {
    let (width, height) = frame.dimensions();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        height as usize,
        |x, y| frame.get_pixel(x as u32, y as u32).0[0],
    );

    let mut found = Vec::new();
    for grid in prepared.detect_grids() {
        match grid.decode() {
            Ok((meta, content)) => {
                debug!(content = %content, "Decoded QR code");
                let code = if content.is_empty() {
                    None
                } else {
                    Some(content.clone())
                };
                found.push(Detection {
                    code,
                    raw: json!({
                        "content": content,
                        "version": meta.version.0,
                        "ecc_level": meta.ecc_level,
                        "mask": meta.mask,
                    }),
                });
            }
            Err(err) => {
                debug!(error = %err, "Failed to decode detected grid");
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScanTarget;
    use std::time::Duration;

    /// Records open/close calls; yields frames forever until closed
    struct RecordingSource {
        events: Arc<Mutex<Vec<&'static str>>>,
    }

    impl FrameSource for RecordingSource {
        fn open(&mut self, _device_id: Option<&str>) -> EngineResult<()> {
            self.events.lock().unwrap().push("open");
            Ok(())
        }

        fn next_frame(&mut self) -> EngineResult<Option<GrayImage>> {
            Ok(Some(GrayImage::from_pixel(8, 8, image::Luma([128]))))
        }

        fn close(&mut self) {
            self.events.lock().unwrap().push("close");
        }
    }

    fn binding(detections: DetectionSender) -> EngineBinding {
        EngineBinding {
            target: ScanTarget::new("test-target"),
            device_id: None,
            detections,
        }
    }

    #[test]
    fn test_stop_immediately_after_start_closes_source() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let source = RecordingSource {
            events: Arc::clone(&events),
        };
        let mut engine = QrScanEngine::new(Box::new(source));

        let (tx, _rx) = tokio::sync::mpsc::channel(4);
        engine.start(binding(tx)).unwrap();
        engine.stop().unwrap();

        assert!(!engine.is_running());
        let events = events.lock().unwrap();
        assert_eq!(events.first(), Some(&"open"));
        assert!(events.contains(&"close"), "camera handle left acquired");
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let source = RecordingSource {
            events: Arc::clone(&events),
        };
        let mut engine = QrScanEngine::new(Box::new(source));

        let (tx, _rx) = tokio::sync::mpsc::channel(4);
        engine.start(binding(tx.clone())).unwrap();
        assert!(matches!(
            engine.start(binding(tx)),
            Err(EngineError::AlreadyRunning)
        ));
        engine.stop().unwrap();
    }

    #[test]
    fn test_stop_without_start_is_an_error() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut engine = QrScanEngine::new(Box::new(RecordingSource { events }));
        assert!(matches!(engine.stop(), Err(EngineError::NotRunning)));
    }

    #[test]
    fn test_stop_closes_source_after_capture_thread_panic() {
        /// Panics on the first frame, while the source mutex is held
        struct PanickingSource {
            events: Arc<Mutex<Vec<&'static str>>>,
        }

        impl FrameSource for PanickingSource {
            fn open(&mut self, _device_id: Option<&str>) -> EngineResult<()> {
                self.events.lock().unwrap().push("open");
                Ok(())
            }

            fn next_frame(&mut self) -> EngineResult<Option<GrayImage>> {
                panic!("frame capture blew up");
            }

            fn close(&mut self) {
                self.events.lock().unwrap().push("close");
            }
        }

        let events = Arc::new(Mutex::new(Vec::new()));
        let source = PanickingSource {
            events: Arc::clone(&events),
        };
        let mut engine = QrScanEngine::new(Box::new(source));

        let (tx, _rx) = tokio::sync::mpsc::channel(4);
        engine.start(binding(tx)).unwrap();

        // Let the capture thread hit the panic
        std::thread::sleep(Duration::from_millis(50));

        engine.stop().unwrap();
        assert!(!engine.is_running());
        assert!(
            events.lock().unwrap().contains(&"close"),
            "camera handle left acquired after thread panic"
        );
    }

    #[test]
    fn test_exhausted_source_ends_capture_loop() {
        let mut engine =
            QrScanEngine::new(Box::new(crate::engine::ImageFileSource::new(Vec::new())));
        let (tx, _rx) = tokio::sync::mpsc::channel(4);
        engine.start(binding(tx)).unwrap();

        // Empty source: the thread exits on its own
        std::thread::sleep(Duration::from_millis(100));
        assert!(!engine.is_running());
        engine.stop().unwrap();
    }

    #[test]
    fn test_plain_frame_yields_no_detection() {
        let frame = GrayImage::from_pixel(32, 32, image::Luma([255]));
        assert!(decode_frame(&frame).is_empty());
    }
}
