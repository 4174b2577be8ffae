// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Negotiating camera access and listing video input devices
//! - Running a single-shot scan session over image-file frames

use codescan::access::{CameraAccess, V4l2Access, negotiate};
use codescan::config::Config;
use codescan::constants::APP_NAME;
use codescan::engine::{ImageFileSource, QrScanEngine, ScanTarget};
use codescan::session::ScanSession;
use std::path::PathBuf;
use std::sync::Arc;

/// Negotiate camera access and print the device list
pub fn list_devices(user_agent: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let user_agent = resolve_user_agent(user_agent, &config);

    let rt = tokio::runtime::Runtime::new()?;
    let access: Arc<dyn CameraAccess> = Arc::new(V4l2Access::new());
    let devices = match rt.block_on(negotiate(access, &user_agent)) {
        Ok(devices) => devices,
        Err(err) => {
            // Distinct from the empty-list case below
            eprintln!("ERROR initializing camera: {} -- do you have permission?", err);
            return Err(err.into());
        }
    };

    if devices.is_empty() {
        println!("No video input devices found.");
        return Ok(());
    }

    println!("Available devices:");
    for device in &devices {
        println!("  {}  {}", device.device_id, device.display_name());
    }
    Ok(())
}

/// Run one scan session: negotiate, bind the QR engine to the selected
/// device, stop on the first detection (or Ctrl+C), print the results
pub fn run_scan(
    device: Option<String>,
    input: Vec<PathBuf>,
    user_agent: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load();
    let user_agent = resolve_user_agent(user_agent, &config);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let access: Arc<dyn CameraAccess> = Arc::new(V4l2Access::new());

        // A negotiation failure is surfaced but does not abort: the
        // session can still run with no device binding, as the engine
        // here captures from files rather than the camera.
        let devices = match negotiate(access, &user_agent).await {
            Ok(devices) => devices,
            Err(err) => {
                eprintln!("ERROR initializing camera: {} -- do you have permission?", err);
                Vec::new()
            }
        };

        let selected = device
            .or_else(|| config.last_device_id.clone())
            .or_else(|| devices.first().map(|d| d.device_id.clone()));

        let engine = QrScanEngine::new(Box::new(ImageFileSource::new(input)));
        let mut session = ScanSession::new(Box::new(engine), ScanTarget::new(APP_NAME));
        if let Some(id) = &selected {
            session.select_device(id.clone());
            println!("Using device: {}", id);
        }

        let Some(mut detections) = session.toggle_scanning()? else {
            return Err("session was already scanning".into());
        };
        println!("Scanning... (press Ctrl+C to stop)");

        tokio::select! {
            maybe = detections.recv() => match maybe {
                Some(detection) => session.on_detected(detection)?,
                // Engine exhausted its frames without a detection
                None => {
                    if session.is_scanning() {
                        session.toggle_scanning()?;
                    }
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Stopping...");
                if session.is_scanning() {
                    session.toggle_scanning()?;
                }
            }
        }

        match session.headline() {
            Some(code) => println!("Result: {}", code),
            None => println!("No code detected."),
        }
        for (index, result) in session.results().iter().enumerate() {
            println!(
                "  [{}] {}",
                index,
                result.code.as_deref().unwrap_or("<no code>")
            );
        }

        if selected.is_some() {
            config.last_device_id = selected;
            config.save()?;
        }
        Ok(())
    })
}

fn resolve_user_agent(flag: Option<String>, config: &Config) -> String {
    flag.or_else(|| config.user_agent_override.clone())
        .unwrap_or_else(|| codescan::constants::DEFAULT_USER_AGENT.to_string())
}
