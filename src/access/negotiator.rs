// SPDX-License-Identifier: GPL-3.0-only

//! Device capability negotiation
//!
//! Android will not enumerate labeled camera devices unless the page
//! holds (or has held) an active permission grant, and it only prompts
//! for permission when the camera is actually used. Enumerating first
//! therefore yields nothing. The negotiator runs the one ordering that
//! works everywhere:
//!
//! 1. request a stream (triggers the permission prompt),
//! 2. release it immediately (the handle is single-tenant and the scan
//!    session needs to acquire it later),
//! 3. enumerate video input devices.
//!
//! Each step starts only after the previous one completed. A failed
//! request short-circuits the sequence and surfaces as a terminal
//! [`AccessError`]; no automatic retry is attempted.

use super::{AccessGuard, CameraAccess, CameraDevice, FacingMode, StreamConstraints};
use crate::errors::AccessResult;
use crate::platform::is_mobile_user_agent;
use std::sync::Arc;
use tracing::{debug, info};

/// Build the stream constraints for the reported platform.
///
/// Mobile platforms get a hard `environment` facing-mode requirement:
/// acquisition must fail rather than silently fall back to the front
/// camera. Everything else requests any video-capable camera. Audio is
/// never requested.
pub fn constraints_for_user_agent(user_agent: &str) -> StreamConstraints {
    if is_mobile_user_agent(user_agent) {
        StreamConstraints::exact_facing(FacingMode::Environment)
    } else {
        StreamConstraints::any_video()
    }
}

/// Run the request -> release -> enumerate handshake.
///
/// Invoked once per process lifetime, before any scan session starts;
/// concurrent invocations are not supported. Returns the full video
/// device list — an empty list is a valid result (no devices found) and
/// is deliberately distinct from an error (permission denied, no
/// hardware, constraint unsatisfiable).
///
/// If the returned future is abandoned after the request succeeded, the
/// held grant is still released (spawned onto the runtime by the
/// internal [`AccessGuard`]).
pub async fn negotiate(
    access: Arc<dyn CameraAccess>,
    user_agent: &str,
) -> AccessResult<Vec<CameraDevice>> {
    let constraints = constraints_for_user_agent(user_agent);
    debug!(?constraints, user_agent, "Requesting camera access");

    access.request(&constraints).await?;
    let grant = AccessGuard::new(Arc::clone(&access));

    // Release before enumerating: holding the handle open would block the
    // scan session from acquiring it, and the grant established by the
    // request/release cycle is what unlocks labeled enumeration.
    grant.release().await?;

    let devices = access.enumerate_devices().await?;
    info!(count = devices.len(), "Enumerated video input devices");
    Ok(devices)
}
