// SPDX-License-Identifier: GPL-3.0-only

//! Camera capability provider abstraction
//!
//! The camera subsystem is an external collaborator reached through the
//! [`CameraAccess`] trait: request a stream, release it, enumerate video
//! input devices. The camera handle is a singleton resource — a provider
//! must refuse a second `request` while one grant is outstanding, and
//! `release` must be idempotent so scoped cleanup can always run.

pub mod negotiator;
pub mod v4l2;

pub use negotiator::{constraints_for_user_agent, negotiate};
pub use v4l2::V4l2Access;

use crate::errors::AccessResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// A video input device as reported by enumeration.
///
/// Identity is `device_id`; the label is human-readable and may be empty
/// on platforms that hide it until a permission grant is active. The
/// device set is replaced wholesale on re-enumeration, never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Opaque stable identifier for the device
    pub device_id: String,
    /// Human-readable name, or empty if the platform withholds it
    pub label: String,
}

impl CameraDevice {
    /// Display name for pickers: the label, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.device_id
        } else {
            &self.label
        }
    }
}

/// Camera facing direction hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Front-facing (selfie) camera
    User,
    /// Rear-facing camera
    Environment,
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::User => write!(f, "user"),
            FacingMode::Environment => write!(f, "environment"),
        }
    }
}

/// Video part of a stream request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoConstraint {
    /// Any video-capable camera
    Any,
    /// A camera with exactly this facing mode. Hard requirement: the
    /// provider must fail rather than fall back to another camera.
    Exact(FacingMode),
}

/// Constraints passed to [`CameraAccess::request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    /// Whether an audio track is requested alongside video
    pub audio: bool,
    /// Video device requirements
    pub video: VideoConstraint,
}

impl StreamConstraints {
    /// Video-only request for any camera
    pub fn any_video() -> Self {
        Self {
            audio: false,
            video: VideoConstraint::Any,
        }
    }

    /// Video-only request demanding an exact facing mode
    pub fn exact_facing(facing: FacingMode) -> Self {
        Self {
            audio: false,
            video: VideoConstraint::Exact(facing),
        }
    }
}

/// Camera capability provider
///
/// All operations are asynchronous; callers must chain them strictly
/// (each step only after the previous completed) — see
/// [`negotiate`](negotiator::negotiate) for why the order matters.
#[async_trait]
pub trait CameraAccess: Send + Sync {
    /// Request camera access, triggering a permission prompt if the
    /// platform requires one. Fails with [`crate::errors::AccessError`]
    /// if permission is refused, no device satisfies the constraints, or
    /// a grant is already outstanding (the handle is single-tenant).
    async fn request(&self, constraints: &StreamConstraints) -> AccessResult<()>;

    /// Release the currently held camera handle. Idempotent: releasing
    /// when nothing is held is a no-op.
    async fn release(&self) -> AccessResult<()>;

    /// List available video input devices. On permission-gated platforms
    /// this only returns labeled devices after at least one successful
    /// request/release cycle.
    async fn enumerate_devices(&self) -> AccessResult<Vec<CameraDevice>>;
}

/// Scoped camera grant
///
/// Created after a successful [`CameraAccess::request`]. Consuming it via
/// [`AccessGuard::release`] performs the orderly release; if the guard is
/// dropped instead (caller torn down, negotiation chain abandoned) the
/// release is spawned onto the runtime so the camera lock is not leaked.
pub struct AccessGuard {
    access: Option<Arc<dyn CameraAccess>>,
}

impl AccessGuard {
    /// Wrap a granted handle
    pub fn new(access: Arc<dyn CameraAccess>) -> Self {
        Self {
            access: Some(access),
        }
    }

    /// Release the grant and wait for the provider to confirm
    pub async fn release(mut self) -> AccessResult<()> {
        match self.access.take() {
            Some(access) => access.release().await,
            None => Ok(()),
        }
    }
}

impl Drop for AccessGuard {
    fn drop(&mut self) {
        let Some(access) = self.access.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = access.release().await {
                        warn!(error = %err, "Deferred camera release failed");
                    }
                });
            }
            Err(_) => {
                warn!("Camera grant dropped outside a runtime; release not performed");
            }
        }
    }
}
