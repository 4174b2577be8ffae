// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera capability provider
//!
//! Implements [`CameraAccess`] over the kernel video4linux interface.
//! A request opens the first video-capture node and holds its file
//! descriptor as the exclusive grant; release drops it. Enumeration
//! lists all capture-capable nodes with their sysfs card names.
//!
//! V4L2 does not report which way a camera faces, so an exact
//! facing-mode constraint is refused instead of silently handing out
//! whatever camera happens to exist.

use super::{CameraAccess, CameraDevice, StreamConstraints, VideoConstraint};
use crate::errors::{AccessError, AccessResult};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, info};
use v4l::capability::Flags;
use v4l::context::enum_devices;

/// An outstanding camera grant
struct Grant {
    device_id: String,
    /// Open descriptor keeping the node busy for the grant's duration;
    /// dropping it is the release. Absent only for grants seeded in
    /// tests, where no hardware backs the grant.
    _handle: Option<v4l::Device>,
}

/// Camera capability provider backed by `/dev/video*` devices
#[derive(Default)]
pub struct V4l2Access {
    held: Mutex<Option<Grant>>,
}

impl V4l2Access {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with a grant already outstanding, for exercising the
    /// single-tenant refusal without hardware
    #[cfg(test)]
    fn with_outstanding_grant(device_id: &str) -> Self {
        Self {
            held: Mutex::new(Some(Grant {
                device_id: device_id.to_string(),
                _handle: None,
            })),
        }
    }

    /// All video-capture nodes, ordered by device index.
    ///
    /// Nodes that cannot be opened or that lack the capture capability
    /// (metadata nodes, output devices) are skipped.
    fn capture_nodes() -> Vec<(usize, CameraDevice)> {
        let mut nodes: Vec<(usize, CameraDevice)> = enum_devices()
            .into_iter()
            .filter_map(|node| {
                let index = node.index();
                let device = v4l::Device::new(index).ok()?;
                let caps = device.query_caps().ok()?;
                if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
                    return None;
                }
                let device_id = node.path().to_string_lossy().to_string();
                let label = node.name().unwrap_or_default();
                debug!(device_id = %device_id, label = %label, "Found capture device");
                Some((index, CameraDevice { device_id, label }))
            })
            .collect();
        nodes.sort_by_key(|(index, _)| *index);
        nodes
    }
}

#[async_trait]
impl CameraAccess for V4l2Access {
    async fn request(&self, constraints: &StreamConstraints) -> AccessResult<()> {
        if let VideoConstraint::Exact(facing) = constraints.video {
            // Facing direction is not discoverable through V4L2; a hard
            // facing requirement must fail rather than fall back.
            return Err(AccessError::ConstraintUnsatisfiable(format!(
                "cannot guarantee a {}-facing camera",
                facing
            )));
        }

        // The handle is single-tenant: refuse while a grant is
        // outstanding, never hand out a second one.
        let mut held = self.held.lock().unwrap();
        if held.is_some() {
            return Err(AccessError::Denied(
                "camera handle already held".to_string(),
            ));
        }

        let (index, device) = Self::capture_nodes()
            .into_iter()
            .next()
            .ok_or(AccessError::NoDevice)?;
        let opened = v4l::Device::new(index)
            .map_err(|err| AccessError::Denied(format!("{}: {}", device.device_id, err)))?;

        info!(device_id = %device.device_id, "Acquired camera");
        *held = Some(Grant {
            device_id: device.device_id,
            _handle: Some(opened),
        });
        Ok(())
    }

    async fn release(&self) -> AccessResult<()> {
        let mut held = self.held.lock().unwrap();
        if let Some(grant) = held.take() {
            info!(device_id = %grant.device_id, "Released camera");
        }
        Ok(())
    }

    async fn enumerate_devices(&self) -> AccessResult<Vec<CameraDevice>> {
        Ok(Self::capture_nodes()
            .into_iter()
            .map(|(_, device)| device)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::FacingMode;

    #[tokio::test]
    async fn test_exact_facing_constraint_is_refused() {
        let access = V4l2Access::new();
        let constraints = StreamConstraints::exact_facing(FacingMode::Environment);
        let result = access.request(&constraints).await;
        assert!(matches!(
            result,
            Err(AccessError::ConstraintUnsatisfiable(_))
        ));
    }

    #[tokio::test]
    async fn test_second_request_while_grant_outstanding_is_denied() {
        let access = V4l2Access::with_outstanding_grant("/dev/video0");
        let result = access.request(&StreamConstraints::any_video()).await;
        assert!(matches!(result, Err(AccessError::Denied(_))));

        // The outstanding grant is untouched by the refused request
        assert!(access.held.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_release_clears_outstanding_grant() {
        let access = V4l2Access::with_outstanding_grant("/dev/video0");
        access.release().await.unwrap();
        assert!(access.held.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_release_without_grant_is_noop() {
        let access = V4l2Access::new();
        access.release().await.unwrap();
        access.release().await.unwrap();
    }
}
