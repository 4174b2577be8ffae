// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application name (config directory, scan target labels)
pub const APP_NAME: &str = "codescan";

/// Config file name inside the app config directory
pub const CONFIG_FILE: &str = "config.json";

/// User-agent substrings that classify a platform as mobile/tablet.
///
/// Matching is case-insensitive. The set is fixed: Android, iOS variants,
/// BlackBerry, Windows Mobile and the known mobile browser engines that
/// gate device enumeration behind an active permission grant.
pub const MOBILE_UA_SIGNATURES: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "windows mobile",
    "iemobile",
    "puffin",
    "silk",
    "opera mini",
];

/// Fallback user-agent used when neither the CLI flag nor the config
/// provides one. A desktop signature, so negotiation requests any camera.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64)";

/// Bounded capacity of the engine -> session detection channel
pub const DETECTION_CHANNEL_CAPACITY: usize = 16;

/// Pause between decode attempts in the engine capture loop
pub const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(33);
