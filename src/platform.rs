// SPDX-License-Identifier: GPL-3.0-only

//! Platform classification from an injected user-agent string
//!
//! Mobile platforms refuse to enumerate labeled camera devices until a
//! permission grant is active, so the negotiator needs to know up front
//! whether it must demand the rear-facing camera. The classification is a
//! pure predicate over the reported user-agent string; callers inject the
//! string rather than reading ambient global state, which keeps the
//! decision deterministic for testing.

use crate::constants::MOBILE_UA_SIGNATURES;

/// Check whether a user-agent string reports a mobile or tablet platform.
///
/// Matches the fixed signature set in
/// [`MOBILE_UA_SIGNATURES`](crate::constants::MOBILE_UA_SIGNATURES),
/// case-insensitively. No side effects.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_UA_SIGNATURES.iter().any(|sig| ua.contains(sig))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_mobile_signatures() {
        let mobile = [
            "Mozilla/5.0 (Linux; Android 10)",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X)",
            "Mozilla/5.0 (iPad; CPU OS 13_3 like Mac OS X)",
            "Mozilla/5.0 (iPod touch; CPU iPhone OS 12_0 like Mac OS X)",
            "Mozilla/5.0 (BlackBerry; U; BlackBerry 9900)",
            "Mozilla/5.0 (compatible; MSIE 9.0; Windows Phone OS 7.5; IEMobile/9.0)",
            "Mozilla/5.0 (webOS/1.4.0; U; en-US)",
            "Mozilla/5.0 (Windows Mobile 6.5)",
            "Mozilla/5.0 (X11; U; Linux x86_64) Puffin/8.2.3",
            "Mozilla/5.0 (Linux; U; KFAPWI Build) Silk/3.68",
            "Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)",
        ];
        for ua in mobile {
            assert!(is_mobile_user_agent(ua), "should classify as mobile: {ua}");
        }
    }

    #[test]
    fn test_desktop_user_agents_are_not_mobile() {
        let desktop = [
            "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/119.0",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/605.1.15",
            "",
        ];
        for ua in desktop {
            assert!(!is_mobile_user_agent(ua), "should not be mobile: {ua}");
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(is_mobile_user_agent("MOZILLA (LINUX; ANDROID 13)"));
        assert!(is_mobile_user_agent("opera mini/7.1"));
    }
}
