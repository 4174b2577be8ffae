// SPDX-License-Identifier: GPL-3.0-only

//! Append-only result sink
//!
//! Results are kept in encounter order and never mutated in place;
//! duplicate decoded values are legal and all appear. The headline is
//! the most recent non-empty decoded code, exposed separately for
//! display.

use crate::engine::Detection;

/// One decode event as stored by the session
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Decoded code, normalized: empty strings become `None`
    pub code: Option<String>,
    /// Engine-specific payload carried through unchanged
    pub raw: serde_json::Value,
}

impl From<Detection> for ScanResult {
    fn from(detection: Detection) -> Self {
        let code = detection.code.filter(|code| !code.is_empty());
        Self {
            code,
            raw: detection.raw,
        }
    }
}

/// Ordered collection of scan results plus the headline code.
///
/// Invariant: the headline is set iff at least one stored result carries
/// a non-empty code.
#[derive(Debug, Default)]
pub struct ResultLog {
    entries: Vec<ScanResult>,
    headline: Option<String>,
}

impl ResultLog {
    /// Append a result, updating the headline if it carries a code
    pub fn push(&mut self, result: ScanResult) {
        if let Some(code) = &result.code {
            self.headline = Some(code.clone());
        }
        self.entries.push(result);
    }

    /// All results in detection order
    pub fn entries(&self) -> &[ScanResult] {
        &self.entries
    }

    /// Most recent non-empty decoded code
    pub fn headline(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard all results and the headline (new session)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.headline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(code: &str) -> ScanResult {
        ScanResult::from(Detection::with_code(code))
    }

    #[test]
    fn test_preserves_detection_order_with_duplicates() {
        let mut log = ResultLog::default();
        log.push(result("111"));
        log.push(result("222"));
        log.push(result("111"));

        let codes: Vec<_> = log
            .entries()
            .iter()
            .map(|r| r.code.as_deref().unwrap())
            .collect();
        assert_eq!(codes, ["111", "222", "111"]);
        assert_eq!(log.headline(), Some("111"));
    }

    #[test]
    fn test_codeless_result_does_not_set_headline() {
        let mut log = ResultLog::default();
        log.push(ScanResult {
            code: None,
            raw: serde_json::Value::Null,
        });
        assert_eq!(log.len(), 1);
        assert_eq!(log.headline(), None);
    }

    #[test]
    fn test_empty_code_is_normalized_away() {
        let detection = Detection {
            code: Some(String::new()),
            raw: serde_json::Value::Null,
        };
        let result = ScanResult::from(detection);
        assert_eq!(result.code, None);
    }

    #[test]
    fn test_clear_resets_headline() {
        let mut log = ResultLog::default();
        log.push(result("999"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.headline(), None);
    }
}
