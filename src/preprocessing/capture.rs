//! Parsing of candump style capture lines and matching them against the
//! injected frame of an attack.

use crate::preprocessing::CaptureError;
use std::str::FromStr;

/// Character of an injection pattern that matches any captured character.
pub const WILDCARD: char = 'X';

/// One line of a capture log: `(1030000000.000000) can0 354#200A000000027480`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanCapture {
    pub timestamp: f64,
    pub interface: String,
    pub id: String,
    pub payload: String,
}

impl CanCapture {
    pub fn parse(line: &str) -> Result<CanCapture, CaptureError> {
        let mut parts = line.split_whitespace();
        let stamp = parts.next().ok_or(CaptureError::MissingField("timestamp"))?;
        let interface = parts.next().ok_or(CaptureError::MissingField("interface"))?;
        let frame = parts.next().ok_or(CaptureError::MissingField("frame"))?;

        let inner = stamp
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(stamp);
        let timestamp = inner
            .parse::<f64>()
            .map_err(|_| CaptureError::BadTimestamp(stamp.to_string()))?;

        let (id, payload) = frame
            .split_once('#')
            .ok_or_else(|| CaptureError::MissingSeparator(frame.to_string()))?;

        Ok(CanCapture {
            timestamp,
            interface: interface.to_string(),
            id: id.to_string(),
            payload: payload.to_string(),
        })
    }

    /// Payload split into bytes, padded with empty fields (or cut) to
    /// `width` bytes.
    pub fn payload_bytes(&self, width: usize) -> Vec<String> {
        let mut bytes = byte_pairs(&self.payload);
        bytes.resize(width, String::new());
        bytes
    }
}

impl FromStr for CanCapture {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanCapture::parse(s)
    }
}

/// Injected id or payload, `X` marking positions that match anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexPattern(String);

impl HexPattern {
    pub fn new(pattern: &str) -> HexPattern {
        HexPattern(pattern.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Same length, and every non-wildcard character equal.
    pub fn matches(&self, data: &str) -> bool {
        self.0.chars().count() == data.chars().count()
            && self
                .0
                .chars()
                .zip(data.chars())
                .all(|(p, d)| p == WILDCARD || p == d)
    }
}

/// An absent pattern matches every captured string.
pub fn hex_matches(data: &str, pattern: Option<&HexPattern>) -> bool {
    pattern.is_none_or(|p| p.matches(data))
}

/// Splits a string into two-character groups; an odd trailing character is
/// dropped.
pub fn byte_pairs(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    chars
        .chunks_exact(2)
        .map(|pair| pair.iter().collect())
        .collect()
}

/// Inclusive on both ends; an absent interval contains everything.
pub fn within_interval(timestamp: f64, interval: Option<(f64, f64)>) -> bool {
    interval.is_none_or(|(start, end)| start <= timestamp && timestamp <= end)
}

/// Normalises the `injection_id` of the capture metadata to the three
/// upper-case characters used in the logs: `0xF4` becomes `0F4`, wildcard
/// patterns such as `XXX` are kept as they are.
pub fn normalize_injection_id(id: Option<&str>) -> Option<String> {
    let id = id.map(str::trim).filter(|s| !s.is_empty())?;
    let normalized = if id.starts_with(WILDCARD) {
        id.to_string()
    } else {
        let hex = id
            .strip_prefix("0x")
            .or_else(|| id.strip_prefix("0X"))
            .unwrap_or(id);
        format!("{hex:0>3}")
    };
    Some(normalized.to_uppercase())
}
