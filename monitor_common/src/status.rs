//! Status endpoint payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path polled by the dashboard.
pub const STATUS_PATH: &str = "/api/status";

/// Path the external digit detector posts raw readings to.
pub const READINGS_PATH: &str = "/api/readings";

/// Dashboard polling interval.
pub const POLL_INTERVAL_MS: u64 = 100;

/// Body of `GET /api/status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Stabilised weight in kg
    pub gewicht: i64,
}

/// Body of `POST /api/readings`. `None` means the detector saw no digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReading {
    pub value: Option<i64>,
}

/// A single numeric weight reading as shown on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading(pub f64);

impl Reading {
    /// Extract the reading from a status body.
    ///
    /// Returns `None` when `gewicht` is absent or not a number; every other
    /// field is ignored.
    pub fn from_status_json(value: &serde_json::Value) -> Option<Self> {
        value.get("gewicht").and_then(|v| v.as_f64()).map(Reading)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<StatusResponse> for Reading {
    fn from(status: StatusResponse) -> Self {
        Reading(status.gewicht as f64)
    }
}

impl fmt::Display for Reading {
    // f64's Display already drops a trailing ".0", matching how a browser
    // renders JSON numbers. Browsers also print -0 as "0".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            return f.write_str("0");
        }
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reading_from_integer_field() {
        let reading = Reading::from_status_json(&json!({"gewicht": 1234}));
        assert_eq!(reading, Some(Reading(1234.0)));
        assert_eq!(reading.unwrap().to_string(), "1234");
    }

    #[test]
    fn test_reading_keeps_fraction() {
        let reading = Reading::from_status_json(&json!({"gewicht": 12.5, "other": "x"})).unwrap();
        assert_eq!(reading.to_string(), "12.5");
    }

    #[test]
    fn test_negative_zero_renders_as_zero() {
        let reading = Reading::from_status_json(&json!({"gewicht": -0.0})).unwrap();
        assert_eq!(reading.to_string(), "0");
        assert_eq!(Reading(-0.0).to_string(), "0");
        assert_eq!(Reading(-12.5).to_string(), "-12.5");
    }

    #[test]
    fn test_missing_or_non_numeric_field_is_ignored() {
        assert_eq!(Reading::from_status_json(&json!({})), None);
        assert_eq!(Reading::from_status_json(&json!({"gewicht": "1234"})), None);
        assert_eq!(Reading::from_status_json(&json!({"gewicht": null})), None);
        assert_eq!(Reading::from_status_json(&json!([1, 2])), None);
    }

    #[test]
    fn test_status_response_wire_format() {
        let json = serde_json::to_string(&StatusResponse { gewicht: 605 }).unwrap();
        assert_eq!(json, r#"{"gewicht":605}"#);

        let raw: RawReading = serde_json::from_str(r#"{"value":null}"#).unwrap();
        assert_eq!(raw.value, None);
    }
}
