use crate::breakdown::{compute_breakdown_str, Breakdown};
use crate::errors::CounterError;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format new anchors and reset instants are written in.
pub const ANCHOR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Time elapsed since the anchor.
    #[default]
    Forward,
    /// Time remaining until the anchor.
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPeriod {
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "duration", alias = "durationMs", default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub reset_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "startDate", alias = "anchorInstant")]
    pub anchor: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub reset_history: Vec<ResetPeriod>,
    #[serde(default)]
    pub original_start_date: String,
}

impl CounterRecord {
    /// Fills fields older records were saved without.
    pub fn migrate(&mut self, now: NaiveDateTime) {
        if self.original_start_date.is_empty() {
            self.original_start_date = self.anchor.clone();
        }
        if self.created_at.is_empty() {
            self.created_at = format_instant(now);
        }
    }

    pub fn anchor_instant(&self) -> Result<NaiveDateTime, CounterError> {
        parse_anchor(&self.anchor)
    }

    /// Breakdown at `now`. An anchor that does not parse counts as zero.
    pub fn breakdown_at(&self, now: NaiveDateTime) -> Breakdown {
        compute_breakdown_str(&self.anchor, now, self.direction)
    }

    /// Length of the running period in milliseconds: elapsed for forward
    /// counters, remaining for reverse ones. Never negative.
    pub fn current_period_ms(&self, now: NaiveDateTime) -> i64 {
        let Ok(anchor) = self.anchor_instant() else {
            return 0;
        };
        let span = match self.direction {
            Direction::Forward => now - anchor,
            Direction::Reverse => anchor - now,
        };
        span.num_milliseconds().max(0)
    }
}

/// Parses the timestamp shapes counters have been stored with: local
/// `datetime-local` values with or without seconds, and RFC 3339 instants,
/// which are converted to local wall time.
pub fn parse_anchor(value: &str) -> Result<NaiveDateTime, CounterError> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| CounterError::InvalidAnchor(value.to_string()))
}

pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(ANCHOR_FORMAT).to_string()
}

/// Fields a user supplies when creating or editing a counter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterDraft {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "startDate", alias = "anchorInstant", default)]
    pub anchor: String,
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub mode: crate::book::ImportMode,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CounterBreakdown {
    pub id: String,
    pub direction: Direction,
    pub breakdown: Breakdown,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetAllResponse {
    pub removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_datetime_local_values() {
        let parsed = parse_anchor("2024-03-05T07:08").unwrap();
        assert_eq!(format_instant(parsed), "2024-03-05T07:08:00");

        let parsed = parse_anchor("2024-03-05T07:08:09.250").unwrap();
        assert_eq!(format_instant(parsed), "2024-03-05T07:08:09");

        assert!(parse_anchor("2024-03-05 07:08").is_ok());
    }

    #[test]
    fn parses_rfc3339_into_local_time() {
        let parsed = parse_anchor("2024-03-05T07:08:09.000Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-03-05T07:08:09Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_anchor("yesterday"), Err(CounterError::InvalidAnchor(_))));
        assert!(parse_anchor("").is_err());
    }

    #[test]
    fn bad_anchor_breaks_down_to_zero() {
        let record = CounterRecord {
            id: "x".into(),
            name: "broken".into(),
            anchor: "not a date".into(),
            direction: Direction::Forward,
            created_at: String::new(),
            reset_history: Vec::new(),
            original_start_date: String::new(),
        };
        let now = parse_anchor("2024-01-01T00:00").unwrap();
        assert!(record.breakdown_at(now).is_zero());
        assert_eq!(record.current_period_ms(now), 0);
    }

    #[test]
    fn reads_legacy_records_without_optional_fields() {
        let json = r#"{"id":"1700000000000","name":"No coffee","startDate":"2024-01-01T08:00"}"#;
        let mut record: CounterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.direction, Direction::Forward);
        assert!(record.reset_history.is_empty());

        let now = parse_anchor("2024-02-01T08:00").unwrap();
        record.migrate(now);
        assert_eq!(record.original_start_date, "2024-01-01T08:00");
        assert_eq!(record.created_at, "2024-02-01T08:00:00");
    }

    #[test]
    fn writes_original_field_names() {
        let record = CounterRecord {
            id: "a".into(),
            name: "Launch".into(),
            anchor: "2030-01-01T00:00".into(),
            direction: Direction::Reverse,
            created_at: "2024-01-01T00:00:00".into(),
            reset_history: vec![ResetPeriod {
                start_date: "2023-01-01T00:00".into(),
                end_date: "2023-12-31T00:00:00".into(),
                duration_ms: 10,
                reset_at: "2023-12-31T00:00:00".into(),
            }],
            original_start_date: "2023-01-01T00:00".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["startDate"], "2030-01-01T00:00");
        assert_eq!(value["direction"], "reverse");
        assert_eq!(value["resetHistory"][0]["duration"], 10);
        assert_eq!(value["originalStartDate"], "2023-01-01T00:00");
    }
}
