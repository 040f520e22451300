use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// NOTE: Schema Design Goals
//
// 1. Fidelity: the on-disk document is consumed by external tooling that
//    greps and parses it directly, so the shape is fixed:
//    - one top-level `events` array
//    - camelCase event fields (`timestamp`, `eventType`, `details`)
//    - timestamps pinned to RFC3339 with nine fractional digits, UTC `Z`
//
// 2. Openness: `details` stays a free-form JSON map. Callers attach whatever
//    payload their event needs; only the three identifier keys below are
//    well-known, and caller-supplied values for them always win.

/// Detail key carrying the reconcile identifier of the emitting session.
pub const DETAIL_RECONCILE_ID: &str = "reconcileId";

/// Detail key carrying the trace identifier of the emitting session.
pub const DETAIL_TRACE_ID: &str = "traceId";

/// Detail key carrying the per-session step sequence number.
pub const DETAIL_STEP_SEQ: &str = "stepSeq";

/// One timestamped, typed record with a free-form detail payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Event timestamp (UTC, nanosecond precision on disk)
    #[serde(with = "rfc3339_nanos")]
    pub timestamp: DateTime<Utc>,

    /// Short string tag identifying the kind of event
    #[serde(rename = "eventType")]
    pub event_type: String,

    /// Free-form payload; always contains the three identifier keys
    /// once a session has emitted it
    pub details: Map<String, Value>,
}

impl TraceEvent {
    /// Build an event stamped with the current UTC instant.
    pub fn new(event_type: impl Into<String>, details: Map<String, Value>) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: event_type.into(),
            details,
        }
    }
}

/// The persisted trace document: an append-only, insertion-ordered
/// sequence of events under a single top-level `events` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceFile {
    /// A document without an `events` key decodes as empty rather than
    /// failing, matching how pre-existing files are tolerated.
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

/// RFC3339 serialization with exactly nine fractional digits and a `Z`
/// offset. chrono's serde default trims trailing zeros, which would make
/// the fractional width vary from event to event.
pub mod rfc3339_nanos {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> TraceEvent {
        let mut details = Map::new();
        details.insert("node".to_string(), Value::from(3));
        TraceEvent {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            event_type: "NODE_INIT".to_string(),
            details,
        }
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["eventType"], "NODE_INIT");
        assert_eq!(json["timestamp"], "2026-01-02T03:04:05.000000000Z");
        assert_eq!(json["details"]["node"], 3);
    }

    #[test]
    fn test_timestamp_fixed_nanosecond_width() {
        let timestamp =
            Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap() + chrono::Duration::nanoseconds(120);
        let event = TraceEvent {
            timestamp,
            ..sample_event()
        };

        let json = serde_json::to_value(&event).unwrap();
        let raw = json["timestamp"].as_str().unwrap();
        let fraction = raw
            .split('.')
            .nth(1)
            .and_then(|rest| rest.strip_suffix('Z'))
            .unwrap();
        assert_eq!(fraction.len(), 9, "expected 9 fractional digits in {raw}");
    }

    #[test]
    fn test_event_roundtrip() {
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let decoded: TraceEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.event_type, event.event_type);
        assert_eq!(decoded.timestamp, event.timestamp);
        assert_eq!(decoded.details, event.details);
    }

    #[test]
    fn test_trace_file_preserves_event_order() {
        let mut file = TraceFile::default();
        for n in 0..4 {
            let mut event = sample_event();
            event.event_type = format!("STEP_{n}");
            file.events.push(event);
        }

        let json = serde_json::to_string_pretty(&file).unwrap();
        let decoded: TraceFile = serde_json::from_str(&json).unwrap();

        let types: Vec<&str> = decoded
            .events
            .iter()
            .map(|e| e.event_type.as_str())
            .collect();
        assert_eq!(types, vec!["STEP_0", "STEP_1", "STEP_2", "STEP_3"]);
    }

    #[test]
    fn test_trace_file_tolerates_missing_events_key() {
        let decoded: TraceFile = serde_json::from_str("{}").unwrap();
        assert!(decoded.events.is_empty());
    }
}
