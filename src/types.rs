use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One event as returned by CloudWatch `get_log_events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub message: String,
    pub timestamp_ms: i64,
}

/// One log event flowing through the rendering pipeline.
///
/// `parsed` is `None` for events that were never JSON-classified (or whose
/// batch had no usable JSON structure); an empty map marks a JSON-classified
/// event whose own parse failed or produced nothing.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub message: String,
    pub timestamp_ms: i64,
    pub parsed: Option<Map<String, Value>>,
}

impl LogEvent {
    pub fn from_raw(raw: RawEvent) -> Self {
        Self {
            message: raw.message,
            timestamp_ms: raw.timestamp_ms,
            parsed: None,
        }
    }
}
