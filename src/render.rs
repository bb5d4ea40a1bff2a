//! Rendering events into single display lines.

use chrono::{DateTime, Local, Utc};
use serde_json::Value;

use crate::trim::trim_event;
use crate::types::LogEvent;

/// Render one event as `HH:MM:SS <text>` (time of day in the local zone).
///
/// With zoom fields in effect and a usable parsed map, the zoom values come
/// first and the rest of the object trails as compact JSON; otherwise the
/// raw message is trimmed and used as-is. The assembled text goes through
/// the trimmer either way, so a zoomed line whose first part is a timestamp
/// or GUID gets cleaned up too.
pub fn render_event(event: &LogEvent, zoom_fields: &[String]) -> String {
    let text = if zoom_fields.is_empty() {
        trim_event(&event.message)
    } else {
        zoom_in(event, zoom_fields)
    };
    format!("{} {}", format_time(event.timestamp_ms), trim_event(&text))
}

/// Pull the zoom keys out of a working copy of the parsed map, tab-join
/// their values, and append whatever remains as compact JSON. String values
/// render raw; null or missing keys render nothing; everything else renders
/// as compact JSON.
fn zoom_in(event: &LogEvent, zoom_fields: &[String]) -> String {
    let mut remaining = match &event.parsed {
        Some(parsed) if !parsed.is_empty() => parsed.clone(),
        _ => return event.message.clone(),
    };

    let mut parts: Vec<String> = Vec::new();
    for key in zoom_fields {
        match remaining.remove(key) {
            Some(Value::String(text)) => parts.push(text),
            Some(Value::Null) | None => {}
            Some(other) => parts.push(other.to_string()),
        }
    }

    format!("{}\t{}", parts.join("\t"), Value::Object(remaining))
}

fn format_time(timestamp_ms: i64) -> String {
    let ts = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp_millis(0).unwrap());
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}
