//! Batch analysis: JSON classification, zoom guessing, shared-field extraction.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::types::{LogEvent, RawEvent};

/// Keys worth surfacing first when no explicit zoom is given. The guess keeps
/// the ones actually present in the sampled message, in this order.
const ZOOM_PRIORITY: [&str; 7] = [
    "level",
    "logLevel",
    "log_level",
    "message",
    "scope",
    "text",
    "exception",
];

/// Per-key agreement across a batch. A key absent from the accumulator has
/// not been seen yet; `Disagreed` is absorbing.
enum FieldState {
    Agreed { value: Value, seen: usize },
    Disagreed,
}

/// Result of analyzing one batch of raw events.
#[derive(Debug)]
pub struct Analysis {
    pub events: Vec<LogEvent>,
    pub zoom_guess: Vec<String>,
    pub shared_fields: Map<String, Value>,
}

/// A message is JSON-classified iff it starts with `{`. Purely syntactic;
/// the parse attempt comes later.
pub fn is_json_classified(message: &str) -> bool {
    message.starts_with('{')
}

/// Classify, sample, and extract shared fields from one batch.
///
/// The longest JSON-classified message (first one on ties) is sampled to
/// guess zoom keys. If there is no JSON-classified message, or the sample
/// fails to parse to a non-empty object, the batch degenerates: no zoom
/// guess, no shared fields, no per-event parsing.
pub fn analyze_events(raw: Vec<RawEvent>) -> Analysis {
    let mut events: Vec<LogEvent> = raw.into_iter().map(LogEvent::from_raw).collect();

    let mut longest: Option<&str> = None;
    for ev in events.iter().filter(|ev| is_json_classified(&ev.message)) {
        match longest {
            Some(seen) if ev.message.len() <= seen.len() => {}
            _ => longest = Some(&ev.message),
        }
    }

    let sample = match longest.and_then(parse_object) {
        Some(obj) if !obj.is_empty() => obj,
        _ => {
            return Analysis {
                events,
                zoom_guess: Vec::new(),
                shared_fields: Map::new(),
            }
        }
    };

    let zoom_guess: Vec<String> = ZOOM_PRIORITY
        .iter()
        .filter(|key| sample.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    for ev in events.iter_mut() {
        if is_json_classified(&ev.message) {
            ev.parsed = Some(parse_object(&ev.message).unwrap_or_default());
        }
    }

    Analysis {
        shared_fields: collect_shared_fields(&events),
        events,
        zoom_guess,
    }
}

/// Remove every shared key from every event's parsed map. Events without a
/// parsed map, or without the key, are untouched; calling this twice with
/// the same keys is a no-op the second time.
pub fn remove_shared_values(events: &mut [LogEvent], shared_fields: &Map<String, Value>) {
    if shared_fields.is_empty() {
        return;
    }
    for ev in events.iter_mut() {
        let Some(parsed) = ev.parsed.as_mut() else {
            continue;
        };
        for key in shared_fields.keys() {
            parsed.remove(key);
        }
    }
}

fn parse_object(message: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(message) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// A field is shared iff every event with a non-empty parsed map carries it
/// with a structurally equal value. One mismatch disqualifies the key for
/// the rest of the batch, and so does absence from any participating event.
fn collect_shared_fields(events: &[LogEvent]) -> Map<String, Value> {
    let mut participants = 0usize;
    let mut states: BTreeMap<String, FieldState> = BTreeMap::new();

    for ev in events {
        let Some(parsed) = &ev.parsed else { continue };
        if parsed.is_empty() {
            continue;
        }
        participants += 1;
        for (key, value) in parsed {
            match states.entry(key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(FieldState::Agreed {
                        value: value.clone(),
                        seen: 1,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let next = match slot.get_mut() {
                        FieldState::Agreed { value: agreed, seen } => {
                            if *agreed == *value {
                                *seen += 1;
                                None
                            } else {
                                Some(FieldState::Disagreed)
                            }
                        }
                        FieldState::Disagreed => None,
                    };
                    if let Some(state) = next {
                        slot.insert(state);
                    }
                }
            }
        }
    }

    states
        .into_iter()
        .filter_map(|(key, state)| match state {
            FieldState::Agreed { value, seen } if seen == participants => Some((key, value)),
            _ => None,
        })
        .collect()
}
