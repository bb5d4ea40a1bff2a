//! Tests for batch analysis: classification, zoom guessing, shared fields.

use loglens::analyze::{analyze_events, is_json_classified, remove_shared_values};
use loglens::types::RawEvent;
use serde_json::{json, Map, Value};

fn raw(message: &str, timestamp_ms: i64) -> RawEvent {
    RawEvent {
        message: message.to_string(),
        timestamp_ms,
    }
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_classify_json_prefix() {
    assert!(is_json_classified("{\"a\":1}"));
    assert!(is_json_classified("{not even json"));
    assert!(!is_json_classified(" {\"a\":1}"));
    assert!(!is_json_classified("plain text"));
    assert!(!is_json_classified(""));
}

// ============================================================================
// Shape sampling and degeneration
// ============================================================================

#[test]
fn test_empty_json_subset_degenerates() {
    let analysis = analyze_events(vec![raw("plain one", 1), raw("plain two", 2)]);
    assert!(analysis.zoom_guess.is_empty());
    assert!(analysis.shared_fields.is_empty());
    assert!(analysis.events.iter().all(|ev| ev.parsed.is_none()));
}

#[test]
fn test_malformed_longest_degenerates_whole_batch() {
    // The longest JSON-classified message does not parse, so no event gets
    // parsed even though the shorter one is valid JSON.
    let analysis = analyze_events(vec![
        raw("{\"level\":\"info\"}", 1),
        raw("{this is much longer than the valid message but broken", 2),
    ]);
    assert!(analysis.zoom_guess.is_empty());
    assert!(analysis.shared_fields.is_empty());
    assert!(analysis.events.iter().all(|ev| ev.parsed.is_none()));
}

#[test]
fn test_empty_object_longest_degenerates() {
    let analysis = analyze_events(vec![raw("{}", 1)]);
    assert!(analysis.zoom_guess.is_empty());
    assert!(analysis.shared_fields.is_empty());
    assert!(analysis.events[0].parsed.is_none());
}

#[test]
fn test_longest_tie_takes_first() {
    // Same length; the first one is sampled, so the guess sees `level`.
    let analysis = analyze_events(vec![
        raw("{\"level\":\"x\"}", 1),
        raw("{\"scope\":\"y\"}", 2),
    ]);
    assert_eq!(analysis.zoom_guess, vec!["level".to_string()]);
}

#[test]
fn test_individual_parse_failure_downgrades_to_empty_map() {
    let analysis = analyze_events(vec![
        raw("{\"level\":\"info\",\"msg\":\"ok\"}", 1),
        raw("{broken", 2),
    ]);
    let broken = &analysis.events[1];
    assert_eq!(broken.parsed.as_ref().map(Map::len), Some(0));
}

// ============================================================================
// Zoom guessing
// ============================================================================

#[test]
fn test_zoom_guess_keeps_priority_order() {
    let analysis = analyze_events(vec![raw(
        "{\"text\":\"t\",\"level\":\"info\",\"other\":1,\"message\":\"m\"}",
        1,
    )]);
    assert_eq!(
        analysis.zoom_guess,
        vec![
            "level".to_string(),
            "message".to_string(),
            "text".to_string()
        ]
    );
}

#[test]
fn test_zoom_guess_ignores_absent_keys() {
    let analysis = analyze_events(vec![raw("{\"scope\":\"db\",\"other\":true}", 1)]);
    assert_eq!(analysis.zoom_guess, vec!["scope".to_string()]);
}

// ============================================================================
// Shared-field extraction
// ============================================================================

#[test]
fn test_shared_fields_two_event_batch() {
    let analysis = analyze_events(vec![
        raw("{\"level\":\"info\",\"env\":\"prod\",\"msg\":\"start\"}", 1000),
        raw("{\"level\":\"error\",\"env\":\"prod\",\"msg\":\"fail\"}", 2000),
    ]);
    assert_eq!(analysis.zoom_guess, vec!["level".to_string()]);
    assert_eq!(analysis.shared_fields.len(), 1);
    assert_eq!(analysis.shared_fields["env"], json!("prod"));
}

#[test]
fn test_differing_value_disqualifies_forever() {
    // `env` flips once in the middle; coinciding again later cannot restore it.
    let analysis = analyze_events(vec![
        raw("{\"env\":\"prod\",\"k\":1}", 1),
        raw("{\"env\":\"dev\",\"k\":1}", 2),
        raw("{\"env\":\"prod\",\"k\":1}", 3),
    ]);
    assert!(!analysis.shared_fields.contains_key("env"));
    assert_eq!(analysis.shared_fields["k"], json!(1));
}

#[test]
fn test_key_missing_from_one_event_is_not_shared() {
    let analysis = analyze_events(vec![
        raw("{\"env\":\"prod\",\"extra\":\"only here\"}", 1),
        raw("{\"env\":\"prod\"}", 2),
    ]);
    assert!(analysis.shared_fields.contains_key("env"));
    assert!(!analysis.shared_fields.contains_key("extra"));
}

#[test]
fn test_structural_equality_for_nested_values() {
    let analysis = analyze_events(vec![
        raw("{\"ctx\":{\"region\":\"eu\",\"az\":1},\"msg\":\"a\"}", 1),
        raw("{\"ctx\":{\"region\":\"eu\",\"az\":1},\"msg\":\"b\"}", 2),
    ]);
    assert_eq!(analysis.shared_fields["ctx"], json!({"region":"eu","az":1}));
    assert!(!analysis.shared_fields.contains_key("msg"));
}

#[test]
fn test_unparseable_event_does_not_veto_shared_fields() {
    // The broken event has an empty parsed map and sits out the accumulation.
    let analysis = analyze_events(vec![
        raw("{\"env\":\"prod\",\"msg\":\"first message is longest\"}", 1),
        raw("{broken", 2),
        raw("{\"env\":\"prod\",\"msg\":\"x\"}", 3),
    ]);
    assert_eq!(analysis.shared_fields["env"], json!("prod"));
}

#[test]
fn test_non_json_events_do_not_participate() {
    let analysis = analyze_events(vec![
        raw("plain line", 1),
        raw("{\"env\":\"prod\",\"msg\":\"aaaa\"}", 2),
        raw("{\"env\":\"prod\",\"msg\":\"bbbb\"}", 3),
    ]);
    assert_eq!(analysis.shared_fields["env"], json!("prod"));
    assert!(analysis.events[0].parsed.is_none());
}

#[test]
fn test_batch_order_preserved() {
    let analysis = analyze_events(vec![
        raw("plain first", 1),
        raw("{\"env\":\"prod\",\"msg\":\"second\"}", 2),
        raw("plain third", 3),
        raw("{\"env\":\"prod\",\"msg\":\"fourth\"}", 4),
    ]);
    let messages: Vec<&str> = analysis
        .events
        .iter()
        .map(|ev| ev.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "plain first",
            "{\"env\":\"prod\",\"msg\":\"second\"}",
            "plain third",
            "{\"env\":\"prod\",\"msg\":\"fourth\"}"
        ]
    );
}

// ============================================================================
// Shared-value removal
// ============================================================================

#[test]
fn test_remove_shared_values_strips_only_shared_keys() {
    let mut analysis = analyze_events(vec![
        raw("{\"env\":\"prod\",\"level\":\"info\",\"msg\":\"start\"}", 1),
        raw("{\"env\":\"prod\",\"level\":\"error\",\"msg\":\"fail\"}", 2),
    ]);
    let shared = analysis.shared_fields.clone();
    remove_shared_values(&mut analysis.events, &shared);

    for ev in &analysis.events {
        let parsed = ev.parsed.as_ref().unwrap();
        assert!(!parsed.contains_key("env"));
        assert!(parsed.contains_key("level"));
        assert!(parsed.contains_key("msg"));
    }
}

#[test]
fn test_remove_shared_values_is_idempotent() {
    let mut analysis = analyze_events(vec![
        raw("{\"env\":\"prod\",\"msg\":\"aaaa\"}", 1),
        raw("{\"env\":\"prod\",\"msg\":\"bbbb\"}", 2),
    ]);
    let shared = analysis.shared_fields.clone();
    remove_shared_values(&mut analysis.events, &shared);
    let once: Vec<_> = analysis.events.iter().map(|ev| ev.parsed.clone()).collect();
    remove_shared_values(&mut analysis.events, &shared);
    let twice: Vec<_> = analysis.events.iter().map(|ev| ev.parsed.clone()).collect();
    assert_eq!(once, twice);
}

#[test]
fn test_remove_with_empty_shared_set_is_noop() {
    let mut analysis = analyze_events(vec![
        raw("{\"a\":1,\"pad\":\"xx\"}", 1),
        raw("{\"a\":2}", 2),
    ]);
    let before: Vec<_> = analysis.events.iter().map(|ev| ev.parsed.clone()).collect();
    remove_shared_values(&mut analysis.events, &Map::new());
    let after: Vec<_> = analysis.events.iter().map(|ev| ev.parsed.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_shared_union_remainder_reconstructs_original() {
    let originals = [
        "{\"env\":\"prod\",\"region\":\"eu\",\"level\":\"info\",\"n\":1}",
        "{\"env\":\"prod\",\"region\":\"eu\",\"level\":\"warn\",\"n\":2}",
    ];
    let mut analysis =
        analyze_events(originals.iter().map(|m| raw(m, 1)).collect::<Vec<_>>());
    let shared = analysis.shared_fields.clone();
    remove_shared_values(&mut analysis.events, &shared);

    for (ev, original) in analysis.events.iter().zip(originals.iter()) {
        let original: Map<String, Value> = serde_json::from_str(original).unwrap();
        let remainder = ev.parsed.as_ref().unwrap();
        // No key in both places, and together they rebuild the original.
        for key in shared.keys() {
            assert!(!remainder.contains_key(key));
        }
        let mut rebuilt = remainder.clone();
        rebuilt.extend(shared.clone());
        assert_eq!(rebuilt, original);
    }
}
