//! Tests for the tolerant JSON front-end.

use serde_json::json;

use super::{parse_filter_text, Applied};

fn entries(raw: &str) -> Vec<serde_json::Value> {
    match parse_filter_text(raw).unwrap() {
        Applied::Filters(entries) => entries,
        Applied::Cleared => panic!("expected filters, got clear-all"),
    }
}

#[test]
fn test_empty_text_clears() {
    assert_eq!(parse_filter_text("").unwrap(), Applied::Cleared);
    assert_eq!(parse_filter_text("  \n\t ").unwrap(), Applied::Cleared);
}

#[test]
fn test_bare_array() {
    let parsed = entries(r#"[{"field":"country","relation":"=","value":"US"}]"#);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0]["field"], "country");
}

#[test]
fn test_wrapped_object() {
    let parsed = entries(r#"{"filters": [{"field":"language","relation":"=","value":"en"}]}"#);
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_braceless_fragment() {
    let parsed = entries(
        "\"filters\": [\n  {\"field\":\"country\",\"relation\":\"=\",\"value\":\"US\"}\n]",
    );
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_unquoted_filters_key_diagnostic() {
    let raw = r#"filters: [{"field":"tag","key":"plan","relation":"=","value":"pro"}]"#;
    let diag = parse_filter_text(raw).unwrap_err();
    assert_eq!(diag.line, 1);
    assert_eq!(diag.offset, 0);
    assert!(diag.message.contains("must be quoted"), "{}", diag.message);
}

#[test]
fn test_unquoted_key_found_after_blank_lines() {
    let raw = "\n\n  filters: []";
    let diag = parse_filter_text(raw).unwrap_err();
    assert_eq!(diag.line, 3);
    assert_eq!(diag.offset, 2);
}

#[test]
fn test_line_comment_diagnostic() {
    let raw = "[\n  // my note\n]";
    let diag = parse_filter_text(raw).unwrap_err();
    assert_eq!(diag.line, 2);
    assert!(diag.message.contains("comments"), "{}", diag.message);
}

#[test]
fn test_block_comment_diagnostic() {
    let raw = "[ /* note */ ]";
    let diag = parse_filter_text(raw).unwrap_err();
    assert_eq!(diag.line, 1);
    assert_eq!(diag.offset, 2);
}

#[test]
fn test_comment_marker_inside_string_is_fine() {
    let parsed = entries(r#"[{"field":"country","relation":"=","value":"http://x"}]"#);
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_trailing_comma_diagnostic() {
    let raw = "[\n  {\"a\": 1,}\n]";
    let diag = parse_filter_text(raw).unwrap_err();
    assert_eq!(diag.line, 2);
    assert!(diag.message.contains("trailing comma"), "{}", diag.message);
}

#[test]
fn test_comma_inside_string_is_not_trailing() {
    let parsed = entries(r#"[{"field":"country","relation":"=","value":"a, b"}]"#);
    assert_eq!(parsed[0]["value"], "a, b");
}

#[test]
fn test_parse_failure_reports_line() {
    let raw = "[\n  {\"field\" \"country\"}\n]";
    let diag = parse_filter_text(raw).unwrap_err();
    assert_eq!(diag.line, 2);
    assert!(diag.offset > 0);
}

#[test]
fn test_fragment_parse_failure_positions_against_raw_text() {
    // Broken JSON inside the brace-less fragment form.
    let raw = "\"filters\": [\n  {\"field\" \"country\"}\n]";
    let diag = parse_filter_text(raw).unwrap_err();
    assert_eq!(diag.line, 2);
}

#[test]
fn test_non_array_payload_rejected() {
    let diag = parse_filter_text("{\"other\": 1}").unwrap_err();
    assert!(diag.message.contains("expected a JSON array"), "{}", diag.message);

    let diag = parse_filter_text("42").unwrap_err();
    assert!(diag.message.contains("expected a JSON array"), "{}", diag.message);

    let diag = parse_filter_text("{\"filters\": 7}").unwrap_err();
    assert!(diag.message.contains("expected a JSON array"), "{}", diag.message);
}

#[test]
fn test_edge_separators_are_stripped() {
    let parsed = entries(
        r#"[{"operator":"OR"}, {"field":"country","relation":"=","value":"US"}, {"operator":"OR"}]"#,
    );
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0]["field"], "country");
}

#[test]
fn test_interior_separators_survive() {
    let parsed = entries(
        r#"[{"field":"country","relation":"=","value":"US"}, {"operator":"OR"}, {"field":"country","relation":"=","value":"CA"}]"#,
    );
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[1], json!({"operator": "OR"}));
}

#[test]
fn test_unknown_entries_pass_through_to_assembler() {
    // The front-end validates shape, not vocabulary; unknown fields are the
    // assembler's problem (it skips them).
    let parsed = entries(r#"[{"field":"unknown_field"}]"#);
    assert_eq!(parsed.len(), 1);
}
