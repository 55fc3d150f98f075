//! Validation rules exercised through JSON part descriptions

use ansisym::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn rules(result: &GenerationResult) -> Vec<&str> {
    result.diagnostics.iter().map(|d| d.rule_id.as_str()).collect()
}

fn part_json(bands: &str) -> String {
    part_json_with("{}", bands)
}

fn part_json_with(directives: &str, bands: &str) -> String {
    format!(
        r#"{{
            "directives": {},
            "attrs": [
                {{"name": "refdes", "value": "U?"}},
                {{"name": "device", "value": "TEST"}},
                {{"name": "author", "value": "a"}},
                {{"name": "copyright", "value": "c"}},
                {{"name": "uselicense", "value": "u"}},
                {{"name": "distlicense", "value": "d"}},
                {{"name": "description", "value": "d"}},
                {{"name": "label", "value": "CTR"}}
            ],
            "blocks": [{{"kind": "block", "packages": [{{"package": "P", "name": "blk"}}], "bands": [{}]}}]
        }}"#,
        directives, bands
    )
}

const ONE_PIN: &str = r#"{"band": "top"},
    {"band": "io", "left": {"name": "A", "pins": {"P": [1]}}},
    {"band": "bottom"}"#;

fn run(json: &str) -> GenerationResult {
    ansisym::generate_from_json(json, &GenerateOptions::default()).expect("valid JSON")
}

#[test]
fn test_broken_fixture_reports_everything() {
    let result =
        AnsisymCore::generate_file(&fixture_path("broken.json"), &GenerateOptions::default())
            .unwrap();
    assert!(result.has_fatal());
    assert!(result.symbols.is_empty());

    let found = rules(&result);
    for rule in [
        "directive_unknown",
        "attr_required",
        "attr_recommended",
        "bidirstyle_unsupported",
        "slot_mismatch",
        "pin_flag_mutex",
        "pin_coverage",
    ] {
        assert!(found.contains(&rule), "missing {} in {:?}", rule, found);
    }
    assert_eq!(result.stats.warning, 7);

    let coverage = result
        .diagnostics
        .iter()
        .find(|d| d.rule_id == "pin_coverage")
        .unwrap();
    assert_eq!(coverage.message, "Pin 4 not used by package SO8.");
    assert_eq!(coverage.severity, Severity::Fatal);

    let slots = result
        .diagnostics
        .iter()
        .find(|d| d.rule_id == "slot_mismatch")
        .unwrap();
    assert_eq!(slots.line, Some(7));
    assert_eq!(slots.block.as_deref(), Some("broken"));
}

#[test]
fn test_band_order() {
    let json = part_json(
        r#"{"band": "io", "left": {"name": "A", "pins": {"P": [1]}}},
           {"band": "neck"}, {"band": "neck"}, {"band": "top"}"#,
    );
    let result = run(&json);
    let order: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.rule_id == "band_order")
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        order,
        [
            "First band must be a top band.",
            "Last band must be a bottom band.",
            "Missing bottom band.",
            "More than one neck band.",
        ]
    );
    assert!(result.symbols.is_empty());
}

#[test]
fn test_pin_reuse_in_block() {
    let json = part_json(
        r#"{"band": "top"},
           {"band": "io", "left": {"name": "A", "pins": {"P": [1]}}},
           {"band": "io", "left": {"name": "B", "pins": {"P": [1]}}},
           {"band": "bottom"}"#,
    );
    let result = run(&json);
    let reuse: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.rule_id == "pin_reuse")
        .collect();
    assert_eq!(reuse.len(), 1);
    assert_eq!(reuse[0].message, "Pin 1 used more than once in package P.");
}

#[test]
fn test_pin_reuse_across_sides_of_band() {
    let json = part_json(
        r#"{"band": "top"},
           {"band": "io", "left": {"name": "A", "pins": {"P": [1]}},
                          "right": {"name": "B", "pins": {"P": [1]}}},
           {"band": "bottom"}"#,
    );
    let result = run(&json);
    assert_eq!(rules(&result), ["pin_reuse"]);
    assert!(result.symbols.is_empty());
}

#[test]
fn test_bad_directive_values_are_fatal() {
    for directives in [
        r#"{"minwidth": "abc"}"#,
        r#"{"minwidth": -100}"#,
        r#"{"minwidth": 2147483600}"#,
        r#"{"minwidth": 4294967696}"#,
        r#"{"pinfontsize": -8}"#,
        r#"{"textfontsize": 0}"#,
    ] {
        let result = run(&part_json_with(directives, ONE_PIN));
        assert_eq!(rules(&result), ["directive_value"], "{}", directives);
        assert_eq!(result.diagnostics[0].severity, Severity::Fatal);
        assert!(result.symbols.is_empty(), "{}", directives);
    }
}

#[test]
fn test_largest_min_width_renders() {
    let result = run(&part_json_with(r#"{"minwidth": 1000000}"#, ONE_PIN));
    assert!(!result.has_fatal(), "{:?}", result.diagnostics);
    assert_eq!(result.symbols.len(), 1);
    assert!(result.symbols[0].to_string().contains(" 1000300 "));
}

#[test]
fn test_attribute_reference_claimed_once() {
    let json = part_json(
        r#"{"band": "top", "center": "@label@"},
           {"band": "text", "center": "@label@"},
           {"band": "io", "left": {"name": "A", "pins": {"P": [1]}}},
           {"band": "bottom"}"#,
    );
    let result = run(&json);
    assert_eq!(rules(&result), ["attr_referenced"]);
    assert_eq!(
        result.diagnostics[0].message,
        "Attribute \"label\" already referenced by block: blk"
    );
    assert!(result.symbols.is_empty());
}

#[test]
fn test_referenced_attribute_is_shown_in_block() {
    let json = part_json(
        r#"{"band": "top", "center": "@label@"},
           {"band": "io", "left": {"name": "A", "pins": {"P": [1]}}},
           {"band": "bottom"}"#,
    );
    let result = run(&json);
    assert_eq!(result.total_diagnostics(), 0, "{:?}", result.diagnostics);
    let lines = &result.symbols[0].lines;
    assert_eq!(lines.iter().filter(|l| *l == "label=CTR").count(), 1);
    // shown as block text, not as a hidden part attribute
    let at = lines.iter().position(|l| l == "label=CTR").unwrap();
    assert!(lines[at - 1].starts_with("T ") && lines[at - 1].contains(" 9 "));
}

#[test]
fn test_device_reference_becomes_text() {
    let json = part_json(
        r#"{"band": "top", "center": "@device@"},
           {"band": "io", "left": {"name": "A", "pins": {"P": [1]}}},
           {"band": "bottom"}"#,
    );
    let result = run(&json);
    assert_eq!(rules(&result), ["attr_unreferenceable"]);
    assert!(result.symbols[0].lines.iter().any(|l| l == "TEST"));
}

#[test]
fn test_centered_pin_rejected() {
    let json = part_json(
        r#"{"band": "top"},
           {"band": "io", "center": {"name": "A", "pins": {"P": [1]}}},
           {"band": "bottom"}"#,
    );
    let result = run(&json);
    assert!(rules(&result).contains(&"pin_position"));
    assert!(result.symbols.is_empty());
}

#[test]
fn test_invalid_glyph_escape() {
    let json = part_json(
        r#"{"band": "top", "center": "&wiggle&"},
           {"band": "io", "left": {"name": "A", "pins": {"P": [1]}}},
           {"band": "bottom"}"#,
    );
    let result = run(&json);
    assert_eq!(rules(&result), ["glyph_escape"]);
    assert_eq!(result.diagnostics[0].message, "Invalid glyph escape: &wiggle&");
}

#[test]
fn test_shadow_pin_in_slotted_block() {
    let json = part_json(
        r#"{"band": "top"},
           {"band": "io", "left": {"name": "A", "pins": {"P": [1, 3]}},
                          "right": {"name": "Y", "pins": {"P": [0, 2]}}},
           {"band": "bottom"}"#,
    );
    let result = run(&json);
    assert!(rules(&result).contains(&"shadow_pin_slot"));
}

#[test]
fn test_diagnostics_serialize_to_json() {
    let result =
        AnsisymCore::generate_file(&fixture_path("broken.json"), &GenerateOptions::default())
            .unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["symbols"].as_array().unwrap().len(), 0);
    let first = &value["diagnostics"][0];
    assert!(first["id"].as_str().is_some());
    assert_eq!(value["stats"]["warning"], 7);
}
