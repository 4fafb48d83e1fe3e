//! End-to-end tests over the public flatten/registry/tracker pipeline.

use serde_json::{json, Value};
use token_lint_core::{
    flatten_document, FlattenError, FlattenOptions, FlattenedToken, NameTransform, Severity,
    TokenRegistry, TokenTracker, TokenType, UnusedTokenCheck,
};

fn flatten(doc: &Value) -> Vec<FlattenedToken> {
    flatten_document(doc, &FlattenOptions::new()).expect("flatten")
}

fn sample_document() -> Value {
    json!({
        "Theme": {
            "$type": "color",
            "Base": {"$value": "#000"},
            "Accent": {"$value": "#ff00ff"}
        },
        "ColorGroup": {
            "PrimaryColor": {"$type": "color", "$ref": "#/Theme/Base"}
        },
        "Spacing": {
            "$type": "dimension",
            "Small": {"$value": {"value": 8, "unit": "px"}},
            "Medium": {"$value": {"value": 16, "unit": "px"}}
        },
        "Ratio": {
            "$type": "number",
            "Base": {"$value": 16},
            "Golden": {"$value": 1.618}
        },
        "Component": {
            "Button": {
                "Tone": {"$type": "color", "$value": "#888"}
            }
        },
        "$overrides": [
            {
                "$token": "#/Component/Button/Tone",
                "$when": {"mode": "dark"},
                "$ref": "#/Theme/Base"
            }
        ]
    })
}

#[test]
fn flattening_is_idempotent() {
    let doc = sample_document();
    let first = serde_json::to_value(flatten(&doc)).expect("serialize");
    let second = serde_json::to_value(flatten(&doc)).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn alias_values_match_their_targets_transitively() {
    let tokens = flatten(&json!({
        "a": {"$ref": "#/b"},
        "b": {"$ref": "#/c"},
        "c": {"$type": "number", "$value": 42}
    }));

    let by_pointer = |p: &str| {
        tokens
            .iter()
            .find(|t| t.pointer.to_string() == p)
            .expect("token")
    };
    assert_eq!(by_pointer("#/a").value, by_pointer("#/c").value);
    assert_eq!(by_pointer("#/b").value, by_pointer("#/c").value);
    assert_eq!(by_pointer("#/a").token_type, TokenType::Number);
}

#[test]
fn cycles_are_rejected_with_the_full_loop() {
    let err = flatten_document(
        &json!({
            "x": {"$ref": "{y}"},
            "y": {"$ref": "{x}"}
        }),
        &FlattenOptions::new(),
    )
    .expect_err("cycle");

    let FlattenError::CircularReference { cycle } = err else {
        panic!("expected cycle error, got {err}");
    };
    assert_eq!(cycle.first(), cycle.last());
    assert_eq!(cycle.len(), 3);
}

#[test]
fn group_type_inheritance_reaches_leaves() {
    let tokens = flatten(&sample_document());
    let small = tokens
        .iter()
        .find(|t| t.pointer.to_string() == "#/Spacing/Small")
        .expect("token");
    assert_eq!(small.token_type, TokenType::Dimension);
}

#[test]
fn kebab_transform_produces_spec_style_paths() {
    let tokens = flatten_document(
        &sample_document(),
        &FlattenOptions::new().with_transform(NameTransform::KebabCase),
    )
    .expect("flatten");

    let primary = tokens
        .iter()
        .find(|t| t.path == "color-group.primary-color")
        .expect("transformed path");
    assert_eq!(primary.pointer.to_string(), "#/ColorGroup/PrimaryColor");
    assert_eq!(primary.value, json!("#000"));
}

#[test]
fn override_scenario_keeps_base_value_and_attaches_record() {
    let tokens = flatten(&sample_document());
    let tone = tokens
        .iter()
        .find(|t| t.pointer.to_string() == "#/Component/Button/Tone")
        .expect("token");

    assert_eq!(tone.value, json!("#888"));
    assert_eq!(tone.overrides.len(), 1);
    assert_eq!(tone.overrides[0].source, "/$overrides/0");
    assert_eq!(tone.overrides[0].value, Some(json!("#000")));
}

#[test]
fn registry_round_trip_by_name_and_pointer() {
    let transform = NameTransform::KebabCase;
    let tokens = flatten_document(
        &sample_document(),
        &FlattenOptions::new().with_transform(transform),
    )
    .expect("flatten");

    let mut registry = TokenRegistry::new(transform);
    registry.add_theme("default", tokens);

    for spelled in ["ColorGroup.PrimaryColor", "color-group.primary-color"] {
        let token = registry.token(spelled, None).expect("lookup");
        assert_eq!(token.value, json!("#000"));
    }
    assert!(registry.token("no.such.token", None).is_none());
}

#[test]
fn unused_tokens_surface_after_a_run() {
    let transform = NameTransform::KebabCase;
    let tokens = flatten_document(
        &sample_document(),
        &FlattenOptions::new().with_transform(transform),
    )
    .expect("flatten");

    let mut registry = TokenRegistry::new(transform);
    registry.add_theme("default", tokens);
    let tracker = TokenTracker::from_registry(&registry, "token-lint.toml");

    tracker.scan(".btn { color: #000; margin: 16px; }");
    tracker.scan(".banner { background: #FF00FF; }");

    let unused = tracker.flush(&UnusedTokenCheck {
        code: "DT002".to_string(),
        rule: "unused-tokens".to_string(),
        severity: Severity::Warning,
        ignore: Vec::new(),
    });

    let messages: Vec<&str> = unused.iter().map(|d| d.message.as_str()).collect();
    // #000 marks both theme.base and the alias that resolves to it, 16
    // marks ratio.base, #FF00FF marks the accent case-insensitively
    assert!(messages.iter().any(|m| m.contains("ratio.golden")));
    assert!(messages.iter().any(|m| m.contains("component.button.tone")));
    assert!(!messages.iter().any(|m| m.contains("ratio.base")));
    assert!(!messages.iter().any(|m| m.contains("theme.accent")));
    assert!(!messages.iter().any(|m| m.contains("color-group.primary-color")));
    assert!(unused.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn vendor_types_pass_through_unvalidated() {
    let tokens = flatten(&json!({
        "motion": {
            "spring": {"$type": "com.example.spring", "$value": {"mass": 1, "tension": 170}}
        }
    }));
    assert_eq!(tokens[0].token_type, TokenType::Other("com.example.spring".to_string()));
}

#[test]
fn candidate_lists_survive_the_full_pipeline() {
    let tokens = flatten(&json!({
        "brand": {"$type": "color", "$value": "#336699"},
        "hero": {"$type": "color", "$value": [
            {"$ref": "#/brand"},
            "#000"
        ]}
    }));

    let hero = tokens
        .iter()
        .find(|t| t.pointer.to_string() == "#/hero")
        .expect("token");
    assert_eq!(hero.value, json!("#336699"));
    let candidates = hero.candidates.as_ref().expect("candidates");
    assert_eq!(candidates.len(), 2);
}
