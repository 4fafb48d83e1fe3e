//! The resolved, queryable token model.

use crate::document::Deprecation;
use crate::pointer::TokenPointer;
use crate::typecheck::TokenType;
use crate::types::TokenPos;
use serde::Serialize;
use serde_json::{Map, Value};

/// One ordered fallback alternative for a token's value.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    /// Immediate target pointer, when the candidate was a reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<TokenPointer>,
    /// Resolved value. Absent for later candidates that failed to resolve;
    /// only the first candidate's resolution failure is fatal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A resolved `$overrides` record attached to its target token.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideRecord {
    /// Pointer to the directive itself, `/$overrides/<index>`.
    pub source: String,
    /// The raw `$when` condition map; evaluation is a rule-engine concern.
    pub when: Map<String, Value>,
    /// Immediate reference target, when the override used `$ref`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<TokenPointer>,
    /// Resolved override value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Resolved fallback candidates, when the override carried `$fallback`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Vec<Candidate>>,
}

/// Diagnostic metadata carried by every flattened token.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenMetadata {
    /// Human description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Effective deprecation marker, own or inherited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
    /// Validated `$extensions` map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
    /// Best-effort source position, `{1, 1}` when unavailable.
    #[serde(default)]
    pub loc: TokenPos,
}

/// A fully resolved design token.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenedToken {
    /// Canonical pointer, unique within its theme.
    pub pointer: TokenPointer,
    /// Externally visible path: transformed segments joined with `.`.
    pub path: String,
    /// Resolved type; always present.
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Resolved value; always present.
    pub value: Value,
    /// Immediate alias target, when this token is an alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<TokenPointer>,
    /// Every pointer walked to reach the final value, excluding this
    /// token's own pointer, in hop order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<TokenPointer>,
    /// Ordered fallback candidates, when the raw value was an array of
    /// alternatives. The first entry mirrors `value`/`reference`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
    /// Resolved overrides targeting this token, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideRecord>,
    /// Diagnostic metadata.
    pub metadata: TokenMetadata,
}

impl FlattenedToken {
    /// Returns true if this token carries an active deprecation marker.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.metadata
            .deprecated
            .as_ref()
            .is_some_and(Deprecation::is_active)
    }

    /// Token metadata in the shape attached to diagnostics.
    #[must_use]
    pub fn diagnostic_metadata(&self) -> Value {
        let mut map = Map::new();
        map.insert("path".to_string(), Value::String(self.path.clone()));
        map.insert(
            "pointer".to_string(),
            Value::String(self.pointer.to_string()),
        );
        if let Some(deprecated) = &self.metadata.deprecated {
            if let Ok(value) = serde_json::to_value(deprecated) {
                map.insert("deprecated".to_string(), value);
            }
        }
        if let Some(extensions) = &self.metadata.extensions {
            map.insert("extensions".to_string(), Value::Object(extensions.clone()));
        }
        Value::Object(map)
    }
}
