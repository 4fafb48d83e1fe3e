//! Typed accessors over the raw DTIF-like document shape.
//!
//! Documents arrive as already-parsed `serde_json` objects. Reserved
//! `$`-prefixed keys carry metadata; every other key names a child token or
//! group.

use crate::error::FlattenError;
use crate::pointer::TokenPointer;
use serde::Serialize;
use serde_json::{Map, Value};

/// The `$type` metadata key.
pub const TYPE_KEY: &str = "$type";
/// The `$value` metadata key.
pub const VALUE_KEY: &str = "$value";
/// The `$ref` metadata key.
pub const REF_KEY: &str = "$ref";
/// The `$deprecated` metadata key.
pub const DEPRECATED_KEY: &str = "$deprecated";
/// The `$description` metadata key.
pub const DESCRIPTION_KEY: &str = "$description";
/// The `$extensions` metadata key.
pub const EXTENSIONS_KEY: &str = "$extensions";
/// The root-level `$overrides` key.
pub const OVERRIDES_KEY: &str = "$overrides";

/// Reserved keys that are legal metadata rather than child names.
pub const RESERVED_KEYS: [&str; 7] = [
    TYPE_KEY,
    VALUE_KEY,
    REF_KEY,
    DEPRECATED_KEY,
    DESCRIPTION_KEY,
    EXTENSIONS_KEY,
    OVERRIDES_KEY,
];

/// Returns true if a node object is a leaf token rather than a group.
///
/// A node is a token iff it carries `$value` or `$ref`.
#[must_use]
pub fn is_token(node: &Map<String, Value>) -> bool {
    node.contains_key(VALUE_KEY) || node.contains_key(REF_KEY)
}

/// Reads the `$type` tag of a node.
///
/// # Errors
///
/// Returns [`FlattenError::InvalidTypeTag`] if `$type` is present but not a
/// string.
pub fn type_tag<'a>(
    node: &'a Map<String, Value>,
    pointer: &TokenPointer,
) -> Result<Option<&'a str>, FlattenError> {
    match node.get(TYPE_KEY) {
        None => Ok(None),
        Some(Value::String(tag)) => Ok(Some(tag)),
        Some(_) => Err(FlattenError::InvalidTypeTag {
            pointer: pointer.clone(),
        }),
    }
}

/// A token or group deprecation marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Deprecation {
    /// Plain boolean flag.
    Flag(bool),
    /// Free-form reason string.
    Reason(String),
    /// Replacement token pointer.
    Replacement {
        /// Pointer to the replacement token.
        #[serde(rename = "$ref")]
        replacement: TokenPointer,
    },
}

impl Deprecation {
    /// Parses a `$deprecated` value.
    ///
    /// # Errors
    ///
    /// Returns [`FlattenError::InvalidDeprecated`] for anything that is not
    /// a boolean, a string, or a `{"$ref": ...}` record.
    pub fn parse(value: &Value, pointer: &TokenPointer) -> Result<Self, FlattenError> {
        match value {
            Value::Bool(flag) => Ok(Self::Flag(*flag)),
            Value::String(reason) => Ok(Self::Reason(reason.clone())),
            Value::Object(map) if map.len() == 1 => match map.get(REF_KEY) {
                Some(Value::String(raw)) => Ok(Self::Replacement {
                    replacement: TokenPointer::parse(raw)?,
                }),
                _ => Err(FlattenError::InvalidDeprecated {
                    pointer: pointer.clone(),
                }),
            },
            _ => Err(FlattenError::InvalidDeprecated {
                pointer: pointer.clone(),
            }),
        }
    }

    /// Returns true unless this is an explicit `false` flag.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Flag(false))
    }
}

/// Reads and parses a node's `$deprecated` marker.
///
/// # Errors
///
/// Propagates [`Deprecation::parse`] errors.
pub fn deprecation(
    node: &Map<String, Value>,
    pointer: &TokenPointer,
) -> Result<Option<Deprecation>, FlattenError> {
    node.get(DEPRECATED_KEY)
        .map(|v| Deprecation::parse(v, pointer))
        .transpose()
}

/// Reads and validates a node's `$extensions` map.
///
/// Keys must be namespaced (contain at least one `.`), e.g.
/// `com.example.tool`.
///
/// # Errors
///
/// Returns [`FlattenError::InvalidExtensions`] for non-object values or
/// keys without a namespace.
pub fn extensions(
    node: &Map<String, Value>,
    pointer: &TokenPointer,
) -> Result<Option<Map<String, Value>>, FlattenError> {
    let Some(value) = node.get(EXTENSIONS_KEY) else {
        return Ok(None);
    };
    let Value::Object(map) = value else {
        return Err(FlattenError::InvalidExtensions {
            pointer: pointer.clone(),
            reason: "must be an object".to_string(),
        });
    };
    for key in map.keys() {
        if !key.contains('.') {
            return Err(FlattenError::InvalidExtensions {
                pointer: pointer.clone(),
                reason: format!("key `{key}` is not namespaced (expected e.g. `com.example.{key}`)"),
            });
        }
    }
    Ok(Some(map.clone()))
}

/// A parsed entry of the document-level `$overrides` array.
#[derive(Debug, Clone)]
pub struct OverrideDirective {
    /// Pointer to the token this directive targets.
    pub token: TokenPointer,
    /// The raw `$when` condition map; opaque to the engine.
    pub when: Map<String, Value>,
    /// Raw `$ref` reference string, if present.
    pub reference: Option<String>,
    /// Raw `$value`, if present.
    pub value: Option<Value>,
    /// Raw `$fallback` candidate list, if present.
    pub fallback: Option<Vec<Value>>,
}

/// Parses the root-level `$overrides` array, if any.
///
/// # Errors
///
/// Returns [`FlattenError::InvalidOverride`] for structurally malformed
/// entries, and pointer-grammar errors for bad `$token` pointers.
pub fn parse_overrides(root: &Map<String, Value>) -> Result<Vec<OverrideDirective>, FlattenError> {
    let Some(value) = root.get(OVERRIDES_KEY) else {
        return Ok(Vec::new());
    };
    let Value::Array(entries) = value else {
        return Err(FlattenError::InvalidOverride {
            index: 0,
            reason: "`$overrides` must be an array".to_string(),
        });
    };

    let mut directives = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Value::Object(map) = entry else {
            return Err(FlattenError::InvalidOverride {
                index,
                reason: "entry must be an object".to_string(),
            });
        };

        let token = match map.get("$token") {
            Some(Value::String(raw)) => TokenPointer::parse(raw)?,
            _ => {
                return Err(FlattenError::InvalidOverride {
                    index,
                    reason: "missing `$token` pointer".to_string(),
                })
            }
        };

        let when = match map.get("$when") {
            None => Map::new(),
            Some(Value::Object(conditions)) => conditions.clone(),
            Some(_) => {
                return Err(FlattenError::InvalidOverride {
                    index,
                    reason: "`$when` must be an object".to_string(),
                })
            }
        };

        let reference = match map.get(REF_KEY) {
            None => None,
            Some(Value::String(raw)) => Some(raw.clone()),
            Some(_) => {
                return Err(FlattenError::InvalidOverride {
                    index,
                    reason: "`$ref` must be a string".to_string(),
                })
            }
        };
        let value = map.get(VALUE_KEY).cloned();

        if reference.is_some() == value.is_some() {
            return Err(FlattenError::InvalidOverride {
                index,
                reason: "exactly one of `$ref` or `$value` must be set".to_string(),
            });
        }

        let fallback = match map.get("$fallback") {
            None => None,
            Some(Value::Array(candidates)) => Some(candidates.clone()),
            Some(_) => {
                return Err(FlattenError::InvalidOverride {
                    index,
                    reason: "`$fallback` must be an array".to_string(),
                })
            }
        };

        directives.push(OverrideDirective {
            token,
            when,
            reference,
            value,
            fallback,
        });
    }

    Ok(directives)
}
