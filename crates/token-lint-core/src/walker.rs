//! Depth-first traversal of a token document.
//!
//! The walker turns the nested group tree into an ordered list of raw leaf
//! entries, inheriting group-level `$type`/`$deprecated` metadata downward
//! and enforcing name legality. It performs no alias resolution; that is
//! the resolver's job.

use crate::document::{self, Deprecation};
use crate::error::FlattenError;
use crate::pointer::{self, TokenPointer};
use crate::transform::NameTransform;
use crate::typecheck::TokenType;
use crate::types::TokenPos;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Resolves a pointer to its position in the source document.
pub type LocationResolver = dyn Fn(&TokenPointer) -> Option<TokenPos>;

/// Receives non-fatal diagnostics raised during flattening.
pub type WarnHandler = dyn Fn(&FlattenWarning);

/// A non-fatal condition noticed while flattening.
#[derive(Debug, Clone)]
pub struct FlattenWarning {
    /// The token or group the warning concerns.
    pub pointer: TokenPointer,
    /// Human-readable description.
    pub message: String,
}

/// Options for a flatten pass.
#[derive(Default)]
pub struct FlattenOptions {
    /// Name transform for externally visible paths.
    pub transform: NameTransform,
    /// Optional pointer-to-position resolver supplied by the document
    /// loader. Failures degrade to the default `{1, 1}` position.
    pub locations: Option<Box<LocationResolver>>,
    /// Optional sink for non-fatal warnings.
    pub on_warning: Option<Box<WarnHandler>>,
}

impl FlattenOptions {
    /// Creates default options (identity transform, no callbacks).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name transform.
    #[must_use]
    pub fn with_transform(mut self, transform: NameTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the source-location resolver.
    #[must_use]
    pub fn with_locations(
        mut self,
        resolver: impl Fn(&TokenPointer) -> Option<TokenPos> + 'static,
    ) -> Self {
        self.locations = Some(Box::new(resolver));
        self
    }

    /// Sets the warning sink.
    #[must_use]
    pub fn with_warnings(mut self, handler: impl Fn(&FlattenWarning) + 'static) -> Self {
        self.on_warning = Some(Box::new(handler));
        self
    }

    pub(crate) fn warn(&self, pointer: &TokenPointer, message: impl Into<String>) {
        if let Some(handler) = &self.on_warning {
            handler(&FlattenWarning {
                pointer: pointer.clone(),
                message: message.into(),
            });
        }
    }

    pub(crate) fn locate(&self, pointer: &TokenPointer) -> TokenPos {
        self.locations
            .as_ref()
            .and_then(|resolver| resolver(pointer))
            .unwrap_or_default()
    }
}

/// A leaf token as produced by the walker, before alias resolution.
#[derive(Debug, Clone)]
pub struct RawToken {
    /// Canonical pointer to this token.
    pub pointer: TokenPointer,
    /// Effective declared type: own `$type`, else the nearest ancestor
    /// group's.
    pub token_type: Option<TokenType>,
    /// Effective deprecation: own `$deprecated`, else inherited.
    pub deprecated: Option<Deprecation>,
    /// Own `$description`.
    pub description: Option<String>,
    /// Own validated `$extensions`.
    pub extensions: Option<Map<String, Value>>,
    /// Raw `$value`, if present.
    pub value: Option<Value>,
    /// Raw `$ref` string, if present.
    pub reference: Option<String>,
    /// Best-effort source position.
    pub loc: TokenPos,
}

/// Walks a document root and returns its leaf tokens in declaration order.
///
/// # Errors
///
/// Returns the first naming or metadata error encountered.
pub fn walk(root: &Map<String, Value>, options: &FlattenOptions) -> Result<Vec<RawToken>, FlattenError> {
    let mut out = Vec::new();
    walk_group(root, &TokenPointer::root(), None, None, options, &mut out)?;
    Ok(out)
}

fn walk_group(
    group: &Map<String, Value>,
    parent: &TokenPointer,
    inherited_type: Option<&TokenType>,
    inherited_deprecation: Option<&Deprecation>,
    options: &FlattenOptions,
    out: &mut Vec<RawToken>,
) -> Result<(), FlattenError> {
    let own_type = document::type_tag(group, parent)?.map(TokenType::from_tag);
    let effective_type = own_type.as_ref().or(inherited_type);

    let own_deprecation = document::deprecation(group, parent)?;
    let effective_deprecation = own_deprecation.as_ref().or(inherited_deprecation);

    // Group-level $extensions are validated even though they do not
    // propagate to children.
    document::extensions(group, parent)?;

    let mut sibling_names: HashMap<String, &str> = HashMap::new();

    for (key, child) in group {
        if key.starts_with('$') {
            if document::RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            return Err(FlattenError::ReservedName {
                parent: parent.clone(),
                name: key.clone(),
            });
        }
        if !pointer::is_legal_name(key) {
            return Err(FlattenError::IllegalName {
                parent: parent.clone(),
                name: key.clone(),
            });
        }

        match sibling_names.get(&key.to_lowercase()) {
            Some(&existing) if existing == key => {
                return Err(FlattenError::DuplicateName {
                    parent: parent.clone(),
                    name: key.clone(),
                });
            }
            Some(&existing) => {
                options.warn(
                    &parent.child(key),
                    format!("name `{key}` differs only by case from sibling `{existing}`"),
                );
            }
            None => {
                sibling_names.insert(key.to_lowercase(), key.as_str());
            }
        }

        let child_pointer = parent.child(key);
        let Value::Object(node) = child else {
            return Err(FlattenError::UnexpectedNode {
                pointer: child_pointer,
            });
        };

        if document::is_token(node) {
            out.push(build_raw_token(
                node,
                child_pointer,
                effective_type,
                effective_deprecation,
                options,
            )?);
        } else {
            walk_group(
                node,
                &child_pointer,
                effective_type,
                effective_deprecation,
                options,
                out,
            )?;
        }
    }

    Ok(())
}

fn build_raw_token(
    node: &Map<String, Value>,
    pointer: TokenPointer,
    inherited_type: Option<&TokenType>,
    inherited_deprecation: Option<&Deprecation>,
    options: &FlattenOptions,
) -> Result<RawToken, FlattenError> {
    let own_type = document::type_tag(node, &pointer)?.map(TokenType::from_tag);
    let token_type = own_type.or_else(|| inherited_type.cloned());

    let deprecated =
        document::deprecation(node, &pointer)?.or_else(|| inherited_deprecation.cloned());

    let description = node
        .get(document::DESCRIPTION_KEY)
        .and_then(Value::as_str)
        .map(String::from);
    let extensions = document::extensions(node, &pointer)?;

    let reference = match node.get(document::REF_KEY) {
        None => None,
        Some(Value::String(raw)) => Some(raw.clone()),
        Some(other) => {
            return Err(FlattenError::InvalidPointer {
                raw: other.to_string(),
            })
        }
    };

    let loc = options.locate(&pointer);

    Ok(RawToken {
        pointer,
        token_type,
        deprecated,
        description,
        extensions,
        value: node.get(document::VALUE_KEY).cloned(),
        reference,
        loc,
    })
}
