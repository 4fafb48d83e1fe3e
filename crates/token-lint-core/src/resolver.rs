//! Alias and override resolution over the walked token list.
//!
//! [`flatten_document`] is the engine's entry point: it composes the tree
//! walker, the alias/override resolver, and the type validators into one
//! deterministic, side-effect-free pass.

use crate::document::{self, OverrideDirective};
use crate::error::FlattenError;
use crate::pointer::TokenPointer;
use crate::token::{Candidate, FlattenedToken, OverrideRecord, TokenMetadata};
use crate::typecheck::{self, TokenType, TypeLookup};
use crate::walker::{self, FlattenOptions, RawToken};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Flattens a token document into resolved, validated tokens.
///
/// The output order is the document's declaration order, so flattening the
/// same document twice yields identical output.
///
/// # Errors
///
/// Returns the first naming, type, reference, or metadata error
/// encountered; no partial results are produced.
pub fn flatten_document(
    root: &Value,
    options: &FlattenOptions,
) -> Result<Vec<FlattenedToken>, FlattenError> {
    let Value::Object(root_map) = root else {
        return Err(FlattenError::UnexpectedNode {
            pointer: TokenPointer::root(),
        });
    };

    let raws = walker::walk(root_map, options)?;

    let mut index: HashMap<TokenPointer, usize> = HashMap::with_capacity(raws.len());
    for (i, raw) in raws.iter().enumerate() {
        index.insert(raw.pointer.clone(), i);
    }

    let mut tokens = Vec::with_capacity(raws.len());
    for raw in &raws {
        tokens.push(resolve_token(raw, &raws, &index, options)?);
    }

    apply_overrides(root_map, &raws, &index, &mut tokens)?;

    let mut lookup = TypeLookup::new();
    for token in &tokens {
        lookup.insert(
            token.pointer.clone(),
            token.token_type.clone(),
            token.value.clone(),
        );
    }
    for token in &tokens {
        typecheck::validate(&token.token_type, &token.value, &token.pointer, &lookup)?;
        for record in &token.overrides {
            if let Some(value) = &record.value {
                typecheck::validate(&token.token_type, value, &token.pointer, &lookup)?;
            }
        }
    }

    warn_on_path_collisions(&tokens, options);

    Ok(tokens)
}

/// One hop decision while walking an alias chain.
enum Hop<'a> {
    /// Follow this raw reference string.
    Reference(&'a str),
    /// The chain ends here with this concrete value.
    Concrete(&'a Value),
}

fn next_hop(node: &RawToken) -> Result<Hop<'_>, FlattenError> {
    if let Some(raw_ref) = &node.reference {
        return Ok(Hop::Reference(raw_ref));
    }
    match &node.value {
        Some(Value::String(text)) if TokenPointer::is_reference(text) => {
            Ok(Hop::Reference(text))
        }
        Some(Value::Array(entries)) if is_candidate_array(entries) => {
            match entries.first() {
                Some(first) => match entry_reference(first) {
                    Some(raw_ref) => Ok(Hop::Reference(raw_ref)),
                    None => Ok(Hop::Concrete(first)),
                },
                // is_candidate_array is false for empty arrays
                None => Err(FlattenError::UnexpectedNode {
                    pointer: node.pointer.clone(),
                }),
            }
        }
        Some(value) => Ok(Hop::Concrete(value)),
        None => Err(FlattenError::UnexpectedNode {
            pointer: node.pointer.clone(),
        }),
    }
}

fn is_candidate_array(entries: &[Value]) -> bool {
    entries
        .iter()
        .any(|e| e.as_object().is_some_and(|o| o.contains_key(document::REF_KEY)))
}

fn entry_reference(entry: &Value) -> Option<&str> {
    entry
        .as_object()
        .and_then(|o| o.get(document::REF_KEY))
        .and_then(Value::as_str)
}

/// Result of walking an alias chain to its first concrete value.
struct ChainResolution {
    /// Nearest type seen along the chain; the final node's wins.
    chain_type: Option<TokenType>,
    value: Value,
    /// Every pointer visited, immediate target first.
    chain: Vec<TokenPointer>,
}

fn resolve_chain(
    origin: &TokenPointer,
    first_reference: &str,
    raws: &[RawToken],
    index: &HashMap<TokenPointer, usize>,
) -> Result<ChainResolution, FlattenError> {
    let mut stack = vec![origin.clone()];
    let mut chain = Vec::new();
    let mut chain_type: Option<TokenType> = None;
    let mut current = TokenPointer::parse(first_reference)?;

    loop {
        if let Some(pos) = stack.iter().position(|p| p == &current) {
            let mut cycle = stack[pos..].to_vec();
            cycle.push(current);
            return Err(FlattenError::CircularReference { cycle });
        }
        let Some(&idx) = index.get(&current) else {
            return Err(FlattenError::UnknownReference {
                pointer: origin.clone(),
                target: current,
            });
        };

        chain.push(current.clone());
        stack.push(current.clone());

        let node = &raws[idx];
        if let Some(node_type) = &node.token_type {
            chain_type = Some(node_type.clone());
        }

        match next_hop(node)? {
            Hop::Reference(raw_ref) => {
                current = TokenPointer::parse(raw_ref)?;
            }
            Hop::Concrete(value) => {
                return Ok(ChainResolution {
                    chain_type,
                    value: value.clone(),
                    chain,
                });
            }
        }
    }
}

fn resolve_token(
    raw: &RawToken,
    raws: &[RawToken],
    index: &HashMap<TokenPointer, usize>,
    options: &FlattenOptions,
) -> Result<FlattenedToken, FlattenError> {
    let declared = raw.token_type.clone();

    let (token_type, value, reference, aliases, candidates) = match &raw.value {
        Some(Value::Array(entries)) if raw.reference.is_none() && is_candidate_array(entries) => {
            resolve_candidates(raw, entries, raws, index)?
        }
        _ => match next_hop(raw)? {
            Hop::Reference(raw_ref) => {
                let resolution = resolve_chain(&raw.pointer, raw_ref, raws, index)?;
                let resolved_type = finish_type(&declared, &resolution, &raw.pointer)?;
                let reference = resolution.chain.first().cloned();
                (
                    resolved_type,
                    resolution.value,
                    reference,
                    resolution.chain,
                    None,
                )
            }
            Hop::Concrete(value) => {
                let token_type = declared.ok_or_else(|| FlattenError::MissingType {
                    pointer: raw.pointer.clone(),
                })?;
                (token_type, value.clone(), None, Vec::new(), None)
            }
        },
    };

    Ok(FlattenedToken {
        path: options.transform.display_path(&raw.pointer),
        pointer: raw.pointer.clone(),
        token_type,
        value,
        reference,
        aliases,
        candidates,
        overrides: Vec::new(),
        metadata: TokenMetadata {
            description: raw.description.clone(),
            deprecated: raw.deprecated.clone(),
            extensions: raw.extensions.clone(),
            loc: raw.loc,
        },
    })
}

type ResolvedParts = (
    TokenType,
    Value,
    Option<TokenPointer>,
    Vec<TokenPointer>,
    Option<Vec<Candidate>>,
);

fn resolve_candidates(
    raw: &RawToken,
    entries: &[Value],
    raws: &[RawToken],
    index: &HashMap<TokenPointer, usize>,
) -> Result<ResolvedParts, FlattenError> {
    let declared = raw.token_type.clone();
    let mut candidates = Vec::with_capacity(entries.len());
    let mut first: Option<(TokenType, Value, Option<TokenPointer>, Vec<TokenPointer>)> = None;

    for (i, entry) in entries.iter().enumerate() {
        if let Some(raw_ref) = entry_reference(entry) {
            match resolve_chain(&raw.pointer, raw_ref, raws, index) {
                Ok(resolution) => {
                    let reference = resolution.chain.first().cloned();
                    candidates.push(Candidate {
                        reference: reference.clone(),
                        value: Some(resolution.value.clone()),
                    });
                    if i == 0 {
                        let resolved_type = finish_type(&declared, &resolution, &raw.pointer)?;
                        first = Some((
                            resolved_type,
                            resolution.value,
                            reference,
                            resolution.chain,
                        ));
                    }
                }
                // The preferred candidate must resolve; later entries are
                // informational and may dangle.
                Err(err) if i == 0 => return Err(err),
                Err(_) => {
                    candidates.push(Candidate {
                        reference: TokenPointer::parse(raw_ref).ok(),
                        value: None,
                    });
                }
            }
        } else {
            candidates.push(Candidate {
                reference: None,
                value: Some(entry.clone()),
            });
            if i == 0 {
                let token_type = declared.clone().ok_or_else(|| FlattenError::MissingType {
                    pointer: raw.pointer.clone(),
                })?;
                first = Some((token_type, entry.clone(), None, Vec::new()));
            }
        }
    }

    // is_candidate_array guarantees at least one entry
    let (token_type, value, reference, aliases) =
        first.ok_or_else(|| FlattenError::UnexpectedNode {
            pointer: raw.pointer.clone(),
        })?;

    Ok((token_type, value, reference, aliases, Some(candidates)))
}

/// Combines a token's declared type with the type its chain resolved to.
fn finish_type(
    declared: &Option<TokenType>,
    resolution: &ChainResolution,
    pointer: &TokenPointer,
) -> Result<TokenType, FlattenError> {
    match (declared, &resolution.chain_type) {
        (Some(declared), Some(resolved)) if declared != resolved => {
            Err(FlattenError::AliasTypeConflict {
                pointer: pointer.clone(),
                declared: declared.clone(),
                resolved: resolved.clone(),
            })
        }
        (_, Some(resolved)) => Ok(resolved.clone()),
        (Some(declared), None) => Ok(declared.clone()),
        (None, None) => Err(FlattenError::MissingType {
            pointer: pointer.clone(),
        }),
    }
}

fn apply_overrides(
    root: &Map<String, Value>,
    raws: &[RawToken],
    index: &HashMap<TokenPointer, usize>,
    tokens: &mut [FlattenedToken],
) -> Result<(), FlattenError> {
    for (i, directive) in document::parse_overrides(root)?.into_iter().enumerate() {
        let Some(&target_idx) = index.get(&directive.token) else {
            return Err(FlattenError::UnknownOverrideTarget {
                index: i,
                target: directive.token,
            });
        };

        let record = resolve_override(i, directive, raws, index)?;
        tokens[target_idx].overrides.push(record);
    }
    Ok(())
}

fn resolve_override(
    i: usize,
    directive: OverrideDirective,
    raws: &[RawToken],
    index: &HashMap<TokenPointer, usize>,
) -> Result<OverrideRecord, FlattenError> {
    let mut record = OverrideRecord {
        source: format!("/$overrides/{i}"),
        when: directive.when,
        reference: None,
        value: None,
        fallback: None,
    };

    if let Some(raw_ref) = &directive.reference {
        let resolution = resolve_chain(&directive.token, raw_ref, raws, index)?;
        record.reference = resolution.chain.first().cloned();
        record.value = Some(resolution.value);
    } else if let Some(value) = directive.value {
        match &value {
            Value::String(text) if TokenPointer::is_reference(text) => {
                let resolution = resolve_chain(&directive.token, text, raws, index)?;
                record.reference = resolution.chain.first().cloned();
                record.value = Some(resolution.value);
            }
            _ => record.value = Some(value),
        }
    }

    if let Some(entries) = directive.fallback {
        let mut fallback = Vec::with_capacity(entries.len());
        for (j, entry) in entries.iter().enumerate() {
            if let Some(raw_ref) = entry_reference(entry) {
                match resolve_chain(&directive.token, raw_ref, raws, index) {
                    Ok(resolution) => fallback.push(Candidate {
                        reference: resolution.chain.first().cloned(),
                        value: Some(resolution.value),
                    }),
                    Err(err) if j == 0 => return Err(err),
                    Err(_) => fallback.push(Candidate {
                        reference: TokenPointer::parse(raw_ref).ok(),
                        value: None,
                    }),
                }
            } else {
                fallback.push(Candidate {
                    reference: None,
                    value: Some(entry.clone()),
                });
            }
        }
        record.fallback = Some(fallback);
    }

    Ok(record)
}

/// Warns when two pointers map to the same transformed path. This is never
/// fatal: the first declaration wins in name lookups.
fn warn_on_path_collisions(tokens: &[FlattenedToken], options: &FlattenOptions) {
    let mut seen: HashMap<&str, &TokenPointer> = HashMap::new();
    for token in tokens {
        match seen.get(token.path.as_str()) {
            Some(existing) => options.warn(
                &token.pointer,
                format!(
                    "transformed path `{}` collides with {existing}; first declaration wins",
                    token.path
                ),
            ),
            None => {
                seen.insert(token.path.as_str(), &token.pointer);
            }
        }
    }
}
