//! Error taxonomy for the flatten/resolve pass.
//!
//! Every variant is fatal to the enclosing flatten call: the walker and
//! resolver raise on the first error encountered and return no partial
//! results. Non-fatal conditions (case-only name collisions) go through the
//! warn callback instead.

use crate::pointer::TokenPointer;
use crate::typecheck::TokenType;

/// Errors raised while flattening and resolving a token document.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FlattenError {
    // ── Naming errors ──────────────────────────────

    /// A `$`-prefixed key was used as a token or group name.
    #[error("{parent}: `{name}` uses the reserved `$` metadata prefix as a name")]
    ReservedName {
        /// Pointer to the enclosing group.
        parent: TokenPointer,
        /// The offending key.
        name: String,
    },

    /// A name contains a structural separator character.
    #[error("{parent}: name `{name}` must not contain `{{`, `}}`, `.`, or `/`")]
    IllegalName {
        /// Pointer to the enclosing group.
        parent: TokenPointer,
        /// The offending key.
        name: String,
    },

    /// Two siblings share the exact same name.
    #[error("{parent}: duplicate sibling name `{name}`")]
    DuplicateName {
        /// Pointer to the enclosing group.
        parent: TokenPointer,
        /// The duplicated key.
        name: String,
    },

    /// A child node is neither a token nor a group object.
    #[error("{pointer}: expected a token or group object")]
    UnexpectedNode {
        /// Pointer to the malformed node.
        pointer: TokenPointer,
    },

    // ── Type errors ────────────────────────────────

    /// `$type` is present but not a string.
    #[error("{pointer}: `$type` must be a string")]
    InvalidTypeTag {
        /// Pointer to the node carrying the bad tag.
        pointer: TokenPointer,
    },

    /// No `$type` could be declared, inherited, or resolved via aliases.
    #[error("{pointer}: no `$type` declared, inherited, or resolvable through its alias chain")]
    MissingType {
        /// Pointer to the untyped token.
        pointer: TokenPointer,
    },

    /// A value fails its type validator's structural contract.
    #[error("{pointer}: invalid `{token_type}` value: {reason}")]
    InvalidValue {
        /// Pointer to the token.
        pointer: TokenPointer,
        /// The type whose contract was violated.
        token_type: TokenType,
        /// What was wrong with the value.
        reason: String,
    },

    /// An alias declares a type that conflicts with its resolved target.
    #[error("{pointer}: alias declares type `{declared}` but resolves to `{resolved}`")]
    AliasTypeConflict {
        /// Pointer to the alias token.
        pointer: TokenPointer,
        /// The type the alias declared.
        declared: TokenType,
        /// The type the chain resolved to.
        resolved: TokenType,
    },

    // ── Reference errors ───────────────────────────

    /// A reference string matches neither pointer grammar.
    #[error("invalid token reference `{raw}`: expected `#/a/b/c` or `{{a.b.c}}`")]
    InvalidPointer {
        /// The unparseable reference.
        raw: String,
    },

    /// A reference targets a pointer that does not exist.
    #[error("{pointer}: reference to unknown token {target}")]
    UnknownReference {
        /// Pointer to the token holding the reference.
        pointer: TokenPointer,
        /// The unresolved target.
        target: TokenPointer,
    },

    /// An alias chain cycles back on itself.
    #[error("circular token reference: {}", format_cycle(.cycle))]
    CircularReference {
        /// The full cycle, in resolution order, ending where it restarts.
        cycle: Vec<TokenPointer>,
    },

    /// An override entry is structurally malformed.
    #[error("$overrides[{index}]: {reason}")]
    InvalidOverride {
        /// Index into the `$overrides` array.
        index: usize,
        /// What was wrong with the entry.
        reason: String,
    },

    /// An override targets a token pointer that does not exist.
    #[error("$overrides[{index}]: targets unknown token {target}")]
    UnknownOverrideTarget {
        /// Index into the `$overrides` array.
        index: usize,
        /// The missing target pointer.
        target: TokenPointer,
    },

    // ── Metadata errors ────────────────────────────

    /// `$extensions` is malformed.
    #[error("{pointer}: `$extensions` {reason}")]
    InvalidExtensions {
        /// Pointer to the node carrying the extensions.
        pointer: TokenPointer,
        /// What was wrong.
        reason: String,
    },

    /// `$deprecated` is malformed.
    #[error(
        "{pointer}: `$deprecated` must be a boolean, a string, or a `{{\"$ref\"}}` replacement"
    )]
    InvalidDeprecated {
        /// Pointer to the node carrying the marker.
        pointer: TokenPointer,
    },
}

fn format_cycle(cycle: &[TokenPointer]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
