//! Canonical token pointers.
//!
//! A [`TokenPointer`] is the internal key for a flattened token. Two wire
//! grammars normalize to it: the JSON-Pointer string form `#/a/b/c` and the
//! legacy brace form `{a.b.c}`.

use crate::error::FlattenError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Characters that may not appear in a token or group name.
///
/// `{`, `}` and `.` collide with the legacy alias grammar; `/` is the
/// canonical pointer separator.
pub const RESERVED_NAME_CHARS: [char; 4] = ['{', '}', '.', '/'];

/// Returns true if `name` is legal as a token or group name.
///
/// Names must be non-empty, must not start with the reserved `$` metadata
/// prefix, and must not contain any of [`RESERVED_NAME_CHARS`].
#[must_use]
pub fn is_legal_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('$') && !name.contains(RESERVED_NAME_CHARS)
}

/// A validated, canonical pointer to a token within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenPointer {
    segments: Vec<String>,
}

impl TokenPointer {
    /// Returns the root pointer (the document itself).
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses a reference string in either supported grammar.
    ///
    /// # Errors
    ///
    /// Returns [`FlattenError::InvalidPointer`] if the string matches
    /// neither grammar or contains an illegal segment.
    pub fn parse(raw: &str) -> Result<Self, FlattenError> {
        let segments: Vec<&str> = if let Some(rest) = raw.strip_prefix("#/") {
            rest.split('/').collect()
        } else if let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            inner.split('.').collect()
        } else {
            return Err(FlattenError::InvalidPointer {
                raw: raw.to_string(),
            });
        };

        if segments.is_empty()
            || segments
                .iter()
                .any(|s| s.is_empty() || s.starts_with('$') || s.contains(RESERVED_NAME_CHARS))
        {
            return Err(FlattenError::InvalidPointer {
                raw: raw.to_string(),
            });
        }

        Ok(Self {
            segments: segments.into_iter().map(String::from).collect(),
        })
    }

    /// Returns true if `raw` looks like a token reference in either grammar.
    ///
    /// This is a shape test only; [`TokenPointer::parse`] still validates
    /// the segments.
    #[must_use]
    pub fn is_reference(raw: &str) -> bool {
        raw.starts_with("#/") || (raw.starts_with('{') && raw.ends_with('}'))
    }

    /// Returns a pointer for the child named `segment`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    /// Returns the pointer's segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if this is the root pointer.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the pointer in lowercase form, for case-insensitive keys.
    #[must_use]
    pub fn to_lowercase(&self) -> Self {
        Self {
            segments: self.segments.iter().map(|s| s.to_lowercase()).collect(),
        }
    }
}

impl fmt::Display for TokenPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#/{}", self.segments.join("/"))
    }
}

impl Serialize for TokenPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_pointer_form() {
        let ptr = TokenPointer::parse("#/color/brand/primary").unwrap();
        assert_eq!(ptr.segments(), ["color", "brand", "primary"]);
        assert_eq!(ptr.to_string(), "#/color/brand/primary");
    }

    #[test]
    fn parses_legacy_brace_form() {
        let ptr = TokenPointer::parse("{color.brand.primary}").unwrap();
        assert_eq!(ptr.to_string(), "#/color/brand/primary");
    }

    #[test]
    fn both_grammars_normalize_to_same_pointer() {
        assert_eq!(
            TokenPointer::parse("#/a/b").unwrap(),
            TokenPointer::parse("{a.b}").unwrap()
        );
    }

    #[test]
    fn rejects_unknown_grammar() {
        assert!(matches!(
            TokenPointer::parse("color.brand"),
            Err(FlattenError::InvalidPointer { .. })
        ));
        assert!(matches!(
            TokenPointer::parse(""),
            Err(FlattenError::InvalidPointer { .. })
        ));
    }

    #[test]
    fn rejects_empty_and_reserved_segments() {
        assert!(TokenPointer::parse("#/a//b").is_err());
        assert!(TokenPointer::parse("#/$type/b").is_err());
        assert!(TokenPointer::parse("{a.b{c}").is_err());
    }

    #[test]
    fn child_extends_segments() {
        let ptr = TokenPointer::root().child("color").child("primary");
        assert_eq!(ptr.to_string(), "#/color/primary");
        assert!(!ptr.is_root());
        assert!(TokenPointer::root().is_root());
    }

    #[test]
    fn is_reference_shape_test() {
        assert!(TokenPointer::is_reference("#/a/b"));
        assert!(TokenPointer::is_reference("{a.b}"));
        assert!(!TokenPointer::is_reference("#aabbcc"));
        assert!(!TokenPointer::is_reference("plain"));
    }

    #[test]
    fn legal_name_rules() {
        assert!(is_legal_name("PrimaryColor"));
        assert!(is_legal_name("primary-color"));
        assert!(!is_legal_name("$value"));
        assert!(!is_legal_name("a.b"));
        assert!(!is_legal_name("a/b"));
        assert!(!is_legal_name("{a}"));
        assert!(!is_legal_name(""));
    }

    #[test]
    fn lowercase_pointer() {
        let ptr = TokenPointer::parse("#/ColorGroup/Primary").unwrap();
        assert_eq!(ptr.to_lowercase().to_string(), "#/colorgroup/primary");
    }
}
