//! Name transforms for externally visible token paths.
//!
//! The transform only affects presentation: the untransformed
//! [`TokenPointer`](crate::pointer::TokenPointer) stays the canonical key
//! for alias and override resolution.

use crate::pointer::TokenPointer;
use serde::{Deserialize, Serialize};

/// Per-segment identifier casing applied to flattened token paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameTransform {
    /// Leave segments untouched.
    #[default]
    Identity,
    /// `primary-color`
    KebabCase,
    /// `primaryColor`
    CamelCase,
    /// `PrimaryColor`
    PascalCase,
}

impl NameTransform {
    /// Transforms a single path segment.
    #[must_use]
    pub fn apply_segment(self, segment: &str) -> String {
        match self {
            Self::Identity => segment.to_string(),
            Self::KebabCase => split_words(segment)
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join("-"),
            Self::CamelCase => {
                let words = split_words(segment);
                let mut out = String::new();
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(&word.to_lowercase());
                    } else {
                        out.push_str(&capitalize(word));
                    }
                }
                out
            }
            Self::PascalCase => split_words(segment)
                .iter()
                .map(|w| capitalize(w))
                .collect(),
        }
    }

    /// Produces the externally visible, dot-joined path for a pointer.
    #[must_use]
    pub fn display_path(self, pointer: &TokenPointer) -> String {
        pointer
            .segments()
            .iter()
            .map(|s| self.apply_segment(s))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Normalizes a caller-supplied dot-joined name through this transform.
    ///
    /// Used by the registry so `getToken("ColorGroup.PrimaryColor")` and
    /// `getToken("color-group.primary-color")` agree under a kebab-case
    /// transform.
    #[must_use]
    pub fn normalize_name(self, name: &str) -> String {
        name.split('.')
            .map(|s| self.apply_segment(s))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Splits an identifier into words on `-`/`_`/whitespace and camel-case
/// boundaries (`fontSize` -> `font`, `Size`; `HTMLColor` -> `HTML`, `Color`).
fn split_words(segment: &str) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_segments() {
        let t = NameTransform::KebabCase;
        assert_eq!(t.apply_segment("PrimaryColor"), "primary-color");
        assert_eq!(t.apply_segment("primaryColor"), "primary-color");
        assert_eq!(t.apply_segment("primary_color"), "primary-color");
        assert_eq!(t.apply_segment("HTMLColor"), "html-color");
    }

    #[test]
    fn camel_case_segments() {
        let t = NameTransform::CamelCase;
        assert_eq!(t.apply_segment("primary-color"), "primaryColor");
        assert_eq!(t.apply_segment("PrimaryColor"), "primaryColor");
    }

    #[test]
    fn pascal_case_segments() {
        let t = NameTransform::PascalCase;
        assert_eq!(t.apply_segment("primary-color"), "PrimaryColor");
        assert_eq!(t.apply_segment("primaryColor"), "PrimaryColor");
    }

    #[test]
    fn identity_leaves_segments_alone() {
        assert_eq!(
            NameTransform::Identity.apply_segment("PrimaryColor"),
            "PrimaryColor"
        );
    }

    #[test]
    fn display_path_joins_with_dots() {
        let ptr = TokenPointer::parse("#/ColorGroup/PrimaryColor").unwrap();
        assert_eq!(
            NameTransform::KebabCase.display_path(&ptr),
            "color-group.primary-color"
        );
        assert_eq!(
            NameTransform::Identity.display_path(&ptr),
            "ColorGroup.PrimaryColor"
        );
    }

    #[test]
    fn normalize_name_matches_display_path() {
        let ptr = TokenPointer::parse("#/ColorGroup/PrimaryColor").unwrap();
        let t = NameTransform::KebabCase;
        assert_eq!(
            t.normalize_name("ColorGroup.PrimaryColor"),
            t.display_path(&ptr)
        );
    }

    #[test]
    fn digits_stay_attached_to_words() {
        assert_eq!(NameTransform::KebabCase.apply_segment("gray900"), "gray900");
        assert_eq!(
            NameTransform::KebabCase.apply_segment("gray900Hover"),
            "gray900-hover"
        );
    }
}
