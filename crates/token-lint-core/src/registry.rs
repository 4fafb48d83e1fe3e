//! Theme-partitioned store of flattened tokens.
//!
//! The registry is built once per lint run and then queried read-only by
//! rules, so both lookup paths (canonical pointer and transformed name) are
//! indexed up front.

use crate::pointer::TokenPointer;
use crate::token::FlattenedToken;
use crate::transform::NameTransform;
use std::collections::{HashMap, HashSet};

/// Theme name used when a project does not declare themes.
pub const DEFAULT_THEME: &str = "default";

/// One theme's tokens plus its lookup indexes.
#[derive(Debug, Default)]
struct Theme {
    tokens: Vec<FlattenedToken>,
    by_pointer: HashMap<TokenPointer, usize>,
    by_name: HashMap<String, usize>,
}

impl Theme {
    fn build(tokens: Vec<FlattenedToken>) -> Self {
        let mut by_pointer = HashMap::with_capacity(tokens.len());
        let mut by_name = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            by_pointer.entry(token.pointer.clone()).or_insert(i);
            // On transformed-path collisions the first declaration wins;
            // the flatten pass already warned about them.
            by_name.entry(token.path.clone()).or_insert(i);
        }
        Self {
            tokens,
            by_pointer,
            by_name,
        }
    }
}

/// Read-only token store, partitioned by theme.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    transform: NameTransform,
    // Insertion order is preserved so cross-theme queries are
    // deterministic.
    themes: Vec<(String, Theme)>,
}

impl TokenRegistry {
    /// Creates an empty registry whose name lookups normalize through
    /// `transform`.
    #[must_use]
    pub fn new(transform: NameTransform) -> Self {
        Self {
            transform,
            themes: Vec::new(),
        }
    }

    /// Adds a theme's flattened tokens. Re-adding a theme name replaces
    /// the earlier tokens.
    pub fn add_theme(&mut self, name: impl Into<String>, tokens: Vec<FlattenedToken>) {
        let name = name.into();
        let theme = Theme::build(tokens);
        match self.themes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = theme,
            None => self.themes.push((name, theme)),
        }
    }

    /// Theme names in insertion order.
    #[must_use]
    pub fn themes(&self) -> Vec<&str> {
        self.themes.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Total token count across all themes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.themes.iter().map(|(_, t)| t.tokens.len()).sum()
    }

    /// Returns true if no theme holds any token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn theme(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// Looks up a token by dot-joined name.
    ///
    /// The name is normalized through the registry's transform first, so
    /// `ColorGroup.PrimaryColor` and `color-group.primary-color` find the
    /// same token under a kebab-case transform. An omitted theme reads
    /// [`DEFAULT_THEME`].
    #[must_use]
    pub fn token(&self, name: &str, theme: Option<&str>) -> Option<&FlattenedToken> {
        let normalized = self.transform.normalize_name(name);
        let theme = self.theme(theme.unwrap_or(DEFAULT_THEME))?;
        theme.by_name.get(&normalized).map(|&i| &theme.tokens[i])
    }

    /// Looks up a token by canonical pointer.
    ///
    /// Unlike [`TokenRegistry::token`], `theme = None` searches every
    /// theme in insertion order and the first match wins.
    #[must_use]
    pub fn token_by_pointer(
        &self,
        pointer: &TokenPointer,
        theme: Option<&str>,
    ) -> Option<&FlattenedToken> {
        match theme {
            Some(theme_name) => {
                let theme = self.theme(theme_name)?;
                theme.by_pointer.get(pointer).map(|&i| &theme.tokens[i])
            }
            None => self.themes.iter().find_map(|(_, theme)| {
                theme.by_pointer.get(pointer).map(|&i| &theme.tokens[i])
            }),
        }
    }

    /// Tokens of one theme in declaration order, or the union of all
    /// themes with earlier themes winning on pointer collisions.
    ///
    /// An unknown theme name yields an empty list, not an error.
    #[must_use]
    pub fn tokens(&self, theme: Option<&str>) -> Vec<&FlattenedToken> {
        match theme {
            Some(theme_name) => self
                .theme(theme_name)
                .map(|t| t.tokens.iter().collect())
                .unwrap_or_default(),
            None => {
                let mut seen: HashSet<&TokenPointer> = HashSet::new();
                let mut out = Vec::new();
                for (_, theme) in &self.themes {
                    for token in &theme.tokens {
                        if seen.insert(&token.pointer) {
                            out.push(token);
                        }
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::flatten_document;
    use crate::walker::FlattenOptions;
    use serde_json::json;

    fn theme_tokens(doc: serde_json::Value, transform: NameTransform) -> Vec<FlattenedToken> {
        flatten_document(&doc, &FlattenOptions::new().with_transform(transform)).unwrap()
    }

    fn registry() -> TokenRegistry {
        let mut registry = TokenRegistry::new(NameTransform::KebabCase);
        registry.add_theme(
            "light",
            theme_tokens(
                json!({
                    "ColorGroup": {
                        "PrimaryColor": {"$type": "color", "$value": "#000"},
                        "Accent": {"$type": "color", "$value": "#f0f"}
                    }
                }),
                NameTransform::KebabCase,
            ),
        );
        registry.add_theme(
            "dark",
            theme_tokens(
                json!({
                    "ColorGroup": {
                        "PrimaryColor": {"$type": "color", "$value": "#fff"}
                    }
                }),
                NameTransform::KebabCase,
            ),
        );
        registry
    }

    #[test]
    fn name_lookup_normalizes_through_transform() {
        let registry = registry();
        let by_transformed = registry.token("color-group.primary-color", Some("light"));
        let by_source = registry.token("ColorGroup.PrimaryColor", Some("light"));
        assert!(by_transformed.is_some());
        assert_eq!(
            by_transformed.map(|t| t.pointer.to_string()),
            by_source.map(|t| t.pointer.to_string())
        );
    }

    #[test]
    fn theme_scoping() {
        let registry = registry();
        let light = registry.token("color-group.primary-color", Some("light")).unwrap();
        let dark = registry.token("color-group.primary-color", Some("dark")).unwrap();
        assert_eq!(light.value, json!("#000"));
        assert_eq!(dark.value, json!("#fff"));
    }

    #[test]
    fn omitted_theme_reads_the_default_theme() {
        let mut registry = registry();
        registry.add_theme(
            DEFAULT_THEME,
            theme_tokens(
                json!({
                    "ColorGroup": {
                        "PrimaryColor": {"$type": "color", "$value": "#333"}
                    }
                }),
                NameTransform::KebabCase,
            ),
        );
        let token = registry.token("color-group.primary-color", None).unwrap();
        assert_eq!(token.value, json!("#333"));
    }

    #[test]
    fn omitted_theme_without_a_default_theme_finds_nothing() {
        // registry() declares only `light` and `dark`
        let registry = registry();
        assert!(registry.token("color-group.primary-color", None).is_none());
    }

    #[test]
    fn unknown_theme_is_empty_not_an_error() {
        let registry = registry();
        assert!(registry.token("color-group.accent", Some("missing")).is_none());
        assert!(registry.tokens(Some("missing")).is_empty());
    }

    #[test]
    fn union_deduplicates_by_pointer() {
        let registry = registry();
        let all = registry.tokens(None);
        // light has two tokens, dark shadows one of them
        assert_eq!(all.len(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn pointer_lookup() {
        let registry = registry();
        let pointer = TokenPointer::parse("#/ColorGroup/Accent").unwrap();
        assert!(registry.token_by_pointer(&pointer, Some("light")).is_some());
        assert!(registry.token_by_pointer(&pointer, Some("dark")).is_none());
        assert!(registry.token_by_pointer(&pointer, None).is_some());
    }

    #[test]
    fn re_adding_a_theme_replaces_it() {
        let mut registry = registry();
        registry.add_theme("dark", Vec::new());
        assert!(registry.tokens(Some("dark")).is_empty());
        assert_eq!(registry.themes(), ["light", "dark"]);
    }
}
