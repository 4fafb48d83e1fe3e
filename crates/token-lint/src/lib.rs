//! # token-lint
//!
//! Design-token linter for style and markup files.
//!
//! This is the main facade crate that re-exports the resolution engine and
//! the built-in rules.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use token_lint::{flatten_document, FlattenOptions, Linter, NameTransform, TokenRegistry};
//! use token_lint::rules::recommended_rules;
//!
//! let document: serde_json::Value = serde_json::from_str(&std::fs::read_to_string("tokens.json")?)?;
//! let tokens = flatten_document(&document, &FlattenOptions::new().with_transform(NameTransform::KebabCase))?;
//!
//! let mut registry = TokenRegistry::new(NameTransform::KebabCase);
//! registry.add_theme("default", tokens);
//!
//! let mut builder = Linter::builder().root("./src").registry(registry);
//! for rule in recommended_rules() {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.build()?.lint()?;
//! result.print_report();
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use token_lint_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use token_lint_rules::*;
}
