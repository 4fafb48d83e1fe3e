//! # token-lint-rules
//!
//! Built-in lint rules for token-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | DT001 | `no-raw-colors` | Forbids raw color literals; use design tokens instead |
//! | DT002 | `unused-tokens` | Reports tokens defined but never used across the run |
//! | DT003 | `no-deprecated-tokens` | Flags references to deprecated tokens |
//!
//! ## Usage
//!
//! ```ignore
//! use token_lint_core::Linter;
//! use token_lint_rules::{NoRawColors, NoDeprecatedTokens};
//!
//! let linter = Linter::builder()
//!     .root("./src")
//!     .registry(registry)
//!     .rule(NoRawColors::new())
//!     .rule(NoDeprecatedTokens::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod no_deprecated_tokens;
mod no_raw_colors;
mod presets;
mod unused_tokens;

pub use no_deprecated_tokens::NoDeprecatedTokens;
pub use no_raw_colors::NoRawColors;
pub use presets::{all_rules, minimal_rules, recommended_rules, strict_rules, Preset};
pub use unused_tokens::UnusedTokens;

/// Re-export core types for convenience.
pub use token_lint_core::{Diagnostic, Rule, Severity};
