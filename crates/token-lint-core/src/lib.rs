//! # token-lint-core
//!
//! Core framework for design-token linting: document flattening, alias and
//! override resolution, type validation, and cross-file usage tracking.
//!
//! The pipeline runs in three stages:
//!
//! - [`flatten_document`] walks a token document into resolved
//!   [`FlattenedToken`]s
//! - [`TokenRegistry`] indexes flattened tokens per theme for rule lookups
//! - [`Linter`] runs [`Rule`]s over project files, feeding a
//!   [`TokenTracker`] that reports unused tokens at the end of the run
//!
//! ## Example
//!
//! ```ignore
//! use token_lint_core::{flatten_document, FlattenOptions, Linter, NameTransform, TokenRegistry};
//!
//! let tokens = flatten_document(&document, &FlattenOptions::new())?;
//! let mut registry = TokenRegistry::new(NameTransform::KebabCase);
//! registry.add_theme("default", tokens);
//!
//! let linter = Linter::builder()
//!     .root("./src")
//!     .registry(registry)
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = linter.lint()?;
//! result.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod linter;
mod pointer;
mod registry;
mod resolver;
mod rule;
mod token;
mod tracker;
mod transform;
mod typecheck;
mod types;
mod walker;

pub use config::{Config, ConfigError, LintConfig, RuleConfig, TokensConfig};
pub use document::Deprecation;
pub use error::FlattenError;
pub use linter::{Linter, LinterBuilder, LinterError};
pub use pointer::TokenPointer;
pub use registry::{TokenRegistry, DEFAULT_THEME};
pub use resolver::flatten_document;
pub use rule::{LintContext, Rule, RuleBox};
pub use token::{Candidate, FlattenedToken, OverrideRecord, TokenMetadata};
pub use tracker::{MatchStrategy, TokenTracker, UnusedTokenCheck};
pub use transform::NameTransform;
pub use typecheck::{TokenType, TypeLookup};
pub use types::{
    Diagnostic, LintResult, Location, RenderedDiagnostic, Severity, TokenPos,
};
pub use walker::{FlattenOptions, FlattenWarning};
