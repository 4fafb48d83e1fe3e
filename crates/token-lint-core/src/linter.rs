//! Linter orchestrating rule execution over a file tree.

use crate::config::Config;
use crate::registry::TokenRegistry;
use crate::rule::{LintContext, Rule, RuleBox};
use crate::tracker::{TokenTracker, UnusedTokenCheck};
use crate::types::{Diagnostic, LintResult};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during a lint run.
#[derive(Debug, Error)]
pub enum LinterError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File discovery error.
    #[error("File discovery error: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    registry: Option<TokenRegistry>,
    tracker: Option<TokenTracker>,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to lint.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the linter.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the linter.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the token registry rules check against.
    #[must_use]
    pub fn registry(mut self, registry: TokenRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the usage tracker fed by every linted file.
    #[must_use]
    pub fn tracker(mut self, tracker: TokenTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the linter.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be resolved.
    pub fn build(self) -> Result<Linter, LinterError> {
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.lint.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut include_patterns = self.include_patterns;
        if include_patterns.is_empty() {
            include_patterns.extend(config.lint.include.clone());
        }
        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.lint.exclude.clone());

        Ok(Linter {
            root,
            rules: self.rules,
            registry: self.registry.unwrap_or_default(),
            tracker: self.tracker,
            include_patterns,
            exclude_patterns,
            config,
        })
    }
}

/// Runs rules over discovered files and accumulates diagnostics.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    root: PathBuf,
    rules: Vec<RuleBox>,
    registry: TokenRegistry,
    tracker: Option<TokenTracker>,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    config: Config,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the root directory being linted.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the token registry.
    #[must_use]
    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Lints every discovered file and returns the results.
    ///
    /// Usage tracking accumulates along the way; call [`Linter::finish`]
    /// afterwards for the unused-token report.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails.
    pub fn lint(&self) -> Result<LintResult, LinterError> {
        info!("Starting lint at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to lint", files.len());

        for file_path in &files {
            let text = std::fs::read_to_string(file_path)?;
            let relative = file_path.strip_prefix(&self.root).unwrap_or(file_path);
            result
                .diagnostics
                .extend(self.lint_text(relative, &text));
            result.files_checked += 1;
        }

        result.sort_by_location();

        info!(
            "Lint complete: {} diagnostics in {} files",
            result.diagnostics.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Lints a single file's text, feeding the usage tracker first.
    pub fn lint_text(&self, path: &Path, text: &str) -> Vec<Diagnostic> {
        debug!("Linting: {}", path.display());

        if let Some(tracker) = &self.tracker {
            tracker.scan(text);
        }

        let ctx = LintContext::new(path, text);
        let mut diagnostics = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let mut found = rule.check(&ctx, &self.registry);
            if let Some(severity) = self.config.rule_severity(rule.name()) {
                for d in &mut found {
                    d.severity = severity;
                }
            }
            diagnostics.extend(found);
        }

        diagnostics
    }

    /// Flushes the usage tracker into unused-token diagnostics.
    ///
    /// Returns an empty list when no tracker was attached.
    #[must_use]
    pub fn finish(&self, check: &UnusedTokenCheck) -> Vec<Diagnostic> {
        self.tracker
            .as_ref()
            .map(|tracker| tracker.flush(check))
            .unwrap_or_default()
    }

    /// Discovers files to lint under the root.
    fn discover_files(&self) -> Result<Vec<PathBuf>, LinterError> {
        let mut walker = ignore::WalkBuilder::new(&self.root);
        walker
            .git_ignore(self.config.lint.respect_gitignore)
            .hidden(true);

        let mut files = Vec::new();
        for entry in walker.build() {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.into_path();
            if self.matches(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Checks a path against include and exclude patterns.
    fn matches(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let text = relative.to_string_lossy();

        let excluded = self.exclude_patterns.iter().any(|pattern| {
            glob::Pattern::new(pattern).is_ok_and(|p| p.matches(&text))
        });
        if excluded {
            return false;
        }

        self.include_patterns.iter().any(|pattern| {
            glob::Pattern::new(pattern).is_ok_and(|p| p.matches(&text))
                // `**/*.css` should also match a top-level `a.css`
                || pattern
                    .strip_prefix("**/")
                    .and_then(|suffix| glob::Pattern::new(suffix).ok())
                    .is_some_and(|p| p.matches(&text))
        })
    }
}
