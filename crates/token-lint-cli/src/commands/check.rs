//! Check command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use token_lint_core::{
    flatten_document, Config, FlattenOptions, Linter, Severity, TokenRegistry, TokenTracker,
};
use token_lint_rules::{
    recommended_rules, NoDeprecatedTokens, NoRawColors, Preset, UnusedTokens,
};

use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config_source = resolve_config_path(path, config_path);
    let config = match &config_source {
        Some(p) => Config::from_file(p)
            .with_context(|| format!("Failed to load config: {}", p.display()))?,
        None => Config::default(),
    };

    let registry = load_registry(path, &config_source, &config)?;
    let tracker = TokenTracker::from_registry(
        &registry,
        config_source
            .clone()
            .unwrap_or_else(|| PathBuf::from("token-lint.toml")),
    );

    // Build linter
    let mut builder = Linter::builder()
        .root(path)
        .registry(registry)
        .tracker(tracker);

    for pattern in exclude {
        builder = builder.exclude(pattern);
    }

    let rules_to_add = if let Some(filter) = rules_filter {
        let rule_names: Vec<&str> = filter.split(',').map(str::trim).collect();
        filter_rules(&rule_names, &config)
    } else {
        preset_rules(&config)
    };

    let wants_unused_report = rules_to_add.iter().any(|r| r.name() == "unused-tokens");
    for rule in rules_to_add {
        builder = builder.rule_box(rule);
    }

    let linter = builder
        .config(config.clone())
        .build()
        .context("Failed to build linter")?;

    tracing::info!("Linting {:?} with {} rules", path, linter.rule_count());

    let mut result = linter.lint().context("Lint run failed")?;

    if wants_unused_report && config.is_rule_enabled("unused-tokens") {
        let check = unused_tokens_rule(&config).to_check();
        result.diagnostics.extend(linter.finish(&check));
        result.sort_by_location();
    }

    // Output results
    super::output::print(&result, format)?;

    // Exit with error code past the failure threshold
    if result.has_diagnostics_at(fail_threshold(&config)) {
        std::process::exit(1);
    }

    Ok(())
}

/// Explicit `--config`, else `<root>/token-lint.toml` when present.
fn resolve_config_path(root: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    let candidate = root.join("token-lint.toml");
    candidate.exists().then_some(candidate)
}

/// Loads and flattens every configured theme document.
fn load_registry(
    root: &Path,
    config_source: &Option<PathBuf>,
    config: &Config,
) -> Result<TokenRegistry> {
    // Theme paths resolve relative to the config file, falling back to the
    // lint root.
    let base = config_source
        .as_deref()
        .and_then(Path::parent)
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

    let transform = config.tokens.transform;
    let mut registry = TokenRegistry::new(transform);

    for (theme, doc_path) in &config.tokens.themes {
        let full_path = if doc_path.is_absolute() {
            doc_path.clone()
        } else {
            base.join(doc_path)
        };
        let text = std::fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read token document {}", full_path.display()))?;
        let document: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", full_path.display()))?;

        let warn_theme = theme.clone();
        let options = FlattenOptions::new()
            .with_transform(transform)
            .with_warnings(move |w| {
                tracing::warn!("theme {}: {}: {}", warn_theme, w.pointer, w.message);
            });

        let tokens = flatten_document(&document, &options)
            .with_context(|| format!("Failed to flatten theme `{theme}`"))?;
        tracing::info!("Theme `{}`: {} tokens", theme, tokens.len());
        registry.add_theme(theme.clone(), tokens);
    }

    Ok(registry)
}

/// Rules from the configured preset, defaulting to recommended.
fn preset_rules(config: &Config) -> Vec<token_lint_core::RuleBox> {
    let mut rules = config
        .preset
        .as_deref()
        .and_then(Preset::from_name)
        .map_or_else(recommended_rules, Preset::rules);

    // Config options apply on top of whatever the preset picked.
    for rule in &mut rules {
        if rule.name() == "unused-tokens" {
            *rule = Box::new(unused_tokens_rule(config));
        } else if rule.name() == "no-raw-colors" {
            *rule = Box::new(raw_colors_rule(config));
        }
    }
    rules
}

fn unused_tokens_rule(config: &Config) -> UnusedTokens {
    let mut rule = UnusedTokens::new();
    if let Some(rule_config) = config.rules.get("unused-tokens") {
        rule = rule.ignore(rule_config.get_str_array("ignore"));
        if let Some(severity) = rule_config.severity {
            rule = rule.severity(severity);
        }
    }
    rule
}

fn raw_colors_rule(config: &Config) -> NoRawColors {
    let mut rule = NoRawColors::new();
    if let Some(rule_config) = config.rules.get("no-raw-colors") {
        rule = rule.allow(rule_config.get_str_array("allow"));
    }
    rule
}

fn filter_rules(names: &[&str], config: &Config) -> Vec<token_lint_core::RuleBox> {
    let mut rules: Vec<token_lint_core::RuleBox> = Vec::new();

    for name in names {
        match *name {
            "no-raw-colors" | "DT001" => rules.push(Box::new(raw_colors_rule(config))),
            "unused-tokens" | "DT002" => rules.push(Box::new(unused_tokens_rule(config))),
            "no-deprecated-tokens" | "DT003" => {
                rules.push(Box::new(NoDeprecatedTokens::new()));
            }
            _ => tracing::warn!("Unknown rule: {}", name),
        }
    }

    rules
}

/// Parses `fail_on` from config; unknown values fall back to `error`.
fn fail_threshold(config: &Config) -> Severity {
    match config.fail_on.as_deref() {
        Some("info") => Severity::Info,
        Some("warning") => Severity::Warning,
        _ => Severity::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_threshold_defaults_to_error() {
        assert_eq!(fail_threshold(&Config::default()), Severity::Error);

        let config = Config::parse("fail_on = \"warning\"").expect("config");
        assert_eq!(fail_threshold(&config), Severity::Warning);
    }

    #[test]
    fn registry_loads_configured_themes() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("light.json"),
            r##"{"color": {"bg": {"$type": "color", "$value": "#fff"}}}"##,
        )
        .expect("write");

        let config = Config::parse(
            "[tokens]\ntransform = \"kebab-case\"\n[tokens.themes]\nlight = \"light.json\"\n",
        )
        .expect("config");

        let registry = load_registry(dir.path(), &None, &config).expect("registry");
        assert_eq!(registry.themes(), ["light"]);
        assert!(registry.token("color.bg", Some("light")).is_some());
    }

    #[test]
    fn flatten_failures_name_the_theme() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("bad.json"),
            r##"{"a": {"$ref": "#/a"}}"##,
        )
        .expect("write");

        let config =
            Config::parse("[tokens.themes]\nbroken = \"bad.json\"\n").expect("config");
        let err = load_registry(dir.path(), &None, &config).expect_err("cycle");
        assert!(format!("{err:#}").contains("broken"));
    }
}
