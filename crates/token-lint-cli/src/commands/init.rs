//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r##"# token-lint configuration

# Severity that fails the run: "error" (default), "warning", or "info"
# fail_on = "error"

# Preset: "recommended" (default), "strict", or "minimal"
# preset = "recommended"

[tokens]
# Name transform applied to flattened token paths:
# "identity", "kebab-case", "camel-case", or "pascal-case"
transform = "kebab-case"

# Theme name -> token document (JSON), relative to this file
[tokens.themes]
# light = "tokens/light.json"
# dark = "tokens/dark.json"

[lint]
# Root directory to lint (default: current directory)
# root = "./src"

# Glob patterns selecting files to lint
include = ["**/*.css", "**/*.scss", "**/*.ts", "**/*.tsx"]

# Glob patterns to exclude
exclude = [
    "**/node_modules/**",
    "**/dist/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.no-raw-colors]
enabled = true
# severity = "error"
allow = ["transparent", "currentColor"]

[rules.unused-tokens]
enabled = true
# Literal values to exempt; entries also match token paths as globs
# ignore = ["#111", "internal.*"]

[rules.no-deprecated-tokens]
enabled = true
"##;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    run_at(Path::new("."), force)
}

/// Runs the init command in `dir`.
pub fn run_at(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join("token-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    println!("Created token-lint.toml");
    println!("\nNext steps:");
    println!("  1. Point [tokens.themes] at your token documents");
    println!("  2. Run: token-lint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_lint_core::Config;

    #[test]
    fn generated_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).expect("parse");
        assert!(config.is_rule_enabled("no-raw-colors"));
        assert_eq!(
            config.rules["no-raw-colors"].get_str_array("allow"),
            ["transparent", "currentColor"]
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        run_at(dir.path(), false).expect("first init");
        assert!(run_at(dir.path(), false).is_err());
        run_at(dir.path(), true).expect("forced init");
    }
}
