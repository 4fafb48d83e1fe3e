//! List rules command implementation.

use token_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - DT001, DT002, DT003 as warnings (default)");
    println!("  strict       - Same rules with raw colors and deprecations as errors");
    println!("  minimal      - DT001 only (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  token-lint check --rules no-raw-colors,unused-tokens");
    println!("  token-lint check --rules DT001,DT003");
}
