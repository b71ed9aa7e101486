//! Init command implementation.

use anyhow::{bail, Context, Result};
use kindscript_core::CONFIG_FILE_NAME;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# KindScript configuration
# Architecture is declared in TypeScript with Kind<...> types and
# `satisfies InstanceConfig<...>`; this file only tunes how it is checked.

[project]
# Directory scanned for sources, relative to this file
root = "."

# Source file extensions
extensions = ["ts", "tsx"]

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
]

# Respect .gitignore files
respect_gitignore = true

# Contract configurations
# Each contract type can be disabled or have its severity overridden
# (error | warning | info). Tables are keyed by contract type (purity,
# mirrors) or by the constraint that declares it (pure, "filesystem.mirrors").

# [contracts.noDependency]
# severity = "warning"

# [contracts.colocated]
# enabled = false

# [contracts."filesystem.exists"]
# severity = "info"
"#;

/// Runs the init command.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Declare Kinds and Instances in your TypeScript sources");
    println!("  2. Run: ksc check");

    Ok(())
}
