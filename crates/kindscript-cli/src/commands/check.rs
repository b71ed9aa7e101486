//! Check command implementation.

use anyhow::Result;
use kindscript_core::Project;
use kindscript_ts::TsHost;
use std::path::Path;

use crate::config_lookup::{ConfigOrigin, LoadedConfig};
use crate::OutputFormat;

/// Runs the check command.
pub fn run(path: &Path, format: OutputFormat, loaded: &LoadedConfig) -> Result<()> {
    let config = &loaded.config;
    if matches!(loaded.origin, ConfigOrigin::User(_)) {
        tracing::info!("Using {}", loaded.origin);
    }

    let host = TsHost::new(path).with_extensions(&config.project.extensions);
    tracing::info!("Checking {}", host.project_dir().display());

    let mut project = Project::default();
    let outcome = project.check(config, &host)?;

    for error in &outcome.classification_errors {
        eprintln!("Classification error: {error}");
    }

    super::output::print(&outcome, format)?;

    if outcome.report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
