//! Source file discovery.

use glob::{MatchOptions, Pattern};
use std::path::Path;
use tracing::{debug, warn};

use kindscript_core::utils::paths::{normalize, relative_path, resolve_path};
use kindscript_core::ProjectConfig;

use crate::resolver::is_declaration_file;

/// Lists source files under `project_dir` joined with `config.root`.
///
/// Honors `.gitignore` when configured, skips declaration files, and
/// drops paths matching any exclude glob (matched against the path relative
/// to the scan root). The result is sorted and uses `/` separators.
#[must_use]
pub fn discover_sources(project_dir: &Path, config: &ProjectConfig) -> Vec<String> {
    let base = normalize(&project_dir.to_string_lossy());
    let root = if config.root.is_absolute() {
        normalize(&config.root.to_string_lossy())
    } else {
        resolve_path(&base, &config.root.to_string_lossy())
    };

    let excludes: Vec<Pattern> = config
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Ignoring invalid exclude pattern '{p}': {e}");
                None
            }
        })
        .collect();
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let mut builder = ignore::WalkBuilder::new(&root);
    builder
        .hidden(false)
        .git_ignore(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .require_git(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| config.extensions.iter().any(|e| e == ext));
        if !has_extension {
            continue;
        }

        let file = normalize(&path.to_string_lossy());
        if is_declaration_file(&file) {
            continue;
        }

        let rel = relative_path(&root, &file);
        if excludes.iter().any(|p| p.matches_with(&rel, options)) {
            debug!("Excluded {rel}");
            continue;
        }

        files.push(file);
    }

    files.sort();
    files
}
