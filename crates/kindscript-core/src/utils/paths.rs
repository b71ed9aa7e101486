//! Path utilities for scope matching.
//!
//! Scopes and files are handled as `/`-separated strings. Nothing here
//! touches the filesystem.

/// Normalizes separators to `/` and strips a single trailing `/`.
#[must_use]
pub fn normalize(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    match replaced.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => replaced,
    }
}

/// Returns true if `parent` is a proper, segment-bounded prefix of `child`.
///
/// `src/domain` is a proper prefix of `src/domain/ordering` but not of
/// `src/domain-extensions/x`, and never of itself.
///
/// # Examples
///
/// ```
/// use kindscript_core::utils::paths::is_proper_scope_prefix;
///
/// assert!(is_proper_scope_prefix("src/domain", "src/domain/x"));
/// assert!(!is_proper_scope_prefix("src/domain", "src/domain-ext/x"));
/// ```
#[must_use]
pub fn is_proper_scope_prefix(parent: &str, child: &str) -> bool {
    parent != child
        && child.starts_with(parent)
        && child.as_bytes().get(parent.len()) == Some(&b'/')
}

/// Returns true if `path` equals `scope` or lies beneath it.
#[must_use]
pub fn is_within_scope(path: &str, scope: &str) -> bool {
    path == scope || is_proper_scope_prefix(scope, path)
}

/// Checks whether a file belongs to a symbol's location.
///
/// A file listed in `resolved` always matches. Otherwise the location must
/// match exactly, be a `/`-bounded prefix, or appear as a `/`-bounded
/// segment run inside an absolute file path.
#[must_use]
pub fn is_file_in_symbol(file: &str, location: &str, resolved: Option<&[String]>) -> bool {
    if resolved.is_some_and(|files| files.iter().any(|f| f == file)) {
        return true;
    }

    let file = file.replace('\\', "/");
    let location = normalize(location);

    if file == location {
        return true;
    }

    let prefix = format!("{location}/");
    file.starts_with(&prefix) || file.contains(&format!("/{prefix}"))
}

/// Joins a base path and a segment with exactly one `/` between them.
#[must_use]
pub fn join_path(base: &str, segment: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let segment = segment.strip_prefix('/').unwrap_or(segment);
    format!("{base}/{segment}")
}

/// Returns the directory portion of a path.
///
/// Yields `.` when there is no separator and `/` for top-level entries.
#[must_use]
pub fn dirname_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    match normalized.rfind('/') {
        None => ".".to_string(),
        Some(0) => "/".to_string(),
        Some(idx) => normalized[..idx].to_string(),
    }
}

/// Returns the final segment of a path.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Resolves `relative` against the directory `base`, folding `.` and `..`.
///
/// ```
/// use kindscript_core::utils::paths::resolve_path;
///
/// assert_eq!(resolve_path("/project/src", "./ordering"), "/project/src/ordering");
/// assert_eq!(resolve_path("/project/src", "../shared"), "/project/shared");
/// ```
#[must_use]
pub fn resolve_path(base: &str, relative: &str) -> String {
    let base = normalize(base);
    if relative == "." {
        return base;
    }

    let relative = relative.replace('\\', "/");
    let relative = relative.strip_prefix("./").unwrap_or(&relative);

    let mut segments: Vec<&str> = base.split('/').collect();
    for seg in relative.split('/') {
        match seg {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Returns the part of `to` below `from`, or `to` unchanged when it is not
/// beneath `from`.
#[must_use]
pub fn relative_path(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = to.replace('\\', "/");
    match to.strip_prefix(&format!("{from}/")) {
        Some(rest) => rest.to_string(),
        None => to,
    }
}
