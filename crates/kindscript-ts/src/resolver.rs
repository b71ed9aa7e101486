//! File-system resolution of declared locations and import specifiers.

use std::path::Path;
use walkdir::WalkDir;

use kindscript_core::utils::paths::{dirname_path, normalize, resolve_path};
use kindscript_core::FileResolver;

/// Extensions tried, in order, for an extensionless relative import.
const IMPORT_SUFFIXES: [&str; 4] = [".ts", ".tsx", "/index.ts", "/index.tsx"];

/// Resolves locations against the real file system.
#[derive(Debug, Clone)]
pub struct FsFileResolver {
    extensions: Vec<String>,
}

impl FsFileResolver {
    /// Creates a resolver listing files with the given extensions.
    #[must_use]
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.to_vec(),
        }
    }

    fn is_source(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        !is_declaration_file(&name)
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

impl Default for FsFileResolver {
    fn default() -> Self {
        Self::new(&["ts".to_string(), "tsx".to_string()])
    }
}

impl FileResolver for FsFileResolver {
    fn resolve(&self, location: &str) -> Vec<String> {
        let path = Path::new(location);
        if path.is_file() {
            return vec![normalize(location)];
        }
        if !path.is_dir() {
            return Vec::new();
        }

        let mut files: Vec<String> = WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && self.is_source(e.path()))
            .map(|e| normalize(&e.path().to_string_lossy()))
            .collect();
        files.sort();
        files
    }

    fn exists(&self, location: &str) -> bool {
        Path::new(location).exists()
    }
}

/// Whether `path` is a `.d.ts` declaration file.
#[must_use]
pub fn is_declaration_file(path: &str) -> bool {
    path.ends_with(".d.ts") || path.ends_with(".d.tsx")
}

/// Resolves a relative import specifier written in `from_file` to a source
/// file on disk.
///
/// Bare package specifiers, `node_modules` targets, and declaration files
/// resolve to `None`.
#[must_use]
pub fn resolve_import(from_file: &str, specifier: &str) -> Option<String> {
    if !(specifier.starts_with('.') || specifier.starts_with('/')) {
        return None;
    }

    let target = if specifier.starts_with('/') {
        normalize(specifier)
    } else {
        resolve_path(&dirname_path(from_file), specifier)
    };

    let mut candidates = Vec::new();
    if target.ends_with(".ts") || target.ends_with(".tsx") {
        candidates.push(target.clone());
    }
    candidates.extend(IMPORT_SUFFIXES.iter().map(|s| format!("{target}{s}")));
    if let Some(stem) = target.strip_suffix(".js") {
        candidates.push(format!("{stem}.ts"));
    }
    if let Some(stem) = target.strip_suffix(".jsx") {
        candidates.push(format!("{stem}.tsx"));
    }

    candidates.into_iter().find(|candidate| {
        !is_declaration_file(candidate)
            && !candidate.split('/').any(|seg| seg == "node_modules")
            && Path::new(candidate).is_file()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) -> String {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
        fs::write(&path, "export {};\n").expect("write");
        normalize(&path.to_string_lossy())
    }

    #[test]
    fn resolves_directory_recursively_and_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let b = touch(dir.path(), "domain/b.ts");
        let a = touch(dir.path(), "domain/nested/a.tsx");
        touch(dir.path(), "domain/types.d.ts");
        touch(dir.path(), "domain/readme.md");

        let location = normalize(&dir.path().join("domain").to_string_lossy());
        let mut expected = vec![b, a];
        expected.sort();
        assert_eq!(FsFileResolver::default().resolve(&location), expected);
    }

    #[test]
    fn resolves_file_to_itself_and_missing_to_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = touch(dir.path(), "src/app.ts");
        let resolver = FsFileResolver::default();

        assert_eq!(resolver.resolve(&file), vec![file.clone()]);
        assert!(resolver.exists(&file));

        let missing = normalize(&dir.path().join("ghost").to_string_lossy());
        assert!(resolver.resolve(&missing).is_empty());
        assert!(!resolver.exists(&missing));
    }

    #[test]
    fn resolves_relative_imports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let from = touch(dir.path(), "src/app/main.ts");
        let order = touch(dir.path(), "src/domain/order.ts");
        let index = touch(dir.path(), "src/infra/index.ts");
        let view = touch(dir.path(), "src/app/view.tsx");

        assert_eq!(resolve_import(&from, "../domain/order"), Some(order.clone()));
        assert_eq!(resolve_import(&from, "../domain/order.js"), Some(order));
        assert_eq!(resolve_import(&from, "../infra"), Some(index));
        assert_eq!(resolve_import(&from, "./view"), Some(view));
        assert_eq!(resolve_import(&from, "./missing"), None);
        assert_eq!(resolve_import(&from, "zod"), None);
    }

    #[test]
    fn skips_declaration_and_vendor_targets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let from = touch(dir.path(), "src/main.ts");
        touch(dir.path(), "src/globals.d.ts");
        touch(dir.path(), "src/node_modules/lib/index.ts");

        assert_eq!(resolve_import(&from, "./globals.d.ts"), None);
        assert_eq!(resolve_import(&from, "./node_modules/lib"), None);
    }
}
