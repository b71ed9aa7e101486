//! [`TsHost`]: the project host backed by the file system and Tree-sitter.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;
use tracing::{debug, warn};

use kindscript_core::{
    AstViewProvider, Extracted, FileResolver, ImportEdge, InstanceDeclarationView,
    IntraFileReference, KindDefinitionView, ModuleSpecifier, ProjectConfig, ProjectHost,
    ReferenceProvider,
};

use crate::discovery::discover_sources;
use crate::error::HostError;
use crate::extractor::SourceFacts;
use crate::resolver::{resolve_import, FsFileResolver};
use crate::typescript::TypeScriptExtractor;

struct CachedFacts {
    modified: Option<SystemTime>,
    facts: Rc<SourceFacts>,
}

/// Serves every host interface for a TypeScript project on disk.
///
/// Each file is parsed at most once per modification time; all provider
/// calls for that file share the same [`SourceFacts`].
pub struct TsHost {
    project_dir: PathBuf,
    extractor: TypeScriptExtractor,
    resolver: FsFileResolver,
    facts: RefCell<HashMap<String, CachedFacts>>,
}

impl TsHost {
    /// Creates a host rooted at `project_dir`.
    #[must_use]
    pub fn new(project_dir: &Path) -> Self {
        let project_dir = project_dir
            .canonicalize()
            .unwrap_or_else(|_| project_dir.to_path_buf());
        Self {
            project_dir,
            extractor: TypeScriptExtractor::new(),
            resolver: FsFileResolver::default(),
            facts: RefCell::new(HashMap::new()),
        }
    }

    /// Uses `extensions` when resolving member directories.
    #[must_use]
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.resolver = FsFileResolver::new(extensions);
        self
    }

    /// The project directory, canonicalized when possible.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Returns the facts for `file`, parsing it if needed.
    pub fn facts(&self, file: &str) -> Rc<SourceFacts> {
        let modified = self.modified(file);
        if let Some(cached) = self.facts.borrow().get(file) {
            if cached.modified == modified {
                return Rc::clone(&cached.facts);
            }
        }

        let facts = Rc::new(self.load(file));
        self.facts.borrow_mut().insert(
            file.to_string(),
            CachedFacts {
                modified,
                facts: Rc::clone(&facts),
            },
        );
        facts
    }

    fn load(&self, file: &str) -> SourceFacts {
        debug!("Parsing {file}");
        let result = std::fs::read_to_string(file)
            .map_err(|source| HostError::Io {
                path: PathBuf::from(file),
                source,
            })
            .and_then(|source| self.extractor.analyze(file, &source));

        result.unwrap_or_else(|e| {
            warn!("{e}");
            SourceFacts::unreadable(e.to_string())
        })
    }
}

impl AstViewProvider for TsHost {
    fn kind_definitions(&self, file: &str) -> Extracted<KindDefinitionView> {
        self.facts(file).kinds.clone()
    }

    fn instance_declarations(&self, file: &str) -> Extracted<InstanceDeclarationView> {
        self.facts(file).instances.clone()
    }
}

impl ReferenceProvider for TsHost {
    fn imports(&self, file: &str) -> Vec<ImportEdge> {
        self.facts(file)
            .imports
            .iter()
            .filter_map(|import| {
                let target = resolve_import(file, &import.specifier)?;
                Some(ImportEdge {
                    source_file: file.to_string(),
                    target_file: target,
                    line: import.line,
                    column: import.column,
                    import_path: import.specifier.clone(),
                })
            })
            .collect()
    }

    fn intra_file_references(&self, file: &str) -> Vec<IntraFileReference> {
        self.facts(file).references.clone()
    }

    fn module_specifiers(&self, file: &str) -> Vec<ModuleSpecifier> {
        self.facts(file)
            .imports
            .iter()
            .map(|import| ModuleSpecifier {
                module_name: import.specifier.clone(),
                line: import.line,
                column: import.column,
            })
            .collect()
    }

    fn exported_interfaces(&self, file: &str) -> Vec<String> {
        self.facts(file).exported_interfaces.clone()
    }

    fn implemented_interfaces(&self, file: &str) -> Vec<String> {
        self.facts(file).implemented_interfaces.clone()
    }
}

impl FileResolver for TsHost {
    fn resolve(&self, location: &str) -> Vec<String> {
        self.resolver.resolve(location)
    }

    fn exists(&self, location: &str) -> bool {
        self.resolver.exists(location)
    }
}

impl ProjectHost for TsHost {
    fn source_files(&self, config: &ProjectConfig) -> Vec<String> {
        discover_sources(&self.project_dir, config)
    }

    fn modified(&self, file: &str) -> Option<SystemTime> {
        std::fs::metadata(file).and_then(|m| m.modified()).ok()
    }
}
