//! Project-level orchestration: discovery, binding, checking.

use crate::binder::{Binder, Classification};
use crate::cache::ClassificationCache;
use crate::checker::{check_derived_locations, Checker};
use crate::config::{ConfigError, KindScriptConfig, ProjectConfig};
use crate::contract::{Contract, ContractType};
use crate::plugins::{CheckContext, PluginRegistry};
use crate::provider::{
    resolve_symbol_files, AstViewProvider, DeclarationOwnership, FileResolver, ReferenceProvider,
};
use crate::types::CheckReport;
use serde::Serialize;
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

/// Everything a host environment supplies to a project run.
pub trait ProjectHost: AstViewProvider + ReferenceProvider + FileResolver {
    /// Lists source files according to `config`.
    fn source_files(&self, config: &ProjectConfig) -> Vec<String>;

    /// Modification time of a file, if known.
    fn modified(&self, file: &str) -> Option<SystemTime>;

    /// Declaration owners for files shared between members.
    fn declaration_ownership(&self) -> DeclarationOwnership {
        DeclarationOwnership::new()
    }
}

/// Errors that stop a project run.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Discovery found nothing to analyze.
    #[error("No TypeScript files found.")]
    NoSourceFiles,

    /// Binding produced no symbols.
    #[error("No Kind definitions found in the project.")]
    NoKindDefinitions,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result of checking a project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectReport {
    /// Recoverable binding problems.
    pub classification_errors: Vec<String>,
    /// Number of Instance symbols bound.
    pub instances: usize,
    /// Contract check outcome, including derived-location findings.
    #[serde(flatten)]
    pub report: CheckReport,
}

/// Runs the full pipeline and remembers the last classification.
pub struct Project {
    registry: PluginRegistry,
    cache: ClassificationCache<Classification>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(PluginRegistry::builtin())
    }
}

impl Project {
    /// Creates a project runner over `registry`.
    #[must_use]
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry,
            cache: ClassificationCache::new(),
        }
    }

    /// Returns the plugin registry.
    #[must_use]
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Drops the memoized classification.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Discovers, binds, and checks the project.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration, when no source files are
    /// found, or when no Kind definitions are found.
    pub fn check<H: ProjectHost>(
        &mut self,
        config: &KindScriptConfig,
        host: &H,
    ) -> Result<ProjectReport, ProjectError> {
        config.validate()?;

        let files = host.source_files(&config.project);
        if files.is_empty() {
            return Err(ProjectError::NoSourceFiles);
        }
        info!("Found {} source files", files.len());

        let key = ClassificationCache::<Classification>::fingerprint(
            files.iter().map(|f| (f.as_str(), host.modified(f))),
        );
        let registry = &self.registry;
        let classification = self.cache.get_or_compute(&key, || {
            let classification = Binder::new(registry).classify(&files, host);
            if classification.symbols.is_empty() {
                Err(ProjectError::NoKindDefinitions)
            } else {
                Ok(classification)
            }
        })?;

        let resolved = resolve_symbol_files(classification.symbols.iter().map(|s| &**s), host);
        let ownership = host.declaration_ownership();
        let ctx = CheckContext {
            resolved_files: &resolved,
            references: host,
            declaration_ownership: &ownership,
        };

        let contracts: Vec<Contract> = classification
            .contracts
            .iter()
            .filter(|c| {
                let enabled = config.is_contract_enabled(c.contract_type());
                if !enabled {
                    debug!(contract = %c.name(), "Skipping disabled contract");
                }
                enabled
            })
            .cloned()
            .collect();

        let checker = ContractType::ALL
            .into_iter()
            .filter_map(|t| config.contract_severity(t).map(|s| (t, s)))
            .fold(Checker::new(&self.registry), |checker, (t, s)| {
                checker.with_severity(t, s)
            });
        let mut report = checker.check(&contracts, &ctx);
        report.push_extra(check_derived_locations(&classification.symbols, host));

        info!(
            "Project check complete: {} violations, {} classification errors",
            report.violations_found,
            classification.errors.len()
        );

        Ok(ProjectReport {
            instances: classification.instances().count(),
            classification_errors: classification.errors,
            report,
        })
    }
}
