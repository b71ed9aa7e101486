//! Contract plugins.
//!
//! Each plugin owns one [`ContractType`]: it validates argument arity, turns
//! constraint-tree leaves into contracts, and checks those contracts against
//! the project. The [`PluginRegistry`] is the closed catalog of plugins and
//! guarantees that constraint names, contract types, and diagnostic codes
//! are unique.
//!
//! # Example
//!
//! ```
//! use kindscript_core::plugins::PluginRegistry;
//! use kindscript_core::ContractType;
//!
//! let registry = PluginRegistry::builtin();
//! let plugin = registry.by_constraint_name("noDependency").map(|p| p.contract_type());
//! assert_eq!(plugin, Some(ContractType::NoDependency));
//! ```

mod colocated;
pub(crate) mod exists;
pub mod generators;
mod must_implement;
mod mirrors;
mod no_cycles;
mod no_dependency;
mod purity;

pub use colocated::ColocatedPlugin;
pub use exists::ExistsPlugin;
pub use must_implement::MustImplementPlugin;
pub use mirrors::MirrorsPlugin;
pub use no_cycles::NoCyclesPlugin;
pub use no_dependency::NoDependencyPlugin;
pub use purity::PurityPlugin;

use crate::contract::{Contract, ContractType};
use crate::provider::{DeclarationOwnership, ReferenceProvider, ResolvedFiles};
use crate::symbol::SymbolRef;
use crate::types::{Diagnostic, DiagnosticCode};
use crate::views::TypeNodeView;
use std::collections::HashSet;

// ────────────────────────────────────────────
// Plugin traits
// ────────────────────────────────────────────

/// Everything a plugin may consult while checking a contract.
pub struct CheckContext<'a> {
    /// Files per carrier key.
    pub resolved_files: &'a ResolvedFiles,
    /// Per-file imports and declarations.
    pub references: &'a dyn ReferenceProvider,
    /// Declaration owners for files shared between members.
    pub declaration_ownership: &'a DeclarationOwnership,
}

/// Output of a single contract check.
#[derive(Debug, Default)]
pub struct CheckResult {
    /// Violations found.
    pub diagnostics: Vec<Diagnostic>,
    /// Files inspected.
    pub files_analyzed: usize,
}

/// Output of contract generation for one constraint leaf.
#[derive(Debug, Default)]
pub struct GeneratorResult {
    /// Generated contracts.
    pub contracts: Vec<Contract>,
    /// Classification errors (unresolved members and similar).
    pub errors: Vec<String>,
}

/// A constraint that is declared on a member's own Kind and applied to
/// every use of that member.
pub trait IntrinsicConstraint: Send + Sync {
    /// Whether the constraint is present on a Kind's constraint tree.
    fn detect(&self, constraints: &TypeNodeView) -> bool;

    /// Builds the contract anchored at the member symbol.
    fn propagate(&self, member: &SymbolRef, member_name: &str, location: &str) -> Contract;
}

/// A contract kind.
///
/// # Example
///
/// ```ignore
/// struct NoTests;
///
/// impl ContractPlugin for NoTests {
///     fn contract_type(&self) -> ContractType { ContractType::Exists }
///     fn constraint_name(&self) -> &'static str { "noTests" }
///     fn diagnostic_code(&self) -> DiagnosticCode { DiagnosticCode::LocationNotFound }
///     fn validate(&self, args: &[SymbolRef]) -> Result<(), String> { Ok(()) }
///     fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult {
///         CheckResult::default()
///     }
/// }
/// ```
pub trait ContractPlugin: Send + Sync {
    /// The contract type this plugin owns.
    fn contract_type(&self) -> ContractType;

    /// Dotted constraint name as written in Kind definitions.
    fn constraint_name(&self) -> &'static str;

    /// Code attached to this plugin's diagnostics.
    fn diagnostic_code(&self) -> DiagnosticCode;

    /// Returns a brief description of what this contract checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Suggested fix attached to diagnostics.
    fn help(&self) -> Option<&'static str> {
        None
    }

    /// Checks argument arity.
    ///
    /// # Errors
    ///
    /// Returns a message describing the expected arity.
    fn validate(&self, args: &[SymbolRef]) -> Result<(), String>;

    /// Turns a constraint value into contracts.
    ///
    /// Returns `None` when this plugin cannot generate contracts directly.
    fn generate(
        &self,
        _value: &TypeNodeView,
        _instance: &SymbolRef,
        _kind_name: &str,
        _location: &str,
    ) -> Option<GeneratorResult> {
        None
    }

    /// The intrinsic behavior, if this plugin propagates from member Kinds.
    fn intrinsic(&self) -> Option<&dyn IntrinsicConstraint> {
        None
    }

    /// Checks a validated contract.
    fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult;
}

/// Type alias for boxed plugin trait objects.
pub type PluginBox = Box<dyn ContractPlugin>;

// ────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────

/// Errors raised while assembling a registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two plugins share a constraint name.
    #[error("duplicate constraint name '{name}'")]
    DuplicateConstraintName {
        /// The repeated name.
        name: String,
    },

    /// Two plugins share a contract type.
    #[error("duplicate contract type '{contract_type}'")]
    DuplicateContractType {
        /// The repeated type.
        contract_type: ContractType,
    },

    /// Two plugins share a diagnostic code.
    #[error("duplicate diagnostic code {code}")]
    DuplicateDiagnosticCode {
        /// The repeated code.
        code: DiagnosticCode,
    },
}

/// The catalog of contract plugins.
pub struct PluginRegistry {
    plugins: Vec<PluginBox>,
}

impl PluginRegistry {
    /// Builds a registry, rejecting duplicate names, types, or codes.
    ///
    /// # Errors
    ///
    /// Returns the first uniqueness violation found.
    pub fn new(plugins: Vec<PluginBox>) -> Result<Self, RegistryError> {
        let mut names = HashSet::new();
        let mut types = HashSet::new();
        let mut codes = HashSet::new();

        for plugin in &plugins {
            if !names.insert(plugin.constraint_name()) {
                return Err(RegistryError::DuplicateConstraintName {
                    name: plugin.constraint_name().to_string(),
                });
            }
            if !types.insert(plugin.contract_type()) {
                return Err(RegistryError::DuplicateContractType {
                    contract_type: plugin.contract_type(),
                });
            }
            if !codes.insert(plugin.diagnostic_code()) {
                return Err(RegistryError::DuplicateDiagnosticCode {
                    code: plugin.diagnostic_code(),
                });
            }
        }

        Ok(Self { plugins })
    }

    /// The built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            plugins: builtin_plugins(),
        }
    }

    /// All plugins in registration order.
    #[must_use]
    pub fn plugins(&self) -> &[PluginBox] {
        &self.plugins
    }

    /// Looks a plugin up by dotted constraint name.
    #[must_use]
    pub fn by_constraint_name(&self, name: &str) -> Option<&dyn ContractPlugin> {
        self.plugins
            .iter()
            .find(|p| p.constraint_name() == name)
            .map(AsRef::as_ref)
    }

    /// Looks a plugin up by contract type.
    #[must_use]
    pub fn by_type(&self, contract_type: ContractType) -> Option<&dyn ContractPlugin> {
        self.plugins
            .iter()
            .find(|p| p.contract_type() == contract_type)
            .map(AsRef::as_ref)
    }

    /// Plugins that carry intrinsic behavior.
    pub fn intrinsics(&self) -> impl Iterator<Item = &dyn IntrinsicConstraint> {
        self.plugins.iter().filter_map(|p| p.intrinsic())
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_plugins() -> Vec<PluginBox> {
    vec![
        Box::new(NoDependencyPlugin),
        Box::new(NoCyclesPlugin),
        Box::new(PurityPlugin),
        Box::new(MustImplementPlugin),
        Box::new(MirrorsPlugin),
        Box::new(ExistsPlugin),
        Box::new(ColocatedPlugin),
    ]
}

pub(crate) fn arity_exact(
    args: &[SymbolRef],
    expected: usize,
    label: &str,
    roles: &str,
) -> Result<(), String> {
    if args.len() == expected {
        return Ok(());
    }
    let noun = if expected == 1 { "argument" } else { "arguments" };
    Err(format!(
        "{label} requires exactly {expected} {noun} ({roles}), got {}",
        args.len()
    ))
}

pub(crate) fn arity_at_least_one(args: &[SymbolRef], label: &str) -> Result<(), String> {
    if args.is_empty() {
        Err(format!("{label} requires at least 1 argument, got 0"))
    } else {
        Ok(())
    }
}
