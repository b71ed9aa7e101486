//! # kindscript-core
//!
//! Core engine for architecture contracts declared as types.
//!
//! A project declares *Kinds* (the shape and constraints of an
//! architectural entity) and *Instances* (a Kind anchored at a directory).
//! This crate turns those declarations into symbols and contracts and checks
//! the contracts against the project's real import graph:
//!
//! - [`Binder`] classifies Kind and Instance views into [`ArchSymbol`] trees
//!   and [`Contract`]s
//! - [`OwnershipTree`] infers containment among Instances from their scopes
//! - [`PluginRegistry`] is the closed catalog of contract plugins
//! - [`Checker`] validates and dispatches contracts, producing
//!   [`Diagnostic`]s
//! - [`Project`] sequences discovery, binding, and checking behind a
//!   fingerprint cache
//!
//! Source parsing is not part of this crate. A host implements
//! [`AstViewProvider`], [`ReferenceProvider`], and [`FileResolver`].
//!
//! ## Example
//!
//! ```ignore
//! use kindscript_core::{KindScriptConfig, Project};
//!
//! let mut project = Project::default();
//! let outcome = project.check(&KindScriptConfig::default(), &host)?;
//! for diagnostic in &outcome.report.diagnostics {
//!     eprintln!("{}", diagnostic.format());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod binder;
mod cache;
mod checker;
mod config;
mod contract;
mod ownership;
mod project;
mod provider;
mod symbol;
mod types;
mod views;

/// Contract plugins and their registry.
pub mod plugins;

/// Path, graph, and runtime-module helpers.
pub mod utils;

pub use binder::{Binder, Classification};
pub use cache::ClassificationCache;
pub use checker::{check_derived_locations, Checker};
pub use config::{ConfigError, ContractConfig, KindScriptConfig, ProjectConfig, CONFIG_FILE_NAME};
pub use contract::{Contract, ContractRef, ContractType};
pub use ownership::{NodeId, OwnershipNode, OwnershipTree};
pub use plugins::{CheckContext, CheckResult, ContractPlugin, PluginRegistry, RegistryError};
pub use project::{Project, ProjectError, ProjectHost, ProjectReport};
pub use provider::{
    resolve_symbol_files, AstViewProvider, DeclarationOwnership, FileResolver, ReferenceProvider,
    ResolvedFiles,
};
pub use symbol::{ArchSymbol, Carrier, SymbolKind, SymbolRef};
pub use types::{CheckReport, Diagnostic, DiagnosticCode, Location, Severity};
pub use views::{
    Extracted, ImportEdge, InstanceDeclarationView, IntraFileReference, KindDefinitionView,
    MemberDescriptor, MemberValueView, ModuleSpecifier, PropertyView, TypeNodeView,
};
