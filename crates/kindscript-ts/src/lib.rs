//! # kindscript-ts
//!
//! Tree-sitter based TypeScript host for KindScript.
//!
//! Implements the `kindscript-core` host interfaces for a project on disk:
//!
//! - [`TypeScriptExtractor`] reads Kind aliases, `satisfies InstanceConfig`
//!   declarations, imports, and top-level declarations from a source file
//! - [`TsHost`] caches per-file facts and serves them to the binder and
//!   contract plugins
//! - [`FsFileResolver`] maps member locations to source files
//! - [`discover_sources`] lists a project's sources honoring `.gitignore`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod discovery;
pub mod error;
pub mod extractor;
pub mod host;
pub mod resolver;
pub mod typescript;

pub use discovery::discover_sources;
pub use error::HostError;
pub use extractor::{RawImport, SourceFacts};
pub use host::TsHost;
pub use resolver::{resolve_import, FsFileResolver};
pub use typescript::TypeScriptExtractor;
