//! Per-file facts extracted from a TypeScript syntax tree.
//!
//! [`SourceFacts`] is the intermediate form between the tree-sitter walk in
//! [`crate::typescript`] and the provider traits of `kindscript-core`. Import
//! specifiers stay unresolved here; [`crate::host::TsHost`] resolves them
//! against the file system.

use kindscript_core::{Extracted, InstanceDeclarationView, IntraFileReference, KindDefinitionView};

/// An `import ... from "x"` or `export ... from "x"` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
    /// Specifier as written, without quotes.
    pub specifier: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
}

/// Everything the host needs from one source file.
#[derive(Debug, Clone, Default)]
pub struct SourceFacts {
    /// `type X = Kind<...>` aliases.
    pub kinds: Extracted<KindDefinitionView>,
    /// `... satisfies InstanceConfig<X>` declarations.
    pub instances: Extracted<InstanceDeclarationView>,
    /// Import and re-export statements in source order.
    pub imports: Vec<RawImport>,
    /// References between top-level declarations of this file.
    pub references: Vec<IntraFileReference>,
    /// Names of exported interfaces.
    pub exported_interfaces: Vec<String>,
    /// Interface names listed in `implements` clauses.
    pub implemented_interfaces: Vec<String>,
}

impl SourceFacts {
    /// Facts for a file that could not be read or parsed.
    #[must_use]
    pub fn unreadable(message: impl Into<String>) -> Self {
        Self {
            kinds: Extracted {
                items: Vec::new(),
                errors: vec![message.into()],
            },
            ..Self::default()
        }
    }
}
