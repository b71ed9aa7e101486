//! Collaborator interfaces implemented by the host environment.

use crate::symbol::ArchSymbol;
use crate::views::{
    Extracted, ImportEdge, InstanceDeclarationView, IntraFileReference, KindDefinitionView,
    ModuleSpecifier,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Supplies Kind and Instance views for a source file.
pub trait AstViewProvider {
    /// Kind definitions declared in `file`.
    fn kind_definitions(&self, file: &str) -> Extracted<KindDefinitionView>;

    /// Instance declarations in `file`.
    fn instance_declarations(&self, file: &str) -> Extracted<InstanceDeclarationView>;
}

/// Supplies per-file dependency facts to contract checks.
pub trait ReferenceProvider {
    /// Imports whose target resolved to a project file.
    fn imports(&self, file: &str) -> Vec<ImportEdge>;

    /// References between top-level declarations of `file`.
    fn intra_file_references(&self, file: &str) -> Vec<IntraFileReference>;

    /// Raw module specifiers of every import and re-export.
    fn module_specifiers(&self, file: &str) -> Vec<ModuleSpecifier>;

    /// Names of interfaces exported from `file`.
    fn exported_interfaces(&self, file: &str) -> Vec<String>;

    /// Interface names that classes in `file` declare in `implements`.
    fn implemented_interfaces(&self, file: &str) -> Vec<String>;
}

/// Maps declared locations to files on disk.
pub trait FileResolver {
    /// Files belonging to `location`: a directory lists its sources
    /// recursively, a file yields itself, anything else yields nothing.
    fn resolve(&self, location: &str) -> Vec<String>;

    /// Whether `location` exists at all.
    fn exists(&self, location: &str) -> bool;
}

/// Resolved file lists keyed by carrier key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFiles {
    files: HashMap<String, Vec<String>>,
}

impl ResolvedFiles {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the files for a carrier key.
    pub fn insert(&mut self, key: impl Into<String>, files: Vec<String>) {
        self.files.insert(key.into(), files);
    }

    /// Files recorded under `key`, or an empty slice.
    #[must_use]
    pub fn get(&self, key: &str) -> &[String] {
        self.files.get(key).map_or(&[], Vec::as_slice)
    }

    /// Files belonging to `symbol`'s carrier.
    #[must_use]
    pub fn files_for(&self, symbol: &ArchSymbol) -> &[String] {
        symbol.carrier_key().map_or(&[], |key| self.get(key))
    }

    /// Whether `key` has been resolved.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.files.contains_key(key)
    }

    /// Number of resolved keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for ResolvedFiles {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Declaration owner per file: `file -> declaration -> carrier key`.
///
/// Used when two members share one file and only declaration-level
/// references can show a forbidden dependency between them.
pub type DeclarationOwnership = HashMap<String, HashMap<String, String>>;

/// Resolves files for every carried symbol and all of its descendants.
///
/// Each symbol keeps only the files not claimed by its members, at any
/// depth, so a file is attributed to its narrowest declared scope.
#[must_use]
pub fn resolve_symbol_files<'a>(
    symbols: impl IntoIterator<Item = &'a ArchSymbol>,
    resolver: &dyn FileResolver,
) -> ResolvedFiles {
    let mut resolved = ResolvedFiles::new();
    for symbol in symbols {
        resolve_into(symbol, resolver, &mut resolved);
    }
    debug!(scopes = resolved.len(), "resolved symbol files");
    resolved
}

fn resolve_into(symbol: &ArchSymbol, resolver: &dyn FileResolver, out: &mut ResolvedFiles) {
    if let Some(key) = symbol.carrier_key() {
        if !out.contains(key) {
            let claimed = claimed_by_members(symbol, resolver);
            let own: Vec<String> = resolver
                .resolve(key)
                .into_iter()
                .filter(|f| !claimed.contains(f))
                .collect();
            out.insert(key, own);
        }
    }
    for member in symbol.members() {
        resolve_into(member, resolver, out);
    }
}

fn claimed_by_members(symbol: &ArchSymbol, resolver: &dyn FileResolver) -> HashSet<String> {
    let mut claimed = HashSet::new();
    for member in symbol.descendants() {
        if let Some(key) = member.carrier_key() {
            claimed.extend(resolver.resolve(key));
        }
    }
    claimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Carrier, SymbolKind};

    struct Listing(Vec<&'static str>);

    impl FileResolver for Listing {
        fn resolve(&self, location: &str) -> Vec<String> {
            self.0
                .iter()
                .filter(|f| crate::utils::paths::is_within_scope(f, location))
                .map(|f| (*f).to_string())
                .collect()
        }

        fn exists(&self, location: &str) -> bool {
            !self.resolve(location).is_empty()
        }
    }

    #[test]
    fn members_claim_their_files() {
        let domain = ArchSymbol::new("domain", SymbolKind::Member)
            .with_carrier(Carrier::path("/s/domain"))
            .with_member(
                ArchSymbol::new("ordering", SymbolKind::Member)
                    .with_carrier(Carrier::path("/s/domain/ordering")),
            );
        let app = ArchSymbol::new("app", SymbolKind::Instance)
            .with_carrier(Carrier::path("/s"))
            .with_member(domain);
        let fs = Listing(vec![
            "/s/arch.ts",
            "/s/domain/entity.ts",
            "/s/domain/ordering/order.ts",
        ]);

        let resolved = resolve_symbol_files([&app], &fs);
        assert_eq!(resolved.get("/s"), ["/s/arch.ts".to_string()]);
        assert_eq!(resolved.get("/s/domain"), ["/s/domain/entity.ts".to_string()]);
        assert_eq!(
            resolved.get("/s/domain/ordering"),
            ["/s/domain/ordering/order.ts".to_string()]
        );
    }

    #[test]
    fn missing_key_yields_empty_slice() {
        let resolved = ResolvedFiles::new();
        assert!(resolved.get("/nowhere").is_empty());
        let kind = ArchSymbol::new("K", SymbolKind::Kind);
        assert!(resolved.files_for(&kind).is_empty());
    }
}
