//! Contract dispatch and the derived-location pass.

use crate::contract::{Contract, ContractType};
use crate::plugins::exists::location_not_found;
use crate::plugins::{CheckContext, PluginRegistry};
use crate::provider::FileResolver;
use crate::symbol::SymbolRef;
use crate::types::{CheckReport, Diagnostic, DiagnosticCode, Location, Severity};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Runs contracts against a resolved project view.
pub struct Checker<'r> {
    registry: &'r PluginRegistry,
    severities: HashMap<ContractType, Severity>,
}

impl<'r> Checker<'r> {
    /// Creates a checker that dispatches through `registry`.
    #[must_use]
    pub fn new(registry: &'r PluginRegistry) -> Self {
        Self {
            registry,
            severities: HashMap::new(),
        }
    }

    /// Overrides the severity of every diagnostic from one contract type.
    #[must_use]
    pub fn with_severity(mut self, contract_type: ContractType, severity: Severity) -> Self {
        self.severities.insert(contract_type, severity);
        self
    }

    /// Validates and checks each contract in order.
    ///
    /// A contract that fails validation yields one invalid-contract
    /// diagnostic and is not checked.
    #[must_use]
    pub fn check(&self, contracts: &[Contract], ctx: &CheckContext<'_>) -> CheckReport {
        let mut report = CheckReport::new();

        for contract in contracts {
            report.contracts_checked += 1;

            let Some(plugin) = self.registry.by_type(contract.contract_type()) else {
                warn!(contract = %contract.name(), "no plugin registered for contract type");
                continue;
            };

            if let Err(err) = plugin.validate(contract.args()) {
                debug!(contract = %contract.name(), error = %err, "invalid contract");
                report.diagnostics.push(
                    Diagnostic::at(
                        DiagnosticCode::InvalidContract,
                        Location::new(contract.location().unwrap_or("<config>"), 0, 0),
                        format!("Invalid contract '{}': {err}", contract.name()),
                    )
                    .with_contract(contract.to_reference()),
                );
                continue;
            }

            let result = plugin.check(contract, ctx);
            debug!(
                contract = %contract.name(),
                violations = result.diagnostics.len(),
                files = result.files_analyzed,
                "checked contract"
            );

            let severity = self.severities.get(&contract.contract_type()).copied();
            report.files_analyzed += result.files_analyzed;
            report
                .diagnostics
                .extend(result.diagnostics.into_iter().map(|mut d| {
                    if d.help.is_none() {
                        d.help = plugin.help().map(str::to_string);
                    }
                    if let Some(severity) = severity {
                        d.severity = severity;
                    }
                    d
                }));
        }

        report.violations_found = report.diagnostics.len();
        info!(
            contracts = report.contracts_checked,
            violations = report.violations_found,
            files = report.files_analyzed,
            "contract check complete"
        );
        report
    }
}

/// Reports every derived member location that does not exist.
///
/// Derived locations are never declared explicitly, so they get their own
/// existence pass independent of any `filesystem.exists` contract.
#[must_use]
pub fn check_derived_locations(symbols: &[SymbolRef], resolver: &dyn FileResolver) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for symbol in symbols {
        for member in symbol.descendants() {
            if !member.is_location_derived() {
                continue;
            }
            let Some(location) = member.carrier_key() else {
                continue;
            };
            if !resolver.exists(location) {
                diagnostics.push(
                    Diagnostic::structural(
                        DiagnosticCode::LocationNotFound,
                        member.name(),
                        location_not_found(member, location),
                    )
                    .with_help("Create the directory or correct the member name"),
                );
            }
        }
    }
    debug!(missing = diagnostics.len(), "derived location check complete");
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::{sym, FakeRefs};
    use crate::provider::{DeclarationOwnership, ResolvedFiles};
    use crate::symbol::{ArchSymbol, Carrier, SymbolKind};
    use std::collections::HashSet;
    use std::sync::Arc;

    struct Dirs(HashSet<String>);

    impl FileResolver for Dirs {
        fn resolve(&self, _location: &str) -> Vec<String> {
            Vec::new()
        }

        fn exists(&self, location: &str) -> bool {
            self.0.contains(location)
        }
    }

    fn layered_files() -> ResolvedFiles {
        [
            ("/p/domain".to_string(), vec!["/p/domain/order.ts".to_string()]),
            ("/p/infra".to_string(), vec!["/p/infra/db.ts".to_string()]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn invalid_contract_is_not_checked() {
        let registry = PluginRegistry::builtin();
        let files = layered_files();
        let refs = FakeRefs::default().import("/p/domain/order.ts", "/p/infra/db.ts", 3, 1);
        let ownership = DeclarationOwnership::new();
        let ctx = CheckContext {
            resolved_files: &files,
            references: &refs,
            declaration_ownership: &ownership,
        };
        let contracts = vec![
            Contract::new(
                ContractType::NoDependency,
                "noDependency(domain)",
                vec![sym("domain", "/p/domain")],
            )
            .with_location("type:Clean"),
            Contract::new(ContractType::NoCycles, "noCycles()", vec![]),
        ];

        let report = Checker::new(&registry).check(&contracts, &ctx);
        assert_eq!(report.contracts_checked, 2);
        assert_eq!(report.violations_found, 2);
        assert!(report
            .diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::InvalidContract));
        assert_eq!(
            report.diagnostics[0].message,
            "Invalid contract 'noDependency(domain)': noDependency requires exactly 2 arguments (from, to), got 1"
        );
        assert_eq!(
            report.diagnostics[0].location.as_ref().map(|l| l.file.as_str()),
            Some("type:Clean")
        );
        assert_eq!(
            report.diagnostics[1].location.as_ref().map(|l| l.file.as_str()),
            Some("<config>")
        );
        assert_eq!(report.files_analyzed, 0);
    }

    #[test]
    fn valid_contracts_sum_files_and_diagnostics() {
        let registry = PluginRegistry::builtin();
        let files = layered_files();
        let refs = FakeRefs::default().import("/p/domain/order.ts", "/p/infra/db.ts", 3, 1);
        let ownership = DeclarationOwnership::new();
        let ctx = CheckContext {
            resolved_files: &files,
            references: &refs,
            declaration_ownership: &ownership,
        };
        let domain = sym("domain", "/p/domain");
        let infra = sym("infra", "/p/infra");
        let contracts = vec![
            Contract::new(
                ContractType::NoDependency,
                "noDependency(domain -> infra)",
                vec![domain.clone(), infra.clone()],
            ),
            Contract::new(
                ContractType::NoDependency,
                "noDependency(infra -> domain)",
                vec![infra, domain],
            ),
        ];

        let report = Checker::new(&registry).check(&contracts, &ctx);
        assert_eq!(report.contracts_checked, 2);
        assert_eq!(report.violations_found, 1);
        assert_eq!(report.files_analyzed, 2);
        assert_eq!(report.diagnostics[0].code, DiagnosticCode::ForbiddenDependency);
    }

    #[test]
    fn severity_override_and_plugin_help_are_applied() {
        let registry = PluginRegistry::builtin();
        let files: ResolvedFiles = [("/p/domain".to_string(), vec!["/p/domain/io.ts".to_string()])]
            .into_iter()
            .collect();
        let refs = FakeRefs::default().specifier("/p/domain/io.ts", "node:fs", 1);
        let ownership = DeclarationOwnership::new();
        let ctx = CheckContext {
            resolved_files: &files,
            references: &refs,
            declaration_ownership: &ownership,
        };
        let contracts = vec![Contract::new(
            ContractType::Purity,
            "purity(domain)",
            vec![sym("domain", "/p/domain")],
        )];

        let report = Checker::new(&registry)
            .with_severity(ContractType::Purity, Severity::Warning)
            .check(&contracts, &ctx);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].severity, Severity::Warning);
        assert!(report.diagnostics[0].help.is_some());
        assert!(!report.has_errors());
    }

    #[test]
    fn derived_locations_are_checked_recursively() {
        let nested = ArchSymbol::new("ordering", SymbolKind::Member)
            .with_carrier(Carrier::path("/p/domain/ordering"))
            .with_kind_type_name("Context")
            .location_derived(true);
        let domain = ArchSymbol::new("domain", SymbolKind::Member)
            .with_carrier(Carrier::path("/p/domain"))
            .location_derived(true)
            .with_member(nested);
        let explicit = ArchSymbol::new("explicit", SymbolKind::Member)
            .with_carrier(Carrier::path("/p/missing"));
        let app: SymbolRef = Arc::new(
            ArchSymbol::new("app", SymbolKind::Instance)
                .with_carrier(Carrier::path("/p"))
                .with_member(domain)
                .with_member(explicit),
        );

        let resolver = Dirs(["/p".to_string(), "/p/domain".to_string()].into_iter().collect());
        let diagnostics = check_derived_locations(&[app], &resolver);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::LocationNotFound);
        assert_eq!(
            diagnostics[0].message,
            "Location '/p/domain/ordering' for 'ordering' not found (Kind: Context)"
        );
    }
}
