//! `noCycles`: no import cycles among a set of scopes.

use super::{
    arity_at_least_one, generators, CheckContext, CheckResult, ContractPlugin, GeneratorResult,
};
use crate::contract::{Contract, ContractType};
use crate::symbol::SymbolRef;
use crate::types::{Diagnostic, DiagnosticCode};
use crate::utils::graph::{find_cycles, Graph};
use crate::utils::paths::is_file_in_symbol;
use crate::views::TypeNodeView;

/// Reports every cycle in the scope-level import graph.
pub struct NoCyclesPlugin;

impl NoCyclesPlugin {
    fn build_graph(contract: &Contract, ctx: &CheckContext<'_>) -> (Graph, usize) {
        let symbols = contract.args();
        let mut graph = Graph::new();
        let mut files_analyzed = 0;

        for symbol in symbols {
            graph.entry(symbol.name().to_string()).or_default();
        }

        for symbol in symbols {
            let files = ctx.resolved_files.files_for(symbol);
            files_analyzed += files.len();

            for file in files {
                for edge in ctx.references.imports(file) {
                    for target in symbols {
                        if target.name() == symbol.name() {
                            continue;
                        }
                        let Some(target_location) = target.carrier_key() else {
                            continue;
                        };
                        let target_files = ctx.resolved_files.files_for(target);
                        if is_file_in_symbol(&edge.target_file, target_location, Some(target_files)) {
                            graph
                                .entry(symbol.name().to_string())
                                .or_default()
                                .insert(target.name().to_string());
                        }
                    }
                }
            }
        }

        (graph, files_analyzed)
    }
}

impl ContractPlugin for NoCyclesPlugin {
    fn contract_type(&self) -> ContractType {
        ContractType::NoCycles
    }

    fn constraint_name(&self) -> &'static str {
        "noCycles"
    }

    fn diagnostic_code(&self) -> DiagnosticCode {
        DiagnosticCode::CircularDependency
    }

    fn description(&self) -> &'static str {
        "The listed scopes must not import each other in a loop"
    }

    fn validate(&self, args: &[SymbolRef]) -> Result<(), String> {
        arity_at_least_one(args, "noCycles")
    }

    fn generate(
        &self,
        value: &TypeNodeView,
        instance: &SymbolRef,
        kind_name: &str,
        location: &str,
    ) -> Option<GeneratorResult> {
        Some(generators::from_string_list(
            value,
            instance,
            kind_name,
            location,
            ContractType::NoCycles,
            "noCycles",
        ))
    }

    fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult {
        let (graph, files_analyzed) = Self::build_graph(contract, ctx);

        let diagnostics = find_cycles(&graph)
            .into_iter()
            .filter_map(|cycle| {
                let first = cycle.first()?.clone();
                let path = format!("{} → {first}", cycle.join(" → "));
                Some(
                    Diagnostic::structural(
                        self.diagnostic_code(),
                        first,
                        format!("Circular dependency detected: {path}"),
                    )
                    .with_contract(contract.to_reference()),
                )
            })
            .collect();

        CheckResult {
            diagnostics,
            files_analyzed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::test_support::{sym, FakeRefs};
    use crate::provider::{DeclarationOwnership, ResolvedFiles};

    fn resolved() -> ResolvedFiles {
        ["a", "b", "c"]
            .into_iter()
            .map(|n| (format!("/s/{n}"), vec![format!("/s/{n}/index.ts")]))
            .collect()
    }

    fn contract() -> Contract {
        Contract::new(
            ContractType::NoCycles,
            "noCycles(a, b, c)",
            vec![sym("a", "/s/a"), sym("b", "/s/b"), sym("c", "/s/c")],
        )
    }

    #[test]
    fn three_scope_cycle_is_reported() {
        let refs = FakeRefs::default()
            .import("/s/a/index.ts", "/s/b/index.ts", 1, 1)
            .import("/s/b/index.ts", "/s/c/index.ts", 1, 1)
            .import("/s/c/index.ts", "/s/a/index.ts", 1, 1);
        let files = resolved();
        let ownership = DeclarationOwnership::new();
        let ctx = CheckContext {
            resolved_files: &files,
            references: &refs,
            declaration_ownership: &ownership,
        };

        let result = NoCyclesPlugin.check(&contract(), &ctx);
        assert_eq!(result.files_analyzed, 3);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].message,
            "Circular dependency detected: a → b → c → a"
        );
        assert_eq!(result.diagnostics[0].scope.as_deref(), Some("a"));
    }

    #[test]
    fn acyclic_chain_is_clean() {
        let refs = FakeRefs::default()
            .import("/s/a/index.ts", "/s/b/index.ts", 1, 1)
            .import("/s/b/index.ts", "/s/c/index.ts", 1, 1);
        let files = resolved();
        let ownership = DeclarationOwnership::new();
        let ctx = CheckContext {
            resolved_files: &files,
            references: &refs,
            declaration_ownership: &ownership,
        };
        assert!(NoCyclesPlugin.check(&contract(), &ctx).diagnostics.is_empty());
    }

    #[test]
    fn arity_requires_at_least_one() {
        assert!(NoCyclesPlugin.validate(&[]).is_err());
        let a = sym("a", "/a");
        assert!(NoCyclesPlugin.validate(&[a.clone()]).is_ok());
        assert!(NoCyclesPlugin.validate(&vec![a; 5]).is_ok());
    }
}
