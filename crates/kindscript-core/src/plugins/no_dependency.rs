//! `noDependency`: one scope must not depend on another.

use super::{arity_exact, generators, CheckContext, CheckResult, ContractPlugin, GeneratorResult};
use crate::contract::{Contract, ContractType};
use crate::symbol::SymbolRef;
use crate::types::{Diagnostic, DiagnosticCode, Location};
use crate::views::TypeNodeView;
use std::collections::HashSet;

/// Forbids imports (and shared-file declaration references) from `from`
/// into `to`.
pub struct NoDependencyPlugin;

impl ContractPlugin for NoDependencyPlugin {
    fn contract_type(&self) -> ContractType {
        ContractType::NoDependency
    }

    fn constraint_name(&self) -> &'static str {
        "noDependency"
    }

    fn diagnostic_code(&self) -> DiagnosticCode {
        DiagnosticCode::ForbiddenDependency
    }

    fn description(&self) -> &'static str {
        "Files in the first scope must not import files in the second"
    }

    fn validate(&self, args: &[SymbolRef]) -> Result<(), String> {
        arity_exact(args, 2, "noDependency", "from, to")
    }

    fn generate(
        &self,
        value: &TypeNodeView,
        instance: &SymbolRef,
        kind_name: &str,
        location: &str,
    ) -> Option<GeneratorResult> {
        Some(generators::from_tuple_pairs(
            value,
            instance,
            kind_name,
            location,
            ContractType::NoDependency,
            "noDependency",
        ))
    }

    fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult {
        let mut result = CheckResult::default();
        let [from, to] = contract.args() else {
            return result;
        };
        let (Some(from_key), Some(to_key)) = (from.carrier_key(), to.carrier_key()) else {
            return result;
        };

        let from_files = ctx.resolved_files.get(from_key);
        let to_files: HashSet<&str> = ctx
            .resolved_files
            .get(to_key)
            .iter()
            .map(String::as_str)
            .collect();

        for file in from_files {
            for edge in ctx.references.imports(file) {
                if to_files.contains(edge.target_file.as_str()) {
                    result.diagnostics.push(
                        Diagnostic::at(
                            self.diagnostic_code(),
                            Location::new(&edge.source_file, edge.line, edge.column),
                            format!(
                                "Forbidden dependency: {} → {} ({} → {})",
                                from.name(),
                                to.name(),
                                edge.source_file,
                                edge.target_file
                            ),
                        )
                        .with_contract(contract.to_reference()),
                    );
                }
            }
        }

        // Members co-located in one file: only declaration references can
        // reveal the dependency.
        for file in from_files.iter().filter(|f| to_files.contains(f.as_str())) {
            let Some(owners) = ctx.declaration_ownership.get(file) else {
                continue;
            };
            for edge in ctx.references.intra_file_references(file) {
                let from_owner = owners.get(&edge.from_declaration).map(String::as_str);
                let to_owner = owners.get(&edge.to_declaration).map(String::as_str);
                if from_owner == Some(from_key) && to_owner == Some(to_key) {
                    result.diagnostics.push(
                        Diagnostic::at(
                            self.diagnostic_code(),
                            Location::new(file, edge.line, edge.column),
                            format!(
                                "Forbidden dependency: {} → {} ({} → {})",
                                from.name(),
                                to.name(),
                                edge.from_declaration,
                                edge.to_declaration
                            ),
                        )
                        .with_contract(contract.to_reference()),
                    );
                }
            }
        }

        result.files_analyzed = from_files.len();
        result
    }
}
