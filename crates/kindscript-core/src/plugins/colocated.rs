//! `colocated`: basename-keyed counterpart check.

use super::{arity_exact, generators, CheckContext, CheckResult, ContractPlugin, GeneratorResult};
use crate::contract::{Contract, ContractType};
use crate::symbol::SymbolRef;
use crate::types::{Diagnostic, DiagnosticCode, Location};
use crate::utils::paths::basename;
use crate::views::TypeNodeView;
use std::collections::HashSet;

/// Like [`MirrorsPlugin`](super::MirrorsPlugin), but only file names must
/// match, not their relative paths.
pub struct ColocatedPlugin;

impl ContractPlugin for ColocatedPlugin {
    fn contract_type(&self) -> ContractType {
        ContractType::Colocated
    }

    fn constraint_name(&self) -> &'static str {
        "colocated"
    }

    fn diagnostic_code(&self) -> DiagnosticCode {
        DiagnosticCode::ColocationMismatch
    }

    fn description(&self) -> &'static str {
        "Every file in the first scope has a same-named file in the second"
    }

    fn validate(&self, args: &[SymbolRef]) -> Result<(), String> {
        arity_exact(args, 2, "colocated", "primary, related")
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
            ContractType::Colocated,
            "colocated",
        ))
    }

    fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult {
        let mut result = CheckResult::default();
        let [primary, related] = contract.args() else {
            return result;
        };
        let Some(related_location) = related.carrier_key() else {
            return result;
        };

        let primary_files = ctx.resolved_files.files_for(primary);
        let related_names: HashSet<&str> = ctx
            .resolved_files
            .get(related_location)
            .iter()
            .map(|f| basename(f))
            .collect();

        for file in primary_files {
            let name = basename(file);
            if !related_names.contains(name) {
                result.diagnostics.push(
                    Diagnostic::at(
                        self.diagnostic_code(),
                        Location::new(file, 0, 0),
                        format!(
                            "File '{file}' has no colocated counterpart named '{name}' in '{related_location}'"
                        ),
                    )
                    .with_contract(contract.to_reference()),
                );
            }
        }

        result.files_analyzed = primary_files.len();
        result
    }
}
