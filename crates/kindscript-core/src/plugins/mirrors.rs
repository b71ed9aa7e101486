//! `filesystem.mirrors`: parallel directory trees.

use super::{arity_exact, generators, CheckContext, CheckResult, ContractPlugin, GeneratorResult};
use crate::contract::{Contract, ContractType};
use crate::symbol::SymbolRef;
use crate::types::{Diagnostic, DiagnosticCode, Location};
use crate::utils::paths::relative_path;
use crate::views::TypeNodeView;
use std::collections::HashSet;

/// Requires a file at the same relative path under `related` for every file
/// under `primary`.
pub struct MirrorsPlugin;

impl ContractPlugin for MirrorsPlugin {
    fn contract_type(&self) -> ContractType {
        ContractType::Mirrors
    }

    fn constraint_name(&self) -> &'static str {
        "filesystem.mirrors"
    }

    fn diagnostic_code(&self) -> DiagnosticCode {
        DiagnosticCode::MirrorMismatch
    }

    fn description(&self) -> &'static str {
        "Every file in the first scope has a counterpart at the same relative path in the second"
    }

    fn validate(&self, args: &[SymbolRef]) -> Result<(), String> {
        arity_exact(args, 2, "mirrors", "primary, related")
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
            ContractType::Mirrors,
            "filesystem.mirrors",
        ))
    }

    fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult {
        let mut result = CheckResult::default();
        let [primary, related] = contract.args() else {
            return result;
        };
        let (Some(primary_location), Some(related_location)) =
            (primary.carrier_key(), related.carrier_key())
        else {
            return result;
        };

        let primary_files = ctx.resolved_files.get(primary_location);
        let related_rel: HashSet<String> = ctx
            .resolved_files
            .get(related_location)
            .iter()
            .map(|f| relative_path(related_location, f))
            .collect();

        for file in primary_files {
            let rel = relative_path(primary_location, file);
            if !related_rel.contains(&rel) {
                result.diagnostics.push(
                    Diagnostic::at(
                        self.diagnostic_code(),
                        Location::new(file, 0, 0),
                        format!("File '{file}' has no counterpart at '{related_location}/{rel}'"),
                    )
                    .with_contract(contract.to_reference()),
                );
            }
        }

        result.files_analyzed = primary_files.len();
        result
    }
}
