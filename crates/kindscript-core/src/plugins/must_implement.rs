//! `mustImplement`: every port interface needs an adapter class.

use super::{arity_exact, generators, CheckContext, CheckResult, ContractPlugin, GeneratorResult};
use crate::contract::{Contract, ContractType};
use crate::symbol::SymbolRef;
use crate::types::{Diagnostic, DiagnosticCode};
use crate::views::TypeNodeView;
use std::collections::HashSet;

/// Requires a class in `adapters` implementing each interface exported
/// from `ports`.
pub struct MustImplementPlugin;

impl ContractPlugin for MustImplementPlugin {
    fn contract_type(&self) -> ContractType {
        ContractType::MustImplement
    }

    fn constraint_name(&self) -> &'static str {
        "mustImplement"
    }

    fn diagnostic_code(&self) -> DiagnosticCode {
        DiagnosticCode::MissingImplementation
    }

    fn description(&self) -> &'static str {
        "Every exported port interface needs an implementing adapter class"
    }

    fn validate(&self, args: &[SymbolRef]) -> Result<(), String> {
        arity_exact(args, 2, "mustImplement", "interface, implementation")
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
            ContractType::MustImplement,
            "mustImplement",
        ))
    }

    fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult {
        let mut result = CheckResult::default();
        let [ports, adapters] = contract.args() else {
            return result;
        };
        let (Some(_), Some(adapters_location)) = (ports.carrier_key(), adapters.carrier_key())
        else {
            return result;
        };

        let port_files = ctx.resolved_files.files_for(ports);
        let adapter_files = ctx.resolved_files.files_for(adapters);

        let implemented: HashSet<String> = adapter_files
            .iter()
            .flat_map(|f| ctx.references.implemented_interfaces(f))
            .collect();

        let scope = contract.location().unwrap_or(adapters_location);
        for file in port_files {
            for iface in ctx.references.exported_interfaces(file) {
                if !implemented.contains(&iface) {
                    result.diagnostics.push(
                        Diagnostic::structural(
                            self.diagnostic_code(),
                            scope,
                            format!(
                                "Port '{iface}' has no corresponding adapter implementation (expected in '{adapters_location}')"
                            ),
                        )
                        .with_contract(contract.to_reference()),
                    );
                }
            }
        }

        result.files_analyzed = port_files.len() + adapter_files.len();
        result
    }
}
