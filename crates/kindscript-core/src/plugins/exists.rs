//! `filesystem.exists`: declared locations must exist.

use super::{
    arity_at_least_one, generators, CheckContext, CheckResult, ContractPlugin, GeneratorResult,
};
use crate::contract::{Contract, ContractType};
use crate::symbol::{ArchSymbol, SymbolRef};
use crate::types::{Diagnostic, DiagnosticCode};
use crate::views::TypeNodeView;

/// Requires a non-empty file set behind every listed symbol.
pub struct ExistsPlugin;

/// Message shared with the derived-location pass.
pub(crate) fn location_not_found(symbol: &ArchSymbol, location: &str) -> String {
    match symbol.kind_type_name() {
        Some(kind) => format!(
            "Location '{location}' for '{}' not found (Kind: {kind})",
            symbol.name()
        ),
        None => format!("Location '{location}' for '{}' not found", symbol.name()),
    }
}

impl ContractPlugin for ExistsPlugin {
    fn contract_type(&self) -> ContractType {
        ContractType::Exists
    }

    fn constraint_name(&self) -> &'static str {
        "filesystem.exists"
    }

    fn diagnostic_code(&self) -> DiagnosticCode {
        DiagnosticCode::LocationNotFound
    }

    fn description(&self) -> &'static str {
        "The listed members must resolve to at least one source file"
    }

    fn help(&self) -> Option<&'static str> {
        Some("Create the directory or correct the member name")
    }

    fn validate(&self, args: &[SymbolRef]) -> Result<(), String> {
        arity_at_least_one(args, "exists")
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
            ContractType::Exists,
            "filesystem.exists",
        ))
    }

    fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult {
        let mut result = CheckResult::default();
        for symbol in contract.args() {
            let Some(location) = symbol.carrier_key() else {
                continue;
            };
            if ctx.resolved_files.get(location).is_empty() {
                result.diagnostics.push(
                    Diagnostic::structural(
                        self.diagnostic_code(),
                        symbol.name(),
                        location_not_found(symbol, location),
                    )
                    .with_contract(contract.to_reference()),
                );
            }
        }
        result
    }
}
