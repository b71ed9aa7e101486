//! `pure`: no runtime built-in imports.
//!
//! Purity is intrinsic. A Kind declares `{ pure: true }` on itself and every
//! member of that Kind receives a `purity(member)` contract through
//! propagation, so this plugin never generates contracts directly.

use super::{arity_exact, CheckContext, CheckResult, ContractPlugin, IntrinsicConstraint};
use crate::contract::{Contract, ContractType};
use crate::symbol::SymbolRef;
use crate::types::{Diagnostic, DiagnosticCode, Location};
use crate::utils::builtins::is_node_builtin;
use crate::views::TypeNodeView;

/// Rejects imports of runtime built-ins such as `fs` or `node:path`.
pub struct PurityPlugin;

impl IntrinsicConstraint for PurityPlugin {
    fn detect(&self, constraints: &TypeNodeView) -> bool {
        constraints.properties().is_some_and(|props| {
            props
                .iter()
                .any(|p| p.name == "pure" && matches!(p.value, TypeNodeView::Boolean(_)))
        })
    }

    fn propagate(&self, member: &SymbolRef, member_name: &str, location: &str) -> Contract {
        Contract::new(
            ContractType::Purity,
            format!("purity({member_name})"),
            vec![member.clone()],
        )
        .with_location(location)
    }
}

impl ContractPlugin for PurityPlugin {
    fn contract_type(&self) -> ContractType {
        ContractType::Purity
    }

    fn constraint_name(&self) -> &'static str {
        "pure"
    }

    fn diagnostic_code(&self) -> DiagnosticCode {
        DiagnosticCode::ImpureImport
    }

    fn description(&self) -> &'static str {
        "Files must not import runtime built-in modules"
    }

    fn help(&self) -> Option<&'static str> {
        Some("Remove this import (impure import in pure layer)")
    }

    fn validate(&self, args: &[SymbolRef]) -> Result<(), String> {
        arity_exact(args, 1, "purity", "symbol")
    }

    fn intrinsic(&self) -> Option<&dyn IntrinsicConstraint> {
        Some(self)
    }

    fn check(&self, contract: &Contract, ctx: &CheckContext<'_>) -> CheckResult {
        let mut result = CheckResult::default();
        let [symbol] = contract.args() else {
            return result;
        };
        if symbol.carrier_key().is_none() {
            return result;
        }

        let files = ctx.resolved_files.files_for(symbol);
        for file in files {
            for import in ctx.references.module_specifiers(file) {
                if is_node_builtin(&import.module_name) {
                    result.diagnostics.push(
                        Diagnostic::at(
                            self.diagnostic_code(),
                            Location::new(file, import.line, import.column),
                            format!(
                                "Impure import in '{}': '{}'",
                                symbol.name(),
                                import.module_name
                            ),
                        )
                        .with_contract(contract.to_reference()),
                    );
                }
            }
        }

        result.files_analyzed = files.len();
        result
    }
}
