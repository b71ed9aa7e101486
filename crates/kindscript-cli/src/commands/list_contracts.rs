//! List contracts command implementation.

use anyhow::Result;
use kindscript_core::PluginRegistry;
use serde::Serialize;

use crate::OutputFormat;

#[derive(Serialize)]
struct ContractInfo {
    code: String,
    constraint: &'static str,
    contract_type: &'static str,
    description: &'static str,
    intrinsic: bool,
}

fn catalog(registry: &PluginRegistry) -> Vec<ContractInfo> {
    registry
        .plugins()
        .iter()
        .map(|plugin| ContractInfo {
            code: plugin.diagnostic_code().to_string(),
            constraint: plugin.constraint_name(),
            contract_type: plugin.contract_type().as_str(),
            description: plugin.description(),
            intrinsic: plugin.intrinsic().is_some(),
        })
        .collect()
}

/// Runs the list-contracts command.
pub fn run(format: OutputFormat) -> Result<()> {
    let contracts = catalog(&PluginRegistry::builtin());

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&contracts)?);
        return Ok(());
    }

    println!("Available contracts:\n");
    println!("{:<10} {:<22} Description", "Code", "Constraint");
    println!("{}", "-".repeat(80));

    for info in &contracts {
        let marker = if info.intrinsic { " (intrinsic)" } else { "" };
        println!(
            "{:<10} {:<22} {}{}",
            info.code, info.constraint, info.description, marker
        );
    }

    println!("\nDeclare constraints in the third type argument of a Kind, e.g.:");
    println!("  type App = Kind<\"App\", {{ domain: Domain; infra: Infra }}, {{");
    println!("    noDependency: [[\"domain\", \"infra\"]];");
    println!("  }}>;");

    Ok(())
}
