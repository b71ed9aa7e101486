//! Shared output formatting for check results.

use anyhow::Result;
use kindscript_core::{ProjectReport, Severity};

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(outcome: &ProjectReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(outcome),
        OutputFormat::Json => return print_json(outcome),
        OutputFormat::Compact => print_compact(outcome),
    }
    Ok(())
}

fn print_text(outcome: &ProjectReport) {
    let report = &outcome.report;
    let (errors, warnings, infos) = report.count_by_severity();

    for diagnostic in &report.diagnostics {
        let severity_indicator = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        match &diagnostic.contract {
            Some(contract) => println!(
                "{} {} at {}",
                diagnostic.code,
                contract.name,
                diagnostic.position()
            ),
            None => println!("{} at {}", diagnostic.code, diagnostic.position()),
        }
        println!("  {}: {}", severity_indicator, diagnostic.message);
        if let Some(help) = &diagnostic.help {
            println!("  = help: {help}");
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) across {} instance(s), {} contract(s)\x1b[0m",
        summary_color, errors, warnings, infos, outcome.instances, report.contracts_checked
    );
}

fn print_json(outcome: &ProjectReport) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome)?;
    println!("{json}");
    Ok(())
}

fn print_compact(outcome: &ProjectReport) {
    for diagnostic in &outcome.report.diagnostics {
        println!(
            "{}: {} [{}] {}",
            diagnostic.position(),
            diagnostic.severity,
            diagnostic.code,
            diagnostic.message,
        );
    }
}
