//! Core types for diagnostics and check reports.

use crate::contract::ContractRef;
use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    #[default]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Numeric diagnostic codes, one per violation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum DiagnosticCode {
    /// An import crosses a forbidden boundary.
    ForbiddenDependency = 70001,
    /// A port interface lacks an adapter.
    MissingImplementation = 70002,
    /// A pure scope imports a runtime built-in.
    ImpureImport = 70003,
    /// Symbols import each other in a loop.
    CircularDependency = 70004,
    /// A file has no mirrored counterpart.
    MirrorMismatch = 70005,
    /// A declared or derived location is missing.
    LocationNotFound = 70010,
    /// A file has no colocated counterpart.
    ColocationMismatch = 70011,
    /// A contract failed argument validation.
    InvalidContract = 70099,
}

impl DiagnosticCode {
    /// Numeric value.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl From<DiagnosticCode> for u32 {
    fn from(code: DiagnosticCode) -> Self {
        code.as_u32()
    }
}

impl TryFrom<u32> for DiagnosticCode {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        [
            Self::ForbiddenDependency,
            Self::MissingImplementation,
            Self::ImpureImport,
            Self::CircularDependency,
            Self::MirrorMismatch,
            Self::LocationNotFound,
            Self::ColocationMismatch,
            Self::InvalidContract,
        ]
        .into_iter()
        .find(|c| c.as_u32() == value)
        .ok_or_else(|| format!("unknown diagnostic code {value}"))
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KS{}", self.as_u32())
    }
}

/// Source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path.
    pub file: String,
    /// Line number (1-indexed; 0 when unknown).
    pub line: usize,
    /// Column number (1-indexed; 0 when unknown).
    pub column: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}

/// A contract violation or invalid contract usage.
///
/// Import-level findings carry a [`Location`]; structural findings (cycles,
/// missing adapters, missing directories) carry a `scope` name instead.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct Diagnostic {
    /// Human-readable message.
    pub message: String,
    /// Category code.
    pub code: DiagnosticCode,
    /// Severity (contracts may be downgraded by configuration).
    #[serde(default)]
    pub severity: Severity,
    /// File position, if the finding is tied to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Structural scope name, if the finding is not tied to a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Originating contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<ContractRef>,
    /// Suggested fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic at a file position.
    #[must_use]
    pub fn at(code: DiagnosticCode, location: Location, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            severity: Severity::Error,
            location: Some(location),
            scope: None,
            contract: None,
            help: None,
        }
    }

    /// Creates a structural diagnostic tied to a named scope.
    #[must_use]
    pub fn structural(code: DiagnosticCode, scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            severity: Severity::Error,
            location: None,
            scope: Some(scope.into()),
            contract: None,
            help: None,
        }
    }

    /// Attaches the originating contract.
    #[must_use]
    pub fn with_contract(mut self, contract: ContractRef) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Attaches a suggested fix.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Overrides the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Where the finding points: `file:line:col`, or the scope name.
    #[must_use]
    pub fn position(&self) -> String {
        match (&self.location, &self.scope) {
            (Some(loc), _) => loc.to_string(),
            (None, Some(scope)) => scope.clone(),
            (None, None) => String::from("<unknown>"),
        }
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.code, self.severity, self.position());
        let _ = writeln!(output, "  {}", self.message);
        if let Some(contract) = &self.contract {
            let _ = writeln!(output, "  = contract: {}", contract.name);
        }
        if let Some(help) = &self.help {
            let _ = writeln!(output, "  = help: {help}");
        }
        output
    }
}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Info => miette::Severity::Advice,
            Severity::Warning => miette::Severity::Warning,
            Severity::Error => miette::Severity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match (&self.help, &self.contract) {
            (Some(help), _) => Some(Box::new(help)),
            (None, Some(contract)) => Some(Box::new(format!(
                "{} at {}",
                contract.name,
                self.position()
            ))),
            (None, None) => Some(Box::new(self.position())),
        }
    }
}

/// Outcome of checking a set of contracts.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// All diagnostics found.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of contracts evaluated (including invalid ones).
    pub contracts_checked: usize,
    /// Number of diagnostics produced.
    pub violations_found: usize,
    /// Number of files inspected across all contracts.
    pub files_analyzed: usize,
}

impl CheckReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any diagnostic is error-level.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any diagnostic meets or exceeds the given severity.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Counts diagnostics by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.diagnostics.iter().filter(|d| d.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Appends diagnostics that did not come from a contract check, such as
    /// the derived-location pass.
    pub fn push_extra(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
        self.violations_found = self.diagnostics.len();
    }

    /// Merges another report into this one.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.contracts_checked += other.contracts_checked;
        self.files_analyzed += other.files_analyzed;
        self.violations_found = self.diagnostics.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractType;

    fn make_diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic::at(
            DiagnosticCode::ForbiddenDependency,
            Location::new("src/domain/a.ts", 3, 1),
            "Forbidden dependency: domain → infra",
        )
        .with_severity(severity)
    }

    // --- DiagnosticCode ---

    #[test]
    fn code_displays_with_prefix() {
        assert_eq!(DiagnosticCode::ForbiddenDependency.to_string(), "KS70001");
        assert_eq!(DiagnosticCode::InvalidContract.as_u32(), 70099);
    }

    #[test]
    fn code_try_from_rejects_unknown() {
        assert_eq!(
            DiagnosticCode::try_from(70004),
            Ok(DiagnosticCode::CircularDependency)
        );
        assert!(DiagnosticCode::try_from(1).is_err());
    }

    // --- Diagnostic ---

    #[test]
    fn position_prefers_location() {
        let d = make_diagnostic(Severity::Error);
        assert_eq!(d.position(), "src/domain/a.ts:3:1");
    }

    #[test]
    fn structural_position_is_scope() {
        let d = Diagnostic::structural(DiagnosticCode::CircularDependency, "a", "cycle");
        assert_eq!(d.position(), "a");
        assert!(d.location.is_none());
    }

    #[test]
    fn location_without_line_prints_file_only() {
        assert_eq!(Location::new("<config>", 0, 0).to_string(), "<config>");
    }

    #[test]
    fn format_includes_contract_and_help() {
        let d = make_diagnostic(Severity::Error)
            .with_contract(ContractRef {
                name: "noDependency(domain -> infra)".into(),
                contract_type: ContractType::NoDependency,
                location: None,
            })
            .with_help("Move the import behind a port");
        let out = d.format();
        assert!(out.contains("KS70001 error at src/domain/a.ts:3:1"));
        assert!(out.contains("= contract: noDependency(domain -> infra)"));
        assert!(out.contains("= help: Move the import behind a port"));
    }

    #[test]
    fn miette_view_carries_code_severity_and_help() {
        let d = make_diagnostic(Severity::Info).with_help("Move the import behind a port");
        assert_eq!(
            miette::Diagnostic::code(&d).map(|c| c.to_string()),
            Some("KS70001".to_string())
        );
        assert_eq!(
            miette::Diagnostic::severity(&d),
            Some(miette::Severity::Advice)
        );
        assert_eq!(
            miette::Diagnostic::help(&d).map(|h| h.to_string()),
            Some("Move the import behind a port".to_string())
        );

        let bare = make_diagnostic(Severity::Error);
        assert_eq!(
            miette::Diagnostic::help(&bare).map(|h| h.to_string()),
            Some("src/domain/a.ts:3:1".to_string())
        );
    }

    // --- CheckReport ---

    #[test]
    fn has_violations_at_threshold() {
        let mut report = CheckReport::new();
        report.push_extra([make_diagnostic(Severity::Warning)]);
        assert!(!report.has_errors());
        assert!(report.has_violations_at(Severity::Warning));
        assert_eq!(report.violations_found, 1);
    }

    #[test]
    fn extend_sums_counters() {
        let mut a = CheckReport {
            contracts_checked: 1,
            files_analyzed: 2,
            ..CheckReport::new()
        };
        let mut b = CheckReport {
            contracts_checked: 2,
            files_analyzed: 3,
            ..CheckReport::new()
        };
        b.push_extra([make_diagnostic(Severity::Error)]);
        a.extend(b);
        assert_eq!(a.contracts_checked, 3);
        assert_eq!(a.files_analyzed, 5);
        assert_eq!(a.violations_found, 1);
        assert_eq!(a.count_by_severity(), (1, 0, 0));
    }
}
