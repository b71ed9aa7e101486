//! Contracts: checkable architectural rules produced by the binder.

use crate::symbol::SymbolRef;
use serde::{Deserialize, Serialize};

/// The closed catalog of contract kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractType {
    /// `from` must not import from `to`.
    NoDependency,
    /// No import cycles among the given symbols.
    NoCycles,
    /// No runtime built-in imports.
    Purity,
    /// Every exported port interface has an adapter class.
    MustImplement,
    /// Every file under `primary` has a counterpart under `related`.
    Mirrors,
    /// Declared locations exist.
    Exists,
    /// Basename-keyed variant of [`ContractType::Mirrors`].
    Colocated,
}

impl ContractType {
    /// All contract types in catalog order.
    pub const ALL: [Self; 7] = [
        Self::NoDependency,
        Self::NoCycles,
        Self::Purity,
        Self::MustImplement,
        Self::Mirrors,
        Self::Exists,
        Self::Colocated,
    ];

    /// Short identifier used in messages and configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoDependency => "noDependency",
            Self::NoCycles => "noCycles",
            Self::Purity => "purity",
            Self::MustImplement => "mustImplement",
            Self::Mirrors => "mirrors",
            Self::Exists => "exists",
            Self::Colocated => "colocated",
        }
    }

    /// Constraint key that declares this type in a Kind.
    #[must_use]
    pub fn constraint_name(self) -> &'static str {
        match self {
            Self::Purity => "pure",
            Self::Mirrors => "filesystem.mirrors",
            Self::Exists => "filesystem.exists",
            other => other.as_str(),
        }
    }

    /// Looks a type up by its identifier.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Looks a type up by either its identifier or its constraint key,
    /// so `purity` and `pure` both name [`ContractType::Purity`].
    #[must_use]
    pub fn from_config_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == key || t.constraint_name() == key)
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An architectural rule over one or more symbols.
#[derive(Debug, Clone)]
pub struct Contract {
    contract_type: ContractType,
    name: String,
    args: Vec<SymbolRef>,
    location: Option<String>,
}

impl Contract {
    /// Creates a contract.
    #[must_use]
    pub fn new(contract_type: ContractType, name: impl Into<String>, args: Vec<SymbolRef>) -> Self {
        Self {
            contract_type,
            name: name.into(),
            args,
            location: None,
        }
    }

    /// Records where the contract was declared.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Contract kind.
    #[must_use]
    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    /// Human-readable label, e.g. `noDependency(domain -> infra)`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments; meaning depends on the contract type.
    #[must_use]
    pub fn args(&self) -> &[SymbolRef] {
        &self.args
    }

    /// Provenance string, e.g. `type:CleanContext`.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Builds the back-reference attached to diagnostics.
    #[must_use]
    pub fn to_reference(&self) -> ContractRef {
        ContractRef {
            name: self.name.clone(),
            contract_type: self.contract_type,
            location: self.location.clone(),
        }
    }
}

/// Lightweight reference from a diagnostic to its contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    /// Contract name.
    pub name: String,
    /// Contract type.
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    /// Declaration provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
