//! Architectural symbols: Kinds, Instances, and their Members.

use serde::Serialize;
use std::sync::Arc;

/// Shared handle to an immutable symbol.
///
/// Contracts hold these handles; propagation deduplicates on pointer
/// identity via [`Arc::ptr_eq`].
pub type SymbolRef = Arc<ArchSymbol>;

/// The kind of architectural entity a symbol represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// A type-level Kind definition.
    Kind,
    /// A value-level Instance of a Kind.
    Instance,
    /// A member nested inside an Instance.
    Member,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kind => write!(f, "kind"),
            Self::Instance => write!(f, "instance"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// Where a symbol's code lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[non_exhaustive]
pub enum Carrier {
    /// A directory or file on disk.
    Path {
        /// `/`-separated path.
        path: String,
    },
}

impl Carrier {
    /// Creates a path carrier.
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path { path: path.into() }
    }

    /// Stable lookup key for resolved-file maps.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Path { path } => path,
        }
    }

    /// Returns the filesystem path if this is a path carrier.
    #[must_use]
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path { path } => Some(path),
        }
    }
}

/// A named architectural entity.
///
/// Equality compares `(name, kind, carrier)` only; member trees are not
/// part of identity.
#[derive(Debug, Clone)]
pub struct ArchSymbol {
    name: String,
    kind: SymbolKind,
    carrier: Option<Carrier>,
    members: Vec<SymbolRef>,
    kind_type_name: Option<String>,
    location_derived: bool,
}

impl ArchSymbol {
    /// Creates a symbol without carrier or members.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            carrier: None,
            members: Vec::new(),
            kind_type_name: None,
            location_derived: false,
        }
    }

    /// Sets the carrier.
    ///
    /// Kind symbols never carry a location, so the carrier is ignored for
    /// them.
    #[must_use]
    pub fn with_carrier(mut self, carrier: Carrier) -> Self {
        if self.kind != SymbolKind::Kind {
            self.carrier = Some(carrier);
        }
        self
    }

    /// Sets the Kind type this symbol instantiates.
    #[must_use]
    pub fn with_kind_type_name(mut self, name: impl Into<String>) -> Self {
        self.kind_type_name = Some(name.into());
        self
    }

    /// Marks the carrier as computed from the parent.
    #[must_use]
    pub fn location_derived(mut self, derived: bool) -> Self {
        self.location_derived = derived;
        self
    }

    /// Appends a member. Insertion order is declaration order.
    #[must_use]
    pub fn with_member(mut self, member: impl Into<SymbolRef>) -> Self {
        self.members.push(member.into());
        self
    }

    /// Symbol name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity kind.
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Location descriptor, if any.
    #[must_use]
    pub fn carrier(&self) -> Option<&Carrier> {
        self.carrier.as_ref()
    }

    /// Shorthand for `carrier().map(Carrier::key)`.
    #[must_use]
    pub fn carrier_key(&self) -> Option<&str> {
        self.carrier.as_ref().map(Carrier::key)
    }

    /// Direct members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[SymbolRef] {
        &self.members
    }

    /// The Kind type this symbol instantiates.
    #[must_use]
    pub fn kind_type_name(&self) -> Option<&str> {
        self.kind_type_name.as_deref()
    }

    /// True if the carrier was derived from the parent's carrier.
    #[must_use]
    pub fn is_location_derived(&self) -> bool {
        self.location_derived
    }

    /// Finds a direct member by name.
    #[must_use]
    pub fn find_member(&self, name: &str) -> Option<&SymbolRef> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Finds a descendant by dotted path, e.g. `ordering.domain`.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&SymbolRef> {
        let mut parts = path.split('.');
        let mut current = self.find_member(parts.next()?)?;
        for part in parts {
            current = current.find_member(part)?;
        }
        Some(current)
    }

    /// All descendants in pre-order: each member, then its own subtree,
    /// before the next sibling.
    #[must_use]
    pub fn descendants(&self) -> Vec<&SymbolRef> {
        let mut out = Vec::new();
        let mut stack: Vec<&SymbolRef> = self.members.iter().rev().collect();
        while let Some(symbol) = stack.pop() {
            out.push(symbol);
            stack.extend(symbol.members.iter().rev());
        }
        out
    }
}

impl PartialEq for ArchSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind && self.carrier == other.carrier
    }
}

impl Eq for ArchSymbol {}

impl std::fmt::Display for ArchSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)?;
        if let Some(key) = self.carrier_key() {
            write!(f, " @ {key}")?;
        }
        Ok(())
    }
}
