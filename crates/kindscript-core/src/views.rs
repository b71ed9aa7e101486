//! Read-only views of source facts supplied by the host environment.
//!
//! The binder never parses source itself. A host (see the `kindscript-ts`
//! crate) walks its syntax trees and hands these plain values over.

/// A restricted value language embedded in Kind constraint types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNodeView {
    /// `{ name: value; ... }`
    Object(Vec<PropertyView>),
    /// `["a", "b"]`
    StringList(Vec<String>),
    /// `[["a", "b"], ["c", "d"]]`
    TuplePairs(Vec<(String, String)>),
    /// `true` / `false`
    Boolean(bool),
}

impl TypeNodeView {
    /// Returns the properties if this is an object node.
    #[must_use]
    pub fn properties(&self) -> Option<&[PropertyView]> {
        match self {
            Self::Object(props) => Some(props),
            _ => None,
        }
    }

    /// Short name of the node shape, for error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::StringList(_) => "stringList",
            Self::TuplePairs(_) => "tuplePairs",
            Self::Boolean(_) => "boolean",
        }
    }
}

/// A named property of an object node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyView {
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: TypeNodeView,
}

impl PropertyView {
    /// Creates a property.
    #[must_use]
    pub fn new(name: impl Into<String>, value: TypeNodeView) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A member declared on a Kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// Member name.
    pub name: String,
    /// The member's own Kind type, if it references one.
    pub kind_type_name: Option<String>,
}

impl MemberDescriptor {
    /// Creates a member descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, kind_type_name: Option<&str>) -> Self {
        Self {
            name: name.into(),
            kind_type_name: kind_type_name.map(String::from),
        }
    }
}

/// A `Kind<...>` type alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindDefinitionView {
    /// Alias name.
    pub type_name: String,
    /// Members in declaration order.
    pub members: Vec<MemberDescriptor>,
    /// Constraint tree, if one was given.
    pub constraints: Option<TypeNodeView>,
}

/// A value supplied for a member inside an instance declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberValueView {
    /// Member name.
    pub name: String,
    /// Nested values, if the member was given an object literal with keys.
    pub children: Option<Vec<MemberValueView>>,
}

impl MemberValueView {
    /// A leaf value.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: None,
        }
    }

    /// A value with nested children.
    #[must_use]
    pub fn nested(name: impl Into<String>, children: Vec<MemberValueView>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
        }
    }
}

/// An `InstanceConfig<...>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDeclarationView {
    /// Declared variable name.
    pub variable_name: String,
    /// Referenced Kind type.
    pub kind_type_name: String,
    /// Member values in source order.
    pub members: Vec<MemberValueView>,
}

/// Extracted items plus non-fatal extraction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    /// Successfully extracted items.
    pub items: Vec<T>,
    /// Problems encountered along the way.
    pub errors: Vec<String>,
}

impl<T> Default for Extracted<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> Extracted<T> {
    /// Wraps items with no errors.
    #[must_use]
    pub fn ok(items: Vec<T>) -> Self {
        Self {
            items,
            errors: Vec::new(),
        }
    }
}

/// An import from one file into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    /// Importing file.
    pub source_file: String,
    /// Resolved target file.
    pub target_file: String,
    /// Line of the import (1-indexed).
    pub line: usize,
    /// Column of the import (1-indexed).
    pub column: usize,
    /// Raw specifier as written.
    pub import_path: String,
}

/// A reference between two top-level declarations of the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntraFileReference {
    /// Referencing declaration.
    pub from_declaration: String,
    /// Referenced declaration.
    pub to_declaration: String,
    /// Line of the reference (1-indexed).
    pub line: usize,
    /// Column of the reference (1-indexed).
    pub column: usize,
}

/// A raw module specifier from an import or re-export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpecifier {
    /// Specifier as written, e.g. `node:fs`.
    pub module_name: String,
    /// Line (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
}
