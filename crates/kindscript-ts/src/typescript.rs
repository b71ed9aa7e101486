//! TypeScript extractor using Tree-sitter.
//!
//! Recognizes the declaration forms KindScript is built on:
//!
//! ```text
//! type Clean = Kind<"Clean", { domain: DomainLayer; infra: InfraLayer },
//!                   { noDependency: [["domain", "infra"]] }>;
//! export const app = { domain: {}, infra: {} } satisfies InstanceConfig<Clean>;
//! ```
//!
//! Only top-level statements are inspected. Kind aliases are matched by the
//! literal name `Kind`, instances by `InstanceConfig`.

use std::collections::HashMap;
use tree_sitter::{Language, Node, Parser};

use kindscript_core::{
    InstanceDeclarationView, IntraFileReference, KindDefinitionView, MemberDescriptor,
    MemberValueView, PropertyView, TypeNodeView,
};

use crate::error::HostError;
use crate::extractor::{RawImport, SourceFacts};

const MAX_MEMBER_DEPTH: usize = 32;

/// Extracts Kinds, Instances, imports, and declarations from TypeScript
/// source.
pub struct TypeScriptExtractor {
    typescript: Language,
    tsx: Language,
}

impl TypeScriptExtractor {
    /// Creates a new TypeScript extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Parses `source` and collects its facts. `path` selects the grammar
    /// (`.tsx` or plain TypeScript) and names the file in errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the parser
    /// produces no tree.
    pub fn analyze(&self, path: &str, source: &str) -> Result<SourceFacts, HostError> {
        let language = if path.ends_with(".tsx") {
            &self.tsx
        } else {
            &self.typescript
        };

        let mut parser = Parser::new();
        parser.set_language(language)?;
        let tree = parser.parse(source, None).ok_or_else(|| HostError::Parse {
            path: path.to_string(),
        })?;

        let src = source.as_bytes();
        let root = tree.root_node();
        let mut facts = SourceFacts::default();

        let mut statements = Vec::new();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "import_statement" => {
                    if let Some(import) = module_source(node, src) {
                        facts.imports.push(import);
                    }
                }
                "export_statement" => {
                    if let Some(import) = module_source(node, src) {
                        facts.imports.push(import);
                    }
                    if let Some(decl) = node.child_by_field_name("declaration") {
                        statements.push((decl, true));
                    }
                }
                _ => statements.push((node, false)),
            }
        }

        let initializers = top_level_initializers(&statements, src);
        let mut declarations: Vec<(String, Node<'_>)> = Vec::new();

        for &(node, exported) in &statements {
            match node.kind() {
                "type_alias_declaration" => {
                    if let Some(kind) = kind_definition(node, src, &mut facts.kinds.errors) {
                        facts.kinds.items.push(kind);
                    }
                }
                "lexical_declaration" | "variable_declaration" => {
                    let mut decl_cursor = node.walk();
                    for declarator in node.named_children(&mut decl_cursor) {
                        if declarator.kind() != "variable_declarator" {
                            continue;
                        }
                        if let Some(instance) = instance_declaration(
                            declarator,
                            src,
                            &initializers,
                            &mut facts.instances.errors,
                        ) {
                            facts.instances.items.push(instance);
                        }
                        let name = declarator.child_by_field_name("name");
                        let value = declarator.child_by_field_name("value");
                        if let (Some(name), Some(value)) = (name, value) {
                            if name.kind() == "identifier" {
                                declarations.push((text(name, src).to_owned(), value));
                            }
                        }
                    }
                }
                "interface_declaration" => {
                    if exported {
                        if let Some(name) = node.child_by_field_name("name") {
                            facts.exported_interfaces.push(text(name, src).to_owned());
                        }
                    }
                }
                "class_declaration" | "abstract_class_declaration" => {
                    facts
                        .implemented_interfaces
                        .extend(implemented_interfaces(node, src));
                    if let Some(name) = node.child_by_field_name("name") {
                        declarations.push((text(name, src).to_owned(), node));
                    }
                }
                "function_declaration" => {
                    let name = node.child_by_field_name("name");
                    let body = node.child_by_field_name("body");
                    if let (Some(name), Some(body)) = (name, body) {
                        declarations.push((text(name, src).to_owned(), body));
                    }
                }
                _ => {}
            }
        }

        facts.references = intra_file_references(&declarations, src);
        Ok(facts)
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────
// Node helpers
// ────────────────────────────────────────────

fn text<'a>(node: Node<'_>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn position(node: Node<'_>) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, point.column + 1)
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Contents of a `string` node without quotes.
fn string_contents(node: Node<'_>, src: &[u8]) -> String {
    named_children(node)
        .into_iter()
        .filter(|c| c.kind() == "string_fragment")
        .map(|c| text(c, src))
        .collect()
}

fn property_name(node: Node<'_>, src: &[u8]) -> Option<String> {
    let name = node.child_by_field_name("name").or_else(|| node.child_by_field_name("key"))?;
    Some(if name.kind() == "string" {
        string_contents(name, src)
    } else {
        text(name, src).to_owned()
    })
}

/// The type inside a `type_annotation` field.
fn annotated_type(node: Node<'_>) -> Option<Node<'_>> {
    let annotation = node.child_by_field_name("type")?;
    if annotation.kind() == "type_annotation" {
        named_children(annotation).into_iter().next()
    } else {
        Some(annotation)
    }
}

fn unwrap_type(mut node: Node<'_>) -> Node<'_> {
    while matches!(node.kind(), "readonly_type" | "parenthesized_type") {
        match named_children(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn unwrap_expression(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match named_children(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn module_source(node: Node<'_>, src: &[u8]) -> Option<RawImport> {
    let source = node.child_by_field_name("source")?;
    let (line, column) = position(node);
    Some(RawImport {
        specifier: string_contents(source, src),
        line,
        column,
    })
}

fn top_level_initializers<'t>(statements: &[(Node<'t>, bool)], src: &[u8]) -> HashMap<String, Node<'t>> {
    let mut map = HashMap::new();
    for &(node, _) in statements {
        if !matches!(node.kind(), "lexical_declaration" | "variable_declaration") {
            continue;
        }
        for declarator in named_children(node) {
            let name = declarator.child_by_field_name("name");
            let value = declarator.child_by_field_name("value");
            if let (Some(name), Some(value)) = (name, value) {
                if name.kind() == "identifier" {
                    map.insert(text(name, src).to_owned(), value);
                }
            }
        }
    }
    map
}

// ────────────────────────────────────────────
// Kind definitions
// ────────────────────────────────────────────

fn kind_definition(node: Node<'_>, src: &[u8], errors: &mut Vec<String>) -> Option<KindDefinitionView> {
    let name = node.child_by_field_name("name")?;
    let value = unwrap_type(node.child_by_field_name("value")?);
    if value.kind() != "generic_type" {
        return None;
    }
    let generic = value.child_by_field_name("name")?;
    if text(generic, src) != "Kind" {
        return None;
    }

    let type_name = text(name, src).to_owned();
    let args = value
        .child_by_field_name("type_arguments")
        .map(named_children)
        .unwrap_or_default();

    if let Some(first) = args.first() {
        if string_literal(*first, src).is_none() {
            errors.push(format!(
                "Kind '{type_name}': first type argument must be a string literal."
            ));
        }
    }

    let members: Vec<MemberDescriptor> = args
        .get(1)
        .map(|m| unwrap_type(*m))
        .filter(|m| m.kind() == "object_type")
        .map(|object| {
            named_children(object)
                .into_iter()
                .filter(|p| p.kind() == "property_signature")
                .filter_map(|p| {
                    let name = property_name(p, src)?;
                    let member_type = annotated_type(p).and_then(|t| match t.kind() {
                        "type_identifier" => Some(text(t, src)),
                        "predefined_type" if text(t, src) == "string" => Some("string"),
                        _ => None,
                    });
                    Some(MemberDescriptor::new(name, member_type))
                })
                .collect()
        })
        .unwrap_or_default();

    let constraints = args.get(2).and_then(|c| {
        let view = type_node_view(*c, src, errors);
        if view.is_none() {
            errors.push(format!(
                "Kind '{type_name}': constraints type argument could not be parsed."
            ));
        }
        view
    });

    Some(KindDefinitionView {
        type_name,
        members,
        constraints,
    })
}

/// Maps a constraint type to the restricted value language by shape alone.
fn type_node_view(node: Node<'_>, src: &[u8], errors: &mut Vec<String>) -> Option<TypeNodeView> {
    let node = unwrap_type(node);

    if let Some(value) = boolean_literal(node) {
        return Some(TypeNodeView::Boolean(value));
    }

    if node.kind() == "object_type" {
        let properties: Vec<PropertyView> = named_children(node)
            .into_iter()
            .filter(|p| p.kind() == "property_signature")
            .filter_map(|p| {
                let name = property_name(p, src)?;
                let value = type_node_view(annotated_type(p)?, src, errors)?;
                Some(PropertyView::new(name, value))
            })
            .collect();
        return (!properties.is_empty()).then_some(TypeNodeView::Object(properties));
    }

    let elements = type_elements(node);
    let first = *elements.first()?;

    if string_literal(first, src).is_some() {
        let mut values = Vec::new();
        for element in &elements {
            match string_literal(*element, src) {
                Some(s) => values.push(s),
                None => errors.push("Constraint contains a non-string element in string list.".into()),
            }
        }
        return Some(TypeNodeView::StringList(values));
    }

    if !type_elements(first).is_empty() {
        let pairs = tuple_pairs(&elements, src, errors);
        if !pairs.is_empty() {
            return Some(TypeNodeView::TuplePairs(pairs));
        }
    }

    None
}

fn tuple_pairs(elements: &[Node<'_>], src: &[u8], errors: &mut Vec<String>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for element in elements {
        let inner = type_elements(*element);
        match inner.as_slice() {
            [a, b] => match (string_literal(*a, src), string_literal(*b, src)) {
                (Some(a), Some(b)) => pairs.push((a, b)),
                _ => errors.push("Constraint tuple pair contains a non-string element.".into()),
            },
            [] => {}
            other => errors.push(format!(
                "Constraint tuple must have exactly 2 elements, got {}.",
                other.len()
            )),
        }
    }
    pairs
}

/// Elements of a tuple type, or type arguments of `ReadonlyArray<...>`.
fn type_elements(node: Node<'_>) -> Vec<Node<'_>> {
    let node = unwrap_type(node);
    match node.kind() {
        "tuple_type" => named_children(node).into_iter().map(tuple_member_type).collect(),
        "generic_type" => node
            .child_by_field_name("type_arguments")
            .map(named_children)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Strips the label from named tuple members (`[from: "a", to: "b"]`).
fn tuple_member_type(node: Node<'_>) -> Node<'_> {
    if matches!(node.kind(), "required_parameter" | "optional_parameter") {
        annotated_type(node).unwrap_or(node)
    } else {
        node
    }
}

fn string_literal(node: Node<'_>, src: &[u8]) -> Option<String> {
    let node = unwrap_type(node);
    if node.kind() != "literal_type" {
        return None;
    }
    let inner = named_children(node).into_iter().next()?;
    (inner.kind() == "string").then(|| string_contents(inner, src))
}

fn boolean_literal(node: Node<'_>) -> Option<bool> {
    let node = if node.kind() == "literal_type" {
        named_children(node).into_iter().next()?
    } else {
        node
    };
    match node.kind() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

// ────────────────────────────────────────────
// Instance declarations
// ────────────────────────────────────────────

fn instance_declaration<'t>(
    declarator: Node<'t>,
    src: &[u8],
    initializers: &HashMap<String, Node<'t>>,
    errors: &mut Vec<String>,
) -> Option<InstanceDeclarationView> {
    let value = declarator.child_by_field_name("value")?;
    if value.kind() != "satisfies_expression" {
        return None;
    }
    let parts = named_children(value);
    let (expression, satisfied) = match parts.as_slice() {
        [expression, .., satisfied] => (*expression, unwrap_type(*satisfied)),
        _ => return None,
    };

    let variable = declarator
        .child_by_field_name("name")
        .filter(|n| n.kind() == "identifier")
        .map(|n| text(n, src));

    let kind_type_name = match satisfied.kind() {
        "generic_type" => {
            let generic = satisfied.child_by_field_name("name")?;
            if text(generic, src) != "InstanceConfig" {
                return None;
            }
            satisfied
                .child_by_field_name("type_arguments")
                .and_then(|args| named_children(args).into_iter().next())
                .filter(|arg| arg.kind() == "type_identifier")
                .map(|arg| text(arg, src).to_owned())
        }
        "type_identifier" if text(satisfied, src) == "InstanceConfig" => None,
        _ => return None,
    };

    let Some(kind_type_name) = kind_type_name else {
        errors.push(format!(
            "'{} satisfies InstanceConfig' is missing a type argument.",
            variable.unwrap_or("<unnamed>")
        ));
        return None;
    };
    let variable_name = variable?.to_owned();

    let expression = unwrap_expression(expression);
    if expression.kind() != "object" {
        return None;
    }

    let mut active = vec![expression.id()];
    let members = member_values(expression, src, initializers, errors, &mut active);
    Some(InstanceDeclarationView {
        variable_name,
        kind_type_name,
        members,
    })
}

fn member_values<'t>(
    object: Node<'t>,
    src: &[u8],
    initializers: &HashMap<String, Node<'t>>,
    errors: &mut Vec<String>,
    active: &mut Vec<usize>,
) -> Vec<MemberValueView> {
    let mut values = Vec::new();

    for prop in named_children(object) {
        let (name, mut value) = match prop.kind() {
            "pair" => {
                let Some(name) = property_name(prop, src) else {
                    continue;
                };
                (name, prop.child_by_field_name("value"))
            }
            "shorthand_property_identifier" => {
                let name = text(prop, src).to_owned();
                let value = initializers.get(&name).copied();
                if value.is_none() {
                    errors.push(format!(
                        "InstanceConfig member '{name}': variable '{name}' not resolved (shorthand)."
                    ));
                }
                (name, value)
            }
            _ => continue,
        };

        if let Some(identifier) = value.filter(|v| v.kind() == "identifier") {
            let reference = text(identifier, src);
            value = initializers.get(reference).copied();
            if value.is_none() {
                errors.push(format!(
                    "InstanceConfig member '{name}': variable '{reference}' not resolved."
                ));
            }
        }

        let nested = value
            .map(unwrap_expression)
            .filter(|v| v.kind() == "object")
            .filter(|v| !active.contains(&v.id()) && active.len() < MAX_MEMBER_DEPTH);

        let children = match nested {
            Some(child) => {
                active.push(child.id());
                let children = member_values(child, src, initializers, errors, active);
                active.pop();
                children
            }
            None => Vec::new(),
        };

        values.push(if children.is_empty() {
            MemberValueView::leaf(name)
        } else {
            MemberValueView::nested(name, children)
        });
    }

    values
}

// ────────────────────────────────────────────
// Declarations and references
// ────────────────────────────────────────────

fn implemented_interfaces(class: Node<'_>, src: &[u8]) -> Vec<String> {
    named_children(class)
        .into_iter()
        .filter(|c| c.kind() == "class_heritage")
        .flat_map(named_children)
        .filter(|c| c.kind() == "implements_clause")
        .flat_map(named_children)
        .filter_map(|t| match t.kind() {
            "type_identifier" => Some(text(t, src).to_owned()),
            "generic_type" => t
                .child_by_field_name("name")
                .map(|n| text(n, src).to_owned()),
            _ => None,
        })
        .collect()
}

fn intra_file_references(declarations: &[(String, Node<'_>)], src: &[u8]) -> Vec<IntraFileReference> {
    let names: Vec<&str> = declarations.iter().map(|(n, _)| n.as_str()).collect();
    let mut references = Vec::new();

    for (from, body) in declarations {
        let mut stack = vec![*body];
        while let Some(node) = stack.pop() {
            if matches!(
                node.kind(),
                "identifier" | "type_identifier" | "shorthand_property_identifier"
            ) {
                let target = text(node, src);
                if target != from && names.contains(&target) {
                    let (line, column) = position(node);
                    references.push(IntraFileReference {
                        from_declaration: from.clone(),
                        to_declaration: target.to_owned(),
                        line,
                        column,
                    });
                }
            }
            stack.extend(named_children(node).into_iter().rev());
        }
    }

    references
}
