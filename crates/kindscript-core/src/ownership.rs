//! Containment forest over Instance symbols, inferred from their scopes.

use crate::symbol::{SymbolKind, SymbolRef};
use crate::utils::paths::{is_proper_scope_prefix, is_within_scope};
use std::collections::HashMap;

/// Index of a node inside an [`OwnershipTree`].
pub type NodeId = usize;

/// One Instance placed in the forest.
#[derive(Debug, Clone)]
pub struct OwnershipNode {
    symbol: SymbolRef,
    scope: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    member_of: Option<String>,
}

impl OwnershipNode {
    /// The Instance symbol.
    #[must_use]
    pub fn symbol(&self) -> &SymbolRef {
        &self.symbol
    }

    /// The carrier key this node was placed by.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Narrowest enclosing instance, if any.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Directly contained instances.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Name of the parent member whose location contains this node.
    #[must_use]
    pub fn member_of(&self) -> Option<&str> {
        self.member_of.as_deref()
    }
}

/// Arena-backed forest. Parents are indices, so the structure holds no
/// reference cycles.
#[derive(Debug, Clone, Default)]
pub struct OwnershipTree {
    nodes: Vec<OwnershipNode>,
    roots: Vec<NodeId>,
    by_scope: HashMap<String, NodeId>,
}

impl OwnershipTree {
    /// Builds the forest from any mix of symbols. Only Instance symbols with a
    /// path carrier take part.
    #[must_use]
    pub fn build(symbols: &[SymbolRef]) -> Self {
        let mut nodes: Vec<OwnershipNode> = symbols
            .iter()
            .filter(|s| s.kind() == SymbolKind::Instance)
            .filter_map(|s| {
                let scope = s.carrier().and_then(|c| c.as_path())?.to_string();
                Some(OwnershipNode {
                    symbol: s.clone(),
                    scope,
                    parent: None,
                    children: Vec::new(),
                    member_of: None,
                })
            })
            .collect();

        nodes.sort_by_key(|n| n.scope.len());

        for child in 0..nodes.len() {
            let parent = (0..nodes.len())
                .filter(|&candidate| candidate != child)
                .filter(|&candidate| is_proper_scope_prefix(&nodes[candidate].scope, &nodes[child].scope))
                .max_by_key(|&candidate| nodes[candidate].scope.len());

            let Some(parent) = parent else {
                continue;
            };

            let member_of = nodes[parent]
                .symbol
                .members()
                .iter()
                .find(|m| {
                    m.carrier()
                        .and_then(|c| c.as_path())
                        .is_some_and(|path| is_within_scope(&nodes[child].scope, path))
                })
                .map(|m| m.name().to_string());

            nodes[child].parent = Some(parent);
            nodes[child].member_of = member_of;
            nodes[parent].children.push(child);
        }

        let roots = (0..nodes.len()).filter(|&i| nodes[i].parent.is_none()).collect();
        let by_scope = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.scope.clone(), i))
            .collect();

        Self {
            nodes,
            roots,
            by_scope,
        }
    }

    /// Node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&OwnershipNode> {
        self.nodes.get(id)
    }

    /// All nodes, broadest scope first.
    #[must_use]
    pub fn nodes(&self) -> &[OwnershipNode] {
        &self.nodes
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &OwnershipNode> {
        self.roots.iter().filter_map(|&i| self.nodes.get(i))
    }

    /// Looks up a node by exact scope.
    #[must_use]
    pub fn by_scope(&self, scope: &str) -> Option<&OwnershipNode> {
        self.by_scope.get(scope).and_then(|&i| self.nodes.get(i))
    }

    /// Parent node of `node`, if any.
    #[must_use]
    pub fn parent_of(&self, node: &OwnershipNode) -> Option<&OwnershipNode> {
        node.parent.and_then(|i| self.nodes.get(i))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
