//! Directed-graph cycle detection.

use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Adjacency list keyed by node name.
///
/// Sorted maps keep traversal order, and therefore reported cycles,
/// deterministic across runs.
pub type Graph = BTreeMap<String, BTreeSet<String>>;

/// Finds cycles with a depth-first search that tracks the nodes on the
/// current stack.
///
/// When a neighbor that is still on the stack is reached, the path suffix
/// starting at that neighbor is recorded as a cycle and the search does not
/// descend into it again. Every node is expanded at most once, so the same
/// cycle can show up in different rotations when it is entered from
/// different roots; callers that need one report per cycle should
/// deduplicate on the sorted node set.
///
/// Neighbors that are not keys of `graph` are treated as sinks.
///
/// # Examples
///
/// ```
/// use kindscript_core::utils::graph::{find_cycles, Graph};
///
/// let mut graph = Graph::new();
/// graph.entry("a".into()).or_default().insert("b".into());
/// graph.entry("b".into()).or_default().insert("a".into());
///
/// let cycles = find_cycles(&graph);
/// assert_eq!(cycles, vec![vec!["a".to_string(), "b".to_string()]]);
/// ```
#[must_use]
pub fn find_cycles(graph: &Graph) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut in_stack: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();

    for node in graph.keys() {
        if !visited.contains(node.as_str()) {
            dfs(
                graph,
                node,
                &mut visited,
                &mut in_stack,
                &mut path,
                &mut cycles,
            );
        }
    }

    cycles
}

fn dfs<'g>(
    graph: &'g Graph,
    node: &'g str,
    visited: &mut HashSet<&'g str>,
    in_stack: &mut HashSet<&'g str>,
    path: &mut Vec<&'g str>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node);
    in_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = graph.get(node) {
        for neighbor in neighbors {
            let neighbor = neighbor.as_str();
            if in_stack.contains(neighbor) {
                if let Some(start) = path.iter().position(|n| *n == neighbor) {
                    cycles.push(path[start..].iter().map(|n| (*n).to_string()).collect());
                }
            } else if !visited.contains(neighbor) {
                dfs(graph, neighbor, visited, in_stack, path, cycles);
            }
        }
    }

    path.pop();
    in_stack.remove(node);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> Graph {
        let mut g = Graph::new();
        for (from, to) in edges {
            g.entry((*from).to_string())
                .or_default()
                .insert((*to).to_string());
            g.entry((*to).to_string()).or_default();
        }
        g
    }

    #[test]
    fn two_node_cycle_contains_both() {
        let cycles = find_cycles(&graph(&[("A", "B"), ("B", "A")]));
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].contains(&"A".to_string()));
        assert!(cycles[0].contains(&"B".to_string()));
    }

    #[test]
    fn chain_without_back_edge_has_no_cycle() {
        let cycles = find_cycles(&graph(&[("A", "B"), ("B", "C")]));
        assert!(cycles.is_empty());
    }

    #[test]
    fn three_node_cycle_in_order() {
        let cycles = find_cycles(&graph(&[("A", "B"), ("B", "C"), ("C", "A")]));
        assert_eq!(cycles, vec![vec!["A", "B", "C"]]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let cycles = find_cycles(&graph(&[("A", "A")]));
        assert_eq!(cycles, vec![vec!["A"]]);
    }

    #[test]
    fn cycle_suffix_excludes_entry_path() {
        // X leads into the B <-> C loop but is not part of it.
        let cycles = find_cycles(&graph(&[("X", "B"), ("B", "C"), ("C", "B")]));
        assert_eq!(cycles, vec![vec!["B", "C"]]);
    }

    #[test]
    fn disjoint_cycles_are_all_reported() {
        let cycles = find_cycles(&graph(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]));
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn unknown_neighbor_is_a_sink() {
        let mut g = Graph::new();
        g.entry("A".into()).or_default().insert("ghost".into());
        assert!(find_cycles(&g).is_empty());
    }
}
