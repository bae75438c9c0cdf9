//! Ordering algorithms shared by the dependency and plugin graphs.
//!
//! Node indices are assigned in declaration order, so they double as the
//! stable tie-break for topological sorting.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Find a cycle by depth-first search with white/gray/black marking.
///
/// Returns the cycle as a node path whose first and last entries are the
/// same node, or `None` if the graph is acyclic. Roots and successors are
/// visited in index order, so the reported cycle is deterministic.
pub fn find_cycle<N, E>(graph: &DiGraph<N, E>) -> Option<Vec<NodeIndex>> {
    let mut marks = vec![Mark::White; graph.node_count()];
    let mut stack = Vec::new();
    for start in graph.node_indices() {
        if marks[start.index()] == Mark::White {
            if let Some(cycle) = visit(graph, start, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
    }
    None
}

fn visit<N, E>(
    graph: &DiGraph<N, E>,
    node: NodeIndex,
    marks: &mut [Mark],
    stack: &mut Vec<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    marks[node.index()] = Mark::Gray;
    stack.push(node);

    for next in successors(graph, node) {
        match marks[next.index()] {
            Mark::Gray => {
                let start = stack.iter().position(|&n| n == next)?;
                let mut cycle = stack[start..].to_vec();
                cycle.push(next);
                return Some(cycle);
            }
            Mark::White => {
                if let Some(cycle) = visit(graph, next, marks, stack) {
                    return Some(cycle);
                }
            }
            Mark::Black => {}
        }
    }

    stack.pop();
    marks[node.index()] = Mark::Black;
    None
}

/// Outgoing neighbours in index order, without duplicates.
pub fn successors<N, E>(graph: &DiGraph<N, E>, node: NodeIndex) -> Vec<NodeIndex> {
    let mut next: Vec<NodeIndex> = graph
        .edges_directed(node, Direction::Outgoing)
        .map(|e| e.target())
        .collect();
    next.sort();
    next.dedup();
    next
}

/// Kahn's algorithm with a min-heap on node index.
///
/// Among the nodes whose predecessors are all placed, the earliest declared
/// one is always emitted first. Returns `None` if the graph has a cycle.
pub fn stable_topological_order<N, E>(graph: &DiGraph<N, E>) -> Option<Vec<NodeIndex>> {
    let mut in_degree = vec![0usize; graph.node_count()];
    for idx in graph.node_indices() {
        for next in successors(graph, idx) {
            in_degree[next.index()] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = graph
        .node_indices()
        .filter(|idx| in_degree[idx.index()] == 0)
        .map(Reverse)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        for next in successors(graph, idx) {
            in_degree[next.index()] -= 1;
            if in_degree[next.index()] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    (order.len() == graph.node_count()).then_some(order)
}
