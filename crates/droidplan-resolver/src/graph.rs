//! Dependency graph construction, cycle detection and tree rendering.
//!
//! An edge `a -> b` means `a` must be resolved before `b` (`b` lists `a` in
//! its `requires`). Whether an edge is allowed depends on the scopes at both
//! ends; see [`Scope::feeds`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use droidplan_core::coordinate::Coordinate;
use droidplan_core::dependency::Scope;
use droidplan_util::errors::DroidplanError;

use crate::order;
use crate::resolver::{ResolvedDependency, VersionResolution, VersionSource};

/// A node in the dependency graph: one resolved slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub coordinate: Coordinate,
    pub scopes: Vec<Scope>,
    pub index: usize,
    pub source: VersionSource,
}

impl GraphNode {
    /// `group:artifact` identifier (without version).
    pub fn key(&self) -> String {
        self.coordinate.key()
    }

    pub fn primary_scope(&self) -> Scope {
        self.scopes.first().copied().unwrap_or_default()
    }

    fn from_resolved(dep: &ResolvedDependency) -> Self {
        Self {
            coordinate: dep.coordinate.clone(),
            scopes: dep.scopes.clone(),
            index: dep.index,
            source: dep.source.clone(),
        }
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)
    }
}

/// Edge label: the scope of the dependent that asked for the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepEdge {
    pub scope: Scope,
}

/// A `requires` entry that crosses a scope boundary it may not cross.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEdge {
    pub from: String,
    pub from_scope: Scope,
    pub to: String,
    pub to_scope: Scope,
    pub declaration: usize,
}

/// A `requires` entry naming a slot that is not declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRequirement {
    pub dependent: String,
    pub missing: String,
    pub declaration: usize,
}

/// The dependency DAG backed by petgraph.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<GraphNode, DepEdge>,
    /// Lookup from `group:artifact` to node index.
    index: HashMap<String, NodeIndex>,
    pub rejected: Vec<RejectedEdge>,
    pub unknown: Vec<UnknownRequirement>,
}

impl DependencyGraph {
    /// Build the graph from resolved slots and check that it is acyclic.
    ///
    /// Disallowed and dangling `requires` entries are recorded on the graph
    /// rather than failing here; the validator reports them.
    pub fn build(resolution: &VersionResolution) -> Result<Self, DroidplanError> {
        let mut deps: Vec<&ResolvedDependency> = resolution.dependencies.iter().collect();
        deps.sort_by_key(|d| d.index);

        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for dep in &deps {
            let idx = graph.add_node(GraphNode::from_resolved(dep));
            index.insert(dep.key(), idx);
        }

        let mut rejected = Vec::new();
        let mut unknown = Vec::new();
        for dep in &deps {
            let to = index[&dep.key()];
            for required in &dep.requires {
                let Some(&from) = index.get(required) else {
                    unknown.push(UnknownRequirement {
                        dependent: dep.key(),
                        missing: required.clone(),
                        declaration: dep.index,
                    });
                    continue;
                };
                let from_node: &GraphNode = &graph[from];
                let from_scope = from_node.primary_scope();
                let allowed = from_node
                    .scopes
                    .iter()
                    .any(|s| dep.scopes.iter().any(|d| s.feeds(*d)));
                if allowed {
                    graph.add_edge(
                        from,
                        to,
                        DepEdge {
                            scope: dep.primary_scope(),
                        },
                    );
                } else {
                    rejected.push(RejectedEdge {
                        from: required.clone(),
                        from_scope,
                        to: dep.key(),
                        to_scope: dep.primary_scope(),
                        declaration: dep.index,
                    });
                }
            }
        }

        let built = Self {
            graph,
            index,
            rejected,
            unknown,
        };
        if let Some(cycle) = order::find_cycle(&built.graph) {
            return Err(DroidplanError::CyclicDependency {
                path: cycle.iter().map(|&idx| built.graph[idx].key()).collect(),
            });
        }
        tracing::debug!(
            nodes = built.graph.node_count(),
            edges = built.graph.edge_count(),
            "built dependency graph"
        );
        Ok(built)
    }

    /// Look up a node by `group:artifact`.
    pub fn find(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> Vec<&GraphNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx]).collect()
    }

    /// Slots that must be resolved before `idx`.
    pub fn requirements_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut reqs: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.source())
            .collect();
        reqs.sort();
        reqs.dedup();
        reqs
    }

    /// Slots that list `idx` in their `requires`.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        order::successors(&self.graph, idx)
    }

    /// Nodes ordered so that every requirement precedes its dependents,
    /// ties broken by declaration order.
    pub fn topological_order(&self) -> Result<Vec<&GraphNode>, DroidplanError> {
        match order::stable_topological_order(&self.graph) {
            Some(order) => Ok(order.into_iter().map(|idx| &self.graph[idx]).collect()),
            None => Err(DroidplanError::CyclicDependency {
                path: order::find_cycle(&self.graph)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|idx| self.graph[idx].key())
                    .collect(),
            }),
        }
    }

    /// Print the graph as a tree grouped by primary scope.
    ///
    /// Each node is listed with the slots it requires beneath it.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let sections = [
            (Scope::Compile, "[compile]"),
            (Scope::Runtime, "[runtime]"),
            (Scope::TestOnly, "[testOnly]"),
            (Scope::AnnotationProcessor, "[annotationProcessor]"),
            (Scope::Desugaring, "[desugaring]"),
        ];

        for (scope, label) in sections {
            let members: Vec<NodeIndex> = self
                .graph
                .node_indices()
                .filter(|&idx| self.graph[idx].primary_scope() == scope)
                .collect();
            if members.is_empty() {
                continue;
            }
            output.push_str(&format!("{label}\n"));
            let count = members.len();
            let mut visited = HashSet::new();
            for (i, idx) in members.into_iter().enumerate() {
                self.print_subtree(&mut output, idx, "", i == count - 1, 1, max_depth, &mut visited);
            }
        }

        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        output.push_str(&format!("{prefix}{connector}{node}{}\n", source_suffix(node)));

        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let reqs = self.requirements_of(idx);
        let count = reqs.len();
        for (i, child) in reqs.into_iter().enumerate() {
            self.print_subtree(
                output,
                child,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                visited,
            );
        }

        visited.remove(&idx);
    }

    /// Resolve a user-provided key to a node index.
    ///
    /// Tries exact `group:artifact` first, then falls back to matching by artifact name.
    fn resolve_key(&self, key: &str) -> Option<NodeIndex> {
        if let Some(&idx) = self.index.get(key) {
            return Some(idx);
        }
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].coordinate.artifact == key)
    }

    /// Render everything that (transitively) requires `target_key`.
    ///
    /// Accepts either `group:artifact` or just `artifact` (partial match).
    /// Returns `None` if the slot is not in the graph.
    pub fn print_inverted_tree(&self, target_key: &str) -> Option<String> {
        let idx = self.resolve_key(target_key)?;
        let node = &self.graph[idx];
        let mut output = format!("{node}{}\n", source_suffix(node));

        let mut visited = HashSet::new();
        visited.insert(idx);
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep) in dependents.into_iter().enumerate() {
            self.print_inverted_subtree(&mut output, dep, "", i == count - 1, &mut visited);
        }
        Some(output)
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep) in dependents.into_iter().enumerate() {
            self.print_inverted_subtree(output, dep, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn source_suffix(node: &GraphNode) -> String {
    match &node.source {
        VersionSource::Explicit => String::new(),
        VersionSource::Platform(bom) => format!(" (from {bom})"),
    }
}
