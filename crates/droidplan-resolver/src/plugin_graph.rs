//! Plugin application order.
//!
//! Plugins are ordered by explicit `before -> after` constraints only; the
//! declaration order is used solely to break ties.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use droidplan_core::plugin::{PluginConstraint, PluginDeclaration};
use droidplan_util::errors::DroidplanError;

use crate::order;

/// A constraint naming a plugin that is not declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlugin {
    pub constraint: PluginConstraint,
    pub missing: String,
}

#[derive(Debug)]
pub struct PluginGraph {
    graph: DiGraph<PluginDeclaration, ()>,
    /// Plugin ids declared more than once (later declarations are ignored).
    pub duplicates: Vec<PluginDeclaration>,
    pub unknown: Vec<UnknownPlugin>,
}

impl PluginGraph {
    pub fn build(
        plugins: &[PluginDeclaration],
        constraints: &[PluginConstraint],
    ) -> Result<Self, DroidplanError> {
        let mut sorted: Vec<&PluginDeclaration> = plugins.iter().collect();
        sorted.sort_by_key(|p| p.index);

        let mut graph = DiGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();
        let mut duplicates = Vec::new();
        for plugin in sorted {
            if index.contains_key(&plugin.id) {
                duplicates.push(plugin.clone());
                continue;
            }
            let idx = graph.add_node(plugin.clone());
            index.insert(plugin.id.clone(), idx);
        }

        let mut unknown = Vec::new();
        for constraint in constraints {
            let before = index.get(&constraint.before);
            let after = index.get(&constraint.after);
            match (before, after) {
                (Some(&b), Some(&a)) => {
                    graph.update_edge(b, a, ());
                }
                _ => {
                    let missing = if before.is_none() {
                        &constraint.before
                    } else {
                        &constraint.after
                    };
                    unknown.push(UnknownPlugin {
                        constraint: constraint.clone(),
                        missing: missing.clone(),
                    });
                }
            }
        }

        if let Some(cycle) = order::find_cycle(&graph) {
            return Err(DroidplanError::CyclicDependency {
                path: cycle.iter().map(|&idx| graph[idx].id.clone()).collect(),
            });
        }

        Ok(Self {
            graph,
            duplicates,
            unknown,
        })
    }

    /// Application order: every constraint honoured, ties by declaration.
    pub fn order(&self) -> Result<Vec<&PluginDeclaration>, DroidplanError> {
        match order::stable_topological_order(&self.graph) {
            Some(order) => Ok(order.into_iter().map(|idx| &self.graph[idx]).collect()),
            None => Err(DroidplanError::CyclicDependency {
                path: order::find_cycle(&self.graph)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|idx| self.graph[idx].id.clone())
                    .collect(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(index: usize, id: &str) -> PluginDeclaration {
        PluginDeclaration {
            index,
            id: id.to_string(),
            version: None,
        }
    }

    fn ids(graph: &PluginGraph) -> Vec<String> {
        graph.order().unwrap().iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn constraints_override_declaration_order() {
        let plugins = vec![
            plugin(0, "dev.flutter.flutter-gradle-plugin"),
            plugin(1, "com.android.application"),
            plugin(2, "kotlin-android"),
        ];
        let constraints = vec![
            PluginConstraint::new("com.android.application", "dev.flutter.flutter-gradle-plugin"),
            PluginConstraint::new("kotlin-android", "dev.flutter.flutter-gradle-plugin"),
        ];
        let graph = PluginGraph::build(&plugins, &constraints).unwrap();
        assert_eq!(
            ids(&graph),
            vec![
                "com.android.application",
                "kotlin-android",
                "dev.flutter.flutter-gradle-plugin"
            ]
        );
    }

    #[test]
    fn unconstrained_plugins_keep_declaration_order() {
        let plugins = vec![plugin(0, "b"), plugin(1, "a")];
        let graph = PluginGraph::build(&plugins, &[]).unwrap();
        assert_eq!(ids(&graph), vec!["b", "a"]);
    }

    #[test]
    fn duplicates_and_unknown_are_recorded() {
        let plugins = vec![plugin(0, "a"), plugin(1, "a")];
        let constraints = vec![PluginConstraint::new("ghost", "a")];
        let graph = PluginGraph::build(&plugins, &constraints).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.duplicates.len(), 1);
        assert_eq!(graph.unknown[0].missing, "ghost");
    }

    #[test]
    fn cyclic_constraints_fail() {
        let plugins = vec![plugin(0, "a"), plugin(1, "b")];
        let constraints = vec![PluginConstraint::new("a", "b"), PluginConstraint::new("b", "a")];
        let err = PluginGraph::build(&plugins, &constraints).unwrap_err();
        match err {
            DroidplanError::CyclicDependency { path } => assert_eq!(path, vec!["a", "b", "a"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
