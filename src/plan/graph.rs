//! Resource Dependency Tracking
//!
//! This module tracks the dependencies between resources of a stack. Edges
//! run from a dependency to the resource that needs it, so a topological sort
//! yields a valid creation order. This enables:
//!
//! - Creation ordering (what Terraform will create first)
//! - Impact analysis (what is affected if a resource is replaced)
//! - Dependency visualization
//! - Cycle detection

use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::ResourceAddress;

/// Errors that can occur while building or querying a dependency graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Resource not found in graph: {0}")]
    NodeNotFound(String),

    #[error("Dependency cycle detected: {0}")]
    DependencyCycle(String),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// How a dependency was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    /// A property references an attribute of the dependency
    Reference,
    /// Declared through `depends_on`
    Explicit,
}

/// A dependency between two resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDependency {
    /// Resource that must exist first
    pub from: String,
    /// Resource that needs it
    pub to: String,
    /// How the dependency was introduced
    pub kind: DependencyKind,
    /// Referenced attribute, for reference dependencies
    pub attribute: Option<String>,
}

impl ResourceDependency {
    /// Create a new dependency
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            attribute: None,
        }
    }

    /// Record the referenced attribute
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

/// The dependency graph for resource relationships
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    graph: DiGraph<ResourceAddress, ResourceDependency>,
    node_indices: HashMap<String, NodeIndex>,
}

impl ResourceGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to the graph
    pub fn add_node(&mut self, address: ResourceAddress) -> NodeIndex {
        let key = address.to_string();
        if let Some(&idx) = self.node_indices.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(address);
        self.node_indices.insert(key, idx);
        idx
    }

    /// Add a dependency between two resources already in the graph
    pub fn add_dependency(&mut self, dependency: ResourceDependency) -> GraphResult<()> {
        let from_idx = *self
            .node_indices
            .get(&dependency.from)
            .ok_or_else(|| GraphError::NodeNotFound(dependency.from.clone()))?;
        let to_idx = *self
            .node_indices
            .get(&dependency.to)
            .ok_or_else(|| GraphError::NodeNotFound(dependency.to.clone()))?;

        // A resource referencing the same target twice still has one edge per kind.
        let exists = self
            .graph
            .edges_connecting(from_idx, to_idx)
            .any(|e| e.weight().kind == dependency.kind);
        if !exists {
            self.graph.add_edge(from_idx, to_idx, dependency);
        }
        Ok(())
    }

    /// Check for dependency cycles
    pub fn has_cycles(&self) -> bool {
        let sccs = tarjan_scc(&self.graph);
        sccs.iter().any(|scc| scc.len() > 1)
            || self
                .graph
                .node_indices()
                .any(|idx| self.graph.contains_edge(idx, idx))
    }

    /// Get all cycles in the graph
    pub fn get_cycles(&self) -> Vec<Vec<String>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                scc.into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).map(ToString::to_string))
                    .collect()
            })
            .collect()
    }

    /// Get creation order of resources (dependencies first)
    pub fn get_execution_order(&self) -> GraphResult<Vec<String>> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .filter_map(|idx| self.graph.node_weight(idx).map(ToString::to_string))
                .collect()),
            Err(cycle) => Err(GraphError::DependencyCycle(format!(
                "cannot order resources, cycle through '{}'",
                self.graph[cycle.node_id()]
            ))),
        }
    }

    fn walk(&self, address: &str, direction: Direction) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();

        if let Some(&start_idx) = self.node_indices.get(address) {
            queue.push_back(start_idx);

            while let Some(current) = queue.pop_front() {
                for neighbor in self.graph.neighbors_directed(current, direction) {
                    if let Some(node) = self.graph.node_weight(neighbor) {
                        if seen.insert(node.to_string()) {
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }

        seen.into_iter().collect()
    }

    /// Get all resources that depend on a given resource (direct and transitive)
    pub fn get_dependents(&self, address: &str) -> Vec<String> {
        self.walk(address, Direction::Outgoing)
    }

    /// Get all resources a given resource depends on (direct and transitive)
    pub fn get_dependencies(&self, address: &str) -> Vec<String> {
        self.walk(address, Direction::Incoming)
    }

    /// Get direct dependencies of a resource
    pub fn get_direct_dependencies(&self, address: &str) -> Vec<ResourceDependency> {
        let mut deps: Vec<ResourceDependency> = self
            .node_indices
            .get(address)
            .map(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .map(|e| e.weight().clone())
                    .collect()
            })
            .unwrap_or_default();
        deps.sort_by(|a, b| a.from.cmp(&b.from));
        deps
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Generate a DOT format representation for visualization
    pub fn to_dot(&self, name: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("digraph \"{name}\" {{\n"));
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box];\n\n");

        for node in self.graph.node_weights() {
            output.push_str(&format!(
                "  \"{node}\" [label=\"{}\\n{}\"];\n",
                node.resource_type, node.logical_id
            ));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            let dep = edge.weight();
            let style = match dep.kind {
                DependencyKind::Reference => "solid",
                DependencyKind::Explicit => "dashed",
            };
            let label = dep.attribute.as_deref().unwrap_or("depends_on");
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [style={style}, label=\"{label}\"];\n",
                self.graph[edge.source()],
                self.graph[edge.target()],
            ));
        }

        output.push_str("}\n");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> ResourceAddress {
        s.parse().unwrap()
    }

    fn chain() -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        graph.add_node(addr("aws_s3_bucket.bucket"));
        graph.add_node(addr("aws_s3_bucket_versioning.versioning"));
        graph.add_node(addr("aws_flow_log.fl"));
        graph
            .add_dependency(
                ResourceDependency::new(
                    "aws_s3_bucket.bucket",
                    "aws_s3_bucket_versioning.versioning",
                    DependencyKind::Reference,
                )
                .with_attribute("id"),
            )
            .unwrap();
        graph
            .add_dependency(
                ResourceDependency::new(
                    "aws_s3_bucket.bucket",
                    "aws_flow_log.fl",
                    DependencyKind::Reference,
                )
                .with_attribute("arn"),
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_graph_creation() {
        let graph = ResourceGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = ResourceGraph::new();
        let a = graph.add_node(addr("aws_s3_bucket.bucket"));
        let b = graph.add_node(addr("aws_s3_bucket.bucket"));
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = chain();
        graph
            .add_dependency(ResourceDependency::new(
                "aws_s3_bucket.bucket",
                "aws_flow_log.fl",
                DependencyKind::Reference,
            ))
            .unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_missing_node() {
        let mut graph = chain();
        let err = graph
            .add_dependency(ResourceDependency::new(
                "aws_iam_role.missing",
                "aws_flow_log.fl",
                DependencyKind::Explicit,
            ))
            .unwrap_err();
        assert_eq!(err, GraphError::NodeNotFound("aws_iam_role.missing".to_string()));
    }

    #[test]
    fn test_execution_order() {
        let order = chain().get_execution_order().unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], "aws_s3_bucket.bucket");
    }

    #[test]
    fn test_dependents_and_dependencies() {
        let graph = chain();
        assert_eq!(
            graph.get_dependents("aws_s3_bucket.bucket"),
            vec!["aws_flow_log.fl", "aws_s3_bucket_versioning.versioning"]
        );
        assert_eq!(
            graph.get_dependencies("aws_flow_log.fl"),
            vec!["aws_s3_bucket.bucket"]
        );
        assert!(graph.get_dependencies("aws_s3_bucket.bucket").is_empty());

        let direct = graph.get_direct_dependencies("aws_flow_log.fl");
        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].attribute.as_deref(), Some("arn"));
    }

    #[test]
    fn test_cycle_detection() {
        let mut graph = chain();
        assert!(!graph.has_cycles());
        graph
            .add_dependency(ResourceDependency::new(
                "aws_flow_log.fl",
                "aws_s3_bucket.bucket",
                DependencyKind::Explicit,
            ))
            .unwrap();
        assert!(graph.has_cycles());
        assert_eq!(graph.get_cycles().len(), 1);
        assert!(matches!(
            graph.get_execution_order(),
            Err(GraphError::DependencyCycle(_))
        ));
    }

    #[test]
    fn test_to_dot() {
        let dot = chain().to_dot("vpc-flowlogs-s3");
        assert!(dot.starts_with("digraph \"vpc-flowlogs-s3\""));
        assert!(dot.contains("\"aws_s3_bucket.bucket\" -> \"aws_flow_log.fl\""));
        assert!(dot.contains("label=\"arn\""));
    }
}
