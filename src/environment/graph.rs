//! Explicit weighted graphs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Cost, Environment, Transition};
use crate::error::ValidationError;

fn default_graph_name() -> String {
    "graph".to_string()
}

fn default_edge_cost() -> Cost {
    1.0
}

/// One edge of a [`GraphDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    #[serde(default = "default_edge_cost")]
    pub cost: Cost,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, cost: Cost) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cost,
        }
    }
}

/// Serializable description of a graph search problem.
///
/// Edges are undirected unless `directed` is set. Transitions from a node
/// are offered in edge-listing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDefinition {
    #[serde(default = "default_graph_name")]
    pub name: String,
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    pub start: String,
    pub goals: Vec<String>,
    #[serde(default)]
    pub directed: bool,
    /// Per-node estimate of the remaining cost. Must cover every node.
    #[serde(default)]
    pub heuristic: Option<BTreeMap<String, Cost>>,
}

impl GraphDefinition {
    /// Checks the definition, naming the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.nodes.is_empty() {
            return Err(ValidationError::new("nodes", "must not be empty"));
        }
        let mut known = HashSet::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_empty() {
                return Err(ValidationError::new(format!("nodes[{i}]"), "empty node name"));
            }
            if !known.insert(node.as_str()) {
                return Err(ValidationError::new(
                    format!("nodes[{i}]"),
                    format!("duplicate node {node:?}"),
                ));
            }
        }

        if !known.contains(self.start.as_str()) {
            return Err(ValidationError::new(
                "start",
                format!("unknown node {:?}", self.start),
            ));
        }
        if self.goals.is_empty() {
            return Err(ValidationError::new("goals", "at least one goal is required"));
        }
        for (i, goal) in self.goals.iter().enumerate() {
            if !known.contains(goal.as_str()) {
                return Err(ValidationError::new(
                    format!("goals[{i}]"),
                    format!("unknown node {goal:?}"),
                ));
            }
        }

        let mut seen_edges = HashSet::with_capacity(self.edges.len());
        for (i, edge) in self.edges.iter().enumerate() {
            if !known.contains(edge.from.as_str()) {
                return Err(ValidationError::new(
                    format!("edges[{i}].from"),
                    format!("unknown node {:?}", edge.from),
                ));
            }
            if !known.contains(edge.to.as_str()) {
                return Err(ValidationError::new(
                    format!("edges[{i}].to"),
                    format!("unknown node {:?}", edge.to),
                ));
            }
            if !edge.cost.is_finite() || edge.cost < 0.0 {
                return Err(ValidationError::new(
                    format!("edges[{i}].cost"),
                    format!("must be finite and non-negative, got {}", edge.cost),
                ));
            }
            let key = if self.directed || edge.from <= edge.to {
                (edge.from.as_str(), edge.to.as_str())
            } else {
                (edge.to.as_str(), edge.from.as_str())
            };
            if !seen_edges.insert(key) {
                return Err(ValidationError::new(
                    format!("edges[{i}]"),
                    format!("duplicate edge {:?} -> {:?}", edge.from, edge.to),
                ));
            }
        }

        if let Some(table) = &self.heuristic {
            for (node, &value) in table {
                if !known.contains(node.as_str()) {
                    return Err(ValidationError::new(
                        format!("heuristic.{node}"),
                        "unknown node",
                    ));
                }
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::new(
                        format!("heuristic.{node}"),
                        format!("must be finite and non-negative, got {value}"),
                    ));
                }
            }
            for node in &self.nodes {
                if !table.contains_key(node) {
                    return Err(ValidationError::new(
                        "heuristic",
                        format!("no value for node {node:?}"),
                    ));
                }
            }
            for goal in &self.goals {
                if table[goal] != 0.0 {
                    return Err(ValidationError::new(
                        format!("heuristic.{goal}"),
                        "goal nodes must have a zero estimate",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Weighted graph environment. States are node indices; actions are the
/// name of the node moved to.
#[derive(Debug, Clone)]
pub struct GraphEnvironment {
    definition: GraphDefinition,
    names: Vec<Arc<str>>,
    adjacency: Vec<Vec<(usize, Cost)>>,
    start: usize,
    goals: Vec<bool>,
    heuristic: Option<Vec<Cost>>,
}

impl GraphEnvironment {
    /// Validates `definition` and builds the adjacency lists.
    pub fn from_definition(definition: GraphDefinition) -> Result<Self, ValidationError> {
        definition.validate()?;

        let index: HashMap<&str, usize> = definition
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();
        let names = definition
            .nodes
            .iter()
            .map(|n| Arc::<str>::from(n.as_str()))
            .collect();

        let mut adjacency = vec![Vec::new(); definition.nodes.len()];
        for edge in &definition.edges {
            let (from, to) = (index[edge.from.as_str()], index[edge.to.as_str()]);
            adjacency[from].push((to, edge.cost));
            if !definition.directed && from != to {
                adjacency[to].push((from, edge.cost));
            }
        }

        let mut goals = vec![false; definition.nodes.len()];
        for goal in &definition.goals {
            goals[index[goal.as_str()]] = true;
        }

        let heuristic = definition
            .heuristic
            .as_ref()
            .map(|table| definition.nodes.iter().map(|n| table[n]).collect());

        let start = index[definition.start.as_str()];
        Ok(Self {
            names,
            adjacency,
            start,
            goals,
            heuristic,
            definition,
        })
    }

    /// A directed chain `labels[0] -> labels[1] -> ...` with a uniform step
    /// cost; the last label is the goal.
    pub fn chain(name: &str, labels: &[&str], step_cost: Cost) -> Result<Self, ValidationError> {
        let nodes: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        let edges = labels
            .windows(2)
            .map(|w| GraphEdge::new(w[0], w[1], step_cost))
            .collect();
        let last = labels.len().saturating_sub(1);
        let heuristic = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.to_string(), (last - i) as Cost * step_cost))
            .collect();
        Self::from_definition(GraphDefinition {
            name: name.to_string(),
            start: nodes.first().cloned().unwrap_or_default(),
            goals: nodes.last().cloned().into_iter().collect(),
            nodes,
            edges,
            directed: true,
            heuristic: Some(heuristic),
        })
    }

    pub fn definition(&self) -> &GraphDefinition {
        &self.definition
    }

    /// Display name of a node index.
    pub fn node_name(&self, node: usize) -> Option<&str> {
        self.names.get(node).map(|n| &**n)
    }

    /// Looks up a node index by name.
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| &**n == name)
    }

    /// The classic Romania road map with straight-line distances to
    /// Bucharest as the heuristic.
    pub fn romania() -> Self {
        const ROADS: &[(&str, &str, Cost)] = &[
            ("Arad", "Zerind", 75.0),
            ("Arad", "Sibiu", 140.0),
            ("Arad", "Timisoara", 118.0),
            ("Zerind", "Oradea", 71.0),
            ("Oradea", "Sibiu", 151.0),
            ("Timisoara", "Lugoj", 111.0),
            ("Lugoj", "Mehadia", 70.0),
            ("Mehadia", "Drobeta", 75.0),
            ("Drobeta", "Craiova", 120.0),
            ("Craiova", "Rimnicu Vilcea", 146.0),
            ("Craiova", "Pitesti", 138.0),
            ("Sibiu", "Fagaras", 99.0),
            ("Sibiu", "Rimnicu Vilcea", 80.0),
            ("Rimnicu Vilcea", "Pitesti", 97.0),
            ("Fagaras", "Bucharest", 211.0),
            ("Pitesti", "Bucharest", 101.0),
            ("Bucharest", "Giurgiu", 90.0),
            ("Bucharest", "Urziceni", 85.0),
            ("Urziceni", "Hirsova", 98.0),
            ("Hirsova", "Eforie", 86.0),
            ("Urziceni", "Vaslui", 142.0),
            ("Vaslui", "Iasi", 92.0),
            ("Iasi", "Neamt", 87.0),
        ];
        const STRAIGHT_LINE: &[(&str, Cost)] = &[
            ("Arad", 366.0),
            ("Bucharest", 0.0),
            ("Craiova", 160.0),
            ("Drobeta", 242.0),
            ("Eforie", 161.0),
            ("Fagaras", 176.0),
            ("Giurgiu", 77.0),
            ("Hirsova", 151.0),
            ("Iasi", 226.0),
            ("Lugoj", 244.0),
            ("Mehadia", 241.0),
            ("Neamt", 234.0),
            ("Oradea", 380.0),
            ("Pitesti", 100.0),
            ("Rimnicu Vilcea", 193.0),
            ("Sibiu", 253.0),
            ("Timisoara", 329.0),
            ("Urziceni", 80.0),
            ("Vaslui", 199.0),
            ("Zerind", 374.0),
        ];

        let mut nodes: Vec<String> = Vec::new();
        for &(a, b, _) in ROADS {
            for n in [a, b] {
                if !nodes.iter().any(|x| x == n) {
                    nodes.push(n.to_string());
                }
            }
        }
        let definition = GraphDefinition {
            name: "romania".to_string(),
            nodes,
            edges: ROADS
                .iter()
                .map(|&(a, b, c)| GraphEdge::new(a, b, c))
                .collect(),
            start: "Arad".to_string(),
            goals: vec!["Bucharest".to_string()],
            directed: false,
            heuristic: Some(
                STRAIGHT_LINE
                    .iter()
                    .map(|&(n, h)| (n.to_string(), h))
                    .collect(),
            ),
        };
        Self::from_definition(definition).unwrap_or_else(|e| unreachable!("romania preset: {e}"))
    }

    /// `A -> B -> C -> D` with unit costs.
    pub fn abcd() -> Self {
        Self::chain("chain", &["A", "B", "C", "D"], 1.0)
            .unwrap_or_else(|e| unreachable!("chain preset: {e}"))
    }

    /// Initial state is already the goal.
    pub fn trivial() -> Self {
        Self::from_definition(GraphDefinition {
            name: "trivial".to_string(),
            nodes: vec!["A".to_string()],
            edges: Vec::new(),
            start: "A".to_string(),
            goals: vec!["A".to_string()],
            directed: true,
            heuristic: None,
        })
        .unwrap_or_else(|e| unreachable!("trivial preset: {e}"))
    }

    /// Two nodes and no edges: the goal is unreachable.
    pub fn disconnected() -> Self {
        Self::from_definition(GraphDefinition {
            name: "disconnected".to_string(),
            nodes: vec!["A".to_string(), "B".to_string()],
            edges: Vec::new(),
            start: "A".to_string(),
            goals: vec!["B".to_string()],
            directed: true,
            heuristic: None,
        })
        .unwrap_or_else(|e| unreachable!("disconnected preset: {e}"))
    }
}

impl Environment for GraphEnvironment {
    type State = usize;
    type Action = Arc<str>;

    fn name(&self) -> &str {
        &self.definition.name
    }

    fn initial_state(&self) -> usize {
        self.start
    }

    fn is_goal(&self, state: &usize) -> bool {
        self.goals.get(*state).copied().unwrap_or(false)
    }

    fn transitions(&self, state: &usize) -> Vec<Transition<usize, Arc<str>>> {
        self.adjacency
            .get(*state)
            .map(|edges| {
                edges
                    .iter()
                    .map(|&(to, cost)| Transition::new(Arc::clone(&self.names[to]), to, cost))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn heuristic(&self, state: &usize) -> Option<Cost> {
        self.heuristic.as_ref().and_then(|h| h.get(*state).copied())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.definition.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> GraphDefinition {
        GraphDefinition {
            name: "abc".into(),
            nodes: vec!["A".into(), "B".into(), "C".into()],
            edges: vec![GraphEdge::new("A", "B", 1.0), GraphEdge::new("B", "C", 2.0)],
            start: "A".into(),
            goals: vec!["C".into()],
            directed: false,
            heuristic: None,
        }
    }

    #[test]
    fn test_undirected_edges_go_both_ways() {
        let env = GraphEnvironment::from_definition(abc()).unwrap();
        let b = env.node_index("B").unwrap();
        let labels: Vec<String> = env
            .transitions(&b)
            .iter()
            .map(|t| t.action.to_string())
            .collect();
        assert_eq!(labels, vec!["A", "C"]);
    }

    #[test]
    fn test_directed_edges_one_way() {
        let mut def = abc();
        def.directed = true;
        let env = GraphEnvironment::from_definition(def).unwrap();
        let b = env.node_index("B").unwrap();
        assert_eq!(env.transitions(&b).len(), 1);
    }

    #[test]
    fn test_unknown_edge_endpoint_named() {
        let mut def = abc();
        def.edges.push(GraphEdge::new("C", "Z", 1.0));
        let err = def.validate().unwrap_err();
        assert_eq!(err.field, "edges[2].to");
        assert!(err.message.contains("\"Z\""));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut def = abc();
        def.edges[0].cost = -1.0;
        assert_eq!(def.validate().unwrap_err().field, "edges[0].cost");
    }

    #[test]
    fn test_duplicate_undirected_edge_rejected() {
        let mut def = abc();
        def.edges.push(GraphEdge::new("B", "A", 5.0));
        assert_eq!(def.validate().unwrap_err().field, "edges[2]");
    }

    #[test]
    fn test_unknown_start_and_goal() {
        let mut def = abc();
        def.start = "Q".into();
        assert_eq!(def.validate().unwrap_err().field, "start");

        let mut def = abc();
        def.goals = vec!["C".into(), "Q".into()];
        assert_eq!(def.validate().unwrap_err().field, "goals[1]");

        let mut def = abc();
        def.goals.clear();
        assert_eq!(def.validate().unwrap_err().field, "goals");
    }

    #[test]
    fn test_heuristic_must_cover_nodes() {
        let mut def = abc();
        def.heuristic = Some([("A".to_string(), 3.0), ("C".to_string(), 0.0)].into());
        let err = def.validate().unwrap_err();
        assert_eq!(err.field, "heuristic");
        assert!(err.message.contains("\"B\""));
    }

    #[test]
    fn test_heuristic_goal_must_be_zero() {
        let mut def = abc();
        def.heuristic = Some(
            [
                ("A".to_string(), 3.0),
                ("B".to_string(), 2.0),
                ("C".to_string(), 1.0),
            ]
            .into(),
        );
        assert_eq!(def.validate().unwrap_err().field, "heuristic.C");
    }

    #[test]
    fn test_chain_preset() {
        let env = GraphEnvironment::chain("chain", &["A", "B", "C", "D"], 1.0).unwrap();
        assert_eq!(env.initial_state(), 0);
        assert!(env.is_goal(&3));
        assert_eq!(env.heuristic(&0), Some(3.0));
        assert!(env.transitions(&3).is_empty());
    }

    #[test]
    fn test_romania_preset_is_valid() {
        let env = GraphEnvironment::romania();
        assert!(env.validate().is_ok());
        assert_eq!(env.definition().nodes.len(), 20);
        let arad = env.initial_state();
        assert_eq!(env.node_name(arad), Some("Arad"));
        let first: Vec<String> = env
            .transitions(&arad)
            .iter()
            .map(|t| t.action.to_string())
            .collect();
        assert_eq!(first, vec!["Zerind", "Sibiu", "Timisoara"]);
    }

    #[test]
    fn test_trivial_and_disconnected() {
        let trivial = GraphEnvironment::trivial();
        assert!(trivial.is_goal(&trivial.initial_state()));
        let disconnected = GraphEnvironment::disconnected();
        assert!(disconnected.transitions(&0).is_empty());
        assert!(!disconnected.is_goal(&0));
    }
}
