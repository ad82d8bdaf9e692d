//! Pseudo-stat contribution graph.
//!
//! Provides `PseudoGraph`, a directed graph whose edges run from a catalog
//! stat id to every pseudo stat id it contributes to. The catalog builds it
//! once at load time and only reads it afterwards.

use crate::stat_id::StatId;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Directed graph of `stat id -> pseudo id` contributions.
///
/// # Examples
///
/// ```rust
/// use itemtext::graph::PseudoGraph;
/// use itemtext::StatId;
///
/// let mut graph = PseudoGraph::new();
/// let fire = StatId::new("explicit.stat_fire");
/// let total = StatId::new("pseudo.pseudo_total_fire_resistance");
///
/// graph.add_contribution(fire.clone(), total.clone());
/// assert_eq!(graph.targets_of(&fire), vec![total.clone()]);
/// assert!(graph.targets_of(&total).is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct PseudoGraph {
    graph: DiGraph<StatId, ()>,
    node_map: HashMap<StatId, NodeIndex>,
}

impl PseudoGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, stat_id: StatId) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&stat_id) {
            idx
        } else {
            let idx = self.graph.add_node(stat_id.clone());
            self.node_map.insert(stat_id, idx);
            idx
        }
    }

    /// Record that `stat` contributes to `pseudo`.
    ///
    /// Adding the same contribution twice keeps a single edge.
    pub fn add_contribution(&mut self, stat: StatId, pseudo: StatId) {
        let from = self.add_node(stat);
        let to = self.add_node(pseudo);
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Pseudo ids `stat` contributes to, in the order they were added.
    pub fn targets_of(&self, stat: &StatId) -> Vec<StatId> {
        let Some(&idx) = self.node_map.get(stat) else {
            return Vec::new();
        };
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges(idx)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges
            .into_iter()
            .map(|(_, node)| self.graph[node].clone())
            .collect()
    }

    /// Number of recorded contributions.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_keep_insertion_order() {
        let mut graph = PseudoGraph::new();
        let stat = StatId::new("explicit.stat_fire_cold");
        let fire = StatId::new("pseudo.fire");
        let cold = StatId::new("pseudo.cold");
        let ele = StatId::new("pseudo.ele");

        graph.add_contribution(stat.clone(), fire.clone());
        graph.add_contribution(stat.clone(), cold.clone());
        graph.add_contribution(stat.clone(), ele.clone());

        assert_eq!(graph.targets_of(&stat), vec![fire, cold, ele]);
    }

    #[test]
    fn test_duplicate_contribution_is_ignored() {
        let mut graph = PseudoGraph::new();
        let stat = StatId::new("a");
        let pseudo = StatId::new("p");
        graph.add_contribution(stat.clone(), pseudo.clone());
        graph.add_contribution(stat.clone(), pseudo.clone());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_unknown_stat_has_no_targets() {
        let graph = PseudoGraph::new();
        let unknown = StatId::new("missing");
        assert!(graph.targets_of(&unknown).is_empty());
    }

    #[test]
    fn test_pseudo_node_has_no_targets() {
        let mut graph = PseudoGraph::new();
        let stat = StatId::new("a");
        let pseudo = StatId::new("p");
        graph.add_contribution(stat.clone(), pseudo.clone());
        assert_eq!(graph.targets_of(&stat), vec![pseudo.clone()]);
        assert!(graph.targets_of(&pseudo).is_empty());
    }
}
