//! Reducing a graph to what is worth drawing.

use std::collections::{HashMap, HashSet};

use super::types::{GraphLink, GraphNode};

/// Edges kept per kept node in the ecosystem view.
pub const EDGES_PER_NODE: usize = 4;

/// Connection count per node id, counting both endpoints of every edge once.
pub fn degree_map(links: &[GraphLink]) -> HashMap<&str, u32> {
	let mut degrees: HashMap<&str, u32> = HashMap::new();
	for link in links {
		for end in [link.source.as_str(), link.target.as_str()] {
			if !end.is_empty() {
				*degrees.entry(end).or_default() += 1;
			}
		}
	}
	degrees
}

/// Nodes shown in the ecosystem view for a given limit.
pub fn node_budget(limit: usize, high_performance: bool) -> usize {
	if high_performance { limit / 2 } else { limit }
}

/// Drops edges that do not have both endpoints in `nodes`.
pub fn retain_connected(nodes: &[GraphNode], links: &[GraphLink]) -> Vec<GraphLink> {
	let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	links
		.iter()
		.filter(|l| ids.contains(l.source.as_str()) && ids.contains(l.target.as_str()))
		.cloned()
		.collect()
}

/// A graph cut down for display, with degrees taken from the full edge list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampledGraph {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

/// Keeps the `node_budget` best-connected nodes and the edges among them.
///
/// Ties keep input order. Edges are further capped at [`EDGES_PER_NODE`] per kept node.
pub fn top_by_degree(
	nodes: &[GraphNode],
	links: &[GraphLink],
	limit: usize,
	high_performance: bool,
) -> SampledGraph {
	let degrees = degree_map(links);
	let budget = node_budget(limit, high_performance);

	let mut ranked: Vec<GraphNode> = nodes
		.iter()
		.filter(|n| !n.id.is_empty())
		.map(|n| GraphNode {
			degree: degrees.get(n.id.as_str()).copied().unwrap_or(0),
			..n.clone()
		})
		.collect();
	ranked.sort_by(|a, b| b.degree.cmp(&a.degree));
	ranked.truncate(budget);

	let mut kept = retain_connected(&ranked, links);
	kept.truncate(budget * EDGES_PER_NODE);

	SampledGraph {
		nodes: ranked,
		links: kept,
	}
}

/// Neighborhood view: every node stays, only dangling edges go.
pub fn whole(nodes: &[GraphNode], links: &[GraphLink]) -> SampledGraph {
	let nodes: Vec<GraphNode> = nodes.iter().filter(|n| !n.id.is_empty()).cloned().collect();
	let links = retain_connected(&nodes, links);
	SampledGraph { nodes, links }
}
