//! Turning graph payloads into render-ready [`GraphData`].

use std::collections::HashSet;

use log::{info, warn};

use super::client::ApiClient;
use super::models::{Neighborhood, RawEdge, RawNode};
use super::transport::Transport;
use crate::components::force_graph::{GraphData, GraphLink, GraphNode, NodeRole, RelationKind};
use crate::components::force_graph::sampling::degree_map;

/// Weight assumed for edges that arrive without one.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Deduplicates nodes, filters edges, and counts degree over the kept edges.
///
/// An edge is kept when it has both endpoints, both are known nodes, and its
/// weight is at least `threshold`.
pub fn assemble_graph(nodes: Vec<RawNode>, edges: Vec<RawEdge>, threshold: f64) -> GraphData {
	let mut seen = HashSet::new();
	let mut graph_nodes = Vec::with_capacity(nodes.len());
	for raw in nodes {
		if !seen.insert(raw.id().to_string()) {
			continue;
		}
		graph_nodes.push(match raw {
			RawNode::Id(id) => GraphNode::new(id),
			RawNode::Record { id, name, sector } => GraphNode {
				name: name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| id.clone()),
				sector,
				..GraphNode::new(id)
			},
		});
	}

	let links: Vec<GraphLink> = edges
		.into_iter()
		.filter_map(|edge| {
			let (source, target) = (edge.source?, edge.target?);
			let value = edge.value.unwrap_or(DEFAULT_EDGE_WEIGHT);
			let known = seen.contains(&source) && seen.contains(&target);
			(known && value >= threshold).then(|| GraphLink {
				kind: edge.kind.as_deref().map(RelationKind::parse),
				..GraphLink::new(source, target, value)
			})
		})
		.collect();

	let degrees = degree_map(&links);
	for node in &mut graph_nodes {
		node.degree = degrees.get(node.id.as_str()).copied().unwrap_or(0);
	}

	GraphData {
		nodes: graph_nodes,
		links,
	}
}

/// Star around `requested`: clients point at it, it points at suppliers.
///
/// A company listed both ways is drawn once, as a client.
pub fn star_graph(requested: &str, hood: Neighborhood) -> GraphData {
	let central = hood
		.id
		.filter(|id| !id.trim().is_empty())
		.unwrap_or_else(|| requested.to_string());

	let mut placed: HashSet<String> = HashSet::from([central.clone()]);
	let mut nodes = vec![GraphNode::new(central.clone()).with_role(NodeRole::Central)];
	let mut links = Vec::new();

	let neighbors = hood
		.clientes
		.into_iter()
		.map(|id| (id, NodeRole::Client))
		.chain(hood.fornecedores.into_iter().map(|id| (id, NodeRole::Supplier)));
	for (id, role) in neighbors {
		let Some(id) = id.filter(|id| !id.trim().is_empty()) else {
			continue;
		};
		if !placed.insert(id.clone()) {
			continue;
		}
		nodes.push(GraphNode::new(id.clone()).with_role(role));
		links.push(match role {
			NodeRole::Supplier => GraphLink {
				kind: Some(RelationKind::Supplier),
				..GraphLink::new(central.clone(), id, DEFAULT_EDGE_WEIGHT)
			},
			_ => GraphLink {
				kind: Some(RelationKind::Client),
				..GraphLink::new(id, central.clone(), DEFAULT_EDGE_WEIGHT)
			},
		});
	}

	let degrees = degree_map(&links);
	for node in &mut nodes {
		node.degree = degrees.get(node.id.as_str()).copied().unwrap_or(0);
	}
	GraphData { nodes, links }
}

/// Just the requested company, with no relationships.
pub fn lone_node(id: &str) -> GraphData {
	GraphData {
		nodes: vec![GraphNode::new(id).with_role(NodeRole::Central)],
		links: Vec::new(),
	}
}

impl<T: Transport> ApiClient<T> {
	/// The whole ecosystem. Failures are logged and yield an empty graph.
	pub async fn ecosystem_graph(&self, threshold: f64) -> GraphData {
		match futures::try_join!(self.graph_nodes(), self.graph_edges()) {
			Ok((nodes, edges)) => {
				let graph = assemble_graph(nodes, edges, threshold);
				info!(
					"Ecosystem graph: {} nodes, {} edges",
					graph.nodes.len(),
					graph.links.len()
				);
				graph
			}
			Err(err) => {
				warn!("Ecosystem graph unavailable: {}", err);
				GraphData::default()
			}
		}
	}

	/// Direct clients and suppliers of `id`, or `id` alone when that fails.
	pub async fn company_neighborhood(&self, id: &str) -> GraphData {
		match self.neighborhood(id).await {
			Ok(hood) => star_graph(id, hood),
			Err(err) => {
				warn!("Neighborhood of {} unavailable: {}", id, err);
				lone_node(id)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::super::client::mock_client;
	use super::super::transport::mock::MockTransport;
	use super::*;

	fn edge(source: &str, target: &str, value: Option<f64>) -> RawEdge {
		RawEdge {
			source: Some(source.into()),
			target: Some(target.into()),
			value,
			kind: None,
		}
	}

	fn ids(nodes: &[&str]) -> Vec<RawNode> {
		nodes.iter().map(|id| RawNode::Id(id.to_string())).collect()
	}

	#[test]
	fn light_edges_are_dropped() {
		let graph = assemble_graph(
			ids(&["A", "B", "C"]),
			vec![edge("A", "B", Some(0.8)), edge("B", "C", Some(0.02))],
			0.05,
		);
		assert_eq!(graph.links.len(), 1);
		assert_eq!((graph.links[0].source.as_str(), graph.links[0].target.as_str()), ("A", "B"));
		assert_eq!(graph.node("C").map(|n| n.degree), Some(0));
		assert_eq!(graph.node("A").map(|n| n.degree), Some(1));
	}

	#[test]
	fn edges_need_known_endpoints() {
		let graph = assemble_graph(
			ids(&["A", "A", "B"]),
			vec![
				edge("A", "Z", None),
				RawEdge {
					target: None,
					..edge("A", "B", None)
				},
				edge("B", "A", None),
			],
			0.05,
		);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.links[0].value, DEFAULT_EDGE_WEIGHT);
	}

	#[test]
	fn records_keep_their_names() {
		let graph = assemble_graph(
			vec![RawNode::Record {
				id: "A".into(),
				name: Some("Alpha".into()),
				sector: Some("Varejo".into()),
			}],
			Vec::new(),
			0.0,
		);
		assert_eq!(graph.nodes[0].name, "Alpha");
		assert_eq!(graph.nodes[0].sector.as_deref(), Some("Varejo"));
	}

	#[test]
	fn neighborhood_becomes_star() {
		let graph = star_graph(
			"X",
			Neighborhood {
				id: Some("X".into()),
				clientes: vec![Some("Y".into())],
				fornecedores: vec![Some("Z".into())],
			},
		);
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.node("X").and_then(|n| n.role), Some(NodeRole::Central));
		let edges: Vec<(&str, &str, Option<&RelationKind>)> = graph
			.links
			.iter()
			.map(|l| (l.source.as_str(), l.target.as_str(), l.kind.as_ref()))
			.collect();
		assert_eq!(
			edges,
			vec![
				("Y", "X", Some(&RelationKind::Client)),
				("X", "Z", Some(&RelationKind::Supplier)),
			]
		);
	}

	#[test]
	fn client_role_wins_and_center_is_not_repeated() {
		let graph = star_graph(
			"X",
			Neighborhood {
				id: None,
				clientes: vec![Some("Y".into()), None, Some("X".into())],
				fornecedores: vec![Some("Y".into()), Some("Z".into())],
			},
		);
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.node("Y").and_then(|n| n.role), Some(NodeRole::Client));
		assert_eq!(graph.links.len(), 2);
	}

	#[test]
	fn ecosystem_failure_yields_empty_graph() {
		let client = mock_client(
			MockTransport::new()
				.ok("/graph/nodes", r#"{"nodes": ["A"]}"#)
				.status("/graph/edges", 503),
		);
		assert!(block_on(client.ecosystem_graph(0.05)).is_empty());
	}

	#[test]
	fn neighborhood_failure_yields_lone_node() {
		let client = mock_client(MockTransport::new());
		let graph = block_on(client.company_neighborhood("Q"));
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].id, "Q");
		assert!(graph.links.is_empty());
	}
}
