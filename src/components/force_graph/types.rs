/// Where a company sits relative to the focal company of a neighborhood view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
	/// The company the neighborhood is centered on.
	Central,
	/// Buys from the focal company.
	Client,
	/// Sells to the focal company.
	Supplier,
}

/// Relationship carried by an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationKind {
	/// `cliente`
	Client,
	/// `fornecedor`
	Supplier,
	/// Any other label, kept verbatim.
	Other(String),
}

impl RelationKind {
	/// Case-insensitive parse of the backend's edge `type`.
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_lowercase().as_str() {
			"cliente" => RelationKind::Client,
			"fornecedor" => RelationKind::Supplier,
			_ => RelationKind::Other(raw.to_string()),
		}
	}
}

/// A company in the value-chain graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Company id, unique within a graph.
	pub id: String,
	/// Display name; the id when the backend sends none.
	pub name: String,
	/// Position relative to the focal company, in neighborhood graphs.
	pub role: Option<NodeRole>,
	/// CNAE sector, when known.
	pub sector: Option<String>,
	/// Connection count within the graph this node was delivered with.
	pub degree: u32,
}

impl GraphNode {
	/// A node named after its id, with no role and no connections.
	pub fn new(id: impl Into<String>) -> Self {
		let id = id.into();
		Self {
			name: id.clone(),
			id,
			role: None,
			sector: None,
			degree: 0,
		}
	}

	/// Builder-style role assignment.
	pub fn with_role(mut self, role: NodeRole) -> Self {
		self.role = Some(role);
		self
	}
}

/// A weighted, directed relationship between two companies.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Id of the paying side.
	pub source: String,
	/// Id of the receiving side.
	pub target: String,
	/// Transaction weight.
	pub value: f64,
	/// Relationship type, when the backend labels it.
	pub kind: Option<RelationKind>,
}

impl GraphLink {
	/// An unlabelled link.
	pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value,
			kind: None,
		}
	}
}

/// Nodes and links of one graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Companies, unique by id.
	pub nodes: Vec<GraphNode>,
	/// Relationships between nodes of this graph.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// True when there is no node to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node lookup by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Which of the two views a render is for.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphMode {
	/// The whole (sampled) ecosystem.
	Ecosystem,
	/// One company's clients and suppliers.
	Company {
		/// Id of the focal company.
		central: String,
	},
}

/// User-facing knobs that shape a render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOptions {
	/// Node cap for the ecosystem view.
	pub limit: usize,
	/// Halves the node cap and settles the layout before the first paint.
	pub high_performance: bool,
}

impl Default for LayoutOptions {
	fn default() -> Self {
		Self {
			limit: 100,
			high_performance: true,
		}
	}
}

/// Everything the graph component needs for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphScene {
	/// Graph as delivered by the data layer, before sampling.
	pub data: GraphData,
	/// Ecosystem or neighborhood view.
	pub mode: GraphMode,
	/// Sampling and animation knobs.
	pub options: LayoutOptions,
}
