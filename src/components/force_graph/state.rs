use super::sampling::{self, SampledGraph};
use super::simulation::{DRAG_ALPHA_TARGET, ForceParams, Simulation};
use super::types::{GraphMode, GraphScene, NodeRole, RelationKind};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Nodes with more connections than this are drawn as hubs.
pub const HUB_DEGREE: u32 = 10;
pub const HUB_COLOR: &str = "#ec0000";
pub const CENTRAL_COLOR: &str = "#ff4b4b";
pub const CLIENT_COLOR: &str = "#28a745";
pub const SUPPLIER_COLOR: &str = "#007bff";
pub const OTHER_COLOR: &str = "#666666";
pub const EDGE_COLOR: &str = "#999999";
pub const EDGE_OPACITY: f64 = 0.6;
pub const HOVER_STROKE: &str = "#ec0000";
pub const IDLE_STROKE: &str = "#ffffff";

/// Extra world-space slack around a node that still counts as a hit.
pub const HIT_SLACK: f64 = 4.0;
/// Pointer travel (screen px) below which a press-release is a click.
pub const CLICK_SLOP: f64 = 3.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub color: String,
	pub radius: f64,
	pub degree: u32,
	pub role: Option<NodeRole>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkInfo {
	pub source: usize,
	pub target: usize,
	pub width: f64,
	pub color: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
}

/// Layout and interaction state of one render pass.
pub struct ForceGraphState {
	pub nodes: Vec<NodeInfo>,
	pub links: Vec<LinkInfo>,
	pub simulation: Simulation,
	pub mode: GraphMode,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	/// Whether the simulation keeps ticking on animation frames.
	pub running: bool,
}

impl ForceGraphState {
	pub fn new(scene: &GraphScene, width: f64, height: f64) -> Self {
		let high_performance = scene.options.high_performance;
		let (sampled, params, pre_ticks) = match &scene.mode {
			GraphMode::Ecosystem => (
				sampling::top_by_degree(
					&scene.data.nodes,
					&scene.data.links,
					scene.options.limit,
					high_performance,
				),
				ForceParams::ECOSYSTEM,
				if high_performance { 100 } else { 50 },
			),
			GraphMode::Company { .. } => (
				sampling::whole(&scene.data.nodes, &scene.data.links),
				ForceParams::COMPANY,
				if high_performance { 120 } else { 60 },
			),
		};
		let SampledGraph { nodes, links } = sampled;

		let infos: Vec<NodeInfo> = nodes
			.iter()
			.map(|node| match &scene.mode {
				GraphMode::Ecosystem => NodeInfo {
					id: node.id.clone(),
					label: None,
					color: ecosystem_color(&node.id, node.degree).to_string(),
					radius: ((node.degree as f64).sqrt() + 3.0).clamp(3.0, 10.0),
					degree: node.degree,
					role: node.role,
				},
				GraphMode::Company { central } => {
					let role = if &node.id == central {
						Some(NodeRole::Central)
					} else {
						node.role.filter(|r| *r != NodeRole::Central)
					};
					NodeInfo {
						id: node.id.clone(),
						label: (role == Some(NodeRole::Central)).then(|| node.name.clone()),
						color: role_color(role).to_string(),
						radius: if role == Some(NodeRole::Central) { 12.0 } else { 6.0 },
						degree: node.degree,
						role,
					}
				}
			})
			.collect();

		let index_of = |id: &str| infos.iter().position(|n| n.id == id);
		let link_infos: Vec<LinkInfo> = links
			.iter()
			.filter_map(|link| {
				let (source, target) = (index_of(&link.source)?, index_of(&link.target)?);
				let (width, color) = match scene.mode {
					GraphMode::Ecosystem => (link.value.max(0.0).sqrt() / 500.0 + 1.0, EDGE_COLOR),
					GraphMode::Company { .. } => {
						let from_client = infos[source].role == Some(NodeRole::Client)
							|| link.kind == Some(RelationKind::Client);
						(2.0, if from_client { CLIENT_COLOR } else { SUPPLIER_COLOR })
					}
				};
				Some(LinkInfo {
					source,
					target,
					width,
					color,
				})
			})
			.collect();

		let mut simulation = Simulation::new(
			infos.len(),
			link_infos.iter().map(|l| (l.source, l.target)).collect(),
			params,
			(width / 2.0, height / 2.0),
		);
		simulation.tick_n(pre_ticks);

		Self {
			nodes: infos,
			links: link_infos,
			simulation,
			mode: scene.mode.clone(),
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			running: !high_performance,
		}
	}

	pub fn position(&self, idx: usize) -> (f64, f64) {
		self.simulation
			.bodies()
			.get(idx)
			.map(|b| (b.x, b.y))
			.unwrap_or_default()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(idx, node)| {
				let (x, y) = self.position(*idx);
				let (dx, dy) = (x - gx, y - gy);
				(dx * dx + dy * dy).sqrt() <= node.radius + HIT_SLACK
			})
			.map(|(idx, _)| idx)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hover.node = node;
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
	}

	pub fn tooltip_text(&self, idx: usize) -> Option<String> {
		let node = self.nodes.get(idx)?;
		Some(match self.mode {
			GraphMode::Ecosystem => format!("{}\nConexões: {}", node.id, node.degree),
			GraphMode::Company { .. } => match node.role {
				Some(NodeRole::Central) => format!("{} (Empresa focal)", node.id),
				Some(NodeRole::Client) => format!("{} (Cliente)", node.id),
				Some(NodeRole::Supplier) => format!("{} (Fornecedor)", node.id),
				None => node.id.clone(),
			},
		})
	}

	/// Pointer down: grab the node under the pointer, or start panning.
	pub fn press(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			let (nx, ny) = self.position(idx);
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				moved: false,
			};
			self.simulation.pin(idx, nx, ny);
			self.simulation.set_alpha_target(DRAG_ALPHA_TARGET);
			self.simulation.reheat();
			self.running = true;
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
				moved: false,
			};
		}
	}

	/// Pointer move; returns true when a redraw is needed.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				if travel(self.drag.start_x, self.drag.start_y, x, y) > CLICK_SLOP {
					self.drag.moved = true;
				}
				let (gx, gy) = self.screen_to_graph(x, y);
				self.simulation.pin(idx, gx, gy);
			}
			return true;
		}
		if self.pan.active {
			if travel(self.pan.start_x, self.pan.start_y, x, y) > CLICK_SLOP {
				self.pan.moved = true;
			}
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
			return true;
		}
		let hovered = self.node_at_position(x, y);
		let changed = hovered != self.hover.node;
		self.set_hover(hovered);
		changed
	}

	/// Pointer up. In the ecosystem view a click on a node yields its id.
	pub fn release(&mut self) -> Option<String> {
		let mut clicked = None;
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				self.simulation.unpin(idx);
				self.simulation.set_alpha_target(0.0);
				if !self.drag.moved && self.mode == GraphMode::Ecosystem {
					clicked = self.nodes.get(idx).map(|n| n.id.clone());
				}
			}
		}
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	pub fn leave(&mut self) {
		if let Some(idx) = self.drag.node_idx {
			self.simulation.unpin(idx);
			self.simulation.set_alpha_target(0.0);
		}
		self.drag = DragState::default();
		self.pan.active = false;
		self.set_hover(None);
	}

	/// Zooms about the pointer, one step per wheel event.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn should_tick(&self) -> bool {
		self.running && self.simulation.is_active()
	}

	/// Advances one frame; returns whether positions changed.
	pub fn tick(&mut self) -> bool {
		if !self.should_tick() {
			return false;
		}
		self.simulation.tick();
		true
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation.resize((width / 2.0, height / 2.0));
	}
}

fn travel(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
	((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
}

fn ecosystem_color(id: &str, degree: u32) -> &'static str {
	if degree > HUB_DEGREE {
		return HUB_COLOR;
	}
	let key = id.chars().next().map(|c| c as usize).unwrap_or(0);
	COLORS[key % COLORS.len()]
}

fn role_color(role: Option<NodeRole>) -> &'static str {
	match role {
		Some(NodeRole::Central) => CENTRAL_COLOR,
		Some(NodeRole::Client) => CLIENT_COLOR,
		Some(NodeRole::Supplier) => SUPPLIER_COLOR,
		None => OTHER_COLOR,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode, LayoutOptions};

	fn star(center: &str, leaves: usize) -> GraphData {
		let mut nodes = vec![GraphNode::new(center)];
		let mut links = Vec::new();
		for i in 0..leaves {
			let id = format!("{center}-{i}");
			nodes.push(GraphNode::new(id.clone()));
			links.push(GraphLink::new(center, id, 4.0));
		}
		GraphData { nodes, links }
	}

	fn ecosystem(data: GraphData, limit: usize, high_performance: bool) -> ForceGraphState {
		let scene = GraphScene {
			data,
			mode: GraphMode::Ecosystem,
			options: LayoutOptions {
				limit,
				high_performance,
			},
		};
		ForceGraphState::new(&scene, 1000.0, 700.0)
	}

	fn screen_of(state: &ForceGraphState, idx: usize) -> (f64, f64) {
		let (x, y) = state.position(idx);
		(
			x * state.transform.k + state.transform.x,
			y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn ecosystem_render_respects_caps() {
		let state = ecosystem(star("H", 30), 20, true);
		assert_eq!(state.nodes.len(), 10);
		assert_eq!(state.nodes[0].id, "H");
		assert_eq!(state.nodes[0].color, HUB_COLOR);
		assert_eq!(state.nodes[0].radius, 10.0_f64.min(30f64.sqrt() + 3.0));
		assert!(state.links.iter().all(|l| l.source < 10 && l.target < 10));
		assert!(!state.running);

		let state = ecosystem(star("H", 30), 20, false);
		assert_eq!(state.nodes.len(), 20);
		assert!(state.running);
	}

	#[test]
	fn company_view_labels_only_the_center() {
		let mut data = star("X", 0);
		data.nodes.push(GraphNode::new("Y").with_role(NodeRole::Client));
		data.nodes.push(GraphNode::new("Z").with_role(NodeRole::Supplier));
		data.links.push(GraphLink {
			kind: Some(RelationKind::Client),
			..GraphLink::new("Y", "X", 1.0)
		});
		data.links.push(GraphLink {
			kind: Some(RelationKind::Supplier),
			..GraphLink::new("X", "Z", 1.0)
		});
		let scene = GraphScene {
			data,
			mode: GraphMode::Company {
				central: "X".into(),
			},
			options: LayoutOptions::default(),
		};
		let state = ForceGraphState::new(&scene, 800.0, 600.0);
		let labels: Vec<_> = state.nodes.iter().filter_map(|n| n.label.clone()).collect();
		assert_eq!(labels, vec!["X".to_string()]);
		assert_eq!(state.nodes[0].color, CENTRAL_COLOR);
		assert_eq!(state.nodes[0].radius, 12.0);
		assert_eq!(state.links[0].color, CLIENT_COLOR);
		assert_eq!(state.links[1].color, SUPPLIER_COLOR);
		assert_eq!(state.tooltip_text(1).as_deref(), Some("Y (Cliente)"));
		assert_eq!(state.tooltip_text(0).as_deref(), Some("X (Empresa focal)"));
	}

	#[test]
	fn click_on_node_pivots_but_drag_does_not() {
		let mut state = ecosystem(star("H", 3), 10, true);
		let (x, y) = screen_of(&state, 0);
		state.press(x, y);
		assert_eq!(state.release(), Some("H".to_string()));

		let (x, y) = screen_of(&state, 0);
		state.press(x, y);
		state.pointer_move(x + 40.0, y + 40.0);
		assert_eq!(state.release(), None);
	}

	#[test]
	fn dragging_pins_then_releases() {
		let mut state = ecosystem(star("H", 3), 10, true);
		let (x, y) = screen_of(&state, 0);
		state.press(x, y);
		assert!(state.should_tick());
		state.pointer_move(x + 50.0, y);
		let (gx, gy) = state.screen_to_graph(x + 50.0, y);
		state.tick();
		assert_eq!(state.position(0), (gx, gy));
		state.release();
		assert!(state.simulation.bodies()[0].pin.is_none());
	}

	#[test]
	fn hover_reports_degree() {
		let mut state = ecosystem(star("H", 3), 10, false);
		let (x, y) = screen_of(&state, 0);
		assert!(state.pointer_move(x, y));
		assert!(state.is_hovered(0));
		assert_eq!(state.tooltip_text(0).as_deref(), Some("H\nConexões: 3"));
		state.leave();
		assert_eq!(state.hover.node, None);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = ecosystem(star("H", 1), 10, true);
		for _ in 0..100 {
			state.zoom_at(10.0, 10.0, -1.0);
		}
		assert_eq!(state.transform.k, MAX_ZOOM);
		for _ in 0..200 {
			state.zoom_at(10.0, 10.0, 1.0);
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn empty_scene_is_inert() {
		let mut state = ecosystem(GraphData::default(), 100, false);
		assert!(state.nodes.is_empty());
		assert_eq!(state.node_at_position(0.0, 0.0), None);
		state.tick();
		assert_eq!(state.release(), None);
	}
}
