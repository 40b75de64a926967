//! Force-directed value-chain graph: sampling, physics, interaction state and canvas drawing.

mod component;
mod render;
pub mod sampling;
pub mod simulation;
pub(crate) mod state;
mod types;

pub use component::{
	ForceGraphCanvas, GraphHooks, GraphSurface, Tooltip, find_container, mount_when_ready,
	wait_for_container,
};
pub use types::{
	GraphData, GraphLink, GraphMode, GraphNode, GraphScene, LayoutOptions, NodeRole, RelationKind,
};
