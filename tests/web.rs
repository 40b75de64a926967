//! Browser tests for the graph surface. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use value_chain_dashboard::{
	GraphData, GraphHooks, GraphLink, GraphMode, GraphNode, GraphScene, GraphSurface,
	LayoutOptions, RetryPolicy, find_container, mount_when_ready,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn container(id: &str) -> web_sys::Element {
	let document = web_sys::window().unwrap().document().unwrap();
	let div = document.create_element("div").unwrap();
	div.set_id(id);
	document.body().unwrap().append_child(&div).unwrap();
	div
}

fn scene(high_performance: bool) -> GraphScene {
	GraphScene {
		data: GraphData {
			nodes: vec![GraphNode::new("A"), GraphNode::new("B"), GraphNode::new("C")],
			links: vec![GraphLink::new("A", "B", 2.0), GraphLink::new("B", "C", 1.0)],
		},
		mode: GraphMode::Ecosystem,
		options: LayoutOptions {
			limit: 100,
			high_performance,
		},
	}
}

fn immediate() -> RetryPolicy {
	RetryPolicy {
		initial_delay: Duration::ZERO,
		max_retries: 0,
		step: Duration::ZERO,
	}
}

#[wasm_bindgen_test]
fn finds_container_once_attached() {
	assert!(find_container("late-container").is_none());
	container("late-container");
	assert!(find_container("late-container").is_some());
}

#[wasm_bindgen_test]
fn remounting_keeps_a_single_canvas() {
	let div = container("remount-container");
	let first = GraphSurface::mount(&div, &scene(true), GraphHooks::noop()).unwrap();
	assert_eq!(first.node_count(), 3);
	assert_eq!(first.link_count(), 2);
	let second = GraphSurface::mount(&div, &scene(true), GraphHooks::noop()).unwrap();
	drop(first);
	assert_eq!(div.child_element_count(), 1);
	drop(second);
	assert_eq!(div.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn settled_layout_stops_requesting_frames() {
	let div = container("idle-container");
	let settled = GraphSurface::mount(&div, &scene(true), GraphHooks::noop()).unwrap();
	assert!(!settled.is_animating());
	drop(settled);

	let live = GraphSurface::mount(&div, &scene(false), GraphHooks::noop()).unwrap();
	assert!(live.is_animating());
	drop(live);
	assert_eq!(div.child_element_count(), 0);
}

#[wasm_bindgen_test]
async fn superseded_pass_leaves_the_current_surface_in_place() {
	let div = container("superseded-container");
	let current = GraphSurface::mount(&div, &scene(true), GraphHooks::noop()).unwrap();
	let canvas = div.first_element_child().unwrap();

	let stale = mount_when_ready(
		"superseded-container",
		&scene(true),
		GraphHooks::noop(),
		&immediate(),
		|| false,
	)
	.await
	.unwrap();
	assert!(stale.is_none());
	assert_eq!(div.child_element_count(), 1);
	assert!(div.first_element_child().is_some_and(|c| c == canvas));

	let fresh = mount_when_ready(
		"superseded-container",
		&scene(true),
		GraphHooks::noop(),
		&immediate(),
		|| true,
	)
	.await
	.unwrap();
	assert!(fresh.is_some());
	assert_eq!(div.child_element_count(), 1);
	drop(current);
}
