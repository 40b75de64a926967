use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent,
};

use super::render;
use super::state::ForceGraphState;
use super::types::GraphScene;
use crate::api::RequestGeneration;
use crate::config::{AppConfig, RetryPolicy};
use crate::error::GraphError;
use crate::ready::{NotReady, await_ready};

pub const DEFAULT_WIDTH: f64 = 1000.0;
pub const GRAPH_HEIGHT: f64 = 700.0;

/// Hover card contents, positioned relative to the graph container.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	/// Company id and role or connection count, one item per line.
	pub text: String,
	/// Left offset in pixels.
	pub x: f64,
	/// Top offset in pixels.
	pub y: f64,
}

/// Callbacks a surface reports user interaction through.
#[derive(Clone)]
pub struct GraphHooks {
	/// A node was clicked; receives its company id.
	pub on_select: Rc<dyn Fn(String)>,
	/// The hover card changed; `None` hides it.
	pub on_hover: Rc<dyn Fn(Option<Tooltip>)>,
}

impl GraphHooks {
	/// Hooks that ignore every event.
	pub fn noop() -> Self {
		Self {
			on_select: Rc::new(|_| {}),
			on_hover: Rc::new(|_| {}),
		}
	}
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Animation-frame scheduler that goes idle once nothing moves.
///
/// Input handlers call [`FrameLoop::wake`] to get the next frame drawn.
#[derive(Clone, Default)]
struct FrameLoop {
	callback: FrameCallback,
	pending: Rc<Cell<Option<i32>>>,
	dirty: Rc<Cell<bool>>,
}

impl FrameLoop {
	fn wake(&self) {
		self.dirty.set(true);
		if self.pending.get().is_none() {
			self.schedule();
		}
	}

	fn schedule(&self) {
		if let Some(cb) = self.callback.borrow().as_ref() {
			self.pending.set(request_frame(cb));
		}
	}

	fn is_scheduled(&self) -> bool {
		self.pending.get().is_some()
	}

	fn stop(&self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.callback.borrow_mut().take();
	}
}

/// The single drawing surface living inside the graph container.
///
/// Mounting clears the container first; dropping stops the frame loop and
/// detaches listeners.
pub struct GraphSurface {
	canvas: HtmlCanvasElement,
	state: Rc<RefCell<ForceGraphState>>,
	frames: FrameLoop,
	mouse_listeners: Vec<(&'static str, Closure<dyn FnMut(MouseEvent)>)>,
	wheel_listener: Option<Closure<dyn FnMut(WheelEvent)>>,
	resize_listener: Option<Closure<dyn FnMut()>>,
}

impl GraphSurface {
	/// Replaces whatever `container` holds with a new canvas drawing `scene`.
	pub fn mount(
		container: &Element,
		scene: &GraphScene,
		hooks: GraphHooks,
	) -> Result<Self, GraphError> {
		container.set_inner_html("");

		let document = container
			.owner_document()
			.ok_or_else(|| GraphError::Dom("container has no document".into()))?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| GraphError::Dom("created element is not a canvas".into()))?;
		let width = match container.client_width() {
			w if w > 0 => w as f64,
			_ => DEFAULT_WIDTH,
		};
		canvas.set_width(width as u32);
		canvas.set_height(GRAPH_HEIGHT as u32);
		canvas.set_class_name("force-graph-canvas");
		let style = HtmlElement::style(&canvas);
		style.set_property("display", "block")?;
		style.set_property("cursor", "grab")?;
		container.append_child(&canvas)?;

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or_else(|| GraphError::Dom("2d context unavailable".into()))?
			.dyn_into()
			.map_err(|_| GraphError::Dom("unexpected context type".into()))?;

		let state = ForceGraphState::new(scene, width, GRAPH_HEIGHT);
		info!(
			"Graph mounted with {} nodes and {} links",
			state.nodes.len(),
			state.links.len()
		);
		render::render(&state, &ctx);

		let mut surface = Self {
			canvas,
			state: Rc::new(RefCell::new(state)),
			frames: FrameLoop::default(),
			mouse_listeners: Vec::new(),
			wheel_listener: None,
			resize_listener: None,
		};
		surface.listen(hooks)?;
		surface.start_frames(ctx);
		Ok(surface)
	}

	/// Nodes kept after sampling.
	pub fn node_count(&self) -> usize {
		self.state.borrow().nodes.len()
	}

	/// Links kept after sampling.
	pub fn link_count(&self) -> usize {
		self.state.borrow().links.len()
	}

	/// Whether another animation frame is queued.
	pub fn is_animating(&self) -> bool {
		self.frames.is_scheduled()
	}

	fn listen(&mut self, hooks: GraphHooks) -> Result<(), GraphError> {
		let (state, canvas) = (self.state.clone(), self.canvas.clone());
		let (frames_md, hooks_md) = (self.frames.clone(), hooks.clone());
		self.add_mouse("mousedown", move |ev| {
			let (x, y) = local_position(&canvas, &ev);
			state.borrow_mut().press(x, y);
			(hooks_md.on_hover)(None);
			frames_md.wake();
		})?;

		let (state, canvas) = (self.state.clone(), self.canvas.clone());
		let (frames_mm, hooks_mm) = (self.frames.clone(), hooks.clone());
		self.add_mouse("mousemove", move |ev| {
			let (x, y) = local_position(&canvas, &ev);
			let tooltip = {
				let mut s = state.borrow_mut();
				if s.pointer_move(x, y) {
					frames_mm.wake();
				}
				match s.hover.node {
					Some(idx) if !s.drag.active => s.tooltip_text(idx).map(|text| Tooltip {
						text,
						x: x + 10.0,
						y: y - 28.0,
					}),
					_ => None,
				}
			};
			(hooks_mm.on_hover)(tooltip);
		})?;

		let state = self.state.clone();
		let (frames_mu, hooks_mu) = (self.frames.clone(), hooks.clone());
		self.add_mouse("mouseup", move |_| {
			let clicked = state.borrow_mut().release();
			frames_mu.wake();
			if let Some(id) = clicked {
				debug!("Pivoting to company {}", id);
				(hooks_mu.on_select)(id);
			}
		})?;

		let state = self.state.clone();
		let frames_ml = self.frames.clone();
		self.add_mouse("mouseleave", move |_| {
			state.borrow_mut().leave();
			(hooks.on_hover)(None);
			frames_ml.wake();
		})?;

		let (state, canvas) = (self.state.clone(), self.canvas.clone());
		let frames_wh = self.frames.clone();
		let wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |ev: WheelEvent| {
			ev.prevent_default();
			let (x, y) = local_position(&canvas, &ev);
			state.borrow_mut().zoom_at(x, y, ev.delta_y());
			frames_wh.wake();
		});
		self.canvas
			.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;
		self.wheel_listener = Some(wheel);

		let (state, canvas, frames) =
			(self.state.clone(), self.canvas.clone(), self.frames.clone());
		let resize = Closure::<dyn FnMut()>::new(move || {
			let Some(width) = canvas
				.parent_element()
				.map(|p| p.client_width())
				.filter(|w| *w > 0)
			else {
				return;
			};
			canvas.set_width(width as u32);
			state.borrow_mut().resize(width as f64, GRAPH_HEIGHT);
			frames.wake();
		});
		if let Some(window) = web_sys::window() {
			window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
		}
		self.resize_listener = Some(resize);
		Ok(())
	}

	fn add_mouse(
		&mut self,
		event: &'static str,
		handler: impl FnMut(MouseEvent) + 'static,
	) -> Result<(), GraphError> {
		let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
		self.canvas
			.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
		self.mouse_listeners.push((event, closure));
		Ok(())
	}

	fn start_frames(&self, ctx: CanvasRenderingContext2d) {
		let (state, frames) = (self.state.clone(), self.frames.clone());
		*self.frames.callback.borrow_mut() = Some(Closure::new(move || {
			frames.pending.set(None);
			let keep_going = {
				let mut s = state.borrow_mut();
				let moved = s.tick();
				if moved || frames.dirty.replace(false) {
					render::render(&s, &ctx);
				}
				s.should_tick()
			};
			if keep_going {
				frames.schedule();
			}
		}));
		if self.state.borrow().should_tick() {
			self.frames.schedule();
		}
	}
}

impl Drop for GraphSurface {
	fn drop(&mut self) {
		self.frames.stop();
		for (event, closure) in self.mouse_listeners.drain(..) {
			let _ = self
				.canvas
				.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
		}
		if let Some(closure) = self.wheel_listener.take() {
			let _ = self
				.canvas
				.remove_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
		}
		if let (Some(closure), Some(window)) = (self.resize_listener.take(), web_sys::window()) {
			let _ = window
				.remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
		}
		self.canvas.remove();
	}
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

fn local_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Looks the graph container up by id.
pub fn find_container(id: &str) -> Option<Element> {
	web_sys::window()?.document()?.get_element_by_id(id)
}

/// Waits for the container per `policy`.
pub async fn wait_for_container(
	container_id: &str,
	policy: &RetryPolicy,
) -> Result<Element, GraphError> {
	await_ready(
		|| find_container(container_id),
		policy,
		gloo_timers::future::sleep,
	)
	.await
	.map_err(|NotReady { attempts }| GraphError::ContainerNotFound {
		id: container_id.to_string(),
		attempts,
	})
}

/// Waits for the container, then mounts a fresh surface into it.
///
/// Yields `Ok(None)` without touching the container when `is_current`
/// reports the pass was superseded during the wait.
pub async fn mount_when_ready(
	container_id: &str,
	scene: &GraphScene,
	hooks: GraphHooks,
	policy: &RetryPolicy,
	is_current: impl Fn() -> bool,
) -> Result<Option<GraphSurface>, GraphError> {
	let container = wait_for_container(container_id, policy).await?;
	if !is_current() {
		return Ok(None);
	}
	GraphSurface::mount(&container, scene, hooks).map(Some)
}

/// Interactive force-directed graph bound to a scene signal.
///
/// `None` clears the drawing; `message` overlays page-level status text.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] scene: Signal<Option<GraphScene>>,
	#[prop(into)] on_select: Callback<String>,
	#[prop(into, optional)] message: Signal<Option<String>>,
) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let container_id = config.graph_container_id.clone();
	let surface = StoredValue::new_local(None::<GraphSurface>);
	let tooltip = RwSignal::new(None::<Tooltip>);
	let render_error = RwSignal::new(None::<&'static str>);
	let passes = RequestGeneration::default();

	let effect_id = container_id.clone();
	Effect::new(move |_| {
		let scene = scene.get();
		let ticket = passes.begin();
		let passes = passes.clone();
		let id = effect_id.clone();
		let mut policy = config.retry.clone();
		if surface.with_value(|s| s.is_some()) {
			policy.initial_delay = Duration::ZERO;
		}

		spawn_local(async move {
			tooltip.set(None);
			let Some(scene) = scene else {
				surface.update_value(|s| *s = None);
				if let Some(container) = find_container(&id) {
					container.set_inner_html("");
				}
				return;
			};

			let hooks = GraphHooks {
				on_select: Rc::new(move |company| on_select.run(company)),
				on_hover: Rc::new(move |tip| tooltip.set(tip)),
			};
			surface.update_value(|s| *s = None);
			let current = || passes.is_current(ticket);
			match mount_when_ready(&id, &scene, hooks, &policy, current).await {
				Ok(Some(new_surface)) => {
					surface.try_update_value(|s| *s = Some(new_surface));
					render_error.set(None);
				}
				Ok(None) => debug!("Discarding superseded graph render"),
				Err(err) if !passes.is_current(ticket) => {
					debug!("Ignoring failure of superseded graph render: {}", err);
				}
				Err(err) => {
					error!("Graph render failed: {}", err);
					render_error.set(Some(err.user_message()));
				}
			}
		});
	});

	on_cleanup(move || {
		surface.try_update_value(|s| *s = None);
	});

	view! {
		<div class="graph-wrapper">
			<div id=container_id class="graph-surface"></div>
			{move || {
				message
					.get()
					.or_else(|| render_error.get().map(String::from))
					.map(|text| view! { <div class="graph-message">{text}</div> })
			}}
			{move || {
				tooltip
					.get()
					.map(|tip| {
						view! {
							<div
								class="graph-tooltip"
								style=format!("left: {}px; top: {}px;", tip.x, tip.y)
							>
								{tip.text}
							</div>
						}
					})
			}}
		</div>
	}
}
