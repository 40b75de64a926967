use leptos::prelude::*;
use log::error;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::charts::ChartData;
use crate::charts::canvas::draw_chart;

const FALLBACK_WIDTH: i32 = 600;

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// A titled chart card; redraws whenever `data` changes.
#[component]
pub fn ChartCanvas(
	#[prop(into)] title: String,
	#[prop(into)] data: Signal<ChartData>,
	#[prop(default = 320)] height: u32,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let name = title.clone();

	Effect::new(move |_| {
		let chart = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let width = canvas
			.parent_element()
			.map(|p| p.client_width())
			.filter(|w| *w > 0)
			.unwrap_or(FALLBACK_WIDTH);
		canvas.set_width(width as u32);
		canvas.set_height(height);
		match context_2d(&canvas) {
			Some(ctx) => draw_chart(&ctx, &chart, width as f64, height as f64),
			None => error!("Chart \"{}\" has no 2d context", name),
		}
	});

	view! {
		<div class="chart-card" class:sample=move || data.with(|d| d.sample)>
			<h3>{title}</h3>
			<div class="chart-body">
				<canvas node_ref=canvas_ref></canvas>
			</div>
		</div>
	}
}
