use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{EDGE_OPACITY, ForceGraphState, HOVER_STROKE, IDLE_STROKE};

const BACKGROUND: &str = "#ffffff";
const BORDER: &str = "#dddddd";
const LABEL_COLOR: &str = "#333333";

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.set_stroke_style_str(BORDER);
	ctx.set_line_width(1.0);
	ctx.stroke_rect(0.5, 0.5, state.width - 1.0, state.height - 1.0);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(EDGE_OPACITY);
	for link in &state.links {
		let (x1, y1) = state.position(link.source);
		let (x2, y2) = state.position(link.target);
		ctx.set_stroke_style_str(link.color);
		ctx.set_line_width(link.width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	for (idx, node) in state.nodes.iter().enumerate() {
		let (x, y) = state.position(idx);
		ctx.begin_path();
		let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.color);
		ctx.fill();

		let (stroke, width) = if state.is_hovered(idx) {
			(HOVER_STROKE, 2.0)
		} else {
			(IDLE_STROKE, 1.5)
		};
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(width);
		ctx.stroke();
	}
}

fn draw_labels(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font("bold 12px sans-serif");
	ctx.set_text_baseline("middle");
	for (idx, node) in state.nodes.iter().enumerate() {
		if let Some(label) = &node.label {
			let (x, y) = state.position(idx);
			let _ = ctx.fill_text(label, x + 12.0, y);
		}
	}
}
