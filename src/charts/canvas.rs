//! Canvas 2D drawing for [`ChartData`].

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{ChartData, ChartKind, Dataset};
use crate::format::format_number;

const BACKGROUND: &str = "#ffffff";
const GRID: &str = "#e8eaed";
const TEXT: &str = "#5f6368";
const FONT: &str = "11px sans-serif";
const EMPTY_TEXT: &str = "Sem dados para exibir";
const TICKS: usize = 5;

/// Plot area inside the canvas, leaving room for axis labels and the legend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
	pub left: f64,
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
}

impl Frame {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			left: 70.0,
			top: 36.0,
			right: (width - 16.0).max(71.0),
			bottom: (height - 40.0).max(37.0),
		}
	}

	pub fn width(&self) -> f64 {
		self.right - self.left
	}

	pub fn height(&self) -> f64 {
		self.bottom - self.top
	}
}

/// Linear value range mapped onto a pixel span.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axis {
	pub min: f64,
	pub max: f64,
}

impl Axis {
	/// Covers every value and zero; a flat range is widened by one.
	pub fn fit(values: impl IntoIterator<Item = f64>) -> Self {
		let (mut min, mut max) = (0.0_f64, 0.0_f64);
		for v in values.into_iter().filter(|v| v.is_finite()) {
			min = min.min(v);
			max = max.max(v);
		}
		if (max - min).abs() < f64::EPSILON {
			max = min + 1.0;
		}
		Self { min, max }
	}

	/// Position of `value` between `start` (at `min`) and `end` (at `max`).
	pub fn project(&self, value: f64, start: f64, end: f64) -> f64 {
		start + (value - self.min) / (self.max - self.min) * (end - start)
	}

	pub fn ticks(&self, count: usize) -> Vec<f64> {
		let count = count.max(1);
		(0..=count)
			.map(|i| self.min + (self.max - self.min) * i as f64 / count as f64)
			.collect()
	}
}

/// Center of category `idx` out of `count` across `[start, end]`.
pub fn band_center(idx: usize, count: usize, start: f64, end: f64) -> f64 {
	let band = (end - start) / count.max(1) as f64;
	start + band * (idx as f64 + 0.5)
}

/// Abbreviated tick label: `1,2 mi`, `35 mil`, `900`.
pub fn short_number(value: f64) -> String {
	let abs = value.abs();
	if abs >= 1_000_000.0 {
		format!("{:.1} mi", value / 1_000_000.0).replace('.', ",")
	} else if abs >= 1_000.0 {
		format!("{:.0} mil", value / 1_000.0)
	} else {
		format_number(value)
	}
}

pub fn draw_chart(ctx: &CanvasRenderingContext2d, chart: &ChartData, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.set_font(FONT);

	if chart.is_empty() {
		ctx.set_fill_style_str(TEXT);
		ctx.set_text_align("center");
		let _ = ctx.fill_text(EMPTY_TEXT, width / 2.0, height / 2.0);
		return;
	}

	let frame = Frame::new(width, height);
	match chart.kind {
		ChartKind::Line => draw_lines(ctx, chart, frame),
		ChartKind::Bar => draw_bars(ctx, chart, frame),
		ChartKind::HorizontalBar => draw_horizontal_bars(ctx, chart, frame),
		ChartKind::Pie => draw_pie(ctx, chart, width, height),
		ChartKind::Scatter => draw_scatter(ctx, chart, frame),
	}
	if chart.kind != ChartKind::Pie {
		draw_legend(ctx, &chart.datasets, width);
	}
}

fn value_axis(chart: &ChartData) -> Axis {
	Axis::fit(chart.datasets.iter().flat_map(|d| d.values.iter().flatten().copied()))
}

fn draw_value_grid(ctx: &CanvasRenderingContext2d, axis: Axis, frame: Frame) {
	ctx.set_stroke_style_str(GRID);
	ctx.set_line_width(1.0);
	ctx.set_fill_style_str(TEXT);
	ctx.set_text_align("right");
	ctx.set_text_baseline("middle");
	for tick in axis.ticks(TICKS) {
		let y = axis.project(tick, frame.bottom, frame.top);
		ctx.begin_path();
		ctx.move_to(frame.left, y);
		ctx.line_to(frame.right, y);
		ctx.stroke();
		let _ = ctx.fill_text(&short_number(tick), frame.left - 6.0, y);
	}
}

fn draw_category_labels(ctx: &CanvasRenderingContext2d, labels: &[String], frame: Frame) {
	ctx.set_fill_style_str(TEXT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	let every = (labels.len() / 12).max(1);
	for (idx, label) in labels.iter().enumerate().step_by(every) {
		let x = band_center(idx, labels.len(), frame.left, frame.right);
		let _ = ctx.fill_text(label, x, frame.bottom + 8.0);
	}
}

fn set_dash(ctx: &CanvasRenderingContext2d, dashed: bool) {
	let segments = if dashed {
		js_sys::Array::of2(&JsValue::from_f64(5.0), &JsValue::from_f64(5.0))
	} else {
		js_sys::Array::new()
	};
	let _ = ctx.set_line_dash(&segments);
}

fn draw_lines(ctx: &CanvasRenderingContext2d, chart: &ChartData, frame: Frame) {
	let axis = value_axis(chart);
	draw_value_grid(ctx, axis, frame);
	draw_category_labels(ctx, &chart.labels, frame);

	let count = chart.labels.len();
	for dataset in &chart.datasets {
		ctx.set_stroke_style_str(&dataset.color);
		ctx.set_line_width(3.0);
		set_dash(ctx, dataset.dashed);
		ctx.begin_path();
		let mut pen_down = false;
		for (idx, value) in dataset.values.iter().enumerate() {
			let Some(value) = value else {
				pen_down = false;
				continue;
			};
			let x = band_center(idx, count, frame.left, frame.right);
			let y = axis.project(*value, frame.bottom, frame.top);
			if pen_down {
				ctx.line_to(x, y);
			} else {
				ctx.move_to(x, y);
				pen_down = true;
			}
		}
		ctx.stroke();
		set_dash(ctx, false);

		ctx.set_fill_style_str(&dataset.color);
		for (idx, value) in dataset.values.iter().enumerate() {
			if let Some(value) = value {
				let x = band_center(idx, count, frame.left, frame.right);
				let y = axis.project(*value, frame.bottom, frame.top);
				ctx.begin_path();
				let _ = ctx.arc(x, y, 4.0, 0.0, 2.0 * PI);
				ctx.fill();
			}
		}
	}
}

fn draw_bars(ctx: &CanvasRenderingContext2d, chart: &ChartData, frame: Frame) {
	let axis = value_axis(chart);
	draw_value_grid(ctx, axis, frame);
	draw_category_labels(ctx, &chart.labels, frame);

	let count = chart.labels.len().max(1);
	let band = frame.width() / count as f64;
	let per_set = band * 0.7 / chart.datasets.len().max(1) as f64;
	let zero = axis.project(0.0, frame.bottom, frame.top);
	for (set_idx, dataset) in chart.datasets.iter().enumerate() {
		for (idx, value) in dataset.values.iter().enumerate() {
			let Some(value) = value else { continue };
			let x = frame.left + band * idx as f64 + band * 0.15 + per_set * set_idx as f64;
			let y = axis.project(*value, frame.bottom, frame.top);
			ctx.set_fill_style_str(dataset.color_at(idx));
			ctx.fill_rect(x, y.min(zero), per_set, (zero - y).abs());
		}
	}
}

fn draw_horizontal_bars(ctx: &CanvasRenderingContext2d, chart: &ChartData, frame: Frame) {
	let Some(dataset) = chart.datasets.first() else {
		return;
	};
	let frame = Frame {
		left: frame.left + 40.0,
		..frame
	};
	let axis = value_axis(chart);
	let count = chart.labels.len().max(1);
	let band = frame.height() / count as f64;

	ctx.set_text_baseline("middle");
	for (idx, value) in dataset.values.iter().enumerate() {
		let y = frame.top + band * idx as f64;
		if let Some(label) = chart.labels.get(idx) {
			ctx.set_fill_style_str(TEXT);
			ctx.set_text_align("right");
			let _ = ctx.fill_text(label, frame.left - 6.0, y + band / 2.0);
		}
		if let Some(value) = value {
			let end = axis.project(*value, frame.left, frame.right);
			ctx.set_fill_style_str(dataset.color_at(idx));
			ctx.fill_rect(frame.left, y + band * 0.15, end - frame.left, band * 0.7);
			ctx.set_fill_style_str(TEXT);
			ctx.set_text_align("left");
			let _ = ctx.fill_text(&format_number(*value), end + 4.0, y + band / 2.0);
		}
	}
}

fn draw_pie(ctx: &CanvasRenderingContext2d, chart: &ChartData, width: f64, height: f64) {
	let Some(dataset) = chart.datasets.first() else {
		return;
	};
	let total: f64 = dataset.values.iter().flatten().filter(|v| **v > 0.0).sum();
	if total <= 0.0 {
		return;
	}
	let radius = (width * 0.55).min(height) / 2.0 - 12.0;
	let (cx, cy) = (radius + 16.0, height / 2.0);

	let mut angle = -PI / 2.0;
	for (idx, value) in dataset.values.iter().enumerate() {
		let Some(value) = value.filter(|v| *v > 0.0) else {
			continue;
		};
		let sweep = value / total * 2.0 * PI;
		ctx.begin_path();
		ctx.move_to(cx, cy);
		let _ = ctx.arc(cx, cy, radius.max(1.0), angle, angle + sweep);
		ctx.close_path();
		ctx.set_fill_style_str(dataset.color_at(idx));
		ctx.fill();
		ctx.set_stroke_style_str(BACKGROUND);
		ctx.set_line_width(2.0);
		ctx.stroke();
		angle += sweep;
	}

	let legend_x = cx + radius + 24.0;
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	for (idx, label) in chart.labels.iter().enumerate() {
		let y = 20.0 + idx as f64 * 18.0;
		ctx.set_fill_style_str(dataset.color_at(idx));
		ctx.fill_rect(legend_x, y - 5.0, 10.0, 10.0);
		ctx.set_fill_style_str(TEXT);
		let _ = ctx.fill_text(label, legend_x + 16.0, y);
	}
}

fn draw_scatter(ctx: &CanvasRenderingContext2d, chart: &ChartData, frame: Frame) {
	let x_axis = Axis::fit(chart.datasets.iter().flat_map(|d| d.points.iter().map(|p| p.0)));
	let y_axis = Axis::fit(chart.datasets.iter().flat_map(|d| d.points.iter().map(|p| p.1)));
	draw_value_grid(ctx, y_axis, frame);

	ctx.set_fill_style_str(TEXT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	for tick in x_axis.ticks(TICKS) {
		let x = x_axis.project(tick, frame.left, frame.right);
		let _ = ctx.fill_text(&short_number(tick), x, frame.bottom + 8.0);
	}

	for dataset in &chart.datasets {
		ctx.set_fill_style_str(&dataset.color);
		for (x, y) in &dataset.points {
			ctx.begin_path();
			let _ = ctx.arc(
				x_axis.project(*x, frame.left, frame.right),
				y_axis.project(*y, frame.bottom, frame.top),
				4.0,
				0.0,
				2.0 * PI,
			);
			ctx.fill();
		}
	}
}

fn draw_legend(ctx: &CanvasRenderingContext2d, datasets: &[Dataset], width: f64) {
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	let mut x = 16.0;
	let mut y = 14.0;
	for dataset in datasets.iter().filter(|d| !d.label.is_empty()) {
		let text_width = ctx
			.measure_text(&dataset.label)
			.map(|m| m.width())
			.unwrap_or(dataset.label.len() as f64 * 6.0);
		if x + text_width + 30.0 > width && x > 16.0 {
			x = 16.0;
			y += 16.0;
		}
		ctx.set_fill_style_str(&dataset.color);
		ctx.fill_rect(x, y - 5.0, 12.0, 10.0);
		ctx.set_fill_style_str(TEXT);
		let _ = ctx.fill_text(&dataset.label, x + 16.0, y);
		x += text_width + 34.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn axis_includes_zero_and_projects_linearly() {
		let axis = Axis::fit([10.0, 40.0]);
		assert_eq!(axis, Axis { min: 0.0, max: 40.0 });
		assert_eq!(axis.project(20.0, 100.0, 0.0), 50.0);
		assert_eq!(axis.ticks(4), vec![0.0, 10.0, 20.0, 30.0, 40.0]);
	}

	#[test]
	fn flat_and_negative_ranges() {
		assert_eq!(Axis::fit(std::iter::empty()), Axis { min: 0.0, max: 1.0 });
		let axis = Axis::fit([-5.0, f64::NAN, 5.0]);
		assert_eq!(axis, Axis { min: -5.0, max: 5.0 });
		assert_eq!(axis.project(0.0, 0.0, 10.0), 5.0);
	}

	#[test]
	fn bands_split_evenly() {
		assert_eq!(band_center(0, 4, 0.0, 100.0), 12.5);
		assert_eq!(band_center(3, 4, 0.0, 100.0), 87.5);
	}

	#[test]
	fn tick_labels_are_abbreviated() {
		assert_eq!(short_number(1_500_000.0), "1,5 mi");
		assert_eq!(short_number(35_000.0), "35 mil");
		assert_eq!(short_number(900.0), "900");
	}
}
