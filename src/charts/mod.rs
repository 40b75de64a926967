//! Chart view models and their canvas renderer.
//!
//! Pages map API payloads into [`ChartData`] with the functions in [`series`];
//! [`canvas`] draws any of them.

pub mod canvas;
pub mod series;

/// How a chart lays out its data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChartKind {
	#[default]
	Line,
	Bar,
	HorizontalBar,
	Pie,
	Scatter,
}

/// One series. Category charts fill `values`, scatter charts fill `points`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
	pub label: String,
	/// `None` is a gap; lines break across it.
	pub values: Vec<Option<f64>>,
	pub points: Vec<(f64, f64)>,
	pub color: String,
	/// Per-category fill, used by bar and pie charts when present.
	pub bar_colors: Vec<String>,
	pub dashed: bool,
}

impl Dataset {
	pub fn line(label: impl Into<String>, values: Vec<Option<f64>>, color: &str) -> Self {
		Self {
			label: label.into(),
			values,
			color: color.to_string(),
			..Self::default()
		}
	}

	pub fn bars(label: impl Into<String>, values: Vec<f64>, colors: Vec<String>) -> Self {
		Self {
			label: label.into(),
			values: values.into_iter().map(Some).collect(),
			color: colors.first().cloned().unwrap_or_default(),
			bar_colors: colors,
			..Self::default()
		}
	}

	pub fn dashed(mut self) -> Self {
		self.dashed = true;
		self
	}

	/// Fill for category `idx`.
	pub fn color_at(&self, idx: usize) -> &str {
		self.bar_colors.get(idx).map(String::as_str).unwrap_or(&self.color)
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartData {
	pub kind: ChartKind,
	pub labels: Vec<String>,
	pub datasets: Vec<Dataset>,
	/// True when the series are synthetic placeholders.
	pub sample: bool,
}

impl ChartData {
	pub fn new(kind: ChartKind) -> Self {
		Self {
			kind,
			..Self::default()
		}
	}

	pub fn is_empty(&self) -> bool {
		self.datasets
			.iter()
			.all(|d| d.values.iter().all(Option::is_none) && d.points.is_empty())
	}
}
