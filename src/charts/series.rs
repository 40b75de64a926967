//! Payload to [`ChartData`] mappings, with placeholder series when a payload is empty.

use super::{ChartData, ChartKind, Dataset};
use crate::api::models::{
	ForecastData, MaturityBucket, MomentCount, MonthlyCashflow, RevenueExpensePoint,
	SectorRevenue, TransactionShare, TransactionTotal,
};
use crate::error::messages::SAMPLE_SUFFIX;
use crate::format::{format_month, month_label};

pub const REVENUE_COLOR: &str = "#ffcdd2";
pub const EXPENSE_COLOR: &str = "#ef5350";
pub const NET_FLOW_COLOR: &str = "#d32f2f";
pub const PREDICTED_REVENUE_COLOR: &str = "#a5d6a7";
pub const PREDICTED_EXPENSE_COLOR: &str = "#ffab91";
const UNKNOWN_MOMENT_COLOR: &str = "#9e9e9e";

const REVENUE_PALETTE: [&str; 10] = [
	"#ffcdd2", "#ef5350", "#d32f2f", "#b71c1c", "#c62828", "#f44336", "#e53935", "#ffcdd2",
	"#ef9a9a", "#8d1e1e",
];
const EXPENSE_PALETTE: [&str; 10] = [
	"#d32f2f", "#b71c1c", "#c62828", "#8d1e1e", "#ef5350", "#f44336", "#e53935", "#ffcdd2",
	"#c8e6c9", "#6d1b1b",
];
const MATURITY_PALETTE: [&str; 5] = ["#ffcdd2", "#ef5350", "#d32f2f", "#b71c1c", "#8d1e1e"];
const TRANSACTION_PALETTE: [&str; 10] = [
	"#ffcdd2", "#ef5350", "#d32f2f", "#b71c1c", "#c62828", "#f44336", "#e53935", "#c8e6c9",
	"#ffcdd2", "#8d1e1e",
];

pub const MAX_SCATTER_POINTS: usize = 100;
pub const MAX_TRANSACTIONS: usize = 10;
pub const MAX_SECTORS: usize = 15;
pub const MAX_LABEL_CHARS: usize = 25;

/// Months in each half of the placeholder series.
pub const SAMPLE_MONTHS: usize = 6;
const SAMPLE_YEAR: u32 = 2024;

/// Deterministic value in `[0, 1)` for a seed.
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn labelled(base: &str, sample: bool) -> String {
	if sample {
		format!("{base}{SAMPLE_SUFFIX}")
	} else {
		base.to_string()
	}
}

fn palette(colors: &[&str], len: usize) -> Vec<String> {
	colors.iter().cycle().take(len).map(|c| c.to_string()).collect()
}

pub fn moment_color(moment: &str) -> Option<&'static str> {
	match moment.trim().to_lowercase().as_str() {
		"início" | "inicio" => Some("#ffcdd2"),
		"crescimento" => Some("#ef5350"),
		"maturidade" => Some("#d32f2f"),
		"declínio" | "declinio" => Some("#b71c1c"),
		_ => None,
	}
}

struct SampleMonth {
	revenue: f64,
	expense: f64,
}

fn sample_history() -> Vec<SampleMonth> {
	(0..SAMPLE_MONTHS)
		.map(|i| SampleMonth {
			revenue: 50_000.0 + (rand_simple(i) - 0.5) * 10_000.0 + i as f64 * 2_000.0,
			expense: 35_000.0 + (rand_simple(i + 100) - 0.5) * 8_000.0 + i as f64 * 1_500.0,
		})
		.collect()
}

fn sample_forecast() -> Vec<SampleMonth> {
	(0..SAMPLE_MONTHS)
		.map(|i| SampleMonth {
			revenue: 62_000.0 + i as f64 * 2_500.0 + (rand_simple(i + 200) - 0.5) * 5_000.0,
			expense: 45_000.0 + i as f64 * 1_800.0 + (rand_simple(i + 300) - 0.5) * 4_000.0,
		})
		.collect()
}

/// Revenue, expense and net flow over the company's history.
pub fn cashflow_chart(history: &[MonthlyCashflow]) -> ChartData {
	let sample = history.is_empty();
	let (labels, revenue, expense, net): (Vec<String>, Vec<_>, Vec<_>, Vec<_>) = if sample {
		let months = sample_history();
		(
			(0..SAMPLE_MONTHS).map(|i| month_label(i, SAMPLE_YEAR)).collect(),
			months.iter().map(|m| Some(m.revenue)).collect(),
			months.iter().map(|m| Some(m.expense)).collect(),
			months.iter().map(|m| Some(m.revenue - m.expense)).collect(),
		)
	} else {
		(
			history.iter().map(|m| format_month(&m.ano_mes)).collect(),
			history.iter().map(|m| Some(m.receita)).collect(),
			history.iter().map(|m| Some(m.despesa)).collect(),
			history.iter().map(|m| Some(m.fluxo_liq)).collect(),
		)
	};

	ChartData {
		kind: ChartKind::Line,
		labels,
		datasets: vec![
			Dataset::line(labelled("Receita", sample), revenue, REVENUE_COLOR),
			Dataset::line(labelled("Despesa", sample), expense, EXPENSE_COLOR),
			Dataset::line(labelled("Fluxo Líquido", sample), net, NET_FLOW_COLOR),
		],
		sample,
	}
}

/// History followed by prediction on one axis.
///
/// Historical series carry trailing gaps and predicted series leading gaps, so
/// every series is exactly as long as the label axis.
pub fn forecast_chart(data: &ForecastData) -> ChartData {
	let sample = data.historico.is_empty();
	let (labels, history, predicted): (Vec<String>, Vec<SampleMonth>, Vec<SampleMonth>) = if sample {
		let labels = (0..SAMPLE_MONTHS * 2)
			.map(|i| month_label(i, SAMPLE_YEAR))
			.collect();
		(labels, sample_history(), sample_forecast())
	} else {
		let labels = data
			.historico
			.iter()
			.chain(&data.previsao)
			.map(|m| format_month(&m.ano_mes))
			.collect();
		let to_month = |m: &MonthlyCashflow| SampleMonth {
			revenue: m.receita,
			expense: m.despesa,
		};
		(
			labels,
			data.historico.iter().map(to_month).collect(),
			data.previsao.iter().map(to_month).collect(),
		)
	};

	let gaps = |n: usize| std::iter::repeat_n(None::<f64>, n);
	let trailing = |pick: fn(&SampleMonth) -> f64| -> Vec<Option<f64>> {
		history
			.iter()
			.map(|m| Some(pick(m)))
			.chain(gaps(predicted.len()))
			.collect()
	};
	let leading = |pick: fn(&SampleMonth) -> f64| -> Vec<Option<f64>> {
		gaps(history.len())
			.chain(predicted.iter().map(|m| Some(pick(m))))
			.collect()
	};

	ChartData {
		kind: ChartKind::Line,
		labels,
		datasets: vec![
			Dataset::line(
				labelled("Receita Histórica", sample),
				trailing(|m| m.revenue),
				REVENUE_COLOR,
			),
			Dataset::line(
				labelled("Despesa Histórica", sample),
				trailing(|m| m.expense),
				EXPENSE_COLOR,
			),
			Dataset::line(
				labelled("Receita Prevista", sample),
				leading(|m| m.revenue),
				PREDICTED_REVENUE_COLOR,
			)
			.dashed(),
			Dataset::line(
				labelled("Despesa Prevista", sample),
				leading(|m| m.expense),
				PREDICTED_EXPENSE_COLOR,
			)
			.dashed(),
		],
		sample,
	}
}

fn distribution_chart(shares: &[TransactionShare], label: &str, colors: &[&str]) -> ChartData {
	ChartData {
		kind: ChartKind::Bar,
		labels: shares.iter().map(|s| s.ds_tran.clone()).collect(),
		datasets: vec![Dataset::bars(
			label,
			shares.iter().map(|s| s.vl).collect(),
			palette(colors, shares.len()),
		)],
		sample: false,
	}
}

pub fn revenue_distribution_chart(shares: &[TransactionShare]) -> ChartData {
	distribution_chart(shares, "Receita", &REVENUE_PALETTE)
}

pub fn expense_distribution_chart(shares: &[TransactionShare]) -> ChartData {
	distribution_chart(shares, "Despesa", &EXPENSE_PALETTE)
}

/// Company count per financial moment.
pub fn moment_chart(moments: &[MomentCount]) -> ChartData {
	let sample = moments.is_empty();
	let rows: Vec<(String, f64)> = if sample {
		[("Início", 120.0), ("Crescimento", 340.0), ("Maturidade", 280.0), ("Declínio", 90.0)]
			.into_iter()
			.map(|(m, c)| (m.to_string(), c))
			.collect()
	} else {
		moments.iter().map(|m| (m.moment.clone(), m.count as f64)).collect()
	};
	let colors = rows
		.iter()
		.map(|(m, _)| moment_color(m).unwrap_or(NET_FLOW_COLOR).to_string())
		.collect();

	ChartData {
		kind: ChartKind::HorizontalBar,
		labels: rows.iter().map(|(m, _)| m.clone()).collect(),
		datasets: vec![Dataset::bars(
			labelled("Empresas", sample),
			rows.iter().map(|(_, c)| *c).collect(),
			colors,
		)],
		sample,
	}
}

/// Keeps every `ceil(n / max)`-th item when there are more than `max`.
pub fn stride_sample<T>(items: Vec<T>, max: usize) -> Vec<T> {
	if max == 0 || items.len() <= max {
		return items;
	}
	let step = items.len().div_ceil(max);
	items.into_iter().step_by(step).collect()
}

fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

/// Average revenue against average expense, one series per moment in order of appearance.
pub fn scatter_chart(points: &[RevenueExpensePoint]) -> ChartData {
	let mut moments: Vec<&str> = Vec::new();
	for point in points {
		if !moments.contains(&point.moment.as_str()) {
			moments.push(&point.moment);
		}
	}

	let datasets = moments
		.into_iter()
		.filter_map(|moment| {
			let members: Vec<&RevenueExpensePoint> =
				points.iter().filter(|p| p.moment == moment).collect();
			let sampled = stride_sample(members, MAX_SCATTER_POINTS);
			(!sampled.is_empty()).then(|| Dataset {
				label: moment.to_string(),
				points: sampled
					.iter()
					.map(|p| (round2(p.average_revenue_6m), round2(p.average_expense_6m)))
					.collect(),
				color: moment_color(moment)
					.unwrap_or(UNKNOWN_MOMENT_COLOR)
					.to_string(),
				..Dataset::default()
			})
		})
		.collect();

	ChartData {
		kind: ChartKind::Scatter,
		labels: Vec::new(),
		datasets,
		sample: false,
	}
}

pub fn maturity_chart(buckets: &[MaturityBucket]) -> ChartData {
	let sample = buckets.is_empty();
	let rows: Vec<(String, f64)> = if sample {
		[("0-2 anos", 42_000.0), ("2-5 anos", 68_000.0), ("5-10 anos", 95_000.0), ("10+ anos", 120_000.0)]
			.into_iter()
			.map(|(r, v)| (r.to_string(), v))
			.collect()
	} else {
		buckets
			.iter()
			.map(|b| (b.maturity_range.clone(), b.average_revenue))
			.collect()
	};

	ChartData {
		kind: ChartKind::Bar,
		labels: rows.iter().map(|(r, _)| r.clone()).collect(),
		datasets: vec![Dataset::bars(
			labelled("Receita Média", sample),
			rows.iter().map(|(_, v)| *v).collect(),
			palette(&MATURITY_PALETTE, rows.len()),
		)],
		sample,
	}
}

/// Shortens to [`MAX_LABEL_CHARS`] characters plus `...`.
pub fn truncate_label(label: &str) -> String {
	if label.chars().count() > MAX_LABEL_CHARS {
		let head: String = label.chars().take(MAX_LABEL_CHARS).collect();
		format!("{head}...")
	} else {
		label.to_string()
	}
}

/// Volume per transaction type, first ten only.
pub fn transaction_chart(totals: &[TransactionTotal]) -> ChartData {
	let sample = totals.is_empty();
	let rows: Vec<(String, f64)> = if sample {
		[("PIX", 450_000.0), ("Boleto", 280_000.0), ("TED", 160_000.0), ("Cartão", 110_000.0)]
			.into_iter()
			.map(|(t, v)| (t.to_string(), v))
			.collect()
	} else {
		totals
			.iter()
			.take(MAX_TRANSACTIONS)
			.map(|t| (truncate_label(&t.transaction_type), t.value))
			.collect()
	};

	ChartData {
		kind: ChartKind::Pie,
		labels: rows.iter().map(|(t, _)| t.clone()).collect(),
		datasets: vec![Dataset::bars(
			labelled("Volume", sample),
			rows.iter().map(|(_, v)| *v).collect(),
			palette(&TRANSACTION_PALETTE, rows.len()),
		)],
		sample,
	}
}

/// Bar fill for the `idx`-th sector: one red, fading with rank.
pub fn sector_color(idx: usize) -> String {
	let alpha = (1.0 - idx as f64 * 0.02).max(0.6);
	format!("rgba(183, 28, 28, {alpha:.2})")
}

/// Total revenue per sector, first fifteen only.
pub fn sector_chart(sectors: &[SectorRevenue]) -> ChartData {
	let sample = sectors.is_empty();
	let rows: Vec<(String, f64)> = if sample {
		[("Comércio", 1_800_000.0), ("Serviços", 1_350_000.0), ("Indústria", 900_000.0)]
			.into_iter()
			.map(|(s, v)| (s.to_string(), v))
			.collect()
	} else {
		sectors
			.iter()
			.take(MAX_SECTORS)
			.map(|s| (s.sector.clone(), s.total_revenue))
			.collect()
	};

	ChartData {
		kind: ChartKind::Bar,
		labels: rows.iter().map(|(s, _)| s.clone()).collect(),
		datasets: vec![Dataset::bars(
			labelled("Receita Total", sample),
			rows.iter().map(|(_, v)| *v).collect(),
			(0..rows.len()).map(sector_color).collect(),
		)],
		sample,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::models::ForecastKpis;

	fn month(ano_mes: &str, receita: f64, despesa: f64) -> MonthlyCashflow {
		MonthlyCashflow {
			ano_mes: ano_mes.into(),
			receita,
			despesa,
			fluxo_liq: receita - despesa,
		}
	}

	#[test]
	fn empty_forecast_uses_six_plus_six_sample_months() {
		let chart = forecast_chart(&ForecastData::default());
		assert!(chart.sample);
		assert_eq!(chart.labels.len(), 12);
		assert_eq!(chart.labels.first().map(String::as_str), Some("Jan 2024"));
		assert_eq!(chart.labels.last().map(String::as_str), Some("Dez 2024"));
		let [hist_rev, _, pred_rev, _] = chart.datasets.as_slice() else {
			panic!("expected four series");
		};
		assert_eq!(hist_rev.values.iter().filter(|v| v.is_some()).count(), 6);
		assert_eq!(pred_rev.values.iter().filter(|v| v.is_some()).count(), 6);
		assert!(pred_rev.values[..6].iter().all(Option::is_none));
		assert!(hist_rev.label.ends_with(SAMPLE_SUFFIX));
		assert!(pred_rev.dashed && !hist_rev.dashed);
	}

	#[test]
	fn forecast_series_are_padded_to_the_label_axis() {
		let data = ForecastData {
			kpis: ForecastKpis::default(),
			historico: vec![month("2024-01", 10.0, 5.0), month("2024-02", 12.0, 6.0)],
			previsao: vec![
				month("2024-03", 13.0, 7.0),
				month("2024-04", 14.0, 7.5),
				month("2024-05", 15.0, 8.0),
			],
		};
		let chart = forecast_chart(&data);
		assert!(!chart.sample);
		assert_eq!(chart.labels, ["Jan 2024", "Fev 2024", "Mar 2024", "Abr 2024", "Mai 2024"]);
		for dataset in &chart.datasets {
			assert_eq!(dataset.values.len(), chart.labels.len());
		}
		assert_eq!(
			chart.datasets[0].values,
			vec![Some(10.0), Some(12.0), None, None, None]
		);
		assert_eq!(
			chart.datasets[3].values,
			vec![None, None, Some(7.0), Some(7.5), Some(8.0)]
		);
	}

	#[test]
	fn empty_cashflow_is_labelled_sample() {
		let chart = cashflow_chart(&[]);
		assert!(chart.sample);
		assert_eq!(chart.labels.len(), SAMPLE_MONTHS);
		let net = &chart.datasets[2];
		let (rev, exp) = (&chart.datasets[0], &chart.datasets[1]);
		for i in 0..SAMPLE_MONTHS {
			let expected = rev.values[i].unwrap() - exp.values[i].unwrap();
			assert!((net.values[i].unwrap() - expected).abs() < 1e-9);
		}
		assert_eq!(cashflow_chart(&[]), chart);
	}

	#[test]
	fn cashflow_maps_history() {
		let chart = cashflow_chart(&[month("2023-11-01", 100.0, 40.0)]);
		assert!(!chart.sample);
		assert_eq!(chart.labels, ["Nov 2023"]);
		assert_eq!(chart.datasets[2].values, vec![Some(60.0)]);
		assert_eq!(chart.datasets[0].label, "Receita");
	}

	#[test]
	fn scatter_is_capped_per_moment() {
		let points: Vec<RevenueExpensePoint> = (0..250)
			.map(|i| RevenueExpensePoint {
				moment: if i % 5 == 0 { "Declínio" } else { "Crescimento" }.into(),
				average_revenue_6m: i as f64 + 0.123,
				average_expense_6m: 1.0,
				..RevenueExpensePoint::default()
			})
			.collect();
		let chart = scatter_chart(&points);
		assert_eq!(chart.datasets.len(), 2);
		assert_eq!(chart.datasets[0].label, "Declínio");
		assert_eq!(chart.datasets[0].points.len(), 50);
		assert!(chart.datasets[1].points.len() <= MAX_SCATTER_POINTS);
		assert_eq!(chart.datasets[0].points[0], (0.12, 1.0));
		assert_eq!(chart.datasets[1].color, "#ef5350");
	}

	#[test]
	fn stride_sampling() {
		assert_eq!(stride_sample((0..10).collect(), 4), vec![0, 3, 6, 9]);
		assert_eq!(stride_sample(vec![1, 2], 4), vec![1, 2]);
	}

	#[test]
	fn transactions_are_truncated_and_capped() {
		let totals: Vec<TransactionTotal> = (0..12)
			.map(|i| TransactionTotal {
				transaction_type: format!("Transferência entre contas número {i}"),
				value: 100.0,
			})
			.collect();
		let chart = transaction_chart(&totals);
		assert_eq!(chart.labels.len(), MAX_TRANSACTIONS);
		assert_eq!(chart.labels[0], "Transferência entre conta...");
		assert_eq!(truncate_label("PIX"), "PIX");
	}

	#[test]
	fn sectors_fade_but_not_below_sixty_percent() {
		assert_eq!(sector_color(0), "rgba(183, 28, 28, 1.00)");
		assert_eq!(sector_color(5), "rgba(183, 28, 28, 0.90)");
		assert_eq!(sector_color(30), "rgba(183, 28, 28, 0.60)");
		let sectors: Vec<SectorRevenue> = (0..20)
			.map(|i| SectorRevenue {
				sector: format!("S{i}"),
				total_revenue: 1.0,
			})
			.collect();
		assert_eq!(sector_chart(&sectors).labels.len(), MAX_SECTORS);
	}

	#[test]
	fn empty_dashboard_series_fall_back_to_samples() {
		for chart in [
			moment_chart(&[]),
			maturity_chart(&[]),
			transaction_chart(&[]),
			sector_chart(&[]),
		] {
			assert!(chart.sample);
			assert!(!chart.labels.is_empty());
			assert!(chart.datasets[0].label.ends_with(SAMPLE_SUFFIX));
		}
		let moments = moment_chart(&[MomentCount {
			moment: "Maturidade".into(),
			count: 3,
		}]);
		assert!(!moments.sample);
		assert_eq!(moments.datasets[0].bar_colors, ["#d32f2f"]);
	}
}
