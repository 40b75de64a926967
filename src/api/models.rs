//! Response shapes of the analytics backend.
//!
//! Every field defaults so a partially populated payload still decodes; what is
//! missing shows up as empty series, which the chart mappers handle.

use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardData {
	pub kpis: DashboardKpis,
	pub moment_distribution: Vec<MomentCount>,
	pub revenue_expense_clusters: Vec<RevenueExpensePoint>,
	pub maturity_analysis: Vec<MaturityBucket>,
	pub transaction_analysis: Vec<TransactionTotal>,
	pub sector_analysis: Vec<SectorRevenue>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardKpis {
	pub total_companies: u64,
	pub predominant_moment: PredominantMoment,
	pub average_balance: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredominantMoment {
	pub moment: String,
	pub percentage: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MomentCount {
	pub moment: String,
	pub count: u64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevenueExpensePoint {
	pub id: String,
	pub average_revenue_6m: f64,
	pub average_expense_6m: f64,
	pub moment: String,
	pub sector: String,
	pub average_margin_6m: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaturityBucket {
	pub maturity_range: String,
	pub average_revenue: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransactionTotal {
	pub transaction_type: String,
	pub value: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SectorRevenue {
	pub sector: String,
	pub total_revenue: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Sector {
	pub sector: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompanyDetails {
	pub id: String,
	pub sector: String,
	pub kpis: CompanyKpis,
	pub benchmarking: Benchmarking,
	pub cashflow_history: Vec<MonthlyCashflow>,
	pub revenue_distribution: Vec<TransactionShare>,
	pub expense_distribution: Vec<TransactionShare>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompanyKpis {
	pub moment: String,
	pub balance: f64,
	pub average_revenue_6m: f64,
	pub average_expense_6m: f64,
	pub average_margin_6m: f64,
}

/// Six-month averages of the company next to its sector's.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Benchmarking {
	pub company_average_revenue_6m: f64,
	pub sector_average_revenue_6m: f64,
	pub company_average_margin_6m: Option<f64>,
	pub sector_average_margin_6m: f64,
}

impl Benchmarking {
	/// Table rows; the company margin falls back to the one in `kpis`.
	pub fn rows(&self, kpis: &CompanyKpis) -> Vec<Benchmark> {
		vec![
			Benchmark {
				metric: BenchmarkMetric::Revenue,
				company: self.company_average_revenue_6m,
				sector: self.sector_average_revenue_6m,
			},
			Benchmark {
				metric: BenchmarkMetric::Margin,
				company: self.company_average_margin_6m.unwrap_or(kpis.average_margin_6m),
				sector: self.sector_average_margin_6m,
			},
		]
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchmarkMetric {
	Revenue,
	Margin,
}

impl BenchmarkMetric {
	pub fn label(self) -> &'static str {
		match self {
			BenchmarkMetric::Revenue => "Receita Média (6m)",
			BenchmarkMetric::Margin => "Margem Média (6m)",
		}
	}
}

/// One metric of the company set against its sector average.
#[derive(Clone, Debug, PartialEq)]
pub struct Benchmark {
	pub metric: BenchmarkMetric,
	pub company: f64,
	pub sector: f64,
}

impl Benchmark {
	pub fn delta(&self) -> f64 {
		self.company - self.sector
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonthlyCashflow {
	pub ano_mes: String,
	pub receita: f64,
	pub despesa: f64,
	pub fluxo_liq: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransactionShare {
	pub ds_tran: String,
	pub vl: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForecastData {
	pub kpis: ForecastKpis,
	pub historico: Vec<MonthlyCashflow>,
	pub previsao: Vec<MonthlyCashflow>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForecastKpis {
	pub total_receita_prevista: f64,
	pub total_despesa_prevista: f64,
	pub total_fluxo_previsto: f64,
}

/// A company whose revenue leans on a single client.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Dependency {
	pub empresa_dependente: String,
	pub cliente_chave: String,
	/// Percentage of revenue, already scaled to 0..=100.
	pub dependencia: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Neighborhood {
	pub id: Option<String>,
	pub clientes: Vec<Option<String>>,
	pub fornecedores: Vec<Option<String>>,
}

/// A node entry as served by `/graph/nodes`: a bare id or a small record.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawNode {
	Id(String),
	Record {
		id: String,
		#[serde(default)]
		name: Option<String>,
		#[serde(default)]
		sector: Option<String>,
	},
}

impl RawNode {
	/// Accepts only the shapes above with a non-blank id.
	pub fn from_value(value: Value) -> Option<Self> {
		let node: RawNode = serde_json::from_value(value).ok()?;
		(!node.id().trim().is_empty()).then_some(node)
	}

	pub fn id(&self) -> &str {
		match self {
			RawNode::Id(id) | RawNode::Record { id, .. } => id,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawEdge {
	pub source: Option<String>,
	pub target: Option<String>,
	pub value: Option<f64>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
}

impl RawEdge {
	pub fn from_value(value: Value) -> Option<Self> {
		serde_json::from_value(value).ok()
	}
}

// Envelopes.

#[derive(Deserialize)]
pub(crate) struct CompanyIds {
	#[serde(default)]
	pub company_ids: Vec<String>,
}

#[derive(Deserialize)]
pub(crate) struct Diagnosis {
	pub diagnosis: String,
}

#[derive(Deserialize)]
pub(crate) struct Analysis {
	pub analysis: String,
}

#[derive(Deserialize)]
pub(crate) struct Summary {
	pub summary: String,
}

#[derive(Deserialize)]
pub(crate) struct Nodes {
	pub nodes: Vec<Value>,
}

#[derive(Deserialize)]
pub(crate) struct Edges {
	pub edges: Vec<Value>,
}

#[derive(Deserialize)]
pub(crate) struct Dependencies {
	#[serde(default)]
	pub dependencies: Vec<Dependency>,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn raw_nodes_accept_strings_and_records() {
		assert_eq!(RawNode::from_value(json!("A")), Some(RawNode::Id("A".into())));
		let record = RawNode::from_value(json!({"id": "B", "sector": "Varejo"})).unwrap();
		assert_eq!(record.id(), "B");
		assert_eq!(RawNode::from_value(json!(42)), None);
		assert_eq!(RawNode::from_value(json!(null)), None);
		assert_eq!(RawNode::from_value(json!("  ")), None);
	}

	#[test]
	fn raw_edges_tolerate_missing_fields() {
		let edge = RawEdge::from_value(json!({"source": "A", "value": 3.5})).unwrap();
		assert_eq!(edge.source.as_deref(), Some("A"));
		assert_eq!(edge.target, None);
		assert_eq!(edge.kind, None);
		assert!(RawEdge::from_value(json!({"source": "A", "value": "heavy"})).is_none());
	}

	#[test]
	fn partial_dashboard_decodes() {
		let data: DashboardData =
			serde_json::from_value(json!({"kpis": {"total_companies": 12}})).unwrap();
		assert_eq!(data.kpis.total_companies, 12);
		assert!(data.sector_analysis.is_empty());
	}

	#[test]
	fn benchmarking_rows_fall_back_to_kpi_margin() {
		let details: CompanyDetails = serde_json::from_value(json!({
			"id": "X",
			"kpis": {"average_margin_6m": 0.25},
			"benchmarking": {
				"company_average_revenue_6m": 120.0,
				"sector_average_revenue_6m": 100.0,
				"sector_average_margin_6m": 0.2
			}
		}))
		.unwrap();
		let rows = details.benchmarking.rows(&details.kpis);
		assert_eq!(rows[0].metric, BenchmarkMetric::Revenue);
		assert_eq!(rows[0].delta(), 20.0);
		assert_eq!(rows[1].company, 0.25);
	}
}
