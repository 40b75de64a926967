//! Fan-out helpers and the composite requests the pages issue.

use std::future::Future;

use log::warn;

use super::client::ApiClient;
use super::models::{CompanyDetails, Dependency, ForecastData};
use super::transport::Transport;
use crate::components::force_graph::GraphData;
use crate::error::{ApiError, messages};

/// Resolves to `default` when `fut` fails, logging under `label`.
pub async fn or_default<T, F>(fut: F, default: T, label: &str) -> T
where
	F: Future<Output = Result<T, ApiError>>,
{
	match fut.await {
		Ok(value) => value,
		Err(err) => {
			warn!("{} failed, using default: {}", label, err);
			default
		}
	}
}

/// Runs both concurrently; fails as soon as either does.
pub async fn join_all<A, B, FA, FB>(a: FA, b: FB) -> Result<(A, B), ApiError>
where
	FA: Future<Output = Result<A, ApiError>>,
	FB: Future<Output = Result<B, ApiError>>,
{
	futures::try_join!(a, b)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompanyAnalysis {
	pub details: CompanyDetails,
	pub diagnosis: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForecastAnalysis {
	pub forecast: ForecastData,
	pub narrative: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EcosystemAnalysis {
	pub graph: GraphData,
	pub summary: String,
	pub dependencies: Vec<Dependency>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompanyNetworkAnalysis {
	/// The company the neighborhood was requested for.
	pub company: String,
	pub graph: GraphData,
	pub analysis: String,
}

impl<T: Transport> ApiClient<T> {
	/// Details are required; the narrative falls back to a placeholder.
	pub async fn company_analysis(&self, id: &str) -> Result<CompanyAnalysis, ApiError> {
		let diagnosis = async {
			Ok(or_default(
				self.company_diagnosis(id),
				messages::DIAGNOSIS_UNAVAILABLE.to_string(),
				"diagnosis",
			)
			.await)
		};
		let (details, diagnosis) = join_all(self.company_details(id), diagnosis).await?;
		Ok(CompanyAnalysis { details, diagnosis })
	}

	pub async fn forecast_analysis(
		&self,
		id: &str,
		months: u32,
	) -> Result<ForecastAnalysis, ApiError> {
		let narrative = async {
			Ok(or_default(
				self.forecast_narrative(id, months),
				messages::FORECAST_NARRATIVE_UNAVAILABLE.to_string(),
				"forecast narrative",
			)
			.await)
		};
		let (forecast, narrative) = join_all(self.forecast(id, months), narrative).await?;
		Ok(ForecastAnalysis {
			forecast,
			narrative,
		})
	}

	/// Graph, summary and dependencies, each with its own fallback.
	pub async fn ecosystem_analysis(
		&self,
		edge_threshold: f64,
		dependency_threshold: f64,
	) -> EcosystemAnalysis {
		let (graph, summary, dependencies) = futures::join!(
			self.ecosystem_graph(edge_threshold),
			or_default(
				self.ecosystem_summary(),
				messages::ECOSYSTEM_SUMMARY_UNAVAILABLE.to_string(),
				"ecosystem summary",
			),
			or_default(
				self.dependencies(dependency_threshold),
				Vec::new(),
				"dependencies",
			),
		);
		EcosystemAnalysis {
			graph,
			summary,
			dependencies,
		}
	}

	pub async fn company_network(&self, id: &str, depth: u32) -> CompanyNetworkAnalysis {
		let (graph, analysis) = futures::join!(
			self.company_neighborhood(id),
			or_default(
				self.company_network_analysis(id, depth),
				messages::COMPANY_NETWORK_UNAVAILABLE.to_string(),
				"company network analysis",
			),
		);
		CompanyNetworkAnalysis {
			company: id.to_string(),
			graph,
			analysis,
		}
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::super::client::mock_client;
	use super::super::transport::mock::MockTransport;
	use super::*;

	const DETAILS: &str = r#"{"id": "X", "sector": "Varejo", "kpis": {"moment": "Expansão"}}"#;

	#[test]
	fn company_analysis_needs_details() {
		let client = mock_client(
			MockTransport::new()
				.status("/companies/X/details", 500)
				.ok("/ai/diagnosis/X", r#"{"diagnosis": "ok"}"#),
		);
		assert!(block_on(client.company_analysis("X")).is_err());
	}

	#[test]
	fn company_analysis_tolerates_missing_diagnosis() {
		let client = mock_client(MockTransport::new().ok("/companies/X/details", DETAILS));
		let analysis = block_on(client.company_analysis("X")).unwrap();
		assert_eq!(analysis.details.sector, "Varejo");
		assert_eq!(analysis.diagnosis, messages::DIAGNOSIS_UNAVAILABLE);
	}

	#[test]
	fn forecast_analysis_keeps_narrative() {
		let client = mock_client(
			MockTransport::new()
				.ok("/forecast/X", r#"{"historico": [], "previsao": []}"#)
				.ok("/ai/forecast/X", r#"{"analysis": "estável"}"#),
		);
		let analysis = block_on(client.forecast_analysis("X", 3)).unwrap();
		assert_eq!(analysis.narrative, "estável");
	}

	#[test]
	fn ecosystem_analysis_survives_summary_failure() {
		let client = mock_client(
			MockTransport::new()
				.ok("/graph/nodes", r#"{"nodes": ["A", "B"]}"#)
				.ok("/graph/edges", r#"{"edges": [{"source": "A", "target": "B", "value": 0.9}]}"#)
				.status("/graph-ai/ecosystem-summary", 500)
				.ok(
					"/graph/dependencies",
					r#"{"dependencies": [{"empresa_dependente": "A", "cliente_chave": "B", "dependencia": 80.0}]}"#,
				),
		);
		let analysis = block_on(client.ecosystem_analysis(0.05, 0.7));
		assert_eq!(analysis.graph.nodes.len(), 2);
		assert_eq!(analysis.summary, messages::ECOSYSTEM_SUMMARY_UNAVAILABLE);
		assert_eq!(analysis.dependencies.len(), 1);
		assert!(
			client
				.transport()
				.calls
				.borrow()
				.iter()
				.any(|c| c.ends_with("/graph/dependencies?threshold=0.7"))
		);
	}

	#[test]
	fn company_network_falls_back_everywhere() {
		let client = mock_client(MockTransport::new());
		let network = block_on(client.company_network("X", 1));
		assert_eq!(network.company, "X");
		assert_eq!(network.graph.nodes.len(), 1);
		assert_eq!(network.analysis, messages::COMPANY_NETWORK_UNAVAILABLE);
	}
}
