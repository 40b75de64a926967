use serde::de::DeserializeOwned;
use url::Url;

use super::models::{
	Analysis, CompanyDetails, CompanyIds, DashboardData, Dependencies, Dependency, Diagnosis,
	Edges, ForecastData, Neighborhood, Nodes, RawEdge, RawNode, Sector, Summary,
};
use super::transport::{BrowserTransport, Transport};
use crate::config::AppConfig;
use crate::error::ApiError;

/// Typed access to every endpoint of the analytics backend.
#[derive(Clone, Debug)]
pub struct ApiClient<T = BrowserTransport> {
	base: Url,
	transport: T,
}

impl ApiClient<BrowserTransport> {
	pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
		Ok(Self::with_transport(Url::parse(&config.api_url)?, BrowserTransport))
	}
}

impl<T: Transport> ApiClient<T> {
	pub fn with_transport(base: Url, transport: T) -> Self {
		Self { base, transport }
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Joins `segments` onto the base path, percent-encoding each one.
	///
	/// An empty final segment leaves a trailing slash.
	pub fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
		let mut url = self.base.clone();
		url.path_segments_mut()
			.map_err(|_| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
			.pop_if_empty()
			.extend(segments);
		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query);
		}
		Ok(url)
	}

	async fn fetch<R: DeserializeOwned>(
		&self,
		segments: &[&str],
		query: &[(&str, &str)],
	) -> Result<R, ApiError> {
		let url = self.endpoint(segments, query)?;
		let body = self.transport.get_text(url).await?;
		Ok(serde_json::from_str(&body)?)
	}

	pub async fn dashboard(&self, cnae: &str) -> Result<DashboardData, ApiError> {
		self.fetch(&["dashboard"], &[("cnae", cnae)]).await
	}

	/// Company ids, sorted.
	pub async fn company_ids(&self) -> Result<Vec<String>, ApiError> {
		let CompanyIds { mut company_ids } = self.fetch(&["companies", "ids"], &[]).await?;
		company_ids.sort();
		Ok(company_ids)
	}

	pub async fn sectors(&self) -> Result<Vec<String>, ApiError> {
		let sectors: Vec<Sector> = self.fetch(&["sectors", ""], &[]).await?;
		Ok(sectors.into_iter().map(|s| s.sector).collect())
	}

	pub async fn company_details(&self, id: &str) -> Result<CompanyDetails, ApiError> {
		self.fetch(&["companies", id, "details"], &[]).await
	}

	pub async fn company_diagnosis(&self, id: &str) -> Result<String, ApiError> {
		let Diagnosis { diagnosis } = self.fetch(&["ai", "diagnosis", id], &[]).await?;
		Ok(diagnosis)
	}

	pub async fn forecast(&self, id: &str, months: u32) -> Result<ForecastData, ApiError> {
		let months = months.to_string();
		self.fetch(&["forecast", id], &[("n_months", &months)]).await
	}

	pub async fn forecast_narrative(&self, id: &str, months: u32) -> Result<String, ApiError> {
		let months = months.to_string();
		let Analysis { analysis } = self
			.fetch(&["ai", "forecast", id], &[("n_months", &months)])
			.await?;
		Ok(analysis)
	}

	/// Well-formed node entries; anything else in the list is skipped.
	pub async fn graph_nodes(&self) -> Result<Vec<RawNode>, ApiError> {
		let Nodes { nodes } = self.fetch(&["graph", "nodes"], &[]).await?;
		Ok(nodes.into_iter().filter_map(RawNode::from_value).collect())
	}

	pub async fn graph_edges(&self) -> Result<Vec<RawEdge>, ApiError> {
		let Edges { edges } = self.fetch(&["graph", "edges"], &[]).await?;
		Ok(edges.into_iter().filter_map(RawEdge::from_value).collect())
	}

	pub async fn ecosystem_summary(&self) -> Result<String, ApiError> {
		let Summary { summary } = self
			.fetch(&["graph-ai", "ecosystem-summary"], &[])
			.await?;
		Ok(summary)
	}

	pub async fn neighborhood(&self, id: &str) -> Result<Neighborhood, ApiError> {
		self.fetch(&["graph", "neighborhood", id], &[]).await
	}

	pub async fn company_network_analysis(&self, id: &str, depth: u32) -> Result<String, ApiError> {
		let depth = depth.to_string();
		let Analysis { analysis } = self
			.fetch(&["graph-ai", "company-analysis", id], &[("depth", &depth)])
			.await?;
		Ok(analysis)
	}

	pub async fn dependencies(&self, threshold: f64) -> Result<Vec<Dependency>, ApiError> {
		let threshold = threshold.to_string();
		let Dependencies { dependencies } = self
			.fetch(&["graph", "dependencies"], &[("threshold", &threshold)])
			.await?;
		Ok(dependencies)
	}
}

#[cfg(test)]
pub(crate) fn mock_client(
	transport: super::transport::mock::MockTransport,
) -> ApiClient<super::transport::mock::MockTransport> {
	let base = Url::parse("http://api.test").expect("static url");
	ApiClient::with_transport(base, transport)
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::super::transport::mock::MockTransport;
	use super::*;

	#[test]
	fn builds_encoded_urls() {
		let client = mock_client(MockTransport::new());
		let url = client
			.endpoint(&["companies", "EMP 01/X", "details"], &[])
			.unwrap();
		assert_eq!(url.as_str(), "http://api.test/companies/EMP%2001%2FX/details");

		let url = client
			.endpoint(&["dashboard"], &[("cnae", "Todos os Setores")])
			.unwrap();
		assert_eq!(url.as_str(), "http://api.test/dashboard?cnae=Todos+os+Setores");

		let url = client.endpoint(&["sectors", ""], &[]).unwrap();
		assert_eq!(url.as_str(), "http://api.test/sectors/");
	}

	#[test]
	fn base_path_is_kept() {
		let base = Url::parse("http://api.test/v1/").unwrap();
		let client = ApiClient::with_transport(base, MockTransport::new());
		let url = client.endpoint(&["graph", "nodes"], &[]).unwrap();
		assert_eq!(url.as_str(), "http://api.test/v1/graph/nodes");
	}

	#[test]
	fn company_ids_come_back_sorted() {
		let client = mock_client(
			MockTransport::new().ok("/companies/ids", r#"{"company_ids": ["C", "A", "B"]}"#),
		);
		let ids = block_on(client.company_ids()).unwrap();
		assert_eq!(ids, vec!["A", "B", "C"]);
	}

	#[test]
	fn forecast_sends_horizon() {
		let client = mock_client(MockTransport::new().ok(
			"/forecast/X",
			r#"{"kpis": {"total_receita_prevista": 10.0}, "historico": [], "previsao": []}"#,
		));
		let data = block_on(client.forecast("X", 12)).unwrap();
		assert_eq!(data.kpis.total_receita_prevista, 10.0);
		assert_eq!(
			client.transport().calls.borrow().as_slice(),
			["http://api.test/forecast/X?n_months=12"]
		);
	}

	#[test]
	fn graph_lists_skip_malformed_entries() {
		let client = mock_client(
			MockTransport::new()
				.ok("/graph/nodes", r#"{"nodes": ["A", 7, {"id": "B"}, {"name": "x"}, ""]}"#)
				.ok(
					"/graph/edges",
					r#"{"edges": [{"source": "A", "target": "B", "value": 0.5, "type": "cliente"}, 3]}"#,
				),
		);
		let nodes = block_on(client.graph_nodes()).unwrap();
		assert_eq!(nodes.iter().map(RawNode::id).collect::<Vec<_>>(), ["A", "B"]);
		let edges = block_on(client.graph_edges()).unwrap();
		assert_eq!(edges.len(), 1);
		assert_eq!(edges[0].kind.as_deref(), Some("cliente"));
	}

	#[test]
	fn status_and_shape_errors_surface() {
		let client = mock_client(
			MockTransport::new()
				.status("/ai/diagnosis/X", 500)
				.ok("/graph-ai/ecosystem-summary", r#"{"other": 1}"#),
		);
		assert!(matches!(
			block_on(client.company_diagnosis("X")),
			Err(ApiError::Status { status: 500, .. })
		));
		assert!(matches!(
			block_on(client.ecosystem_summary()),
			Err(ApiError::Decode(_))
		));
	}
}
