//! Error types for the data-access and rendering layers, plus the user-facing text for them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("request failed: {0}")]
	Transport(String),
	#[error("{url} answered with status {status}")]
	Status { status: u16, url: String },
	#[error("unexpected response body: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("invalid url: {0}")]
	Url(#[from] url::ParseError),
}

impl From<gloo_net::Error> for ApiError {
	fn from(err: gloo_net::Error) -> Self {
		ApiError::Transport(err.to_string())
	}
}

/// Failures while setting up or drawing the graph.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
	/// The container never appeared.
	#[error("container #{id} not found after {attempts} attempts")]
	ContainerNotFound {
		/// Element id that was probed.
		id: String,
		/// Probes made before giving up.
		attempts: u32,
	},
	/// A browser API call failed.
	#[error("dom error: {0}")]
	Dom(String),
}

impl From<wasm_bindgen::JsValue> for GraphError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		GraphError::Dom(format!("{value:?}"))
	}
}

impl GraphError {
	/// Portuguese text for the graph overlay.
	pub fn user_message(&self) -> &'static str {
		match self {
			GraphError::ContainerNotFound { .. } => messages::GRAPH_INIT_FAILED,
			GraphError::Dom(_) => messages::GRAPH_RENDER_FAILED,
		}
	}
}

/// Portuguese strings shown to the user.
pub mod messages {
	pub const COMPANY_IDS_FAILED: &str = "Erro ao carregar lista de empresas";
	pub const DASHBOARD_FAILED: &str = "Erro ao carregar dados do painel";
	pub const COMPANY_ANALYSIS_FAILED: &str = "Erro ao carregar análise da empresa";
	pub const FORECAST_FAILED: &str = "Erro ao carregar análise de previsão";
	pub const GRAPH_INIT_FAILED: &str =
		"Erro ao inicializar o gráfico. Por favor, recarregue a página.";
	pub const GRAPH_RENDER_FAILED: &str = "Erro ao renderizar o grafo";
	pub const GRAPH_EMPTY: &str = "Não foram encontrados dados de grafo para exibição";
	pub const COMPANY_GRAPH_EMPTY: &str =
		"Não foram encontrados dados de relacionamentos para esta empresa";
	pub const SELECT_COMPANY: &str = "Selecione uma empresa para visualizar sua cadeia de valor";
	pub const ECOSYSTEM_SUMMARY_UNAVAILABLE: &str =
		"Análise do ecossistema não disponível no momento.";
	pub const COMPANY_NETWORK_UNAVAILABLE: &str =
		"Análise de cadeia de valor não disponível para esta empresa.";
	pub const DIAGNOSIS_UNAVAILABLE: &str = "Diagnóstico não disponível no momento.";
	pub const FORECAST_NARRATIVE_UNAVAILABLE: &str =
		"Análise da previsão não disponível no momento.";
	pub const SAMPLE_SUFFIX: &str = " (Dados de Exemplo)";
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn container_errors_ask_for_reload() {
		let err = GraphError::ContainerNotFound {
			id: "graph-container".into(),
			attempts: 4,
		};
		assert!(err.user_message().contains("recarregue"));
		assert_eq!(
			err.to_string(),
			"container #graph-container not found after 4 attempts"
		);
	}

	#[test]
	fn decode_errors_convert() {
		let err: ApiError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
		assert!(matches!(err, ApiError::Decode(_)));
	}
}
