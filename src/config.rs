//! Application configuration, resolved once at startup and shared through context.

use std::time::Duration;

/// Backend used when no build-time override is present.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Sector filter value meaning "no filter" on the dashboard endpoint.
pub const ALL_SECTORS: &str = "Todos os Setores";

/// How the graph component waits for its container to appear in the document.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
	/// Delay before the first probe, so the surrounding layout can paint.
	pub initial_delay: Duration,
	/// Retries after the first failed probe.
	pub max_retries: u32,
	/// Retry `n` (1-based) waits `n * step`.
	pub step: Duration,
}

impl RetryPolicy {
	/// Wait before retry `attempt` (1-based).
	pub fn delay_for(&self, attempt: u32) -> Duration {
		self.step * attempt
	}
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			initial_delay: Duration::from_millis(200),
			max_retries: 3,
			step: Duration::from_millis(500),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	pub api_url: String,
	/// Edges lighter than this are dropped when the ecosystem graph is assembled.
	pub edge_weight_threshold: f64,
	pub node_limit: usize,
	pub high_performance: bool,
	/// Share of a company's revenue above which a client counts as a critical dependency.
	pub dependency_threshold: f64,
	pub network_depth: u32,
	pub forecast_months: u32,
	pub graph_container_id: String,
	pub retry: RetryPolicy,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_url: DEFAULT_API_URL.to_string(),
			edge_weight_threshold: 0.05,
			node_limit: 100,
			high_performance: true,
			dependency_threshold: 0.7,
			network_depth: 1,
			forecast_months: 6,
			graph_container_id: "graph-container".to_string(),
			retry: RetryPolicy::default(),
		}
	}
}

impl AppConfig {
	/// Defaults, with the API location taken from `ANALYTICS_API_URL` at build time when set.
	pub fn from_env() -> Self {
		let mut config = Self::default();
		if let Some(url) = option_env!("ANALYTICS_API_URL").filter(|u| !u.trim().is_empty()) {
			config.api_url = url.trim().trim_end_matches('/').to_string();
		}
		config
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn retry_delays_grow_linearly() {
		let policy = RetryPolicy::default();
		assert_eq!(policy.delay_for(1), Duration::from_millis(500));
		assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
		assert_eq!(policy.delay_for(3), Duration::from_millis(1500));
	}

	#[test]
	fn defaults_match_backend_expectations() {
		let config = AppConfig::default();
		assert_eq!(config.api_url, "http://localhost:8000");
		assert_eq!(config.node_limit, 100);
		assert!(config.high_performance);
		assert_eq!(config.graph_container_id, "graph-container");
	}
}
