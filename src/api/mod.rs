//! Typed access to the analytics backend.

mod client;
mod generation;
pub mod graph;
pub mod join;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use generation::RequestGeneration;
pub use join::{CompanyAnalysis, CompanyNetworkAnalysis, EcosystemAnalysis, ForecastAnalysis};
