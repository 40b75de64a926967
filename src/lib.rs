//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, error, info};

// Modules
mod api;
mod charts;
mod components;
mod config;
mod error;
mod format;
mod pages;
mod ready;

// Graph surface API, for embedding and browser tests
pub use crate::components::force_graph::{
	GraphData, GraphHooks, GraphLink, GraphMode, GraphNode, GraphScene, GraphSurface,
	LayoutOptions, NodeRole, RelationKind, Tooltip, find_container, mount_when_ready,
	wait_for_container,
};
pub use crate::config::RetryPolicy;
pub use crate::error::GraphError;

#[cfg(test)]
use wasm_bindgen_test as _;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::pages::company::Company;
use crate::pages::forecast::Forecast;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::value_chain::ValueChain;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

#[component]
fn Nav() -> impl IntoView {
	view! {
		<nav class="main-nav">
			<span class="brand">"Cadeia de Valor"</span>
			<A href="/">"Painel"</A>
			<A href="/empresa">"Empresa"</A>
			<A href="/previsao">"Previsão"</A>
			<A href="/cadeia">"Cadeia de Valor"</A>
		</nav>
	}
}

/// The application shell: shared config and API client, navigation and routes.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = AppConfig::from_env();
	info!("Using API at {}", config.api_url);
	let client = match ApiClient::new(&config) {
		Ok(client) => client,
		Err(err) => {
			error!("Invalid API address {}: {}", config.api_url, err);
			return view! {
				<div class="fatal">
					<h1>"Configuração inválida"</h1>
					<p>{format!("Endereço da API inválido: {}", config.api_url)}</p>
				</div>
			}
			.into_any();
		}
	};
	provide_context(config);
	provide_context(client);

	view! {
		<Html attr:lang="pt-BR" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Análise de Fluxo de Caixa e Cadeia de Valor" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Nav />
			<main>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/home") view=Home />
					<Route path=path!("/empresa") view=Company />
					<Route path=path!("/previsao") view=Forecast />
					<Route path=path!("/cadeia") view=ValueChain />
				</Routes>
			</main>
		</Router>
	}
	.into_any()
}
