use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info};

use super::load_company_ids;
use crate::api::{ApiClient, CompanyNetworkAnalysis, EcosystemAnalysis, RequestGeneration};
use crate::components::force_graph::{ForceGraphCanvas, GraphMode, GraphScene, LayoutOptions};
use crate::components::{ChoiceSelect, CompanySelect, Narrative, StatusBanner};
use crate::config::AppConfig;
use crate::error::messages;
use crate::format::format_percentage;

pub const NODE_LIMITS: [(usize, &str); 4] = [(50, "50"), (100, "100"), (200, "200"), (500, "500")];
pub const DEPENDENCY_THRESHOLDS: [(f64, &str); 5] =
	[(0.5, "50%"), (0.6, "60%"), (0.7, "70%"), (0.8, "80%"), (0.9, "90%")];

/// Which graph the page shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainView {
	Ecosystem,
	Company,
}

/// Scene for the current view, or `None` while there is nothing to draw.
///
/// A neighborhood is always centered on the company it was fetched for,
/// even while a request for another company is in flight.
pub fn scene_for(
	view: ChainView,
	ecosystem: Option<&EcosystemAnalysis>,
	network: Option<&CompanyNetworkAnalysis>,
	options: LayoutOptions,
) -> Option<GraphScene> {
	match view {
		ChainView::Ecosystem => {
			let data = ecosystem?.graph.clone();
			(!data.is_empty()).then_some(GraphScene {
				data,
				mode: GraphMode::Ecosystem,
				options,
			})
		}
		ChainView::Company => {
			let network = network?;
			(!network.graph.is_empty()).then(|| GraphScene {
				data: network.graph.clone(),
				mode: GraphMode::Company {
					central: network.company.clone(),
				},
				options,
			})
		}
	}
}

/// Value-chain explorer: the whole ecosystem or one company's neighborhood.
#[component]
pub fn ValueChain() -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let config = expect_context::<AppConfig>();
	let view_mode = RwSignal::new(ChainView::Ecosystem);
	let ids = RwSignal::new(Vec::<String>::new());
	let selected = RwSignal::new(None::<String>);
	let limit = RwSignal::new(config.node_limit);
	let high_performance = RwSignal::new(config.high_performance);
	let threshold = RwSignal::new(config.dependency_threshold);
	let ecosystem = RwSignal::new(None::<EcosystemAnalysis>);
	let network = RwSignal::new(None::<CompanyNetworkAnalysis>);
	let loading = RwSignal::new(false);
	let page_error = RwSignal::new(None::<String>);
	let requests = RequestGeneration::default();

	load_company_ids(client.clone(), ids, None, page_error);

	let (edge_threshold, depth) = (config.edge_weight_threshold, config.network_depth);
	Effect::new(move |_| {
		let view = view_mode.get();
		let (client, requests) = (client.clone(), requests.clone());
		let ticket = requests.begin();
		page_error.set(None);

		match view {
			ChainView::Ecosystem => {
				let dependency_threshold = threshold.get();
				loading.set(true);
				spawn_local(async move {
					let loaded = client
						.ecosystem_analysis(edge_threshold, dependency_threshold)
						.await;
					if !requests.is_current(ticket) {
						debug!("Discarding stale ecosystem analysis");
						return;
					}
					info!("Ecosystem loaded with {} nodes", loaded.graph.nodes.len());
					loading.set(false);
					ecosystem.set(Some(loaded));
				});
			}
			ChainView::Company => {
				let Some(id) = selected.get() else {
					loading.set(false);
					network.set(None);
					return;
				};
				loading.set(true);
				spawn_local(async move {
					let loaded = client.company_network(&id, depth).await;
					if !requests.is_current(ticket) {
						debug!("Discarding stale network for {}", id);
						return;
					}
					loading.set(false);
					network.set(Some(loaded));
				});
			}
		}
	});

	let scene = Memo::new(move |_| {
		let options = LayoutOptions {
			limit: limit.get(),
			high_performance: high_performance.get(),
		};
		let view = view_mode.get();
		ecosystem.with(|eco| {
			network.with(|net| scene_for(view, eco.as_ref(), net.as_ref(), options))
		})
	});

	let message = Signal::derive(move || match view_mode.get() {
		ChainView::Company if selected.with(Option::is_none) => {
			Some(messages::SELECT_COMPANY.to_string())
		}
		ChainView::Ecosystem
			if ecosystem.with(|e| e.as_ref().is_some_and(|e| e.graph.is_empty())) =>
		{
			Some(messages::GRAPH_EMPTY.to_string())
		}
		ChainView::Company if network.with(|n| n.as_ref().is_some_and(|n| n.graph.is_empty())) => {
			Some(messages::COMPANY_GRAPH_EMPTY.to_string())
		}
		_ => None,
	});

	let lonely = move || {
		view_mode.get() == ChainView::Company
			&& network.with(|n| {
				n.as_ref()
					.is_some_and(|n| !n.graph.is_empty() && n.graph.links.is_empty())
			})
	};

	let on_select = Callback::new(move |id: String| {
		info!("Switching to the value chain of {}", id);
		selected.set(Some(id));
		view_mode.set(ChainView::Company);
	});

	let summary = Signal::derive(move || {
		ecosystem.with(|e| e.as_ref().map(|e| e.summary.clone()).unwrap_or_default())
	});
	let company_analysis = Signal::derive(move || {
		network.with(|n| n.as_ref().map(|n| n.analysis.clone()).unwrap_or_default())
	});

	view! {
		<div class="page value-chain">
			<header class="page-header">
				<h1>"Cadeia de Valor"</h1>
				<div class="toggle">
					<button
						class:active=move || view_mode.get() == ChainView::Ecosystem
						on:click=move |_| view_mode.set(ChainView::Ecosystem)
					>
						"Ecossistema"
					</button>
					<button
						class:active=move || view_mode.get() == ChainView::Company
						on:click=move |_| view_mode.set(ChainView::Company)
					>
						"Empresa"
					</button>
				</div>
				<Show when=move || view_mode.get() == ChainView::Company>
					<CompanySelect
						ids=ids
						selected=selected
						placeholder="Selecione uma empresa"
					/>
				</Show>
				<ChoiceSelect label="Limite de nós" choices=NODE_LIMITS.to_vec() value=limit />
				<ChoiceSelect
					label="Dependência crítica"
					choices=DEPENDENCY_THRESHOLDS.to_vec()
					value=threshold
				/>
				<label class="control checkbox">
					<input
						type="checkbox"
						prop:checked=move || high_performance.get()
						on:change=move |ev| high_performance.set(event_target_checked(&ev))
					/>
					<span>"Alto desempenho"</span>
				</label>
			</header>

			<StatusBanner loading=loading error=page_error />

			<ForceGraphCanvas scene=scene on_select=on_select message=message />
			<Show when=lonely>
				<p class="graph-note">{messages::COMPANY_GRAPH_EMPTY}</p>
			</Show>

			<Show
				when=move || view_mode.get() == ChainView::Ecosystem
				fallback=move || {
					view! { <Narrative title="Análise da Cadeia de Valor" text=company_analysis /> }
				}
			>
				<Narrative title="Resumo do Ecossistema" text=summary />
				<section class="dependencies">
					<h3>"Dependências Críticas"</h3>
					<table>
						<thead>
							<tr>
								<th>"Empresa Dependente"</th>
								<th>"Cliente Chave"</th>
								<th>"Dependência"</th>
							</tr>
						</thead>
						<tbody>
							{move || {
								ecosystem
									.with(|e| e.as_ref().map(|e| e.dependencies.clone()).unwrap_or_default())
									.into_iter()
									.map(|dep| {
										view! {
											<tr>
												<td>{dep.empresa_dependente}</td>
												<td>{dep.cliente_chave}</td>
												<td>{format_percentage(dep.dependencia / 100.0)}</td>
											</tr>
										}
									})
									.collect_view()
							}}
						</tbody>
					</table>
				</section>
			</Show>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::state::ForceGraphState;
	use crate::components::force_graph::{GraphData, GraphLink, GraphNode, NodeRole};

	fn network(company: &str, ids: &[&str]) -> CompanyNetworkAnalysis {
		CompanyNetworkAnalysis {
			company: company.to_string(),
			graph: GraphData {
				nodes: ids.iter().map(|id| GraphNode::new(*id)).collect(),
				links: Vec::new(),
			},
			analysis: String::new(),
		}
	}

	#[test]
	fn company_scene_centers_fetched_company() {
		let net = network("X", &["X"]);
		let scene = scene_for(ChainView::Company, None, Some(&net), LayoutOptions::default())
			.unwrap();
		assert_eq!(
			scene.mode,
			GraphMode::Company {
				central: "X".into()
			}
		);
	}

	#[test]
	fn previous_neighborhood_keeps_its_center_while_next_loads() {
		// Loaded for X; the user has already picked W.
		let mut net = network("X", &[]);
		net.graph = GraphData {
			nodes: vec![
				GraphNode::new("X").with_role(NodeRole::Central),
				GraphNode::new("Y").with_role(NodeRole::Client),
			],
			links: vec![GraphLink::new("Y", "X", 1.0)],
		};
		let scene = scene_for(ChainView::Company, None, Some(&net), LayoutOptions::default())
			.unwrap();
		let state = ForceGraphState::new(&scene, 800.0, 600.0);
		let central: Vec<&str> = state
			.nodes
			.iter()
			.filter(|n| n.role == Some(NodeRole::Central))
			.map(|n| n.id.as_str())
			.collect();
		assert_eq!(central, ["X"]);
		assert_eq!(state.nodes[0].label.as_deref(), Some("X"));
	}

	#[test]
	fn nothing_to_draw_without_data() {
		let options = LayoutOptions::default();
		assert!(scene_for(ChainView::Ecosystem, None, None, options).is_none());
		let empty = EcosystemAnalysis {
			graph: GraphData::default(),
			summary: String::new(),
			dependencies: Vec::new(),
		};
		assert!(scene_for(ChainView::Ecosystem, Some(&empty), None, options).is_none());
		let net = network("X", &["X"]);
		assert!(scene_for(ChainView::Ecosystem, None, Some(&net), options).is_none());
		let lone = network("X", &[]);
		assert!(scene_for(ChainView::Company, None, Some(&lone), options).is_none());
	}
}
