use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error};

use super::{derive_text, load_company_ids};
use crate::api::models::ForecastData;
use crate::api::{ApiClient, ForecastAnalysis, RequestGeneration};
use crate::charts::series::forecast_chart;
use crate::components::{ChartCanvas, ChoiceSelect, CompanySelect, KpiCard, Narrative, StatusBanner};
use crate::config::AppConfig;
use crate::error::messages;
use crate::format::format_currency;

pub const HORIZONS: [(u32, &str); 3] = [(3, "3 meses"), (6, "6 meses"), (12, "12 meses")];

/// Projected revenue and expense for one company over the chosen horizon.
#[component]
pub fn Forecast() -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let config = expect_context::<AppConfig>();
	let ids = RwSignal::new(Vec::<String>::new());
	let selected = RwSignal::new(None::<String>);
	let months = RwSignal::new(config.forecast_months);
	let analysis = RwSignal::new(None::<ForecastAnalysis>);
	let loading = RwSignal::new(false);
	let page_error = RwSignal::new(None::<String>);
	let requests = RequestGeneration::default();

	load_company_ids(client.clone(), ids, Some(selected), page_error);

	Effect::new(move |_| {
		let horizon = months.get();
		let Some(id) = selected.get() else {
			return;
		};
		let (client, requests) = (client.clone(), requests.clone());
		let ticket = requests.begin();
		loading.set(true);
		page_error.set(None);
		spawn_local(async move {
			let result = client.forecast_analysis(&id, horizon).await;
			if !requests.is_current(ticket) {
				debug!("Discarding stale {}-month forecast for {}", horizon, id);
				return;
			}
			loading.set(false);
			match result {
				Ok(loaded) => analysis.set(Some(loaded)),
				Err(err) => {
					error!("Forecast for {} failed: {}", id, err);
					page_error.set(Some(messages::FORECAST_FAILED.to_string()));
				}
			}
		});
	});

	let revenue = derive_text(analysis, |a| format_currency(a.forecast.kpis.total_receita_prevista));
	let expense = derive_text(analysis, |a| format_currency(a.forecast.kpis.total_despesa_prevista));
	let net = derive_text(analysis, |a| format_currency(a.forecast.kpis.total_fluxo_previsto));
	let narrative = Signal::derive(move || {
		analysis.with(|a| a.as_ref().map(|a| a.narrative.clone()).unwrap_or_default())
	});
	let chart = Signal::derive(move || {
		analysis.with(|a| match a {
			Some(a) => forecast_chart(&a.forecast),
			None => forecast_chart(&ForecastData::default()),
		})
	});

	view! {
		<div class="page forecast">
			<header class="page-header">
				<h1>"Previsão de Fluxo de Caixa"</h1>
				<CompanySelect ids=ids selected=selected />
				<ChoiceSelect label="Horizonte" choices=HORIZONS.to_vec() value=months />
			</header>

			<StatusBanner loading=loading error=page_error />

			<section class="kpis">
				<KpiCard label="Receita Prevista" value=revenue />
				<KpiCard label="Despesa Prevista" value=expense />
				<KpiCard label="Fluxo Previsto" value=net />
			</section>

			<section class="charts">
				<ChartCanvas title="Histórico e Previsão" data=chart height=380 />
			</section>

			<Narrative title="Análise da Previsão" text=narrative />
		</div>
	}
}
