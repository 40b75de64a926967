use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, warn};

use super::derive_text;
use crate::api::models::DashboardData;
use crate::api::{ApiClient, RequestGeneration};
use crate::charts::ChartData;
use crate::charts::series::{maturity_chart, moment_chart, scatter_chart, sector_chart, transaction_chart};
use crate::components::{ChartCanvas, KpiCard, StatusBanner};
use crate::config::ALL_SECTORS;
use crate::error::messages;
use crate::format::{format_currency, format_number, format_percentage};

fn chart_of(
	data: RwSignal<Option<DashboardData>>,
	build: fn(&DashboardData) -> ChartData,
) -> Signal<ChartData> {
	Signal::derive(move || {
		data.with(|d| match d {
			Some(d) => build(d),
			None => build(&DashboardData::default()),
		})
	})
}

/// Ecosystem-wide dashboard, filterable by sector.
#[component]
pub fn Home() -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let sectors = RwSignal::new(Vec::<String>::new());
	let sector = RwSignal::new(ALL_SECTORS.to_string());
	let data = RwSignal::new(None::<DashboardData>);
	let loading = RwSignal::new(false);
	let page_error = RwSignal::new(None::<String>);
	let requests = RequestGeneration::default();

	let sector_client = client.clone();
	spawn_local(async move {
		match sector_client.sectors().await {
			Ok(list) => sectors.set(list),
			Err(err) => warn!("Sector list unavailable: {}", err),
		}
	});

	Effect::new(move |_| {
		let cnae = sector.get();
		let (client, requests) = (client.clone(), requests.clone());
		let ticket = requests.begin();
		loading.set(true);
		page_error.set(None);
		spawn_local(async move {
			let result = client.dashboard(&cnae).await;
			if !requests.is_current(ticket) {
				debug!("Discarding stale dashboard for {}", cnae);
				return;
			}
			loading.set(false);
			match result {
				Ok(dashboard) => data.set(Some(dashboard)),
				Err(err) => {
					error!("Dashboard for {} failed: {}", cnae, err);
					page_error.set(Some(messages::DASHBOARD_FAILED.to_string()));
				}
			}
		});
	});

	let total = derive_text(data, |d| format_number(d.kpis.total_companies as f64));
	let moment = derive_text(data, |d| d.kpis.predominant_moment.moment.clone());
	let moment_share = Signal::derive(move || {
		data.with(|d| {
			d.as_ref()
				.map(|d| format_percentage(d.kpis.predominant_moment.percentage / 100.0))
		})
	});
	let balance = derive_text(data, |d| format_currency(d.kpis.average_balance));

	view! {
		<div class="page dashboard">
			<header class="page-header">
				<h1>"Painel do Ecossistema"</h1>
				<label class="control">
					<span>"Setor"</span>
					<select
						prop:value=move || sector.get()
						on:change=move |ev| sector.set(event_target_value(&ev))
					>
						<option value=ALL_SECTORS>{ALL_SECTORS}</option>
						<For
							each=move || sectors.get()
							key=|s| s.clone()
							children=move |name: String| {
								let value = name.clone();
								view! { <option value=value>{name}</option> }
							}
						/>
					</select>
				</label>
			</header>

			<StatusBanner loading=loading error=page_error />

			<section class="kpis">
				<KpiCard label="Total de Empresas" value=total />
				<KpiCard label="Momento Predominante" value=moment detail=moment_share />
				<KpiCard label="Saldo Médio" value=balance />
			</section>

			<section class="charts">
				<ChartCanvas
					title="Distribuição por Momento"
					data=chart_of(data, |d| moment_chart(&d.moment_distribution))
				/>
				<ChartCanvas
					title="Receita x Despesa (6 meses)"
					data=chart_of(data, |d| scatter_chart(&d.revenue_expense_clusters))
					height=380
				/>
				<ChartCanvas
					title="Receita Média por Maturidade"
					data=chart_of(data, |d| maturity_chart(&d.maturity_analysis))
				/>
				<ChartCanvas
					title="Volume por Tipo de Transação"
					data=chart_of(data, |d| transaction_chart(&d.transaction_analysis))
				/>
				<ChartCanvas
					title="Receita Total por Setor"
					data=chart_of(data, |d| sector_chart(&d.sector_analysis))
					height=380
				/>
			</section>
		</div>
	}
}
