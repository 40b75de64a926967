use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error};

use super::{derive_text, load_company_ids};
use crate::api::models::BenchmarkMetric;
use crate::api::{ApiClient, CompanyAnalysis, RequestGeneration};
use crate::charts::series::{cashflow_chart, expense_distribution_chart, revenue_distribution_chart};
use crate::components::{ChartCanvas, CompanySelect, KpiCard, Narrative, StatusBanner};
use crate::error::messages;
use crate::format::{format_currency, format_percentage};

fn metric_value(metric: BenchmarkMetric, value: f64) -> String {
	match metric {
		BenchmarkMetric::Revenue => format_currency(value),
		BenchmarkMetric::Margin => format_percentage(value),
	}
}

/// One company's KPIs, sector benchmark, cash flow and AI diagnosis.
#[component]
pub fn Company() -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let ids = RwSignal::new(Vec::<String>::new());
	let selected = RwSignal::new(None::<String>);
	let analysis = RwSignal::new(None::<CompanyAnalysis>);
	let loading = RwSignal::new(false);
	let page_error = RwSignal::new(None::<String>);
	let requests = RequestGeneration::default();

	load_company_ids(client.clone(), ids, Some(selected), page_error);

	Effect::new(move |_| {
		let Some(id) = selected.get() else {
			return;
		};
		let (client, requests) = (client.clone(), requests.clone());
		let ticket = requests.begin();
		loading.set(true);
		page_error.set(None);
		spawn_local(async move {
			let result = client.company_analysis(&id).await;
			if !requests.is_current(ticket) {
				debug!("Discarding stale analysis for {}", id);
				return;
			}
			loading.set(false);
			match result {
				Ok(loaded) => analysis.set(Some(loaded)),
				Err(err) => {
					error!("Analysis for {} failed: {}", id, err);
					page_error.set(Some(messages::COMPANY_ANALYSIS_FAILED.to_string()));
				}
			}
		});
	});

	let sector = derive_text(analysis, |a| a.details.sector.clone());
	let moment = derive_text(analysis, |a| a.details.kpis.moment.clone());
	let balance = derive_text(analysis, |a| format_currency(a.details.kpis.balance));
	let revenue = derive_text(analysis, |a| format_currency(a.details.kpis.average_revenue_6m));
	let expense = derive_text(analysis, |a| format_currency(a.details.kpis.average_expense_6m));
	let margin = derive_text(analysis, |a| format_percentage(a.details.kpis.average_margin_6m));
	let diagnosis = Signal::derive(move || {
		analysis.with(|a| a.as_ref().map(|a| a.diagnosis.clone()).unwrap_or_default())
	});

	let cashflow = Signal::derive(move || {
		analysis.with(|a| {
			cashflow_chart(
				a.as_ref().map(|a| a.details.cashflow_history.as_slice()).unwrap_or_default(),
			)
		})
	});
	let revenue_mix = Signal::derive(move || {
		analysis.with(|a| {
			revenue_distribution_chart(
				a.as_ref().map(|a| a.details.revenue_distribution.as_slice()).unwrap_or_default(),
			)
		})
	});
	let expense_mix = Signal::derive(move || {
		analysis.with(|a| {
			expense_distribution_chart(
				a.as_ref().map(|a| a.details.expense_distribution.as_slice()).unwrap_or_default(),
			)
		})
	});

	let benchmark_rows = move || {
		analysis.with(|a| {
			a.as_ref()
				.map(|a| a.details.benchmarking.rows(&a.details.kpis))
				.unwrap_or_default()
		})
	};

	view! {
		<div class="page company">
			<header class="page-header">
				<h1>"Análise da Empresa"</h1>
				<CompanySelect ids=ids selected=selected />
			</header>

			<StatusBanner loading=loading error=page_error />

			<section class="kpis">
				<KpiCard label="Setor" value=sector />
				<KpiCard label="Momento" value=moment />
				<KpiCard label="Saldo" value=balance />
				<KpiCard label="Receita Média (6m)" value=revenue />
				<KpiCard label="Despesa Média (6m)" value=expense />
				<KpiCard label="Margem Média (6m)" value=margin />
			</section>

			<section class="benchmark">
				<h3>"Comparativo com o Setor"</h3>
				<table>
					<thead>
						<tr>
							<th>"Indicador"</th>
							<th>"Empresa"</th>
							<th>"Setor"</th>
							<th>"Diferença"</th>
						</tr>
					</thead>
					<tbody>
						{move || {
							benchmark_rows()
								.into_iter()
								.map(|row| {
									let class = if row.delta() >= 0.0 { "positive" } else { "negative" };
									view! {
										<tr>
											<td>{row.metric.label()}</td>
											<td>{metric_value(row.metric, row.company)}</td>
											<td>{metric_value(row.metric, row.sector)}</td>
											<td class=class>{metric_value(row.metric, row.delta())}</td>
										</tr>
									}
								})
								.collect_view()
						}}
					</tbody>
				</table>
			</section>

			<Narrative title="Diagnóstico" text=diagnosis />

			<section class="charts">
				<ChartCanvas title="Fluxo de Caixa" data=cashflow height=360 />
				<ChartCanvas title="Distribuição de Receitas" data=revenue_mix />
				<ChartCanvas title="Distribuição de Despesas" data=expense_mix />
			</section>
		</div>
	}
}
