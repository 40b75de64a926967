use leptos::prelude::*;

#[component]
pub fn KpiCard(
	#[prop(into)] label: String,
	#[prop(into)] value: Signal<String>,
	#[prop(into, optional)] detail: Signal<Option<String>>,
) -> impl IntoView {
	view! {
		<div class="kpi-card">
			<span class="kpi-label">{label}</span>
			<span class="kpi-value">{move || value.get()}</span>
			{move || detail.get().map(|d| view! { <span class="kpi-detail">{d}</span> })}
		</div>
	}
}

/// Status line shown above a page's content while loading or after a failure.
#[component]
pub fn StatusBanner(
	#[prop(into)] loading: Signal<bool>,
	#[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
	view! {
		{move || loading.get().then(|| view! { <div class="status loading">"Carregando..."</div> })}
		{move || error.get().map(|e| view! { <div class="status error">{e}</div> })}
	}
}

/// AI narrative block.
#[component]
pub fn Narrative(#[prop(into)] title: String, #[prop(into)] text: Signal<String>) -> impl IntoView {
	view! {
		<section class="narrative">
			<h3>{title}</h3>
			<p>{move || text.get()}</p>
		</section>
	}
}
