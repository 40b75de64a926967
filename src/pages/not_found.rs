use leptos::prelude::*;
use leptos_router::components::A;

/// Fallback for unknown routes.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="page not-found">
			<h1>"Página não encontrada"</h1>
			<p>"O endereço acessado não existe."</p>
			<A href="/">"Voltar ao painel"</A>
		</div>
	}
}
