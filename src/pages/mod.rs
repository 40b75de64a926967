pub mod company;
pub mod forecast;
pub mod home;
pub mod not_found;
pub mod value_chain;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use crate::api::ApiClient;
use crate::error::messages;

/// Shown in KPI cards before data arrives.
pub const PLACEHOLDER: &str = "-";

/// Formats a field of the loaded payload, or [`PLACEHOLDER`] while there is none.
pub(crate) fn derive_text<T, F>(source: RwSignal<Option<T>>, format: F) -> Signal<String>
where
	T: Send + Sync + 'static,
	F: Fn(&T) -> String + Send + Sync + 'static,
{
	Signal::derive(move || {
		source.with(|value| {
			value
				.as_ref()
				.map(&format)
				.unwrap_or_else(|| PLACEHOLDER.to_string())
		})
	})
}

/// Fetches the company id list once and selects the first id.
pub(crate) fn load_company_ids(
	client: ApiClient,
	ids: RwSignal<Vec<String>>,
	selected: Option<RwSignal<Option<String>>>,
	page_error: RwSignal<Option<String>>,
) {
	spawn_local(async move {
		match client.company_ids().await {
			Ok(list) => {
				info!("Loaded {} company ids", list.len());
				if let Some(selected) = selected {
					if selected.get_untracked().is_none() {
						selected.set(list.first().cloned());
					}
				}
				ids.set(list);
			}
			Err(err) => {
				error!("Company ids failed: {}", err);
				page_error.set(Some(messages::COMPANY_IDS_FAILED.to_string()));
			}
		}
	});
}
