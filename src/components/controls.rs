use leptos::prelude::*;

/// Dropdown over company ids, bound to `selected`.
#[component]
pub fn CompanySelect(
	#[prop(into)] ids: Signal<Vec<String>>,
	selected: RwSignal<Option<String>>,
	#[prop(optional)] placeholder: Option<&'static str>,
) -> impl IntoView {
	view! {
		<label class="control">
			<span>"Empresa"</span>
			<select
				prop:value=move || selected.get().unwrap_or_default()
				on:change=move |ev| {
					let value = event_target_value(&ev);
					selected.set((!value.is_empty()).then_some(value));
				}
			>
				{placeholder.map(|text| view! { <option value="">{text}</option> })}
				<For
					each=move || ids.get()
					key=|id| id.clone()
					children=move |id: String| {
						let value = id.clone();
						let current = id.clone();
						view! {
							<option
								value=value
								prop:selected=move || {
									selected.with(|s| s.as_deref() == Some(current.as_str()))
								}
							>
								{id}
							</option>
						}
					}
				/>
			</select>
		</label>
	}
}

/// Dropdown over a fixed list of numeric choices.
#[component]
pub fn ChoiceSelect<T>(
	#[prop(into)] label: String,
	choices: Vec<(T, &'static str)>,
	value: RwSignal<T>,
) -> impl IntoView
where
	T: Copy + PartialEq + Send + Sync + 'static,
{
	let options = choices
		.iter()
		.enumerate()
		.map(|(idx, (choice, text))| {
			let choice = *choice;
			view! {
				<option value=idx.to_string() prop:selected=move || value.get() == choice>
					{*text}
				</option>
			}
		})
		.collect_view();

	view! {
		<label class="control">
			<span>{label}</span>
			<select on:change=move |ev| {
				if let Some((choice, _)) = event_target_value(&ev)
					.parse::<usize>()
					.ok()
					.and_then(|idx| choices.get(idx))
				{
					value.set(*choice);
				}
			}>{options}</select>
		</label>
	}
}
