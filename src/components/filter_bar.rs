use leptos::prelude::*;

use crate::controller::NetworkController;
use crate::network::Selection;

/// Department and technology drop-downs plus the reset and export actions.
#[component]
pub fn FilterBar(controller: NetworkController) -> impl IntoView {
	let catalog = controller.catalog();
	let filter = controller.filter();

	view! {
		<div class="filter-bar">
			<label>
				"Department "
				<select
					prop:value=move || filter.with(|f| f.department.as_value().to_string())
					on:change=move |ev| {
						controller.set_department_filter(Selection::from_value(&event_target_value(&ev)))
					}
				>
					<option value="all">"All Departments"</option>
					<For
						each=move || catalog.get().departments
						key=|dept| dept.clone()
						children=move |dept: String| {
							let value = dept.clone();
							view! { <option value=value>{dept}</option> }
						}
					/>
				</select>
			</label>
			<label>
				"Technology "
				<select
					prop:value=move || filter.with(|f| f.technology.as_value().to_string())
					on:change=move |ev| {
						controller.set_tech_filter(Selection::from_value(&event_target_value(&ev)))
					}
				>
					<option value="all">"All Technologies"</option>
					<For
						each=move || catalog.get().technologies
						key=|tech| tech.clone()
						children=move |tech: String| {
							let value = tech.clone();
							view! { <option value=value>{tech}</option> }
						}
					/>
				</select>
			</label>
			<button
				class="btn"
				disabled=move || filter.with(|f| f.is_default())
				on:click=move |_| controller.reset_filters()
			>
				"Reset Filters"
			</button>
			<button
				class="btn btn-primary"
				on:click=move |_| {
					controller.export_current_view();
				}
			>
				"Export PNG"
			</button>
		</div>
	}
}
