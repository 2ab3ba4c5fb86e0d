use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::detail_panel::DetailPanel;
use crate::components::filter_bar::FilterBar;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::legend::Legend;
use crate::config::NetworkConfig;
use crate::controller::{LoadStatus, NetworkController};
use crate::error::FetchError;
use crate::network::GraphNode;

/// Cross-department collaboration network page.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<NetworkConfig>().unwrap_or_default();
	let controller = NetworkController::new(config);
	provide_context(controller);

	let status = controller.status();
	let graph = controller.graph();
	let catalog = controller.catalog();
	let departments = Signal::derive(move || catalog.with(|c| c.palette_departments.clone()));
	let selected = controller.selected();
	let selected_id = Signal::derive(move || selected.with(|s| s.as_ref().map(|n| n.id.clone())));

	let content = move || match status.get() {
		LoadStatus::Loading => view! {
			<div class="network-status">
				<div class="spinner"></div>
				<p>"Loading collaboration network..."</p>
			</div>
		}
		.into_any(),
		LoadStatus::Failed(FetchError::Unauthorized) => view! {
			<div class="network-status network-denied">
				<h3>"Access restricted"</h3>
				<p>{FetchError::Unauthorized.to_string()}</p>
				<p>"This view is available to staff and administrators only."</p>
			</div>
		}
		.into_any(),
		LoadStatus::Failed(FetchError::Empty) => view! {
			<div class="network-status">
				<p>{FetchError::Empty.to_string()}</p>
			</div>
		}
		.into_any(),
		LoadStatus::Failed(e) => view! {
			<div class="network-status network-error">
				<p>{e.to_string()}</p>
				<button class="btn" on:click=move |_| controller.retry()>
					"Retry"
				</button>
			</div>
		}
		.into_any(),
		LoadStatus::Ready => view! {
			<Show when={move || graph.with(|g| g.is_empty())}>
				<p class="network-empty">"No projects match the selected filters."</p>
			</Show>
			<div class="network-body">
				<div class="network-canvas">
					<ForceGraphCanvas
						data=graph
						departments=departments
						selected=selected_id
						on_select={move |node: Option<GraphNode>| controller.select(node)}
						canvas_ref={controller.canvas_ref()}
					/>
				</div>
				<DetailPanel node=selected on_close={move |_: ()| controller.clear_selection()} />
			</div>
			<Legend />
		}
		.into_any(),
	};

	view! {
		<Title text="Collaboration Network" />
		<section class="collaboration-network">
			<header>
				<h2>"Cross-Department Collaboration Network"</h2>
				<p class="subtitle">
					"Drag nodes to reposition. Scroll to zoom. Drag the background to pan. Click a node for details."
				</p>
			</header>
			<FilterBar controller=controller />
			{content}
		</section>
	}
}
