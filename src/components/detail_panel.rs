use leptos::either::Either;
use leptos::prelude::*;

use crate::network::palette::node_color;
use crate::network::{GraphNode, NodeDetails, NodeKind};

fn details_view(node: &GraphNode) -> impl IntoView + use<> {
	match node.details.clone() {
		NodeDetails::Project {
			tech_stack,
			progress,
			..
		} => Either::Left(view! {
			<div class="detail-progress">
				<span>{format!("Progress: {progress}%")}</span>
				<div class="progress-track">
					<div class="progress-bar" style=format!("width: {progress}%;")></div>
				</div>
			</div>
			<div class="tech-badges">
				{tech_stack
					.into_iter()
					.map(|tech| view! { <span class="badge">{tech}</span> })
					.collect_view()}
			</div>
		}),
		NodeDetails::Person { email, .. } => Either::Right(
			(!email.is_empty()).then(|| view! { <p class="detail-email">{email}</p> }),
		),
	}
}

/// Side panel describing the selected node.
#[component]
pub fn DetailPanel(
	#[prop(into)] node: Signal<Option<GraphNode>>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	move || {
		node.get().map(|node| {
			let badge_style = format!("background-color: {};", node_color(node.kind));
			let link_text = if node.kind == NodeKind::Project {
				"View Project"
			} else {
				"View Profile"
			};
			let link = node
				.link()
				.map(|href| view! { <a class="detail-link" href=href>{link_text}</a> });

			view! {
				<aside class="detail-panel">
					<button class="detail-close" on:click=move |_| on_close.run(())>
						"×"
					</button>
					<span class="kind-badge" style=badge_style>
						{node.kind.title()}
					</span>
					<h3>{node.name.clone()}</h3>
					<p class="detail-department">{format!("Department: {}", node.department)}</p>
					{details_view(&node)}
					{link}
				</aside>
			}
		})
	}
}
