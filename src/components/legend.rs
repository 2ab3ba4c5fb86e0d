use leptos::prelude::*;

use crate::network::palette::{edge_color, edge_dash, edge_width, node_color};
use crate::network::{EdgeKind, NodeKind};

/// Key of node and edge colors.
#[component]
pub fn Legend() -> impl IntoView {
	let nodes = [NodeKind::Project, NodeKind::Student, NodeKind::Alumni]
		.into_iter()
		.map(|kind| {
			let style = format!("background-color: {};", node_color(kind));
			view! {
				<li class="legend-item">
					<span class="legend-swatch legend-node" style=style>
						{kind.letter()}
					</span>
					{kind.title()}
				</li>
			}
		})
		.collect_view();

	let edges = EdgeKind::ALL
		.into_iter()
		.map(|kind| {
			let line = if edge_dash(kind).is_empty() { "solid" } else { "dashed" };
			let style = format!(
				"border-top: {}px {line} {};",
				edge_width(kind),
				edge_color(kind)
			);
			view! {
				<li class="legend-item">
					<span class="legend-swatch legend-edge" style=style></span>
					{kind.title()}
				</li>
			}
		})
		.collect_view();

	view! {
		<div class="network-legend">
			<h4>"Nodes"</h4>
			<ul>{nodes}</ul>
			<h4>"Connections"</h4>
			<ul>{edges}</ul>
		</div>
	}
}
