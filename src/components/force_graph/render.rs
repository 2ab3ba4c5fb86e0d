use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use crate::network::palette::{edge_color, edge_dash, edge_width, node_color};
use crate::network::{GraphNode, NodeDetails, NodeKind};

const BACKGROUND: &str = "#ffffff";
const LABEL_COLOR: &str = "#333333";
const DEPARTMENT_STROKE: f64 = 3.0;
const BASE_EDGE_ALPHA: f64 = 0.6;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Vertical offset of the label below a node.
fn label_offset(kind: NodeKind) -> f64 {
	match kind {
		NodeKind::Project => 40.0,
		NodeKind::Student => 30.0,
		NodeKind::Alumni => 35.0,
	}
}

/// Lines shown in the hover tooltip.
pub fn tooltip_lines(node: &GraphNode) -> Vec<String> {
	let mut lines = vec![
		node.name.clone(),
		format!("Type: {}", node.kind.title()),
		format!("Department: {}", node.department),
	];
	if let NodeDetails::Project {
		tech_stack,
		progress,
		..
	} = &node.details
	{
		lines.push(format!("Tech: {}", tech_stack.join(", ")));
		lines.push(format!("Progress: {progress}%"));
	}
	lines
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn set_dash(ctx: &CanvasRenderingContext2d, pattern: &[f64]) {
	let array = js_sys::Array::new();
	for length in pattern {
		array.push(&JsValue::from_f64(*length));
	}
	let _ = ctx.set_line_dash(&array);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let nodes = state.simulation.nodes();
	let has_highlight = state.has_active_highlight();
	let t = ease_out_cubic(state.hover.highlight_t);

	for link in state.simulation.links() {
		let (a, b) = (nodes[link.source].position, nodes[link.target].position);

		// t=0: every edge at the base alpha, t=1: incident edges opaque, others faint
		let alpha = if !has_highlight {
			BASE_EDGE_ALPHA
		} else if state.is_edge_highlighted(link) {
			BASE_EDGE_ALPHA + (1.0 - BASE_EDGE_ALPHA) * t
		} else {
			BASE_EDGE_ALPHA - (BASE_EDGE_ALPHA - 0.1) * t
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge_color(link.kind));
		ctx.set_line_width(edge_width(link.kind));
		set_dash(ctx, edge_dash(link.kind));
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
	set_dash(ctx, &[]);
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	// Dimmed nodes first so the highlighted neighborhood is drawn on top
	for pass_highlighted in [false, true] {
		for (idx, sim_node) in state.simulation.nodes().iter().enumerate() {
			let highlighted = has_highlight && state.is_highlighted(idx);
			if highlighted != pass_highlighted {
				continue;
			}
			let Some(node) = state.node(idx) else {
				continue;
			};
			let alpha = if has_highlight && !highlighted {
				1.0 - 0.8 * t
			} else {
				1.0
			};
			let (x, y, radius) = (sim_node.position.x, sim_node.position.y, sim_node.radius);

			if state.is_hovered(idx) && t > 0.01 {
				draw_glow(ctx, x, y, radius, t);
			}

			ctx.set_global_alpha(alpha);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(node_color(node.kind));
			ctx.fill();
			ctx.set_stroke_style_str(state.palette.color(&node.department));
			ctx.set_line_width(DEPARTMENT_STROKE);
			ctx.stroke();

			if state.selected == Some(idx) {
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius + 5.0, 0.0, 2.0 * PI);
				ctx.set_stroke_style_str(LABEL_COLOR);
				ctx.set_line_width(1.5);
				ctx.stroke();
			}

			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			ctx.set_fill_style_str("white");
			let letter_size = if node.kind == NodeKind::Project { 12 } else { 10 };
			ctx.set_font(&format!("bold {letter_size}px sans-serif"));
			let _ = ctx.fill_text(node.kind.letter(), x, y);

			ctx.set_fill_style_str(LABEL_COLOR);
			ctx.set_font("12px sans-serif");
			let _ = ctx.fill_text(&node.label(), x, y + label_offset(node.kind));
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_glow(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, t: f64) {
	let glow_radius = radius * (1.4 + 0.6 * t);
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) else {
		return;
	};
	let alpha = 0.35 * t;
	let _ = gradient.add_color_stop(0.0, &format!("rgba(33, 150, 243, {alpha})"));
	let _ = gradient.add_color_stop(1.0, "rgba(33, 150, 243, 0)");
	ctx.begin_path();
	let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(idx) = state.hover.node else {
		return;
	};
	if state.drag.active || state.hover.highlight_t < 0.01 {
		return;
	}
	let (Some(node), Some(sim_node)) = (state.node(idx), state.simulation.node(idx)) else {
		return;
	};

	let lines = tooltip_lines(node);
	let (sx, sy) = state.transform.graph_to_screen(sim_node.position);
	let (line_height, padding) = (16.0, 8.0);

	ctx.set_font("12px sans-serif");
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	let width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let height = lines.len() as f64 * line_height;

	// Keep the box inside the canvas
	let x = (sx + 10.0).min(state.width - width - 2.0 * padding).max(0.0);
	let y = (sy - 10.0).min(state.height - height - 2.0 * padding).max(0.0);

	ctx.set_global_alpha(0.95);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(x, y, width + 2.0 * padding, height + 2.0 * padding);
	ctx.set_stroke_style_str("#cccccc");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, width + 2.0 * padding, height + 2.0 * padding);
	ctx.set_global_alpha(1.0);

	ctx.set_fill_style_str(LABEL_COLOR);
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + padding, y + padding + i as f64 * line_height);
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn project_tooltips_list_tech_and_progress() {
		let node = GraphNode {
			id: "project-p1".to_string(),
			name: "Campus Map".to_string(),
			kind: NodeKind::Project,
			department: "CSE".to_string(),
			details: NodeDetails::Project {
				record_id: "p1".to_string(),
				tech_stack: vec!["React".to_string(), "Flask".to_string()],
				progress: 40.0,
			},
		};
		assert_eq!(
			tooltip_lines(&node),
			vec![
				"Campus Map",
				"Type: Project",
				"Department: CSE",
				"Tech: React, Flask",
				"Progress: 40%",
			]
		);
	}

	#[test]
	fn person_tooltips_stop_at_department() {
		let node = GraphNode {
			id: "alumni-m1".to_string(),
			name: "Dr. Rao".to_string(),
			kind: NodeKind::Alumni,
			department: "EEE".to_string(),
			details: NodeDetails::Person {
				profile_id: Some("m1".to_string()),
				email: String::new(),
			},
		};
		assert_eq!(tooltip_lines(&node).len(), 3);
		assert_eq!(tooltip_lines(&node)[1], "Type: Alumni");
	}

	#[test]
	fn easing_hits_the_endpoints() {
		assert_eq!(ease_out_cubic(0.0), 0.0);
		assert_eq!(ease_out_cubic(1.0), 1.0);
	}
}
