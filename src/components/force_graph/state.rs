use std::collections::HashSet;

use glam::DVec2;

use super::scale::ViewTransform;
use super::simulation::Simulation;
use super::types::{SimLink, SimulationCommand};
use crate::config::{LayoutConfig, NetworkConfig, ZoomExtent};
use crate::network::{DepartmentPalette, GraphData, GraphNode};

/// Pointer travel, in screen pixels, below which a press and release count as a click.
pub const CLICK_SLOP: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: DVec2,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// What a completed press/release meant for the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
	Nothing,
	Selected(usize),
	Cleared,
}

pub struct ForceGraphState {
	pub graph: GraphData,
	pub simulation: Simulation,
	pub palette: DepartmentPalette,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<usize>,
	pub width: f64,
	pub height: f64,
	zoom: ZoomExtent,
	layout: LayoutConfig,
	press: Option<(f64, f64)>,
	travelled: f64,
	adjacency: Vec<Vec<usize>>,
}

impl ForceGraphState {
	pub fn new(graph: GraphData, config: &NetworkConfig, width: f64, height: f64) -> Self {
		let simulation = Simulation::new(
			&graph,
			&config.layout,
			DVec2::new(width / 2.0, height / 2.0),
		);
		let mut state = Self {
			palette: DepartmentPalette::default(),
			adjacency: Vec::new(),
			graph,
			simulation,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			zoom: config.zoom,
			layout: config.layout.clone(),
			press: None,
			travelled: 0.0,
		};
		state.index_graph();
		state
	}

	/// Swaps in a freshly built graph. Positions start over; the view transform stays.
	pub fn rebuild(&mut self, graph: GraphData) {
		self.simulation = Simulation::new(
			&graph,
			&self.layout,
			DVec2::new(self.width / 2.0, self.height / 2.0),
		);
		self.graph = graph;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = HoverState::default();
		self.selected = None;
		self.press = None;
		self.index_graph();
	}

	/// Fixes the department → color mapping. Departments missing from the
	/// list get colors after it, in the order their nodes appear.
	pub fn set_departments<'a>(&mut self, departments: impl IntoIterator<Item = &'a str>) {
		self.palette = DepartmentPalette::new(departments);
		self.register_departments();
	}

	fn register_departments(&mut self) {
		for node in &self.graph.nodes {
			self.palette.register(&node.department);
		}
	}

	fn index_graph(&mut self) {
		self.register_departments();
		self.adjacency = vec![Vec::new(); self.graph.nodes.len()];
		for link in self.simulation.links() {
			self.adjacency[link.source].push(link.target);
			self.adjacency[link.target].push(link.source);
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> DVec2 {
		self.transform.screen_to_graph(sx, sy)
	}

	/// Topmost node under the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let point = self.screen_to_graph(sx, sy);
		self.simulation
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, node)| node.position.distance(point) < node.radius)
			.map(|(idx, _)| idx)
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.graph.nodes.get(idx)
	}

	pub fn selected_node(&self) -> Option<&GraphNode> {
		self.selected.and_then(|idx| self.node(idx))
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the previous neighborhood around for the fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			if let Some(adjacent) = self.adjacency.get(idx) {
				self.hover.neighbors.extend(adjacent.iter().copied());
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	/// Edges incident to the hovered node.
	pub fn is_edge_highlighted(&self, link: &SimLink) -> bool {
		let focus = self.hover.node.or(self.hover.prev_node);
		focus.is_some_and(|idx| link.source == idx || link.target == idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.press = Some((x, y));
		self.travelled = 0.0;
		if let Some(idx) = self.node_at_position(x, y) {
			let node_start = self.simulation.nodes()[idx].position;
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				node_start,
			};
			self.simulation.apply(SimulationCommand::DragStart {
				node: idx,
				position: node_start,
			});
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if let Some((px, py)) = self.press {
			self.travelled = self.travelled.max(DVec2::new(x - px, y - py).length());
		}

		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let offset = DVec2::new(x - self.drag.start_x, y - self.drag.start_y) / self.transform.k;
				self.simulation.apply(SimulationCommand::DragMove {
					node: idx,
					position: self.drag.node_start + offset,
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self) -> PointerOutcome {
		let clicked = self.press.is_some() && self.travelled < CLICK_SLOP;
		let dragged = self.drag.node_idx;
		if let Some(idx) = dragged {
			self.simulation.apply(SimulationCommand::DragEnd { node: idx });
		}
		let was_panning = self.pan.active;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.press = None;

		match (clicked, dragged) {
			(true, Some(idx)) => {
				self.selected = Some(idx);
				PointerOutcome::Selected(idx)
			}
			(true, None) if was_panning => {
				self.selected = None;
				PointerOutcome::Cleared
			}
			_ => PointerOutcome::Nothing,
		}
	}

	pub fn pointer_leave(&mut self) {
		if let Some(idx) = self.drag.node_idx {
			self.simulation.apply(SimulationCommand::DragEnd { node: idx });
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.press = None;
		self.set_hover(None);
	}

	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		self.transform
			.zoom_at(x, y, ViewTransform::wheel_factor(delta_y), self.zoom);
	}

	pub fn select(&mut self, idx: Option<usize>) {
		self.selected = idx.filter(|&i| i < self.graph.nodes.len());
	}

	pub fn tick(&mut self, dt: f64) {
		self.simulation.step();

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation
			.set_center(DVec2::new(width / 2.0, height / 2.0));
		self.simulation.restart();
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::api::decode_projects;
	use crate::network::{FilterCatalog, FilterState, Selection, build_graph};

	fn state() -> ForceGraphState {
		let (records, _) = decode_projects(vec![json!({
			"_id": "p1", "department": "CSE",
			"student": { "_id": "u1", "name": "A", "dept": "CSE" },
			"collaborators": [{ "id": "u2", "name": "B", "dept": "ECE" }],
			"mentor": { "_id": "m1", "name": "M", "dept": "EEE" },
		})]);
		let graph = build_graph(&records, &FilterState::default());
		let mut state = ForceGraphState::new(graph, &NetworkConfig::default(), 800.0, 600.0);
		while state.simulation.step() {}
		state
	}

	fn screen_position(state: &ForceGraphState, idx: usize) -> (f64, f64) {
		state
			.transform
			.graph_to_screen(state.simulation.nodes()[idx].position)
	}

	#[test]
	fn hit_testing_finds_nodes() {
		let state = state();
		for idx in 0..state.graph.nodes.len() {
			let (x, y) = screen_position(&state, idx);
			assert_eq!(state.node_at_position(x, y), Some(idx));
		}
		assert_eq!(state.node_at_position(-500.0, -500.0), None);
	}

	#[test]
	fn hover_highlights_the_neighborhood() {
		let mut state = state();
		let mentor = state.simulation.index_of("alumni-m1").expect("mentor");
		let project = state.simulation.index_of("project-p1").expect("project");
		let owner = state.simulation.index_of("student-u1").expect("owner");

		state.set_hover(Some(mentor));
		assert!(state.is_hovered(mentor));
		assert!(state.is_highlighted(project));
		assert!(!state.is_highlighted(owner));

		let mentor_edge = state
			.simulation
			.links()
			.iter()
			.find(|l| l.source == mentor)
			.copied()
			.expect("mentor edge");
		assert!(state.is_edge_highlighted(&mentor_edge));

		state.set_hover(None);
		assert_eq!(state.hover.prev_node, Some(mentor));
		for _ in 0..500 {
			state.tick(0.016);
		}
		assert!(!state.has_active_highlight());
	}

	#[test]
	fn click_on_node_selects_it() {
		let mut state = state();
		let (x, y) = screen_position(&state, 0);
		state.pointer_down(x, y);
		state.pointer_move(x + 1.0, y);
		assert_eq!(state.pointer_up(), PointerOutcome::Selected(0));
		assert_eq!(state.selected_node().map(|n| n.id.as_str()), Some("project-p1"));
		assert!(state.simulation.nodes()[0].fixed.is_none());
	}

	#[test]
	fn click_on_background_clears_selection() {
		let mut state = state();
		state.select(Some(1));
		state.pointer_down(-500.0, -500.0);
		assert_eq!(state.pointer_up(), PointerOutcome::Cleared);
		assert_eq!(state.selected, None);
	}

	#[test]
	fn dragging_pins_then_releases_without_selecting() {
		let mut state = state();
		let (x, y) = screen_position(&state, 1);
		state.pointer_down(x, y);
		state.pointer_move(x + 40.0, y + 30.0);

		let pinned = state.simulation.nodes()[1].fixed.expect("pinned");
		let expected = state.screen_to_graph(x + 40.0, y + 30.0);
		assert!(pinned.distance(expected) < 1e-9);

		assert_eq!(state.pointer_up(), PointerOutcome::Nothing);
		assert!(state.simulation.nodes()[1].fixed.is_none());
		assert_eq!(state.selected, None);
	}

	#[test]
	fn panning_moves_only_the_view() {
		let mut state = state();
		let positions: Vec<DVec2> = state.simulation.nodes().iter().map(|n| n.position).collect();
		state.pointer_down(-500.0, -500.0);
		state.pointer_move(-400.0, -450.0);
		assert_eq!(state.pointer_up(), PointerOutcome::Nothing);

		assert_eq!((state.transform.x, state.transform.y), (100.0, 50.0));
		let after: Vec<DVec2> = state.simulation.nodes().iter().map(|n| n.position).collect();
		assert_eq!(positions, after);
	}

	#[test]
	fn wheel_zoom_respects_the_extent() {
		let mut state = state();
		for _ in 0..200 {
			state.wheel(400.0, 300.0, -100.0);
		}
		assert_eq!(state.transform.k, 3.0);
	}

	#[test]
	fn department_colors_survive_filter_changes() {
		let (records, _) = decode_projects(vec![
			json!({ "_id": "p1", "department": "CSE" }),
			json!({ "_id": "p2", "department": "ECE" }),
		]);
		let catalog = FilterCatalog::from_projects(&records);
		let only = |dept: &str| FilterState::new(Selection::from_value(dept), Selection::All);

		let mut state = ForceGraphState::new(
			build_graph(&records, &only("ECE")),
			&NetworkConfig::default(),
			800.0,
			600.0,
		);
		state.set_departments(catalog.palette_departments.iter().map(String::as_str));
		let ece = state.palette.color("ECE");
		state.rebuild(build_graph(&records, &FilterState::default()));
		assert_eq!(state.palette.color("ECE"), ece);
		state.rebuild(build_graph(&records, &only("CSE")));
		assert_eq!(state.palette.color("ECE"), ece);
		assert_ne!(state.palette.color("CSE"), ece);
	}

	#[test]
	fn rebuild_resets_interaction() {
		let mut state = state();
		state.select(Some(0));
		state.set_hover(Some(0));
		state.rebuild(GraphData::default());
		assert_eq!(state.selected, None);
		assert!(!state.has_active_highlight());
		assert!(state.simulation.nodes().is_empty());
	}
}
