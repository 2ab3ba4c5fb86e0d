use glam::DVec2;

use crate::network::EdgeKind;

/// Arena slot of one graph node.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	pub position: DVec2,
	pub velocity: DVec2,
	/// Set while the node is pinned.
	pub fixed: Option<DVec2>,
	pub radius: f64,
}

/// Edge between two arena slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
	pub kind: EdgeKind,
	pub distance: f64,
	pub strength: f64,
	/// Share of the correction applied to the target.
	pub bias: f64,
}

/// Drag messages delivered from pointer handlers to the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimulationCommand {
	DragStart { node: usize, position: DVec2 },
	DragMove { node: usize, position: DVec2 },
	DragEnd { node: usize },
}
