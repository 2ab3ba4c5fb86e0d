use std::collections::HashMap;

use super::types::{EdgeKind, NodeKind};

/// Categorical palette for departments, cycled when there are more departments than colors.
pub const DEPARTMENT_COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub fn node_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Project => "#4CAF50",
		NodeKind::Student => "#2196F3",
		NodeKind::Alumni => "#FFC107",
	}
}

pub fn edge_color(kind: EdgeKind) -> &'static str {
	match kind {
		EdgeKind::Owner => "#4CAF50",
		EdgeKind::Collaborator => "#2196F3",
		EdgeKind::Mentor => "#FFC107",
		EdgeKind::Interdepartmental => "#9C27B0",
	}
}

/// Line width in graph units.
pub fn edge_width(kind: EdgeKind) -> f64 {
	match kind {
		EdgeKind::Owner => 3.0,
		EdgeKind::Collaborator | EdgeKind::Mentor => 2.0,
		EdgeKind::Interdepartmental => 1.0,
	}
}

/// Dash and gap lengths, empty for solid lines.
pub fn edge_dash(kind: EdgeKind) -> &'static [f64] {
	match kind {
		EdgeKind::Interdepartmental => &[5.0, 5.0],
		_ => &[],
	}
}

/// Ordinal department → color mapping. Departments get colors in the order
/// they are first seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepartmentPalette {
	slots: HashMap<String, usize>,
}

impl DepartmentPalette {
	pub fn new<'a>(departments: impl IntoIterator<Item = &'a str>) -> Self {
		let mut palette = Self::default();
		for department in departments {
			palette.register(department);
		}
		palette
	}

	pub fn register(&mut self, department: &str) {
		let next = self.slots.len();
		self.slots.entry(department.to_string()).or_insert(next);
	}

	pub fn color(&self, department: &str) -> &'static str {
		let slot = self.slots.get(department).copied().unwrap_or(0);
		DEPARTMENT_COLORS[slot % DEPARTMENT_COLORS.len()]
	}
}
