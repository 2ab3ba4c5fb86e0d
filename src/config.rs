//! Runtime configuration for the collaboration network view.

use crate::network::{EdgeKind, NodeKind};

const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Allowed zoom range of the view transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomExtent {
	pub min: f64,
	pub max: f64,
}

impl ZoomExtent {
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min, self.max)
	}
}

impl Default for ZoomExtent {
	fn default() -> Self {
		Self { min: 0.1, max: 3.0 }
	}
}

/// Settings of the page and of the API client.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
	pub api_base_url: String,
	pub access_token_key: String,
	pub refresh_token_key: String,
	pub role_key: String,
	pub canvas_height: f64,
	pub zoom: ZoomExtent,
	pub export_file_name: String,
	pub layout: LayoutConfig,
}

impl NetworkConfig {
	/// Configuration baked in at compile time through `COLLAB_API_URL`.
	pub fn from_build_env() -> Self {
		let mut config = Self::default();
		if let Some(url) = option_env!("COLLAB_API_URL") {
			config.api_base_url = url.trim_end_matches('/').to_string();
		}
		config
	}

	pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
		self.api_base_url = url.into().trim_end_matches('/').to_string();
		self
	}

	pub fn zoom(mut self, min: f64, max: f64) -> Self {
		self.zoom = ZoomExtent { min, max };
		self
	}

	pub fn canvas_height(mut self, height: f64) -> Self {
		self.canvas_height = height;
		self
	}

	pub fn layout(mut self, layout: LayoutConfig) -> Self {
		self.layout = layout;
		self
	}

	/// Full URL of an API path such as `/projects/all`.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}{}", self.api_base_url, path)
	}
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			api_base_url: DEFAULT_API_BASE.to_string(),
			access_token_key: "access_token".to_string(),
			refresh_token_key: "refresh_token".to_string(),
			role_key: "user_role".to_string(),
			canvas_height: 600.0,
			zoom: ZoomExtent::default(),
			export_file_name: "collaboration-network.png".to_string(),
			layout: LayoutConfig::default(),
		}
	}
}

/// Force constants of the layout simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub owner_distance: f64,
	pub collaborator_distance: f64,
	pub mentor_distance: f64,
	pub interdepartmental_distance: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	pub project_radius: f64,
	pub student_radius: f64,
	pub alumni_radius: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target while a node is dragged.
	pub reheat_target: f64,
}

impl LayoutConfig {
	pub fn link_distance(&self, kind: EdgeKind) -> f64 {
		match kind {
			EdgeKind::Owner => self.owner_distance,
			EdgeKind::Collaborator => self.collaborator_distance,
			EdgeKind::Mentor => self.mentor_distance,
			EdgeKind::Interdepartmental => self.interdepartmental_distance,
		}
	}

	pub fn collision_radius(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::Project => self.project_radius,
			NodeKind::Student => self.student_radius,
			NodeKind::Alumni => self.alumni_radius,
		}
	}

	pub fn charge_strength(mut self, strength: f64) -> Self {
		self.charge_strength = strength;
		self
	}

	/// Number of ticks for alpha to cool from 1 to `alpha_min`.
	pub fn cooling_ticks(mut self, ticks: u32) -> Self {
		self.alpha_decay = 1.0 - self.alpha_min.powf(1.0 / ticks.max(1) as f64);
		self
	}
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			owner_distance: 70.0,
			collaborator_distance: 100.0,
			mentor_distance: 150.0,
			interdepartmental_distance: 200.0,
			charge_strength: -500.0,
			project_radius: 25.0,
			student_radius: 15.0,
			alumni_radius: 20.0,
			alpha_min,
			alpha_decay: 1.0 - f64::powf(alpha_min, 1.0 / 300.0),
			velocity_decay: 0.4,
			reheat_target: 0.3,
		}
	}
}
