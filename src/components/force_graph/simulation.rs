use std::collections::HashMap;
use std::f64::consts::PI;

use glam::DVec2;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{SimLink, SimNode, SimulationCommand};
use crate::config::LayoutConfig;
use crate::network::GraphData;

const INITIAL_RADIUS: f64 = 10.0;
const DISTANCE_MIN_SQ: f64 = 1.0;

const JIGGLE_SEED: u64 = 1;

/// Tiny random offset for coincident points. Seeded, so layouts are reproducible.
fn jiggle(rng: &mut StdRng) -> f64 {
	rng.gen_range(-0.5e-6..0.5e-6)
}

/// Force-directed layout over an arena of nodes.
///
/// Every tick moves alpha toward its target, accumulates link, charge,
/// centering and collision forces into velocities, then integrates positions.
/// Pinned nodes sit exactly at their pin with zero velocity while the rest of
/// the graph keeps moving.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	index: HashMap<String, usize>,
	alpha: f64,
	alpha_target: f64,
	center: DVec2,
	config: LayoutConfig,
	rng: StdRng,
}

impl Simulation {
	pub fn new(graph: &GraphData, config: &LayoutConfig, center: DVec2) -> Self {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		let mut index = HashMap::with_capacity(graph.nodes.len());
		let nodes: Vec<SimNode> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				index.insert(node.id.clone(), i);
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				SimNode {
					position: center + DVec2::new(radius * angle.cos(), radius * angle.sin()),
					velocity: DVec2::ZERO,
					fixed: None,
					radius: config.collision_radius(node.kind),
				}
			})
			.collect();

		let mut degree = vec![0usize; nodes.len()];
		let mut links: Vec<SimLink> = graph
			.edges
			.iter()
			.filter_map(|edge| {
				let source = *index.get(&edge.source)?;
				let target = *index.get(&edge.target)?;
				degree[source] += 1;
				degree[target] += 1;
				Some(SimLink {
					source,
					target,
					kind: edge.kind,
					distance: config.link_distance(edge.kind),
					strength: 0.0,
					bias: 0.0,
				})
			})
			.collect();
		for link in &mut links {
			let (ds, dt) = (degree[link.source] as f64, degree[link.target] as f64);
			link.strength = 1.0 / ds.min(dt);
			link.bias = ds / (ds + dt);
		}

		debug!(
			"Simulation started with {} nodes and {} links",
			nodes.len(),
			links.len()
		);
		Self {
			nodes,
			links,
			index,
			alpha: 1.0,
			alpha_target: 0.0,
			center,
			config: config.clone(),
			rng: StdRng::seed_from_u64(JIGGLE_SEED),
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn center(&self) -> DVec2 {
		self.center
	}

	pub fn set_center(&mut self, center: DVec2) {
		self.center = center;
	}

	/// No more movement expected until the next reheat.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	/// Ticks unless settled. Returns whether a tick ran.
	pub fn step(&mut self) -> bool {
		if self.is_settled() {
			return false;
		}
		self.tick();
		if self.is_settled() {
			debug!("Simulation settled");
		}
		true
	}

	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collision();

		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fixed {
				Some(fixed) => {
					node.position = fixed;
					node.velocity = DVec2::ZERO;
				}
				None => {
					node.velocity *= keep;
					node.position += node.velocity;
				}
			}
		}
	}

	/// Holds a node at `position` until [`Simulation::unpin`].
	pub fn pin(&mut self, idx: usize, position: DVec2) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fixed = Some(position);
			node.position = position;
			node.velocity = DVec2::ZERO;
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fixed = None;
		}
	}

	/// Keeps the simulation warm, e.g. while a node is dragged.
	pub fn reheat(&mut self) {
		self.alpha_target = self.config.reheat_target;
	}

	/// Lets alpha decay back to rest.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Restarts a settled or cooling simulation from full temperature.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
	}

	pub fn apply(&mut self, command: SimulationCommand) {
		match command {
			SimulationCommand::DragStart { node, position } => {
				debug!("[{node}] Drag start");
				self.reheat();
				self.pin(node, position);
			}
			SimulationCommand::DragMove { node, position } => {
				self.pin(node, position);
			}
			SimulationCommand::DragEnd { node } => {
				debug!("[{node}] Drag end");
				self.cool();
				self.unpin(node);
			}
		}
	}

	fn apply_links(&mut self) {
		for i in 0..self.links.len() {
			let link = self.links[i];
			let (source, target) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut delta =
				(target.position + target.velocity) - (source.position + source.velocity);
			if delta.x == 0.0 {
				delta.x = jiggle(&mut self.rng);
			}
			if delta.y == 0.0 {
				delta.y = jiggle(&mut self.rng);
			}
			let length = delta.length();
			delta *= (length - link.distance) / length * self.alpha * link.strength;
			self.nodes[link.target].velocity -= delta * link.bias;
			self.nodes[link.source].velocity += delta * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.config.charge_strength * self.alpha;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut delta = self.nodes[j].position - self.nodes[i].position;
				if delta.x == 0.0 {
					delta.x = jiggle(&mut self.rng);
				}
				if delta.y == 0.0 {
					delta.y = jiggle(&mut self.rng);
				}
				let mut l = delta.length_squared();
				if l < DISTANCE_MIN_SQ {
					l = (DISTANCE_MIN_SQ * l).sqrt();
				}
				let push = delta * strength / l;
				self.nodes[i].velocity += push;
				self.nodes[j].velocity -= push;
			}
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let sum: DVec2 = self.nodes.iter().map(|n| n.position).sum();
		let shift = sum / self.nodes.len() as f64 - self.center;
		for node in &mut self.nodes {
			node.position -= shift;
		}
	}

	fn apply_collision(&mut self) {
		let n = self.nodes.len();
		for i in 0..n {
			let ri = self.nodes[i].radius;
			let predicted = self.nodes[i].position + self.nodes[i].velocity;
			for j in (i + 1)..n {
				let rj = self.nodes[j].radius;
				let reach = ri + rj;
				let mut delta = predicted - (self.nodes[j].position + self.nodes[j].velocity);
				let mut l = delta.length_squared();
				if l >= reach * reach {
					continue;
				}
				if delta.x == 0.0 {
					delta.x = jiggle(&mut self.rng);
					l += delta.x * delta.x;
				}
				if delta.y == 0.0 {
					delta.y = jiggle(&mut self.rng);
					l += delta.y * delta.y;
				}
				let l = l.sqrt();
				delta *= (reach - l) / l;
				let weight = rj * rj / (ri * ri + rj * rj);
				self.nodes[i].velocity += delta * weight;
				self.nodes[j].velocity -= delta * (1.0 - weight);
			}
		}
	}
}
