//! Pan/zoom transform between screen and graph coordinates.

use glam::DVec2;

use crate::config::ZoomExtent;

/// `screen = graph * k + (x, y)`. Only this changes on pan and zoom; node
/// coordinates never do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> DVec2 {
		DVec2::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, point: DVec2) -> (f64, f64) {
		(point.x * self.k + self.x, point.y * self.k + self.y)
	}

	/// Scales by `factor` around the screen point `(sx, sy)`, which stays put.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, extent: ZoomExtent) {
		let k = extent.clamp(self.k * factor);
		let ratio = k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = k;
	}

	/// Wheel notches zoom in or out by ten percent.
	pub fn wheel_factor(delta_y: f64) -> f64 {
		if delta_y > 0.0 { 0.9 } else { 1.1 }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn conversion_round_trips() {
		let transform = ViewTransform {
			x: 120.0,
			y: -40.0,
			k: 2.5,
		};
		let point = transform.screen_to_graph(300.0, 200.0);
		let (sx, sy) = transform.graph_to_screen(point);
		assert!((sx - 300.0).abs() < 1e-9);
		assert!((sy - 200.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut transform = ViewTransform::default();
		let before = transform.screen_to_graph(250.0, 150.0);
		transform.zoom_at(250.0, 150.0, 1.1, ZoomExtent::default());
		let after = transform.screen_to_graph(250.0, 150.0);
		assert!(before.distance(after) < 1e-9);
		assert!((transform.k - 1.1).abs() < 1e-12);
	}

	#[test]
	fn zoom_is_clamped() {
		let extent = ZoomExtent::default();
		let mut transform = ViewTransform::default();
		for _ in 0..100 {
			transform.zoom_at(0.0, 0.0, ViewTransform::wheel_factor(-1.0), extent);
		}
		assert_eq!(transform.k, 3.0);
		for _ in 0..100 {
			transform.zoom_at(0.0, 0.0, ViewTransform::wheel_factor(1.0), extent);
		}
		assert_eq!(transform.k, 0.1);
	}
}
