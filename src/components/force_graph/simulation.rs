//! Velocity-Verlet force layout with a cooling temperature (`alpha`).
//!
//! Each tick moves alpha toward its target, accumulates link, charge, positioning and
//! collision forces into velocities, recenters the layout, then integrates with
//! velocity decay. Pinned bodies are held at their pin and carry no velocity.

use std::f64::consts::PI;

/// Alpha below which the layout is considered settled.
pub const ALPHA_MIN: f64 = 0.001;

/// Temperature held while the user drags a node.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
	pub link_distance: f64,
	pub link_strength: f64,
	/// Negative repels.
	pub charge_strength: f64,
	/// Pairs farther apart than this ignore each other.
	pub charge_distance_max: f64,
	pub collision_radius: f64,
	/// Pull toward the center along each axis.
	pub position_strength: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
}

impl ForceParams {
	pub const ECOSYSTEM: ForceParams = ForceParams {
		link_distance: 50.0,
		link_strength: 1.0,
		charge_strength: -300.0,
		charge_distance_max: 150.0,
		collision_radius: 8.0,
		position_strength: 0.2,
		alpha_decay: 0.05,
		velocity_decay: 0.4,
	};

	pub const COMPANY: ForceParams = ForceParams {
		link_distance: 80.0,
		link_strength: 1.0,
		charge_strength: -250.0,
		charge_distance_max: 150.0,
		collision_radius: 10.0,
		position_strength: 0.2,
		alpha_decay: 0.05,
		velocity_decay: 0.4,
	};
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub pin: Option<(f64, f64)>,
}

pub struct Simulation {
	bodies: Vec<Body>,
	links: Vec<(usize, usize)>,
	params: ForceParams,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	link_bias: Vec<f64>,
}

impl Simulation {
	/// Bodies start on a phyllotaxis spiral around `center`; links index into them.
	pub fn new(
		body_count: usize,
		links: Vec<(usize, usize)>,
		params: ForceParams,
		center: (f64, f64),
	) -> Self {
		let golden = PI * (3.0 - 5f64.sqrt());
		let bodies = (0..body_count)
			.map(|i| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden;
				Body {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();

		let links: Vec<(usize, usize)> = links
			.into_iter()
			.filter(|&(s, t)| s < body_count && t < body_count && s != t)
			.collect();
		let mut counts = vec![0usize; body_count];
		for &(s, t) in &links {
			counts[s] += 1;
			counts[t] += 1;
		}
		// Share of a link's correction taken by its target; busier nodes move less.
		let link_bias = links
			.iter()
			.map(|&(s, t)| counts[s] as f64 / (counts[s] + counts[t]) as f64)
			.collect();

		Self {
			bodies,
			links,
			params,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			link_bias,
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn params(&self) -> &ForceParams {
		&self.params
	}

	/// Whether ticking would still move anything.
	pub fn is_active(&self) -> bool {
		self.alpha >= ALPHA_MIN || self.alpha_target >= ALPHA_MIN
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	/// Warms a settled layout back up so a target change takes effect.
	pub fn reheat(&mut self) {
		if self.alpha < self.alpha_target {
			self.alpha = self.alpha_target;
		}
		if self.alpha < ALPHA_MIN {
			self.alpha = ALPHA_MIN;
		}
	}

	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(index) {
			body.pin = Some((x, y));
		}
	}

	pub fn unpin(&mut self, index: usize) {
		if let Some(body) = self.bodies.get_mut(index) {
			body.pin = None;
		}
	}

	pub fn resize(&mut self, center: (f64, f64)) {
		self.center = center;
	}

	pub fn tick_n(&mut self, n: usize) {
		for _ in 0..n {
			self.tick();
		}
	}

	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		self.apply_position(alpha);
		self.apply_collision();
		self.apply_center();

		let keep = 1.0 - self.params.velocity_decay;
		for body in &mut self.bodies {
			match body.pin {
				Some((px, py)) => {
					body.x = px;
					body.y = py;
					body.vx = 0.0;
					body.vy = 0.0;
				}
				None => {
					body.vx *= keep;
					body.vy *= keep;
					body.x += body.vx;
					body.y += body.vy;
				}
			}
		}
	}

	fn apply_links(&mut self, alpha: f64) {
		let ForceParams {
			link_distance,
			link_strength,
			..
		} = self.params;
		for (i, &(s, t)) in self.links.iter().enumerate() {
			let (src, tgt) = (&self.bodies[s], &self.bodies[t]);
			let mut dx = tgt.x + tgt.vx - src.x - src.vx;
			let mut dy = tgt.y + tgt.vy - src.y - src.vy;
			if dx == 0.0 && dy == 0.0 {
				dx = jiggle(i);
				dy = jiggle(i + 1);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - link_distance) / len * alpha * link_strength;
			let (fx, fy) = (dx * k, dy * k);
			let bias = self.link_bias[i];
			self.bodies[t].vx -= fx * bias;
			self.bodies[t].vy -= fy * bias;
			self.bodies[s].vx += fx * (1.0 - bias);
			self.bodies[s].vy += fy * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		let max_sq = self.params.charge_distance_max * self.params.charge_distance_max;
		let strength = self.params.charge_strength;
		let n = self.bodies.len();
		for i in 0..n {
			let (xi, yi) = (self.bodies[i].x, self.bodies[i].y);
			let (mut ax, mut ay) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut dx = self.bodies[j].x - xi;
				let mut dy = self.bodies[j].y - yi;
				let mut dist_sq = dx * dx + dy * dy;
				if dist_sq >= max_sq {
					continue;
				}
				if dist_sq == 0.0 {
					dx = jiggle(i + j);
					dy = jiggle(i * 31 + j);
					dist_sq = dx * dx + dy * dy;
				}
				// Soften very close pairs so forces stay bounded.
				if dist_sq < 1.0 {
					dist_sq = dist_sq.sqrt();
				}
				let w = strength * alpha / dist_sq;
				ax += dx * w;
				ay += dy * w;
			}
			self.bodies[i].vx += ax;
			self.bodies[i].vy += ay;
		}
	}

	fn apply_position(&mut self, alpha: f64) {
		let k = self.params.position_strength * alpha;
		let (cx, cy) = self.center;
		for body in &mut self.bodies {
			body.vx += (cx - body.x) * k;
			body.vy += (cy - body.y) * k;
		}
	}

	fn apply_collision(&mut self) {
		let min_dist = self.params.collision_radius * 2.0;
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.bodies[i], &self.bodies[j]);
				let mut dx = (a.x + a.vx) - (b.x + b.vx);
				let mut dy = (a.y + a.vy) - (b.y + b.vy);
				let mut dist_sq = dx * dx + dy * dy;
				if dist_sq >= min_dist * min_dist {
					continue;
				}
				if dist_sq == 0.0 {
					dx = jiggle(i + j);
					dy = jiggle(j * 7 + i);
					dist_sq = dx * dx + dy * dy;
				}
				let dist = dist_sq.sqrt();
				let push = (min_dist - dist) / dist * 0.5;
				let (px, py) = (dx * push, dy * push);
				self.bodies[i].vx += px;
				self.bodies[i].vy += py;
				self.bodies[j].vx -= px;
				self.bodies[j].vy -= py;
			}
		}
	}

	fn apply_center(&mut self) {
		if self.bodies.is_empty() {
			return;
		}
		let n = self.bodies.len() as f64;
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let (shift_x, shift_y) = (sx / n - self.center.0, sy / n - self.center.1);
		for body in &mut self.bodies {
			body.x -= shift_x;
			body.y -= shift_y;
		}
	}
}

/// Tiny deterministic offset used to separate coincident points.
fn jiggle(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64 / 233280.0 - 0.5) * 1e-6
}
