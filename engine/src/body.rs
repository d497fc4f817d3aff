use crate::vec2::{add, scale, Vec2};
use rand::Rng;
use std::f64::consts::PI;

/// A ball moving in the world
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f64,
    /// Fixed at creation
    mass: f64,
    /// 0xRRGGBB, only used for drawing
    pub color: u32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f64, color: u32) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass: sphere_mass(radius),
            color,
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Advance by one fixed step: velocity picks up gravity, then position moves.
    pub fn step(&mut self, dt: f64, gravity: Vec2) {
        self.vel = add(self.vel, scale(gravity, dt));
        self.pos = add(self.pos, scale(self.vel, dt));
    }

    /// Axis-aligned bounding box test, each box grown by `margin` times its radius.
    pub fn boxes_overlap(&self, other: &Body, margin: f64) -> bool {
        let reach = margin * (self.radius + other.radius);
        (self.pos.x - other.pos.x).abs() < reach && (self.pos.y - other.pos.y).abs() < reach
    }
}

/// Mass of a solid sphere of unit density: 4/3 * PI * r^3
pub fn sphere_mass(radius: f64) -> f64 {
    4.0 / 3.0 * PI * radius.powi(3)
}

/// Random light color, each channel in [127, 254].
pub fn random_color(rng: &mut impl Rng) -> u32 {
    let mut channel = || 127 + rng.gen_range(0..128u32);
    let r = channel();
    let g = channel();
    let b = channel();
    (r << 16) | (g << 8) | b
}
