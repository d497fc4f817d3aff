use serde::{Deserialize, Serialize};

/// Snapshot format version - increment when making breaking changes.
/// Renderers should check this and refuse incompatible snapshots.
pub const PROTOCOL_VERSION: u32 = 1;

/// Read-only view of the world handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub protocol_version: u32,
    pub width: f64,
    pub height: f64,
    pub balls: Vec<BallWire>,
    pub gravity: [f64; 2],
    /// Gravity magnitude as a fraction of its ceiling, in [0, 1]
    pub gravity_fraction: f64,
    /// Gravity direction in whole degrees, counter-clockwise on screen, in [0, 360)
    pub gravity_degrees: u32,
    pub speed_exponent: i32,
    pub max_balls: usize,
    pub size_ratio_percent: u32,
    pub show_overlay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallWire {
    pub pos: [f64; 2],
    pub radius: f64,
    pub color: u32,
}

impl Snapshot {
    /// Effective simulation speed, 2^speed_exponent.
    pub fn speed_multiplier(&self) -> f64 {
        speed_multiplier(self.speed_exponent)
    }

    /// Min/max ball ratio as a fraction, e.g. 0.6
    pub fn size_ratio(&self) -> f64 {
        self.size_ratio_percent as f64 / 100.0
    }
}

/// 2^exp as a float
pub fn speed_multiplier(exp: i32) -> f64 {
    2f64.powi(exp)
}

/// Round to 2 decimal places, sub-pixel precision is irrelevant for drawing
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Screen-space gravity angle (radians, y down) to the degrees a viewer sees,
/// counter-clockwise from the positive x axis.
pub fn gravity_degrees(phase: f64) -> u32 {
    let degrees = (-phase).to_degrees().round() as i64;
    degrees.rem_euclid(360) as u32
}
