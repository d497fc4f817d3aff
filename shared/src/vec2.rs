/// 2D vector utilities for the ball world.
/// Screen coordinates: x grows to the right, y grows downward.

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Shorthand constructor
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Dot product
pub fn dot(a: Vec2, b: Vec2) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Squared length, avoids the sqrt when only comparing distances
pub fn length_sq(v: Vec2) -> f64 {
    v.x * v.x + v.y * v.y
}

/// Vector length
pub fn length(v: Vec2) -> f64 {
    length_sq(v).sqrt()
}

/// Scale vector by scalar
pub fn scale(v: Vec2, s: f64) -> Vec2 {
    Vec2::new(v.x * s, v.y * s)
}

/// Add two vectors
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x + b.x, a.y + b.y)
}

/// Subtract vectors (a - b)
pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x - b.x, a.y - b.y)
}

/// Negate vector
pub fn neg(v: Vec2) -> Vec2 {
    Vec2::new(-v.x, -v.y)
}

/// Mirror across the x axis (negates y). Used for top/bottom wall bounces.
pub fn conjugate(v: Vec2) -> Vec2 {
    Vec2::new(v.x, -v.y)
}

/// Build a vector from magnitude and angle (radians).
pub fn from_polar(magnitude: f64, angle: f64) -> Vec2 {
    Vec2::new(magnitude * angle.cos(), magnitude * angle.sin())
}

/// Angle of the vector in radians, in (-PI, PI].
pub fn phase(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

/// Wrap an angle into [0, 2*PI).
pub fn wrap_angle(angle: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let wrapped = angle.rem_euclid(tau);
    // rem_euclid can round up to exactly tau for tiny negative inputs
    if wrapped >= tau {
        0.0
    } else {
        wrapped
    }
}
