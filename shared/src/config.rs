/// Slowest speed exponent (multiplier 2^-4 = 1/16)
pub const MIN_SPEED_EXP: i32 = -4;
/// Fastest speed exponent (multiplier 2^4 = 16)
pub const MAX_SPEED_EXP: i32 = 4;

/// Lowest population cap
pub const MIN_MAX_BODIES: usize = 1;
/// Highest population cap
pub const MAX_MAX_BODIES: usize = 50;

/// Min/max ball radius ratio bounds and step, in percent
pub const MIN_SIZE_RATIO: u32 = 20;
pub const MAX_SIZE_RATIO: u32 = 100;
pub const SIZE_RATIO_STEP: u32 = 10;

/// Gravity magnitude change per command, as a fraction of the ceiling
pub const GRAVITY_ABS_STEP: f64 = 0.05;
/// Gravity rotation per command (15 degrees)
pub const GRAVITY_ROTATE_STEP: f64 = std::f64::consts::PI / 12.0;

/// Physics tuning of the ball world
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldConfig {
    /// Smallest ball radius (world units)
    pub min_radius: f64,
    /// Ceiling of the random initial speed (units/s)
    pub max_initial_speed: f64,
    /// Ceiling of the gravity magnitude (units/s^2)
    pub max_abs_gravity: f64,
    /// Initial gravity magnitude (units/s^2)
    pub gravity_abs: f64,
    /// Initial gravity direction (radians, y down, so PI/2 points down)
    pub gravity_angle: f64,
    /// Tolerance margin for wall and ball contacts
    pub near: f64,
    /// Placement candidates tried per spawn
    pub spawn_attempts: u32,
    /// Initial population cap
    pub max_bodies: usize,
    /// Initial min/max ball radius ratio (percent)
    pub size_ratio_percent: u32,
    pub show_overlay: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            min_radius: 10.0,
            max_initial_speed: 300.0,
            max_abs_gravity: 1000.0,
            gravity_abs: 150.0,
            gravity_angle: std::f64::consts::FRAC_PI_2,
            near: 0.5,
            spawn_attempts: 100,
            max_bodies: 15,
            size_ratio_percent: 60,
            show_overlay: true,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_radius.is_finite() || self.min_radius <= 0.0 {
            return Err("min_radius must be finite and > 0".to_string());
        }
        if !self.max_initial_speed.is_finite() || self.max_initial_speed < 0.0 {
            return Err("max_initial_speed must be finite and >= 0".to_string());
        }
        if !self.max_abs_gravity.is_finite() || self.max_abs_gravity <= 0.0 {
            return Err("max_abs_gravity must be finite and > 0".to_string());
        }
        if !self.gravity_abs.is_finite()
            || self.gravity_abs < 0.0
            || self.gravity_abs > self.max_abs_gravity
        {
            return Err("gravity_abs must be within [0, max_abs_gravity]".to_string());
        }
        if !self.gravity_angle.is_finite() {
            return Err("gravity_angle must be finite".to_string());
        }
        if !self.near.is_finite() || self.near < 0.0 || self.near >= self.min_radius {
            return Err("near must be finite, >= 0 and < min_radius".to_string());
        }
        if self.spawn_attempts == 0 {
            return Err("spawn_attempts must be > 0".to_string());
        }
        if !(MIN_MAX_BODIES..=MAX_MAX_BODIES).contains(&self.max_bodies) {
            return Err(format!(
                "max_bodies must be within [{}, {}]",
                MIN_MAX_BODIES, MAX_MAX_BODIES
            ));
        }
        if !(MIN_SIZE_RATIO..=MAX_SIZE_RATIO).contains(&self.size_ratio_percent) {
            return Err(format!(
                "size_ratio_percent must be within [{}, {}]",
                MIN_SIZE_RATIO, MAX_SIZE_RATIO
            ));
        }
        Ok(())
    }

    /// Largest radius that can ever be spawned, at the smallest size ratio.
    pub fn largest_radius(&self) -> f64 {
        self.min_radius * 100.0 / MIN_SIZE_RATIO as f64
    }
}
