use crate::body::{random_color, Body};
use crate::config::EngineConfig;
use crate::vec2::{
    conjugate, dot, from_polar, length, length_sq, neg, phase, scale, sub, vec2, wrap_angle, Vec2,
};
use balls_shared::config::{
    WorldConfig, GRAVITY_ABS_STEP, GRAVITY_ROTATE_STEP, MAX_MAX_BODIES, MAX_SIZE_RATIO,
    MAX_SPEED_EXP, MIN_MAX_BODIES, MIN_SIZE_RATIO, MIN_SPEED_EXP, SIZE_RATIO_STEP,
};
use balls_shared::protocol::{gravity_degrees, round2, BallWire, Snapshot, PROTOCOL_VERSION};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;
use std::time::Duration;

/// The bounded ball world. Owned by the simulation loop task.
pub struct World {
    config: WorldConfig,
    width: f64,
    height: f64,
    bodies: Vec<Body>,
    gravity: Vec2,
    /// Kept apart from `gravity` so a zero magnitude still remembers its direction
    gravity_angle: f64,
    max_bodies: usize,
    speed_exponent: i32,
    size_ratio_percent: u32,
    show_overlay: bool,
    spawn_elapsed: Duration,
    spawn_interval: Duration,
    rng: ChaCha8Rng,
    // Per-step scratch, reused to avoid allocating every step
    prev_pos: Vec<Vec2>,
    reverted: Vec<bool>,
}

impl World {
    pub fn new(width: f64, height: f64, config: WorldConfig, engine_config: &EngineConfig) -> Self {
        let gravity_abs = config.gravity_abs.clamp(0.0, config.max_abs_gravity);
        let gravity_angle = wrap_angle(config.gravity_angle);
        Self {
            config,
            width,
            height,
            bodies: Vec::with_capacity(MAX_MAX_BODIES),
            gravity: from_polar(gravity_abs, gravity_angle),
            gravity_angle,
            max_bodies: config.max_bodies.clamp(MIN_MAX_BODIES, MAX_MAX_BODIES),
            speed_exponent: 0,
            size_ratio_percent: config
                .size_ratio_percent
                .clamp(MIN_SIZE_RATIO, MAX_SIZE_RATIO),
            show_overlay: config.show_overlay,
            spawn_elapsed: Duration::ZERO,
            spawn_interval: engine_config.spawn_interval,
            rng: ChaCha8Rng::seed_from_u64(engine_config.rng_seed),
            prev_pos: Vec::with_capacity(MAX_MAX_BODIES),
            reverted: Vec::with_capacity(MAX_MAX_BODIES),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn max_bodies(&self) -> usize {
        self.max_bodies
    }

    pub fn speed_exponent(&self) -> i32 {
        self.speed_exponent
    }

    pub fn size_ratio_percent(&self) -> u32 {
        self.size_ratio_percent
    }

    pub fn show_overlay(&self) -> bool {
        self.show_overlay
    }

    /// Largest radius the spawner currently picks: min_radius / ratio.
    pub fn max_radius(&self) -> f64 {
        self.config.min_radius * 100.0 / self.size_ratio_percent as f64
    }

    /// Add a body directly, bypassing placement. Returns false at the population cap.
    /// The caller is responsible for putting it inside the walls.
    pub fn insert_body(&mut self, body: Body) -> bool {
        if self.bodies.len() >= self.max_bodies {
            return false;
        }
        self.bodies.push(body);
        true
    }

    /// Replace the gravity vector, magnitude clamped to the ceiling.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        let abs = length(gravity);
        if abs > 0.0 {
            self.gravity_angle = wrap_angle(phase(gravity));
        }
        let max = self.config.max_abs_gravity;
        self.gravity = if abs > max {
            scale(gravity, max / abs)
        } else {
            gravity
        };
    }

    // --- simulation ---

    /// Advance the world by one fixed physics step of `dt` seconds.
    ///
    /// Bodies are integrated first. Bodies hitting a wall get the normal
    /// velocity component mirrored, colliding pairs get the elastic response.
    /// Every body involved in any collision keeps its new velocity but has
    /// its position rolled back to where it was before this step.
    pub fn step(&mut self, dt: f64) {
        let gravity = self.gravity;
        let near = self.config.near;
        let (width, height) = (self.width, self.height);

        self.prev_pos.clear();
        self.prev_pos.extend(self.bodies.iter().map(|b| b.pos));
        self.reverted.clear();
        self.reverted.resize(self.bodies.len(), false);

        for body in self.bodies.iter_mut() {
            body.step(dt, gravity);
        }

        for (body, reverted) in self.bodies.iter_mut().zip(self.reverted.iter_mut()) {
            if bounce_off_walls(body, width, height, near) {
                *reverted = true;
            }
        }

        // Single ordered pass: a later pair sees velocities already changed by an earlier one
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.bodies.split_at_mut(j);
                if resolve_pair(&mut head[i], &mut tail[0], near) {
                    self.reverted[i] = true;
                    self.reverted[j] = true;
                }
            }
        }

        for ((body, prev), reverted) in self
            .bodies
            .iter_mut()
            .zip(self.prev_pos.iter())
            .zip(self.reverted.iter())
        {
            if *reverted {
                body.pos = *prev;
            }
        }
    }

    /// Run `steps` fixed steps.
    pub fn advance(&mut self, steps: u64, dt: f64) {
        for _ in 0..steps {
            self.step(dt);
        }
    }

    /// Once-per-activation spawn check. Returns true if a body was added.
    pub fn tick_spawner(&mut self, elapsed_real: Duration) -> bool {
        self.spawn_elapsed += elapsed_real;
        if self.spawn_elapsed < self.spawn_interval || self.bodies.len() >= self.max_bodies {
            return false;
        }
        self.spawn_elapsed = Duration::ZERO;
        self.spawn()
    }

    /// Try to place a new random ball in the top band.
    /// Gives up silently after the configured number of attempts.
    pub fn spawn(&mut self) -> bool {
        if self.bodies.len() >= self.max_bodies {
            return false;
        }

        let min_r = self.config.min_radius;
        let max_r = self.max_radius();
        if self.width < 2.0 * max_r || self.height < 2.0 * max_r {
            tracing::trace!("World too small for a ball of radius {}", max_r);
            return false;
        }

        for _ in 0..self.config.spawn_attempts {
            let radius = self.rng.gen_range(min_r..=max_r);
            let x = self.rng.gen_range(radius..=self.width - radius);
            let speed = self.rng.gen::<f64>() * self.config.max_initial_speed;
            let angle = self.rng.gen::<f64>() * TAU;
            let candidate = Body::new(vec2(x, max_r), from_polar(speed, angle), radius, 0);

            if self.bodies.iter().any(|b| b.boxes_overlap(&candidate, 2.0)) {
                continue;
            }

            let mut body = candidate;
            body.color = random_color(&mut self.rng);
            tracing::debug!(
                "Spawned ball r={:.1} at x={:.1} ({} in world)",
                body.radius,
                body.pos.x,
                self.bodies.len() + 1
            );
            self.bodies.push(body);
            return true;
        }

        tracing::trace!("No free spot found for a new ball, skipping");
        false
    }

    /// Cut the population down to the cap, oldest balls stay.
    pub fn trim(&mut self) {
        self.bodies.truncate(self.max_bodies);
    }

    /// Remove every ball. Spawning starts over from an empty world.
    pub fn restart(&mut self) {
        self.bodies.clear();
        self.spawn_elapsed = Duration::ZERO;
    }

    // --- clamped setters ---

    pub fn change_speed(&mut self, increase: bool) -> i32 {
        let delta = if increase { 1 } else { -1 };
        self.speed_exponent = (self.speed_exponent + delta).clamp(MIN_SPEED_EXP, MAX_SPEED_EXP);
        self.speed_exponent
    }

    pub fn change_max_bodies(&mut self, increase: bool) -> usize {
        let target = if increase {
            self.max_bodies.saturating_add(1)
        } else {
            self.max_bodies.saturating_sub(1)
        };
        self.max_bodies = target.clamp(MIN_MAX_BODIES, MAX_MAX_BODIES);
        self.trim();
        self.max_bodies
    }

    /// Only affects balls spawned from now on.
    pub fn change_size_ratio(&mut self, increase: bool) -> u32 {
        let target = if increase {
            self.size_ratio_percent.saturating_add(SIZE_RATIO_STEP)
        } else {
            self.size_ratio_percent.saturating_sub(SIZE_RATIO_STEP)
        };
        self.size_ratio_percent = target.clamp(MIN_SIZE_RATIO, MAX_SIZE_RATIO);
        self.size_ratio_percent
    }

    /// Returns the new gravity magnitude.
    pub fn change_gravity_magnitude(&mut self, increase: bool) -> f64 {
        let max = self.config.max_abs_gravity;
        let step = max * GRAVITY_ABS_STEP;
        let current = length(self.gravity);
        let target = if increase { current + step } else { current - step };
        let abs = target.clamp(0.0, max);
        self.gravity = from_polar(abs, self.gravity_angle);
        abs
    }

    /// Rotate gravity by a fixed angle. With y pointing down, clockwise on
    /// screen is an increasing angle. Returns the new angle in radians.
    pub fn rotate_gravity(&mut self, clockwise: bool) -> f64 {
        let delta = if clockwise {
            GRAVITY_ROTATE_STEP
        } else {
            -GRAVITY_ROTATE_STEP
        };
        self.gravity_angle = wrap_angle(self.gravity_angle + delta);
        self.gravity = from_polar(length(self.gravity), self.gravity_angle);
        self.gravity_angle
    }

    pub fn toggle_overlay(&mut self) -> bool {
        self.show_overlay = !self.show_overlay;
        self.show_overlay
    }

    /// Consistent copy of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            protocol_version: PROTOCOL_VERSION,
            width: self.width,
            height: self.height,
            balls: self
                .bodies
                .iter()
                .map(|b| BallWire {
                    pos: [round2(b.pos.x), round2(b.pos.y)],
                    radius: round2(b.radius),
                    color: b.color,
                })
                .collect(),
            gravity: self.gravity.to_array(),
            gravity_fraction: length(self.gravity) / self.config.max_abs_gravity,
            gravity_degrees: gravity_degrees(self.gravity_angle),
            speed_exponent: self.speed_exponent,
            max_balls: self.max_bodies,
            size_ratio_percent: self.size_ratio_percent,
            show_overlay: self.show_overlay,
        }
    }
}

/// Mirror the velocity of a body that reached a wall while moving toward it.
/// A body counts as touching once it is within `near` of the wall.
fn bounce_off_walls(body: &mut Body, width: f64, height: f64, near: f64) -> bool {
    let r = body.radius;
    let mut hit = false;

    if (body.pos.x < r + near && body.vel.x < 0.0)
        || (body.pos.x > width - r - near && body.vel.x > 0.0)
    {
        body.vel.x = -body.vel.x;
        hit = true;
    }
    if (body.pos.y < r + near && body.vel.y < 0.0)
        || (body.pos.y > height - r - near && body.vel.y > 0.0)
    {
        body.vel = conjugate(body.vel);
        hit = true;
    }

    hit
}

/// Detect and resolve a collision between two bodies.
///
/// Broad phase rejects pairs whose bounding boxes are apart. The narrow
/// phase registers a hit when the centers are closer than the radii sum
/// minus `2 * near` and the bodies are approaching each other. The
/// response is the 2D elastic collision along the line of centers, both
/// new velocities computed from the velocities before this call.
fn resolve_pair(a: &mut Body, b: &mut Body, near: f64) -> bool {
    if !a.boxes_overlap(b, 1.0) {
        return false;
    }

    let dp = sub(a.pos, b.pos);
    let dist_sq = length_sq(dp);
    let limit = a.radius + b.radius - 2.0 * near;
    // Coincident centers have no line of centers to push along
    if dist_sq >= limit * limit || dist_sq == 0.0 {
        return false;
    }

    let dv = sub(a.vel, b.vel);
    let approach = dot(dv, dp);
    if approach >= 0.0 {
        return false;
    }

    let (ma, mb) = (a.mass(), b.mass());
    let common = 2.0 / (ma + mb) / dist_sq;
    let va = sub(a.vel, scale(dp, common * mb * approach));
    let vb = sub(b.vel, scale(neg(dp), common * ma * dot(neg(dv), neg(dp))));
    a.vel = va;
    b.vel = vb;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec2::add;

    const DT: f64 = 0.001;

    fn test_world(width: f64, height: f64) -> World {
        let config = WorldConfig {
            max_bodies: MAX_MAX_BODIES,
            ..Default::default()
        };
        World::new(width, height, config, &EngineConfig::default())
    }

    fn weightless_world() -> World {
        let mut world = test_world(2000.0, 2000.0);
        world.set_gravity(Vec2::ZERO);
        world
    }

    fn momentum(bodies: &[Body]) -> Vec2 {
        bodies
            .iter()
            .fold(Vec2::ZERO, |acc, b| add(acc, scale(b.vel, b.mass())))
    }

    fn assert_contained(world: &World) {
        for b in world.bodies() {
            assert!(
                b.pos.x >= b.radius && b.pos.x <= world.width() - b.radius,
                "x out of bounds: {:?}",
                b
            );
            assert!(
                b.pos.y >= b.radius && b.pos.y <= world.height() - b.radius,
                "y out of bounds: {:?}",
                b
            );
        }
    }

    // --- defaults ---

    #[test]
    fn new_world_uses_documented_defaults() {
        let world = World::new(800.0, 600.0, WorldConfig::default(), &EngineConfig::default());
        assert_eq!(world.max_bodies(), 15);
        assert_eq!(world.size_ratio_percent(), 60);
        assert!(world.show_overlay());
        assert_eq!(world.speed_exponent(), 0);
        assert_eq!(world.body_count(), 0);
        let g = world.gravity();
        assert!(g.x.abs() < 1e-9);
        assert!((g.y - 150.0).abs() < 1e-9);
    }

    // --- walls ---

    #[test]
    fn floor_bounce_flips_vy_and_keeps_vx() {
        let mut world = test_world(800.0, 600.0);
        world.set_gravity(vec2(0.0, 600.0));
        world.insert_body(Body::new(vec2(400.0, 100.0), vec2(100.0, 0.0), 20.0, 0));

        let mut bounced = false;
        let mut last_x = 400.0;
        for _ in 0..3000 {
            world.step(DT);
            let b = &world.bodies()[0];
            assert_eq!(b.vel.x, 100.0);
            assert!(b.pos.y <= 580.0);
            assert!(b.pos.x >= last_x);
            last_x = b.pos.x;
            if b.vel.y < 0.0 {
                bounced = true;
                break;
            }
        }
        assert!(bounced, "ball should bounce off the floor");

        // Horizontal motion carries on after the bounce
        let x_at_bounce = world.bodies()[0].pos.x;
        world.advance(100, DT);
        let b = &world.bodies()[0];
        assert!((b.pos.x - (x_at_bounce + 100.0 * 100.0 * DT)).abs() < 1e-6);
        assert!(b.pos.y < 580.0);
    }

    #[test]
    fn wall_hit_reverts_position_for_that_step() {
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(10.2, 500.0), vec2(-50.0, 0.0), 10.0, 0));
        world.step(DT);
        let b = &world.bodies()[0];
        assert_eq!(b.pos, vec2(10.2, 500.0));
        assert_eq!(b.vel, vec2(50.0, 0.0));
    }

    #[test]
    fn ceiling_hit_conjugates_velocity() {
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(500.0, 10.0), vec2(30.0, -40.0), 10.0, 0));
        world.step(DT);
        assert_eq!(world.bodies()[0].vel, vec2(30.0, 40.0));
    }

    #[test]
    fn body_moving_away_from_wall_is_not_reflected() {
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(10.1, 500.0), vec2(50.0, 0.0), 10.0, 0));
        world.step(DT);
        let b = &world.bodies()[0];
        assert_eq!(b.vel, vec2(50.0, 0.0));
        assert!(b.pos.x > 10.1);
    }

    // --- pair collisions ---

    #[test]
    fn equal_mass_head_on_swaps_velocities() {
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(100.0, 100.0), vec2(50.0, 0.0), 15.0, 0));
        world.insert_body(Body::new(vec2(128.0, 100.0), vec2(-50.0, 0.0), 15.0, 0));
        world.step(DT);

        let (a, b) = (&world.bodies()[0], &world.bodies()[1]);
        assert!((a.vel.x + 50.0).abs() < 1e-9);
        assert!((b.vel.x - 50.0).abs() < 1e-9);
        assert!(a.vel.y.abs() < 1e-9 && b.vel.y.abs() < 1e-9);
        // Both rolled back to their pre-step positions
        assert_eq!(a.pos, vec2(100.0, 100.0));
        assert_eq!(b.pos, vec2(128.0, 100.0));
    }

    #[test]
    fn collision_conserves_momentum() {
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(300.0, 300.0), vec2(120.0, 35.0), 25.0, 0));
        world.insert_body(Body::new(vec2(328.0, 315.0), vec2(-40.0, -10.0), 12.0, 0));
        let before = momentum(world.bodies());
        world.step(DT);
        let after = momentum(world.bodies());

        assert_ne!(world.bodies()[0].vel, vec2(120.0, 35.0), "pair should collide");
        let scale_ref = length(before).max(1.0);
        assert!(length(sub(before, after)) / scale_ref < 1e-9);
    }

    #[test]
    fn collision_conserves_kinetic_energy() {
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(300.0, 300.0), vec2(120.0, 35.0), 25.0, 0));
        world.insert_body(Body::new(vec2(328.0, 315.0), vec2(-40.0, -10.0), 12.0, 0));
        let energy = |bodies: &[Body]| -> f64 {
            bodies
                .iter()
                .map(|b| 0.5 * b.mass() * length_sq(b.vel))
                .sum()
        };
        let before = energy(world.bodies());
        world.step(DT);
        let after = energy(world.bodies());
        assert!((before - after).abs() / before < 1e-9);
    }

    #[test]
    fn separating_overlap_is_left_alone() {
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(100.0, 100.0), vec2(-50.0, 0.0), 15.0, 0));
        world.insert_body(Body::new(vec2(120.0, 100.0), vec2(50.0, 0.0), 15.0, 0));
        world.step(DT);
        let (a, b) = (&world.bodies()[0], &world.bodies()[1]);
        assert_eq!(a.vel, vec2(-50.0, 0.0));
        assert_eq!(b.vel, vec2(50.0, 0.0));
        assert!(b.pos.x - a.pos.x > 20.0);
    }

    #[test]
    fn resolved_pairs_never_penetrate() {
        let near = WorldConfig::default().near;
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(100.0, 200.0), vec2(80.0, 5.0), 15.0, 0));
        world.insert_body(Body::new(vec2(160.0, 203.0), vec2(-60.0, 0.0), 20.0, 0));
        let mut collided = false;
        for _ in 0..2000 {
            world.step(DT);
            let (a, b) = (&world.bodies()[0], &world.bodies()[1]);
            let dist = length(sub(a.pos, b.pos));
            assert!(dist >= a.radius + b.radius - 2.0 * near - 1e-9);
            if a.vel.x < 0.0 {
                collided = true;
            }
        }
        assert!(collided);
    }

    #[test]
    fn later_pairs_see_updated_velocities() {
        // Middle ball is hit from the left first, then passes the push on within the same step
        let mut world = weightless_world();
        world.insert_body(Body::new(vec2(100.0, 100.0), vec2(60.0, 0.0), 15.0, 0));
        world.insert_body(Body::new(vec2(128.5, 100.0), Vec2::ZERO, 15.0, 0));
        world.insert_body(Body::new(vec2(157.0, 100.0), Vec2::ZERO, 15.0, 0));
        world.step(DT);
        let b = world.bodies();
        assert!(b[0].vel.x.abs() < 1e-9);
        assert!(b[1].vel.x.abs() < 1e-9);
        assert!((b[2].vel.x - 60.0).abs() < 1e-9);
    }

    // --- invariants over long runs ---

    #[test]
    fn bodies_stay_inside_the_world() {
        let mut world = test_world(800.0, 600.0);
        for _ in 0..30 {
            world.spawn();
        }
        assert!(world.body_count() > 0);
        for i in 0..20_000 {
            world.step(DT);
            if i % 500 == 0 {
                world.rotate_gravity(true);
                world.change_gravity_magnitude(true);
                world.spawn();
            }
            assert_contained(&world);
        }
    }

    #[test]
    fn stepping_is_deterministic_for_a_seed() {
        let run = || {
            let mut world = test_world(800.0, 600.0);
            for _ in 0..20 {
                world.spawn();
            }
            world.advance(5000, DT);
            world.bodies().to_vec()
        };
        assert_eq!(run(), run());
    }

    // --- population ---

    #[test]
    fn spawn_places_ball_in_top_band() {
        let mut world = test_world(800.0, 600.0);
        assert!(world.spawn());
        let b = &world.bodies()[0];
        let min_r = WorldConfig::default().min_radius;
        assert!(b.radius >= min_r && b.radius <= world.max_radius());
        assert_eq!(b.pos.y, world.max_radius());
        assert!(b.pos.x >= b.radius && b.pos.x <= 800.0 - b.radius);
        assert!(length(b.vel) <= WorldConfig::default().max_initial_speed + 1e-9);
    }

    #[test]
    fn spawn_gives_up_when_top_band_is_full() {
        let mut tiny = test_world(60.0, 600.0);
        tiny.set_gravity(Vec2::ZERO);
        assert!(tiny.spawn());
        // A 60 unit wide world has no room for a second ball with the 2x margin
        assert!(!tiny.spawn());
        assert_eq!(tiny.body_count(), 1);
    }

    #[test]
    fn spawn_skips_world_smaller_than_a_ball() {
        let mut world = test_world(20.0, 20.0);
        assert!(!world.spawn());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn spawner_waits_for_interval_and_respects_cap() {
        let mut world = World::new(800.0, 600.0, WorldConfig::default(), &EngineConfig::default());
        assert!(!world.tick_spawner(Duration::from_millis(1500)));
        assert!(world.tick_spawner(Duration::from_millis(600)));
        assert_eq!(world.body_count(), 1);

        while world.max_bodies() > 1 {
            world.change_max_bodies(false);
        }
        assert!(!world.tick_spawner(Duration::from_secs(3)));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn lowering_cap_keeps_oldest_balls() {
        let mut world = test_world(800.0, 600.0);
        for i in 0..10 {
            world.insert_body(Body::new(vec2(50.0 + 60.0 * i as f64, 300.0), Vec2::ZERO, 10.0, i));
        }
        while world.max_bodies() > 4 {
            world.change_max_bodies(false);
            assert!(world.body_count() <= world.max_bodies());
        }
        let colors: Vec<u32> = world.bodies().iter().map(|b| b.color).collect();
        assert_eq!(colors, vec![0, 1, 2, 3]);
    }

    #[test]
    fn restart_clears_then_spawns_one_after_interval() {
        let mut world = test_world(800.0, 600.0);
        for i in 0..10 {
            world.insert_body(Body::new(vec2(50.0 + 60.0 * i as f64, 300.0), Vec2::ZERO, 10.0, i));
        }
        world.tick_spawner(Duration::from_millis(1900));
        world.restart();
        assert_eq!(world.body_count(), 0);

        assert!(!world.tick_spawner(Duration::from_millis(1000)));
        assert_eq!(world.body_count(), 0);
        assert!(world.tick_spawner(Duration::from_millis(1000)));
        assert_eq!(world.body_count(), 1);
    }

    // --- setters ---

    #[test]
    fn speed_is_clamped() {
        let mut world = test_world(800.0, 600.0);
        for _ in 0..20 {
            world.change_speed(true);
        }
        assert_eq!(world.speed_exponent(), MAX_SPEED_EXP);
        for _ in 0..20 {
            world.change_speed(false);
        }
        assert_eq!(world.speed_exponent(), MIN_SPEED_EXP);
    }

    #[test]
    fn max_bodies_is_clamped() {
        let mut world = test_world(800.0, 600.0);
        for _ in 0..100 {
            world.change_max_bodies(true);
        }
        assert_eq!(world.max_bodies(), MAX_MAX_BODIES);
        for _ in 0..100 {
            world.change_max_bodies(false);
        }
        assert_eq!(world.max_bodies(), MIN_MAX_BODIES);
    }

    #[test]
    fn size_ratio_is_clamped_and_drives_max_radius() {
        let mut world = test_world(800.0, 600.0);
        assert!((world.max_radius() - 10.0 / 0.6).abs() < 1e-9);
        for _ in 0..20 {
            world.change_size_ratio(false);
        }
        assert_eq!(world.size_ratio_percent(), MIN_SIZE_RATIO);
        assert!((world.max_radius() - 50.0).abs() < 1e-9);
        for _ in 0..20 {
            world.change_size_ratio(true);
        }
        assert_eq!(world.size_ratio_percent(), MAX_SIZE_RATIO);
        assert!((world.max_radius() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn gravity_magnitude_is_clamped_and_keeps_direction() {
        let mut world = test_world(800.0, 600.0);
        for _ in 0..100 {
            world.change_gravity_magnitude(false);
        }
        assert_eq!(length(world.gravity()), 0.0);
        // Direction survives a zero magnitude
        let abs = world.change_gravity_magnitude(true);
        assert!((abs - 50.0).abs() < 1e-9);
        assert!(world.gravity().y > 49.0);

        for _ in 0..100 {
            world.change_gravity_magnitude(true);
        }
        assert!((length(world.gravity()) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn gravity_rotation_wraps_around() {
        let mut world = test_world(800.0, 600.0);
        let start = world.snapshot().gravity_degrees;
        assert_eq!(start, 270);
        let angle = world.rotate_gravity(false);
        assert!((0.0..TAU).contains(&angle));
        assert_eq!(world.snapshot().gravity_degrees, 285);
        for _ in 0..23 {
            world.rotate_gravity(false);
        }
        assert_eq!(world.snapshot().gravity_degrees, start);
        assert!((length(world.gravity()) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn set_gravity_clamps_to_ceiling() {
        let mut world = test_world(800.0, 600.0);
        world.set_gravity(vec2(0.0, 5000.0));
        assert!((world.gravity().y - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn toggle_overlay_flips() {
        let mut world = test_world(800.0, 600.0);
        assert!(!world.toggle_overlay());
        assert!(world.toggle_overlay());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut world = test_world(800.0, 600.0);
        world.insert_body(Body::new(vec2(400.123, 100.0), Vec2::ZERO, 12.0, 0xabcdef));
        world.change_speed(true);
        let snap = world.snapshot();
        assert_eq!(snap.balls.len(), 1);
        assert_eq!(snap.balls[0].pos, [400.12, 100.0]);
        assert_eq!(snap.balls[0].color, 0xabcdef);
        assert_eq!(snap.speed_exponent, 1);
        assert_eq!(snap.speed_multiplier(), 2.0);
        assert_eq!(snap.max_balls, MAX_MAX_BODIES);
        assert!((snap.gravity_fraction - 0.15).abs() < 1e-9);
        assert_eq!(snap.width, 800.0);
    }
}
