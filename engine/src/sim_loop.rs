use crate::clock::StepClock;
use crate::config::EngineConfig;
use crate::world::World;
use balls_shared::protocol::Snapshot;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};

/// Requests from the outside world to the simulation loop.
/// Every command carries a channel on which the applied value is acknowledged.
pub enum SimCommand {
    ChangeSpeed {
        increase: bool,
        response: oneshot::Sender<i32>,
    },
    ChangeMaxBodies {
        increase: bool,
        response: oneshot::Sender<usize>,
    },
    ChangeSizeRatio {
        increase: bool,
        response: oneshot::Sender<u32>,
    },
    ChangeGravityMagnitude {
        increase: bool,
        response: oneshot::Sender<f64>,
    },
    RotateGravity {
        clockwise: bool,
        response: oneshot::Sender<f64>,
    },
    Restart {
        response: oneshot::Sender<()>,
    },
    ToggleOverlay {
        response: oneshot::Sender<bool>,
    },
    Snapshot {
        response: oneshot::Sender<Snapshot>,
    },
}

/// Run the simulation loop. Owns the world until shutdown.
///
/// Commands are applied one at a time, between frames. On every frame tick
/// the world catches up with real time and a fresh snapshot is published.
pub async fn run_sim_loop(
    mut world: World,
    config: EngineConfig,
    mut cmd_rx: mpsc::Receiver<SimCommand>,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut clock = StepClock::new(config.physics_step, config.max_elapsed(), Instant::now());

    let mut frame_interval = tokio::time::interval(config.frame_interval());
    frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        "Simulation loop started ({}x{}, {} Hz)",
        world.width(),
        world.height(),
        config.frame_rate_hz
    );

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                let steps = catch_up(&mut world, &mut clock, Instant::now());
                tracing::trace!("Frame: {} steps, {} balls", steps, world.body_count());
                snapshot_tx.send_replace(Arc::new(world.snapshot()));
            }

            Some(cmd) = cmd_rx.recv() => {
                apply_command(&mut world, cmd);
            }

            // Fires on an explicit stop and when the engine handle is dropped
            _ = &mut shutdown_rx => break,
        }
    }

    tracing::info!("Simulation loop ended");
}

/// Bring the world up to `now`: run the whole physics steps owed since the
/// last activation, then do the once-per-activation spawn check.
/// Returns the number of steps taken.
pub fn catch_up(world: &mut World, clock: &mut StepClock, now: Instant) -> u64 {
    let elapsed_real = clock.elapsed_real(now);
    let steps = clock.steps_for(elapsed_real, world.speed_exponent());
    world.advance(steps, clock.physics_step().as_secs_f64());
    world.tick_spawner(elapsed_real);
    world.trim();
    steps
}

/// Execute a single command against the world and acknowledge it.
pub fn apply_command(world: &mut World, cmd: SimCommand) {
    // A dropped receiver means the caller gave up waiting, nothing to do about it
    match cmd {
        SimCommand::ChangeSpeed { increase, response } => {
            let exp = world.change_speed(increase);
            tracing::debug!("Speed exponent now {}", exp);
            let _ = response.send(exp);
        }
        SimCommand::ChangeMaxBodies { increase, response } => {
            let max = world.change_max_bodies(increase);
            tracing::debug!("Max balls now {} ({} in world)", max, world.body_count());
            let _ = response.send(max);
        }
        SimCommand::ChangeSizeRatio { increase, response } => {
            let ratio = world.change_size_ratio(increase);
            tracing::debug!("Min/max ball ratio now {}%", ratio);
            let _ = response.send(ratio);
        }
        SimCommand::ChangeGravityMagnitude { increase, response } => {
            let abs = world.change_gravity_magnitude(increase);
            tracing::debug!("Gravity magnitude now {:.1}", abs);
            let _ = response.send(abs);
        }
        SimCommand::RotateGravity {
            clockwise,
            response,
        } => {
            let angle = world.rotate_gravity(clockwise);
            tracing::debug!("Gravity angle now {:.3} rad", angle);
            let _ = response.send(angle);
        }
        SimCommand::Restart { response } => {
            world.restart();
            tracing::info!("World restarted");
            let _ = response.send(());
        }
        SimCommand::ToggleOverlay { response } => {
            let shown = world.toggle_overlay();
            tracing::debug!("Overlay {}", if shown { "on" } else { "off" });
            let _ = response.send(shown);
        }
        SimCommand::Snapshot { response } => {
            let _ = response.send(world.snapshot());
        }
    }
}
