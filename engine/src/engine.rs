//! Host-facing handle to one simulation instance.
//!
//! The engine owns no world state itself once started: the world lives inside
//! the simulation task and is only reached through the command queue. Setters
//! wait for the loop to acknowledge, so a returned value is already visible
//! to the next physics step and the next snapshot.

use crate::config::EngineConfig;
use crate::sim_loop::{run_sim_loop, SimCommand};
use crate::world::World;
use balls_shared::config::WorldConfig;
use balls_shared::protocol::Snapshot;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

/// Everything the simulation task needs, parked until `start`
struct PendingLoop {
    world: World,
    config: EngineConfig,
    cmd_rx: mpsc::Receiver<SimCommand>,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    shutdown_rx: oneshot::Receiver<()>,
}

pub struct Engine {
    cmd_tx: mpsc::Sender<SimCommand>,
    snapshot_rx: watch::Receiver<Arc<Snapshot>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    pending: Option<PendingLoop>,
    task: Option<JoinHandle<()>>,
}

impl Engine {
    /// Build an engine around a `width` x `height` world. Nothing runs until `start`.
    pub fn create(
        width: f64,
        height: f64,
        config: EngineConfig,
        world_config: WorldConfig,
    ) -> Self {
        let world = World::new(width, height, world_config, &config);
        let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(world.snapshot()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        Self {
            cmd_tx,
            snapshot_rx,
            shutdown_tx: Some(shutdown_tx),
            pending: Some(PendingLoop {
                world,
                config,
                cmd_rx,
                snapshot_tx,
                shutdown_rx,
            }),
            task: None,
        }
    }

    pub fn with_defaults(width: f64, height: f64) -> Self {
        Self::create(width, height, EngineConfig::default(), WorldConfig::default())
    }

    /// Spawn the simulation task on the current tokio runtime.
    /// Calling it again is a no-op.
    pub fn start(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.task = Some(tokio::spawn(run_sim_loop(
            pending.world,
            pending.config,
            pending.cmd_rx,
            pending.snapshot_tx,
            pending.shutdown_rx,
        )));
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Signal the loop to finish and wait until the task has exited.
    /// Commands racing with shutdown may go unanswered.
    pub async fn stop(mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Simulation task failed: {}", e);
            }
        }
    }

    // --- commands ---

    pub async fn change_speed(&self, increase: bool) -> Option<i32> {
        self.request(|response| SimCommand::ChangeSpeed { increase, response })
            .await
    }

    pub async fn change_max_bodies(&self, increase: bool) -> Option<usize> {
        self.request(|response| SimCommand::ChangeMaxBodies { increase, response })
            .await
    }

    pub async fn change_size_ratio(&self, increase: bool) -> Option<u32> {
        self.request(|response| SimCommand::ChangeSizeRatio { increase, response })
            .await
    }

    pub async fn change_gravity_magnitude(&self, increase: bool) -> Option<f64> {
        self.request(|response| SimCommand::ChangeGravityMagnitude { increase, response })
            .await
    }

    pub async fn rotate_gravity(&self, clockwise: bool) -> Option<f64> {
        self.request(|response| SimCommand::RotateGravity {
            clockwise,
            response,
        })
        .await
    }

    pub async fn restart(&self) -> Option<()> {
        self.request(|response| SimCommand::Restart { response })
            .await
    }

    pub async fn toggle_overlay(&self) -> Option<bool> {
        self.request(|response| SimCommand::ToggleOverlay { response })
            .await
    }

    // --- snapshots ---

    /// Snapshot taken inside the loop, after every earlier command.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.request(|response| SimCommand::Snapshot { response })
            .await
    }

    /// Snapshot published at the most recent frame handoff.
    pub fn latest_snapshot(&self) -> Arc<Snapshot> {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver for a renderer that wants to wait on new frames.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_rx.clone()
    }

    /// Send a command and wait for its acknowledgement. Commands sent before
    /// `start` are queued and answered once the loop runs.
    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> SimCommand) -> Option<T> {
        let (resp_tx, resp_rx) = oneshot::channel();
        if self.cmd_tx.send(make(resp_tx)).await.is_err() {
            tracing::warn!("Simulation loop is gone, command dropped");
            return None;
        }
        match resp_rx.await {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Simulation loop stopped before acknowledging");
                None
            }
        }
    }
}
