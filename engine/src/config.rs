use std::time::Duration;

/// Engine runtime configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Presentation cadence: physics catch-up and snapshot handoff rate
    pub frame_rate_hz: u32,
    /// Fixed physics step
    pub physics_step: Duration,
    /// Elapsed real time per activation is capped at this many frame intervals
    pub stall_factor: u32,
    /// Real time between spawns
    pub spawn_interval: Duration,
    pub rng_seed: u64,
    /// Capacity of the command queue
    pub command_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            physics_step: Duration::from_millis(1),
            stall_factor: 10,
            spawn_interval: Duration::from_secs(2),
            rng_seed: 42,
            command_buffer: 64,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_rate_hz == 0 {
            return Err("frame_rate_hz must be > 0".to_string());
        }
        if self.physics_step.is_zero() {
            return Err("physics_step must be > 0".to_string());
        }
        if self.physics_step > self.frame_interval() {
            return Err("physics_step must not exceed the frame interval".to_string());
        }
        if self.stall_factor == 0 {
            return Err("stall_factor must be > 0".to_string());
        }
        if self.command_buffer == 0 {
            return Err("command_buffer must be > 0".to_string());
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate_hz.max(1) as f64)
    }

    /// Upper bound of real time simulated by a single activation
    pub fn max_elapsed(&self) -> Duration {
        self.frame_interval() * self.stall_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engine_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_frame_rate_invalid() {
        let config = EngineConfig {
            frame_rate_hz: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn physics_step_longer_than_frame_invalid() {
        let config = EngineConfig {
            physics_step: Duration::from_millis(100),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn stall_cap_is_ten_frames_by_default() {
        let config = EngineConfig::default();
        let expected = config.frame_interval() * 10;
        assert_eq!(config.max_elapsed(), expected);
        assert!(config.max_elapsed() > Duration::from_millis(160));
        assert!(config.max_elapsed() < Duration::from_millis(170));
    }
}
