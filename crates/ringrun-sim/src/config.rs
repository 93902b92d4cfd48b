//! Simulation configuration

use serde::{Deserialize, Serialize};

use ringrun_core::{ControllerConfig, QuadrotorParams};

use crate::actuators::TorqueThrustLimiter;

/// Pose sensor noise levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorNoiseConfig {
    /// Position noise std dev [m]
    pub position_noise_std: f64,
    /// Attitude noise std dev [rad]
    pub attitude_noise_std: f64,
    /// Base RNG seed; drone i gets `seed + i`
    pub seed: u64,
}

impl Default for SensorNoiseConfig {
    fn default() -> Self {
        Self {
            position_noise_std: 0.01,
            attitude_noise_std: 0.005,
            seed: 12345,
        }
    }
}

/// Everything an episode needs besides the course itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Episode cap [ticks]
    pub max_ticks: u64,
    /// Physical drone parameters (shared with the plant linearization)
    pub quadrotor: QuadrotorParams,
    /// Sensor noise
    pub sensors: SensorNoiseConfig,
    /// Actuator bounds
    pub limits: TorqueThrustLimiter,
    /// Per-drone controller configuration
    pub controller: ControllerConfig,
}

impl SimConfig {
    /// Control/simulation tick length [s]
    pub fn dt(&self) -> f64 {
        self.controller.dt
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_ticks: 30_000, // 5 minutes at 100 Hz
            quadrotor: QuadrotorParams::default(),
            sensors: SensorNoiseConfig::default(),
            limits: TorqueThrustLimiter::default(),
            controller: ControllerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_consistent() {
        let config = SimConfig::default();

        assert_eq!(config.dt(), 0.01);
        assert!(config.limits.max_thrust > config.quadrotor.hover_thrust());
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = SimConfig::default();

        let json = serde_json::to_string(&config).expect("serializable");
        let back: SimConfig = serde_json::from_str(&json).expect("deserializable");

        assert_eq!(back.max_ticks, config.max_ticks);
        assert_eq!(back.controller.dt, config.controller.dt);
        assert_eq!(
            back.controller.guidance.capture_radius,
            config.controller.guidance.capture_radius
        );
    }
}
