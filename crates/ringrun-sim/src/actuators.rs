//! Actuator saturation
//!
//! The physical rotors bound both the per-axis torques and the collective
//! thrust; the controller is handed this limiter so its observer sees the
//! command the motors actually produced.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use ringrun_core::{Command, CommandLimiter};

/// Symmetric torque bounds plus a one-sided thrust range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorqueThrustLimiter {
    /// Per-axis torque magnitude bound [N·m]
    pub max_torque: Vector3<f64>,
    /// Thrust floor [N]; rotors cannot pull
    pub min_thrust: f64,
    /// Thrust ceiling [N]
    pub max_thrust: f64,
}

impl Default for TorqueThrustLimiter {
    fn default() -> Self {
        Self {
            max_torque: Vector3::new(0.1, 0.1, 0.05),
            min_thrust: 0.0,
            // twice hover for the stock 0.5 kg racer
            max_thrust: 9.81,
        }
    }
}

impl CommandLimiter for TorqueThrustLimiter {
    fn clamp(&self, command: Command) -> Command {
        Command {
            torque: Vector3::new(
                command.torque.x.clamp(-self.max_torque.x, self.max_torque.x),
                command.torque.y.clamp(-self.max_torque.y, self.max_torque.y),
                command.torque.z.clamp(-self.max_torque.z, self.max_torque.z),
            ),
            thrust: command.thrust.clamp(self.min_thrust, self.max_thrust),
        }
    }
}
