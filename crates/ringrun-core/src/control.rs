//! Full-state feedback law
//!
//! Maps the error between the state estimate and the desired state to an
//! actuator command through the fixed gain K:
//!
//! u = −K · (x̂ − x_des)
//!
//! The thrust channel of u is an increment on the hover thrust; the
//! [`Command`] handed to the actuators carries the absolute thrust.

use nalgebra::Vector3;

use crate::model::PlantModel;
use crate::StateVector;

/// One tick's actuator command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Command {
    /// Body torques [N·m]
    pub torque: Vector3<f64>,
    /// Collective thrust [N], absolute (hover offset included)
    pub thrust: f64,
}

impl Command {
    pub fn new(torque: Vector3<f64>, thrust: f64) -> Self {
        Self { torque, thrust }
    }

    /// The inert command: no torque, no thrust
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Actuator saturation seam.
///
/// The controller applies the limiter between the feedback law and the
/// observer update, so the observer always sees the command the actuators
/// actually received. Implementations must be pure per call.
pub trait CommandLimiter {
    fn clamp(&self, command: Command) -> Command;
}

/// Compute the raw feedback command for the given desired state.
pub fn state_feedback(plant: &PlantModel, estimate: &StateVector, desired: &StateVector) -> Command {
    let control = -(plant.feedback_gain * (estimate - desired));

    Command {
        torque: Vector3::new(control[0], control[1], control[2]),
        thrust: control[3] + plant.hover_thrust,
    }
}
