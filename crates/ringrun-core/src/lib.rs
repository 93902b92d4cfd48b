//! # Ringrun Core
//!
//! Per-drone flight controller for a formation of quadrotors racing through
//! a sequence of rings.
//!
//! Each drone runs the same three pieces, coupled through one step function
//! per control tick:
//!
//! - [`estimation`]: a Luenberger observer that fuses noisy pose
//!   measurements into a 12-state estimate
//! - [`guidance`]: launch staggering plus the ring-traversal state machine
//!   that produces the desired position for the tick
//! - [`control`]: the full-state feedback law mapping state error to three
//!   body torques and a collective thrust
//!
//! The plant, observer gain and feedback gain are fixed constants from an
//! offline synthesis ([`model`]); the controller never re-derives them.

pub mod control;
pub mod controller;
pub mod estimation;
pub mod guidance;
pub mod model;

use nalgebra::SVector;

/// Full state: [x, y, z, roll, pitch, yaw, vx, vy, vz, ωx, ωy, ωz]
pub type StateVector = SVector<f64, 12>;

/// Control input: [τx, τy, τz, thrust increment from hover]
pub type ControlVector = SVector<f64, 4>;

/// Measured output: [x, y, z, roll, pitch, yaw]
pub type MeasurementVector = SVector<f64, 6>;

/// Gravity constant [m/s²]
pub const GRAVITY: f64 = 9.81;

pub use control::{Command, CommandLimiter};
pub use controller::{ControllerConfig, DroneController, PoseMeasurement};
pub use estimation::StateObserver;
pub use guidance::{GateObservation, Guidance, GuidanceConfig};
pub use model::{PlantModel, QuadrotorParams};
