//! # Ringrun Sim
//!
//! Episode simulation for the ringrun controller: everything the
//! controller treats as an external collaborator, in one place.
//!
//! - [`dynamics`]: nonlinear rigid-body quadrotor model
//! - [`sensors`]: noisy pose measurements
//! - [`course`]: the ring sequence and per-drone progress
//! - [`actuators`]: torque/thrust saturation
//! - [`runner`]: multi-drone lockstep episodes with history

pub mod actuators;
pub mod config;
pub mod course;
pub mod dynamics;
pub mod runner;
pub mod sensors;

pub use actuators::TorqueThrustLimiter;
pub use config::{SensorNoiseConfig, SimConfig};
pub use course::{CourseProgress, Ring, RingCourse};
pub use dynamics::{QuadrotorDynamics, RigidBodyState};
pub use runner::{DroneHistory, EpisodeError, EpisodeRunner, EpisodeSummary};
pub use sensors::PoseSensor;
