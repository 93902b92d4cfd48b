//! Per-drone step orchestrator
//!
//! Ties guidance, feedback and the observer together once per control
//! tick and owns all per-drone state. One [`DroneController`] per drone;
//! instances share nothing and may run on separate threads.

use nalgebra::{Vector3, Vector6};
use serde::{Deserialize, Serialize};

use crate::control::{state_feedback, Command, CommandLimiter};
use crate::estimation::StateObserver;
use crate::guidance::{GateObservation, Guidance, GuidanceConfig};
use crate::model::PlantModel;
use crate::{ControlVector, MeasurementVector, StateVector};

/// One pose sample from the upstream sensor stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseMeasurement {
    /// Position [m]
    pub position: Vector3<f64>,
    /// Attitude [rad], roll/pitch/yaw
    pub attitude: Vector3<f64>,
}

impl PoseMeasurement {
    pub fn new(position: Vector3<f64>, attitude: Vector3<f64>) -> Self {
        Self { position, attitude }
    }

    /// Stack into the observer's measurement vector
    pub fn to_vector(&self) -> MeasurementVector {
        Vector6::new(
            self.position.x,
            self.position.y,
            self.position.z,
            self.attitude.x,
            self.attitude.y,
            self.attitude.z,
        )
    }
}

/// Controller timing and guidance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Control tick length [s]
    pub dt: f64,
    /// Guidance thresholds and geometry
    pub guidance: GuidanceConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            guidance: GuidanceConfig::default(),
        }
    }
}

/// Full per-drone controller: observer + guidance + feedback law
pub struct DroneController {
    plant: PlantModel,
    observer: StateObserver,
    guidance: Guidance,
    limiter: Option<Box<dyn CommandLimiter>>,
    dt: f64,
}

impl DroneController {
    pub fn new(plant: PlantModel, config: ControllerConfig) -> Self {
        let guidance = Guidance::new(config.guidance, config.dt);
        Self {
            plant,
            observer: StateObserver::new(),
            guidance,
            limiter: None,
            dt: config.dt,
        }
    }

    /// Install an actuator limiter; the observer is always fed the
    /// limited command.
    pub fn with_limiter(mut self, limiter: Box<dyn CommandLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// One control tick.
    ///
    /// While the drone is holding for its launch slot this returns the
    /// zero command and leaves the observer untouched. Once engaged:
    /// guidance target → feedback command → limiter → observer update
    /// with the limited input and the fresh measurement.
    pub fn step(
        &mut self,
        measurement: &PoseMeasurement,
        gate: &GateObservation,
        peers: &[Vector3<f64>],
    ) -> Command {
        let estimated = self.observer.position();
        let desired = match self.guidance.desired_position(
            &measurement.position,
            &estimated,
            gate,
            peers,
            &self.plant.pursuit_step,
        ) {
            Some(position) => position,
            None => return Command::zero(),
        };

        let mut target = StateVector::zeros();
        target.fixed_rows_mut::<3>(0).copy_from(&desired);

        let mut command = state_feedback(&self.plant, self.observer.estimate(), &target);
        if let Some(limiter) = &self.limiter {
            command = limiter.clamp(command);
        }

        let control = ControlVector::new(
            command.torque.x,
            command.torque.y,
            command.torque.z,
            command.thrust - self.plant.hover_thrust,
        );
        self.observer
            .update(&self.plant, &control, &measurement.to_vector(), self.dt);

        command
    }

    /// Start a new episode: zero the estimate and drop the launch
    /// schedule. The plant matrices are untouched.
    pub fn reset(&mut self) {
        self.observer.reset();
        self.guidance.reset();
    }

    /// Current state estimate
    pub fn estimate(&self) -> &StateVector {
        self.observer.estimate()
    }

    /// Guidance state (launch schedule, gate phase)
    pub fn guidance(&self) -> &Guidance {
        &self.guidance
    }

    /// The plant this controller was built around
    pub fn plant(&self) -> &PlantModel {
        &self.plant
    }
}
