//! Episode runner
//!
//! Steps a formation of drones through a ring course in lockstep: sense,
//! control, actuate, integrate, then score ring passages. Each drone owns
//! its controller and sensor; the only cross-drone input is the read-only
//! peer position list handed to the controllers for launch staggering.

use nalgebra::Vector3;
use thiserror::Error;
use tracing::{debug, info, warn};

use ringrun_core::{Command, DroneController, PlantModel};

use crate::config::SimConfig;
use crate::course::{CourseProgress, RingCourse};
use crate::dynamics::{QuadrotorDynamics, RigidBodyState};
use crate::sensors::PoseSensor;

/// Episode failures
#[derive(Debug, Error)]
pub enum EpisodeError {
    #[error("ring course is empty")]
    EmptyCourse,
    #[error("no start positions given")]
    NoDrones,
    #[error("drone {drone} diverged at tick {tick}")]
    Diverged { drone: usize, tick: u64 },
}

/// One drone's simulation bundle
struct DroneSim {
    state: RigidBodyState,
    start: RigidBodyState,
    controller: DroneController,
    sensor: PoseSensor,
    progress: CourseProgress,
}

/// Per-drone trace of an episode
#[derive(Debug, Clone, Default)]
pub struct DroneHistory {
    /// True positions, one per tick
    pub positions: Vec<Vector3<f64>>,
    /// Commands returned by the controller, one per tick
    pub commands: Vec<Command>,
}

/// Outcome of a finished episode
#[derive(Debug, Clone)]
pub struct EpisodeSummary {
    /// Ticks actually simulated
    pub ticks: u64,
    /// Rings passed per drone
    pub rings_passed: Vec<usize>,
    /// Whether each drone finished the full course
    pub completed: Vec<bool>,
}

impl EpisodeSummary {
    /// Whether the entire formation finished
    pub fn all_completed(&self) -> bool {
        self.completed.iter().all(|&done| done)
    }
}

/// Lockstep multi-drone episode simulation
pub struct EpisodeRunner {
    config: SimConfig,
    course: RingCourse,
    dynamics: QuadrotorDynamics,
    drones: Vec<DroneSim>,
    histories: Vec<DroneHistory>,
    tick: u64,
}

impl EpisodeRunner {
    /// Build a runner with one drone per start position, all sharing the
    /// course and the stock plant.
    pub fn new(
        config: SimConfig,
        course: RingCourse,
        starts: &[Vector3<f64>],
    ) -> Result<Self, EpisodeError> {
        if course.is_empty() {
            return Err(EpisodeError::EmptyCourse);
        }
        if starts.is_empty() {
            return Err(EpisodeError::NoDrones);
        }

        let dynamics = QuadrotorDynamics::new(config.quadrotor.clone());
        let drones = starts
            .iter()
            .enumerate()
            .map(|(i, start)| {
                let controller =
                    DroneController::new(PlantModel::with_params(&config.quadrotor), config.controller.clone())
                        .with_limiter(Box::new(config.limits.clone()));
                let sensor = PoseSensor::new(
                    config.sensors.position_noise_std,
                    config.sensors.attitude_noise_std,
                    config.sensors.seed + i as u64,
                );
                let state = RigidBodyState::at_rest(*start);
                DroneSim {
                    state,
                    start: state,
                    controller,
                    sensor,
                    progress: CourseProgress::start(),
                }
            })
            .collect();

        let histories = vec![DroneHistory::default(); starts.len()];

        let mut runner = Self {
            config,
            course,
            dynamics,
            drones,
            histories,
            tick: 0,
        };
        runner.reset();
        Ok(runner)
    }

    /// Put every drone back on its start, reset the controllers, re-seed
    /// the sensors and clear the traces.
    pub fn reset(&mut self) {
        for (i, drone) in self.drones.iter_mut().enumerate() {
            drone.state = drone.start;
            drone.controller.reset();
            drone.sensor = PoseSensor::new(
                self.config.sensors.position_noise_std,
                self.config.sensors.attitude_noise_std,
                self.config.sensors.seed + i as u64,
            );
            drone.progress = CourseProgress::start();
        }
        for history in &mut self.histories {
            history.positions.clear();
            history.commands.clear();
        }
        self.tick = 0;
    }

    /// Advance the whole formation by one tick.
    pub fn step(&mut self) -> Result<(), EpisodeError> {
        let dt = self.config.dt();
        let positions: Vec<Vector3<f64>> =
            self.drones.iter().map(|d| d.state.position).collect();

        for (i, drone) in self.drones.iter_mut().enumerate() {
            let peers: Vec<Vector3<f64>> = positions
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, p)| *p)
                .collect();

            let gate = match drone.progress.observe(&self.course) {
                Some(gate) => gate,
                None => continue,
            };
            let measurement = drone.sensor.measure(&drone.state);
            let command = drone.controller.step(&measurement, &gate, &peers);

            let previous = drone.state.position;
            drone.state = self.dynamics.step(&drone.state, &command, dt);

            if !drone.state.is_finite() {
                warn!(drone = i, tick = self.tick, "state diverged");
                return Err(EpisodeError::Diverged {
                    drone: i,
                    tick: self.tick,
                });
            }

            if drone
                .progress
                .update(&self.course, &previous, &drone.state.position)
            {
                debug!(
                    drone = i,
                    rings_passed = drone.progress.rings_passed(),
                    tick = self.tick,
                    "ring passed"
                );
            }

            self.histories[i].positions.push(drone.state.position);
            self.histories[i].commands.push(command);
        }

        self.tick += 1;
        Ok(())
    }

    /// Run until every drone finishes or the tick cap is reached.
    pub fn run(&mut self) -> Result<EpisodeSummary, EpisodeError> {
        while self.tick < self.config.max_ticks && !self.all_completed() {
            self.step()?;
        }

        let summary = self.summary();
        info!(
            ticks = summary.ticks,
            completed = summary.all_completed(),
            "episode finished"
        );
        Ok(summary)
    }

    fn all_completed(&self) -> bool {
        self.drones
            .iter()
            .all(|drone| drone.progress.is_complete(&self.course))
    }

    /// Current summary of the episode so far
    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            ticks: self.tick,
            rings_passed: self
                .drones
                .iter()
                .map(|d| d.progress.rings_passed())
                .collect(),
            completed: self
                .drones
                .iter()
                .map(|d| d.progress.is_complete(&self.course))
                .collect(),
        }
    }

    /// Ticks simulated so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// True states, one per drone
    pub fn states(&self) -> Vec<RigidBodyState> {
        self.drones.iter().map(|d| d.state).collect()
    }

    /// Per-drone traces
    pub fn histories(&self) -> &[DroneHistory] {
        &self.histories
    }

    /// The course being flown
    pub fn course(&self) -> &RingCourse {
        &self.course
    }
}
