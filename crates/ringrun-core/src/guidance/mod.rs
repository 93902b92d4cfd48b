//! Guidance
//!
//! Turns the ring target and the peer formation into the desired position
//! for each tick:
//! - launch staggering (sit inert until this drone's slot comes up)
//! - the ring traversal waypoint machine
//! - the terminal hover-and-descend targets on the final ring
//! - a bounded per-axis pursuit from the estimated position toward the
//!   active waypoint

pub mod gate;
pub mod stagger;

pub use gate::{GatePhase, GateTracker};
pub use stagger::{launch_rank, StaggerSchedule};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// The ring the mission layer currently wants crossed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateObservation {
    /// Ring center [m]
    pub position: Vector3<f64>,
    /// Whether this is the last ring of the course
    pub is_final: bool,
}

/// Guidance thresholds and geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidanceConfig {
    /// Launch spacing per rank [m]; waits `spacing / dt` ticks per rank
    pub spacing: f64,
    /// Waypoint distance before/past a ring along the approach axis [m]
    pub waypoint_offset: f64,
    /// Arrival radius around a waypoint [m]
    pub capture_radius: f64,
    /// Per-axis gap below which an off-axis coordinate snaps to the
    /// waypoint instead of being pursued [m]
    pub snap_tolerance: f64,
    /// Hover point height above the final ring [m]
    pub final_hover_height: f64,
    /// Radius around the hover point that switches to the final descent [m]
    pub final_capture_radius: f64,
    /// Pursuit distances below this collapse to the waypoint itself
    pub pursuit_epsilon: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            spacing: 2.0,
            waypoint_offset: 2.0,
            capture_radius: 0.75,
            snap_tolerance: 0.5,
            final_hover_height: 1.25,
            final_capture_radius: 1.75,
            pursuit_epsilon: 1e-9,
        }
    }
}

/// Per-drone guidance state
#[derive(Debug, Clone)]
pub struct Guidance {
    config: GuidanceConfig,
    dt: f64,
    stagger: Option<StaggerSchedule>,
    gate: GateTracker,
    counter: u64,
}

impl Guidance {
    pub fn new(config: GuidanceConfig, dt: f64) -> Self {
        let gate = GateTracker::new(config.waypoint_offset, config.capture_radius);
        Self {
            config,
            dt,
            stagger: None,
            gate,
            counter: 0,
        }
    }

    /// Desired position for this tick, or `None` while the drone holds
    /// for its launch slot.
    ///
    /// The launch schedule is computed from `peers` on the first call of
    /// an episode and never again until [`Guidance::reset`]. Waypoint
    /// predicates run on the measured position; the pursuit interpolation
    /// runs from the estimated position.
    pub fn desired_position(
        &mut self,
        measured: &Vector3<f64>,
        estimated: &Vector3<f64>,
        gate: &GateObservation,
        peers: &[Vector3<f64>],
        pursuit_step: &Vector3<f64>,
    ) -> Option<Vector3<f64>> {
        let spacing = self.config.spacing;
        let dt = self.dt;
        let schedule = *self
            .stagger
            .get_or_insert_with(|| StaggerSchedule::from_positions(measured, peers, spacing, dt));

        self.counter += 1;
        if self.counter <= schedule.wait_ticks {
            return None;
        }

        if gate.is_final {
            return Some(self.final_target(measured, &gate.position));
        }

        let waypoint = self.gate.advance(measured, &gate.position);
        Some(self.pursue(estimated, &waypoint, pursuit_step))
    }

    /// Terminal targets: hold a point above the last ring, then descend
    /// onto its center once close enough.
    fn final_target(&self, measured: &Vector3<f64>, ring: &Vector3<f64>) -> Vector3<f64> {
        let hover = ring + Vector3::new(0.0, 0.0, self.config.final_hover_height);
        if (hover - measured).norm() > self.config.final_capture_radius {
            hover
        } else {
            *ring
        }
    }

    /// Bounded pursuit: move from the estimated position toward the
    /// waypoint by the per-axis step lengths, normalized by the full 3-D
    /// distance. Off-axis coordinates already within the snap tolerance
    /// lock onto the waypoint directly.
    fn pursue(
        &self,
        estimated: &Vector3<f64>,
        waypoint: &Vector3<f64>,
        step: &Vector3<f64>,
    ) -> Vector3<f64> {
        let distance = (waypoint - estimated).norm();
        if distance < self.config.pursuit_epsilon {
            return *waypoint;
        }

        let mut desired = *waypoint;
        for axis in 0..3 {
            let gap = waypoint[axis] - estimated[axis];
            if axis == 0 || gap.abs() > self.config.snap_tolerance {
                desired[axis] = estimated[axis] + step[axis] * gap / distance;
            }
        }
        desired
    }

    /// Clear episode-scoped state. The launch schedule is recomputed on
    /// the next tick; the gate tracker keeps its ring memory.
    pub fn reset(&mut self) {
        self.stagger = None;
        self.counter = 0;
    }

    /// Launch schedule, once the episode has started
    pub fn stagger(&self) -> Option<&StaggerSchedule> {
        self.stagger.as_ref()
    }

    /// Ring waypoint machine
    pub fn gate(&self) -> &GateTracker {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f64 = 0.01;

    fn guidance() -> Guidance {
        Guidance::new(GuidanceConfig::default(), DT)
    }

    fn step_lengths() -> Vector3<f64> {
        Vector3::new(2.875, 3.125, 3.125)
    }

    fn ring_at(position: Vector3<f64>) -> GateObservation {
        GateObservation {
            position,
            is_final: false,
        }
    }

    #[test]
    fn test_rank_zero_engages_on_first_tick() {
        let mut guidance = guidance();
        let gate = ring_at(Vector3::new(0.0, 0.0, 2.0));

        let desired = guidance.desired_position(
            &Vector3::zeros(),
            &Vector3::zeros(),
            &gate,
            &[],
            &step_lengths(),
        );

        assert!(desired.is_some());
        assert_eq!(guidance.stagger().map(|s| s.wait_ticks), Some(0));
    }

    #[test]
    fn test_staggered_drone_holds_then_engages() {
        let mut guidance = guidance();
        let gate = ring_at(Vector3::new(5.0, 0.0, 2.0));
        let peers = [Vector3::new(1.0, 0.0, 0.0)];

        // rank 1 behind one peer: 200 inert ticks
        for _ in 0..200 {
            let desired = guidance.desired_position(
                &Vector3::zeros(),
                &Vector3::zeros(),
                &gate,
                &peers,
                &step_lengths(),
            );
            assert!(desired.is_none());
        }

        let desired = guidance.desired_position(
            &Vector3::zeros(),
            &Vector3::zeros(),
            &gate,
            &peers,
            &step_lengths(),
        );
        assert!(desired.is_some());
    }

    #[test]
    fn test_schedule_fixed_after_first_tick() {
        let mut guidance = guidance();
        let gate = ring_at(Vector3::new(5.0, 0.0, 2.0));
        let peers = [Vector3::new(1.0, 0.0, 0.0)];

        guidance.desired_position(
            &Vector3::zeros(),
            &Vector3::zeros(),
            &gate,
            &peers,
            &step_lengths(),
        );
        let first = *guidance.stagger().expect("schedule set on first tick");

        // later ticks see different peers; the schedule must not move
        let moved = [Vector3::new(-9.0, 0.0, 0.0), Vector3::new(-8.0, 0.0, 0.0)];
        guidance.desired_position(
            &Vector3::zeros(),
            &Vector3::zeros(),
            &gate,
            &moved,
            &step_lengths(),
        );

        assert_eq!(guidance.stagger(), Some(&first));
    }

    #[test]
    fn test_reset_clears_schedule_and_counter() {
        let mut guidance = guidance();
        let gate = ring_at(Vector3::new(5.0, 0.0, 2.0));

        guidance.desired_position(
            &Vector3::zeros(),
            &Vector3::zeros(),
            &gate,
            &[],
            &step_lengths(),
        );
        assert!(guidance.stagger().is_some());

        guidance.reset();
        assert!(guidance.stagger().is_none());
        assert_eq!(guidance.counter, 0);
    }

    #[test]
    fn test_pursuit_is_bounded_and_snaps_close_axes() {
        let guidance = guidance();
        let estimated = Vector3::zeros();
        let waypoint = Vector3::new(-2.0, 0.3, 2.0);

        let desired = guidance.pursue(&estimated, &waypoint, &step_lengths());

        let distance = (waypoint - estimated).norm();
        // x always pursues, even within the snap tolerance
        assert_relative_eq!(desired.x, 2.875 * (-2.0) / distance, epsilon = 1e-12);
        // y gap 0.3 < 0.5 snaps
        assert_relative_eq!(desired.y, 0.3);
        // z gap 2.0 > 0.5 pursues
        assert_relative_eq!(desired.z, 3.125 * 2.0 / distance, epsilon = 1e-12);
    }

    #[test]
    fn test_pursuit_at_waypoint_returns_waypoint() {
        let guidance = guidance();
        let waypoint = Vector3::new(1.0, 2.0, 3.0);

        let desired = guidance.pursue(&waypoint, &waypoint, &step_lengths());

        assert_relative_eq!(desired, waypoint);
    }

    #[test]
    fn test_final_ring_hover_then_descend() {
        let mut guidance = guidance();
        let ring = Vector3::new(10.0, 0.0, 1.0);
        let gate = GateObservation {
            position: ring,
            is_final: true,
        };
        let hover = Vector3::new(10.0, 0.0, 2.25);

        // far away: hover point
        let desired = guidance
            .desired_position(
                &Vector3::zeros(),
                &Vector3::zeros(),
                &gate,
                &[],
                &step_lengths(),
            )
            .expect("active");
        assert_relative_eq!(desired, hover);

        // inside the capture radius of the hover point: ring center
        let near = Vector3::new(10.0, 0.5, 2.0);
        let desired = guidance
            .desired_position(&near, &near, &gate, &[], &step_lengths())
            .expect("active");
        assert_relative_eq!(desired, ring);
    }
}
