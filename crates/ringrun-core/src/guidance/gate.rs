//! Ring traversal state machine
//!
//! A ring is crossed by flying to a waypoint short of it on the approach
//! axis, through the plane, and out to a waypoint past it. The machine
//! tracks which leg the drone is on and which waypoint it should pursue.
//!
//! The approach axis is x: `before = ring − (offset, 0, 0)`,
//! `after = ring + (offset, 0, 0)`.

use nalgebra::Vector3;

/// Leg of the ring traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Lining up on the near-side waypoint
    Approach,
    /// Running the gap toward the far-side waypoint
    Transit,
    /// Past the ring, still pursuing the far-side waypoint
    Depart,
}

impl GatePhase {
    /// Phase after arriving at the current waypoint
    fn advanced(self) -> Self {
        match self {
            GatePhase::Approach => GatePhase::Transit,
            GatePhase::Transit | GatePhase::Depart => GatePhase::Depart,
        }
    }
}

/// Waypoints and phase for the ring currently being flown
#[derive(Debug, Clone)]
struct ActiveGate {
    ring: Vector3<f64>,
    before: Vector3<f64>,
    after: Vector3<f64>,
    phase: GatePhase,
}

impl ActiveGate {
    fn new(ring: Vector3<f64>, offset: f64) -> Self {
        let shift = Vector3::new(offset, 0.0, 0.0);
        Self {
            ring,
            before: ring - shift,
            after: ring + shift,
            phase: GatePhase::Approach,
        }
    }

    fn target(&self) -> Vector3<f64> {
        match self.phase {
            GatePhase::Approach => self.before,
            GatePhase::Transit | GatePhase::Depart => self.after,
        }
    }
}

/// Ring-to-ring waypoint tracker.
///
/// Persists across episode resets; waypoints are only reassigned when the
/// observed ring position actually changes.
#[derive(Debug, Clone)]
pub struct GateTracker {
    waypoint_offset: f64,
    capture_radius: f64,
    active: Option<ActiveGate>,
}

impl GateTracker {
    pub fn new(waypoint_offset: f64, capture_radius: f64) -> Self {
        Self {
            waypoint_offset,
            capture_radius,
            active: None,
        }
    }

    /// Run the transition predicates for this tick and return the waypoint
    /// to pursue.
    ///
    /// Predicates, in priority order, on the measured position:
    /// 1. a ring change rebuilds the waypoints and restarts at `Approach`;
    /// 2. measured x past the ring plane forces `Approach`: the drone is
    ///    not lined up (or missed the gap) and must come back around;
    /// 3. arrival within the capture radius of the current waypoint
    ///    advances the phase.
    pub fn advance(&mut self, measured: &Vector3<f64>, ring: &Vector3<f64>) -> Vector3<f64> {
        let mut gate = match self.active.take() {
            Some(gate) if gate.ring == *ring => gate,
            _ => ActiveGate::new(*ring, self.waypoint_offset),
        };

        if measured.x > gate.ring.x {
            gate.phase = GatePhase::Approach;
        } else if (gate.target() - measured).norm() < self.capture_radius {
            gate.phase = gate.phase.advanced();
        }

        let target = gate.target();
        self.active = Some(gate);
        target
    }

    /// Phase of the ring currently being flown, if any
    pub fn phase(&self) -> Option<GatePhase> {
        self.active.as_ref().map(|gate| gate.phase)
    }

    /// Waypoint currently pursued, if any
    pub fn target(&self) -> Option<Vector3<f64>> {
        self.active.as_ref().map(|gate| gate.target())
    }
}
