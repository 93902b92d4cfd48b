//! Ring course and per-drone progress
//!
//! The course is an ordered list of rings; each drone works through it
//! independently. A ring counts as passed when the drone crosses its
//! x-plane going forward inside the ring radius. The last ring is the
//! landing ring and completes on proximity to its center instead.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use ringrun_core::GateObservation;

/// One gate of the course
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Center [m]
    pub position: Vector3<f64>,
    /// Opening radius [m]
    pub radius: f64,
}

impl Ring {
    pub fn new(position: Vector3<f64>, radius: f64) -> Self {
        Self { position, radius }
    }
}

/// Ordered ring sequence shared by every drone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingCourse {
    rings: Vec<Ring>,
}

impl RingCourse {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Evenly spaced rings along +x at the given altitude, 0.5 m radius
    pub fn straight_line(count: usize, spacing: f64, altitude: f64) -> Self {
        let rings = (1..=count)
            .map(|i| {
                Ring::new(
                    Vector3::new(i as f64 * spacing, 0.0, altitude),
                    0.5,
                )
            })
            .collect();
        Self { rings }
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }
}

/// One drone's position in the ring sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseProgress {
    next: usize,
}

impl CourseProgress {
    pub fn start() -> Self {
        Self { next: 0 }
    }

    /// Rings already passed
    pub fn rings_passed(&self) -> usize {
        self.next
    }

    /// Whether the whole course, landing ring included, is done
    pub fn is_complete(&self, course: &RingCourse) -> bool {
        self.next >= course.len()
    }

    /// The gate the controller should currently fly.
    ///
    /// Once complete this keeps reporting the landing ring, so the
    /// controller settles onto it.
    pub fn observe(&self, course: &RingCourse) -> Option<GateObservation> {
        let index = self.next.min(course.len().checked_sub(1)?);
        let ring = course.rings[index];
        Some(GateObservation {
            position: ring.position,
            is_final: index + 1 == course.len(),
        })
    }

    /// Advance progress given the motion over one tick. Returns true when
    /// a ring was passed this tick.
    pub fn update(
        &mut self,
        course: &RingCourse,
        previous: &Vector3<f64>,
        current: &Vector3<f64>,
    ) -> bool {
        if self.is_complete(course) {
            return false;
        }

        let ring = course.rings[self.next];
        let passed = if self.next + 1 == course.len() {
            // landing ring: arrival at the center
            (current - ring.position).norm() < ring.radius
        } else {
            let crossed = previous.x <= ring.position.x && current.x > ring.position.x;
            let lateral = Vector3::new(
                0.0,
                current.y - ring.position.y,
                current.z - ring.position.z,
            );
            crossed && lateral.norm() < ring.radius
        };

        if passed {
            self.next += 1;
        }
        passed
    }
}
