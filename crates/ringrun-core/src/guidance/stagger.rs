//! Launch staggering
//!
//! Every drone delays its departure in proportion to its rank in the
//! formation, so the pack strings out instead of converging on the first
//! ring at once. The rank is computed once per episode from the peer
//! positions observed on the first tick and is immutable until the next
//! reset.

use nalgebra::Vector3;

/// Number of peers ahead of `own` in the launch order.
///
/// A peer is ahead if it is strictly ahead in x, or tied in x and ahead
/// in y. Peers at the exact same (x, y) leave both ranks equal, a known
/// tie the schedule does not resolve; such drones share a wait time.
pub fn launch_rank(own: &Vector3<f64>, peers: &[Vector3<f64>]) -> usize {
    peers
        .iter()
        .filter(|peer| peer.x > own.x || (peer.x == own.x && peer.y > own.y))
        .count()
}

/// Episode-scoped launch schedule, fixed on the first tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaggerSchedule {
    /// Rank in the launch order; the front-most drone holds rank 0
    pub order: usize,
    /// Ticks to sit inert before engaging
    pub wait_ticks: u64,
}

impl StaggerSchedule {
    /// Schedule for a drone at `own` among `peers`.
    ///
    /// Each rank waits `spacing / dt` ticks longer than the one before it.
    pub fn from_positions(
        own: &Vector3<f64>,
        peers: &[Vector3<f64>],
        spacing: f64,
        dt: f64,
    ) -> Self {
        let order = launch_rank(own, peers);
        // the quotient is not exactly representable (e.g. 2 / 0.01), so
        // round instead of truncating
        let wait_ticks = (order as f64 * spacing / dt).round() as u64;

        Self { order, wait_ticks }
    }
}
