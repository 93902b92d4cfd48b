//! Hover-linearized plant model
//!
//! Holds the constant matrices the observer and the feedback law run on:
//! the dynamics/input/output triple (A, B, C) of the quadrotor linearized
//! about hover, plus the precomputed feedback gain K and observer gain L.
//!
//! A, B and C follow directly from the physical parameters; K and L come
//! from an offline LQR/pole-placement synthesis and are carried here as
//! opaque numeric tables.

use nalgebra::{SMatrix, Vector3};
use serde::{Deserialize, Serialize};

use crate::GRAVITY;

/// Physical quadrotor parameters behind the linearization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrotorParams {
    /// Mass [kg]
    pub mass: f64,
    /// Inertia diagonal [kg·m²] (body frame)
    pub inertia: Vector3<f64>,
    /// Gravity magnitude [m/s²]
    pub gravity: f64,
}

impl QuadrotorParams {
    pub fn new(mass: f64, inertia: Vector3<f64>) -> Self {
        Self {
            mass,
            inertia,
            gravity: GRAVITY,
        }
    }

    /// Steady thrust that exactly cancels gravity at hover [N]
    pub fn hover_thrust(&self) -> f64 {
        self.mass * self.gravity
    }
}

impl Default for QuadrotorParams {
    fn default() -> Self {
        Self::new(0.5, Vector3::new(2.3e-3, 2.3e-3, 4.0e-3))
    }
}

/// Constant matrices of the hover-linearized plant and its controller gains
#[derive(Debug, Clone)]
pub struct PlantModel {
    /// Dynamics matrix A (12×12)
    pub dynamics: SMatrix<f64, 12, 12>,
    /// Input matrix B (12×4)
    pub input: SMatrix<f64, 12, 4>,
    /// Output matrix C (6×12): selects position and attitude
    pub output: SMatrix<f64, 6, 12>,
    /// Full-state feedback gain K (4×12)
    pub feedback_gain: SMatrix<f64, 4, 12>,
    /// Observer gain L (12×6)
    pub observer_gain: SMatrix<f64, 12, 6>,
    /// Hover thrust offset [N]; commanded thrust is an increment on this
    pub hover_thrust: f64,
    /// Per-axis step length of the guidance pursuit [m]
    pub pursuit_step: Vector3<f64>,
}

impl PlantModel {
    /// Assemble the plant from physical parameters and synthesized gains.
    ///
    /// State ordering is [position, attitude, linear velocity, angular
    /// velocity]. About hover the attitude kinematics reduce to the
    /// identity and the only couplings are gravity tilt terms and the
    /// per-axis input scalings.
    pub fn new(
        params: &QuadrotorParams,
        feedback_gain: SMatrix<f64, 4, 12>,
        observer_gain: SMatrix<f64, 12, 6>,
        pursuit_step: Vector3<f64>,
    ) -> Self {
        let mut dynamics = SMatrix::<f64, 12, 12>::zeros();
        for axis in 0..6 {
            // positions follow velocities, angles follow rates
            dynamics[(axis, axis + 6)] = 1.0;
        }
        // tilting couples gravity into horizontal acceleration
        dynamics[(6, 4)] = params.gravity;
        dynamics[(7, 3)] = -params.gravity;

        let mut input = SMatrix::<f64, 12, 4>::zeros();
        input[(8, 3)] = 1.0 / params.mass;
        input[(9, 0)] = 1.0 / params.inertia.x;
        input[(10, 1)] = 1.0 / params.inertia.y;
        input[(11, 2)] = 1.0 / params.inertia.z;

        let mut output = SMatrix::<f64, 6, 12>::zeros();
        for axis in 0..6 {
            output[(axis, axis)] = 1.0;
        }

        Self {
            dynamics,
            input,
            output,
            feedback_gain,
            observer_gain,
            hover_thrust: params.hover_thrust(),
            pursuit_step,
        }
    }

    /// Plant for the given airframe with the stock synthesized gains.
    ///
    /// The gains were designed against the stock parameters and stay
    /// valid only for small deviations from them.
    pub fn with_params(params: &QuadrotorParams) -> Self {
        Self::new(
            params,
            synthesized_feedback_gain(),
            synthesized_observer_gain(),
            Vector3::new(2.875, 3.125, 3.125),
        )
    }
}

impl Default for PlantModel {
    /// Plant and gains for the stock 0.5 kg racer, gains as produced by the
    /// offline synthesis run.
    fn default() -> Self {
        Self::with_params(&QuadrotorParams::default())
    }
}

/// LQR feedback gain, pasted from the synthesis output.
#[rustfmt::skip]
fn synthesized_feedback_gain() -> SMatrix<f64, 4, 12> {
    SMatrix::<f64, 4, 12>::from_row_slice(&[
        -2.810080883993808e-15, -1.2613124477738022, 6.950467773612513e-16, 3.0503786429167423, -5.370324180369874e-15, -2.8143160095484697e-15, -1.0181589514046684e-15, -0.8941762802111444, -5.12842121407869e-16, 0.4593489291672664, -2.6651605894871407e-18, -2.888747514170912e-16,
        0.7282190812544126, -3.28662799762878e-15, -1.9750243929025803e-16, 2.0543639551607953e-15, 2.6460048485695338, -9.78739991259383e-16, 0.6387407019518249, -1.4962044811496186e-15, 6.974363330988232e-17, -2.6651605894871407e-18, 0.45731971231635843, -7.364310600917789e-17,
        -1.3307665136619746e-16, 1.0518079991734897e-16, 2.0216654119872858e-15, -1.77547408967219e-15, -9.447722252942977e-16, 1.1415035273840846, 1.7767668940701206e-16, 5.995565854374637e-16, 2.5422356445331517e-16, -1.6610298206482745e-16, -4.2344785955277285e-17, 0.4539842785700515,
        3.142237099589623e-15, 2.116196348790621e-14, 10.24695076595958, -2.152173625642678e-14, 3.574858508385653e-15, 1.9117277236273755e-14, 1.4994789234393307e-15, 1.1144865850276374e-14, 3.3536473824717428, -1.5569886805942902e-16, 2.117416707288027e-17, 1.3423004203135041e-16,
    ])
}

/// Observer gain from the dual synthesis, pasted from the same run.
#[rustfmt::skip]
fn synthesized_observer_gain() -> SMatrix<f64, 12, 6> {
    SMatrix::<f64, 12, 6>::from_row_slice(&[
        10.310943555899932, 0.0, 0.0, 0.0, 0.4838019379971687, 0.0,
        0.0, 10.310943555899932, 0.0, -0.4838019379971687, 0.0, 0.0,
        0.0, 0.0, 9.893863947922348, 0.0, 0.0, 0.0,
        0.0, -0.4838019379971687, 0.0, 9.881988299121792, 0.0, 0.0,
        0.4838019379971687, 0.0, 0.0, 0.0, 9.881988299121792, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 9.893863947922348,
        13.274810664082066, 0.0, 0.0, 0.0, 9.685493643646506, 0.0,
        0.0, 13.274810664082066, 0.0, -9.685493643646506, 0.0, 0.0,
        0.0, 0.0, 8.944271909999152, 0.0, 0.0, 0.0,
        0.0, -0.08388592165773212, 0.0, 8.943878529594848, 0.0, 0.0,
        0.08388592165773212, 0.0, 0.0, 0.0, 8.943878529594848, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 8.944271909999152,
    ])
}
