//! Nonlinear quadrotor dynamics
//!
//! Full Euler-angle rigid-body model the controller's linearization is an
//! approximation of:
//!
//! ṗ = v
//! v̇ = R(φ, θ, ψ)·(0, 0, f)/m − (0, 0, g)
//! (φ̇, θ̇, ψ̇) = W(φ, θ)·ω
//! J·ω̇ = −ω × J·ω + τ
//!
//! World frame is z-up; thrust acts along the body z-axis. Integration is
//! explicit Euler at the controller tick, which is ample at 100 Hz for
//! the speeds flown here.

use nalgebra::Vector3;

use ringrun_core::{Command, PoseMeasurement, QuadrotorParams};

/// True rigid-body state of one drone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyState {
    /// Position [m] (world frame)
    pub position: Vector3<f64>,
    /// Attitude [rad], roll/pitch/yaw
    pub attitude: Vector3<f64>,
    /// Velocity [m/s] (world frame)
    pub velocity: Vector3<f64>,
    /// Angular velocity [rad/s] (body frame)
    pub angular_velocity: Vector3<f64>,
}

impl RigidBodyState {
    /// At rest, level, at `position`
    pub fn at_rest(position: Vector3<f64>) -> Self {
        Self {
            position,
            attitude: Vector3::zeros(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        }
    }

    /// The exact pose, as a noise-free measurement
    pub fn pose(&self) -> PoseMeasurement {
        PoseMeasurement::new(self.position, self.attitude)
    }

    /// True of every finite state; divergence detection for the runner
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.attitude.iter().all(|v| v.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
            && self.angular_velocity.iter().all(|v| v.is_finite())
    }
}

/// Rigid-body model shared by all drones in an episode
#[derive(Debug, Clone)]
pub struct QuadrotorDynamics {
    params: QuadrotorParams,
}

impl QuadrotorDynamics {
    pub fn new(params: QuadrotorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &QuadrotorParams {
        &self.params
    }

    /// Advance one state by `dt` under `command`.
    pub fn step(&self, state: &RigidBodyState, command: &Command, dt: f64) -> RigidBodyState {
        let (sin_phi, cos_phi) = (state.attitude.x.sin(), state.attitude.x.cos());
        let (sin_theta, cos_theta) = (state.attitude.y.sin(), state.attitude.y.cos());
        let (sin_psi, cos_psi) = (state.attitude.z.sin(), state.attitude.z.cos());

        // body z-axis in world coordinates (R = Rz·Ry·Rx, third column)
        let thrust_axis = Vector3::new(
            cos_phi * sin_theta * cos_psi + sin_phi * sin_psi,
            cos_phi * sin_theta * sin_psi - sin_phi * cos_psi,
            cos_phi * cos_theta,
        );
        let acceleration = thrust_axis * (command.thrust / self.params.mass)
            - Vector3::new(0.0, 0.0, self.params.gravity);

        // Euler-angle kinematics; the yaw row degenerates at θ = ±π/2
        let (p, q, r) = (
            state.angular_velocity.x,
            state.angular_velocity.y,
            state.angular_velocity.z,
        );
        let tan_theta = sin_theta / cos_theta;
        let attitude_rate = Vector3::new(
            p + q * sin_phi * tan_theta + r * cos_phi * tan_theta,
            q * cos_phi - r * sin_phi,
            if cos_theta.abs() > 1e-6 {
                (q * sin_phi + r * cos_phi) / cos_theta
            } else {
                0.0
            },
        );

        // Euler's equations with the gyroscopic term, diagonal inertia
        let inertia = &self.params.inertia;
        let angular_acceleration = Vector3::new(
            (command.torque.x + (inertia.y - inertia.z) * q * r) / inertia.x,
            (command.torque.y + (inertia.z - inertia.x) * r * p) / inertia.y,
            (command.torque.z + (inertia.x - inertia.y) * p * q) / inertia.z,
        );

        RigidBodyState {
            position: state.position + state.velocity * dt,
            attitude: state.attitude + attitude_rate * dt,
            velocity: state.velocity + acceleration * dt,
            angular_velocity: state.angular_velocity + angular_acceleration * dt,
        }
    }
}

impl Default for QuadrotorDynamics {
    fn default() -> Self {
        Self::new(QuadrotorParams::default())
    }
}
