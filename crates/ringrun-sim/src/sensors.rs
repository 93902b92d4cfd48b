//! Noisy pose sensing
//!
//! Models the upstream tracking system as the true pose plus zero-mean
//! Gaussian noise. Deterministic per seed so episodes replay exactly.

use nalgebra::Vector3;

use ringrun_core::PoseMeasurement;

use crate::dynamics::RigidBodyState;

/// Seeded xorshift generator with a Box–Muller gaussian on top
#[derive(Debug, Clone)]
pub struct NoiseSource {
    state: u64,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        // xorshift has no zero state
        Self {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform sample in [0, 1)
    pub fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard normal sample
    pub fn gaussian(&mut self) -> f64 {
        let u1 = self.uniform().max(1e-12);
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// Independent per-axis gaussian with the given standard deviation
    pub fn gaussian_vector(&mut self, std_dev: f64) -> Vector3<f64> {
        Vector3::new(
            self.gaussian() * std_dev,
            self.gaussian() * std_dev,
            self.gaussian() * std_dev,
        )
    }
}

/// Pose sensor for one drone
#[derive(Debug, Clone)]
pub struct PoseSensor {
    position_noise_std: f64,
    attitude_noise_std: f64,
    noise: NoiseSource,
}

impl PoseSensor {
    pub fn new(position_noise_std: f64, attitude_noise_std: f64, seed: u64) -> Self {
        Self {
            position_noise_std,
            attitude_noise_std,
            noise: NoiseSource::new(seed),
        }
    }

    /// Noise-free sensor, for validation runs
    pub fn exact() -> Self {
        Self::new(0.0, 0.0, 1)
    }

    /// Sample the measured pose for the current true state
    pub fn measure(&mut self, state: &RigidBodyState) -> PoseMeasurement {
        PoseMeasurement::new(
            state.position + self.noise.gaussian_vector(self.position_noise_std),
            state.attitude + self.noise.gaussian_vector(self.attitude_noise_std),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_seed_replays() {
        let mut a = NoiseSource::new(42);
        let mut b = NoiseSource::new(42);

        for _ in 0..32 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let mut noise = NoiseSource::new(7);
        for _ in 0..1000 {
            let sample = noise.uniform();
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut noise = NoiseSource::new(1234);
        let n = 20_000;

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            let x = noise.gaussian();
            sum += x;
            sum_sq += x * x;
        }

        let mean = sum / n as f64;
        let variance = sum_sq / n as f64 - mean * mean;
        assert!(mean.abs() < 0.05);
        assert!((variance - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_exact_sensor_passes_pose_through() {
        let mut sensor = PoseSensor::exact();
        let state = RigidBodyState::at_rest(Vector3::new(1.0, -2.0, 3.0));

        let measurement = sensor.measure(&state);

        assert_relative_eq!(measurement.position, state.position);
        assert_relative_eq!(measurement.attitude, state.attitude);
    }

    #[test]
    fn test_noisy_sensor_scatters_about_truth() {
        let mut sensor = PoseSensor::new(0.02, 0.005, 99);
        let state = RigidBodyState::at_rest(Vector3::new(1.0, 2.0, 3.0));

        let mut mean = Vector3::zeros();
        let samples = 500;
        for _ in 0..samples {
            mean += sensor.measure(&state).position;
        }
        mean /= samples as f64;

        assert!((mean - state.position).norm() < 0.01);
    }
}
