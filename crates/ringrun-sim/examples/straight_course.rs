//! Three drones through a straight four-ring course.
//!
//! Run with: cargo run --example straight_course

use nalgebra::Vector3;

use ringrun_sim::{EpisodeRunner, RingCourse, SimConfig};

fn main() {
    let course = RingCourse::straight_line(4, 4.0, 2.0);
    let starts = [
        Vector3::new(0.0, 0.0, 0.3),
        Vector3::new(-1.0, 1.0, 0.3),
        Vector3::new(-1.0, -1.0, 0.3),
    ];

    let mut config = SimConfig::default();
    config.max_ticks = 12_000; // two minutes

    let mut runner = match EpisodeRunner::new(config, course, &starts) {
        Ok(runner) => runner,
        Err(error) => {
            eprintln!("setup failed: {error}");
            return;
        }
    };

    match runner.run() {
        Ok(summary) => {
            println!(
                "episode over after {:.1} s",
                summary.ticks as f64 * 0.01
            );
            for (i, (&passed, &done)) in summary
                .rings_passed
                .iter()
                .zip(summary.completed.iter())
                .enumerate()
            {
                println!(
                    "  drone {i}: {passed} ring(s) passed{}",
                    if done { ", course complete" } else { "" }
                );
            }
        }
        Err(error) => eprintln!("episode failed: {error}"),
    }
}
