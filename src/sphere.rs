use crate::math::{Point3, Projector, Rotation};
use crate::vertex::Vertex;
use std::f64::consts::{FRAC_PI_2, PI};

/// Amplitude of the beam's oscillation around the equator, in radians
const BEAM_WOBBLE: f64 = 0.2;
/// Angular frequency of that oscillation relative to the progress
const BEAM_WOBBLE_RATE: f64 = 0.5;

/// Places `count` points approximately evenly on a sphere of `radius`
/// using the golden-angle (Fibonacci) spiral.
pub fn fibonacci_sphere(count: usize, radius: f64) -> Vec<Point3> {
    let offset = 2.0 / count as f64;
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());

    (0..count)
        .map(|i| {
            let i = i as f64;
            let y = i * offset - 1.0 + offset / 2.0;
            // Rounding can push 1 - y^2 slightly below zero at the poles
            let r = (1.0 - y * y).max(0.0).sqrt();
            let phi = i * golden_angle;
            Point3::new(phi.cos() * r * radius, y * radius, phi.sin() * r * radius)
        })
        .collect()
}

/// The wavy equatorial path followed by the beam
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamPath {
    pub radius: f64,
}

impl BeamPath {
    pub fn new(radius: f64) -> Self {
        BeamPath { radius }
    }

    /// Point on the sphere surface for a given progress value
    pub fn point_at(&self, progress: f64) -> Point3 {
        let phi = progress;
        let theta = FRAC_PI_2 + BEAM_WOBBLE * (progress * BEAM_WOBBLE_RATE).sin();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Point3::new(
            self.radius * sin_theta * cos_phi,
            self.radius * sin_theta * sin_phi,
            self.radius * cos_theta,
        )
    }
}

/// One sample of the beam's trail, head first
#[derive(Clone, Copy, Debug)]
pub struct TrailSample {
    pub vertex: Vertex,
    /// Fade weight in [0, 1]; 1 at the head, 0 at the tail
    pub alpha: f64,
}

/// Samples the beam path behind its head
#[derive(Clone, Copy, Debug)]
pub struct TrailSampler {
    pub path: BeamPath,
    /// Progress distance between consecutive samples
    pub beam_delta: f64,
}

impl TrailSampler {
    pub fn new(path: BeamPath, beam_delta: f64) -> Self {
        TrailSampler { path, beam_delta }
    }

    /// Fade weight of sample `index` in a trail of `trail_length`
    pub fn alpha(index: usize, trail_length: usize) -> f64 {
        if trail_length == 0 {
            return 1.0;
        }
        (1.0 - index as f64 / trail_length as f64).max(0.0)
    }

    /// Produces `trail_length + 1` rotated and projected samples
    pub fn sample(
        &self,
        progress: f64,
        trail_length: usize,
        rotation: &Rotation,
        projector: &Projector,
    ) -> Vec<TrailSample> {
        (0..=trail_length)
            .map(|i| {
                let t = progress - i as f64 * self.beam_delta;
                let rotated = rotation.apply(self.path.point_at(t));
                TrailSample {
                    vertex: Vertex::project(rotated, projector),
                    alpha: Self::alpha(i, trail_length),
                }
            })
            .collect()
    }
}
