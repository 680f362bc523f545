//! Synthetic gaze sample helpers.
//!
//! The functions here build deterministic gaze-angle grids, evaluate a
//! ground-truth screen mapping over them, and produce
//! [`CalibrationPoint`] sets for tests. No randomness: noisy variants use
//! a fixed pseudo-noise sequence so tests stay reproducible.

use crate::mapping::PolynomialMapping;
use crate::math::{Pt2, Real};
use crate::types::{CalibrationPoint, EyeCoordinates, GazeVector};

/// A plausible ground-truth gaze-to-screen mapping for a screen of
/// `width` x `height` pixels.
///
/// Mostly affine (screen center at gaze (0, 0)) with small cross terms,
/// so it lies inside the bilinear mapping family and can be recovered
/// exactly from noise-free samples.
pub fn screen_mapping(width: Real, height: Real) -> PolynomialMapping {
    PolynomialMapping {
        x_coeffs: [width / 2.0, width * 1.2, 0.0, 15.0],
        y_coeffs: [height / 2.0, 0.0, height * 1.4, -10.0],
    }
}

/// Generate an `nx * ny` grid of gaze vectors spanning
/// `[-theta_max, theta_max] x [-phi_max, phi_max]`.
///
/// Points are ordered deterministically in row-major order (phi major).
/// Degenerate extents (`nx` or `ny` of 1) collapse to the axis midpoint.
pub fn gaze_grid(nx: usize, ny: usize, theta_max: Real, phi_max: Real) -> Vec<GazeVector> {
    let mut gazes = Vec::with_capacity(nx.saturating_mul(ny));
    for j in 0..ny {
        for i in 0..nx {
            let theta = if nx > 1 {
                -theta_max + 2.0 * theta_max * i as Real / (nx - 1) as Real
            } else {
                0.0
            };
            let phi = if ny > 1 {
                -phi_max + 2.0 * phi_max * j as Real / (ny - 1) as Real
            } else {
                0.0
            };
            gazes.push(GazeVector::new(theta, phi));
        }
    }
    gazes
}

/// Evaluate `truth` over `gazes` and package the result as calibration
/// samples with a fixed eye position.
pub fn samples_from_mapping(
    truth: &PolynomialMapping,
    gazes: &[GazeVector],
) -> Vec<CalibrationPoint> {
    gazes
        .iter()
        .map(|g| {
            let screen = truth.map(g);
            CalibrationPoint::new(*g, EyeCoordinates::new(320.0, 240.0), screen)
                .expect("synthetic samples are finite")
        })
        .collect()
}

/// Perturb the screen coordinates of `points` with a deterministic
/// pseudo-noise sequence of the given `amplitude` (pixels).
pub fn jitter_screen(points: &[CalibrationPoint], amplitude: Real) -> Vec<CalibrationPoint> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let nx = (i as Real * 12.9898).sin() * amplitude;
            let ny = (i as Real * 78.233).cos() * amplitude;
            let screen = Pt2::new(p.screen().x + nx, p.screen().y + ny);
            CalibrationPoint::new(p.gaze(), p.eyes(), screen)
                .expect("jittered samples are finite")
        })
        .collect()
}

/// Collinear gaze samples (all on the line `phi = 0.4·theta`), useful for
/// exercising degenerate-geometry handling.
pub fn collinear_samples(n: usize, truth: &PolynomialMapping) -> Vec<CalibrationPoint> {
    let gazes: Vec<GazeVector> = (0..n)
        .map(|i| {
            let theta = -0.3 + 0.6 * i as Real / (n.max(2) - 1) as Real;
            GazeVector::new(theta, 0.4 * theta)
        })
        .collect();
    samples_from_mapping(truth, &gazes)
}
