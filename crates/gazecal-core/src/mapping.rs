//! Polynomial gaze-to-screen mapping.
//!
//! The mapping family is a bilinear polynomial per screen axis over the
//! gaze angles:
//!
//! `screen_x = c0 + c1·θ + c2·φ + c3·θφ` (same for y)
//!
//! With exactly [`NUM_TERMS`] well-spread calibration points (the classic
//! four-corner calibration pattern) the square system interpolates them
//! near-exactly; with more points the fitter performs least-squares
//! smoothing. Evaluation never fails: gaze vectors outside the calibrated
//! region extrapolate along the polynomial.

use serde::{Deserialize, Serialize};

use crate::math::{Pt2, Real};
use crate::types::GazeVector;

/// Number of polynomial terms per screen axis.
pub const NUM_TERMS: usize = 4;

/// Bilinear feature basis for a gaze vector.
///
/// Order: `[1, θ, φ, θφ]`.
#[inline]
pub fn gaze_features(gaze: &GazeVector) -> [Real; NUM_TERMS] {
    let t = gaze.theta;
    let p = gaze.phi;
    [1.0, t, p, t * p]
}

/// A fitted gaze-to-screen mapping (two bilinear polynomials).
///
/// Produced by the fitter in `gazecal-fit` and cached on a
/// [`CalibrationProfile`](crate::CalibrationProfile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialMapping {
    /// Coefficients for the screen x axis.
    pub x_coeffs: [Real; NUM_TERMS],
    /// Coefficients for the screen y axis.
    pub y_coeffs: [Real; NUM_TERMS],
}

impl PolynomialMapping {
    /// Evaluate the mapping for a gaze vector.
    ///
    /// Always returns a point; accuracy degrades outside the convex hull
    /// of the calibration points but the call never fails.
    pub fn map(&self, gaze: &GazeVector) -> Pt2 {
        let f = gaze_features(gaze);
        let mut x = 0.0;
        let mut y = 0.0;
        for i in 0..NUM_TERMS {
            x += self.x_coeffs[i] * f[i];
            y += self.y_coeffs[i] * f[i];
        }
        Pt2::new(x, y)
    }
}
