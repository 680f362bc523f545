//! Least-squares fit of the bilinear gaze-to-screen mapping.

use nalgebra::DMatrix;
use thiserror::Error;

use gazecal_core::{gaze_features, CalibrationPoint, PolynomialMapping, Real, NUM_TERMS};

/// Minimum number of calibration points required to attempt a fit.
///
/// Equals the degrees of freedom of the bilinear mapping per axis: with
/// exactly this many well-spread points (e.g. the four screen corners)
/// the system is square and the mapping interpolates them near-exactly;
/// with more points the solve is least squares and smooths measurement
/// noise.
pub const MIN_POINTS: usize = NUM_TERMS;

/// Singular-value ratio below which the design matrix is treated as
/// rank-deficient (e.g. collinear gaze angles).
const RANK_TOLERANCE: Real = 1e-9;

/// Errors raised by [`fit_mapping`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Fewer points than the mapping family's degrees of freedom.
    #[error("need at least {need} calibration points, got {got}")]
    InsufficientPoints { got: usize, need: usize },
    /// Calibration points are collinear or otherwise rank-deficient for
    /// the bilinear family; a fit would extrapolate unboundedly.
    #[error("calibration geometry is rank-deficient (condition ratio {condition:.3e})")]
    DegenerateGeometry { condition: Real },
    /// The SVD backend failed to produce a solution.
    #[error("svd solve failed")]
    SolveFailed,
}

/// A fitted mapping paired with its quality estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    /// The fitted gaze-to-screen mapping.
    pub mapping: PolynomialMapping,
    /// RMS residual over the training points (screen units). Zero for an
    /// exact interpolation, growing with point scatter and noise.
    pub rms_error: Real,
}

/// Fit the bilinear mapping to `points` by linear least squares.
///
/// The fit is deterministic and order-independent: points are canonically
/// sorted before the system is assembled, so any permutation of the same
/// point set yields an identical mapping and score.
///
/// # Errors
///
/// - [`FitError::InsufficientPoints`] when `points.len() < MIN_POINTS`.
/// - [`FitError::DegenerateGeometry`] when the design matrix is
///   rank-deficient for the bilinear family.
/// - [`FitError::SolveFailed`] if the SVD backend fails.
pub fn fit_mapping(points: &[CalibrationPoint]) -> Result<FitOutcome, FitError> {
    if points.len() < MIN_POINTS {
        return Err(FitError::InsufficientPoints {
            got: points.len(),
            need: MIN_POINTS,
        });
    }

    // Canonical order makes the design matrix identical for permutations
    // of the same point set, so the fit is bitwise reproducible.
    let mut ordered: Vec<&CalibrationPoint> = points.iter().collect();
    ordered.sort_by(|a, b| {
        a.gaze()
            .theta
            .total_cmp(&b.gaze().theta)
            .then(a.gaze().phi.total_cmp(&b.gaze().phi))
            .then(a.screen().x.total_cmp(&b.screen().x))
            .then(a.screen().y.total_cmp(&b.screen().y))
    });

    let n = ordered.len();
    let mut a = DMatrix::<Real>::zeros(n, NUM_TERMS);
    let mut b = DMatrix::<Real>::zeros(n, 2);
    for (row, p) in ordered.iter().enumerate() {
        let f = gaze_features(&p.gaze());
        for (col, v) in f.iter().enumerate() {
            a[(row, col)] = *v;
        }
        b[(row, 0)] = p.screen().x;
        b[(row, 1)] = p.screen().y;
    }

    let svd = a.svd(true, true);

    let sv_max = svd.singular_values[0];
    let sv_min = svd.singular_values[NUM_TERMS - 1];
    let condition = if sv_max > 0.0 { sv_min / sv_max } else { 0.0 };
    if condition < RANK_TOLERANCE {
        return Err(FitError::DegenerateGeometry { condition });
    }

    let coeffs = svd.solve(&b, 0.0).map_err(|_| FitError::SolveFailed)?;

    let mut x_coeffs = [0.0; NUM_TERMS];
    let mut y_coeffs = [0.0; NUM_TERMS];
    for i in 0..NUM_TERMS {
        x_coeffs[i] = coeffs[(i, 0)];
        y_coeffs[i] = coeffs[(i, 1)];
    }
    let mapping = PolynomialMapping { x_coeffs, y_coeffs };

    // Accumulate residuals in canonical order as well, so the score is
    // bitwise identical under permutation of the input.
    let rms_error = rms_residual(&mapping, &ordered);

    Ok(FitOutcome { mapping, rms_error })
}

/// RMS distance between the mapped gaze vectors and their known screen
/// targets.
fn rms_residual(mapping: &PolynomialMapping, points: &[&CalibrationPoint]) -> Real {
    let sum_sq: Real = points
        .iter()
        .map(|p| {
            let est = mapping.map(&p.gaze());
            let dx = est.x - p.screen().x;
            let dy = est.y - p.screen().y;
            dx * dx + dy * dy
        })
        .sum();
    (sum_sq / points.len() as Real).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazecal_core::synthetic;
    use gazecal_core::{EyeCoordinates, GazeVector, Pt2};

    #[test]
    fn fewer_than_min_points_rejected() {
        let truth = synthetic::screen_mapping(1920.0, 1080.0);
        let points =
            synthetic::samples_from_mapping(&truth, &synthetic::gaze_grid(3, 1, 0.3, 0.2));
        let err = fit_mapping(&points).unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientPoints {
                got: 3,
                need: MIN_POINTS
            }
        );
    }

    #[test]
    fn empty_input_rejected() {
        let err = fit_mapping(&[]).unwrap_err();
        assert!(matches!(err, FitError::InsufficientPoints { got: 0, .. }));
    }

    #[test]
    fn collinear_points_degenerate() {
        let truth = synthetic::screen_mapping(1920.0, 1080.0);
        let points = synthetic::collinear_samples(8, &truth);
        let err = fit_mapping(&points).unwrap_err();
        assert!(matches!(err, FitError::DegenerateGeometry { .. }));
    }

    #[test]
    fn repeated_single_point_degenerate() {
        let p = CalibrationPoint::new(
            GazeVector::new(0.1, 0.1),
            EyeCoordinates::new(0.0, 0.0),
            Pt2::new(100.0, 100.0),
        )
        .unwrap();
        let points = vec![p; MIN_POINTS];
        let err = fit_mapping(&points).unwrap_err();
        assert!(matches!(err, FitError::DegenerateGeometry { .. }));
    }
}
