//! Mapping fitter for `gazecal-rs`.
//!
//! Fits the bilinear [`PolynomialMapping`](gazecal_core::PolynomialMapping)
//! from a set of calibration points by linear least squares (SVD). See
//! [`fit_mapping`] for the contract: exact interpolation at the
//! [`MIN_POINTS`] floor, smoothing above it, typed failures for
//! under-determined or rank-deficient geometry.

pub mod polynomial;

pub use polynomial::{fit_mapping, FitError, FitOutcome, MIN_POINTS};
