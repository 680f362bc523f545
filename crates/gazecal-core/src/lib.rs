//! Core data model and math primitives for `gazecal-rs`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec2`, `Pt2`),
//! - the calibration data model ([`CalibrationPoint`], [`CalibrationProfile`]),
//! - the polynomial screen mapping applied at runtime ([`PolynomialMapping`]),
//! - synthetic sample generators for tests ([`synthetic`]).
//!
//! Estimation lives in `gazecal-fit`; this crate only knows how to *hold*
//! calibration data and *evaluate* a fitted mapping:
//! `screen = mapping(features(gaze))`

/// Linear algebra type aliases and helpers.
pub mod math;
/// Polynomial gaze-to-screen mapping and its feature basis.
pub mod mapping;
/// Calibration profile: owned point collection plus cached fit.
pub mod profile;
/// Synthetic gaze/screen sample generators.
pub mod synthetic;
/// Gaze sample value types and validation.
pub mod types;

pub use mapping::{gaze_features, PolynomialMapping, NUM_TERMS};
pub use math::*;
pub use profile::{CalibrationProfile, ProfileId};
pub use types::{CalibrationPoint, EyeCoordinates, GazeVector, PointError};
