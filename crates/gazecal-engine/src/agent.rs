//! Calibration agent: one profile plus the fitting algorithm.
//!
//! The agent confines all side effects to its owned
//! [`CalibrationProfile`]; persistence is the engine's concern. Refitting
//! is explicit (`fit`), never triggered by `record`, so multi-point
//! sessions don't pay O(n) solves per sample.

use log::debug;

use gazecal_core::{
    CalibrationPoint, CalibrationProfile, EyeCoordinates, GazeVector, Pt2, Real,
};
use gazecal_fit::fit_mapping;

use crate::error::EngineError;

/// Owns a [`CalibrationProfile`] and exposes record / fit / predict.
#[derive(Debug, Clone)]
pub struct CalibrationAgent {
    profile: CalibrationProfile,
}

impl CalibrationAgent {
    pub fn new(profile: CalibrationProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Swap in a new profile (e.g. on profile switch or session commit).
    pub fn replace_profile(&mut self, profile: CalibrationProfile) -> CalibrationProfile {
        std::mem::replace(&mut self.profile, profile)
    }

    /// Validate and append one calibration sample.
    ///
    /// Invalidates any cached fit on the profile. Does not refit.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidPoint`] for non-finite samples; the sample is
    /// dropped and the profile is unchanged.
    pub fn record(
        &mut self,
        gaze: GazeVector,
        eyes: EyeCoordinates,
        screen: Pt2,
    ) -> Result<(), EngineError> {
        let point = CalibrationPoint::new(gaze, eyes, screen)?;
        self.profile.add_point(point);
        Ok(())
    }

    /// Fit the mapping over the profile's current points and cache it.
    ///
    /// On failure the profile's previously cached fit (if any) is left
    /// untouched and the fitter's error is propagated.
    pub fn fit(&mut self) -> Result<Real, EngineError> {
        let outcome = fit_mapping(self.profile.points())?;
        debug!(
            "fitted profile '{}' over {} points, rms {:.3}",
            self.profile.profile_id(),
            self.profile.len(),
            outcome.rms_error
        );
        self.profile.set_fit(outcome.mapping, outcome.rms_error);
        Ok(outcome.rms_error)
    }

    /// Apply the cached mapping to a gaze vector.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotCalibrated`] when no fit is cached.
    pub fn predict(&self, gaze: &GazeVector) -> Result<Pt2, EngineError> {
        let mapping = self
            .profile
            .fitted_mapping()
            .ok_or_else(|| EngineError::NotCalibrated(self.profile.profile_id().clone()))?;
        Ok(mapping.map(gaze))
    }
}
