//! Per-frame tracking orchestrator.
//!
//! Composes the external gaze predictor with the active profile's fitted
//! mapping, and routes calibration requests to the session state machine.
//! One engine instance holds one active profile and at most one active
//! calibration session; mutating operations take `&mut self`, so fitting
//! is exclusive with sample recording and prediction by construction.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use gazecal_core::{
    CalibrationProfile, EyeCoordinates, GazeVector, ProfileId, Pt2, Real,
};
use gazecal_fit::MIN_POINTS;

use crate::agent::CalibrationAgent;
use crate::error::{EngineError, PredictError};
use crate::predictor::GazePredictor;
use crate::session::CalibrationSession;
use crate::store::{ProfileStore, StoreError};

/// Engine tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum acceptable fit quality (RMS residual, screen units) for a
    /// calibration session to be declared ready.
    pub max_rms: Real,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_rms: 80.0 }
    }
}

/// Top-level vision tracking engine.
///
/// Generic over the gaze predictor and the profile persistence
/// collaborator; both are injected at construction.
pub struct VisionTrackingEngine<G: GazePredictor, S: ProfileStore> {
    predictor: G,
    store: S,
    config: EngineConfig,
    agent: CalibrationAgent,
    session: Option<CalibrationSession>,
}

impl<G: GazePredictor, S: ProfileStore> VisionTrackingEngine<G, S> {
    /// Create an engine with `profile_id` active, loading it from the
    /// store or starting empty when the store has never seen it.
    pub fn new(
        predictor: G,
        store: S,
        profile_id: ProfileId,
        config: EngineConfig,
    ) -> Result<Self, StoreError> {
        let profile = load_or_create(&store, profile_id)?;
        Ok(Self {
            predictor,
            store,
            config,
            agent: CalibrationAgent::new(profile),
            session: None,
        })
    }

    /// The active profile.
    pub fn active_profile(&self) -> &CalibrationProfile {
        self.agent.profile()
    }

    /// True when the active profile has a usable fitted mapping.
    pub fn is_calibrated(&self) -> bool {
        self.agent.profile().is_calibrated()
    }

    /// State of the active calibration session, if one is open.
    pub fn session(&self) -> Option<&CalibrationSession> {
        self.session.as_ref()
    }

    // ------------------------------------------------------------------
    // Per-frame tracking
    // ------------------------------------------------------------------

    /// Estimate the point of regard for one camera frame.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Predict`] when the predictor fails on the frame
    ///   (`NoFaceDetected` is per-frame: skip and retry with the next one).
    /// - [`EngineError::NotCalibrated`] when the active profile has no
    ///   fitted mapping; the caller should start a calibration session.
    pub fn track(&self, frame: &G::Frame) -> Result<Pt2, EngineError> {
        let sample = self.predictor.predict(frame)?;
        self.agent.predict(&sample.gaze)
    }

    // ------------------------------------------------------------------
    // Calibration session lifecycle
    // ------------------------------------------------------------------

    /// Open a calibration session for `profile_id`.
    ///
    /// Loads the profile from the store (or creates an empty one) and
    /// makes it active. `target_point_count` below the fitter's floor is
    /// raised to [`MIN_POINTS`].
    ///
    /// # Errors
    ///
    /// [`EngineError::SessionActive`] if a session is already open;
    /// [`EngineError::Store`] if the load fails for a reason other than
    /// the profile not existing yet.
    pub fn begin_calibration(
        &mut self,
        profile_id: ProfileId,
        target_point_count: usize,
    ) -> Result<(), EngineError> {
        if let Some(session) = &self.session {
            return Err(EngineError::SessionActive(session.profile_id().clone()));
        }

        if self.agent.profile().profile_id() != &profile_id {
            let profile = load_or_create(&self.store, profile_id.clone())?;
            self.agent.replace_profile(profile);
        }

        let target = target_point_count.max(MIN_POINTS);
        if target != target_point_count {
            warn!(
                "target point count {} below fitter floor, raised to {}",
                target_point_count, target
            );
        }
        info!(
            "calibration session opened for '{}' (target {} points)",
            profile_id, target
        );
        self.session = Some(CalibrationSession::new(profile_id, target));
        Ok(())
    }

    /// Run the predictor on `frame` and record the result against the
    /// known on-screen target.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveSession`] without an open session;
    /// predictor and sample-validation errors otherwise. A failed frame
    /// leaves the session collecting.
    pub fn submit_sample(&mut self, frame: &G::Frame, target: Pt2) -> Result<(), EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoActiveSession)?;
        let sample = self.predictor.predict(frame)?;
        session.submit(sample.gaze, sample.eyes, target)
    }

    /// Record an already-extracted gaze observation against a target.
    pub fn submit_calibration_point(
        &mut self,
        gaze: GazeVector,
        eyes: EyeCoordinates,
        screen: Pt2,
    ) -> Result<(), EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoActiveSession)?;
        session.submit(gaze, eyes, screen)
    }

    /// Record a batch of (frame, target) pairs, skipping frames where no
    /// face was detected.
    ///
    /// Returns the number of samples accepted. Any error other than
    /// [`PredictError::NoFaceDetected`] aborts the batch and propagates.
    pub fn run_calibration_samples<I>(&mut self, samples: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = (G::Frame, Pt2)>,
    {
        let mut accepted = 0;
        for (frame, target) in samples {
            match self.submit_sample(&frame, target) {
                Ok(()) => accepted += 1,
                Err(EngineError::Predict(PredictError::NoFaceDetected)) => {
                    warn!("skipping calibration frame: no face detected");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(accepted)
    }

    /// Close collection, fit, and commit the calibration.
    ///
    /// On success the updated profile is persisted and the fit quality is
    /// returned. A failed save is propagated, never dropped.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NoActiveSession`] without an open session.
    /// - [`EngineError::SessionNotReady`] below the sample floor; the
    ///   session stays open and keeps collecting.
    /// - Fit/quality errors close the session as failed; the profile and
    ///   its stored state are untouched.
    pub fn complete_calibration(&mut self) -> Result<Real, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoActiveSession)?;
        let result = session.complete(&mut self.agent, self.config.max_rms);

        // SessionNotReady leaves the session collecting; every other
        // outcome is terminal and the session object is discarded.
        if session.state().is_terminal() {
            self.session = None;
        }

        let rms = result?;
        self.store.save(self.agent.profile())?;
        Ok(rms)
    }

    /// Cancel the active session, discarding its samples.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveSession`] without an open session.
    pub fn abort_calibration(&mut self) -> Result<(), EngineError> {
        let mut session = self.session.take().ok_or(EngineError::NoActiveSession)?;
        session.abort()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Profile management pass-throughs
    // ------------------------------------------------------------------

    /// Make `profile_id` the active profile, loading it from the store or
    /// starting empty.
    ///
    /// # Errors
    ///
    /// [`EngineError::SessionActive`] while a calibration session is
    /// open.
    pub fn switch_profile(&mut self, profile_id: ProfileId) -> Result<(), EngineError> {
        if let Some(session) = &self.session {
            return Err(EngineError::SessionActive(session.profile_id().clone()));
        }
        let profile = load_or_create(&self.store, profile_id)?;
        info!("switched active profile to '{}'", profile.profile_id());
        self.agent.replace_profile(profile);
        Ok(())
    }

    /// Persist the active profile.
    pub fn save_profile(&mut self) -> Result<(), EngineError> {
        self.store.save(self.agent.profile())?;
        Ok(())
    }

    /// Delete a stored profile. The active in-memory profile is not
    /// affected.
    pub fn delete_profile(&mut self, profile_id: &ProfileId) -> Result<(), EngineError> {
        self.store.delete(profile_id)?;
        Ok(())
    }

    /// List stored profile ids.
    pub fn list_profiles(&self) -> Result<Vec<ProfileId>, EngineError> {
        Ok(self.store.list()?)
    }
}

fn load_or_create<S: ProfileStore>(
    store: &S,
    profile_id: ProfileId,
) -> Result<CalibrationProfile, StoreError> {
    match store.load(&profile_id) {
        Ok(profile) => Ok(profile),
        Err(StoreError::NotFound(_)) => Ok(CalibrationProfile::new(profile_id)),
        Err(e) => Err(e),
    }
}
