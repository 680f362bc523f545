//! Calibration session state machine.
//!
//! One session governs one calibration run against one profile:
//!
//! `Collecting → Fitting → Ready` on success, `→ Failed` on fit or
//! quality failure, with `Aborted` reachable from any non-terminal state.
//! Terminal states reject every further operation; retrying requires a
//! new session. Collection is never auto-closed by count — the caller
//! owns the UI flow and signals completion explicitly.
//!
//! Commit discipline: the collected samples are staged onto a clone of
//! the agent's profile and only swapped in when the fit passes the
//! quality gate, so a bad calibration never overwrites a working one.

use log::{debug, info};

use gazecal_core::{CalibrationPoint, EyeCoordinates, GazeVector, ProfileId, Pt2, Real};
use gazecal_fit::fit_mapping;

use crate::agent::CalibrationAgent;
use crate::error::EngineError;

/// Lifecycle state of a calibration session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Accepting samples.
    Collecting,
    /// Fit in progress (transient; fitting is synchronous).
    Fitting,
    /// Terminal success: samples committed, profile fitted.
    Ready,
    /// Terminal failure; the target profile was not modified.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
    /// Terminal external cancellation; collected samples discarded.
    Aborted,
}

impl SessionState {
    /// Short state name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Collecting => "collecting",
            SessionState::Fitting => "fitting",
            SessionState::Ready => "ready",
            SessionState::Failed { .. } => "failed",
            SessionState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Ready | SessionState::Failed { .. } | SessionState::Aborted
        )
    }
}

/// One calibration run: target profile, sample floor, collected samples,
/// and lifecycle state.
///
/// Owned exclusively by the engine for the duration of the run; it does
/// not persist independently — only committed points flow into the
/// profile.
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    profile_id: ProfileId,
    target_point_count: usize,
    collected: Vec<CalibrationPoint>,
    state: SessionState,
}

impl CalibrationSession {
    /// Open a session in `Collecting` with an empty sample buffer.
    pub fn new(profile_id: ProfileId, target_point_count: usize) -> Self {
        Self {
            profile_id,
            target_point_count,
            collected: Vec::new(),
            state: SessionState::Collecting,
        }
    }

    pub fn profile_id(&self) -> &ProfileId {
        &self.profile_id
    }

    pub fn target_point_count(&self) -> usize {
        self.target_point_count
    }

    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Add one sample while collecting.
    ///
    /// # Errors
    ///
    /// - [`EngineError::SessionFinished`] outside `Collecting`.
    /// - [`EngineError::InvalidPoint`] for a malformed sample; the sample
    ///   is rejected and the session keeps collecting.
    pub fn submit(
        &mut self,
        gaze: GazeVector,
        eyes: EyeCoordinates,
        screen: Pt2,
    ) -> Result<(), EngineError> {
        self.ensure_collecting()?;
        let point = CalibrationPoint::new(gaze, eyes, screen)?;
        self.collected.push(point);
        debug!(
            "session '{}': {}/{} samples collected",
            self.profile_id,
            self.collected.len(),
            self.target_point_count
        );
        Ok(())
    }

    /// Close collection, fit, gate on quality, and commit to the agent.
    ///
    /// Returns the fit quality (RMS, screen units) on success. On any
    /// failure past the readiness check the session is terminal `Failed`
    /// and the agent's profile is untouched.
    ///
    /// # Errors
    ///
    /// - [`EngineError::SessionNotReady`] below the sample floor (the
    ///   session stays in `Collecting`).
    /// - [`EngineError::Fit`] / [`EngineError::QualityTooLow`] for a
    ///   failed or rejected fit (terminal).
    pub fn complete(
        &mut self,
        agent: &mut CalibrationAgent,
        max_rms: Real,
    ) -> Result<Real, EngineError> {
        self.ensure_collecting()?;
        if self.collected.len() < self.target_point_count {
            return Err(EngineError::SessionNotReady {
                got: self.collected.len(),
                need: self.target_point_count,
            });
        }

        self.state = SessionState::Fitting;

        // Stage onto a clone; the live profile is only replaced on success.
        let mut staged = agent.profile().clone();
        for point in &self.collected {
            staged.add_point(point.clone());
        }

        let outcome = match fit_mapping(staged.points()) {
            Ok(o) => o,
            Err(e) => {
                self.state = SessionState::Failed {
                    reason: e.to_string(),
                };
                return Err(e.into());
            }
        };

        if outcome.rms_error > max_rms {
            let err = EngineError::QualityTooLow {
                rms: outcome.rms_error,
                max: max_rms,
            };
            self.state = SessionState::Failed {
                reason: err.to_string(),
            };
            return Err(err);
        }

        staged.set_fit(outcome.mapping, outcome.rms_error);
        agent.replace_profile(staged);
        self.state = SessionState::Ready;
        info!(
            "session '{}': calibrated over {} points, rms {:.3}",
            self.profile_id,
            agent.profile().len(),
            outcome.rms_error
        );
        Ok(outcome.rms_error)
    }

    /// Cancel the session, discarding collected samples.
    ///
    /// # Errors
    ///
    /// [`EngineError::SessionFinished`] if the session is already
    /// terminal.
    pub fn abort(&mut self) -> Result<(), EngineError> {
        if self.state.is_terminal() {
            return Err(EngineError::SessionFinished {
                state: self.state.name(),
            });
        }
        self.collected.clear();
        self.state = SessionState::Aborted;
        info!("session '{}': aborted", self.profile_id);
        Ok(())
    }

    fn ensure_collecting(&self) -> Result<(), EngineError> {
        match self.state {
            SessionState::Collecting => Ok(()),
            _ => Err(EngineError::SessionFinished {
                state: self.state.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazecal_core::{synthetic, CalibrationProfile};

    fn fresh_agent() -> CalibrationAgent {
        CalibrationAgent::new(CalibrationProfile::new(ProfileId::from("s")))
    }

    fn submit_grid(session: &mut CalibrationSession, nx: usize, ny: usize) {
        let truth = synthetic::screen_mapping(1920.0, 1080.0);
        for p in
            synthetic::samples_from_mapping(&truth, &synthetic::gaze_grid(nx, ny, 0.35, 0.25))
        {
            session.submit(p.gaze(), p.eyes(), p.screen()).unwrap();
        }
    }

    #[test]
    fn collects_then_completes() {
        let mut session = CalibrationSession::new(ProfileId::from("s"), 9);
        let mut agent = fresh_agent();
        submit_grid(&mut session, 3, 3);
        assert_eq!(session.collected_count(), 9);

        let rms = session.complete(&mut agent, 5.0).unwrap();
        assert!(rms < 1e-6);
        assert_eq!(*session.state(), SessionState::Ready);
        assert!(agent.profile().is_calibrated());
        assert_eq!(agent.profile().len(), 9);
    }

    #[test]
    fn complete_below_floor_stays_collecting() {
        let mut session = CalibrationSession::new(ProfileId::from("s"), 5);
        let mut agent = fresh_agent();
        let truth = synthetic::screen_mapping(1920.0, 1080.0);
        for p in
            synthetic::samples_from_mapping(&truth, &synthetic::gaze_grid(2, 1, 0.3, 0.2))
        {
            session.submit(p.gaze(), p.eyes(), p.screen()).unwrap();
        }

        let err = session.complete(&mut agent, 5.0).unwrap_err();
        assert!(matches!(
            err,
            EngineError::SessionNotReady { got: 2, need: 5 }
        ));
        // Not terminal: more samples may still arrive.
        assert_eq!(*session.state(), SessionState::Collecting);
        assert!(!agent.profile().is_calibrated());
        assert!(agent.profile().is_empty());
    }

    #[test]
    fn degenerate_fit_fails_session_profile_untouched() {
        let mut session = CalibrationSession::new(ProfileId::from("s"), 6);
        let mut agent = fresh_agent();
        let truth = synthetic::screen_mapping(1920.0, 1080.0);
        for p in synthetic::collinear_samples(8, &truth) {
            session.submit(p.gaze(), p.eyes(), p.screen()).unwrap();
        }

        let err = session.complete(&mut agent, 5.0).unwrap_err();
        assert!(matches!(err, EngineError::Fit(_)));
        assert!(matches!(session.state(), SessionState::Failed { .. }));
        assert!(agent.profile().is_empty());

        // Terminal: no re-entry.
        let err = session
            .submit(
                GazeVector::new(0.0, 0.0),
                EyeCoordinates::new(0.0, 0.0),
                Pt2::new(0.0, 0.0),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::SessionFinished { .. }));
    }

    #[test]
    fn quality_gate_rejects_noisy_fit() {
        let mut session = CalibrationSession::new(ProfileId::from("s"), 9);
        let mut agent = fresh_agent();
        let truth = synthetic::screen_mapping(1920.0, 1080.0);
        let clean =
            synthetic::samples_from_mapping(&truth, &synthetic::gaze_grid(4, 4, 0.35, 0.25));
        for p in synthetic::jitter_screen(&clean, 50.0) {
            session.submit(p.gaze(), p.eyes(), p.screen()).unwrap();
        }

        let err = session.complete(&mut agent, 1.0).unwrap_err();
        assert!(matches!(err, EngineError::QualityTooLow { .. }));
        assert!(matches!(session.state(), SessionState::Failed { .. }));
        assert!(!agent.profile().is_calibrated());
    }

    #[test]
    fn failed_session_never_overwrites_working_profile() {
        // Calibrate a good profile first.
        let mut agent = fresh_agent();
        let mut session = CalibrationSession::new(ProfileId::from("s"), 9);
        submit_grid(&mut session, 3, 3);
        session.complete(&mut agent, 5.0).unwrap();
        let good = agent.profile().clone();

        // A second session with degenerate samples fails...
        let mut session = CalibrationSession::new(ProfileId::from("s"), 6);
        let truth = synthetic::screen_mapping(1920.0, 1080.0);
        for p in synthetic::collinear_samples(8, &truth) {
            session.submit(p.gaze(), p.eyes(), p.screen()).unwrap();
        }
        session.complete(&mut agent, 5.0).unwrap_err();

        // ...and the working calibration is exactly as before.
        assert_eq!(*agent.profile(), good);
    }

    #[test]
    fn abort_discards_samples_profile_untouched() {
        let mut session = CalibrationSession::new(ProfileId::from("s"), 9);
        submit_grid(&mut session, 3, 3);
        session.abort().unwrap();

        assert_eq!(*session.state(), SessionState::Aborted);
        assert_eq!(session.collected_count(), 0);

        // Terminal: abort twice is an error.
        let err = session.abort().unwrap_err();
        assert!(matches!(
            err,
            EngineError::SessionFinished { state: "aborted" }
        ));
    }

    #[test]
    fn invalid_sample_rejected_session_continues() {
        let mut session = CalibrationSession::new(ProfileId::from("s"), 5);
        let err = session
            .submit(
                GazeVector::new(f64::NAN, 0.0),
                EyeCoordinates::new(0.0, 0.0),
                Pt2::new(0.0, 0.0),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPoint(_)));
        assert_eq!(*session.state(), SessionState::Collecting);
        assert_eq!(session.collected_count(), 0);

        // A valid sample still goes through.
        session
            .submit(
                GazeVector::new(0.1, 0.1),
                EyeCoordinates::new(0.0, 0.0),
                Pt2::new(10.0, 10.0),
            )
            .unwrap();
        assert_eq!(session.collected_count(), 1);
    }
}
