//! Error taxonomy for the tracking engine.
//!
//! Every failure is a typed signal: sample-local errors leave the session
//! running, fit-level errors terminate the session without touching the
//! profile, and frame-level errors are explicitly skippable only in the
//! batch calibration helper.

use thiserror::Error;

use gazecal_core::{PointError, ProfileId, Real};
use gazecal_fit::FitError;

use crate::store::StoreError;

/// Failure modes of the gaze predictor boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// No face or eyes were found in the frame. Per-frame and skippable.
    #[error("no face or eyes detected in frame")]
    NoFaceDetected,
    /// The underlying model backend failed.
    #[error("gaze predictor backend failed: {0}")]
    Backend(String),
}

/// Errors surfaced by the engine, agent, and session operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Tracking was attempted with no usable fitted mapping.
    #[error("profile '{0}' has no fitted calibration mapping")]
    NotCalibrated(ProfileId),

    /// `complete_calibration` was called before enough samples were
    /// collected. The session stays in `Collecting`.
    #[error("session needs {need} samples before completion, got {got}")]
    SessionNotReady { got: usize, need: usize },

    /// A session operation was invoked with no active session.
    #[error("no active calibration session")]
    NoActiveSession,

    /// A second session was requested while one is active.
    #[error("a calibration session is already active for profile '{0}'")]
    SessionActive(ProfileId),

    /// A terminal session received a further operation.
    #[error("calibration session already finished ({state})")]
    SessionFinished { state: &'static str },

    /// The fit succeeded numerically but its residual exceeds the
    /// configured acceptance threshold.
    #[error("fit quality {rms:.3} exceeds acceptable threshold {max:.3}")]
    QualityTooLow { rms: Real, max: Real },

    /// A malformed sample was rejected.
    #[error(transparent)]
    InvalidPoint(#[from] PointError),

    /// The mapping fitter failed.
    #[error(transparent)]
    Fit(#[from] FitError),

    /// The gaze predictor failed on a frame.
    #[error(transparent)]
    Predict(#[from] PredictError),

    /// The persistence collaborator failed. Never silently dropped.
    #[error(transparent)]
    Store(#[from] StoreError),
}
