//! Gaze predictor boundary.
//!
//! The neural gaze model is an external collaborator: the engine only
//! needs "frame in, gaze vector + eye coordinates out" with one defined
//! failure mode for frames without a detectable face.

use gazecal_core::{EyeCoordinates, GazeVector};

use crate::error::PredictError;

/// One per-frame gaze observation from the external model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeSample {
    /// Estimated gaze direction.
    pub gaze: GazeVector,
    /// Eye position in image space.
    pub eyes: EyeCoordinates,
}

/// Capability interface over the external gaze model.
///
/// `Frame` is whatever image representation the concrete model consumes;
/// the engine never inspects it.
pub trait GazePredictor {
    type Frame;

    /// Estimate the gaze direction and eye coordinates for one frame.
    ///
    /// # Errors
    ///
    /// [`PredictError::NoFaceDetected`] when no face/eyes are found;
    /// [`PredictError::Backend`] for model failures.
    fn predict(&self, frame: &Self::Frame) -> Result<GazeSample, PredictError>;
}
