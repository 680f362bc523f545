//! Gaze sample value types.
//!
//! A [`CalibrationPoint`] pairs one gaze observation with the known screen
//! target shown to the user while the observation was captured. Points are
//! immutable once constructed and construction validates that every
//! component is finite.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{Pt2, Real};

/// Errors raised when constructing a calibration sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    /// A gaze angle, eye coordinate, or screen coordinate was NaN/infinite.
    #[error("non-finite {field} in calibration sample")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Directional gaze estimate in yaw/pitch angles (radians).
///
/// `theta` is the horizontal angle, `phi` the vertical angle, both relative
/// to the camera axis. Produced per frame by the external gaze predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeVector {
    /// Horizontal gaze angle (radians).
    pub theta: Real,
    /// Vertical gaze angle (radians).
    pub phi: Real,
}

impl GazeVector {
    pub fn new(theta: Real, phi: Real) -> Self {
        Self { theta, phi }
    }

    /// True when both angles are finite.
    pub fn is_finite(&self) -> bool {
        self.theta.is_finite() && self.phi.is_finite()
    }
}

/// Eye position in image space, carried alongside the gaze vector.
///
/// Auxiliary feature for mapping algorithms that model head translation;
/// the default polynomial fitter assumes a static head and does not use it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeCoordinates {
    /// Horizontal eye position (pixels).
    pub x: Real,
    /// Vertical eye position (pixels).
    pub y: Real,
}

impl EyeCoordinates {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One (gaze vector, known screen point) training sample.
///
/// Immutable once created; fields are read through accessors only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    gaze: GazeVector,
    eyes: EyeCoordinates,
    screen: Pt2,
}

impl CalibrationPoint {
    /// Construct a validated calibration sample.
    ///
    /// # Errors
    ///
    /// Returns [`PointError::NonFinite`] if any component is NaN or
    /// infinite. Rejecting a sample is local: the surrounding session
    /// continues.
    pub fn new(gaze: GazeVector, eyes: EyeCoordinates, screen: Pt2) -> Result<Self, PointError> {
        if !gaze.is_finite() {
            return Err(PointError::NonFinite {
                field: "gaze_vector",
            });
        }
        if !eyes.is_finite() {
            return Err(PointError::NonFinite {
                field: "eye_coordinates",
            });
        }
        if !(screen.x.is_finite() && screen.y.is_finite()) {
            return Err(PointError::NonFinite {
                field: "screen_point",
            });
        }
        Ok(Self { gaze, eyes, screen })
    }

    /// The gaze vector (independent variable).
    #[inline]
    pub fn gaze(&self) -> GazeVector {
        self.gaze
    }

    /// The eye coordinates carried with the sample.
    #[inline]
    pub fn eyes(&self) -> EyeCoordinates {
        self.eyes
    }

    /// The known screen target (ground truth).
    #[inline]
    pub fn screen(&self) -> Pt2 {
        self.screen
    }
}
