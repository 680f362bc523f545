//! High-level entry crate for the `gazecal-rs` toolbox.
//!
//! Estimates the point of regard on a screen from per-frame gaze vectors,
//! using per-user calibration profiles fitted by least squares.
//!
//! ## Typical flow
//!
//! ```no_run
//! use gazecal::engine::{EngineConfig, VisionTrackingEngine, MemoryStore};
//! use gazecal::core::{ProfileId, Pt2};
//! # use gazecal::engine::{GazePredictor, GazeSample, PredictError};
//! # struct CameraModel;
//! # impl GazePredictor for CameraModel {
//! #     type Frame = Vec<u8>;
//! #     fn predict(&self, _: &Vec<u8>) -> Result<GazeSample, PredictError> { unimplemented!() }
//! # }
//! # fn next_frame() -> Vec<u8> { Vec::new() }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = VisionTrackingEngine::new(
//!     CameraModel,
//!     MemoryStore::new(),
//!     ProfileId::from("alice"),
//!     EngineConfig::default(),
//! )?;
//!
//! // Calibration: show targets, capture frames, commit.
//! engine.begin_calibration(ProfileId::from("alice"), 9)?;
//! engine.submit_sample(&next_frame(), Pt2::new(960.0, 540.0))?;
//! // ... more targets ...
//! let rms = engine.complete_calibration()?;
//! println!("calibrated, rms {rms:.2}px");
//!
//! // Runtime: one point of regard per frame.
//! let gaze_point = engine.track(&next_frame())?;
//! println!("looking at ({:.0}, {:.0})", gaze_point.x, gaze_point.y);
//! # Ok(())
//! # }
//! ```
//!
//! Crates: [`core`] holds the data model, [`fit`] the least-squares
//! mapping fitter, [`engine`] the agent/session/engine stack.

/// Data model and math primitives.
pub use gazecal_core as core;
/// Agent, session state machine, tracking engine, stores.
pub use gazecal_engine as engine;
/// Least-squares mapping fitter.
pub use gazecal_fit as fit;

pub use gazecal_core::{
    CalibrationPoint, CalibrationProfile, EyeCoordinates, GazeVector, PolynomialMapping,
    ProfileId, Pt2, Real,
};
pub use gazecal_engine::{
    CalibrationAgent, CalibrationSession, EngineConfig, EngineError, GazePredictor, GazeSample,
    JsonFileStore, MemoryStore, PredictError, ProfileStore, SessionState, StoreError,
    VisionTrackingEngine,
};
pub use gazecal_fit::{fit_mapping, FitError, FitOutcome, MIN_POINTS};
