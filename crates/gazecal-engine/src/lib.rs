//! Calibration agent, session state machine, and tracking engine for
//! `gazecal-rs`.
//!
//! The [`VisionTrackingEngine`] is the top-level orchestrator: it feeds
//! camera frames through an injected [`GazePredictor`], applies the
//! active profile's fitted mapping, and routes calibration requests
//! through the [`CalibrationSession`] state machine. Profiles persist via
//! the [`ProfileStore`] contract.

/// Calibration agent wrapping one profile and the fitter.
pub mod agent;
/// Tracking engine orchestrator.
pub mod engine;
/// Typed error taxonomy.
pub mod error;
/// Gaze predictor boundary trait.
pub mod predictor;
/// Calibration session state machine.
pub mod session;
/// Profile persistence boundary and reference stores.
pub mod store;

pub use agent::CalibrationAgent;
pub use engine::{EngineConfig, VisionTrackingEngine};
pub use error::{EngineError, PredictError};
pub use predictor::{GazePredictor, GazeSample};
pub use session::{CalibrationSession, SessionState};
pub use store::{JsonFileStore, MemoryStore, ProfileStore, StoreError};
