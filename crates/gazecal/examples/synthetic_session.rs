//! Full calibration session on synthetic gaze data.
//!
//! This example demonstrates the engine workflow:
//! 1. Generate a ground-truth gaze-to-screen mapping
//! 2. Run a 9-target calibration session through the engine
//! 3. Track held-out gaze directions and compare with ground truth
//! 4. Abort a second session and show the profile is untouched
//!
//! Run with: `cargo run -p gazecal --example synthetic_session`

use gazecal::core::synthetic;
use gazecal::{
    EngineConfig, EngineError, GazePredictor, GazeSample, GazeVector, MemoryStore, PredictError,
    ProfileId, VisionTrackingEngine,
};

/// Stand-in for the external neural model: the "frame" already carries
/// the gaze observation.
struct OracleModel;

impl GazePredictor for OracleModel {
    type Frame = GazeSample;

    fn predict(&self, frame: &GazeSample) -> Result<GazeSample, PredictError> {
        Ok(*frame)
    }
}

fn main() -> Result<(), EngineError> {
    env_logger::init();
    println!("=== Gaze Calibration Session (Synthetic) ===\n");

    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let targets = synthetic::gaze_grid(3, 3, 0.3, 0.2);

    let mut engine = VisionTrackingEngine::new(
        OracleModel,
        MemoryStore::new(),
        ProfileId::from("demo"),
        EngineConfig::default(),
    )?;

    // Uncalibrated tracking fails with a typed error.
    let probe = GazeSample {
        gaze: GazeVector::new(0.0, 0.0),
        eyes: gazecal::EyeCoordinates::new(320.0, 240.0),
    };
    match engine.track(&probe) {
        Err(EngineError::NotCalibrated(id)) => {
            println!("profile '{id}' not calibrated yet, starting session")
        }
        other => panic!("unexpected: {other:?}"),
    }

    // Collect one sample per on-screen target.
    engine.begin_calibration(ProfileId::from("demo"), targets.len())?;
    for point in synthetic::samples_from_mapping(&truth, &targets) {
        let frame = GazeSample {
            gaze: point.gaze(),
            eyes: point.eyes(),
        };
        engine.submit_sample(&frame, point.screen())?;
    }
    let rms = engine.complete_calibration()?;
    println!(
        "calibrated over {} points, rms {:.3}px\n",
        engine.active_profile().len(),
        rms
    );

    // Track held-out gaze directions.
    println!("tracking held-out gaze directions:");
    for gaze in synthetic::gaze_grid(2, 2, 0.25, 0.15) {
        let frame = GazeSample {
            gaze,
            eyes: gazecal::EyeCoordinates::new(320.0, 240.0),
        };
        let est = engine.track(&frame)?;
        let expect = truth.map(&gaze);
        println!(
            "  gaze ({:+.2}, {:+.2}) -> ({:7.1}, {:6.1})  truth ({:7.1}, {:6.1})",
            gaze.theta, gaze.phi, est.x, est.y, expect.x, expect.y
        );
    }

    // An aborted session leaves the working calibration alone.
    engine.begin_calibration(ProfileId::from("demo"), 9)?;
    engine.abort_calibration()?;
    assert!(engine.is_calibrated());
    println!("\naborted second session; profile still calibrated");

    Ok(())
}
