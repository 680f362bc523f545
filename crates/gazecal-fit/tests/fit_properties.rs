//! Fitter contract tests: interpolation at the point floor, smoothing
//! above it, order independence, degenerate-geometry rejection.

use approx::assert_relative_eq;
use gazecal_fit::{fit_mapping, FitError, MIN_POINTS};

use gazecal_core::synthetic;
use gazecal_core::{CalibrationPoint, EyeCoordinates, GazeVector, Real};

/// Four gaze directions toward the screen corners, the minimum for the
/// bilinear family.
fn minimal_gazes() -> Vec<GazeVector> {
    vec![
        GazeVector::new(-0.3, -0.2),
        GazeVector::new(0.3, -0.2),
        GazeVector::new(-0.3, 0.2),
        GazeVector::new(0.3, 0.2),
    ]
}

#[test]
fn minimal_point_set_interpolates_exactly() {
    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let points = synthetic::samples_from_mapping(&truth, &minimal_gazes());
    assert_eq!(points.len(), MIN_POINTS);

    let outcome = fit_mapping(&points).expect("square system should fit");
    for p in &points {
        let est = outcome.mapping.map(&p.gaze());
        assert_relative_eq!(est.x, p.screen().x, epsilon = 1e-6);
        assert_relative_eq!(est.y, p.screen().y, epsilon = 1e-6);
    }
    assert!(outcome.rms_error < 1e-6);
}

#[test]
fn noise_free_grid_recovers_truth() {
    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let gazes = synthetic::gaze_grid(4, 4, 0.35, 0.25);
    let points = synthetic::samples_from_mapping(&truth, &gazes);

    let outcome = fit_mapping(&points).unwrap();
    assert!(outcome.rms_error < 1e-6);

    // Held-out gaze directions map to the ground-truth screen points.
    for g in synthetic::gaze_grid(3, 3, 0.3, 0.2) {
        let est = outcome.mapping.map(&g);
        let expect = truth.map(&g);
        assert_relative_eq!(est.x, expect.x, epsilon = 1e-5);
        assert_relative_eq!(est.y, expect.y, epsilon = 1e-5);
    }
}

#[test]
fn overdetermined_fit_smooths_noise() {
    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let gazes = synthetic::gaze_grid(5, 5, 0.35, 0.25);
    let clean = synthetic::samples_from_mapping(&truth, &gazes);
    let noisy = synthetic::jitter_screen(&clean, 3.0);

    let outcome = fit_mapping(&noisy).unwrap();
    // Residual reflects the injected noise, bounded by its amplitude.
    assert!(outcome.rms_error > 0.0);
    assert!(outcome.rms_error < 3.0 * 2.0_f64.sqrt());

    // The smoothed mapping stays close to the truth at the screen center.
    let center = outcome.mapping.map(&GazeVector::new(0.0, 0.0));
    let expect = truth.map(&GazeVector::new(0.0, 0.0));
    assert!((center.x - expect.x).abs() < 10.0);
    assert!((center.y - expect.y).abs() < 10.0);
}

#[test]
fn quality_grows_with_noise() {
    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let gazes = synthetic::gaze_grid(5, 5, 0.35, 0.25);
    let clean = synthetic::samples_from_mapping(&truth, &gazes);

    let mut last_rms: Real = 0.0;
    for amplitude in [0.0, 1.0, 4.0, 16.0] {
        let noisy = synthetic::jitter_screen(&clean, amplitude);
        let outcome = fit_mapping(&noisy).unwrap();
        assert!(
            outcome.rms_error >= last_rms,
            "rms {} decreased below {} at amplitude {}",
            outcome.rms_error,
            last_rms,
            amplitude
        );
        last_rms = outcome.rms_error;
    }
}

#[test]
fn fit_is_order_independent() {
    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let gazes = synthetic::gaze_grid(4, 3, 0.35, 0.25);
    let points = synthetic::samples_from_mapping(&truth, &gazes);

    let forward = fit_mapping(&points).unwrap();

    let mut reversed: Vec<CalibrationPoint> = points.clone();
    reversed.reverse();
    let backward = fit_mapping(&reversed).unwrap();

    assert_eq!(forward.mapping, backward.mapping);
    assert_eq!(forward.rms_error, backward.rms_error);

    // An interleaved shuffle as well, not just reversal.
    let mut shuffled = Vec::with_capacity(points.len());
    let half = points.len() / 2;
    for i in 0..half {
        shuffled.push(points[i].clone());
        shuffled.push(points[points.len() - 1 - i].clone());
    }
    if points.len() % 2 == 1 {
        shuffled.push(points[half].clone());
    }
    let mixed = fit_mapping(&shuffled).unwrap();
    assert_eq!(forward.mapping, mixed.mapping);
    assert_eq!(forward.rms_error, mixed.rms_error);
}

#[test]
fn extrapolation_outside_hull_is_best_effort() {
    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let gazes = synthetic::gaze_grid(4, 4, 0.2, 0.15);
    let points = synthetic::samples_from_mapping(&truth, &gazes);

    let outcome = fit_mapping(&points).unwrap();
    // Well outside the calibrated region: must not fail, must stay finite.
    let far = outcome.mapping.map(&GazeVector::new(1.5, -1.2));
    assert!(far.x.is_finite() && far.y.is_finite());
}

#[test]
fn collinear_grid_rejected_not_fitted() {
    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let points = synthetic::collinear_samples(10, &truth);
    match fit_mapping(&points) {
        Err(FitError::DegenerateGeometry { condition }) => {
            assert!(condition < 1e-9);
        }
        other => panic!("expected degenerate geometry, got {:?}", other),
    }
}

#[test]
fn eye_coordinates_do_not_affect_fit() {
    let truth = synthetic::screen_mapping(1920.0, 1080.0);
    let gazes = synthetic::gaze_grid(4, 3, 0.35, 0.25);
    let points = synthetic::samples_from_mapping(&truth, &gazes);

    let moved: Vec<CalibrationPoint> = points
        .iter()
        .map(|p| {
            CalibrationPoint::new(p.gaze(), EyeCoordinates::new(10.0, 20.0), p.screen()).unwrap()
        })
        .collect();

    let a = fit_mapping(&points).unwrap();
    let b = fit_mapping(&moved).unwrap();
    assert_eq!(a.mapping, b.mapping);
}
