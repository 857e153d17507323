//! End-to-end properties of the overlay pipeline through the public API.

use glam::Vec3;
use std::f32::consts::TAU;

use mouthpose::calibration::{CalibrationFrame, CalibrationSet};
use mouthpose::error::FrameError;
use mouthpose::head_pose::HeadPoseFrame;
use mouthpose::smoothing::EmaSmoother;
use mouthpose::vowel::{self, Coefficients, Vowel, VowelBasis};
use mouthpose::{features, landmarks, overlay, Config, LandmarkMap, OverlaySession, ScoreMap};

const EPS: f32 = 1e-6;
const TOL: f32 = 1e-5;
// Basis vectors are unit length to a tighter bound than the cross terms
const LEN_TOL: f32 = 1e-6;

/// Synthetic face: anchors plus two lip-ring ellipses around the mouth.
fn face(mouth_rx: f32, mouth_ry: f32) -> LandmarkMap {
    let mut map = LandmarkMap::new();
    map.insert(landmarks::NOSE_TIP, Vec3::new(0.5, 0.55, 0.0));
    map.insert(landmarks::LEFT_EYE_INNER, Vec3::new(0.45, 0.4, 0.0));
    map.insert(landmarks::RIGHT_EYE_INNER, Vec3::new(0.55, 0.4, 0.0));
    let center = Vec3::new(0.5, 0.7, 0.01);
    for (i, &idx) in landmarks::MOUTH_LANDMARKS.iter().enumerate() {
        let ring_scale = if i < 20 { 1.0 } else { 0.8 };
        let theta = TAU * (i % 20) as f32 / 20.0;
        map.insert(
            idx,
            center
                + Vec3::new(
                    ring_scale * mouth_rx * theta.cos(),
                    ring_scale * mouth_ry * theta.sin(),
                    0.0,
                ),
        );
    }
    map
}

fn calibration_set() -> CalibrationSet {
    CalibrationSet::new(
        CalibrationFrame::new(face(0.06, 0.02), ScoreMap::new()),
        CalibrationFrame::new(face(0.06, 0.05), ScoreMap::new()),
        CalibrationFrame::new(face(0.035, 0.03), ScoreMap::new()),
        CalibrationFrame::new(face(0.08, 0.015), ScoreMap::new()),
    )
    .unwrap()
}

#[test]
fn orthonormality_over_varied_poses() {
    let triples = [
        // upright
        (
            Vec3::new(0.5, 0.55, 0.0),
            Vec3::new(0.45, 0.4, 0.0),
            Vec3::new(0.55, 0.4, 0.0),
        ),
        // rolled
        (
            Vec3::new(0.56, 0.53, 0.0),
            Vec3::new(0.44, 0.44, 0.0),
            Vec3::new(0.53, 0.37, 0.0),
        ),
        // yawed with depth
        (
            Vec3::new(0.48, 0.56, -0.05),
            Vec3::new(0.46, 0.4, 0.02),
            Vec3::new(0.54, 0.4, -0.03),
        ),
        // far from camera
        (
            Vec3::new(0.5, 0.52, 0.0),
            Vec3::new(0.49, 0.48, 0.0),
            Vec3::new(0.51, 0.48, 0.0),
        ),
    ];

    for (nose, left, right) in triples {
        let frame = HeadPoseFrame::from_anchors(nose, left, right, EPS).unwrap();
        assert!((frame.right.length() - 1.0).abs() < LEN_TOL);
        assert!((frame.up.length() - 1.0).abs() < LEN_TOL);
        assert!((frame.forward.length() - 1.0).abs() < LEN_TOL);
        assert!(frame.right.dot(frame.up).abs() < TOL);
        assert!(frame.right.dot(frame.forward).abs() < TOL);
        assert!(frame.up.dot(frame.forward).abs() < TOL);
        assert!(frame.scale > EPS);
    }
}

#[test]
fn identity_transform_returns_inputs() {
    let set = calibration_set();
    let calibrated = HeadPoseFrame::from_landmarks(set.neutral().landmarks(), EPS).unwrap();
    let target = vowel::synthesize(Vowel::A, &set).unwrap();

    let out = overlay::project(&target, &calibrated, &calibrated);
    for (&index, &point) in &target {
        assert!((out[&index] - point).length() < TOL);
    }
}

#[test]
fn scale_invariance_of_displacement() {
    let set = calibration_set();
    let calibrated = HeadPoseFrame::from_landmarks(set.neutral().landmarks(), EPS).unwrap();
    let target = vowel::synthesize(Vowel::I, &set).unwrap();

    let k = 3.0;
    let scaled: LandmarkMap = set
        .neutral()
        .landmarks()
        .iter()
        .map(|(&index, &point)| (index, point * k))
        .collect();
    let live = HeadPoseFrame::from_landmarks(&scaled, EPS).unwrap();
    assert!((live.scale - k * calibrated.scale).abs() < TOL);

    let base = overlay::project(&target, &calibrated, &calibrated);
    let out = overlay::project(&target, &calibrated, &live);
    for &index in &landmarks::MOUTH_LANDMARKS {
        let base_disp = base[&index] - calibrated.origin;
        let out_disp = out[&index] - live.origin;
        assert!((out_disp - base_disp * k).length() < TOL * k);
    }
}

#[test]
fn basis_vowel_exactness() {
    let set = calibration_set();
    for vowel in [Vowel::A, Vowel::U, Vowel::I] {
        let target = vowel::synthesize(vowel, &set).unwrap();
        let frame = set.frame(vowel.calibration_pose().unwrap());
        for &index in &landmarks::MOUTH_LANDMARKS {
            assert_eq!(target[&index], frame.point(index).unwrap());
        }
    }
}

#[test]
fn interpolation_linearity() {
    let set = calibration_set();

    let neutral = vowel::interpolate(Coefficients::new(0.0, 0.0, 0.0), &set).unwrap();
    for &index in &landmarks::MOUTH_LANDMARKS {
        assert!((neutral[&index] - set.neutral().point(index).unwrap()).length() < 1e-6);
    }

    let open = vowel::interpolate(Coefficients::new(1.0, 0.0, 0.0), &set).unwrap();
    let a = vowel::synthesize(Vowel::A, &set).unwrap();
    for &index in &landmarks::MOUTH_LANDMARKS {
        assert!((open[&index] - a[&index]).length() < 1e-6);
    }
}

#[test]
fn worked_aperture_example() {
    // Frames that differ only in the lower-lip samples: neutral aperture
    // 0.10, 'a' aperture 0.25, 'u' and 'i' identical to neutral. A derived
    // blend {open 0.40, spread 0.70} must land at aperture 0.16.
    let base = {
        let mut map = face(0.06, 0.02);
        for &idx in &landmarks::UPPER_LIP_SAMPLES {
            map.insert(idx, Vec3::new(0.5, 0.70, 0.0));
        }
        for &idx in &landmarks::LOWER_LIP_SAMPLES {
            map.insert(idx, Vec3::new(0.5, 0.71, 0.0));
        }
        map
    };
    let open = {
        let mut map = base.clone();
        for &idx in &landmarks::LOWER_LIP_SAMPLES {
            map.insert(idx, Vec3::new(0.5, 0.725, 0.0));
        }
        map
    };

    let set = CalibrationSet::new(
        CalibrationFrame::new(base.clone(), ScoreMap::new()),
        CalibrationFrame::new(open, ScoreMap::new()),
        CalibrationFrame::new(base.clone(), ScoreMap::new()),
        CalibrationFrame::new(base, ScoreMap::new()),
    )
    .unwrap();

    let neutral = features::extract(set.neutral().landmarks(), EPS).unwrap();
    assert!((neutral.aperture - 0.10).abs() < 1e-4);

    let target = vowel::interpolate(Coefficients::new(0.40, 0.0, 0.70), &set).unwrap();
    let mut with_anchors: LandmarkMap = target.into_iter().collect();
    with_anchors.insert(landmarks::LEFT_EYE_INNER, Vec3::new(0.45, 0.4, 0.0));
    with_anchors.insert(landmarks::RIGHT_EYE_INNER, Vec3::new(0.55, 0.4, 0.0));
    let blended = features::extract(&with_anchors, EPS).unwrap();
    assert!((blended.aperture - 0.16).abs() < 1e-4);
}

#[test]
fn smoother_convergence() {
    for alpha in [0.0, 0.5, 0.9, 0.99] {
        let mut smoother = EmaSmoother::new(alpha);
        smoother.apply(&[0.0]);
        let mut out = Vec::new();
        for _ in 0..2000 {
            out = smoother.apply(&[0.42]);
        }
        assert!(
            (out[0] - 0.42).abs() < 1e-4,
            "alpha {alpha} did not converge"
        );
    }
}

#[test]
fn strict_validation_never_defaults() {
    let mut map = face(0.06, 0.02);
    map.remove(&landmarks::LEFT_EYE_INNER);
    let err = features::extract(&map, EPS).unwrap_err();
    assert_eq!(err, FrameError::MissingLandmark(landmarks::LEFT_EYE_INNER));
}

#[test]
fn feature_basis_is_diagnostic_only() {
    // The feature-space basis and the per-point overlay path agree in
    // direction: the 'a' delta opens, the 'u' delta narrows.
    let set = calibration_set();
    let basis = VowelBasis::from_calibration(&set, EPS, 0.2).unwrap();
    assert!(basis.open_delta.aperture > 0.0);
    assert!(basis.round_delta.width < 0.0);
    assert!(basis.spread_delta.width > 0.0);
    assert!(basis.open_rate > 0.0 && basis.round_rate > 0.0 && basis.spread_rate > 0.0);
}

#[test]
fn full_session_pass_over_moving_head() {
    let set = calibration_set();
    let mut session = OverlaySession::new(set, Config::default()).unwrap();
    session.set_vowel(Vowel::E).unwrap();

    let mut scores = ScoreMap::new();
    scores.insert("jawOpen".to_string(), 0.5);

    // Walk the head across the image over several frames
    for step in 0..10 {
        let shift = Vec3::new(0.01 * step as f32, 0.005 * step as f32, 0.0);
        let live: LandmarkMap = face(0.06, 0.02)
            .into_iter()
            .map(|(index, point)| (index, point + shift))
            .collect();

        let output = session.process_frame(&live, Some(&scores)).unwrap();
        assert_eq!(output.overlay.len(), landmarks::MOUTH_LANDMARKS.len());
        assert!((output.smoothed_scores["jawOpen"] - 0.5).abs() < 1e-5);

        // The overlay rides with the head
        let expected_origin = Vec3::new(0.5, 0.55, 0.0) + shift;
        for point in output.overlay.values() {
            assert!((point.y - expected_origin.y).abs() < 0.3);
            assert!((point.x - expected_origin.x).abs() < 0.3);
        }
    }
}
