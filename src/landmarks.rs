//! Static catalogue of tracked face-mesh indices.
//!
//! Indices follow the 468-point face mesh the external detector reports.
//! Only the three pose anchors and the 40 lip-ring points are ever read;
//! everything else in the detector payload is ignored.

/// Nose tip, the head-pose frame origin.
pub const NOSE_TIP: u32 = 1;

/// Inner corner of the left eye (image left).
pub const LEFT_EYE_INNER: u32 = 133;

/// Inner corner of the right eye (image right).
pub const RIGHT_EYE_INNER: u32 = 362;

/// The three anchor landmarks that define the head-pose frame.
pub const ANCHORS: [u32; 3] = [NOSE_TIP, LEFT_EYE_INNER, RIGHT_EYE_INNER];

/// Left mouth corner (outer lip ring).
pub const MOUTH_CORNER_LEFT: u32 = 61;

/// Right mouth corner (outer lip ring).
pub const MOUTH_CORNER_RIGHT: u32 = 291;

/// Upper-lip sample points for the aperture measurement (inner ring).
pub const UPPER_LIP_SAMPLES: [u32; 3] = [82, 13, 312];

/// Lower-lip sample points for the aperture measurement (inner ring).
pub const LOWER_LIP_SAMPLES: [u32; 3] = [87, 14, 317];

/// All 40 tracked mouth landmarks: the outer lip ring followed by the
/// inner lip ring.
pub const MOUTH_LANDMARKS: [u32; 40] = [
    // outer ring
    61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 409, 270, 269, 267, 0, 37, 39, 40, 185,
    // inner ring
    78, 95, 88, 178, 87, 14, 317, 402, 318, 324, 308, 415, 310, 311, 312, 13, 82, 81, 80, 191,
];

/// Whether `index` is one of the tracked mouth landmarks.
pub fn is_mouth_landmark(index: u32) -> bool {
    MOUTH_LANDMARKS.contains(&index)
}
