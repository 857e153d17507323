//! Re-projection of a calibrated target shape into the live head frame.
//!
//! Each point is expressed in the calibrated frame's local basis, rescaled
//! by the ratio of live to calibrated inter-eye distance, and reconstructed
//! in the live frame's basis. Head rotation and translation therefore never
//! distort the overlay shape, and the overlay scales with the face.

use glam::Vec3;

use crate::head_pose::HeadPoseFrame;
use crate::TargetShape;

/// Re-express one calibration-space point in the live frame.
///
/// When `live == calibrated` this is the identity up to floating error.
pub fn project_point(point: Vec3, calibrated: &HeadPoseFrame, live: &HeadPoseFrame) -> Vec3 {
    let local = calibrated.to_local(point);
    // calibrated.scale is above the geometry tolerance by construction
    let scaled = local * (live.scale / calibrated.scale);
    live.to_world(scaled)
}

/// Re-express a whole target shape in the live frame.
pub fn project(
    target: &TargetShape,
    calibrated: &HeadPoseFrame,
    live: &HeadPoseFrame,
) -> TargetShape {
    target
        .iter()
        .map(|(&index, &point)| (index, project_point(point, calibrated, live)))
        .collect()
}
