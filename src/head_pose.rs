//! Head-pose coordinate frame built from the three facial anchors.
//!
//! The frame is recomputed from scratch every frame; it is never mutated,
//! only replaced.

use glam::Vec3;

use crate::error::FrameError;
use crate::landmarks;
use crate::LandmarkMap;

/// An orthonormal local coordinate system for the head.
///
/// `right`, `up`, and `forward` form a right-handed orthonormal basis
/// whenever the anchors are non-degenerate. `scale` is the inter-eye
/// distance in input units and is always above the geometry tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPoseFrame {
    /// Frame origin: the nose tip.
    pub origin: Vec3,
    /// Unit vector from the left eye towards the right eye.
    pub right: Vec3,
    /// Unit vector from the nose towards the top of the head.
    pub up: Vec3,
    /// Unit vector out of the face.
    pub forward: Vec3,
    /// Inter-eye distance, pre-normalization.
    pub scale: f32,
}

impl HeadPoseFrame {
    /// Build a frame from the three anchor points.
    ///
    /// Fails with `DegenerateGeometry` when the eyes coincide or the nose
    /// lies on the eye axis in a way that collapses the cross product.
    pub fn from_anchors(
        nose: Vec3,
        left_eye: Vec3,
        right_eye: Vec3,
        epsilon: f32,
    ) -> Result<Self, FrameError> {
        let eye_span = right_eye - left_eye;
        let scale = eye_span.length();
        if scale < epsilon {
            return Err(FrameError::DegenerateGeometry("coincident eye anchors"));
        }
        let right = eye_span / scale;

        let eye_center = (left_eye + right_eye) * 0.5;
        let down = normalize_checked(nose - eye_center, epsilon, "nose at eye center")?;
        let forward = normalize_checked(right.cross(down), epsilon, "nose on eye axis")?;
        let up = normalize_checked(forward.cross(right), epsilon, "collapsed vertical axis")?;

        Ok(Self {
            origin: nose,
            right,
            up,
            forward,
            scale,
        })
    }

    /// Build a frame by looking up the anchor indices in a landmark map.
    pub fn from_landmarks(map: &LandmarkMap, epsilon: f32) -> Result<Self, FrameError> {
        let nose = anchor(map, landmarks::NOSE_TIP)?;
        let left_eye = anchor(map, landmarks::LEFT_EYE_INNER)?;
        let right_eye = anchor(map, landmarks::RIGHT_EYE_INNER)?;
        Self::from_anchors(nose, left_eye, right_eye, epsilon)
    }

    /// Express a world-space point in this frame's local coordinates.
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        let offset = point - self.origin;
        Vec3::new(
            offset.dot(self.right),
            offset.dot(self.up),
            offset.dot(self.forward),
        )
    }

    /// Reconstruct a world-space point from local coordinates.
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + local.x * self.right + local.y * self.up + local.z * self.forward
    }
}

fn anchor(map: &LandmarkMap, index: u32) -> Result<Vec3, FrameError> {
    map.get(&index)
        .copied()
        .ok_or(FrameError::MissingLandmark(index))
}

fn normalize_checked(v: Vec3, epsilon: f32, what: &'static str) -> Result<Vec3, FrameError> {
    let len = v.length();
    if len < epsilon {
        return Err(FrameError::DegenerateGeometry(what));
    }
    Ok(v / len)
}
