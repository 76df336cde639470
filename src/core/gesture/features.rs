use crate::core::landmark::{HandLandmarks, PoseLandmarks};

/// Fixed per-frame feature schema: up to 2 hands x 21 landmarks x 2
/// hand-local coordinates, then 2 elbows x 2 pixel coordinates, hands
/// first, zero-padded on the right. Existing artifacts depend on this
/// exact layout.
pub const FEATURE_LEN: usize = 88;

/// Hands contributing to the schema.
pub const MAX_TRACKED_HANDS: usize = 2;

/// Build one frame's feature vector from detection results.
///
/// Hand coordinates are offset by the hand's own bounding-box minimum,
/// elbows are in frame pixel space. Always returns exactly
/// [`FEATURE_LEN`] values.
pub fn frame_features(
    hands: &[HandLandmarks],
    pose: Option<&PoseLandmarks>,
    width: u32,
    height: u32,
) -> Vec<f32> {
    let mut features = Vec::with_capacity(FEATURE_LEN);

    for hand in hands.iter().take(MAX_TRACKED_HANDS) {
        if hand.points.is_empty() {
            continue;
        }
        let min_x = hand.min_x();
        let min_y = hand.min_y();
        for point in &hand.points {
            features.push(point.x - min_x);
            features.push(point.y - min_y);
        }
    }

    if let Some(pose) = pose {
        if let (Some(left), Some(right)) = (pose.left_elbow(), pose.right_elbow()) {
            features.push(left.x * width as f32);
            features.push(left.y * height as f32);
            features.push(right.x * width as f32);
            features.push(right.y * height as f32);
        }
    }

    if features.len() < FEATURE_LEN {
        features.resize(FEATURE_LEN, 0.0);
    }

    features
}
