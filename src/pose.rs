//! Typed pose landmark sets.
//!
//! Only the wrist landmarks are consumed by the classifier, but the full set is kept so hosts
//! can query other reference points without a second conversion.

use anyhow::bail;

use crate::hand::Side;
use crate::landmark::{Landmark, Landmarks};

/// Number of pose landmarks produced by the detector.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Some detector variants append 6 auxiliary landmarks used for region tracking.
const AUX_LANDMARK_COUNT: usize = 6;

/// Presence score below which a landmark is treated as not detected.
pub const PRESENCE_THRESHOLD: f32 = 0.5;

/// Names for the pose landmarks, in detector output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

/// The pose landmarks of one detected body.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseLandmarks {
    landmarks: Landmarks,
}

impl PoseLandmarks {
    /// Wraps a raw landmark collection, rejecting it unless it has the expected entry count.
    ///
    /// Both the 33-landmark output of the high-level detector and the 39-landmark raw network
    /// output (which appends auxiliary tracking landmarks) are accepted. Auxiliary landmarks are
    /// not addressable through [`PoseLandmark`].
    pub fn new(landmarks: Landmarks) -> anyhow::Result<Self> {
        let len = landmarks.len();
        if len != POSE_LANDMARK_COUNT && len != POSE_LANDMARK_COUNT + AUX_LANDMARK_COUNT {
            bail!(
                "pose detection has {} landmarks (expected {} or {})",
                len,
                POSE_LANDMARK_COUNT,
                POSE_LANDMARK_COUNT + AUX_LANDMARK_COUNT,
            );
        }
        Ok(Self { landmarks })
    }

    /// Converts raw detector positions into a typed landmark set.
    pub fn from_positions(positions: &[[f32; 3]]) -> anyhow::Result<Self> {
        Self::new(positions.iter().map(|&pos| Landmark::new(pos)).collect())
    }

    pub fn get(&self, landmark: PoseLandmark) -> Landmark {
        self.landmarks.get(landmark as usize)
    }

    pub fn pose_landmarks(&self) -> impl Iterator<Item = Landmark> + '_ {
        (0..POSE_LANDMARK_COUNT).map(|i| self.landmarks.get(i))
    }

    /// Returns the wrist reference point for `side`, if the detector considers it present.
    ///
    /// A wrist with a presence score below [`PRESENCE_THRESHOLD`] is reported as absent.
    /// Detectors that emit no presence data have all landmarks treated as present.
    pub fn wrist(&self, side: Side) -> Option<Landmark> {
        let lm = match side {
            Side::Left => self.get(PoseLandmark::LeftWrist),
            Side::Right => self.get(PoseLandmark::RightWrist),
        };
        match lm.presence() {
            Some(presence) if presence < PRESENCE_THRESHOLD => None,
            _ => Some(lm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_with_presence(left: f32, right: f32) -> PoseLandmarks {
        let mut landmarks = Landmarks::new(POSE_LANDMARK_COUNT);
        for i in 0..POSE_LANDMARK_COUNT {
            landmarks.set(i, Landmark::new([0.5, 0.5, 0.0]).with_presence(1.0));
        }
        landmarks.set(
            PoseLandmark::LeftWrist as usize,
            Landmark::new([0.3, 0.6, 0.0]).with_presence(left),
        );
        landmarks.set(
            PoseLandmark::RightWrist as usize,
            Landmark::new([0.7, 0.6, 0.0]).with_presence(right),
        );
        PoseLandmarks::new(landmarks).unwrap()
    }

    #[test]
    fn test_rejects_malformed_detection() {
        assert!(PoseLandmarks::from_positions(&[[0.0; 3]; 10]).is_err());
        assert!(PoseLandmarks::from_positions(&[[0.0; 3]; 33]).is_ok());
        assert!(PoseLandmarks::from_positions(&[[0.0; 3]; 39]).is_ok());
    }

    #[test]
    fn test_wrist_presence_gating() {
        let pose = pose_with_presence(0.9, 0.1);
        assert_eq!(
            pose.wrist(Side::Left).map(|lm| lm.position()),
            Some([0.3, 0.6, 0.0]),
        );
        assert_eq!(pose.wrist(Side::Right), None);
    }

    #[test]
    fn test_wrist_without_presence_data_is_present() {
        let pose = PoseLandmarks::from_positions(&[[0.5, 0.5, 0.0]; 33]).unwrap();
        assert!(pose.wrist(Side::Left).is_some());
        assert!(pose.wrist(Side::Right).is_some());
    }
}
