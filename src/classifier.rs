//! Hand side assignment and the per-side landmark cache.
//!
//! The classifier consumes one frame's detector output at a time: each detected hand is labeled
//! by comparing its wrist to the pose wrists, then stored under that label. Queries read the
//! stored state until the next frame overwrites it.

use std::collections::HashMap;

use crate::hand::{HandLandmark, HandLandmarks, Side};
use crate::pose::PoseLandmarks;

/// Reserved return value of [`HandState::distance`] signaling "result unavailable".
///
/// Real distances are never negative, so callers can always tell the two apart. The typed
/// [`HandState::try_distance`] reports the same condition as [`None`] instead.
pub const DISTANCE_UNAVAILABLE: f32 = -1.0;

/// A detached copy of the cached state: side label → landmark name → position.
pub type Snapshot = HashMap<&'static str, HashMap<&'static str, [f32; 3]>>;

/// Assigns a side label to one detected hand.
///
/// The capture is mirrored for selfie view, so the pose wrist matching a hand is the one
/// *farther* from the hand's own wrist; distances are compared in the image plane only. When
/// just one pose wrist is present, that side is assigned unconditionally. Without any wrist
/// reference the hand cannot be labeled and `None` is returned; this is a per-frame data gap,
/// not an error.
pub fn assign_side(hand: &HandLandmarks, pose: Option<&PoseLandmarks>) -> Option<Side> {
    let pose = pose?;
    let wrist = hand.wrist();
    let left = pose.wrist(Side::Left);
    let right = pose.wrist(Side::Right);
    match (left, right) {
        (Some(left), Some(right)) => {
            let d_left = wrist.plane_distance_squared(&left);
            let d_right = wrist.plane_distance_squared(&right);
            if d_left >= d_right {
                Some(Side::Left)
            } else {
                Some(Side::Right)
            }
        }
        (Some(_), None) => Some(Side::Left),
        (None, Some(_)) => Some(Side::Right),
        (None, None) => None,
    }
}

/// Per-side cache of the most recent landmark sets.
///
/// Holds at most one [`HandLandmarks`] per [`Side`]. Each frame's detections overwrite their
/// side's entry wholesale; a side that goes undetected keeps its previous entry until a new
/// detection for it arrives. The cache is reset by dropping the value and creating a new one.
#[derive(Debug, Default, Clone)]
pub struct HandState {
    sides: [Option<HandLandmarks>; 2],
    labels: Vec<Option<Side>>,
}

impl HandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests one frame's detections.
    ///
    /// Every hand is labeled via [`assign_side`] and stored under its label. Hands that cannot
    /// be labeled are discarded for this frame (they still show up as [`None`] in
    /// [`HandState::labels`]).
    pub fn update(&mut self, hands: &[HandLandmarks], pose: Option<&PoseLandmarks>) {
        self.labels.clear();
        for hand in hands {
            let side = assign_side(hand, pose);
            self.labels.push(side);
            match side {
                Some(side) => self.sides[side as usize] = Some(hand.clone()),
                None => log::debug!("dropping unlabeled hand detection for this frame"),
            }
        }
    }

    /// Returns the cached landmark set for `side`, if one was ever stored.
    pub fn get(&self, side: Side) -> Option<&HandLandmarks> {
        self.sides[side as usize].as_ref()
    }

    /// Returns the labels assigned during the last [`HandState::update`], in detection order.
    pub fn labels(&self) -> &[Option<Side>] {
        &self.labels
    }

    /// Returns `true` while no hand has ever been stored.
    pub fn is_empty(&self) -> bool {
        self.sides.iter().all(Option::is_none)
    }

    /// Computes the 3D distance between two landmarks of one cached hand.
    ///
    /// With a `side` filter only that side's entry is considered; otherwise sides are searched
    /// in [`Side::BOTH`] order and the first populated entry answers the query. Returns [`None`]
    /// when no considered entry is populated.
    pub fn try_distance(
        &self,
        a: HandLandmark,
        b: HandLandmark,
        side: Option<Side>,
    ) -> Option<f32> {
        match side {
            Some(side) => self.measure(side, a, b),
            None => Side::BOTH
                .into_iter()
                .find_map(|side| self.measure(side, a, b)),
        }
    }

    fn measure(&self, side: Side, a: HandLandmark, b: HandLandmark) -> Option<f32> {
        let hand = self.get(side)?;
        Some(hand.get(a).distance_to(&hand.get(b)))
    }

    /// Name-based variant of [`HandState::try_distance`] for host-facing queries.
    ///
    /// Landmark names are matched case-insensitively, the side filter per
    /// [`Side::from_query`]. Every unavailable result, whether from an unknown name, an
    /// unmatched side filter, or an empty cache, is reported as [`DISTANCE_UNAVAILABLE`] rather
    /// than an error.
    pub fn distance(&self, name_a: &str, name_b: &str, side: Option<&str>) -> f32 {
        let (Some(a), Some(b)) = (
            HandLandmark::from_name(name_a),
            HandLandmark::from_name(name_b),
        ) else {
            return DISTANCE_UNAVAILABLE;
        };
        let side = match side {
            Some(query) => match Side::from_query(query) {
                Some(side) => Some(side),
                None => return DISTANCE_UNAVAILABLE,
            },
            None => None,
        };
        self.try_distance(a, b, side).unwrap_or(DISTANCE_UNAVAILABLE)
    }

    /// Returns a deep copy of the cached state, detached from future updates.
    ///
    /// Keys are the canonical side and landmark names, positions plain `[x, y, z]` arrays, so
    /// the result maps directly onto the host environment's data structures.
    pub fn export(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for side in Side::BOTH {
            if let Some(hand) = self.get(side) {
                let points = HandLandmark::ALL
                    .into_iter()
                    .map(|lm| (lm.name(), hand.get(lm).position()))
                    .collect();
                snapshot.insert(side.label(), points);
            }
        }
        snapshot
    }

    /// Serializes [`HandState::export`] for host scripting environments that consume JSON.
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.export()).expect("snapshot serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::landmark::{Landmark, Landmarks};
    use crate::pose::{PoseLandmark, POSE_LANDMARK_COUNT};

    use super::*;

    fn test_hand(wrist: [f32; 3], index_tip: [f32; 3]) -> HandLandmarks {
        let mut positions = [[0.1, 0.1, 0.0]; 21];
        positions[HandLandmark::Wrist as usize] = wrist;
        positions[HandLandmark::IndexFingerTip as usize] = index_tip;
        HandLandmarks::from_positions(&positions).unwrap()
    }

    fn test_pose(left_wrist: Option<[f32; 3]>, right_wrist: Option<[f32; 3]>) -> PoseLandmarks {
        let mut landmarks = Landmarks::new(POSE_LANDMARK_COUNT);
        for i in 0..POSE_LANDMARK_COUNT {
            landmarks.set(i, Landmark::new([0.5, 0.5, 0.0]).with_presence(1.0));
        }
        let mut set_wrist = |idx: PoseLandmark, wrist: Option<[f32; 3]>| {
            let lm = match wrist {
                Some(pos) => Landmark::new(pos).with_presence(1.0),
                None => Landmark::new([0.0; 3]).with_presence(0.0),
            };
            landmarks.set(idx as usize, lm);
        };
        set_wrist(PoseLandmark::LeftWrist, left_wrist);
        set_wrist(PoseLandmark::RightWrist, right_wrist);
        PoseLandmarks::new(landmarks).unwrap()
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let hand = test_hand([0.2, 0.5, 0.0], [0.3, 0.3, 0.0]);
        let pose = test_pose(Some([0.25, 0.5, 0.0]), Some([0.8, 0.5, 0.0]));
        let first = assign_side(&hand, Some(&pose));
        for _ in 0..10 {
            assert_eq!(assign_side(&hand, Some(&pose)), first);
        }
    }

    #[test]
    fn test_mirrored_assignment_picks_farther_wrist() {
        // The hand's wrist is much closer to the left pose wrist, so the mirrored-capture rule
        // labels it as the right hand.
        let hand = test_hand([0.2, 0.5, 0.0], [0.3, 0.3, 0.0]);
        let pose = test_pose(Some([0.25, 0.5, 0.0]), Some([0.8, 0.5, 0.0]));
        assert_eq!(assign_side(&hand, Some(&pose)), Some(Side::Right));

        let far_hand = test_hand([0.85, 0.5, 0.0], [0.9, 0.3, 0.0]);
        assert_eq!(assign_side(&far_hand, Some(&pose)), Some(Side::Left));
    }

    #[test]
    fn test_single_wrist_assigns_unconditionally() {
        let hand = test_hand([0.2, 0.5, 0.0], [0.3, 0.3, 0.0]);
        let pose = test_pose(None, Some([0.21, 0.5, 0.0]));
        assert_eq!(assign_side(&hand, Some(&pose)), Some(Side::Right));

        let pose = test_pose(Some([0.9, 0.9, 0.0]), None);
        assert_eq!(assign_side(&hand, Some(&pose)), Some(Side::Left));
    }

    #[test]
    fn test_unlabelable_hand_is_dropped() {
        let hand = test_hand([0.2, 0.5, 0.0], [0.3, 0.3, 0.0]);
        assert_eq!(assign_side(&hand, None), None);

        let mut state = HandState::new();
        state.update(&[hand.clone()], None);
        assert_eq!(state.labels(), &[None]);
        assert!(state.is_empty());

        let pose = test_pose(None, None);
        state.update(&[hand], Some(&pose));
        assert_eq!(state.labels(), &[None]);
        assert!(state.is_empty());
    }

    #[test]
    fn test_distance_fixture() {
        let mut state = HandState::new();
        let hand = test_hand([0.0, 0.0, 0.0], [3.0, 4.0, 0.0]);
        // Only the left pose wrist is available, so the hand is stored as LEFT_HAND.
        let pose = test_pose(Some([0.5, 0.5, 0.0]), None);
        state.update(&[hand], Some(&pose));

        assert_relative_eq!(
            state.distance("WRIST", "INDEX_FINGER_TIP", Some("left")),
            5.0,
        );
        assert_relative_eq!(
            state.distance("wrist", "index_finger_tip", Some("Left hand")),
            5.0,
        );
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let mut state = HandState::new();
        let pose = test_pose(Some([0.5, 0.5, 0.0]), None);
        state.update(&[test_hand([0.1, 0.2, 0.3], [0.7, 0.6, -0.2])], Some(&pose));

        let ab = state.distance("WRIST", "INDEX_FINGER_TIP", None);
        let ba = state.distance("INDEX_FINGER_TIP", "WRIST", None);
        assert!(ab > 0.0);
        assert_relative_eq!(ab, ba);

        assert_eq!(state.distance("WRIST", "WRIST", Some("left")), 0.0);
    }

    #[test]
    fn test_unfiltered_query_searches_all_sides() {
        let mut state = HandState::new();
        let hand = test_hand([0.0, 0.0, 0.0], [3.0, 4.0, 0.0]);
        let pose = test_pose(None, Some([0.5, 0.5, 0.0]));
        state.update(&[hand], Some(&pose));

        assert!(state.get(Side::Left).is_none());
        assert_relative_eq!(state.distance("WRIST", "INDEX_FINGER_TIP", None), 5.0);
    }

    #[test]
    fn test_unavailable_results_use_sentinel() {
        let state = HandState::new();
        assert_eq!(state.distance("WRIST", "THUMB_TIP", None), DISTANCE_UNAVAILABLE);
        assert_eq!(state.try_distance(HandLandmark::Wrist, HandLandmark::ThumbTip, None), None);

        let mut state = HandState::new();
        let pose = test_pose(Some([0.5, 0.5, 0.0]), None);
        state.update(&[test_hand([0.0; 3], [0.1; 3])], Some(&pose));

        // Unknown landmark name.
        assert_eq!(state.distance("WRIST", "ELBOW", None), DISTANCE_UNAVAILABLE);
        // Unparseable side filter.
        assert_eq!(
            state.distance("WRIST", "THUMB_TIP", Some("middle")),
            DISTANCE_UNAVAILABLE,
        );
        // Valid side filter with no stored entry.
        assert_eq!(
            state.distance("WRIST", "THUMB_TIP", Some("right")),
            DISTANCE_UNAVAILABLE,
        );
    }

    #[test]
    fn test_update_overwrites_wholesale() {
        let mut state = HandState::new();
        let pose = test_pose(Some([0.5, 0.5, 0.0]), None);
        state.update(&[test_hand([0.0; 3], [0.1; 3])], Some(&pose));

        let replacement = test_hand([0.4, 0.4, 0.0], [0.9, 0.9, 0.0]);
        state.update(&[replacement.clone()], Some(&pose));
        assert_eq!(state.get(Side::Left), Some(&replacement));
    }

    #[test]
    fn test_stale_state_is_retained() {
        let mut state = HandState::new();
        let pose = test_pose(Some([0.5, 0.5, 0.0]), None);
        let hand = test_hand([0.0, 0.0, 0.0], [3.0, 4.0, 0.0]);
        state.update(&[hand.clone()], Some(&pose));

        let before = state.export();
        state.update(&[], Some(&pose));
        state.update(&[], None);

        assert_eq!(state.get(Side::Left), Some(&hand));
        assert_eq!(state.export(), before);
        assert!(state.labels().is_empty());
    }

    #[test]
    fn test_export_of_empty_state_is_empty() {
        let mut state = HandState::new();
        assert!(state.export().is_empty());

        state.update(&[], None);
        assert!(state.export().is_empty());
    }

    #[test]
    fn test_export_detaches_from_live_state() {
        let mut state = HandState::new();
        let pose = test_pose(Some([0.5, 0.5, 0.0]), None);
        state.update(&[test_hand([0.0; 3], [3.0, 4.0, 0.0])], Some(&pose));

        let snapshot = state.export();
        state.update(&[test_hand([0.9; 3], [0.8; 3])], Some(&pose));

        assert_eq!(snapshot["LEFT_HAND"]["WRIST"], [0.0, 0.0, 0.0]);
        assert_eq!(snapshot["LEFT_HAND"]["INDEX_FINGER_TIP"], [3.0, 4.0, 0.0]);
        assert_eq!(snapshot["LEFT_HAND"].len(), 21);
    }

    #[test]
    fn test_export_json_uses_canonical_keys() {
        let mut state = HandState::new();
        let pose = test_pose(None, Some([0.5, 0.5, 0.0]));
        state.update(&[test_hand([0.0; 3], [0.5, 0.5, 0.5])], Some(&pose));

        let json = state.export_json();
        assert!(json.get("RIGHT_HAND").is_some());
        assert!(json.get("LEFT_HAND").is_none());
        assert_eq!(json["RIGHT_HAND"]["INDEX_FINGER_TIP"][2], 0.5);
        assert_eq!(json["RIGHT_HAND"]["WRIST"][0], 0.0);
    }
}
